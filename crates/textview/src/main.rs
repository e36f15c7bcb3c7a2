use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use textview_config::ViewConfig;
use textview_core::{Document, DocumentLocation};
use textview_render::{RecordingHost, RecordingSurface, SyntectHighlighter, TextEditor};

/// Renders a file through the text view and prints the drawing operations.
#[derive(Parser, Debug)]
#[command(name = "textview", version, about)]
struct Cli {
    /// File to render.
    file: PathBuf,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// First visible row.
    #[arg(long, default_value_t = 0)]
    first_row: usize,

    /// Number of rows to render.
    #[arg(long, default_value_t = 25)]
    rows: usize,

    /// View width in pixels.
    #[arg(long, default_value_t = 800)]
    width: i32,

    /// Fold a region, given as `LINE:COL-LINE:COL` (0-based). Repeatable.
    #[arg(long = "fold")]
    folds: Vec<String>,

    /// Caret location as `LINE:COL` (0-based).
    #[arg(long)]
    caret: Option<String>,

    /// Color style name from the config.
    #[arg(long)]
    style: Option<String>,

    /// Disable syntax highlighting.
    #[arg(long)]
    no_highlight: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config_path = cli.config.clone().unwrap_or_else(ViewConfig::config_path);
    let config = ViewConfig::load_or_create(&config_path);
    let style = match &cli.style {
        Some(name) => match config.find_style(name) {
            Some(style) => style.clone(),
            None => bail!(
                "unknown style '{name}', available: {}",
                config.style_names().join(", ")
            ),
        },
        None => config.active_style(),
    };
    let mut options = config.options.clone();
    if cli.no_highlight {
        options.enable_syntax_highlighting = false;
    }

    let text = std::fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;
    tracing::info!("Rendering {} with style '{}'", cli.file.display(), style.name);

    let mut document = Document::from(text.as_str());
    for arg in &cli.folds {
        let (start, end) = parse_fold(arg)?;
        document
            .add_folding(start, end, "...", true)
            .with_context(|| format!("adding fold {arg}"))?;
    }

    let mut highlighter = SyntectHighlighter::new();
    highlighter.set_syntax_for_path(Some(&cli.file));
    tracing::debug!("Detected syntax: {}", highlighter.syntax_name());
    let mut editor =
        TextEditor::new(document, options, style).with_highlighter(Box::new(highlighter));

    let line_height = editor.options().line_height;
    let mut host = RecordingHost {
        viewport: (cli.width, line_height * cli.rows as i32),
        ..RecordingHost::default()
    };
    host.scroll.y = cli.first_row as i32 * line_height;

    if let Some(arg) = &cli.caret {
        editor.set_caret_location(&mut host, parse_location(arg)?);
    }

    let mut surface = RecordingSurface::new();
    editor.draw_visible(&mut surface, &mut host);

    for op in &surface.ops {
        println!("{op}");
    }
    Ok(())
}

/// Parses `LINE:COL`.
fn parse_location(arg: &str) -> Result<DocumentLocation> {
    let Some((line, column)) = arg.trim().split_once(':') else {
        bail!("expected LINE:COL, got '{arg}'");
    };
    let line = line
        .parse()
        .with_context(|| format!("invalid line in '{arg}'"))?;
    let column = column
        .parse()
        .with_context(|| format!("invalid column in '{arg}'"))?;
    Ok(DocumentLocation::new(line, column))
}

/// Parses `LINE:COL-LINE:COL`.
fn parse_fold(arg: &str) -> Result<(DocumentLocation, DocumentLocation)> {
    let Some((start, end)) = arg.split_once('-') else {
        bail!("expected LINE:COL-LINE:COL, got '{arg}'");
    };
    Ok((parse_location(start)?, parse_location(end)?))
}
