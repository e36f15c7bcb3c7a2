/// Color styles: the role-to-color table the text view paints with.
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// Named colors for every role the text margin paints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorStyle {
    pub name: String,
    /// Name of the syntect theme used for syntax chunks.
    pub syntax_theme: String,
    pub background: HexColor,
    pub text: HexColor,
    pub caret: HexColor,
    /// Color of the character drawn inside an overwrite-mode caret.
    pub caret_foreground: HexColor,
    pub selection_bg: HexColor,
    pub selection_fg: HexColor,
    pub bracket_highlight_bg: HexColor,
    pub bracket_highlight_border: HexColor,
    pub whitespace_marker: HexColor,
    pub fold_line: HexColor,
    pub fold_placeholder_bg: HexColor,
    pub invalid_line_marker: HexColor,
    pub ruler: HexColor,
}

impl Default for ColorStyle {
    fn default() -> Self {
        builtin_dark()
    }
}

/// Built-in dark style.
pub fn builtin_dark() -> ColorStyle {
    ColorStyle {
        name: "Dark".to_string(),
        syntax_theme: "base16-eighties.dark".to_string(),
        background: HexColor::rgb(30, 30, 30),
        text: HexColor::rgb(212, 212, 212),
        caret: HexColor::rgb(255, 255, 255),
        caret_foreground: HexColor::rgb(30, 30, 30),
        selection_bg: HexColor::rgb(38, 79, 120),
        selection_fg: HexColor::rgb(255, 255, 255),
        bracket_highlight_bg: HexColor::rgb(60, 60, 60),
        bracket_highlight_border: HexColor::rgb(130, 130, 130),
        whitespace_marker: HexColor::rgba(100, 100, 100, 180),
        fold_line: HexColor::rgb(120, 120, 120),
        fold_placeholder_bg: HexColor::rgb(45, 45, 45),
        invalid_line_marker: HexColor::rgb(80, 80, 80),
        ruler: HexColor::rgb(60, 60, 60),
    }
}

/// Built-in light style.
pub fn builtin_light() -> ColorStyle {
    ColorStyle {
        name: "Light".to_string(),
        syntax_theme: "InspiredGitHub".to_string(),
        background: HexColor::rgb(255, 255, 255),
        text: HexColor::rgb(30, 30, 30),
        caret: HexColor::rgb(0, 0, 0),
        caret_foreground: HexColor::rgb(255, 255, 255),
        selection_bg: HexColor::rgb(173, 214, 255),
        selection_fg: HexColor::rgb(0, 0, 0),
        bracket_highlight_bg: HexColor::rgb(220, 220, 220),
        bracket_highlight_border: HexColor::rgb(160, 160, 160),
        whitespace_marker: HexColor::rgba(170, 170, 170, 180),
        fold_line: HexColor::rgb(130, 130, 130),
        fold_placeholder_bg: HexColor::rgb(240, 240, 240),
        invalid_line_marker: HexColor::rgb(190, 190, 190),
        ruler: HexColor::rgb(210, 210, 210),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_differ() {
        let dark = builtin_dark();
        let light = builtin_light();
        assert_eq!(dark.name, "Dark");
        assert_eq!(light.name, "Light");
        assert_ne!(dark.background, light.background);
        assert_ne!(dark.syntax_theme, light.syntax_theme);
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(ColorStyle::default(), builtin_dark());
    }

    #[test]
    fn test_partial_style_fills_from_dark() {
        let json = r##"{ "name": "Mine", "caret": "#FF0000" }"##;
        let style: ColorStyle = serde_json::from_str(json).unwrap();
        assert_eq!(style.name, "Mine");
        assert_eq!(style.caret, HexColor::rgb(255, 0, 0));
        assert_eq!(style.background, builtin_dark().background);
    }

    #[test]
    fn test_serde_round_trip() {
        let style = builtin_light();
        let json = serde_json::to_string_pretty(&style).unwrap();
        let parsed: ColorStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, style);
    }
}
