use textview_config::{ColorStyle, EditorOptions};
use textview_core::{Document, DocumentLocation, Segment};
use textview_render::{
    CaretMove, HostRequest, Modifiers, MouseButton, RecordingHost, RecordingSurface, Rect,
    SyntectHighlighter, TextEditor,
};

fn editor(text: &str) -> TextEditor {
    let options = EditorOptions {
        char_width: 10,
        line_height: 20,
        ..EditorOptions::default()
    };
    TextEditor::new(Document::from(text), options, ColorStyle::default())
}

fn double_click(ed: &mut TextEditor, host: &mut RecordingHost, x: i32, y: i32) {
    ed.mouse_pressed(host, MouseButton::Primary, x, y, true, Modifiers::NONE);
    ed.mouse_released(host);
}

#[test]
fn test_double_click_selects_word_then_line() {
    let mut ed = editor("foo_bar baz\nnext");
    let mut host = RecordingHost::new();

    double_click(&mut ed, &mut host, 20, 5);
    assert_eq!(ed.selection().range(), Some(Segment::new(0, 7)));
    assert_eq!(ed.selection().selected_text(ed.document()).unwrap(), "foo_bar");

    double_click(&mut ed, &mut host, 20, 5);
    // Whole line including its terminator
    assert_eq!(ed.selection().range(), Some(Segment::new(0, 12)));
}

#[test]
fn test_double_click_on_whitespace_spans_both_neighbours() {
    let mut ed = editor("ab   cd");
    let mut host = RecordingHost::new();
    double_click(&mut ed, &mut host, 30, 5);
    assert_eq!(ed.selection().selected_text(ed.document()).unwrap(), "ab   cd");
}

#[test]
fn test_double_click_past_line_end_selects_last_word() {
    let mut ed = editor("abc\ndef");
    let mut host = RecordingHost::new();
    double_click(&mut ed, &mut host, 200, 5);
    assert_eq!(ed.selection().selected_text(ed.document()).unwrap(), "abc");

    let mut ed = editor("abc\n\nxyz");
    double_click(&mut ed, &mut host, 20, 25);
    assert!(!ed.selection().is_something_selected());
}

#[test]
fn test_drag_extends_selection_without_auto_scroll() {
    let mut ed = editor("hello world");
    let mut host = RecordingHost::new();
    ed.mouse_pressed(&mut host, MouseButton::Primary, 0, 5, false, Modifiers::NONE);
    host.requests.clear();

    ed.mouse_hover(&mut host, 50, 5, true);
    assert_eq!(ed.selection().range(), Some(Segment::new(0, 5)));
    assert_eq!(ed.caret().offset(), 5);
    let scrolls = host
        .requests
        .iter()
        .filter(|r| matches!(r, HostRequest::ScrollToCaret(_)))
        .count();
    assert_eq!(scrolls, 1);
    assert!(ed.caret().auto_scroll_to_caret);

    ed.mouse_hover(&mut host, 110, 5, true);
    ed.mouse_released(&mut host);
    assert_eq!(ed.selection().range(), Some(Segment::new(0, 11)));
}

#[test]
fn test_drag_selection_to_new_place() {
    let mut ed = editor("abc def");
    let mut host = RecordingHost::new();
    double_click(&mut ed, &mut host, 5, 5);
    assert_eq!(ed.selection().range(), Some(Segment::new(0, 3)));

    ed.mouse_pressed(&mut host, MouseButton::Primary, 15, 5, false, Modifiers::NONE);
    ed.mouse_hover(&mut host, 70, 5, true);
    ed.mouse_released(&mut host);

    assert_eq!(ed.document().text(), " defabc");
    assert_eq!(ed.selection().range(), Some(Segment::new(4, 3)));
    assert_eq!(ed.caret().offset(), 7);
}

#[test]
fn test_click_inside_selection_places_caret_on_release() {
    let mut ed = editor("abc def");
    let mut host = RecordingHost::new();
    double_click(&mut ed, &mut host, 5, 5);

    ed.mouse_pressed(&mut host, MouseButton::Primary, 15, 5, false, Modifiers::NONE);
    assert!(ed.selection().is_something_selected());
    ed.mouse_released(&mut host);
    assert!(!ed.selection().is_something_selected());
    assert_eq!(ed.caret().location(), DocumentLocation::new(0, 1));
}

#[test]
fn test_click_below_document_lands_on_last_line() {
    let mut ed = editor("one\ntwo");
    let mut host = RecordingHost::new();
    ed.mouse_pressed(&mut host, MouseButton::Primary, 500, 900, false, Modifiers::NONE);
    assert_eq!(ed.caret().location(), DocumentLocation::new(1, 3));
}

#[test]
fn test_bracket_match_redraws_old_and_new_lines() {
    let mut ed = editor("f(\n\n)");
    let mut host = RecordingHost::new();
    ed.set_caret_location(&mut host, DocumentLocation::new(0, 2));
    assert_eq!(ed.bracket_offset(), Some(4));
    assert!(host.was_redrawn(2));

    host.requests.clear();
    ed.set_caret_location(&mut host, DocumentLocation::new(1, 0));
    assert_eq!(ed.bracket_offset(), None);
    assert!(host.was_redrawn(0));
    assert!(host.was_redrawn(1));
    assert!(host.was_redrawn(2));
}

#[test]
fn test_bracket_highlight_can_be_disabled() {
    let mut ed = editor("(x)");
    let mut host = RecordingHost::new();
    ed.set_caret_location(&mut host, DocumentLocation::new(0, 1));
    assert_eq!(ed.bracket_offset(), Some(2));

    let options = EditorOptions {
        highlight_matching_bracket: false,
        ..ed.options().clone()
    };
    ed.set_options(&mut host, options);
    assert_eq!(ed.bracket_offset(), None);
}

#[test]
fn test_edit_redraws_following_lines_and_revalidates_caret() {
    let mut ed = editor("a\nb\nc\nd");
    let mut host = RecordingHost::new();
    ed.move_caret(&mut host, CaretMove::DocumentEnd, false);
    host.requests.clear();

    ed.document_mut().remove(1, 4).unwrap();
    ed.sync(&mut host);
    assert_eq!(ed.document().text(), "a\nd");
    assert_eq!(ed.caret().location(), DocumentLocation::new(1, 1));
    assert!(host.was_redrawn(1));
    assert!(host.was_redrawn(3));
}

#[test]
fn test_redraws_are_coalesced_per_sync() {
    let mut ed = editor("0\n1\n2\n3\n4");
    let mut host = RecordingHost::new();
    ed.set_caret_location(&mut host, DocumentLocation::new(2, 0));
    host.requests.clear();
    ed.move_caret(&mut host, CaretMove::Down, true);
    let redraws: Vec<_> = host
        .requests
        .iter()
        .filter(|r| matches!(r, HostRequest::RedrawLine(_) | HostRequest::RedrawLines(..)))
        .collect();
    assert_eq!(redraws, vec![&HostRequest::RedrawLines(2, 3)]);
}

#[test]
fn test_syntax_highlighting_colors_keywords() {
    let mut ed = editor("fn main() {}")
        .with_highlighter(Box::new(syntect_for("main.rs")));
    let mut host = RecordingHost {
        focused: false,
        ..RecordingHost::default()
    };
    let mut surface = RecordingSurface::new();
    ed.draw_line(&mut surface, &mut host, Rect::new(0, 0, 800, 20), 0, 0, 0);
    assert!(surface.texts().contains(&"fn"));
    assert!(surface.texts().len() > 1);
    assert_eq!(surface.texts().concat(), "fnmain(){}");
}

fn syntect_for(file: &str) -> SyntectHighlighter {
    let mut hl = SyntectHighlighter::new();
    hl.set_syntax_for_path(Some(std::path::Path::new(file)));
    hl
}
