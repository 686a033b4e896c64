//! The side panel that edits one block.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::{EditPanel, ImageEdit, ImageSource, Model, TextEdit};
use crate::editor::{Selection, TextBuffer};

use super::blocks::{describe_reference, markdown_lines};
use super::style;

/// Toolbar entries: label and shortcut.
const TOOLBAR: [(&str, &str); 11] = [
    ("B", "^B"),
    ("I", "^I"),
    ("U", "^U"),
    ("</>", "^`"),
    ("H1", "M-1"),
    ("H2", "M-2"),
    ("H3", "M-3"),
    ("Quote", "M-Q"),
    ("List", "M-L"),
    ("1.", "M-O"),
    ("Link", "^K"),
];

pub fn render_edit_panel(model: &mut Model, frame: &mut Frame, area: Rect) {
    let Some(panel) = model.edit.as_mut() else {
        return;
    };
    let block = Block::default()
        .title(panel.title())
        .title_top(Line::styled("Esc Cancel · Ctrl+S Save", style::muted()).right_aligned())
        .borders(Borders::ALL)
        .border_style(style::selected_border())
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    match panel {
        EditPanel::Text(edit) => render_text_panel(edit, frame, inner),
        EditPanel::Image(edit) => render_image_panel(edit, frame, inner),
    }
}

fn tab_line(tabs: &[&str], active: usize) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, tab) in tabs.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        let tab_style = if idx == active {
            style::active_choice()
        } else {
            style::muted()
        };
        spans.push(Span::styled(format!(" {tab} "), tab_style));
    }
    Line::from(spans)
}

fn toolbar_line(can_undo: bool, can_redo: bool) -> Line<'static> {
    let mut spans = Vec::new();
    for (label, key) in TOOLBAR {
        spans.push(Span::styled(
            label.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {key}  "), style::muted()));
    }
    let enabled = |on: bool| {
        if on {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            style::muted()
        }
    };
    spans.push(Span::styled("Undo", enabled(can_undo)));
    spans.push(Span::styled(" ^Z  ", style::muted()));
    spans.push(Span::styled("Redo", enabled(can_redo)));
    spans.push(Span::styled(" ^Y", style::muted()));
    Line::from(spans)
}

fn render_text_panel(edit: &mut TextEdit, frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let active = usize::from(edit.preview);
    frame.render_widget(
        Paragraph::new(tab_line(&["Edit", "Preview"], active)),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(toolbar_line(edit.engine.can_undo(), edit.engine.can_redo()))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let body = chunks[2];
    if edit.preview {
        let lines = markdown_lines(&edit.engine.text(), body.width);
        let max_scroll = lines.len().saturating_sub(body.height as usize);
        edit.scroll = edit.scroll.min(max_scroll);
        let scroll = u16::try_from(edit.scroll).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), body);
    } else {
        let lines = source_lines(edit, body);
        frame.render_widget(Paragraph::new(lines), body);
    }

    let count = edit.engine.char_count();
    let plural = if count == 1 { "" } else { "s" };
    frame.render_widget(
        Paragraph::new(Line::styled(format!("{count} character{plural}"), style::muted()))
            .alignment(Alignment::Right),
        chunks[3],
    );
    frame.render_widget(
        Paragraph::new(Line::styled(
            "Use **bold**, *italic*, `code`, # headings, - lists, > quotes",
            style::muted(),
        )),
        chunks[4],
    );
}

/// Source lines with the selection and caret drawn in. Scrolls `edit` so
/// the caret line stays on screen.
fn source_lines(edit: &mut TextEdit, area: Rect) -> Vec<Line<'static>> {
    let height = (area.height as usize).max(1);
    let width = (area.width as usize).max(1);
    let buffer = edit.engine.buffer();
    let (cursor_line, cursor_col) = buffer.cursor_position();

    if cursor_line < edit.scroll {
        edit.scroll = cursor_line;
    } else if cursor_line >= edit.scroll + height {
        edit.scroll = cursor_line + 1 - height;
    }
    let hscroll = cursor_col.saturating_sub(width.saturating_sub(1));

    let selection = buffer.selection();
    let end = (edit.scroll + height).min(buffer.line_count());
    (edit.scroll..end)
        .map(|line_idx| source_line(buffer, line_idx, selection, hscroll))
        .collect()
}

fn source_line(
    buffer: &TextBuffer,
    line_idx: usize,
    selection: Selection,
    hscroll: usize,
) -> Line<'static> {
    let text = buffer.line_at(line_idx).unwrap_or_default();
    let start = buffer.line_start(line_idx);
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    let chars: Vec<char> = text.chars().collect();
    // One extra position for a caret sitting at the end of the line.
    for col in hscroll..=chars.len() {
        let offset = start + col;
        let (ch, cell_style) = if offset == selection.head {
            (chars.get(col).copied().unwrap_or(' '), style::caret())
        } else if let Some(&ch) = chars.get(col) {
            let selected = offset >= selection.start() && offset < selection.end();
            let cell_style = if selected {
                style::text_selection()
            } else {
                Style::default()
            };
            (ch, cell_style)
        } else {
            break;
        };
        if cell_style != run_style && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style));
        }
        run_style = cell_style;
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style));
    }
    Line::from(spans)
}

fn render_image_panel(edit: &ImageEdit, frame: &mut Frame, area: Rect) {
    let active = match edit.source {
        ImageSource::Url => 0,
        ImageSource::Upload => 1,
    };
    let mut lines = vec![
        tab_line(&["URL", "Upload"], active),
        Line::styled("Tab switches source", style::muted()),
        Line::raw(""),
    ];

    match edit.source {
        ImageSource::Url => {
            lines.push(Line::styled("Image URL", style::section()));
            lines.push(field_line(&edit.value));
            lines.push(Line::styled(
                "Enter or Ctrl+S to save, empty clears the image",
                style::muted(),
            ));
        }
        ImageSource::Upload => {
            lines.push(Line::styled("File path", style::section()));
            lines.push(field_line(&edit.path));
            if edit.reading {
                lines.push(Line::styled("Reading…", style::section()));
            } else {
                lines.push(Line::styled(
                    "Enter to read the file (jpeg, png, gif, webp, bmp)",
                    style::muted(),
                ));
            }
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("Current", style::section()));
    if edit.value.trim().is_empty() {
        lines.push(Line::styled("No image selected", style::muted()));
    } else {
        lines.push(Line::raw(describe_reference(edit.value.trim())));
    }

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }),
        area,
    );
}

fn field_line(value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled("> ", style::muted()),
        Span::raw(value.to_string()),
        Span::styled(" ", style::caret()),
    ])
}
