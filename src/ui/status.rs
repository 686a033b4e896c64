use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, Screen, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let status = match model.screen {
        Screen::Build => build_status(model),
        Screen::Preview => format!(
            " Preview  {}  [{}%]  m:device  Esc:close  ?:help",
            model.device.label(),
            model.preview_viewport.scroll_percent()
        ),
    };
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

fn build_status(model: &Model) -> String {
    let blocks = model.page.len();
    let rows = model.page.rows().len();
    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let selected = model
        .selected_block()
        .map(|b| format!("  [{} {}]", b.id(), b.width().description()))
        .unwrap_or_default();
    let editing = model
        .editing_block()
        .map(|id| format!("  editing {id}"))
        .unwrap_or_default();
    format!(
        " pagecraft  {blocks} block{}  {rows} row{}{selected}{editing}  ?:help",
        plural(blocks),
        plural(rows)
    )
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
