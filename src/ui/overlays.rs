use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::{Model, Prompt};
use crate::page::{BlockWidth, ImageHeight};

use super::style;

pub fn render_prompt(prompt: &Prompt, frame: &mut Frame, area: Rect) {
    match prompt {
        Prompt::Width { kind, choice } => {
            let options: Vec<(String, String, bool)> = BlockWidth::ALL
                .iter()
                .map(|w| {
                    (
                        w.label().to_string(),
                        w.description().to_string(),
                        w == choice,
                    )
                })
                .collect();
            render_choice_prompt(&format!("Add {}", kind.title()), &options, frame, area);
        }
        Prompt::Height { choice, .. } => {
            let options: Vec<(String, String, bool)> = ImageHeight::ALL
                .iter()
                .map(|h| (h.label().to_string(), h.description(), h == choice))
                .collect();
            render_choice_prompt("Choose Height", &options, frame, area);
        }
        Prompt::Link { input } => render_link_prompt(input, frame, area),
    }
}

fn render_choice_prompt(
    title: &str,
    options: &[(String, String, bool)],
    frame: &mut Frame,
    area: Rect,
) {
    let height = u16::try_from(options.len() * 3 + 6).unwrap_or(u16::MAX);
    let popup = centered_popup_rect(40, height, area);

    let mut lines: Vec<Line> = Vec::new();
    for (idx, (label, description, active)) in options.iter().enumerate() {
        let marker = if *active { ">" } else { " " };
        let label_style = if *active {
            style::active_choice().add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{marker} {} ", idx + 1)),
            Span::styled(format!(" {label} "), label_style),
        ]));
        lines.push(Line::styled(format!("     {description}"), style::muted()));
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "\u{2191}/\u{2193} choose \u{2502} Enter confirm \u{2502} Esc cancel",
        style::muted(),
    ));

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn render_link_prompt(input: &str, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(56, 7, area);
    let lines = vec![
        Line::styled("URL", style::section()),
        Line::from(vec![
            Span::raw(input.to_string()),
            Span::styled(" ", style::caret()),
        ]),
        Line::raw(""),
        Line::styled("Enter insert \u{2502} Esc cancel", style::muted()),
    ];
    let block = Block::default()
        .title(" Insert Link ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = style::section();
    let mut all_lines: Vec<Line> = Vec::new();

    all_lines.push(Line::styled("Build", section_style));
    all_lines.push(Line::raw("  t / i               Add text / image block"));
    all_lines.push(Line::raw("  Arrows or h/j/k/l   Select block"));
    all_lines.push(Line::raw("  Tab / Shift-Tab     Next / previous block"));
    all_lines.push(Line::raw("  Enter / e           Edit selected block"));
    all_lines.push(Line::raw("  d / Delete          Delete selected block"));
    all_lines.push(Line::raw("  p                   Preview page"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Edit Text", section_style));
    all_lines.push(Line::raw("  Ctrl-b / Ctrl-i     Bold / italic (Alt-i)"));
    all_lines.push(Line::raw("  Ctrl-u              Underline"));
    all_lines.push(Line::raw("  Ctrl-` / Alt-c      Inline code"));
    all_lines.push(Line::raw("  Alt-1/2/3           Heading 1-3"));
    all_lines.push(Line::raw("  Alt-q / Alt-l       Quote / bullet list"));
    all_lines.push(Line::raw("  Alt-o               Numbered list"));
    all_lines.push(Line::raw("  Ctrl-k              Insert link"));
    all_lines.push(Line::raw("  Ctrl-z              Undo"));
    all_lines.push(Line::raw("  Ctrl-Shift-z/Ctrl-y Redo"));
    all_lines.push(Line::raw("  Ctrl-p              Edit / preview"));
    all_lines.push(Line::raw("  j/k PgUp/PgDn       Scroll the preview"));
    all_lines.push(Line::raw("  Shift+arrows        Extend selection"));
    all_lines.push(Line::raw("  Ctrl-a              Select all"));
    all_lines.push(Line::raw("  Ctrl-s / Esc        Save / cancel"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Edit Image", section_style));
    all_lines.push(Line::raw("  Tab                 URL / Upload"));
    all_lines.push(Line::raw("  Enter               Save URL / read file"));
    all_lines.push(Line::raw("  Ctrl-s / Esc        Save / cancel"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Preview", section_style));
    all_lines.push(Line::raw("  m                   Toggle desktop / mobile"));
    all_lines.push(Line::raw("  1 / 2               Desktop / mobile"));
    all_lines.push(Line::raw("  j/k, Space/b, g/G   Scroll"));
    all_lines.push(Line::raw("  Esc / q / p         Close preview"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Other", section_style));
    all_lines.push(Line::raw("  q / Ctrl-c / Ctrl-q Quit"));
    all_lines.push(Line::raw("  ? / F1              Toggle help"));
    all_lines.push(Line::raw(""));

    all_lines.push(Line::styled("Config", section_style));
    all_lines.push(Line::raw(format!("  Global: {global_cfg}")));
    all_lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Inner area: border(1) + padding(1) on each side = 4
    let inner = Rect::new(
        popup.x + 2,
        popup.y + 2,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(4),
    );

    // Reserve 1 row at bottom for footer hint
    let content_height_u16 = inner.height.saturating_sub(1);
    let content_height = content_height_u16 as usize;
    let max_scroll = all_lines.len().saturating_sub(content_height);
    let scroll = model.help_scroll_offset.min(max_scroll);

    let end = (scroll + content_height).min(all_lines.len());
    let visible: Vec<Line> = all_lines[scroll..end].to_vec();

    let content_area = Rect::new(inner.x, inner.y, inner.width, content_height_u16);
    frame.render_widget(Paragraph::new(visible), content_area);

    let footer_area = Rect::new(inner.x, inner.y + content_height_u16, inner.width, 1);
    let footer = Line::styled("j/k scroll \u{2502} any key closes", style::muted());
    frame.render_widget(Paragraph::new(footer), footer_area);
}

pub fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
