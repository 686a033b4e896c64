use ratatui::prelude::*;
use ratatui::symbols::border;
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

use crate::app::{Model, Screen};
use crate::page::{self, BlockContent, BlockKind};

use super::blocks::{content_height, image_placeholder, markdown_lines};
use super::grid::{self, Placement};
use super::images::{self, ImageSlot};
use super::{
    CANVAS_COLUMN_GAP, CANVAS_ROW_GAP, PANEL_MIN_WIDTH, PANEL_WIDTH_PERCENT, SIDEBAR_WIDTH,
    overlays, panel, preview, status,
};

/// Dashed card frame for unselected blocks on the canvas.
const DASHED: border::Set = border::Set {
    top_left: "┌",
    top_right: "┐",
    bottom_left: "└",
    bottom_right: "┘",
    vertical_left: "┆",
    vertical_right: "┆",
    horizontal_top: "┄",
    horizontal_bottom: "┄",
};

/// Split the screen into body, toast row and status bar.
pub fn split_screen(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area)
}

/// Sidebar, canvas and (when editing) the edit panel, left to right.
pub fn split_build_columns(area: Rect, panel_open: bool) -> (Rect, Rect, Option<Rect>) {
    let sidebar_width = SIDEBAR_WIDTH.min(area.width / 3);
    let sidebar = Rect::new(area.x, area.y, sidebar_width, area.height);
    let rest = Rect::new(
        area.x + sidebar_width,
        area.y,
        area.width.saturating_sub(sidebar_width),
        area.height,
    );
    if !panel_open {
        return (sidebar, rest, None);
    }
    let panel_width = (rest.width * PANEL_WIDTH_PERCENT / 100)
        .max(PANEL_MIN_WIDTH)
        .min(rest.width.saturating_sub(10));
    let canvas = Rect::new(
        rest.x,
        rest.y,
        rest.width.saturating_sub(panel_width),
        rest.height,
    );
    let panel = Rect::new(canvas.x + canvas.width, rest.y, panel_width, rest.height);
    (sidebar, canvas, Some(panel))
}

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let _scope = crate::perf::scope("ui.render");
    let area = frame.area();
    let chunks = split_screen(area);

    match model.screen {
        Screen::Build => render_build(model, frame, chunks[0]),
        Screen::Preview => preview::render_preview(model, frame, chunks[0]),
    }
    status::render_toast_bar(model, frame, chunks[1]);
    status::render_status_bar(model, frame, chunks[2]);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    } else if let Some(prompt) = &model.prompt {
        overlays::render_prompt(prompt, frame, area);
    }
}

fn render_build(model: &mut Model, frame: &mut Frame, area: Rect) {
    let (sidebar, canvas, panel_area) = split_build_columns(area, model.is_editing());
    render_sidebar(frame, sidebar);
    render_canvas(model, frame, canvas);
    if let Some(panel_area) = panel_area {
        panel::render_edit_panel(model, frame, panel_area);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for (kind, key) in [(BlockKind::Text, 't'), (BlockKind::Image, 'i')] {
        lines.push(Line::from(vec![
            Span::styled(format!("[{key}] "), super::style::muted()),
            Span::styled(kind.title(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::styled(
            format!("    {}", kind.description()),
            super::style::muted(),
        ));
        lines.push(Line::raw(""));
    }
    let block = Block::default()
        .title("Components")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Height of a canvas card: content plus its frame.
fn card_height(block: &page::Block, width: u16) -> u16 {
    let inner = width.saturating_sub(2).max(1);
    let content = if block.is_empty() {
        1
    } else {
        content_height(block, inner)
    };
    content.saturating_add(2)
}

fn render_canvas(model: &mut Model, frame: &mut Frame, area: Rect) {
    let outer = Block::default()
        .title("Page Builder")
        .title_top(Line::styled("p: Preview  ?: Help", super::style::muted()).right_aligned())
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if model.page.is_empty() {
        model.canvas_viewport.resize(inner.width, inner.height);
        model.canvas_viewport.set_total_rows(0);
        render_empty_state(
            frame,
            inner,
            "Nothing here yet",
            "Start building by adding components from the sidebar",
        );
        return;
    }

    let layout = grid::grid_layout(
        &model.page,
        inner.width,
        CANVAS_COLUMN_GAP,
        CANVAS_ROW_GAP,
        card_height,
    );
    model.canvas_viewport.resize(inner.width, inner.height);
    model.canvas_viewport.set_total_rows(layout.total_height);
    if let Some((top, height)) = model.selected.and_then(|id| layout.row_of(id)) {
        model.canvas_viewport.reveal(top, height);
    }
    let offset = model.canvas_viewport.offset();

    let mut slots = Vec::new();
    for placement in &layout.placements {
        let Some(block) = model.page.get(placement.block) else {
            continue;
        };
        if let Some(slot) = render_card(model, block, placement, frame, inner, offset) {
            slots.push(slot);
        }
    }
    images::render_images(model, frame, &slots);
}

/// Draw one card. Returns an image slot when the card holds a drawable
/// image that is entirely on screen.
fn render_card(
    model: &Model,
    block: &page::Block,
    placement: &Placement,
    frame: &mut Frame,
    area: Rect,
    offset: usize,
) -> Option<ImageSlot> {
    let (rect, clipped_top) = placement.visible(area, offset)?;
    let selected = model.selected == Some(block.id());
    let editing = model.editing_block() == Some(block.id());

    let mut borders = Borders::LEFT | Borders::RIGHT;
    if clipped_top == 0 {
        borders |= Borders::TOP;
    }
    if u32::from(clipped_top) + u32::from(rect.height) >= u32::from(placement.height) {
        borders |= Borders::BOTTOM;
    }

    let title = if editing {
        format!(" {} · {} · editing ", block.id(), block.width().label())
    } else {
        format!(" {} · {} ", block.id(), block.width().label())
    };
    let mut card = Block::default().borders(borders).title(title);
    card = if selected {
        card.border_type(BorderType::Thick)
            .border_style(super::style::selected_border())
    } else {
        card.border_set(DASHED)
            .border_style(super::style::card_border())
    };

    let content_width = placement.width.saturating_sub(2).max(1);
    let lines = card_lines(block, content_width);
    let scroll = clipped_top.saturating_sub(1);
    frame.render_widget(Paragraph::new(lines).block(card.clone()).scroll((scroll, 0)), rect);

    let url = block.image_url()?;
    if !images::has_protocol(model, url) {
        return None;
    }
    placement.fully_visible(area, offset).map(|full| ImageSlot {
        reference: url.to_string(),
        area: card.inner(full),
    })
}

fn card_lines(block: &page::Block, width: u16) -> Vec<Line<'static>> {
    match block.content() {
        BlockContent::Text { markdown } if markdown.trim().is_empty() => {
            vec![Line::styled("Click to add text", super::style::muted())]
        }
        BlockContent::Text { markdown } => markdown_lines(markdown, width),
        BlockContent::Image { url: None, .. } => {
            vec![Line::styled("Click to add image", super::style::muted())]
        }
        BlockContent::Image { url: Some(url), .. } => image_placeholder(url, width),
    }
}

/// Centered two-line message for an empty page.
pub fn render_empty_state(frame: &mut Frame, area: Rect, title: &str, hint: &str) {
    let top = area.y + area.height.saturating_sub(2) / 2;
    let rect = Rect::new(area.x, top, area.width, 2.min(area.height));
    let lines = vec![
        Line::styled(title.to_string(), super::style::section()),
        Line::styled(hint.to_string(), super::style::muted()),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
}
