use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{Model, PreviewDevice};
use crate::page::{self, BlockContent, image_rows};

use super::blocks::{content_height, image_placeholder, markdown_lines};
use super::grid::{self, Layout as GridLayout};
use super::images::{self, ImageSlot};
use super::render::render_empty_state;
use super::{MOBILE_PREVIEW_WIDTH, PREVIEW_COLUMN_GAP, PREVIEW_ROW_GAP, style};

/// Rows a block takes in the preview at `width`.
fn preview_height(block: &page::Block, width: u16) -> u16 {
    match block.content() {
        BlockContent::Text { markdown } if markdown.trim().is_empty() => 1,
        BlockContent::Image { url: None, .. } => 1,
        BlockContent::Image { height, .. } => image_rows(*height),
        BlockContent::Text { .. } => content_height(block, width),
    }
}

fn preview_lines(block: &page::Block, width: u16) -> Vec<Line<'static>> {
    match block.content() {
        BlockContent::Text { markdown } if markdown.trim().is_empty() => {
            vec![Line::styled("Empty text component", style::muted())]
        }
        BlockContent::Text { markdown } => markdown_lines(markdown, width),
        BlockContent::Image { url: None, .. } => {
            vec![Line::styled("No image", style::muted())]
        }
        BlockContent::Image { url: Some(url), .. } => image_placeholder(url, width),
    }
}

/// Area used for page content on `device` inside `area`.
pub fn device_area(device: PreviewDevice, area: Rect) -> Rect {
    match device {
        PreviewDevice::Desktop => area,
        PreviewDevice::Mobile => {
            let width = MOBILE_PREVIEW_WIDTH.saturating_add(2).min(area.width);
            let x = area.x + area.width.saturating_sub(width) / 2;
            Rect::new(x, area.y, width, area.height)
        }
    }
}

/// Layout of `page` as shown on `device` at `width` columns.
pub fn preview_layout(page: &page::Page, device: PreviewDevice, width: u16) -> GridLayout {
    match device {
        PreviewDevice::Desktop => grid::grid_layout(
            page,
            width,
            PREVIEW_COLUMN_GAP,
            PREVIEW_ROW_GAP,
            preview_height,
        ),
        PreviewDevice::Mobile => {
            grid::stacked_layout(page, width, PREVIEW_ROW_GAP, preview_height)
        }
    }
}

pub fn render_preview(model: &mut Model, frame: &mut Frame, area: Rect) {
    let tabs: Vec<Span> = [PreviewDevice::Desktop, PreviewDevice::Mobile]
        .into_iter()
        .map(|device| {
            let tab_style = if device == model.device {
                style::active_choice()
            } else {
                style::muted()
            };
            Span::styled(format!(" {} ", device.label()), tab_style)
        })
        .collect();
    let outer = Block::default()
        .title("Preview")
        .title_top(Line::from(tabs).right_aligned())
        .borders(Borders::ALL);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let device_rect = device_area(model.device, inner);
    let content = if model.device == PreviewDevice::Mobile {
        let frame_block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_style(style::card_border());
        let content = frame_block.inner(device_rect);
        frame.render_widget(frame_block, device_rect);
        content
    } else {
        device_rect
    };

    if model.page.is_empty() {
        model.preview_viewport.resize(content.width, content.height);
        model.preview_viewport.set_total_rows(0);
        render_empty_state(
            frame,
            content,
            "Nothing to preview",
            "Add components to see them here",
        );
        return;
    }

    let layout = preview_layout(&model.page, model.device, content.width);
    model.preview_viewport.resize(content.width, content.height);
    model.preview_viewport.set_total_rows(layout.total_height);
    let offset = model.preview_viewport.offset();

    let mut slots = Vec::new();
    for placement in &layout.placements {
        let Some(block) = model.page.get(placement.block) else {
            continue;
        };
        let Some((rect, clipped_top)) = placement.visible(content, offset) else {
            continue;
        };
        let lines = preview_lines(block, placement.width);
        frame.render_widget(Paragraph::new(lines).scroll((clipped_top, 0)), rect);

        if let Some(url) = block.image_url()
            && images::has_protocol(model, url)
            && let Some(full) = placement.fully_visible(content, offset)
        {
            slots.push(ImageSlot {
                reference: url.to_string(),
                area: full,
            });
        }
    }
    images::render_images(model, frame, &slots);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{BlockKind, BlockWidth, Page};

    #[test]
    fn test_mobile_area_is_centered_and_capped() {
        let area = Rect::new(0, 0, 100, 20);
        let rect = device_area(PreviewDevice::Mobile, area);
        assert_eq!(rect.width, MOBILE_PREVIEW_WIDTH + 2);
        assert_eq!(rect.x, (100 - rect.width) / 2);
        assert_eq!(device_area(PreviewDevice::Desktop, area), area);
    }

    #[test]
    fn test_desktop_layout_matches_page_rows() {
        let mut page = Page::new();
        page.append(BlockKind::Text, BlockWidth::Half);
        page.append(BlockKind::Image, BlockWidth::Half);
        page.append(BlockKind::Text, BlockWidth::Full);
        let layout = preview_layout(&page, PreviewDevice::Desktop, 80);
        assert_eq!(layout.rows.len(), page.rows().len());
    }

    #[test]
    fn test_mobile_layout_stacks_every_block() {
        let mut page = Page::new();
        page.append(BlockKind::Text, BlockWidth::Half);
        page.append(BlockKind::Text, BlockWidth::Half);
        let layout = preview_layout(&page, PreviewDevice::Mobile, 40);
        assert_eq!(layout.rows.len(), 2);
    }

    #[test]
    fn test_empty_blocks_take_one_row() {
        let mut page = Page::new();
        page.append(BlockKind::Image, BlockWidth::Full);
        assert_eq!(preview_height(&page.blocks()[0], 40), 1);
    }
}
