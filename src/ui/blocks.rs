//! Block content as terminal lines, shared by the canvas and the preview.

use ratatui::prelude::*;

use crate::markdown::{self, RenderedLine};
use crate::page::{Block, BlockContent, image_rows};

use super::style;

/// Convert one rendered markdown line into a styled ratatui line.
pub fn styled_line(line: &RenderedLine) -> Line<'static> {
    let base = style::style_for_line_type(line.line_type());
    match line.spans() {
        Some(spans) => Line::from(
            spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        style::style_for_inline(base, span.style()),
                    )
                })
                .collect::<Vec<_>>(),
        ),
        None => Line::styled(line.content().to_string(), base),
    }
}

/// Render markdown to styled lines wrapped at `width`.
pub fn markdown_lines(source: &str, width: u16) -> Vec<Line<'static>> {
    let rendered = markdown::parse_with_layout(source, width.max(1));
    rendered.lines().iter().map(styled_line).collect()
}

/// Short description of an image reference for placeholders.
pub fn describe_reference(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("data:") {
        let mime = rest.split([';', ',']).next().unwrap_or("image");
        let kib = rest.len() * 3 / 4 / 1024;
        return format!("embedded {mime}, {kib} KiB");
    }
    url.to_string()
}

/// Lines shown in place of an image that cannot be drawn inline.
pub fn image_placeholder(url: &str, width: u16) -> Vec<Line<'static>> {
    let label = format!("[Image: {}]", describe_reference(url));
    let max = usize::from(width.max(4));
    let label = if label.chars().count() > max {
        let mut cut: String = label.chars().take(max.saturating_sub(2)).collect();
        cut.push_str("…]");
        cut
    } else {
        label
    };
    vec![Line::styled(
        label,
        style::style_for_line_type(&crate::markdown::LineType::Placeholder),
    )]
}

/// Content rows a block needs at `width`, excluding any frame.
pub fn content_height(block: &Block, width: u16) -> u16 {
    match block.content() {
        BlockContent::Text { markdown } => {
            let lines = if markdown.trim().is_empty() {
                1
            } else {
                markdown::parse_with_layout(markdown, width.max(1)).height()
            };
            u16::try_from(lines.max(1)).unwrap_or(u16::MAX)
        }
        BlockContent::Image { height, .. } => image_rows(*height),
    }
}
