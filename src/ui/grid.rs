//! Placing packed rows on screen.
//!
//! Both the build canvas and the desktop preview lay blocks out with
//! [`crate::page::pack_rows`]; this module turns those rows into
//! rectangles on a virtual, vertically unbounded surface.

use ratatui::layout::Rect;

use crate::page::{Block, BlockId, GRID_COLUMNS, GridSpan, Page};

/// A block's rectangle on the virtual surface. `y` is a content row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub block: BlockId,
    pub x: u16,
    pub y: usize,
    pub width: u16,
    pub height: u16,
}

impl Placement {
    pub const fn bottom(&self) -> usize {
        self.y + self.height as usize
    }

    /// Screen rectangle inside `area` when scrolled to `offset`.
    ///
    /// `None` unless the whole placement is on screen.
    pub fn fully_visible(&self, area: Rect, offset: usize) -> Option<Rect> {
        let (rect, clipped_top) = self.visible(area, offset)?;
        (clipped_top == 0 && rect.height == self.height).then_some(rect)
    }

    /// Visible part inside `area` when scrolled to `offset`, with the number
    /// of rows cut off at the top.
    pub fn visible(&self, area: Rect, offset: usize) -> Option<(Rect, u16)> {
        let view_end = offset + area.height as usize;
        if self.bottom() <= offset || self.y >= view_end {
            return None;
        }
        let top = self.y.max(offset);
        let bottom = self.bottom().min(view_end);
        let clipped_top = u16::try_from(top - self.y).ok()?;
        let y = area.y + u16::try_from(top - offset).ok()?;
        let height = u16::try_from(bottom - top).ok()?;
        let x = area.x + self.x;
        let width = self.width.min(area.width.saturating_sub(self.x));
        (width > 0).then_some((Rect::new(x, y, width, height), clipped_top))
    }
}

/// Block layout for one screen: placements in page order plus row extents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    pub placements: Vec<Placement>,
    /// `(top, height)` of each row
    pub rows: Vec<(usize, usize)>,
    pub total_height: usize,
}

impl Layout {
    pub fn placement(&self, id: BlockId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.block == id)
    }

    /// Extent of the row holding `id`.
    pub fn row_of(&self, id: BlockId) -> Option<(usize, usize)> {
        let placement = self.placement(id)?;
        self.rows
            .iter()
            .copied()
            .find(|(top, height)| placement.y >= *top && placement.y < top + height)
    }
}

/// Split `width` columns into cells for items spanning `spans` grid units.
///
/// Cells start on grid boundaries; `gap` columns are taken from the right
/// of every cell except the last.
pub fn column_cells(spans: &[u32], width: u16, gap: u16) -> Vec<(u16, u16)> {
    let grid = GRID_COLUMNS;
    let total = u32::from(width);
    let mut cells = Vec::with_capacity(spans.len());
    let mut acc = 0u32;
    for (i, span) in spans.iter().enumerate() {
        let start = total * acc.min(grid) / grid;
        acc += span;
        let end = total * acc.min(grid) / grid;
        let start = u16::try_from(start).unwrap_or(width);
        let end = u16::try_from(end).unwrap_or(width);
        let mut cell_width = end.saturating_sub(start);
        if i + 1 < spans.len() {
            cell_width = cell_width.saturating_sub(gap);
        }
        cells.push((start, cell_width.max(1)));
    }
    cells
}

/// Lay out `page` on the grid, `width` columns wide.
///
/// `height_of` gives each block's height at its cell width. Rows are
/// separated by `row_gap` blank rows.
pub fn grid_layout(
    page: &Page,
    width: u16,
    gap: u16,
    row_gap: u16,
    mut height_of: impl FnMut(&Block, u16) -> u16,
) -> Layout {
    let mut layout = Layout::default();
    let mut y = 0usize;
    for (row_idx, row) in page.rows().iter().enumerate() {
        if row_idx > 0 {
            y += row_gap as usize;
        }
        let spans: Vec<u32> = row.iter().map(|block| block.effective_span()).collect();
        let cells = column_cells(&spans, width, gap);
        let mut row_height = 0u16;
        for (block, (x, cell_width)) in row.iter().zip(cells) {
            let height = height_of(block, cell_width);
            row_height = row_height.max(height);
            layout.placements.push(Placement {
                block: block.id(),
                x,
                y,
                width: cell_width,
                height,
            });
        }
        layout.rows.push((y, row_height as usize));
        y += row_height as usize;
    }
    layout.total_height = y;
    layout
}

/// Stack every block full width, in page order.
pub fn stacked_layout(
    page: &Page,
    width: u16,
    row_gap: u16,
    mut height_of: impl FnMut(&Block, u16) -> u16,
) -> Layout {
    let mut layout = Layout::default();
    let mut y = 0usize;
    for (idx, block) in page.blocks().iter().enumerate() {
        if idx > 0 {
            y += row_gap as usize;
        }
        let height = height_of(block, width);
        layout.placements.push(Placement {
            block: block.id(),
            x: 0,
            y,
            width,
            height,
        });
        layout.rows.push((y, height as usize));
        y += height as usize;
    }
    layout.total_height = y;
    layout
}
