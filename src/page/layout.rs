//! Row packing on the 12-column grid.
//!
//! Both the build canvas and the preview group blocks into rows through
//! [`pack_rows`], so the two views always agree on which blocks share a row.

use super::block::Block;

/// Columns in one grid row.
pub const GRID_COLUMNS: u32 = 12;

/// Span assumed for an item that does not declare one.
pub const DEFAULT_SPAN: u32 = 6;

/// Anything that claims a number of grid columns.
pub trait GridSpan {
    /// Declared span. `None` or `Some(0)` mean "unspecified".
    fn grid_span(&self) -> Option<u32>;

    /// Effective span after applying the default.
    fn effective_span(&self) -> u32 {
        match self.grid_span() {
            Some(0) | None => DEFAULT_SPAN,
            Some(span) => span,
        }
    }
}

impl GridSpan for Block {
    fn grid_span(&self) -> Option<u32> {
        Some(self.width().columns())
    }
}

impl GridSpan for u32 {
    fn grid_span(&self) -> Option<u32> {
        Some(*self)
    }
}

impl GridSpan for Option<u32> {
    fn grid_span(&self) -> Option<u32> {
        *self
    }
}

impl<T: GridSpan + ?Sized> GridSpan for &T {
    fn grid_span(&self) -> Option<u32> {
        (**self).grid_span()
    }
}

/// A run of consecutive items laid out side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a, T> {
    items: Vec<&'a T>,
    span: u32,
}

impl<'a, T: GridSpan> Row<'a, T> {
    const fn new() -> Self {
        Self {
            items: Vec::new(),
            span: 0,
        }
    }

    fn push(&mut self, item: &'a T) {
        self.span += item.effective_span();
        self.items.push(item);
    }

    pub fn items(&self) -> &[&'a T] {
        &self.items
    }

    /// Sum of the effective spans in this row.
    pub const fn span(&self) -> u32 {
        self.span
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.items.iter().copied()
    }
}

/// Greedily pack `items` into rows of at most [`GRID_COLUMNS`].
///
/// A row is closed before an item that would overflow it, and closed
/// immediately once it is exactly full. An item wider than the grid gets a
/// row to itself. Order is preserved and nothing is dropped.
pub fn pack_rows<T: GridSpan>(items: &[T]) -> Vec<Row<'_, T>> {
    let mut rows = Vec::new();
    let mut current = Row::new();

    for item in items {
        let span = item.effective_span();
        if current.span + span > GRID_COLUMNS && !current.is_empty() {
            rows.push(std::mem::replace(&mut current, Row::new()));
        }
        current.push(item);
        if current.span == GRID_COLUMNS {
            rows.push(std::mem::replace(&mut current, Row::new()));
        }
    }

    if !current.is_empty() {
        rows.push(current);
    }
    rows
}
