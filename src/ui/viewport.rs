//! Scroll state for the build canvas and the preview.
//!
//! Content is measured in terminal rows. The owner sets the content height
//! each frame with [`Viewport::set_total_rows`]; every scroll operation
//! keeps the offset within `0..=total_rows - height`.

/// Visible window over a column of content rows.
///
/// ```
/// use pagecraft::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 20, 100);
/// vp.scroll_down(30);
/// assert_eq!(vp.offset(), 30);
///
/// vp.reveal(5, 3);
/// assert_eq!(vp.offset(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_rows: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_rows: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_rows,
        }
    }

    /// First visible content row.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Scroll position as a percentage, 100 when everything fits.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn can_scroll_up(&self) -> bool {
        self.offset > 0
    }

    pub const fn can_scroll_down(&self) -> bool {
        self.offset < self.max_offset()
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Scroll the least amount needed to show rows `top..top + len`.
    ///
    /// A span taller than the viewport is aligned to its top.
    pub fn reveal(&mut self, top: usize, len: usize) {
        let height = self.height as usize;
        if top < self.offset || len > height {
            self.offset = top;
        } else if top + len > self.offset + height {
            self.offset = top + len - height;
        }
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    pub fn set_total_rows(&mut self, total: usize) {
        self.total_rows = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_down_clamps_to_last_page() {
        let mut vp = Viewport::new(80, 10, 25);
        vp.scroll_down(100);
        assert_eq!(vp.offset(), 15);
        assert!(!vp.can_scroll_down());
    }

    #[test]
    fn test_scroll_up_stops_at_zero() {
        let mut vp = Viewport::new(80, 10, 25);
        vp.scroll_down(4);
        vp.scroll_up(9);
        assert_eq!(vp.offset(), 0);
        assert!(!vp.can_scroll_up());
    }

    #[test]
    fn test_page_moves_by_height() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.page_down();
        vp.page_down();
        assert_eq!(vp.offset(), 20);
        vp.page_up();
        assert_eq!(vp.offset(), 10);
    }

    #[test]
    fn test_go_to_bottom_and_top() {
        let mut vp = Viewport::new(80, 10, 42);
        vp.go_to_bottom();
        assert_eq!(vp.offset(), 32);
        assert_eq!(vp.scroll_percent(), 100);
        vp.go_to_top();
        assert_eq!(vp.scroll_percent(), 0);
    }

    #[test]
    fn test_short_content_never_scrolls() {
        let mut vp = Viewport::new(80, 10, 4);
        vp.scroll_down(3);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_reveal_scrolls_down_just_enough() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.reveal(12, 4);
        assert_eq!(vp.offset(), 6);
    }

    #[test]
    fn test_reveal_scrolls_up_to_top_of_span() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(50);
        vp.reveal(20, 3);
        assert_eq!(vp.offset(), 20);
    }

    #[test]
    fn test_reveal_visible_span_keeps_offset() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(5);
        vp.reveal(7, 2);
        assert_eq!(vp.offset(), 5);
    }

    #[test]
    fn test_reveal_tall_span_aligns_top() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.reveal(30, 25);
        assert_eq!(vp.offset(), 30);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.go_to_bottom();
        vp.set_total_rows(15);
        assert_eq!(vp.offset(), 5);
        vp.resize(80, 20);
        assert_eq!(vp.offset(), 0);
    }
}
