//! Block types: the units a page is assembled from.

use std::fmt;

/// Kind of content a block holds. Fixed when the block is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Text,
    Image,
}

impl BlockKind {
    /// Lowercase tag used in block ids.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }

    /// Title shown in the components sidebar.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Image => "Image",
        }
    }

    /// One-line description shown under the title.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Text => "Add text content",
            Self::Image => "Add an image",
        }
    }

    /// Every kind, in sidebar order.
    pub const ALL: [Self; 2] = [Self::Text, Self::Image];
}

/// Opaque, page-unique block identifier.
///
/// Displays as `<kind>_<serial>`, e.g. `text_3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    kind: BlockKind,
    serial: u64,
}

impl BlockId {
    pub(crate) const fn new(kind: BlockKind, serial: u64) -> Self {
        Self { kind, serial }
    }

    pub const fn kind(self) -> BlockKind {
        self.kind
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind.tag(), self.serial)
    }
}

/// Horizontal span of a block on the 12-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockWidth {
    /// Six columns.
    Half,
    /// Twelve columns.
    Full,
}

impl BlockWidth {
    pub const fn columns(self) -> u32 {
        match self {
            Self::Half => 6,
            Self::Full => 12,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Half => "Half Width",
            Self::Full => "Full Width",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Half => "6 columns",
            Self::Full => "12 columns",
        }
    }

    /// Both widths, in prompt order.
    pub const ALL: [Self; 2] = [Self::Half, Self::Full];
}

/// Display height preset for an image block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ImageHeight {
    Small,
    #[default]
    Medium,
    Large,
}

/// Height used for an image block that has no height set.
pub const FALLBACK_IMAGE_PX: u32 = 300;

/// Pixels represented by one terminal row when sizing image blocks.
pub const PX_PER_ROW: u32 = 20;

impl ImageHeight {
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Small => 200,
            Self::Medium => 350,
            Self::Large => 500,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    pub fn description(self) -> String {
        format!("{}px height", self.pixels())
    }

    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];
}

/// Terminal rows an image block occupies, rounding up.
pub const fn image_rows(height: Option<ImageHeight>) -> u16 {
    let px = match height {
        Some(h) => h.pixels(),
        None => FALLBACK_IMAGE_PX,
    };
    #[allow(clippy::cast_possible_truncation)]
    {
        px.div_ceil(PX_PER_ROW) as u16
    }
}

/// Content of a block. The variant always matches the block's kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Text {
        markdown: String,
    },
    Image {
        /// URL or `data:` URI
        url: Option<String>,
        height: Option<ImageHeight>,
    },
}

impl BlockContent {
    /// Empty content for a freshly created block of `kind`.
    pub const fn empty(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => Self::Text {
                markdown: String::new(),
            },
            BlockKind::Image => Self::Image {
                url: None,
                height: None,
            },
        }
    }

    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Text { .. } => BlockKind::Text,
            Self::Image { .. } => BlockKind::Image,
        }
    }
}

/// Whole-field replacement applied by the edit panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockPatch {
    /// Replace the markdown of a text block.
    Text(String),
    /// Replace the image reference and height of an image block together.
    /// A `None` url clears the image.
    Image {
        url: Option<String>,
        height: Option<ImageHeight>,
    },
}

impl BlockPatch {
    pub const fn kind(&self) -> BlockKind {
        match self {
            Self::Text(_) => BlockKind::Text,
            Self::Image { .. } => BlockKind::Image,
        }
    }
}

/// A single content block on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    width: BlockWidth,
    content: BlockContent,
}

impl Block {
    pub(crate) const fn new(id: BlockId, width: BlockWidth) -> Self {
        Self {
            id,
            width,
            content: BlockContent::empty(id.kind()),
        }
    }

    pub const fn id(&self) -> BlockId {
        self.id
    }

    pub const fn kind(&self) -> BlockKind {
        self.id.kind()
    }

    pub const fn width(&self) -> BlockWidth {
        self.width
    }

    pub const fn content(&self) -> &BlockContent {
        &self.content
    }

    /// Markdown of a text block, `None` for image blocks.
    pub fn markdown(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Text { markdown } => Some(markdown),
            BlockContent::Image { .. } => None,
        }
    }

    /// Image reference of an image block, if one is set.
    pub fn image_url(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Image { url, .. } => url.as_deref(),
            BlockContent::Text { .. } => None,
        }
    }

    pub const fn image_height(&self) -> Option<ImageHeight> {
        match &self.content {
            BlockContent::Image { height, .. } => *height,
            BlockContent::Text { .. } => None,
        }
    }

    /// True when the block has nothing to show yet.
    pub fn is_empty(&self) -> bool {
        match &self.content {
            BlockContent::Text { markdown } => markdown.trim().is_empty(),
            BlockContent::Image { url, .. } => url.is_none(),
        }
    }

    pub(crate) fn set_content(&mut self, content: BlockContent) {
        self.content = content;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id_display_uses_kind_tag() {
        assert_eq!(BlockId::new(BlockKind::Text, 3).to_string(), "text_3");
        assert_eq!(BlockId::new(BlockKind::Image, 12).to_string(), "image_12");
    }

    #[test]
    fn test_width_columns() {
        assert_eq!(BlockWidth::Half.columns(), 6);
        assert_eq!(BlockWidth::Full.columns(), 12);
    }

    #[test]
    fn test_image_height_pixels_and_rows() {
        assert_eq!(ImageHeight::Small.pixels(), 200);
        assert_eq!(ImageHeight::Medium.pixels(), 350);
        assert_eq!(ImageHeight::Large.pixels(), 500);
        assert_eq!(image_rows(Some(ImageHeight::Small)), 10);
        assert_eq!(image_rows(Some(ImageHeight::Medium)), 18);
        assert_eq!(image_rows(Some(ImageHeight::Large)), 25);
        assert_eq!(image_rows(None), 15);
    }

    #[test]
    fn test_new_block_content_matches_kind() {
        let text = Block::new(BlockId::new(BlockKind::Text, 1), BlockWidth::Half);
        assert_eq!(text.markdown(), Some(""));
        assert_eq!(text.image_url(), None);
        assert!(text.is_empty());

        let image = Block::new(BlockId::new(BlockKind::Image, 2), BlockWidth::Full);
        assert_eq!(image.markdown(), None);
        assert_eq!(image.image_height(), None);
        assert!(image.is_empty());
    }

    #[test]
    fn test_height_description() {
        assert_eq!(ImageHeight::Large.description(), "500px height");
    }
}
