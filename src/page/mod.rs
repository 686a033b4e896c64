//! The page: an ordered sequence of blocks and the grid they are laid out on.
//!
//! - [`block`]: block identity, width, and content types
//! - [`layout`]: the row packer shared by the build and preview views

pub mod block;
pub mod layout;

pub use block::{
    Block, BlockContent, BlockId, BlockKind, BlockPatch, BlockWidth, ImageHeight, image_rows,
};
pub use layout::{DEFAULT_SPAN, GRID_COLUMNS, GridSpan, Row, pack_rows};

use thiserror::Error;

/// Errors returned by the block store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("block {0} no longer exists")]
    UnknownBlock(BlockId),
    #[error("cannot apply {patch:?} content to block {id}")]
    KindMismatch { id: BlockId, patch: BlockKind },
}

/// In-memory block store.
///
/// Blocks keep their insertion order. Ids are never reused within a page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    blocks: Vec<Block>,
    next_serial: u64,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new empty block and return its id.
    pub fn append(&mut self, kind: BlockKind, width: BlockWidth) -> BlockId {
        self.next_serial += 1;
        let id = BlockId::new(kind, self.next_serial);
        self.blocks.push(Block::new(id, width));
        tracing::debug!(%id, columns = width.columns(), "block appended");
        id
    }

    /// Replace the content fields of block `id`.
    ///
    /// Setting an image without a height defaults it to medium.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::UnknownBlock`] if the block is gone and
    /// [`PageError::KindMismatch`] if the patch is for the other kind.
    pub fn replace_fields(&mut self, id: BlockId, patch: BlockPatch) -> Result<(), PageError> {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.id() == id)
            .ok_or(PageError::UnknownBlock(id))?;
        if block.kind() != patch.kind() {
            return Err(PageError::KindMismatch {
                id,
                patch: patch.kind(),
            });
        }
        let content = match patch {
            BlockPatch::Text(markdown) => BlockContent::Text { markdown },
            BlockPatch::Image { url, height } => {
                let height = if url.is_some() {
                    Some(height.unwrap_or_default())
                } else {
                    height
                };
                BlockContent::Image { url, height }
            }
        };
        block.set_content(content);
        tracing::debug!(%id, "block updated");
        Ok(())
    }

    /// Remove block `id`, returning it if it existed.
    pub fn remove(&mut self, id: BlockId) -> Option<Block> {
        let index = self.position(id)?;
        let removed = self.blocks.remove(index);
        tracing::debug!(%id, "block removed");
        Some(removed)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn position(&self, id: BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Rows for display, recomputed from the current block order.
    pub fn rows(&self) -> Vec<Row<'_, Block>> {
        pack_rows(&self.blocks)
    }

    /// A small starter page for trying the tool out.
    pub fn demo() -> Self {
        let mut page = Self::new();
        let intro = page.append(BlockKind::Text, BlockWidth::Full);
        let left = page.append(BlockKind::Text, BlockWidth::Half);
        page.append(BlockKind::Image, BlockWidth::Half);
        let demo_text = [
            (
                intro,
                "# Welcome\n\nThis page was built with **pagecraft**. Press `e` to edit a block.",
            ),
            (
                left,
                "## Features\n\n- Half and full width blocks\n- *Markdown* text\n- Image blocks",
            ),
        ];
        for (id, markdown) in demo_text {
            if let Err(err) = page.replace_fields(id, BlockPatch::Text(markdown.to_string())) {
                tracing::warn!(%id, error = %err, "demo text not applied");
            }
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_unique_ids() {
        let mut page = Page::new();
        let a = page.append(BlockKind::Text, BlockWidth::Half);
        let b = page.append(BlockKind::Image, BlockWidth::Full);
        let c = page.append(BlockKind::Text, BlockWidth::Half);
        let ids: Vec<_> = page.blocks().iter().map(Block::id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "text_1");
        assert_eq!(b.to_string(), "image_2");
    }

    #[test]
    fn test_ids_are_not_reused_after_remove() {
        let mut page = Page::new();
        let a = page.append(BlockKind::Text, BlockWidth::Half);
        page.remove(a);
        let b = page.append(BlockKind::Text, BlockWidth::Half);
        assert_ne!(a, b);
    }

    #[test]
    fn test_replace_text_fields() {
        let mut page = Page::new();
        let id = page.append(BlockKind::Text, BlockWidth::Half);
        page.replace_fields(id, BlockPatch::Text("# Hi".to_string()))
            .unwrap();
        assert_eq!(page.get(id).unwrap().markdown(), Some("# Hi"));
    }

    #[test]
    fn test_replace_image_defaults_height_to_medium() {
        let mut page = Page::new();
        let id = page.append(BlockKind::Image, BlockWidth::Full);
        page.replace_fields(
            id,
            BlockPatch::Image {
                url: Some("https://example.com/a.png".to_string()),
                height: None,
            },
        )
        .unwrap();
        let block = page.get(id).unwrap();
        assert_eq!(block.image_url(), Some("https://example.com/a.png"));
        assert_eq!(block.image_height(), Some(ImageHeight::Medium));
    }

    #[test]
    fn test_replace_with_wrong_kind_is_rejected() {
        let mut page = Page::new();
        let id = page.append(BlockKind::Image, BlockWidth::Full);
        let err = page
            .replace_fields(id, BlockPatch::Text("nope".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            PageError::KindMismatch {
                id,
                patch: BlockKind::Text
            }
        );
        assert_eq!(page.get(id).unwrap().markdown(), None);
    }

    #[test]
    fn test_replace_unknown_block_is_error() {
        let mut page = Page::new();
        let id = page.append(BlockKind::Text, BlockWidth::Half);
        page.remove(id);
        assert_eq!(
            page.replace_fields(id, BlockPatch::Text(String::new())),
            Err(PageError::UnknownBlock(id))
        );
    }

    #[test]
    fn test_remove_returns_block_and_keeps_order() {
        let mut page = Page::new();
        let a = page.append(BlockKind::Text, BlockWidth::Half);
        let b = page.append(BlockKind::Text, BlockWidth::Half);
        let c = page.append(BlockKind::Text, BlockWidth::Half);
        let removed = page.remove(b).unwrap();
        assert_eq!(removed.id(), b);
        let ids: Vec<_> = page.blocks().iter().map(Block::id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(page.remove(b).is_none());
    }

    #[test]
    fn test_rows_follow_block_widths() {
        let mut page = Page::new();
        page.append(BlockKind::Text, BlockWidth::Half);
        page.append(BlockKind::Image, BlockWidth::Half);
        page.append(BlockKind::Text, BlockWidth::Half);
        page.append(BlockKind::Text, BlockWidth::Full);
        let rows = page.rows();
        let sizes: Vec<_> = rows.iter().map(Row::len).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
    }

    #[test]
    fn test_demo_page_has_content() {
        let page = Page::demo();
        assert_eq!(page.len(), 3);
        assert!(page.blocks()[0].markdown().unwrap().starts_with("# Welcome"));
        assert_eq!(page.rows().len(), 2);
    }
}
