//! Text editing for markdown blocks.
//!
//! - [`buffer`]: rope-backed text with a selection
//! - [`marker`]: block-level line markers
//! - [`format`]: pure formatting transforms (inline wrap, line markers, links)
//! - [`FormatEngine`]: one edit session with undo/redo history

mod buffer;
mod engine;
pub mod format;
mod history;
pub mod marker;

pub use buffer::{Direction, Selection, TextBuffer};
pub use engine::FormatEngine;
pub use format::{Edit, FormatAction, LINK_PLACEHOLDER};
pub use history::History;
pub use marker::{LineMarker, ParsedLine};
