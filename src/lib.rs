// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. page::PageError)
    clippy::module_name_repetitions
)]

//! # pagecraft
//!
//! A terminal page builder. Pages are a sequence of text and image blocks
//! laid out on a 12-column grid:
//! - Half and full width blocks packed greedily into rows
//! - A markdown text editor with formatting shortcuts and undo/redo
//! - Image blocks from URLs or local files, drawn inline where the terminal
//!   supports it
//! - A desktop and mobile preview
//!
//! ## Architecture
//!
//! pagecraft uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`page`]: Blocks, the block store and row packing
//! - [`editor`]: Text buffer and markdown formatting engine
//! - [`markdown`]: Markdown rendering to styled terminal lines
//! - [`image`]: Image acquisition and decoding
//! - [`app`]: Main application loop and state
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved default flags

pub mod app;
pub mod config;
pub mod editor;
pub mod image;
pub mod markdown;
pub mod page;
pub mod perf;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{FormatAction, FormatEngine};
    pub use crate::page::{Block, BlockKind, BlockWidth, ImageHeight, Page, pack_rows};
    pub use crate::ui::viewport::Viewport;
}
