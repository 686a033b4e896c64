//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`grid`]: Packed rows placed on screen
//! - [`style`]: Theming and colors
//!
//! The build screen draws a component sidebar, the canvas of block cards and
//! the edit panel. The preview screen draws the page without editing chrome.

pub mod grid;
pub mod style;
pub mod viewport;

mod blocks;
mod images;
mod overlays;
mod panel;
mod preview;
mod render;
mod status;

pub use blocks::{content_height, markdown_lines};
pub use overlays::centered_popup_rect;
pub use preview::{device_area, preview_layout};
pub use render::{render, split_build_columns, split_screen};

pub const SIDEBAR_WIDTH: u16 = 26;
pub const PANEL_WIDTH_PERCENT: u16 = 40;
pub const PANEL_MIN_WIDTH: u16 = 40;
pub const CANVAS_COLUMN_GAP: u16 = 1;
pub const CANVAS_ROW_GAP: u16 = 1;
pub const PREVIEW_COLUMN_GAP: u16 = 2;
pub const PREVIEW_ROW_GAP: u16 = 1;
/// Content columns of the mobile preview frame.
pub const MOBILE_PREVIEW_WIDTH: u16 = 48;

#[cfg(test)]
mod tests;
