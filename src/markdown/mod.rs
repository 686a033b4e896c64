//! Markdown rendering for text blocks.
//!
//! This module handles:
//! - Parsing markdown with comrak
//! - Rendering to styled, wrapped lines for display
//!
//! The supported subset is headings, paragraphs, bullet and ordered lists,
//! block quotes, inline and fenced code, bold, italic, underline via a raw
//! `<u>` tag, and links.

mod parser;
mod types;

pub use parser::{parse, parse_with_layout};
pub use types::{InlineSpan, InlineStyle, LineType, RenderedLine, RenderedText};
