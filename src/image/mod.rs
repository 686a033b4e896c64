//! Image references: acquisition, decoding, and terminal rendering setup.
//!
//! Image blocks store an opaque reference string: either a URL or a
//! `data:` URI produced from a local file. Only data URIs can be decoded
//! for inline display; everything else renders as a placeholder.

pub mod acquire;
mod cache;

pub use acquire::{PendingRead, encode_bytes, encode_file, is_inline_reference, spawn_read};
pub use cache::ImageCache;

use std::path::PathBuf;
#[cfg(unix)]
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use ratatui_image::picker::Picker;
#[cfg(unix)]
use ratatui_image::picker::cap_parser::QueryStdioOptions;
use thiserror::Error;

#[cfg(unix)]
const PICKER_QUERY_TIMEOUT_MS: u64 = 250;

/// Errors from reading or decoding an image reference.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{} is not an image file", .0.display())]
    NotAnImage(PathBuf),
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode image: {0}")]
    Decode(String),
    #[error("only data: references can be displayed inline")]
    UnsupportedReference,
}

impl ImageError {
    /// Short notice suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAnImage(_) => "Please select an image file".to_string(),
            other => other.to_string(),
        }
    }
}

/// Create a picker for terminal image rendering.
///
/// The picker detects terminal capabilities and chooses the best protocol.
pub fn create_picker(force_half_cell: bool) -> Option<Picker> {
    if force_half_cell {
        crate::perf::log_event("image.create_picker", "force_half_cell=true");
        return Some(Picker::halfblocks());
    }

    // The stdio capability query can hang some Windows consoles.
    #[cfg(not(unix))]
    {
        crate::perf::log_event("image.create_picker", "windows fallback=halfblocks");
        return Some(Picker::halfblocks());
    }

    #[cfg(unix)]
    {
        let picker = Picker::from_query_stdio_with_options(query_options()).ok()?;
        crate::perf::log_event(
            "image.create_picker",
            format!(
                "term={} protocol={:?}",
                std::env::var("TERM").unwrap_or_else(|_| "<unset>".to_string()),
                picker.protocol_type()
            ),
        );
        Some(picker)
    }
}

#[cfg(unix)]
fn query_options() -> QueryStdioOptions {
    // `QueryStdioOptions` has private fields.
    let mut options = QueryStdioOptions::default();
    options.timeout = Duration::from_millis(PICKER_QUERY_TIMEOUT_MS);
    options
}

/// Decode a base64 `data:image/...` URI.
///
/// # Errors
///
/// Returns [`ImageError::UnsupportedReference`] for anything that is not a
/// data URI and [`ImageError::Decode`] when the payload is malformed.
pub fn decode_data_uri(reference: &str) -> Result<DynamicImage, ImageError> {
    let rest = reference
        .strip_prefix("data:")
        .ok_or(ImageError::UnsupportedReference)?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::Decode("data URI has no payload".to_string()))?;
    if !meta.ends_with(";base64") {
        return Err(ImageError::Decode("data URI is not base64".to_string()));
    }
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ImageError::Decode(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| ImageError::Decode(e.to_string()))
}
