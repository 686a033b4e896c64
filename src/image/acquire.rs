//! Turning user input into an image reference.
//!
//! A pasted URL or data URI is used as is. A local file is read on a
//! one-shot background thread, sniffed, and encoded as a data URI.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

use super::ImageError;
use crate::page::BlockId;

/// True for references that are stored verbatim: remote URLs and data URIs.
pub fn is_inline_reference(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    ["http://", "https://", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Encode image bytes as a `data:` URI.
///
/// The format is sniffed from the bytes, falling back to the extension of
/// `path`.
///
/// # Errors
///
/// Returns [`ImageError::NotAnImage`] when neither the bytes nor the
/// extension identify an image format.
pub fn encode_bytes(bytes: &[u8], path: &Path) -> Result<String, ImageError> {
    let format = image::guess_format(bytes)
        .or_else(|_| ImageFormat::from_path(path))
        .map_err(|_| ImageError::NotAnImage(path.to_path_buf()))?;
    Ok(format!(
        "data:{};base64,{}",
        format.to_mime_type(),
        STANDARD.encode(bytes)
    ))
}

/// Read a local file and encode it as a `data:` URI.
///
/// # Errors
///
/// Returns [`ImageError::Read`] if the file cannot be read and
/// [`ImageError::NotAnImage`] if it is not an image.
pub fn encode_file(path: &Path) -> Result<String, ImageError> {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    encode_bytes(&bytes, path)
}

/// Expand a leading `~/` to the home directory.
pub fn expand_path(input: &str) -> PathBuf {
    let input = input.trim();
    if let Some(rest) = input.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(input)
}

/// An in-flight local file read for one image block.
#[derive(Debug)]
pub struct PendingRead {
    block: BlockId,
    path: PathBuf,
    rx: Receiver<Result<String, ImageError>>,
}

impl PendingRead {
    pub const fn block(&self) -> BlockId {
        self.block
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The result, once the reader thread has delivered it.
    ///
    /// A reader that went away without sending counts as a read failure.
    pub fn try_take(&self) -> Option<Result<String, ImageError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(ImageError::Read {
                path: self.path.clone(),
                source: std::io::Error::other("reader thread exited"),
            })),
        }
    }
}

/// Start reading `path` for `block` on a background thread.
pub fn spawn_read(block: BlockId, path: PathBuf) -> PendingRead {
    let (tx, rx) = mpsc::channel();
    let worker_path = path.clone();
    std::thread::spawn(move || {
        let _ = tx.send(encode_file(&worker_path));
    });
    tracing::debug!(%block, path = %path.display(), "image read started");
    PendingRead { block, path, rx }
}
