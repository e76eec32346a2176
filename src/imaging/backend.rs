//! The seam between thumbnail planning and pixel work.
//!
//! [`ImageBackend`] has two calls: read a picture's size, and write a resized
//! copy. [`RustBackend`](super::rust_backend::RustBackend) does both with the
//! `image` crate; tests use the recording mock below.

use super::params::ThumbnailParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Can't read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Can't resize image {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Can't save thumbnail {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },
}

/// Pixel size of a decoded or planned image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads image sizes and writes resized copies.
pub trait ImageBackend {
    /// Size of the image at `path`, read from its header.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Write `params.source` resized to exactly `params.width` x `params.height`.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError>;
}
