//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides where thumbnails go and how large they are) and the
//! [`backend`](super::backend) (which does the actual pixel work).
//!
//! ## Types
//!
//! - [`ThumbnailSize`]: bounding box for thumbnails, parsed from `WIDTHxHEIGHT`.
//! - [`ThumbnailParams`]: one thumbnail job (source, output, target dimensions).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Maximum thumbnail dimensions. Thumbnails fit inside this box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self {
            width: 512,
            height: 384,
        }
    }
}

impl fmt::Display for ThumbnailSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for ThumbnailSize {
    type Err = String;

    /// Parse `WIDTHxHEIGHT`, e.g. `512x384`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            format!(
                "Thumbnail size must be in following format INTEGERxINTEGER. Got \"{}\" instead",
                s
            )
        };
        let (w, h) = s.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.parse().map_err(|_| invalid())?;
        let height: u32 = h.parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(format!("Thumbnail size must be non-zero. Got \"{}\"", s));
        }
        Ok(Self { width, height })
    }
}

/// Parameters for a thumbnail operation (aspect-preserving downscale).
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Final dimensions, already fitted inside the bounding box.
    pub width: u32,
    pub height: u32,
}
