//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP, BMP) | `image::ImageReader` with content sniffing |
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Resize | `DynamicImage::resize_exact` with `CatmullRom` (bicubic) |
//! | Encode | format from output extension, else the source format |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ThumbnailParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::Decode {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Open an image, sniffing the format from its bytes.
///
/// Blogger filenames do not always carry a usable extension, so the content
/// decides the decoder.
fn open_image(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Load and decode an image from disk, returning its detected format too.
fn load_image(path: &Path) -> Result<(DynamicImage, Option<ImageFormat>), BackendError> {
    let reader = open_image(path)?;
    let format = reader.format();
    let img = reader.decode().map_err(|e| decode_error(path, e))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(decode_error(path, "image has zero size"));
    }
    Ok((img, format))
}

/// Save a DynamicImage, preferring the format implied by the output extension.
fn save_image(
    img: DynamicImage,
    path: &Path,
    source_format: Option<ImageFormat>,
) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path)
        .ok()
        .filter(|f| f.writing_enabled())
        .or(source_format.filter(|f| f.writing_enabled()))
        .ok_or_else(|| BackendError::Encode {
            path: path.to_path_buf(),
            reason: "no encoder for this image format".to_string(),
        })?;

    // JPEG has no alpha channel
    let img = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };

    img.save_with_format(path, format)
        .map_err(|e| BackendError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_image(path)?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<(), BackendError> {
        let (img, format) = load_image(&params.source)?;
        let resized = if img.width() == params.width && img.height() == params.height {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::CatmullRom)
        };
        save_image(resized, &params.output, format)
    }
}
