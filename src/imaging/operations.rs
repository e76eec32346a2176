//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::calculate_fit_dimensions;
use super::params::{ThumbnailParams, ThumbnailSize};
use crate::layout::{CollisionError, ensure_vacant};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error(transparent)]
    Collision(#[from] CollisionError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Plan a thumbnail operation without executing it.
///
/// Useful for testing parameter generation.
pub fn plan_thumbnail(
    source: &Path,
    output: &Path,
    source_dims: (u32, u32),
    bound: ThumbnailSize,
) -> ThumbnailParams {
    let (width, height) = calculate_fit_dimensions(source_dims, (bound.width, bound.height));

    ThumbnailParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
    }
}

/// Create a thumbnail of `source` at `output`, fitted inside `bound`.
///
/// Refuses to replace an existing file at `output`.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    bound: ThumbnailSize,
) -> Result<ThumbnailParams, ThumbnailError> {
    ensure_vacant(output, &source.display().to_string())?;

    let dims = backend.identify(source)?;
    let params = plan_thumbnail(source, output, (dims.width, dims.height), bound);
    backend.thumbnail(&params)?;

    Ok(params)
}
