//! Thumbnails for images that link to a larger copy of themselves.
//!
//! A thumbnail is the downloaded image scaled to fit a bounding box
//! ([`ThumbnailSize`], 512x384 unless configured), aspect ratio kept:
//!
//! | Step | Where | How |
//! |---|---|---|
//! | Read size | [`ImageBackend::identify`] | `ImageReader::into_dimensions` |
//! | Fit box | [`calculate_fit_dimensions`] | scale and round, at least 1px |
//! | Resize | [`ImageBackend::thumbnail`] | `resize_exact`, `CatmullRom` |
//!
//! [`plan_thumbnail`] and [`create_thumbnail`] tie the steps together and are
//! the only entry points the rest of the crate uses.

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::calculate_fit_dimensions;
pub use operations::{ThumbnailError, create_thumbnail, plan_thumbnail};
pub use params::{ThumbnailParams, ThumbnailSize};
pub use rust_backend::RustBackend;
