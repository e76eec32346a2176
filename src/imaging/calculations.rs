//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate the largest size that fits inside `bound` while keeping the
/// source aspect ratio.
///
/// Images already inside the bound keep their size, so thumbnails are never
/// upscaled. Each axis is rounded to the nearest pixel and clamped to
/// `1..=bound`.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bound` - Maximum dimensions (width, height)
///
/// # Examples
/// ```
/// # use blogger_to_hugo::imaging::calculate_fit_dimensions;
/// // 1600x1200 into 512x384 → exact 4:3 fit
/// assert_eq!(calculate_fit_dimensions((1600, 1200), (512, 384)), (512, 384));
///
/// // Small images are left alone
/// assert_eq!(calculate_fit_dimensions((200, 100), (512, 384)), (200, 100));
/// ```
pub fn calculate_fit_dimensions(source: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bound;

    if src_w <= max_w && src_h <= max_h {
        return source;
    }

    let scale = f64::min(
        max_w as f64 / src_w as f64,
        max_h as f64 / src_h as f64,
    );
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}
