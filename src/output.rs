//! CLI output formatting.
//!
//! Each post is a header line followed by indented lines for what happened
//! to its images, in the order it happened:
//!
//! ```text
//! Post: Hello World!
//!     Downloaded: http://x/s200/pic.jpg
//!         → images/2020-03-04-hello-world-pic.jpg
//!     Thumbnail: images/thumbnails/2020-03-04-hello-world-pic.jpg (512x384)
//!     Skipped: http://x/s200/two.jpg (inside a replaced link)
//!     Saved: 2020-03-04-hello-world.md
//!
//! Migrated 1 post, 1 image, 1 thumbnail
//! ```
//!
//! # Architecture
//!
//! `format_*` functions return lines and do no I/O, so they are unit
//! testable. `print_*` wrappers write them to stdout.

use crate::migrate::{MigrateEvent, MigrateSummary, SkipReason};

fn plural(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

/// Format a single migration progress event as display lines.
pub fn format_event(event: &MigrateEvent) -> Vec<String> {
    match event {
        MigrateEvent::PostStarted { title, slug } => {
            let name = if title.trim().is_empty() { slug } else { title };
            vec![format!("Post: {}", name)]
        }
        MigrateEvent::ImageDownloaded { url, path, .. } => vec![
            format!("    Downloaded: {}", url),
            format!("        → {}", path),
        ],
        MigrateEvent::ThumbnailCreated {
            path,
            width,
            height,
        } => vec![format!("    Thumbnail: {} ({}x{})", path, width, height)],
        MigrateEvent::ImageSkipped { src, reason } => {
            let why = match reason {
                SkipReason::MissingSource => "no src attribute",
                SkipReason::Detached => "inside a replaced link",
            };
            if src.is_empty() {
                vec![format!("    Skipped: image ({})", why)]
            } else {
                vec![format!("    Skipped: {} ({})", src, why)]
            }
        }
        MigrateEvent::PostSaved { path, .. } => vec![format!("    Saved: {}", path)],
    }
}

/// Print a migration progress event to stdout.
pub fn print_event(event: &MigrateEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

/// Format the end-of-run totals.
pub fn format_summary(summary: &MigrateSummary) -> String {
    format!(
        "Migrated {}, {}, {}",
        plural(summary.posts, "post"),
        plural(summary.images, "image"),
        plural(summary.thumbnails, "thumbnail")
    )
}

/// Print the end-of-run totals to stdout, after a blank separator line.
pub fn print_summary(summary: &MigrateSummary) {
    println!();
    println!("{}", format_summary(summary));
}
