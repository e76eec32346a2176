//! Shared test utilities.
//!
//! Synthetic images for backend tests and Blogger export fixtures for feed
//! and migration tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let xml = feed_xml(&[
//!     entry_xml(EntryKind::Post, "Hello World!", "2020-03-04T10:20:30Z", "<p>Hi</p>", &["misc"]),
//!     entry_xml(EntryKind::Comment, "Nice post", "2020-03-05T00:00:00Z", "", &[]),
//! ]);
//! ```

use image::{ImageEncoder, RgbImage};

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encode a gradient JPEG of the given size.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Encode a gradient PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

// =========================================================================
// Blogger export fixtures
// =========================================================================

/// The `kind#...` term of an export entry.
#[derive(Debug, Clone, Copy)]
pub enum EntryKind {
    Post,
    Comment,
    Page,
    Settings,
}

impl EntryKind {
    fn term(self) -> &'static str {
        match self {
            EntryKind::Post => "http://schemas.google.com/blogger/2008/kind#post",
            EntryKind::Comment => "http://schemas.google.com/blogger/2008/kind#comment",
            EntryKind::Page => "http://schemas.google.com/blogger/2008/kind#page",
            EntryKind::Settings => "http://schemas.google.com/blogger/2008/kind#settings",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One `<entry>` authored by "Jane Doe". `content` is HTML and gets escaped
/// the way Blogger stores it.
pub fn entry_xml(
    kind: EntryKind,
    title: &str,
    published: &str,
    content: &str,
    tags: &[&str],
) -> String {
    let tags: String = tags
        .iter()
        .map(|tag| {
            format!(
                r#"<category scheme="http://www.blogger.com/atom/ns#" term="{}"/>"#,
                escape_xml(tag)
            )
        })
        .collect();
    format!(
        r#"<entry>
  <published>{published}</published>
  <category scheme="http://schemas.google.com/g/2005#kind" term="{kind}"/>
  {tags}
  <title type="text">{title}</title>
  <content type="html">{content}</content>
  <author><name>Jane Doe</name></author>
</entry>"#,
        kind = kind.term(),
        title = escape_xml(title),
        content = escape_xml(content),
    )
}

/// Wrap entries in an Atom `<feed>` root.
pub fn feed_xml(entries: &[String]) -> String {
    format!(
        "<?xml version='1.0' encoding='UTF-8'?>\n\
         <feed xmlns=\"http://www.w3.org/2005/Atom\" \
         xmlns:thr=\"http://purl.org/syndication/thread/1.0\">\n\
         <title type=\"text\">Test blog</title>\n{}\n</feed>\n",
        entries.join("\n")
    )
}
