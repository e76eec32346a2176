//! Image rewriting for one post body.
//!
//! Every `<img>` with a `src` is downloaded into `images/` and the markup is
//! rewritten to point at the local copy. Images wrapped in a link to a larger
//! version of themselves also get a thumbnail:
//!
//! ```text
//! <a href="http://x/s1600/pic.jpg"><img src="http://x/s200/pic.jpg"></a>
//!   → images/{slug}-pic.jpg                      (downloaded)
//!   → images/thumbnails/{slug}-pic.jpg           (resized copy)
//!   → <a href="../images/{slug}-pic.jpg"><img src="../images/thumbnails/{slug}-pic.jpg"></a>
//!
//! <img src="http://x/s200/other.jpg">
//!   → images/{slug}-other.jpg
//!   → <img src="../images/{slug}-other.jpg">
//! ```
//!
//! Images are handled in document order, one at a time. The first download,
//! collision or resize failure aborts the post; files written before it stay
//! on disk.
//!
//! Replacing a link drops everything else inside it from the document. Images
//! that were in there are still downloaded, but their markup is gone: a plain
//! one is reported as skipped, and one that would need its own thumbnail link
//! is an error.

use crate::fetch::{DownloadError, Fetcher, download_asset};
use crate::imaging::{ImageBackend, ThumbnailError, ThumbnailSize, create_thumbnail};
use crate::layout::OutputLayout;
use crate::markup::{Fragment, MarkupError, NodeId, Parent};
use crate::migrate::{MigrateEvent, SkipReason};
use crate::naming::asset_filename;
use crate::similarity::links_to_larger_image;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Thumbnail(#[from] ThumbnailError),
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error("Can't link image {src} ; its link was already replaced by an earlier image")]
    LinkReplaced { src: String },
}

/// The attributes of an `<img>` that decide its download URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageAttrs<'a> {
    pub src: &'a str,
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    pub original_width: Option<&'a str>,
    pub original_height: Option<&'a str>,
}

impl<'a> ImageAttrs<'a> {
    /// Read the attributes of `img`. `None` when it has no `src`.
    pub fn of(fragment: &'a Fragment, img: NodeId) -> Option<Self> {
        Some(Self {
            src: fragment.attr(img, "src")?,
            width: fragment.attr(img, "width"),
            height: fragment.attr(img, "height"),
            original_width: fragment.attr(img, "data-original-width"),
            original_height: fragment.attr(img, "data-original-height"),
        })
    }
}

/// URL of the largest available rendition of an image.
///
/// Blogger encodes the served size as a `/s{N}/` path segment. When the
/// original dimensions are known, the displayed size in that segment is
/// swapped for the original one: height first, then width on the result.
/// Plain substring replacement; URLs without the segment pass through.
pub fn resolve_source_url(attrs: &ImageAttrs<'_>) -> String {
    let mut src = attrs.src.to_string();
    if let (Some(size), Some(original)) = (attrs.height, attrs.original_height) {
        src = src.replace(&format!("/s{size}/"), &format!("/s{original}/"));
    }
    if let (Some(size), Some(original)) = (attrs.width, attrs.original_width) {
        src = src.replace(&format!("/s{size}/"), &format!("/s{original}/"));
    }
    src
}

/// Counts for one rewritten fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub images: usize,
    pub thumbnails: usize,
}

/// Downloads a post's images and points its markup at the local copies.
pub struct ImageRewriter<'a, F: Fetcher, B: ImageBackend> {
    pub fetcher: &'a F,
    pub backend: &'a B,
    pub layout: &'a OutputLayout,
    pub thumbnail_size: ThumbnailSize,
    pub events: Option<&'a Sender<MigrateEvent>>,
}

impl<F: Fetcher, B: ImageBackend> ImageRewriter<'_, F, B> {
    fn emit(&self, event: MigrateEvent) {
        if let Some(tx) = self.events {
            tx.send(event).ok();
        }
    }

    /// Rewrite every image in `fragment`, naming assets after `slug`.
    pub fn rewrite(
        &self,
        fragment: &mut Fragment,
        slug: &str,
    ) -> Result<RewriteStats, RewriteError> {
        let mut stats = RewriteStats::default();

        for img in fragment.images() {
            let Some(attrs) = ImageAttrs::of(fragment, img) else {
                self.emit(MigrateEvent::ImageSkipped {
                    src: String::new(),
                    reason: SkipReason::MissingSource,
                });
                continue;
            };

            let url = resolve_source_url(&attrs);
            let declared_src = attrs.src.to_string();
            let filename = asset_filename(slug, &url);
            let image_path = self.layout.images_dir().join(&filename);

            let bytes = download_asset(self.fetcher, &url, &declared_src, &image_path)?;
            stats.images += 1;
            self.emit(MigrateEvent::ImageDownloaded {
                url: url.clone(),
                path: self.layout.display_relative(&image_path),
                bytes,
            });

            let enclosing_link = fragment
                .enclosing_element(img)
                .filter(|id| fragment.tag(*id) == Some("a"))
                .filter(|id| {
                    fragment
                        .attr(*id, "href")
                        .is_some_and(|href| links_to_larger_image(href, &url))
                });
            let attached = fragment.parent(img) != Parent::Detached;

            let image_link = self.layout.content_link(&image_path);
            match (enclosing_link, attached) {
                (Some(_), false) => {
                    return Err(RewriteError::LinkReplaced { src: declared_src });
                }
                (None, false) => {
                    self.emit(MigrateEvent::ImageSkipped {
                        src: declared_src,
                        reason: SkipReason::Detached,
                    });
                }
                (Some(link), true) => {
                    let thumb_path = self.layout.thumbnails_dir().join(&filename);
                    let params = create_thumbnail(
                        self.backend,
                        &image_path,
                        &thumb_path,
                        self.thumbnail_size,
                    )?;
                    stats.thumbnails += 1;
                    self.emit(MigrateEvent::ThumbnailCreated {
                        path: self.layout.display_relative(&thumb_path),
                        width: params.width,
                        height: params.height,
                    });

                    let thumb_link = self.layout.content_link(&thumb_path);
                    let new_link = fragment.new_element("a", &[("href", &image_link)]);
                    let new_img = fragment.new_element("img", &[("src", &thumb_link)]);
                    fragment.append_child(new_link, new_img);
                    fragment.replace(link, new_link)?;
                }
                (None, true) => {
                    let new_img = fragment.new_element("img", &[("src", &image_link)]);
                    fragment.replace(img, new_img)?;
                }
            }
        }

        Ok(stats)
    }
}
