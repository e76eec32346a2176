//! Whole-export migration.
//!
//! Loads the feed, then processes posts strictly in feed order, one at a
//! time. Progress is reported as [`MigrateEvent`]s over an optional channel so
//! the CLI can print while the run is still going. The first error stops the
//! run; whatever was written before it stays in the output folder.

use crate::config::HttpConfig;
use crate::feed::{FeedError, load_posts};
use crate::fetch::{FetchError, Fetcher, HttpFetcher};
use crate::imaging::{ImageBackend, RustBackend, ThumbnailSize};
use crate::layout::OutputLayout;
use crate::post::{PostError, process_post, slug_for};
use crate::rewrite::ImageRewriter;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Post(#[from] PostError),
}

/// Why an `<img>`'s markup was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No `src` attribute.
    MissingSource,
    /// Downloaded, but inside a link that an earlier image already replaced.
    Detached,
}

/// Progress events emitted during a migration.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrateEvent {
    PostStarted {
        title: String,
        slug: String,
    },
    ImageDownloaded {
        url: String,
        /// Output-relative path, `/`-separated.
        path: String,
        bytes: u64,
    },
    ThumbnailCreated {
        path: String,
        width: u32,
        height: u32,
    },
    ImageSkipped {
        src: String,
        reason: SkipReason,
    },
    PostSaved {
        path: String,
        images: usize,
        thumbnails: usize,
    },
}

/// Totals for a finished migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateSummary {
    pub posts: usize,
    pub images: usize,
    pub thumbnails: usize,
}

/// Resolved run settings: config file values with CLI overrides applied.
#[derive(Debug, Clone, Default)]
pub struct MigrateSettings {
    pub thumbnail_size: ThumbnailSize,
    pub http: HttpConfig,
}

/// Migrate the export at `feed_path` into `layout` over HTTP.
pub fn migrate(
    feed_path: &Path,
    layout: &OutputLayout,
    settings: &MigrateSettings,
    events: Option<Sender<MigrateEvent>>,
) -> Result<MigrateSummary, MigrateError> {
    let fetcher = HttpFetcher::new(&settings.http)?;
    migrate_with(
        &fetcher,
        &RustBackend::new(),
        feed_path,
        layout,
        settings.thumbnail_size,
        events,
    )
}

/// [`migrate`] with injectable network and image backends.
pub fn migrate_with<F: Fetcher, B: ImageBackend>(
    fetcher: &F,
    backend: &B,
    feed_path: &Path,
    layout: &OutputLayout,
    thumbnail_size: ThumbnailSize,
    events: Option<Sender<MigrateEvent>>,
) -> Result<MigrateSummary, MigrateError> {
    let posts = load_posts(feed_path)?;
    let emit = |event: MigrateEvent| {
        if let Some(tx) = &events {
            tx.send(event).ok();
        }
    };

    let rewriter = ImageRewriter {
        fetcher,
        backend,
        layout,
        thumbnail_size,
        events: events.as_ref(),
    };

    let mut summary = MigrateSummary::default();
    for post in &posts {
        emit(MigrateEvent::PostStarted {
            title: post.title.clone(),
            slug: slug_for(post),
        });

        let outcome = process_post(post, &rewriter)?;

        summary.posts += 1;
        summary.images += outcome.stats.images;
        summary.thumbnails += outcome.stats.thumbnails;
        emit(MigrateEvent::PostSaved {
            path: layout.display_relative(&outcome.path),
            images: outcome.stats.images,
            thumbnails: outcome.stats.thumbnails,
        });
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::MockFetcher;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::{EntryKind, entry_xml, feed_xml};
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn write_feed(tmp: &TempDir, entries: &[String]) -> std::path::PathBuf {
        let path = tmp.path().join("blog.xml");
        std::fs::write(&path, feed_xml(entries)).unwrap();
        path
    }

    #[test]
    fn migrates_posts_in_feed_order() {
        let tmp = TempDir::new().unwrap();
        let feed = write_feed(
            &tmp,
            &[
                entry_xml(
                    EntryKind::Post,
                    "Hello World!",
                    "2020-03-04T10:20:30-08:00",
                    r#"<a href="http://x/s1600/pic.jpg"><img src="http://x/s200/pic.jpg"></a>"#,
                    &[],
                ),
                entry_xml(EntryKind::Comment, "Nice", "2020-03-05T00:00:00Z", "", &[]),
                entry_xml(
                    EntryKind::Post,
                    "Second",
                    "2020-03-06T00:00:00Z",
                    r#"<img src="http://x/s200/b.png">"#,
                    &["misc"],
                ),
            ],
        );
        let layout = OutputLayout::create(&tmp.path().join("out")).unwrap();
        let fetcher = MockFetcher::new()
            .with_body("http://x/s200/pic.jpg", b"a".to_vec())
            .with_body("http://x/s200/b.png", b"b".to_vec());
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1600,
            height: 1200,
        }]);
        let (tx, rx) = mpsc::channel();

        let summary = migrate_with(
            &fetcher,
            &backend,
            &feed,
            &layout,
            ThumbnailSize::default(),
            Some(tx),
        )
        .unwrap();

        assert_eq!(
            summary,
            MigrateSummary {
                posts: 2,
                images: 2,
                thumbnails: 1
            }
        );
        assert_eq!(
            fetcher.get_requests(),
            vec!["http://x/s200/pic.jpg", "http://x/s200/b.png"]
        );
        assert!(layout.content_file("2020-03-04-hello-world").exists());
        assert!(layout.content_file("2020-03-06-second").exists());

        let events: Vec<_> = rx.into_iter().collect();
        assert_eq!(
            events.first(),
            Some(&MigrateEvent::PostStarted {
                title: "Hello World!".to_string(),
                slug: "2020-03-04-hello-world".to_string(),
            })
        );
        assert_eq!(
            events.last(),
            Some(&MigrateEvent::PostSaved {
                path: "2020-03-06-second.md".to_string(),
                images: 1,
                thumbnails: 0,
            })
        );
        let started = events
            .iter()
            .filter(|e| matches!(e, MigrateEvent::PostStarted { .. }))
            .count();
        assert_eq!(started, 2);
    }

    #[test]
    fn first_error_stops_the_run() {
        let tmp = TempDir::new().unwrap();
        let feed = write_feed(
            &tmp,
            &[
                entry_xml(
                    EntryKind::Post,
                    "Broken",
                    "2020-01-01T00:00:00Z",
                    r#"<img src="http://x/gone.jpg">"#,
                    &[],
                ),
                entry_xml(EntryKind::Post, "Never", "2020-01-02T00:00:00Z", "", &[]),
            ],
        );
        let layout = OutputLayout::create(&tmp.path().join("out")).unwrap();
        let fetcher = MockFetcher::new();
        let backend = MockBackend::new();

        let err = migrate_with(
            &fetcher,
            &backend,
            &feed,
            &layout,
            ThumbnailSize::default(),
            None,
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Can't download image http://x/gone.jpg ; Status code 404"
        );
        assert!(!layout.content_file("2020-01-01-broken").exists());
        assert!(!layout.content_file("2020-01-02-never").exists());
    }

    #[test]
    fn missing_feed_is_error() {
        let tmp = TempDir::new().unwrap();
        let layout = OutputLayout::create(&tmp.path().join("out")).unwrap();

        let err = migrate_with(
            &MockFetcher::new(),
            &MockBackend::new(),
            &tmp.path().join("missing.xml"),
            &layout,
            ThumbnailSize::default(),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, MigrateError::Feed(FeedError::Read { .. })));
    }

    #[test]
    fn empty_feed_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let feed = write_feed(&tmp, &[]);
        let layout = OutputLayout::create(&tmp.path().join("out")).unwrap();

        let summary = migrate_with(
            &MockFetcher::new(),
            &MockBackend::new(),
            &feed,
            &layout,
            ThumbnailSize::default(),
            None,
        )
        .unwrap();

        assert_eq!(summary, MigrateSummary::default());
        let entries: Vec<_> = std::fs::read_dir(layout.root())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("images")]);
    }
}
