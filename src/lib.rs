//! # blogger-to-hugo
//!
//! Migrates a Blogger export (an Atom XML feed) into Hugo content. Each post
//! becomes a markdown file with TOML front matter; every image it embeds is
//! downloaded next to it, and images that link to a larger version of
//! themselves get a local thumbnail.
//!
//! # Pipeline
//!
//! ```text
//! blog.xml ──feed──▶ PostEntry ──post──▶ slug, Fragment
//!                                           │
//!                                        rewrite ── fetch ──▶ images/{slug}-{name}
//!                                           │  └── imaging ─▶ images/thumbnails/{slug}-{name}
//!                                           ▼
//!                                       markdown ──────────▶ {slug}.md
//! ```
//!
//! Posts are handled one at a time in feed order and images in document
//! order. Nothing runs concurrently, and the first failure ends the run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`migrate`] | Drives a whole run and reports progress events |
//! | [`feed`] | Reads the export and picks out posts, with their tags |
//! | [`post`] | Turns one post into one content file |
//! | [`rewrite`] | Downloads a post's images and rewrites its markup |
//! | [`markup`] | Editable HTML fragment tree |
//! | [`similarity`] | Decides whether a link points at a larger copy of its image |
//! | [`fetch`] | HTTP downloads behind a [`fetch::Fetcher`] trait |
//! | [`imaging`] | Thumbnail sizing and resizing behind an [`imaging::ImageBackend`] trait |
//! | [`markdown`] | HTML to markdown |
//! | [`layout`] | Output folder structure and the no-overwrite guard |
//! | [`naming`] | Slugs and asset filenames |
//! | [`config`] | Optional `config.toml` |
//! | [`output`] | CLI progress formatting |
//!
//! # Design Decisions
//!
//! ## Nothing Is Overwritten
//!
//! The output folder must not exist when a run starts, and every file in it
//! is written exactly once. Two images that map to the same filename are a
//! hard error instead of a silent overwrite, so a finished run never contains
//! a post pointing at the wrong picture. Re-running means starting from a
//! fresh folder.
//!
//! ## URL Similarity Instead of Image Comparison
//!
//! Blogger serves the same picture at several sizes from URLs that differ only
//! in a `/sNNN/` segment. Whether a link wraps "the same image, bigger" is
//! decided from the two URLs alone ([`similarity::links_to_larger_image`]), so
//! no second download is needed.
//!
//! ## Traits at the I/O Seams
//!
//! Network and pixel work sit behind [`fetch::Fetcher`] and
//! [`imaging::ImageBackend`]. The rewrite pipeline is tested end to end with
//! mocks that record what they were asked to do.

pub mod config;
pub mod feed;
pub mod fetch;
pub mod imaging;
pub mod layout;
pub mod markdown;
pub mod markup;
pub mod migrate;
pub mod naming;
pub mod output;
pub mod post;
pub mod rewrite;
pub mod similarity;

#[cfg(test)]
pub(crate) mod test_helpers;
