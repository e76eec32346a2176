//! One post in, one Hugo content file out.
//!
//! ```text
//! +++
//! title = "Hello World!"
//! slug = "2020-03-04-hello-world"
//! published = 2020-03-04T10:20:30-08:00
//! author = "Jane Doe"
//! tags = []
//! +++
//! [![](../images/thumbnails/2020-03-04-hello-world-pic.jpg)](../images/2020-03-04-hello-world-pic.jpg)
//! ```
//!
//! The slug is the publication date (in the post's own offset) followed by
//! the slugified title. It names the content file and prefixes every asset
//! the post downloads.

use crate::feed::PostEntry;
use crate::fetch::Fetcher;
use crate::imaging::ImageBackend;
use crate::layout::{CollisionError, ensure_vacant};
use crate::markdown::html_to_markdown;
use crate::markup::{Fragment, MarkupError};
use crate::naming::post_slug;
use crate::rewrite::{ImageRewriter, RewriteError, RewriteStats};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error(transparent)]
    Markup(#[from] MarkupError),
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
    #[error("Post \"{title}\" has a date TOML cannot represent: {source}")]
    Timestamp {
        title: String,
        #[source]
        source: toml::value::DatetimeParseError,
    },
    #[error("Failed to serialize front matter: {0}")]
    FrontMatter(#[from] toml::ser::Error),
    #[error(transparent)]
    Collision(#[from] CollisionError),
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What processing a post produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostOutcome {
    pub slug: String,
    /// The written content file.
    pub path: PathBuf,
    pub stats: RewriteStats,
}

/// Metadata block, in output order.
#[derive(Debug, Serialize)]
struct FrontMatter<'a> {
    title: &'a str,
    slug: &'a str,
    published: toml::value::Datetime,
    author: &'a str,
    tags: &'a [String],
}

/// Slug for a post: `{YYYY-MM-DD}-{slugified title}`.
pub fn slug_for(entry: &PostEntry) -> String {
    post_slug(&entry.published.format("%Y-%m-%d").to_string(), &entry.title)
}

fn render_front_matter(entry: &PostEntry, slug: &str) -> Result<String, PostError> {
    let published = entry
        .published
        .to_rfc3339()
        .parse::<toml::value::Datetime>()
        .map_err(|source| PostError::Timestamp {
            title: entry.title.clone(),
            source,
        })?;
    let front = FrontMatter {
        title: &entry.title,
        slug,
        published,
        author: &entry.author,
        tags: &entry.tags,
    };
    Ok(toml::to_string(&front)?)
}

/// Render the complete content file.
fn render_content(front_matter: &str, markdown: &str) -> String {
    format!("+++\n{}\n+++\n{}\n", front_matter.trim_end(), markdown)
}

/// Rewrite the post's images, convert it to markdown and write `{slug}.md`.
pub fn process_post<F: Fetcher, B: ImageBackend>(
    entry: &PostEntry,
    rewriter: &ImageRewriter<'_, F, B>,
) -> Result<PostOutcome, PostError> {
    let slug = slug_for(entry);

    let mut fragment = Fragment::parse(&entry.content)?;
    let stats = rewriter.rewrite(&mut fragment, &slug)?;
    let markdown = html_to_markdown(&fragment.to_html());
    let content = render_content(&render_front_matter(entry, &slug)?, &markdown);

    let path = rewriter.layout.content_file(&slug);
    ensure_vacant(&path, &entry.title)?;
    std::fs::write(&path, content).map_err(|source| PostError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(PostOutcome { slug, path, stats })
}
