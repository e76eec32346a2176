//! Blogger export loading.
//!
//! A Blogger export is one Atom feed mixing posts, comments, pages, settings
//! and the template. Every `<entry>` carries a "kind" category; only
//! `kind#post` entries are migrated. Tags are the other categories, the ones
//! in the `atom/ns#` scheme:
//!
//! ```text
//! <entry>
//!   <category scheme="http://schemas.google.com/g/2005#kind"
//!             term="http://schemas.google.com/blogger/2008/kind#post"/>
//!   <category scheme="http://www.blogger.com/atom/ns#" term="travel"/>
//!   <published>2020-03-04T10:20:30.000-08:00</published>
//!   <title type="text">Hello World!</title>
//!   <content type="html">&lt;p&gt;...&lt;/p&gt;</content>
//!   <author><name>Jane</name></author>
//! </entry>
//! ```

use chrono::{DateTime, FixedOffset};
use roxmltree::{Document, Node};
use std::path::{Path, PathBuf};
use thiserror::Error;

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const CATEGORY_KIND: &str = "http://schemas.google.com/g/2005#kind";
const TERM_POST: &str = "http://schemas.google.com/blogger/2008/kind#post";
const CATEGORY_TAG: &str = "http://www.blogger.com/atom/ns#";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {}: {source}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
    #[error("Post \"{title}\" has no published date")]
    MissingPublished { title: String },
    #[error("Post \"{title}\" has an invalid published date \"{value}\": {source}")]
    InvalidPublished {
        title: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One blog post from the export.
#[derive(Debug, Clone, PartialEq)]
pub struct PostEntry {
    pub title: String,
    /// Publication time in the blog's own UTC offset.
    pub published: DateTime<FixedOffset>,
    pub author: String,
    /// Post body, an HTML fragment.
    pub content: String,
    pub tags: Vec<String>,
}

/// Read the export at `path` and return its posts in feed order.
pub fn load_posts(path: &Path) -> Result<Vec<PostEntry>, FeedError> {
    let xml = std::fs::read_to_string(path).map_err(|source| FeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_feed(&xml, path)
}

/// Parse export XML. `path` is only used to label errors.
pub fn parse_feed(xml: &str, path: &Path) -> Result<Vec<PostEntry>, FeedError> {
    let doc = Document::parse(xml).map_err(|source| FeedError::Xml {
        path: path.to_path_buf(),
        source,
    })?;

    doc.root_element()
        .children()
        .filter(|n| n.has_tag_name((ATOM_NS, "entry")))
        .filter(|entry| is_post(*entry))
        .map(parse_entry)
        .collect()
}

fn categories<'a, 'input>(
    entry: Node<'a, 'input>,
) -> impl Iterator<Item = (Option<&'a str>, Option<&'a str>)> {
    entry
        .children()
        .filter(|n| n.has_tag_name((ATOM_NS, "category")))
        .map(|n| (n.attribute("scheme"), n.attribute("term")))
}

fn is_post(entry: Node) -> bool {
    categories(entry)
        .any(|(scheme, term)| scheme == Some(CATEGORY_KIND) && term == Some(TERM_POST))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name((ATOM_NS, name)))
}

/// All text below `node`, CDATA included.
fn text_of(node: Option<Node>) -> String {
    node.map(|n| {
        n.descendants()
            .filter(|d| d.is_text())
            .filter_map(|d| d.text())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_entry(entry: Node) -> Result<PostEntry, FeedError> {
    let title = text_of(child(entry, "title"));

    let published = child(entry, "published")
        .map(|n| text_of(Some(n)))
        .ok_or_else(|| FeedError::MissingPublished {
            title: title.clone(),
        })?;
    let published = DateTime::parse_from_rfc3339(published.trim()).map_err(|source| {
        FeedError::InvalidPublished {
            title: title.clone(),
            value: published.clone(),
            source,
        }
    })?;

    let author = text_of(child(entry, "author").and_then(|a| child(a, "name")));
    let content = text_of(child(entry, "content"));
    let tags = categories(entry)
        .filter(|(scheme, _)| *scheme == Some(CATEGORY_TAG))
        .filter_map(|(_, term)| term.map(str::to_string))
        .collect();

    Ok(PostEntry {
        title,
        published,
        author,
        content,
        tags,
    })
}
