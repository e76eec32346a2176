//! Filename and slug derivation.
//!
//! Every file the migration writes is named from the post slug, so the same
//! feed always produces the same output tree:
//!
//! - `2020-03-04-hello-world.md`: content file (`{date}-{slugified title}`)
//! - `images/2020-03-04-hello-world-pic.jpg`: asset (`{slug}-{remote basename}`)
//!
//! ## Slugify
//!
//! Titles are transliterated to ASCII, lowercased, and every run of
//! characters outside `[a-z0-9]` becomes a single dash:
//! - `"Hello World!"` → `"hello-world"`
//! - `"Crème Brûlée"` → `"creme-brulee"`
//! - `"Don't panic"` → `"dont-panic"` (apostrophes are dropped, not split on)

use deunicode::deunicode;

/// Turn free text into a lowercase, ASCII, dash-separated slug.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c == '\'' || c == '"' {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Build a post slug from its publish date (`YYYY-MM-DD`) and title.
///
/// A title that slugifies to nothing leaves just the date.
pub fn post_slug(date: &str, title: &str) -> String {
    let title_slug = slugify(title);
    if title_slug.is_empty() {
        date.to_string()
    } else {
        format!("{}-{}", date, title_slug)
    }
}

/// Local filename for a remote asset: the post slug plus everything after the
/// last `/` of the URL.
pub fn asset_filename(slug: &str, url: &str) -> String {
    let basename = match url.rfind('/') {
        Some(pos) => &url[pos + 1..],
        None => url,
    };
    format!("{}-{}", slug, basename)
}
