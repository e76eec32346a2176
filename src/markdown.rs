//! HTML body to markdown.
//!
//! Conversion is delegated to `html2md`; the result is then tidied so that
//! content files diff cleanly: no trailing spaces, at most one blank line
//! between blocks, no leading or trailing blank lines.

pub fn html_to_markdown(html: &str) -> String {
    clean_markdown(&html2md::parse_html(html))
}

fn clean_markdown(md: &str) -> String {
    let mut result = md
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n");

    // Collapse 3+ consecutive newlines to 2
    while result.contains("\n\n\n") {
        result = result.replace("\n\n\n", "\n\n");
    }

    result.trim_matches('\n').to_string()
}
