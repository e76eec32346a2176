//! Owned, mutable HTML fragment.
//!
//! Post bodies are parsed once with `tl` and copied into an arena that the
//! image rewriter can edit in place:
//!
//! ```text
//! Fragment
//! ├── nodes: Vec<Node>      all nodes ever created, addressed by NodeId
//! └── roots: Vec<NodeId>    top-level nodes, in document order
//!
//! Element { tag, attrs, children: Vec<NodeId> }
//! Text(raw html text)
//! ```
//!
//! Replacing a node swaps its id in the parent's child list (or the root
//! list). The old subtree stays in the arena but is no longer reachable from
//! the roots; such nodes are *detached*. Parents are not stored on nodes;
//! [`Fragment::parent`] finds them with a single walk from the roots.
//!
//! Attribute values are kept entity-decoded and escaped again on output.
//! Text is kept exactly as written in the source. Comments are dropped.

use std::borrow::Cow;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("Failed to parse post markup: {0}")]
    Parse(String),
    #[error("Node {0:?} is not part of the document")]
    Detached(NodeId),
}

/// Index of a node in its [`Fragment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Attributes in source order. `None` for valueless attributes.
    pub attrs: Vec<(String, Option<String>)>,
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Raw text, still HTML-escaped.
    Text(String),
}

/// Where a node currently hangs in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Root,
    Element(NodeId),
    Detached,
}

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[derive(Debug, Clone, Default)]
pub struct Fragment {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Fragment {
    /// Parse an HTML fragment.
    pub fn parse(html: &str) -> Result<Self, MarkupError> {
        let dom = tl::parse(html, tl::ParserOptions::default())
            .map_err(|e| MarkupError::Parse(format!("{e:?}")))?;
        let parser = dom.parser();

        let mut fragment = Self::default();
        for handle in dom.children() {
            if let Some(id) = fragment.import(*handle, parser) {
                fragment.roots.push(id);
            }
        }
        Ok(fragment)
    }

    fn import(&mut self, handle: tl::NodeHandle, parser: &tl::Parser) -> Option<NodeId> {
        match handle.get(parser)? {
            tl::Node::Tag(tag) => {
                let attrs = tag
                    .attributes()
                    .iter()
                    .map(|(key, value)| {
                        let key: &str = key.as_ref();
                        (
                            key.to_lowercase(),
                            value.map(|v| unescape(&v).into_owned()),
                        )
                    })
                    .collect();
                let children = tag
                    .children()
                    .top()
                    .iter()
                    .filter_map(|child| self.import(*child, parser))
                    .collect();

                Some(self.push(Node::Element(Element {
                    tag: tag.name().as_utf8_str().to_lowercase(),
                    attrs,
                    children,
                })))
            }
            tl::Node::Raw(bytes) => Some(self.push(Node::Text(bytes.as_utf8_str().into_owned()))),
            tl::Node::Comment(_) => None,
        }
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.node(id)? {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Attribute value, matched case-insensitively. Valueless attributes read as `""`.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }

    /// Reachable nodes in document order (pre-order).
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(element) = self.element(id) {
                stack.extend(element.children.iter().rev());
            }
        }
        order
    }

    /// All reachable `<img>` elements in document order.
    pub fn images(&self) -> Vec<NodeId> {
        self.descendants()
            .into_iter()
            .filter(|id| self.tag(*id) == Some("img"))
            .collect()
    }

    /// Find where `id` currently sits.
    pub fn parent(&self, id: NodeId) -> Parent {
        if self.roots.contains(&id) {
            return Parent::Root;
        }
        self.descendants()
            .into_iter()
            .find(|candidate| {
                self.element(*candidate)
                    .is_some_and(|e| e.children.contains(&id))
            })
            .map_or(Parent::Detached, Parent::Element)
    }

    /// The element whose children include `id`, attached to the tree or not.
    ///
    /// Unlike [`parent`](Self::parent), this still answers for nodes cut off
    /// by an earlier [`replace`](Self::replace).
    pub fn enclosing_element(&self, id: NodeId) -> Option<NodeId> {
        (0..self.nodes.len()).map(NodeId).find(|candidate| {
            self.element(*candidate)
                .is_some_and(|e| e.children.contains(&id))
        })
    }

    /// Create a detached element. Attach it with [`append_child`](Self::append_child)
    /// or [`replace`](Self::replace).
    pub fn new_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        self.push(Node::Element(Element {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), Some(v.to_string())))
                .collect(),
            children: Vec::new(),
        }))
    }

    /// Append `child` to element `parent`. No-op on text nodes.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(Node::Element(element)) = self.nodes.get_mut(parent.0) {
            element.children.push(child);
        }
    }

    /// Put `new` where `old` is. `old` and its subtree become detached.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), MarkupError> {
        let slot = match self.parent(old) {
            Parent::Root => self.roots.iter_mut().find(|id| **id == old),
            Parent::Element(parent) => match self.nodes.get_mut(parent.0) {
                Some(Node::Element(element)) => element.children.iter_mut().find(|id| **id == old),
                _ => None,
            },
            Parent::Detached => None,
        };
        match slot {
            Some(slot) => {
                *slot = new;
                Ok(())
            }
            None => Err(MarkupError::Detached(old)),
        }
    }

    /// Serialize the reachable tree back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for id in &self.roots {
            self.write_node(*id, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            Some(Node::Text(text)) => out.push_str(text),
            Some(Node::Element(element)) => {
                out.push('<');
                out.push_str(&element.tag);
                for (key, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(key);
                    if let Some(value) = value {
                        out.push_str("=\"");
                        out.push_str(&escape_attr(value));
                        out.push('"');
                    }
                }
                out.push('>');
                for child in &element.children {
                    self.write_node(*child, out);
                }
                if is_void_element(&element.tag) {
                    return;
                }
                out.push_str("</");
                out.push_str(&element.tag);
                out.push('>');
            }
            None => {}
        }
    }
}

/// Escape an attribute value for a double-quoted attribute.
pub fn escape_attr(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '"', '<', '>']) {
        return Cow::Borrowed(s);
    }
    let mut result = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// Decode the common named entities and numeric character references.
///
/// Anything unrecognized is left as written.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&rest[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                result.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    Cow::Owned(result)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINKED: &str =
        r#"<p>Look:<a href="http://x/s1600/pic.jpg"><img src="http://x/s200/pic.jpg" width="200"></a></p>"#;

    #[test]
    fn parse_and_serialize_preserves_structure() {
        let fragment = Fragment::parse(LINKED).unwrap();
        assert_eq!(fragment.to_html(), LINKED);
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let fragment = Fragment::parse("a<br>b<img src=\"x.png\">").unwrap();
        assert_eq!(fragment.to_html(), "a<br>b<img src=\"x.png\">");
    }

    #[test]
    fn comments_are_dropped() {
        let fragment = Fragment::parse("<p>a<!-- hidden -->b</p>").unwrap();
        assert_eq!(fragment.to_html(), "<p>ab</p>");
    }

    #[test]
    fn tag_and_attribute_names_are_lowercased() {
        let fragment = Fragment::parse(r#"<IMG SRC="a.jpg">"#).unwrap();
        let img = fragment.images()[0];
        assert_eq!(fragment.tag(img), Some("img"));
        assert_eq!(fragment.attr(img, "src"), Some("a.jpg"));
    }

    #[test]
    fn attribute_entities_are_decoded_and_reescaped() {
        let fragment = Fragment::parse(r#"<img src="http://x/p.jpg?a=1&amp;b=2">"#).unwrap();
        let img = fragment.images()[0];
        assert_eq!(fragment.attr(img, "src"), Some("http://x/p.jpg?a=1&b=2"));
        assert_eq!(
            fragment.to_html(),
            r#"<img src="http://x/p.jpg?a=1&amp;b=2">"#
        );
    }

    #[test]
    fn valueless_attribute_reads_as_empty() {
        let fragment = Fragment::parse("<img src=\"a.jpg\" ismap>").unwrap();
        let img = fragment.images()[0];
        assert_eq!(fragment.attr(img, "ismap"), Some(""));
        assert_eq!(fragment.attr(img, "alt"), None);
    }

    #[test]
    fn images_are_in_document_order() {
        let fragment = Fragment::parse(
            r#"<div><img src="1.jpg"><p><img src="2.jpg"></p></div><img src="3.jpg">"#,
        )
        .unwrap();
        let srcs: Vec<_> = fragment
            .images()
            .into_iter()
            .map(|id| fragment.attr(id, "src").unwrap().to_string())
            .collect();
        assert_eq!(srcs, vec!["1.jpg", "2.jpg", "3.jpg"]);
    }

    #[test]
    fn parent_of_nested_and_root_nodes() {
        let fragment = Fragment::parse(LINKED).unwrap();
        let img = fragment.images()[0];
        let Parent::Element(link) = fragment.parent(img) else {
            panic!("img should have an element parent");
        };
        assert_eq!(fragment.tag(link), Some("a"));
        assert_eq!(fragment.attr(link, "href"), Some("http://x/s1600/pic.jpg"));
        assert_eq!(fragment.parent(fragment.roots()[0]), Parent::Root);
    }

    #[test]
    fn replace_nested_node() {
        let mut fragment = Fragment::parse(LINKED).unwrap();
        let img = fragment.images()[0];
        let new_img = fragment.new_element("img", &[("src", "../images/pic.jpg")]);

        fragment.replace(img, new_img).unwrap();

        assert_eq!(
            fragment.to_html(),
            r#"<p>Look:<a href="http://x/s1600/pic.jpg"><img src="../images/pic.jpg"></a></p>"#
        );
        assert_eq!(fragment.parent(img), Parent::Detached);
    }

    #[test]
    fn replace_root_node() {
        let mut fragment = Fragment::parse(r#"<img src="a.jpg"><p>text</p>"#).unwrap();
        let img = fragment.images()[0];
        let link = fragment.new_element("a", &[("href", "full.jpg")]);
        let thumb = fragment.new_element("img", &[("src", "thumb.jpg")]);
        fragment.append_child(link, thumb);

        fragment.replace(img, link).unwrap();

        assert_eq!(
            fragment.to_html(),
            r#"<a href="full.jpg"><img src="thumb.jpg"></a><p>text</p>"#
        );
    }

    #[test]
    fn replacing_ancestor_detaches_descendants() {
        let mut fragment =
            Fragment::parse(r#"<a href="x"><img src="1.jpg"><img src="2.jpg"></a>"#).unwrap();
        let images = fragment.images();
        let link = fragment.roots()[0];
        let replacement = fragment.new_element("span", &[]);

        fragment.replace(link, replacement).unwrap();

        assert_eq!(fragment.parent(images[1]), Parent::Detached);
        assert!(fragment.images().is_empty());
        let err = fragment.replace(images[1], replacement).unwrap_err();
        assert!(matches!(err, MarkupError::Detached(id) if id == images[1]));
    }

    #[test]
    fn enclosing_element_survives_detachment() {
        let mut fragment =
            Fragment::parse(r#"<a href="x"><img src="1.jpg"><img src="2.jpg"></a>"#).unwrap();
        let images = fragment.images();
        let link = fragment.roots()[0];
        let replacement = fragment.new_element("span", &[]);

        assert_eq!(fragment.enclosing_element(images[1]), Some(link));
        fragment.replace(link, replacement).unwrap();

        assert_eq!(fragment.enclosing_element(images[1]), Some(link));
        assert_eq!(fragment.enclosing_element(link), None);
    }

    #[test]
    fn text_is_kept_verbatim() {
        let html = "<p>Fish &amp; chips &lt;3</p>";
        assert_eq!(Fragment::parse(html).unwrap().to_html(), html);
    }

    #[test]
    fn empty_input_is_empty_fragment() {
        let fragment = Fragment::parse("").unwrap();
        assert!(fragment.roots().is_empty());
        assert_eq!(fragment.to_html(), "");
    }

    #[test]
    fn unescape_named_and_numeric() {
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("&lt;&gt;&quot;&apos;"), "<>\"'");
        assert_eq!(unescape("&#65;&#x42;&#X43;"), "ABC");
    }

    #[test]
    fn unescape_leaves_unknown_entities() {
        assert_eq!(unescape("AT&T"), "AT&T");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("a & b; c"), "a & b; c");
    }

    #[test]
    fn escape_attr_only_allocates_when_needed() {
        assert!(matches!(escape_attr("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_attr(r#"a"b&c"#), "a&quot;b&amp;c");
    }
}
