// ABOUTME: Markup tree helpers over scraper's HTML document for positional, pattern-based queries.
// ABOUTME: Provides tag/id/href lookups, document-order traversal, ancestor search, and text helpers.

//! DOM utilities for the trip report extractors.
//!
//! The source site's markup has no stable classes or ids, so extraction leans
//! on "the first X", "the next X after Y" and "the element whose href looks
//! like Z". This module gives those queries names over scraper's tree.
//!
//! Document order here matches how the HTML was written: a node is followed
//! by its own descendants, then by its next sibling, then by its ancestors'
//! following siblings.

pub mod patterns;
pub mod pretty;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

pub use self::pretty::prettify_fragment;

/// Parse a full HTML document. html5ever recovers from malformed input, so this never fails.
pub fn parse_document(html: &str) -> Html {
    Html::parse_document(html)
}

/// All elements with the given tag name, in document order.
pub fn elements_by_tag<'a>(
    doc: &'a Html,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    doc.tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == tag)
}

/// The first element with the given tag name.
pub fn first_by_tag<'a>(doc: &'a Html, tag: &'a str) -> Option<ElementRef<'a>> {
    elements_by_tag(doc, tag).next()
}

/// The first element whose `id` attribute equals `id`.
pub fn by_id<'a>(doc: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    doc.tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().id() == Some(id))
}

/// Every element carrying an `href` that matches `pattern` (an unanchored regex),
/// in document order.
pub fn href_matches<'a>(doc: &'a Html, pattern: &str) -> Vec<ElementRef<'a>> {
    let Some(re) = patterns::get_or_compile(pattern) else {
        return Vec::new();
    };
    doc.tree
        .root()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().attr("href").is_some_and(|href| re.is_match(href)))
        .collect()
}

/// Iterator over every node after a starting node, in document order.
pub struct Following<'a> {
    next: Option<NodeRef<'a, Node>>,
}

impl<'a> Iterator for Following<'a> {
    type Item = NodeRef<'a, Node>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = successor(current);
        Some(current)
    }
}

/// The node right after `node` in document order.
pub fn successor(node: NodeRef<'_, Node>) -> Option<NodeRef<'_, Node>> {
    if let Some(child) = node.first_child() {
        return Some(child);
    }
    let mut current = node;
    loop {
        if let Some(sibling) = current.next_sibling() {
            return Some(sibling);
        }
        current = current.parent()?;
    }
}

/// The node right before `node` in document order.
pub fn predecessor(node: NodeRef<'_, Node>) -> Option<NodeRef<'_, Node>> {
    match node.prev_sibling() {
        Some(mut prev) => {
            while let Some(last) = prev.last_child() {
                prev = last;
            }
            Some(prev)
        }
        None => node.parent(),
    }
}

/// All nodes after `node` (its descendants first), in document order.
pub fn following(node: NodeRef<'_, Node>) -> Following<'_> {
    Following {
        next: successor(node),
    }
}

/// The next element named `tag` after `node` in document order, descendants included.
pub fn find_next<'a>(node: NodeRef<'a, Node>, tag: &str) -> Option<ElementRef<'a>> {
    following(node)
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}

/// The nearest ancestor element named `tag`.
pub fn ancestor<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == tag)
}

/// Descendant elements named `tag`, in document order.
pub fn descendants_by_tag<'a>(
    el: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |d| d.value().name() == tag)
}

/// Child elements named `tag`, in order.
pub fn children_by_tag<'a>(
    el: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(move |c| c.value().name() == tag)
}

/// True when `node` is an element named `tag`.
pub fn is_element(node: NodeRef<'_, Node>, tag: &str) -> bool {
    matches!(node.value(), Node::Element(el) if el.name() == tag)
}

/// Concatenated text of an element and its descendants, untouched.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

/// Strip leading and trailing newlines only, leaving other whitespace alone.
pub fn trim_newlines(s: &str) -> &str {
    s.trim_matches(|c| c == '\n' || c == '\r')
}

/// The final `/`-separated segment of an href.
pub fn last_segment(href: &str) -> &str {
    href.rsplit('/').next().unwrap_or(href)
}
