// ABOUTME: Lazy walk over the comment section that trails a trip report body.
// ABOUTME: Suppresses the duplicated author name after each bold name and stops at the first <span>.

use scraper::{ElementRef, Html, Node};

use crate::dom::{by_id, following, is_element, predecessor, Following};
use crate::error::ScrapeError;
use crate::result::{CommentNode, Result};

use super::report::SCROLL_CONTAINER_ID;

/// Tag closing the comment section; it is the last node yielded.
pub const SECTION_BOUNDARY_TAG: &str = "span";

/// Tag wrapping a commenter's name.
const AUTHOR_TAG: &str = "b";

/// Forward-only, single-use iterator over the comment section of a report page.
///
/// Starts after the scroll container's next sibling and yields text and
/// element nodes in document order. An element is yielded as its serialized
/// HTML, and its descendants are then yielded on their own as the walk
/// continues through them. A text node directly preceded by a `<b>` is
/// skipped: that is the name already shown by the bold element.
///
/// The suppression assumes the duplicate text sits immediately after the
/// `<b>` in document order. Extra inline markup in between would defeat it.
pub struct CommentStream<'a> {
    nodes: Following<'a>,
    done: bool,
}

impl<'a> CommentStream<'a> {
    pub fn new(doc: &'a Html) -> Result<Self> {
        let container = by_id(doc, SCROLL_CONTAINER_ID)
            .ok_or_else(|| ScrapeError::malformed("ExtractComments", "#scrollbox"))?;
        let start = container
            .next_sibling()
            .ok_or_else(|| ScrapeError::malformed("ExtractComments", "node after #scrollbox"))?;
        Ok(Self {
            nodes: following(start),
            done: false,
        })
    }
}

impl<'a> Iterator for CommentStream<'a> {
    type Item = CommentNode;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for node in self.nodes.by_ref() {
            match node.value() {
                Node::Text(text) => {
                    if predecessor(node).is_some_and(|prev| is_element(prev, AUTHOR_TAG)) {
                        continue;
                    }
                    return Some(CommentNode::Text {
                        text: String::from(&**text),
                    });
                }
                Node::Element(el) => {
                    let tag = el.name().to_string();
                    let html = ElementRef::wrap(node).map(|e| e.html()).unwrap_or_default();
                    if tag == SECTION_BOUNDARY_TAG {
                        self.done = true;
                    }
                    return Some(CommentNode::Element { tag, html });
                }
                _ => continue,
            }
        }
        self.done = true;
        None
    }
}

impl std::iter::FusedIterator for CommentStream<'_> {}

/// Collect the whole comment section.
pub fn extract_comments(doc: &Html) -> Result<Vec<CommentNode>> {
    Ok(CommentStream::new(doc)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn page(trailer: &str) -> Html {
        parse_document(&format!(
            r#"<html><body><div id="scrollbox">report</div>
{}</body></html>"#,
            trailer
        ))
    }

    fn texts(nodes: &[CommentNode]) -> Vec<&str> {
        nodes
            .iter()
            .filter_map(|n| match n {
                CommentNode::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn bold_name_is_not_repeated_as_text() {
        let doc = page("<b>Alice</b> says hi<span>end</span>");
        let nodes = extract_comments(&doc).unwrap();

        assert_eq!(
            nodes[0],
            CommentNode::Element {
                tag: "b".to_string(),
                html: "<b>Alice</b>".to_string()
            }
        );
        let texts = texts(&nodes);
        assert!(!texts.contains(&"Alice"), "duplicate name leaked: {:?}", texts);
        assert!(texts.contains(&" says hi"));
    }

    #[test]
    fn name_repeated_after_bold_keeps_only_the_comment_text() {
        let doc = page("<b>Alice</b>Alice says hi<span>end</span>");
        let nodes = extract_comments(&doc).unwrap();

        assert_eq!(
            nodes,
            vec![
                CommentNode::Element {
                    tag: "b".to_string(),
                    html: "<b>Alice</b>".to_string()
                },
                CommentNode::Text {
                    text: "Alice says hi".to_string()
                },
                CommentNode::Element {
                    tag: "span".to_string(),
                    html: "<span>end</span>".to_string()
                },
            ]
        );
        assert!(!texts(&nodes).contains(&"Alice"));
    }

    #[test]
    fn stops_at_first_span_inclusive() {
        let doc = page("<p>first</p><span>boundary</span><p>after</p><span>second</span>");
        let nodes = extract_comments(&doc).unwrap();

        let last = nodes.last().unwrap();
        assert!(last.is_element("span"));
        assert_eq!(last.to_html(), "<span>boundary</span>");
        assert_eq!(nodes.iter().filter(|n| n.is_element("span")).count(), 1);
        assert!(!texts(&nodes).contains(&"after"));
    }

    #[test]
    fn stream_is_fused_after_boundary() {
        let doc = page("<span>end</span>tail");
        let mut stream = CommentStream::new(&doc).unwrap();
        assert!(stream.next().unwrap().is_element("span"));
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn missing_scroll_container_is_malformed() {
        let doc = parse_document("<html><body><p>no report</p></body></html>");
        let err = CommentStream::new(&doc).err().unwrap();
        assert!(err.is_malformed());
    }
}
