// ABOUTME: Indented HTML serializer for re-parsed fragments.
// ABOUTME: Renders one tag or text run per line so the cleaned report body reads well as source.

use ego_tree::NodeRef;
use scraper::{Html, Node};

const INDENT: &str = "  ";

/// Elements that never have a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are raw text and must not be entity-escaped.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

/// Parse `html` as a body fragment and serialize it with one node per line.
///
/// Whitespace-only text runs are dropped and the rest are trimmed, so the
/// output is stable no matter how the input was wrapped.
pub fn prettify_fragment(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len() + html.len() / 2);
    for child in fragment.root_element().children() {
        write_node(child, 0, false, &mut out);
    }
    out
}

fn push_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(line);
    out.push('\n');
}

fn write_node(node: NodeRef<'_, Node>, depth: usize, raw_text: bool, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return;
            }
            if raw_text {
                push_line(out, depth, trimmed);
            } else {
                push_line(out, depth, &escape_text(trimmed));
            }
        }
        Node::Comment(comment) => {
            push_line(out, depth, &format!("<!--{}-->", &**comment));
        }
        Node::Element(el) => {
            let name = el.name();
            let mut open = format!("<{}", name);
            for (attr, value) in el.attrs() {
                open.push_str(&format!(" {}=\"{}\"", attr, escape_attr(value)));
            }
            open.push('>');
            push_line(out, depth, &open);

            if VOID_TAGS.contains(&name) {
                return;
            }
            let raw_text = RAW_TEXT_TAGS.contains(&name);
            for child in node.children() {
                write_node(child, depth + 1, raw_text, out);
            }
            push_line(out, depth, &format!("</{}>", name));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indents_nested_elements() {
        let out = prettify_fragment(r#"<div id="scrollbox"><p>Hello <b>there</b></p><br></div>"#);
        assert_eq!(
            out,
            "<div id=\"scrollbox\">\n  <p>\n    Hello\n    <b>\n      there\n    </b>\n  </p>\n  <br>\n</div>\n"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let out = prettify_fragment(r#"<a href="x?a=1&amp;b=&quot;2&quot;">Fish &amp; chips</a>"#);
        assert!(out.contains(r#"<a href="x?a=1&amp;b=&quot;2&quot;">"#), "{}", out);
        assert!(out.contains("Fish &amp; chips"), "{}", out);
    }

    #[test]
    fn style_and_script_text_stay_verbatim() {
        let out = prettify_fragment(
            r#"<div id="scrollbox"><style>p > b { color: red }</style><script>if (a < b && c) {}</script><p>a < b</p></div>"#,
        );
        assert!(out.contains("p > b { color: red }"), "{}", out);
        assert!(out.contains("if (a < b && c) {}"), "{}", out);
        assert!(!out.contains("&amp;&amp;"), "{}", out);
        assert!(out.contains("a &lt; b"), "{}", out);
    }

    #[test]
    fn drops_whitespace_only_text() {
        let out = prettify_fragment("<p>   </p>");
        assert_eq!(out, "<p>\n</p>\n");
    }
}
