//! Page aggregation
//!
//! Every fetched page is re-serialized as indented markup, one node per line,
//! and the renderings are concatenated in visitation order. Page boundaries and
//! URLs are not kept; downstream consumers only see the flattened text.

use crate::state::PageRecord;
use scraper::node::Element;
use scraper::{Html, Node};

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text is emitted verbatim
const PREFORMATTED: &[&str] = &["pre", "textarea", "script", "style"];

/// Concatenates the pretty-printed rendering of every page
pub fn aggregate(pages: &[PageRecord]) -> String {
    pages.iter().map(|page| prettify(&page.html)).collect()
}

/// Renders an HTML document with one node per line, indented by depth
///
/// The tree is walked with an explicit stack, so nesting depth is bounded
/// only by memory.
///
/// # Example
///
/// ```
/// use site_ingest::crawler::prettify;
///
/// let text = prettify("<p>Hello <b>world</b></p>");
/// assert!(text.contains("  <p>\n   Hello\n   <b>\n    world\n   </b>\n  </p>\n"));
/// ```
pub fn prettify(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len() + html.len() / 4);

    // (node, depth, closing)
    let mut stack: Vec<_> = document
        .tree
        .root()
        .children()
        .rev()
        .map(|node| (node, 0, false))
        .collect();

    while let Some((node, depth, closing)) = stack.pop() {
        match node.value() {
            Node::Element(element) if closing => {
                write_line(&mut out, depth, &format!("</{}>", element.name()));
            }
            Node::Element(element) => {
                write_line(&mut out, depth, &open_tag(element));
                if VOID_ELEMENTS.contains(&element.name()) {
                    continue;
                }
                stack.push((node, depth, true));
                stack.extend(node.children().rev().map(|child| (child, depth + 1, false)));
            }
            Node::Doctype(doctype) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(doctype.name());
                out.push_str(">\n");
            }
            Node::Comment(comment) => {
                write_line(&mut out, depth, &format!("<!--{}-->", &**comment));
            }
            Node::Text(text) => {
                let Some(parent) = node.parent().and_then(|p| p.value().as_element()) else {
                    continue;
                };
                if PREFORMATTED.contains(&parent.name()) {
                    out.push_str(&text.text);
                    if !text.text.ends_with('\n') {
                        out.push('\n');
                    }
                } else {
                    let trimmed = text.text.trim();
                    if !trimmed.is_empty() {
                        write_line(&mut out, depth, &escape_text(trimmed));
                    }
                }
            }
            _ => {}
        }
    }

    out
}

fn open_tag(element: &Element) -> String {
    let mut open = format!("<{}", element.name());
    for (attr, value) in element.attrs() {
        open.push(' ');
        open.push_str(attr);
        open.push_str("=\"");
        open.push_str(&escape_attribute(value));
        open.push('"');
    }
    open.push('>');
    open
}

fn write_line(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push(' ');
    }
    out.push_str(line);
    out.push('\n');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
