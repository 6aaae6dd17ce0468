//! Static HTML serialization of rendered trees.
//!
//! Mirrors what a server-side renderer emits: keys are not serialized,
//! boolean attributes render as `name=""` when set and are omitted when not,
//! and void elements self-close.

use std::fmt::Write;

use mdom_syntax::PropertyValue;

use crate::element::{RenderedElement, RenderedNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Serialize an element tree to static HTML.
///
/// # Example
///
/// ```
/// use mdom_render::{RenderOptions, Renderer, to_static_markup};
///
/// let element = Renderer::new(RenderOptions::default())
///     .render_markdown("# Hello")
///     .unwrap();
/// assert_eq!(to_static_markup(&element), "<div><h1>Hello</h1></div>");
/// ```
pub fn to_static_markup(element: &RenderedElement) -> String {
    let mut out = String::with_capacity(256);
    write_element(element, &mut out);
    out
}

fn write_node(node: &RenderedNode, out: &mut String) {
    match node {
        RenderedNode::Element(element) => write_element(element, out),
        RenderedNode::Text(text) => out.push_str(&escape_html(text)),
        RenderedNode::Raw(html) => out.push_str(html),
    }
}

fn write_element(element: &RenderedElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.props {
        write_attribute(name, value, out);
    }

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    write!(out, "</{}>", element.tag).unwrap();
}

fn write_attribute(name: &str, value: &PropertyValue, out: &mut String) {
    match value {
        PropertyValue::Bool(false) => {}
        PropertyValue::Bool(true) => write!(out, r#" {name}="""#).unwrap(),
        PropertyValue::Number(n) => write!(out, r#" {name}="{}""#, format_number(*n)).unwrap(),
        PropertyValue::String(s) => write!(out, r#" {name}="{}""#, escape_html(s)).unwrap(),
        PropertyValue::List(items) => {
            if !items.is_empty() {
                write!(out, r#" {name}="{}""#, escape_html(&items.join(" "))).unwrap();
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
