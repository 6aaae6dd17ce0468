//! Rendered element tree.

use mdom_syntax::Properties;

/// A node of the rendered output.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "lowercase")
)]
pub enum RenderedNode {
    Element(RenderedElement),
    /// Plain text, escaped when serialized.
    Text(String),
    /// Raw HTML, emitted verbatim when serialized.
    Raw(String),
}

/// A renderable element: tag, reconciliation key, props and children.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RenderedElement {
    pub tag: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub key: Option<String>,
    pub props: Properties,
    pub children: Vec<RenderedNode>,
}

impl RenderedElement {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            key: None,
            props: Properties::new(),
            children: Vec::new(),
        }
    }

    /// Keys of this element and all descendant elements, depth-first.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.collect_keys(&mut keys);
        keys
    }

    fn collect_keys<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(key) = &self.key {
            out.push(key);
        }
        for child in &self.children {
            if let RenderedNode::Element(element) = child {
                element.collect_keys(out);
            }
        }
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                RenderedNode::Element(element) => out.push_str(&element.text_content()),
                RenderedNode::Text(text) => out.push_str(text),
                RenderedNode::Raw(_) => {}
            }
        }
        out
    }

    /// Child elements, skipping text and raw nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &RenderedElement> {
        self.children.iter().filter_map(|child| match child {
            RenderedNode::Element(element) => Some(element),
            _ => None,
        })
    }
}

impl From<RenderedElement> for RenderedNode {
    fn from(element: RenderedElement) -> Self {
        Self::Element(element)
    }
}
