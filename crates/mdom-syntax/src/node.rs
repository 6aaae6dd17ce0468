//! Syntax tree nodes.

use crate::kind::NodeKind;
use crate::property::{Properties, PropertyValue};

/// A node of the markdown syntax tree.
///
/// Leaves (text, inline code, raw HTML, ...) carry a `value`; containers carry
/// `children`. Trees own their nodes outright and have no parent links.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyntaxNode {
    /// Type tag.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: NodeKind,
    /// Node attributes (heading depth, link URL, code language, ...).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Properties::is_empty")
    )]
    pub properties: Properties,
    /// Raw text of leaf nodes.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub value: Option<String>,
    /// Child nodes in document order.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Create a container node.
    #[must_use]
    pub fn parent(kind: impl Into<NodeKind>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: kind.into(),
            properties: Properties::new(),
            value: None,
            children,
        }
    }

    /// Create a document root.
    #[must_use]
    pub fn root(children: Vec<SyntaxNode>) -> Self {
        Self::parent(NodeKind::Root, children)
    }

    /// Create a leaf node holding raw text.
    #[must_use]
    pub fn leaf(kind: impl Into<NodeKind>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            properties: Properties::new(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// Create a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::leaf(NodeKind::Text, value)
    }

    /// Set a property, returning the node.
    #[must_use]
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Look up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Whether the node carries a value instead of children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.value.is_some() && self.children.is_empty()
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if let Some(value) = &node.value {
                out.push_str(value);
            }
            pending.extend(node.children.iter().rev());
        }
        out
    }

    /// Number of levels below this node; a node without children has depth 0.
    ///
    /// Measured without recursion, so it is safe on arbitrarily deep trees.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

// Flatten the tree before dropping so deep nesting cannot exhaust the stack.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
