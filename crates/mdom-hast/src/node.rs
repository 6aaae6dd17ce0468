//! Hypertext tree nodes.

use mdom_syntax::{NodeKind, Properties, PropertyValue};

static ROOT_KIND: NodeKind = NodeKind::Root;
static TEXT_KIND: NodeKind = NodeKind::Text;
static HTML_KIND: NodeKind = NodeKind::Html;

/// A node of the hypertext tree.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum HastNode {
    /// Document root.
    Root {
        children: Vec<HastNode>,
    },
    Element(Element),
    Text {
        value: String,
    },
    /// Raw HTML passed through without parsing.
    Raw {
        value: String,
    },
}

/// An HTML element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Element {
    /// Tag name (`h1`, `pre`, `a`, ...).
    pub tag: String,
    /// Attributes, keyed by HTML attribute name.
    pub properties: Properties,
    pub children: Vec<HastNode>,
    /// Syntax node kind this element was produced from.
    ///
    /// Only the outermost element generated for a syntax node carries its
    /// kind; wrapper internals such as the `code` inside `pre` carry `None`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub kind: Option<NodeKind>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            properties: Properties::new(),
            children: Vec::new(),
            kind: None,
        }
    }

    #[must_use]
    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties.extend(properties);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<HastNode>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

impl HastNode {
    #[must_use]
    pub fn root(children: Vec<HastNode>) -> Self {
        Self::Root { children }
    }

    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    #[must_use]
    pub fn raw(value: impl Into<String>) -> Self {
        Self::Raw {
            value: value.into(),
        }
    }

    /// Child nodes; empty for text and raw nodes.
    #[must_use]
    pub fn children(&self) -> &[HastNode] {
        match self {
            Self::Root { children } => children,
            Self::Element(element) => &element.children,
            Self::Text { .. } | Self::Raw { .. } => &[],
        }
    }

    /// Syntax node kind this node corresponds to, if known.
    ///
    /// Text maps to [`NodeKind::Text`] and raw HTML to [`NodeKind::Html`].
    #[must_use]
    pub fn kind(&self) -> Option<&NodeKind> {
        match self {
            Self::Root { .. } => Some(&ROOT_KIND),
            Self::Element(element) => element.kind.as_ref(),
            Self::Text { .. } => Some(&TEXT_KIND),
            Self::Raw { .. } => Some(&HTML_KIND),
        }
    }
}

impl From<Element> for HastNode {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}
