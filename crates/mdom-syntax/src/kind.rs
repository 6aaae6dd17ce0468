//! Syntax node type tags.

use std::fmt;

/// Type tag of a [`SyntaxNode`](crate::SyntaxNode).
///
/// Recognized markdown constructs have dedicated variants. Any other tag is
/// kept as [`NodeKind::Other`] so that trees produced by third-party tools
/// still round-trip through the pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum NodeKind {
    Root,
    Heading,
    Paragraph,
    Text,
    Emphasis,
    Strong,
    Delete,
    Link,
    Image,
    InlineCode,
    Code,
    Blockquote,
    List,
    ListItem,
    ThematicBreak,
    Break,
    Html,
    Table,
    TableRow,
    TableCell,
    /// Unrecognized type tag, stored as given.
    Other(String),
}

impl NodeKind {
    /// Type tag as it appears in serialized trees (e.g. `listItem`).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Delete => "delete",
            Self::Link => "link",
            Self::Image => "image",
            Self::InlineCode => "inlineCode",
            Self::Code => "code",
            Self::Blockquote => "blockquote",
            Self::List => "list",
            Self::ListItem => "listItem",
            Self::ThematicBreak => "thematicBreak",
            Self::Break => "break",
            Self::Html => "html",
            Self::Table => "table",
            Self::TableRow => "tableRow",
            Self::TableCell => "tableCell",
            Self::Other(name) => name,
        }
    }

    /// Whether this kind is part of the recognized vocabulary.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Whether nodes of this kind are block-level content.
    ///
    /// Block siblings are separated by newlines in the hypertext tree.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Heading
                | Self::Paragraph
                | Self::Code
                | Self::Blockquote
                | Self::List
                | Self::ListItem
                | Self::ThematicBreak
                | Self::Table
        )
    }
}

impl From<&str> for NodeKind {
    fn from(tag: &str) -> Self {
        match tag {
            "root" => Self::Root,
            "heading" => Self::Heading,
            "paragraph" => Self::Paragraph,
            "text" => Self::Text,
            "emphasis" => Self::Emphasis,
            "strong" => Self::Strong,
            "delete" => Self::Delete,
            "link" => Self::Link,
            "image" => Self::Image,
            "inlineCode" => Self::InlineCode,
            "code" => Self::Code,
            "blockquote" => Self::Blockquote,
            "list" => Self::List,
            "listItem" => Self::ListItem,
            "thematicBreak" => Self::ThematicBreak,
            "break" => Self::Break,
            "html" => Self::Html,
            "table" => Self::Table,
            "tableRow" => Self::TableRow,
            "tableCell" => Self::TableCell,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match Self::from(tag.as_str()) {
            Self::Other(_) => Self::Other(tag),
            kind => kind,
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(name) => name,
            kind => kind.as_str().to_owned(),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
