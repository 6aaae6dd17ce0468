//! Markdown syntax tree model.
//!
//! This crate defines [`SyntaxNode`], the typed tree that the rest of the
//! workspace consumes, and a [`parse`] function that builds such a tree from
//! markdown text using `pulldown-cmark`.
//!
//! # Node kinds
//!
//! Node kinds form a closed set of recognized markdown constructs plus
//! [`NodeKind::Other`], which carries any unrecognized type tag verbatim.
//! Unknown kinds are never an error; downstream stages treat them as opaque
//! containers.
//!
//! # Example
//!
//! ```
//! use mdom_syntax::{NodeKind, ParseOptions, parse};
//!
//! let tree = parse("# Hello\n\n**Bold** text", &ParseOptions::default());
//! assert_eq!(tree.kind, NodeKind::Root);
//! assert_eq!(tree.children[0].kind, NodeKind::Heading);
//! ```

mod kind;
mod node;
mod parser;
mod property;

pub use kind::NodeKind;
pub use node::SyntaxNode;
pub use parser::{ParseOptions, parse};
pub use property::{Properties, PropertyValue};
