//! Hypertext tree for rendered markdown.
//!
//! The hypertext tree is shaped after HTML: elements with tag names and
//! attributes, text, and raw HTML fragments. It sits between the markdown
//! [`SyntaxNode`](mdom_syntax::SyntaxNode) tree and element renderers.
//!
//! Two passes are provided:
//!
//! - [`to_hypertext`]: converts a syntax tree into a hypertext tree
//! - [`sanitize`]: strips elements and attributes not allowed by a [`Schema`]
//!
//! # Example
//!
//! ```
//! use mdom_hast::{HypertextOptions, Schema, sanitize, to_hypertext};
//! use mdom_syntax::{ParseOptions, parse};
//!
//! let tree = parse("```rust\nfn main() {}\n```", &ParseOptions::default());
//! let hast = to_hypertext(&tree, &HypertextOptions::default());
//! let clean = sanitize(hast, Schema::github());
//! assert_eq!(clean.children().len(), 1);
//! ```

mod convert;
mod node;
mod sanitize;

pub use convert::{HypertextOptions, to_hypertext};
pub use node::{Element, HastNode};
pub use sanitize::{Schema, sanitize};
