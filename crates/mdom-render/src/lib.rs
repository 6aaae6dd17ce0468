//! Keyed element-tree renderer for markdown syntax trees.
//!
//! Rendering runs in two stages. A syntax tree is first converted into a
//! hypertext tree and, unless disabled, sanitized. The hypertext tree is
//! then walked depth-first; each node is rendered by a component override
//! or by its built-in rendering, and every produced element carries a
//! reconciliation key derived from its position.
//!
//! # Example
//!
//! ```
//! use mdom_render::{
//!     ComponentError, ComponentKey, ComponentProps, NodeKind, RenderOptions, RenderedNode,
//!     Renderer, to_static_markup,
//! };
//!
//! let options = RenderOptions::default().with_component(
//!     ComponentKey::kind(NodeKind::Strong),
//!     |props: ComponentProps| -> Result<RenderedNode, ComponentError> {
//!         Ok(props.create_element("b"))
//!     },
//! );
//! let element = Renderer::new(options).render_markdown("a **b**").unwrap();
//!
//! assert_eq!(to_static_markup(&element), "<div><p>a <b>b</b></p></div>");
//! assert_eq!(element.keys(), vec!["h", "h-0", "h-0-1"]);
//! ```

mod component;
mod element;
mod error;
mod factory;
mod identity;
mod markup;
mod options;
mod renderer;
mod transform;

pub use component::{
    BuiltIn, CONTAINER_TAG, Component, ComponentError, ComponentKey, ComponentProps, Components,
    Resolved,
};
pub use element::{RenderedElement, RenderedNode};
pub use error::RenderError;
pub use factory::{DefaultFactory, ElementFactory, Props};
pub use identity::IdentityTrail;
pub use markup::{escape_html, to_static_markup};
pub use options::{DEFAULT_KEY_PREFIX, DEFAULT_MAX_DEPTH, RenderOptions};
pub use renderer::Renderer;
pub use transform::{Sanitize, prepare};

pub use mdom_hast::{HastNode, HypertextOptions, Schema};
pub use mdom_syntax::{NodeKind, ParseOptions, Properties, PropertyValue, SyntaxNode};
