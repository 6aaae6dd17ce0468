//! Component registry: node type to rendering function.
//!
//! Resolution for a hypertext node, first match wins:
//!
//! 1. an override registered for the node's tag name (e.g. `h1`)
//! 2. an override registered for the node's syntax kind (e.g. `heading`)
//! 3. the built-in rendering for the node
//! 4. the generic fallback for unrecognized kinds

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use mdom_hast::HastNode;
use mdom_syntax::{NodeKind, Properties};

use crate::element::RenderedNode;
use crate::factory::{ElementFactory, Props};

/// Tag name of the element wrapping the document root.
pub const CONTAINER_TAG: &str = "div";

/// Error returned by a failing component.
pub type ComponentError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a component receives for one node.
pub struct ComponentProps {
    /// Tag the default rendering would use (`None` for text and raw HTML).
    pub tag: Option<String>,
    /// Syntax kind of the node, if known.
    pub kind: Option<NodeKind>,
    /// Reconciliation key assigned to the node.
    pub key: String,
    pub properties: Properties,
    /// Children, already rendered. Text and raw nodes receive their content
    /// as a single child.
    pub children: Vec<RenderedNode>,
    /// Element factory of the current render call.
    pub factory: Arc<dyn ElementFactory>,
}

impl ComponentProps {
    /// Create an element with the given tag from these props and children.
    #[must_use]
    pub fn create_element(self, tag: &str) -> RenderedNode {
        let props = Props::new(self.key, self.properties);
        RenderedNode::Element(self.factory.create_element(tag, props, self.children))
    }
}

impl fmt::Debug for ComponentProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentProps")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("properties", &self.properties)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

/// Custom rendering for a node type.
///
/// A component fully replaces the default rendering of the nodes it is
/// registered for; its output is used as is. Closures taking
/// [`ComponentProps`] implement this trait.
pub trait Component: Send + Sync {
    fn render(&self, props: ComponentProps) -> Result<RenderedNode, ComponentError>;
}

impl<F> Component for F
where
    F: Fn(ComponentProps) -> Result<RenderedNode, ComponentError> + Send + Sync,
{
    fn render(&self, props: ComponentProps) -> Result<RenderedNode, ComponentError> {
        self(props)
    }
}

/// What an override is registered for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKey {
    /// Hypertext tag name, e.g. `h1` or `code`.
    Tag(String),
    /// Syntax node kind, e.g. [`NodeKind::Heading`].
    Kind(NodeKind),
}

impl ComponentKey {
    #[must_use]
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }

    #[must_use]
    pub fn kind(kind: impl Into<NodeKind>) -> Self {
        Self::Kind(kind.into())
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "<{tag}>"),
            Self::Kind(kind) => write!(f, "{kind}"),
        }
    }
}

/// Built-in rendering behaviours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuiltIn {
    /// Root: a single [`CONTAINER_TAG`] element around the top-level nodes.
    Container,
    /// Recognized element: created with its own tag and properties.
    Element,
    /// Text: emitted as plain text, never wrapped.
    Text,
    /// Raw HTML: emitted verbatim.
    Raw,
}

/// Outcome of [`Components::resolve`].
#[derive(Clone)]
pub enum Resolved<'a> {
    Override {
        key: &'a ComponentKey,
        component: &'a Arc<dyn Component>,
    },
    BuiltIn(BuiltIn),
    /// Unrecognized kind: element named after the kind, all properties kept.
    Fallback,
}

impl fmt::Debug for Resolved<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override { key, .. } => f.debug_tuple("Override").field(key).finish(),
            Self::BuiltIn(builtin) => f.debug_tuple("BuiltIn").field(builtin).finish(),
            Self::Fallback => f.write_str("Fallback"),
        }
    }
}

/// Component overrides for one render configuration.
#[derive(Clone, Default)]
pub struct Components {
    overrides: HashMap<ComponentKey, Arc<dyn Component>>,
}

impl Components {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override, replacing any previous one for the same key.
    pub fn insert<C: Component + 'static>(&mut self, key: ComponentKey, component: C) {
        self.overrides.insert(key, Arc::new(component));
    }

    #[must_use]
    pub fn with<C: Component + 'static>(mut self, key: ComponentKey, component: C) -> Self {
        self.insert(key, component);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    /// Resolve the rendering function for a hypertext node.
    #[must_use]
    pub fn resolve(&self, node: &HastNode) -> Resolved<'_> {
        if let Some(resolved) = self.find_override(node) {
            return resolved;
        }
        match node {
            HastNode::Root { .. } => Resolved::BuiltIn(BuiltIn::Container),
            HastNode::Text { .. } => Resolved::BuiltIn(BuiltIn::Text),
            HastNode::Raw { .. } => Resolved::BuiltIn(BuiltIn::Raw),
            HastNode::Element(element) => match &element.kind {
                Some(kind) if !kind.is_recognized() => Resolved::Fallback,
                _ => Resolved::BuiltIn(BuiltIn::Element),
            },
        }
    }

    fn find_override(&self, node: &HastNode) -> Option<Resolved<'_>> {
        if self.overrides.is_empty() {
            return None;
        }
        let tag = match node {
            HastNode::Root { .. } => Some(CONTAINER_TAG),
            HastNode::Element(element) => Some(element.tag.as_str()),
            HastNode::Text { .. } | HastNode::Raw { .. } => None,
        };
        let by_tag = tag.map(|tag| ComponentKey::Tag(tag.to_owned()));
        let by_kind = node.kind().map(|kind| ComponentKey::Kind(kind.clone()));

        [by_tag, by_kind].into_iter().flatten().find_map(|key| {
            self.overrides
                .get_key_value(&key)
                .map(|(key, component)| Resolved::Override { key, component })
        })
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.overrides.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use mdom_hast::Element;

    use super::*;

    fn noop(props: ComponentProps) -> Result<RenderedNode, ComponentError> {
        Ok(props.create_element("noop"))
    }

    fn heading() -> HastNode {
        Element::new("h1").with_kind(NodeKind::Heading).into()
    }

    #[test]
    fn test_builtins_without_overrides() {
        let components = Components::new();
        assert!(matches!(
            components.resolve(&HastNode::root(Vec::new())),
            Resolved::BuiltIn(BuiltIn::Container)
        ));
        assert!(matches!(
            components.resolve(&HastNode::text("x")),
            Resolved::BuiltIn(BuiltIn::Text)
        ));
        assert!(matches!(
            components.resolve(&HastNode::raw("<b>")),
            Resolved::BuiltIn(BuiltIn::Raw)
        ));
        assert!(matches!(
            components.resolve(&heading()),
            Resolved::BuiltIn(BuiltIn::Element)
        ));
    }

    #[test]
    fn test_unrecognized_kind_falls_back() {
        let node = Element::new("callout")
            .with_kind(NodeKind::from("callout"))
            .into();
        assert!(matches!(Components::new().resolve(&node), Resolved::Fallback));
    }

    #[test]
    fn test_kind_override() {
        let components = Components::new().with(ComponentKey::kind("heading"), noop);
        match components.resolve(&heading()) {
            Resolved::Override { key, .. } => {
                assert_eq!(key, &ComponentKey::Kind(NodeKind::Heading));
            }
            other => panic!("expected override, got {other:?}"),
        }
    }

    #[test]
    fn test_tag_override_wins_over_kind() {
        let components = Components::new()
            .with(ComponentKey::kind(NodeKind::Heading), noop)
            .with(ComponentKey::tag("h1"), noop);
        match components.resolve(&heading()) {
            Resolved::Override { key, .. } => assert_eq!(key, &ComponentKey::tag("h1")),
            other => panic!("expected override, got {other:?}"),
        }
    }

    #[test]
    fn test_override_for_other_tag_ignored() {
        let components = Components::new().with(ComponentKey::tag("h2"), noop);
        assert!(matches!(
            components.resolve(&heading()),
            Resolved::BuiltIn(BuiltIn::Element)
        ));
    }

    #[test]
    fn test_container_tag_override_applies_to_root() {
        let components = Components::new().with(ComponentKey::tag(CONTAINER_TAG), noop);
        assert!(matches!(
            components.resolve(&HastNode::root(Vec::new())),
            Resolved::Override { .. }
        ));
    }

    #[test]
    fn test_text_override_by_kind() {
        let components = Components::new().with(ComponentKey::kind(NodeKind::Text), noop);
        assert!(matches!(
            components.resolve(&HastNode::text("x")),
            Resolved::Override { .. }
        ));
        assert_eq!(components.len(), 1);
    }
}
