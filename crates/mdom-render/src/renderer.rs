//! Tree-walking renderer.
//!
//! The walk is depth-first: children are rendered in document order before
//! their parent's rendering function runs, and every node receives the key
//! of its position from the [`IdentityTrail`].

use std::sync::Arc;

use mdom_hast::HastNode;
use mdom_syntax::{NodeKind, Properties, SyntaxNode, parse};

use crate::component::{BuiltIn, CONTAINER_TAG, ComponentProps, Resolved};
use crate::element::{RenderedElement, RenderedNode};
use crate::error::RenderError;
use crate::factory::Props;
use crate::identity::IdentityTrail;
use crate::options::RenderOptions;
use crate::transform::prepare;

/// Renders syntax trees into keyed element trees.
///
/// A renderer holds no per-call state, so one instance can serve any number
/// of render calls, including concurrent ones.
///
/// # Example
///
/// ```
/// use mdom_render::{RenderOptions, Renderer};
///
/// let renderer = Renderer::new(RenderOptions::default());
/// let element = renderer.render_markdown("Hello *world*").unwrap();
///
/// assert_eq!(element.tag, "div");
/// assert_eq!(element.key.as_deref(), Some("h"));
/// assert_eq!(element.text_content(), "Hello world");
/// ```
#[derive(Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Parse markdown text and render it.
    ///
    /// # Errors
    ///
    /// See [`Renderer::render`].
    pub fn render_markdown(&self, markdown: &str) -> Result<RenderedElement, RenderError> {
        self.render(&parse(markdown, &self.options.parse))
    }

    /// Render a syntax tree.
    ///
    /// The tree is converted to hypertext (and sanitized, unless disabled)
    /// before rendering. The result is always a single container element
    /// keyed with the key prefix.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::DepthExceeded`] if the tree nests deeper than
    /// the configured maximum depth, or [`RenderError::Component`] if a
    /// component override fails.
    pub fn render(&self, tree: &SyntaxNode) -> Result<RenderedElement, RenderError> {
        let hast = self.prepare(tree)?;
        self.render_root(hast)
    }

    /// Convert and sanitize a syntax tree as configured, without rendering it.
    ///
    /// The nesting depth of `tree` is checked before conversion, so overly
    /// deep input is rejected before any recursive pass runs over it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::DepthExceeded`] if the tree nests deeper than
    /// the configured maximum depth.
    pub fn prepare(&self, tree: &SyntaxNode) -> Result<HastNode, RenderError> {
        // A non-root tree is placed under a new root.
        let depth = match tree.kind {
            NodeKind::Root => tree.depth(),
            _ => tree.depth() + 1,
        };
        if depth > self.options.max_depth {
            tracing::debug!(depth, limit = self.options.max_depth, "Rejecting deep tree");
            return Err(RenderError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(prepare(tree, &self.options.sanitize, &self.options.hypertext))
    }

    /// Render an already prepared hypertext tree.
    ///
    /// No sanitization is applied. A non-root node is rendered as the only
    /// child of the container.
    ///
    /// # Errors
    ///
    /// See [`Renderer::render`].
    pub fn render_hypertext(&self, tree: &HastNode) -> Result<RenderedElement, RenderError> {
        let root = match tree {
            HastNode::Root { .. } => tree.clone(),
            other => HastNode::root(vec![other.clone()]),
        };
        self.render_root(root)
    }

    fn render_root(&self, root: HastNode) -> Result<RenderedElement, RenderError> {
        let mut trail = IdentityTrail::new(&self.options.key_prefix, self.options.max_depth);
        match self.visit(root, &mut trail)? {
            RenderedNode::Element(element) => Ok(element),
            // A root override returned text or raw HTML; keep the container.
            other => Ok(self.options.factory.create_element(
                CONTAINER_TAG,
                Props::new(trail.key(), Properties::new()),
                vec![other],
            )),
        }
    }

    fn visit(
        &self,
        node: HastNode,
        trail: &mut IdentityTrail,
    ) -> Result<RenderedNode, RenderError> {
        let resolved = self.options.components.resolve(&node);
        let kind = node.kind().cloned();
        let (tag, properties, children) = match node {
            HastNode::Root { children } => (
                Some(CONTAINER_TAG.to_owned()),
                Properties::new(),
                self.visit_children(children, trail)?,
            ),
            HastNode::Element(element) => (
                Some(element.tag),
                element.properties,
                self.visit_children(element.children, trail)?,
            ),
            HastNode::Text { value } => (None, Properties::new(), vec![RenderedNode::Text(value)]),
            HastNode::Raw { value } => (None, Properties::new(), vec![RenderedNode::Raw(value)]),
        };

        match resolved {
            Resolved::Override { key, component } => {
                let props = ComponentProps {
                    tag,
                    kind,
                    key: trail.key().to_owned(),
                    properties,
                    children,
                    factory: Arc::clone(&self.options.factory),
                };
                component
                    .render(props)
                    .map_err(|source| RenderError::Component {
                        target: key.to_string(),
                        key: trail.key().to_owned(),
                        source,
                    })
            }
            // Text and raw HTML are emitted as is, never wrapped.
            Resolved::BuiltIn(BuiltIn::Text | BuiltIn::Raw) => Ok(children
                .into_iter()
                .next()
                .unwrap_or_else(|| RenderedNode::Text(String::new()))),
            Resolved::BuiltIn(BuiltIn::Container | BuiltIn::Element) => {
                let tag = tag.as_deref().unwrap_or(CONTAINER_TAG);
                Ok(self.create(tag, trail, properties, children))
            }
            Resolved::Fallback => {
                let tag = tag.unwrap_or_default();
                tracing::debug!(
                    kind = kind.as_ref().map(NodeKind::as_str),
                    key = trail.key(),
                    "No component for node kind, using generic element"
                );
                Ok(self.create(&tag, trail, properties, children))
            }
        }
    }

    fn visit_children(
        &self,
        children: Vec<HastNode>,
        trail: &mut IdentityTrail,
    ) -> Result<Vec<RenderedNode>, RenderError> {
        let mut rendered = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            trail.descend(index)?;
            let result = self.visit(child, trail);
            trail.ascend();
            rendered.push(result?);
        }
        Ok(rendered)
    }

    fn create(
        &self,
        tag: &str,
        trail: &IdentityTrail,
        properties: Properties,
        children: Vec<RenderedNode>,
    ) -> RenderedNode {
        let props = Props::new(trail.key(), properties);
        RenderedNode::Element(self.options.factory.create_element(tag, props, children))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use mdom_hast::Element;
    use mdom_syntax::PropertyValue;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::component::{ComponentError, ComponentKey};
    use crate::markup::to_static_markup;

    fn render(markdown: &str) -> RenderedElement {
        Renderer::default().render_markdown(markdown).unwrap()
    }

    fn markup(markdown: &str) -> String {
        to_static_markup(&render(markdown))
    }

    #[test]
    fn test_empty_document() {
        let element = render("");
        assert_eq!(element.tag, "div");
        assert_eq!(element.key.as_deref(), Some("h"));
        assert!(element.children.is_empty());
    }

    #[test]
    fn test_heading() {
        assert_eq!(markup("# Hello"), "<div><h1>Hello</h1></div>");
    }

    #[test]
    fn test_paragraph_with_emphasis() {
        assert_eq!(
            markup("Hello *world*"),
            "<div><p>Hello <em>world</em></p></div>"
        );
    }

    #[test]
    fn test_block_separators_are_text() {
        assert_eq!(
            markup("# A\n\nB"),
            "<div><h1>A</h1>\n<p>B</p></div>"
        );
    }

    #[test]
    fn test_keys_follow_positions() {
        let element = render("# A **bold** heading");
        assert_eq!(element.keys(), vec!["h", "h-0", "h-0-1"]);
    }

    #[test]
    fn test_text_counts_toward_sibling_index() {
        // The "\n" between the blocks occupies index 1.
        let element = render("# A\n\nB");
        assert_eq!(element.keys(), vec!["h", "h-0", "h-2"]);
    }

    #[test]
    fn test_custom_key_prefix() {
        let renderer = Renderer::new(RenderOptions::default().with_key_prefix("doc"));
        let element = renderer.render_markdown("# A").unwrap();
        assert_eq!(element.keys(), vec!["doc", "doc-0"]);
    }

    #[test]
    fn test_tag_override() {
        let options = RenderOptions::default().with_component(
            ComponentKey::tag("h1"),
            |props: ComponentProps| -> Result<RenderedNode, ComponentError> {
                Ok(props.create_element("h2"))
            },
        );
        let element = Renderer::new(options).render_markdown("# Foo").unwrap();
        assert_eq!(to_static_markup(&element), "<div><h2>Foo</h2></div>");
    }

    #[test]
    fn test_override_receives_node_data() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let options = RenderOptions::default().with_component(
            ComponentKey::kind(NodeKind::Link),
            move |props: ComponentProps| -> Result<RenderedNode, ComponentError> {
                sink.lock().unwrap().push((
                    props.tag.clone(),
                    props.kind.clone(),
                    props.key.clone(),
                    props.properties.get("href").cloned(),
                ));
                Ok(props.create_element("a"))
            },
        );
        Renderer::new(options)
            .render_markdown("[x](https://example.com)")
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![(
                Some("a".to_owned()),
                Some(NodeKind::Link),
                "h-0-0".to_owned(),
                Some(PropertyValue::from("https://example.com")),
            )]
        );
    }

    #[test]
    fn test_text_override_gets_single_child() {
        let options = RenderOptions::default().with_component(
            ComponentKey::kind(NodeKind::Text),
            |props: ComponentProps| -> Result<RenderedNode, ComponentError> {
                Ok(props.create_element("span"))
            },
        );
        let element = Renderer::new(options).render_markdown("hi").unwrap();
        assert_eq!(to_static_markup(&element), "<div><p><span>hi</span></p></div>");
    }

    #[test]
    fn test_root_override_returning_text_is_wrapped() {
        let options = RenderOptions::default().with_component(
            ComponentKey::kind(NodeKind::Root),
            |_: ComponentProps| -> Result<RenderedNode, ComponentError> {
                Ok(RenderedNode::Text("replaced".to_owned()))
            },
        );
        let element = Renderer::new(options).render_markdown("# A").unwrap();
        assert_eq!(element.key.as_deref(), Some("h"));
        assert_eq!(to_static_markup(&element), "<div>replaced</div>");
    }

    #[test]
    fn test_component_error_propagates() {
        let options = RenderOptions::default().with_component(
            ComponentKey::tag("em"),
            |_: ComponentProps| -> Result<RenderedNode, ComponentError> {
                Err("boom".into())
            },
        );
        let err = Renderer::new(options)
            .render_markdown("a *b*")
            .unwrap_err();
        match err {
            RenderError::Component { target, key, source } => {
                assert_eq!(target, "<em>");
                assert_eq!(key, "h-0-1");
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_depth_guard() {
        let renderer = Renderer::new(RenderOptions::default().with_max_depth(2));
        assert!(renderer.render_markdown("a").is_ok());
        let err = renderer.render_markdown("> > a").unwrap_err();
        assert!(matches!(err, RenderError::DepthExceeded { limit: 2 }));
    }

    #[test]
    fn test_deep_markdown_is_rejected_before_conversion() {
        let err = Renderer::default()
            .render_markdown(&">".repeat(5_000))
            .unwrap_err();
        assert!(matches!(err, RenderError::DepthExceeded { limit: 512 }));
    }

    #[test]
    fn test_prepare_checks_depth() {
        let renderer = Renderer::new(RenderOptions::default().with_max_depth(2));
        let shallow = SyntaxNode::root(vec![SyntaxNode::parent(
            NodeKind::Paragraph,
            vec![SyntaxNode::text("a")],
        )]);
        assert!(renderer.prepare(&shallow).is_ok());

        // Without a root the paragraph moves one level down.
        let paragraph = SyntaxNode::parent(
            NodeKind::Paragraph,
            vec![SyntaxNode::parent(NodeKind::Emphasis, vec![SyntaxNode::text("a")])],
        );
        assert!(matches!(
            renderer.prepare(&paragraph),
            Err(RenderError::DepthExceeded { limit: 2 })
        ));
    }

    #[test]
    fn test_unknown_kind_renders_generic_element() {
        let tree = SyntaxNode::root(vec![
            SyntaxNode::parent("callout", vec![SyntaxNode::text("note")])
                .with_property("level", "info"),
        ]);
        let renderer = Renderer::new(RenderOptions::default().with_sanitize(false));
        let element = renderer.render(&tree).unwrap();
        assert_eq!(
            to_static_markup(&element),
            r#"<div><callout level="info">note</callout></div>"#
        );
    }

    #[test]
    fn test_render_hypertext_wraps_non_root() {
        let node: HastNode = Element::new("p")
            .with_children(vec![HastNode::text("x")])
            .into();
        let element = Renderer::default().render_hypertext(&node).unwrap();
        assert_eq!(to_static_markup(&element), "<div><p>x</p></div>");
        assert_eq!(element.keys(), vec!["h", "h-0"]);
    }

    #[test]
    fn test_renderer_is_reusable() {
        let renderer = Renderer::default();
        let first = renderer.render_markdown("- a\n- b").unwrap();
        let second = renderer.render_markdown("- a\n- b").unwrap();
        assert_eq!(first, second);
    }
}
