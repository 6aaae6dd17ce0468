//! Element construction.

use mdom_syntax::Properties;

use crate::element::{RenderedElement, RenderedNode};

/// Props handed to an [`ElementFactory`]: the reconciliation key plus
/// element attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    pub key: Option<String>,
    pub attributes: Properties,
}

impl Props {
    #[must_use]
    pub fn new(key: impl Into<String>, attributes: Properties) -> Self {
        Self {
            key: Some(key.into()),
            attributes,
        }
    }
}

/// Creates elements from a tag, props and children.
///
/// The renderer calls the factory once per produced element. Any
/// `Fn(&str, Props, Vec<RenderedNode>) -> RenderedElement` closure is a
/// factory.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mdom_render::{
///     DefaultFactory, ElementFactory, Props, RenderOptions, RenderedElement, RenderedNode,
///     Renderer,
/// };
///
/// // Upper-case every tag name.
/// let factory = |tag: &str, props: Props, children: Vec<RenderedNode>| {
///     DefaultFactory.create_element(&tag.to_uppercase(), props, children)
/// };
/// let options = RenderOptions::default().with_factory(Arc::new(factory));
/// let element = Renderer::new(options).render_markdown("# Hi").unwrap();
/// assert_eq!(element.tag, "DIV");
/// ```
pub trait ElementFactory: Send + Sync {
    fn create_element(&self, tag: &str, props: Props, children: Vec<RenderedNode>)
    -> RenderedElement;
}

impl<F> ElementFactory for F
where
    F: Fn(&str, Props, Vec<RenderedNode>) -> RenderedElement + Send + Sync,
{
    fn create_element(
        &self,
        tag: &str,
        props: Props,
        children: Vec<RenderedNode>,
    ) -> RenderedElement {
        self(tag, props, children)
    }
}

/// Built-in factory: builds the element verbatim, moving the key out of the
/// props.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFactory;

impl ElementFactory for DefaultFactory {
    fn create_element(
        &self,
        tag: &str,
        props: Props,
        children: Vec<RenderedNode>,
    ) -> RenderedElement {
        RenderedElement {
            tag: tag.to_owned(),
            key: props.key,
            props: props.attributes,
            children,
        }
    }
}
