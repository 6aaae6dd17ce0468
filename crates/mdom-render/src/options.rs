//! Render configuration.

use std::fmt;
use std::sync::Arc;

use mdom_hast::HypertextOptions;
use mdom_syntax::ParseOptions;

use crate::component::{Component, ComponentKey, Components};
use crate::factory::{DefaultFactory, ElementFactory};
use crate::transform::Sanitize;

/// Default prefix of reconciliation keys.
pub const DEFAULT_KEY_PREFIX: &str = "h";

/// Default maximum nesting depth below the root.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Configuration for one or more render calls.
///
/// All fields have working defaults; `RenderOptions::default()` renders with
/// the built-in element factory, no overrides and sanitization enabled.
#[derive(Clone)]
pub struct RenderOptions {
    /// Factory used to create every output element.
    pub factory: Arc<dyn ElementFactory>,
    /// Component overrides.
    pub components: Components,
    /// Sanitization applied to the hypertext tree.
    pub sanitize: Sanitize,
    /// Options forwarded to the syntax-to-hypertext conversion.
    pub hypertext: HypertextOptions,
    /// Options for parsing markdown text in
    /// [`Renderer::render_markdown`](crate::Renderer::render_markdown).
    pub parse: ParseOptions,
    /// Prefix of every reconciliation key.
    pub key_prefix: String,
    /// Maximum nesting depth below the root before rendering is aborted.
    pub max_depth: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            factory: Arc::new(DefaultFactory),
            components: Components::new(),
            sanitize: Sanitize::default(),
            hypertext: HypertextOptions::default(),
            parse: ParseOptions::default(),
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RenderOptions {
    /// Use a custom element factory.
    #[must_use]
    pub fn with_factory(mut self, factory: Arc<dyn ElementFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Override rendering for a tag name or node kind.
    ///
    /// # Example
    ///
    /// ```
    /// use mdom_render::{
    ///     ComponentError, ComponentKey, ComponentProps, RenderOptions, RenderedNode, Renderer,
    ///     to_static_markup,
    /// };
    ///
    /// let options = RenderOptions::default().with_component(
    ///     ComponentKey::tag("h1"),
    ///     |props: ComponentProps| -> Result<RenderedNode, ComponentError> {
    ///         Ok(props.create_element("h2"))
    ///     },
    /// );
    /// let element = Renderer::new(options).render_markdown("# Foo").unwrap();
    /// assert_eq!(to_static_markup(&element), "<div><h2>Foo</h2></div>");
    /// ```
    #[must_use]
    pub fn with_component<C: Component + 'static>(
        mut self,
        key: ComponentKey,
        component: C,
    ) -> Self {
        self.components.insert(key, component);
        self
    }

    /// Replace all component overrides.
    #[must_use]
    pub fn with_components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    /// Enable, disable or customize sanitization.
    #[must_use]
    pub fn with_sanitize(mut self, sanitize: impl Into<Sanitize>) -> Self {
        self.sanitize = sanitize.into();
        self
    }

    #[must_use]
    pub fn with_hypertext(mut self, hypertext: HypertextOptions) -> Self {
        self.hypertext = hypertext;
        self
    }

    #[must_use]
    pub fn with_parse(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("components", &self.components)
            .field("sanitize", &self.sanitize)
            .field("hypertext", &self.hypertext)
            .field("parse", &self.parse)
            .field("key_prefix", &self.key_prefix)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}
