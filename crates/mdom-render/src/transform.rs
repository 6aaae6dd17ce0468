//! Syntax tree to hypertext tree pre-pass.
//!
//! Forwards exactly two settings to the hypertext stage: the sanitization
//! choice and the [`HypertextOptions`]. No conversion logic lives here.

use std::sync::Arc;

use mdom_hast::{HastNode, HypertextOptions, Schema, sanitize, to_hypertext};
use mdom_syntax::SyntaxNode;

/// Whether and how to sanitize the hypertext tree before rendering.
#[derive(Clone, Debug, Default)]
pub enum Sanitize {
    /// Keep every element and attribute produced by the conversion.
    Disabled,
    /// Sanitize with the GitHub-style default schema.
    #[default]
    Enabled,
    /// Sanitize with a custom schema.
    Schema(Arc<Schema>),
}

impl Sanitize {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    fn schema(&self) -> Option<&Schema> {
        match self {
            Self::Disabled => None,
            Self::Enabled => Some(Schema::github()),
            Self::Schema(schema) => Some(schema.as_ref()),
        }
    }
}

impl From<bool> for Sanitize {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

impl From<Schema> for Sanitize {
    fn from(schema: Schema) -> Self {
        Self::Schema(Arc::new(schema))
    }
}

/// Convert `tree` into the hypertext tree the renderer walks.
///
/// Conversion and sanitization recurse over the tree without a depth limit.
/// [`Renderer::prepare`](crate::Renderer::prepare) checks the configured
/// maximum depth first.
pub fn prepare(
    tree: &SyntaxNode,
    sanitize_with: &Sanitize,
    hypertext: &HypertextOptions,
) -> HastNode {
    let hast = to_hypertext(tree, hypertext);
    match sanitize_with.schema() {
        Some(schema) => sanitize(hast, schema),
        None => hast,
    }
}

#[cfg(test)]
mod tests {
    use mdom_hast::Element;
    use mdom_syntax::{NodeKind, ParseOptions, PropertyValue, parse};

    use super::*;

    fn code_element(hast: &HastNode) -> &Element {
        let [HastNode::Element(pre)] = hast.children() else {
            panic!("expected a single pre element");
        };
        let [HastNode::Element(code)] = pre.children.as_slice() else {
            panic!("expected a single code element");
        };
        code
    }

    fn code_tree() -> SyntaxNode {
        parse("```empty\n```", &ParseOptions::default())
    }

    #[test]
    fn test_sanitize_enabled_by_default() {
        let hast = prepare(&code_tree(), &Sanitize::default(), &HypertextOptions::default());
        assert!(code_element(&hast).properties.is_empty());
    }

    #[test]
    fn test_sanitize_disabled_keeps_class() {
        let hast = prepare(&code_tree(), &Sanitize::Disabled, &HypertextOptions::default());
        assert_eq!(
            code_element(&hast).properties.get("class"),
            Some(&PropertyValue::List(vec!["language-empty".to_owned()]))
        );
    }

    #[test]
    fn test_custom_schema() {
        let schema = Schema::default().allow_attribute("code", "class");
        let hast = prepare(&code_tree(), &Sanitize::from(schema), &HypertextOptions::default());
        assert!(code_element(&hast).properties.contains_key("class"));
    }

    #[test]
    fn test_raw_html_needs_option_and_no_sanitize() {
        let tree = SyntaxNode::root(vec![SyntaxNode::leaf(NodeKind::Html, "<i>x</i>")]);
        let allow = HypertextOptions {
            allow_dangerous_html: true,
        };

        let kept = prepare(&tree, &Sanitize::Disabled, &allow);
        assert_eq!(kept.children(), &[HastNode::raw("<i>x</i>")]);

        let not_allowed = prepare(&tree, &Sanitize::Disabled, &HypertextOptions::default());
        assert!(not_allowed.children().is_empty());

        let sanitized = prepare(&tree, &Sanitize::Enabled, &allow);
        assert!(sanitized.children().is_empty());
    }

    #[test]
    fn test_from_bool() {
        assert!(Sanitize::from(true).is_enabled());
        assert!(!Sanitize::from(false).is_enabled());
    }
}
