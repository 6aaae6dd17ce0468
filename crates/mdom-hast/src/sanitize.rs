//! Allow-list based hypertext sanitization.
//!
//! A [`Schema`] lists the tag names, attributes and URL protocols that may
//! survive. Everything else is removed:
//!
//! - raw HTML nodes are dropped
//! - elements in [`Schema::strip`] are dropped together with their content
//! - other disallowed elements are replaced by their (sanitized) children
//! - disallowed attributes are removed from allowed elements
//! - `id`/`name` values are prefixed to avoid clobbering page globals

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use mdom_syntax::{Properties, PropertyValue};

use crate::node::{Element, HastNode};

/// Attribute key in [`Schema::attributes`] that applies to every tag.
const ANY_TAG: &str = "*";

const GITHUB_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "br", "b", "i", "strong", "em", "a", "pre", "code", "img",
    "tt", "div", "ins", "del", "sup", "sub", "p", "ol", "ul", "table", "thead", "tbody", "tfoot",
    "blockquote", "dl", "dt", "dd", "kbd", "q", "samp", "var", "hr", "ruby", "rt", "rp", "li",
    "tr", "td", "th", "s", "strike", "summary", "details", "caption", "figure", "figcaption",
    "abbr", "bdo", "cite", "dfn", "mark", "small", "span", "time", "wbr", "input",
];

const GITHUB_GLOBAL_ATTRIBUTES: &[&str] = &[
    "abbr", "accept", "accept-charset", "accesskey", "action", "align", "alt", "axis", "border",
    "cellpadding", "cellspacing", "char", "charoff", "charset", "checked", "clear", "cols",
    "colspan", "color", "compact", "coords", "datetime", "dir", "disabled", "enctype", "for",
    "frame", "headers", "height", "hreflang", "hspace", "id", "ismap", "label", "lang",
    "maxlength", "media", "method", "multiple", "name", "nohref", "noshade", "nowrap", "open",
    "prompt", "readonly", "rel", "rev", "rows", "rowspan", "rules", "scope", "selected", "shape",
    "size", "span", "start", "summary", "tabindex", "target", "title", "type", "usemap",
    "valign", "value", "vspace", "width", "itemprop",
];

static GITHUB_SCHEMA: LazyLock<Schema> = LazyLock::new(Schema::build_github);

/// Sanitization rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    /// Tag names that may appear in the output.
    pub tag_names: BTreeSet<String>,
    /// Allowed attributes per tag name; the `*` entry applies to all tags.
    pub attributes: BTreeMap<String, BTreeSet<String>>,
    /// Allowed URL protocols per attribute. Relative URLs are always allowed.
    pub protocols: BTreeMap<String, BTreeSet<String>>,
    /// Tags removed together with their content.
    pub strip: BTreeSet<String>,
    /// Attributes whose values receive [`Schema::clobber_prefix`].
    pub clobber: BTreeSet<String>,
    pub clobber_prefix: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self::github().clone()
    }
}

impl Schema {
    /// GitHub-style schema used when sanitization is enabled without a
    /// custom schema. It does not allow `class`.
    #[must_use]
    pub fn github() -> &'static Schema {
        &GITHUB_SCHEMA
    }

    fn build_github() -> Self {
        let set = |items: &[&str]| items.iter().map(|s| (*s).to_owned()).collect::<BTreeSet<_>>();

        let attributes = BTreeMap::from([
            (ANY_TAG.to_owned(), set(GITHUB_GLOBAL_ATTRIBUTES)),
            ("a".to_owned(), set(&["href"])),
            ("img".to_owned(), set(&["src", "longdesc"])),
            ("input".to_owned(), set(&["type", "checked", "disabled"])),
            ("div".to_owned(), set(&["itemscope", "itemtype"])),
            ("blockquote".to_owned(), set(&["cite"])),
            ("del".to_owned(), set(&["cite"])),
            ("ins".to_owned(), set(&["cite"])),
            ("q".to_owned(), set(&["cite"])),
        ]);

        let protocols = BTreeMap::from([
            ("href".to_owned(), set(&["http", "https", "mailto"])),
            ("cite".to_owned(), set(&["http", "https"])),
            ("src".to_owned(), set(&["http", "https"])),
            ("longdesc".to_owned(), set(&["http", "https"])),
        ]);

        Self {
            tag_names: set(GITHUB_TAGS),
            attributes,
            protocols,
            strip: set(&["script", "style"]),
            clobber: set(&["id", "name"]),
            clobber_prefix: "user-content-".to_owned(),
        }
    }

    /// Allow an additional attribute on a tag (`*` for every tag).
    #[must_use]
    pub fn allow_attribute(mut self, tag: &str, attribute: &str) -> Self {
        self.attributes
            .entry(tag.to_owned())
            .or_default()
            .insert(attribute.to_owned());
        self
    }

    /// Allow an additional tag name.
    #[must_use]
    pub fn allow_tag(mut self, tag: &str) -> Self {
        self.tag_names.insert(tag.to_owned());
        self
    }

    fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        [tag, ANY_TAG].iter().any(|key| {
            self.attributes
                .get(*key)
                .is_some_and(|allowed| allowed.contains(attribute))
        })
    }

    fn clobber_value(&self, value: String) -> String {
        if value.starts_with(&self.clobber_prefix) {
            value
        } else {
            format!("{}{value}", self.clobber_prefix)
        }
    }

    fn allows_url(&self, attribute: &str, url: &str) -> bool {
        let Some(allowed) = self.protocols.get(attribute) else {
            return true;
        };
        match url_protocol(url) {
            Some(protocol) => allowed.contains(&protocol.to_ascii_lowercase()),
            None => true,
        }
    }
}

/// Sanitize a hypertext tree according to `schema`.
pub fn sanitize(node: HastNode, schema: &Schema) -> HastNode {
    match node {
        HastNode::Root { children } => HastNode::root(sanitize_all(children, schema)),
        other => HastNode::root(sanitize_one(other, schema)),
    }
}

fn sanitize_all(nodes: Vec<HastNode>, schema: &Schema) -> Vec<HastNode> {
    nodes
        .into_iter()
        .flat_map(|node| sanitize_one(node, schema))
        .collect()
}

fn sanitize_one(node: HastNode, schema: &Schema) -> Vec<HastNode> {
    match node {
        HastNode::Root { children } => sanitize_all(children, schema),
        HastNode::Text { .. } => vec![node],
        HastNode::Raw { .. } => {
            tracing::trace!("Removing raw HTML during sanitization");
            Vec::new()
        }
        HastNode::Element(element) => sanitize_element(element, schema),
    }
}

fn sanitize_element(element: Element, schema: &Schema) -> Vec<HastNode> {
    if schema.strip.contains(&element.tag) {
        return Vec::new();
    }
    let children = sanitize_all(element.children, schema);
    if !schema.tag_names.contains(&element.tag) {
        tracing::trace!(tag = %element.tag, "Unwrapping disallowed element");
        return children;
    }
    let properties = sanitize_properties(&element.tag, element.properties, schema);
    vec![HastNode::Element(Element {
        tag: element.tag,
        properties,
        children,
        kind: element.kind,
    })]
}

fn sanitize_properties(tag: &str, properties: Properties, schema: &Schema) -> Properties {
    properties
        .into_iter()
        .filter(|(name, _)| schema.allows_attribute(tag, name))
        .filter(|(name, value)| match value {
            PropertyValue::String(url) => schema.allows_url(name, url),
            // Lists are joined into one attribute value; every token must pass.
            PropertyValue::List(urls) => urls.iter().all(|url| schema.allows_url(name, url)),
            PropertyValue::Bool(_) | PropertyValue::Number(_) => true,
        })
        .map(|(name, value)| {
            if !schema.clobber.contains(&name) {
                return (name, value);
            }
            let value = match value {
                PropertyValue::String(s) => PropertyValue::String(schema.clobber_value(s)),
                PropertyValue::List(items) => PropertyValue::List(
                    items.into_iter().map(|s| schema.clobber_value(s)).collect(),
                ),
                other => other,
            };
            (name, value)
        })
        .collect()
}

/// Protocol of an absolute URL, or `None` for relative URLs.
fn url_protocol(url: &str) -> Option<&str> {
    let colon = url.find(':')?;
    let first_delimiter = url.find(['/', '?', '#']).unwrap_or(usize::MAX);
    (colon < first_delimiter).then(|| &url[..colon])
}
