//! Syntax tree to hypertext tree conversion.

use mdom_syntax::{NodeKind, Properties, PropertyValue, SyntaxNode};

use crate::node::{Element, HastNode};

/// Options for [`to_hypertext`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HypertextOptions {
    /// Keep `html` nodes as raw HTML instead of dropping them.
    pub allow_dangerous_html: bool,
}

/// Convert a syntax tree into a hypertext tree.
///
/// The result is always a [`HastNode::Root`]. A non-root input becomes the
/// sole content of a new root.
pub fn to_hypertext(node: &SyntaxNode, options: &HypertextOptions) -> HastNode {
    let converter = Converter { options };
    let children = if node.kind == NodeKind::Root {
        wrap(converter.all(&node.children), false)
    } else {
        converter.one(node)
    };
    HastNode::root(children)
}

struct Converter<'a> {
    options: &'a HypertextOptions,
}

impl Converter<'_> {
    fn all(&self, nodes: &[SyntaxNode]) -> Vec<HastNode> {
        nodes.iter().flat_map(|node| self.one(node)).collect()
    }

    /// Convert one node. Most nodes produce one hypertext node; dropped raw
    /// HTML produces none and line breaks produce two.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn one(&self, node: &SyntaxNode) -> Vec<HastNode> {
        let element = match &node.kind {
            NodeKind::Root => return wrap(self.all(&node.children), false),
            NodeKind::Text => return vec![HastNode::text(value_of(node))],
            NodeKind::Html => {
                if self.options.allow_dangerous_html {
                    return vec![HastNode::raw(value_of(node))];
                }
                tracing::trace!("Dropping raw HTML node");
                return Vec::new();
            }
            NodeKind::Break => {
                return vec![
                    self.element(node, "br", &[], Vec::new()).into(),
                    HastNode::text("\n"),
                ];
            }
            NodeKind::Heading => {
                let depth = number(node, "depth").map_or(1, |d| d.clamp(1.0, 6.0) as u8);
                self.element(node, &format!("h{depth}"), &["depth"], self.all(&node.children))
            }
            NodeKind::Paragraph => self.element(node, "p", &[], self.all(&node.children)),
            NodeKind::Emphasis => self.element(node, "em", &[], self.all(&node.children)),
            NodeKind::Strong => self.element(node, "strong", &[], self.all(&node.children)),
            NodeKind::Delete => self.element(node, "del", &[], self.all(&node.children)),
            NodeKind::InlineCode => {
                self.element(node, "code", &[], vec![HastNode::text(value_of(node))])
            }
            NodeKind::Code => self.code(node),
            NodeKind::Link => {
                let mut element =
                    self.element(node, "a", &["url", "title"], self.all(&node.children));
                copy(node, "url", &mut element, "href");
                copy(node, "title", &mut element, "title");
                element
            }
            NodeKind::Image => {
                let mut element = self.element(node, "img", &["url", "alt", "title"], Vec::new());
                copy(node, "url", &mut element, "src");
                copy(node, "alt", &mut element, "alt");
                copy(node, "title", &mut element, "title");
                element
            }
            NodeKind::Blockquote => {
                self.element(node, "blockquote", &[], wrap(self.all(&node.children), true))
            }
            NodeKind::List => self.list(node),
            NodeKind::ListItem => self.list_item(node),
            NodeKind::ThematicBreak => self.element(node, "hr", &[], Vec::new()),
            NodeKind::Table => self.table(node),
            NodeKind::TableRow => self.table_row(node, false),
            NodeKind::TableCell => self.table_cell(node, false),
            NodeKind::Other(name) => {
                if node.children.is_empty()
                    && let Some(value) = &node.value
                {
                    return vec![HastNode::text(value.clone())];
                }
                tracing::trace!(kind = %name, "Converting unrecognized node as generic element");
                self.element(node, name, &[], self.all(&node.children))
            }
        };
        vec![element.into()]
    }

    /// Element tagged with the node kind, carrying every node property not
    /// listed in `consumed`.
    #[allow(clippy::unused_self)]
    fn element(
        &self,
        node: &SyntaxNode,
        tag: &str,
        consumed: &[&str],
        children: Vec<HastNode>,
    ) -> Element {
        let properties: Properties = node
            .properties
            .iter()
            .filter(|(name, _)| !consumed.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Element::new(tag)
            .with_properties(properties)
            .with_children(children)
            .with_kind(node.kind.clone())
    }

    fn code(&self, node: &SyntaxNode) -> Element {
        let value = value_of(node);
        let mut code = Element::new("code");
        if let Some(lang) = node.property("lang").and_then(PropertyValue::as_str) {
            code = code.with_property("class", vec![format!("language-{lang}")]);
        }
        if !value.is_empty() {
            code = code.with_children(vec![HastNode::text(format!("{value}\n"))]);
        }
        self.element(node, "pre", &["lang", "meta"], vec![code.into()])
    }

    fn list(&self, node: &SyntaxNode) -> Element {
        let ordered = node
            .property("ordered")
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false);
        let tag = if ordered { "ol" } else { "ul" };
        let mut element = self.element(
            node,
            tag,
            &["ordered", "start", "spread"],
            wrap(self.all(&node.children), true),
        );
        if let Some(start) = number(node, "start")
            && ordered
            && (start - 1.0).abs() > f64::EPSILON
        {
            element = element.with_property("start", start);
        }
        element
    }

    fn list_item(&self, node: &SyntaxNode) -> Element {
        // Loose items wrap their content in paragraphs; tight items hold
        // inline content directly.
        let loose = node
            .property("spread")
            .and_then(PropertyValue::as_bool)
            .unwrap_or_else(|| node.children.iter().any(|c| c.kind == NodeKind::Paragraph));

        let mut children = Vec::new();
        if let Some(checked) = node.property("checked").and_then(PropertyValue::as_bool) {
            let mut input = Element::new("input")
                .with_property("type", "checkbox")
                .with_property("disabled", true);
            if checked {
                input = input.with_property("checked", true);
            }
            children.push(input.into());
            children.push(HastNode::text(" "));
        }

        let content = if loose {
            wrap(self.all(&node.children), true)
        } else {
            separate_blocks(&node.children, |child| self.one(child))
        };
        children.extend(content);
        self.element(node, "li", &["checked", "spread"], children)
    }

    fn table(&self, node: &SyntaxNode) -> Element {
        let (head, body) = match node.children.split_first() {
            Some((first, rest)) if is_header_row(first) => (Some(first), rest),
            _ => (None, node.children.as_slice()),
        };

        let mut sections = Vec::new();
        if let Some(head) = head {
            let row = self.table_row(head, true);
            sections.push(Element::new("thead").with_children(wrap(vec![row.into()], true)));
        }
        if !body.is_empty() {
            let rows: Vec<HastNode> = body
                .iter()
                .map(|row| self.table_row(row, false).into())
                .collect();
            sections.push(Element::new("tbody").with_children(wrap(rows, true)));
        }
        let sections: Vec<HastNode> = sections.into_iter().map(HastNode::from).collect();
        self.element(node, "table", &[], wrap(sections, true))
    }

    fn table_row(&self, node: &SyntaxNode, header: bool) -> Element {
        let cells: Vec<HastNode> = node
            .children
            .iter()
            .map(|cell| self.table_cell(cell, header).into())
            .collect();
        self.element(node, "tr", &["header"], wrap(cells, true))
    }

    fn table_cell(&self, node: &SyntaxNode, header: bool) -> Element {
        let header = header
            || node
                .property("header")
                .and_then(PropertyValue::as_bool)
                .unwrap_or(false);
        let tag = if header { "th" } else { "td" };
        self.element(node, tag, &["header"], self.all(&node.children))
    }
}

/// Interleave newline text nodes between siblings. Loose wrapping also adds
/// a newline before the first and after the last node.
fn wrap(nodes: Vec<HastNode>, loose: bool) -> Vec<HastNode> {
    let mut result = Vec::with_capacity(nodes.len() * 2 + 1);
    if loose {
        result.push(HastNode::text("\n"));
    }
    let empty = nodes.is_empty();
    for (index, node) in nodes.into_iter().enumerate() {
        if index > 0 {
            result.push(HastNode::text("\n"));
        }
        result.push(node);
    }
    if loose && !empty {
        result.push(HastNode::text("\n"));
    }
    result
}

/// Convert children, separating block-level children from their neighbours
/// with newlines while leaving inline runs untouched.
fn separate_blocks(
    children: &[SyntaxNode],
    mut convert: impl FnMut(&SyntaxNode) -> Vec<HastNode>,
) -> Vec<HastNode> {
    let mut result = Vec::new();
    let mut previous: Option<&SyntaxNode> = None;
    for child in children {
        if let Some(prev) = previous
            && (prev.kind.is_block() || child.kind.is_block())
        {
            result.push(HastNode::text("\n"));
        }
        result.extend(convert(child));
        previous = Some(child);
    }
    result
}

fn is_header_row(row: &SyntaxNode) -> bool {
    row.property("header")
        .and_then(PropertyValue::as_bool)
        .unwrap_or(false)
}

fn value_of(node: &SyntaxNode) -> String {
    node.value.clone().unwrap_or_default()
}

fn number(node: &SyntaxNode, name: &str) -> Option<f64> {
    node.property(name).and_then(PropertyValue::as_f64)
}

/// Copy a syntax property onto the element under an attribute name.
fn copy(node: &SyntaxNode, from: &str, element: &mut Element, to: &str) {
    if let Some(value) = node.property(from) {
        element.properties.insert(to.to_owned(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use mdom_syntax::{ParseOptions, parse};
    use pretty_assertions::assert_eq;

    use super::*;

    fn convert(markdown: &str) -> HastNode {
        let tree = parse(markdown, &ParseOptions::default());
        to_hypertext(&tree, &HypertextOptions::default())
    }

    fn first_element(node: &HastNode) -> &Element {
        match &node.children()[0] {
            HastNode::Element(element) => element,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_heading_levels() {
        let hast = convert("### Third");
        let heading = first_element(&hast);
        assert_eq!(heading.tag, "h3");
        assert_eq!(heading.kind, Some(NodeKind::Heading));
        assert!(heading.properties.is_empty());
        assert_eq!(heading.children, vec![HastNode::text("Third")]);
    }

    #[test]
    fn test_root_siblings_separated_by_newlines() {
        let hast = convert("# A\n\nB");
        let children = hast.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[1], HastNode::text("\n"));
    }

    #[test]
    fn test_code_block_gets_language_class() {
        let hast = convert("```rust\nfn main() {}\n```");
        let pre = first_element(&hast);
        assert_eq!(pre.tag, "pre");
        assert_eq!(pre.kind, Some(NodeKind::Code));
        assert!(pre.properties.is_empty());

        let expected = Element::new("code")
            .with_property("class", vec!["language-rust".to_owned()])
            .with_children(vec![HastNode::text("fn main() {}\n")]);
        assert_eq!(pre.children, vec![HastNode::Element(expected)]);
    }

    #[test]
    fn test_empty_code_block_has_no_text() {
        let hast = convert("```empty\n```");
        let pre = first_element(&hast);
        let HastNode::Element(code) = &pre.children[0] else {
            panic!("expected code element");
        };
        assert!(code.children.is_empty());
        assert_eq!(code.kind, None);
    }

    #[test]
    fn test_raw_html_dropped_by_default() {
        let hast = convert("<div>hi</div>");
        assert!(hast.children().is_empty());
    }

    #[test]
    fn test_raw_html_kept_when_allowed() {
        let tree = parse("<div>hi</div>", &ParseOptions::default());
        let options = HypertextOptions {
            allow_dangerous_html: true,
        };
        let hast = to_hypertext(&tree, &options);
        assert_eq!(hast.children(), &[HastNode::raw("<div>hi</div>")]);
    }

    #[test]
    fn test_link_attributes() {
        let hast = convert("[a](https://example.com \"T\")");
        let paragraph = first_element(&hast);
        let HastNode::Element(link) = &paragraph.children[0] else {
            panic!("expected link element");
        };
        assert_eq!(link.tag, "a");
        assert_eq!(
            link.properties.get("href"),
            Some(&PropertyValue::from("https://example.com"))
        );
        assert_eq!(link.properties.get("title"), Some(&PropertyValue::from("T")));
        assert!(!link.properties.contains_key("url"));
    }

    #[test]
    fn test_tight_list() {
        let hast = convert("- one\n- two");
        let list = first_element(&hast);
        assert_eq!(list.tag, "ul");
        // "\n", li, "\n", li, "\n"
        assert_eq!(list.children.len(), 5);
        let HastNode::Element(item) = &list.children[1] else {
            panic!("expected list item");
        };
        assert_eq!(item.tag, "li");
        assert_eq!(item.children, vec![HastNode::text("one")]);
    }

    #[test]
    fn test_ordered_list_start_attribute() {
        let hast = convert("1. a");
        assert!(first_element(&hast).properties.is_empty());

        let hast = convert("7. a");
        assert_eq!(
            first_element(&hast).properties.get("start"),
            Some(&PropertyValue::Number(7.0))
        );
    }

    #[test]
    fn test_task_list_item_checkbox() {
        let hast = convert("- [x] done");
        let list = first_element(&hast);
        let HastNode::Element(item) = &list.children[1] else {
            panic!("expected list item");
        };
        let HastNode::Element(input) = &item.children[0] else {
            panic!("expected checkbox");
        };
        assert_eq!(input.tag, "input");
        assert_eq!(input.properties.get("checked"), Some(&PropertyValue::Bool(true)));
        assert_eq!(item.children[1], HastNode::text(" "));
        assert_eq!(item.children[2], HastNode::text("done"));
    }

    #[test]
    fn test_table_sections() {
        let hast = convert("| A |\n|---|\n| 1 |");
        let table = first_element(&hast);
        let tags: Vec<_> = table
            .children
            .iter()
            .filter_map(|c| match c {
                HastNode::Element(e) => Some(e.tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tags, vec!["thead", "tbody"]);
    }

    #[test]
    fn test_unknown_kind_keeps_properties() {
        let tree = SyntaxNode::root(vec![
            SyntaxNode::parent("callout", vec![SyntaxNode::text("Hi")])
                .with_property("tone", "warm"),
        ]);
        let hast = to_hypertext(&tree, &HypertextOptions::default());
        let callout = first_element(&hast);
        assert_eq!(callout.tag, "callout");
        assert_eq!(callout.kind, Some(NodeKind::Other("callout".to_owned())));
        assert_eq!(callout.properties.get("tone"), Some(&PropertyValue::from("warm")));
        assert_eq!(callout.children, vec![HastNode::text("Hi")]);
    }

    #[test]
    fn test_unknown_value_leaf_becomes_text() {
        let tree = SyntaxNode::root(vec![SyntaxNode::leaf("shortcode", ":smile:")]);
        let hast = to_hypertext(&tree, &HypertextOptions::default());
        assert_eq!(hast.children(), &[HastNode::text(":smile:")]);
    }

    #[test]
    fn test_non_root_input_is_wrapped() {
        let node = SyntaxNode::parent(NodeKind::Paragraph, vec![SyntaxNode::text("x")]);
        let hast = to_hypertext(&node, &HypertextOptions::default());
        assert!(matches!(hast, HastNode::Root { .. }));
        assert_eq!(first_element(&hast).tag, "p");
    }

    #[test]
    fn test_break_emits_newline() {
        let hast = convert("a  \nb");
        let paragraph = first_element(&hast);
        assert_eq!(paragraph.children.len(), 4);
        assert_eq!(paragraph.children[2], HastNode::text("\n"));
    }
}
