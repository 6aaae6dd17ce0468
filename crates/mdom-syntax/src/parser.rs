//! Syntax tree builder on top of `pulldown-cmark`.
//!
//! `pulldown-cmark` produces a flat stream of start/end events. The builder
//! keeps a stack of open nodes: a start event pushes a node, the matching end
//! event pops it and attaches it to the new top of the stack.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};

use crate::kind::NodeKind;
use crate::node::SyntaxNode;
use crate::property::PropertyValue;

/// Markdown parsing options.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists).
    pub gfm: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { gfm: true }
    }
}

impl ParseOptions {
    /// Parser options for `pulldown-cmark`.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }
}

/// Parse markdown text into a syntax tree rooted at a `root` node.
pub fn parse(markdown: &str, options: &ParseOptions) -> SyntaxNode {
    let parser = Parser::new_ext(markdown, options.parser_options());
    let mut builder = TreeBuilder::new();
    for event in parser {
        builder.process_event(event);
    }
    let root = builder.finish();
    tracing::trace!(children = root.children.len(), "Parsed markdown");
    root
}

struct TreeBuilder {
    stack: Vec<SyntaxNode>,
    table_alignments: Vec<Alignment>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![SyntaxNode::root(Vec::new())],
            table_alignments: Vec::new(),
        }
    }

    fn finish(mut self) -> SyntaxNode {
        // Unbalanced events only happen on malformed streams; fold what is open.
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().unwrap_or_else(|| SyntaxNode::root(Vec::new()))
    }

    fn top(&mut self) -> &mut SyntaxNode {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.append(SyntaxNode::leaf(NodeKind::InlineCode, code.into_string()));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.append(SyntaxNode::parent(NodeKind::Break, Vec::new())),
            Event::Rule => self.append(SyntaxNode::parent(NodeKind::ThematicBreak, Vec::new())),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(label) => self.append(
                SyntaxNode::parent("footnoteReference", Vec::new())
                    .with_property("label", label.into_string()),
            ),
            Event::InlineMath(math) => {
                self.append(SyntaxNode::leaf("inlineMath", math.into_string()));
            }
            Event::DisplayMath(math) => self.append(SyntaxNode::leaf("math", math.into_string())),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        let node = match tag {
            Tag::Paragraph => SyntaxNode::parent(NodeKind::Paragraph, Vec::new()),
            Tag::Heading { level, .. } => SyntaxNode::parent(NodeKind::Heading, Vec::new())
                .with_property("depth", heading_depth(level)),
            Tag::BlockQuote(_) => SyntaxNode::parent(NodeKind::Blockquote, Vec::new()),
            Tag::CodeBlock(kind) => {
                let mut node = SyntaxNode::leaf(NodeKind::Code, "");
                if let CodeBlockKind::Fenced(info) = kind {
                    let mut parts = info.trim().splitn(2, char::is_whitespace);
                    if let Some(lang) = parts.next().filter(|l| !l.is_empty()) {
                        node = node.with_property("lang", lang);
                    }
                    if let Some(meta) = parts.next().map(str::trim).filter(|m| !m.is_empty()) {
                        node = node.with_property("meta", meta);
                    }
                }
                node
            }
            Tag::HtmlBlock => SyntaxNode::leaf(NodeKind::Html, ""),
            Tag::List(start) => {
                let node = SyntaxNode::parent(NodeKind::List, Vec::new())
                    .with_property("ordered", start.is_some());
                match start {
                    Some(n) => node.with_property("start", n),
                    None => node,
                }
            }
            Tag::Item => SyntaxNode::parent(NodeKind::ListItem, Vec::new()),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                SyntaxNode::parent(NodeKind::Table, Vec::new())
            }
            Tag::TableHead => {
                SyntaxNode::parent(NodeKind::TableRow, Vec::new()).with_property("header", true)
            }
            Tag::TableRow => SyntaxNode::parent(NodeKind::TableRow, Vec::new()),
            Tag::TableCell => {
                let index = self.top().children.len();
                let cell = SyntaxNode::parent(NodeKind::TableCell, Vec::new());
                match self.table_alignments.get(index).and_then(|a| alignment_name(*a)) {
                    Some(align) => cell.with_property("align", align),
                    None => cell,
                }
            }
            Tag::Emphasis => SyntaxNode::parent(NodeKind::Emphasis, Vec::new()),
            Tag::Strong => SyntaxNode::parent(NodeKind::Strong, Vec::new()),
            Tag::Strikethrough => SyntaxNode::parent(NodeKind::Delete, Vec::new()),
            Tag::Link {
                dest_url, title, ..
            } => with_title(
                SyntaxNode::parent(NodeKind::Link, Vec::new())
                    .with_property("url", dest_url.into_string()),
                &title,
            ),
            Tag::Image {
                dest_url, title, ..
            } => with_title(
                SyntaxNode::parent(NodeKind::Image, Vec::new())
                    .with_property("url", dest_url.into_string()),
                &title,
            ),
            Tag::FootnoteDefinition(label) => {
                SyntaxNode::parent("footnoteDefinition", Vec::new())
                    .with_property("label", label.into_string())
            }
            Tag::MetadataBlock(_) => SyntaxNode::parent("frontmatter", Vec::new()),
            Tag::DefinitionList => SyntaxNode::parent("definitionList", Vec::new()),
            Tag::DefinitionListTitle => SyntaxNode::parent("definitionTerm", Vec::new()),
            Tag::DefinitionListDefinition => {
                SyntaxNode::parent("definitionDescription", Vec::new())
            }
            Tag::Superscript => SyntaxNode::parent("superscript", Vec::new()),
            Tag::Subscript => SyntaxNode::parent("subscript", Vec::new()),
        };
        self.stack.push(node);
    }

    /// Pop the innermost open node and attach it to its parent.
    fn close(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut node) = self.stack.pop() else {
            return;
        };
        match node.kind {
            NodeKind::Code | NodeKind::Html => {
                if let Some(value) = node.value.as_mut()
                    && value.ends_with('\n')
                {
                    value.pop();
                }
            }
            NodeKind::Image => {
                let alt = node.text_content();
                node.children.clear();
                node = node.with_property("alt", alt);
            }
            NodeKind::Table => self.table_alignments.clear(),
            _ => {}
        }
        self.append(node);
    }

    fn append(&mut self, node: SyntaxNode) {
        self.top().children.push(node);
    }

    fn text(&mut self, text: &str) {
        let top = self.top();
        if matches!(top.kind, NodeKind::Code) {
            if let Some(value) = top.value.as_mut() {
                value.push_str(text);
            }
            return;
        }
        // pulldown-cmark splits text runs at entities and brackets; merge them back.
        if let Some(last) = top.children.last_mut()
            && last.kind == NodeKind::Text
            && let Some(value) = last.value.as_mut()
        {
            value.push_str(text);
            return;
        }
        top.children.push(SyntaxNode::text(text));
    }

    fn html(&mut self, html: &str) {
        let top = self.top();
        if top.kind == NodeKind::Html {
            if let Some(value) = top.value.as_mut() {
                value.push_str(html);
            }
        } else {
            top.children.push(SyntaxNode::leaf(NodeKind::Html, html));
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        if let Some(item) = self
            .stack
            .iter_mut()
            .rev()
            .find(|node| node.kind == NodeKind::ListItem)
        {
            item.properties
                .insert("checked".to_owned(), PropertyValue::Bool(checked));
        }
    }
}

fn with_title(node: SyntaxNode, title: &str) -> SyntaxNode {
    if title.is_empty() {
        node
    } else {
        node.with_property("title", title)
    }
}

fn heading_depth(level: HeadingLevel) -> u64 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alignment_name(alignment: Alignment) -> Option<&'static str> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}
