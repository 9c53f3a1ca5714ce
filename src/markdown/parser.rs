//! Markdown to document tree.

use log::trace;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

use super::node::{Document, Node, NodeKind};

/// Turns raw chapter text into a [`Document`].
pub trait DocumentParser {
    fn parse(&self, source: &str) -> Document;
}

/// Markdown syntax extensions beyond CommonMark.
///
/// Defaults enable tables, footnotes, strikethrough, task lists and heading
/// attributes. Backends can read these from their `output.<name>` table:
///
/// ```
/// use bookwalk::markdown::ParserOptions;
///
/// let opts: ParserOptions = serde_json::from_str(r#"{"footnotes": false}"#).unwrap();
/// assert!(opts.tables);
/// assert!(!opts.footnotes);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParserOptions {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub heading_attributes: bool,
    pub smart_punctuation: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            heading_attributes: true,
            smart_punctuation: false,
        }
    }
}

impl ParserOptions {
    /// Plain CommonMark, no extensions.
    pub fn commonmark() -> Self {
        Self {
            tables: false,
            footnotes: false,
            strikethrough: false,
            tasklists: false,
            heading_attributes: false,
            smart_punctuation: false,
        }
    }

    fn to_options(self) -> Options {
        let mut opts = Options::empty();
        opts.set(Options::ENABLE_TABLES, self.tables);
        opts.set(Options::ENABLE_FOOTNOTES, self.footnotes);
        opts.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        opts.set(Options::ENABLE_TASKLISTS, self.tasklists);
        opts.set(Options::ENABLE_HEADING_ATTRIBUTES, self.heading_attributes);
        opts.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        opts
    }
}

/// The default [`DocumentParser`], backed by pulldown-cmark.
#[derive(Debug, Clone, Default)]
pub struct MarkdownParser {
    options: ParserOptions,
}

impl MarkdownParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }
}

impl DocumentParser for MarkdownParser {
    fn parse(&self, source: &str) -> Document {
        trace!("parsing {} bytes of markdown", source.len());
        build_tree(Parser::new_ext(source, self.options.to_options()))
    }
}

/// Fold a flat start/end event stream into a tree.
fn build_tree<'a>(events: impl Iterator<Item = Event<'a>>) -> Document {
    let mut stack = vec![Node::new(NodeKind::Document)];

    for event in events {
        let leaf = match event {
            Event::Start(tag) => {
                stack.push(Node::new(container_kind(tag)));
                continue;
            }
            Event::End(_) => {
                // The root is never closed by an event.
                if stack.len() > 1
                    && let Some(node) = stack.pop()
                {
                    attach(&mut stack, node);
                }
                continue;
            }
            Event::Text(text) => NodeKind::Text(text.into_string()),
            Event::Code(code) => NodeKind::Code(code.into_string()),
            Event::Html(html) | Event::InlineHtml(html) => NodeKind::Html(html.into_string()),
            Event::FootnoteReference(label) => NodeKind::FootnoteReference {
                label: label.into_string(),
            },
            Event::SoftBreak => NodeKind::SoftBreak,
            Event::HardBreak => NodeKind::HardBreak,
            Event::Rule => NodeKind::Rule,
            Event::TaskListMarker(checked) => NodeKind::TaskListMarker { checked },
            // Math is never enabled.
            _ => continue,
        };
        attach(&mut stack, Node::new(leaf));
    }

    // Close anything left open by a truncated stream.
    while stack.len() > 1 {
        if let Some(node) = stack.pop() {
            attach(&mut stack, node);
        }
    }

    Document::new(
        stack
            .pop()
            .unwrap_or_else(|| Node::new(NodeKind::Document)),
    )
}

fn attach(stack: &mut [Node], node: Node) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    }
}

fn container_kind(tag: Tag<'_>) -> NodeKind {
    match tag {
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::Heading { level, id, .. } => NodeKind::Heading {
            level: level as u8,
            id: id.map(|id| id.into_string()),
        },
        Tag::BlockQuote(..) => NodeKind::BlockQuote,
        Tag::CodeBlock(kind) => NodeKind::CodeBlock {
            info: match kind {
                CodeBlockKind::Fenced(info) => info.into_string(),
                CodeBlockKind::Indented => String::new(),
            },
        },
        Tag::HtmlBlock => NodeKind::HtmlBlock,
        Tag::List(start) => NodeKind::List { start },
        Tag::Item => NodeKind::ListItem,
        Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition {
            label: label.into_string(),
        },
        Tag::Table(alignments) => NodeKind::Table { alignments },
        Tag::TableHead => NodeKind::TableHead,
        Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis,
        Tag::Strong => NodeKind::Strong,
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => NodeKind::Link {
            url: dest_url.into_string(),
            title: title.into_string(),
        },
        Tag::Image {
            dest_url, title, ..
        } => NodeKind::Image {
            url: dest_url.into_string(),
            title: title.into_string(),
        },
        _ => NodeKind::Container,
    }
}
