//! Document tree node types.

use pulldown_cmark::Alignment;

/// What a node represents.
///
/// Container kinds hold children; leaf kinds carry their text inline and
/// never have children.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root of a parsed chapter.
    Document,
    Paragraph,
    /// Headings with level 1-6 and an optional explicit `{#id}`.
    Heading { level: u8, id: Option<String> },
    BlockQuote,
    /// Fenced or indented code. `info` is the fence's info string
    /// (`rust,ignore`), empty for indented blocks.
    CodeBlock { info: String },
    HtmlBlock,
    /// Ordered lists carry their start number.
    List { start: Option<u64> },
    ListItem,
    FootnoteDefinition { label: String },
    Table { alignments: Vec<Alignment> },
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: String },
    Image { url: String, title: String },
    /// Any container the tree does not model more specifically.
    Container,

    // Leaves
    Text(String),
    /// Inline code span.
    Code(String),
    /// Raw HTML, block or inline.
    Html(String),
    FootnoteReference { label: String },
    SoftBreak,
    HardBreak,
    Rule,
    TaskListMarker { checked: bool },
}

/// A node and its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

/// A parsed chapter.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Node,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    /// Leaf nodes carry content directly and never have children.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Text(_)
                | NodeKind::Code(_)
                | NodeKind::Html(_)
                | NodeKind::FootnoteReference { .. }
                | NodeKind::SoftBreak
                | NodeKind::HardBreak
                | NodeKind::Rule
                | NodeKind::TaskListMarker { .. }
        )
    }

    /// Plain text of this node and its descendants.
    ///
    /// Text and inline code contribute their content; soft and hard breaks
    /// become a single space. Markup is dropped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
        NodeKind::SoftBreak | NodeKind::HardBreak => out.push(' '),
        _ => {}
    }
    for child in &node.children {
        collect_text(child, out);
    }
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Top-level blocks of the document.
    pub fn blocks(&self) -> &[Node] {
        &self.root.children
    }

    pub fn into_root(self) -> Node {
        self.root
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Node::new(NodeKind::Document))
    }
}
