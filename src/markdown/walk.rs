//! Depth-first traversal of a document tree.

use super::node::{Document, Node};

/// What the walk should do after a visitor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkStatus {
    #[default]
    Continue,
    /// Do not descend into this node's children. Only meaningful when
    /// entering; the exit callback still fires.
    SkipChildren,
    /// End the walk immediately. No further callbacks, including exits.
    Stop,
}

/// Receives every node of a document twice: entering, then exiting.
pub trait Visitor {
    type Error;

    fn visit(&mut self, node: &Node, entering: bool) -> Result<WalkStatus, Self::Error>;
}

/// Adapts a closure into a [`Visitor`].
///
/// ```
/// use bookwalk::markdown::{DocumentParser, MarkdownParser, NodeKind, WalkStatus, visitor_fn};
///
/// let doc = MarkdownParser::default().parse("# One\n\n## Two\n");
/// let mut headings = 0;
/// doc.walk(&mut visitor_fn(|node, entering| {
///     if entering && matches!(node.kind, NodeKind::Heading { .. }) {
///         headings += 1;
///     }
///     Ok::<_, std::convert::Infallible>(WalkStatus::Continue)
/// }))
/// .unwrap();
/// assert_eq!(headings, 2);
/// ```
pub fn visitor_fn<F, E>(f: F) -> FnVisitor<F>
where
    F: FnMut(&Node, bool) -> Result<WalkStatus, E>,
{
    FnVisitor(f)
}

/// See [`visitor_fn`].
pub struct FnVisitor<F>(F);

impl<F, E> Visitor for FnVisitor<F>
where
    F: FnMut(&Node, bool) -> Result<WalkStatus, E>,
{
    type Error = E;

    fn visit(&mut self, node: &Node, entering: bool) -> Result<WalkStatus, E> {
        (self.0)(node, entering)
    }
}

impl Document {
    /// Walk the whole document, root included.
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        walk_node(self.root(), visitor).map(|_| ())
    }
}

impl Node {
    /// Walk this node and its descendants.
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Result<(), V::Error> {
        walk_node(self, visitor).map(|_| ())
    }
}

fn walk_node<V: Visitor + ?Sized>(node: &Node, visitor: &mut V) -> Result<WalkStatus, V::Error> {
    let status = visitor.visit(node, true)?;
    if status == WalkStatus::Stop {
        return Ok(WalkStatus::Stop);
    }

    if status != WalkStatus::SkipChildren {
        for child in &node.children {
            if walk_node(child, visitor)? == WalkStatus::Stop {
                return Ok(WalkStatus::Stop);
            }
        }
    }

    match visitor.visit(node, false)? {
        WalkStatus::Stop => Ok(WalkStatus::Stop),
        _ => Ok(WalkStatus::Continue),
    }
}
