//! Chapter content as a walkable document tree.
//!
//! This module is the boundary between the book tree and prose parsing:
//!
//! - [`parser`]: the [`DocumentParser`] capability and its default
//!   pulldown-cmark backed implementation
//! - [`node`]: the owned document tree handed to visitors
//! - [`walk`]: depth-first visitor traversal with enter/exit callbacks
//!
//! ## Design Notes
//!
//! The tree is built eagerly from the parser's event stream once a chapter's
//! content is requested, then released when the walk finishes. Nodes own
//! their text so a visitor can hold on to anything it collects.
//!
//! Walking follows the familiar enter/exit protocol: every node is visited
//! once on the way down (`entering == true`) and once on the way up. A
//! visitor may skip a node's children or stop the walk outright.

mod node;
mod parser;
mod walk;

pub use node::{Document, Node, NodeKind};
pub use parser::{DocumentParser, MarkdownParser, ParserOptions};
pub use pulldown_cmark::Alignment;
pub use walk::{FnVisitor, Visitor, WalkStatus, visitor_fn};
