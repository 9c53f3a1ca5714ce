//! # bookwalk
//!
//! Decode the render context a book generator hands to its backends, and
//! walk the book chapter by chapter.
//!
//! ## Features
//!
//! - Typed [`RenderContext`], [`Book`], [`Chapter`] and [`Config`] models
//!   that accept both the 0.4 and 0.5 protocol layouts
//! - Plugin tables under `output` and `preprocessor` kept as raw JSON and
//!   re-encoded unchanged
//! - Pre-order dispatch of book items to a [`Handler`]
//! - Lazy markdown parsing of chapter content into a walkable
//!   [`markdown::Document`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use bookwalk::{Chapter, Handler, RenderContext, process};
//! use bookwalk::markdown::{NodeKind, WalkStatus, visitor_fn};
//! use bookwalk::processor::ChapterContent;
//!
//! struct WordCount(usize);
//!
//! impl Handler for WordCount {
//!     type Error = bookwalk::Error;
//!
//!     fn on_chapter(&mut self, _: &Chapter, content: ChapterContent<'_>) -> bookwalk::Result<()> {
//!         content.walk(&mut visitor_fn(|node, entering| {
//!             if let (true, NodeKind::Text(text)) = (entering, &node.kind) {
//!                 self.0 += text.split_whitespace().count();
//!             }
//!             Ok::<_, bookwalk::Error>(WalkStatus::Continue)
//!         }))
//!     }
//! }
//!
//! let ctx = RenderContext::from_json(std::io::stdin()).unwrap();
//! let mut words = WordCount(0);
//! process(&ctx, &mut words).unwrap();
//! println!("{} words", words.0);
//! ```

pub mod book;
pub mod config;
pub mod context;
pub mod error;
pub mod markdown;
pub mod processor;

pub use book::{Book, BookItem, BookItems, Chapter, SectionNumber};
pub use config::{BookConfig, BuildConfig, Config, RustConfig, TextDirection};
pub use context::RenderContext;
pub use error::{Error, Result};
pub use processor::{ChapterContent, Handler, Processor, process};
