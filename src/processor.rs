//! Depth-first dispatch of book items to a [`Handler`].
//!
//! The processor walks the book in reading order (a chapter before its
//! sub-items, each subtree before the next sibling) and calls the handler
//! once per item. Chapter content is not parsed unless the handler asks for
//! it through [`ChapterContent`].
//!
//! The first error returned by the handler stops the walk and is handed
//! back to the caller as-is.
//!
//! ```
//! use bookwalk::{Book, Chapter, Config, Handler, RenderContext, process};
//! use bookwalk::processor::ChapterContent;
//!
//! struct Titles(Vec<String>);
//!
//! impl Handler for Titles {
//!     type Error = bookwalk::Error;
//!
//!     fn on_chapter(&mut self, chapter: &Chapter, _: ChapterContent<'_>) -> bookwalk::Result<()> {
//!         self.0.push(chapter.name.clone());
//!         Ok(())
//!     }
//! }
//!
//! let mut book = Book::new();
//! book.push_item(Chapter::new("Intro", "").with_sub_item(Chapter::new("Setup", "")));
//! let ctx = RenderContext::new("/book", book, Config::default(), "/book/out");
//!
//! let mut titles = Titles(Vec::new());
//! process(&ctx, &mut titles).unwrap();
//! assert_eq!(titles.0, ["Intro", "Setup"]);
//! ```

use log::{debug, trace};

use crate::book::{BookItem, Chapter};
use crate::context::RenderContext;
use crate::markdown::{Document, DocumentParser, MarkdownParser, Visitor};

/// Caller-supplied logic invoked for each book item.
///
/// Separators and part titles are ignored unless overridden.
pub trait Handler {
    type Error;

    /// Called for every chapter before any of its sub-items.
    fn on_chapter(
        &mut self,
        chapter: &Chapter,
        content: ChapterContent<'_>,
    ) -> Result<(), Self::Error>;

    fn on_separator(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_part_title(&mut self, _title: &str) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// On-demand access to a chapter's parsed content.
///
/// Parsing happens only when [`parse`](Self::parse) or
/// [`walk`](Self::walk) is called, and both consume the value, so a chapter
/// is parsed at most once per dispatch.
pub struct ChapterContent<'a> {
    source: &'a str,
    parser: &'a dyn DocumentParser,
}

impl<'a> ChapterContent<'a> {
    pub fn new(source: &'a str, parser: &'a dyn DocumentParser) -> Self {
        Self { source, parser }
    }

    /// The raw chapter text, without parsing it.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Parse the chapter into a document tree.
    pub fn parse(self) -> Document {
        self.parser.parse(self.source)
    }

    /// Parse the chapter and drive `visitor` over the resulting tree.
    pub fn walk<V: Visitor + ?Sized>(self, visitor: &mut V) -> Result<(), V::Error> {
        self.parse().walk(visitor)
    }
}

/// Walks a render context's book, dispatching each item to a handler.
pub struct Processor<'a, P = MarkdownParser> {
    ctx: &'a RenderContext,
    parser: P,
}

impl<'a> Processor<'a, MarkdownParser> {
    /// Create a processor using the default markdown parser.
    pub fn new(ctx: &'a RenderContext) -> Self {
        Self::with_parser(ctx, MarkdownParser::default())
    }
}

impl<'a, P: DocumentParser> Processor<'a, P> {
    /// Create a processor that parses chapter content with `parser`.
    pub fn with_parser(ctx: &'a RenderContext, parser: P) -> Self {
        Self { ctx, parser }
    }

    pub fn context(&self) -> &'a RenderContext {
        self.ctx
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Dispatch every item of the book to `handler`.
    pub fn process<H: Handler>(&self, handler: &mut H) -> Result<(), H::Error> {
        let items = self.ctx.book.items();
        debug!("processing {} top-level book items", items.len());
        self.process_items(items, handler)?;
        debug!("finished processing book");
        Ok(())
    }

    /// Dispatch a sequence of items, and everything nested under them.
    pub fn process_items<H: Handler>(
        &self,
        items: &[BookItem],
        handler: &mut H,
    ) -> Result<(), H::Error> {
        for item in items {
            self.process_item(item, handler)?;
        }
        Ok(())
    }

    fn process_item<H: Handler>(&self, item: &BookItem, handler: &mut H) -> Result<(), H::Error> {
        match item {
            BookItem::Chapter(chapter) => self.process_chapter(chapter, handler),
            BookItem::Separator => {
                trace!("separator");
                handler.on_separator()
            }
            BookItem::PartTitle(title) => {
                trace!("part title {title:?}");
                handler.on_part_title(title)
            }
        }
    }

    fn process_chapter<H: Handler>(
        &self,
        chapter: &Chapter,
        handler: &mut H,
    ) -> Result<(), H::Error> {
        trace!(
            "chapter {:?} ({} sub-items)",
            chapter.name,
            chapter.sub_items.len()
        );
        let content = ChapterContent::new(&chapter.content, &self.parser);
        handler.on_chapter(chapter, content)?;

        self.process_items(&chapter.sub_items, handler)
    }
}

/// Dispatch every item of `ctx`'s book to `handler` using the default
/// markdown parser.
pub fn process<H: Handler>(ctx: &RenderContext, handler: &mut H) -> Result<(), H::Error> {
    Processor::new(ctx).process(handler)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::book::Book;
    use crate::config::Config;
    use crate::markdown::{NodeKind, WalkStatus, visitor_fn};

    /// Counts parses and returns an empty document.
    #[derive(Default)]
    struct CountingParser {
        calls: Cell<usize>,
    }

    impl DocumentParser for CountingParser {
        fn parse(&self, _source: &str) -> Document {
            self.calls.set(self.calls.get() + 1);
            Document::default()
        }
    }

    #[derive(Debug, PartialEq)]
    enum Call {
        Chapter(String),
        Separator,
        PartTitle(String),
    }

    /// Records calls, optionally failing on the nth one and optionally
    /// parsing every chapter.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_on: Option<usize>,
        parse: bool,
    }

    impl Recorder {
        fn record(&mut self, call: Call) -> Result<(), String> {
            self.calls.push(call);
            if self.fail_on == Some(self.calls.len()) {
                return Err(format!("failed on call {}", self.calls.len()));
            }
            Ok(())
        }
    }

    impl Handler for Recorder {
        type Error = String;

        fn on_chapter(&mut self, chapter: &Chapter, content: ChapterContent<'_>) -> Result<(), String> {
            if self.parse {
                content.walk(&mut visitor_fn(|_, _| Ok::<_, String>(WalkStatus::Continue)))?;
            }
            self.record(Call::Chapter(chapter.name.clone()))
        }

        fn on_separator(&mut self) -> Result<(), String> {
            self.record(Call::Separator)
        }

        fn on_part_title(&mut self, title: &str) -> Result<(), String> {
            self.record(Call::PartTitle(title.to_string()))
        }
    }

    fn context(items: Vec<BookItem>) -> RenderContext {
        let book = Book { sections: items };
        RenderContext::new("/book", book, Config::default(), "/book/out")
    }

    fn nested_context() -> RenderContext {
        context(vec![
            Chapter::new("A", "# A")
                .with_sub_item(
                    Chapter::new("A.1", "a1").with_sub_item(Chapter::new("A.1.a", "deep")),
                )
                .with_sub_item(BookItem::PartTitle("inner".into()))
                .into(),
            BookItem::Separator,
            BookItem::PartTitle("P".into()),
            Chapter::new("B", "b").into(),
        ])
    }

    #[test]
    fn test_pre_order_dispatch() {
        let ctx = nested_context();
        let mut rec = Recorder::default();
        Processor::new(&ctx).process(&mut rec).unwrap();

        assert_eq!(
            rec.calls,
            [
                Call::Chapter("A".into()),
                Call::Chapter("A.1".into()),
                Call::Chapter("A.1.a".into()),
                Call::PartTitle("inner".into()),
                Call::Separator,
                Call::PartTitle("P".into()),
                Call::Chapter("B".into()),
            ]
        );
    }

    #[test]
    fn test_content_is_not_parsed_unless_requested() {
        let ctx = nested_context();
        let processor = Processor::with_parser(&ctx, CountingParser::default());

        processor.process(&mut Recorder::default()).unwrap();
        assert_eq!(processor.parser().calls.get(), 0);

        let mut parsing = Recorder {
            parse: true,
            ..Default::default()
        };
        processor.process(&mut parsing).unwrap();
        assert_eq!(processor.parser().calls.get(), 4);
    }

    #[test]
    fn test_handler_error_stops_traversal() {
        let ctx = context(vec![
            Chapter::new("one", "").into(),
            BookItem::Separator,
            Chapter::new("three", "").into(),
        ]);
        let mut rec = Recorder {
            fail_on: Some(2),
            ..Default::default()
        };

        let err = process(&ctx, &mut rec).unwrap_err();

        assert_eq!(err, "failed on call 2");
        assert_eq!(rec.calls, [Call::Chapter("one".into()), Call::Separator]);
    }

    #[test]
    fn test_error_in_subtree_skips_siblings_and_cousins() {
        let ctx = nested_context();
        let mut rec = Recorder {
            fail_on: Some(2),
            ..Default::default()
        };

        assert!(process(&ctx, &mut rec).is_err());
        assert_eq!(
            rec.calls,
            [Call::Chapter("A".into()), Call::Chapter("A.1".into())]
        );
    }

    #[test]
    fn test_visitor_error_propagates_unchanged() {
        struct FailingWalk;

        impl Handler for FailingWalk {
            type Error = String;

            fn on_chapter(&mut self, _: &Chapter, content: ChapterContent<'_>) -> Result<(), String> {
                content.walk(&mut visitor_fn(|node, _| match node.kind {
                    NodeKind::Heading { .. } => Err("no headings allowed".to_string()),
                    _ => Ok(WalkStatus::Continue),
                }))
            }
        }

        let ctx = nested_context();
        assert_eq!(
            process(&ctx, &mut FailingWalk).unwrap_err(),
            "no headings allowed"
        );
    }

    #[test]
    fn test_content_source_without_parsing() {
        struct Sources(Vec<String>);

        impl Handler for Sources {
            type Error = std::convert::Infallible;

            fn on_chapter(
                &mut self,
                _: &Chapter,
                content: ChapterContent<'_>,
            ) -> Result<(), Self::Error> {
                self.0.push(content.source().to_string());
                Ok(())
            }
        }

        let ctx = nested_context();
        let processor = Processor::with_parser(&ctx, CountingParser::default());
        let mut sources = Sources(Vec::new());
        processor.process(&mut sources).unwrap();

        assert_eq!(sources.0, ["# A", "a1", "deep", "b"]);
        assert_eq!(processor.parser().calls.get(), 0);
    }

    #[test]
    fn test_empty_book() {
        let ctx = context(Vec::new());
        let mut rec = Recorder::default();
        process(&ctx, &mut rec).unwrap();
        assert!(rec.calls.is_empty());
    }
}
