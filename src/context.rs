//! The render context handed to a backend by the book generator.

use std::io::Read;
use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Deserializer;

use crate::book::Book;
use crate::config::Config;
use crate::error::Result;

/// Everything a backend receives: the book, its configuration, and where
/// output should go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderContext {
    /// Version of the generator that produced this context.
    pub version: String,
    /// Root directory of the book.
    pub root: PathBuf,
    pub book: Book,
    pub config: Config,
    /// Directory the backend should write its output to.
    pub destination: PathBuf,
}

impl RenderContext {
    pub fn new(
        root: impl Into<PathBuf>,
        book: Book,
        config: Config,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            version: String::new(),
            root: root.into(),
            book,
            config,
            destination: destination.into(),
        }
    }

    /// Decode a render context from a JSON stream, such as a backend's stdin.
    ///
    /// Chapter nesting depth is not limited by the JSON parser's recursion
    /// limit; the stack grows on the heap as needed.
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        let ctx = Self::decode(Deserializer::from_reader(reader))?;
        debug!(
            "decoded render context v{} with {} top-level items",
            ctx.version,
            ctx.book.items().len()
        );
        Ok(ctx)
    }

    /// Decode a render context from an in-memory JSON document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::decode(Deserializer::from_slice(bytes))
    }

    fn decode<'de, R: serde_json::de::Read<'de>>(mut de: Deserializer<R>) -> Result<Self> {
        de.disable_recursion_limit();
        let ctx = Self::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(ctx)
    }

    /// Encode the context back into its wire form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Absolute location of the book's markdown sources.
    pub fn source_dir(&self) -> PathBuf {
        let src = self
            .config
            .book
            .as_ref()
            .and_then(|book| book.src.clone())
            .unwrap_or_else(|| PathBuf::from("src"));
        self.root.join(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{BookItem, Chapter};

    #[test]
    fn test_source_dir_defaults_to_src() {
        let ctx = RenderContext::new("/book", Book::new(), Config::default(), "/book/out");
        assert_eq!(ctx.source_dir(), PathBuf::from("/book/src"));
    }

    #[test]
    fn test_reencode_round_trip() {
        let mut book = Book::new();
        book.push_item(Chapter::new("A", "text").with_number([1]).with_path("a.md"))
            .push_item(BookItem::Separator);
        let ctx = RenderContext::new("/book", book, Config::default(), "/book/out");

        let json = ctx.to_json().unwrap();
        assert_eq!(RenderContext::from_slice(json.as_bytes()).unwrap(), ctx);
    }

    #[test]
    fn test_deeply_nested_chapters_round_trip() {
        let mut chapter = Chapter::new("leaf", "");
        for depth in (0..100).rev() {
            chapter = Chapter::new(format!("level {depth}"), "").with_sub_item(chapter);
        }
        let mut book = Book::new();
        book.push_item(chapter);
        let ctx = RenderContext::new("/book", book, Config::default(), "/book/out");

        let json = ctx.to_json().unwrap();
        assert_eq!(RenderContext::from_slice(json.as_bytes()).unwrap(), ctx);
        assert_eq!(RenderContext::from_json(json.as_bytes()).unwrap(), ctx);
        assert_eq!(ctx.book.iter().count(), 101);
    }

    #[test]
    fn test_trailing_data_is_decode_error() {
        let json = RenderContext::new("/b", Book::new(), Config::default(), "/o")
            .to_json()
            .unwrap();
        let err = RenderContext::from_slice(format!("{json} x").as_bytes()).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = RenderContext::from_slice(b"{\"version\": ").unwrap_err();
        assert!(err.is_decode());
    }
}
