//! Typed representation of a book's table of contents.
//!
//! A [`Book`] is an ordered list of [`BookItem`]s. Chapters own their nested
//! items, forming a tree with no back-references.

mod item;

use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// The book's table of contents as a tree of items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Top-level items in reading order.
    ///
    /// Older protocol revisions call this `sections`, newer ones `items`.
    #[serde(alias = "items", default, deserialize_with = "null_as_default")]
    pub sections: Vec<BookItem>,
}

/// One entry in the book tree.
#[derive(Debug, Clone, PartialEq)]
pub enum BookItem {
    /// A content-bearing chapter, possibly with nested items.
    Chapter(Chapter),
    /// A visual separator between groups of chapters.
    Separator,
    /// A heading that titles the following group of chapters.
    PartTitle(String),
}

/// A chapter and its nested items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub name: String,
    /// Raw markdown source. Empty for draft chapters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Position in the book, e.g. `[2, 1]`. `None` for unnumbered chapters.
    #[serde(default)]
    pub number: Option<SectionNumber>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_items: Vec<BookItem>,
    /// Location relative to the book's source directory, if backed by a file.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub source_path: Option<PathBuf>,
    /// Names of enclosing chapters, outermost first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub parent_names: Vec<String>,
}

/// A chapter's nesting position, such as `1.2.`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionNumber(pub Vec<u32>);

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level items, independent of which protocol key carried them.
    pub fn items(&self) -> &[BookItem] {
        &self.sections
    }

    /// Append a top-level item.
    pub fn push_item(&mut self, item: impl Into<BookItem>) -> &mut Self {
        self.sections.push(item.into());
        self
    }

    /// Iterate over every item in the book, nested ones included.
    ///
    /// Items are yielded in pre-order: a chapter comes before its
    /// sub-items, and a chapter's subtree is exhausted before its next
    /// sibling.
    pub fn iter(&self) -> BookItems<'_> {
        BookItems {
            stack: vec![self.sections.iter()],
        }
    }

    /// Iterate over every chapter in the book, in pre-order.
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.iter().filter_map(|item| match item {
            BookItem::Chapter(chapter) => Some(chapter),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a Book {
    type Item = &'a BookItem;
    type IntoIter = BookItems<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over all items of a [`Book`].
pub struct BookItems<'a> {
    stack: Vec<std::slice::Iter<'a, BookItem>>,
}

impl<'a> Iterator for BookItems<'a> {
    type Item = &'a BookItem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(item) => {
                    if let BookItem::Chapter(chapter) = item
                        && !chapter.sub_items.is_empty()
                    {
                        self.stack.push(chapter.sub_items.iter());
                    }
                    return Some(item);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl BookItem {
    /// The chapter payload, if this item is a chapter.
    pub fn as_chapter(&self) -> Option<&Chapter> {
        match self {
            BookItem::Chapter(chapter) => Some(chapter),
            _ => None,
        }
    }
}

impl From<Chapter> for BookItem {
    fn from(chapter: Chapter) -> Self {
        BookItem::Chapter(chapter)
    }
}

impl Chapter {
    /// Create a chapter with no number and no backing file.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Create a draft chapter: no content, no path, no number.
    pub fn new_draft(name: impl Into<String>, parent_names: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parent_names,
            ..Default::default()
        }
    }

    /// A chapter with no backing file is a draft.
    pub fn is_draft_chapter(&self) -> bool {
        self.path.is_none()
    }

    pub fn with_number(mut self, number: impl Into<SectionNumber>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.source_path = Some(path.clone());
        self.path = Some(path);
        self
    }

    pub fn with_sub_item(mut self, item: impl Into<BookItem>) -> Self {
        self.sub_items.push(item.into());
        self
    }
}

impl fmt::Display for SectionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        for n in &self.0 {
            write!(f, "{n}.")?;
        }
        Ok(())
    }
}

impl Deref for SectionNumber {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.0
    }
}

impl From<Vec<u32>> for SectionNumber {
    fn from(parts: Vec<u32>) -> Self {
        SectionNumber(parts)
    }
}

impl<const N: usize> From<[u32; N]> for SectionNumber {
    fn from(parts: [u32; N]) -> Self {
        SectionNumber(parts.to_vec())
    }
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
