//! Wire codec for [`BookItem`].
//!
//! Book items are shape-tagged on the wire rather than carrying an explicit
//! discriminator field:
//!
//! - `"Separator"` (a bare string)
//! - `{"Chapter": {...}}`
//! - `{"PartTitle": "..."}`
//!
//! The visitor inspects the shape before committing to a payload type, so a
//! malformed entry is rejected where it occurs instead of surfacing as a
//! generic whole-document failure.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::BookItem;

const SEPARATOR: &str = "Separator";
const CHAPTER: &str = "Chapter";
const PART_TITLE: &str = "PartTitle";

const DECODE_FAILED: &str = "could not decode book item";

impl Serialize for BookItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BookItem::Separator => serializer.serialize_str(SEPARATOR),
            BookItem::Chapter(chapter) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(CHAPTER, chapter)?;
                map.end()
            }
            BookItem::PartTitle(title) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(PART_TITLE, title)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for BookItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BookItemVisitor)
    }
}

struct BookItemVisitor;

impl<'de> Visitor<'de> for BookItemVisitor {
    type Value = BookItem;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "a book item (\"{SEPARATOR}\", {{\"{CHAPTER}\": ..}} or {{\"{PART_TITLE}\": ..}})"
        )
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BookItem, E> {
        if v == SEPARATOR {
            Ok(BookItem::Separator)
        } else {
            Err(E::custom(format_args!(
                "{DECODE_FAILED}: unexpected string `{v}`"
            )))
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<BookItem, A::Error> {
        let Some(key) = map.next_key::<String>()? else {
            return Err(de::Error::custom(format_args!(
                "{DECODE_FAILED}: empty object"
            )));
        };

        let item = match key.as_str() {
            CHAPTER => BookItem::Chapter(map.next_value()?),
            PART_TITLE => BookItem::PartTitle(map.next_value()?),
            other => {
                return Err(de::Error::custom(format_args!(
                    "{DECODE_FAILED}: unknown key `{other}`"
                )));
            }
        };

        if let Some(extra) = map.next_key::<String>()? {
            // Drain the value so the error points at the offending key.
            map.next_value::<IgnoredAny>()?;
            return Err(de::Error::custom(format_args!(
                "{DECODE_FAILED}: unexpected second key `{extra}` after `{key}`"
            )));
        }

        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Chapter;

    fn decode(json: &str) -> serde_json::Result<BookItem> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_decode_separator() {
        assert_eq!(decode(r#""Separator""#).unwrap(), BookItem::Separator);
    }

    #[test]
    fn test_decode_part_title() {
        let item = decode(r#"{"PartTitle": "Reference"}"#).unwrap();
        assert_eq!(item, BookItem::PartTitle("Reference".to_string()));
    }

    #[test]
    fn test_decode_chapter() {
        let item = decode(
            r##"{"Chapter": {"name": "Intro", "content": "# Intro", "number": [1],
                "sub_items": [], "path": "intro.md", "source_path": "intro.md",
                "parent_names": []}}"##,
        )
        .unwrap();

        let BookItem::Chapter(chapter) = item else {
            panic!("expected chapter, got {item:?}");
        };
        assert_eq!(chapter.name, "Intro");
        assert_eq!(chapter.content, "# Intro");
        assert_eq!(chapter.number.as_deref(), Some(&[1][..]));
    }

    #[test]
    fn test_reject_wrong_literal() {
        let err = decode(r#""NotASeparator""#).unwrap_err();
        assert!(err.to_string().contains(DECODE_FAILED), "{err}");
    }

    #[test]
    fn test_reject_two_keys() {
        let err = decode(r#"{"Chapter": {"name": "A"}, "PartTitle": "x"}"#).unwrap_err();
        assert!(err.to_string().contains(DECODE_FAILED), "{err}");
    }

    #[test]
    fn test_reject_unknown_key() {
        let err = decode(r#"{"Unknown": {}}"#).unwrap_err();
        assert!(err.to_string().contains("unknown key `Unknown`"), "{err}");
    }

    #[test]
    fn test_reject_empty_object() {
        let err = decode("{}").unwrap_err();
        assert!(err.to_string().contains(DECODE_FAILED), "{err}");
    }

    #[test]
    fn test_reject_other_json_types() {
        for json in ["null", "42", "true", "[]"] {
            let err = decode(json).unwrap_err();
            assert!(err.to_string().contains("book item"), "{json}: {err}");
        }
    }

    #[test]
    fn test_encode_shapes() {
        assert_eq!(
            serde_json::to_string(&BookItem::Separator).unwrap(),
            r#""Separator""#
        );
        assert_eq!(
            serde_json::to_string(&BookItem::PartTitle("P".into())).unwrap(),
            r#"{"PartTitle":"P"}"#
        );

        let value = serde_json::to_value(BookItem::Chapter(Chapter::new("A", "text"))).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["Chapter"]["name"], "A");
    }
}
