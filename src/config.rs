//! Build configuration carried by the render context.
//!
//! The known sections (`book`, `build`, `rust`) decode into typed structs.
//! Backend and preprocessor tables are owned by plugins this crate knows
//! nothing about, so they stay as raw JSON and re-encode unchanged.
//!
//! Every field is optional: a section or key missing from the wire stays
//! `None` rather than being filled with a default, and is omitted again on
//! re-encoding. The plugin maps also keep an explicit `null` (`Some(None)`)
//! apart from a missing key, so it survives re-encoding.
//!
//! ```
//! use bookwalk::Config;
//!
//! let config: Config = serde_json::from_str(r#"{
//!     "book": {"title": "Guide"},
//!     "output": {"html": {"theme": "dark"}}
//! }"#).unwrap();
//!
//! assert_eq!(config.get("output.html.theme").unwrap(), "dark");
//! assert!(config.preprocessor.is_none());
//! ```

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Plugin name to plugin-specific configuration.
pub type PluginTables = Map<String, Value>;

/// The book's configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<BookConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rust: Option<RustConfig>,
    /// Backend tables, keyed by renderer name (`output.html`, ...).
    ///
    /// `None` when the key is missing, `Some(None)` when it is `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub output: Option<Option<PluginTables>>,
    /// Preprocessor tables, keyed by preprocessor name.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub preprocessor: Option<Option<PluginTables>>,
    /// Any other top-level tables.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// The `[book]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BookConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source directory, relative to the book root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multilingual: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(
        default,
        alias = "text_direction",
        skip_serializing_if = "Option::is_none"
    )]
    pub text_direction: Option<TextDirection>,
}

/// Reading direction of the book's language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDirection {
    #[serde(rename = "ltr", alias = "LeftToRight")]
    LeftToRight,
    #[serde(rename = "rtl", alias = "RightToLeft")]
    RightToLeft,
}

/// The `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    #[serde(default, alias = "build_dir", skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,
    #[serde(
        default,
        alias = "create_missing",
        skip_serializing_if = "Option::is_none"
    )]
    pub create_missing: Option<bool>,
    #[serde(
        default,
        alias = "use_default_preprocessors",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_default_preprocessors: Option<bool>,
    #[serde(
        default,
        alias = "extra_watch_dirs",
        skip_serializing_if = "Option::is_none"
    )]
    pub extra_watch_dirs: Option<Vec<PathBuf>>,
}

/// The `[rust]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RustConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
}

impl Config {
    /// Look up a value by dotted path, e.g. `"output.html.theme"`.
    ///
    /// Known sections are addressed by their wire names (`build.create-missing`).
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut parts = key.split('.');
        let head = parts.next()?;

        let mut current = match head {
            "output" => tables_value(self.output.as_ref()?),
            "preprocessor" => tables_value(self.preprocessor.as_ref()?),
            "book" => serde_json::to_value(self.book.as_ref()?).ok()?,
            "build" => serde_json::to_value(self.build.as_ref()?).ok()?,
            "rust" => serde_json::to_value(self.rust.as_ref()?).ok()?,
            other => self.rest.get(other)?.clone(),
        };

        for part in parts {
            current = match current {
                Value::Object(mut map) => map.remove(part)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Look up a value by dotted path and decode it into `T`.
    ///
    /// Returns `Ok(None)` when nothing is stored under `key`, and a decode
    /// error when something is stored but does not fit `T`.
    pub fn get_deserialized_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// The `output.<name>` table for a backend, if configured.
    pub fn output_section(&self, name: &str) -> Option<&Value> {
        self.output.as_ref()?.as_ref()?.get(name)
    }

    /// The `preprocessor.<name>` table for a preprocessor, if configured.
    pub fn preprocessor_section(&self, name: &str) -> Option<&Value> {
        self.preprocessor.as_ref()?.as_ref()?.get(name)
    }
}

fn tables_value(tables: &Option<PluginTables>) -> Value {
    tables.clone().map_or(Value::Null, Value::Object)
}

/// A key that is on the wire is `Some`, even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
