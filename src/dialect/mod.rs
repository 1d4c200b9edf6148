//! Keyword dialects for localized feature documents.
//!
//! A [`Dialect`] holds the literal keyword strings one language uses for
//! feature, background, scenario, scenario outline, examples and step lines.
//! The [`DialectTable`] maps language tags (`en`, `fr`, ...) to dialects; it
//! is built once and passed by reference into every parse call, so there is
//! no process-wide mutable registry.
//!
//! Step keywords are stored with their trailing space (`"Given "`) so that
//! scanning is a plain prefix match; title keywords are stored without the
//! colon. Custom dialects can be merged in from YAML, see [`loader`].

mod builtin;
pub mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::parser::Location;

/// The localized keyword sets for one language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialect {
    /// Native-language display name (e.g. "français").
    #[serde(default)]
    pub name: String,
    pub feature: Vec<String>,
    pub background: Vec<String>,
    pub scenario: Vec<String>,
    pub scenario_outline: Vec<String>,
    pub examples: Vec<String>,
    pub given: Vec<String>,
    #[serde(rename = "when")]
    pub when_: Vec<String>,
    pub then: Vec<String>,
    pub and: Vec<String>,
    pub but: Vec<String>,
}

impl Dialect {
    /// All step keywords in declaration order (given, when, then, and, but).
    ///
    /// This is also the matching priority: earlier entries win when two
    /// keywords share a prefix.
    pub fn step_keywords(&self) -> impl Iterator<Item = &str> {
        self.given
            .iter()
            .chain(&self.when_)
            .chain(&self.then)
            .chain(&self.and)
            .chain(&self.but)
            .map(String::as_str)
    }
}

/// Immutable mapping from language tag to [`Dialect`].
///
/// Construct once ([`DialectTable::builtin`], optionally extended from YAML)
/// and share by reference; lookups never mutate the table.
#[derive(Debug, Clone)]
pub struct DialectTable {
    dialects: BTreeMap<String, Dialect>,
}

/// The language tag used when none is given.
pub const DEFAULT_LANGUAGE: &str = "en";

impl DialectTable {
    /// The table of built-in dialects. The default tag always resolves.
    pub fn builtin() -> Self {
        Self {
            dialects: builtin::dialects(),
        }
    }

    /// Look up a dialect by tag (case-sensitive).
    ///
    /// `location` is where the tag was named: the `# language:` directive,
    /// or `1:1` when the tag came from the API or command line.
    pub fn lookup(&self, tag: &str, location: Location) -> Result<&Dialect, ParseError> {
        self.dialects.get(tag).ok_or_else(|| ParseError::NoSuchDialect {
            language: tag.to_string(),
            location,
        })
    }

    /// All known tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.dialects.keys().map(String::as_str)
    }

    /// Iterate over (tag, dialect) pairs in sorted tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dialect)> {
        self.dialects.iter().map(|(tag, d)| (tag.as_str(), d))
    }

    /// Add or replace a dialect. Used by the YAML loader during construction.
    pub(crate) fn insert(&mut self, tag: String, dialect: Dialect) {
        self.dialects.insert(tag, dialect);
    }
}

impl Default for DialectTable {
    fn default() -> Self {
        Self::builtin()
    }
}
