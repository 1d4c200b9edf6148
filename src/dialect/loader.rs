//! Loading custom dialects from YAML.
//!
//! A dialect file maps language tags to keyword sets:
//!
//! ```yaml
//! pirate:
//!   name: Pirate
//!   feature: [Yarn]
//!   background: [Aft]
//!   scenario: [Heave to]
//!   scenario_outline: [Shiver me timbers]
//!   examples: [Dead men tell no tales]
//!   given: ["Gangway! "]
//!   when: ["Blimey! "]
//!   then: ["Let go and haul "]
//!   and: ["Aye "]
//!   but: ["Avast! "]
//! ```
//!
//! Loaded dialects are merged into the table before any parsing starts, so
//! the table is still immutable for the lifetime of every parse pass.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{FableError, Result};

use super::{Dialect, DialectTable};

/// Parse a YAML dialect definition and merge it into `table`.
///
/// Tags that collide with built-in dialects replace them.
pub fn extend_from_yaml(table: &mut DialectTable, yaml: &str) -> Result<()> {
    let parsed: BTreeMap<String, Dialect> =
        serde_yaml::from_str(yaml).map_err(|e| FableError::Dialects {
            message: format!("invalid dialect file: {e}"),
            help: Some("Each entry needs feature, background, scenario, scenario_outline, examples and the five step keyword lists".to_string()),
        })?;

    for (tag, dialect) in parsed {
        validate(&tag, &dialect)?;
        table.insert(tag, dialect);
    }

    Ok(())
}

/// Read a dialect file from disk and merge it into `table`.
pub fn extend_from_file(table: &mut DialectTable, path: &Path) -> Result<()> {
    let yaml = std::fs::read_to_string(path)?;
    extend_from_yaml(table, &yaml)
}

fn validate(tag: &str, dialect: &Dialect) -> Result<()> {
    let empty = |v: &Vec<String>| v.is_empty() || v.iter().any(|k| k.trim().is_empty());

    if tag.trim().is_empty() {
        return Err(FableError::Dialects {
            message: "dialect tag must not be blank".to_string(),
            help: None,
        });
    }

    if empty(&dialect.feature)
        || empty(&dialect.background)
        || empty(&dialect.scenario)
        || empty(&dialect.scenario_outline)
        || empty(&dialect.examples)
        || dialect.step_keywords().count() == 0
    {
        return Err(FableError::Dialects {
            message: format!("dialect '{tag}' has an empty keyword list"),
            help: Some("Every keyword kind needs at least one non-blank entry".to_string()),
        });
    }

    Ok(())
}
