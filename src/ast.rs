//! AST node types for parsed feature documents.
//!
//! The tree mirrors source order exactly: tags, steps, children and table
//! rows appear in the order they were written and are never deduplicated.
//! Nodes own their children; once a parse pass completes the tree is
//! immutable. All nodes serialize, so downstream tools (documentation
//! renderers, result correlators) can consume the tree as JSON or YAML.

use serde::Serialize;

use crate::parser::Location;

/// Root of a parsed document.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<Feature>,
    /// Comment lines, in source order, wherever they appeared.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

/// A `Feature:` block and everything under it.
#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub location: Location,
    /// Language tag in effect at the feature line.
    pub language: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    /// Localized keyword as written (e.g. `Fonctionnalité`).
    pub keyword: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub children: Vec<FeatureChild>,
}

/// Direct children of a feature, in source order.
///
/// Consumers match on the variant; `Scenario` and `ScenarioOutline` share
/// the [`ScenarioBody`] record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum FeatureChild {
    Background(Background),
    Scenario(Scenario),
    ScenarioOutline(ScenarioOutline),
}

/// The structural shape shared by scenarios, outlines and backgrounds:
/// keyword, name, optional description and ordered steps.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioBody {
    pub location: Location,
    pub keyword: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Background {
    #[serde(flatten)]
    pub body: ScenarioBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub body: ScenarioBody,
}

/// A scenario outline: the scenario shape plus its examples tables.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutline {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub body: ScenarioBody,
    pub examples: Vec<Examples>,
}

/// A single step line, with its optional multi-line argument.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub location: Location,
    /// Trimmed localized step keyword (`Given`, `Quand`, `*`, ...)
    pub keyword: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub argument: Option<StepArg>,
}

/// Multi-line argument attached to a step.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum StepArg {
    DocString(DocString),
    Table(DataTable),
}

/// A fenced block of literal text (`"""` or triple-backtick).
#[derive(Debug, Clone, Serialize)]
pub struct DocString {
    pub location: Location,
    /// Media-type hint given after the opening delimiter, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataTable {
    pub location: Location,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub location: Location,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableCell {
    pub location: Location,
    pub value: String,
}

/// An `Examples:` table under a scenario outline.
#[derive(Debug, Clone, Serialize)]
pub struct Examples {
    pub location: Location,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    pub keyword: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// First table row: the column names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<TableRow>,
    /// Remaining rows, one per example.
    pub rows: Vec<TableRow>,
}

/// An `@tag`, name stored with its leading `@`.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub location: Location,
    pub name: String,
}

/// A `#` comment line.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub location: Location,
    pub text: String,
}

impl FeatureChild {
    /// The shared body record of any child.
    pub fn body(&self) -> &ScenarioBody {
        match self {
            FeatureChild::Background(b) => &b.body,
            FeatureChild::Scenario(s) => &s.body,
            FeatureChild::ScenarioOutline(o) => &o.body,
        }
    }

    /// Tags of this child (backgrounds have none).
    pub fn tags(&self) -> &[Tag] {
        match self {
            FeatureChild::Background(_) => &[],
            FeatureChild::Scenario(s) => &s.tags,
            FeatureChild::ScenarioOutline(o) => &o.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_body_accessor() {
        let body = ScenarioBody {
            location: Location::new(2, 3),
            keyword: "Scenario".to_string(),
            name: "n".to_string(),
            description: None,
            steps: vec![],
        };
        let child = FeatureChild::Scenario(Scenario {
            tags: vec![],
            body,
        });
        assert_eq!(child.body().name, "n");
        assert!(child.tags().is_empty());
    }

    #[test]
    fn test_document_serializes_to_json() {
        let doc = Document {
            feature: None,
            comments: vec![Comment {
                location: Location::new(1, 1),
                text: "# hello".to_string(),
            }],
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["comments"][0]["text"], "# hello");
        assert!(json.get("feature").is_none());
    }
}
