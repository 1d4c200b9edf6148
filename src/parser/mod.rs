//! The feature-document parser.
//!
//! Three stages run strictly in document order, single-threaded, with no
//! I/O: the [`Scanner`] turns lines into typed tokens, the state machine
//! picks an action per token (or rejects it with a located error), and the
//! builder grows the AST. The [`Parser`] facade wires them together in
//! one of two modes:
//!
//! - **fail-fast** ([`Parser::parse`]): the first error aborts the pass;
//! - **collect-all** ([`Parser::parse_collecting`]): every error is
//!   recorded, the offending token is skipped with the machine left in
//!   place, and the pass continues; at the end all errors come back wrapped
//!   in a single [`ParseError::Composite`].
//!
//! Both modes produce identical trees on error-free input. Each pass owns
//! its scanner, machine, builder and error list, so separate documents can
//! be parsed concurrently against one shared [`DialectTable`].
//!
//! # Usage
//!
//! ```
//! use fable::dialect::DialectTable;
//! use fable::parser::Parser;
//!
//! let dialects = DialectTable::builtin();
//! let parser = Parser::new(&dialects);
//!
//! let doc = parser.parse_default("Feature: X\n  Scenario: Y\n    Given a thing\n")?;
//! assert_eq!(doc.feature.unwrap().name, "X");
//! # Ok::<(), fable::ParseError>(())
//! ```

mod builder;
mod location;
mod machine;
mod scanner;
mod token;

pub use location::Location;
pub use scanner::Scanner;
pub use token::{Token, TokenType};

use crate::ast::Document;
use crate::dialect::{DialectTable, DEFAULT_LANGUAGE};
use crate::error::ParseError;

use builder::Builder;
use machine::Machine;

/// Parser over one immutable dialect table.
pub struct Parser<'tab> {
    dialects: &'tab DialectTable,
}

impl<'tab> Parser<'tab> {
    pub fn new(dialects: &'tab DialectTable) -> Self {
        Self { dialects }
    }

    /// Parse in fail-fast mode with the default language.
    pub fn parse_default(&self, source: &str) -> Result<Document, ParseError> {
        self.parse(source, DEFAULT_LANGUAGE)
    }

    /// Parse in fail-fast mode: the first error aborts and is returned as-is.
    pub fn parse(&self, source: &str, language: &str) -> Result<Document, ParseError> {
        self.run(source, language, true)
    }

    /// Parse in collect-all mode: every independent error is gathered and
    /// returned inside one [`ParseError::Composite`] (a single error is
    /// still wrapped).
    pub fn parse_collecting(&self, source: &str, language: &str) -> Result<Document, ParseError> {
        self.run(source, language, false)
    }

    fn run(&self, source: &str, language: &str, fail_fast: bool) -> Result<Document, ParseError> {
        // Dialect resolution happens before any token is produced, so an
        // unknown tag always beats token-level errors.
        let dialect = self.dialects.lookup(language, Location::new(1, 1))?;

        let scanner = Scanner::new(source, self.dialects, dialect);
        let mut machine = Machine::new();
        let mut builder = Builder::new(language);
        let mut errors: Vec<ParseError> = Vec::new();

        for item in scanner {
            let token = match item {
                Ok(token) => token,
                Err(error) => {
                    if fail_fast {
                        return Err(error);
                    }
                    errors.push(error);
                    continue;
                }
            };
            let at_end = token.is_eof();

            match machine.step(&token) {
                Ok(action) => {
                    if let Err(error) = builder.apply(action, &token) {
                        if fail_fast {
                            return Err(error);
                        }
                        errors.push(error);
                    }
                }
                Err(error) => {
                    if fail_fast {
                        return Err(error);
                    }
                    // Recovery: drop the token, stay in the current state.
                    errors.push(error);
                }
            }

            if at_end {
                break;
            }
        }

        match builder.finish() {
            Ok(document) => {
                if errors.is_empty() {
                    Ok(document)
                } else {
                    Err(ParseError::composite(errors))
                }
            }
            Err(error) => {
                if fail_fast {
                    return Err(error);
                }
                errors.push(error);
                Err(ParseError::composite(errors))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FeatureChild, StepArg};
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<Document, ParseError> {
        let dialects = DialectTable::builtin();
        Parser::new(&dialects).parse_default(source)
    }

    fn parse_collecting(source: &str) -> Result<Document, ParseError> {
        let dialects = DialectTable::builtin();
        Parser::new(&dialects).parse_collecting(source, DEFAULT_LANGUAGE)
    }

    #[test]
    fn test_minimal_document() {
        let doc = parse("Feature: X\n  Scenario: Y\n    Given a thing\n").unwrap();

        let feature = doc.feature.unwrap();
        assert_eq!(feature.name, "X");
        assert_eq!(feature.keyword, "Feature");
        assert_eq!(feature.location, Location::new(1, 1));

        let body = feature.children[0].body();
        assert_eq!(body.name, "Y");
        assert_eq!(body.location, Location::new(2, 3));
        assert_eq!(body.steps.len(), 1);
        assert_eq!(body.steps[0].keyword, "Given");
        assert_eq!(body.steps[0].text, "a thing");
    }

    #[test]
    fn test_minimal_document_json_shape() {
        let doc = parse("Feature: X\n  Scenario: Y\n    Given a thing\n").unwrap();
        insta::assert_json_snapshot!(doc, @r###"
        {
          "feature": {
            "location": {
              "line": 1,
              "column": 1
            },
            "language": "en",
            "keyword": "Feature",
            "name": "X",
            "children": [
              {
                "type": "Scenario",
                "location": {
                  "line": 2,
                  "column": 3
                },
                "keyword": "Scenario",
                "name": "Y",
                "steps": [
                  {
                    "location": {
                      "line": 3,
                      "column": 5
                    },
                    "keyword": "Given",
                    "text": "a thing"
                  }
                ]
              }
            ]
          }
        }
        "###);
    }

    #[test]
    fn test_empty_document_expects_feature() {
        let err = parse("").unwrap_err();
        assert_eq!(err.to_string(), "(1:1): unexpected end of file, expected: Feature");
    }

    #[test]
    fn test_scenario_without_steps_expects_step() {
        let err = parse("Feature: X\n  Scenario: Y\n").unwrap_err();
        assert_eq!(err.to_string(), "(3:1): unexpected end of file, expected: Step");
    }

    #[test]
    fn test_unknown_language_beats_token_errors() {
        let dialects = DialectTable::builtin();
        let parser = Parser::new(&dialects);

        // The document is full of faults, but the dialect fails first.
        let err = parser.parse("not even close\n| woops |\n", "tlh").unwrap_err();
        assert_eq!(err.to_string(), "(1:1): Language not supported: tlh");

        let err = parser
            .parse_collecting("not even close\n", "tlh")
            .unwrap_err();
        assert!(matches!(err, ParseError::NoSuchDialect { .. }));
    }

    #[test]
    fn test_tags_preserved_in_source_order() {
        let source = "@b @a\n@a\nFeature: X\n  @slow @smoke\n  Scenario: Y\n    Given t\n";
        let doc = parse(source).unwrap();
        let feature = doc.feature.unwrap();

        let names: Vec<&str> = feature.tags.iter().map(|t| t.name.as_str()).collect();
        // Order kept, duplicates kept
        assert_eq!(names, vec!["@b", "@a", "@a"]);

        let scenario_tags: Vec<&str> = feature.children[0]
            .tags()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(scenario_tags, vec!["@slow", "@smoke"]);
    }

    #[test]
    fn test_background_and_scenarios_in_order() {
        let source = "\
Feature: X
  Background: setup
    Given base

  Scenario: one
    Given a

  Scenario Outline: two
    Given <n>

    Examples:
      | n |
      | 1 |
";
        let doc = parse(source).unwrap();
        let feature = doc.feature.unwrap();
        assert_eq!(feature.children.len(), 3);
        assert!(matches!(feature.children[0], FeatureChild::Background(_)));
        assert!(matches!(feature.children[1], FeatureChild::Scenario(_)));
        assert!(matches!(feature.children[2], FeatureChild::ScenarioOutline(_)));

        let FeatureChild::ScenarioOutline(outline) = &feature.children[2] else {
            unreachable!();
        };
        assert_eq!(outline.examples.len(), 1);
        let examples = &outline.examples[0];
        let header = examples.header.as_ref().unwrap();
        assert_eq!(header.cells[0].value, "n");
        assert_eq!(examples.rows.len(), 1);
        assert_eq!(examples.rows[0].cells[0].value, "1");
    }

    #[test]
    fn test_descriptions_attach_to_their_constructs() {
        let source = "\
Feature: X
  This feature has
  a two-line description.

  Scenario: Y
    Scenario prose.
    Given t
";
        let doc = parse(source).unwrap();
        let feature = doc.feature.unwrap();
        assert_eq!(
            feature.description.as_deref(),
            Some("This feature has\na two-line description.")
        );
        assert_eq!(
            feature.children[0].body().description.as_deref(),
            Some("Scenario prose.")
        );
    }

    #[test]
    fn test_step_doc_string() {
        let source = "\
Feature: X
  Scenario: Y
    Given a payload
      \"\"\"json
      {\"a\": 1}
      \"\"\"
";
        let doc = parse(source).unwrap();
        let feature = doc.feature.unwrap();
        let steps = &feature.children[0].body().steps;
        let Some(StepArg::DocString(doc_string)) = &steps[0].argument else {
            panic!("expected doc string argument");
        };
        assert_eq!(doc_string.content_type.as_deref(), Some("json"));
        assert_eq!(doc_string.content, "{\"a\": 1}");
        assert_eq!(doc_string.location, Location::new(4, 7));
    }

    #[test]
    fn test_step_data_table() {
        let source = "\
Feature: X
  Scenario: Y
    Given these users:
      | name | role  |
      | ada  | admin |
";
        let doc = parse(source).unwrap();
        let feature = doc.feature.unwrap();
        let steps = &feature.children[0].body().steps;
        let Some(StepArg::Table(table)) = &steps[0].argument else {
            panic!("expected table argument");
        };
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].cells[1].value, "admin");
    }

    #[test]
    fn test_unterminated_table_row_is_rejected() {
        // No silent zero-cell row: a `|` line without its closing delimiter
        // is free text, which the step state rejects.
        let source = "Feature: X\n  Scenario: Y\n    Given t\n      | a\n";
        let err = parse(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "(4:7): expected: Step, TableRow, DocString, Scenario, Scenario Outline, got '| a'"
        );
    }

    #[test]
    fn test_unterminated_doc_string() {
        let source = "Feature: X\n  Scenario: Y\n    Given t\n      \"\"\"\n      lost\n";
        let err = parse(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "(6:1): unexpected end of file, expected: DocString"
        );
    }

    #[test]
    fn test_fail_fast_and_collect_agree_on_valid_input() {
        let source = "\
# language: fr
Fonctionnalité: Paiements
  Scénario: virement
    Soit un compte
    Quand je vire
    Alors c'est fait
";
        let fast = parse(source).unwrap();
        let collected = parse_collecting(source).unwrap();

        assert_eq!(
            serde_json::to_value(&fast).unwrap(),
            serde_json::to_value(&collected).unwrap()
        );
        let feature = fast.feature.unwrap();
        assert_eq!(feature.language, "fr");
        assert_eq!(feature.keyword, "Fonctionnalité");
        assert_eq!(feature.children[0].body().steps.len(), 3);
    }

    #[test]
    fn test_single_fault_wrapped_as_composite_of_one() {
        let source = "Feature: X\n  Scenario: Y\n";
        let fast = parse(source).unwrap_err();
        let collected = parse_collecting(source).unwrap_err();

        let children = collected.flatten();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0], fast);
        // Still wrapped, not collapsed
        assert!(matches!(collected, ParseError::Composite { .. }));
    }

    #[test]
    fn test_independent_faults_each_reported() {
        // Line 2: stray table row before any scenario.
        // Line 5: examples under a plain scenario.
        let source = "\
Feature: X
  | stray |
  Scenario: Y
    Given t
    Examples:
  Scenario: Z
    Given u
";
        let err = parse_collecting(source).unwrap_err();
        let children = err.flatten();
        assert_eq!(children.len(), 2);

        assert_eq!(children[0].location(), Some(Location::new(2, 3)));
        assert!(children[0]
            .to_string()
            .contains("expected: Background, Scenario, Scenario Outline"));

        assert_eq!(children[1].location(), Some(Location::new(5, 5)));
        assert!(children[1].to_string().contains("got 'Examples:'"));
    }

    #[test]
    fn test_recovery_keeps_later_constructs() {
        // The fault on line 2 must not cascade into errors for the valid
        // scenario that follows.
        let source = "\
Feature: X
  | stray |
  Scenario: Y
    Given t
";
        let fast = parse(source).unwrap_err();
        let collected = parse_collecting(source).unwrap_err();

        assert_eq!(collected.flatten().len(), 1);
        assert_eq!(collected.flatten()[0], fast);
    }

    #[test]
    fn test_column_one_fault_reported_at_indent() {
        let source = "Feature: X\n    | indented stray |\n";
        let err = parse(source).unwrap_err();
        assert_eq!(err.location(), Some(Location::new(2, 5)));
    }

    #[test]
    fn test_comments_collected_on_document() {
        let source = "# top\nFeature: X\n  # inner\n  Scenario: Y\n    Given t\n";
        let doc = parse(source).unwrap();
        assert_eq!(doc.comments.len(), 2);
        assert_eq!(doc.comments[0].text, "# top");
        assert_eq!(doc.comments[1].location, Location::new(3, 3));
    }

    #[test]
    fn test_ast_builder_error_collected_alongside_grammar_errors() {
        let source = "\
Feature: X
  Scenario: Y
    Given t
      | a | b |
      | a |
";
        let err = parse_collecting(source).unwrap_err();
        let messages: Vec<String> = err.flatten().iter().map(|e| e.to_string()).collect();
        assert_eq!(messages, vec!["(5:7): inconsistent cell count within the table"]);
    }

    #[test]
    fn test_composite_message_format() {
        let source = "Feature: X\n  | stray |\n  Scenario: Y\n";
        let err = parse_collecting(source).unwrap_err();
        let rendered = err.to_string();

        let mut lines = rendered.lines();
        assert_eq!(lines.next(), Some("Parser errors:"));
        assert!(lines.next().unwrap().starts_with("(2:3): expected:"));
        assert!(lines.next().unwrap().starts_with("(4:1): unexpected end of file"));
    }
}
