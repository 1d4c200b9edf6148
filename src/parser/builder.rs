//! AST assembly from accepted tokens.
//!
//! The builder receives the action the state machine chose for each token
//! and grows the tree bottom-up. Constructs close when the next keyword (or
//! end of input) arrives; closed nodes are never touched again. Constraints
//! that token adjacency alone cannot express surface as
//! [`ParseError::AstBuilder`]: inconsistent table widths, a second multi-line
//! argument on one step, tags left dangling at end of input.

use crate::ast::{
    Background, Comment, DataTable, DocString, Document, Examples, Feature, FeatureChild,
    Scenario, ScenarioBody, ScenarioOutline, Step, StepArg, TableCell, TableRow, Tag,
};
use crate::error::ParseError;

use super::location::Location;
use super::machine::Action;
use super::token::Token;

/// Where a token at (line, indent) puts the node's location: on the first
/// non-whitespace character.
fn node_location(token: &Token) -> Location {
    Location::new(token.location.line, token.indent + 1)
}

fn join_description(lines: Vec<String>) -> Option<String> {
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Background,
    Scenario,
    Outline,
}

struct StepDraft {
    location: Location,
    keyword: String,
    text: String,
    table: Vec<TableRow>,
    doc_string: Option<DocString>,
}

impl StepDraft {
    fn finish(self) -> Step {
        let argument = if let Some(doc_string) = self.doc_string {
            Some(StepArg::DocString(doc_string))
        } else if let Some(first) = self.table.first() {
            let location = first.location;
            Some(StepArg::Table(DataTable {
                location,
                rows: self.table,
            }))
        } else {
            None
        };
        Step {
            location: self.location,
            keyword: self.keyword,
            text: self.text,
            argument,
        }
    }

    fn has_argument(&self) -> bool {
        self.doc_string.is_some() || !self.table.is_empty()
    }
}

struct ExamplesDraft {
    location: Location,
    tags: Vec<Tag>,
    keyword: String,
    name: String,
    description: Vec<String>,
    header: Option<TableRow>,
    rows: Vec<TableRow>,
}

impl ExamplesDraft {
    fn finish(self) -> Examples {
        Examples {
            location: self.location,
            tags: self.tags,
            keyword: self.keyword,
            name: self.name,
            description: join_description(self.description),
            header: self.header,
            rows: self.rows,
        }
    }
}

struct ContainerDraft {
    kind: ContainerKind,
    location: Location,
    tags: Vec<Tag>,
    keyword: String,
    name: String,
    description: Vec<String>,
    steps: Vec<StepDraft>,
    current_step: Option<StepDraft>,
    examples: Vec<Examples>,
    current_examples: Option<ExamplesDraft>,
}

impl ContainerDraft {
    fn finish(mut self) -> FeatureChild {
        if let Some(step) = self.current_step.take() {
            self.steps.push(step);
        }
        if let Some(examples) = self.current_examples.take() {
            self.examples.push(examples.finish());
        }
        let body = ScenarioBody {
            location: self.location,
            keyword: self.keyword,
            name: self.name,
            description: join_description(self.description),
            steps: self.steps.into_iter().map(StepDraft::finish).collect(),
        };
        match self.kind {
            ContainerKind::Background => FeatureChild::Background(Background { body }),
            ContainerKind::Scenario => FeatureChild::Scenario(Scenario {
                tags: self.tags,
                body,
            }),
            ContainerKind::Outline => FeatureChild::ScenarioOutline(ScenarioOutline {
                tags: self.tags,
                body,
                examples: self.examples,
            }),
        }
    }
}

struct FeatureDraft {
    location: Location,
    tags: Vec<Tag>,
    keyword: String,
    name: String,
    description: Vec<String>,
    children: Vec<FeatureChild>,
}

struct DocStringDraft {
    location: Location,
    content_type: Option<String>,
    lines: Vec<String>,
    /// The opening already collided with an existing step argument; the
    /// error was reported there, so the close quietly drops the draft.
    suppressed: bool,
}

/// Accumulates the AST for one parse pass.
pub struct Builder {
    language: String,
    comments: Vec<Comment>,
    feature: Option<FeatureDraft>,
    pending_tags: Vec<Tag>,
    container: Option<ContainerDraft>,
    doc_string: Option<DocStringDraft>,
}

impl Builder {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            comments: Vec::new(),
            feature: None,
            pending_tags: Vec::new(),
            container: None,
            doc_string: None,
        }
    }

    /// Apply one accepted token. Errors here are semantic-assembly errors;
    /// the caller treats them exactly like grammar errors (abort or collect).
    pub fn apply(&mut self, action: Action, token: &Token) -> Result<(), ParseError> {
        match action {
            Action::SetLanguage => {
                self.language = token.value.clone();
                Ok(())
            }
            Action::AddComment => {
                self.comments.push(Comment {
                    location: node_location(token),
                    text: token.text.clone(),
                });
                Ok(())
            }
            Action::AddTag => {
                self.pending_tags.extend(parse_tags(token));
                Ok(())
            }
            Action::BeginFeature => {
                self.feature = Some(FeatureDraft {
                    location: node_location(token),
                    tags: std::mem::take(&mut self.pending_tags),
                    keyword: token.keyword.clone().unwrap_or_default(),
                    name: token.value.clone(),
                    description: Vec::new(),
                    children: Vec::new(),
                });
                Ok(())
            }
            Action::BeginBackground => self.begin_container(ContainerKind::Background, token),
            Action::BeginScenario => self.begin_container(ContainerKind::Scenario, token),
            Action::BeginOutline => self.begin_container(ContainerKind::Outline, token),
            Action::AddDescription => {
                self.route_description(token);
                Ok(())
            }
            Action::AddStep => self.add_step(token),
            Action::AddTableRow => self.add_table_row(token),
            Action::OpenDocString => self.open_doc_string(token),
            Action::AddDocStringLine => {
                if let Some(draft) = &mut self.doc_string {
                    draft.lines.push(token.text.clone());
                }
                Ok(())
            }
            Action::CloseDocString => self.close_doc_string(),
            Action::BeginExamples => self.begin_examples(token),
            Action::AddExamplesRow => self.add_examples_row(token),
            Action::Skip | Action::EndOfDocument => Ok(()),
        }
    }

    /// Close everything and hand over the document.
    pub fn finish(mut self) -> Result<Document, ParseError> {
        let mut feature = None;
        if let Some(mut draft) = self.feature.take() {
            if let Some(container) = self.container.take() {
                draft.children.push(container.finish());
            }
            if let Some(first) = self.pending_tags.first() {
                return Err(ParseError::AstBuilder {
                    message: "tags are not attached to a scenario".to_string(),
                    location: first.location,
                });
            }
            feature = Some(Feature {
                location: draft.location,
                language: self.language,
                tags: draft.tags,
                keyword: draft.keyword,
                name: draft.name,
                description: join_description(draft.description),
                children: draft.children,
            });
        }
        Ok(Document {
            feature,
            comments: self.comments,
        })
    }

    fn begin_container(&mut self, kind: ContainerKind, token: &Token) -> Result<(), ParseError> {
        let Some(feature) = &mut self.feature else {
            // The grammar opens containers only under a feature; keep the
            // invariant as an error rather than a panic.
            return Err(ParseError::AstBuilder {
                message: "scenario must appear inside a feature".to_string(),
                location: node_location(token),
            });
        };
        if let Some(previous) = self.container.take() {
            feature.children.push(previous.finish());
        }
        self.container = Some(ContainerDraft {
            kind,
            location: node_location(token),
            tags: std::mem::take(&mut self.pending_tags),
            keyword: token.keyword.clone().unwrap_or_default(),
            name: token.value.clone(),
            description: Vec::new(),
            steps: Vec::new(),
            current_step: None,
            examples: Vec::new(),
            current_examples: None,
        });
        Ok(())
    }

    fn route_description(&mut self, token: &Token) {
        let line = token.text.clone();
        match &mut self.container {
            Some(container) => match &mut container.current_examples {
                Some(examples) if examples.header.is_none() => examples.description.push(line),
                _ => container.description.push(line),
            },
            None => {
                if let Some(feature) = &mut self.feature {
                    feature.description.push(line);
                }
            }
        }
    }

    fn add_step(&mut self, token: &Token) -> Result<(), ParseError> {
        let Some(container) = &mut self.container else {
            return Err(ParseError::AstBuilder {
                message: "step must appear inside a scenario or background".to_string(),
                location: node_location(token),
            });
        };
        if let Some(step) = container.current_step.take() {
            container.steps.push(step);
        }
        container.current_step = Some(StepDraft {
            location: node_location(token),
            keyword: token.keyword.clone().unwrap_or_default(),
            text: token.value.clone(),
            table: Vec::new(),
            doc_string: None,
        });
        Ok(())
    }

    fn add_table_row(&mut self, token: &Token) -> Result<(), ParseError> {
        let row = parse_table_row(token);
        let step = self
            .container
            .as_mut()
            .and_then(|c| c.current_step.as_mut());
        let Some(step) = step else {
            return Err(ParseError::AstBuilder {
                message: "table row is not attached to a step".to_string(),
                location: node_location(token),
            });
        };
        if step.doc_string.is_some() {
            return Err(ParseError::AstBuilder {
                message: "step already has a doc string argument".to_string(),
                location: node_location(token),
            });
        }
        if let Some(first) = step.table.first() {
            if first.cells.len() != row.cells.len() {
                return Err(ParseError::AstBuilder {
                    message: "inconsistent cell count within the table".to_string(),
                    location: row.location,
                });
            }
        }
        step.table.push(row);
        Ok(())
    }

    fn open_doc_string(&mut self, token: &Token) -> Result<(), ParseError> {
        let collides = self
            .container
            .as_ref()
            .and_then(|c| c.current_step.as_ref())
            .map(StepDraft::has_argument)
            .unwrap_or(false);
        self.doc_string = Some(DocStringDraft {
            location: node_location(token),
            content_type: if token.value.is_empty() {
                None
            } else {
                Some(token.value.clone())
            },
            lines: Vec::new(),
            suppressed: collides,
        });
        if collides {
            return Err(ParseError::AstBuilder {
                message: "step already has a doc string or table argument".to_string(),
                location: node_location(token),
            });
        }
        Ok(())
    }

    fn close_doc_string(&mut self) -> Result<(), ParseError> {
        let Some(draft) = self.doc_string.take() else {
            return Ok(());
        };
        if draft.suppressed {
            return Ok(());
        }
        if let Some(step) = self
            .container
            .as_mut()
            .and_then(|c| c.current_step.as_mut())
        {
            step.doc_string = Some(DocString {
                location: draft.location,
                content_type: draft.content_type,
                content: draft.lines.join("\n"),
            });
        }
        Ok(())
    }

    fn begin_examples(&mut self, token: &Token) -> Result<(), ParseError> {
        let Some(container) = &mut self.container else {
            return Err(ParseError::AstBuilder {
                message: "examples must appear inside a scenario outline".to_string(),
                location: node_location(token),
            });
        };
        if container.kind != ContainerKind::Outline {
            // The grammar only reaches here from outline states; guard the
            // tree shape anyway.
            return Err(ParseError::AstBuilder {
                message: "examples are only allowed on scenario outlines".to_string(),
                location: node_location(token),
            });
        }
        if let Some(step) = container.current_step.take() {
            container.steps.push(step);
        }
        if let Some(previous) = container.current_examples.take() {
            container.examples.push(previous.finish());
        }
        container.current_examples = Some(ExamplesDraft {
            location: node_location(token),
            tags: std::mem::take(&mut self.pending_tags),
            keyword: token.keyword.clone().unwrap_or_default(),
            name: token.value.clone(),
            description: Vec::new(),
            header: None,
            rows: Vec::new(),
        });
        Ok(())
    }

    fn add_examples_row(&mut self, token: &Token) -> Result<(), ParseError> {
        let row = parse_table_row(token);
        let examples = self
            .container
            .as_mut()
            .and_then(|c| c.current_examples.as_mut());
        let Some(examples) = examples else {
            return Err(ParseError::AstBuilder {
                message: "table row is not attached to an examples section".to_string(),
                location: node_location(token),
            });
        };
        match &examples.header {
            None => examples.header = Some(row),
            Some(header) => {
                if header.cells.len() != row.cells.len() {
                    return Err(ParseError::AstBuilder {
                        message: "inconsistent cell count within the table".to_string(),
                        location: row.location,
                    });
                }
                examples.rows.push(row);
            }
        }
        Ok(())
    }
}

/// Split a tag line into tags; columns point at each `@`.
fn parse_tags(token: &Token) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut column = token.indent + 1;
    for part in token.text.split(' ') {
        if part.starts_with('@') {
            tags.push(Tag {
                location: Location::new(token.location.line, column),
                name: part.to_string(),
            });
        }
        column += part.chars().count() as u32 + 1;
    }
    tags
}

/// Split a `| .. |` line into trimmed cells; columns point at the first
/// character of each cell's content. `\|`, `\\` and `\n` escapes apply.
fn parse_table_row(token: &Token) -> TableRow {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut cell_start = 0u32;
    // Column of the character being read, 1-based within the physical line.
    let mut column = token.indent + 1;
    let mut escaping = false;
    let mut open = false;

    for c in token.text.chars() {
        if escaping {
            match c {
                'n' => cell.push('\n'),
                '\\' | '|' => cell.push(c),
                other => {
                    // Unknown escape: keep both characters.
                    cell.push('\\');
                    cell.push(other);
                }
            }
            escaping = false;
        } else if c == '\\' {
            escaping = true;
        } else if c == '|' {
            if open {
                cells.push(finish_cell(&cell, token, cell_start));
            }
            open = true;
            cell.clear();
            cell_start = column + 1;
        } else {
            cell.push(c);
        }
        column += 1;
    }
    // The scanner only classifies lines that start and end with `|` as table
    // rows, so the final cell is always closed by the time we get here.

    TableRow {
        location: Location::new(token.location.line, token.indent + 1),
        cells,
    }
}

fn finish_cell(raw: &str, token: &Token, cell_start: u32) -> TableCell {
    let leading = raw.chars().take_while(|c| *c == ' ').count() as u32;
    TableCell {
        location: Location::new(token.location.line, cell_start + leading),
        value: raw.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TokenType;
    use pretty_assertions::assert_eq;

    fn table_token(text: &str, line: u32, indent: u32) -> Token {
        Token {
            token_type: TokenType::TableRow,
            text: text.to_string(),
            keyword: None,
            value: text.to_string(),
            location: Location::new(line, 1),
            indent,
        }
    }

    #[test]
    fn test_parse_table_row_cells_and_columns() {
        let row = parse_table_row(&table_token("| one | two |", 5, 4));

        assert_eq!(row.location, Location::new(5, 5));
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cells[0].value, "one");
        assert_eq!(row.cells[0].location, Location::new(5, 7));
        assert_eq!(row.cells[1].value, "two");
        assert_eq!(row.cells[1].location, Location::new(5, 13));
    }

    #[test]
    fn test_parse_table_row_escapes() {
        let row = parse_table_row(&table_token(r"| a\|b | c\\d | e\nf |", 1, 0));

        let values: Vec<&str> = row.cells.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["a|b", "c\\d", "e\nf"]);
    }

    #[test]
    fn test_parse_table_row_empty_cells() {
        let row = parse_table_row(&table_token("|||", 1, 0));
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cells[0].value, "");
    }

    #[test]
    fn test_parse_tags_columns_point_at_at_signs() {
        let token = Token {
            token_type: TokenType::TagLine,
            text: "@smoke @fast".to_string(),
            keyword: None,
            value: "@smoke @fast".to_string(),
            location: Location::new(2, 1),
            indent: 2,
        };
        let tags = parse_tags(&token);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "@smoke");
        assert_eq!(tags[0].location, Location::new(2, 3));
        assert_eq!(tags[1].name, "@fast");
        assert_eq!(tags[1].location, Location::new(2, 10));
    }

    fn title_token(token_type: TokenType, keyword: &str, name: &str, line: u32) -> Token {
        Token {
            token_type,
            text: format!("{keyword}: {name}"),
            keyword: Some(keyword.to_string()),
            value: name.to_string(),
            location: Location::new(line, 1),
            indent: 0,
        }
    }

    #[test]
    fn test_builder_assembles_feature_with_scenario() {
        let mut builder = Builder::new("en");
        builder
            .apply(
                Action::BeginFeature,
                &title_token(TokenType::FeatureLine, "Feature", "X", 1),
            )
            .unwrap();
        builder
            .apply(
                Action::BeginScenario,
                &title_token(TokenType::ScenarioLine, "Scenario", "Y", 2),
            )
            .unwrap();
        let step = Token {
            token_type: TokenType::StepLine,
            text: "Given a thing".to_string(),
            keyword: Some("Given".to_string()),
            value: "a thing".to_string(),
            location: Location::new(3, 1),
            indent: 4,
        };
        builder.apply(Action::AddStep, &step).unwrap();

        let doc = builder.finish().unwrap();
        let feature = doc.feature.unwrap();
        assert_eq!(feature.name, "X");
        assert_eq!(feature.language, "en");
        assert_eq!(feature.children.len(), 1);

        let body = feature.children[0].body();
        assert_eq!(body.name, "Y");
        assert_eq!(body.steps.len(), 1);
        assert_eq!(body.steps[0].keyword, "Given");
        assert_eq!(body.steps[0].text, "a thing");
        assert_eq!(body.steps[0].location, Location::new(3, 5));
    }

    #[test]
    fn test_inconsistent_table_width_is_ast_error() {
        let mut builder = Builder::new("en");
        builder
            .apply(
                Action::BeginFeature,
                &title_token(TokenType::FeatureLine, "Feature", "X", 1),
            )
            .unwrap();
        builder
            .apply(
                Action::BeginScenario,
                &title_token(TokenType::ScenarioLine, "Scenario", "Y", 2),
            )
            .unwrap();
        let step = Token {
            token_type: TokenType::StepLine,
            text: "Given t".to_string(),
            keyword: Some("Given".to_string()),
            value: "t".to_string(),
            location: Location::new(3, 1),
            indent: 4,
        };
        builder.apply(Action::AddStep, &step).unwrap();
        builder
            .apply(Action::AddTableRow, &table_token("| a | b |", 4, 6))
            .unwrap();

        let err = builder
            .apply(Action::AddTableRow, &table_token("| a |", 5, 6))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "(5:7): inconsistent cell count within the table"
        );
    }

    #[test]
    fn test_dangling_tags_fail_at_finish() {
        let mut builder = Builder::new("en");
        builder
            .apply(
                Action::BeginFeature,
                &title_token(TokenType::FeatureLine, "Feature", "X", 1),
            )
            .unwrap();
        let tags = Token {
            token_type: TokenType::TagLine,
            text: "@orphan".to_string(),
            keyword: None,
            value: "@orphan".to_string(),
            location: Location::new(2, 1),
            indent: 2,
        };
        builder.apply(Action::AddTag, &tags).unwrap();

        let err = builder.finish().unwrap_err();
        assert_eq!(err.to_string(), "(2:3): tags are not attached to a scenario");
    }
}
