//! fable - Feature specification parser
//!
//! A library and CLI for parsing Gherkin-style feature specification
//! documents into an AST for documentation and test-result tooling.

pub mod ast;
pub mod cli;
pub mod dialect;
pub mod discovery;
pub mod error;
pub mod output;
pub mod parser;

pub use ast::{
    Background, Comment, DataTable, DocString, Document, Examples, Feature, FeatureChild,
    Scenario, ScenarioBody, ScenarioOutline, Step, StepArg, TableCell, TableRow, Tag,
};
pub use dialect::{Dialect, DialectTable, DEFAULT_LANGUAGE};
pub use discovery::discover_features;
pub use error::{FableError, ParseError, Result};
pub use parser::{Location, Parser, Token, TokenType};
