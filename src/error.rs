//! Error types for fable.
//!
//! [`ParseError`] is the closed set of failures a parse pass can produce;
//! downstream tools match on its variants and on the exact message format
//! `"(line:column): message"`. [`FableError`] wraps it for CLI-level
//! operations that also touch the file system.

use miette::Diagnostic;
use thiserror::Error;

use crate::parser::{Location, Token};

/// Render every child error message on its own line.
fn render_all(errors: &[ParseError]) -> String {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    messages.join("\n")
}

/// A failure encountered while parsing one document.
///
/// All located variants render as `"(line:column): message"`; tooling parses
/// these strings, so the formats here are a compatibility contract.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The requested language tag is not in the dialect table.
    #[error("({}): Language not supported: {}", .location, .language)]
    #[diagnostic(code(fable::parse::no_such_language))]
    NoSuchDialect { language: String, location: Location },

    /// A token the current grammar state does not accept.
    #[error("({}): expected: {}, got '{}'", .location, .expected.join(", "), .token.text.trim())]
    #[diagnostic(code(fable::parse::unexpected_token))]
    UnexpectedToken {
        /// Already adjusted: a column-1 token is reported at `indent + 1`.
        location: Location,
        token: Token,
        /// Significant token-type names the state accepts, in priority order.
        expected: Vec<&'static str>,
        /// Diagnostic label of the state that rejected the token.
        state: &'static str,
    },

    /// End of input where the grammar still expected tokens.
    #[error("({}): unexpected end of file, expected: {}", .location, .expected.join(", "))]
    #[diagnostic(code(fable::parse::unexpected_eof))]
    UnexpectedEof {
        location: Location,
        expected: Vec<&'static str>,
        state: &'static str,
    },

    /// A grammatically valid token sequence that builds an invalid tree.
    #[error("({}): {}", .location, .message)]
    #[diagnostic(code(fable::parse::ast))]
    AstBuilder { message: String, location: Location },

    /// One or more independent errors collected in one pass.
    #[error("Parser errors:\n{}", render_all(.errors))]
    #[diagnostic(code(fable::parse::composite))]
    Composite { errors: Vec<ParseError> },
}

impl ParseError {
    /// Build an [`ParseError::UnexpectedToken`] from the offending token,
    /// applying the column-1 caret adjustment.
    pub(crate) fn unexpected_token(
        token: Token,
        expected: Vec<&'static str>,
        state: &'static str,
    ) -> Self {
        ParseError::UnexpectedToken {
            location: token.error_location(),
            token,
            expected,
            state,
        }
    }

    pub(crate) fn unexpected_eof(
        token: &Token,
        expected: Vec<&'static str>,
        state: &'static str,
    ) -> Self {
        ParseError::UnexpectedEof {
            location: token.location,
            expected,
            state,
        }
    }

    /// Wrap collected errors. Callers must pass at least one error; a single
    /// error is still wrapped so callers handle both modes uniformly.
    pub(crate) fn composite(errors: Vec<ParseError>) -> Self {
        debug_assert!(!errors.is_empty(), "composite of zero errors");
        ParseError::Composite { errors }
    }

    /// The contained errors of a composite, or the error itself.
    pub fn flatten(&self) -> &[ParseError] {
        match self {
            ParseError::Composite { errors } => errors,
            _ => std::slice::from_ref(self),
        }
    }

    /// Location of this error, if it has a single one.
    pub fn location(&self) -> Option<Location> {
        match self {
            ParseError::NoSuchDialect { location, .. }
            | ParseError::UnexpectedToken { location, .. }
            | ParseError::UnexpectedEof { location, .. }
            | ParseError::AstBuilder { location, .. } => Some(*location),
            ParseError::Composite { .. } => None,
        }
    }
}

/// Main error type for fable operations.
#[derive(Error, Diagnostic, Debug)]
pub enum FableError {
    #[error("IO error: {0}")]
    #[diagnostic(code(fable::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error("Dialect error: {message}")]
    #[diagnostic(code(fable::dialects))]
    Dialects {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Render error: {message}")]
    #[diagnostic(code(fable::render))]
    Render { message: String },

    #[error("{failures} of {checked} files failed the syntax check")]
    #[diagnostic(code(fable::check))]
    CheckFailed { failures: usize, checked: usize },
}

pub type Result<T> = std::result::Result<T, FableError>;
