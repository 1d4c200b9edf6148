//! Typed tokens produced by the scanner.

use super::location::Location;

/// Classification of a single source line.
///
/// The scanner assigns exactly one type per physical line; the synthetic
/// `Eof` token marks the end of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// `# language: <tag>` directive
    Language,
    /// `@tag` line
    TagLine,
    /// `Feature:` title line (localized keyword)
    FeatureLine,
    /// `Background:` title line
    BackgroundLine,
    /// `Scenario:` title line
    ScenarioLine,
    /// `Scenario Outline:` title line
    ScenarioOutlineLine,
    /// `Examples:` title line
    ExamplesLine,
    /// `Given`/`When`/`Then`/`And`/`But` step line
    StepLine,
    /// `"""` or ``` delimiter line
    DocStringSeparator,
    /// `| .. |` table row line
    TableRow,
    /// `#` comment line
    Comment,
    /// Blank line
    Empty,
    /// Free text: description or doc-string content
    Other,
    /// Synthetic end-of-input marker
    Eof,
}

impl TokenType {
    /// Name used in the `expected:` lists of parse error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenType::Language => "Language",
            TokenType::TagLine => "TagLine",
            TokenType::FeatureLine => "Feature",
            TokenType::BackgroundLine => "Background",
            TokenType::ScenarioLine => "Scenario",
            TokenType::ScenarioOutlineLine => "Scenario Outline",
            TokenType::ExamplesLine => "Examples",
            TokenType::StepLine => "Step",
            TokenType::DocStringSeparator => "DocString",
            TokenType::TableRow => "TableRow",
            TokenType::Comment => "Comment",
            TokenType::Empty => "Empty",
            TokenType::Other => "Other",
            TokenType::Eof => "EOF",
        }
    }
}

/// One classified source line, plus the synthetic end-of-input marker.
///
/// `text` is the line with leading indent and trailing whitespace removed
/// (doc-string content lines keep indentation beyond the opening delimiter).
/// Tokens are produced once by the scanner and consumed once by the state
/// machine; nothing mutates them in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub text: String,
    /// The matched localized keyword for title and step lines, trimmed.
    pub keyword: Option<String>,
    /// Text after the keyword: title, step text, language tag, or
    /// doc-string content type.
    pub value: String,
    /// Start of the physical line.
    pub location: Location,
    /// Count of leading whitespace characters on the physical line.
    pub indent: u32,
}

impl Token {
    pub fn eof(line: u32) -> Self {
        Self {
            token_type: TokenType::Eof,
            text: String::new(),
            keyword: None,
            value: String::new(),
            location: Location::new(line, 1),
            indent: 0,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.token_type == TokenType::Eof
    }

    /// Location used when reporting this token in an error.
    ///
    /// A token located at column 1 is reported at its first non-whitespace
    /// character so the caret lands on visible text.
    pub fn error_location(&self) -> Location {
        if self.is_eof() || self.location.column > 1 {
            self.location
        } else {
            Location::new(self.location.line, self.indent + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_location_adjusts_column_one() {
        let token = Token {
            token_type: TokenType::Other,
            text: "stray text".to_string(),
            keyword: None,
            value: "stray text".to_string(),
            location: Location::new(4, 1),
            indent: 2,
        };
        assert_eq!(token.error_location(), Location::new(4, 3));
    }

    #[test]
    fn test_error_location_keeps_eof() {
        let token = Token::eof(9);
        assert_eq!(token.error_location(), Location::new(9, 1));
    }
}
