//! Lexical scanner: raw lines to typed tokens.
//!
//! A lazy, single-pass iterator over [`Token`]s. Each physical line yields
//! exactly one token; the final item is a synthetic end-of-input token
//! located one past the last line. Classification priority (the tie-break
//! contract: directives and keywords win over free text):
//!
//! 1. `# language:` directive
//! 2. comment (`#`)
//! 3. tag line (`@`)
//! 4. title keywords (`Feature:`, `Background:`, `Scenario:`,
//!    `Scenario Outline:`, `Examples:`, per the active dialect)
//! 5. step keywords (`Given `, `When `, ... per the active dialect)
//! 6. doc-string delimiter (`"""` or triple backtick)
//! 7. table row (trimmed line starts and ends with `|`)
//! 8. blank line
//! 9. anything else: free text (`Other`)
//!
//! Inside an open doc string every line is content (`Other`) except the
//! matching closing delimiter; content keeps indentation beyond the opening
//! delimiter's indent. A `# language:` directive switches the active dialect
//! for all following lines; an unknown tag surfaces as a
//! [`ParseError::NoSuchDialect`] item located at the directive.

use crate::dialect::{Dialect, DialectTable};
use crate::error::ParseError;

use super::location::Location;
use super::token::{Token, TokenType};

const DOC_STRING_QUOTES: &str = "\"\"\"";
const DOC_STRING_BACKTICKS: &str = "```";

/// State of an open doc string.
struct OpenDocString {
    /// The delimiter that opened it; only the same one closes it.
    delimiter: &'static str,
    /// Indent of the opening delimiter; content is dedented by at most this.
    indent: u32,
}

/// Scanner over one document's lines. Non-restartable; consume once.
pub struct Scanner<'src, 'tab> {
    table: &'tab DialectTable,
    dialect: &'tab Dialect,
    lines: std::str::Lines<'src>,
    line_number: u32,
    doc_string: Option<OpenDocString>,
    /// Directives are only honored before the first content line; a later
    /// `# language:` is an ordinary comment.
    content_seen: bool,
    done: bool,
}

impl<'src, 'tab> Scanner<'src, 'tab> {
    pub fn new(source: &'src str, table: &'tab DialectTable, dialect: &'tab Dialect) -> Self {
        Self {
            table,
            dialect,
            lines: source.lines(),
            line_number: 0,
            doc_string: None,
            content_seen: false,
            done: false,
        }
    }

    fn token(
        &self,
        token_type: TokenType,
        text: &str,
        keyword: Option<&str>,
        value: &str,
        indent: u32,
    ) -> Token {
        Token {
            token_type,
            text: text.to_string(),
            keyword: keyword.map(|k| k.trim_end().to_string()),
            value: value.to_string(),
            location: Location::new(self.line_number, 1),
            indent,
        }
    }

    /// Classify one physical line.
    fn classify(&mut self, raw: &str) -> Result<Token, ParseError> {
        let indent = raw.chars().take_while(|c| c.is_whitespace()).count() as u32;

        // Doc-string mode: everything is content except the closing delimiter.
        if let Some(open) = &self.doc_string {
            let trimmed = raw.trim();
            if trimmed == open.delimiter {
                self.doc_string = None;
                return Ok(self.token(TokenType::DocStringSeparator, trimmed, None, "", indent));
            }
            let keep = open.indent.min(indent) as usize;
            let start = raw
                .char_indices()
                .nth(keep)
                .map(|(i, _)| i)
                .unwrap_or(raw.len());
            let content = raw[start..].trim_end();
            return Ok(self.token(TokenType::Other, content, None, content, open.indent));
        }

        let text = raw.trim_start().trim_end();

        if text.is_empty() {
            return Ok(self.token(TokenType::Empty, "", None, "", indent));
        }

        if let Some(rest) = text.strip_prefix('#') {
            if !self.content_seen {
                if let Some(tag) = language_directive(rest) {
                    let location = Location::new(self.line_number, 1);
                    self.dialect = self.table.lookup(tag, location)?;
                    return Ok(self.token(TokenType::Language, text, None, tag, indent));
                }
            }
            return Ok(self.token(TokenType::Comment, text, None, text, indent));
        }

        self.content_seen = true;

        if text.starts_with('@') {
            return Ok(self.token(TokenType::TagLine, text, None, text, indent));
        }

        // Title keywords; outline before scenario so shared prefixes cannot
        // mis-classify, and all keywords before free text.
        let titles: [(TokenType, &[String]); 5] = [
            (TokenType::FeatureLine, &self.dialect.feature),
            (TokenType::BackgroundLine, &self.dialect.background),
            (TokenType::ScenarioOutlineLine, &self.dialect.scenario_outline),
            (TokenType::ScenarioLine, &self.dialect.scenario),
            (TokenType::ExamplesLine, &self.dialect.examples),
        ];
        for (token_type, keywords) in titles {
            for keyword in keywords {
                if let Some(rest) = text.strip_prefix(keyword.as_str()) {
                    if let Some(title) = rest.strip_prefix(':') {
                        return Ok(self.token(
                            token_type,
                            text,
                            Some(keyword),
                            title.trim(),
                            indent,
                        ));
                    }
                }
            }
        }

        for keyword in self.dialect.step_keywords() {
            if let Some(rest) = text.strip_prefix(keyword) {
                return Ok(self.token(TokenType::StepLine, text, Some(keyword), rest.trim(), indent));
            }
        }

        for delimiter in [DOC_STRING_QUOTES, DOC_STRING_BACKTICKS] {
            if let Some(rest) = text.strip_prefix(delimiter) {
                self.doc_string = Some(OpenDocString { delimiter, indent });
                return Ok(self.token(
                    TokenType::DocStringSeparator,
                    text,
                    None,
                    rest.trim(),
                    indent,
                ));
            }
        }

        // A row needs both delimiters; an unterminated `| a` is free text,
        // which the step states reject with a proper expected list.
        if text.starts_with('|') && text.ends_with('|') && text.len() > 1 {
            return Ok(self.token(TokenType::TableRow, text, None, text, indent));
        }

        Ok(self.token(TokenType::Other, text, None, text, indent))
    }
}

/// Match `language[ ]*:[ ]*<tag>` after a leading `#`.
fn language_directive(after_hash: &str) -> Option<&str> {
    let rest = after_hash.trim_start().strip_prefix("language")?;
    let tag = rest.trim_start().strip_prefix(':')?.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

impl Iterator for Scanner<'_, '_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lines.next() {
            Some(raw) => {
                self.line_number += 1;
                Some(self.classify(raw))
            }
            None => {
                self.done = true;
                Some(Ok(Token::eof(self.line_number + 1)))
            }
        }
    }
}
