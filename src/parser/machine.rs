//! Table-driven grammar state machine.
//!
//! Each state owns a row table mapping accepted token types to a builder
//! action plus a successor state, a diagnostic label, and the list of
//! *significant* expected token names used verbatim in error messages.
//! Trivia (blank lines, comments) is accepted almost everywhere but kept out
//! of the expected lists so messages stay readable. Labels are diagnostics
//! only; nothing branches on them.
//!
//! On a token with no row in the current state the machine reports
//! `UnexpectedEof` (for the end-of-input token) or `UnexpectedToken`, both
//! carrying the state's expected list and label. The caller decides whether
//! to abort (fail-fast) or to record the error, skip the token, and continue
//! in the same state (collect-all); either way the cursor advances every
//! step, so a pass is linear in the number of lines.

use crate::error::ParseError;

use super::token::{Token, TokenType};

/// What the AST builder should do with an accepted token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Record the document language from a `# language:` directive.
    SetLanguage,
    /// Buffer tags for the next feature/scenario/examples.
    AddTag,
    /// Record a comment on the document.
    AddComment,
    BeginFeature,
    BeginBackground,
    BeginScenario,
    BeginOutline,
    /// Buffer a description line for the construct being opened.
    AddDescription,
    AddStep,
    /// Attach a data-table row to the current step.
    AddTableRow,
    OpenDocString,
    AddDocStringLine,
    CloseDocString,
    BeginExamples,
    AddExamplesRow,
    /// Blank line: nothing to build.
    Skip,
    /// Accepted end of input: close everything.
    EndOfDocument,
}

/// Grammar states. `Steps` variants are split per container so the table
/// alone decides where `Examples:` is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    FeatureHeader,
    BackgroundHeader,
    BackgroundSteps,
    ScenarioHeader,
    ScenarioSteps,
    OutlineHeader,
    OutlineSteps,
    DocString,
    ExamplesHeader,
    ExamplesRows,
}

/// Successor of a transition.
#[derive(Debug, Clone, Copy)]
enum Next {
    To(State),
    /// Stay where we are.
    Stay,
    /// Return to the state that opened the doc string.
    Resume,
}

struct StateSpec {
    label: &'static str,
    /// Significant expectations, in priority order, for error messages.
    expected: &'static [&'static str],
    rows: &'static [(TokenType, Action, Next)],
}

use Action as A;
use Next::{Resume, Stay, To};
use State as S;
use TokenType as T;

static START: StateSpec = StateSpec {
    label: "expecting feature",
    expected: &["Feature"],
    rows: &[
        (T::Language, A::SetLanguage, Stay),
        (T::TagLine, A::AddTag, Stay),
        (T::FeatureLine, A::BeginFeature, To(S::FeatureHeader)),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
    ],
};

static FEATURE_HEADER: StateSpec = StateSpec {
    label: "expecting background, scenario or scenario outline",
    expected: &["Background", "Scenario", "Scenario Outline"],
    rows: &[
        (T::BackgroundLine, A::BeginBackground, To(S::BackgroundHeader)),
        (T::ScenarioLine, A::BeginScenario, To(S::ScenarioHeader)),
        (T::ScenarioOutlineLine, A::BeginOutline, To(S::OutlineHeader)),
        (T::TagLine, A::AddTag, Stay),
        (T::Other, A::AddDescription, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
        (T::Eof, A::EndOfDocument, Stay),
    ],
};

static BACKGROUND_HEADER: StateSpec = StateSpec {
    label: "expecting background step or scenario",
    expected: &["Step", "Scenario", "Scenario Outline"],
    rows: &[
        (T::StepLine, A::AddStep, To(S::BackgroundSteps)),
        (T::ScenarioLine, A::BeginScenario, To(S::ScenarioHeader)),
        (T::ScenarioOutlineLine, A::BeginOutline, To(S::OutlineHeader)),
        (T::TagLine, A::AddTag, Stay),
        (T::Other, A::AddDescription, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
        (T::Eof, A::EndOfDocument, Stay),
    ],
};

static BACKGROUND_STEPS: StateSpec = StateSpec {
    label: "expecting background step, table, doc string or scenario",
    expected: &["Step", "TableRow", "DocString", "Scenario", "Scenario Outline"],
    rows: &[
        (T::StepLine, A::AddStep, Stay),
        (T::TableRow, A::AddTableRow, Stay),
        (T::DocStringSeparator, A::OpenDocString, To(S::DocString)),
        (T::ScenarioLine, A::BeginScenario, To(S::ScenarioHeader)),
        (T::ScenarioOutlineLine, A::BeginOutline, To(S::OutlineHeader)),
        (T::TagLine, A::AddTag, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
        (T::Eof, A::EndOfDocument, Stay),
    ],
};

// A scenario needs at least one step before anything can close it, so the
// header states accept neither Eof nor a following scenario line.
static SCENARIO_HEADER: StateSpec = StateSpec {
    label: "expecting scenario step",
    expected: &["Step"],
    rows: &[
        (T::StepLine, A::AddStep, To(S::ScenarioSteps)),
        (T::Other, A::AddDescription, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
    ],
};

static SCENARIO_STEPS: StateSpec = StateSpec {
    label: "expecting scenario step, table, doc string or scenario",
    expected: &["Step", "TableRow", "DocString", "Scenario", "Scenario Outline"],
    rows: &[
        (T::StepLine, A::AddStep, Stay),
        (T::TableRow, A::AddTableRow, Stay),
        (T::DocStringSeparator, A::OpenDocString, To(S::DocString)),
        (T::ScenarioLine, A::BeginScenario, To(S::ScenarioHeader)),
        (T::ScenarioOutlineLine, A::BeginOutline, To(S::OutlineHeader)),
        (T::TagLine, A::AddTag, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
        (T::Eof, A::EndOfDocument, Stay),
    ],
};

static OUTLINE_HEADER: StateSpec = StateSpec {
    label: "expecting outline step",
    expected: &["Step"],
    rows: &[
        (T::StepLine, A::AddStep, To(S::OutlineSteps)),
        (T::Other, A::AddDescription, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
    ],
};

static OUTLINE_STEPS: StateSpec = StateSpec {
    label: "expecting outline step, examples or scenario",
    expected: &[
        "Step",
        "TableRow",
        "DocString",
        "Examples",
        "Scenario",
        "Scenario Outline",
    ],
    rows: &[
        (T::StepLine, A::AddStep, Stay),
        (T::TableRow, A::AddTableRow, Stay),
        (T::DocStringSeparator, A::OpenDocString, To(S::DocString)),
        (T::ExamplesLine, A::BeginExamples, To(S::ExamplesHeader)),
        (T::ScenarioLine, A::BeginScenario, To(S::ScenarioHeader)),
        (T::ScenarioOutlineLine, A::BeginOutline, To(S::OutlineHeader)),
        (T::TagLine, A::AddTag, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
        (T::Eof, A::EndOfDocument, Stay),
    ],
};

// Rejecting Eof here is what turns an unterminated doc string into an
// UnexpectedEof instead of silent truncation.
static DOC_STRING: StateSpec = StateSpec {
    label: "expecting doc string content or closing delimiter",
    expected: &["DocString"],
    rows: &[
        (T::Other, A::AddDocStringLine, Stay),
        (T::DocStringSeparator, A::CloseDocString, Resume),
    ],
};

static EXAMPLES_HEADER: StateSpec = StateSpec {
    label: "expecting examples table header",
    expected: &["TableRow"],
    rows: &[
        (T::TableRow, A::AddExamplesRow, To(S::ExamplesRows)),
        (T::Other, A::AddDescription, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
    ],
};

static EXAMPLES_ROWS: StateSpec = StateSpec {
    label: "expecting examples row or scenario",
    expected: &["TableRow", "Examples", "Scenario", "Scenario Outline"],
    rows: &[
        (T::TableRow, A::AddExamplesRow, Stay),
        (T::ExamplesLine, A::BeginExamples, To(S::ExamplesHeader)),
        (T::ScenarioLine, A::BeginScenario, To(S::ScenarioHeader)),
        (T::ScenarioOutlineLine, A::BeginOutline, To(S::OutlineHeader)),
        (T::TagLine, A::AddTag, Stay),
        (T::Comment, A::AddComment, Stay),
        (T::Empty, A::Skip, Stay),
        (T::Eof, A::EndOfDocument, Stay),
    ],
};

fn spec(state: State) -> &'static StateSpec {
    match state {
        S::Start => &START,
        S::FeatureHeader => &FEATURE_HEADER,
        S::BackgroundHeader => &BACKGROUND_HEADER,
        S::BackgroundSteps => &BACKGROUND_STEPS,
        S::ScenarioHeader => &SCENARIO_HEADER,
        S::ScenarioSteps => &SCENARIO_STEPS,
        S::OutlineHeader => &OUTLINE_HEADER,
        S::OutlineSteps => &OUTLINE_STEPS,
        S::DocString => &DOC_STRING,
        S::ExamplesHeader => &EXAMPLES_HEADER,
        S::ExamplesRows => &EXAMPLES_ROWS,
    }
}

/// The state machine itself: current state plus the doc-string return slot.
pub struct Machine {
    state: State,
    resume: State,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            state: S::Start,
            resume: S::Start,
        }
    }

    /// Consume one token: the action to apply, or a located, classified
    /// error. On error the machine stays in its current state, which is the
    /// collect-all recovery rule (skip the token, resume in place).
    pub fn step(&mut self, token: &Token) -> Result<Action, ParseError> {
        let spec = spec(self.state);

        let row = spec
            .rows
            .iter()
            .find(|(token_type, _, _)| *token_type == token.token_type);

        let Some((_, action, next)) = row else {
            let expected = spec.expected.to_vec();
            return Err(if token.is_eof() {
                ParseError::unexpected_eof(token, expected, spec.label)
            } else {
                ParseError::unexpected_token(token.clone(), expected, spec.label)
            });
        };

        match next {
            To(target) => {
                if *target == S::DocString {
                    self.resume = self.state;
                }
                self.state = *target;
            }
            Stay => {}
            Resume => self.state = self.resume,
        }

        Ok(*action)
    }

    /// Label of the current state, for assertions on recovery behavior.
    #[cfg(test)]
    pub fn label(&self) -> &'static str {
        spec(self.state).label
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
