use std::fmt;

use thiserror::Error;

use crate::field::Field;

/// Byte range within the input string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One-based position of a value inside a comma-separated list, rendered as
/// "1st", "2nd", "3rd", ...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub usize);

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        let suffix = match (n % 10, n % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        write!(f, "{n}{suffix}")
    }
}

/// What is wrong with a single value-expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    #[error("value {value} is below the minimum of {min}")]
    BelowMinimum { value: i64, min: u8 },

    #[error("value {value} is above the maximum of {max}")]
    AboveMaximum { value: i64, max: u8 },

    #[error("'{0}' is not a number or a known name")]
    NotANumber(String),

    #[error("range start {low} is greater than range end {high}")]
    InvertedRange { low: u8, high: u8 },

    #[error("step must be greater than zero")]
    ZeroStep,

    #[error("step {step} exceeds the range span of {span}")]
    StepTooLarge { step: u32, span: u8 },

    #[error("wildcard cannot be combined with a range")]
    WildcardRange,

    #[error("wildcard cannot be marked with '{0}'")]
    MarkedWildcard(char),

    #[error("missing value")]
    Empty,

    #[error("'{0}' is not allowed in this field")]
    MisplacedMarker(char),
}

/// All errors produced by cronspec.
///
/// Every failure surfaces while parsing or building; a constructed
/// [`Spec`](crate::Spec) is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CronError {
    #[error("expected {expected} fields, got {found}")]
    FieldCount {
        expected: String,
        found: usize,
        span: Span,
        input: String,
    },

    #[error("unknown preset '{name}'")]
    UnknownPreset {
        name: String,
        span: Span,
        input: String,
    },

    #[error("{message}")]
    Syntax {
        message: String,
        span: Span,
        input: String,
    },

    #[error("invalid {field} field ({position} value in list): {kind}")]
    Value {
        field: Field,
        position: Position,
        kind: ValueError,
        span: Span,
        input: String,
    },

    #[error("invalid {field} value: {kind}")]
    Builder { field: Field, kind: ValueError },
}

impl CronError {
    pub fn syntax(message: impl Into<String>, span: Span, input: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            span,
            input: input.into(),
        }
    }

    pub fn value(
        field: Field,
        position: usize,
        kind: ValueError,
        span: Span,
        input: impl Into<String>,
    ) -> Self {
        Self::Value {
            field,
            position: Position(position),
            kind,
            span,
            input: input.into(),
        }
    }

    pub fn builder(field: Field, kind: ValueError) -> Self {
        Self::Builder { field, kind }
    }

    /// The byte range of the offending input, when the error came from text.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::FieldCount { span, .. }
            | Self::UnknownPreset { span, .. }
            | Self::Syntax { span, .. }
            | Self::Value { span, .. } => Some(*span),
            Self::Builder { .. } => None,
        }
    }

    /// Format a rich error with the input underlined at the offending span.
    pub fn display_rich(&self) -> String {
        match self {
            Self::FieldCount { span, input, .. }
            | Self::UnknownPreset { span, input, .. }
            | Self::Syntax { span, input, .. }
            | Self::Value { span, input, .. } => {
                format_span_error("error", &self.to_string(), span, input)
            }
            Self::Builder { .. } => format!("error: {self}"),
        }
    }
}

fn format_span_error(prefix: &str, message: &str, span: &Span, input: &str) -> String {
    let mut out = format!("{prefix}: {message}\n");
    out.push_str(&format!("  {input}\n"));
    let padding = " ".repeat(span.start + 2);
    let underline = "^".repeat((span.end - span.start).max(1));
    out.push_str(&padding);
    out.push_str(&underline);
    out
}
