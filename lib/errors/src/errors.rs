use std::{
    fmt::Display,
    ops::{Deref, DerefMut},
};

use itertools::Itertools;

/// 1-based source line, as reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::From)]
#[display(fmt = "{}", _0)]
pub struct Line(pub usize);

/// Where in the token stream an error was detected. `Eof` renders as
/// "at end" so errors after the last real token still read naturally.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ErrorLocation {
    #[default]
    Bare,
    Eof,
    At(String),
}

impl Display for ErrorLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorLocation::Bare => Ok(()),
            ErrorLocation::Eof => write!(f, " at end"),
            ErrorLocation::At(lexeme) => write!(f, " at '{}'", lexeme),
        }
    }
}

#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[error("[line {line}] Error{location}: {message}")]
pub struct TloxError {
    pub line: Line,
    pub location: ErrorLocation,
    pub message: String,
}

impl TloxError {
    pub fn bare(line: Line, message: impl Into<String>) -> Self {
        Self { line, location: ErrorLocation::Bare, message: message.into() }
    }
}

/// Everything that went wrong in one pass over the input. Scanning and
/// parsing keep going after an error, so one run can report several.
#[derive(thiserror::Error, Debug, PartialEq, Default)]
pub struct TloxErrors(pub Vec<TloxError>);

impl From<TloxError> for TloxErrors {
    fn from(e: TloxError) -> Self {
        Self(vec![e])
    }
}

impl Deref for TloxErrors {
    type Target = Vec<TloxError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for TloxErrors {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Display for TloxErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().map(|e| e.to_string()).join("\n"))
    }
}

pub type Result<T> = std::result::Result<T, TloxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_format() {
        let error = TloxError {
            line: Line(3),
            location: ErrorLocation::At("==".to_string()),
            message: "Binary operator '==' requires left operand.".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "[line 3] Error at '==': Binary operator '==' requires left operand."
        );

        let error = TloxError {
            line: Line(1),
            location: ErrorLocation::Eof,
            message: "Expect expression.".to_string(),
        };
        assert_eq!(error.to_string(), "[line 1] Error at end: Expect expression.");

        assert_eq!(
            TloxError::bare(Line(7), "Unexpected character.").to_string(),
            "[line 7] Error: Unexpected character."
        );
    }

    #[test]
    fn aggregate_display_joins_lines() {
        let errors = TloxErrors(vec![
            TloxError::bare(Line(1), "Unexpected character."),
            TloxError::bare(Line(2), "Unterminated string."),
        ]);
        assert_eq!(
            errors.to_string(),
            "[line 1] Error: Unexpected character.\n[line 2] Error: Unterminated string."
        );
    }
}
