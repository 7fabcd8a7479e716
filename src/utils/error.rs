//! Error handling for the tinyc frontend
//!
//! Neither the scanner nor the parser fails across its public boundary. Both
//! collect these errors into ordered lists and keep going; reporting code sees
//! them through the shared [`Diagnostic`] record.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::Position;

/// Result type used inside the parser for failures that unwind to a recovery point
pub type Result<T> = std::result::Result<T, SyntaxError>;

// ==================== Lexical Errors ====================

/// A problem found while scanning
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    #[error("Unterminated comment")]
    UnterminatedComment { pos: Position },

    #[error("Unterminated string")]
    UnterminatedString { pos: Position },

    #[error("Invalid number format '{text}'")]
    InvalidNumberFormat { text: String, pos: Position },

    #[error("Unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, pos: Position },
}

impl LexicalError {
    /// Get the position the error was reported at
    pub fn pos(&self) -> Position {
        match self {
            Self::UnterminatedComment { pos }
            | Self::UnterminatedString { pos }
            | Self::InvalidNumberFormat { pos, .. }
            | Self::UnexpectedCharacter { pos, .. } => *pos,
        }
    }

    /// Taxonomy name of the error
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::UnterminatedComment { .. } => "UnterminatedComment",
            Self::UnterminatedString { .. } => "UnterminatedString",
            Self::InvalidNumberFormat { .. } => "InvalidNumberFormat",
            Self::UnexpectedCharacter { .. } => "UnexpectedCharacter",
        }
    }
}

// ==================== Syntax Errors ====================

/// A problem found while parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A required token was not found; the message names what was expected
    #[error("{message}")]
    MissingToken { message: String, pos: Position },

    #[error("{message}")]
    UnexpectedToken { message: String, pos: Position },

    #[error("Expected expression")]
    ExpectedExpression { pos: Position },

    /// Forced progress inside a compound block
    #[error("Parser stuck, skipping token")]
    ParserStuck { pos: Position },

    /// Forced progress in the top-level statement loop
    #[error("Parser unable to process token, skipping")]
    UnprocessableToken { pos: Position },

    #[error("Nesting depth exceeds limit of {limit}")]
    NestingTooDeep { limit: usize, pos: Position },
}

impl SyntaxError {
    /// Get the position the error was reported at
    pub fn pos(&self) -> Position {
        match self {
            Self::MissingToken { pos, .. }
            | Self::UnexpectedToken { pos, .. }
            | Self::ExpectedExpression { pos }
            | Self::ParserStuck { pos }
            | Self::UnprocessableToken { pos }
            | Self::NestingTooDeep { pos, .. } => *pos,
        }
    }

    /// Taxonomy name of the error
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MissingToken { .. } => "MissingExpectedToken",
            Self::UnexpectedToken { .. } => "UnexpectedToken",
            Self::ExpectedExpression { .. } => "ExpectedExpression",
            Self::ParserStuck { .. } | Self::UnprocessableToken { .. } => "RecoverySkip",
            Self::NestingTooDeep { .. } => "NestingTooDeep",
        }
    }
}

// ==================== Diagnostic Record ====================

/// Which stage produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Lexical,
    Syntax,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Stage::Lexical => "LEXICAL",
            Stage::Syntax => "SYNTAX",
        }
    }
}

/// The record shape shared by lexical and syntax errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub kind: String,
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl From<&LexicalError> for Diagnostic {
    fn from(error: &LexicalError) -> Self {
        let pos = error.pos();
        Self {
            stage: Stage::Lexical,
            kind: error.kind_name().to_string(),
            message: error.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }
}

impl From<&SyntaxError> for Diagnostic {
    fn from(error: &SyntaxError) -> Self {
        let pos = error.pos();
        Self {
            stage: Stage::Syntax,
            kind: error.kind_name().to_string(),
            message: error.to_string(),
            line: pos.line,
            column: pos.column,
        }
    }
}
