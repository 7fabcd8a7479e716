//! Utility module

mod position;
mod error;

pub use position::Position;
pub use error::{Diagnostic, LexicalError, Result, Stage, SyntaxError};
