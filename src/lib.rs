//! tinyc analyzer
//!
//! Scanner, recursive-descent parser and AST for a small C-like teaching
//! language, with error recovery so that one pass reports every lexical and
//! syntax problem it can find.
//!
//! ```
//! let analysis = tinyc_analyzer::analyze("int x = 5;\nif (x > 3) x = 0;");
//! assert!(analysis.is_clean());
//! assert_eq!(analysis.program.statements.len(), 2);
//! ```

pub mod feedback;
pub mod formatter;
pub mod frontend;
pub mod utils;

use frontend::ast::Program;
use frontend::lexer::tokenize;
use frontend::parser::{parse_with_config, ParserConfig};
use frontend::token::Token;
use utils::{Diagnostic, LexicalError, SyntaxError};

/// Everything one analysis run produces
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub lexical_errors: Vec<LexicalError>,
    pub syntax_errors: Vec<SyntaxError>,
}

impl Analysis {
    /// Lexical diagnostics followed by syntax diagnostics, each in recorded order
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lexical_errors
            .iter()
            .map(Diagnostic::from)
            .chain(self.syntax_errors.iter().map(Diagnostic::from))
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.lexical_errors.len() + self.syntax_errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }
}

/// Scan and parse `source` with the default parser configuration
pub fn analyze(source: &str) -> Analysis {
    analyze_with_config(source, ParserConfig::default())
}

pub fn analyze_with_config(source: &str, config: ParserConfig) -> Analysis {
    let (tokens, lexical_errors) = tokenize(source);
    let (program, syntax_errors) = parse_with_config(tokens.clone(), config);

    Analysis {
        tokens,
        program,
        lexical_errors,
        syntax_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Stage;

    #[test]
    fn test_diagnostics_merge_stages() {
        let analysis = analyze("int x = @;\ny = ;");

        let stages: Vec<Stage> = analysis.diagnostics().iter().map(|d| d.stage).collect();
        assert_eq!(stages.first(), Some(&Stage::Lexical));
        assert_eq!(stages.last(), Some(&Stage::Syntax));
        assert_eq!(analysis.error_count(), stages.len());
    }

    #[test]
    fn test_independent_runs_on_threads() {
        let sources = ["int a = 1;", "while (x) { x = x - 1; }", "if (a) b = ;"];

        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                let source = source.to_string();
                std::thread::spawn(move || analyze(&source))
            })
            .collect();

        for (handle, source) in handles.into_iter().zip(sources) {
            let analysis = handle.join().unwrap();
            assert_eq!(analysis, analyze(source));
        }
    }
}
