//! Structured Feedback Module
//!
//! Collects the diagnostics of one analysis run into a [`Report`] that renders
//! either as a human-readable listing (each error followed by its source line
//! and a caret under the column) or as JSON for tooling.

use serde::{Deserialize, Serialize};

use crate::utils::{Diagnostic, LexicalError, Stage, SyntaxError};

// ==================== Report ====================

/// All diagnostics of one source file, lexical ones first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Source file name as given on the command line
    pub source_file: String,

    /// True when no diagnostic was recorded
    pub success: bool,

    pub summary: Summary,

    pub diagnostics: Vec<Diagnostic>,
}

/// Error counts per stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub lexical: usize,
    pub syntax: usize,
}

impl Report {
    pub fn new(source_file: impl Into<String>, lexical: &[LexicalError], syntax: &[SyntaxError]) -> Self {
        let diagnostics = lexical
            .iter()
            .map(Diagnostic::from)
            .chain(syntax.iter().map(Diagnostic::from))
            .collect();
        Self::from_diagnostics(source_file, diagnostics)
    }

    pub fn from_diagnostics(source_file: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        let lexical = diagnostics.iter().filter(|d| d.stage == Stage::Lexical).count();
        let summary = Summary {
            total: diagnostics.len(),
            lexical,
            syntax: diagnostics.len() - lexical,
        };

        Self {
            source_file: source_file.into(),
            success: diagnostics.is_empty(),
            summary,
            diagnostics,
        }
    }

    /// Diagnostics from a single stage, in recorded order
    pub fn stage(&self, stage: Stage) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.stage == stage)
    }

    /// Render the detailed report. `source` supplies the context lines.
    pub fn render(&self, source: &str) -> String {
        let lines: Vec<&str> = source.lines().collect();
        let mut out = String::new();

        out.push_str("=== Code Analysis Report ===\n");
        if self.success {
            out.push_str("No errors found. Code is syntactically correct!\n");
        }

        for (stage, title) in [(Stage::Lexical, "Lexical Errors"), (Stage::Syntax, "Syntax Errors")] {
            let count = self.stage(stage).count();
            if count == 0 {
                continue;
            }
            out.push_str(&format!("\n--- {} ({}) ---\n", title, count));
            for diag in self.stage(stage) {
                out.push_str(&format_diagnostic(diag));
                out.push('\n');
                if let Some(line) = lines.get((diag.line as usize).wrapping_sub(1)) {
                    out.push_str(&context_lines(line, diag.column));
                }
            }
        }

        out.push_str(&self.render_summary());
        out
    }

    pub fn render_summary(&self) -> String {
        let mut out = String::from("\n=== Summary ===\n");
        out.push_str(&format!("Total errors: {}\n", self.summary.total));
        out.push_str(&format!("Lexical errors: {}\n", self.summary.lexical));
        out.push_str(&format!("Syntax errors: {}\n", self.summary.syntax));
        if self.success {
            out.push_str("Analysis completed successfully!\n");
        } else {
            out.push_str(&format!("Analysis found {} error(s).\n", self.summary.total));
        }
        out
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Output as compact JSON (for programmatic use)
    pub fn to_json_compact(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// `[LEXICAL] Line 3, Column 9: Unexpected character '@'`
pub fn format_diagnostic(diag: &Diagnostic) -> String {
    format!(
        "[{}] Line {}, Column {}: {}",
        diag.stage.label(),
        diag.line,
        diag.column,
        diag.message
    )
}

/// The source line followed by a caret under `column`. Tabs before the
/// column are repeated so the caret lines up in a terminal.
fn context_lines(line: &str, column: u32) -> String {
    let pad: String = line
        .chars()
        .take(column.saturating_sub(1) as usize)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    format!("  | {}\n  | {}^\n", line, pad)
}
