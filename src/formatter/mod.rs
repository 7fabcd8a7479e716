//! Token-based code formatter
//!
//! Works on a finished token list, never on the AST, so it can reformat input
//! that did not parse cleanly. Layout rules:
//! - one statement per line, `{` ends its line and indents the block
//! - `}` on its own line, joined with a following `else`
//! - spaces around binary operators, after commas and after keywords
//! - a `for (...; ...; ...)` header stays on one line
//! - each preprocessor directive on its own line

use log::debug;

use crate::frontend::token::{Token, TokenKind};

/// Formatter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Spaces per indentation level
    pub indent_size: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self { indent_size: 4 }
    }
}

/// Format with the default configuration
pub fn format_tokens(tokens: &[Token]) -> String {
    Formatter::new(FormatterConfig::default()).format(tokens)
}

pub struct Formatter {
    config: FormatterConfig,
    out: String,
    indent: usize,
    at_line_start: bool,
    /// Last token written on the current line
    prev: Option<TokenKind>,
    prev_binary: bool,
    paren_depth: usize,
    /// Paren depth of an open `for (` header
    for_header: Option<usize>,
    pending_for: bool,
}

impl Formatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self {
            config,
            out: String::new(),
            indent: 0,
            at_line_start: true,
            prev: None,
            prev_binary: false,
            paren_depth: 0,
            for_header: None,
            pending_for: false,
        }
    }

    pub fn format(&mut self, tokens: &[Token]) -> String {
        *self = Self::new(self.config);

        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::Newline | TokenKind::Whitespace => i += 1,
                TokenKind::Eof => break,
                TokenKind::Hash => i = self.directive(tokens, i),
                _ => {
                    let next = next_significant(tokens, i + 1);
                    self.emit(token, next);
                    i += 1;
                }
            }
        }

        if !self.at_line_start {
            self.out.push('\n');
        }
        debug!(
            "formatted {} tokens into {} lines",
            tokens.len(),
            self.out.lines().count()
        );
        std::mem::take(&mut self.out)
    }

    fn emit(&mut self, token: &Token, next: TokenKind) {
        let kind = token.kind;

        if kind == TokenKind::RBrace {
            if !self.at_line_start {
                self.newline();
            }
            self.indent = self.indent.saturating_sub(1);
        }

        let binary = self.is_binary_here(kind);
        if !self.at_line_start && self.needs_space(kind, binary) {
            self.out.push(' ');
        }
        self.write(&token.source_text());
        self.prev = Some(kind);
        self.prev_binary = binary;

        match kind {
            TokenKind::For => self.pending_for = true,
            TokenKind::LParen => {
                self.paren_depth += 1;
                if self.pending_for {
                    self.for_header = Some(self.paren_depth);
                    self.pending_for = false;
                }
            }
            TokenKind::RParen => {
                if self.for_header == Some(self.paren_depth) {
                    self.for_header = None;
                }
                self.paren_depth = self.paren_depth.saturating_sub(1);
            }
            TokenKind::Semicolon if self.for_header.is_none() => self.newline(),
            TokenKind::LBrace => {
                // an unclosed header never swallows the block
                self.for_header = None;
                self.pending_for = false;
                self.paren_depth = 0;
                self.indent += 1;
                self.newline();
            }
            TokenKind::RBrace if !matches!(next, TokenKind::Else | TokenKind::Semicolon) => {
                self.newline()
            }
            _ => {}
        }
    }

    /// Write `#name rest...` on its own line; returns the index after the line
    fn directive(&mut self, tokens: &[Token], start: usize) -> usize {
        if !self.at_line_start {
            self.newline();
        }

        let end = tokens[start..]
            .iter()
            .position(|t| matches!(t.kind, TokenKind::Newline | TokenKind::Eof))
            .map_or(tokens.len(), |offset| start + offset);

        let mut line = String::from("#");
        if let Some((name, rest)) = tokens[start + 1..end].split_first() {
            line.push_str(&name.text);
            if let Some(first) = rest.first() {
                line.push(' ');
                if first.kind == TokenKind::LAngle {
                    // <stdio.h> is written back without inner spaces
                    rest.iter().for_each(|t| line.push_str(&t.text));
                } else {
                    let words: Vec<String> = rest.iter().map(Token::source_text).collect();
                    line.push_str(&words.join(" "));
                }
            }
        }

        self.write(&line);
        self.newline();
        end
    }

    fn write(&mut self, text: &str) {
        if self.at_line_start {
            self.out.push_str(&" ".repeat(self.indent * self.config.indent_size));
            self.at_line_start = false;
        }
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.at_line_start = true;
        self.prev = None;
        self.prev_binary = false;
    }

    /// `-` is only binary after an operand
    fn is_binary_here(&self, kind: TokenKind) -> bool {
        if !kind.is_binary_operator() {
            return false;
        }
        if kind == TokenKind::Minus {
            return matches!(
                self.prev,
                Some(
                    TokenKind::Identifier
                        | TokenKind::Integer
                        | TokenKind::Float
                        | TokenKind::String
                        | TokenKind::RParen
                        | TokenKind::Increment
                        | TokenKind::Decrement
                )
            );
        }
        true
    }

    fn needs_space(&self, cur: TokenKind, cur_binary: bool) -> bool {
        let Some(prev) = self.prev else {
            return false;
        };

        if matches!(cur, TokenKind::RParen | TokenKind::Semicolon | TokenKind::Comma) {
            return false;
        }
        if cur_binary || self.prev_binary {
            return true;
        }
        if matches!(cur, TokenKind::LBrace | TokenKind::Else) {
            return true;
        }

        match prev {
            TokenKind::LParen
            | TokenKind::Not
            | TokenKind::Minus
            | TokenKind::Increment
            | TokenKind::Decrement => false,
            TokenKind::Comma | TokenKind::Semicolon | TokenKind::RBrace => true,
            k if k.is_keyword() => true,
            // call parens and postfix operators attach to the operand
            _ => !matches!(cur, TokenKind::LParen | TokenKind::Increment | TokenKind::Decrement),
        }
    }
}

fn next_significant(tokens: &[Token], from: usize) -> TokenKind {
    tokens[from.min(tokens.len())..]
        .iter()
        .map(|t| t.kind)
        .find(|k| !matches!(k, TokenKind::Newline | TokenKind::Whitespace))
        .unwrap_or(TokenKind::Eof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::tokenize;
    use pretty_assertions::assert_eq;

    fn format_source(source: &str) -> String {
        format_tokens(&tokenize(source).0)
    }

    #[test]
    fn test_blocks_and_else() {
        let formatted = format_source("int main(){int x=5;if(x>3){x=x+1;}else{x=0;}return x;}");
        let expected = "\
int main() {
    int x = 5;
    if (x > 3) {
        x = x + 1;
    } else {
        x = 0;
    }
    return x;
}
";
        assert_eq!(formatted, expected);
    }

    #[test]
    fn test_for_header_stays_on_one_line() {
        assert_eq!(
            format_source("for(i=0;i<10;i++){sum=sum+i;}"),
            "for (i = 0; i < 10; i++) {\n    sum = sum + i;\n}\n"
        );
        assert_eq!(format_source("for(;;)break;"), "for (;;) break;\n");
    }

    #[test]
    fn test_directives_on_their_own_lines() {
        assert_eq!(
            format_source("#include <stdio.h>\n#define  MAX   100\nint x;"),
            "#include <stdio.h>\n#define MAX 100\nint x;\n"
        );
        assert_eq!(format_source("#include \"a.h\""), "#include \"a.h\"\n");
    }

    #[test]
    fn test_unary_and_binary_operators() {
        assert_eq!(
            format_source("x=-y;z=!a&&b;return -1;"),
            "x = -y;\nz = !a && b;\nreturn -1;\n"
        );
        assert_eq!(format_source("a=b-c;"), "a = b - c;\n");
    }

    #[test]
    fn test_calls_and_increments() {
        assert_eq!(
            format_source("f(a,b);++i;j--;"),
            "f(a, b);\n++i;\nj--;\n"
        );
    }

    #[test]
    fn test_string_literals_are_requoted() {
        assert_eq!(format_source("s(\"a\\n\");"), "s(\"a\\n\");\n");
    }

    #[test]
    fn test_single_quoted_literals_keep_their_quotes() {
        assert_eq!(format_source("c = 'x';"), "c = 'x';\n");
        assert_eq!(format_source("c='\\'';"), "c = '\\'';\n");
    }

    #[test]
    fn test_indent_size() {
        let tokens = tokenize("while(x){x=x-1;}").0;
        let formatted = Formatter::new(FormatterConfig { indent_size: 2 }).format(&tokens);
        assert_eq!(formatted, "while (x) {\n  x = x - 1;\n}\n");
    }

    #[test]
    fn test_unbalanced_braces_do_not_panic() {
        assert_eq!(format_source("}}x;"), "}\n}\nx;\n");
    }
}
