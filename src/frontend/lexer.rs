//! Lexer for tinyc
//!
//! Converts source code into a stream of tokens. Malformed input never stops
//! the scan: each problem is recorded as a [`LexicalError`], an `Error` token
//! takes its place in the stream, and scanning resumes at the next character.
//!
//! A string missing its closing quote ends at the end of its line, so the
//! lines after it still scan as ordinary tokens.

use log::debug;

use crate::frontend::token::{Token, TokenKind};
use crate::utils::{LexicalError, Position};

/// Scan a whole source text
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<LexicalError>) {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize();
    (tokens, lexer.into_errors())
}

/// The lexer state
pub struct Lexer {
    /// Source code as chars
    source: Vec<char>,
    /// Current position in source
    pos: usize,
    /// Current line (1-based)
    line: u32,
    /// Current column (1-based)
    column: u32,
    /// Start offset of current token
    start: usize,
    /// Start position of current token
    start_pos: Position,
    errors: Vec<LexicalError>,
}

impl Lexer {
    /// Create a new lexer for the given source code
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            start: 0,
            start_pos: Position::start(),
            errors: Vec::new(),
        }
    }

    /// Errors recorded so far, in source order
    pub fn errors(&self) -> &[LexicalError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<LexicalError> {
        self.errors
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn current_pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.pos].iter().collect()
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), self.start_pos)
    }

    /// Record an error and produce the error token standing in for it
    fn error_token(&mut self, error: LexicalError) -> Token {
        self.errors.push(error);
        self.make_token(TokenKind::Error)
    }

    /// Skip whitespace other than newlines
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() && c != '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a comment starting at the current position.
    /// Returns false when a block comment runs into the end of input.
    fn skip_comment(&mut self) -> bool {
        self.advance(); // skip /
        if self.advance() == Some('/') {
            while let Some(c) = self.peek() {
                if c == '\n' {
                    break;
                }
                self.advance();
            }
            return true;
        }

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_next() == Some('/') {
                self.advance();
                self.advance();
                return true;
            }
            self.advance();
        }
        false
    }

    /// Read an identifier or keyword
    fn read_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let kind = TokenKind::keyword_from_str(&self.lexeme()).unwrap_or(TokenKind::Identifier);
        self.make_token(kind)
    }

    /// Read a number literal (integer or float)
    fn read_number(&mut self) -> Token {
        let mut has_dot = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.'
                && !has_dot
                && self.peek_next().is_some_and(|n| n.is_ascii_digit())
            {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        // A second '.' ends the literal: 1.2.3 scans as 1.2, '.', 3
        let text = self.lexeme();
        if text.ends_with('.') {
            return self.error_token(LexicalError::InvalidNumberFormat {
                text,
                pos: self.start_pos,
            });
        }

        if has_dot {
            self.make_token(TokenKind::Float)
        } else {
            self.make_token(TokenKind::Integer)
        }
    }

    /// Read a single- or double-quoted string literal
    fn read_string(&mut self, quote: char) -> Token {
        self.advance(); // consume opening quote

        let mut value = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self.error_token(LexicalError::UnterminatedString {
                        pos: self.start_pos,
                    });
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let Some(escaped) = self.advance() else {
                        continue;
                    };
                    value.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        other => other,
                    });
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        Token::string(value, quote, self.start_pos)
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            self.start = self.pos;
            self.start_pos = self.current_pos();

            let Some(c) = self.peek() else {
                return Token::eof(self.start_pos);
            };

            if c == '\n' {
                self.advance();
                return self.make_token(TokenKind::Newline);
            }

            if c == '/' && matches!(self.peek_next(), Some('/') | Some('*')) {
                if self.skip_comment() {
                    continue;
                }
                return self.error_token(LexicalError::UnterminatedComment {
                    pos: self.start_pos,
                });
            }

            if c.is_ascii_digit() {
                return self.read_number();
            }

            if c.is_ascii_alphabetic() || c == '_' {
                return self.read_identifier();
            }

            if c == '"' || c == '\'' {
                return self.read_string(c);
            }

            return self.read_operator(c);
        }
    }

    /// Operators and punctuation: two-character forms first
    fn read_operator(&mut self, c: char) -> Token {
        self.advance();

        let double = match (c, self.peek()) {
            ('=', Some('=')) => Some(TokenKind::EqEq),
            ('!', Some('=')) => Some(TokenKind::NotEq),
            ('<', Some('=')) => Some(TokenKind::LessEq),
            ('>', Some('=')) => Some(TokenKind::GreaterEq),
            ('&', Some('&')) => Some(TokenKind::AndAnd),
            ('|', Some('|')) => Some(TokenKind::OrOr),
            ('+', Some('+')) => Some(TokenKind::Increment),
            ('-', Some('-')) => Some(TokenKind::Decrement),
            _ => None,
        };
        if let Some(kind) = double {
            self.advance();
            return self.make_token(kind);
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => TokenKind::Assign,
            '<' => TokenKind::LAngle,
            '>' => TokenKind::RAngle,
            '!' => TokenKind::Not,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '#' => TokenKind::Hash,
            // A lone dot only shows up in include file names; it carries no diagnostic
            '.' => TokenKind::Error,
            _ => {
                return self.error_token(LexicalError::UnexpectedCharacter {
                    ch: c,
                    pos: self.start_pos,
                });
            }
        };

        self.make_token(kind)
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        debug!(
            "scanned {} tokens with {} lexical errors",
            tokens.len(),
            self.errors.len()
        );
        tokens
    }
}
