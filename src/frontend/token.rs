//! Token definitions for tinyc

use std::fmt;

use crate::utils::Position;

/// A token produced by the lexer
///
/// Literal values stay as raw text; nothing here converts numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Position,
    /// Opening quote of a string literal (`"` or `'`)
    pub quote: Option<char>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: Position) -> Self {
        Self { kind, text: text.into(), pos, quote: None }
    }

    pub fn string(text: impl Into<String>, quote: char, pos: Position) -> Self {
        Self { kind: TokenKind::String, text: text.into(), pos, quote: Some(quote) }
    }

    pub fn eof(pos: Position) -> Self {
        Self::new(TokenKind::Eof, "", pos)
    }

    /// Text as it would be written in source; string literals get their
    /// original quotes and escapes back
    pub fn source_text(&self) -> String {
        if self.kind != TokenKind::String {
            return self.text.clone();
        }
        let quote = self.quote.unwrap_or('"');

        let mut text = String::with_capacity(self.text.len() + 2);
        text.push(quote);
        for c in self.text.chars() {
            match c {
                '\n' => text.push_str("\\n"),
                '\t' => text.push_str("\\t"),
                '\r' => text.push_str("\\r"),
                '\\' => text.push_str("\\\\"),
                c if c == quote => {
                    text.push('\\');
                    text.push(c);
                }
                c => text.push(c),
            }
        }
        text.push(quote);
        text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) at {}", self.kind, self.text, self.pos)
    }
}

/// Token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ============ Literals ============
    Identifier,
    Integer,
    Float,
    /// Escapes are already decoded in the token text
    String,

    // ============ Keywords ============
    /// int
    Int,
    /// float
    FloatKw,
    /// char
    Char,
    /// void
    Void,
    /// if
    If,
    /// else
    Else,
    /// while
    While,
    /// for
    For,
    /// return
    Return,
    /// break
    Break,
    /// continue
    Continue,

    // ============ Operators ============
    /// =
    Assign,
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ++
    Increment,
    /// --
    Decrement,

    // ============ Comparison ============
    /// ==
    EqEq,
    /// !=
    NotEq,
    /// <=
    LessEq,
    /// >=
    GreaterEq,

    // ============ Logical ============
    /// &&
    AndAnd,
    /// ||
    OrOr,
    /// !
    Not,

    // ============ Delimiters ============
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// < (also the less-than operator)
    LAngle,
    /// > (also the greater-than operator)
    RAngle,

    // ============ Preprocessor ============
    /// #
    Hash,
    /// include
    Include,
    /// define
    Define,

    // ============ Structure ============
    Eof,
    Newline,
    /// Never produced by the lexer; kept for token lists built by other tools
    Whitespace,

    /// Unrecognized or malformed input
    Error,
}

/// The keyword table. Lookup is case-sensitive.
pub const KEYWORDS: [(&str, TokenKind); 13] = [
    ("int", TokenKind::Int),
    ("float", TokenKind::FloatKw),
    ("char", TokenKind::Char),
    ("void", TokenKind::Void),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("for", TokenKind::For),
    ("return", TokenKind::Return),
    ("break", TokenKind::Break),
    ("continue", TokenKind::Continue),
    ("include", TokenKind::Include),
    ("define", TokenKind::Define),
];

impl TokenKind {
    /// Try to convert an identifier to a keyword
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(word, _)| *word == s)
            .map(|(_, kind)| *kind)
    }

    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| kind == self)
    }

    /// Keywords that name a type
    pub fn is_type_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::FloatKw | TokenKind::Char | TokenKind::Void
        )
    }

    /// Binary operators, used for spacing decisions by the formatter
    pub fn is_binary_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::EqEq
                | TokenKind::NotEq
                | TokenKind::LessEq
                | TokenKind::GreaterEq
                | TokenKind::LAngle
                | TokenKind::RAngle
                | TokenKind::AndAnd
                | TokenKind::OrOr
        )
    }

    /// Binding power of a binary operator; higher binds tighter
    pub fn binary_precedence(&self) -> Option<u8> {
        match self {
            TokenKind::OrOr => Some(1),
            TokenKind::AndAnd => Some(2),
            TokenKind::EqEq | TokenKind::NotEq => Some(3),
            TokenKind::LAngle | TokenKind::LessEq | TokenKind::RAngle | TokenKind::GreaterEq => {
                Some(4)
            }
            TokenKind::Plus | TokenKind::Minus => Some(5),
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(6),
            _ => None,
        }
    }

    /// Upper-case name used in token listings
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::String => "STRING",
            TokenKind::Int => "INT",
            TokenKind::FloatKw => "FLOAT_KW",
            TokenKind::Char => "CHAR",
            TokenKind::Void => "VOID",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::For => "FOR",
            TokenKind::Return => "RETURN",
            TokenKind::Break => "BREAK",
            TokenKind::Continue => "CONTINUE",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MULTIPLY",
            TokenKind::Slash => "DIVIDE",
            TokenKind::Percent => "MODULO",
            TokenKind::Increment => "INCREMENT",
            TokenKind::Decrement => "DECREMENT",
            TokenKind::EqEq => "EQ",
            TokenKind::NotEq => "NE",
            TokenKind::LessEq => "LE",
            TokenKind::GreaterEq => "GE",
            TokenKind::AndAnd => "AND",
            TokenKind::OrOr => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LAngle => "LANGLE",
            TokenKind::RAngle => "RANGLE",
            TokenKind::Hash => "HASH",
            TokenKind::Include => "INCLUDE",
            TokenKind::Define => "DEFINE",
            TokenKind::Eof => "EOF",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_is_case_sensitive() {
        assert_eq!(TokenKind::keyword_from_str("while"), Some(TokenKind::While));
        assert_eq!(TokenKind::keyword_from_str("While"), None);
        assert_eq!(TokenKind::keyword_from_str("main"), None);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Identifier, "x", Position::new(3, 5));
        assert_eq!(token.to_string(), "IDENTIFIER(x) at 3:5");
        assert_eq!(Token::eof(Position::new(1, 1)).to_string(), "EOF() at 1:1");
    }

    #[test]
    fn test_source_text_restores_quotes() {
        let pos = Position::start();
        assert_eq!(Token::string("a\n\"b", '"', pos).source_text(), r#""a\n\"b""#);
        assert_eq!(Token::string("it's", '\'', pos).source_text(), r"'it\'s'");
        assert_eq!(Token::new(TokenKind::String, "s", pos).source_text(), "\"s\"");
        assert_eq!(Token::new(TokenKind::Identifier, "x", pos).source_text(), "x");
    }
}
