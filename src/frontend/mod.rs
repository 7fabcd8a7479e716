//! Frontend module - Lexer, Parser, AST

pub mod token;
pub mod lexer;
pub mod ast;
pub mod ast_printer;
pub mod parser;
mod parser_expr;
