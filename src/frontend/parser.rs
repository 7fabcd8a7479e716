//! Parser for tinyc
//!
//! Recursive descent parser with precedence climbing for expressions (see
//! `parser_expr.rs`). The parser never gives up on its input: a missing
//! required token is recorded and parsing carries on from the same token,
//! statement loops force progress when an iteration consumes nothing, and
//! failures that do unwind (nesting deeper than [`ParserConfig::max_depth`])
//! are caught at the expression-statement and top-level statement loops.
//!
//! Newline tokens are insignificant except while a preprocessor line is
//! being read.

use log::{debug, trace};

use crate::frontend::ast::*;
use crate::frontend::token::{Token, TokenKind};
use crate::utils::{Result, SyntaxError};

/// Parser settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest combined statement/expression nesting accepted. Each operator
    /// of a binary chain such as `a + b + c` counts as one level.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}

/// Parse a token sequence with the default configuration
pub fn parse(tokens: Vec<Token>) -> (Program, Vec<SyntaxError>) {
    parse_with_config(tokens, ParserConfig::default())
}

pub fn parse_with_config(tokens: Vec<Token>, config: ParserConfig) -> (Program, Vec<SyntaxError>) {
    let mut parser = Parser::with_config(tokens, config);
    let program = parser.parse_program();
    (program, parser.into_errors())
}

/// The parser
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Kind of the last significant token consumed
    previous: TokenKind,
    errors: Vec<SyntaxError>,
    config: ParserConfig,
    depth: usize,
    /// Set while a preprocessor line is read; newlines end the line
    in_directive: bool,
}

impl Parser {
    /// Create a parser from pre-tokenized input
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(mut tokens: Vec<Token>, config: ParserConfig) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let pos = tokens.last().map(|t| t.pos).unwrap_or_default();
            tokens.push(Token::eof(pos));
        }
        Self {
            tokens,
            pos: 0,
            previous: TokenKind::Eof,
            errors: Vec::new(),
            config,
            depth: 0,
            in_directive: false,
        }
    }

    /// Syntax errors recorded so far, in the order they were found
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    // ==================== Helper Methods ====================

    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the n-th token after the current one
    pub(crate) fn peek_kind(&self, n: usize) -> TokenKind {
        let mut seen = 0;
        for token in &self.tokens[self.pos + 1..] {
            if token.kind == TokenKind::Newline && !self.in_directive {
                continue;
            }
            seen += 1;
            if seen == n {
                return token.kind;
            }
        }
        TokenKind::Eof
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
            self.previous = token.kind;
        }
        if !self.in_directive {
            self.skip_newlines();
        }
        token
    }

    fn skip_newlines(&mut self) {
        while self.current_kind() == TokenKind::Newline {
            self.pos += 1;
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume a required token. On mismatch the error is recorded and the
    /// cursor stays put so the caller's next check sees the same token.
    pub(crate) fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.record(SyntaxError::MissingToken {
                message: message.to_string(),
                pos: self.current().pos,
            });
            None
        }
    }

    fn expect_ident(&mut self, message: &str) -> Ident {
        match self.expect(TokenKind::Identifier, message) {
            Some(token) => Ident::new(token.text, token.pos),
            None => Ident::new("ERROR", self.current().pos),
        }
    }

    pub(crate) fn record(&mut self, error: SyntaxError) {
        self.errors.push(error);
    }

    /// Take one more nesting level, failing once the limit is reached
    pub(crate) fn deepen(&mut self) -> Result<()> {
        if self.depth >= self.config.max_depth {
            return Err(SyntaxError::NestingTooDeep {
                limit: self.config.max_depth,
                pos: self.current().pos,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Current nesting level; callers that `deepen` repeatedly restore it
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn restore_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Run a nested parse, failing once the nesting limit is reached
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.deepen()?;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Discard tokens until just past a `;` or up to a statement keyword
    fn synchronize(&mut self) {
        let start = self.pos;
        self.advance();

        while !self.is_at_end() {
            if self.previous == TokenKind::Semicolon {
                break;
            }
            if matches!(
                self.current_kind(),
                TokenKind::Int
                    | TokenKind::FloatKw
                    | TokenKind::Char
                    | TokenKind::Void
                    | TokenKind::If
                    | TokenKind::While
                    | TokenKind::For
                    | TokenKind::Return
                    | TokenKind::Break
                    | TokenKind::Continue
                    | TokenKind::Hash
            ) {
                break;
            }
            self.advance();
        }
        trace!("synchronize skipped {} tokens", self.pos - start);
    }

    // ==================== Statements ====================

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        self.skip_newlines();

        while !self.is_at_end() {
            let start = self.pos;

            match self.parse_statement() {
                Ok(Some(stmt)) => statements.push(stmt),
                Ok(None) => {}
                Err(error) => {
                    trace!("recovering from '{}' at {}", error, error.pos());
                    self.record(error);
                    self.synchronize();
                }
            }
            self.skip_newlines();

            if self.pos == start && !self.is_at_end() {
                trace!("forced skip of {}", self.current());
                self.record(SyntaxError::UnprocessableToken { pos: self.current().pos });
                self.advance();
            }
        }

        debug!(
            "parsed {} top-level statements with {} syntax errors",
            statements.len(),
            self.errors.len()
        );
        Program { statements }
    }

    /// Parse one statement. `None` means nothing was produced: end of input,
    /// a closing brace, a stray `;`, or a statement dropped during recovery.
    fn parse_statement(&mut self) -> Result<Option<Stmt>> {
        self.skip_newlines();
        if self.is_at_end() || self.check(TokenKind::RBrace) {
            return Ok(None);
        }
        self.nested(|p| p.parse_statement_kind())
    }

    fn parse_statement_kind(&mut self) -> Result<Option<Stmt>> {
        let kind = self.current_kind();

        if kind == TokenKind::Hash {
            return Ok(Some(self.parse_directive()));
        }

        // Function header: type keyword, identifier, '('
        if kind.is_type_keyword()
            && self.peek_kind(1) == TokenKind::Identifier
            && self.peek_kind(2) == TokenKind::LParen
        {
            return self.parse_function().map(Some);
        }

        match kind {
            TokenKind::Int | TokenKind::FloatKw | TokenKind::Char => {
                self.parse_var_declaration().map(Some)
            }
            TokenKind::If => self.parse_if_stmt().map(Some),
            TokenKind::While => self.parse_while_stmt().map(Some),
            TokenKind::For => self.parse_for_stmt().map(Some),
            TokenKind::LBrace => {
                let statements = self.parse_block()?;
                Ok(Some(Stmt::Compound { statements }))
            }
            TokenKind::Return => self.parse_return_stmt().map(Some),
            TokenKind::Break => {
                self.advance();
                self.expect(TokenKind::Semicolon, "Expected ';' after break");
                Ok(Some(Stmt::Break))
            }
            TokenKind::Continue => {
                self.advance();
                self.expect(TokenKind::Semicolon, "Expected ';' after continue");
                Ok(Some(Stmt::Continue))
            }
            TokenKind::Identifier if self.peek_kind(1) == TokenKind::Assign => {
                let stmt = self.parse_assignment()?;
                self.expect(TokenKind::Semicolon, "Expected ';' after assignment");
                Ok(Some(stmt))
            }
            _ => self.parse_expression_stmt(),
        }
    }

    /// A statement in a required slot (if/else/while/for bodies)
    fn parse_body(&mut self, context: &str) -> Result<Box<Stmt>> {
        if self.match_kind(TokenKind::Semicolon) {
            return Ok(Box::new(Stmt::Empty));
        }

        let pos = self.current().pos;
        if self.is_at_end() || self.check(TokenKind::RBrace) {
            self.record(SyntaxError::MissingToken {
                message: format!("Expected statement after {}", context),
                pos,
            });
            return Ok(Box::new(Stmt::Expression(Expr::error_placeholder(pos))));
        }

        let stmt = self
            .parse_statement()?
            .unwrap_or_else(|| Stmt::Expression(Expr::error_placeholder(pos)));
        Ok(Box::new(stmt))
    }

    fn parse_type(&mut self) -> TypeName {
        match self.advance().kind {
            TokenKind::Int => TypeName::Int,
            TokenKind::FloatKw => TypeName::Float,
            TokenKind::Char => TypeName::Char,
            _ => TypeName::Void,
        }
    }

    fn parse_var_declaration(&mut self) -> Result<Stmt> {
        let ty = self.parse_type();
        let name = self.expect_ident("Expected variable name");

        let initializer = if self.match_kind(TokenKind::Assign) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let mut additional = Vec::new();
        while self.match_kind(TokenKind::Comma) {
            let name = self.expect_ident("Expected variable name after ','");
            let initializer = if self.match_kind(TokenKind::Assign) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            additional.push(Declarator { name, initializer });
        }

        self.expect(TokenKind::Semicolon, "Expected ';' after variable declaration");

        Ok(Stmt::VarDeclaration {
            ty,
            name,
            initializer,
            additional,
        })
    }

    /// name = expr, without the terminator
    fn parse_assignment(&mut self) -> Result<Stmt> {
        let token = self.advance();
        let target = Ident::new(token.text, token.pos);
        self.advance(); // '='
        let value = self.parse_expression()?;
        Ok(Stmt::Assignment { target, value })
    }

    fn parse_function(&mut self) -> Result<Stmt> {
        let return_type = self.parse_type();
        let name_token = self.advance();
        let name = Ident::new(name_token.text, name_token.pos);
        self.advance(); // '('

        let params = self.parse_params();
        self.expect(TokenKind::RParen, "Expected ')' after function parameters");

        let sig = FunctionSig {
            return_type,
            name,
            params,
        };

        if self.match_kind(TokenKind::Semicolon) {
            return Ok(Stmt::FunctionDeclaration(sig));
        }
        if self.check(TokenKind::LBrace) {
            let body = self.parse_block()?;
            return Ok(Stmt::FunctionDefinition { sig, body });
        }

        self.record(SyntaxError::MissingToken {
            message: "Expected ';' or function body after function signature".to_string(),
            pos: self.current().pos,
        });
        Ok(Stmt::FunctionDeclaration(sig))
    }

    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = Vec::new();

        if self.check(TokenKind::RParen) {
            return params;
        }
        if self.check(TokenKind::Void) && self.peek_kind(1) == TokenKind::RParen {
            self.advance();
            return params;
        }

        loop {
            if !self.current_kind().is_type_keyword() {
                self.record(SyntaxError::MissingToken {
                    message: "Expected parameter type".to_string(),
                    pos: self.current().pos,
                });
                while !matches!(
                    self.current_kind(),
                    TokenKind::RParen | TokenKind::LBrace | TokenKind::Semicolon | TokenKind::Eof
                ) {
                    self.advance();
                }
                break;
            }

            let ty = self.parse_type();
            let name = if self.check(TokenKind::Identifier) {
                let token = self.advance();
                Some(Ident::new(token.text, token.pos))
            } else {
                None
            };
            params.push(Param { ty, name });

            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }

        params
    }

    fn parse_if_stmt(&mut self) -> Result<Stmt> {
        self.advance(); // 'if'
        self.expect(TokenKind::LParen, "Expected '(' after 'if'");
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "Expected ')' after if condition");

        let then_branch = self.parse_body("'if'")?;

        // Checked before returning to any enclosing if, so else binds to the nearest one
        self.skip_newlines();
        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(self.parse_body("'else'")?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_stmt(&mut self) -> Result<Stmt> {
        self.advance(); // 'while'
        self.expect(TokenKind::LParen, "Expected '(' after 'while'");
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen, "Expected ')' after while condition");

        let body = self.parse_body("'while'")?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_for_stmt(&mut self) -> Result<Stmt> {
        self.advance(); // 'for'
        self.expect(TokenKind::LParen, "Expected '(' after 'for'");

        let init = if self.match_kind(TokenKind::Semicolon) {
            None
        } else if matches!(
            self.current_kind(),
            TokenKind::Int | TokenKind::FloatKw | TokenKind::Char
        ) {
            // the declaration consumes its own ';'
            Some(Box::new(self.parse_var_declaration()?))
        } else {
            let init = self.parse_simple_stmt()?;
            self.expect(TokenKind::Semicolon, "Expected ';' after for loop initialization");
            Some(Box::new(init))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon, "Expected ';' after for loop condition");

        let update = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()?))
        };
        self.expect(TokenKind::RParen, "Expected ')' after for loop clauses");

        let body = self.parse_body("'for'")?;

        Ok(Stmt::For {
            init,
            condition,
            update,
            body,
        })
    }

    /// Assignment, prefix increment or bare expression, without a terminator
    fn parse_simple_stmt(&mut self) -> Result<Stmt> {
        if self.check(TokenKind::Identifier) && self.peek_kind(1) == TokenKind::Assign {
            return self.parse_assignment();
        }
        if matches!(self.current_kind(), TokenKind::Increment | TokenKind::Decrement)
            && self.peek_kind(1) == TokenKind::Identifier
        {
            return Ok(Stmt::Expression(self.parse_prefix_update()));
        }
        Ok(Stmt::Expression(self.parse_expression()?))
    }

    /// `++x` / `--x`; the caller has checked the identifier follows
    fn parse_prefix_update(&mut self) -> Expr {
        let op_token = self.advance();
        let op = if op_token.kind == TokenKind::Increment {
            UnOp::PreIncrement
        } else {
            UnOp::PreDecrement
        };
        let ident = self.advance();
        Expr::Unary {
            op,
            op_pos: op_token.pos,
            operand: Box::new(Expr::Identifier(Ident::new(ident.text, ident.pos))),
        }
    }

    /// Parse a `{ ... }` block
    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(TokenKind::LBrace, "Expected '{'");

        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            let start = self.pos;

            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
            self.skip_newlines();

            if self.pos == start && !self.is_at_end() && !self.check(TokenKind::RBrace) {
                trace!("forced skip of {} inside block", self.current());
                self.record(SyntaxError::ParserStuck { pos: self.current().pos });
                self.advance();
            }
        }

        self.expect(TokenKind::RBrace, "Expected '}'");
        Ok(statements)
    }

    fn parse_return_stmt(&mut self) -> Result<Stmt> {
        self.advance(); // 'return'

        let value = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.expect(TokenKind::Semicolon, "Expected ';' after return statement");
        Ok(Stmt::Return { value })
    }

    fn parse_expression_stmt(&mut self) -> Result<Option<Stmt>> {
        // stray ';'
        if self.match_kind(TokenKind::Semicolon) {
            return Ok(None);
        }

        if matches!(self.current_kind(), TokenKind::Increment | TokenKind::Decrement) {
            if self.peek_kind(1) != TokenKind::Identifier {
                let op = if self.check(TokenKind::Increment) { "increment" } else { "decrement" };
                self.advance();
                self.record(SyntaxError::MissingToken {
                    message: format!("Expected identifier after {} operator", op),
                    pos: self.current().pos,
                });
                return Ok(None);
            }
            let expr = self.parse_prefix_update();
            self.expect(TokenKind::Semicolon, "Expected ';' after increment/decrement");
            return Ok(Some(Stmt::Expression(expr)));
        }

        let start = self.pos;
        match self.parse_expression() {
            // nothing usable here; the enclosing loop skips the token
            Ok(_) if self.pos == start => Ok(None),
            Ok(expr) => {
                self.expect(TokenKind::Semicolon, "Expected ';' after expression");
                Ok(Some(Stmt::Expression(expr)))
            }
            Err(error) => {
                trace!("dropping expression statement: {}", error);
                self.record(error);
                while !matches!(
                    self.current_kind(),
                    TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
                ) {
                    self.advance();
                }
                self.match_kind(TokenKind::Semicolon);
                Ok(None)
            }
        }
    }

    // ==================== Preprocessor ====================

    /// Read one `#...` line. Newlines are significant until it ends.
    fn parse_directive(&mut self) -> Stmt {
        self.in_directive = true;
        self.advance(); // '#'

        let stmt = match self.current_kind() {
            TokenKind::Include => {
                self.advance();
                let content = self.parse_include_target();
                Stmt::Preprocessor {
                    kind: DirectiveKind::Include,
                    content,
                }
            }
            TokenKind::Define => {
                self.advance();
                Stmt::Preprocessor {
                    kind: DirectiveKind::Define,
                    content: self.rest_of_line(),
                }
            }
            TokenKind::Newline | TokenKind::Eof => {
                self.record(SyntaxError::UnexpectedToken {
                    message: "Expected directive name after '#'".to_string(),
                    pos: self.current().pos,
                });
                Stmt::Preprocessor {
                    kind: DirectiveKind::Other(String::new()),
                    content: String::new(),
                }
            }
            _ => {
                let word = self.advance().text;
                Stmt::Preprocessor {
                    kind: DirectiveKind::Other(word),
                    content: self.rest_of_line(),
                }
            }
        };

        // anything left on the line belongs to the directive
        while !self.check(TokenKind::Newline) && !self.is_at_end() {
            self.advance();
        }
        self.in_directive = false;
        self.skip_newlines();
        stmt
    }

    fn parse_include_target(&mut self) -> String {
        if self.match_kind(TokenKind::LAngle) {
            let mut file = String::new();
            while !matches!(
                self.current_kind(),
                TokenKind::RAngle | TokenKind::Newline | TokenKind::Eof
            ) {
                file.push_str(&self.advance().text);
            }

            if file.is_empty() {
                self.record(SyntaxError::UnexpectedToken {
                    message: "Expected filename in #include directive".to_string(),
                    pos: self.current().pos,
                });
            }
            self.expect(TokenKind::RAngle, "Expected '>' to close #include directive");
            return format!("<{}>", file);
        }

        if self.check(TokenKind::String) {
            return self.advance().source_text();
        }

        self.record(SyntaxError::UnexpectedToken {
            message: "Expected '<filename>' or \"filename\" after #include".to_string(),
            pos: self.current().pos,
        });
        String::new()
    }

    fn rest_of_line(&mut self) -> String {
        let mut parts = Vec::new();
        while !self.check(TokenKind::Newline) && !self.is_at_end() {
            parts.push(self.advance().source_text());
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::tokenize;
    use crate::utils::Position;
    use pretty_assertions::assert_eq;

    fn parse_source(source: &str) -> (Program, Vec<SyntaxError>) {
        let (tokens, _) = tokenize(source);
        parse(tokens)
    }

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse_source(source);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        program
    }

    fn ident(name: &str) -> String {
        format!("Identifier: {}", name)
    }

    #[test]
    fn test_var_declaration() {
        let program = parse_ok("int x = 5;");

        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Stmt::VarDeclaration { ty, name, initializer: Some(Expr::Literal(lit)), additional } => {
                assert_eq!(*ty, TypeName::Int);
                assert_eq!(name.name, "x");
                assert_eq!(lit.value, "5");
                assert_eq!(lit.kind, LiteralKind::Integer);
                assert!(additional.is_empty());
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_declarators() {
        let program = parse_ok("float a, b = 2.5, c;");

        match &program.statements[0] {
            Stmt::VarDeclaration { ty, name, additional, .. } => {
                assert_eq!(*ty, TypeName::Float);
                assert_eq!(name.name, "a");
                let names: Vec<_> = additional.iter().map(|d| d.name.name.as_str()).collect();
                assert_eq!(names, vec!["b", "c"]);
                assert!(additional[0].initializer.is_some());
            }
            other => panic!("expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else() {
        let program = parse_ok("if (a > b) { return a; } else { return b; }");

        let Stmt::If { condition, then_branch, else_branch } = &program.statements[0] else {
            panic!("expected if statement");
        };
        assert_eq!(condition.to_string(), format!("BinaryExpr: ({} > {})", ident("a"), ident("b")));
        assert_eq!(
            **then_branch,
            Stmt::Compound {
                statements: vec![Stmt::Return {
                    value: Some(Expr::Identifier(Ident::new("a", Position::new(1, 21)))),
                }],
            }
        );
        let Some(else_branch) = else_branch else {
            panic!("expected else branch");
        };
        assert_eq!(
            else_branch.to_string(),
            "CompoundStatement {1 statements}"
        );
    }

    #[test]
    fn test_dangling_else_binds_to_nearest_if() {
        let program = parse_ok("if (a) if (b) x=1; else x=2;");

        let Stmt::If { then_branch, else_branch, .. } = &program.statements[0] else {
            panic!("expected if statement");
        };
        assert!(else_branch.is_none());
        let Stmt::If { condition, else_branch: inner_else, .. } = &**then_branch else {
            panic!("expected nested if");
        };
        assert_eq!(condition.to_string(), ident("b"));
        assert!(inner_else.is_some());
    }

    #[test]
    fn test_dangling_else_across_lines() {
        let program = parse_ok("if (a)\n  if (b)\n    x = 1;\n  else\n    x = 2;\n");
        let Stmt::If { then_branch, else_branch, .. } = &program.statements[0] else {
            panic!("expected if statement");
        };
        assert!(else_branch.is_none());
        assert!(matches!(&**then_branch, Stmt::If { else_branch: Some(_), .. }));
    }

    #[test]
    fn test_for_statement() {
        let program = parse_ok("for (int i = 0; i < 10; i++) { x = x + 1; }");

        let Stmt::For { init, condition, update, body } = &program.statements[0] else {
            panic!("expected for statement");
        };
        assert_eq!(
            init.as_ref().map(|s| s.to_string()),
            Some("VarDeclaration: int i = Literal: 0 (INTEGER)".to_string())
        );
        assert_eq!(
            condition.as_ref().map(|c| c.to_string()),
            Some(format!("BinaryExpr: ({} < Literal: 10 (INTEGER))", ident("i")))
        );
        assert!(matches!(
            update.as_deref(),
            Some(Stmt::Expression(Expr::Postfix { op: PostfixOp::Increment, .. }))
        ));
        let Stmt::Compound { statements } = &**body else {
            panic!("expected block body");
        };
        assert!(matches!(statements[0], Stmt::Assignment { .. }));
    }

    #[test]
    fn test_for_with_empty_clauses() {
        let program = parse_ok("for (;;) break;");
        assert!(matches!(
            &program.statements[0],
            Stmt::For { init: None, condition: None, update: None, .. }
        ));
    }

    #[test]
    fn test_for_with_assignment_clauses() {
        let program = parse_ok("for (i = 0; i < n; i = i + 1) ;");
        let Stmt::For { init, update, body, .. } = &program.statements[0] else {
            panic!("expected for statement");
        };
        assert!(matches!(init.as_deref(), Some(Stmt::Assignment { .. })));
        assert!(matches!(update.as_deref(), Some(Stmt::Assignment { .. })));
        assert_eq!(**body, Stmt::Empty);
    }

    #[test]
    fn test_missing_expression_recovers() {
        let (program, errors) = parse_source("x = ;\ny = 2;");

        assert_eq!(
            errors,
            vec![SyntaxError::ExpectedExpression { pos: Position::new(1, 5) }]
        );
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Stmt::Assignment { value, .. } => assert!(value.is_error_placeholder()),
            other => panic!("expected assignment, got {:?}", other),
        }
        assert_eq!(
            program.statements[1].to_string(),
            "Assignment: y = Literal: 2 (INTEGER)"
        );
    }

    #[test]
    fn test_missing_semicolon_is_reported_once() {
        let (program, errors) = parse_source("int x = 1\nint y = 2;");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Expected ';' after variable declaration");
        assert_eq!(errors[0].pos(), Position::new(2, 1));
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_stray_closing_brace_is_skipped() {
        let (program, errors) = parse_source("} int x;");

        assert_eq!(errors, vec![SyntaxError::UnprocessableToken { pos: Position::new(1, 1) }]);
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_stuck_token_inside_block() {
        let (program, errors) = parse_source("{ ) x = 1; }");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0], SyntaxError::ExpectedExpression { pos: Position::new(1, 3) });
        assert_eq!(errors[1], SyntaxError::ParserStuck { pos: Position::new(1, 3) });
        let Stmt::Compound { statements } = &program.statements[0] else {
            panic!("expected block");
        };
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_unclosed_block() {
        let (program, errors) = parse_source("while (x) { x = x - 1;");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "Expected '}'");
        assert!(matches!(program.statements[0], Stmt::While { .. }));
    }

    #[test]
    fn test_function_declaration_and_definition() {
        let program = parse_ok("int add(int a, int b);\nvoid main(void) { add(1, 2); }");

        let Stmt::FunctionDeclaration(sig) = &program.statements[0] else {
            panic!("expected declaration");
        };
        assert_eq!(sig.to_string(), "int add(int a, int b)");

        let Stmt::FunctionDefinition { sig, body } = &program.statements[1] else {
            panic!("expected definition");
        };
        assert_eq!(sig.return_type, TypeName::Void);
        assert!(sig.params.is_empty());
        assert_eq!(
            body[0].to_string(),
            "ExpressionStatement: FunctionCall: add(Literal: 1 (INTEGER), Literal: 2 (INTEGER))"
        );
    }

    #[test]
    fn test_unnamed_parameters() {
        let program = parse_ok("float scale(float, int);");
        let Stmt::FunctionDeclaration(sig) = &program.statements[0] else {
            panic!("expected declaration");
        };
        assert_eq!(sig.params.len(), 2);
        assert!(sig.params.iter().all(|p| p.name.is_none()));
    }

    #[test]
    fn test_break_continue_and_return() {
        let program = parse_ok("while (1) { break; continue; return; }");
        let Stmt::While { body, .. } = &program.statements[0] else {
            panic!("expected while");
        };
        assert_eq!(
            **body,
            Stmt::Compound {
                statements: vec![Stmt::Break, Stmt::Continue, Stmt::Return { value: None }],
            }
        );
    }

    #[test]
    fn test_increment_statements() {
        let program = parse_ok("++i;\nj--;");
        assert_eq!(program.statements[0].to_string(), "ExpressionStatement: UnaryExpr: ++Identifier: i");
        assert_eq!(program.statements[1].to_string(), "ExpressionStatement: PostfixExpr: j--");
    }

    #[test]
    fn test_prefix_increment_without_identifier() {
        let (_, errors) = parse_source("++;");
        assert_eq!(errors[0].to_string(), "Expected identifier after increment operator");
    }

    #[test]
    fn test_preprocessor_directives() {
        let program = parse_ok("#include <stdio.h>\n#include \"util.h\"\n#define MAX 100\n#pragma once\nint x;");

        let directives: Vec<String> = program.statements[..4].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            directives,
            vec![
                "PreprocessorDirective: #include <stdio.h>",
                "PreprocessorDirective: #include \"util.h\"",
                "PreprocessorDirective: #define MAX 100",
                "PreprocessorDirective: #pragma once",
            ]
        );
        assert!(matches!(program.statements[4], Stmt::VarDeclaration { .. }));
    }

    #[test]
    fn test_directive_strings_keep_their_quotes() {
        let program = parse_ok("#define NL '\\n'\n#include 'a.h'\n");

        let directives: Vec<String> = program.statements.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            directives,
            vec![
                "PreprocessorDirective: #define NL '\\n'",
                "PreprocessorDirective: #include 'a.h'",
            ]
        );
    }

    #[test]
    fn test_include_errors() {
        let (program, errors) = parse_source("#include <>\n#include\nint x;");

        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "Expected filename in #include directive",
                "Expected '<filename>' or \"filename\" after #include",
            ]
        );
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn test_missing_body_gets_placeholder() {
        let (program, errors) = parse_source("{ if (x) }");

        assert_eq!(errors[0].to_string(), "Expected statement after 'if'");
        let Stmt::Compound { statements } = &program.statements[0] else {
            panic!("expected block");
        };
        let Stmt::If { then_branch, .. } = &statements[0] else {
            panic!("expected if");
        };
        assert!(matches!(&**then_branch, Stmt::Expression(e) if e.is_error_placeholder()));
    }

    #[test]
    fn test_nesting_limit_recovers_at_top_level() {
        let tokens = tokenize("x = ((((((1)))))); int y;").0;
        let (program, errors) = parse_with_config(tokens, ParserConfig { max_depth: 4 });

        assert!(matches!(errors[0], SyntaxError::NestingTooDeep { limit: 4, .. }));
        assert!(program
            .statements
            .iter()
            .any(|s| matches!(s, Stmt::VarDeclaration { name, .. } if name.name == "y")));
    }

    #[test]
    fn test_synchronize_stops_after_semicolon_at_line_end() {
        let tokens = tokenize("x = ((((((1))))));\ny = 2;\nz = 3;").0;
        let (program, errors) = parse_with_config(tokens, ParserConfig { max_depth: 4 });

        assert_eq!(errors.len(), 1);
        let rendered: Vec<String> = program.statements.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "Assignment: y = Literal: 2 (INTEGER)",
                "Assignment: z = Literal: 3 (INTEGER)",
            ]
        );
    }

    #[test]
    fn test_long_operator_chain_is_bounded() {
        let source = format!("x = {}1;\ny = 2;", "1+".repeat(200_000));
        let (program, errors) = parse_source(&source);

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SyntaxError::NestingTooDeep { limit: 100, .. }));
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.to_tree_string(), "Program\n  Assignment: y\n    Literal: 2 (INTEGER)\n");
    }

    #[test]
    fn test_operator_chain_within_limit() {
        let source = format!("x = {}1;", "a + ".repeat(50));
        let program = parse_ok(&source);

        let Stmt::Assignment { value, .. } = &program.statements[0] else {
            panic!("expected assignment");
        };
        assert_eq!(value.to_tree_string().lines().count(), 101);
    }

    #[test]
    fn test_nesting_limit_in_expression_statement() {
        let tokens = tokenize("f((((((1)))))); g();").0;
        let (program, errors) = parse_with_config(tokens, ParserConfig { max_depth: 4 });

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], SyntaxError::NestingTooDeep { .. }));
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.statements[0].to_string(), "ExpressionStatement: FunctionCall: g()");
    }

    #[test]
    fn test_deeply_nested_blocks_terminate() {
        let source = format!("{}{}", "{".repeat(500), "}".repeat(500));
        let (_, errors) = parse_source(&source);
        assert!(errors.iter().any(|e| matches!(e, SyntaxError::NestingTooDeep { .. })));
    }

    #[test]
    fn test_garbage_input_terminates() {
        let (program, errors) = parse_source(") ) ( } else ; , = == 5 \"s\" ++ -- # include");
        assert!(!errors.is_empty());
        assert!(program.statements.len() < 20);
    }

    #[test]
    fn test_missing_eof_is_added() {
        let (tokens, _) = tokenize("int x;");
        let without_eof: Vec<Token> = tokens.into_iter().filter(|t| t.kind != TokenKind::Eof).collect();
        let (program, errors) = parse(without_eof);
        assert!(errors.is_empty());
        assert_eq!(program.statements.len(), 1);
    }
}
