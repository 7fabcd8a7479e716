// Expression parsing for tinyc
//
// Precedence, loosest first: || then && then == != then < <= > >= then + -
// then * / %, all left-associative, followed by the prefix operators ! and -.

use crate::frontend::ast::*;
use crate::frontend::parser::Parser;
use crate::frontend::token::TokenKind;
use crate::utils::{Result, SyntaxError};

impl Parser {
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.nested(|p| p.parse_expr_bp(0))
    }

    /// Parse expression with binding power (Pratt parsing)
    ///
    /// Every operator in a chain deepens the left spine of the tree, so each
    /// one takes a nesting level until the chain ends.
    fn parse_expr_bp(&mut self, min_bp: u8) -> Result<Expr> {
        let depth = self.depth();
        let result = self.parse_binary_chain(min_bp);
        self.restore_depth(depth);
        result
    }

    fn parse_binary_chain(&mut self, min_bp: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op_token = self.current().clone();
            let Some(bp) = op_token.kind.binary_precedence() else {
                break;
            };
            if bp < min_bp {
                break;
            }
            let Some(op) = Self::token_to_binop(op_token.kind) else {
                break;
            };

            self.deepen()?;
            self.advance();
            let right = self.parse_expr_bp(bp + 1)?;

            left = Expr::Binary {
                op,
                op_pos: op_token.pos,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn token_to_binop(kind: TokenKind) -> Option<BinOp> {
        let op = match kind {
            TokenKind::OrOr => BinOp::Or,
            TokenKind::AndAnd => BinOp::And,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::NotEq => BinOp::Ne,
            TokenKind::LAngle => BinOp::Lt,
            TokenKind::LessEq => BinOp::Le,
            TokenKind::RAngle => BinOp::Gt,
            TokenKind::GreaterEq => BinOp::Ge,
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current_kind() {
            TokenKind::Not => UnOp::Not,
            TokenKind::Minus => UnOp::Neg,
            _ => return self.parse_primary(),
        };

        let op_pos = self.advance().pos;
        let operand = self.nested(|p| p.parse_unary())?;

        Ok(Expr::Unary {
            op,
            op_pos,
            operand: Box::new(operand),
        })
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let token = self.current().clone();

        let kind = match token.kind {
            TokenKind::Integer => Some(LiteralKind::Integer),
            TokenKind::Float => Some(LiteralKind::Float),
            TokenKind::String => Some(LiteralKind::String),
            _ => None,
        };
        if let Some(kind) = kind {
            self.advance();
            return Ok(Expr::Literal(Literal {
                value: token.text,
                kind,
                pos: token.pos,
            }));
        }

        match token.kind {
            TokenKind::Identifier => {
                self.advance();
                let ident = Ident::new(token.text, token.pos);

                if self.match_kind(TokenKind::LParen) {
                    return self.parse_call_rest(ident);
                }

                let postfix = match self.current_kind() {
                    TokenKind::Increment => Some(PostfixOp::Increment),
                    TokenKind::Decrement => Some(PostfixOp::Decrement),
                    _ => None,
                };
                if let Some(op) = postfix {
                    let op_pos = self.advance().pos;
                    return Ok(Expr::Postfix {
                        op,
                        op_pos,
                        operand: ident,
                    });
                }

                Ok(Expr::Identifier(ident))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "Expected ')' after expression");
                Ok(expr)
            }
            TokenKind::Error => {
                // consumed so the rest of the statement still lines up
                self.advance();
                self.record(SyntaxError::ExpectedExpression { pos: token.pos });
                Ok(Expr::error_placeholder(token.pos))
            }
            _ => {
                self.record(SyntaxError::ExpectedExpression { pos: token.pos });
                Ok(Expr::error_placeholder(token.pos))
            }
        }
    }

    /// Arguments of a call; the '(' is already consumed
    fn parse_call_rest(&mut self, callee: Ident) -> Result<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "Expected ')' after function arguments");

        Ok(Expr::Call { callee, args })
    }
}
