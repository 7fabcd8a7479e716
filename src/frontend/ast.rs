//! Abstract Syntax Tree definitions for tinyc
//!
//! Every node owns its children outright. Only leaves (literals, identifiers)
//! and operator tokens carry a source position; composite nodes derive theirs
//! from their leaves through [`Expr::position`].

use std::fmt;

use crate::utils::Position;

/// A complete program (compilation unit)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

/// Primitive type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    Char,
    Void,
}

impl TypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Char => "char",
            TypeName::Void => "void",
        }
    }
}

/// Identifier with its source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub pos: Position,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: Position) -> Self {
        Self { name: name.into(), pos }
    }
}

/// A declarator after the first in `int a, b = 2;`
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: Ident,
    pub initializer: Option<Expr>,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: TypeName,
    /// Declarations may leave parameters unnamed
    pub name: Option<Ident>,
}

/// Return type, name and parameters of a function
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSig {
    pub return_type: TypeName,
    pub name: Ident,
    pub params: Vec<Param>,
}

/// Preprocessor directive kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    Include,
    Define,
    /// Any other `#word`; the word is kept
    Other(String),
}

impl DirectiveKind {
    pub fn as_str(&self) -> &str {
        match self {
            DirectiveKind::Include => "include",
            DirectiveKind::Define => "define",
            DirectiveKind::Other(word) => word,
        }
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// type name [= expr] [, name [= expr]]* ;
    VarDeclaration {
        ty: TypeName,
        name: Ident,
        initializer: Option<Expr>,
        additional: Vec<Declarator>,
    },
    /// name = expr ;
    Assignment { target: Ident, value: Expr },
    /// Expression statement
    Expression(Expr),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While { condition: Expr, body: Box<Stmt> },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    /// { stmts }
    Compound { statements: Vec<Stmt> },
    Return { value: Option<Expr> },
    Break,
    Continue,
    /// A lone `;` in a required body slot
    Empty,
    Preprocessor { kind: DirectiveKind, content: String },
    FunctionDeclaration(FunctionSig),
    FunctionDefinition { sig: FunctionSig, body: Vec<Stmt> },
}

/// Literal value, kept as raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub value: String,
    pub kind: LiteralKind,
    pub pos: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    String,
    /// Placeholder standing in for a missing or malformed expression
    Error,
}

impl LiteralKind {
    pub fn name(&self) -> &'static str {
        match self {
            LiteralKind::Integer => "INTEGER",
            LiteralKind::Float => "FLOAT",
            LiteralKind::String => "STRING",
            LiteralKind::Error => "ERROR",
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Identifier(Ident),
    Binary {
        op: BinOp,
        op_pos: Position,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        op_pos: Position,
        operand: Box<Expr>,
    },
    /// x++ / x--
    Postfix {
        op: PostfixOp,
        op_pos: Position,
        operand: Ident,
    },
    Call { callee: Ident, args: Vec<Expr> },
}

impl Expr {
    /// The sentinel put into a required slot the parser could not fill
    pub fn error_placeholder(pos: Position) -> Self {
        Expr::Literal(Literal {
            value: "ERROR".to_string(),
            kind: LiteralKind::Error,
            pos,
        })
    }

    pub fn is_error_placeholder(&self) -> bool {
        matches!(self, Expr::Literal(Literal { kind: LiteralKind::Error, .. }))
    }

    /// Position of the leftmost leaf
    pub fn position(&self) -> Position {
        match self {
            Expr::Literal(lit) => lit.pos,
            Expr::Identifier(ident) => ident.pos,
            Expr::Binary { left, .. } => left.position(),
            Expr::Unary { op_pos, .. } => *op_pos,
            Expr::Postfix { operand, .. } => operand.pos,
            Expr::Call { callee, .. } => callee.pos,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Not,
    Neg,
    PreIncrement,
    PreDecrement,
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Not => "!",
            UnOp::Neg => "-",
            UnOp::PreIncrement => "++",
            UnOp::PreDecrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

// ==================== Single-line Rendering ====================

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} {}", self.ty, name.name),
            None => write!(f, "{}", self.ty),
        }
    }
}

impl fmt::Display for FunctionSig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "Literal: {} ({})", lit.value, lit.kind.name()),
            Expr::Identifier(ident) => write!(f, "Identifier: {}", ident.name),
            Expr::Binary { op, left, right, .. } => {
                write!(f, "BinaryExpr: ({} {} {})", left, op.symbol(), right)
            }
            Expr::Unary { op, operand, .. } => write!(f, "UnaryExpr: {}{}", op.symbol(), operand),
            Expr::Postfix { op, operand, .. } => {
                write!(f, "PostfixExpr: {}{}", operand.name, op.symbol())
            }
            Expr::Call { callee, args } => {
                write!(f, "FunctionCall: {}(", callee.name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::VarDeclaration { ty, name, initializer, additional } => {
                write!(f, "VarDeclaration: {} {}", ty, name.name)?;
                if let Some(init) = initializer {
                    write!(f, " = {}", init)?;
                }
                for decl in additional {
                    write!(f, ", {}", decl.name.name)?;
                    if let Some(init) = &decl.initializer {
                        write!(f, " = {}", init)?;
                    }
                }
                Ok(())
            }
            Stmt::Assignment { target, value } => {
                write!(f, "Assignment: {} = {}", target.name, value)
            }
            Stmt::Expression(expr) => write!(f, "ExpressionStatement: {}", expr),
            Stmt::If { condition, then_branch, else_branch } => {
                write!(f, "IfStatement: condition({}) then({})", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else({})", else_branch)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => {
                write!(f, "WhileStatement: condition({}) body({})", condition, body)
            }
            Stmt::For { init, condition, update, body } => {
                write!(f, "ForStatement: init(")?;
                if let Some(init) = init {
                    write!(f, "{}", init)?;
                }
                write!(f, ") condition(")?;
                if let Some(condition) = condition {
                    write!(f, "{}", condition)?;
                }
                write!(f, ") update(")?;
                if let Some(update) = update {
                    write!(f, "{}", update)?;
                }
                write!(f, ") body({})", body)
            }
            Stmt::Compound { statements } => {
                write!(f, "CompoundStatement {{{} statements}}", statements.len())
            }
            Stmt::Return { value: Some(value) } => write!(f, "ReturnStatement: {}", value),
            Stmt::Return { value: None } => write!(f, "ReturnStatement: void"),
            Stmt::Break => write!(f, "BreakStatement"),
            Stmt::Continue => write!(f, "ContinueStatement"),
            Stmt::Empty => write!(f, "EmptyStatement"),
            Stmt::Preprocessor { kind, content } => {
                write!(f, "PreprocessorDirective: #{} {}", kind.as_str(), content)
            }
            Stmt::FunctionDeclaration(sig) => write!(f, "FunctionDeclaration: {}", sig),
            Stmt::FunctionDefinition { sig, body } => {
                write!(f, "FunctionDefinition: {} {{{} statements}}", sig, body.len())
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Program {{{} statements}}", self.statements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::Identifier(Ident::new(name, Position::start()))
    }

    #[test]
    fn test_single_line_rendering() {
        let expr = Expr::Binary {
            op: BinOp::Gt,
            op_pos: Position::new(1, 3),
            left: Box::new(ident("a")),
            right: Box::new(ident("b")),
        };
        assert_eq!(expr.to_string(), "BinaryExpr: (Identifier: a > Identifier: b)");

        let stmt = Stmt::Return { value: None };
        assert_eq!(stmt.to_string(), "ReturnStatement: void");
    }

    #[test]
    fn test_position_comes_from_leftmost_leaf() {
        let expr = Expr::Binary {
            op: BinOp::Add,
            op_pos: Position::new(4, 9),
            left: Box::new(Expr::Identifier(Ident::new("x", Position::new(4, 7)))),
            right: Box::new(Expr::error_placeholder(Position::new(4, 11))),
        };
        assert_eq!(expr.position(), Position::new(4, 7));
    }

    #[test]
    fn test_error_placeholder() {
        let expr = Expr::error_placeholder(Position::new(2, 1));
        assert!(expr.is_error_placeholder());
        assert_eq!(expr.to_string(), "Literal: ERROR (ERROR)");
    }
}
