//! AST Printer - indented tree view of a parsed program
//!
//! Purely derived from node content; printing never touches the tree.

use crate::frontend::ast::*;

/// Pretty printer for the AST
pub struct AstPrinter {
    output: String,
    indent: usize,
}

impl Default for AstPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl AstPrinter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Print a whole program to string
    pub fn print_program(&mut self, program: &Program) -> String {
        self.output.clear();
        self.indent = 0;
        self.line("Program");
        self.nested(|p| {
            for stmt in &program.statements {
                p.stmt(stmt);
            }
        });
        std::mem::take(&mut self.output)
    }

    /// Print a single statement subtree
    pub fn print_stmt(&mut self, stmt: &Stmt) -> String {
        self.output.clear();
        self.indent = 0;
        self.stmt(stmt);
        std::mem::take(&mut self.output)
    }

    /// Print a single expression subtree
    pub fn print_expr(&mut self, expr: &Expr) -> String {
        self.output.clear();
        self.indent = 0;
        self.expr(expr);
        std::mem::take(&mut self.output)
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.output.push_str("  ");
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    /// A labelled child slot, e.g. `Condition:` followed by the subtree
    fn labelled_expr(&mut self, label: &str, expr: &Expr) {
        self.line(label);
        self.nested(|p| p.expr(expr));
    }

    fn labelled_stmt(&mut self, label: &str, stmt: &Stmt) {
        self.line(label);
        self.nested(|p| p.stmt(stmt));
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDeclaration { ty, name, initializer, additional } => {
                self.line(&format!("VarDeclaration: {} {}", ty, name.name));
                self.nested(|p| {
                    if let Some(init) = initializer {
                        p.expr(init);
                    }
                    for decl in additional {
                        p.line(&format!("Declarator: {}", decl.name.name));
                        if let Some(init) = &decl.initializer {
                            p.nested(|p| p.expr(init));
                        }
                    }
                });
            }
            Stmt::Assignment { target, value } => {
                self.line(&format!("Assignment: {}", target.name));
                self.nested(|p| p.expr(value));
            }
            Stmt::Expression(expr) => {
                self.line("ExpressionStatement");
                self.nested(|p| p.expr(expr));
            }
            Stmt::If { condition, then_branch, else_branch } => {
                self.line("IfStatement");
                self.nested(|p| {
                    p.labelled_expr("Condition:", condition);
                    p.labelled_stmt("Then:", then_branch);
                    if let Some(else_branch) = else_branch {
                        p.labelled_stmt("Else:", else_branch);
                    }
                });
            }
            Stmt::While { condition, body } => {
                self.line("WhileStatement");
                self.nested(|p| {
                    p.labelled_expr("Condition:", condition);
                    p.labelled_stmt("Body:", body);
                });
            }
            Stmt::For { init, condition, update, body } => {
                self.line("ForStatement");
                self.nested(|p| {
                    if let Some(init) = init {
                        p.labelled_stmt("Init:", init);
                    }
                    if let Some(condition) = condition {
                        p.labelled_expr("Condition:", condition);
                    }
                    if let Some(update) = update {
                        p.labelled_stmt("Update:", update);
                    }
                    p.labelled_stmt("Body:", body);
                });
            }
            Stmt::Compound { statements } => {
                self.line(&format!("CompoundStatement ({} statements)", statements.len()));
                self.nested(|p| {
                    for stmt in statements {
                        p.stmt(stmt);
                    }
                });
            }
            Stmt::Return { value } => {
                self.line("ReturnStatement");
                if let Some(value) = value {
                    self.nested(|p| p.expr(value));
                }
            }
            Stmt::Break => self.line("BreakStatement"),
            Stmt::Continue => self.line("ContinueStatement"),
            Stmt::Empty => self.line("EmptyStatement"),
            Stmt::Preprocessor { kind, content } => {
                self.line(&format!("PreprocessorDirective: #{} {}", kind.as_str(), content));
            }
            Stmt::FunctionDeclaration(sig) => {
                self.line(&format!("FunctionDeclaration: {}", sig));
            }
            Stmt::FunctionDefinition { sig, body } => {
                self.line(&format!("FunctionDefinition: {}", sig));
                self.nested(|p| {
                    for stmt in body {
                        p.stmt(stmt);
                    }
                });
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => {
                self.line(&format!("Literal: {} ({})", lit.value, lit.kind.name()));
            }
            Expr::Identifier(ident) => self.line(&format!("Identifier: {}", ident.name)),
            Expr::Binary { op, left, right, .. } => {
                self.line(&format!("BinaryExpr: {}", op.symbol()));
                self.nested(|p| {
                    p.expr(left);
                    p.expr(right);
                });
            }
            Expr::Unary { op, operand, .. } => {
                self.line(&format!("UnaryExpr: {}", op.symbol()));
                self.nested(|p| p.expr(operand));
            }
            Expr::Postfix { op, operand, .. } => {
                self.line(&format!("PostfixExpr: {}", op.symbol()));
                self.nested(|p| p.line(&format!("Identifier: {}", operand.name)));
            }
            Expr::Call { callee, args } => {
                self.line(&format!("FunctionCall: {} ({} args)", callee.name, args.len()));
                self.nested(|p| {
                    for arg in args {
                        p.expr(arg);
                    }
                });
            }
        }
    }
}

impl Program {
    /// Recursive indented rendering
    pub fn to_tree_string(&self) -> String {
        AstPrinter::new().print_program(self)
    }
}

impl Stmt {
    pub fn to_tree_string(&self) -> String {
        AstPrinter::new().print_stmt(self)
    }
}

impl Expr {
    pub fn to_tree_string(&self) -> String {
        AstPrinter::new().print_expr(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_var_declaration() {
        let program = Program {
            statements: vec![Stmt::VarDeclaration {
                ty: TypeName::Int,
                name: Ident::new("x", Position::new(1, 5)),
                initializer: Some(Expr::Literal(Literal {
                    value: "5".to_string(),
                    kind: LiteralKind::Integer,
                    pos: Position::new(1, 9),
                })),
                additional: vec![],
            }],
        };

        assert_eq!(
            program.to_tree_string(),
            "Program\n  VarDeclaration: int x\n    Literal: 5 (INTEGER)\n"
        );
    }

    #[test]
    fn test_print_if_else() {
        let stmt = Stmt::If {
            condition: Expr::Identifier(Ident::new("a", Position::start())),
            then_branch: Box::new(Stmt::Break),
            else_branch: Some(Box::new(Stmt::Compound { statements: vec![Stmt::Continue] })),
        };

        let expected = "\
IfStatement
  Condition:
    Identifier: a
  Then:
    BreakStatement
  Else:
    CompoundStatement (1 statements)
      ContinueStatement
";
        assert_eq!(stmt.to_tree_string(), expected);
    }
}
