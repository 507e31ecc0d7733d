use crate::{Expr, LiteralValue};

/// Renders an expression tree in a canonical parenthesized prefix form,
/// e.g. `(* (- 123) (group 45.67))`. Diagnostic only; a pure read-only
/// traversal with no failure mode.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(value) => match value {
                LiteralValue::Number(n) => n.to_string(),
                LiteralValue::Str(s) => s.clone(),
                LiteralValue::Boolean(b) => b.to_string(),
                LiteralValue::Nil => "nil".to_string(),
            },
            Expr::Grouping(inner) => self.parenthesize("group", &[inner]),
            Expr::Unary { operator, right } => self.parenthesize(&operator.lexeme, &[right]),
            Expr::Binary { left, operator, right } => {
                self.parenthesize(&operator.lexeme, &[left, right])
            }
            Expr::Comma(operands) => {
                let operands: Vec<&Expr> = operands.iter().collect();
                self.parenthesize(",", &operands)
            }
            Expr::Ternary { condition, then_branch, else_branch } => {
                self.parenthesize("?:", &[condition, then_branch, else_branch])
            }

            Expr::Logical { left, operator, right } => {
                self.parenthesize(&operator.lexeme, &[left, right])
            }
            Expr::Variable(name) => name.lexeme.clone(),
            Expr::Assign { name, value } => {
                self.parenthesize(&format!("= {}", name.lexeme), &[value])
            }
            Expr::Call { callee, arguments, .. } => {
                let mut operands: Vec<&Expr> = vec![callee];
                operands.extend(arguments.iter());
                self.parenthesize("call", &operands)
            }
            Expr::Get { object, name } => {
                self.parenthesize(&format!("get {}", name.lexeme), &[object])
            }
            Expr::Set { object, name, value } => {
                self.parenthesize(&format!("set {}", name.lexeme), &[object, value])
            }
            Expr::This(_) => "this".to_string(),
            Expr::Super { method, .. } => format!("super.{}", method.lexeme),
        }
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print(expr));
        }
        out.push(')');
        out
    }
}
