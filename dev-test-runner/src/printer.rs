use std::convert::Infallible;

use crate::expr::{Expr, Visitor};

/// Renders an expression as a parenthesized prefix form.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(&mut self, expr: &Expr) -> String {
        match self.visit_expr(expr) {
            Ok(s) => s,
            Err(never) => match never {},
        }
    }

    fn parenthesize(&mut self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({name}");
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print(expr));
        }
        out.push(')');
        out
    }
}

impl Visitor<String, Infallible> for AstPrinter {
    fn visit_expr(&mut self, expr: &Expr) -> Result<String, Infallible> {
        let s = match expr {
            Expr::Assign { name, value } => self.parenthesize(&format!("= {}", name.lexeme), &[&**value]),
            Expr::Binary { left, right, operator } | Expr::Logical { left, operator, right } => {
                self.parenthesize(&operator.lexeme, &[&**left, &**right])
            }
            Expr::Call { callee, arguments, .. } => {
                let mut exprs = vec![&**callee];
                exprs.extend(arguments.iter());
                self.parenthesize("call", &exprs)
            }
            Expr::Grouping { expression } => self.parenthesize("group", &[&**expression]),
            Expr::Literal { value } => value.to_string(),
            Expr::Unary { operator, right } => self.parenthesize(&operator.lexeme, &[&**right]),
            Expr::Variable { name } => name.lexeme.clone(),
        };
        Ok(s)
    }
}
