//! Tiny evaluator over the generated AST. Functions are out of its reach;
//! everything else in the Lox preset runs.
use std::collections::HashMap;

use crate::common::{LiteralType, Token};
use crate::expr::{self, Expr};
use crate::stmt::{self, Stmt};

#[derive(Debug, PartialEq)]
pub enum Interrupt {
    Break,
    Error { line: u32, message: String },
}

pub struct Interpreter {
    scopes: Vec<HashMap<String, LiteralType>>,
    pub output: Vec<String>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self { scopes: vec![HashMap::new()], output: Vec::new() }
    }
}

impl Interpreter {
    pub fn run(&mut self, program: &[Stmt]) -> Result<(), Interrupt> {
        for statement in program {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, statement: &Stmt) -> Result<(), Interrupt> {
        stmt::Visitor::visit_stmt(self, statement)
    }

    fn evaluate(&mut self, expression: &Expr) -> Result<LiteralType, Interrupt> {
        expr::Visitor::visit_expr(self, expression)
    }

    fn lookup(&self, name: &Token) -> Result<LiteralType, Interrupt> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name.lexeme))
            .cloned()
            .ok_or_else(|| error(name, format!("undefined variable '{}'", name.lexeme)))
    }

    fn assign(&mut self, name: &Token, value: LiteralType) -> Result<(), Interrupt> {
        match self.scopes.iter_mut().rev().find_map(|scope| scope.get_mut(&name.lexeme)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(error(name, format!("undefined variable '{}'", name.lexeme))),
        }
    }

    fn define(&mut self, name: &Token, value: LiteralType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), value);
        }
    }
}

fn error(token: &Token, message: impl Into<String>) -> Interrupt {
    Interrupt::Error { line: token.line, message: message.into() }
}

fn numbers(operator: &Token, l: &LiteralType, r: &LiteralType) -> Result<(f64, f64), Interrupt> {
    match (l, r) {
        (LiteralType::Number(a), LiteralType::Number(b)) => Ok((*a, *b)),
        _ => Err(error(operator, format!("operands of '{}' must be numbers", operator.lexeme))),
    }
}

impl expr::Visitor<LiteralType, Interrupt> for Interpreter {
    fn visit_expr(&mut self, expr: &Expr) -> Result<LiteralType, Interrupt> {
        match expr {
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Binary { left, right, operator } => {
                let l = self.evaluate(left)?;
                let r = self.evaluate(right)?;
                match operator.lexeme.as_str() {
                    "+" => match (&l, &r) {
                        (LiteralType::Str(a), LiteralType::Str(b)) => Ok(LiteralType::Str(format!("{a}{b}"))),
                        _ => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Number(a + b)),
                    },
                    "-" => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Number(a - b)),
                    "*" => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Number(a * b)),
                    "/" => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Number(a / b)),
                    "<" => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Bool(a < b)),
                    "<=" => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Bool(a <= b)),
                    ">" => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Bool(a > b)),
                    ">=" => numbers(operator, &l, &r).map(|(a, b)| LiteralType::Bool(a >= b)),
                    "==" => Ok(LiteralType::Bool(l == r)),
                    "!=" => Ok(LiteralType::Bool(l != r)),
                    other => Err(error(operator, format!("unknown binary operator '{other}'"))),
                }
            }
            Expr::Call { paren, .. } => Err(error(paren, "calls are not supported")),
            Expr::Grouping { expression } => self.evaluate(expression),
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Logical { left, operator, right } => {
                let l = self.evaluate(left)?;
                let short_circuit = match operator.lexeme.as_str() {
                    "or" => l.is_truthy(),
                    "and" => !l.is_truthy(),
                    other => return Err(error(operator, format!("unknown logical operator '{other}'"))),
                };
                if short_circuit { Ok(l) } else { self.evaluate(right) }
            }
            Expr::Unary { operator, right } => {
                let r = self.evaluate(right)?;
                match (operator.lexeme.as_str(), &r) {
                    ("-", LiteralType::Number(n)) => Ok(LiteralType::Number(-n)),
                    ("!", _) => Ok(LiteralType::Bool(!r.is_truthy())),
                    (other, _) => Err(error(operator, format!("bad operand for unary '{other}'"))),
                }
            }
            Expr::Variable { name } => self.lookup(name),
        }
    }
}

impl stmt::Visitor<(), Interrupt> for Interpreter {
    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), Interrupt> {
        match stmt {
            Stmt::Block { statements } => {
                self.scopes.push(HashMap::new());
                let result = self.run(statements);
                self.scopes.pop();
                result
            }
            Stmt::Break { .. } => Err(Interrupt::Break),
            Stmt::Expression { expression } => self.evaluate(expression).map(|_| ()),
            Stmt::Function { name, .. } => Err(error(name, "functions are not supported")),
            Stmt::If { condition, then_branch, else_branch } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)
                } else {
                    Ok(())
                }
            }
            Stmt::Print { expression } => {
                let value = self.evaluate(expression)?;
                self.output.push(value.to_string());
                Ok(())
            }
            Stmt::Return { keyword, .. } => Err(error(keyword, "return outside of a function")),
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(init) => self.evaluate(init)?,
                    None => LiteralType::Nil,
                };
                self.define(name, value);
                Ok(())
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    match self.execute(body) {
                        Err(Interrupt::Break) => break,
                        other => other?,
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(s: &str) -> Token {
        Token::new(s)
    }

    fn num(n: f64) -> Expr {
        Expr::Literal { value: LiteralType::Number(n) }
    }

    fn var(name: &str) -> Expr {
        Expr::Variable { name: tok(name) }
    }

    fn binary(l: Expr, op: &str, r: Expr) -> Expr {
        Expr::Binary { left: Box::new(l), right: Box::new(r), operator: tok(op) }
    }

    fn print(e: Expr) -> Stmt {
        Stmt::Print { expression: e }
    }

    #[test]
    fn counts_in_a_while_loop() {
        // var i = 0; while (i < 3) { print i; i = i + 1; }
        let program = vec![
            Stmt::Var { name: tok("i"), initializer: Some(num(0.0)) },
            Stmt::While {
                condition: binary(var("i"), "<", num(3.0)),
                body: Box::new(Stmt::Block {
                    statements: vec![
                        print(var("i")),
                        Stmt::Expression {
                            expression: Expr::Assign {
                                name: tok("i"),
                                value: Box::new(binary(var("i"), "+", num(1.0))),
                            },
                        },
                    ],
                }),
            },
        ];
        let mut interp = Interpreter::default();
        interp.run(&program).unwrap();
        assert_eq!(interp.output, vec!["0", "1", "2"]);
    }

    #[test]
    fn break_leaves_the_loop() {
        let program = vec![
            Stmt::While {
                condition: Expr::Literal { value: LiteralType::Bool(true) },
                body: Box::new(Stmt::Block {
                    statements: vec![print(num(1.0)), Stmt::Break { keyword: tok("break") }],
                }),
            },
            print(Expr::Literal { value: LiteralType::Str("done".into()) }),
        ];
        let mut interp = Interpreter::default();
        interp.run(&program).unwrap();
        assert_eq!(interp.output, vec!["1", "done"]);
    }

    #[test]
    fn if_else_and_logical_short_circuit() {
        let program = vec![Stmt::If {
            condition: Expr::Logical {
                left: Box::new(Expr::Literal { value: LiteralType::Nil }),
                operator: tok("or"),
                right: Box::new(Expr::Literal { value: LiteralType::Bool(false) }),
            },
            then_branch: Box::new(print(num(1.0))),
            else_branch: Some(Box::new(print(num(2.0)))),
        }];
        let mut interp = Interpreter::default();
        interp.run(&program).unwrap();
        assert_eq!(interp.output, vec!["2"]);
    }

    #[test]
    fn block_scopes_shadow_and_unwind() {
        let program = vec![
            Stmt::Var { name: tok("a"), initializer: Some(num(1.0)) },
            Stmt::Block {
                statements: vec![
                    Stmt::Var { name: tok("a"), initializer: Some(num(2.0)) },
                    print(var("a")),
                ],
            },
            print(var("a")),
        ];
        let mut interp = Interpreter::default();
        interp.run(&program).unwrap();
        assert_eq!(interp.output, vec!["2", "1"]);
    }

    #[test]
    fn undefined_variable_is_an_error() {
        let mut interp = Interpreter::default();
        let err = interp.run(&[print(var("nope"))]).unwrap_err();
        assert_eq!(err, Interrupt::Error { line: 1, message: "undefined variable 'nope'".into() });
    }
}
