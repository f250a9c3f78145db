//! Built-in schemas for the Lox tree-walking interpreter.
//!
//! `Expr` and `Stmt` refer to each other (`Stmt::Expression` holds an `Expr`),
//! plus `Token` and `LiteralType` from the interpreter's lexer. The generated
//! files need those names in scope; see [`lox_imports`].

pub struct Preset {
    pub base: &'static str,
    pub variants: &'static [&'static str],
    /// File stem the driver writes this schema to.
    pub file_stem: &'static str,
}

pub const LOX_EXPR: Preset = Preset {
    base: "Expr",
    file_stem: "expr",
    variants: &[
        "Assign: name Token, value Box<Expr>",
        "Binary: left Box<Expr>, right Box<Expr>, operator Token",
        "Call: callee Box<Expr>, paren Token, arguments Vec<Expr>",
        "Grouping: expression Box<Expr>",
        "Literal: value LiteralType",
        "Logical: left Box<Expr>, operator Token, right Box<Expr>",
        "Unary: operator Token, right Box<Expr>",
        "Variable: name Token",
    ],
};

pub const LOX_STMT: Preset = Preset {
    base: "Stmt",
    file_stem: "stmt",
    variants: &[
        "Block: statements Vec<Stmt>",
        "Break: keyword Token",
        "Expression: expression Expr",
        "Function: name Token, parameters Vec<Token>, body Vec<Stmt>",
        "If: condition Expr, then_branch Box<Stmt>, else_branch Option<Box<Stmt>>",
        "Print: expression Expr",
        "Return: keyword Token, return_value Option<Expr>",
        "Var: name Token, initializer Option<Expr>",
        "While: condition Expr, body Box<Stmt>",
    ],
};

pub fn lox_expr() -> &'static Preset {
    &LOX_EXPR
}

pub fn lox_stmt() -> &'static Preset {
    &LOX_STMT
}

/// Both Lox schemas, `Expr` first.
pub fn lox() -> [&'static Preset; 2] {
    [&LOX_EXPR, &LOX_STMT]
}

/// Look up a preset family by name.
pub fn by_name(name: &str) -> Option<Vec<&'static Preset>> {
    match name {
        "lox" => Some(lox().to_vec()),
        "lox-expr" => Some(vec![&LOX_EXPR]),
        "lox-stmt" => Some(vec![&LOX_STMT]),
        _ => None,
    }
}

/// `use` paths a generated Lox file needs, given the crate module layout
/// `common` (lexer types), `expr` and `stmt`.
pub fn lox_imports(preset: &Preset) -> Vec<String> {
    match preset.base {
        "Stmt" => vec!["crate::common::Token".to_string(), "crate::expr::Expr".to_string()],
        _ => vec!["crate::common::{LiteralType, Token}".to_string()],
    }
}

impl Preset {
    pub fn compile(&self, options: &crate::EmitOptions) -> Result<String, crate::SchemaError> {
        crate::compile_with(options, self.base, self.variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_compiles() {
        for preset in lox() {
            let src = preset.compile(&crate::EmitOptions::default()).unwrap();
            assert!(src.starts_with(&format!("pub enum {} {{", preset.base)));
        }
    }

    #[test]
    fn stmt_refers_to_expr() {
        let src = LOX_STMT.compile(&crate::EmitOptions::default()).unwrap();
        assert!(src.contains("        initializer: Option<Expr>,\n"));
        assert!(src.contains("fn visit_stmt(&mut self, stmt: &Stmt) -> Result<R, E>;"));
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("lox").map(|p| p.len()), Some(2));
        assert_eq!(by_name("lox-stmt").unwrap()[0].base, "Stmt");
        assert!(by_name("scheme").is_none());
    }

    #[test]
    fn stmt_imports_expr() {
        assert_eq!(lox_imports(lox_expr()), vec!["crate::common::{LiteralType, Token}"]);
        assert_eq!(lox_imports(lox_stmt()), vec!["crate::common::Token", "crate::expr::Expr"]);
    }
}
