//! Schema compiler for tree-walking interpreter ASTs.
//!
//! Turns lines like `Binary: left Box<Expr>, right Box<Expr>, operator Token`
//! into a Rust `enum` with one struct-like variant per line, followed by a
//! single-method `Visitor<R, E>` trait for that enum.
//!
//! Several base categories (say `Expr` and `Stmt`) may name each other's enums
//! in field types. Type text is never resolved, so compile them in any order;
//! making the names line up is the caller's job.
pub mod ir;
pub mod error;
pub mod parse;
pub mod codegen;
pub mod presets;
pub mod manifest;
pub mod path_de;
pub mod cli;

pub use codegen::{Codegen, EmitOptions};
pub use error::{Malformation, SchemaError};
pub use ir::{Field, Schema, Variant};

/// Compile one schema into Rust source with default emission options.
pub fn compile<S: AsRef<str>>(base_name: &str, schema_lines: &[S]) -> Result<String, SchemaError> {
    compile_with(&EmitOptions::default(), base_name, schema_lines)
}

/// Compile one schema into Rust source. Pure; each call is independent.
pub fn compile_with<S: AsRef<str>>(
    options: &EmitOptions,
    base_name: &str,
    schema_lines: &[S],
) -> Result<String, SchemaError> {
    let schema = parse::parse_schema(base_name, schema_lines)?;
    Ok(emit(options, &schema))
}

/// Emit an already-parsed schema.
pub fn emit(options: &EmitOptions, schema: &Schema) -> String {
    let mut cg = Codegen::new().with_options(options.clone());
    cg.emit(schema);
    cg.into_string()
}

// ------------------------------- Tests ------------------------------------ //
