//! Exercises the generated Lox AST: if this crate builds, the emitted enums
//! and visitor traits are valid Rust; the tests implement those traits.
pub mod common;
pub mod printer;
pub mod eval;

pub mod expr {
    include!(concat!(env!("OUT_DIR"), "/expr.rs"));
}

pub mod stmt {
    include!(concat!(env!("OUT_DIR"), "/stmt.rs"));
}
