// Strongly-typed schema IR for codegen. Built by `parse`, consumed by `codegen`.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub base: String,            // enum name; lowercased for the visitor method
    pub variants: Vec<Variant>,  // input order, never sorted or deduplicated
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    pub name: String,
    pub fields: Vec<Field>,      // declared order
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub ty: String,              // opaque type text, trimmed, copied verbatim
}

impl Schema {
    /// Lowercased base name, used for `visit_<name>` and its parameter.
    pub fn method_stem(&self) -> String {
        self.base.to_lowercase()
    }
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }
}
