//! Rust source emitter: one `pub enum` per schema plus its `Visitor<R, E>` trait.
//!
//! Output is a pure function of the schema and options. Nothing is sorted,
//! deduplicated or validated; type text goes out exactly as it came in.

use crate::ir::{Field, Schema, Variant};

const INDENT: &str = "    ";

/// Keywords that need `r#` when used as the visitor parameter name.
const RAW_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "try", "type",
    "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be raw identifiers at all.
const NON_RAW_KEYWORDS: &[&str] = &["self", "super", "crate", "_"];

/// Extras written around the enum. Defaults produce the bare enum + trait.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// `// ...` lines at the very top.
    pub header: Option<String>,
    /// `use <path>;` lines before the enum, in order.
    pub imports: Vec<String>,
    /// Trait names for a `#[derive(...)]` on the enum.
    pub derives: Vec<String>,
}

pub struct Codegen {
    out: String,
    options: EmitOptions,
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::new(), options: EmitOptions::default() }
    }

    pub fn with_options(mut self, options: EmitOptions) -> Self {
        self.options = options;
        self
    }

    pub fn emit(&mut self, schema: &Schema) {
        self.emit_preamble();
        self.emit_enum(schema);
        self.out.push('\n');
        self.emit_visitor(schema);
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn emit_preamble(&mut self) {
        if let Some(header) = &self.options.header {
            for line in header.lines() {
                if line.is_empty() {
                    self.out.push_str("//\n");
                } else {
                    self.out.push_str(&format!("// {line}\n"));
                }
            }
            self.out.push('\n');
        }
        if !self.options.imports.is_empty() {
            for path in &self.options.imports {
                self.out.push_str(&format!("use {};\n", path.trim()));
            }
            self.out.push('\n');
        }
        if !self.options.derives.is_empty() {
            let derives = self.options.derives.iter().map(|d| d.trim()).collect::<Vec<_>>();
            self.out.push_str(&format!("#[derive({})]\n", derives.join(", ")));
        }
    }

    fn emit_enum(&mut self, schema: &Schema) {
        self.out.push_str(&format!("pub enum {} {{\n", schema.base));
        for variant in &schema.variants {
            self.emit_variant(variant);
        }
        self.out.push_str("}\n");
    }

    fn emit_variant(&mut self, variant: &Variant) {
        self.out.push_str(&format!("{INDENT}{} {{\n", variant.name));
        for Field { name, ty } in &variant.fields {
            self.out.push_str(&format!("{INDENT}{INDENT}{name}: {ty},\n"));
        }
        self.out.push_str(&format!("{INDENT}}},\n"));
    }

    fn emit_visitor(&mut self, schema: &Schema) {
        let stem = schema.method_stem();
        let param = param_ident(&stem);
        self.out.push_str("pub trait Visitor<R, E> {\n");
        self.out.push_str(&format!(
            "{INDENT}fn visit_{stem}(&mut self, {param}: &{}) -> Result<R, E>;\n",
            schema.base
        ));
        self.out.push_str("}\n");
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameter name for `visit_<stem>`; escapes keywords.
fn param_ident(stem: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&stem) {
        format!("{stem}_")
    } else if RAW_KEYWORDS.contains(&stem) {
        format!("r#{stem}")
    } else {
        stem.to_string()
    }
}

// ------------------------------- Tests ------------------------------------ //
