//! JSON manifest describing which schemas to compile and where they go.
//!
//! ```json
//! {
//!   "schemas": [
//!     {
//!       "base": "Expr",
//!       "variants": ["Literal: value LiteralType"],
//!       "output": "src/expr.rs",
//!       "imports": ["crate::common::{LiteralType, Token}"],
//!       "derives": ["Debug", "Clone"],
//!       "header": "generated by astgen; do not edit"
//!     }
//!   ]
//! }
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codegen::EmitOptions;
use crate::path_de::JsonPathError;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid manifest {}: {source}", path.display())]
    Json { path: PathBuf, source: JsonPathError },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub schemas: Vec<SchemaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaEntry {
    pub base: String,
    pub variants: Vec<String>,
    /// Target file; stdout when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub derives: Vec<String>,
    #[serde(default)]
    pub header: Option<String>,
}

impl SchemaEntry {
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            header: self.header.clone(),
            imports: self.imports.clone(),
            derives: self.derives.clone(),
        }
    }

    /// Where this schema is written. Relative `output` paths land under
    /// `out_dir` when given, else next to the manifest at `manifest`.
    pub fn output_path(&self, manifest: &Path, out_dir: Option<&Path>) -> Option<PathBuf> {
        let raw = self.output.as_ref()?;
        let base = match out_dir {
            Some(dir) => dir,
            None => manifest.parent().unwrap_or_else(|| Path::new("")),
        };
        Some(base.join(raw))
    }
}

impl Manifest {
    pub fn from_json(src: &str, origin: &Path) -> Result<Self, ManifestError> {
        crate::path_de::from_str_with_path::<Manifest>(src)
            .map_err(|source| ManifestError::Json { path: origin.to_path_buf(), source })
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let src = std::fs::read_to_string(path)
            .map_err(|source| ManifestError::Read { path: path.to_path_buf(), source })?;
        Self::from_json(&src, path)
    }
}
