//! Generate the Lox `Expr`/`Stmt` enums through `astgen` so that this crate
//! only builds if the emitted source is valid Rust.
use std::path::PathBuf;

use astgen::EmitOptions;
use astgen::presets;

fn main() {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    for preset in presets::lox() {
        let options = EmitOptions {
            header: Some("generated by dev-test-runner/build.rs".to_string()),
            imports: presets::lox_imports(preset),
            derives: vec!["Debug".to_string(), "Clone".to_string(), "PartialEq".to_string()],
        };
        let source = preset
            .compile(&options)
            .unwrap_or_else(|error| panic!("preset `{}` failed to compile: {error}", preset.base));
        let path = out_dir.join(format!("{}.rs", preset.file_stem));
        std::fs::write(&path, source)
            .unwrap_or_else(|error| panic!("failed to write {}: {error}", path.display()));
    }
    println!("cargo:rerun-if-changed=build.rs");
}
