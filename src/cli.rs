//! Minimal CLI: manifest | preset → Rust enum + visitor
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::codegen::EmitOptions;
use crate::ir::Schema;
use crate::manifest::{Manifest, SchemaEntry};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile AST schema lines into a Rust enum plus a `Visitor<R, E>` trait
#[derive(Parser, Debug)]
#[command(name = "astgen", version)]
pub struct CommandLineInterface {
    /// the amount of logging to perform
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warning)]
    pub log: LogLevel,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile every schema in one or more manifests
    Rust(RustOut),
    /// parse manifests and print the schema IR as JSON
    Schema(SchemaOut),
    /// emit one of the built-in schema families (e.g. `lox`)
    Preset(PresetOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more manifest files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct RustOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// prefix for each schema's `output` path
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// write nothing; fail if any output file is out of date
    #[arg(long)]
    check: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct PresetOut {
    /// preset family: `lox`, `lox-expr` or `lox-stmt`
    name: String,

    /// directory for `<stem>.rs` files (stdout if omitted)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// derive attribute for every enum; repeatable
    #[arg(long = "derive")]
    derives: Vec<String>,

    /// `use` path; repeatable. Replaces the preset's default imports
    #[arg(long = "import")]
    imports: Vec<String>,

    /// emit no `use` lines and no header
    #[arg(long)]
    bare: bool,

    /// write nothing; fail if any output file is out of date
    #[arg(long)]
    check: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warning,
    Info,
    Debug,
    Trace,
}

/// What a successful run produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// `--check` found files whose contents differ from a fresh compile.
    Stale(Vec<PathBuf>),
}

/// One compiled schema waiting to be written.
struct Unit {
    base: String,
    output: Option<PathBuf>,
    source: String,
}

const GENERATED_HEADER: &str = "generated by astgen; do not edit";

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warning => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl InputSettings {
    fn load_manifests(&self) -> Result<Vec<(PathBuf, Manifest)>> {
        let paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut manifests = Vec::with_capacity(paths.len());
        for path in paths {
            log::debug!("loading manifest {}", path.display());
            let manifest = Manifest::load(&path)?;
            manifests.push((path, manifest));
        }
        Ok(manifests)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<Outcome> {
        match &self.cmd {
            Command::Rust(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(Outcome::Done);
                }
                let manifests = target.input_settings.load_manifests()?;
                let entries = manifests
                    .iter()
                    .flat_map(|(path, m)| m.schemas.iter().map(move |e| (path.as_path(), e)))
                    .collect::<Vec<_>>();
                let units = entries
                    .par_iter()
                    .map(|(path, entry)| compile_entry(path, entry, target.out_dir.as_deref()))
                    .collect::<Result<Vec<_>>>()?;
                deliver(units, target.check)
            }
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(Outcome::Done);
                }
                let manifests = target.input_settings.load_manifests()?;
                let mut schemas = IndexMap::<String, Schema>::new();
                for (path, manifest) in &manifests {
                    for entry in &manifest.schemas {
                        let schema = crate::parse::parse_schema(&entry.base, &entry.variants)
                            .with_context(|| {
                                format!("schema `{}` in {}", entry.base, path.display())
                            })?;
                        if schemas.insert(schema.base.clone(), schema).is_some() {
                            log::warn!("schema `{}` defined more than once; keeping the last", entry.base);
                        }
                    }
                }
                let schema_src = serde_json::to_string_pretty(&schemas)?;
                match target.out.as_ref() {
                    Some(out) => write_file(out, &schema_src)?,
                    None => println!("{schema_src}"),
                }
                Ok(Outcome::Done)
            }
            Command::Preset(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(Outcome::Done);
                }
                let Some(presets) = crate::presets::by_name(&target.name) else {
                    bail!("unknown preset `{}` (expected `lox`, `lox-expr` or `lox-stmt`)", target.name);
                };
                let units = presets
                    .par_iter()
                    .map(|preset| -> Result<Unit> {
                        let options = target.emit_options(preset);
                        let source = preset
                            .compile(&options)
                            .with_context(|| format!("preset schema `{}`", preset.base))?;
                        let output = target
                            .out_dir
                            .as_ref()
                            .map(|dir| dir.join(format!("{}.rs", preset.file_stem)));
                        Ok(Unit { base: preset.base.to_string(), output, source })
                    })
                    .collect::<Result<Vec<_>>>()?;
                deliver(units, target.check)
            }
        }
    }
}

impl PresetOut {
    fn emit_options(&self, preset: &crate::presets::Preset) -> EmitOptions {
        if self.bare {
            return EmitOptions { derives: self.derives.clone(), ..EmitOptions::default() };
        }
        let imports = if self.imports.is_empty() {
            crate::presets::lox_imports(preset)
        } else {
            self.imports.clone()
        };
        EmitOptions {
            header: Some(GENERATED_HEADER.to_string()),
            imports,
            derives: self.derives.clone(),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn compile_entry(manifest: &Path, entry: &SchemaEntry, out_dir: Option<&Path>) -> Result<Unit> {
    log::info!("compiling `{}` from {}", entry.base, manifest.display());
    let source = crate::compile_with(&entry.emit_options(), &entry.base, &entry.variants)
        .with_context(|| format!("schema `{}` in {}", entry.base, manifest.display()))?;
    let output = entry.output_path(manifest, out_dir);
    Ok(Unit { base: entry.base.clone(), output, source })
}

/// Write (or with `check`, compare) every unit, in input order.
fn deliver(units: Vec<Unit>, check: bool) -> Result<Outcome> {
    deliver_to(units, check, &mut std::io::stdout().lock())
}

/// Units without an output file go to `stdout`, byte for byte.
fn deliver_to(units: Vec<Unit>, check: bool, stdout: &mut impl Write) -> Result<Outcome> {
    let mut stale = Vec::new();
    for unit in units {
        let Some(output) = unit.output else {
            if check {
                log::warn!("schema `{}` has no output file; nothing to check", unit.base);
            } else {
                stdout.write_all(unit.source.as_bytes())?;
            }
            continue;
        };
        if check {
            let current = read_existing(&output)?;
            if current.as_deref() != Some(unit.source.as_str()) {
                log::warn!("{} is out of date", output.display());
                stale.push(output);
            }
        } else {
            write_file(&output, &unit.source)?;
            log::info!("wrote `{}` to {}", unit.base, output.display());
        }
    }
    if stale.is_empty() { Ok(Outcome::Done) } else { Ok(Outcome::Stale(stale)) }
}

/// Current contents of a generated file; `None` if it does not exist yet.
fn read_existing(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error).with_context(|| format!("failed to read {}", path.display())),
    }
}

fn write_file(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
