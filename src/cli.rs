//! CLI: infer → (interface | schema), or render a saved schema.
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::codegen::{Codegen, ColorChoice, RenderOptions, TerminalEnv};
use crate::error::Error;
use crate::inference::{ClassifyOptions, Inference};
use crate::ir::Schema;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer TypeScript-style interfaces from JSON/NDJSON samples
#[derive(Parser, Debug)]
#[command(name = "json-iface", version)]
pub struct CommandLineInterface {
    /// more logging (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print an `interface I<Title> { ... }` declaration
    Interface(InterfaceOut),
    /// infer and print the finalized schema as JSON
    Schema(JsonSchemaOut),
    /// render a schema previously written by `schema` as an interface
    Render(RenderOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is a sample
    #[arg(long)]
    jq_expr: Option<String>,

    /// treat RFC 3339 / YYYY-MM-DD strings as Date
    #[arg(long, default_value_t = false)]
    iso_dates: bool,

    /// do not treat {"$date": ...} objects as Date
    #[arg(long, default_value_t = false)]
    no_extended_json: bool,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct InterfaceSettings {
    /// interface title, emitted as `I<Title>` in PascalCase
    #[arg(long, default_value = "params")]
    title: String,

    /// spaces per nesting level
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// highlight keys and types
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(clap::Parser, Debug)]
struct InterfaceOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    interface: InterfaceSettings,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct JsonSchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// single-line JSON
    #[arg(long)]
    compact: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    /// schema .json file written by the `schema` command
    #[arg(long)]
    schema: PathBuf,

    #[command(flatten)]
    interface: InterfaceSettings,

    /// output .ts file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

/// Where one input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => f.write_str("<stdin>"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Source {
    fn read(&self) -> crate::Result<String> {
        match self {
            Source::Stdin => {
                let mut text = String::new();
                std::io::stdin()
                    .read_to_string(&mut text)
                    .map_err(|source| Error::Io { path: PathBuf::from("-"), source })?;
                Ok(text)
            }
            Source::File(path) => std::fs::read_to_string(path)
                .map_err(|source| Error::Io { path: path.clone(), source }),
        }
    }
}

impl InputSettings {
    fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            extended_json: !self.no_extended_json,
            iso_dates: self.iso_dates,
        }
    }

    /// Samples from every input, in input order. Files are parsed in
    /// parallel.
    fn load_documents(&self) -> crate::Result<Vec<Value>> {
        let sources = resolve_file_path_patterns(&self.input)?;
        info!(inputs = sources.len(), "resolved input files");
        let per_source = sources
            .par_iter()
            .map(|source| self.load_source(source))
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(per_source.into_iter().flatten().collect())
    }

    fn load_source(&self, source: &Source) -> crate::Result<Vec<Value>> {
        let origin = source.to_string();
        let text = source.read()?;
        let values = crate::path_de::values_from_str(&text, &origin, self.ndjson)?;
        debug!(source = %origin, values = values.len(), "parsed input");

        let mut out = Vec::with_capacity(values.len());
        for value in values {
            let value = self.select(value, &origin)?;
            match self.jq_expr.as_deref() {
                None => out.push(value),
                Some(jq_expr) => {
                    let docs = crate::jq_exec::select_documents(jq_expr, &value).map_err(|error| {
                        Error::Jq { origin: origin.clone(), message: format!("{error:#}") }
                    })?;
                    out.extend(docs);
                }
            }
        }
        Ok(out)
    }

    fn select(&self, value: Value, origin: &str) -> crate::Result<Value> {
        let Some(pointer) = self.json_pointer.as_deref() else {
            return Ok(value);
        };
        value.pointer(pointer).cloned().ok_or_else(|| Error::PointerNotFound {
            pointer: pointer.to_owned(),
            origin: origin.to_owned(),
        })
    }

    fn infer(&self) -> Result<Schema> {
        let mut inf = Inference::with_options(self.classify_options());
        for value in self.load_documents()? {
            inf.observe_value(&value);
        }
        info!(documents = inf.documents(), "observed samples");
        Ok(inf.solve())
    }
}

impl InterfaceSettings {
    /// Resolve the color choice. When on, `colored` must not second-guess it.
    fn render_options(&self, to_file: bool) -> RenderOptions {
        let mut env = TerminalEnv::detect();
        if to_file {
            env.is_terminal = false;
        }
        let color = self.color.resolve(&env);
        if color {
            colored::control::set_override(true);
        }
        RenderOptions { indent: self.indent, color }
    }

    fn render(&self, schema: &Schema, to_file: bool) -> String {
        let mut cg = Codegen::new(self.render_options(to_file));
        cg.emit(schema, &self.title);
        cg.into_string()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Interface(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let schema = target.input_settings.infer()?;
                let src = target.interface.render(&schema, target.out.is_some());
                write_output(target.out.as_deref(), &src)
            }
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let schema = target.input_settings.infer()?;
                let mut src = if target.compact {
                    serde_json::to_string(&schema)?
                } else {
                    serde_json::to_string_pretty(&schema)?
                };
                src.push('\n');
                write_output(target.out.as_deref(), &src)
            }
            Command::Render(target) => {
                let src = std::fs::read_to_string(&target.schema)
                    .map_err(|source| Error::Io { path: target.schema.clone(), source })?;
                let schema = Schema::from_json_str(&src)
                    .with_context(|| format!("loading {}", target.schema.display()))?;
                let schema = crate::lower::sorted(&schema);
                let out = target.interface.render(&schema, target.out.is_some());
                write_output(target.out.as_deref(), &out)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    let Some(out) = out else {
        print!("{text}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(out, text).with_context(|| format!("writing {}", out.display()))?;
    info!(path = %out.display(), "wrote output");
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> crate::Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<Source>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            if out.contains(&Source::Stdin) {
                return Err(Error::RepeatedStdin);
            }
            out.push(Source::Stdin);
        } else if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(Source::File(entry?));
            }
            if out.len() == before {
                return Err(Error::NoMatches(pattern.to_owned()));
            }
        } else {
            out.push(Source::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}
