//! TypeScript-style interface text from a finalized schema.
//!
//! Color is decided by the caller and passed in through `RenderOptions`;
//! nothing in here looks at the terminal or the environment.
use std::io::IsTerminal;

use colored::Colorize;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::ir::{quote_literal, union_text, Descriptor, Schema};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier regex"));

static TITLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-_/\s]+(.)?").expect("title separator regex"));

// ------------------------------- Options ---------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces added per nesting level.
    pub indent: usize,
    /// Highlight keys and type text with ANSI colors.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { indent: 2, color: false }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// What `ColorChoice::Auto` looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminalEnv {
    /// `FORCE_COLOR=1`
    pub force_color: bool,
    /// `NO_COLOR` set and non-empty
    pub no_color: bool,
    pub is_terminal: bool,
}

impl TerminalEnv {
    /// Snapshot of the current process: environment and stdout.
    pub fn detect() -> Self {
        Self {
            force_color: std::env::var("FORCE_COLOR").is_ok_and(|v| v == "1"),
            no_color: std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            is_terminal: std::io::stdout().is_terminal(),
        }
    }
}

impl ColorChoice {
    pub fn resolve(self, env: &TerminalEnv) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto if env.force_color => true,
            ColorChoice::Auto if env.no_color => false,
            ColorChoice::Auto => env.is_terminal,
        }
    }
}

// ------------------------------- Emission --------------------------------- //

/// The `{ ... }` block for `schema`, without a declaration around it.
pub fn render_body(schema: &Schema, opts: &RenderOptions) -> String {
    let mut out = String::new();
    write_block(&mut out, schema, 1, opts);
    out
}

/// `I` + PascalCase title: `user-profile` → `IUserProfile`.
pub fn interface_name(title: &str) -> String {
    let joined = TITLE_SEPARATOR.replace_all(title.trim(), |caps: &Captures| {
        caps.get(1).map_or_else(String::new, |m| m.as_str().to_uppercase())
    });
    let mut chars = joined.chars();
    let pascal: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("I{pascal}")
}

pub struct Codegen {
    opts: RenderOptions,
    out: String,
}

impl Codegen {
    pub fn new(opts: RenderOptions) -> Self {
        Self { opts, out: String::new() }
    }

    /// Append `interface I<Title> { ... }`.
    pub fn emit(&mut self, schema: &Schema, title: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let keyword = paint_key("interface", &self.opts);
        let name = paint_type(&interface_name(title), &self.opts);
        self.out.push_str(&format!("{keyword} {name} "));
        write_block(&mut self.out, schema, 1, &self.opts);
        self.out.push('\n');
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

fn write_block(out: &mut String, schema: &Schema, depth: usize, opts: &RenderOptions) {
    if schema.is_empty() {
        out.push_str("{}");
        return;
    }
    let pad = " ".repeat(opts.indent * depth);
    out.push_str("{\n");
    for (key, ty) in schema.iter() {
        out.push_str(&pad);
        out.push_str(&paint_key(&render_key(key), opts));
        out.push_str(": ");
        write_type(out, ty, depth, opts);
        out.push_str(";\n");
    }
    out.push_str(&" ".repeat(opts.indent * (depth - 1)));
    out.push('}');
}

fn write_type(out: &mut String, ty: &Descriptor, depth: usize, opts: &RenderOptions) {
    match ty {
        Descriptor::Primitive(tag) => out.push_str(&paint_type(tag.as_str(), opts)),
        Descriptor::Union(values) => out.push_str(&paint_type(&union_text(values), opts)),
        Descriptor::Pending(values) => write_type(out, &values.resolve(), depth, opts),
        Descriptor::Nested(schema) => write_block(out, schema, depth + 1, opts),
        Descriptor::ArrayOf(elem) => {
            let parens = matches!(elem.as_ref(), Descriptor::Union(values) if values.len() > 1);
            if parens {
                out.push('(');
            }
            write_type(out, elem, depth, opts);
            if parens {
                out.push(')');
            }
            out.push_str("[]");
        }
    }
}

fn render_key(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        key.to_owned()
    } else {
        quote_literal(key)
    }
}

fn paint_key(text: &str, opts: &RenderOptions) -> String {
    if opts.color {
        text.bright_cyan().to_string()
    } else {
        text.to_owned()
    }
}

fn paint_type(text: &str, opts: &RenderOptions) -> String {
    if opts.color {
        text.bright_green().to_string()
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::TypeTag;
    use pretty_assertions::assert_eq;

    fn prim(tag: TypeTag) -> Descriptor {
        Descriptor::Primitive(tag)
    }

    fn sample() -> Schema {
        let mut geo = Schema::new();
        geo.insert("lat", prim(TypeTag::Number));
        geo.insert("lng", prim(TypeTag::Number));

        let mut line = Schema::new();
        line.insert("qty", prim(TypeTag::Number));
        line.insert("sku", prim(TypeTag::String));

        let mut schema = Schema::new();
        schema.insert("_id", Descriptor::object_id());
        schema.insert("geo", Descriptor::Nested(geo));
        schema.insert("lines", Descriptor::ArrayOf(Box::new(Descriptor::Nested(line))));
        schema.insert("status", Descriptor::Union(vec!["open".into(), "closed".into()]));
        schema.insert("tags", Descriptor::ArrayOf(Box::new(prim(TypeTag::String))));
        schema
    }

    #[test]
    fn renders_nested_blocks_with_two_space_steps() {
        let text = render_body(&sample(), &RenderOptions::default());
        assert_eq!(
            text,
            "{
  _id: ObjectId(string);
  geo: {
    lat: number;
    lng: number;
  };
  lines: {
    qty: number;
    sku: string;
  }[];
  status: 'open' | 'closed';
  tags: string[];
}"
        );
    }

    #[test]
    fn indent_step_is_configurable() {
        let mut inner = Schema::new();
        inner.insert("x", prim(TypeTag::Any));
        let mut schema = Schema::new();
        schema.insert("a", Descriptor::Nested(inner));
        let text = render_body(&schema, &RenderOptions { indent: 4, color: false });
        assert_eq!(text, "{\n    a: {\n        x: any;\n    };\n}");
    }

    #[test]
    fn empty_objects_and_odd_keys() {
        let mut schema = Schema::new();
        schema.insert("first-name", prim(TypeTag::String));
        schema.insert("$ref", prim(TypeTag::String));
        schema.insert("meta", Descriptor::Nested(Schema::new()));
        schema.insert(
            "modes",
            Descriptor::ArrayOf(Box::new(Descriptor::Union(vec!["r".into(), "w".into()]))),
        );
        let text = render_body(&schema, &RenderOptions::default());
        assert_eq!(
            text,
            "{\n  'first-name': string;\n  $ref: string;\n  meta: {};\n  modes: ('r' | 'w')[];\n}"
        );
        assert_eq!(render_body(&Schema::new(), &RenderOptions::default()), "{}");
    }

    #[test]
    fn emit_wraps_in_interface_declaration() {
        let mut schema = Schema::new();
        schema.insert("id", prim(TypeTag::Number));
        let mut cg = Codegen::new(RenderOptions::default());
        cg.emit(&schema, "order line");
        assert_eq!(cg.into_string(), "interface IOrderLine {\n  id: number;\n}\n");
    }

    #[test]
    fn interface_names_are_pascal_case() {
        assert_eq!(interface_name("params"), "IParams");
        assert_eq!(interface_name("user-profile"), "IUserProfile");
        assert_eq!(interface_name("api/v2_response "), "IApiV2Response");
        assert_eq!(interface_name("alreadyCamel"), "IAlreadyCamel");
    }

    #[test]
    fn color_wraps_keys_and_types() {
        colored::control::set_override(true);
        let mut schema = Schema::new();
        schema.insert("id", prim(TypeTag::Number));
        let text = render_body(&schema, &RenderOptions { indent: 2, color: true });
        assert!(text.contains("\u{1b}[96mid\u{1b}[0m"), "{text:?}");
        assert!(text.contains("\u{1b}[92mnumber\u{1b}[0m"), "{text:?}");
    }

    #[test]
    fn color_choice_resolution() {
        let tty = TerminalEnv { is_terminal: true, ..TerminalEnv::default() };
        let pipe = TerminalEnv::default();
        assert!(ColorChoice::Always.resolve(&pipe));
        assert!(!ColorChoice::Never.resolve(&tty));
        assert!(ColorChoice::Auto.resolve(&tty));
        assert!(!ColorChoice::Auto.resolve(&pipe));
        assert!(ColorChoice::Auto.resolve(&TerminalEnv { force_color: true, ..pipe }));
        assert!(!ColorChoice::Auto.resolve(&TerminalEnv { no_color: true, ..tty }));
        assert!(ColorChoice::Auto.resolve(&TerminalEnv { force_color: true, no_color: true, is_terminal: false }));
    }
}
