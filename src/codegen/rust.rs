//! Rust Emitter
//!
//! Generates a single `mod.rs` exposing one constant, one getter and (unless
//! read-only) one setter per property, on top of the
//! `rustutils::system_properties` crate.
//!
//! Naming:
//! - getter: `camel_to_snake(flat name)`, keyword-escaped
//! - setter: `set_<getter>`
//! - constant: `<GETTER>_PROP`, holding the effective key
//! - enum variants: `snake_to_camel(token)`
//!
//! Distinct property names or enum tokens can collapse to the same Rust name
//! (`testBool` / `test_bool`, `ab` / `Ab`); [`check_names`] rejects those
//! schemas before generation.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{Result, SyspropError};
use crate::names::{camel_to_snake, dotted_to_flat, snake_to_camel, to_upper};
use crate::schema::{Property, ScalarType, Schema, Scope};

use super::{
    render, Artifact, CodeWriter, GenContext, LanguageProfile, OutputSlot, TypeMapping,
    GENERATED_BANNER,
};

/// Options for the Rust target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RustOptions {
    pub scope: Scope,
}

impl Default for RustOptions {
    fn default() -> Self {
        Self {
            scope: Scope::Internal,
        }
    }
}

/// `mod.rs` for one schema
pub fn generate(schema: &Schema, options: &RustOptions) -> Vec<Artifact> {
    let ctx = GenContext::new(schema, options.scope);
    vec![render(&RustModule, &ctx)]
}

// =============================================================================
// Naming and Types
// =============================================================================

const RUST_KEYWORDS: [&str; 51] = [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: [&str; 4] = ["crate", "self", "Self", "super"];

/// Make `name` usable as a Rust item name
pub fn escape_rust_keyword(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Unescaped snake-case accessor name, shared by getter, setter and constant
fn accessor_name(prop: &Property) -> String {
    camel_to_snake(&prop.identifier())
}

fn getter_name(prop: &Property) -> String {
    escape_rust_keyword(&accessor_name(prop))
}

fn setter_name(prop: &Property) -> String {
    format!("set_{}", accessor_name(prop))
}

fn const_name(prop: &Property) -> String {
    format!("{}_PROP", to_upper(&accessor_name(prop)))
}

fn variant_name(token: &str) -> String {
    snake_to_camel(token)
}

/// Reject schemas whose functions or enum variants would clash once converted
/// to Rust names. Every property is checked, whatever the scope tier.
pub fn check_names(schema: &Schema) -> Result<()> {
    let mut items: HashMap<String, &Property> = HashMap::new();

    for prop in &schema.props {
        let mut names = vec![accessor_name(prop)];
        if !prop.is_readonly() {
            names.push(setter_name(prop));
        }

        for item in names {
            if let Some(first) = items.insert(item.clone(), prop) {
                return Err(SyspropError::RustNameCollision {
                    first: first.name.clone(),
                    second: prop.name.clone(),
                    item,
                });
            }
        }

        let mut variants: HashMap<String, &str> = HashMap::new();
        for value in &prop.enum_values {
            let variant = variant_name(value);
            if let Some(first) = variants.insert(variant.clone(), value) {
                return Err(SyspropError::RustVariantCollision {
                    prop: prop.name.clone(),
                    first: first.to_string(),
                    second: value.clone(),
                    variant,
                });
            }
        }
    }

    Ok(())
}

fn scalar_type_name(ty: ScalarType, prop: &Property) -> String {
    match ty {
        ScalarType::Boolean => "bool".to_string(),
        ScalarType::Integer => "i32".to_string(),
        ScalarType::UInt => "u32".to_string(),
        ScalarType::Long => "i64".to_string(),
        ScalarType::ULong => "u64".to_string(),
        ScalarType::Double => "f64".to_string(),
        ScalarType::String => "String".to_string(),
        ScalarType::Enum => prop.enum_type_name(),
    }
}

pub fn type_mapping(prop: &Property) -> TypeMapping {
    let scalar = prop.prop_type.scalar();
    let element = scalar_type_name(scalar, prop);
    let is_list = prop.prop_type.is_list();

    let (type_name, accept_type) = match (scalar, is_list) {
        (ScalarType::String, false) => (element, "&str".to_string()),
        (_, false) => (element.clone(), element),
        (_, true) => (format!("Vec<{}>", element), format!("&[{}]", element)),
    };

    let parser = match (scalar, is_list) {
        (ScalarType::Boolean, false) => "parsers_formatters::parse_bool",
        (ScalarType::Boolean, true) => "parsers_formatters::parse_bool_list",
        (_, false) => "parsers_formatters::parse",
        (_, true) => "parsers_formatters::parse_list",
    };

    let formatter = match (scalar, is_list) {
        (ScalarType::String, false) => None,
        (ScalarType::Boolean, false) if prop.integer_as_bool => {
            Some("parsers_formatters::format_bool_as_int")
        }
        (ScalarType::Boolean, false) => Some("parsers_formatters::format_bool"),
        (ScalarType::Boolean, true) if prop.integer_as_bool => {
            Some("parsers_formatters::format_bool_list_as_int")
        }
        (ScalarType::Boolean, true) => Some("parsers_formatters::format_bool_list"),
        (_, false) => Some("parsers_formatters::format"),
        (_, true) => Some("parsers_formatters::format_list"),
    };

    TypeMapping {
        type_name,
        accept_type,
        parser: parser.to_string(),
        formatter,
    }
}

// =============================================================================
// Module
// =============================================================================

const RUST_IMPORTS: &str = "use std::fmt;
use rustutils::system_properties::{self, error::SysPropError, parsers_formatters};

";

const DEPRECATED: &str = "#[deprecated]\n";

struct RustModule;

impl RustModule {
    /// `match system_properties::read(..) { .. }` turning fetch, parse and
    /// unset into `Result<Option<T>, SysPropError>`
    fn read_block(w: &mut CodeWriter, key_expr: &str, parser: &str) {
        write!(w, "match system_properties::read({}) {{\n", key_expr);
        w.indent();
        w.write("Err(e) => Err(SysPropError::FetchError(e)),\n");
        write!(
            w,
            "Ok(Some(val)) => {}(val.as_str()).map_err(SysPropError::ParseError).map(Some),\n",
            parser
        );
        w.write("Ok(None) => Ok(None),\n");
        w.dedent();
        w.write("}");
    }
}

impl LanguageProfile for RustModule {
    fn slot(&self) -> OutputSlot {
        OutputSlot::RustModule
    }

    fn relative_path(&self, _ctx: &GenContext<'_>) -> PathBuf {
        PathBuf::from("mod.rs")
    }

    fn prologue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter) {
        write!(
            w,
            "//! Autogenerated system property accessors for `{}`.\n",
            dotted_to_flat(&ctx.schema.module, "::")
        );
        w.write("//!\n");
        w.write("//! This is an autogenerated module. The module contains methods for typed access to\n");
        w.write("//! Android system properties.\n\n");
        w.write(GENERATED_BANNER);
        w.write(RUST_IMPORTS);
    }

    fn enum_decl(&self, _ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let enum_type = prop.enum_type_name();

        w.write("#[allow(missing_docs)]\n");
        w.write("#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Hash, Ord)]\n");
        write!(w, "pub enum {} {{\n", enum_type);
        w.indent();
        for value in &prop.enum_values {
            write!(w, "{},\n", variant_name(value));
        }
        w.dedent();
        w.write("}\n\n");

        write!(w, "impl std::str::FromStr for {} {{\n", enum_type);
        w.indent();
        w.write("type Err = String;\n\n");
        w.write("fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {\n");
        w.indent();
        w.write("match s {\n");
        w.indent();
        for value in &prop.enum_values {
            write!(w, "\"{}\" => Ok({}::{}),\n", value, enum_type, variant_name(value));
        }
        write!(w, "_ => Err(format!(\"'{{}}' cannot be parsed for {}\", s)),\n", enum_type);
        w.dedent();
        w.write("}\n");
        w.dedent();
        w.write("}\n");
        w.dedent();
        w.write("}\n\n");

        // Exhaustive: a variant without a token fails to compile.
        write!(w, "impl fmt::Display for {} {{\n", enum_type);
        w.indent();
        w.write("fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {\n");
        w.indent();
        w.write("match self {\n");
        w.indent();
        for value in &prop.enum_values {
            write!(
                w,
                "{}::{} => write!(f, \"{}\"),\n",
                enum_type,
                variant_name(value),
                value
            );
        }
        w.dedent();
        w.write("}\n");
        w.dedent();
        w.write("}\n");
        w.dedent();
        w.write("}\n\n");
    }

    fn getter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);
        let key = ctx.key(prop);
        let const_name = const_name(prop);

        write!(w, "/// The property name of the \"{}\" API.\n", accessor_name(prop));
        write!(w, "pub const {}: &str = \"{}\";\n\n", const_name, key);

        write!(w, "/// Returns the value of the property '{}' if set.\n", key);
        if prop.deprecated {
            w.write(DEPRECATED);
        }
        write!(
            w,
            "pub fn {}() -> std::result::Result<Option<{}>, SysPropError> {{\n",
            getter_name(prop),
            types.type_name
        );
        w.indent();

        match &prop.legacy_prop_name {
            Some(legacy) => {
                w.write("let result = ");
                Self::read_block(w, &const_name, &types.parser);
                w.write(";\n");
                w.write("if result.is_ok() { return result; }\n");
                write!(
                    w,
                    "log::debug!(\"Failed to fetch the original property '{}' ('{{}}'), falling back to the legacy one '{}'.\", result.unwrap_err());\n",
                    key, legacy
                );
                Self::read_block(w, &format!("\"{}\"", legacy), &types.parser);
                w.write("\n");
            }
            None => {
                Self::read_block(w, &const_name, &types.parser);
                w.write("\n");
            }
        }

        w.dedent();
        w.write("}\n");
    }

    fn setter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter) {
        let types = type_mapping(prop);

        write!(
            w,
            "\n/// Sets the value of the property '{}', returns 'Ok' if successful.\n",
            ctx.key(prop)
        );
        if prop.deprecated {
            w.write(DEPRECATED);
        }
        write!(
            w,
            "pub fn {}(v: {}) -> std::result::Result<(), SysPropError> {{\n",
            setter_name(prop),
            types.accept_type
        );
        w.indent();

        let write_arg = match types.formatter {
            None => "v",
            Some(formatter) => {
                // Single values are borrowed, lists already are slices.
                let format_arg = if prop.prop_type.is_list() { "v" } else { "&v" };
                write!(w, "let value = {}({});\n", formatter, format_arg);
                "value.as_str()"
            }
        };
        write!(
            w,
            "system_properties::write({}, {}).map_err(SysPropError::SetError)\n",
            const_name(prop),
            write_arg
        );

        w.dedent();
        w.write("}\n");
    }

    fn epilogue(&self, _ctx: &GenContext<'_>, _w: &mut CodeWriter) {}
}
