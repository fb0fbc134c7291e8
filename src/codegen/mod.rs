//! Code Generation
//!
//! One algorithm, several targets:
//! - [`GenContext`]: the validated schema plus the properties visible at the
//!   requested scope tier, in declaration order
//! - [`LanguageProfile`]: per-artifact hooks (prologue, enum, getter, setter,
//!   epilogue) backed by the target's [`TypeMapping`] table
//! - [`render`]: walks the properties and drives one profile through a
//!   [`CodeWriter`], producing one [`Artifact`]
//!
//! The key constraint: emitters NEVER see raw schema text, only the normalized
//! [`Schema`] handed out by the validator.

pub mod cpp;
pub mod java;
pub mod rust;
pub mod writer;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::schema::{Property, Schema, Scope};

pub use cpp::CppOptions;
pub use java::JavaOptions;
pub use rust::RustOptions;
pub use writer::CodeWriter;

/// Indentation unit of every generated file
pub const INDENT: &str = "    ";

/// First lines of every generated file
pub const GENERATED_BANNER: &str = "// Generated by the sysprop generator. DO NOT EDIT!\n\n";

// =============================================================================
// Targets and Artifacts
// =============================================================================

/// Supported output languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Cpp,
    Java,
    Rust,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Cpp, Target::Java, Target::Rust];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Cpp => "cpp",
            Target::Java => "java",
            Target::Rust => "rust",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|target| target.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown target '{}' (expected cpp, java or rust)", s))
    }
}

/// Which output a generated file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSlot {
    CppHeader,
    CppSource,
    JavaClass,
    JniLibrary,
    RustModule,
}

impl OutputSlot {
    /// Human description used in I/O error messages
    pub fn describe(&self) -> &'static str {
        match self {
            OutputSlot::CppHeader => "generated header",
            OutputSlot::CppSource => "generated source",
            OutputSlot::JavaClass => "generated java class",
            OutputSlot::JniLibrary => "generated jni library",
            OutputSlot::RustModule => "generated rust lib",
        }
    }
}

/// One generated file, relative to the output directory of its slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub slot: OutputSlot,
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Target plus its options, for callers that pick the target at runtime
#[derive(Debug, Clone)]
pub enum TargetOptions {
    Cpp(CppOptions),
    Java(JavaOptions),
    Rust(RustOptions),
}

impl TargetOptions {
    pub fn target(&self) -> Target {
        match self {
            TargetOptions::Cpp(_) => Target::Cpp,
            TargetOptions::Java(_) => Target::Java,
            TargetOptions::Rust(_) => Target::Rust,
        }
    }
}

/// Generate every artifact of one target
pub fn generate(schema: &Schema, options: &TargetOptions) -> Vec<Artifact> {
    match options {
        TargetOptions::Cpp(opts) => cpp::generate(schema, opts),
        TargetOptions::Java(opts) => java::generate(schema, opts),
        TargetOptions::Rust(opts) => rust::generate(schema, opts),
    }
}

// =============================================================================
// Language Profiles
// =============================================================================

/// Where synthesized enum types are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumPlacement {
    /// Right before the accessors of the property that declares the enum
    Inline,
    /// Once, in declaration order, between the prologue and the accessors
    Preamble,
}

/// A target's spelling of one property type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// Getter value type, list wrapper and enum name applied
    pub type_name: String,
    /// Setter argument type
    pub accept_type: String,
    /// Parser function or expression for raw store values
    pub parser: String,
    /// Formatter for setter values; `None` writes the value unchanged
    pub formatter: Option<&'static str>,
}

/// Everything a profile may read while rendering
#[derive(Debug, Clone)]
pub struct GenContext<'a> {
    pub schema: &'a Schema,
    pub scope: Scope,
    pub props: Vec<&'a Property>,
}

impl<'a> GenContext<'a> {
    pub fn new(schema: &'a Schema, scope: Scope) -> Self {
        Self {
            schema,
            scope,
            props: schema.props_in_scope(scope).collect(),
        }
    }

    /// Effective store key of a property
    pub fn key(&self, prop: &Property) -> String {
        self.schema.effective_key(prop)
    }

    pub fn enum_props(&self) -> impl Iterator<Item = &'a Property> + '_ {
        self.props.iter().copied().filter(|prop| prop.is_enum())
    }
}

/// Per-artifact rendering hooks.
///
/// [`render`] calls them in this order:
///
/// ```text
/// prologue
/// enum_decl*            (Preamble placement only)
/// interlude
/// for each property:
///     separator
///     enum_decl         (Inline placement, enum properties only)
///     getter
///     setter            (access != Readonly only)
/// epilogue
/// ```
pub trait LanguageProfile {
    fn slot(&self) -> OutputSlot;

    fn relative_path(&self, ctx: &GenContext<'_>) -> PathBuf;

    fn enum_placement(&self) -> EnumPlacement {
        EnumPlacement::Inline
    }

    fn prologue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter);

    fn interlude(&self, _ctx: &GenContext<'_>, _w: &mut CodeWriter) {}

    /// Written before every property; a blank line between properties by default
    fn separator(&self, index: usize, w: &mut CodeWriter) {
        if index > 0 {
            w.write("\n");
        }
    }

    fn enum_decl(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter);

    fn getter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter);

    fn setter(&self, ctx: &GenContext<'_>, prop: &Property, w: &mut CodeWriter);

    fn epilogue(&self, ctx: &GenContext<'_>, w: &mut CodeWriter);
}

/// Render one artifact
///
/// # Panics
///
/// When a profile leaves the writer indented; that is a generator bug.
pub fn render(profile: &dyn LanguageProfile, ctx: &GenContext<'_>) -> Artifact {
    let mut w = CodeWriter::new(INDENT);
    let placement = profile.enum_placement();

    profile.prologue(ctx, &mut w);

    if placement == EnumPlacement::Preamble {
        for prop in ctx.enum_props() {
            profile.enum_decl(ctx, prop, &mut w);
        }
    }

    profile.interlude(ctx, &mut w);

    for (index, prop) in ctx.props.iter().enumerate() {
        profile.separator(index, &mut w);

        if placement == EnumPlacement::Inline && prop.is_enum() {
            profile.enum_decl(ctx, prop, &mut w);
        }

        profile.getter(ctx, prop, &mut w);

        if !prop.is_readonly() {
            profile.setter(ctx, prop, &mut w);
        }
    }

    profile.epilogue(ctx, &mut w);

    assert_eq!(
        w.level(),
        0,
        "{:?} profile left the writer indented",
        profile.slot()
    );

    let artifact = Artifact {
        slot: profile.slot(),
        relative_path: profile.relative_path(ctx),
        contents: w.into_code(),
    };

    debug!(
        path = %artifact.relative_path.display(),
        props = ctx.props.len(),
        scope = %ctx.scope,
        "rendered artifact"
    );

    artifact
}
