//! Sysprop Generator
//!
//! Turns a declarative system property schema into typed accessor code for
//! C++, Java (plus its JNI bridge) and Rust, so that every consumer of a
//! property reads and writes it through the same key, type and parsing rules.
//!
//! ## Pipeline
//!
//! ```text
//! schema file (.toml / .json)
//!     │  RawSchema::from_path
//!     ▼
//! RawSchema ──validate──▶ Schema
//!                           │  codegen::generate(TargetOptions)
//!                           ▼
//!                       Vec<Artifact> ──write_artifacts──▶ output dirs
//! ```
//!
//! ## Features
//!
//! - **Validation**: the first problem wins, reported with a fixed message
//! - **Scope tiers**: `Public < System < Internal` filtering per output
//! - **Legacy keys**: generated getters fall back to an older key
//! - **Freshness checks**: compare generated files against disk with a diff
//! - **Audit**: check a `build.prop` style file against a schema

pub mod audit;
pub mod codegen;
pub mod config;
pub mod error;
pub mod names;
pub mod output;
pub mod schema;
pub mod validate;
pub mod value;

pub use audit::{audit_file, audit_str, AuditReport, Finding, FindingKind};
pub use codegen::{generate, Artifact, OutputSlot, Target, TargetOptions};
pub use config::GeneratorConfig;
pub use error::{Result, SyspropError, ValidationError};
pub use output::{write_artifacts, ArtifactReport, ArtifactStatus, OutputDirs, WriteMode};
pub use schema::{Access, Owner, PropType, Property, RawProperty, RawSchema, Schema, Scope};
pub use validate::validate;
pub use value::{PropValue, Scalar, ValueError};

/// Read and validate a schema file in one step
pub fn load_schema(path: &std::path::Path) -> Result<Schema> {
    let raw = RawSchema::from_path(path)?;
    Ok(validate(&raw)?)
}
