//! Sysprop Generator CLI
//!
//! Generates typed property accessors from a schema file, validates schemas,
//! and audits property files against them.
//!
//! Usage:
//!   sysprop-gen cpp props/Audio.sysprop.toml --header-dir gen/include --source-dir gen/src
//!   sysprop-gen java props/Audio.sysprop.toml --scope system --java-dir gen/java --jni-dir gen/jni
//!   sysprop-gen rust props/Audio.sysprop.toml --output-dir gen/rust --check
//!   sysprop-gen validate props/Audio.sysprop.toml
//!   sysprop-gen audit props/Audio.sysprop.toml out/vendor/build.prop

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sysprop_gen::codegen::{self, CppOptions, JavaOptions, RustOptions, TargetOptions};
use sysprop_gen::output::{self, ArtifactStatus, OutputDirs, WriteMode};
use sysprop_gen::{audit, GeneratorConfig, RawSchema, Schema, Scope};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sysprop-gen")]
#[command(about = "Generate typed system property accessors for C++, Java and Rust")]
struct Cli {
    /// Config file layered over sysprop.toml and the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every generating subcommand
#[derive(Args)]
struct GenerateArgs {
    /// Schema file (.toml, .sysprop or .json)
    input: PathBuf,

    /// Highest scope tier to emit: public, system or internal
    #[arg(long)]
    scope: Option<Scope>,

    /// Compare with the files on disk instead of writing; exit 1 when stale
    #[arg(long)]
    check: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a C++ header and source
    Cpp {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output directory of the header
        #[arg(long)]
        header_dir: Option<PathBuf>,

        /// Output directory of the source
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// How the source includes the header (defaults to `<stem>.h`)
        #[arg(long)]
        include_name: Option<String>,
    },

    /// Generate a Java class and its JNI library
    Java {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output root of the Java class (package directories are added)
        #[arg(long)]
        java_dir: Option<PathBuf>,

        /// Output directory of the JNI source
        #[arg(long)]
        jni_dir: Option<PathBuf>,
    },

    /// Generate a Rust module
    Rust {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output directory of mod.rs
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Parse and validate a schema without generating anything
    Validate {
        /// Schema file
        input: PathBuf,
    },

    /// Check a build.prop style file against a schema
    Audit {
        /// Schema file
        schema: PathBuf,

        /// Property file to check
        prop_file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when the command ran but found problems
fn run(cli: Cli) -> Result<bool> {
    let config = GeneratorConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Cpp {
            args,
            header_dir,
            source_dir,
            include_name,
        } => {
            let schema = load(&args.input)?;
            let mut options = CppOptions::new(file_stem(&args.input)?)
                .with_scope(args.scope.unwrap_or(config.default_scope()));
            options.include_name = include_name.or_else(|| config.output.include_name.clone());

            let mut dirs = config.output_dirs(None);
            if let Some(dir) = header_dir {
                dirs.header = dir;
            }
            if let Some(dir) = source_dir {
                dirs.source = dir;
            }

            emit(&schema, TargetOptions::Cpp(options), &dirs, args.check)
        }

        Commands::Java {
            args,
            java_dir,
            jni_dir,
        } => {
            let schema = load(&args.input)?;
            let options = JavaOptions {
                scope: args.scope.unwrap_or(config.default_scope()),
            };

            let mut dirs = config.output_dirs(None);
            if let Some(dir) = java_dir {
                dirs.java = dir;
            }
            if let Some(dir) = jni_dir {
                dirs.jni = dir;
            }

            emit(&schema, TargetOptions::Java(options), &dirs, args.check)
        }

        Commands::Rust { args, output_dir } => {
            let schema = load(&args.input)?;
            codegen::rust::check_names(&schema)
                .with_context(|| format!("Error parsing file {}", args.input.display()))?;
            let options = RustOptions {
                scope: args.scope.unwrap_or(config.default_scope()),
            };

            let mut dirs = config.output_dirs(None);
            if let Some(dir) = output_dir {
                dirs.rust = dir;
            }

            emit(&schema, TargetOptions::Rust(options), &dirs, args.check)
        }

        Commands::Validate { input } => {
            let schema = load(&input)?;
            println!(
                "✅ {} - {} ({} props)",
                input.display(),
                schema.module,
                schema.props.len()
            );
            Ok(true)
        }

        Commands::Audit { schema, prop_file } => {
            let schema = load(&schema)?;
            let report = audit::audit_file(&schema, &prop_file)?;

            if report.is_clean() {
                println!(
                    "✅ {} - {} assignments checked",
                    prop_file.display(),
                    report.checked
                );
                return Ok(true);
            }

            println!("❌ {} - {} problems", prop_file.display(), report.findings.len());
            for finding in &report.findings {
                println!("  {}", finding);
            }
            Ok(false)
        }
    }
}

fn load(path: &Path) -> Result<Schema> {
    let raw = RawSchema::from_path(path)?;
    let schema = sysprop_gen::validate(&raw)
        .with_context(|| format!("Error parsing file {}", path.display()))?;
    Ok(schema)
}

/// `Audio.sysprop.toml` -> `Audio.sysprop`
fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive an output name from {}", path.display()))
}

fn emit(schema: &Schema, options: TargetOptions, dirs: &OutputDirs, check: bool) -> Result<bool> {
    let target = options.target();
    let artifacts = codegen::generate(schema, &options);
    let mode = if check { WriteMode::Check } else { WriteMode::Write };

    let reports = output::write_artifacts(&artifacts, dirs, mode)
        .with_context(|| format!("Failed to emit {} accessors for {}", target, schema.module))?;

    let mut fresh = true;
    for report in &reports {
        match &report.status {
            ArtifactStatus::Written => println!("  ✓ {}", report.path.display()),
            ArtifactStatus::UpToDate => println!("  ✓ {} (up to date)", report.path.display()),
            ArtifactStatus::Missing => {
                println!("  ✗ {} (missing)", report.path.display());
                fresh = false;
            }
            ArtifactStatus::Stale { diff } => {
                println!("  ✗ {} (stale)", report.path.display());
                print!("{}", diff);
                fresh = false;
            }
        }
    }

    Ok(fresh)
}
