//! Configuration management for the sysprop generator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (sysprop.toml)
//! - The user config directory
//! - An explicit `--config` file
//! - Environment variables (SYSPROP__*)
//!
//! ## Example config file (sysprop.toml):
//! ```toml
//! [generation]
//! default_scope = "public"
//!
//! [output]
//! header_dir = "gen/include"
//! source_dir = "gen/src"
//! java_dir = "gen/java"
//! jni_dir = "gen/jni"
//! rust_dir = "gen/rust"
//! include_name = "android/sysprop/PlatformProperties.sysprop.h"
//! ```

use std::path::{Path, PathBuf};

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyspropError};
use crate::output::OutputDirs;
use crate::schema::Scope;

/// Main configuration for the generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Output locations
    #[serde(default)]
    pub output: OutputConfig,
}

/// Generation configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Scope tier used when the command line does not pick one
    #[serde(default)]
    pub default_scope: Scope,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub header_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub java_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub jni_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub rust_dir: PathBuf,

    /// How generated C++ sources include their header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_name: Option<String>,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            header_dir: default_output_dir(),
            source_dir: default_output_dir(),
            java_dir: default_output_dir(),
            jni_dir: default_output_dir(),
            rust_dir: default_output_dir(),
            include_name: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["sysprop.toml", ".sysprop.toml", "config/sysprop.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(dirs) = directories::ProjectDirs::from("dev", "sysprop", "sysprop-gen") {
            let user_config = dirs.config_dir().join("sysprop.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // SYSPROP__OUTPUT__RUST_DIR=... -> output.rust_dir
        builder = builder.add_source(
            Environment::with_prefix("SYSPROP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            SyspropError::io(
                format!("Serializing config for {}", path.display()),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        std::fs::write(path, content)
            .map_err(|e| SyspropError::io(format!("Writing config to {}", path.display()), e))
    }

    pub fn default_scope(&self) -> Scope {
        self.generation.default_scope
    }

    /// Configured output directories, `override_dir` replacing all of them
    pub fn output_dirs(&self, override_dir: Option<&Path>) -> OutputDirs {
        match override_dir {
            Some(dir) => OutputDirs::uniform(dir),
            None => OutputDirs {
                header: self.output.header_dir.clone(),
                source: self.output.source_dir.clone(),
                java: self.output.java_dir.clone(),
                jni: self.output.jni_dir.clone(),
                rust: self.output.rust_dir.clone(),
            },
        }
    }
}
