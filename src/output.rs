//! Artifact output
//!
//! Places generated [`Artifact`]s under per-slot output directories, or (in
//! check mode) compares them with what is already on disk and reports stale
//! files with a unified diff.

use std::path::{Path, PathBuf};

use similar::TextDiff;
use tracing::{info, warn};

use crate::codegen::{Artifact, OutputSlot};
use crate::error::{Result, SyspropError};

/// Output root of every slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub header: PathBuf,
    pub source: PathBuf,
    pub java: PathBuf,
    pub jni: PathBuf,
    pub rust: PathBuf,
}

impl OutputDirs {
    /// Every slot under the same directory
    pub fn uniform(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            header: dir.clone(),
            source: dir.clone(),
            java: dir.clone(),
            jni: dir.clone(),
            rust: dir,
        }
    }

    pub fn dir_for(&self, slot: OutputSlot) -> &Path {
        match slot {
            OutputSlot::CppHeader => &self.header,
            OutputSlot::CppSource => &self.source,
            OutputSlot::JavaClass => &self.java,
            OutputSlot::JniLibrary => &self.jni,
            OutputSlot::RustModule => &self.rust,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Create directories and (over)write files
    Write,
    /// Touch nothing; report files that differ from the generated output
    Check,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Written,
    UpToDate,
    Missing,
    /// Unified diff from the file on disk to the generated contents
    Stale { diff: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReport {
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

impl ArtifactReport {
    pub fn is_fresh(&self) -> bool {
        matches!(self.status, ArtifactStatus::Written | ArtifactStatus::UpToDate)
    }
}

/// Write or check every artifact, in order. The first I/O error aborts.
pub fn write_artifacts(
    artifacts: &[Artifact],
    dirs: &OutputDirs,
    mode: WriteMode,
) -> Result<Vec<ArtifactReport>> {
    artifacts
        .iter()
        .map(|artifact| {
            let path = dirs.dir_for(artifact.slot).join(&artifact.relative_path);
            let status = match mode {
                WriteMode::Write => write_one(artifact, &path)?,
                WriteMode::Check => check_one(artifact, &path)?,
            };
            Ok(ArtifactReport { path, status })
        })
        .collect()
}

fn write_one(artifact: &Artifact, path: &Path) -> Result<ArtifactStatus> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyspropError::io(format!("Creating directory to {}", parent.display()), e)
            })?;
        }
    }

    std::fs::write(path, &artifact.contents).map_err(|e| {
        SyspropError::io(
            format!("Writing {} to {}", artifact.slot.describe(), path.display()),
            e,
        )
    })?;

    info!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
    Ok(ArtifactStatus::Written)
}

fn check_one(artifact: &Artifact, path: &Path) -> Result<ArtifactStatus> {
    let existing = match std::fs::read_to_string(path) {
        Ok(existing) => existing,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "generated file is missing");
            return Ok(ArtifactStatus::Missing);
        }
        Err(e) => {
            return Err(SyspropError::io(
                format!("Reading {} from {}", artifact.slot.describe(), path.display()),
                e,
            ))
        }
    };

    if existing == artifact.contents {
        return Ok(ArtifactStatus::UpToDate);
    }

    let shown = path.display().to_string();
    let diff = TextDiff::from_lines(existing.as_str(), artifact.contents.as_str())
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", shown), &format!("b/{}", shown))
        .to_string();

    warn!(path = %path.display(), "generated file is stale");
    Ok(ArtifactStatus::Stale { diff })
}
