//! Anchor-based patching of existing source files
//!
//! An [`Anchor`] decides *what* text to change by matching well-known
//! surrounding patterns (an import block, a pair of body tags). The
//! [`AnchorPatcher`] owns everything else: the entry point precondition, the
//! one-time backup, the idempotence check and the final write.
//!
//! Anchors are text matches, not a parser. After writing, the patcher runs a
//! heuristic validation and reports anything suspicious as caveats; a patch
//! without caveats is still not guaranteed to be syntactically valid.

pub mod provider;
pub mod validate;

use crate::error::{InstallError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

pub use provider::ProviderWrap;

/// Suffix of the sibling file holding the pre-patch original
pub const BACKUP_SUFFIX: &str = ".bak";

/// Result of running an anchor over a file's contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorEdit {
    pub content: String,
    /// Human-readable description of each change made
    pub steps: Vec<String>,
    /// Things the anchor expected but could not find
    pub caveats: Vec<String>,
}

/// A pluggable text transformation keyed on a known surrounding pattern
pub trait Anchor {
    /// Short name used in messages
    fn describe(&self) -> String;

    /// Whether `source` already carries this patch
    fn is_applied(&self, source: &str) -> bool;

    /// Transform `source`; must be a no-op on text where `is_applied` is true
    fn apply(&self, source: &str) -> AnchorEdit;

    /// Anchor-specific checks on the patched text
    fn verify(&self, _patched: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Whether the pre-patch original is held in a backup sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupState {
    /// `<file>.bak` exists and is treated as the original
    OriginalPreserved,
    Absent,
}

/// State of an entry point before patching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchState {
    Unpatched(BackupState),
    Patched(BackupState),
}

impl PatchState {
    fn classify<A: Anchor>(anchor: &A, content: &str, backup_path: &Path) -> Self {
        let backup = if backup_path.is_file() {
            BackupState::OriginalPreserved
        } else {
            BackupState::Absent
        };
        if anchor.is_applied(content) {
            PatchState::Patched(backup)
        } else {
            PatchState::Unpatched(backup)
        }
    }
}

/// What a patch run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file was rewritten
    Applied {
        backup_created: bool,
        steps: Vec<String>,
        caveats: Vec<String>,
    },
    /// The file already carried the patch; nothing was written
    AlreadyApplied { backup: BackupState },
}

/// Applies an [`Anchor`] to a single file with backup and idempotence handling
#[derive(Debug, Clone)]
pub struct AnchorPatcher<A: Anchor> {
    anchor: A,
}

impl<A: Anchor> AnchorPatcher<A> {
    pub fn new(anchor: A) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> &A {
        &self.anchor
    }

    /// `<file>.bak` next to the entry point
    pub fn backup_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Patch `path` in place.
    ///
    /// A file that already carries the patch is left alone and no backup is
    /// taken, even when the backup is missing: backing up patched content would
    /// replace the only trustworthy copy of the original.
    pub fn patch(&self, path: &Path) -> Result<PatchOutcome> {
        if !path.is_file() {
            return Err(InstallError::EntryPointMissing {
                path: path.to_path_buf(),
            });
        }

        let backup_path = Self::backup_path(path);
        let original = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let backup = match PatchState::classify(&self.anchor, &original, &backup_path) {
            PatchState::Patched(backup) => {
                if backup == BackupState::Absent {
                    tracing::debug!(
                        "{} is already patched but {} is missing; the original cannot be restored",
                        path.display(),
                        backup_path.display()
                    );
                }
                tracing::info!("{} already applied to {}", self.anchor.describe(), path.display());
                return Ok(PatchOutcome::AlreadyApplied { backup });
            }
            PatchState::Unpatched(backup) => backup,
        };

        let backup_created = backup == BackupState::Absent;
        if backup_created {
            std::fs::copy(path, &backup_path).with_context(|| {
                format!("Failed to back up {} to {}", path.display(), backup_path.display())
            })?;
            tracing::info!("backed up {} to {}", path.display(), backup_path.display());
        }

        let edit = self.anchor.apply(&original);
        std::fs::write(path, &edit.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        let mut caveats = edit.caveats;
        caveats.extend(validate::compare_delimiters(&original, &edit.content));
        caveats.extend(self.anchor.verify(&edit.content));
        for caveat in &caveats {
            tracing::debug!("{}: {}", path.display(), caveat);
        }

        Ok(PatchOutcome::Applied {
            backup_created,
            steps: edit.steps,
            caveats,
        })
    }
}
