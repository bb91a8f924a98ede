//! `.env.local` creation and merging

use anyhow::{Context, Result};
use std::path::Path;

/// A required variable and the placeholder written when it is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub key: &'static str,
    pub placeholder: &'static str,
}

impl EnvVar {
    pub const fn new(key: &'static str, placeholder: &'static str) -> Self {
        Self { key, placeholder }
    }

    fn line(&self) -> String {
        format!("{}=\"{}\"\n", self.key, self.placeholder)
    }
}

/// What happened to the env file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvMerge {
    Created,
    /// Keys appended, in required order
    Updated(Vec<String>),
    Unchanged,
}

/// Create the env file with every required variable, or append the missing ones.
///
/// Existing lines are never rewritten; appended keys follow the order of `required`.
pub fn merge_env_file(path: &Path, required: &[EnvVar]) -> Result<EnvMerge> {
    if !path.exists() {
        let contents: String = required.iter().map(EnvVar::line).collect();
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        return Ok(EnvMerge::Created);
    }

    let existing = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let missing: Vec<&EnvVar> = required
        .iter()
        .filter(|var| !defines_key(&existing, var.key))
        .collect();
    if missing.is_empty() {
        return Ok(EnvMerge::Unchanged);
    }

    let mut updated = existing.clone();
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    for var in &missing {
        updated.push_str(&var.line());
    }
    std::fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(EnvMerge::Updated(
        missing.iter().map(|var| var.key.to_string()).collect(),
    ))
}

/// A line starting with `KEY=`
fn defines_key(contents: &str, key: &str) -> bool {
    contents.lines().any(|line| {
        line.strip_prefix(key)
            .is_some_and(|rest| rest.starts_with('='))
    })
}
