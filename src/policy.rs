//! Per-file merge policy.
//!
//! When a layer writes a file that an earlier layer (or the caller) already
//! produced, the file name decides what happens. The mapping lives in one
//! [`PolicyTable`] and every strategy is carried out by [`execute`].

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::merge::{deep_merge, sort_dependencies};

/// How a layer file is combined with an existing destination file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Overwrite the destination with the layer's bytes.
    Replace,
    /// Deep-merge as a project manifest, then sort its dependency groups.
    Manifest,
    /// Deep-merge as a plain JSON mapping.
    Mapping,
    /// Append the layer's text to the destination as a new block.
    ///
    /// Appending is not deduplicated: applying the same content twice to a
    /// pre-existing destination repeats it.
    AppendText,
}

/// Maps exact source file names to a [`MergeStrategy`].
///
/// Unlisted file names use [`MergeStrategy::Replace`].
#[derive(Debug, Clone)]
pub struct PolicyTable {
    strategies: IndexMap<String, MergeStrategy>,
}

impl PolicyTable {
    /// Creates a table with no special cases; every file is replaced.
    pub fn empty() -> Self {
        Self { strategies: IndexMap::new() }
    }

    /// Adds or overrides the strategy for `file_name`.
    pub fn insert<S: Into<String>>(&mut self, file_name: S, strategy: MergeStrategy) {
        self.strategies.insert(file_name.into(), strategy);
    }

    pub fn strategy_for(&self, file_name: &str) -> MergeStrategy {
        self.strategies.get(file_name).copied().unwrap_or(MergeStrategy::Replace)
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("package.json", MergeStrategy::Manifest);
        table.insert("extensions.json", MergeStrategy::Mapping);
        table.insert("settings.json", MergeStrategy::Mapping);
        table.insert("_gitignore", MergeStrategy::AppendText);
        table.insert(".gitignore", MergeStrategy::AppendText);
        table
    }
}

/// Writes `source` to `target` following `strategy`.
///
/// Merging strategies fall back to a verbatim copy when `target` does not
/// exist yet. The merged result is computed fully in memory before anything
/// is written, so a parse failure leaves `target` untouched.
pub fn execute(strategy: MergeStrategy, source: &Path, target: &Path) -> Result<()> {
    let merged = match strategy {
        MergeStrategy::Replace => None,
        _ if !target.exists() => None,
        MergeStrategy::Manifest => {
            debug!("Merging manifest: {}", target.display());
            let merged = deep_merge(&read_json(target)?, &read_json(source)?);
            Some(to_json_text(&sort_dependencies(merged), target)?)
        }
        MergeStrategy::Mapping => {
            debug!("Merging mapping: {}", target.display());
            let merged = deep_merge(&read_json(target)?, &read_json(source)?);
            Some(to_json_text(&merged, target)?)
        }
        MergeStrategy::AppendText => {
            debug!("Appending to: {}", target.display());
            Some(format!("{}\n{}", read_text(target)?, read_text(source)?))
        }
    };

    match merged {
        Some(content) => fs::write(target, content).map_err(|e| Error::file(target, e)),
        None => {
            debug!("Copying file: {}", target.display());
            fs::copy(source, target).map(|_| ()).map_err(|e| Error::file(target, e))
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::file(path, e))
}

fn read_json(path: &Path) -> Result<Value> {
    serde_json::from_str(&read_text(path)?).map_err(|e| Error::MalformedData {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn to_json_text(value: &Value, path: &Path) -> Result<String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| Error::MalformedData {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(text + "\n")
}
