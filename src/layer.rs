//! Reproduces one template layer into the destination tree.
//!
//! Files are dispatched by name: data-bound files become pending entries,
//! everything else goes through the merge policy table.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use globset::GlobSet;
use log::debug;
use walkdir::WalkDir;

use crate::constants::DOT_PREFIX;
use crate::error::{Error, Result};
use crate::pipeline::{PendingQueue, PendingTemplate};
use crate::policy::{self, PolicyTable};
use crate::provider::{split_data_file_name, ProviderRegistry};

/// Applies layers with a fixed policy table, provider registry and ignore set.
pub struct LayerRenderer<'a> {
    policies: &'a PolicyTable,
    providers: &'a ProviderRegistry,
    ignored: &'a GlobSet,
}

impl<'a> LayerRenderer<'a> {
    pub fn new(
        policies: &'a PolicyTable,
        providers: &'a ProviderRegistry,
        ignored: &'a GlobSet,
    ) -> Self {
        Self { policies, providers, ignored }
    }

    /// Recursively reproduces `source_dir` into `dest_dir`.
    ///
    /// Directories are created when absent. Data-bound files are queued on
    /// `pending` with their target path relative to `dest_dir` and are never
    /// copied. Every other file is written through its merge strategy.
    ///
    /// # Errors
    /// * `Error::MissingLayer` if `source_dir` is not a directory
    /// * `Error::UnknownProvider` for a data-bound file with no registered provider
    /// * I/O and parse errors from merging, see [`policy::execute`]
    pub fn apply(&self, source_dir: &Path, dest_dir: &Path, pending: &mut PendingQueue) -> Result<()> {
        if !source_dir.is_dir() {
            return Err(Error::MissingLayer {
                name: source_dir.display().to_string(),
                path: source_dir.display().to_string(),
            });
        }
        fs::create_dir_all(dest_dir).map_err(|e| Error::file(dest_dir, e))?;

        let walker = WalkDir::new(source_dir)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_ignored(source_dir, entry.path()));

        for entry in walker {
            let entry = entry?;
            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .map_err(|e| Error::ConfigError(e.to_string()))?;

            if entry.file_type().is_dir() {
                let target = dest_dir.join(relative);
                debug!("Creating directory: {}", target.display());
                fs::create_dir_all(&target).map_err(|e| Error::file(&target, e))?;
            } else {
                self.apply_file(entry.path(), relative, dest_dir, pending)?;
            }
        }
        Ok(())
    }

    fn apply_file(
        &self,
        source: &Path,
        relative: &Path,
        dest_dir: &Path,
        pending: &mut PendingQueue,
    ) -> Result<()> {
        let Some(file_name) = relative.file_name().and_then(|name| name.to_str()) else {
            // Non UTF-8 names cannot match any reserved convention.
            return policy::execute(policy::MergeStrategy::Replace, source, &dest_dir.join(relative));
        };

        if let Some((target_name, kind)) = split_data_file_name(file_name) {
            let provider = self.providers.get(kind).ok_or_else(|| Error::UnknownProvider {
                kind: kind.to_string(),
                path: source.display().to_string(),
            })?;
            let target = relative.with_file_name(&*dot_renamed(target_name));
            debug!("Deferring data for: {}", target.display());
            pending.push(PendingTemplate::new(target, source, provider));
            return Ok(());
        }

        let target = dest_dir.join(relative.with_file_name(&*dot_renamed(file_name)));
        policy::execute(self.policies.strategy_for(file_name), source, &target)
    }

    fn is_ignored(&self, source_dir: &Path, path: &Path) -> bool {
        match path.strip_prefix(source_dir) {
            Ok(relative) if self.ignored.is_match(relative) => {
                debug!("Skipping ignored path: {}", path.display());
                true
            }
            _ => false,
        }
    }
}

/// Replaces a leading `_` with `.`: `_gitignore` becomes `.gitignore`.
pub fn dot_renamed(file_name: &str) -> Cow<'_, str> {
    match file_name.strip_prefix(DOT_PREFIX) {
        Some(rest) => Cow::Owned(format!(".{rest}")),
        None => Cow::Borrowed(file_name),
    }
}
