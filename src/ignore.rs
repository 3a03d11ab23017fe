//! File and directory ignore pattern handling for template layers.
//! Paths matching these patterns are never copied out of a layer, which keeps
//! dependency caches and OS litter out of generated projects.

use crate::constants::{DEFAULT_IGNORE_PATTERNS, IGNORE_FILE};
use crate::error::{Error, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::path::Path;

/// Builds the ignore set for a template root.
///
/// The set always contains [`DEFAULT_IGNORE_PATTERNS`]. When the template
/// root carries a `.strataignore` file, each non-empty line that is not a
/// `#` comment is added as an extra glob. Patterns are matched against paths
/// relative to the layer directory.
///
/// # Example
/// ```ignore
/// # Contents of .strataignore:
/// *.log
/// coverage
/// ```
pub fn parse_ignore_file<P: AsRef<Path>>(template_root: P) -> Result<GlobSet> {
    let ignore_path = template_root.as_ref().join(IGNORE_FILE);
    let mut builder = GlobSetBuilder::new();

    for pattern in DEFAULT_IGNORE_PATTERNS {
        builder.add(compile(pattern)?);
    }

    if ignore_path.is_file() {
        let contents =
            std::fs::read_to_string(&ignore_path).map_err(|e| Error::file(&ignore_path, e))?;
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            builder.add(compile(line)?);
        }
    } else {
        debug!("{IGNORE_FILE} does not exist in {}", template_root.as_ref().display());
    }

    builder
        .build()
        .map_err(|e| Error::IgnoreError(format!("{IGNORE_FILE} loading failed: {e}")))
}

fn compile(pattern: &str) -> Result<Glob> {
    Glob::new(pattern)
        .map_err(|e| Error::IgnoreError(format!("invalid pattern '{pattern}': {e}")))
}
