//! Post-composition reconciliation of dual-dialect sources.
//!
//! Layers may ship a plain (`.js`) and a typed (`.ts`) variant of the same
//! file side by side. Once composition is done only the variants of the
//! selected dialect survive.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result};
use crate::traverse::pre_order;

/// Output dialect of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Untyped sources
    #[default]
    Plain,
    /// Statically typed sources
    Typed,
}

impl Dialect {
    pub fn from_typed(typed: bool) -> Self {
        if typed {
            Dialect::Typed
        } else {
            Dialect::Plain
        }
    }
}

/// File names and extensions the reconciler acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectRules {
    pub plain_extension: String,
    pub typed_extension: String,
    /// Project config that only makes sense for the plain dialect
    pub plain_config: String,
    /// Document, relative to the output root, that references the entry module
    pub entry_document: String,
    pub plain_entry: String,
    pub typed_entry: String,
}

impl Default for DialectRules {
    fn default() -> Self {
        Self {
            plain_extension: ".js".to_string(),
            typed_extension: ".ts".to_string(),
            plain_config: "jsconfig.json".to_string(),
            entry_document: "index.html".to_string(),
            plain_entry: "src/main.js".to_string(),
            typed_entry: "src/main.ts".to_string(),
        }
    }
}

/// Keeps only the files of `dialect` under `root`.
///
/// * [`Dialect::Typed`]: every plain file is deleted when its typed sibling
///   exists and renamed to the typed extension otherwise. The plain project
///   config is deleted and the entry reference in the entry document is
///   rewritten to the typed entry.
/// * [`Dialect::Plain`]: every typed file is deleted.
///
/// # Errors
/// * `Error::MissingEntryDocument` if the typed dialect is selected and the
///   entry document does not exist
pub fn reconcile(root: &Path, dialect: Dialect, rules: &DialectRules) -> Result<()> {
    info!("Reconciling sources for the {dialect:?} dialect");
    match dialect {
        Dialect::Typed => {
            pre_order(root, |_| Ok(()), |path| to_typed(path, rules))?;
            rewrite_entry(root, rules)
        }
        Dialect::Plain => pre_order(
            root,
            |_| Ok(()),
            |path| {
                if has_suffix(path, &rules.typed_extension) {
                    debug!("Removing typed file: {}", path.display());
                    fs::remove_file(path).map_err(|e| Error::file(path, e))?;
                }
                Ok(())
            },
        ),
    }
}

fn to_typed(path: &Path, rules: &DialectRules) -> Result<()> {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return Ok(());
    };

    if let Some(stem) = file_name.strip_suffix(rules.plain_extension.as_str()) {
        let typed = path.with_file_name(format!("{stem}{}", rules.typed_extension));
        if typed.exists() {
            debug!("Removing {} in favour of {}", path.display(), typed.display());
            fs::remove_file(path).map_err(|e| Error::file(path, e))?;
        } else {
            debug!("Renaming {} to {}", path.display(), typed.display());
            fs::rename(path, &typed).map_err(|e| Error::file(path, e))?;
        }
    } else if file_name == rules.plain_config {
        debug!("Removing plain project config: {}", path.display());
        fs::remove_file(path).map_err(|e| Error::file(path, e))?;
    }
    Ok(())
}

fn rewrite_entry(root: &Path, rules: &DialectRules) -> Result<()> {
    let document = root.join(&rules.entry_document);
    if !document.is_file() {
        return Err(Error::MissingEntryDocument { path: document.display().to_string() });
    }
    let content = fs::read_to_string(&document).map_err(|e| Error::file(&document, e))?;
    let content = content.replacen(&rules.plain_entry, &rules.typed_entry, 1);
    fs::write(&document, content).map_err(|e| Error::file(&document, e))
}

fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(suffix))
}
