//! Deferred rendering of data-bound templates.
//!
//! Runs once after every layer has been applied. The resolution phase calls
//! the queued data providers in registration order and builds the data
//! context store; the substitution phase renders every `*.j2` file in the
//! destination tree with its context and removes the template.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, info};
use serde_json::{Map, Value};

use crate::constants::TEMPLATE_SUFFIX;
use crate::error::{Error, Result};
use crate::provider::DataProvider;
use crate::renderer::TemplateRenderer;
use crate::traverse::pre_order;

/// A data provider waiting to run for one destination file.
pub struct PendingTemplate {
    /// Destination path relative to the output root, data suffix stripped
    pub target: PathBuf,
    /// The data-bound file inside its layer
    pub source: PathBuf,
    provider: Arc<dyn DataProvider>,
}

impl PendingTemplate {
    pub fn new<T, S>(target: T, source: S, provider: Arc<dyn DataProvider>) -> Self
    where
        T: Into<PathBuf>,
        S: AsRef<Path>,
    {
        Self { target: target.into(), source: source.as_ref().to_path_buf(), provider }
    }
}

impl fmt::Debug for PendingTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTemplate")
            .field("target", &self.target)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Pending providers in the order their layers registered them.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: Vec<PendingTemplate>,
}

impl PendingQueue {
    pub fn push(&mut self, entry: PendingTemplate) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingTemplate> {
        self.entries.iter()
    }
}

/// Resolved data per destination path (relative to the output root).
pub type DataStore = IndexMap<PathBuf, Value>;

/// The data value handed to the first provider of a path.
pub fn empty_data() -> Value {
    Value::Object(Map::new())
}

/// Runs every pending provider in registration order.
///
/// A provider for a path that already has data receives that data as its
/// seed, so layers targeting the same file accumulate instead of overwrite.
///
/// # Errors
/// * `Error::ProviderError` for the first provider that fails
pub fn resolve(queue: PendingQueue) -> Result<DataStore> {
    info!("Resolving {} deferred data provider(s)", queue.len());
    let mut store = DataStore::new();

    for entry in queue.entries {
        let seed = store.get(&entry.target).cloned().unwrap_or_else(empty_data);
        debug!("Resolving data for {} from {}", entry.target.display(), entry.source.display());
        let value = entry.provider.provide(&entry.source, seed).map_err(|e| Error::ProviderError {
            path: entry.source.display().to_string(),
            reason: e.to_string(),
        })?;
        store.insert(entry.target, value);
    }

    Ok(store)
}

/// Renders every template file under `root` and deletes the template.
///
/// `dir/name.ext.j2` is rendered with the context stored for `dir/name.ext`
/// (or an empty object when there is none) and written to `dir/name.ext`,
/// replacing any file already there. Returns the number of rendered files.
pub fn substitute(root: &Path, mut store: DataStore, renderer: &dyn TemplateRenderer) -> Result<usize> {
    let mut rendered = 0;

    pre_order(
        root,
        |_| Ok(()),
        |path| {
            let Some(target) = template_target(path) else {
                return Ok(());
            };
            let relative = target
                .strip_prefix(root)
                .map_err(|e| Error::ConfigError(e.to_string()))?;
            let context = store.swap_remove(relative).unwrap_or_else(empty_data);

            debug!("Rendering template: {}", target.display());
            let template = fs::read_to_string(path).map_err(|e| Error::file(path, e))?;
            let content = renderer.render(&template, &context)?;
            fs::write(&target, content).map_err(|e| Error::file(&target, e))?;
            fs::remove_file(path).map_err(|e| Error::file(path, e))?;
            rendered += 1;
            Ok(())
        },
    )?;

    for unused in store.keys() {
        debug!("No template consumed data for {}", unused.display());
    }
    Ok(rendered)
}

/// Resolves the queue, then renders all templates under `root`.
pub fn render_deferred(root: &Path, queue: PendingQueue, renderer: &dyn TemplateRenderer) -> Result<()> {
    let store = resolve(queue)?;
    let rendered = substitute(root, store, renderer)?;
    info!("Rendered {rendered} template(s)");
    Ok(())
}

/// Returns the output path of a template file, or `None` for other files.
pub fn template_target(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_str()?;
    let stripped = file_name.strip_suffix(TEMPLATE_SUFFIX)?;
    if stripped.is_empty() {
        return None;
    }
    Some(path.with_file_name(stripped))
}
