//! Data providers for data-bound template files.
//!
//! A layer file named `<target>.data.<kind>` is not copied. Instead the
//! provider registered for `<kind>` is called during the deferred phase with
//! the data accumulated so far for `<target>` and returns the new value.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::constants::DATA_SUFFIX;
use crate::error::{Error, Result};
use crate::merge::deep_merge;

/// Produces the data context of one destination file.
pub trait DataProvider {
    /// Computes new data from the provider file at `source`.
    ///
    /// `seed` is the value resolved by earlier providers for the same
    /// destination, or an empty object when this is the first one.
    fn provide(&self, source: &Path, seed: Value) -> Result<Value>;
}

/// Reads the provider file as JSON and folds it into the seed.
#[derive(Debug, Default)]
pub struct JsonProvider;

impl DataProvider for JsonProvider {
    fn provide(&self, source: &Path, seed: Value) -> Result<Value> {
        let content = fs::read_to_string(source).map_err(|e| Error::file(source, e))?;
        let data: Value = serde_json::from_str(&content).map_err(|e| Error::MalformedData {
            path: source.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(deep_merge(&seed, &data))
    }
}

/// Reads the provider file as YAML and folds it into the seed.
#[derive(Debug, Default)]
pub struct YamlProvider;

impl DataProvider for YamlProvider {
    fn provide(&self, source: &Path, seed: Value) -> Result<Value> {
        let content = fs::read_to_string(source).map_err(|e| Error::file(source, e))?;
        let data: Value = serde_yaml::from_str(&content).map_err(|e| Error::MalformedData {
            path: source.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(deep_merge(&seed, &data))
    }
}

/// Adapts a closure into a [`DataProvider`].
///
/// # Example
/// ```
/// use std::path::Path;
/// use serde_json::{json, Value};
/// use strata::provider::{DataProvider, FnProvider};
///
/// let counter = FnProvider::new(|_source: &Path, seed: Value| {
///     let count = seed.get("count").and_then(Value::as_u64).unwrap_or(0);
///     Ok(json!({ "count": count + 1 }))
/// });
/// let value = counter.provide(Path::new("unused"), json!({"count": 1})).unwrap();
/// assert_eq!(value, json!({"count": 2}));
/// ```
pub struct FnProvider<F> {
    func: F,
}

impl<F> FnProvider<F>
where
    F: Fn(&Path, Value) -> Result<Value>,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> DataProvider for FnProvider<F>
where
    F: Fn(&Path, Value) -> Result<Value>,
{
    fn provide(&self, source: &Path, seed: Value) -> Result<Value> {
        (self.func)(source, seed)
    }
}

/// Looks up providers by the `<kind>` part of a data-bound file name.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn DataProvider>>,
}

impl ProviderRegistry {
    /// Creates a registry with the `json`, `yaml` and `yml` providers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();
        registry.register("json", JsonProvider);
        let yaml: Arc<dyn DataProvider> = Arc::new(YamlProvider);
        registry.register_shared("yaml", Arc::clone(&yaml));
        registry.register_shared("yml", yaml);
        registry
    }

    /// Registers `provider` for `kind`, replacing any previous one.
    pub fn register<S, P>(&mut self, kind: S, provider: P)
    where
        S: Into<String>,
        P: DataProvider + 'static,
    {
        self.register_shared(kind, Arc::new(provider));
    }

    pub fn register_shared<S: Into<String>>(&mut self, kind: S, provider: Arc<dyn DataProvider>) {
        self.providers.insert(kind.into(), provider);
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn DataProvider>> {
        self.providers.get(kind).cloned()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<&String> = self.providers.keys().collect();
        kinds.sort();
        f.debug_struct("ProviderRegistry").field("kinds", &kinds).finish()
    }
}

/// Splits a data-bound file name into its target name and provider kind.
///
/// Returns `None` for ordinary files.
///
/// # Example
/// ```
/// use strata::provider::split_data_file_name;
///
/// assert_eq!(
///     split_data_file_name("vite.config.js.data.json"),
///     Some(("vite.config.js", "json"))
/// );
/// assert_eq!(split_data_file_name("data.json"), None);
/// ```
pub fn split_data_file_name(file_name: &str) -> Option<(&str, &str)> {
    let (stem, kind) = file_name.rsplit_once('.')?;
    let target = stem.strip_suffix(DATA_SUFFIX)?;
    if target.is_empty() || kind.is_empty() {
        return None;
    }
    Some((target, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_data_file_name() {
        assert_eq!(split_data_file_name("main.js.data.yaml"), Some(("main.js", "yaml")));
        assert_eq!(split_data_file_name("README.md"), None);
        assert_eq!(split_data_file_name(".data.json"), None);
        assert_eq!(split_data_file_name("metadata.json"), None);
    }

    #[test]
    fn test_default_kinds() {
        let registry = ProviderRegistry::with_defaults();
        assert!(registry.get("json").is_some());
        assert!(registry.get("yaml").is_some());
        assert!(registry.get("yml").is_some());
        assert!(registry.get("mjs").is_none());
    }
}
