//! Recipe handling for template roots.
//! A recipe lists the layers of a template root in application order, each
//! optionally guarded by a condition over the selected features.

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::constants::RECIPE_FILES;
use crate::error::{Error, Result};
use crate::renderer::TemplateRenderer;

/// One recipe entry: a bare layer name or a conditional layer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LayerEntry {
    Name(String),
    Conditional {
        name: String,
        #[serde(default = "always")]
        when: String,
    },
}

fn always() -> String {
    "true".to_string()
}

impl LayerEntry {
    fn parts(&self) -> (&str, &str) {
        match self {
            LayerEntry::Name(name) => (name.as_str(), "true"),
            LayerEntry::Conditional { name, when } => (name.as_str(), when.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Recipe {
    pub layers: Vec<LayerEntry>,
}

/// Loads the recipe of a template root, trying [`RECIPE_FILES`] in order.
///
/// # Returns
/// * `Result<Option<Recipe>>` - `None` when the template root has no recipe
///
/// # Errors
/// * `Error::ConfigError` if the recipe exists but cannot be parsed
pub fn load_recipe<P: AsRef<Path>>(template_root: P) -> Result<Option<Recipe>> {
    for file in RECIPE_FILES {
        let recipe_path = template_root.as_ref().join(file);
        if recipe_path.is_file() {
            debug!("Loading recipe from {}", recipe_path.display());
            let content =
                std::fs::read_to_string(&recipe_path).map_err(|e| Error::file(&recipe_path, e))?;
            return parse_recipe(&content).map(Some);
        }
    }
    Ok(None)
}

/// Parses a recipe, as JSON first and then as YAML.
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    match serde_json::from_str(content) {
        Ok(recipe) => Ok(recipe),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid recipe format: {e}"))),
    }
}

impl Recipe {
    /// Selects the layers to apply for `features`.
    ///
    /// Each entry's `name` and `when` are rendered with `features` as the
    /// context. An entry is kept when `when` renders to `true` (any case);
    /// `false`, `none` and blank renderings drop it. Blank rendered names are
    /// dropped too.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a condition renders to anything else
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use strata::config::parse_recipe;
    /// use strata::renderer::MiniJinjaRenderer;
    ///
    /// let recipe = parse_recipe(r#"{"layers": [
    ///     "base",
    ///     {"name": "config/router", "when": "{{ router }}"},
    ///     "code/{{ 'router' if router else 'default' }}"
    /// ]}"#).unwrap();
    /// let layers = recipe.select(&json!({"router": true}), &MiniJinjaRenderer::new()).unwrap();
    /// assert_eq!(layers, ["base", "config/router", "code/router"]);
    /// ```
    pub fn select(
        &self,
        features: &serde_json::Value,
        engine: &dyn TemplateRenderer,
    ) -> Result<Vec<String>> {
        let mut selected = Vec::new();
        for entry in &self.layers {
            let (name, when) = entry.parts();
            let when_rendered = engine.render(when, features)?;
            if !condition_holds(name, &when_rendered)? {
                debug!("Skipping layer '{name}' (when: '{when_rendered}')");
                continue;
            }

            let name = engine.render(name, features)?;
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            selected.push(name.to_string());
        }
        Ok(selected)
    }
}

/// Interprets a rendered `when` condition.
///
/// minijinja prints booleans as `True`/`False` and undefined values as
/// nothing, so both spellings are accepted.
fn condition_holds(name: &str, rendered: &str) -> Result<bool> {
    let rendered = rendered.trim();
    if rendered.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if rendered.is_empty()
        || rendered.eq_ignore_ascii_case("false")
        || rendered.eq_ignore_ascii_case("none")
    {
        Ok(false)
    } else {
        Err(Error::ConfigError(format!(
            "condition of layer '{name}' rendered to '{rendered}', expected true or false"
        )))
    }
}
