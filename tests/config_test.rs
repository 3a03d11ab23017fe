mod common;

use serde_json::json;
use strata::config::load_recipe;
use strata::error::Error;
use strata::renderer::MiniJinjaRenderer;
use tempfile::TempDir;

const RECIPE: &str = r#"
layers:
  - base
  - name: config/jsx
    when: "{{ jsx }}"
  - name: config/router
    when: "{{ router }}"
  - name: config/typescript
    when: "{{ typescript }}"
  - "code/{{ 'typescript-' if typescript }}{{ 'router' if router else 'default' }}"
  - name: entry/router-and-pinia
    when: "{{ router and pinia }}"
  - "{{ 'config/devtools' if devtools }}"
"#;

#[test]
fn test_missing_recipe() {
    let temp_dir = TempDir::new().unwrap();
    assert!(load_recipe(temp_dir.path()).unwrap().is_none());
}

#[test]
fn test_recipe_selection() {
    let temp_dir = TempDir::new().unwrap();
    common::write(temp_dir.path(), "strata.yaml", RECIPE);
    let recipe = load_recipe(temp_dir.path()).unwrap().unwrap();
    let renderer = MiniJinjaRenderer::new();

    let layers = recipe.select(&json!({}), &renderer).unwrap();
    assert_eq!(layers, ["base", "code/default"]);

    let layers = recipe
        .select(&json!({"typescript": true, "router": true, "pinia": true}), &renderer)
        .unwrap();
    assert_eq!(
        layers,
        [
            "base",
            "config/router",
            "config/typescript",
            "code/typescript-router",
            "entry/router-and-pinia"
        ]
    );

    let layers = recipe.select(&json!({"jsx": true, "devtools": true}), &renderer).unwrap();
    assert_eq!(layers, ["base", "config/jsx", "code/default", "config/devtools"]);
}

#[test]
fn test_json_recipe_takes_precedence() {
    let temp_dir = TempDir::new().unwrap();
    common::write(temp_dir.path(), "strata.json", r#"{"layers": ["from-json"]}"#);
    common::write(temp_dir.path(), "strata.yaml", "layers: [from-yaml]\n");

    let recipe = load_recipe(temp_dir.path()).unwrap().unwrap();
    let layers = recipe.select(&json!({}), &MiniJinjaRenderer::new()).unwrap();
    assert_eq!(layers, ["from-json"]);
}

#[test]
fn test_malformed_recipe() {
    let temp_dir = TempDir::new().unwrap();
    common::write(temp_dir.path(), "strata.yml", "layers: 3\n");
    assert!(matches!(load_recipe(temp_dir.path()), Err(Error::ConfigError(_))));
}

#[test]
fn test_conditions_accept_rendered_booleans() {
    let recipe = strata::config::parse_recipe(
        r#"{"layers": [
            {"name": "config/router", "when": "{{ router }}"},
            {"name": "config/pinia", "when": "{{ pinia }}"},
            {"name": "config/vitest", "when": "true"},
            {"name": "config/nightwatch", "when": "{{ router and not pinia }}"}
        ]}"#,
    )
    .unwrap();
    let layers = recipe
        .select(&json!({"router": true, "pinia": false}), &MiniJinjaRenderer::new())
        .unwrap();
    assert_eq!(layers, ["config/router", "config/vitest", "config/nightwatch"]);
}

#[test]
fn test_non_boolean_condition_is_an_error() {
    let recipe =
        strata::config::parse_recipe(r#"{"layers": [{"name": "base", "when": "{{ flavour }}"}]}"#)
            .unwrap();
    let result = recipe.select(&json!({"flavour": "vanilla"}), &MiniJinjaRenderer::new());
    assert!(matches!(result, Err(Error::ConfigError(msg)) if msg.contains("vanilla")));
}
