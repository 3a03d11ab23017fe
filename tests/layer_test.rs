mod common;

use globset::GlobSet;
use strata::error::Error;
use strata::ignore::parse_ignore_file;
use strata::layer::LayerRenderer;
use strata::pipeline::PendingQueue;
use strata::policy::PolicyTable;
use strata::provider::ProviderRegistry;
use tempfile::TempDir;

struct Fixture {
    templates: TempDir,
    output: TempDir,
    policies: PolicyTable,
    providers: ProviderRegistry,
    ignored: GlobSet,
}

impl Fixture {
    fn new() -> Self {
        let templates = TempDir::new().unwrap();
        let ignored = parse_ignore_file(templates.path()).unwrap();
        Self {
            templates,
            output: TempDir::new().unwrap(),
            policies: PolicyTable::default(),
            providers: ProviderRegistry::with_defaults(),
            ignored,
        }
    }

    fn apply(&self, layer: &str, pending: &mut PendingQueue) -> strata::error::Result<()> {
        LayerRenderer::new(&self.policies, &self.providers, &self.ignored).apply(
            &self.templates.path().join(layer),
            self.output.path(),
            pending,
        )
    }
}

#[test]
fn test_manifest_is_merged_and_sorted() {
    let fixture = Fixture::new();
    common::write(fixture.output.path(), "package.json", r#"{"dependencies":{"b":"1.0"},"name":"x"}"#);
    common::write(
        fixture.templates.path(),
        "feature/package.json",
        r#"{"dependencies":{"a":"2.0"},"scripts":{"dev":"run"}}"#,
    );

    fixture.apply("feature", &mut PendingQueue::default()).unwrap();

    assert_eq!(
        common::read(fixture.output.path(), "package.json"),
        "{\n  \"dependencies\": {\n    \"a\": \"2.0\",\n    \"b\": \"1.0\"\n  },\n  \"name\": \"x\",\n  \"scripts\": {\n    \"dev\": \"run\"\n  }\n}\n"
    );
}

#[test]
fn test_manifest_without_existing_target_is_copied_verbatim() {
    let fixture = Fixture::new();
    let manifest = "{\"name\":\"x\",\"dependencies\":{\"z\":\"1\",\"a\":\"1\"}}";
    common::write(fixture.templates.path(), "base/package.json", manifest);

    fixture.apply("base", &mut PendingQueue::default()).unwrap();

    assert_eq!(common::read(fixture.output.path(), "package.json"), manifest);
}

#[test]
fn test_editor_settings_are_merged_without_sorting() {
    let fixture = Fixture::new();
    common::write(fixture.templates.path(), "a/.vscode/settings.json", r#"{"z.setting": 1}"#);
    common::write(fixture.templates.path(), "b/.vscode/settings.json", r#"{"a.setting": 2}"#);

    let mut pending = PendingQueue::default();
    fixture.apply("a", &mut pending).unwrap();
    fixture.apply("b", &mut pending).unwrap();

    assert_eq!(
        common::read(fixture.output.path(), ".vscode/settings.json"),
        "{\n  \"z.setting\": 1,\n  \"a.setting\": 2\n}\n"
    );
}

#[test]
fn test_ignore_list_is_renamed_and_appended() {
    let fixture = Fixture::new();
    common::write(fixture.templates.path(), "base/_gitignore", "node_modules");
    common::write(fixture.templates.path(), "feature/_gitignore", "dist");

    let mut pending = PendingQueue::default();
    fixture.apply("base", &mut pending).unwrap();
    fixture.apply("feature", &mut pending).unwrap();

    assert_eq!(common::files(fixture.output.path()), [".gitignore"]);
    assert_eq!(common::read(fixture.output.path(), ".gitignore"), "node_modules\ndist");

    // Appending does not deduplicate.
    fixture.apply("feature", &mut pending).unwrap();
    assert_eq!(common::read(fixture.output.path(), ".gitignore"), "node_modules\ndist\ndist");
}

#[test]
fn test_underscore_files_get_dot_prefix() {
    let fixture = Fixture::new();
    common::write(fixture.templates.path(), "base/_editorconfig", "root = true\n");
    common::write(fixture.templates.path(), "base/src/_helpers/util.js", "export {}\n");

    fixture.apply("base", &mut PendingQueue::default()).unwrap();

    assert_eq!(
        common::files(fixture.output.path()),
        [".editorconfig", "src/_helpers/util.js"]
    );
}

#[test]
fn test_other_files_are_replaced() {
    let fixture = Fixture::new();
    common::write(fixture.templates.path(), "a/src/App.vue", "<template>a</template>\n");
    common::write(fixture.templates.path(), "b/src/App.vue", "<template>b</template>\n");

    let mut pending = PendingQueue::default();
    fixture.apply("a", &mut pending).unwrap();
    fixture.apply("b", &mut pending).unwrap();

    assert_eq!(common::read(fixture.output.path(), "src/App.vue"), "<template>b</template>\n");
}

#[test]
fn test_dependency_caches_are_skipped() {
    let fixture = Fixture::new();
    common::write(fixture.templates.path(), "base/index.js", "");
    common::write(fixture.templates.path(), "base/node_modules/vue/index.js", "");
    common::write(fixture.templates.path(), "base/pkg/node_modules/x.js", "");

    fixture.apply("base", &mut PendingQueue::default()).unwrap();

    assert_eq!(common::files(fixture.output.path()), ["index.js"]);
    assert!(!fixture.output.path().join("node_modules").exists());
}

#[test]
fn test_ignore_file_patterns_are_skipped() {
    let templates = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    common::write(templates.path(), ".strataignore", "# build output\n*.log\n\n");
    common::write(templates.path(), "base/debug.log", "");
    common::write(templates.path(), "base/keep.txt", "");

    let ignored = parse_ignore_file(templates.path()).unwrap();
    let policies = PolicyTable::default();
    let providers = ProviderRegistry::with_defaults();
    LayerRenderer::new(&policies, &providers, &ignored)
        .apply(&templates.path().join("base"), output.path(), &mut PendingQueue::default())
        .unwrap();

    assert_eq!(common::files(output.path()), ["keep.txt"]);
}

#[test]
fn test_data_files_are_deferred_not_copied() {
    let fixture = Fixture::new();
    common::write(fixture.templates.path(), "base/src/main.js.data.json", "{}");
    common::write(fixture.templates.path(), "base/_env.data.yaml", "a: 1\n");

    let mut pending = PendingQueue::default();
    fixture.apply("base", &mut pending).unwrap();

    assert!(common::files(fixture.output.path()).is_empty());
    let targets: Vec<String> = pending
        .iter()
        .map(|entry| entry.target.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(targets, [".env", "src/main.js"]);
}

#[test]
fn test_unknown_provider_kind_is_fatal() {
    let fixture = Fixture::new();
    common::write(fixture.templates.path(), "base/vite.config.js.data.mjs", "export default {}");

    let result = fixture.apply("base", &mut PendingQueue::default());

    assert!(matches!(result, Err(Error::UnknownProvider { kind, .. }) if kind == "mjs"));
}

#[test]
fn test_malformed_manifest_is_fatal_and_untouched() {
    let fixture = Fixture::new();
    common::write(fixture.output.path(), "package.json", "{\"name\": \"x\"}");
    common::write(fixture.templates.path(), "broken/package.json", "{\"name\": ");

    let result = fixture.apply("broken", &mut PendingQueue::default());

    assert!(matches!(result, Err(Error::MalformedData { .. })));
    assert_eq!(common::read(fixture.output.path(), "package.json"), "{\"name\": \"x\"}");
}

#[test]
fn test_missing_layer_is_fatal() {
    let fixture = Fixture::new();
    let result = fixture.apply("nope", &mut PendingQueue::default());
    assert!(matches!(result, Err(Error::MissingLayer { .. })));
}
