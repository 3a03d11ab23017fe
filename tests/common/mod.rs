#![allow(dead_code)]

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

pub fn write<P: AsRef<Path>>(root: P, relative: &str, content: &str) {
    let path = root.as_ref().join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read<P: AsRef<Path>>(root: P, relative: &str) -> String {
    fs::read_to_string(root.as_ref().join(relative)).unwrap()
}

/// Every file under `root`, relative and sorted, with `/` separators.
pub fn files<P: AsRef<Path>>(root: P) -> Vec<String> {
    let root = root.as_ref();
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// A small template root resembling a front-end starter.
pub fn sample_templates<P: AsRef<Path>>(root: P) {
    let root = root.as_ref();
    write(root, "base/package.json", r#"{
  "name": "base",
  "private": true,
  "scripts": { "dev": "vite" },
  "dependencies": { "vue": "^3.4.0" },
  "devDependencies": { "vite": "^5.0.0" }
}
"#);
    write(root, "base/_gitignore", "node_modules\ndist\n");
    write(root, "base/index.html", "<script type=\"module\" src=\"/src/main.js\"></script>\n");
    write(root, "base/.vscode/extensions.json", r#"{ "recommendations": ["Vue.volar"] }"#);
    write(
        root,
        "base/vite.config.js.j2",
        "{% for plugin in plugins %}{{ plugin.importer }}\n{% endfor %}export default { plugins: [{{ plugins | map(attribute='initializer') | join(', ') }}] }\n",
    );
    write(
        root,
        "base/vite.config.js.data.json",
        r#"{ "plugins": [{ "id": "vue", "importer": "import vue from '@vitejs/plugin-vue'", "initializer": "vue()" }] }"#,
    );
    write(root, "base/node_modules/left-pad/index.js", "module.exports = 1\n");

    write(root, "config/jsx/package.json", r#"{ "devDependencies": { "@vitejs/plugin-vue-jsx": "^3.1.0" } }"#);
    write(
        root,
        "config/jsx/vite.config.js.data.yaml",
        "plugins:\n  - id: jsx\n    importer: import vueJsx from '@vitejs/plugin-vue-jsx'\n    initializer: vueJsx()\n",
    );
    write(root, "config/jsx/.vscode/extensions.json", r#"{ "recommendations": ["Vue.volar", "dbaeumer.vscode-eslint"] }"#);

    write(root, "code/default/src/main.js", "import { createApp } from 'vue'\n");
    write(root, "code/default/src/env.d.ts", "/// <reference types=\"vite/client\" />\n");
    write(root, "code/default/jsconfig.json", "{}\n");
    write(root, "code/typescript-default/src/main.ts", "import { createApp } from 'vue'\n// typed\n");
}
