//! Output directory preparation done by callers before composing.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::constants::VCS_DIR;
use crate::error::{Error, Result};
use crate::traverse::post_order;

static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:@[a-z0-9\-*~][a-z0-9\-*._~]*/)?[a-z0-9\-~][a-z0-9\-._~]*$")
        .expect("package name pattern is valid")
});
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static INVALID_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-~]+").expect("invalid run pattern is valid"));

/// Returns true when `dir` can be composed into without emptying it first:
/// it does not exist, is empty, or only holds a `.git` directory.
pub fn can_skip_emptying<P: AsRef<Path>>(dir: P) -> Result<bool> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(true);
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::file(dir, e))? {
        let entry = entry.map_err(|e| Error::file(dir, e))?;
        names.push(entry.file_name());
    }
    Ok(names.is_empty() || (names.len() == 1 && names[0] == VCS_DIR))
}

/// Removes everything inside `dir` except `.git`, keeping `dir` itself.
pub fn empty_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    debug!("Emptying {}", dir.display());
    post_order(
        dir,
        |path| fs::remove_dir(path).map_err(|e| Error::file(path, e)),
        |path| fs::remove_file(path).map_err(|e| Error::file(path, e)),
    )
}

/// Checks a package name against npm naming rules.
pub fn is_valid_package_name(name: &str) -> bool {
    PACKAGE_NAME.is_match(name)
}

/// Turns an arbitrary project name into a valid package name candidate.
///
/// # Example
/// ```
/// use strata::project::to_valid_package_name;
///
/// assert_eq!(to_valid_package_name("  My Vue App "), "my-vue-app");
/// assert_eq!(to_valid_package_name(".hidden"), "hidden");
/// ```
pub fn to_valid_package_name(name: &str) -> String {
    let name = name.trim().to_lowercase();
    let name = WHITESPACE.replace_all(&name, "-");
    let name = name.strip_prefix(['.', '_']).unwrap_or(&name);
    INVALID_RUN.replace_all(name, "-").into_owned()
}

/// Writes the initial manifest `{"name": <package_name>, "version": "0.0.0"}`
/// into `root`, so the layers' manifests merge into it.
pub fn seed_manifest<P: AsRef<Path>>(root: P, package_name: &str) -> Result<()> {
    let manifest = serde_json::json!({ "name": package_name, "version": "0.0.0" });
    let path = root.as_ref().join("package.json");
    let content = serde_json::to_string_pretty(&manifest).map_err(|e| Error::MalformedData {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!("Seeding manifest: {}", path.display());
    fs::write(&path, content + "\n").map_err(|e| Error::file(&path, e))
}
