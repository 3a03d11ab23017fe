//! Common constants used throughout strata.

/// Supported recipe file names, in lookup order
pub const RECIPE_FILES: [&str; 3] = ["strata.json", "strata.yml", "strata.yaml"];

/// strata's ignore file name, read from the template root
pub const IGNORE_FILE: &str = ".strataignore";

/// Patterns that are never copied out of a layer
pub const DEFAULT_IGNORE_PATTERNS: [&str; 2] = ["**/node_modules", "**/.DS_Store"];

/// Suffix marking a file that is rendered during the deferred phase
pub const TEMPLATE_SUFFIX: &str = ".j2";

/// First half of the dual suffix marking a data-bound file: `<target>.data.<kind>`
pub const DATA_SUFFIX: &str = ".data";

/// Leading character replaced by `.` when a file is written
pub const DOT_PREFIX: char = '_';

/// Directory left untouched by destination traversals
pub const VCS_DIR: &str = ".git";

/// Dependency groups of a manifest that are sorted after a merge
pub const DEPENDENCY_FIELDS: [&str; 4] =
    ["dependencies", "devDependencies", "peerDependencies", "optionalDependencies"];
