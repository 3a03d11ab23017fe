//! Error handling for strata.
//! Defines the error type and result alias used throughout the composition engine.

use std::io;
use thiserror::Error;

/// Errors that can occur while composing a project.
///
/// Every variant is fatal for the current composition: the engine stops at the
/// first error and leaves the destination tree as it was at that point.
#[derive(Error, Debug)]
pub enum Error {
    /// File system errors with the offending path attached
    #[error("Failed to access '{path}': {source}.")]
    FileError {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Directory traversal failures (unreadable directory, failed stat)
    #[error("Traversal error: {0}.")]
    WalkError(#[from] walkdir::Error),

    #[error("Layer '{name}' does not exist at '{path}'.")]
    MissingLayer { name: String, path: String },

    #[error("Invalid layer name '{name}': layer names must be relative paths inside the template root.")]
    InvalidLayerName { name: String },

    /// A structured file involved in a merge could not be parsed
    #[error("Malformed data in '{path}': {reason}.")]
    MalformedData { path: String, reason: String },

    #[error("No data provider registered for kind '{kind}' (required by '{path}').")]
    UnknownProvider { kind: String, path: String },

    #[error("Data provider for '{path}' failed: {reason}.")]
    ProviderError { path: String, reason: String },

    /// Represents errors that occur during template processing
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Entry document '{path}' is missing, cannot rewrite its entry reference.")]
    MissingEntryDocument { path: String },

    /// Represents errors that occur during recipe parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents errors in processing ignore patterns
    #[error("Ignore error: {0}.")]
    IgnoreError(String),

    #[error("Output directory '{output_dir}' is not empty. Use --force to overwrite it.")]
    OutputDirectoryExistsError { output_dir: String },

    #[error("Invalid package name '{name}'.")]
    InvalidPackageName { name: String },
}

/// Convenience type alias for Results with strata's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an I/O error with the path it occurred on.
    pub fn file<P: AsRef<std::path::Path>>(path: P, source: io::Error) -> Self {
        Error::FileError { path: path.as_ref().display().to_string(), source }
    }
}

/// Default error handler that prints the error and exits the program.
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
