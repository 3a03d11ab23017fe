//! strata composes project skeletons from layered templates.
//! Layers are applied in order onto one destination tree; structured
//! configuration files are merged instead of overwritten, and data-bound
//! templates are rendered once every layer has been applied.

/// Command-line interface module for the strata binary
pub mod cli;

/// Composition runs tying layers, deferred rendering and reconciliation together
pub mod composer;

/// Recipe handling: which layers a template root offers and when
/// Supports JSON and YAML formats (strata.json, strata.yml, strata.yaml)
pub mod config;

/// Common constants and reserved naming conventions
pub mod constants;

/// Plain/typed source reconciliation after composition
pub mod dialect;

/// Error types and handling for strata
pub mod error;

/// Paths never copied out of a layer
/// Processes .strataignore files in the template root
pub mod ignore;

/// Reproduction of a single layer into the destination tree
pub mod layer;

/// Structural JSON merging and dependency sorting
pub mod merge;

/// Deferred data resolution and template substitution
pub mod pipeline;

/// File name to merge strategy table
pub mod policy;

/// Output directory preparation helpers
pub mod project;

/// Data providers for data-bound files
pub mod provider;

/// Template rendering functionality
pub mod renderer;

/// Deterministic directory traversal
pub mod traverse;
