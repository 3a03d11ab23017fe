//! strata's main application entry point.
//! Parses arguments, prepares the output directory, picks the layers and
//! hands them to a composition run.

use std::path::{Path, PathBuf};

use strata::{
    cli::{get_args, Args},
    composer::Composition,
    config::load_recipe,
    dialect::Dialect,
    error::{default_error_handler, Error, Result},
    project::{
        can_skip_emptying, empty_dir, is_valid_package_name, seed_manifest,
        to_valid_package_name,
    },
    renderer::MiniJinjaRenderer,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Ensures the output directory is safe to compose into.
///
/// A directory that is absent, empty or only holds `.git` is used as is.
/// Anything else is emptied when `force` is set and rejected otherwise.
fn prepare_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if !can_skip_emptying(output_dir)? {
        if !force {
            return Err(Error::OutputDirectoryExistsError {
                output_dir: output_dir.display().to_string(),
            });
        }
        empty_dir(output_dir)?;
    }
    std::fs::create_dir_all(output_dir).map_err(|e| Error::file(output_dir, e))?;
    Ok(output_dir.to_path_buf())
}

/// Picks explicit layers first, then the template root's recipe.
fn select_layers(args: &Args) -> Result<Vec<String>> {
    if !args.layers.is_empty() {
        return Ok(args.layers.clone());
    }
    let recipe = load_recipe(&args.template_root)?.ok_or_else(|| {
        Error::ConfigError(format!(
            "no --layer given and no recipe found in '{}'",
            args.template_root.display()
        ))
    })?;
    recipe.select(&args.feature_context(), &MiniJinjaRenderer::new())
}

fn package_name(requested: &str) -> Result<String> {
    if is_valid_package_name(requested) {
        return Ok(requested.to_string());
    }
    let normalized = to_valid_package_name(requested);
    if !is_valid_package_name(&normalized) {
        return Err(Error::InvalidPackageName { name: requested.to_string() });
    }
    log::warn!("'{requested}' is not a valid package name, using '{normalized}'");
    Ok(normalized)
}

/// Main application logic execution.
///
/// # Flow
/// 1. Prepares the output directory
/// 2. Selects layers (explicit or from the recipe)
/// 3. Seeds the manifest when a package name is given
/// 4. Applies every layer in order
/// 5. Runs the deferred rendering pipeline and dialect reconciliation
fn run(args: Args) -> Result<()> {
    let output_root = prepare_output_dir(&args.output_dir, args.force)?;
    let layers = select_layers(&args)?;

    if let Some(requested) = &args.package_name {
        seed_manifest(&output_root, &package_name(requested)?)?;
    }

    let mut composition = Composition::new(&args.template_root, &output_root)?;
    for layer in &layers {
        composition.apply(layer)?;
        println!("Applied layer: '{layer}'");
    }
    let output_root = composition.finish(Dialect::from_typed(args.typescript))?;

    println!("Project composed successfully in {}.", output_root.display());
    Ok(())
}
