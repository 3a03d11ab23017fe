//! Command-line interface implementation for strata.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for strata.
#[derive(Parser, Debug)]
#[command(author, version, about = "strata: layered project scaffolding", long_about = None)]
pub struct Args {
    /// Directory holding the template layers
    #[arg(value_name = "TEMPLATE_ROOT")]
    pub template_root: PathBuf,

    /// Directory where the project will be composed
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Layer to apply, relative to the template root. Repeat to apply several
    /// layers in order. Overrides the template root's recipe.
    #[arg(short, long = "layer", value_name = "NAME")]
    pub layers: Vec<String>,

    /// Feature flag used to select layers from the recipe. Repeatable.
    #[arg(short = 'F', long = "feature", value_name = "NAME")]
    pub features: Vec<String>,

    /// Produce TypeScript sources instead of JavaScript ones
    #[arg(long, visible_alias = "ts")]
    pub typescript: bool,

    /// Write an initial package.json with this name before applying layers
    #[arg(long, value_name = "NAME")]
    pub package_name: Option<String>,

    /// Empty a non-empty output directory before composing
    #[arg(short, long)]
    pub force: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Feature context used to render recipe entries.
    pub fn feature_context(&self) -> serde_json::Value {
        let mut context = serde_json::Map::new();
        for feature in &self.features {
            context.insert(feature.clone(), serde_json::Value::Bool(true));
        }
        if self.typescript {
            context.insert("typescript".to_string(), serde_json::Value::Bool(true));
        }
        serde_json::Value::Object(context)
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
