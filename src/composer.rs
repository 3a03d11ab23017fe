//! Composition runs.
//!
//! A [`Composition`] owns everything one run needs: the template and output
//! roots, the merge policies, the data providers and the pending queue. Layers
//! are applied in order with [`Composition::apply`]; [`Composition::finish`]
//! consumes the run, so the deferred phase and the reconciler happen once.

use std::fs;
use std::path::{Component, Path, PathBuf};

use globset::GlobSet;
use log::info;

use crate::dialect::{reconcile, Dialect, DialectRules};
use crate::error::{Error, Result};
use crate::ignore::parse_ignore_file;
use crate::layer::LayerRenderer;
use crate::pipeline::{render_deferred, PendingQueue};
use crate::policy::{MergeStrategy, PolicyTable};
use crate::provider::{DataProvider, ProviderRegistry};
use crate::renderer::{MiniJinjaRenderer, TemplateRenderer};

pub struct Composition {
    template_root: PathBuf,
    output_root: PathBuf,
    policies: PolicyTable,
    providers: ProviderRegistry,
    ignored: GlobSet,
    renderer: Box<dyn TemplateRenderer>,
    rules: DialectRules,
    pending: PendingQueue,
    applied: Vec<String>,
}

impl Composition {
    /// Starts a run composing layers of `template_root` into `output_root`.
    ///
    /// The output root is created if needed. Whether an existing output root
    /// should be emptied first is the caller's decision.
    pub fn new<T, O>(template_root: T, output_root: O) -> Result<Self>
    where
        T: AsRef<Path>,
        O: AsRef<Path>,
    {
        let template_root = template_root.as_ref().to_path_buf();
        let output_root = output_root.as_ref().to_path_buf();
        if !template_root.is_dir() {
            return Err(Error::ConfigError(format!(
                "template root '{}' is not a directory",
                template_root.display()
            )));
        }
        fs::create_dir_all(&output_root).map_err(|e| Error::file(&output_root, e))?;
        let ignored = parse_ignore_file(&template_root)?;

        Ok(Self {
            template_root,
            output_root,
            policies: PolicyTable::default(),
            providers: ProviderRegistry::with_defaults(),
            ignored,
            renderer: Box::new(MiniJinjaRenderer::new()),
            rules: DialectRules::default(),
            pending: PendingQueue::default(),
            applied: Vec::new(),
        })
    }

    /// Registers a data provider for `<target>.data.<kind>` files.
    pub fn with_provider<S, P>(mut self, kind: S, provider: P) -> Self
    where
        S: Into<String>,
        P: DataProvider + 'static,
    {
        self.providers.register(kind, provider);
        self
    }

    pub fn with_policy<S: Into<String>>(mut self, file_name: S, strategy: MergeStrategy) -> Self {
        self.policies.insert(file_name, strategy);
        self
    }

    pub fn with_renderer(mut self, renderer: Box<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_dialect_rules(mut self, rules: DialectRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Pending data providers registered by the layers applied so far.
    pub fn pending(&self) -> &PendingQueue {
        &self.pending
    }

    /// Names of the layers applied so far, in order.
    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    /// Applies the layer `name` (a path relative to the template root).
    ///
    /// # Errors
    /// * `Error::InvalidLayerName` for absolute names, names leaving the root
    ///   or names naming the root itself (`.`)
    /// * `Error::MissingLayer` if the layer directory does not exist
    pub fn apply(&mut self, name: &str) -> Result<()> {
        let source = self.layer_dir(name)?;
        info!("Applying layer '{name}'");

        LayerRenderer::new(&self.policies, &self.providers, &self.ignored).apply(
            &source,
            &self.output_root,
            &mut self.pending,
        )?;
        self.applied.push(name.to_string());
        Ok(())
    }

    /// Runs the deferred rendering pipeline and reconciles `dialect`.
    pub fn finish(self, dialect: Dialect) -> Result<PathBuf> {
        render_deferred(&self.output_root, self.pending, self.renderer.as_ref())?;
        reconcile(&self.output_root, dialect, &self.rules)?;
        info!("Composed {} layer(s) into {}", self.applied.len(), self.output_root.display());
        Ok(self.output_root)
    }

    fn layer_dir(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let is_valid = !name.trim().is_empty()
            && relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && relative.components().any(|c| matches!(c, Component::Normal(_)));
        if !is_valid {
            return Err(Error::InvalidLayerName { name: name.to_string() });
        }

        let source = self.template_root.join(relative);
        if !source.is_dir() {
            return Err(Error::MissingLayer {
                name: name.to_string(),
                path: source.display().to_string(),
            });
        }
        Ok(source)
    }
}

/// Composes `layers` of `template_root` into `output_root` in one run.
///
/// # Example
/// ```no_run
/// use strata::composer::compose;
/// use strata::dialect::Dialect;
///
/// compose("templates", "my-app", &["base", "config/router"], Dialect::Typed)?;
/// # Ok::<(), strata::error::Error>(())
/// ```
pub fn compose<T, O, S>(template_root: T, output_root: O, layers: &[S], dialect: Dialect) -> Result<PathBuf>
where
    T: AsRef<Path>,
    O: AsRef<Path>,
    S: AsRef<str>,
{
    let mut composition = Composition::new(template_root, output_root)?;
    for layer in layers {
        composition.apply(layer.as_ref())?;
    }
    composition.finish(dialect)
}
