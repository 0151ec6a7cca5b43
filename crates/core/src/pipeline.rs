//! The end-to-end generation pipeline.
//!
//! For each configured shape, in catalog order: fetch, parse the profile, build the metric,
//! record. Only after every shape succeeds is the document rendered and written, so the
//! first error of any kind leaves the output path untouched.

use std::path::PathBuf;
use std::sync::Arc;

use ansatz_expr::{parse, Expr, SymbolTable};

use crate::config::AnsatzConfig;
use crate::error::ParseError;
use crate::metric::build_metric;
use crate::render::{DocumentRenderer, RenderRecord};
use crate::shapes::{load_shape, ShapeSource};
use crate::{AnsatzError, AnsatzResult};

/// Generates the metric ansatz document from a shape source.
pub struct AnsatzService<S> {
    cfg: Arc<AnsatzConfig>,
    source: S,
    symbols: SymbolTable,
    renderer: DocumentRenderer,
}

impl<S: ShapeSource> AnsatzService<S> {
    /// Creates a service that parses profiles against [`SymbolTable::spherical`].
    pub fn new(cfg: Arc<AnsatzConfig>, source: S) -> Self {
        Self::with_symbols(cfg, source, SymbolTable::spherical())
    }

    pub fn with_symbols(cfg: Arc<AnsatzConfig>, source: S, symbols: SymbolTable) -> Self {
        Self {
            cfg,
            source,
            symbols,
            renderer: DocumentRenderer::new(),
        }
    }

    /// Fetches, parses and validates every configured shape, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first `Fetch`, `Parse` or `Build` error encountered.
    pub fn collect_records(&self) -> AnsatzResult<Vec<RenderRecord>> {
        let r = Expr::symbol("r");
        let theta = Expr::symbol("theta");
        let catalog = self.cfg.catalog();
        let mut records = Vec::with_capacity(catalog.len());

        for entry in catalog.iter() {
            let shape = load_shape(&self.source, &entry.name, &entry.locator)?;

            let profile = parse(&shape.profile_expression, &self.symbols).map_err(|source| {
                ParseError::Expression {
                    shape: shape.name.to_string(),
                    source,
                }
            })?;
            tracing::debug!(
                "parsed profile for {}: {} (symbols: {:?})",
                shape.name,
                profile,
                profile.free_symbols()
            );

            build_metric(&profile, &r, &theta).map_err(|source| AnsatzError::Build {
                shape: shape.name.to_string(),
                source,
            })?;

            records.push(RenderRecord::from_descriptor(&shape));
        }

        Ok(records)
    }

    /// Renders the full document text without writing it.
    pub fn render(&self) -> AnsatzResult<String> {
        let records = self.collect_records()?;
        Ok(self.renderer.render(&records))
    }

    /// Runs the pipeline and writes the document to the configured output path.
    ///
    /// # Returns
    ///
    /// The path that was written.
    ///
    /// # Errors
    ///
    /// Returns the first error of any kind; on error no document is written.
    pub fn generate(&self) -> AnsatzResult<PathBuf> {
        let document = self.render()?;
        let path = self.cfg.output_path();
        self.renderer.write(path, &document)?;
        tracing::info!(
            "generated {} with {} shape(s)",
            path.display(),
            self.cfg.catalog().len()
        );
        Ok(path.to_path_buf())
    }
}
