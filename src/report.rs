//! Progress and failure reporting for bundling runs
//!
//! The library never prints. Callers pass a [`Reporter`] into the engine and
//! the batch runner; the CLI uses [`TracingReporter`].

use std::path::Path;

use crate::error::ExpansionError;
use crate::BundleError;

/// Receives bundling events. Every hook defaults to doing nothing.
pub trait Reporter {
    /// A document is about to be bundled
    fn bundling(&self, _source: &Path, _target: &Path) {}

    /// A fragment file was read for expansion
    fn fragment_loaded(&self, _path: &Path) {}

    /// One reference element failed to expand
    fn expansion_failed(&self, _error: &ExpansionError) {}

    /// A bundled document was written
    fn document_written(&self, _target: &Path) {}

    /// A document failed as a whole
    fn document_failed(&self, _source: &Path, _error: &BundleError) {}
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Emits events through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter {
    diagnostics: bool,
}

impl TracingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print source-annotated reports for evaluation errors
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }
}

impl Reporter for TracingReporter {
    fn bundling(&self, source: &Path, target: &Path) {
        tracing::info!("Bundling: {} to {}", source.display(), target.display());
    }

    fn fragment_loaded(&self, path: &Path) {
        tracing::debug!("Found template import src: {}", path.display());
    }

    fn expansion_failed(&self, error: &ExpansionError) {
        match error.path() {
            Some(path) => tracing::error!(fragment = %path.display(), "{}", error),
            None => tracing::error!("{}", error),
        }
        if self.diagnostics {
            if let Some(report) = error.report() {
                eprint!("{}", report);
            }
        }
    }

    fn document_written(&self, target: &Path) {
        tracing::info!("Wrote {}", target.display());
    }

    fn document_failed(&self, source: &Path, error: &BundleError) {
        match error {
            // Element errors were already reported one by one
            BundleError::Expansion(errors) => tracing::error!(
                "{} failed with {} template error(s)",
                source.display(),
                errors.len()
            ),
            other => tracing::error!("{}: {}", source.display(), other),
        }
    }
}
