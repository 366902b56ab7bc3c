//! Error types for template expansion

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::expr::EvalError;
use crate::html::MarkupError;

/// Failure to expand a single template reference element
///
/// These are collected per document; one failing element never stops the
/// remaining elements from being attempted.
#[derive(Debug, Error)]
pub enum ExpansionError {
    /// The reference element has no source attribute
    #[error("template element #{index} is missing a '{attribute}' attribute")]
    MissingSourceAttribute { index: usize, attribute: String },

    /// The fragment file could not be read
    #[error("could not find template import src: {}", path.display())]
    FragmentNotFound { path: PathBuf, source: io::Error },

    /// Evaluating the fragment failed; the message is the evaluator's, unchanged
    #[error("{error}")]
    Evaluation {
        path: PathBuf,
        error: EvalError,
        fragment: String,
    },

    /// Reading arguments or parsing the expansion output as markup failed
    #[error("invalid markup for template {}: {error}", path.display())]
    FragmentMarkup { path: PathBuf, error: MarkupError },

    /// Nested expansion went deeper than the configured limit
    #[error("template element #{index} exceeds the nesting limit of {limit}")]
    DepthExceeded { index: usize, limit: usize },
}

impl ExpansionError {
    /// Fragment file the error relates to, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ExpansionError::FragmentNotFound { path, .. }
            | ExpansionError::Evaluation { path, .. }
            | ExpansionError::FragmentMarkup { path, .. } => Some(path),
            ExpansionError::MissingSourceAttribute { .. }
            | ExpansionError::DepthExceeded { .. } => None,
        }
    }

    /// Source-annotated diagnostic for evaluation errors
    pub fn report(&self) -> Option<String> {
        match self {
            ExpansionError::Evaluation {
                path,
                error,
                fragment,
            } => Some(error.format(fragment, &path.display().to_string())),
            _ => None,
        }
    }
}
