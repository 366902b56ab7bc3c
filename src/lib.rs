//! html-tmpl - A static HTML bundler that inlines reusable template fragments
//!
//! Documents reference fragment files with `<tmpl src="...">` elements. Each
//! direct child element of a reference is an argument, bound by tag name while
//! the fragment is evaluated as a template string with `${...}` placeholders.
//! The reference element is then replaced by the parsed result, and any
//! references the result introduces are expanded in turn.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use html_tmpl::{bundle_with, BundleConfig, MemorySource, SilentReporter};
//!
//! let fragments = MemorySource::new().with("site/greet.tmpl", "`Hello, ${name}!`");
//! let html = bundle_with(
//!     r#"<p><tmpl src="greet.tmpl"><name>World</name></tmpl></p>"#,
//!     Path::new("site"),
//!     &BundleConfig::default(),
//!     &fragments,
//!     &SilentReporter,
//! )
//! .unwrap();
//!
//! assert!(html.contains("<p>Hello, World!</p>"));
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod expr;
pub mod html;
pub mod report;
pub mod template;

pub use batch::{BatchError, BatchJob, BatchReport, OutputMode, StatusCode};
pub use config::{BundleConfig, ConfigError};
pub use error::ExpansionError;
pub use expr::EvalError;
pub use html::{Document, MarkupError};
pub use report::{Reporter, SilentReporter, TracingReporter};
pub use template::{
    DiskSource, FragmentSource, MemorySource, Resolution, ResolutionContext, Resolver,
};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that end the bundling of one document
#[derive(Debug, Error)]
pub enum BundleError {
    /// The source document could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The source document could not be parsed
    #[error("failed to parse document: {0}")]
    Parse(#[source] MarkupError),

    /// One or more reference elements failed to expand
    #[error("template errors: {}", format_expansion_errors(.0))]
    Expansion(Vec<ExpansionError>),

    /// The resolved document could not be serialized
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] MarkupError),

    /// The bundled output could not be written
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl From<Vec<ExpansionError>> for BundleError {
    fn from(errors: Vec<ExpansionError>) -> Self {
        BundleError::Expansion(errors)
    }
}

fn format_expansion_errors(errors: &[ExpansionError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Bundle HTML source, reading fragments from disk relative to `base_dir`
pub fn bundle_str(source: &str, base_dir: &Path, config: &BundleConfig) -> Result<String, BundleError> {
    bundle_with(source, base_dir, config, &DiskSource, &TracingReporter::new())
}

/// Bundle HTML source with an explicit fragment source and reporter
///
/// Returns the serialized document when every reference element expanded.
/// Any element failure makes the whole result an error; no partial output is
/// returned.
pub fn bundle_with(
    source: &str,
    base_dir: &Path,
    config: &BundleConfig,
    fragments: &dyn FragmentSource,
    reporter: &dyn Reporter,
) -> Result<String, BundleError> {
    let doc = Document::parse(source).map_err(BundleError::Parse)?;

    let ctx = ResolutionContext::from_config(base_dir, config);
    Resolver::new(ctx, fragments, reporter).resolve(&doc)?;

    doc.serialize().map_err(BundleError::Serialize)
}

/// Bundle one file from disk and write the result
///
/// Fragments are resolved against the source file's directory. The target's
/// parent directory is created when missing. Nothing is written on failure.
pub fn bundle_file(
    source_path: &Path,
    target_path: &Path,
    config: &BundleConfig,
    reporter: &dyn Reporter,
) -> Result<(), BundleError> {
    reporter.bundling(source_path, target_path);

    let source = fs::read_to_string(source_path).map_err(|e| BundleError::Read {
        path: source_path.to_path_buf(),
        source: e,
    })?;
    let base_dir = source_path.parent().unwrap_or_else(|| Path::new(""));

    let output = bundle_with(&source, base_dir, config, &DiskSource, reporter)?;

    let write = |e| BundleError::Write {
        path: target_path.to_path_buf(),
        source: e,
    };
    if let Some(dir) = target_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(write)?;
    }
    fs::write(target_path, output).map_err(write)?;

    reporter.document_written(target_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bundle_with_memory_fragments() {
        let fragments = MemorySource::new().with("greet.tmpl", "`Hello, ${name}!`");
        let html = bundle_with(
            r#"<!DOCTYPE html><p><tmpl src="greet.tmpl"><name>World</name></tmpl></p>"#,
            Path::new(""),
            &BundleConfig::default(),
            &fragments,
            &SilentReporter,
        )
        .unwrap();
        assert_eq!(
            html,
            "<!DOCTYPE html><html><head></head><body><p>Hello, World!</p></body></html>"
        );
    }

    #[test]
    fn test_expansion_errors_are_joined() {
        let err = bundle_with(
            r#"<tmpl></tmpl><tmpl src="missing.tmpl"></tmpl>"#,
            Path::new(""),
            &BundleConfig::default(),
            &MemorySource::new(),
            &SilentReporter,
        )
        .unwrap_err();
        match &err {
            BundleError::Expansion(errors) => assert_eq!(errors.len(), 2),
            other => panic!("Expected expansion errors, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "template errors: template element #1 is missing a 'src' attribute; \
             could not find template import src: missing.tmpl"
        );
    }

    #[test]
    fn test_bundle_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.tmpl"), "<em>${x}</em>").unwrap();
        let source = dir.path().join("page.html");
        fs::write(&source, r#"<tmpl src="a.tmpl"><x>1</x></tmpl>"#).unwrap();
        let target = dir.path().join("out").join("page.tmpl.html");

        bundle_file(&source, &target, &BundleConfig::default(), &SilentReporter).unwrap();

        let written = fs::read_to_string(&target).unwrap();
        assert!(written.contains("<em>1</em>"));
    }

    #[test]
    fn test_bundle_file_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("page.html");
        fs::write(&source, "<tmpl></tmpl>").unwrap();
        let target = dir.path().join("page.tmpl.html");

        let result = bundle_file(&source, &target, &BundleConfig::default(), &SilentReporter);
        assert!(matches!(result, Err(BundleError::Expansion(_))));
        assert!(!target.exists());
    }

    #[test]
    fn test_bundle_file_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let result = bundle_file(
            &dir.path().join("nope.html"),
            &dir.path().join("out.html"),
            &BundleConfig::default(),
            &SilentReporter,
        );
        assert!(matches!(result, Err(BundleError::Read { .. })));
    }
}
