//! Planning and running a bundling command over several input files
//!
//! Each input document is an independent unit: a failure in one never stops
//! the others, but makes the overall status a failure.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::BundleConfig;
use crate::report::Reporter;
use crate::bundle_file;

/// Overall outcome of a command, used as the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Success = 0,
    Failure = 1,
    /// No command was given
    Pending = 2,
}

impl StatusCode {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Errors that prevent a batch from being planned
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("No HTML files to process provided!")]
    NoInputs,

    #[error("Expected single input file, but got {count}")]
    MultipleInputs { count: usize },
}

/// Where bundled documents are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Exactly one input, written to this path
    File(PathBuf),
    /// Each input written as `<stem><suffix>` inside `dir`
    Directory { dir: PathBuf, suffix: String },
}

impl OutputMode {
    /// Pick the mode from an explicit output file or the configured directory and suffix
    pub fn from_options(out_file: Option<PathBuf>, config: &BundleConfig) -> Self {
        match out_file {
            Some(file) => OutputMode::File(file),
            None => OutputMode::Directory {
                dir: config.out_dir.clone().unwrap_or_default(),
                suffix: config.out_suffix.clone(),
            },
        }
    }
}

/// One document to bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Whether a path names an existing file with an `.html` extension (any case)
pub fn is_html_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
}

/// Keep the arguments that are HTML files, warning about the rest
pub fn html_inputs(args: &[PathBuf]) -> Vec<PathBuf> {
    args.iter()
        .filter(|path| {
            let keep = is_html_file(path);
            if !keep {
                tracing::warn!("Skipping {}: not an existing .html file", path.display());
            }
            keep
        })
        .cloned()
        .collect()
}

/// Pair every input with its output path
pub fn plan(inputs: Vec<PathBuf>, mode: &OutputMode) -> Result<Vec<BatchJob>, BatchError> {
    if inputs.is_empty() {
        return Err(BatchError::NoInputs);
    }

    match mode {
        OutputMode::File(target) => {
            if inputs.len() > 1 {
                return Err(BatchError::MultipleInputs {
                    count: inputs.len(),
                });
            }
            Ok(inputs
                .into_iter()
                .map(|source| BatchJob {
                    source,
                    target: target.clone(),
                })
                .collect())
        }
        OutputMode::Directory { dir, suffix } => Ok(inputs
            .into_iter()
            .map(|source| {
                let stem = source
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let target = dir.join(format!("{stem}{suffix}"));
                BatchJob { source, target }
            })
            .collect()),
    }
}

/// Documents that were and were not written
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl BatchReport {
    pub fn status(&self) -> StatusCode {
        if self.failed.is_empty() {
            StatusCode::Success
        } else {
            StatusCode::Failure
        }
    }
}

/// Bundle every job in order, continuing past failures
pub fn run(jobs: &[BatchJob], config: &BundleConfig, reporter: &dyn Reporter) -> BatchReport {
    let mut report = BatchReport::default();
    for job in jobs {
        match bundle_file(&job.source, &job.target, config, reporter) {
            Ok(()) => report.succeeded.push(job.source.clone()),
            Err(e) => {
                reporter.document_failed(&job.source, &e);
                report.failed.push(job.source.clone());
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SilentReporter;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn directory(dir: &str, suffix: &str) -> OutputMode {
        OutputMode::Directory {
            dir: PathBuf::from(dir),
            suffix: suffix.to_string(),
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StatusCode::Success.code(), 0);
        assert_eq!(StatusCode::Failure.code(), 1);
        assert_eq!(StatusCode::Pending.code(), 2);
    }

    #[test]
    fn test_plan_requires_inputs() {
        assert_eq!(plan(vec![], &directory("", ".tmpl.html")), Err(BatchError::NoInputs));
    }

    #[test]
    fn test_plan_single_file() {
        let jobs = plan(
            vec![PathBuf::from("src/index.html")],
            &OutputMode::File(PathBuf::from("dist/index.html")),
        )
        .unwrap();
        assert_eq!(
            jobs,
            vec![BatchJob {
                source: PathBuf::from("src/index.html"),
                target: PathBuf::from("dist/index.html"),
            }]
        );
    }

    #[test]
    fn test_plan_single_file_rejects_many() {
        let result = plan(
            vec![PathBuf::from("a.html"), PathBuf::from("b.html")],
            &OutputMode::File(PathBuf::from("out.html")),
        );
        assert_eq!(result, Err(BatchError::MultipleInputs { count: 2 }));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Expected single input file, but got 2"
        );
    }

    #[test]
    fn test_plan_directory_uses_stem_and_suffix() {
        let jobs = plan(
            vec![PathBuf::from("pages/about.html"), PathBuf::from("index.HTML")],
            &directory("dist", ".tmpl.html"),
        )
        .unwrap();
        let targets: Vec<_> = jobs.into_iter().map(|job| job.target).collect();
        assert_eq!(
            targets,
            vec![
                PathBuf::from("dist/about.tmpl.html"),
                PathBuf::from("dist/index.tmpl.html"),
            ]
        );
    }

    #[test]
    fn test_output_mode_from_options() {
        let config = BundleConfig::default().with_out_dir("public");
        assert_eq!(
            OutputMode::from_options(None, &config),
            directory("public", ".tmpl.html")
        );
        assert_eq!(
            OutputMode::from_options(Some(PathBuf::from("x.html")), &config),
            OutputMode::File(PathBuf::from("x.html"))
        );
    }

    #[test]
    fn test_html_inputs_filters() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.html");
        let upper = dir.path().join("UPPER.HTML");
        let text = dir.path().join("notes.txt");
        for path in [&page, &upper, &text] {
            fs::write(path, "").unwrap();
        }
        let missing = dir.path().join("missing.html");

        let inputs = html_inputs(&[page.clone(), text, missing, upper.clone(), dir.path().to_path_buf()]);
        assert_eq!(inputs, vec![page, upper]);
    }

    #[test]
    fn test_run_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.tmpl"), "<b>${v}</b>").unwrap();
        let good = dir.path().join("good.html");
        let bad = dir.path().join("bad.html");
        fs::write(&bad, "<tmpl></tmpl>").unwrap();
        fs::write(&good, r#"<tmpl src="a.tmpl"><v>ok</v></tmpl>"#).unwrap();

        let out = dir.path().join("dist");
        let mode = OutputMode::Directory {
            dir: out.clone(),
            suffix: ".tmpl.html".to_string(),
        };
        let jobs = plan(vec![bad.clone(), good.clone()], &mode).unwrap();
        let report = run(&jobs, &BundleConfig::default(), &SilentReporter);

        assert_eq!(report.succeeded, vec![good]);
        assert_eq!(report.failed, vec![bad]);
        assert_eq!(report.status(), StatusCode::Failure);
        assert!(out.join("good.tmpl.html").exists());
        assert!(!out.join("bad.tmpl.html").exists());
    }
}
