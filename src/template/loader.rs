//! Fragment loading relative to the document being bundled

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ExpansionError;

/// Where fragment text comes from
pub trait FragmentSource {
    fn read_fragment(&self, path: &Path) -> io::Result<String>;
}

/// Reads fragments from the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSource;

impl FragmentSource for DiskSource {
    fn read_fragment(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Serves fragments from memory, keyed by resolved path
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    fragments: HashMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fragment at a path (as it would be resolved against the base directory)
    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.fragments.insert(path.into(), text.into());
    }

    pub fn with(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        self.insert(path, text);
        self
    }
}

impl FragmentSource for MemorySource {
    fn read_fragment(&self, path: &Path) -> io::Result<String> {
        self.fragments.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no fragment at {}", path.display()),
            )
        })
    }
}

/// Resolve a `src` attribute value against the base directory
///
/// Backslashes become forward slashes and `%20` becomes a space before joining.
pub fn resolve_fragment_path(src: &str, base_dir: &Path) -> PathBuf {
    let cleaned = src.replace('\\', "/").replace("%20", " ");
    base_dir.join(cleaned)
}

/// Load fragment text for a `src` value, returning the resolved path with it
pub fn load_fragment(
    src: &str,
    base_dir: &Path,
    source: &dyn FragmentSource,
) -> Result<(PathBuf, String), ExpansionError> {
    let path = resolve_fragment_path(src, base_dir);
    match source.read_fragment(&path) {
        Ok(text) => Ok((path, text)),
        Err(e) => Err(ExpansionError::FragmentNotFound { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_joins_base() {
        assert_eq!(
            resolve_fragment_path("parts/head.tmpl", Path::new("site")),
            PathBuf::from("site/parts/head.tmpl")
        );
    }

    #[test]
    fn test_resolve_normalizes_separators() {
        assert_eq!(
            resolve_fragment_path(r"parts\nav\menu.tmpl", Path::new("site")),
            PathBuf::from("site/parts/nav/menu.tmpl")
        );
    }

    #[test]
    fn test_resolve_decodes_spaces() {
        assert_eq!(
            resolve_fragment_path("my%20parts/a.tmpl", Path::new("")),
            PathBuf::from("my parts/a.tmpl")
        );
    }

    #[test]
    fn test_load_from_memory() {
        let source = MemorySource::new().with("site/a.tmpl", "A");
        let (path, text) = load_fragment("a.tmpl", Path::new("site"), &source).unwrap();
        assert_eq!(path, PathBuf::from("site/a.tmpl"));
        assert_eq!(text, "A");
    }

    #[test]
    fn test_missing_fragment_names_path() {
        let err = load_fragment("nope.tmpl", Path::new("site"), &MemorySource::new()).unwrap_err();
        assert!(matches!(err, ExpansionError::FragmentNotFound { .. }));
        assert!(err.to_string().ends_with("nope.tmpl"));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.tmpl"), "<p>${x}</p>").unwrap();
        let (_, text) = load_fragment("x.tmpl", dir.path(), &DiskSource).unwrap();
        assert_eq!(text, "<p>${x}</p>");
    }
}
