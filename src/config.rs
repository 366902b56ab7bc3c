//! Bundling configuration
//!
//! Settings come from defaults, then an optional TOML file, then command-line
//! overrides. Every key in the file is optional:
//!
//! ```toml
//! [template]
//! tag = "tmpl"
//! src_attribute = "src"
//! max_depth = 32
//!
//! [output]
//! dir = "dist"
//! suffix = ".tmpl.html"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default suffix appended to the input stem in directory output mode
pub const DEFAULT_OUT_SUFFIX: &str = ".tmpl.html";

/// Errors that can occur when loading or parsing a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration for a bundling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleConfig {
    /// Tag name of template reference elements
    pub tag: String,

    /// Attribute naming the fragment file
    pub src_attribute: String,

    /// Maximum nesting depth of expansions; `None` means unbounded
    pub max_depth: Option<usize>,

    /// Output directory for batch mode; `None` means the working directory
    pub out_dir: Option<PathBuf>,

    /// Suffix appended to the input stem for batch outputs
    pub out_suffix: String,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            tag: "tmpl".to_string(),
            src_attribute: "src".to_string(),
            max_depth: None,
            out_dir: None,
            out_suffix: DEFAULT_OUT_SUFFIX.to_string(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    template: Option<TomlTemplate>,
    output: Option<TomlOutput>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlTemplate {
    tag: Option<String>,
    src_attribute: Option<String>,
    max_depth: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlOutput {
    dir: Option<PathBuf>,
    suffix: Option<String>,
}

impl BundleConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string, filling gaps with defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let template = parsed.template.unwrap_or_default();
        let output = parsed.output.unwrap_or_default();

        let mut config = Self::default();
        if let Some(tag) = template.tag {
            config.tag = tag;
        }
        if let Some(attribute) = template.src_attribute {
            config.src_attribute = attribute;
        }
        config.max_depth = template.max_depth;
        config.out_dir = output.dir;
        if let Some(suffix) = output.suffix {
            config.out_suffix = suffix;
        }
        Ok(config)
    }

    /// Set the reference element tag name
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the attribute naming the fragment file
    pub fn with_src_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.src_attribute = attribute.into();
        self
    }

    /// Limit nested expansion depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set the batch output directory
    pub fn with_out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.out_dir = Some(dir.into());
        self
    }

    /// Set the batch output suffix
    pub fn with_out_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.out_suffix = suffix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BundleConfig::default();
        assert_eq!(config.tag, "tmpl");
        assert_eq!(config.src_attribute, "src");
        assert_eq!(config.max_depth, None);
        assert_eq!(config.out_dir, None);
        assert_eq!(config.out_suffix, ".tmpl.html");
    }

    #[test]
    fn test_builder_chain() {
        let config = BundleConfig::new()
            .with_tag("include")
            .with_max_depth(8)
            .with_out_dir("dist")
            .with_out_suffix(".html");
        assert_eq!(config.tag, "include");
        assert_eq!(config.max_depth, Some(8));
        assert_eq!(config.out_dir, Some(PathBuf::from("dist")));
        assert_eq!(config.out_suffix, ".html");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(BundleConfig::from_str("").unwrap(), BundleConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = BundleConfig::from_str(
            r#"
[template]
max_depth = 4

[output]
dir = "public"
"#,
        )
        .unwrap();
        assert_eq!(config.tag, "tmpl");
        assert_eq!(config.max_depth, Some(4));
        assert_eq!(config.out_dir, Some(PathBuf::from("public")));
        assert_eq!(config.out_suffix, DEFAULT_OUT_SUFFIX);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = BundleConfig::from_str("[template]\nsource = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tmpl.toml");
        std::fs::write(&path, "[template]\ntag = \"part\"\n").unwrap();
        assert_eq!(BundleConfig::from_file(&path).unwrap().tag, "part");
    }

    #[test]
    fn test_missing_file() {
        let result = BundleConfig::from_file(Path::new("/nonexistent/tmpl.toml"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
