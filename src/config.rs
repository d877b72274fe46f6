//! Runtime configuration for docscribe
//!
//! Every knob is resolved once at the process boundary (CLI flags, the
//! `GEMINI_API_KEY` environment variable and an optional `docscribe.toml`)
//! and passed into components as an immutable value.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Immutable configuration shared by both pipelines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Credential for the generation service; never written to disk
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Model used for documentation generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Document carrying the marker regions
    #[serde(default = "default_doc_path")]
    pub doc_path: PathBuf,

    /// Directory prefix selecting which changed files get documented
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Source file extensions to analyze
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into or listed
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,

    /// File-name fragments excluded from discovery
    #[serde(default = "default_exclude_file_fragments")]
    pub exclude_file_fragments: Vec<String>,

    /// Retry budget for generation calls, counted in attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff, in milliseconds
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Sampling temperature for generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output size cap for a generated section
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_doc_path() -> PathBuf {
    PathBuf::from("README.md")
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_extensions() -> Vec<String> {
    vec![
        "js".to_string(),
        "jsx".to_string(),
        "ts".to_string(),
        "tsx".to_string(),
    ]
}

fn default_exclude_dirs() -> Vec<String> {
    vec![
        "node_modules".to_string(),
        "dist".to_string(),
        "build".to_string(),
    ]
}

fn default_exclude_file_fragments() -> Vec<String> {
    vec![".min.".to_string(), ".test.".to_string(), ".spec.".to_string()]
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_output_tokens() -> u32 {
    1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            doc_path: default_doc_path(),
            source_dir: default_source_dir(),
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            exclude_file_fragments: default_exclude_file_fragments(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Config {
    /// Load configuration from `docscribe.toml` under the given root, or
    /// return defaults when no file exists
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join("docscribe.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Backoff base delay as a duration
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Check whether a path carries one of the configured source extensions
    pub fn has_source_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }

    /// Check whether a changed path falls under the documented source prefix
    /// and carries a source extension
    pub fn selects(&self, path: &Path) -> bool {
        path.starts_with(&self.source_dir) && self.has_source_extension(path)
    }

    /// Check whether a path falls under an excluded directory or matches an
    /// excluded file-name fragment
    pub fn is_excluded(&self, path: &Path) -> bool {
        let in_excluded_dir = path.components().any(|c| {
            let name = c.as_os_str().to_string_lossy();
            self.exclude_dirs.iter().any(|d| *d == name)
        });
        if in_excluded_dir {
            return true;
        }

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.exclude_file_fragments
            .iter()
            .any(|f| file_name.contains(f.as_str()))
    }
}
