//! Report configuration loading and validation

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete report configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub inputs: InputsSection,

    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Snapshot files exported from the inventory backend
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputsSection {
    #[serde(default = "default_assets")]
    pub assets: PathBuf,
    /// Directory holding one `<tenant>.json` or `<tenant>.toml` per tenant
    #[serde(default = "default_scope_dir")]
    pub scope_dir: PathBuf,
    #[serde(default = "default_scans")]
    pub scans: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSection {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Default for InputsSection {
    fn default() -> Self {
        Self {
            assets: default_assets(),
            scope_dir: default_scope_dir(),
            scans: default_scans(),
        }
    }
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            page_size: default_page_size(),
        }
    }
}

// Default value functions
fn default_log_level() -> String { "info".to_string() }
fn default_assets() -> PathBuf { PathBuf::from("assets.json") }
fn default_scope_dir() -> PathBuf { PathBuf::from("scopes") }
fn default_scans() -> PathBuf { PathBuf::from("scans.json") }
fn default_page_size() -> usize { 25 }

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_PAGE_SIZE: usize = 1000;

impl ReportConfig {
    /// Load configuration from TOML file.
    ///
    /// Relative `[inputs]` paths are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {:?}", path))?;

        let mut config = Self::from_toml_str(&contents)?;
        if let Some(base) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            config.resolve_inputs(base);
        }
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration file")
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            anyhow::bail!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            );
        }

        if self.output.page_size == 0 || self.output.page_size > MAX_PAGE_SIZE {
            anyhow::bail!("Page size must be between 1 and {}", MAX_PAGE_SIZE);
        }

        if self.inputs.scope_dir.as_os_str().is_empty() {
            anyhow::bail!("Scope directory cannot be empty");
        }

        Ok(())
    }

    /// Resolve relative input paths against `base`
    pub fn resolve_inputs(&mut self, base: &Path) {
        for path in [
            &mut self.inputs.assets,
            &mut self.inputs.scope_dir,
            &mut self.inputs.scans,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
