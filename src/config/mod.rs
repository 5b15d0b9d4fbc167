//! User settings, stored as JSON in the platform config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::import::Normalizer;

/// Environment variable pointing at an alternate settings file.
pub(crate) const CONFIG_ENV: &str = "CLIENTBOOKS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Settings {
    /// Prefix for amounts in text reports
    #[serde(default = "default_currency")]
    pub(crate) currency_symbol: String,

    /// Date format (strftime) tried first when importing statements
    #[serde(default = "default_date_format")]
    pub(crate) date_format: String,

    /// Directory that relative export paths are resolved against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) export_dir: Option<PathBuf>,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub(crate) log_level: String,
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            export_dir: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Settings file location: `$CLIENTBOOKS_CONFIG` if set, otherwise
    /// `settings.json` in the platform config directory.
    pub(crate) fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let proj_dirs = directories::ProjectDirs::from("com", "clientbooks", "ClientBooks")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(proj_dirs.config_dir().join("settings.json"))
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub(crate) fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    pub(crate) fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.date_format.clone())
    }

    /// Resolve an export path: absolute paths are kept, relative ones land in
    /// `export_dir` when configured. A leading `~/` expands to `$HOME`.
    pub(crate) fn resolve_export_path(&self, raw: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand(raw));
        match &self.export_dir {
            Some(dir) if expanded.is_relative() => dir.join(expanded),
            _ => expanded,
        }
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
