use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Free-space targets for the cleaned filesystem.
///
/// Percentages are not range-checked: values outside 0..=100 just produce unusual deficits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Percentage of blocks to keep free.
    pub min_size_pct:  i64,
    /// Percentage of inodes to keep free.
    pub min_files_pct: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when RUST_LOG is not set, e.g. "info" or "dclean=debug".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for Thresholds {
    fn default() -> Self {
        Self { min_size_pct: 25, min_files_pct: 25 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

impl Thresholds {
    /// Replace configured values with whichever ones were given on the command line.
    pub fn with_overrides(self, min_size_pct: Option<i64>, min_files_pct: Option<i64>) -> Self {
        Self {
            min_size_pct:  min_size_pct.unwrap_or(self.min_size_pct),
            min_files_pct: min_files_pct.unwrap_or(self.min_files_pct),
        }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load the user config, falling back to defaults when it is missing or unreadable.
    /// Nothing is written back: the tool usually runs unattended.
    pub fn load() -> Self {
        try_load().unwrap_or_default()
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dclean").join("dclean.toml"))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

fn try_load() -> Result<Config> {
    let path = Config::config_path().ok_or_else(|| anyhow::anyhow!("no config dir"))?;
    let text = fs::read_to_string(path)?;
    Config::from_toml(&text)
}
