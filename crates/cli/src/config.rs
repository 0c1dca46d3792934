//! Application configuration — persisted as JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How a record is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Image header plus every tEXt chunk.
    #[default]
    General,
    /// Image header plus the Stable Diffusion breakdown.
    Sd,
    /// The full record as JSON.
    Json,
}

/// Global configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub default_view: View,
    /// Decimal places in the human-readable file size.
    #[serde(default = "default_size_decimals")]
    pub size_decimals: usize,
    /// Inputs larger than this are rejected.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

fn default_size_decimals() -> usize {
    2
}
fn default_max_bytes() -> u64 {
    png_info_parser::DEFAULT_MAX_BYTES
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_view: View::default(),
            size_decimals: default_size_decimals(),
            max_bytes: default_max_bytes(),
        }
    }
}

impl AppConfig {
    /// Platform config directory: `~/.config/png-info-viewer/`
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("png-info-viewer")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load from disk, or return defaults if the file doesn't exist.
    pub fn load_or_default() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_file())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Update one field from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "default_view" | "view" => {
                self.default_view = <View as clap::ValueEnum>::from_str(value, true)
                    .map_err(|e| anyhow::anyhow!("Invalid view '{value}': {e}"))?;
            }
            "size_decimals" => self.size_decimals = value.parse()?,
            "max_bytes" => self.max_bytes = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {key}"),
        }
        Ok(())
    }
}
