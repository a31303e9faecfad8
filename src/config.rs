use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::promo::ChainConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub data: DataConfig,
    pub plan: PlanConfig,
    pub print: PrintConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
}

/// Which retail chains the plan covers, in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub chains: Vec<ChainConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Program invoked with the spooled report path, e.g. `lp`.
    pub command: Option<String>,
    /// Delay between switching to the full-year view and printing.
    pub delay_ms: u64,
    /// Override where reports are spooled.
    pub output_dir: Option<PathBuf>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            chains: ChainConfig::defaults(),
        }
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            command: None,
            delay_ms: 100,
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/promo-tracker/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}. Using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}. Using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("promo-tracker"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }

    pub fn print_output_dir(&self) -> PathBuf {
        self.print
            .output_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("prints"))
    }

    /// Configured chains; an empty list means the built-in four.
    pub fn chains(&self) -> Vec<ChainConfig> {
        if self.plan.chains.is_empty() {
            ChainConfig::defaults()
        } else {
            self.plan.chains.clone()
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("promo-tracker").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
