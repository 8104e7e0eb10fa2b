//! Configuration management for scentvalue
//!
//! Config stored at: ~/.config/scentvalue/config.json

use scentvalue_domain::model::pricing::{DEFAULT_CURRENCY, DEFAULT_RATE_PER_GRAM, DEFAULT_TARE_GRAMS};
use scentvalue_domain::PricingConfig;
use scentvalue_infra::CameraConstraints;
use scentvalue_types::{ConfigError, OutputFormat, Result};
use scentvalue_vision::{AssistantConfig, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variables checked for the API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Empty bottle weight deducted from every reading (g)
    #[serde(default = "default_tare_grams")]
    pub tare_grams: f64,

    /// Price per net gram
    #[serde(default = "default_rate_per_gram")]
    pub rate_per_gram: f64,

    /// Currency code shown next to prices
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Model name override (optional)
    #[serde(default)]
    pub model: Option<String>,

    /// API base URL override (optional)
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// API key; GEMINI_API_KEY / API_KEY take precedence
    #[serde(default)]
    pub api_key: Option<String>,

    /// Still-capture command with {output} {width} {height} {facing} placeholders
    #[serde(default)]
    pub camera_command: Option<String>,

    #[serde(default = "default_camera_width")]
    pub camera_width: u32,

    #[serde(default = "default_camera_height")]
    pub camera_height: u32,

    /// Copy command override; platform default when unset
    #[serde(default)]
    pub clipboard_command: Option<String>,

    /// Directory for exported files (current directory when unset)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Ledger file override
    #[serde(default)]
    pub ledger_path: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_tare_grams() -> f64 {
    DEFAULT_TARE_GRAMS
}

fn default_rate_per_gram() -> f64 {
    DEFAULT_RATE_PER_GRAM
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_camera_width() -> u32 {
    1920
}

fn default_camera_height() -> u32 {
    1080
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tare_grams: default_tare_grams(),
            rate_per_gram: default_rate_per_gram(),
            currency: default_currency(),
            model: None,
            api_base_url: None,
            api_key: None,
            camera_command: None,
            camera_width: default_camera_width(),
            camera_height: default_camera_height(),
            clipboard_command: None,
            export_dir: None,
            ledger_path: None,
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("scentvalue");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Pricing constants for this process
    pub fn pricing(&self) -> PricingConfig {
        PricingConfig {
            tare_grams: self.tare_grams,
            rate_per_gram: self.rate_per_gram,
            currency: self.currency.clone(),
        }
    }

    /// API key from the environment, falling back to the config file
    pub fn resolved_api_key(&self) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }

    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig::default()
            .with_model(self.model.clone())
            .with_base_url(self.api_base_url.clone())
            .with_api_key(self.resolved_api_key())
    }

    pub fn camera_constraints(&self) -> CameraConstraints {
        CameraConstraints {
            ideal_width: self.camera_width,
            ideal_height: self.camera_height,
        }
    }

    /// Where exported files are written
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get the ledger file path
    pub fn ledger_path(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.ledger_path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("scentvalue");
        Ok(data_dir.join("ledger.json"))
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ScentValue Configuration")?;
        writeln!(f, "========================")?;
        writeln!(f)?;
        writeln!(f, "Bottle tare:    {} g", self.tare_grams)?;
        writeln!(f, "Rate:           {} {}/g", self.rate_per_gram, self.currency)?;
        writeln!(
            f,
            "Model:          {}",
            self.model.as_deref().unwrap_or(DEFAULT_MODEL)
        )?;
        writeln!(
            f,
            "API base URL:   {}",
            self.api_base_url.as_deref().unwrap_or("(default)")
        )?;
        writeln!(
            f,
            "API key:        {}",
            if self.resolved_api_key().is_some() {
                "(set)"
            } else {
                "(not set)"
            }
        )?;
        writeln!(
            f,
            "Camera command: {}",
            self.camera_command.as_deref().unwrap_or("(not set)")
        )?;
        writeln!(f, "Camera size:    {}x{}", self.camera_width, self.camera_height)?;
        writeln!(
            f,
            "Clipboard:      {}",
            self.clipboard_command.as_deref().unwrap_or("(platform default)")
        )?;
        writeln!(f, "Export dir:     {}", self.export_dir().display())?;
        writeln!(
            f,
            "Ledger file:    {}",
            self.ledger_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}
