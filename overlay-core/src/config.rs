use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{
    controller::ControllerSettings,
    model::{Coordinate, Viewport},
    provider::openmeteo::DEFAULT_ENDPOINT,
};

/// Map view used when the overlay starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialView {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

impl Default for InitialView {
    fn default() -> Self {
        Self {
            lat: 36.2,
            lon: 138.25,
            zoom: 5,
        }
    }
}

impl From<InitialView> for Viewport {
    fn from(view: InitialView) -> Self {
        Viewport::new(view.lat, view.lon, view.zoom)
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// zoom_threshold = 13
/// debounce_ms = 250
///
/// [initial_view]
/// lat = 36.2
/// lon = 138.25
/// zoom = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Open-Meteo compatible forecast endpoint.
    pub endpoint: String,

    /// Passed through as the `timezone` query parameter.
    pub timezone: String,

    /// Nationwide markers are shown at this zoom level and below.
    pub zoom_threshold: u8,

    /// Quiet period after the last pan/zoom before the center is fetched.
    pub debounce_ms: u64,

    pub request_timeout_secs: u64,

    pub initial_view: InitialView,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timezone: "auto".to_string(),
            zoom_threshold: 13,
            debounce_ms: 250,
            request_timeout_secs: 10,
            initial_view: InitialView::default(),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            zoom_threshold: self.zoom_threshold,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }

    pub fn initial_viewport(&self) -> Viewport {
        self.initial_view.into()
    }

    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            bail!("`endpoint` must not be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("`request_timeout_secs` must be at least 1");
        }
        let center = Coordinate::new(self.initial_view.lat, self.initial_view.lon);
        if !center.is_valid() {
            bail!(
                "`initial_view` ({}, {}) is not a valid coordinate",
                self.initial_view.lat,
                self.initial_view.lon
            );
        }
        Ok(())
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-overlay", "weather-overlay")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
