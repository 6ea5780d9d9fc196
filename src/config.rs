//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bstree/bstree.toml`
//! 3. Local config: file passed via `--config`
//! 4. Environment variables: `BSTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;

/// Grid geometry used to turn layout cells into coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// X coordinate of the root cell
    pub origin_x: f64,
    /// Y coordinate of the root cell
    pub origin_y: f64,
    pub cell_width: f64,
    pub cell_height: f64,
    /// Gap between neighbouring cells, both axes
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 20.0,
            origin_y: 20.0,
            cell_width: 40.0,
            cell_height: 40.0,
            padding: 20.0,
        }
    }
}

/// Defaults for filling a tree with random values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PopulateConfig {
    /// Number of values drawn (duplicates included)
    pub count: usize,
    /// Inclusive lower bound
    pub min: i64,
    /// Exclusive upper bound
    pub max: i64,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for PopulateConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            min: -5000,
            max: 5000,
            seed: None,
        }
    }
}

/// Raw layout config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutConfig {
    pub origin_x: Option<f64>,
    pub origin_y: Option<f64>,
    pub cell_width: Option<f64>,
    pub cell_height: Option<f64>,
    pub padding: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPopulateConfig {
    pub count: Option<usize>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub seed: Option<u64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutConfig,
    pub populate: RawPopulateConfig,
}

impl LayoutConfig {
    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawLayoutConfig) -> Self {
        Self {
            origin_x: overlay.origin_x.unwrap_or(self.origin_x),
            origin_y: overlay.origin_y.unwrap_or(self.origin_y),
            cell_width: overlay.cell_width.unwrap_or(self.cell_width),
            cell_height: overlay.cell_height.unwrap_or(self.cell_height),
            padding: overlay.padding.unwrap_or(self.padding),
        }
    }
}

impl PopulateConfig {
    pub fn merge(&self, overlay: &RawPopulateConfig) -> Self {
        Self {
            count: overlay.count.unwrap_or(self.count),
            min: overlay.min.unwrap_or(self.min),
            max: overlay.max.unwrap_or(self.max),
            seed: overlay.seed.or(self.seed),
        }
    }
}

/// Unified configuration for bstree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub populate: PopulateConfig,
}

/// Get the XDG config directory for bstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bstree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// `BSTREE_*` variables with `__` between nesting levels.
fn env_source() -> Environment {
    Environment::with_prefix("BSTREE")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: self.layout.merge(&overlay.layout),
            populate: self.populate.merge(&overlay.populate),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_path` - Optional config file given on the command line; it
    ///   must exist when specified
    #[instrument(level = "debug")]
    pub fn load(local_path: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit local config
        if let Some(path) = local_path {
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!("loading local config: {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current, env_source())
    }

    /// Apply BSTREE_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `BSTREE_LAYOUT__CELL_WIDTH=55`.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        let layout = &mut settings.layout;
        for (key, field) in [
            ("layout.origin_x", &mut layout.origin_x),
            ("layout.origin_y", &mut layout.origin_y),
            ("layout.cell_width", &mut layout.cell_width),
            ("layout.cell_height", &mut layout.cell_height),
            ("layout.padding", &mut layout.padding),
        ] {
            if let Ok(val) = config.get::<f64>(key) {
                *field = val;
            }
        }

        if let Ok(val) = config.get::<usize>("populate.count") {
            settings.populate.count = val;
        }
        if let Ok(val) = config.get::<i64>("populate.min") {
            settings.populate.min = val;
        }
        if let Ok(val) = config.get::<i64>("populate.max") {
            settings.populate.max = val;
        }
        if let Ok(val) = config.get::<u64>("populate.seed") {
            settings.populate.seed = Some(val);
        }

        Ok(settings)
    }

    /// Render as TOML for display.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
