//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/lcrs/lcrs.toml`
//! 3. Local config: `<dir>/.lcrs.toml`
//! 4. Environment variables: `LCRS_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;

/// Display and search settings for the `lcrs` binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Append `[leaf count]` to every rendered node
    pub show_leaf_counts: bool,
    /// Append `= amount` to every rendered node
    pub show_amounts: bool,
    /// Search right links before left links when locating records
    pub right_first: bool,
    /// Decimal places for amounts
    pub precision: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_leaf_counts: true,
            show_amounts: true,
            right_first: false,
            precision: 2,
        }
    }
}

/// Get the XDG config directory for lcrs.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lcrs").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("lcrs.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".lcrs.toml")
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.lcrs.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), local_dir)
    }

    /// Load settings from explicit locations. Missing files are skipped.
    #[instrument(level = "debug")]
    pub fn load_from(
        global_path: Option<&Path>,
        local_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("show_leaf_counts", defaults.show_leaf_counts)
            .map_err(config_err)?
            .set_default("show_amounts", defaults.show_amounts)
            .map_err(config_err)?
            .set_default("right_first", defaults.right_first)
            .map_err(config_err)?
            .set_default("precision", defaults.precision as u64)
            .map_err(config_err)?;

        if let Some(global_path) = global_path {
            builder = builder.add_source(File::from(global_path).required(false));
        }
        if let Some(dir) = local_dir {
            builder = builder.add_source(File::from(local_config_path(dir)).required(false));
        }
        builder = builder.add_source(
            Environment::with_prefix("LCRS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)?;
        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# lcrs configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/lcrs/lcrs.toml
#   Local:  <dir>/.lcrs.toml            (-C <dir> or LCRS_CONFIG_DIR, default: cwd)
#   Env:    LCRS_* environment variables (e.g. LCRS_RIGHT_FIRST=true)

# Append the leaf count to every node
# show_leaf_counts = true

# Append the (rolled up) amount to every node
# show_amounts = true

# Search right links before left links (find/update)
# right_first = false

# Decimal places for amounts
# precision = 2
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
