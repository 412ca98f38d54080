//! # Crafting Configuration
//!
//! Loaded once at startup from TOML:
//!
//! ```toml
//! catalog_path = "data/craft_rules.toml"
//! max_stack = 99
//! item_count = 2000
//! command_namespace = "Artisan"
//! save_path = "save/crafting.json"
//! ```
//!
//! Relative paths are resolved against the config file's directory.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::command::DEFAULT_NAMESPACE;
use crate::error::ConfigError;
use crate::inventory::DEFAULT_MAX_STACK;

/// Default size of the host item database.
pub const DEFAULT_ITEM_COUNT: u32 = 2000;

/// Host-provided crafting settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CraftingConfig {
    /// Rule catalog file (`.toml` or `.json`).
    pub catalog_path: PathBuf,
    /// Per-item cap.
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
    /// Items `1..=item_count` exist in the host database.
    #[serde(default = "default_item_count")]
    pub item_count: u32,
    /// Plugin name commands are addressed to.
    #[serde(default = "default_namespace")]
    pub command_namespace: String,
    /// Where the ledger section is persisted, if anywhere.
    #[serde(default)]
    pub save_path: Option<PathBuf>,
}

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

fn default_item_count() -> u32 {
    DEFAULT_ITEM_COUNT
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl CraftingConfig {
    /// Parses and validates a config document.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML or invalid values.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config file and resolves its relative paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&source)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Makes relative paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.catalog_path.is_relative() {
            self.catalog_path = base.join(&self.catalog_path);
        }
        if let Some(save) = self.save_path.as_mut() {
            if save.is_relative() {
                *save = base.join(&*save);
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_stack == 0 {
            return Err(ConfigError::Invalid("max_stack must be at least 1".into()));
        }
        if self.item_count == 0 {
            return Err(ConfigError::Invalid("item_count must be at least 1".into()));
        }
        if self.command_namespace.trim().is_empty() {
            return Err(ConfigError::Invalid("command_namespace must not be empty".into()));
        }
        Ok(())
    }
}
