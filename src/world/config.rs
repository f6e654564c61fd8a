//! Configuration for a [`CollisionWorld`](super::CollisionWorld).

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CollisionError, Result};

/// Tunables for the broadphase grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Side length of one spatial hash cell, in world units.
    pub cell_size: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self { cell_size: 100.0 }
    }
}

impl CollisionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(CollisionError::invalid(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        Ok(())
    }

    /// Parses and validates a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CollisionConfig =
            toml::from_str(contents).map_err(|e| CollisionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.toml` file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|ext| ext.to_str()) != Some("toml") {
            return Err(CollisionError::Config(format!(
                "unsupported config format: {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!("Loaded collision config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CollisionError::Config(e.to_string()))
    }
}
