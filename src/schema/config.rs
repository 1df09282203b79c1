//! Configuration types for boards, seeding and the simulation driver.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Seed;
use crate::compute::{Bounds, LibraryError, PatternLibrary};

fn default_queue_capacity() -> usize {
    50
}

fn default_send_timeout_ms() -> u64 {
    50
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Initial board extent.
    #[serde(default)]
    pub board: Bounds,
    /// How the board is populated at start.
    #[serde(default)]
    pub seed: Seed,
    /// Background driver parameters.
    #[serde(default)]
    pub driver: DriverConfig,
    /// Extra RLE patterns, by name, added on top of the built-in library.
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
}

/// Background simulation driver parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Maximum number of published, unconsumed snapshots.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// How long a blocked publish waits before re-checking the stop flag.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: u64,
    /// Fixed seed for the engine's random source, applied once when the
    /// board is built (None = entropy).
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            send_timeout_ms: default_send_timeout_ms(),
            rng_seed: None,
        }
    }
}

impl DriverConfig {
    /// Validate driver parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::InvalidQueueCapacity);
        }
        if self.send_timeout_ms == 0 {
            return Err(ConfigError::InvalidSendTimeout);
        }
        Ok(())
    }
}

impl SimulationConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.x_max < 0 || self.board.y_max < 0 {
            return Err(ConfigError::InvalidBounds {
                x_max: self.board.x_max,
                y_max: self.board.y_max,
            });
        }
        if let Seed::Random { p } = self.seed {
            if !p.is_finite() || p < 0.0 {
                return Err(ConfigError::InvalidSeedAmount(p));
            }
        }
        self.driver.validate()
    }

    /// Built-in patterns plus the configured extras.
    pub fn library(&self) -> Result<PatternLibrary, LibraryError> {
        let mut library = PatternLibrary::builtin();
        for (name, rle) in &self.patterns {
            library.insert_rle(name, rle)?;
        }
        Ok(library)
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Board bounds must be non-negative, got ({x_max}, {y_max})")]
    InvalidBounds { x_max: i32, y_max: i32 },
    #[error("Seed amount must be finite and non-negative, got {0}")]
    InvalidSeedAmount(f64),
    #[error("Queue capacity must be non-zero")]
    InvalidQueueCapacity,
    #[error("Send timeout must be non-zero")]
    InvalidSendTimeout,
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.driver.queue_capacity, 50);
        assert_eq!(config.seed, Seed::Random { p: 0.2 });
    }

    #[test]
    fn test_invalid_values() {
        let mut config = SimulationConfig::default();
        config.driver.queue_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueueCapacity)
        ));

        let mut config = SimulationConfig::default();
        config.board = Bounds::new(-1, 10);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));

        let mut config = SimulationConfig::default();
        config.seed = Seed::Random { p: f64::INFINITY };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSeedAmount(_))
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"board":{"x_max":30,"y_max":20}}"#).unwrap();
        assert_eq!(config.board, Bounds::new(30, 20));
        assert_eq!(config.driver.queue_capacity, 50);
        assert_eq!(config.driver.send_timeout_ms, 50);
        assert!(config.patterns.is_empty());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "board": {{"x_max": 40, "y_max": 40}},
                "seed": {{"type": "Pattern", "name": "tub"}},
                "driver": {{"queue_capacity": 8, "rng_seed": 42}},
                "patterns": {{"tub": "bo$obo$bo!"}}
            }}"#
        )
        .unwrap();

        let config = SimulationConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.driver.queue_capacity, 8);
        assert_eq!(config.driver.rng_seed, Some(42));

        let library = config.library().unwrap();
        assert_eq!(library.get("tub").unwrap().cells.len(), 4);
        assert!(library.get("glider").is_ok());
    }

    #[test]
    fn test_from_json_file_errors() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            SimulationConfig::from_json_file(file.path()),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json_file("/nonexistent/life.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_serialization() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.board, config.board);
        assert_eq!(parsed.seed, config.seed);
    }
}
