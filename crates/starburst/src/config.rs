//! # Show Configuration
//!
//! Every tunable lives in one TOML file:
//!
//! ```toml
//! [pool]
//! capacity = 5000
//!
//! [sparks]
//! gravity = 10.0
//!
//! [camera]
//! fov_degrees = 90.0
//!
//! [show]
//! rocket_probability = 0.025
//! seed = 42
//! ```
//!
//! Missing tables and keys fall back to their defaults, so an empty file is
//! a valid show. Unknown keys are rejected.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use starburst_core::{SparkConfig, MAX_SPARKS};
use starburst_rendering::{CameraConfig, DriverSettings};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The `[pool]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Hard cap on live sparks.
    pub capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: MAX_SPARKS,
        }
    }
}

/// The `[show]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowSettings {
    /// Chance per frame of launching a rocket.
    pub rocket_probability: f64,
    /// Largest delta a single frame may advance by.
    pub max_delta: f64,
    /// Delta of the very first frame.
    pub first_delta: f64,
    /// Blur iterations per frame.
    pub bloom_iterations: u32,
    /// RNG seed. Absent means seeded from the clock.
    pub seed: Option<u64>,
    /// Initial drawing-buffer width.
    pub width: u32,
    /// Initial drawing-buffer height.
    pub height: u32,
}

impl Default for ShowSettings {
    fn default() -> Self {
        let driver = DriverSettings::default();
        Self {
            rocket_probability: driver.rocket_probability,
            max_delta: driver.max_delta,
            first_delta: driver.first_delta,
            bloom_iterations: driver.bloom_iterations,
            seed: None,
            width: 1280,
            height: 720,
        }
    }
}

impl ShowSettings {
    /// The part of this table the frame driver consumes.
    #[must_use]
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            rocket_probability: self.rocket_probability,
            max_delta: self.max_delta,
            first_delta: self.first_delta,
            bloom_iterations: self.bloom_iterations,
        }
    }
}

/// Complete show configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowConfig {
    /// Pool sizing.
    pub pool: PoolConfig,
    /// Spark physics.
    pub sparks: SparkConfig,
    /// Camera.
    pub camera: CameraConfig,
    /// Frame loop.
    pub show: ShowSettings,
}

impl ShowConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] or [`ConfigError::Invalid`].
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// as [`ShowConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Checks cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pool.capacity == 0 {
            return Err(invalid("pool.capacity must be greater than zero"));
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if camera.near >= camera.far {
            return Err(invalid(format!(
                "camera.near ({}) must be less than camera.far ({})",
                camera.near, camera.far
            )));
        }

        let sparks = &self.sparks;
        if sparks.fragments_min > sparks.fragments_max {
            return Err(invalid(format!(
                "sparks.fragments_min ({}) exceeds sparks.fragments_max ({})",
                sparks.fragments_min, sparks.fragments_max
            )));
        }
        check_probability("sparks.ember_probability", sparks.ember_probability)?;
        check_probability("show.rocket_probability", self.show.rocket_probability)?;

        let show = &self.show;
        if show.max_delta <= 0.0 || show.first_delta < 0.0 {
            return Err(invalid(
                "show.max_delta must be positive and show.first_delta non-negative",
            ));
        }
        if show.width == 0 || show.height == 0 {
            return Err(invalid("show.width and show.height must be non-zero"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn check_probability(name: &str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1], got {value}")))
    }
}
