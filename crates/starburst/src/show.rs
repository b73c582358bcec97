//! Builds a running show from a [`ShowConfig`].

use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use starburst_core::SparkPool;
use starburst_rendering::{FrameDriver, Renderer, ShowError};
use thiserror::Error;

use crate::config::{ConfigError, ShowConfig};

/// Why a show could not be built.
#[derive(Error, Debug)]
pub enum BuildError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The renderer or the camera could not be set up.
    #[error(transparent)]
    Show(#[from] ShowError),
}

/// Wires config → pool → driver.
#[derive(Debug, Clone)]
pub struct ShowBuilder {
    config: ShowConfig,
}

impl ShowBuilder {
    /// Starts from a validated configuration.
    #[must_use]
    pub fn new(config: ShowConfig) -> Self {
        Self { config }
    }

    /// Overrides the configured seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.show.seed = Some(seed);
        self
    }

    /// The configuration the show will be built from.
    #[must_use]
    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    /// Validates the configuration, allocates the pool and starts the
    /// driver on `renderer`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Config`] for a configuration that
    /// [`ShowConfig::validate`] rejects, and [`BuildError::Show`] when the
    /// renderer fails to initialize.
    pub fn build<R: Renderer>(self, renderer: R) -> Result<FrameDriver<R>, BuildError> {
        self.config.validate()?;

        let ShowConfig {
            pool,
            sparks,
            camera,
            show,
        } = self.config;

        let seed = show.seed.unwrap_or_else(clock_seed);
        tracing::info!(seed, capacity = pool.capacity, "building show");

        let driver = FrameDriver::new(
            renderer,
            SparkPool::new(pool.capacity, sparks),
            camera,
            show.driver_settings(),
            ChaCha8Rng::seed_from_u64(seed),
        )?;
        Ok(driver)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}
