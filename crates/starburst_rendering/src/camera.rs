//! # Orbiting Camera
//!
//! The camera sits `distance` units back along −z and the world spins about
//! the Y axis underneath it. Each frame produces:
//!
//! - `world = projection · rotation_y(angle)`, uploaded as the shader's
//!   world uniform
//! - `inverse_rotation = rotation_y(−angle)`, which turns every spark quad
//!   back to face the viewer
//!
//! The projection only changes on resize.

use serde::Deserialize;
use starburst_math::{Matrix, MatrixResult};

use crate::renderer::Viewport;

/// Camera tunables, the `[camera]` table of the show configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f64,
    /// Near clip plane.
    pub near: f64,
    /// Far clip plane.
    pub far: f64,
    /// How far the camera is pulled back from the origin.
    pub distance: f64,
    /// Spin rate in radians per second.
    pub angular_speed: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 1.0,
            far: 500.0,
            distance: 200.0,
            angular_speed: 0.5,
        }
    }
}

/// Projection plus the accumulated spin.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    projection: Matrix,
    angle: f64,
    world: Matrix,
    inverse_rotation: Matrix,
}

impl Camera {
    /// Creates a camera at angle zero for the given viewport.
    ///
    /// # Errors
    ///
    /// Propagates matrix errors from composing the projection.
    pub fn new(config: CameraConfig, viewport: Viewport) -> MatrixResult<Self> {
        let projection = Self::projection_for(&config, viewport)?;
        let mut camera = Self {
            config,
            world: projection.clone(),
            projection,
            angle: 0.0,
            inverse_rotation: Matrix::identity(4),
        };
        camera.refresh()?;
        Ok(camera)
    }

    fn projection_for(config: &CameraConfig, viewport: Viewport) -> MatrixResult<Matrix> {
        Matrix::perspective(
            config.fov_degrees.to_radians(),
            viewport.aspect(),
            config.near,
            config.far,
        )
        .multiply(&Matrix::translation(0.0, 0.0, -config.distance))
    }

    fn refresh(&mut self) -> MatrixResult<()> {
        self.world = self.projection.multiply(&Matrix::rotation_y(self.angle))?;
        self.inverse_rotation = Matrix::rotation_y(-self.angle);
        Ok(())
    }

    /// Recomputes the projection for a new viewport.
    ///
    /// # Errors
    ///
    /// Propagates matrix errors.
    pub fn resize(&mut self, viewport: Viewport) -> MatrixResult<()> {
        self.projection = Self::projection_for(&self.config, viewport)?;
        self.refresh()
    }

    /// Spins by `delta × angular_speed` and recomputes both matrices.
    ///
    /// # Errors
    ///
    /// Propagates matrix errors.
    pub fn advance(&mut self, delta: f64) -> MatrixResult<()> {
        self.angle += delta * self.config.angular_speed;
        self.refresh()
    }

    /// Accumulated spin in radians.
    #[inline]
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Tunables.
    #[must_use]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Perspective composed with the pull-back translation.
    #[must_use]
    pub fn projection(&self) -> &Matrix {
        &self.projection
    }

    /// `projection · rotation`.
    #[must_use]
    pub fn world(&self) -> &Matrix {
        &self.world
    }

    /// Billboard matrix for the spark quads.
    #[must_use]
    pub fn inverse_rotation(&self) -> &Matrix {
        &self.inverse_rotation
    }

    /// The world matrix as the shader uniform, column-major.
    ///
    /// # Errors
    ///
    /// Never fails for a camera built through [`Camera::new`].
    pub fn world_uniform(&self) -> MatrixResult<[f32; 16]> {
        self.world.to_f32_array(true)
    }
}
