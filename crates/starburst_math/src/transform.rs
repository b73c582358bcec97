//! 4×4 transform factories.
//!
//! All matrices here are row-major with translation in the last column, so
//! a point is transformed as `M · [x, y, z, 1]ᵀ`.

use crate::matrix::Matrix;
use crate::vector::Vec3;

impl Matrix {
    /// Rotation about the Y axis by `angle` radians.
    #[must_use]
    pub fn rotation_y(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_4x4([
            [cos, 0.0, sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Translation by `(x, y, z)`.
    #[must_use]
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_4x4([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Uniform scale by `size` about the origin, then placement at `position`.
    #[must_use]
    pub fn scale_translate(size: f64, position: Vec3) -> Self {
        Self::from_4x4([
            [size, 0.0, 0.0, position.x],
            [0.0, size, 0.0, position.y],
            [0.0, 0.0, size, position.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// OpenGL-style perspective projection.
    ///
    /// `fov` is the vertical field of view in radians, `aspect` is
    /// width / height.
    #[must_use]
    pub fn perspective(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        let focal = (std::f64::consts::FRAC_PI_2 - 0.5 * fov).tan();
        let range_inv = 1.0 / (near - far);
        Self::from_4x4([
            [focal / aspect, 0.0, 0.0, 0.0],
            [0.0, focal, 0.0, 0.0],
            [0.0, 0.0, (near + far) * range_inv, near * far * range_inv * 2.0],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }
}
