//! Slot contents.

use starburst_math::{Matrix, MatrixResult, Vec3};

use super::kind::SparkKind;
use crate::buffers::{LightRecord, TransformRecord};

/// Everything needed to bring a slot to life.
#[derive(Debug, Clone, PartialEq)]
pub struct SparkDesc {
    /// Kind, which selects the update rule.
    pub kind: SparkKind,
    /// Seconds to live.
    pub lifetime: f64,
    /// Billboard scale.
    pub size: f64,
    /// World position.
    pub position: Vec3,
    /// World velocity (units/s).
    pub velocity: Vec3,
    /// Linear RGB.
    pub color: [f64; 3],
    /// Base pass brightness.
    pub luminance: f64,
    /// Bloom exponent.
    pub intensity: f64,
}

impl SparkDesc {
    /// A white, motionless spark at the origin.
    #[must_use]
    pub fn new(kind: SparkKind, lifetime: f64, size: f64) -> Self {
        Self {
            kind,
            lifetime,
            size,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: [1.0; 3],
            luminance: 1.0,
            intensity: 1.0,
        }
    }

    /// Sets the position.
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Sets the velocity.
    #[must_use]
    pub fn moving(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn colored(mut self, color: [f64; 3]) -> Self {
        self.color = color;
        self
    }

    /// Sets luminance and bloom intensity.
    #[must_use]
    pub fn glowing(mut self, luminance: f64, intensity: f64) -> Self {
        self.luminance = luminance;
        self.intensity = intensity;
        self
    }
}

/// One pool slot.
///
/// Fields are public for inspection and tuning; the cached transform is
/// only rewritten by the pool.
#[derive(Debug, Clone)]
pub struct Spark {
    /// Kind, which selects the update rule.
    pub kind: SparkKind,
    /// Remaining lifetime in seconds. `<= 0` means the slot is inactive.
    pub time: f64,
    /// Billboard scale.
    pub size: f64,
    /// World position.
    pub position: Vec3,
    /// World velocity (units/s).
    pub velocity: Vec3,
    /// Linear RGB.
    pub color: [f64; 3],
    /// Base pass brightness.
    pub luminance: f64,
    /// Bloom exponent.
    pub intensity: f64,
    /// Cached model matrix, row-major.
    pub(crate) transform: Matrix,
}

impl Spark {
    pub(crate) fn from_desc(desc: SparkDesc) -> Self {
        Self {
            kind: desc.kind,
            time: desc.lifetime,
            size: desc.size,
            position: desc.position,
            velocity: desc.velocity,
            color: desc.color,
            luminance: desc.luminance,
            intensity: desc.intensity,
            transform: Matrix::identity(4),
        }
    }

    /// Reinitializes this slot in place.
    pub(crate) fn reset(&mut self, desc: SparkDesc) {
        *self = Self::from_desc(desc);
    }

    /// A slot is active while it has time left.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.time > 0.0
    }

    /// See [`SparkKind::is_important`].
    #[inline]
    #[must_use]
    pub fn is_important(&self) -> bool {
        self.kind.is_important()
    }

    /// The cached model matrix from the last update.
    #[must_use]
    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    pub(crate) fn transform_record(&self) -> MatrixResult<TransformRecord> {
        Ok(TransformRecord {
            columns: self.transform.to_f32_array(true)?,
        })
    }

    pub(crate) fn light_record(&self) -> LightRecord {
        LightRecord {
            color: self.color.map(|c| c as f32),
            luminance: self.luminance as f32,
            intensity: self.intensity as f32,
        }
    }
}
