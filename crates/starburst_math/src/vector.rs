//! Vector value types and random direction sampling.
//!
//! Directions are produced from angles rather than by normalizing random
//! points, so the 3D variant is not a unit vector: its x/y pair lies on a
//! circle and z is drawn from an independent angle.

use std::f64::consts::TAU;

use rand::Rng;

/// 3D Vector - position, velocity, color
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise absolute value
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// 2D Vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Uniform angle in `[start, end)` radians.
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R, start: f64, end: f64) -> f64 {
    (end - start) * rng.gen::<f64>() + start
}

/// `(cos θ, sin θ) · magnitude`
#[must_use]
pub fn angle_to_vector(angle: f64, magnitude: f64) -> Vec2 {
    Vec2::new(angle.cos() * magnitude, angle.sin() * magnitude)
}

/// `(cos a, sin a, cos b) · magnitude`
#[must_use]
pub fn angles_to_vector(first: f64, second: f64, magnitude: f64) -> Vec3 {
    Vec3::new(
        first.cos() * magnitude,
        first.sin() * magnitude,
        second.cos() * magnitude,
    )
}

/// Random 2D direction of the given magnitude.
pub fn random_vector_2d<R: Rng + ?Sized>(rng: &mut R, magnitude: f64) -> Vec2 {
    angle_to_vector(random_angle(rng, 0.0, TAU), magnitude)
}

/// Random 3D direction of the given magnitude, both angles drawn from a
/// full turn.
pub fn random_vector<R: Rng + ?Sized>(rng: &mut R, magnitude: f64) -> Vec3 {
    let first = random_angle(rng, 0.0, TAU);
    let second = random_angle(rng, 0.0, TAU);
    angles_to_vector(first, second, magnitude)
}
