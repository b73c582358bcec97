//! # STARBURST Math
//!
//! Small dense-matrix algebra and direction sampling shared by the particle
//! pool (per-instance billboard transforms) and the camera (projection and
//! spin).
//!
//! ## Example
//!
//! ```rust
//! use starburst_math::Matrix;
//!
//! let a = Matrix::from_flat(&[4.0, 7.0, 2.0, 6.0], false)?;
//! let inv = a.inverse().expect("det is 10");
//! let id = a.multiply(&inv)?;
//! assert!((id.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
//! # Ok::<(), starburst_math::MatrixError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod error;
mod matrix;
mod transform;
pub mod vector;

pub use error::{MatrixError, MatrixResult};
pub use matrix::Matrix;
pub use vector::{Vec2, Vec3};
