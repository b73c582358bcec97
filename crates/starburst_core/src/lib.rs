//! # STARBURST Core
//!
//! Fixed-capacity particle pool driving the fireworks show:
//! - Slots are allocated once and recycled, never freed
//! - Spawning reuses dead slots first, then preempts low-priority live ones
//! - Each slot owns one record in each of the two shared instance buffers
//!
//! ## Example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use starburst_core::{SparkConfig, SparkDesc, SparkKind, SparkPool};
//!
//! let mut pool = SparkPool::new(64, SparkConfig::default());
//! let mut rng = ChaCha8Rng::seed_from_u64(1);
//!
//! let handle = pool.spawn(SparkDesc::new(SparkKind::Ember, 1.0, 4.0));
//! assert!(handle.is_some());
//! pool.step(1.0 / 60.0, &mut rng)?;
//! # Ok::<(), starburst_math::MatrixError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffers;
pub mod config;
pub mod spark;

pub use buffers::{InstanceBuffers, LightRecord, TransformRecord};
pub use config::SparkConfig;
pub use spark::{PoolStats, Spark, SparkDesc, SparkHandle, SparkKind, SparkPool};

/// Default pool capacity.
pub const MAX_SPARKS: usize = 5000;
