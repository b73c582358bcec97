//! # STARBURST
//!
//! A fireworks show: rockets climb, burst into fragments and shed embers,
//! all inside one fixed-capacity particle pool drawn with a single
//! instanced call plus a bloom pass.
//!
//! ## Crates
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────────┐
//! │  starburst_math  │──>│  starburst_core  │──>│ starburst_rendering  │
//! │  • Matrix        │   │  • SparkPool     │   │  • FrameDriver       │
//! │  • Vec3, angles  │   │  • rules         │   │  • Camera, bloom     │
//! └──────────────────┘   └──────────────────┘   │  • Renderer trait    │
//!                                               └──────────┬───────────┘
//!                                                          │
//!                                               ┌──────────┴───────────┐
//!                                               │      starburst       │
//!                                               │  • ShowConfig (TOML) │
//!                                               │  • ShowBuilder       │
//!                                               └──────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use starburst::{ShowBuilder, ShowConfig};
//! use starburst::rendering::HeadlessRenderer;
//!
//! let config = ShowConfig::from_toml_str("[pool]\ncapacity = 256\n")?;
//! let mut driver = ShowBuilder::new(config)
//!     .seed(1)
//!     .build(HeadlessRenderer::new(640, 480))?;
//! driver.advance(1.0 / 60.0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod show;

// Re-export the layers
pub use starburst_core as sparks;
pub use starburst_math as math;
pub use starburst_rendering as rendering;

pub use config::{ConfigError, ConfigResult, PoolConfig, ShowConfig, ShowSettings};
pub use show::{BuildError, ShowBuilder};
