//! # Sparks
//!
//! Every visible point of light is a [`Spark`] living in one slot of the
//! [`SparkPool`]. A slot is never freed: it goes inactive when its timer
//! runs out and is handed to the next spawn request.
//!
//! ```text
//! spawn ──► Active ──(time <= 0)──► Inactive ──(spawn reuses)──► Active
//!              │
//!              └── Rocket: explodes once on the frame its timer crosses zero
//! ```

mod kind;
mod pool;
mod rules;
mod slot;

pub use kind::SparkKind;
pub use pool::{PoolStats, SparkHandle, SparkPool};
pub use slot::{Spark, SparkDesc};
