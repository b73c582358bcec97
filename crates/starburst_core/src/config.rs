//! Physics tunables for the spark rules.
//!
//! Loaded from the `[sparks]` table of the show configuration. Every field
//! has a default, so partial tables are fine.

use serde::Deserialize;

/// Tunables for the per-kind update rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparkConfig {
    /// Downward acceleration (units/s²).
    pub gravity: f64,
    /// Remaining lifetime below which color and size fade.
    pub fade_window: f64,
    /// Per-frame multiplier applied while fading.
    pub fade_factor: f64,
    /// Remaining lifetime below which rockets feel horizontal drag.
    pub drag_window: f64,
    /// Drag rate (fraction of horizontal speed lost per second).
    pub drag_rate: f64,
    /// A rocket above its origin with more than this much life left is cut short.
    pub cutoff_remaining: f64,
    /// Lifetime a cut-short rocket is left with.
    pub cutoff_time: f64,
    /// Chance per frame that a rocket or spark sheds an ember.
    pub ember_probability: f64,
    /// Maximum ember velocity jitter per axis.
    pub ember_speed: f64,
    /// Fewest fragments in an explosion.
    pub fragments_min: u32,
    /// Exclusive upper bound on fragments in an explosion.
    pub fragments_max: u32,
    /// Maximum fragment launch speed.
    pub fragment_speed_max: f64,
    /// Lower bound of the fragment color boost.
    pub color_boost_min: f64,
    /// Exclusive upper bound of the fragment color boost.
    pub color_boost_max: f64,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            gravity: 10.0,
            fade_window: 0.25,
            fade_factor: 0.9,
            drag_window: 2.0,
            drag_rate: 0.5,
            cutoff_remaining: 2.0,
            cutoff_time: 0.5,
            ember_probability: 1.0,
            ember_speed: 15.0,
            fragments_min: 100,
            fragments_max: 150,
            fragment_speed_max: 300.0,
            color_boost_min: 2.0,
            color_boost_max: 4.0,
        }
    }
}
