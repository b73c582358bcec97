//! Per-kind update rules.
//!
//! Rules mutate a single slot and describe the spawns they want; the pool
//! performs the spawns afterwards so no slot is borrowed while another is
//! being allocated.

use std::f64::consts::PI;

use rand::Rng;
use starburst_math::vector::{angle_to_vector, random_angle, random_vector};
use starburst_math::Vec3;

use super::kind::SparkKind;
use super::slot::{Spark, SparkDesc};
use crate::config::SparkConfig;

const ROCKET_EMBER_LIFETIME: f64 = 2.0;
const ROCKET_EMBER_INTENSITY: f64 = 10.0;
const SPARK_EMBER_LIFETIME: f64 = 1.0;
const SPARK_EMBER_INTENSITY: f64 = 5.0;
const EMBER_SIZE: f64 = 4.0;
const EMBER_LUMINANCE: f64 = 0.9;

const FRAGMENT_SIZE: f64 = 10.0;
const FRAGMENT_LUMINANCE: f64 = 1.0;
const FRAGMENT_INTENSITY: f64 = 15.0;

/// A rocket that ran out of time this frame.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Burst {
    pub origin: Vec3,
    pub color: [f64; 3],
}

/// Spawns requested by one slot update.
#[derive(Debug, Default)]
pub(crate) struct Effects {
    pub ember: Option<SparkDesc>,
    pub burst: Option<Burst>,
}

/// Advances an active slot by `dt` seconds.
pub(crate) fn advance<R: Rng + ?Sized>(
    spark: &mut Spark,
    dt: f64,
    config: &SparkConfig,
    rng: &mut R,
) -> Effects {
    spark.time -= dt;
    spark.position += spark.velocity * dt;

    let mut effects = Effects::default();

    match spark.kind {
        SparkKind::Rocket => {
            if rng.gen::<f64>() < config.ember_probability {
                effects.ember = Some(rocket_ember(spark, config, rng));
            }

            apply_gravity(spark, dt, config);

            // Above the launch line with plenty of fuel left: start the fuse.
            if spark.position.y > 0.0 && spark.time > config.cutoff_remaining {
                spark.time = config.cutoff_time;
            }

            if spark.time < config.drag_window {
                spark.velocity.x -= spark.velocity.x * dt * config.drag_rate;
            }

            apply_fade(spark, config);

            if spark.time <= 0.0 && spark.time + dt > 0.0 {
                effects.burst = Some(Burst {
                    origin: spark.position,
                    color: spark.color,
                });
            }
        }
        SparkKind::Spark => {
            if rng.gen::<f64>() < config.ember_probability {
                effects.ember = Some(trail_ember(spark, config, rng));
            }
            apply_gravity(spark, dt, config);
            apply_fade(spark, config);
        }
        SparkKind::Ember | SparkKind::Shell | SparkKind::PopShell | SparkKind::PopSpark => {
            apply_gravity(spark, dt, config);
            apply_fade(spark, config);
        }
    }

    effects
}

fn apply_gravity(spark: &mut Spark, dt: f64, config: &SparkConfig) {
    spark.velocity.y -= dt * config.gravity;
}

fn apply_fade(spark: &mut Spark, config: &SparkConfig) {
    if spark.time < config.fade_window {
        for channel in &mut spark.color {
            *channel *= config.fade_factor;
        }
        spark.size *= config.fade_factor;
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, config: &SparkConfig) -> Vec3 {
    let mut axis = || (rng.gen::<f64>() * 2.0 - 1.0) * config.ember_speed;
    Vec3::new(axis(), axis(), axis())
}

/// Rocket trail: warm, red channel from a near-vertical direction.
fn rocket_ember<R: Rng + ?Sized>(spark: &Spark, config: &SparkConfig, rng: &mut R) -> SparkDesc {
    let heading = angle_to_vector(random_angle(rng, PI * 0.45, PI * 0.55), 1.0);
    let velocity = jitter(rng, config);
    let lifetime = rng.gen::<f64>() * ROCKET_EMBER_LIFETIME;

    SparkDesc::new(SparkKind::Ember, lifetime, EMBER_SIZE)
        .at(spark.position)
        .moving(velocity)
        .colored([heading.y, 0.5, 0.0])
        .glowing(EMBER_LUMINANCE, ROCKET_EMBER_INTENSITY)
}

/// Fragment trail: inherits the fragment's color.
fn trail_ember<R: Rng + ?Sized>(spark: &Spark, config: &SparkConfig, rng: &mut R) -> SparkDesc {
    let velocity = jitter(rng, config);
    let lifetime = rng.gen::<f64>() * SPARK_EMBER_LIFETIME;

    SparkDesc::new(SparkKind::Ember, lifetime, EMBER_SIZE)
        .at(spark.position)
        .moving(velocity)
        .colored(spark.color)
        .glowing(EMBER_LUMINANCE, SPARK_EMBER_INTENSITY)
}

/// Number of fragments for one explosion.
pub(crate) fn fragment_count<R: Rng + ?Sized>(config: &SparkConfig, rng: &mut R) -> u32 {
    if config.fragments_max > config.fragments_min {
        rng.gen_range(config.fragments_min..config.fragments_max)
    } else {
        config.fragments_min
    }
}

/// One explosion fragment: random direction and speed, parent color
/// brightened and wrapped back into `[0, 1)`.
pub(crate) fn fragment<R: Rng + ?Sized>(burst: &Burst, config: &SparkConfig, rng: &mut R) -> SparkDesc {
    let speed = rng.gen::<f64>() * config.fragment_speed_max;
    let velocity = random_vector(rng, speed);
    let boost = rng.gen::<f64>() * (config.color_boost_max - config.color_boost_min)
        + config.color_boost_min;
    let color = burst.color.map(|c| (c * boost) % 1.0);
    let lifetime = rng.gen::<f64>();

    SparkDesc::new(SparkKind::Spark, lifetime, FRAGMENT_SIZE)
        .at(burst.origin)
        .moving(velocity)
        .colored(color)
        .glowing(FRAGMENT_LUMINANCE, FRAGMENT_INTENSITY)
}
