//! # Show Verification Tests
//!
//! End-to-end checks across the workspace:
//!
//! 1. **Matrix algebra**: associativity, identity, inverse, export round-trip
//! 2. **Spark pool**: overflow, reuse and explosion fan-out through the public API
//! 3. **Frame driver**: a full seeded show on the headless renderer
//!
//! Run with: cargo test --package starburst --test show_test

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use starburst::math::Matrix;
use starburst::rendering::{HeadlessRenderer, RenderCall, TickOutcome};
use starburst::sparks::{SparkConfig, SparkDesc, SparkKind, SparkPool};
use starburst::{ShowBuilder, ShowConfig};

fn random_matrix(rng: &mut ChaCha8Rng, dim: usize) -> Matrix {
    let elements: Vec<f64> = (0..dim * dim).map(|_| rng.gen_range(-5.0..5.0)).collect();
    Matrix::from_flat(&elements, false).unwrap()
}

fn assert_close(a: &Matrix, b: &Matrix, tolerance: f64) {
    for (x, y) in a.to_flat(false).iter().zip(b.to_flat(false)) {
        assert!((x - y).abs() < tolerance, "{x} vs {y}");
    }
}

// ============================================================================
// MATRIX ALGEBRA
// ============================================================================

#[test]
fn verify_multiply_is_associative() {
    let mut rng = ChaCha8Rng::seed_from_u64(100);
    for dim in 2..=5 {
        let a = random_matrix(&mut rng, dim);
        let b = random_matrix(&mut rng, dim);
        let c = random_matrix(&mut rng, dim);

        let left = a.multiply(&b).unwrap().multiply(&c).unwrap();
        let right = a.multiply(&b.multiply(&c).unwrap()).unwrap();
        assert_close(&left, &right, 1e-9);
        assert_eq!(a.multiply(&Matrix::identity(dim)).unwrap(), a);
        assert_eq!(Matrix::identity(dim).determinant(), 1.0);
    }
}

#[test]
fn verify_inverse_round_trip() {
    let mut rng = ChaCha8Rng::seed_from_u64(200);
    let mut checked = 0;
    while checked < 20 {
        let a = random_matrix(&mut rng, 4);
        let Some(inverse) = a.inverse() else {
            continue;
        };
        assert_close(&a.multiply(&inverse).unwrap(), &Matrix::identity(4), 1e-9);
        checked += 1;
    }

    let singular = Matrix::from_rows(&[[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [0.0, 1.0, 5.0]], false)
        .unwrap();
    assert_eq!(singular.determinant(), 0.0);
    assert!(singular.inverse().is_none());
}

#[test]
fn verify_flat_export_round_trip() {
    let flat: Vec<f64> = (0..16).map(f64::from).collect();
    let m = Matrix::from_flat(&flat, false).unwrap();
    assert_eq!(m.to_flat(false), flat);

    let identity = Matrix::identity(4);
    assert_eq!(identity.to_flat(true), identity.to_flat(false));
}

// ============================================================================
// SPARK POOL
// ============================================================================

#[test]
fn verify_overflow_of_important_sparks_is_dropped() {
    let mut pool = SparkPool::new(10, SparkConfig::default());
    for kind in [SparkKind::Rocket, SparkKind::Shell, SparkKind::PopShell]
        .into_iter()
        .cycle()
        .take(10)
    {
        assert!(pool.spawn(SparkDesc::new(kind, 3.0, 1.0)).is_some());
    }
    assert!(pool.spawn(SparkDesc::new(SparkKind::Rocket, 3.0, 1.0)).is_none());
    assert_eq!(pool.stats().dropped, 1);
}

#[test]
fn verify_aged_slot_is_reused() {
    let mut pool = SparkPool::new(3, SparkConfig::default());
    let handles: Vec<_> = (0..3)
        .map(|_| pool.spawn(SparkDesc::new(SparkKind::Spark, 2.0, 1.0)).unwrap())
        .collect();
    pool.get_mut(handles[1]).unwrap().time = -0.5;

    let fourth = pool.spawn(SparkDesc::new(SparkKind::PopSpark, 1.0, 1.0)).unwrap();
    assert_eq!(fourth, handles[1]);
}

#[test]
fn verify_rocket_explosion_fan_out() {
    let mut pool = SparkPool::new(
        500,
        SparkConfig {
            ember_probability: 0.0,
            ..SparkConfig::default()
        },
    );
    let mut rng = ChaCha8Rng::seed_from_u64(300);
    let rocket = pool
        .spawn(SparkDesc::new(SparkKind::Rocket, 0.1, 10.0).colored([0.9, 0.5, 0.2]))
        .unwrap();

    pool.update(rocket, 0.2, &mut rng).unwrap();

    assert!(pool.get(rocket).unwrap().time <= 0.0);
    let stats = pool.stats();
    assert_eq!(stats.explosions, 1);
    assert!((100..150).contains(&stats.fragments));
    assert_eq!(pool.len() as u32, 1 + stats.fragments);
    assert!(pool
        .iter()
        .skip(1)
        .all(|(_, spark)| spark.kind == SparkKind::Spark));
}

// ============================================================================
// FRAME DRIVER
// ============================================================================

#[test]
fn verify_sample_config_is_the_default() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/show.toml");
    let config = ShowConfig::load(path).unwrap();
    assert_eq!(config, ShowConfig::default());
}

#[test]
fn verify_seeded_show_runs_within_capacity() {
    let config = ShowConfig::from_toml_str(
        "[pool]\ncapacity = 400\n[show]\nrocket_probability = 0.2\nbloom_iterations = 2\n",
    )
    .unwrap();
    let mut driver = ShowBuilder::new(config)
        .seed(42)
        .build(HeadlessRenderer::new(800, 600))
        .unwrap();

    let mut explosions = 0;
    for tick in 0..1200 {
        let outcome = driver.frame(f64::from(tick) / 60.0).unwrap();
        let TickOutcome::Rendered(result) = outcome else {
            panic!("show suspended without a context loss");
        };
        explosions += result.explosions;

        assert!(driver.pool().len() <= 400);
        assert_eq!(driver.renderer().calls()[2], RenderCall::Upload { instances: 400 });
        assert!(driver.renderer().on_screen_instances() <= driver.renderer().visible_instances());
        assert_eq!(driver.renderer().blur_steps().len(), 4);
    }

    assert!(driver.stats().rockets_launched > 0);
    assert!(explosions > 0);
    assert_eq!(u64::from(explosions), driver.stats().explosions);
    assert_eq!(driver.stats().total_frames, 1200);
}

#[test]
fn verify_context_loss_and_restore() {
    let mut driver = ShowBuilder::new(ShowConfig::default())
        .seed(7)
        .build(HeadlessRenderer::new(640, 480))
        .unwrap();

    driver.frame(0.0).unwrap();
    driver.renderer_mut().lose_context();
    assert_eq!(driver.frame(0.016).unwrap(), TickOutcome::Suspended);
    assert!(driver.is_suspended());

    driver.on_context_restored().unwrap();
    assert!(matches!(driver.frame(30.0).unwrap(), TickOutcome::Rendered(_)));
    assert_eq!(driver.renderer().stats().initializations, 2);
    assert_eq!(driver.stats().context_losses, 1);
}
