//! # Spark Pool
//!
//! Fixed-capacity slot arena with recycling and priority-aware eviction.
//!
//! ## Allocation policy
//!
//! 1. While fewer than `capacity` slots have ever been used, append.
//! 2. Otherwise scan circularly from the cursor for an inactive slot.
//! 3. Otherwise scan again for a slot whose kind is not important and
//!    preempt the live spark in it.
//! 4. Otherwise drop the request and return `None`.
//!
//! The cursor persists across calls, so reuse walks round-robin through the
//! pool instead of hammering the first free region.

use bytemuck::Zeroable;
use rand::Rng;
use starburst_math::{Matrix, MatrixError, MatrixResult};

use super::rules::{self, Burst};
use super::slot::{Spark, SparkDesc};
use crate::buffers::{InstanceBuffers, TransformRecord};
use crate::config::SparkConfig;

/// Handle to a slot in a [`SparkPool`].
///
/// A handle names a slot, not a particular spark: once the spark dies the
/// slot may be handed to someone else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SparkHandle {
    /// Index into the pool.
    index: usize,
}

impl SparkHandle {
    /// Slot index, which is also the record index in the instance buffers.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Statistics from the spark pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Total slots in the pool.
    pub capacity: u32,
    /// Slots that have ever been used.
    pub allocated: u32,
    /// Slots currently alive.
    pub active: u32,
    /// Sparks spawned this frame.
    pub spawned: u32,
    /// Spawn requests dropped this frame (pool exhausted).
    pub dropped: u32,
    /// Live low-priority sparks evicted this frame.
    pub preempted: u32,
    /// Rockets that exploded this frame.
    pub explosions: u32,
    /// Fragments spawned by explosions this frame.
    pub fragments: u32,
}

/// The particle slot pool.
pub struct SparkPool {
    /// Slots in use, never longer than `capacity`.
    slots: Vec<Spark>,
    /// Hard cap on slots.
    capacity: usize,
    /// Where the next reuse scan starts (exclusive).
    cursor: usize,
    /// Shared records read by the renderer.
    buffers: InstanceBuffers,
    /// Inverse camera rotation applied to every quad.
    billboard: Matrix,
    /// Rule tunables.
    config: SparkConfig,
    /// Per-frame counters.
    stats: PoolStats,
}

impl SparkPool {
    /// Creates a pool with `capacity` slots and zeroed instance buffers.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize, config: SparkConfig) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
            buffers: InstanceBuffers::new(capacity),
            billboard: Matrix::identity(4),
            config,
            stats: PoolStats {
                capacity: capacity as u32,
                ..PoolStats::default()
            },
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots that have ever been used.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True until the first spawn.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots currently alive.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// Rule tunables.
    #[must_use]
    pub fn config(&self) -> &SparkConfig {
        &self.config
    }

    /// Shared instance buffers.
    #[must_use]
    pub fn buffers(&self) -> &InstanceBuffers {
        &self.buffers
    }

    /// Current inverse camera rotation.
    #[must_use]
    pub fn billboard(&self) -> &Matrix {
        &self.billboard
    }

    /// Statistics for the current frame.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            allocated: self.slots.len() as u32,
            active: self.active_count() as u32,
            ..self.stats
        }
    }

    /// Gets the spark in a slot.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: SparkHandle) -> Option<&Spark> {
        self.slots.get(handle.index)
    }

    /// Gets the spark in a slot mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: SparkHandle) -> Option<&mut Spark> {
        self.slots.get_mut(handle.index)
    }

    /// Iterates over every used slot, alive or not.
    pub fn iter(&self) -> impl Iterator<Item = (SparkHandle, &Spark)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, spark)| (SparkHandle { index }, spark))
    }

    /// Sets the matrix that turns every quad to face the camera.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] unless `billboard` is 4×4.
    pub fn set_billboard(&mut self, billboard: Matrix) -> MatrixResult<()> {
        if billboard.dim() != 4 {
            return Err(MatrixError::DimensionMismatch {
                left: 4,
                right: billboard.dim(),
            });
        }
        self.billboard = billboard;
        Ok(())
    }

    /// Brings a spark to life in a free or reclaimable slot.
    ///
    /// Returns `None` when every slot holds a live important spark; the
    /// request is dropped and counted, never reported as an error.
    pub fn spawn(&mut self, desc: SparkDesc) -> Option<SparkHandle> {
        if self.slots.len() < self.capacity {
            self.slots.push(Spark::from_desc(desc));
            self.stats.spawned += 1;
            return Some(SparkHandle {
                index: self.slots.len() - 1,
            });
        }

        if let Some(index) = self.scan(|spark| !spark.is_active()) {
            self.slots[index].reset(desc);
            self.stats.spawned += 1;
            return Some(SparkHandle { index });
        }

        if let Some(index) = self.scan(|spark| !spark.is_important()) {
            tracing::debug!(
                slot = index,
                evicted = ?self.slots[index].kind,
                incoming = ?desc.kind,
                "preempting live spark"
            );
            self.slots[index].reset(desc);
            self.stats.spawned += 1;
            self.stats.preempted += 1;
            return Some(SparkHandle { index });
        }

        tracing::trace!(kind = ?desc.kind, "spark pool exhausted, spawn dropped");
        self.stats.dropped += 1;
        None
    }

    /// One full circle starting just past the cursor. Leaves the cursor on
    /// the accepted slot, or where it was if nothing matched.
    fn scan(&mut self, accept: impl Fn(&Spark) -> bool) -> Option<usize> {
        let capacity = self.capacity;
        let found = (1..=capacity)
            .map(|offset| (self.cursor + offset) % capacity)
            .find(|&index| accept(&self.slots[index]))?;
        self.cursor = found;
        Some(found)
    }

    /// Advances one slot by `dt` seconds and performs the spawns its rule
    /// asked for.
    ///
    /// An inactive slot instead collapses its transform to zero and writes
    /// it out, so its buffer record stays well-defined.
    ///
    /// # Errors
    ///
    /// Propagates matrix errors from the transform product.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        handle: SparkHandle,
        dt: f64,
        rng: &mut R,
    ) -> MatrixResult<()> {
        self.update_slot(handle.index, dt, rng)?;
        Ok(())
    }

    /// Returns `true` when one of the slot's own spawns landed back in it.
    fn update_slot<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        dt: f64,
        rng: &mut R,
    ) -> MatrixResult<bool> {
        let Some(spark) = self.slots.get_mut(index) else {
            return Ok(false);
        };

        if !spark.is_active() {
            spark.transform = Matrix::zero(4);
            let light = spark.light_record();
            self.buffers.write(index, TransformRecord::zeroed(), light);
            return Ok(false);
        }

        let effects = rules::advance(spark, dt, &self.config, rng);
        spark.transform =
            Matrix::scale_translate(spark.size, spark.position).multiply(&self.billboard)?;

        let mut replaced = false;
        if let Some(ember) = effects.ember {
            // Embers are decoration: a full pool just means no trail.
            replaced |= self.spawn(ember).is_some_and(|h| h.index == index);
        }
        if let Some(burst) = effects.burst {
            replaced |= self.explode(index, &burst, rng);
        }

        Ok(replaced)
    }

    /// Returns `true` if a fragment took the rocket's own slot.
    fn explode<R: Rng + ?Sized>(&mut self, slot: usize, burst: &Burst, rng: &mut R) -> bool {
        let requested = rules::fragment_count(&self.config, rng);
        let mut spawned = 0;
        let mut reused_own_slot = false;

        for _ in 0..requested {
            let fragment = rules::fragment(burst, &self.config, rng);
            let Some(handle) = self.spawn(fragment) else {
                break;
            };
            reused_own_slot |= handle.index == slot;
            spawned += 1;
        }

        self.stats.explosions += 1;
        self.stats.fragments += spawned;
        tracing::debug!(
            slot,
            requested,
            spawned,
            truncated = spawned < requested,
            "rocket exploded"
        );
        reused_own_slot
    }

    /// Writes an active slot's transform (column-major) and light record
    /// into the shared buffers. Inactive slots are left alone.
    ///
    /// # Errors
    ///
    /// Propagates matrix errors from the export.
    pub fn render(&mut self, handle: SparkHandle) -> MatrixResult<()> {
        let Some(spark) = self.slots.get(handle.index) else {
            return Ok(());
        };
        if !spark.is_active() {
            return Ok(());
        }

        let transform = spark.transform_record()?;
        let light = spark.light_record();
        self.buffers.write(handle.index, transform, light);
        Ok(())
    }

    /// Updates then renders every used slot.
    ///
    /// Sparks spawned during the step are appended past the range being
    /// walked, so they first move on the next step. A slot handed to one of
    /// its own spawns keeps last frame's record until it is updated.
    ///
    /// # Errors
    ///
    /// Propagates matrix errors from any slot.
    pub fn step<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> MatrixResult<PoolStats> {
        self.stats = PoolStats {
            capacity: self.capacity as u32,
            ..PoolStats::default()
        };

        for index in 0..self.slots.len() {
            if !self.update_slot(index, dt, rng)? {
                self.render(SparkHandle { index })?;
            }
        }

        Ok(self.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spark::SparkKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use starburst_math::Vec3;

    fn quiet() -> SparkConfig {
        SparkConfig {
            ember_probability: 0.0,
            ..SparkConfig::default()
        }
    }

    fn fill(pool: &mut SparkPool, kind: SparkKind) -> Vec<SparkHandle> {
        (0..pool.capacity())
            .map(|_| pool.spawn(SparkDesc::new(kind, 10.0, 1.0)).unwrap())
            .collect()
    }

    #[test]
    fn test_spawn_appends_until_capacity() {
        let mut pool = SparkPool::new(4, quiet());
        let handles = fill(&mut pool, SparkKind::Spark);
        let indices: Vec<_> = handles.iter().map(|h| h.index()).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.stats().spawned, 4);
    }

    #[test]
    fn test_all_important_overflow_is_dropped() {
        for kind in [SparkKind::Rocket, SparkKind::Shell, SparkKind::PopShell] {
            let mut pool = SparkPool::new(5, quiet());
            fill(&mut pool, kind);
            assert!(pool.spawn(SparkDesc::new(SparkKind::Spark, 1.0, 1.0)).is_none());
            assert_eq!(pool.stats().dropped, 1);
        }
    }

    #[test]
    fn test_reuses_aged_out_slot() {
        let mut pool = SparkPool::new(3, quiet());
        let handles = fill(&mut pool, SparkKind::Spark);
        pool.get_mut(handles[1]).unwrap().time = 0.0;

        let reused = pool.spawn(SparkDesc::new(SparkKind::Ember, 2.0, 4.0)).unwrap();
        assert_eq!(reused.index(), 1);
        assert_eq!(pool.get(reused).unwrap().kind, SparkKind::Ember);
        assert_eq!(pool.stats().preempted, 0);
    }

    #[test]
    fn test_single_inactive_slot_found_anywhere() {
        for dead in 0..4 {
            let mut pool = SparkPool::new(4, quiet());
            let handles = fill(&mut pool, SparkKind::Rocket);
            {
                let slot = pool.get_mut(handles[dead]).unwrap();
                slot.kind = SparkKind::Ember;
                slot.time = -1.0;
            }
            let reused = pool.spawn(SparkDesc::new(SparkKind::Spark, 1.0, 1.0)).unwrap();
            assert_eq!(reused, handles[dead]);
        }

        let mut tiny = SparkPool::new(1, quiet());
        let only = tiny.spawn(SparkDesc::new(SparkKind::Ember, 0.0, 1.0)).unwrap();
        assert_eq!(tiny.spawn(SparkDesc::new(SparkKind::Ember, 1.0, 1.0)), Some(only));
    }

    #[test]
    fn test_preempts_low_priority_when_all_alive() {
        let mut pool = SparkPool::new(3, quiet());
        pool.spawn(SparkDesc::new(SparkKind::Rocket, 5.0, 1.0));
        pool.spawn(SparkDesc::new(SparkKind::Spark, 5.0, 1.0));
        pool.spawn(SparkDesc::new(SparkKind::Rocket, 5.0, 1.0));

        let handle = pool.spawn(SparkDesc::new(SparkKind::Ember, 1.0, 1.0)).unwrap();
        assert_eq!(handle.index(), 1);
        assert_eq!(pool.stats().preempted, 1);
    }

    #[test]
    fn test_cursor_walks_round_robin() {
        let mut pool = SparkPool::new(4, quiet());
        fill(&mut pool, SparkKind::Spark);

        let order: Vec<_> = (0..6)
            .map(|_| {
                pool.spawn(SparkDesc::new(SparkKind::Spark, 1.0, 1.0))
                    .unwrap()
                    .index()
            })
            .collect();
        assert_eq!(order, vec![1, 2, 3, 0, 1, 2]);
    }

    #[test]
    fn test_rocket_explodes_once() {
        let mut pool = SparkPool::new(1000, SparkConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let rocket = pool
            .spawn(
                SparkDesc::new(SparkKind::Rocket, 0.1, 10.0)
                    .at(Vec3::new(0.0, -200.0, 0.0))
                    .colored([0.8, 0.3, 0.6]),
            )
            .unwrap();

        let stats = pool.step(0.2, &mut rng).unwrap();
        assert!(!pool.get(rocket).unwrap().is_active());
        assert_eq!(stats.explosions, 1);
        assert!((100..150).contains(&stats.fragments));

        let fragments = pool.iter().filter(|(_, s)| s.kind == SparkKind::Spark).count();
        assert_eq!(fragments as u32, stats.fragments);

        // A dead rocket never explodes again
        let stats = pool.step(0.2, &mut rng).unwrap();
        assert_eq!(stats.explosions, 0);
    }

    #[test]
    fn test_explosion_bounded_by_capacity() {
        let mut pool = SparkPool::new(20, quiet());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        pool.spawn(SparkDesc::new(SparkKind::Rocket, 0.1, 10.0));

        let stats = pool.step(0.2, &mut rng).unwrap();
        assert_eq!(stats.explosions, 1);
        assert!((100..150).contains(&stats.fragments));
        assert_eq!(pool.len(), 20);
        assert!(stats.preempted > 0);
        assert_eq!(stats.dropped, 0);
    }

    #[test]
    fn test_render_writes_column_major() {
        let mut pool = SparkPool::new(2, quiet());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        pool.spawn(
            SparkDesc::new(SparkKind::Ember, 1.0, 2.0)
                .at(Vec3::new(1.0, 2.0, 3.0))
                .colored([0.5, 0.25, 1.0])
                .glowing(0.9, 10.0),
        );

        pool.step(0.0, &mut rng).unwrap();

        let t = pool.buffers().transform(0).unwrap();
        assert_eq!(t.columns[0], 2.0);
        assert_eq!(&t.columns[12..16], &[1.0, 2.0, 3.0, 1.0]);
        assert_eq!(&pool.buffers().lights_flat()[..5], &[0.5, 0.25, 1.0, 0.9, 10.0]);
        // Untouched slot stays zeroed
        assert!(pool.buffers().transforms_flat()[16..].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_billboard_counter_rotates() {
        let mut pool = SparkPool::new(1, quiet());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        pool.set_billboard(Matrix::rotation_y(-0.5)).unwrap();
        let h = pool.spawn(SparkDesc::new(SparkKind::Ember, 1.0, 1.0)).unwrap();
        pool.step(0.0, &mut rng).unwrap();

        let expected = Matrix::scale_translate(1.0, Vec3::ZERO)
            .multiply(&Matrix::rotation_y(-0.5))
            .unwrap();
        assert_eq!(pool.get(h).unwrap().transform(), &expected);
    }

    #[test]
    fn test_inactive_slot_collapses_to_zero() {
        let mut pool = SparkPool::new(2, quiet());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let h = pool
            .spawn(SparkDesc::new(SparkKind::Ember, 1.0, 4.0).at(Vec3::new(5.0, 5.0, 5.0)))
            .unwrap();

        pool.step(0.1, &mut rng).unwrap();
        assert!(pool.buffers().transform(0).unwrap().columns.iter().any(|v| *v != 0.0));

        pool.get_mut(h).unwrap().time = 0.0;
        pool.step(0.1, &mut rng).unwrap();
        assert_eq!(pool.get(h).unwrap().transform(), &Matrix::zero(4));
        assert!(pool.buffers().transform(0).unwrap().columns.iter().all(|v| *v == 0.0));
        assert_eq!(pool.stats().active, 0);
    }

    #[test]
    fn test_slot_taken_by_own_ember_keeps_last_record() {
        let mut pool = SparkPool::new(2, SparkConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        pool.set_billboard(Matrix::rotation_y(-0.5)).unwrap();
        let dying = pool
            .spawn(
                SparkDesc::new(SparkKind::Spark, 0.05, 10.0).at(Vec3::new(100.0, 100.0, 100.0)),
            )
            .unwrap();
        let rocket = pool.spawn(SparkDesc::new(SparkKind::Rocket, 100.0, 1.0)).unwrap();
        let before = *pool.buffers().transform(dying.index()).unwrap();

        pool.step(0.1, &mut rng).unwrap();

        // The dying spark's ember landed back in its slot
        assert_eq!(pool.get(dying).unwrap().kind, SparkKind::Ember);
        let record = pool.buffers().transform(dying.index()).unwrap();
        assert_eq!(*record, before);
        let identity: [f32; 16] = Matrix::identity(4).to_f32_array(true).unwrap();
        assert_ne!(record.columns, identity);

        let rocket_record: [f32; 16] = pool
            .get(rocket)
            .unwrap()
            .transform()
            .to_f32_array(true)
            .unwrap();
        assert_eq!(pool.buffers().transform(rocket.index()).unwrap().columns, rocket_record);
    }

    #[test]
    fn test_fragment_in_rocket_slot_is_not_rendered() {
        let mut pool = SparkPool::new(1, quiet());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let rocket = pool.spawn(SparkDesc::new(SparkKind::Rocket, 0.05, 10.0)).unwrap();

        let stats = pool.step(0.1, &mut rng).unwrap();

        assert_eq!(stats.explosions, 1);
        assert_eq!(pool.get(rocket).unwrap().kind, SparkKind::Spark);
        assert!(pool.buffers().transforms_flat().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_billboard_must_be_4x4() {
        let mut pool = SparkPool::new(1, quiet());
        let err = pool.set_billboard(Matrix::identity(3)).unwrap_err();
        assert_eq!(err, MatrixError::DimensionMismatch { left: 4, right: 3 });
    }
}
