//! # Frame Driver
//!
//! One tick of the show:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          FRAME TIMELINE                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  frame(now)                                                     │
//! │    ├── suspended? → Suspended (caller stops scheduling)         │
//! │    └── delta = now - last, clamped to [0, max_delta]            │
//! │                                                                 │
//! │  advance(delta)                                                 │
//! │    ├── Camera spin, world + billboard matrices                  │
//! │    ├── SparkPool::step (update + render every slot)             │
//! │    ├── Renderer: upload → draw → bloom → composite              │
//! │    └── Maybe launch a rocket                                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Context loss flips the driver into the suspended state. Restoration
//! rebuilds the renderer from scratch and resumes with a fresh clock.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use starburst_core::{SparkDesc, SparkHandle, SparkKind, SparkPool};
use starburst_math::vector::random_vector;
use starburst_math::Vec3;

use crate::camera::{Camera, CameraConfig};
use crate::error::ShowError;
use crate::layout::InstanceLayout;
use crate::renderer::{Renderer, Viewport};

const ROCKET_LIFETIME: f64 = 5.0;
const ROCKET_SIZE: f64 = 10.0;
const ROCKET_LUMINANCE: f64 = 1.0;
const ROCKET_INTENSITY: f64 = 20.0;
/// Launch pad half-extent on x and z.
const LAUNCH_SPREAD: f64 = 50.0;
/// Horizontal launch speed half-range.
const LAUNCH_DRIFT: f64 = 25.0;
const LAUNCH_SPEED_MIN: f64 = 50.0;
const LAUNCH_SPEED_MAX: f64 = 550.0;

/// Tunables for the frame loop, the `[show]` table minus what the
/// composition crate consumes itself.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverSettings {
    /// Chance per frame of launching a rocket.
    pub rocket_probability: f64,
    /// Largest delta a single frame may advance by.
    pub max_delta: f64,
    /// Delta of the very first frame, when there is no previous timestamp.
    pub first_delta: f64,
    /// Blur iterations per frame.
    pub bloom_iterations: u32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            rocket_probability: 0.025,
            max_delta: 0.1,
            first_delta: 0.001,
            bloom_iterations: 8,
        }
    }
}

/// Result of a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameResult {
    /// Frame number, starting at 1.
    pub frame_number: u64,
    /// Seconds the simulation advanced.
    pub delta: f64,
    /// True when the raw delta was out of range.
    pub clamped: bool,
    /// Live sparks after the step.
    pub active: u32,
    /// Sparks spawned during the step.
    pub spawned: u32,
    /// Spawn requests dropped during the step.
    pub dropped: u32,
    /// Live sparks evicted during the step.
    pub preempted: u32,
    /// Rockets that exploded during the step.
    pub explosions: u32,
    /// True when a rocket was launched at the end of the frame.
    pub rocket_launched: bool,
}

/// What the caller should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The frame ran; schedule the next one.
    Rendered(FrameResult),
    /// The context is lost; do not schedule until it is restored.
    Suspended,
}

/// Statistics for the frame driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Total frames rendered.
    pub total_frames: u64,
    /// Rockets launched.
    pub rockets_launched: u64,
    /// Rockets that exploded.
    pub explosions: u64,
    /// Frames whose delta was clamped.
    pub clamped_frames: u64,
    /// Times the context was lost.
    pub context_losses: u32,
}

/// Owns the simulation and feeds a [`Renderer`] once per tick.
pub struct FrameDriver<R: Renderer> {
    renderer: R,
    pool: SparkPool,
    camera: Camera,
    settings: DriverSettings,
    rng: ChaCha8Rng,
    viewport: Viewport,
    last_time: Option<f64>,
    suspended: bool,
    frame_count: u64,
    stats: DriverStats,
}

impl<R: Renderer> FrameDriver<R> {
    /// Initializes the renderer and builds the camera for its viewport.
    ///
    /// # Errors
    ///
    /// A renderer that fails to initialize is fatal.
    pub fn new(
        mut renderer: R,
        pool: SparkPool,
        camera: CameraConfig,
        settings: DriverSettings,
        rng: ChaCha8Rng,
    ) -> Result<Self, ShowError> {
        let viewport = renderer.initialize()?;
        let camera = Camera::new(camera, viewport)?;

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            capacity = pool.capacity(),
            "frame driver started"
        );

        Ok(Self {
            renderer,
            pool,
            camera,
            settings,
            rng,
            viewport,
            last_time: None,
            suspended: false,
            frame_count: 0,
            stats: DriverStats::default(),
        })
    }

    /// Runs one tick at wall time `now` (seconds).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`FrameDriver::advance`].
    pub fn frame(&mut self, now: f64) -> Result<TickOutcome, ShowError> {
        if !self.suspended && self.renderer.is_context_lost() {
            self.on_context_lost();
        }
        if self.suspended {
            return Ok(TickOutcome::Suspended);
        }

        let (delta, clamped) = match self.last_time {
            None => (self.settings.first_delta, false),
            Some(last) => {
                let raw = now - last;
                let clamped = !(0.0..=self.settings.max_delta).contains(&raw);
                let delta = raw.clamp(0.0, self.settings.max_delta);
                if clamped {
                    tracing::warn!(raw, clamped_to = delta, "frame delta clamped");
                }
                (delta, clamped)
            }
        };
        self.last_time = Some(now);

        if clamped {
            self.stats.clamped_frames += 1;
        }
        let mut result = self.advance(delta)?;
        result.clamped = clamped;
        Ok(TickOutcome::Rendered(result))
    }

    /// Advances the show by exactly `delta` seconds and draws it.
    ///
    /// # Errors
    ///
    /// Matrix errors from the camera or the pool.
    pub fn advance(&mut self, delta: f64) -> Result<FrameResult, ShowError> {
        self.frame_count += 1;

        self.camera.advance(delta)?;
        self.pool.set_billboard(self.camera.inverse_rotation().clone())?;
        self.renderer.set_world_matrix(&self.camera.world_uniform()?);
        self.renderer.clear();

        let pool_stats = self.pool.step(delta, &mut self.rng)?;

        let buffers = self.pool.buffers();
        self.renderer
            .upload_instance_data(buffers.transforms_flat(), buffers.lights_flat());
        self.renderer
            .draw_instanced(InstanceLayout::QUAD_VERTICES, self.pool.capacity() as u32);
        self.renderer.run_bloom_pass(self.settings.bloom_iterations);
        self.renderer.composite();

        let rocket_launched = self.rng.gen::<f64>() < self.settings.rocket_probability
            && self.launch_rocket().is_some();

        self.stats.total_frames += 1;
        self.stats.explosions += u64::from(pool_stats.explosions);

        Ok(FrameResult {
            frame_number: self.frame_count,
            delta,
            clamped: false,
            active: pool_stats.active,
            spawned: pool_stats.spawned,
            dropped: pool_stats.dropped,
            preempted: pool_stats.preempted,
            explosions: pool_stats.explosions,
            rocket_launched,
        })
    }

    /// Launches a rocket from the ground below the view.
    pub fn launch_rocket(&mut self) -> Option<SparkHandle> {
        let rng = &mut self.rng;
        let ground = -f64::from(self.viewport.height) / 2.0;

        let position = Vec3::new(
            rng.gen_range(-LAUNCH_SPREAD..LAUNCH_SPREAD),
            ground,
            rng.gen_range(-LAUNCH_SPREAD..LAUNCH_SPREAD),
        );
        let velocity = Vec3::new(
            rng.gen_range(-LAUNCH_DRIFT..LAUNCH_DRIFT),
            rng.gen_range(LAUNCH_SPEED_MIN..LAUNCH_SPEED_MAX),
            rng.gen_range(-LAUNCH_DRIFT..LAUNCH_DRIFT),
        );
        let color = random_vector(rng, 1.0).abs().to_array();

        let handle = self.pool.spawn(
            SparkDesc::new(SparkKind::Rocket, ROCKET_LIFETIME, ROCKET_SIZE)
                .at(position)
                .moving(velocity)
                .colored(color)
                .glowing(ROCKET_LUMINANCE, ROCKET_INTENSITY),
        );
        if handle.is_some() {
            self.stats.rockets_launched += 1;
        }
        handle
    }

    /// Resizes the renderer and recomputes the projection.
    ///
    /// # Errors
    ///
    /// Matrix errors from the projection.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), ShowError> {
        self.viewport = self.renderer.resize(width, height);
        self.camera.resize(self.viewport)?;
        tracing::debug!(
            width = self.viewport.width,
            height = self.viewport.height,
            "viewport resized"
        );
        Ok(())
    }

    /// Stops the loop until the context comes back.
    pub fn on_context_lost(&mut self) {
        if self.suspended {
            return;
        }
        self.suspended = true;
        self.stats.context_losses += 1;
        tracing::warn!(frame = self.frame_count, "rendering context lost, suspending");
    }

    /// Rebuilds renderer resources and resumes the loop.
    ///
    /// The pool and its buffers survive; the next tick re-uploads them.
    ///
    /// # Errors
    ///
    /// A renderer that fails to rebuild stays suspended.
    pub fn on_context_restored(&mut self) -> Result<(), ShowError> {
        self.viewport = self.renderer.initialize()?;
        self.camera.resize(self.viewport)?;
        self.suspended = false;
        self.last_time = None;
        tracing::info!(frame = self.frame_count, "rendering context restored");
        Ok(())
    }

    /// True while the context is lost.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// The spark pool.
    #[must_use]
    pub fn pool(&self) -> &SparkPool {
        &self.pool
    }

    /// The spark pool, mutably.
    pub fn pool_mut(&mut self) -> &mut SparkPool {
        &mut self.pool
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The backend.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The backend, mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Current drawing-buffer size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Loop tunables.
    #[must_use]
    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// Returns statistics.
    #[must_use]
    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    /// Frames advanced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
