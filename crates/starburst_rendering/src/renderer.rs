//! # Renderer Boundary
//!
//! The frame driver never touches a graphics API. It talks to a backend
//! through [`Renderer`], in this order every frame:
//!
//! ```text
//! set_world_matrix → clear → upload_instance_data → draw_instanced
//!                  → run_bloom_pass → composite
//! ```
//!
//! [`HeadlessRenderer`] implements the contract without a GPU and records
//! every call, which is what tests and the headless binary run against.

use crate::bloom::{BloomPlan, BlurPass, BlurTarget};
use crate::error::RendererError;
use crate::layout::{AttributeSource, InstanceLayout, VertexAttribute};

/// Drawing-buffer size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero height counts as one pixel.
    #[must_use]
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

/// A GPU backend able to draw the show.
pub trait Renderer {
    /// Builds programs, buffers and render targets from scratch.
    ///
    /// Called once at startup and again after the context is restored.
    ///
    /// # Errors
    ///
    /// Shader compile or link failures. Fatal at startup.
    fn initialize(&mut self) -> Result<Viewport, RendererError>;

    /// True once the context is gone and until `initialize` succeeds again.
    fn is_context_lost(&self) -> bool;

    /// Resizes the drawing buffer and render targets.
    fn resize(&mut self, width: u32, height: u32) -> Viewport;

    /// Uploads the camera matrix, column-major.
    fn set_world_matrix(&mut self, world: &[f32; 16]);

    /// Clears every render target.
    fn clear(&mut self);

    /// Uploads `capacity × 16` transform floats and `capacity × 5` light floats.
    fn upload_instance_data(&mut self, transforms: &[f32], lights: &[f32]);

    /// Draws the quad once per instance into the base and luminance targets.
    fn draw_instanced(&mut self, vertex_count: u32, instance_count: u32);

    /// Runs `iterations` vertical+horizontal blur pairs over the luminance target.
    fn run_bloom_pass(&mut self, iterations: u32);

    /// Adds the blurred glow over the base image and presents.
    fn composite(&mut self);
}

/// One call recorded by [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCall {
    /// World uniform set.
    SetWorld,
    /// Targets cleared.
    Clear,
    /// Instance data uploaded.
    Upload {
        /// Records in the upload.
        instances: usize,
    },
    /// Instanced draw issued.
    Draw {
        /// Vertices per instance.
        vertices: u32,
        /// Instance count.
        instances: u32,
    },
    /// One blur pass.
    Blur(BlurPass),
    /// Final combine, reading the given blur target.
    Composite(BlurTarget),
}

/// Counters kept by [`HeadlessRenderer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessStats {
    /// Successful `initialize` calls.
    pub initializations: u32,
    /// Frames composited.
    pub frames: u64,
    /// Instances drawn over all frames.
    pub instances_drawn: u64,
    /// Blur passes run over all frames.
    pub blur_passes: u64,
    /// Uploads whose two buffers disagreed on instance count.
    pub malformed_uploads: u32,
}

/// A [`Renderer`] without a GPU.
///
/// Keeps the last uploaded buffers and world matrix, logs the calls of the
/// current frame and can simulate startup failure or context loss.
pub struct HeadlessRenderer {
    viewport: Viewport,
    context_lost: bool,
    init_failure: Option<RendererError>,
    world: [f32; 16],
    transforms: Vec<f32>,
    lights: Vec<f32>,
    bloom_source: BlurTarget,
    blur_steps: Vec<[f32; 2]>,
    calls: Vec<RenderCall>,
    stats: HeadlessStats,
}

impl HeadlessRenderer {
    /// Creates a headless backend with the given drawing-buffer size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            context_lost: false,
            init_failure: None,
            world: [0.0; 16],
            transforms: Vec::new(),
            lights: Vec::new(),
            bloom_source: BlurTarget::Luminance,
            blur_steps: Vec::new(),
            calls: Vec::with_capacity(32),
            stats: HeadlessStats::default(),
        }
    }

    /// Makes the next `initialize` fail with `error`.
    #[must_use]
    pub fn with_init_failure(mut self, error: RendererError) -> Self {
        self.init_failure = Some(error);
        self
    }

    /// Simulates the context going away.
    pub fn lose_context(&mut self) {
        self.context_lost = true;
    }

    /// Current drawing-buffer size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last world matrix, column-major.
    #[must_use]
    pub fn world_matrix(&self) -> &[f32; 16] {
        &self.world
    }

    /// Last uploaded transform buffer.
    #[must_use]
    pub fn transforms(&self) -> &[f32] {
        &self.transforms
    }

    /// Last uploaded light buffer.
    #[must_use]
    pub fn lights(&self) -> &[f32] {
        &self.lights
    }

    /// Instances in the last upload whose transform is not collapsed.
    #[must_use]
    pub fn visible_instances(&self) -> usize {
        self.transforms
            .chunks_exact(InstanceLayout::TRANSFORM_FLOATS)
            .filter(|m| m[15] != 0.0)
            .count()
    }

    /// Instances in the last upload with at least one star corner inside
    /// the clip volume after the model and world transforms.
    ///
    /// Model columns are gathered through the transform attributes, the
    /// way the vertex fetch reads them.
    #[must_use]
    pub fn on_screen_instances(&self) -> usize {
        let columns: Vec<VertexAttribute> = InstanceLayout::attributes()
            .into_iter()
            .filter(|a| a.source == AttributeSource::Transforms)
            .collect();
        let Some(stride) = columns.first().map(|a| a.stride / 4) else {
            return 0;
        };

        self.transforms
            .chunks_exact(stride)
            .filter(|record| {
                let mut model = [0.0_f32; 16];
                for column in &columns {
                    let start = column.offset / 4;
                    let end = start + column.components as usize;
                    model[start..end].copy_from_slice(&record[start..end]);
                }
                InstanceLayout::QUAD.iter().any(|&[x, y]| {
                    let local = transform_point(&model, [x, y, 0.0, 1.0]);
                    inside_clip(transform_point(&self.world, local))
                })
            })
            .count()
    }

    /// Texel steps of the blur passes run this frame, in pass order.
    #[must_use]
    pub fn blur_steps(&self) -> &[[f32; 2]] {
        &self.blur_steps
    }

    /// Calls made since the last `clear`.
    #[must_use]
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> HeadlessStats {
        self.stats
    }
}

impl Renderer for HeadlessRenderer {
    fn initialize(&mut self) -> Result<Viewport, RendererError> {
        if let Some(error) = self.init_failure.take() {
            return Err(error);
        }
        self.context_lost = false;
        self.transforms.clear();
        self.lights.clear();
        self.calls.clear();
        self.blur_steps.clear();
        self.bloom_source = BlurTarget::Luminance;
        self.stats.initializations += 1;
        Ok(self.viewport)
    }

    fn is_context_lost(&self) -> bool {
        self.context_lost
    }

    fn resize(&mut self, width: u32, height: u32) -> Viewport {
        self.viewport = Viewport::new(width, height);
        self.viewport
    }

    fn set_world_matrix(&mut self, world: &[f32; 16]) {
        self.world = *world;
        self.calls.push(RenderCall::SetWorld);
    }

    fn clear(&mut self) {
        // The world uniform is set before the clear, keep it in the log
        let keep_world = self.calls.last() == Some(&RenderCall::SetWorld);
        self.calls.clear();
        if keep_world {
            self.calls.push(RenderCall::SetWorld);
        }
        self.calls.push(RenderCall::Clear);
    }

    fn upload_instance_data(&mut self, transforms: &[f32], lights: &[f32]) {
        let instances = InstanceLayout::instance_count(transforms, lights).unwrap_or_else(|| {
            self.stats.malformed_uploads += 1;
            0
        });
        self.transforms.clear();
        self.transforms.extend_from_slice(transforms);
        self.lights.clear();
        self.lights.extend_from_slice(lights);
        self.calls.push(RenderCall::Upload { instances });
    }

    fn draw_instanced(&mut self, vertex_count: u32, instance_count: u32) {
        self.stats.instances_drawn += u64::from(instance_count);
        self.calls.push(RenderCall::Draw {
            vertices: vertex_count,
            instances: instance_count,
        });
    }

    fn run_bloom_pass(&mut self, iterations: u32) {
        let plan = BloomPlan::new(iterations);
        self.blur_steps.clear();
        let Viewport { width, height } = self.viewport;
        for pass in plan.passes() {
            self.blur_steps.push(pass.direction.texel_step(width, height));
            self.calls.push(RenderCall::Blur(*pass));
        }
        self.stats.blur_passes += plan.passes().len() as u64;
        self.bloom_source = plan.composite_source();
    }

    fn composite(&mut self) {
        self.stats.frames += 1;
        self.calls.push(RenderCall::Composite(self.bloom_source));
    }
}

/// `m · p` for a column-major 4×4 matrix.
fn transform_point(m: &[f32; 16], p: [f32; 4]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (col, weight) in p.iter().enumerate() {
        for (row, value) in out.iter_mut().enumerate() {
            *value += m[col * 4 + row] * weight;
        }
    }
    out
}

fn inside_clip([x, y, z, w]: [f32; 4]) -> bool {
    w > 0.0 && x.abs() <= w && y.abs() <= w && z.abs() <= w
}
