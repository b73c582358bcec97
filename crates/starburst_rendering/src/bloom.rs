//! # Bloom Schedule
//!
//! The glow is a separable Gaussian blur over the luminance target,
//! repeated `iterations` times, then added over the base image.
//!
//! ```text
//!  iteration 0:  Luminance ──V──▶ BlurA ──H──▶ BlurB
//!  iteration n:  BlurB     ──V──▶ BlurA ──H──▶ BlurB
//!  composite:    Base + BlurB
//! ```
//!
//! Backends share this plan so every one of them ping-pongs the same way.

/// Kernel half-weights, center first. Mirrored taps reuse them, so
/// `w[0] + 2 * (w[1] + .. + w[4])` is one.
pub const GAUSSIAN_WEIGHTS: [f32; 5] = [0.227_027, 0.194_594_6, 0.121_621_6, 0.054_054, 0.016_216];

/// Render targets involved in the bloom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlurTarget {
    /// High-luminance output of the instanced draw.
    Luminance,
    /// First ping-pong target, written by vertical passes.
    BlurA,
    /// Second ping-pong target, written by horizontal passes.
    BlurB,
}

/// Axis a pass samples along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurDirection {
    /// Samples along y.
    Vertical,
    /// Samples along x.
    Horizontal,
}

impl BlurDirection {
    /// Texel step for a target of the given size, in UV units.
    ///
    /// The step spans two texels, which widens the kernel for free.
    #[must_use]
    pub fn texel_step(self, width: u32, height: u32) -> [f32; 2] {
        match self {
            Self::Vertical => [0.0, 2.0 / height.max(1) as f32],
            Self::Horizontal => [2.0 / width.max(1) as f32, 0.0],
        }
    }
}

/// One full-screen blur draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurPass {
    /// Sampling axis.
    pub direction: BlurDirection,
    /// Texture read.
    pub source: BlurTarget,
    /// Framebuffer written.
    pub target: BlurTarget,
}

/// Ordered blur passes for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomPlan {
    passes: Vec<BlurPass>,
}

impl BloomPlan {
    /// Plans `iterations` vertical+horizontal pairs.
    #[must_use]
    pub fn new(iterations: u32) -> Self {
        let mut passes = Vec::with_capacity(iterations as usize * 2);
        for i in 0..iterations {
            let source = if i == 0 {
                BlurTarget::Luminance
            } else {
                BlurTarget::BlurB
            };
            passes.push(BlurPass {
                direction: BlurDirection::Vertical,
                source,
                target: BlurTarget::BlurA,
            });
            passes.push(BlurPass {
                direction: BlurDirection::Horizontal,
                source: BlurTarget::BlurA,
                target: BlurTarget::BlurB,
            });
        }
        Self { passes }
    }

    /// Passes in execution order.
    #[must_use]
    pub fn passes(&self) -> &[BlurPass] {
        &self.passes
    }

    /// Target the composite should read: the last one written, or the raw
    /// luminance when no blur ran.
    #[must_use]
    pub fn composite_source(&self) -> BlurTarget {
        self.passes
            .last()
            .map_or(BlurTarget::Luminance, |pass| pass.target)
    }
}
