//! Shared instance buffers.
//!
//! Two flat arrays, one record per pool slot, rewritten in place every frame
//! and read by the renderer right after. Slot `i` owns record `i` in both.

use bytemuck::{Pod, Zeroable};

/// Per-instance model matrix, column-major as the GPU expects it.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TransformRecord {
    /// 16 elements, column-major.
    pub columns: [f32; 16],
}

impl TransformRecord {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Per-instance color and glow parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LightRecord {
    /// Linear RGB.
    pub color: [f32; 3],
    /// Brightness of the base pass.
    pub luminance: f32,
    /// Exponent applied to luminance for the bloom source.
    pub intensity: f32,
}

impl LightRecord {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// The two buffers the renderer uploads each frame.
pub struct InstanceBuffers {
    /// One model matrix per slot.
    transforms: Vec<TransformRecord>,
    /// One light record per slot.
    lights: Vec<LightRecord>,
}

impl InstanceBuffers {
    /// Allocates zeroed buffers for `capacity` slots.
    ///
    /// A zeroed transform collapses the quad to a point, so unused slots
    /// draw nothing.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            transforms: vec![TransformRecord::zeroed(); capacity],
            lights: vec![LightRecord::zeroed(); capacity],
        }
    }

    /// Number of slots covered.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.transforms.len()
    }

    /// Overwrites slot `index`. Out-of-range writes are ignored.
    #[inline]
    pub fn write(&mut self, index: usize, transform: TransformRecord, light: LightRecord) {
        if let (Some(t), Some(l)) = (self.transforms.get_mut(index), self.lights.get_mut(index)) {
            *t = transform;
            *l = light;
        }
    }

    /// Transform record of slot `index`.
    #[must_use]
    pub fn transform(&self, index: usize) -> Option<&TransformRecord> {
        self.transforms.get(index)
    }

    /// Light record of slot `index`.
    #[must_use]
    pub fn light(&self, index: usize) -> Option<&LightRecord> {
        self.lights.get(index)
    }

    /// All transforms as `capacity × 16` floats.
    #[must_use]
    pub fn transforms_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// All lights as `capacity × 5` floats.
    #[must_use]
    pub fn lights_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.lights)
    }

    /// Transform buffer as raw bytes for GPU upload.
    #[must_use]
    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// Light buffer as raw bytes for GPU upload.
    #[must_use]
    pub fn light_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.lights)
    }
}
