//! Vertex attribute wiring for the instanced spark draw.
//!
//! Three sources feed the vertex shader: the static star quad (per
//! vertex), the transform buffer and the light buffer (both per instance).
//! A `mat4` attribute occupies four consecutive locations, one column each.

use starburst_core::{LightRecord, TransformRecord};

/// Buffer an attribute is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeSource {
    /// Static quad corners, advanced per vertex.
    Quad,
    /// Model matrices, advanced per instance.
    Transforms,
    /// Color and glow, advanced per instance.
    Lights,
}

/// One shader input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader variable name.
    pub name: &'static str,
    /// Backing buffer.
    pub source: AttributeSource,
    /// Float components.
    pub components: u32,
    /// Byte offset within one record.
    pub offset: usize,
    /// Bytes between records.
    pub stride: usize,
}

impl VertexAttribute {
    /// True for attributes that advance once per instance.
    #[must_use]
    pub const fn per_instance(&self) -> bool {
        !matches!(self.source, AttributeSource::Quad)
    }
}

/// Static description of the spark draw.
pub struct InstanceLayout;

impl InstanceLayout {
    /// Vertices per spark.
    pub const QUAD_VERTICES: u32 = 6;

    /// Two overlapping triangles forming a six-pointed star, unit size.
    pub const QUAD: [[f32; 2]; 6] = [
        [0.5, 0.0],
        [-0.25, 0.43],
        [-0.25, -0.43],
        [-0.5, 0.0],
        [0.25, -0.43],
        [0.25, 0.43],
    ];

    /// Floats per transform record.
    pub const TRANSFORM_FLOATS: usize = TransformRecord::SIZE / 4;

    /// Floats per light record.
    pub const LIGHT_FLOATS: usize = LightRecord::SIZE / 4;

    /// Every attribute of the spark shader, in location order.
    #[must_use]
    pub fn attributes() -> [VertexAttribute; 8] {
        let column = |name, index: usize| VertexAttribute {
            name,
            source: AttributeSource::Transforms,
            components: 4,
            offset: index * 16,
            stride: TransformRecord::SIZE,
        };
        let light = |name, components, offset| VertexAttribute {
            name,
            source: AttributeSource::Lights,
            components,
            offset,
            stride: LightRecord::SIZE,
        };

        [
            VertexAttribute {
                name: "pos",
                source: AttributeSource::Quad,
                components: 2,
                offset: 0,
                stride: 8,
            },
            column("model[0]", 0),
            column("model[1]", 1),
            column("model[2]", 2),
            column("model[3]", 3),
            light("color", 3, 0),
            light("lum", 1, 12),
            light("intsy", 1, 16),
        ]
    }

    /// Instances covered by an upload, or `None` when the two buffers
    /// disagree or hold a partial record.
    #[must_use]
    pub fn instance_count(transforms: &[f32], lights: &[f32]) -> Option<usize> {
        if transforms.len() % Self::TRANSFORM_FLOATS != 0 || lights.len() % Self::LIGHT_FLOATS != 0 {
            return None;
        }
        let count = transforms.len() / Self::TRANSFORM_FLOATS;
        (count == lights.len() / Self::LIGHT_FLOATS).then_some(count)
    }
}
