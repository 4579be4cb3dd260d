//! # GPU Layouts
//!
//! WGPU vertex buffer layouts for the streams of a [`MeshResource`](crate::MeshResource).
//!
//! Each stream lives in its own vertex buffer, so a frame that only changes
//! positions and colors never touches the UV, normal or tangent buffers.
//!
//! | Location | Stream   | Format      |
//! |----------|----------|-------------|
//! | 0        | position | `Float32x3` |
//! | 1        | color    | `Unorm8x4`  |
//! | 2        | uv       | `Float32x2` |
//! | 3        | normal   | `Float32x3` |
//! | 4        | tangent  | `Float32x4` |

use std::mem::size_of;

use glam::{Vec2, Vec3, Vec4};

use crate::skeleton::Color32;

/// Position attribute.
pub const POSITION_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
    0 => Float32x3,
];

/// Packed color attribute.
pub const COLOR_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
    1 => Unorm8x4,
];

/// UV attribute.
pub const UV_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
    2 => Float32x2,
];

/// Normal attribute.
pub const NORMAL_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
    3 => Float32x3,
];

/// Tangent attribute.
pub const TANGENT_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
    4 => Float32x4,
];

/// Index format of every submesh.
pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

fn stream<T>(attributes: &'static [wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<T>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// Vertex buffer layouts in binding order.
///
/// Position, color and UV are always present. Tangents are only included
/// together with normals.
#[must_use]
pub fn vertex_buffer_layouts(normals: bool, tangents: bool) -> Vec<wgpu::VertexBufferLayout<'static>> {
    let mut layouts = vec![
        stream::<Vec3>(&POSITION_ATTRIBS),
        stream::<Color32>(&COLOR_ATTRIBS),
        stream::<Vec2>(&UV_ATTRIBS),
    ];
    if normals {
        layouts.push(stream::<Vec3>(&NORMAL_ATTRIBS));
        if tangents {
            layouts.push(stream::<Vec4>(&TANGENT_ATTRIBS));
        }
    }
    layouts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_streams() {
        let layouts = vertex_buffer_layouts(false, false);
        assert_eq!(layouts.len(), 3);
        assert_eq!(layouts[0].array_stride, 12);
        assert_eq!(layouts[1].array_stride, 4);
        assert_eq!(layouts[2].array_stride, 8);
        assert_eq!(layouts[1].attributes[0].format, wgpu::VertexFormat::Unorm8x4);
    }

    #[test]
    fn test_optional_streams() {
        assert_eq!(vertex_buffer_layouts(true, false).len(), 4);
        assert_eq!(vertex_buffer_layouts(false, true).len(), 3);

        let all = vertex_buffer_layouts(true, true);
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].attributes[0].shader_location, 4);
        assert_eq!(all[4].array_stride, 16);
    }
}
