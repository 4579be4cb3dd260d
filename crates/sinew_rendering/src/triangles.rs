//! # Triangle Builder
//!
//! Emits one index buffer per submesh. Buffers are keyed by submesh position
//! and persist across frames, so a stable submesh layout never reallocates.
//!
//! ## Patterns
//!
//! ```text
//! quad (first vertex v):   v, v+2, v+1,   v+2, v+3, v+1
//! quad, flipped:           v+1, v+2, v,   v+1, v+3, v+2
//! mesh:                    v + t[i] for each attachment index
//! mesh, flipped:           each triangle's three indices reversed
//! ```

use sinew_core::GrowBuffer;

use crate::config::RendererConfig;
use crate::instruction::{FrameInstruction, SubmeshInstruction};
use crate::skeleton::{Skeleton, QUAD_TRIANGLES};

/// Index storage for one submesh position.
#[derive(Debug, Clone, Default)]
pub struct TriangleBuffer {
    /// Physical array; logical length is the index count in use.
    indices: GrowBuffer<u32>,
    /// Number of leading indices known to hold valid data.
    filled: usize,
    /// First vertex of the last quad-pattern fill. `None` after a slot-walk fill.
    first_vertex: Option<usize>,
}

impl TriangleBuffer {
    /// Indices in use.
    #[inline]
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        self.indices.as_slice()
    }

    /// Whole physical array. A zeroed tail past [`len`](Self::len) is degenerate.
    #[inline]
    #[must_use]
    pub fn physical(&self) -> &[u32] {
        self.indices.physical()
    }

    /// Number of indices in use.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no index is in use.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Physical capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.indices.capacity()
    }
}

/// Builder flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleSettings {
    /// Mesh attachments are part of the geometry.
    pub render_meshes: bool,
    /// Honor per-slot winding flips.
    pub front_facing: bool,
}

impl From<&RendererConfig> for TriangleSettings {
    fn from(config: &RendererConfig) -> Self {
        Self {
            render_meshes: config.render_meshes,
            front_facing: config.front_facing,
        }
    }
}

/// Owns the per-submesh index buffers.
#[derive(Debug, Default)]
pub struct TriangleBuilder {
    buffers: Vec<TriangleBuffer>,
    /// Number of buffers in use by the last rebuild.
    active: usize,
}

impl TriangleBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers for the submeshes of the last rebuild.
    #[inline]
    #[must_use]
    pub fn buffers(&self) -> &[TriangleBuffer] {
        &self.buffers[..self.active]
    }

    /// Rebuilds index buffers for `instruction`.
    ///
    /// With immutable triangles only buffers created by this call are filled;
    /// existing positions keep their contents.
    pub fn rebuild(
        &mut self,
        skeleton: &Skeleton,
        instruction: &FrameInstruction,
        settings: TriangleSettings,
    ) {
        let submesh_count = instruction.submeshes.len();
        let existing = self.buffers.len();
        if submesh_count > existing {
            self.buffers.resize_with(submesh_count, TriangleBuffer::default);
        }
        self.active = submesh_count;

        let mutable = !instruction.immutable_triangles;
        let last = submesh_count.saturating_sub(1);
        for (i, submesh) in instruction.submeshes.iter().enumerate() {
            if mutable || i >= existing {
                fill_submesh(
                    &mut self.buffers[i],
                    skeleton,
                    instruction,
                    submesh,
                    settings,
                    i == last,
                );
            }
        }

        tracing::debug!(
            "Triangles rebuilt: {} submeshes, {} indices",
            submesh_count,
            instruction.triangle_count()
        );
    }
}

/// Sizes and fills one submesh's index buffer.
fn fill_submesh(
    buffer: &mut TriangleBuffer,
    skeleton: &Skeleton,
    instruction: &FrameInstruction,
    submesh: &SubmeshInstruction,
    settings: TriangleSettings,
    is_last: bool,
) {
    let count = submesh.triangle_count;
    let capacity = buffer.indices.capacity();

    if is_last && capacity > count {
        // Keep the larger buffer, degenerate tail
        buffer.indices.set_len(count);
        buffer.indices.zero_tail();
        buffer.filled = count;
    } else if capacity != count {
        buffer.indices.resize_exact(count);
        buffer.filled = 0;
    } else {
        buffer.indices.set_len(count);
    }

    if !settings.render_meshes && !settings.front_facing {
        // Every renderable slot is a quad: the pattern only depends on the first vertex
        if buffer.first_vertex != Some(submesh.first_vertex) || buffer.filled < count {
            fill_quads(buffer.indices.as_mut_slice(), submesh.first_vertex);
            buffer.filled = count;
            buffer.first_vertex = Some(submesh.first_vertex);
        }
        return;
    }

    let indices = buffer.indices.as_mut_slice();
    let mut index = 0;
    let mut first_vertex = submesh.first_vertex;

    for i in submesh.start_slot..submesh.end_slot {
        let Some(slot) = skeleton.draw_order.get(i).and_then(|&id| skeleton.slot(id)) else {
            continue;
        };
        let Some((attachment, _)) = skeleton.drawable(slot, settings.render_meshes) else {
            continue;
        };

        let triangles = attachment.triangles();
        let Some(dst) = indices.get_mut(index..index + triangles.len()) else {
            break;
        };

        #[allow(clippy::cast_possible_truncation)]
        let base = first_vertex as u32;
        let flip = settings.front_facing && instruction.flips.get(i).copied().unwrap_or(false);
        if flip {
            for (out, tri) in dst.chunks_exact_mut(3).zip(triangles.chunks_exact(3)) {
                out[0] = base + tri[2];
                out[1] = base + tri[1];
                out[2] = base + tri[0];
            }
        } else {
            for (out, &t) in dst.iter_mut().zip(triangles) {
                *out = base + t;
            }
        }

        index += triangles.len();
        first_vertex += attachment.vertex_count();
    }

    buffer.filled = count;
    buffer.first_vertex = None;
}

/// Writes the quad pattern for consecutive quads starting at `first_vertex`.
fn fill_quads(indices: &mut [u32], first_vertex: usize) {
    #[allow(clippy::cast_possible_truncation)]
    let mut base = first_vertex as u32;
    for quad in indices.chunks_exact_mut(QUAD_TRIANGLES.len()) {
        for (out, &t) in quad.iter_mut().zip(QUAD_TRIANGLES.iter()) {
            *out = base + t;
        }
        base += 4;
    }
}
