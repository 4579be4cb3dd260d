//! # Vertex Generator
//!
//! Fills the per-vertex streams from the posed skeleton.
//!
//! ## Streams
//!
//! | Stream    | Type      | Notes                                   |
//! |-----------|-----------|-----------------------------------------|
//! | positions | `Vec3`    | z = draw-order index * z spacing        |
//! | colors    | `Color32` | premultiplied, additive → alpha 0       |
//! | uvs       | `Vec2`    | region corners re-ordered like positions|
//! | normals   | `Vec3`    | constant (0, 0, -1), optional           |
//! | tangents  | `Vec4`    | constant (1, 0, 0, -1), optional        |
//!
//! Buffers only grow. When a frame needs fewer vertices than the capacity, the
//! unused position tail is zeroed; color and UV tails keep stale values.

use glam::{Vec2, Vec3, Vec4};
use sinew_core::GrowBuffer;

use crate::config::RendererConfig;
use crate::instruction::FrameInstruction;
use crate::skeleton::{Attachment, Color32, Skeleton};

/// Constant normal written when normals are enabled.
pub const NORMAL: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Constant tangent written when tangents are enabled.
pub const TANGENT: Vec4 = Vec4::new(1.0, 0.0, 0.0, -1.0);

/// Region corners are computed bottom-left, upper-left, upper-right, bottom-right
/// and emitted in this order.
const REGION_EMIT_ORDER: [usize; 4] = [0, 3, 1, 2];

/// Axis-aligned bounds of a generated mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshBounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl MeshBounds {
    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.min + self.size() * 0.5
    }

    /// Size of the box along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grows the 2D part of the box to include `p`.
    #[inline]
    fn include(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }
}

/// Generator flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexSettings {
    /// Depth offset between consecutive draw-order slots.
    pub z_spacing: f32,
    /// Include triangulated mesh attachments.
    pub render_meshes: bool,
    /// Fill the normal stream on reallocation.
    pub calculate_normals: bool,
    /// Fill the tangent stream on reallocation.
    pub calculate_tangents: bool,
}

impl From<&RendererConfig> for VertexSettings {
    fn from(config: &RendererConfig) -> Self {
        Self {
            z_spacing: config.z_spacing,
            render_meshes: config.render_meshes,
            calculate_normals: config.calculate_normals,
            calculate_tangents: config.calculate_tangents,
        }
    }
}

/// Owns the vertex streams and scratch space. Reused every frame.
#[derive(Debug, Default)]
pub struct VertexGenerator {
    positions: GrowBuffer<Vec3>,
    colors: GrowBuffer<Color32>,
    uvs: GrowBuffer<Vec2>,
    normals: GrowBuffer<Vec3>,
    tangents: GrowBuffer<Vec4>,
    /// World positions of one attachment.
    scratch: GrowBuffer<Vec2>,
    bounds: MeshBounds,
}

impl VertexGenerator {
    /// Creates a generator with empty streams.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates every stream for the frame described by `instruction`.
    ///
    /// `instruction` must have been built from the same skeleton state.
    /// Returns `true` if the streams were reallocated.
    pub fn generate(
        &mut self,
        skeleton: &Skeleton,
        instruction: &FrameInstruction,
        settings: VertexSettings,
    ) -> bool {
        let vertex_count = instruction.vertex_count;
        let reallocated = self.prepare(vertex_count, settings);

        let draw_count = skeleton.draw_order.len();
        if vertex_count == 0 {
            self.bounds = MeshBounds::default();
            return reallocated;
        }

        #[allow(clippy::cast_precision_loss)]
        let z_extent = settings.z_spacing * draw_count.saturating_sub(1) as f32;
        let (z_min, z_max) = if settings.z_spacing > 0.0 {
            (0.0, z_extent)
        } else {
            (z_extent, 0.0)
        };
        #[allow(clippy::cast_precision_loss)]
        let mut bounds = MeshBounds {
            min: Vec3::new(i32::MAX as f32, i32::MAX as f32, z_min),
            max: Vec3::new(i32::MIN as f32, i32::MIN as f32, z_max),
        };

        let mut vertex_index = 0;
        for (i, &slot_id) in skeleton.draw_order.iter().enumerate() {
            let Some(slot) = skeleton.slot(slot_id) else {
                continue;
            };
            let Some((attachment, bone)) = skeleton.drawable(slot, settings.render_meshes) else {
                continue;
            };

            let count = attachment.vertex_count();
            let end = vertex_index + count;
            if end > vertex_count {
                // Pose changed since the instruction was built
                break;
            }

            self.scratch.ensure_capacity(count);
            let world = &mut self.scratch.physical_mut()[..count];
            attachment.compute_world_vertices(bone, &skeleton.bones, world);

            let color = Color32::premultiplied(
                skeleton.color,
                slot.color,
                attachment.color(),
                slot.is_additive(),
            );
            #[allow(clippy::cast_precision_loss)]
            let z = i as f32 * settings.z_spacing;

            let positions = &mut self.positions.physical_mut()[vertex_index..end];
            let colors = &mut self.colors.physical_mut()[vertex_index..end];
            let uvs = &mut self.uvs.physical_mut()[vertex_index..end];
            colors.fill(color);

            if let Attachment::Region(region) = attachment {
                for (out, &corner) in REGION_EMIT_ORDER.iter().enumerate() {
                    let p = world[corner];
                    positions[out] = p.extend(z);
                    uvs[out] = region.uvs()[corner];
                    bounds.include(p);
                }
            } else {
                for ((dst, &p), (uv_dst, &uv)) in positions
                    .iter_mut()
                    .zip(world.iter())
                    .zip(uvs.iter_mut().zip(attachment.uvs()))
                {
                    *dst = p.extend(z);
                    *uv_dst = uv;
                    bounds.include(p);
                }
            }

            vertex_index = end;
        }

        self.bounds = bounds;
        reallocated
    }

    /// Sizes the streams for `vertex_count` vertices.
    fn prepare(&mut self, vertex_count: usize, settings: VertexSettings) -> bool {
        if vertex_count > self.positions.capacity() {
            self.positions.resize_exact(vertex_count);
            self.colors.resize_exact(vertex_count);
            self.uvs.resize_exact(vertex_count);

            if settings.calculate_normals {
                self.normals.resize_exact(vertex_count);
                self.normals.fill(NORMAL);
                if settings.calculate_tangents {
                    self.tangents.resize_exact(vertex_count);
                    self.tangents.fill(TANGENT);
                }
            }

            tracing::debug!("Vertex streams reallocated: {} vertices", vertex_count);
            true
        } else {
            self.positions.set_len(vertex_count);
            self.positions.zero_tail();
            self.colors.set_len(vertex_count);
            self.uvs.set_len(vertex_count);
            false
        }
    }

    /// Position stream, full physical length.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        self.positions.physical()
    }

    /// Color stream, full physical length.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[Color32] {
        self.colors.physical()
    }

    /// UV stream, full physical length.
    #[inline]
    #[must_use]
    pub fn uvs(&self) -> &[Vec2] {
        self.uvs.physical()
    }

    /// Normal stream. Empty unless normals are enabled.
    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        self.normals.physical()
    }

    /// Tangent stream. Empty unless tangents are enabled.
    #[inline]
    #[must_use]
    pub fn tangents(&self) -> &[Vec4] {
        self.tangents.physical()
    }

    /// Physical vertex capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.positions.capacity()
    }

    /// Bounds of the last generated frame.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> MeshBounds {
        self.bounds
    }
}
