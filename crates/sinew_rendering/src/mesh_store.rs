//! # Double-Buffered Mesh Store
//!
//! Two mesh resources, each paired with the instruction that built it.
//!
//! ```text
//! Frame N:    write slot 0, expose slot 0     (slot 1 = frame N-1)
//! Frame N+1:  write slot 1, expose slot 1     (slot 0 = frame N)
//! ```
//!
//! Each slot's snapshot is the diff baseline for the next write to that slot,
//! so a static pose stops rebuilding once both slots hold the same structure.

use std::ops::Range;

use bytemuck::cast_slice;
use glam::{Vec2, Vec3, Vec4};
use sinew_core::DoubleBuffered;

use crate::instruction::FrameInstruction;
use crate::materials::MaterialId;
use crate::skeleton::Color32;
use crate::triangles::TriangleBuffer;
use crate::vertex::{MeshBounds, VertexGenerator};

/// Index data of one submesh in a [`MeshResource`].
#[derive(Debug, Clone, Default)]
pub struct SubmeshIndices {
    /// Full index array. Entries past `count` are degenerate.
    pub indices: Vec<u32>,
    /// Number of indices to draw.
    pub count: usize,
}

/// A GPU-ready mesh: separate vertex streams plus per-submesh index buffers.
#[derive(Debug, Clone, Default)]
pub struct MeshResource {
    positions: Vec<Vec3>,
    colors: Vec<Color32>,
    uvs: Vec<Vec2>,
    normals: Vec<Vec3>,
    tangents: Vec<Vec4>,
    submeshes: Vec<SubmeshIndices>,
    bounds: MeshBounds,
}

impl MeshResource {
    /// Copies positions, colors and UVs. Normals and tangents only if `with_normals`.
    pub fn upload_vertices(&mut self, source: &VertexGenerator, with_normals: bool) {
        copy_into(&mut self.positions, source.positions());
        copy_into(&mut self.colors, source.colors());
        copy_into(&mut self.uvs, source.uvs());
        if with_normals {
            copy_into(&mut self.normals, source.normals());
            copy_into(&mut self.tangents, source.tangents());
        }
    }

    /// Replaces the submesh index buffers.
    pub fn upload_indices(&mut self, buffers: &[TriangleBuffer]) {
        self.submeshes
            .resize_with(buffers.len(), SubmeshIndices::default);
        for (dst, src) in self.submeshes.iter_mut().zip(buffers) {
            copy_into(&mut dst.indices, src.physical());
            dst.count = src.len();
        }
    }

    /// Sets the bounds.
    #[inline]
    pub fn set_bounds(&mut self, bounds: MeshBounds) {
        self.bounds = bounds;
    }

    /// Position stream.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Color stream.
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[Color32] {
        &self.colors
    }

    /// UV stream.
    #[inline]
    #[must_use]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Normal stream (empty unless normals are enabled).
    #[inline]
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Tangent stream (empty unless tangents are enabled).
    #[inline]
    #[must_use]
    pub fn tangents(&self) -> &[Vec4] {
        &self.tangents
    }

    /// Submesh index buffers.
    #[inline]
    #[must_use]
    pub fn submeshes(&self) -> &[SubmeshIndices] {
        &self.submeshes
    }

    /// Number of submeshes.
    #[inline]
    #[must_use]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// Axis-aligned bounds.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> MeshBounds {
        self.bounds
    }

    /// Number of vertices in the streams (physical length).
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Position stream as bytes for upload.
    #[must_use]
    pub fn position_bytes(&self) -> &[u8] {
        cast_slice(&self.positions)
    }

    /// Color stream as bytes for upload.
    #[must_use]
    pub fn color_bytes(&self) -> &[u8] {
        cast_slice(&self.colors)
    }

    /// UV stream as bytes for upload.
    #[must_use]
    pub fn uv_bytes(&self) -> &[u8] {
        cast_slice(&self.uvs)
    }

    /// Normal stream as bytes for upload.
    #[must_use]
    pub fn normal_bytes(&self) -> &[u8] {
        cast_slice(&self.normals)
    }

    /// Tangent stream as bytes for upload.
    #[must_use]
    pub fn tangent_bytes(&self) -> &[u8] {
        cast_slice(&self.tangents)
    }

    /// One submesh's full index array as bytes.
    #[must_use]
    pub fn index_bytes(&self, submesh: usize) -> Option<&[u8]> {
        self.submeshes.get(submesh).map(|s| cast_slice(&s.indices))
    }
}

/// Clears `dst` and copies `src` into it, reusing the allocation.
#[inline]
fn copy_into<T: Copy>(dst: &mut Vec<T>, src: &[T]) {
    dst.clear();
    dst.extend_from_slice(src);
}

/// A mesh resource and the instruction it was last built from.
#[derive(Debug, Clone, Default)]
pub struct SmartMesh {
    /// The mesh.
    pub mesh: MeshResource,
    /// Snapshot of the instruction last committed to `mesh`. `None` before the first commit.
    pub instruction_used: Option<FrameInstruction>,
}

impl SmartMesh {
    /// Overwrites the snapshot with a deep copy of `working`.
    pub fn remember(&mut self, working: &FrameInstruction) {
        self.instruction_used
            .get_or_insert_with(FrameInstruction::default)
            .set(working);
    }
}

/// The two alternating mesh slots.
pub type MeshStore = DoubleBuffered<SmartMesh>;

/// One draw call for the host renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSubmission {
    /// Submesh index in the current mesh.
    pub submesh: usize,
    /// Material to bind. `None` for submeshes without renderable slots.
    pub material: Option<MaterialId>,
    /// Index range within the submesh's index buffer.
    pub index_range: Range<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_alternates() {
        let mut store = MeshStore::default();

        let first = store.get_next();
        first.mesh.set_bounds(MeshBounds {
            min: Vec3::ONE,
            max: Vec3::ONE,
        });
        assert_eq!(store.current_index(), 0);

        store.get_next();
        assert_eq!(store.current_index(), 1);
        // Slot 0 untouched by the second write
        assert_eq!(store.slot(0).mesh.bounds().min, Vec3::ONE);
        assert_eq!(store.current().mesh.bounds(), MeshBounds::default());
    }

    #[test]
    fn test_remember_deep_copies() {
        let mut smart = SmartMesh::default();
        assert!(smart.instruction_used.is_none());

        let mut working = FrameInstruction {
            vertex_count: 8,
            flips: vec![true, false],
            ..FrameInstruction::default()
        };
        smart.remember(&working);

        working.vertex_count = 4;
        working.flips.clear();
        let used = smart.instruction_used.as_ref().unwrap();
        assert_eq!(used.vertex_count, 8);
        assert_eq!(used.flips, vec![true, false]);

        smart.remember(&working);
        assert_eq!(smart.instruction_used.as_ref().unwrap().vertex_count, 4);
    }

    #[test]
    fn test_upload_and_byte_views() {
        use crate::skeleton::{
            AtlasRegion, Attachment, Bone, PageId, RegionAttachment, RegionPlacement, Skeleton,
            Slot,
        };
        use crate::triangles::{TriangleBuilder, TriangleSettings};
        use crate::vertex::VertexSettings;

        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone(Bone::new("root"));
        let slot = skeleton.add_slot(Slot::new("body", root));
        let quad = skeleton.add_attachment(Attachment::Region(RegionAttachment::new(
            "body",
            AtlasRegion::new(PageId(0), "body"),
            RegionPlacement::sized(1.0, 1.0),
        )));
        skeleton.set_attachment(slot, Some(quad));

        let instruction = FrameInstruction {
            attachments: vec![Some(quad)],
            flips: vec![false],
            submeshes: vec![crate::instruction::SubmeshInstruction {
                end_slot: 1,
                vertex_count: 4,
                triangle_count: 6,
                ..Default::default()
            }],
            vertex_count: 4,
            ..FrameInstruction::default()
        };

        let mut generator = VertexGenerator::new();
        generator.generate(
            &skeleton,
            &instruction,
            VertexSettings {
                z_spacing: 0.0,
                render_meshes: true,
                calculate_normals: false,
                calculate_tangents: false,
            },
        );
        let mut triangles = TriangleBuilder::new();
        triangles.rebuild(
            &skeleton,
            &instruction,
            TriangleSettings {
                render_meshes: true,
                front_facing: false,
            },
        );

        let mut mesh = MeshResource::default();
        mesh.upload_vertices(&generator, true);
        mesh.upload_indices(triangles.buffers());

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.position_bytes().len(), 4 * 12);
        assert_eq!(mesh.color_bytes().len(), 4 * 4);
        assert_eq!(mesh.uv_bytes().len(), 4 * 8);
        assert!(mesh.normal_bytes().is_empty());
        assert!(mesh.tangent_bytes().is_empty());
        assert_eq!(mesh.index_bytes(0).map(<[u8]>::len), Some(6 * 4));
        assert!(mesh.index_bytes(1).is_none());
        assert_eq!(mesh.submeshes()[0].count, 6);
    }
}
