//! # Attachments
//!
//! The geometry a slot can display. A closed set of variants:
//!
//! | Variant        | Vertices            | Triangles          | Renderable |
//! |----------------|---------------------|--------------------|------------|
//! | `Region`       | 4 (quad)            | fixed 6 indices    | yes        |
//! | `Mesh`         | N, local to the bone| explicit list      | yes        |
//! | `WeightedMesh` | N, from bone weights| explicit list      | yes        |
//! | `BoundingBox`  | -                   | -                  | no         |
//!
//! Attachments live in the skeleton's arena. Their [`AttachmentId`] is the
//! change-detection key: swapping to a structurally equal attachment still counts
//! as a change.

use glam::Vec2;
use sinew_core::Handle;

use super::bone::{Bone, BoneId};
use super::color::Color;

/// Opaque identity of an attachment.
pub type AttachmentId = Handle<Attachment>;

/// Index pattern for one quad, relative to its first vertex.
pub const QUAD_TRIANGLES: [u32; 6] = [0, 2, 1, 2, 3, 1];

/// Id of an atlas page (one texture, one material).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

/// The image region backing a renderable attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasRegion {
    /// Atlas page holding the region.
    pub page: PageId,
    /// Region name.
    pub name: String,
    /// Left texture coordinate.
    pub u: f32,
    /// Top texture coordinate.
    pub v: f32,
    /// Right texture coordinate.
    pub u2: f32,
    /// Bottom texture coordinate.
    pub v2: f32,
    /// True if the region is stored rotated 90 degrees in the atlas.
    pub rotate: bool,
}

impl AtlasRegion {
    /// Creates a region covering the whole page.
    #[must_use]
    pub fn new(page: PageId, name: impl Into<String>) -> Self {
        Self {
            page,
            name: name.into(),
            u: 0.0,
            v: 0.0,
            u2: 1.0,
            v2: 1.0,
            rotate: false,
        }
    }
}

/// Setup-pose placement of a region quad relative to its bone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionPlacement {
    /// Local x offset.
    pub x: f32,
    /// Local y offset.
    pub y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// X scale.
    pub scale_x: f32,
    /// Y scale.
    pub scale_y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl RegionPlacement {
    /// An unrotated, unscaled quad of the given size centered on the bone.
    #[must_use]
    pub const fn sized(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            width,
            height,
        }
    }
}

/// Corner order of [`RegionAttachment`] offsets and UVs.
const BOTTOM_LEFT: usize = 0;
const UPPER_LEFT: usize = 1;
const UPPER_RIGHT: usize = 2;
const BOTTOM_RIGHT: usize = 3;

/// A textured quad.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAttachment {
    /// Attachment name.
    pub name: String,
    /// Backing image region.
    pub region: AtlasRegion,
    /// Attachment tint.
    pub color: Color,
    /// Bone-local corners: bottom-left, upper-left, upper-right, bottom-right.
    offset: [Vec2; 4],
    /// Corner UVs in the same order as `offset`.
    uvs: [Vec2; 4],
}

impl RegionAttachment {
    /// Creates a region quad and computes its corner offsets and UVs.
    #[must_use]
    pub fn new(name: impl Into<String>, region: AtlasRegion, placement: RegionPlacement) -> Self {
        let mut attachment = Self {
            name: name.into(),
            region,
            color: Color::WHITE,
            offset: [Vec2::ZERO; 4],
            uvs: [Vec2::ZERO; 4],
        };
        attachment.update_offset(placement);
        attachment.update_uvs();
        attachment
    }

    /// Recomputes the local corners from a placement.
    pub fn update_offset(&mut self, p: RegionPlacement) {
        let local_x = -p.width / 2.0 * p.scale_x;
        let local_y = -p.height / 2.0 * p.scale_y;
        let local_x2 = -local_x;
        let local_y2 = -local_y;

        let (sin, cos) = p.rotation.to_radians().sin_cos();
        let rotate = |x: f32, y: f32| Vec2::new(x * cos - y * sin + p.x, x * sin + y * cos + p.y);

        self.offset[BOTTOM_LEFT] = rotate(local_x, local_y);
        self.offset[UPPER_LEFT] = rotate(local_x, local_y2);
        self.offset[UPPER_RIGHT] = rotate(local_x2, local_y2);
        self.offset[BOTTOM_RIGHT] = rotate(local_x2, local_y);
    }

    /// Recomputes the corner UVs from the backing region.
    pub fn update_uvs(&mut self) {
        let AtlasRegion {
            u, v, u2, v2, rotate, ..
        } = self.region;

        if rotate {
            self.uvs[UPPER_LEFT] = Vec2::new(u, v2);
            self.uvs[UPPER_RIGHT] = Vec2::new(u, v);
            self.uvs[BOTTOM_RIGHT] = Vec2::new(u2, v);
            self.uvs[BOTTOM_LEFT] = Vec2::new(u2, v2);
        } else {
            self.uvs[BOTTOM_LEFT] = Vec2::new(u, v2);
            self.uvs[UPPER_LEFT] = Vec2::new(u, v);
            self.uvs[UPPER_RIGHT] = Vec2::new(u2, v);
            self.uvs[BOTTOM_RIGHT] = Vec2::new(u2, v2);
        }
    }

    /// Bone-local corners: bottom-left, upper-left, upper-right, bottom-right.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> &[Vec2; 4] {
        &self.offset
    }

    /// Corner UVs: bottom-left, upper-left, upper-right, bottom-right.
    #[inline]
    #[must_use]
    pub const fn uvs(&self) -> &[Vec2; 4] {
        &self.uvs
    }
}

/// A triangulated mesh whose vertices are local to the slot's bone.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAttachment {
    /// Attachment name.
    pub name: String,
    /// Backing image region.
    pub region: AtlasRegion,
    /// Attachment tint.
    pub color: Color,
    /// Bone-local vertex positions.
    pub vertices: Vec<Vec2>,
    /// Per-vertex UVs.
    pub uvs: Vec<Vec2>,
    /// Triangle list, three indices per triangle.
    pub triangles: Vec<u32>,
}

/// One bone's contribution to a weighted vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneInfluence {
    /// Influencing bone.
    pub bone: BoneId,
    /// Vertex position in that bone's local space.
    pub position: Vec2,
    /// Blend weight.
    pub weight: f32,
}

/// A triangulated mesh skinned to several bones.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedMeshAttachment {
    /// Attachment name.
    pub name: String,
    /// Backing image region.
    pub region: AtlasRegion,
    /// Attachment tint.
    pub color: Color,
    /// Per-vertex UVs. Their count is the vertex count.
    pub uvs: Vec<Vec2>,
    /// Triangle list, three indices per triangle.
    pub triangles: Vec<u32>,
    /// Number of influences per vertex, in vertex order.
    pub influence_counts: Vec<u32>,
    /// Influences for all vertices, flattened.
    pub influences: Vec<BoneInfluence>,
}

/// A hit-test polygon. Never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBoxAttachment {
    /// Attachment name.
    pub name: String,
    /// Bone-local polygon.
    pub vertices: Vec<Vec2>,
}

/// Any attachment.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// A textured quad.
    Region(RegionAttachment),
    /// A bone-local triangulated mesh.
    Mesh(MeshAttachment),
    /// A skinned triangulated mesh.
    WeightedMesh(WeightedMeshAttachment),
    /// A non-renderable polygon.
    BoundingBox(BoundingBoxAttachment),
}

impl Attachment {
    /// Attachment name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Region(a) => &a.name,
            Self::Mesh(a) => &a.name,
            Self::WeightedMesh(a) => &a.name,
            Self::BoundingBox(a) => &a.name,
        }
    }

    /// Returns true for triangulated meshes (weighted or not).
    #[inline]
    #[must_use]
    pub const fn is_mesh(&self) -> bool {
        matches!(self, Self::Mesh(_) | Self::WeightedMesh(_))
    }

    /// Returns true if the attachment produces geometry.
    #[inline]
    #[must_use]
    pub const fn is_renderable(&self) -> bool {
        !matches!(self, Self::BoundingBox(_))
    }

    /// Number of vertices emitted into the mesh.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        match self {
            Self::Region(_) => 4,
            Self::Mesh(a) => a.vertices.len(),
            Self::WeightedMesh(a) => a.uvs.len(),
            Self::BoundingBox(_) => 0,
        }
    }

    /// Number of triangle indices emitted into the mesh.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.triangles().len()
    }

    /// Triangle list relative to the attachment's first vertex.
    #[must_use]
    pub fn triangles(&self) -> &[u32] {
        match self {
            Self::Region(_) => &QUAD_TRIANGLES,
            Self::Mesh(a) => &a.triangles,
            Self::WeightedMesh(a) => &a.triangles,
            Self::BoundingBox(_) => &[],
        }
    }

    /// Backing image region, if renderable.
    #[must_use]
    pub const fn region(&self) -> Option<&AtlasRegion> {
        match self {
            Self::Region(a) => Some(&a.region),
            Self::Mesh(a) => Some(&a.region),
            Self::WeightedMesh(a) => Some(&a.region),
            Self::BoundingBox(_) => None,
        }
    }

    /// Attachment tint.
    #[must_use]
    pub const fn color(&self) -> Color {
        match self {
            Self::Region(a) => a.color,
            Self::Mesh(a) => a.color,
            Self::WeightedMesh(a) => a.color,
            Self::BoundingBox(_) => Color::WHITE,
        }
    }

    /// Per-vertex UVs in emission order.
    ///
    /// Region corners are returned bottom-left, upper-left, upper-right,
    /// bottom-right. Emission re-orders them.
    #[must_use]
    pub fn uvs(&self) -> &[Vec2] {
        match self {
            Self::Region(a) => a.uvs(),
            Self::Mesh(a) => &a.uvs,
            Self::WeightedMesh(a) => &a.uvs,
            Self::BoundingBox(_) => &[],
        }
    }

    /// Writes world-space vertex positions into `out`.
    ///
    /// `out` must hold at least [`vertex_count`](Self::vertex_count) entries. Region
    /// corners are written bottom-left, upper-left, upper-right, bottom-right.
    pub fn compute_world_vertices(&self, slot_bone: &Bone, bones: &[Bone], out: &mut [Vec2]) {
        match self {
            Self::Region(a) => {
                for (dst, corner) in out.iter_mut().zip(a.offset.iter()) {
                    *dst = slot_bone.to_world(*corner);
                }
            }
            Self::Mesh(a) => {
                for (dst, local) in out.iter_mut().zip(a.vertices.iter()) {
                    *dst = slot_bone.to_world(*local);
                }
            }
            Self::WeightedMesh(a) => {
                let mut influences = a.influences.iter();
                for (dst, &count) in out.iter_mut().zip(a.influence_counts.iter()) {
                    let mut world = Vec2::ZERO;
                    for influence in influences.by_ref().take(count as usize) {
                        if let Some(bone) = bones.get(influence.bone.0) {
                            world += bone.to_world(influence.position) * influence.weight;
                        }
                    }
                    *dst = world;
                }
            }
            Self::BoundingBox(_) => {}
        }
    }
}
