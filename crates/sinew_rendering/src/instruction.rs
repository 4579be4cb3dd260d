//! # Instruction Builder
//!
//! Walks the draw order once and partitions it into submeshes.
//!
//! ## Partitioning
//!
//! ```text
//! draw order:  [body:A] [arm:A] [sword:B] [hand:B*] [head:B]
//!                                           * separator slot
//!
//! submeshes:   [0..2) A   [2..3) B   [3..5) B
//!                       ^ material   ^ separator
//! ```
//!
//! A new submesh starts when the material changes (after at least one vertex)
//! or when the slot is a separator. The last range is always flushed, so a
//! frame has at least one submesh, even for an empty draw order.

use std::collections::HashMap;

use crate::config::RendererConfig;
use crate::error::RenderResult;
use crate::materials::{MaterialId, MaterialSource};
use crate::skeleton::{AttachmentId, Bone, Skeleton, SlotId};

/// One draw call's worth of geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmeshInstruction {
    /// Material shared by every slot in the range. `None` if no slot rendered.
    pub material: Option<MaterialId>,
    /// First draw-order index (inclusive).
    pub start_slot: usize,
    /// Last draw-order index (exclusive).
    pub end_slot: usize,
    /// Vertices emitted by the range.
    pub vertex_count: usize,
    /// Triangle indices emitted by the range.
    pub triangle_count: usize,
    /// Offset of the range's first vertex in the mesh.
    pub first_vertex: usize,
    /// True if the range was closed by a separator slot.
    pub separated_by_slot: bool,
}

/// Everything needed to build (and later diff) one frame's mesh structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInstruction {
    /// Active attachment per draw-order index.
    pub attachments: Vec<Option<AttachmentId>>,
    /// Winding flip per draw-order index.
    pub flips: Vec<bool>,
    /// Front-facing mode when built.
    pub front_facing: bool,
    /// Immutable-triangles mode when built.
    pub immutable_triangles: bool,
    /// Submeshes in draw order.
    pub submeshes: Vec<SubmeshInstruction>,
    /// Total vertices across all submeshes.
    pub vertex_count: usize,
}

impl FrameInstruction {
    /// Clears all lists, keeping their allocations.
    pub fn clear(&mut self) {
        self.attachments.clear();
        self.flips.clear();
        self.submeshes.clear();
        self.vertex_count = 0;
    }

    /// Deep copy of `other`, reusing this instruction's allocations.
    pub fn set(&mut self, other: &Self) {
        self.clone_from(other);
    }

    /// Total triangle indices across all submeshes.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.triangle_count).sum()
    }
}

/// Renderer flags that affect partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionSettings {
    /// Include triangulated mesh attachments.
    pub render_meshes: bool,
    /// Record per-slot winding flips.
    pub front_facing: bool,
    /// Stamp the immutable-triangles flag on the instruction.
    pub immutable_triangles: bool,
}

impl From<&RendererConfig> for InstructionSettings {
    fn from(config: &RendererConfig) -> Self {
        Self {
            render_meshes: config.render_meshes,
            front_facing: config.front_facing,
            immutable_triangles: config.immutable_triangles,
        }
    }
}

/// Per-slot overrides set by the host.
#[derive(Debug, Clone, Copy)]
pub struct SlotOverrides<'a> {
    /// Slots that always start a new submesh.
    pub separators: &'a [SlotId],
    /// Materials that replace the resolved one for specific slots.
    pub materials: &'a HashMap<SlotId, MaterialId>,
}

/// Running state of the submesh being accumulated.
#[derive(Default)]
struct OpenSubmesh {
    material: Option<MaterialId>,
    start_slot: usize,
    first_vertex: usize,
    vertex_count: usize,
    triangle_count: usize,
}

impl OpenSubmesh {
    fn close(&self, end_slot: usize, separated_by_slot: bool) -> SubmeshInstruction {
        SubmeshInstruction {
            material: self.material,
            start_slot: self.start_slot,
            end_slot,
            vertex_count: self.vertex_count,
            triangle_count: self.triangle_count,
            first_vertex: self.first_vertex,
            separated_by_slot,
        }
    }
}

/// Builds `working` from the skeleton's current draw order.
///
/// `working` is cleared first; its allocations are reused.
///
/// # Errors
///
/// Propagates the material source's error for the first renderable slot it
/// cannot resolve. `working` is left partially built.
pub fn build_instructions<M: MaterialSource + ?Sized>(
    skeleton: &Skeleton,
    overrides: SlotOverrides<'_>,
    materials: &M,
    settings: InstructionSettings,
    working: &mut FrameInstruction,
) -> RenderResult<()> {
    working.clear();
    working.attachments.reserve(skeleton.draw_order.len());
    working.flips.reserve(skeleton.draw_order.len());

    let mut vertex_count = 0;
    let mut open = OpenSubmesh::default();

    for (i, &slot_id) in skeleton.draw_order.iter().enumerate() {
        let Some(slot) = skeleton.slot(slot_id) else {
            working.attachments.push(None);
            working.flips.push(false);
            continue;
        };

        working.attachments.push(slot.attachment);
        let flip =
            settings.front_facing && skeleton.bone(slot.bone).is_some_and(Bone::is_mirrored);
        working.flips.push(flip);

        let Some((attachment, _)) = skeleton.drawable(slot, settings.render_meshes) else {
            continue;
        };

        let material = match overrides.materials.get(&slot_id) {
            Some(&custom) => custom,
            None => materials.material_for(attachment, slot)?,
        };

        let separated = overrides.separators.contains(&slot_id);
        if (vertex_count > 0 && open.material != Some(material)) || separated {
            working.submeshes.push(open.close(i, separated));
            open = OpenSubmesh {
                material: open.material,
                start_slot: i,
                first_vertex: vertex_count,
                ..OpenSubmesh::default()
            };
        }
        open.material = Some(material);

        let attachment_vertices = attachment.vertex_count();
        open.triangle_count += attachment.index_count();
        open.vertex_count += attachment_vertices;
        vertex_count += attachment_vertices;
    }

    working
        .submeshes
        .push(open.close(skeleton.draw_order.len(), false));

    working.vertex_count = vertex_count;
    working.front_facing = settings.front_facing;
    working.immutable_triangles = settings.immutable_triangles;

    Ok(())
}
