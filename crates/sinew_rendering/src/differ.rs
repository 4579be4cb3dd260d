//! # Structure Differ
//!
//! Decides whether a frame can reuse the previous frame's index buffers and
//! material list. A full field-by-field comparison is far cheaper than
//! re-uploading triangles every frame.

use crate::instruction::{FrameInstruction, SubmeshInstruction};
use crate::materials::MaterialId;

/// Returns true if the triangle buffers must be rebuilt.
///
/// `used` is the snapshot committed to the mesh slot about to be written.
/// `None` (never committed) always requires a rebuild. Checks run in order:
/// vertex count, immutable-triangles flag, attachment identities, front-facing
/// flag and flips, submesh count, then each submesh's shape.
#[must_use]
pub fn must_update_structure(working: &FrameInstruction, used: Option<&FrameInstruction>) -> bool {
    let Some(used) = used else {
        return true;
    };

    if working.vertex_count != used.vertex_count {
        return true;
    }

    if working.immutable_triangles != used.immutable_triangles {
        return true;
    }

    if working.attachments != used.attachments {
        return true;
    }

    if working.front_facing != used.front_facing {
        return true;
    }
    if working.front_facing && working.flips != used.flips {
        return true;
    }

    if working.submeshes.len() != used.submeshes.len() {
        return true;
    }

    working
        .submeshes
        .iter()
        .zip(used.submeshes.iter())
        .any(|(a, b)| !same_shape(a, b))
}

/// Two submeshes have the same shape if their geometry ranges match.
/// Material and separator flag are not part of the shape.
#[inline]
fn same_shape(a: &SubmeshInstruction, b: &SubmeshInstruction) -> bool {
    a.vertex_count == b.vertex_count
        && a.start_slot == b.start_slot
        && a.end_slot == b.end_slot
        && a.triangle_count == b.triangle_count
        && a.first_vertex == b.first_vertex
}

/// Returns true if the renderer's material list must be re-pushed.
///
/// `pushed` is the list last handed to the renderer.
#[must_use]
pub fn must_update_materials(
    structure_rebuilt: bool,
    pushed: &[Option<MaterialId>],
    working: &[SubmeshInstruction],
) -> bool {
    structure_rebuilt
        || pushed.len() != working.len()
        || pushed
            .iter()
            .zip(working.iter())
            .any(|(&material, submesh)| material != submesh.material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{Attachment, BoundingBoxAttachment};
    use sinew_core::Arena;

    fn submesh(start: usize, end: usize, vertices: usize) -> SubmeshInstruction {
        SubmeshInstruction {
            material: Some(MaterialId(1)),
            start_slot: start,
            end_slot: end,
            vertex_count: vertices,
            triangle_count: vertices / 4 * 6,
            first_vertex: start * 4,
            separated_by_slot: false,
        }
    }

    fn frame() -> (FrameInstruction, Arena<Attachment>) {
        let mut arena = Arena::new();
        let attachments = (0..3)
            .map(|i| {
                Some(arena.insert(Attachment::BoundingBox(BoundingBoxAttachment {
                    name: format!("a{i}"),
                    vertices: Vec::new(),
                })))
            })
            .collect();

        let instruction = FrameInstruction {
            attachments,
            flips: vec![false; 3],
            front_facing: false,
            immutable_triangles: false,
            submeshes: vec![submesh(0, 2, 8), submesh(2, 3, 4)],
            vertex_count: 12,
        };
        (instruction, arena)
    }

    #[test]
    fn test_no_snapshot_rebuilds() {
        let (working, _) = frame();
        assert!(must_update_structure(&working, None));
    }

    #[test]
    fn test_identical_frames() {
        let (working, _) = frame();
        let used = working.clone();
        assert!(!must_update_structure(&working, Some(&used)));
    }

    #[test]
    fn test_attachment_identity_change() {
        let (mut working, mut arena) = frame();
        let used = working.clone();

        // Structurally identical attachment, new identity
        working.attachments[1] = Some(arena.insert(Attachment::BoundingBox(
            BoundingBoxAttachment {
                name: "a1".to_string(),
                vertices: Vec::new(),
            },
        )));
        assert!(must_update_structure(&working, Some(&used)));

        working.attachments.pop();
        assert!(must_update_structure(&working, Some(&used)));
    }

    #[test]
    fn test_flips_only_checked_when_front_facing() {
        let (mut working, _) = frame();
        let mut used = working.clone();

        working.flips[0] = true;
        assert!(!must_update_structure(&working, Some(&used)));

        working.front_facing = true;
        assert!(must_update_structure(&working, Some(&used)));

        used.front_facing = true;
        assert!(must_update_structure(&working, Some(&used)));

        used.flips[0] = true;
        assert!(!must_update_structure(&working, Some(&used)));
    }

    #[test]
    fn test_submesh_shape_change() {
        let (mut working, _) = frame();
        let used = working.clone();

        working.submeshes[1].first_vertex += 1;
        assert!(must_update_structure(&working, Some(&used)));
    }

    #[test]
    fn test_material_is_not_structure() {
        let (mut working, _) = frame();
        let used = working.clone();

        working.submeshes[0].material = Some(MaterialId(9));
        working.submeshes[0].separated_by_slot = true;
        assert!(!must_update_structure(&working, Some(&used)));
    }

    #[test]
    fn test_counts_and_flags() {
        let (working, _) = frame();

        let mut used = working.clone();
        used.vertex_count = 0;
        assert!(must_update_structure(&working, Some(&used)));

        let mut used = working.clone();
        used.immutable_triangles = true;
        assert!(must_update_structure(&working, Some(&used)));

        let mut used = working.clone();
        used.submeshes.pop();
        assert!(must_update_structure(&working, Some(&used)));
    }

    #[test]
    fn test_material_list() {
        let (working, _) = frame();
        let pushed = vec![Some(MaterialId(1)), Some(MaterialId(1))];

        assert!(!must_update_materials(false, &pushed, &working.submeshes));
        assert!(must_update_materials(true, &pushed, &working.submeshes));
        assert!(must_update_materials(false, &pushed[..1], &working.submeshes));
        assert!(must_update_materials(
            false,
            &[Some(MaterialId(1)), Some(MaterialId(2))],
            &working.submeshes
        ));
    }
}
