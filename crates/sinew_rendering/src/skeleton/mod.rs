//! # Pose Model
//!
//! The read-only input of the mesh pipeline, filled by the animation solver.
//!
//! ```text
//! Skeleton
//!   ├── bones        (world transforms, mirror signs)
//!   ├── slots        (bone, tint, blend mode, active attachment)
//!   ├── draw_order   (paint order of slots)
//!   └── attachments  (arena: Region / Mesh / WeightedMesh / BoundingBox)
//! ```

mod attachment;
mod bone;
mod color;
mod pose;
mod slot;

pub use attachment::{
    AtlasRegion, Attachment, AttachmentId, BoneInfluence, BoundingBoxAttachment, MeshAttachment,
    PageId, RegionAttachment, RegionPlacement, WeightedMeshAttachment, QUAD_TRIANGLES,
};
pub use bone::{Bone, BoneId};
pub use color::{Color, Color32};
pub use pose::Skeleton;
pub use slot::{BlendMode, Slot, SlotId};
