//! The skeleton: bones, slots, draw order and the attachment arena.

use sinew_core::Arena;

use super::attachment::{Attachment, AttachmentId};
use super::bone::{Bone, BoneId};
use super::color::Color;
use super::slot::{Slot, SlotId};

/// A posed skeleton.
///
/// The animation solver writes bone transforms, slot tints and active attachments
/// between frames. The renderer only reads it while building a frame.
#[derive(Default)]
pub struct Skeleton {
    /// Bones, indexed by [`BoneId`].
    pub bones: Vec<Bone>,
    /// Slots in setup order, indexed by [`SlotId`].
    pub slots: Vec<Slot>,
    /// Paint order. Every slot appears once.
    pub draw_order: Vec<SlotId>,
    /// All attachments the slots can reference.
    pub attachments: Arena<Attachment>,
    /// Global tint.
    pub color: Color,
}

impl Skeleton {
    /// Creates an empty skeleton with a white tint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            color: Color::WHITE,
            ..Self::default()
        }
    }

    /// Adds a bone.
    pub fn add_bone(&mut self, bone: Bone) -> BoneId {
        self.bones.push(bone);
        BoneId(self.bones.len() - 1)
    }

    /// Adds a slot at the end of the draw order.
    pub fn add_slot(&mut self, slot: Slot) -> SlotId {
        self.slots.push(slot);
        let id = SlotId(self.slots.len() - 1);
        self.draw_order.push(id);
        id
    }

    /// Stores an attachment and returns its identity.
    pub fn add_attachment(&mut self, attachment: Attachment) -> AttachmentId {
        self.attachments.insert(attachment)
    }

    /// Finds a slot by name.
    #[must_use]
    pub fn find_slot(&self, name: &str) -> Option<SlotId> {
        self.slots.iter().position(|s| s.name == name).map(SlotId)
    }

    /// Returns a slot.
    #[inline]
    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.0)
    }

    /// Returns a slot mutably.
    #[inline]
    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots.get_mut(id.0)
    }

    /// Returns a bone.
    #[inline]
    #[must_use]
    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.0)
    }

    /// Returns a bone mutably.
    #[inline]
    pub fn bone_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(id.0)
    }

    /// Returns an attachment by identity.
    #[inline]
    #[must_use]
    pub fn attachment(&self, id: AttachmentId) -> Option<&Attachment> {
        self.attachments.get(id)
    }

    /// Looks up an attachment for editing, e.g. to move a region's corners.
    ///
    /// Edits keep the handle, so the next frame rebuilds vertices but not triangles.
    #[inline]
    pub fn attachment_mut(&mut self, id: AttachmentId) -> Option<&mut Attachment> {
        self.attachments.get_mut(id)
    }

    /// Removes an attachment from the arena. Slots still showing it draw nothing.
    pub fn remove_attachment(&mut self, id: AttachmentId) -> Option<Attachment> {
        self.attachments.remove(id)
    }

    /// Sets (or clears) the active attachment of a slot.
    ///
    /// Returns false if the slot does not exist or the handle is stale.
    pub fn set_attachment(&mut self, slot: SlotId, attachment: Option<AttachmentId>) -> bool {
        if attachment.is_some_and(|id| !self.attachments.contains(id)) {
            return false;
        }
        match self.slots.get_mut(slot.0) {
            Some(s) => {
                s.attachment = attachment;
                true
            }
            None => false,
        }
    }

    /// Resolves a slot's active attachment. Stale handles resolve to `None`.
    #[must_use]
    pub fn active_attachment(&self, slot: &Slot) -> Option<&Attachment> {
        slot.attachment.and_then(|id| self.attachments.get(id))
    }

    /// Resolves what a slot draws this frame, with the bone it is posed by.
    ///
    /// `None` for empty slots, non-renderable attachments, meshes when
    /// `render_meshes` is off, and slots whose bone does not exist. Every pass
    /// over the draw order uses this so vertex offsets agree between them.
    #[must_use]
    pub fn drawable(&self, slot: &Slot, render_meshes: bool) -> Option<(&Attachment, &Bone)> {
        let attachment = self.active_attachment(slot)?;
        if !attachment.is_renderable() || (attachment.is_mesh() && !render_meshes) {
            return None;
        }
        let bone = self.bone(slot.bone)?;
        Some((attachment, bone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{AtlasRegion, PageId, RegionAttachment, RegionPlacement};

    #[test]
    fn test_build_and_find() {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone(Bone::new("root"));
        let body = skeleton.add_slot(Slot::new("body", root));
        let head = skeleton.add_slot(Slot::new("head", root));

        assert_eq!(skeleton.draw_order, vec![body, head]);
        assert_eq!(skeleton.find_slot("head"), Some(head));
        assert_eq!(skeleton.find_slot("tail"), None);
        assert_eq!(skeleton.color, Color::WHITE);
    }

    #[test]
    fn test_set_attachment() {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone(Bone::new("root"));
        let slot = skeleton.add_slot(Slot::new("body", root));

        let quad = skeleton.add_attachment(Attachment::Region(RegionAttachment::new(
            "body",
            AtlasRegion::new(PageId(0), "body"),
            RegionPlacement::sized(1.0, 1.0),
        )));

        assert!(skeleton.set_attachment(slot, Some(quad)));
        assert!(!skeleton.set_attachment(SlotId(9), Some(quad)));

        let s = skeleton.slot(slot).unwrap();
        assert_eq!(skeleton.active_attachment(s).map(Attachment::name), Some("body"));

        // Removed attachments resolve to nothing and cannot be set again
        assert!(skeleton.remove_attachment(quad).is_some());
        let s = skeleton.slot(slot).unwrap();
        assert!(skeleton.active_attachment(s).is_none());
        assert!(!skeleton.set_attachment(slot, Some(quad)));
        assert!(skeleton.set_attachment(slot, None));
    }

    #[test]
    fn test_drawable_requires_bone() {
        let mut skeleton = Skeleton::new();
        let root = skeleton.add_bone(Bone::new("root"));
        let slot = skeleton.add_slot(Slot::new("body", root));
        let quad = skeleton.add_attachment(Attachment::Region(RegionAttachment::new(
            "body",
            AtlasRegion::new(PageId(0), "body"),
            RegionPlacement::sized(1.0, 1.0),
        )));
        skeleton.set_attachment(slot, Some(quad));

        assert!(skeleton.drawable(skeleton.slot(slot).unwrap(), true).is_some());

        skeleton.slot_mut(slot).unwrap().bone = BoneId(9);
        assert!(skeleton.drawable(skeleton.slot(slot).unwrap(), true).is_none());
    }
}
