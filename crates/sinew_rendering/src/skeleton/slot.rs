//! Slots: draw-order entries holding one attachment each.

use serde::{Deserialize, Serialize};

use super::attachment::AttachmentId;
use super::bone::BoneId;
use super::color::Color;

/// Index of a slot in [`Skeleton::slots`](super::Skeleton::slots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

/// How a slot's color combines with what is behind it.
///
/// Only `Additive` changes the generated vertices (alpha forced to zero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendMode {
    /// Regular alpha blending.
    #[default]
    Normal,
    /// Additive blending.
    Additive,
    /// Multiply. Rendered like `Normal`.
    Multiply,
    /// Screen. Rendered like `Normal`.
    Screen,
}

/// A slot in the skeleton.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Slot name, unique within the skeleton.
    pub name: String,
    /// Owning bone.
    pub bone: BoneId,
    /// Current tint.
    pub color: Color,
    /// Currently active attachment, if any.
    pub attachment: Option<AttachmentId>,
    /// Blend mode.
    pub blend_mode: BlendMode,
}

impl Slot {
    /// Creates an empty slot attached to a bone.
    #[must_use]
    pub fn new(name: impl Into<String>, bone: BoneId) -> Self {
        Self {
            name: name.into(),
            bone,
            color: Color::WHITE,
            attachment: None,
            blend_mode: BlendMode::Normal,
        }
    }

    /// Returns true if the slot blends additively.
    #[inline]
    #[must_use]
    pub fn is_additive(&self) -> bool {
        self.blend_mode == BlendMode::Additive
    }
}
