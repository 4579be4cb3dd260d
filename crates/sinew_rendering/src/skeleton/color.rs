//! Tints and packed vertex colors.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Floating point RGBA tint, each channel in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque white, the identity tint.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a tint.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Packed 8-bit RGBA vertex color (`Unorm8x4` on the GPU).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color32 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color32 {
    /// Creates a packed color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Combines the skeleton, slot and attachment tints into a premultiplied color.
    ///
    /// The alpha byte is `255 * skeleton.a * slot.a * attachment.a` truncated.
    /// Each color byte is `skeleton.c * slot.c * attachment.c * alpha_byte` truncated.
    /// Additive slots keep their premultiplied color but have alpha forced to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn premultiplied(skeleton: Color, slot: Color, attachment: Color, additive: bool) -> Self {
        // `as u8` saturates and truncates toward zero
        let alpha = (skeleton.a * 255.0 * slot.a * attachment.a) as u8;
        let alpha_f = f32::from(alpha);
        Self {
            r: (skeleton.r * slot.r * attachment.r * alpha_f) as u8,
            g: (skeleton.g * slot.g * attachment.g * alpha_f) as u8,
            b: (skeleton.b * slot.b * attachment.b * alpha_f) as u8,
            a: if additive { 0 } else { alpha },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premultiplied_white() {
        let c = Color32::premultiplied(Color::WHITE, Color::WHITE, Color::WHITE, false);
        assert_eq!(c, Color32::new(255, 255, 255, 255));
    }

    #[test]
    fn test_premultiplied_truncates() {
        let half = Color::new(0.5, 0.5, 0.5, 0.5);
        let c = Color32::premultiplied(Color::WHITE, half, Color::WHITE, false);
        // 255 * 0.5 = 127.5 → 127, then 0.5 * 127 = 63.5 → 63
        assert_eq!(c, Color32::new(63, 63, 63, 127));
    }

    #[test]
    fn test_additive_zero_alpha() {
        let tint = Color::new(1.0, 0.5, 0.0, 1.0);
        let c = Color32::premultiplied(Color::WHITE, tint, Color::WHITE, true);
        assert_eq!(c, Color32::new(255, 127, 0, 0));
    }
}
