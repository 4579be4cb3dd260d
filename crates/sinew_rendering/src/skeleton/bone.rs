//! Bones: world transforms resolved by the animation solver.

use glam::{Affine2, Mat2, Vec2};

/// Index of a bone in [`Skeleton::bones`](super::Skeleton::bones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub usize);

/// A bone with its resolved world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    /// Bone name.
    pub name: String,
    /// World transform (`a b c d` linear part plus translation).
    pub world: Affine2,
    /// Sign of the accumulated x scale (±1).
    pub world_sign_x: f32,
    /// Sign of the accumulated y scale (±1).
    pub world_sign_y: f32,
}

impl Bone {
    /// Creates a bone at the identity transform.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world: Affine2::IDENTITY,
            world_sign_x: 1.0,
            world_sign_y: 1.0,
        }
    }

    /// Sets the world transform from its matrix terms.
    ///
    /// A point maps to `(a*x + b*y + world_x, c*x + d*y + world_y)`.
    #[allow(clippy::many_single_char_names)]
    pub fn set_world(&mut self, a: f32, b: f32, c: f32, d: f32, world_x: f32, world_y: f32) {
        self.world = Affine2::from_mat2_translation(
            Mat2::from_cols(Vec2::new(a, c), Vec2::new(b, d)),
            Vec2::new(world_x, world_y),
        );
    }

    /// Returns true if the bone is mirrored on exactly one axis.
    #[inline]
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        self.world_sign_x.is_sign_negative() != self.world_sign_y.is_sign_negative()
    }

    /// Transforms a bone-local point to world space.
    #[inline]
    #[must_use]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.world.transform_point2(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_world() {
        let mut bone = Bone::new("root");
        bone.set_world(2.0, 0.0, 0.0, 3.0, 10.0, 20.0);

        let p = bone.to_world(Vec2::new(1.0, 1.0));
        assert!((p - Vec2::new(12.0, 23.0)).length() < 1e-6);
    }

    #[test]
    fn test_mirrored() {
        let mut bone = Bone::new("arm");
        assert!(!bone.is_mirrored());

        bone.world_sign_x = -1.0;
        assert!(bone.is_mirrored());

        bone.world_sign_y = -1.0;
        assert!(!bone.is_mirrored());
    }
}
