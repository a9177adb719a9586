//! Points attached to bones (weapon tips, effect emitters)

use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelPoint {
    /// Index into the bone matrix list
    pub bone: usize,
    /// Position in the bone's space
    pub offset: Vec3,
}

impl ModelPoint {
    pub fn new(bone: usize, offset: Vec3) -> Self {
        Self { bone, offset }
    }

    /// World position given model-space bone matrices
    ///
    /// A missing bone leaves the point in model space.
    pub fn world_position(&self, bones: &[Mat4], model: &Mat4) -> Vec3 {
        let local = match bones.get(self.bone) {
            Some(bone) => bone.transform_point3(self.offset),
            None => self.offset,
        };
        model.transform_point3(local)
    }
}
