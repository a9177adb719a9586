//! Skeleton definitions consumed from the asset loader

use glam::Vec3;

/// A single bone of a skeleton
///
/// `offset` is the bone's rest pivot: rotation and scale are applied around
/// it. `anim_id` selects the animation channel driving this bone, which is
/// independent of the bone's position in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bone {
    /// Segment identifier used by per-segment readers
    pub id: u8,
    /// Index of the parent bone in [`Skeleton::bones`], `None` for roots
    pub parent: Option<u16>,
    /// Rest pivot
    pub offset: Vec3,
    /// Animation channel ID matched against track bone IDs
    pub anim_id: u16,
}

impl Bone {
    pub fn new(id: u8, parent: Option<u16>, offset: Vec3, anim_id: u16) -> Self {
        Self {
            id,
            parent,
            offset,
            anim_id,
        }
    }
}

/// Bone list in hierarchy order (parents precede children)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    pub bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> Self {
        Self { bones }
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Parent index if it precedes `index`; out-of-order parents are treated as roots
    pub(crate) fn ordered_parent(&self, index: usize) -> Option<usize> {
        let parent = self.bones[index].parent? as usize;
        if parent < index {
            Some(parent)
        } else {
            tracing::debug!(
                "bone {} references parent {} that does not precede it; treating as root",
                index,
                parent
            );
            None
        }
    }
}
