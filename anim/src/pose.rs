//! Reader samples to bone matrices

use glam::{Mat4, Vec3};

use crate::deltas::PerSegmentData;
use crate::skeleton::Skeleton;

/// Compose per-segment samples into model-space bone matrices
///
/// `per_segment` is indexed like `skeleton.bones`. Missing channels fall back
/// to the rest pose: identity rotation, the bone offset as translation and
/// unit scale.
pub fn build_pose_matrices(skeleton: &Skeleton, per_segment: &[PerSegmentData], out: &mut Vec<Mat4>) {
    out.clear();
    out.reserve(skeleton.len());
    for (i, bone) in skeleton.bones.iter().enumerate() {
        let data = per_segment.get(i).copied().unwrap_or_default();
        let local = Mat4::from_scale_rotation_translation(
            data.scale.unwrap_or(Vec3::ONE),
            data.rotation.unwrap_or_default(),
            data.translation.unwrap_or(bone.offset),
        );
        let world = match skeleton.ordered_parent(i) {
            Some(parent) => out[parent] * local,
            None => local,
        };
        out.push(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Bone;
    use glam::Quat;
    use retroview_shared::vec3_is_near;

    #[test]
    fn test_rest_pose_uses_offsets() {
        let skeleton = Skeleton::new(vec![
            Bone::new(0, None, Vec3::new(0.0, 1.0, 0.0), 0),
            Bone::new(1, Some(0), Vec3::new(0.0, 2.0, 0.0), 1),
        ]);
        let mut out = Vec::new();
        build_pose_matrices(&skeleton, &[], &mut out);
        assert!(vec3_is_near(
            out[1].transform_point3(Vec3::ZERO),
            Vec3::new(0.0, 3.0, 0.0),
            1e-6
        ));
    }

    #[test]
    fn test_parent_rotation_carries_child() {
        let skeleton = Skeleton::new(vec![
            Bone::new(0, None, Vec3::ZERO, 0),
            Bone::new(1, Some(0), Vec3::X, 1),
        ]);
        let data = [
            PerSegmentData {
                rotation: Some(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
                ..PerSegmentData::default()
            },
            PerSegmentData::default(),
        ];
        let mut out = Vec::new();
        build_pose_matrices(&skeleton, &data, &mut out);
        assert!(vec3_is_near(out[1].transform_point3(Vec3::ZERO), Vec3::Y, 1e-6));
    }
}
