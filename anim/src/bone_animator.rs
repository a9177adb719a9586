//! Linear-keyframe bone animation
//!
//! A [`BoneAnimator`] holds every track of one animation clip. Sampling a bone
//! maps the frame through a [`FrameMode`], samples each track that targets the
//! bone's animation ID, and builds a transform that rotates and scales around
//! the bone's rest pivot:
//!
//! ```text
//! T(translation) · T(+offset) · R(x, y, z) · S(scale) · T(−offset)
//! ```

use glam::{Mat4, Vec3};
use smallvec::SmallVec;

use crate::error::AnimError;
use crate::skeleton::{Bone, Skeleton};
use crate::track::{AnimationTrack, TrackKind};

/// How an out-of-range frame is mapped before sampling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameMode {
    /// Wrap frames past the end back into the clip
    #[default]
    Loop,
    /// Clamp to the last frame
    Once,
    /// Pass through unchanged
    None,
}

/// Parameters shared by every bone animator of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimParams {
    /// Multiplier applied to translation track values
    pub translation_scale: f32,
    /// Frames per second, used to turn wall-clock time into frames
    pub frame_rate: f32,
}

impl Default for AnimParams {
    fn default() -> Self {
        Self {
            translation_scale: 1.0,
            frame_rate: 30.0,
        }
    }
}

/// One animation clip made of per-bone linear tracks
#[derive(Debug, Clone, PartialEq)]
pub struct BoneAnimator {
    pub start_frame: f32,
    pub end_frame: f32,
    pub tracks: Vec<AnimationTrack>,
}

impl BoneAnimator {
    pub fn new(start_frame: f32, end_frame: f32, tracks: Vec<AnimationTrack>) -> Self {
        Self {
            start_frame,
            end_frame,
            tracks,
        }
    }

    /// Number of frames covered by the clip
    pub fn frame_span(&self) -> f32 {
        self.end_frame - self.start_frame
    }

    /// Apply the frame mode to an absolute frame
    pub fn map_frame(&self, frame: f32, mode: FrameMode) -> f32 {
        let span = self.frame_span();
        let mut relative = frame - self.start_frame;
        match mode {
            // Frames past the end land in (0, span]; an exact multiple maps to the end
            FrameMode::Loop => {
                if span > 0.0 && relative > span {
                    relative = relative.rem_euclid(span);
                    if relative == 0.0 {
                        relative = span;
                    }
                }
            }
            FrameMode::Once => relative = relative.min(span),
            FrameMode::None => {}
        }
        relative + self.start_frame
    }

    /// Parent-relative transform for `bone` at `frame`
    pub fn bone_transform(
        &self,
        bone: &Bone,
        frame: f32,
        mode: FrameMode,
        params: &AnimParams,
    ) -> Mat4 {
        let frame = self.map_frame(frame, mode);

        let tracks: SmallVec<[&AnimationTrack; 9]> = self
            .tracks
            .iter()
            .filter(|t| t.bone_anim_id == bone.anim_id)
            .collect();

        let mut angles: [Option<f32>; 3] = [None; 3];
        let mut scale = Vec3::ONE;
        let mut translation = Vec3::ZERO;

        for track in tracks {
            let Some(value) = track.sample(frame) else {
                continue;
            };
            let axis = track.kind.axis();
            match track.kind {
                TrackKind::RotateX | TrackKind::RotateY | TrackKind::RotateZ => {
                    angles[axis] = Some(value);
                }
                TrackKind::ScaleX | TrackKind::ScaleY | TrackKind::ScaleZ => {
                    scale[axis] = value;
                }
                TrackKind::TranslateX | TrackKind::TranslateY | TrackKind::TranslateZ => {
                    translation[axis] = value * params.translation_scale;
                }
            }
        }

        // X, then Y, then Z, each post-multiplied onto the scratch identity
        let mut rotation = Mat4::IDENTITY;
        if let Some(x) = angles[0] {
            rotation *= Mat4::from_rotation_x(x.to_radians());
        }
        if let Some(y) = angles[1] {
            rotation *= Mat4::from_rotation_y(y.to_radians());
        }
        if let Some(z) = angles[2] {
            rotation *= Mat4::from_rotation_z(z.to_radians());
        }

        Mat4::from_translation(translation)
            * Mat4::from_translation(bone.offset)
            * rotation
            * Mat4::from_scale(scale)
            * Mat4::from_translation(-bone.offset)
    }

    /// Model-space matrices for every bone, composed down the hierarchy
    pub fn calc_bone_matrices(
        &self,
        skeleton: &Skeleton,
        frame: f32,
        mode: FrameMode,
        params: &AnimParams,
        out: &mut Vec<Mat4>,
    ) {
        out.clear();
        out.reserve(skeleton.len());
        for (i, bone) in skeleton.bones.iter().enumerate() {
            let local = self.bone_transform(bone, frame, mode, params);
            let world = match skeleton.ordered_parent(i) {
                Some(parent) => out[parent] * local,
                None => local,
            };
            out.push(world);
        }
    }
}

/// Indexed collection of bone animators for one model
///
/// Slots may be empty in the source data; requesting one is a data error.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    animations: Vec<Option<BoneAnimator>>,
}

impl AnimationSet {
    pub fn new(animations: Vec<Option<BoneAnimator>>) -> Self {
        Self { animations }
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&BoneAnimator, AnimError> {
        self.animations
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(AnimError::MissingAnimation {
                index,
                available: self.animations.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Keyframe;
    use retroview_shared::vec3_is_near;

    fn animator() -> BoneAnimator {
        BoneAnimator::new(
            0.0,
            30.0,
            vec![
                AnimationTrack::new(
                    1,
                    TrackKind::TranslateX,
                    vec![Keyframe::new(0.0, 0.0), Keyframe::new(30.0, 30.0)],
                ),
                AnimationTrack::new(
                    1,
                    TrackKind::RotateY,
                    vec![Keyframe::new(0.0, 0.0), Keyframe::new(30.0, 90.0)],
                ),
                AnimationTrack::new(
                    2,
                    TrackKind::ScaleZ,
                    vec![Keyframe::new(0.0, 2.0)],
                ),
            ],
        )
    }

    fn bone(anim_id: u16, offset: Vec3) -> Bone {
        Bone::new(0, None, offset, anim_id)
    }

    #[test]
    fn test_loop_mode_wraps() {
        let a = animator();
        assert_eq!(a.map_frame(35.0, FrameMode::Loop), 5.0);
        assert_eq!(a.map_frame(65.0, FrameMode::Loop), 5.0);
        assert_eq!(a.map_frame(30.0, FrameMode::Loop), 30.0);
        assert_eq!(a.map_frame(60.0, FrameMode::Loop), 30.0);
        assert_eq!(a.map_frame(-5.0, FrameMode::Loop), -5.0);

        let params = AnimParams::default();
        let b = bone(1, Vec3::ZERO);
        let wrapped = a.bone_transform(&b, 35.0, FrameMode::Loop, &params);
        let direct = a.bone_transform(&b, 5.0, FrameMode::Loop, &params);
        assert_eq!(wrapped, direct);
    }

    #[test]
    fn test_loop_mode_wraps_far_frames() {
        let a = BoneAnimator::new(10.0, 40.0, Vec::new());
        assert_eq!(a.map_frame(3_000_015.0, FrameMode::Loop), 15.0);
        assert_eq!(a.map_frame(3_000_010.0, FrameMode::Loop), 40.0);
    }

    #[test]
    fn test_once_mode_clamps() {
        let a = animator();
        let params = AnimParams::default();
        let b = bone(1, Vec3::ZERO);
        assert_eq!(a.map_frame(35.0, FrameMode::Once), 30.0);
        assert_eq!(
            a.bone_transform(&b, 35.0, FrameMode::Once, &params),
            a.bone_transform(&b, 30.0, FrameMode::Once, &params)
        );
    }

    #[test]
    fn test_none_mode_passes_through() {
        assert_eq!(animator().map_frame(35.0, FrameMode::None), 35.0);
    }

    #[test]
    fn test_translation_scale_applies() {
        let a = animator();
        let params = AnimParams {
            translation_scale: 2.0,
            ..AnimParams::default()
        };
        let m = a.bone_transform(&bone(1, Vec3::ZERO), 0.0, FrameMode::Once, &params);
        assert!(vec3_is_near(m.w_axis.truncate(), Vec3::ZERO, 1e-6));

        let only_translation = BoneAnimator::new(
            0.0,
            10.0,
            vec![AnimationTrack::new(
                7,
                TrackKind::TranslateY,
                vec![Keyframe::new(0.0, 4.0)],
            )],
        );
        let m = only_translation.bone_transform(&bone(7, Vec3::ZERO), 0.0, FrameMode::Once, &params);
        assert!(vec3_is_near(m.w_axis.truncate(), Vec3::new(0.0, 8.0, 0.0), 1e-6));
    }

    #[test]
    fn test_rotation_pivots_around_offset() {
        let a = BoneAnimator::new(
            0.0,
            10.0,
            vec![AnimationTrack::new(
                3,
                TrackKind::RotateZ,
                vec![Keyframe::new(0.0, 90.0)],
            )],
        );
        let offset = Vec3::new(1.0, 0.0, 0.0);
        let m = a.bone_transform(&bone(3, offset), 0.0, FrameMode::Once, &AnimParams::default());

        // The pivot itself stays put; a point one unit further along X swings to +Y.
        assert!(vec3_is_near(m.transform_point3(offset), offset, 1e-5));
        assert!(vec3_is_near(
            m.transform_point3(Vec3::new(2.0, 0.0, 0.0)),
            Vec3::new(1.0, 1.0, 0.0),
            1e-5
        ));
    }

    #[test]
    fn test_scale_pivots_around_offset() {
        let a = animator();
        let offset = Vec3::new(0.0, 0.0, 5.0);
        let m = a.bone_transform(&bone(2, offset), 0.0, FrameMode::Once, &AnimParams::default());
        assert!(vec3_is_near(m.transform_point3(offset), offset, 1e-5));
        assert!(vec3_is_near(
            m.transform_point3(Vec3::new(0.0, 0.0, 6.0)),
            Vec3::new(0.0, 0.0, 7.0),
            1e-5
        ));
    }

    #[test]
    fn test_unmatched_bone_is_identity() {
        let a = animator();
        let m = a.bone_transform(
            &bone(99, Vec3::new(3.0, 4.0, 5.0)),
            12.0,
            FrameMode::Loop,
            &AnimParams::default(),
        );
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_bone_matrices_compose_with_parent() {
        let a = BoneAnimator::new(
            0.0,
            10.0,
            vec![AnimationTrack::new(
                1,
                TrackKind::TranslateX,
                vec![Keyframe::new(0.0, 3.0)],
            )],
        );
        let skeleton = Skeleton::new(vec![
            Bone::new(0, None, Vec3::ZERO, 1),
            Bone::new(1, Some(0), Vec3::ZERO, 2),
        ]);
        let mut out = Vec::new();
        a.calc_bone_matrices(&skeleton, 0.0, FrameMode::Once, &AnimParams::default(), &mut out);
        assert_eq!(out.len(), 2);
        assert!(vec3_is_near(out[1].w_axis.truncate(), Vec3::new(3.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_missing_animation_is_an_error() {
        let set = AnimationSet::new(vec![Some(animator()), None]);
        assert!(set.get(0).is_ok());
        assert_eq!(
            set.get(1).unwrap_err(),
            AnimError::MissingAnimation {
                index: 1,
                available: 2
            }
        );
        assert!(set.get(5).is_err());
    }
}
