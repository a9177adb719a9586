//! Linear keyframe tracks

/// Which bone property a track drives
///
/// Raw values 1-9 follow the asset encoding: rotation X/Y/Z, scale X/Y/Z,
/// translation X/Y/Z. Rotation values are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TrackKind {
    RotateX = 1,
    RotateY = 2,
    RotateZ = 3,
    ScaleX = 4,
    ScaleY = 5,
    ScaleZ = 6,
    TranslateX = 7,
    TranslateY = 8,
    TranslateZ = 9,
}

impl TrackKind {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            1 => Some(TrackKind::RotateX),
            2 => Some(TrackKind::RotateY),
            3 => Some(TrackKind::RotateZ),
            4 => Some(TrackKind::ScaleX),
            5 => Some(TrackKind::ScaleY),
            6 => Some(TrackKind::ScaleZ),
            7 => Some(TrackKind::TranslateX),
            8 => Some(TrackKind::TranslateY),
            9 => Some(TrackKind::TranslateZ),
            _ => None,
        }
    }

    /// Axis index (0 = X, 1 = Y, 2 = Z)
    pub fn axis(self) -> usize {
        (self as usize - 1) % 3
    }
}

/// One (frame, value) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
}

impl Keyframe {
    pub const fn new(frame: f32, value: f32) -> Self {
        Self { frame, value }
    }
}

/// Keyframes for one property of one bone, ordered by frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTrack {
    /// Bone animation ID this track targets
    pub bone_anim_id: u16,
    pub kind: TrackKind,
    pub keyframes: Vec<Keyframe>,
}

impl AnimationTrack {
    /// Create a track, sorting keyframes by frame
    pub fn new(bone_anim_id: u16, kind: TrackKind, mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.frame.total_cmp(&b.frame));
        Self {
            bone_anim_id,
            kind,
            keyframes,
        }
    }

    /// Sample the track at `frame`, clamping outside the keyed range
    ///
    /// Returns `None` for a track without keyframes so the caller keeps its
    /// default.
    pub fn sample(&self, frame: f32) -> Option<f32> {
        let keys = &self.keyframes;
        let last = keys.last()?;

        let Some(next) = keys.iter().position(|k| k.frame > frame) else {
            return Some(last.value);
        };
        if next == 0 {
            return Some(keys[0].value);
        }

        let a = &keys[next - 1];
        let b = &keys[next];
        let t = (frame - a.frame) / (b.frame - a.frame);
        Some(a.value + (b.value - a.value) * t)
    }

    pub fn first_frame(&self) -> Option<f32> {
        self.keyframes.first().map(|k| k.frame)
    }

    pub fn last_frame(&self) -> Option<f32> {
        self.keyframes.last().map(|k| k.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> AnimationTrack {
        AnimationTrack::new(
            0,
            TrackKind::TranslateX,
            vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(10.0, 100.0),
                Keyframe::new(20.0, 50.0),
            ],
        )
    }

    #[test]
    fn test_sample_midpoint() {
        assert_eq!(track().sample(5.0), Some(50.0));
        assert_eq!(track().sample(15.0), Some(75.0));
    }

    #[test]
    fn test_sample_clamps_outside_range() {
        assert_eq!(track().sample(-5.0), Some(0.0));
        assert_eq!(track().sample(25.0), Some(50.0));
    }

    #[test]
    fn test_sample_exact_keys() {
        assert_eq!(track().sample(0.0), Some(0.0));
        assert_eq!(track().sample(10.0), Some(100.0));
        assert_eq!(track().sample(20.0), Some(50.0));
    }

    #[test]
    fn test_empty_track_has_no_value() {
        let t = AnimationTrack::new(0, TrackKind::ScaleY, vec![]);
        assert_eq!(t.sample(3.0), None);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let t = AnimationTrack::new(
            0,
            TrackKind::RotateZ,
            vec![Keyframe::new(10.0, 1.0), Keyframe::new(0.0, 0.0)],
        );
        assert_eq!(t.first_frame(), Some(0.0));
        assert_eq!(t.sample(5.0), Some(0.5));
    }

    #[test]
    fn test_track_kind_axes() {
        assert_eq!(TrackKind::from_raw(1), Some(TrackKind::RotateX));
        assert_eq!(TrackKind::from_raw(9), Some(TrackKind::TranslateZ));
        assert_eq!(TrackKind::from_raw(0), None);
        assert_eq!(TrackKind::ScaleY.axis(), 1);
        assert_eq!(TrackKind::TranslateZ.axis(), 2);
    }
}
