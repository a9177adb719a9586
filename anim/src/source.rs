//! Dense per-frame animation source
//!
//! Every stored channel holds one value per frame. Segments (bone IDs) are
//! mapped onto channels through an explicit table, so a bone can lack any of
//! rotation, translation or scale independently.

use glam::{Quat, Vec3};
use retroview_shared::{CharAnimTime, TIME_EPSILON};

use crate::reader::ROOT_SEGMENT;

/// Per-frame values for one animation channel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelData {
    pub rotations: Option<Vec<Quat>>,
    pub translations: Option<Vec<Vec3>>,
    pub scales: Option<Vec<Vec3>>,
}

/// Frame index pair and blend factor for a sample time
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FrameSample {
    pub frame: usize,
    pub next: usize,
    pub t: f32,
}

/// Uncompressed animation: one value per frame per channel
#[derive(Debug, Clone, PartialEq)]
pub struct AnimSource {
    duration: CharAnimTime,
    interval: CharAnimTime,
    frame_count: usize,
    root_segment: u8,
    looping: bool,
    /// Indexed by segment ID
    segment_channels: Vec<Option<u16>>,
    channels: Vec<ChannelData>,
}

impl AnimSource {
    pub fn new(
        duration: CharAnimTime,
        interval: CharAnimTime,
        frame_count: usize,
        looping: bool,
        segment_channels: Vec<Option<u16>>,
        channels: Vec<ChannelData>,
    ) -> Self {
        Self {
            duration,
            interval,
            frame_count,
            root_segment: ROOT_SEGMENT,
            looping,
            segment_channels,
            channels,
        }
    }

    /// Override the segment whose motion is reported as root deltas
    pub fn with_root_segment(mut self, segment: u8) -> Self {
        self.root_segment = segment;
        self
    }

    pub fn duration(&self) -> CharAnimTime {
        self.duration
    }

    pub fn interval(&self) -> CharAnimTime {
        self.interval
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn root_segment(&self) -> u8 {
        self.root_segment
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    fn channel(&self, segment: u8) -> Option<&ChannelData> {
        let index = (*self.segment_channels.get(segment as usize)?)?;
        self.channels.get(index as usize)
    }

    pub fn has_rotation(&self, segment: u8) -> bool {
        self.channel(segment).is_some_and(|c| c.rotations.is_some())
    }

    pub fn has_translation(&self, segment: u8) -> bool {
        self.channel(segment).is_some_and(|c| c.translations.is_some())
    }

    pub fn has_scale(&self, segment: u8) -> bool {
        self.channel(segment).is_some_and(|c| c.scales.is_some())
    }

    /// Split a time into a frame pair and remainder
    ///
    /// Remainders within [`TIME_EPSILON`] of a frame boundary snap to zero.
    pub(crate) fn frame_sample(&self, time: CharAnimTime) -> FrameSample {
        let last = self.frame_count.saturating_sub(1);
        let interval = self.interval.seconds();
        if interval <= 0.0 || time.is_infinite() {
            let frame = if time.is_infinite() { last } else { 0 };
            return FrameSample {
                frame,
                next: frame,
                t: 0.0,
            };
        }

        let position = (time.seconds() / interval).max(0.0);
        let whole = position.floor();
        let mut t = position - whole;
        if t < TIME_EPSILON {
            t = 0.0;
        }

        let frame = (whole as usize).min(last);
        FrameSample {
            frame,
            next: (frame + 1).min(last),
            t,
        }
    }

    /// Interpolated rotation, identity when the segment has none
    pub fn rotation(&self, segment: u8, time: CharAnimTime) -> Quat {
        let Some(frames) = self.channel(segment).and_then(|c| c.rotations.as_deref()) else {
            return Quat::IDENTITY;
        };
        let s = self.frame_sample(time);
        match (frames.get(s.frame), frames.get(s.next)) {
            (Some(a), Some(b)) => a.slerp(*b, s.t),
            (Some(a), None) => *a,
            _ => Quat::IDENTITY,
        }
    }

    /// Interpolated translation, zero when the segment has none
    pub fn translation(&self, segment: u8, time: CharAnimTime) -> Vec3 {
        let frames = self.channel(segment).and_then(|c| c.translations.as_deref());
        lerp_frames(frames, self.frame_sample(time))
    }

    /// Interpolated scale, zero when the segment has none
    pub fn scale(&self, segment: u8, time: CharAnimTime) -> Vec3 {
        let frames = self.channel(segment).and_then(|c| c.scales.as_deref());
        lerp_frames(frames, self.frame_sample(time))
    }
}

fn lerp_frames(frames: Option<&[Vec3]>, s: FrameSample) -> Vec3 {
    let Some(frames) = frames else {
        return Vec3::ZERO;
    };
    match (frames.get(s.frame), frames.get(s.next)) {
        (Some(a), Some(b)) => a.lerp(*b, s.t),
        (Some(a), None) => *a,
        _ => Vec3::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retroview_shared::{quat_is_near, vec3_is_near};

    fn source() -> AnimSource {
        let channel = ChannelData {
            rotations: Some(vec![
                Quat::IDENTITY,
                Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                Quat::from_rotation_y(std::f32::consts::PI),
            ]),
            translations: Some(vec![
                Vec3::ZERO,
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(4.0, 2.0, 0.0),
            ]),
            scales: None,
        };
        AnimSource::new(
            CharAnimTime::from_seconds(2.0),
            CharAnimTime::from_seconds(1.0),
            3,
            false,
            vec![None, Some(0)],
            vec![channel],
        )
    }

    #[test]
    fn test_vectors_lerp_between_frames() {
        let s = source();
        let t = s.translation(1, CharAnimTime::from_seconds(1.5));
        assert!(vec3_is_near(t, Vec3::new(3.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_rotations_slerp_between_frames() {
        let s = source();
        let q = s.rotation(1, CharAnimTime::from_seconds(0.5));
        assert!(quat_is_near(
            q,
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_4),
            1e-5
        ));
    }

    #[test]
    fn test_near_boundary_remainder_snaps_to_zero() {
        let s = source();
        let sample = s.frame_sample(CharAnimTime::from_seconds(1.000_001));
        assert_eq!(sample.frame, 1);
        assert_eq!(sample.t, 0.0);
    }

    #[test]
    fn test_frames_clamp_to_last() {
        let s = source();
        let t = s.translation(1, CharAnimTime::from_seconds(10.0));
        assert!(vec3_is_near(t, Vec3::new(4.0, 2.0, 0.0), 1e-6));
        assert_eq!(
            s.translation(1, CharAnimTime::INFINITY),
            Vec3::new(4.0, 2.0, 0.0)
        );
    }

    #[test]
    fn test_absent_channels_default_to_zero_values() {
        let s = source();
        assert!(!s.has_scale(1));
        assert_eq!(s.scale(1, CharAnimTime::ZERO), Vec3::ZERO);

        assert!(!s.has_rotation(0));
        assert_eq!(s.rotation(0, CharAnimTime::ZERO), Quat::IDENTITY);
        assert_eq!(s.translation(7, CharAnimTime::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_zero_interval_samples_first_frame() {
        let s = AnimSource::new(
            CharAnimTime::ZERO,
            CharAnimTime::ZERO,
            1,
            false,
            vec![Some(0)],
            vec![ChannelData {
                translations: Some(vec![Vec3::X]),
                ..ChannelData::default()
            }],
        );
        assert_eq!(s.translation(0, CharAnimTime::from_seconds(3.0)), Vec3::X);
    }
}
