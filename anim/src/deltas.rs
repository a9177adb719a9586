//! Root-motion deltas and per-segment samples produced by readers

use glam::{Quat, Vec3};
use retroview_shared::CharAnimTime;

/// Change in root transform over one advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancementDeltas {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for AdvancementDeltas {
    fn default() -> Self {
        Self::ZERO
    }
}

impl AdvancementDeltas {
    /// No motion
    pub const ZERO: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ZERO,
    };

    /// Lerp translation and scale, slerp rotation, by `weight` toward `b`
    pub fn blend(a: &Self, b: &Self, weight: f32) -> Self {
        Self {
            translation: a.translation.lerp(b.translation, weight),
            rotation: a.rotation.slerp(b.rotation, weight),
            scale: a.scale.lerp(b.scale, weight),
        }
    }

    /// Blend two deltas by independent weights, normalised to their sum
    pub fn interpolate(a: &Self, b: &Self, weight_a: f32, weight_b: f32) -> Self {
        let total = weight_a + weight_b;
        if total <= 0.0 {
            return *a;
        }
        Self::blend(a, b, weight_b / total)
    }
}

/// Result of [`crate::AnimReader::advance_view`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancementResults {
    /// Part of the requested step the reader could not consume
    pub remaining: CharAnimTime,
    pub deltas: AdvancementDeltas,
}

impl AdvancementResults {
    pub(crate) fn idle(remaining: CharAnimTime) -> Self {
        Self {
            remaining,
            deltas: AdvancementDeltas::ZERO,
        }
    }
}

/// Aggregate motion of a clip, for blend consumers that skip per-frame sampling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteadyStateAnimInfo {
    pub duration: CharAnimTime,
    /// Root translation from start to end of the clip
    pub root_offset: Vec3,
    pub looping: bool,
}

/// Sampled channels of one segment; `None` where the source has no channel
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PerSegmentData {
    pub rotation: Option<Quat>,
    pub translation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

impl PerSegmentData {
    /// Blend two samples; a channel present on only one side is taken as-is
    pub fn blend(a: &Self, b: &Self, weight: f32) -> Self {
        Self {
            rotation: merge(a.rotation, b.rotation, |x, y| x.slerp(y, weight)),
            translation: merge(a.translation, b.translation, |x, y| x.lerp(y, weight)),
            scale: merge(a.scale, b.scale, |x, y| x.lerp(y, weight)),
        }
    }
}

fn merge<T>(a: Option<T>, b: Option<T>, f: impl FnOnce(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (a, b) => a.or(b),
    }
}
