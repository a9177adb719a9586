//! Flat rail node input and the keyframe records built from it

use glam::Vec3;

/// How a rider's yaw or pitch is driven between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingMode {
    /// Leave the angle alone
    #[default]
    None,
    /// Follow the rail's direction of travel
    Rail,
    /// Interpolate across a lerp range
    Interpolated,
}

/// Direction change requested by a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelDirection {
    Forward,
    Backward,
}

impl TravelDirection {
    pub fn sign(self) -> f32 {
        match self {
            TravelDirection::Forward => 1.0,
            TravelDirection::Backward => -1.0,
        }
    }
}

/// Keyframe payload as authored
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyframeDescriptor {
    /// Position along the rail in `[0, 1]`
    pub t: f32,
    /// Seconds to stop for when reached
    pub wait: Option<f32>,
    pub face_player: bool,
    pub yaw_mode: HeadingMode,
    pub pitch_mode: HeadingMode,
    /// Animation mode to switch to
    pub anim_mode: Option<u8>,
    pub direction: Option<TravelDirection>,
    /// Speed in units per second from this keyframe on
    pub speed: Option<f32>,
    /// Yaw in radians, used as an interpolation endpoint
    pub yaw: Option<f32>,
    /// Node index of the keyframe that starts a lerp ending here
    pub lerp_pair: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RailPayload {
    Point(Vec3),
    Keyframe(KeyframeDescriptor),
    CameraCut,
}

/// One entry of a level's flat rail node list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailNode {
    pub next: Option<u16>,
    pub payload: RailPayload,
}

impl RailNode {
    pub fn point(p: Vec3, next: Option<u16>) -> Self {
        Self {
            next,
            payload: RailPayload::Point(p),
        }
    }

    pub fn keyframe(desc: KeyframeDescriptor, next: Option<u16>) -> Self {
        Self {
            next,
            payload: RailPayload::Keyframe(desc),
        }
    }
}

/// Keyframe placed on a built rail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailKeyframe {
    pub desc: KeyframeDescriptor,
    /// Node index the keyframe was read from
    pub node: u16,
    /// Arc length from this keyframe to the end of the rail
    pub dist_to_end: f32,
}

impl RailKeyframe {
    pub fn t(&self) -> f32 {
        self.desc.t
    }
}

/// Interpolation window between two keyframes, by keyframe index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LerpRange {
    pub start: usize,
    pub end: usize,
}
