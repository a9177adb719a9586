//! Rail-riding entity state

use glam::{Mat4, Vec3};
use retroview_shared::lerp_f32;
use smallvec::SmallVec;

use crate::node::{HeadingMode, RailKeyframe};
use crate::path::{Rail, RideParams};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiderState {
    /// Stopped on a keyframe until the timer runs out
    Waiting { remaining: f32 },
    Moving,
}

/// Keyframe indices applied during one update, in travel order
pub type PassedKeyframes = SmallVec<[usize; 4]>;

/// An entity moving along a [`Rail`]
#[derive(Debug, Clone, PartialEq)]
pub struct RailRider {
    t: f32,
    /// Units per second, always applied along `direction`
    speed: f32,
    direction: f32,
    state: RiderState,
    face_player: bool,
    yaw_mode: HeadingMode,
    pitch_mode: HeadingMode,
    anim_mode: Option<u8>,
    yaw: f32,
    pitch: f32,
    position: Vec3,
}

impl RailRider {
    pub fn new(rail: &Rail, t: f32, speed: f32) -> Self {
        Self {
            t,
            speed,
            direction: 1.0,
            state: RiderState::Moving,
            face_player: false,
            yaw_mode: HeadingMode::None,
            pitch_mode: HeadingMode::None,
            anim_mode: None,
            yaw: 0.0,
            pitch: 0.0,
            position: rail.position(t),
        }
    }

    pub fn t(&self) -> f32 {
        self.t
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn direction(&self) -> f32 {
        self.direction
    }

    pub fn state(&self) -> RiderState {
        self.state
    }

    pub fn face_player(&self) -> bool {
        self.face_player
    }

    pub fn yaw_mode(&self) -> HeadingMode {
        self.yaw_mode
    }

    pub fn pitch_mode(&self) -> HeadingMode {
        self.pitch_mode
    }

    pub fn anim_mode(&self) -> Option<u8> {
        self.anim_mode
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// World transform: translate, then yaw about Y, then pitch about X
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_rotation_x(self.pitch)
    }

    /// Advance by `dt` seconds and return the keyframes applied
    pub fn update(&mut self, rail: &Rail, dt: f32, params: &RideParams) -> PassedKeyframes {
        let mut passed = PassedKeyframes::new();

        if let RiderState::Waiting { remaining } = self.state {
            let remaining = remaining - dt;
            if remaining > 0.0 {
                self.state = RiderState::Waiting { remaining };
                self.refresh(rail, params);
                return passed;
            }
            self.state = RiderState::Moving;
        }

        let old = self.t;
        let new = rail.ride(old, self.speed * dt * self.direction, params);
        self.t = new;

        for index in crossed_keyframes(rail, old, new, self.direction) {
            let kf = rail.keyframes[index];
            self.apply(&kf);
            passed.push(index);
            if let Some(wait) = kf.desc.wait.filter(|&w| w > 0.0) {
                self.t = kf.t();
                self.state = RiderState::Waiting { remaining: wait };
                break;
            }
        }

        self.apply_lerps(rail);
        self.refresh(rail, params);
        passed
    }

    fn apply(&mut self, kf: &RailKeyframe) {
        let d = &kf.desc;
        tracing::trace!("rider applying keyframe at node {} (t = {})", kf.node, d.t);
        self.face_player = d.face_player;
        self.yaw_mode = d.yaw_mode;
        self.pitch_mode = d.pitch_mode;
        if let Some(mode) = d.anim_mode {
            self.anim_mode = Some(mode);
        }
        if let Some(direction) = d.direction {
            self.direction = direction.sign();
        }
        if let Some(speed) = d.speed {
            self.speed = speed;
        }
        if let Some(yaw) = d.yaw {
            self.yaw = yaw;
        }
    }

    fn apply_lerps(&mut self, rail: &Rail) {
        for lerp in &rail.lerps {
            let start = &rail.keyframes[lerp.start];
            let end = &rail.keyframes[lerp.end];
            let (ts, te) = (start.t(), end.t());
            if te <= ts || self.t < ts || self.t > te {
                continue;
            }
            let f = (self.t - ts) / (te - ts);
            if let (Some(a), Some(b)) = (start.desc.speed, end.desc.speed) {
                self.speed = lerp_f32(a, b, f);
            }
            if start.desc.yaw_mode == HeadingMode::Interpolated {
                if let (Some(a), Some(b)) = (start.desc.yaw, end.desc.yaw) {
                    self.yaw = lerp_f32(a, b, f);
                }
            }
        }
    }

    fn refresh(&mut self, rail: &Rail, params: &RideParams) {
        self.position = rail.position(self.t);
        if self.yaw_mode == HeadingMode::Rail || self.pitch_mode == HeadingMode::Rail {
            // Keep the last heading when there is nothing ahead
            let Some((yaw, pitch)) = rail.heading(self.t, self.direction, params) else {
                return;
            };
            if self.yaw_mode == HeadingMode::Rail {
                self.yaw = yaw;
            }
            if self.pitch_mode == HeadingMode::Rail {
                self.pitch = pitch;
            }
        }
    }
}

/// Indices of keyframes strictly after `old` up to and including `new`, in travel order
fn crossed_keyframes(rail: &Rail, old: f32, new: f32, direction: f32) -> PassedKeyframes {
    let kfs = &rail.keyframes;
    let mut out = PassedKeyframes::new();
    let forward = direction > 0.0;
    let wrapped = rail.is_looping() && if forward { new < old } else { new > old };

    let in_range = |t: f32, lo: f32, hi: f32, lo_inclusive: bool| {
        (if lo_inclusive { t >= lo } else { t > lo }) && t <= hi
    };

    if forward {
        let upper = if wrapped { 1.0 } else { new };
        out.extend((0..kfs.len()).filter(|&i| in_range(kfs[i].t(), old, upper, false)));
        if wrapped {
            out.extend((0..kfs.len()).filter(|&i| in_range(kfs[i].t(), rail.loop_start, new, true)));
        }
    } else {
        let lower = if wrapped { rail.loop_start } else { new };
        out.extend(
            (0..kfs.len())
                .rev()
                .filter(|&i| kfs[i].t() < old && kfs[i].t() >= lower),
        );
        if wrapped {
            out.extend((0..kfs.len()).rev().filter(|&i| in_range(kfs[i].t(), new, 1.0, true)));
        }
    }
    out
}
