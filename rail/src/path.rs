//! Rail geometry: Hermite evaluation and arc-length riding

use glam::Vec3;

use crate::node::{LerpRange, RailKeyframe};

/// Tuning for [`Rail::ride`] and [`Rail::heading`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RideParams {
    /// First parameter-space step
    pub initial_step: f32,
    /// Accept once the remaining distance is below this
    pub tolerance: f32,
    /// Give up once the step has been halved below this
    pub min_step: f32,
    /// Arc length ahead of the rider sampled for heading
    pub heading_lookahead: f32,
}

impl Default for RideParams {
    fn default() -> Self {
        Self {
            initial_step: 0.01,
            tolerance: 0.1,
            min_step: 1e-7,
            heading_lookahead: 5.0,
        }
    }
}

/// Built rail: control points, keyframes and lerp windows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rail {
    pub points: Vec<Vec3>,
    /// Parameter the rail loops back to; 1.0 for open rails
    pub loop_start: f32,
    /// Sorted by `t`
    pub keyframes: Vec<RailKeyframe>,
    pub lerps: Vec<LerpRange>,
    /// Parameters of camera cut markers
    pub camera_cuts: Vec<f32>,
}

const ARC_SAMPLES_PER_SEGMENT: usize = 16;

/// Bounds the search on degenerate rails whose points never move apart
const MAX_RIDE_ITERATIONS: usize = 100_000;

/// Look-ahead displacement below which travel has no direction
const HEADING_MIN_DISTANCE: f32 = 1e-6;

impl Rail {
    pub fn is_looping(&self) -> bool {
        self.loop_start < 1.0
    }

    fn tangent(&self, k: usize) -> Vec3 {
        let p = &self.points;
        let last = p.len() - 1;
        if k == 0 {
            (p[1] - p[0]) * 0.5
        } else if k == last {
            (p[last] - p[last - 1]) * 0.5
        } else {
            (p[k + 1] - p[k - 1]) * 0.5
        }
    }

    /// Fold a looping rail's parameter back into `[loop_start, 1]`
    fn wrap(&self, t: f32) -> f32 {
        if self.is_looping() && t > 1.0 {
            let span = 1.0 - self.loop_start;
            self.loop_start + (t - 1.0).rem_euclid(span)
        } else {
            t
        }
    }

    /// Position at parameter `t` using per-axis cubic Hermite interpolation
    pub fn position(&self, t: f32) -> Vec3 {
        match self.points.len() {
            0 => return Vec3::ZERO,
            1 => return self.points[0],
            _ => {}
        }
        let t = self.wrap(t).clamp(0.0, 1.0);
        let segments = self.points.len() - 1;
        let s = t * segments as f32;
        let i = (s.floor() as usize).min(segments - 1);
        let u = s - i as f32;

        let u2 = u * u;
        let u3 = u2 * u;
        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;

        self.points[i] * h00
            + self.tangent(i) * h10
            + self.points[i + 1] * h01
            + self.tangent(i + 1) * h11
    }

    /// Move `distance` arc-length units from `t` and return the new parameter
    ///
    /// Negative distances travel backwards. The search steps in parameter
    /// space, halving the step whenever it would overshoot.
    pub fn ride(&self, t: f32, distance: f32, params: &RideParams) -> f32 {
        if distance == 0.0 || self.points.len() < 2 {
            return t;
        }
        let dir = distance.signum();
        let target = distance.abs();
        let looping = self.is_looping();

        let mut current = t;
        let mut travelled = 0.0;
        let mut step = params.initial_step * dir;

        for _ in 0..MAX_RIDE_ITERATIONS {
            if target - travelled < params.tolerance {
                return current;
            }
            let at_end = !looping && dir > 0.0 && current >= 1.0;
            if at_end || (dir < 0.0 && current <= 0.0) {
                return current;
            }

            let (trial, covered) = self.trial_step(current, step, looping);
            if travelled + covered > target {
                step *= 0.5;
                if step.abs() < params.min_step {
                    break;
                }
                continue;
            }
            current = trial;
            travelled += covered;
        }
        tracing::debug!("rail ride from {} by {} did not converge", t, distance);
        current
    }

    /// Candidate parameter and the distance walked to reach it
    fn trial_step(&self, current: f32, step: f32, looping: bool) -> (f32, f32) {
        let trial = current + step;
        if !looping {
            let trial = trial.clamp(0.0, 1.0);
            return (trial, self.position(current).distance(self.position(trial)));
        }

        let here = self.position(current);
        if step > 0.0 && trial > 1.0 {
            // Across the seam: sum of component-wise absolute deltas on both sides
            let wrapped = self.loop_start + (trial - 1.0);
            let end = self.position(1.0);
            let seam = self.position(self.loop_start);
            let covered = ((end - here).abs() + (self.position(wrapped) - seam).abs()).length();
            (wrapped, covered)
        } else if step < 0.0 && current >= self.loop_start && trial < self.loop_start {
            let wrapped = 1.0 - (self.loop_start - trial);
            let end = self.position(1.0);
            let seam = self.position(self.loop_start);
            let covered = ((seam - here).abs() + (self.position(wrapped) - end).abs()).length();
            (wrapped, covered)
        } else {
            let trial = trial.max(0.0);
            (trial, here.distance(self.position(trial)))
        }
    }

    /// Yaw and pitch (radians) of travel at `t` in direction `dir`
    ///
    /// `None` where there is no rail ahead to look at, such as the end of an
    /// open rail.
    pub fn heading(&self, t: f32, dir: f32, params: &RideParams) -> Option<(f32, f32)> {
        let from = self.position(t);
        let ahead = self.ride(t, params.heading_lookahead * dir.signum(), params);
        let d = self.position(ahead) - from;
        if d.length_squared() < HEADING_MIN_DISTANCE * HEADING_MIN_DISTANCE {
            return None;
        }
        let yaw = d.x.atan2(d.z);
        let pitch = -d.y.atan2(d.x.hypot(d.z));
        Some((yaw, pitch))
    }

    /// Numerically integrated arc length between two parameters
    pub fn arc_length(&self, from: f32, to: f32) -> f32 {
        if self.points.len() < 2 || to <= from {
            return 0.0;
        }
        let segments = self.points.len() - 1;
        let samples = (((to - from) * (segments * ARC_SAMPLES_PER_SEGMENT) as f32).ceil() as usize).max(1);
        let mut length = 0.0;
        let mut prev = self.position(from);
        for i in 1..=samples {
            let p = self.position(from + (to - from) * i as f32 / samples as f32);
            length += prev.distance(p);
            prev = p;
        }
        length
    }
}
