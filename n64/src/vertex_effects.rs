//! Per-frame vertex animation effects
//!
//! Effects never accumulate: every frame the output buffer is rebuilt from
//! the pristine base vertices, then each effect rewrites its own range.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::{Vec2, Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Vertex layout the effects operate on
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EffectVertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub color: Vec4,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexEffectKind {
    /// Scroll V by `speed` texture repeats per second
    FlowingWater { speed: f32 },
    /// Bob every vertex in Y together
    StillWater { amplitude: f32, frequency: f32 },
    /// Bob in Y with a phase that travels across X/Z
    RipplingWater {
        amplitude: f32,
        frequency: f32,
        wavelength: f32,
    },
    /// Random shade intensity each frame
    ColorFlicker { min: f32, max: f32 },
    /// Sine shade intensity
    ColorPulse { period: f32, min: f32, max: f32 },
    /// Alpha on for one period, off for the next
    AlphaBlink { period: f32 },
}

#[derive(Debug, Clone)]
pub struct VertexEffect {
    pub kind: VertexEffectKind,
    /// Vertex indices the effect owns
    pub range: Range<usize>,
    rng: Pcg32,
}

impl VertexEffect {
    pub fn new(kind: VertexEffectKind, range: Range<usize>, seed: u64) -> Self {
        Self {
            kind,
            range,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Rewrite `out[range]` from `base[range]` at `time` seconds
    pub fn apply(&mut self, base: &[EffectVertex], out: &mut [EffectVertex], time: f32) {
        let end = self.range.end.min(base.len()).min(out.len());
        let start = self.range.start.min(end);
        let base = &base[start..end];
        let out = &mut out[start..end];

        match self.kind {
            VertexEffectKind::FlowingWater { speed } => {
                let offset = (speed * time).rem_euclid(1.0);
                for (o, b) in out.iter_mut().zip(base) {
                    o.uv.y = b.uv.y + offset;
                }
            }
            VertexEffectKind::StillWater {
                amplitude,
                frequency,
            } => {
                let dy = amplitude * (TAU * frequency * time).sin();
                for (o, b) in out.iter_mut().zip(base) {
                    o.position.y = b.position.y + dy;
                }
            }
            VertexEffectKind::RipplingWater {
                amplitude,
                frequency,
                wavelength,
            } => {
                let wavelength = if wavelength == 0.0 { 1.0 } else { wavelength };
                for (o, b) in out.iter_mut().zip(base) {
                    let phase = frequency * time + (b.position.x + b.position.z) / wavelength;
                    o.position.y = b.position.y + amplitude * (TAU * phase).sin();
                }
            }
            VertexEffectKind::ColorFlicker { min, max } => {
                let intensity = if max > min {
                    self.rng.random_range(min..max)
                } else {
                    min
                };
                scale_rgb(base, out, intensity);
            }
            VertexEffectKind::ColorPulse { period, min, max } => {
                let wave = if period > 0.0 {
                    0.5 + 0.5 * (TAU * time / period).sin()
                } else {
                    1.0
                };
                scale_rgb(base, out, min + (max - min) * wave);
            }
            VertexEffectKind::AlphaBlink { period } => {
                let visible = period <= 0.0 || (time / period).floor().rem_euclid(2.0) < 1.0;
                for (o, b) in out.iter_mut().zip(base) {
                    o.color.w = if visible { b.color.w } else { 0.0 };
                }
            }
        }
    }
}

fn scale_rgb(base: &[EffectVertex], out: &mut [EffectVertex], intensity: f32) {
    for (o, b) in out.iter_mut().zip(base) {
        let rgb = (b.color.truncate() * intensity).clamp(Vec3::ZERO, Vec3::ONE);
        o.color = rgb.extend(b.color.w);
    }
}

/// All effects of one mesh
#[derive(Debug, Clone, Default)]
pub struct VertexEffectSet {
    effects: Vec<VertexEffect>,
}

impl VertexEffectSet {
    pub fn new(effects: Vec<VertexEffect>) -> Self {
        Self { effects }
    }

    pub fn push(&mut self, effect: VertexEffect) {
        self.effects.push(effect);
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Reset `out` to `base`, then apply every effect in order
    ///
    /// `out` is resized to match `base`.
    pub fn apply(&mut self, base: &[EffectVertex], out: &mut Vec<EffectVertex>, time: f32) {
        out.clear();
        out.extend_from_slice(base);
        for effect in &mut self.effects {
            effect.apply(base, out, time);
        }
    }
}
