//! Eye blink controller
//!
//! Drives a selector whose children are eye frames: child 0 is fully open,
//! child `max_eye - 1` fully closed. The selector value is the 1-based eye
//! frame, so it can be written straight into [`SelectorState`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::selector::SelectorState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkParams {
    /// Frames per second the controller steps at
    pub frame_rate: f32,
    /// Per-frame probability of starting a blink while open
    pub close_chance: f32,
    /// Number of eye frames
    pub max_eye: i32,
    pub seed: u64,
}

impl Default for BlinkParams {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            close_chance: 0.02,
            max_eye: 4,
            seed: 0x5EED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlinkPhase {
    #[default]
    Open,
    Closing,
    Opening,
}

#[derive(Debug, Clone)]
pub struct Blink {
    state_index: u32,
    phase: BlinkPhase,
    eye: i32,
    last_frame: Option<i64>,
    frame_rate: f32,
    close_chance: f32,
    max_eye: i32,
    rng: Pcg32,
}

impl Blink {
    pub fn new(state_index: u32, params: &BlinkParams) -> Self {
        Self {
            state_index,
            phase: BlinkPhase::Open,
            eye: 1,
            last_frame: None,
            frame_rate: params.frame_rate,
            close_chance: params.close_chance,
            max_eye: params.max_eye.max(1),
            rng: Pcg32::seed_from_u64(params.seed),
        }
    }

    pub fn phase(&self) -> BlinkPhase {
        self.phase
    }

    pub fn eye(&self) -> i32 {
        self.eye
    }

    pub fn state_index(&self) -> u32 {
        self.state_index
    }

    /// Step once per whole frame number of `time` and publish the eye frame
    ///
    /// Returns whether a step happened. Repeated calls within one frame, or
    /// with time going backwards to an already seen frame, are ignored.
    pub fn update(&mut self, time: f32, selectors: &mut SelectorState) -> bool {
        let frame = (time * self.frame_rate).floor() as i64;
        if self.last_frame.is_some_and(|last| frame <= last) {
            return false;
        }
        self.last_frame = Some(frame);

        match self.phase {
            BlinkPhase::Open => {
                if self.rng.random::<f32>() < self.close_chance {
                    self.phase = BlinkPhase::Closing;
                }
            }
            BlinkPhase::Closing => {
                self.eye += 1;
                if self.eye >= self.max_eye {
                    self.eye = self.max_eye;
                    self.phase = BlinkPhase::Opening;
                }
            }
            BlinkPhase::Opening => {
                self.eye -= 1;
                if self.eye <= 1 {
                    self.eye = 1;
                    self.phase = BlinkPhase::Open;
                }
            }
        }

        selectors.set(self.state_index, self.eye);
        true
    }
}
