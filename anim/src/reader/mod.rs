//! Time-advancing animation readers
//!
//! A reader owns a clock over one animation source. [`AnimReader::advance_view`]
//! moves the clock and reports how the root segment moved, which blend trees
//! accumulate into character motion.
//!
//! | Variant        | Source                   | Rotation delta        |
//! |----------------|--------------------------|-----------------------|
//! | `Uncompressed` | [`AnimSource`]           | `next · conj(prior)`  |
//! | `Compressed`   | [`AnimSourceCompressed`] | `conj(prior) · next`  |
//! | `Blend`        | two readers + weight     | slerp of both         |
//!
//! The two source readers compose rotation deltas in opposite orders; both
//! orders are kept as they are relied on by the data each format was
//! authored against.

mod blend;
mod compressed;
mod uncompressed;


pub use blend::BlendReader;
pub use compressed::AnimSourceReaderCompressed;
pub use uncompressed::AnimSourceReader;

use std::sync::Arc;

use retroview_shared::CharAnimTime;

use crate::compressed::AnimSourceCompressed;
use crate::deltas::{AdvancementResults, PerSegmentData, SteadyStateAnimInfo};
use crate::error::AnimError;
use crate::source::AnimSource;

/// Segment whose motion is reported by [`AnimReader::advance_view`] unless a source overrides it
pub const ROOT_SEGMENT: u8 = 3;

/// Indices of the next unfired event of each kind
///
/// Event firing itself is handled by the consumer; readers only rewind the
/// cursors when their clock returns to the start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoiCursor {
    pub bool_index: usize,
    pub int32_index: usize,
    pub particle_index: usize,
    pub sound_index: usize,
}

impl PoiCursor {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Outcome of moving a reader clock
pub(crate) enum ClockStep {
    /// The clock was at or past the end; it restarted and consumed nothing
    Restarted,
    /// Zero-length step
    Idle,
    /// The clock moved from `prior`; `overflow` is the part beyond the end
    Advanced {
        prior: CharAnimTime,
        overflow: CharAnimTime,
    },
}

/// Shared clock logic of the source readers
pub(crate) fn step_clock(
    time: &mut CharAnimTime,
    duration: CharAnimTime,
    poi: &mut PoiCursor,
    dt: CharAnimTime,
) -> ClockStep {
    if *time >= duration {
        *time = CharAnimTime::ZERO;
        poi.reset();
        return ClockStep::Restarted;
    }
    if dt.equals_zero() {
        return ClockStep::Idle;
    }

    let prior = *time;
    *time += dt;
    let mut overflow = CharAnimTime::ZERO;
    if *time > duration {
        overflow = *time - duration;
        *time = duration;
    }
    ClockStep::Advanced { prior, overflow }
}

/// Jump a reader clock to a fraction of its duration
pub(crate) fn phase_clock(
    time: &mut CharAnimTime,
    duration: CharAnimTime,
    poi: &mut PoiCursor,
    fraction: f32,
) {
    *time = duration * fraction;
    if !time.greater_than_zero() {
        poi.reset();
    }
}

/// Any animation reader
#[derive(Debug, Clone)]
pub enum AnimReader {
    Uncompressed(AnimSourceReader),
    Compressed(AnimSourceReaderCompressed),
    Blend(BlendReader),
}

impl AnimReader {
    /// Advance the clock by `dt` and return the unconsumed time and root deltas
    pub fn advance_view(&mut self, dt: CharAnimTime) -> AdvancementResults {
        match self {
            AnimReader::Uncompressed(r) => r.advance_view(dt),
            AnimReader::Compressed(r) => r.advance_view(dt),
            AnimReader::Blend(r) => r.advance_view(dt),
        }
    }

    pub fn time_remaining(&self) -> CharAnimTime {
        match self {
            AnimReader::Uncompressed(r) => r.time_remaining(),
            AnimReader::Compressed(r) => r.time_remaining(),
            AnimReader::Blend(r) => r.time_remaining(),
        }
    }

    pub fn steady_state_info(&mut self) -> SteadyStateAnimInfo {
        match self {
            AnimReader::Uncompressed(r) => r.steady_state_info(),
            AnimReader::Compressed(r) => r.steady_state_info(),
            AnimReader::Blend(r) => r.steady_state_info(),
        }
    }

    /// Sample the given segments at the current time
    pub fn per_segment_data(&mut self, segments: &[u8]) -> Vec<PerSegmentData> {
        match self {
            AnimReader::Uncompressed(r) => r.per_segment_data(segments),
            AnimReader::Compressed(r) => r.per_segment_data(segments),
            AnimReader::Blend(r) => r.per_segment_data(segments),
        }
    }

    /// Jump to `fraction` of the duration
    pub fn set_phase(&mut self, fraction: f32) {
        match self {
            AnimReader::Uncompressed(r) => r.set_phase(fraction),
            AnimReader::Compressed(r) => r.set_phase(fraction),
            AnimReader::Blend(r) => r.set_phase(fraction),
        }
    }
}

/// Animation data of either storage kind
#[derive(Debug, Clone)]
pub enum AnimData {
    Uncompressed(Arc<AnimSource>),
    Compressed(Arc<AnimSourceCompressed>),
}

impl AnimData {
    /// Fresh reader positioned at time zero
    pub fn reader(&self) -> AnimReader {
        match self {
            AnimData::Uncompressed(s) => AnimReader::Uncompressed(AnimSourceReader::new(s.clone())),
            AnimData::Compressed(s) => {
                AnimReader::Compressed(AnimSourceReaderCompressed::new(s.clone()))
            }
        }
    }
}

/// Animations of one character, addressed by index
#[derive(Debug, Clone, Default)]
pub struct AnimSet {
    animations: Vec<Option<AnimData>>,
}

impl AnimSet {
    pub fn new(animations: Vec<Option<AnimData>>) -> Self {
        Self { animations }
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&AnimData, AnimError> {
        self.animations
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(AnimError::MissingAnimation {
                index,
                available: self.animations.len(),
            })
    }

    pub fn reader(&self, index: usize) -> Result<AnimReader, AnimError> {
        Ok(self.get(index)?.reader())
    }
}
