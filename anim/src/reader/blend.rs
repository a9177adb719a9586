use retroview_shared::CharAnimTime;

use super::AnimReader;
use crate::deltas::{AdvancementDeltas, AdvancementResults, PerSegmentData, SteadyStateAnimInfo};

/// Weighted blend of two readers advancing in lockstep
///
/// `weight` 0 yields `a`, 1 yields `b`.
#[derive(Debug, Clone)]
pub struct BlendReader {
    a: Box<AnimReader>,
    b: Box<AnimReader>,
    weight: f32,
}

impl BlendReader {
    pub fn new(a: AnimReader, b: AnimReader, weight: f32) -> Self {
        Self {
            a: Box::new(a),
            b: Box::new(b),
            weight: weight.clamp(0.0, 1.0),
        }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight.clamp(0.0, 1.0);
    }

    /// Both children advance by `dt`; the blend keeps the smaller leftover
    pub fn advance_view(&mut self, dt: CharAnimTime) -> AdvancementResults {
        let ra = self.a.advance_view(dt);
        let rb = self.b.advance_view(dt);
        let remaining = if ra.remaining < rb.remaining {
            ra.remaining
        } else {
            rb.remaining
        };
        AdvancementResults {
            remaining,
            deltas: AdvancementDeltas::blend(&ra.deltas, &rb.deltas, self.weight),
        }
    }

    /// The blend runs until its longer child finishes
    pub fn time_remaining(&self) -> CharAnimTime {
        let ta = self.a.time_remaining();
        let tb = self.b.time_remaining();
        if ta > tb { ta } else { tb }
    }

    pub fn steady_state_info(&mut self) -> SteadyStateAnimInfo {
        let ia = self.a.steady_state_info();
        let ib = self.b.steady_state_info();
        SteadyStateAnimInfo {
            duration: if ia.duration > ib.duration {
                ia.duration
            } else {
                ib.duration
            },
            root_offset: ia.root_offset.lerp(ib.root_offset, self.weight),
            looping: ia.looping && ib.looping,
        }
    }

    pub fn per_segment_data(&mut self, segments: &[u8]) -> Vec<PerSegmentData> {
        let da = self.a.per_segment_data(segments);
        let db = self.b.per_segment_data(segments);
        da.iter()
            .zip(&db)
            .map(|(x, y)| PerSegmentData::blend(x, y, self.weight))
            .collect()
    }

    pub fn set_phase(&mut self, fraction: f32) {
        self.a.set_phase(fraction);
        self.b.set_phase(fraction);
    }
}
