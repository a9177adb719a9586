use std::sync::Arc;

use glam::{Quat, Vec3};
use retroview_shared::CharAnimTime;

use super::{ClockStep, PoiCursor, phase_clock, step_clock};
use crate::deltas::{AdvancementDeltas, AdvancementResults, PerSegmentData, SteadyStateAnimInfo};
use crate::source::AnimSource;

/// Reader over a dense [`AnimSource`]
#[derive(Debug, Clone)]
pub struct AnimSourceReader {
    source: Arc<AnimSource>,
    time: CharAnimTime,
    poi: PoiCursor,
}

impl AnimSourceReader {
    pub fn new(source: Arc<AnimSource>) -> Self {
        Self {
            source,
            time: CharAnimTime::ZERO,
            poi: PoiCursor::default(),
        }
    }

    pub fn source(&self) -> &AnimSource {
        &self.source
    }

    pub fn current_time(&self) -> CharAnimTime {
        self.time
    }

    pub fn poi(&self) -> &PoiCursor {
        &self.poi
    }

    pub fn poi_mut(&mut self) -> &mut PoiCursor {
        &mut self.poi
    }

    fn root_transform(&self, time: CharAnimTime) -> (Quat, Vec3, Vec3) {
        let seg = self.source.root_segment();
        (
            self.source.rotation(seg, time),
            self.source.translation(seg, time),
            self.source.scale(seg, time),
        )
    }

    pub fn advance_view(&mut self, dt: CharAnimTime) -> AdvancementResults {
        let duration = self.source.duration();
        match step_clock(&mut self.time, duration, &mut self.poi, dt) {
            ClockStep::Restarted => AdvancementResults::idle(dt),
            ClockStep::Idle => AdvancementResults::idle(CharAnimTime::ZERO),
            ClockStep::Advanced { prior, overflow } => {
                let (ra, ta, sa) = self.root_transform(prior);
                let (rb, tb, sb) = self.root_transform(self.time);
                AdvancementResults {
                    remaining: overflow,
                    deltas: AdvancementDeltas {
                        translation: rb.conjugate() * (tb - ta),
                        rotation: rb * ra.conjugate(),
                        scale: sb - sa,
                    },
                }
            }
        }
    }

    pub fn time_remaining(&self) -> CharAnimTime {
        self.source.duration() - self.time
    }

    pub fn steady_state_info(&self) -> SteadyStateAnimInfo {
        let seg = self.source.root_segment();
        let duration = self.source.duration();
        SteadyStateAnimInfo {
            duration,
            root_offset: self.source.translation(seg, duration)
                - self.source.translation(seg, CharAnimTime::ZERO),
            looping: self.source.looping(),
        }
    }

    pub fn per_segment_data(&self, segments: &[u8]) -> Vec<PerSegmentData> {
        segments
            .iter()
            .map(|&seg| PerSegmentData {
                rotation: self
                    .source
                    .has_rotation(seg)
                    .then(|| self.source.rotation(seg, self.time)),
                translation: self
                    .source
                    .has_translation(seg)
                    .then(|| self.source.translation(seg, self.time)),
                scale: self
                    .source
                    .has_scale(seg)
                    .then(|| self.source.scale(seg, self.time)),
            })
            .collect()
    }

    pub fn set_phase(&mut self, fraction: f32) {
        phase_clock(&mut self.time, self.source.duration(), &mut self.poi, fraction);
    }
}
