use std::sync::Arc;

use glam::{Quat, Vec3};
use retroview_shared::CharAnimTime;

use super::{ClockStep, PoiCursor, phase_clock, step_clock};
use crate::compressed::{AnimSourceCompressed, StreamedPairOfTotals};
use crate::deltas::{AdvancementDeltas, AdvancementResults, PerSegmentData, SteadyStateAnimInfo};

/// Reader over an [`AnimSourceCompressed`]
///
/// Keeps the stream decode state between queries so that forward playback
/// decodes each key once.
#[derive(Debug, Clone)]
pub struct AnimSourceReaderCompressed {
    source: Arc<AnimSourceCompressed>,
    totals: StreamedPairOfTotals,
    time: CharAnimTime,
    poi: PoiCursor,
}

impl AnimSourceReaderCompressed {
    pub fn new(source: Arc<AnimSourceCompressed>) -> Self {
        let totals = StreamedPairOfTotals::new(&source);
        Self {
            source,
            totals,
            time: CharAnimTime::ZERO,
            poi: PoiCursor::default(),
        }
    }

    pub fn source(&self) -> &AnimSourceCompressed {
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

    fn sample(&mut self, segment: u8, time: CharAnimTime) -> PerSegmentData {
        let Some(bone) = self.source.bone_index(segment) else {
            return PerSegmentData::default();
        };
        let f = self.totals.seek_to_time(&self.source, time);
        PerSegmentData {
            rotation: self.totals.rotation(&self.source, bone, f),
            translation: self.totals.translation(&self.source, bone, f),
            scale: self.totals.scale(&self.source, bone, f),
        }
    }

    fn root_transform(&mut self, time: CharAnimTime) -> (Quat, Vec3, Vec3) {
        let s = self.sample(self.source.header().root_segment, time);
        (
            s.rotation.unwrap_or(Quat::IDENTITY),
            s.translation.unwrap_or(Vec3::ZERO),
            s.scale.unwrap_or(Vec3::ZERO),
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
                        rotation: ra.conjugate() * rb,
                        scale: sb - sa,
                    },
                }
            }
        }
    }

    pub fn time_remaining(&self) -> CharAnimTime {
        self.source.duration() - self.time
    }

    pub fn steady_state_info(&mut self) -> SteadyStateAnimInfo {
        let duration = self.source.duration();
        let (_, start, _) = self.root_transform(CharAnimTime::ZERO);
        let (_, end, _) = self.root_transform(duration);
        // Leave the decoder where playback expects it
        self.totals.seek_to_time(&self.source, self.time);
        SteadyStateAnimInfo {
            duration,
            root_offset: end - start,
            looping: self.source.header().looping,
        }
    }

    pub fn per_segment_data(&mut self, segments: &[u8]) -> Vec<PerSegmentData> {
        let time = self.time;
        segments.iter().map(|&seg| self.sample(seg, time)).collect()
    }

    pub fn set_phase(&mut self, fraction: f32) {
        phase_clock(&mut self.time, self.source.duration(), &mut self.poi, fraction);
    }
}
