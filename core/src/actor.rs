//! Skinned, optionally rail-driven model
//!
//! [`AnimatedActor`] is the stock [`Entity`]: it moves along its rail, samples
//! its animation, composes bone matrices, resolves model points, steps its
//! blink controllers and walks its GeoNode tree.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use retroview_anim::{
    AdvancementDeltas, AnimParams, AnimReader, AnimSet, AnimationSet, FrameMode, PerSegmentData,
    Skeleton, build_pose_matrices,
};
use retroview_n64::{Blink, BlinkParams, GeoNode, SelectorState, walk};
use retroview_rail::{Rail, RailRider, RideParams};
use retroview_shared::{AffineMatrix3x4, CharAnimTime};

use crate::model_point::ModelPoint;
use crate::stage::{Entity, EntityId, FramePhase, PhaseContext, Signal, SignalContext};

/// Where an actor's pose comes from
#[derive(Debug, Clone)]
pub enum PoseSource {
    /// Frame-indexed sources sampled through a reader
    Reader {
        set: Arc<AnimSet>,
        current: usize,
        reader: AnimReader,
    },
    /// Keyframe tracks sampled by frame number
    Bones {
        set: Arc<AnimationSet>,
        current: usize,
        mode: FrameMode,
        params: AnimParams,
        frame: f32,
    },
}

impl PoseSource {
    /// Start animation `index` of `set` from its beginning
    pub fn reader(set: Arc<AnimSet>, index: usize) -> anyhow::Result<Self> {
        let reader = set.reader(index)?;
        Ok(PoseSource::Reader {
            set,
            current: index,
            reader,
        })
    }

    pub fn bones(
        set: Arc<AnimationSet>,
        index: usize,
        mode: FrameMode,
        params: AnimParams,
    ) -> anyhow::Result<Self> {
        let frame = set.get(index)?.start_frame;
        Ok(PoseSource::Bones {
            set,
            current: index,
            mode,
            params,
            frame,
        })
    }

    pub fn current(&self) -> usize {
        match self {
            PoseSource::Reader { current, .. } | PoseSource::Bones { current, .. } => *current,
        }
    }

    /// Switch animations; replaying the current one restarts it
    pub fn play(&mut self, index: usize) -> anyhow::Result<()> {
        match self {
            PoseSource::Reader {
                set,
                current,
                reader,
            } => {
                *reader = set.reader(index)?;
                *current = index;
            }
            PoseSource::Bones {
                set, current, frame, ..
            } => {
                *frame = set.get(index)?.start_frame;
                *current = index;
            }
        }
        Ok(())
    }

    /// Jump to `fraction` of the current animation
    pub fn set_phase(&mut self, fraction: f32) -> anyhow::Result<()> {
        match self {
            PoseSource::Reader { reader, .. } => reader.set_phase(fraction),
            PoseSource::Bones {
                set,
                current,
                frame,
                ..
            } => {
                let animator = set.get(*current)?;
                *frame = animator.start_frame + animator.frame_span() * fraction;
            }
        }
        Ok(())
    }
}

/// Rail an actor rides
#[derive(Debug, Clone)]
pub struct RailBinding {
    pub rail: Arc<Rail>,
    pub rider: RailRider,
    pub params: RideParams,
}

impl RailBinding {
    pub fn new(rail: Arc<Rail>, t: f32, speed: f32, params: RideParams) -> Self {
        let rider = RailRider::new(&rail, t, speed);
        Self {
            rail,
            rider,
            params,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnimatedActor {
    skeleton: Arc<Skeleton>,
    geo: Arc<GeoNode>,
    pose: PoseSource,
    rail: Option<RailBinding>,
    /// Apply reader root deltas to the model matrix when not on a rail
    root_motion: bool,
    model: Mat4,
    /// Segment IDs to sample, in skeleton order
    segments: Vec<u8>,
    per_segment: Vec<PerSegmentData>,
    deltas: AdvancementDeltas,
    bones: Vec<Mat4>,
    points: Vec<ModelPoint>,
    point_positions: Vec<Vec3>,
    selectors: SelectorState,
    blinks: Vec<Blink>,
    active: bool,
}

impl AnimatedActor {
    pub fn new(skeleton: Arc<Skeleton>, geo: Arc<GeoNode>, pose: PoseSource) -> Self {
        let segments = skeleton.bones.iter().map(|b| b.id).collect();
        Self {
            skeleton,
            geo,
            pose,
            rail: None,
            root_motion: false,
            model: Mat4::IDENTITY,
            segments,
            per_segment: Vec::new(),
            deltas: AdvancementDeltas::ZERO,
            bones: Vec::new(),
            points: Vec::new(),
            point_positions: Vec::new(),
            selectors: SelectorState::new(),
            blinks: Vec::new(),
            active: true,
        }
    }

    pub fn with_rail(mut self, rail: RailBinding) -> Self {
        self.model = rail.rider.model_matrix();
        self.rail = Some(rail);
        self
    }

    pub fn with_model(mut self, model: Mat4) -> Self {
        self.model = model;
        self
    }

    pub fn with_root_motion(mut self, enabled: bool) -> Self {
        self.root_motion = enabled;
        self
    }

    pub fn with_model_points(mut self, points: Vec<ModelPoint>) -> Self {
        self.points = points;
        self
    }

    /// Drive selector `state_index` with an eye blink
    pub fn with_blink(mut self, state_index: u32, params: &BlinkParams) -> Self {
        self.blinks.push(Blink::new(state_index, params));
        self
    }

    pub fn model(&self) -> &Mat4 {
        &self.model
    }

    pub fn bones(&self) -> &[Mat4] {
        &self.bones
    }

    /// World-space bone matrices in 3x4 upload form
    pub fn pack_bone_palette(&self, out: &mut Vec<AffineMatrix3x4>) {
        out.clear();
        out.extend(
            self.bones
                .iter()
                .map(|bone| AffineMatrix3x4::from_mat4(&(self.model * *bone))),
        );
    }

    /// World positions of the model points as of the last frame
    pub fn point_positions(&self) -> &[Vec3] {
        &self.point_positions
    }

    pub fn selectors(&self) -> &SelectorState {
        &self.selectors
    }

    pub fn selectors_mut(&mut self) -> &mut SelectorState {
        &mut self.selectors
    }

    pub fn pose(&self) -> &PoseSource {
        &self.pose
    }

    pub fn rail(&self) -> Option<&RailBinding> {
        self.rail.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn movement(&mut self, dt: f32) -> anyhow::Result<()> {
        let Some(binding) = &mut self.rail else {
            return Ok(());
        };
        let before = binding.rider.anim_mode();
        let passed = binding.rider.update(&binding.rail, dt, &binding.params);
        self.model = binding.rider.model_matrix();

        if !passed.is_empty() {
            tracing::trace!("rider passed keyframes {:?}", passed);
        }
        if let Some(mode) = binding.rider.anim_mode().filter(|&m| Some(m) != before) {
            self.pose.play(mode as usize)?;
        }
        Ok(())
    }

    fn animation(&mut self, dt: f32) -> anyhow::Result<()> {
        self.deltas = AdvancementDeltas::ZERO;
        match &mut self.pose {
            PoseSource::Reader { reader, .. } => {
                self.deltas = advance_reader(reader, CharAnimTime::from_seconds(dt));
                self.per_segment = reader.per_segment_data(&self.segments);
            }
            PoseSource::Bones {
                set,
                current,
                mode,
                params,
                frame,
            } => {
                *frame += dt * params.frame_rate;
                if *mode != FrameMode::None {
                    *frame = set.get(*current)?.map_frame(*frame, *mode);
                }
            }
        }

        if self.root_motion && self.rail.is_none() {
            self.model *= Mat4::from_rotation_translation(self.deltas.rotation, self.deltas.translation);
        }
        Ok(())
    }

    fn bone_matrices(&mut self) -> anyhow::Result<()> {
        match &self.pose {
            PoseSource::Reader { .. } => {
                build_pose_matrices(&self.skeleton, &self.per_segment, &mut self.bones)
            }
            PoseSource::Bones {
                set,
                current,
                mode,
                params,
                frame,
            } => set
                .get(*current)?
                .calc_bone_matrices(&self.skeleton, *frame, *mode, params, &mut self.bones),
        }
        Ok(())
    }
}

/// Upper bound on reader steps per frame; each clip wrap takes two
const MAX_ADVANCE_STEPS: usize = 16;

/// Feed `dt` to `reader` until it is consumed, composing the root deltas
///
/// Looping clips wrap and carry their overflow into the next pass. Other
/// clips hold at their last frame.
fn advance_reader(reader: &mut AnimReader, dt: CharAnimTime) -> AdvancementDeltas {
    let mut total = AdvancementDeltas::ZERO;
    let mut left = dt;
    for _ in 0..MAX_ADVANCE_STEPS {
        if left.epsilon_zero() {
            break;
        }
        if reader.time_remaining().epsilon_zero() && !reader.steady_state_info().looping {
            break;
        }
        let step = reader.advance_view(left);
        total = AdvancementDeltas {
            translation: total.translation + total.rotation * step.deltas.translation,
            rotation: total.rotation * step.deltas.rotation,
            scale: total.scale + step.deltas.scale,
        };
        left = step.remaining;
    }
    total
}

impl Entity for AnimatedActor {
    fn update_phase(&mut self, phase: FramePhase, ctx: &mut PhaseContext<'_>) -> anyhow::Result<()> {
        match phase {
            FramePhase::Movement => self.movement(ctx.dt)?,
            FramePhase::Animation => self.animation(ctx.dt)?,
            FramePhase::BoneMatrices => self.bone_matrices()?,
            FramePhase::ModelPoints => {
                self.point_positions.clear();
                self.point_positions
                    .extend(self.points.iter().map(|p| p.world_position(&self.bones, &self.model)));
            }
            FramePhase::Selectors => {
                for blink in &mut self.blinks {
                    blink.update(ctx.time, &mut self.selectors);
                }
            }
            FramePhase::Traversal => {
                if self.active {
                    walk(&self.geo, &self.bones, &self.model, &self.selectors, &mut *ctx.sink);
                }
            }
        }
        Ok(())
    }

    fn handle_signal(
        &mut self,
        from: Option<EntityId>,
        signal: &Signal,
        _ctx: &mut SignalContext<'_>,
    ) -> anyhow::Result<()> {
        tracing::debug!("actor got {:?} from {:?}", signal, from);
        match *signal {
            Signal::SetSelector { index, value } => self.selectors.set(index, value),
            Signal::PlayAnimation(index) => self.pose.play(index)?,
            Signal::SetPhase(fraction) => self.pose.set_phase(fraction)?,
            Signal::Activate => self.active = true,
            Signal::Deactivate => self.active = false,
            Signal::User(_) => {}
        }
        Ok(())
    }
}
