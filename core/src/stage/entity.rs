//! Entities and the per-frame phase order

use std::fmt;

use super::PhaseContext;
use super::signal::{Signal, SignalContext};

/// Slot index of an entity on its [`super::Stage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One step of an entity's frame update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Advance the movement controller (rail rider, root motion)
    Movement,
    /// Advance the animation clock and sample the pose
    Animation,
    /// Compose bone-to-model matrices
    BoneMatrices,
    /// Resolve attached model points to world space
    ModelPoints,
    /// Update selector state (blinks, scripted visibility)
    Selectors,
    /// Walk the render graph into the draw sink
    Traversal,
}

impl FramePhase {
    /// Order in which every entity runs its phases
    pub const ORDER: [FramePhase; 6] = [
        FramePhase::Movement,
        FramePhase::Animation,
        FramePhase::BoneMatrices,
        FramePhase::ModelPoints,
        FramePhase::Selectors,
        FramePhase::Traversal,
    ];
}

/// Something the stage updates once per frame
///
/// While an entity runs a phase or handles a signal it is out of its slot, so
/// signals addressed to it fail with [`super::SignalError::Reentrant`].
pub trait Entity {
    fn update_phase(&mut self, phase: FramePhase, ctx: &mut PhaseContext<'_>) -> anyhow::Result<()>;

    /// Handle a signal sent by another entity (`from`) or by the host (`None`)
    ///
    /// Runs to completion before the sender's `send` returns.
    fn handle_signal(
        &mut self,
        _from: Option<EntityId>,
        _signal: &Signal,
        _ctx: &mut SignalContext<'_>,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}
