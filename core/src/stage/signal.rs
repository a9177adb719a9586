//! Synchronous cross-entity signals
//!
//! [`SignalContext::send`] is a direct call: the target's handler has returned
//! by the time `send` does. Entities that are mid-update or mid-handler are
//! out of their slots, which is how reentrant delivery is detected.

use anyhow::Context;

use super::entity::{Entity, EntityId};

/// Message delivered to [`Entity::handle_signal`]
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// Write a selector state value
    SetSelector { index: u32, value: i32 },
    /// Switch to the animation at this index
    PlayAnimation(usize),
    /// Jump the current animation to a fraction of its duration
    SetPhase(f32),
    Activate,
    Deactivate,
    /// Application-defined trigger
    User(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    #[error("no entity {0}")]
    UnknownEntity(EntityId),
    #[error("entity {0} is already updating or handling a signal")]
    Reentrant(EntityId),
}

pub(crate) enum Slot {
    Vacant,
    /// Taken out for an update or a signal handler
    Busy,
    Occupied(Box<dyn Entity>),
}

/// Dispatch handle passed to entities
pub struct SignalContext<'a> {
    slots: &'a mut Vec<Slot>,
    current: Option<EntityId>,
}

impl<'a> SignalContext<'a> {
    pub(crate) fn new(slots: &'a mut Vec<Slot>, current: Option<EntityId>) -> Self {
        Self { slots, current }
    }

    /// Entity on whose behalf signals are sent, `None` for the host
    pub fn current(&self) -> Option<EntityId> {
        self.current
    }

    /// Deliver `signal` to `target` and wait for its handler
    ///
    /// Dispatch failures are [`SignalError`]s; a failing handler's error is
    /// returned with the target attached as context.
    pub fn send(&mut self, target: EntityId, signal: Signal) -> anyhow::Result<()> {
        let index = target.0 as usize;
        let Some(slot) = self.slots.get_mut(index) else {
            return Err(SignalError::UnknownEntity(target).into());
        };
        let mut entity = match std::mem::replace(slot, Slot::Busy) {
            Slot::Occupied(entity) => entity,
            Slot::Busy => return Err(SignalError::Reentrant(target).into()),
            Slot::Vacant => {
                *slot = Slot::Vacant;
                return Err(SignalError::UnknownEntity(target).into());
            }
        };

        tracing::trace!(?signal, from = ?self.current, to = %target, "signal");
        let from = self.current;
        let result = {
            let mut nested = SignalContext::new(self.slots, Some(target));
            entity.handle_signal(from, &signal, &mut nested)
        };
        self.slots[index] = Slot::Occupied(entity);
        result.with_context(|| format!("entity {target} failed to handle {signal:?}"))
    }
}
