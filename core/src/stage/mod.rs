//! Frame stage
//!
//! The stage owns every entity and drives one frame at a time. Entities are
//! updated in slot order; each runs all of [`FramePhase::ORDER`] before the
//! next starts. Everything happens on the calling thread.

mod entity;
mod signal;

pub use entity::{Entity, EntityId, FramePhase};
pub use signal::{Signal, SignalContext, SignalError};

use anyhow::Context;
use retroview_n64::DrawSink;

use signal::Slot;

/// Per-phase inputs of an entity update
pub struct PhaseContext<'a> {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Seconds since the stage started
    pub time: f32,
    pub signals: SignalContext<'a>,
    pub sink: &'a mut dyn DrawSink,
}

#[derive(Default)]
pub struct Stage {
    slots: Vec<Slot>,
    len: usize,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, reusing the first vacant slot
    pub fn spawn(&mut self, entity: Box<dyn Entity>) -> EntityId {
        self.len += 1;
        if let Some(index) = self.slots.iter().position(|s| matches!(s, Slot::Vacant)) {
            self.slots[index] = Slot::Occupied(entity);
            return EntityId(index as u32);
        }
        self.slots.push(Slot::Occupied(entity));
        EntityId((self.slots.len() - 1) as u32)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        let slot = self.slots.get_mut(id.0 as usize)?;
        match std::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(entity) => {
                self.len -= 1;
                Some(entity)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, id: EntityId) -> bool {
        matches!(self.slots.get(id.0 as usize), Some(Slot::Occupied(_)))
    }

    /// Send a signal from the host
    pub fn send(&mut self, target: EntityId, signal: Signal) -> anyhow::Result<()> {
        SignalContext::new(&mut self.slots, None).send(target, signal)
    }

    /// Update every entity once
    ///
    /// The first failing phase aborts the frame; the failing entity is put
    /// back before the error is returned.
    pub fn run_frame(&mut self, dt: f32, time: f32, sink: &mut dyn DrawSink) -> anyhow::Result<()> {
        for index in 0..self.slots.len() {
            let mut entity = match std::mem::replace(&mut self.slots[index], Slot::Busy) {
                Slot::Occupied(entity) => entity,
                other => {
                    self.slots[index] = other;
                    continue;
                }
            };

            let id = EntityId(index as u32);
            let mut result = Ok(());
            for phase in FramePhase::ORDER {
                let mut ctx = PhaseContext {
                    dt,
                    time,
                    signals: SignalContext::new(&mut self.slots, Some(id)),
                    sink: &mut *sink,
                };
                result = entity
                    .update_phase(phase, &mut ctx)
                    .with_context(|| format!("entity {id} failed in {phase:?}"));
                if result.is_err() {
                    break;
                }
            }

            self.slots[index] = Slot::Occupied(entity);
            result?;
        }
        Ok(())
    }
}
