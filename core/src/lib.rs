//! Retroview Core - frame driver
//!
//! Ties the animation, rail and N64 crates together into a single-threaded
//! frame loop.
//!
//! # Architecture
//!
//! - [`Stage`] - Owns entities and runs each through [`FramePhase::ORDER`]
//! - [`SignalContext`] - Synchronous cross-entity signal dispatch
//! - [`AnimatedActor`] - Rail rider, animation, bones, model points, blink and GeoNode walk
//! - [`config`] - `config.toml` loading with defaults
//! - [`logging`] - `tracing` subscriber setup

pub mod actor;
pub mod config;
pub mod logging;
pub mod model_point;
pub mod stage;

pub use actor::{AnimatedActor, PoseSource, RailBinding};
pub use config::{Config, ConfigError};
pub use model_point::ModelPoint;
pub use stage::{
    Entity, EntityId, FramePhase, PhaseContext, Signal, SignalContext, SignalError, Stage,
};
