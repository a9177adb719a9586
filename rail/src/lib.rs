//! Designer-authored rails and the entities that ride them
//!
//! A level ships its rails as a flat list of [`RailNode`]s. [`RailSet::build`]
//! links them into [`Rail`]s with sorted keyframes, lerp windows and
//! per-keyframe distance to the end. A [`RailRider`] then moves along a rail
//! by arc length each frame, applying keyframes as it passes them.
//!
//! # Modules
//!
//! - [`node`] - input nodes and keyframe records
//! - [`builder`] - chain walking, loop detection and lerp resolution
//! - [`path`] - Hermite evaluation, arc-length riding and heading
//! - [`rider`] - wait/move state machine

pub mod builder;
pub mod node;
pub mod path;
pub mod rider;

#[cfg(test)]
mod tests;

pub use builder::{RailSet, build_rails};
pub use node::{
    HeadingMode, KeyframeDescriptor, LerpRange, RailKeyframe, RailNode, RailPayload,
    TravelDirection,
};
pub use path::{Rail, RideParams};
pub use rider::{PassedKeyframes, RailRider, RiderState};
