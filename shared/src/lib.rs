//! Shared types for the retroview animation, rail and N64 crates.
//!
//! # Modules
//!
//! - [`time`] - [`CharAnimTime`], the animation clock value with typed zeroes
//! - [`math`] - POD affine matrix storage and small glam helpers

pub mod math;
pub mod time;

pub use math::{AffineMatrix3x4, lerp_f32, quat_is_near, vec3_is_near};
pub use time::{CharAnimTime, TIME_EPSILON, TimeKind};
