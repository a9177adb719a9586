//! Skeletal animation for retro console assets
//!
//! Two families of animation data are supported:
//!
//! - [`BoneAnimator`] samples per-bone linear keyframe tracks (rotation in
//!   degrees, scale, translation per axis) and builds pivot-relative bone
//!   matrices.
//! - [`AnimSource`] (dense, one value per frame) and [`AnimSourceCompressed`]
//!   (bit-packed deltas behind a key bitmap) are sampled through stateful
//!   readers ([`AnimReader`]) that advance a clock and report root motion as
//!   [`AdvancementDeltas`] for blend consumers.
//!
//! # Modules
//!
//! - [`skeleton`] - bones and skeleton hierarchy
//! - [`track`] - linear keyframe tracks
//! - [`bone_animator`] - frame-mode mapping and pivot-relative bone matrices
//! - [`source`] - dense per-frame animation source
//! - [`compressed`] - bit-packed animation source and its stream decoder
//! - [`deltas`] - root-motion deltas and steady-state summaries
//! - [`reader`] - time-advancing readers over both source kinds
//! - [`pose`] - per-segment data to bone matrices

pub mod bone_animator;
pub mod compressed;
pub mod deltas;
pub mod error;
pub mod pose;
pub mod reader;
pub mod skeleton;
pub mod source;
pub mod track;

pub use bone_animator::{AnimParams, AnimationSet, BoneAnimator, FrameMode};
pub use compressed::{
    AnimSourceCompressed, BitstreamReader, BoneChannelDescriptor, ChannelLayout, ChannelTotals,
    CompressedHeader, KeyBitmap, KeyBlend, KeyWindow, StreamedPairOfTotals,
};
pub use deltas::{AdvancementDeltas, AdvancementResults, PerSegmentData, SteadyStateAnimInfo};
pub use error::AnimError;
pub use pose::build_pose_matrices;
pub use reader::{
    AnimData, AnimReader, AnimSet, AnimSourceReader, AnimSourceReaderCompressed, BlendReader,
    PoiCursor, ROOT_SEGMENT,
};
pub use skeleton::{Bone, Skeleton};
pub use source::{AnimSource, ChannelData};
pub use track::{AnimationTrack, Keyframe, TrackKind};
