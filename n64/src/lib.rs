//! N64 fixed-function pipeline emulation
//!
//! Translates RSP/RDP state into host-side render state and WGSL, and walks
//! model render graphs into draw calls.
//!
//! # Modules
//!
//! - [`rdp`] - Other Mode H/L register layout
//! - [`combiner`] - `G_SETCOMBINE` decoding and CPU reference evaluation
//! - [`render_state`] - alpha test, blend, depth and cull translation
//! - [`texture`] - CPU texture sampling matching the generated shaders
//! - [`shader_gen`] - WGSL generation from a [`ShaderConfig`]
//! - [`pipeline_cache`] - generated shaders keyed by configuration
//! - [`geo`] - GeoNode walker, selectors and blink
//! - [`flver`] - flat skinned mesh walker
//! - [`vertex_effects`] - water, color and alpha vertex animation

pub mod combiner;
pub mod flver;
pub mod geo;
pub mod pipeline_cache;
pub mod rdp;
pub mod render_state;
pub mod shader_gen;
pub mod texture;
pub mod vertex_effects;

pub use combiner::{CombineParams, CombineStage, CombinerInputs, decode_combine_params};
pub use flver::{FlverMesh, walk_flver};
pub use geo::{
    Blink, BlinkParams, BlinkPhase, DrawCallId, DrawSink, GeoNode, Selector, SelectorRule,
    SelectorState, walk,
};
pub use pipeline_cache::{CachedShader, PipelineCache};
pub use rdp::{CycleType, RdpState, TextureFilter};
pub use render_state::{
    AlphaTest, BlendFactor, BlendFunc, BlendState, CullMode, GeometryMode, alpha_test_threshold,
    translate_blend_mode, translate_cull_mode,
};
pub use shader_gen::{
    GeneratedShader, ShaderConfig, ShaderDefines, ShaderGenError, generate_for_registers,
    generate_shader,
};
pub use texture::TexelGrid;
pub use vertex_effects::{EffectVertex, VertexEffect, VertexEffectKind, VertexEffectSet};
