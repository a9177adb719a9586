//! Generated shader cache
//!
//! Shaders are generated on demand the first time a [`ShaderConfig`] is seen
//! and reused for every later draw with the same configuration.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use xxhash_rust::xxh3::xxh3_64;

use crate::rdp::RdpState;
use crate::shader_gen::{GeneratedShader, ShaderConfig, ShaderGenError, generate_shader};

/// A cached shader with a stable label for host pipeline objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedShader {
    pub shader: GeneratedShader,
    /// xxh3 of the shader source
    pub source_hash: u64,
    pub label: String,
}

/// Cache for generated shaders
///
/// Stores shaders keyed by their configuration. Register states that decode
/// to the same configuration share an entry.
#[derive(Debug, Default)]
pub struct PipelineCache {
    shaders: HashMap<ShaderConfig, CachedShader>,
    hits: u64,
    misses: u64,
}

impl PipelineCache {
    /// Create an empty pipeline cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the shader for `config`, generating it on a miss
    pub fn get_or_generate(&mut self, config: &ShaderConfig) -> Result<&CachedShader, ShaderGenError> {
        match self.shaders.entry(*config) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let shader = generate_shader(config)?;
                let source_hash = xxh3_64(shader.source.as_bytes());
                let label = format!("n64_{:016x}", source_hash);
                tracing::debug!("shader cache miss: generated {} for {:?}", label, config);
                self.misses += 1;
                Ok(entry.insert(CachedShader {
                    shader,
                    source_hash,
                    label,
                }))
            }
        }
    }

    /// Decode registers, then look up or generate
    pub fn get_for_registers(&mut self, state: &RdpState) -> Result<&CachedShader, ShaderGenError> {
        let config = ShaderConfig::from_registers(state)?;
        self.get_or_generate(&config)
    }

    pub fn contains(&self, config: &ShaderConfig) -> bool {
        self.shaders.contains_key(config)
    }

    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }

    /// `(hits, misses)` since creation
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.shaders.clear();
    }
}
