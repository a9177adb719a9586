/// Error type for shader generation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShaderGenError {
    /// Texture filter field holds an undefined value
    #[error("unknown texture filter: {0}")]
    UnknownTextureFilter(u32),
    /// Copy and fill cycles bypass the combiner
    #[error("cycle type {0} has no combiner stage")]
    InvalidCycleType(u32),
    /// A combiner selector indexes past its lookup table
    #[error("combiner cycle {cycle} selector {selector} is out of range")]
    InvalidCombineSelector { cycle: usize, selector: u8 },
}
