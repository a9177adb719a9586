/// Error type for animation lookup and decoding failures
///
/// Only data-integrity problems are errors. Sampling outside a clip's time
/// range, empty tracks and absent channels are clamped or defaulted instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimError {
    /// An animation index has no backing data
    #[error("no animation data at index {index} ({available} slots)")]
    MissingAnimation { index: usize, available: usize },

    /// The compressed bitstream is shorter than its channel layout requires
    #[error("compressed bitstream holds {available_bits} bits, layout requires {required_bits}")]
    BitstreamTooShort {
        required_bits: usize,
        available_bits: usize,
    },

    /// The key bitmap declares more bits than its words hold
    #[error("key bitmap declares {bit_count} bits but stores only {word_count} words")]
    BitmapTooShort { bit_count: usize, word_count: usize },

    /// A channel field is wider than a 32-bit word
    #[error("bone {bone_id} uses a {bits}-bit field (max 32)")]
    FieldTooWide { bone_id: u8, bits: u8 },

    /// Rotation totals cannot be scaled by a zero divisor
    #[error("rotation divisor must be non-zero")]
    ZeroRotationDivisor,
}
