//! Bit-packed animation source
//!
//! A compressed clip stores, per bone, the initial integer totals of its
//! rotation, translation and scale channels, followed by one fixed-stride
//! record of signed deltas per stored key. A key bitmap marks which frame
//! slots actually carry a key.
//!
//! ```text
//! key 0      : initial totals from the channel descriptors
//! key 1..n   : [bone 0: sign, rx, ry, rz, tx, ty, tz, sx, sy, sz][bone 1: ...]
//! ```
//!
//! Decoding is forward-only; see [`StreamedPairOfTotals`].

mod bitstream;
mod totals;

#[cfg(test)]
mod tests;

pub use bitstream::BitstreamReader;
pub use totals::{ChannelTotals, KeyBlend, StreamedPairOfTotals};

use glam::{Quat, Vec3};
use retroview_shared::CharAnimTime;

use crate::error::AnimError;
use crate::reader::ROOT_SEGMENT;

/// Bit layout of one rotation, translation or scale channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLayout {
    /// Zero disables the channel
    pub key_count: u16,
    /// Totals at key 0
    pub initial: [i32; 3],
    /// Delta width per axis
    pub bits: [u8; 3],
}

impl ChannelLayout {
    pub fn new(key_count: u16, initial: [i32; 3], bits: [u8; 3]) -> Self {
        Self {
            key_count,
            initial,
            bits,
        }
    }

    pub fn enabled(&self) -> bool {
        self.key_count != 0
    }

    fn delta_bits(&self) -> usize {
        self.bits.iter().map(|&b| b as usize).sum()
    }
}

/// Channel layout of one bone in the compressed stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoneChannelDescriptor {
    pub bone_id: u8,
    pub rotation: ChannelLayout,
    /// Sign of the derived quaternion component at key 0
    pub initial_rotation_negative: bool,
    pub translation: ChannelLayout,
    pub scale: ChannelLayout,
}

impl BoneChannelDescriptor {
    /// Bits this bone contributes to every key after the first
    pub fn key_stride_bits(&self) -> usize {
        let mut stride = 0;
        if self.rotation.enabled() {
            stride += 1 + self.rotation.delta_bits();
        }
        if self.translation.enabled() {
            stride += self.translation.delta_bits();
        }
        if self.scale.enabled() {
            stride += self.scale.delta_bits();
        }
        stride
    }

    fn check_widths(&self) -> Result<(), AnimError> {
        let widest = [self.rotation, self.translation, self.scale]
            .iter()
            .filter(|c| c.enabled())
            .flat_map(|c| c.bits)
            .max()
            .unwrap_or(0);
        if widest > 32 {
            return Err(AnimError::FieldTooWide {
                bone_id: self.bone_id,
                bits: widest,
            });
        }
        Ok(())
    }
}

/// One bit per frame slot; set bits carry a stored key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBitmap {
    bit_count: usize,
    words: Vec<u32>,
}

impl KeyBitmap {
    pub fn new(bit_count: usize, words: Vec<u32>) -> Result<Self, AnimError> {
        if words.len() * 32 < bit_count {
            return Err(AnimError::BitmapTooShort {
                bit_count,
                word_count: words.len(),
            });
        }
        Ok(Self { bit_count, words })
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn bit(&self, index: usize) -> bool {
        index < self.bit_count && (self.words[index / 32] >> (index % 32)) & 1 != 0
    }

    /// Number of stored keys
    pub fn key_count(&self) -> usize {
        (0..self.bit_count).filter(|&i| self.bit(i)).count()
    }
}

/// Keys bracketing a sample time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyWindow {
    /// Key index and time at or before the query
    pub prior: (usize, f32),
    /// First key strictly after the query
    pub next: Option<(usize, f32)>,
}

impl KeyWindow {
    /// Key the decoder must reach to answer the query
    pub fn target_key(&self) -> usize {
        self.next.map_or(self.prior.0, |(key, _)| key)
    }

    /// Blend factor between prior and next; 0 without a next key
    pub fn factor(&self, time: f32) -> f32 {
        match self.next {
            Some((_, next)) if next > self.prior.1 => (time - self.prior.1) / (next - self.prior.1),
            _ => 0.0,
        }
    }
}

/// Clip-wide constants of a compressed source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressedHeader {
    pub duration: CharAnimTime,
    pub interval: CharAnimTime,
    pub root_segment: u8,
    pub looping: bool,
    pub rotation_divisor: u32,
    pub translation_multiplier: f32,
    pub scale_multiplier: f32,
}

impl Default for CompressedHeader {
    fn default() -> Self {
        Self {
            duration: CharAnimTime::ZERO,
            interval: CharAnimTime::ZERO,
            root_segment: ROOT_SEGMENT,
            looping: false,
            rotation_divisor: 1,
            translation_multiplier: 1.0,
            scale_multiplier: 1.0,
        }
    }
}

/// Validated compressed animation
#[derive(Debug, Clone, PartialEq)]
pub struct AnimSourceCompressed {
    header: CompressedHeader,
    bitmap: KeyBitmap,
    bones: Vec<BoneChannelDescriptor>,
    stream: Vec<u32>,
    key_stride: usize,
    key_count: usize,
}

impl AnimSourceCompressed {
    pub fn new(
        header: CompressedHeader,
        bitmap: KeyBitmap,
        bones: Vec<BoneChannelDescriptor>,
        stream: Vec<u32>,
    ) -> Result<Self, AnimError> {
        if header.rotation_divisor == 0 {
            return Err(AnimError::ZeroRotationDivisor);
        }
        for bone in &bones {
            bone.check_widths()?;
        }

        let key_stride: usize = bones.iter().map(BoneChannelDescriptor::key_stride_bits).sum();
        let key_count = bitmap.key_count();
        let required_bits = key_stride * key_count.saturating_sub(1);
        let available_bits = stream.len() * 32;
        if available_bits < required_bits {
            tracing::warn!(
                "compressed animation stream truncated: {} bits for {} keys of {} bits",
                available_bits,
                key_count,
                key_stride
            );
            return Err(AnimError::BitstreamTooShort {
                required_bits,
                available_bits,
            });
        }

        Ok(Self {
            header,
            bitmap,
            bones,
            stream,
            key_stride,
            key_count,
        })
    }

    pub fn header(&self) -> &CompressedHeader {
        &self.header
    }

    pub fn bitmap(&self) -> &KeyBitmap {
        &self.bitmap
    }

    pub fn bones(&self) -> &[BoneChannelDescriptor] {
        &self.bones
    }

    pub(crate) fn stream(&self) -> &[u32] {
        &self.stream
    }

    pub fn key_stride_bits(&self) -> usize {
        self.key_stride
    }

    pub fn key_count(&self) -> usize {
        self.key_count
    }

    pub fn duration(&self) -> CharAnimTime {
        self.header.duration
    }

    /// Descriptor index for a segment ID
    pub fn bone_index(&self, segment: u8) -> Option<usize> {
        self.bones.iter().position(|b| b.bone_id == segment)
    }

    pub fn has_rotation(&self, segment: u8) -> bool {
        self.bone_index(segment)
            .is_some_and(|i| self.bones[i].rotation.enabled())
    }

    pub fn has_translation(&self, segment: u8) -> bool {
        self.bone_index(segment)
            .is_some_and(|i| self.bones[i].translation.enabled())
    }

    pub fn has_scale(&self, segment: u8) -> bool {
        self.bone_index(segment)
            .is_some_and(|i| self.bones[i].scale.enabled())
    }

    /// Scan the bitmap for the keys bracketing `time`
    pub fn locate_keys(&self, time: CharAnimTime) -> KeyWindow {
        let interval = self.header.interval.seconds();
        let query = time.seconds();

        let mut window = KeyWindow {
            prior: (0, 0.0),
            next: None,
        };
        let mut key = 0;
        let mut elapsed = 0.0;
        for slot in 0..self.bitmap.bit_count() {
            if self.bitmap.bit(slot) {
                if elapsed > query {
                    window.next = Some((key, elapsed));
                    break;
                }
                window.prior = (key, elapsed);
                key += 1;
            }
            elapsed += interval;
        }
        window
    }

    /// Rebuild a quaternion from integer rotation totals
    ///
    /// Each of x, y, z is `sin(total * (pi/2) / divisor)`; w is derived from
    /// the unit-norm constraint and negated when `negative` is set. The
    /// result is not renormalised.
    pub fn rotation_from_totals(&self, totals: [i32; 3], negative: bool) -> Quat {
        let scale = std::f32::consts::FRAC_PI_2 / self.header.rotation_divisor as f32;
        let x = (totals[0] as f32 * scale).sin();
        let y = (totals[1] as f32 * scale).sin();
        let z = (totals[2] as f32 * scale).sin();
        let mut w = (1.0 - (x * x + y * y + z * z)).max(0.0).sqrt();
        if negative {
            w = -w;
        }
        Quat::from_xyzw(x, y, z, w)
    }

    pub fn translation_from_totals(&self, totals: [i32; 3]) -> Vec3 {
        totals_to_vec3(totals) * self.header.translation_multiplier
    }

    pub fn scale_from_totals(&self, totals: [i32; 3]) -> Vec3 {
        totals_to_vec3(totals) * self.header.scale_multiplier
    }
}

fn totals_to_vec3(totals: [i32; 3]) -> Vec3 {
    Vec3::new(totals[0] as f32, totals[1] as f32, totals[2] as f32)
}
