//! Tests for the compressed animation decoder

use super::*;
use glam::{Quat, Vec3};
use retroview_shared::{CharAnimTime, quat_is_near, vec3_is_near};

// ============================================================================
// Test helpers
// ============================================================================

/// Packs signed fields LSB-first, mirroring the decoder's layout
#[derive(Default)]
struct BitstreamWriter {
    words: Vec<u32>,
    position: usize,
}

impl BitstreamWriter {
    fn write(&mut self, value: i32, width: u8) {
        for i in 0..width as usize {
            let bit = ((value as u32) >> i) & 1;
            let index = (self.position + i) / 32;
            if index >= self.words.len() {
                self.words.push(0);
            }
            self.words[index] |= bit << ((self.position + i) % 32);
        }
        self.position += width as usize;
    }

    fn write_bit(&mut self, bit: bool) {
        self.write(bit as i32, 1);
    }

    fn finish(self) -> Vec<u32> {
        self.words
    }
}

fn header(interval: f32, keys: usize) -> CompressedHeader {
    CompressedHeader {
        duration: CharAnimTime::from_seconds(interval * (keys - 1) as f32),
        interval: CharAnimTime::from_seconds(interval),
        root_segment: 3,
        looping: false,
        rotation_divisor: 100,
        translation_multiplier: 0.5,
        scale_multiplier: 1.0,
    }
}

/// One translating bone, three keys at x totals 0, 4, 10
fn translating_source() -> AnimSourceCompressed {
    let bone = BoneChannelDescriptor {
        bone_id: 3,
        translation: ChannelLayout::new(3, [0, 0, 0], [5, 0, 0]),
        ..BoneChannelDescriptor::default()
    };
    let mut w = BitstreamWriter::default();
    w.write(4, 5);
    w.write(6, 5);
    AnimSourceCompressed::new(
        header(1.0, 3),
        KeyBitmap::new(3, vec![0b111]).unwrap(),
        vec![bone],
        w.finish(),
    )
    .unwrap()
}

// ============================================================================
// Bitstream
// ============================================================================

#[test]
fn test_sign_bit_alone_is_most_negative() {
    for width in 1..32u8 {
        let words = [1u32 << (width - 1)];
        let mut reader = BitstreamReader::new(&words);
        assert_eq!(reader.read_signed(width), -(1i64 << (width - 1)) as i32, "width {width}");
    }
}

#[test]
fn test_sign_extension_across_word_boundary() {
    // A 6-bit field starting at bit 30: two bits in word 0, four in word 1.
    // Only the field's top bit is set, which lands in word 1 bit 3.
    let words = [0u32, 1 << 3];
    let mut reader = BitstreamReader::at(&words, 30);
    assert_eq!(reader.read_signed(6), -32);
    assert_eq!(reader.position(), 36);
}

#[test]
fn test_straddling_positive_field() {
    let mut w = BitstreamWriter::default();
    w.write(0, 28);
    w.write(0x155, 10);
    let words = w.finish();
    let mut reader = BitstreamReader::at(&words, 28);
    assert_eq!(reader.read_unsigned(10), 0x155);
}

#[test]
fn test_zero_width_and_full_word_reads() {
    let words = [0xDEAD_BEEF, 0x8000_0000];
    let mut reader = BitstreamReader::new(&words);
    assert_eq!(reader.read_signed(0), 0);
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.read_unsigned(32), 0xDEAD_BEEF);
    assert_eq!(reader.read_signed(32), i32::MIN);
}

#[test]
fn test_reads_past_end_are_zero() {
    let words = [u32::MAX];
    let mut reader = BitstreamReader::at(&words, 32);
    assert_eq!(reader.read_unsigned(8), 0);
}

// ============================================================================
// Layout validation
// ============================================================================

#[test]
fn test_key_stride_counts_enabled_channels_only() {
    let bone = BoneChannelDescriptor {
        bone_id: 0,
        rotation: ChannelLayout::new(2, [0; 3], [4, 4, 4]),
        translation: ChannelLayout::new(0, [0; 3], [8, 8, 8]),
        scale: ChannelLayout::new(2, [0; 3], [2, 3, 0]),
        initial_rotation_negative: false,
    };
    assert_eq!(bone.key_stride_bits(), 1 + 12 + 5);
}

#[test]
fn test_short_stream_is_rejected() {
    let bone = BoneChannelDescriptor {
        bone_id: 0,
        translation: ChannelLayout::new(4, [0; 3], [16, 16, 16]),
        ..BoneChannelDescriptor::default()
    };
    let err = AnimSourceCompressed::new(
        header(1.0, 4),
        KeyBitmap::new(4, vec![0b1111]).unwrap(),
        vec![bone],
        vec![0; 2],
    )
    .unwrap_err();
    assert_eq!(
        err,
        AnimError::BitstreamTooShort {
            required_bits: 144,
            available_bits: 64
        }
    );
}

#[test]
fn test_bitmap_and_divisor_validation() {
    assert!(KeyBitmap::new(33, vec![0]).is_err());
    let h = CompressedHeader {
        rotation_divisor: 0,
        ..CompressedHeader::default()
    };
    assert_eq!(
        AnimSourceCompressed::new(h, KeyBitmap::default(), vec![], vec![]).unwrap_err(),
        AnimError::ZeroRotationDivisor
    );
}

// ============================================================================
// Key lookup and decoding
// ============================================================================

#[test]
fn test_locate_keys_skips_empty_slots() {
    let bone = BoneChannelDescriptor::default();
    // Keys in slots 0, 2 and 5
    let source = AnimSourceCompressed::new(
        header(0.5, 6),
        KeyBitmap::new(6, vec![0b100101]).unwrap(),
        vec![bone],
        vec![],
    )
    .unwrap();

    let w = source.locate_keys(CharAnimTime::from_seconds(1.5));
    assert_eq!(w.prior, (1, 1.0));
    assert_eq!(w.next, Some((2, 2.5)));
    assert!((w.factor(1.5) - 1.0 / 3.0).abs() < 1e-6);

    let end = source.locate_keys(CharAnimTime::from_seconds(9.0));
    assert_eq!(end.prior, (2, 2.5));
    assert_eq!(end.next, None);
    assert_eq!(end.target_key(), 2);
}

#[test]
fn test_totals_interpolate_between_keys() {
    let source = translating_source();
    let mut pair = StreamedPairOfTotals::new(&source);

    let f = pair.seek_to_time(&source, CharAnimTime::from_seconds(1.5));
    assert_eq!(pair.next_key(), 2);
    let t = pair.translation(&source, 0, f).unwrap();
    // Totals 4 → 10, multiplier 0.5
    assert!(vec3_is_near(t, Vec3::new(3.5, 0.0, 0.0), 1e-6));
    assert_eq!(pair.rotation(&source, 0, f), None);
}

#[test]
fn test_backward_seek_rewinds_and_matches_fresh_decode() {
    let source = translating_source();
    let mut pair = StreamedPairOfTotals::new(&source);
    pair.seek_to_key(&source, 2);
    assert_eq!(pair.bit_position(), 10);

    let f = pair.seek_to_time(&source, CharAnimTime::from_seconds(0.25));
    assert_eq!(pair.next_key(), 1);
    assert_eq!(pair.bit_position(), 5);

    let mut fresh = StreamedPairOfTotals::new(&source);
    let g = fresh.seek_to_time(&source, CharAnimTime::from_seconds(0.25));
    assert_eq!(pair, fresh);
    assert_eq!(f, g);
    assert!(vec3_is_near(
        pair.translation(&source, 0, f).unwrap(),
        Vec3::new(0.5, 0.0, 0.0),
        1e-6
    ));
}

#[test]
fn test_past_last_key_holds_final_values() {
    let source = translating_source();
    let mut pair = StreamedPairOfTotals::new(&source);
    let f = pair.seek_to_time(&source, CharAnimTime::from_seconds(7.0));
    assert!(!f.has_next);
    assert!(vec3_is_near(
        pair.translation(&source, 0, f).unwrap(),
        Vec3::new(5.0, 0.0, 0.0),
        1e-6
    ));
}

#[test]
fn test_rotation_reconstruction() {
    let source = translating_source();
    // divisor 100: a total of 50 maps to sin(pi/4)
    let q = source.rotation_from_totals([50, 0, 0], false);
    let s = std::f32::consts::FRAC_1_SQRT_2;
    assert!((q.x - s).abs() < 1e-6);
    assert!((q.w - s).abs() < 1e-6);

    let neg = source.rotation_from_totals([50, 0, 0], true);
    assert!((neg.w + s).abs() < 1e-6);

    // Oversized totals clamp w at zero rather than producing NaN
    let over = source.rotation_from_totals([100, 100, 0], false);
    assert_eq!(over.w, 0.0);
}

#[test]
fn test_rotation_sign_bit_is_read_per_key() {
    let bone = BoneChannelDescriptor {
        bone_id: 0,
        rotation: ChannelLayout::new(2, [0, 0, 0], [0, 8, 0]),
        initial_rotation_negative: false,
        ..BoneChannelDescriptor::default()
    };
    let mut w = BitstreamWriter::default();
    w.write_bit(true);
    w.write(100, 8);
    let source = AnimSourceCompressed::new(
        header(1.0, 2),
        KeyBitmap::new(2, vec![0b11]).unwrap(),
        vec![bone],
        w.finish(),
    )
    .unwrap();

    let mut pair = StreamedPairOfTotals::new(&source);
    let f = pair.seek_to_time(&source, CharAnimTime::from_seconds(1.0));
    assert!(!f.has_next);
    let q = pair.rotation(&source, 0, f).unwrap();
    // y total 100 with divisor 100 is a half turn about Y: sin(pi/2) = 1, w = -0
    assert!(quat_is_near(q, Quat::from_xyzw(0.0, 1.0, 0.0, 0.0), 1e-6));
    assert!(pair.next()[0].rotation_negative);
    assert!(!pair.prior()[0].rotation_negative);
}
