use glam::{Quat, Vec3};
use retroview_shared::CharAnimTime;

use super::{AnimSourceCompressed, BitstreamReader, BoneChannelDescriptor};

/// Accumulated integer totals for one bone at one key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelTotals {
    pub rotation: [i32; 3],
    pub rotation_negative: bool,
    pub translation: [i32; 3],
    pub scale: [i32; 3],
}

impl ChannelTotals {
    fn initial(desc: &BoneChannelDescriptor) -> Self {
        Self {
            rotation: desc.rotation.initial,
            rotation_negative: desc.initial_rotation_negative,
            translation: desc.translation.initial,
            scale: desc.scale.initial,
        }
    }

    fn apply_key(&mut self, desc: &BoneChannelDescriptor, reader: &mut BitstreamReader<'_>) {
        if desc.rotation.enabled() {
            self.rotation_negative = reader.read_bit();
            add_deltas(&mut self.rotation, desc.rotation.bits, reader);
        }
        if desc.translation.enabled() {
            add_deltas(&mut self.translation, desc.translation.bits, reader);
        }
        if desc.scale.enabled() {
            add_deltas(&mut self.scale, desc.scale.bits, reader);
        }
    }
}

fn add_deltas(totals: &mut [i32; 3], bits: [u8; 3], reader: &mut BitstreamReader<'_>) {
    for (total, width) in totals.iter_mut().zip(bits) {
        *total = total.wrapping_add(reader.read_signed(width));
    }
}

/// Blend between the prior and next buffers after a seek
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyBlend {
    pub factor: f32,
    /// False past the last key, where only the next buffer is meaningful
    pub has_next: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    fn flipped(self) -> Self {
        match self {
            Side::Front => Side::Back,
            Side::Back => Side::Front,
        }
    }
}

/// Double-buffered decode state for a compressed stream
///
/// The "next" buffer holds the totals of key `next_key`; the "prior" buffer
/// holds key `next_key - 1` once at least one key has been decoded. The
/// stream is forward-only, so seeking backwards resets to key 0 and
/// re-decodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamedPairOfTotals {
    front: Vec<ChannelTotals>,
    back: Vec<ChannelTotals>,
    /// Which buffer currently holds the next key
    next_side: Side,
    next_key: usize,
    bit_position: usize,
}

impl StreamedPairOfTotals {
    pub fn new(source: &AnimSourceCompressed) -> Self {
        let initial: Vec<ChannelTotals> = source.bones().iter().map(ChannelTotals::initial).collect();
        Self {
            front: initial.clone(),
            back: initial,
            next_side: Side::Front,
            next_key: 0,
            bit_position: 0,
        }
    }

    /// Rewind to key 0
    pub fn reset(&mut self, source: &AnimSourceCompressed) {
        *self = Self::new(source);
    }

    pub fn next_key(&self) -> usize {
        self.next_key
    }

    pub fn bit_position(&self) -> usize {
        self.bit_position
    }

    pub fn prior(&self) -> &[ChannelTotals] {
        match self.next_side {
            Side::Front => &self.back,
            Side::Back => &self.front,
        }
    }

    pub fn next(&self) -> &[ChannelTotals] {
        match self.next_side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    /// Decode one more key: the old next becomes prior, and next gains one stride of deltas
    pub fn advance(&mut self, source: &AnimSourceCompressed) {
        self.next_side = self.next_side.flipped();
        let (prior, next) = match self.next_side {
            Side::Front => (&self.back, &mut self.front),
            Side::Back => (&self.front, &mut self.back),
        };
        next.clone_from(prior);

        let mut reader = BitstreamReader::at(source.stream(), self.bit_position);
        for (totals, desc) in next.iter_mut().zip(source.bones()) {
            totals.apply_key(desc, &mut reader);
        }
        self.bit_position = reader.position();
        self.next_key += 1;
    }

    /// Bring the next buffer to `target`, rewinding first if it is behind the cursor
    pub fn seek_to_key(&mut self, source: &AnimSourceCompressed, target: usize) {
        let target = target.min(source.key_count().saturating_sub(1));
        if target < self.next_key {
            tracing::trace!("rewinding compressed stream from key {} to {}", self.next_key, target);
            self.reset(source);
        }
        while self.next_key < target {
            self.advance(source);
        }
    }

    /// Position the buffers for `time` and return how to blend them
    ///
    /// With no key after `time`, [`Self::next`] holds the prior key's values
    /// and is used alone.
    pub fn seek_to_time(&mut self, source: &AnimSourceCompressed, time: CharAnimTime) -> KeyBlend {
        let window = source.locate_keys(time);
        self.seek_to_key(source, window.target_key());
        KeyBlend {
            factor: window.factor(time.seconds()).clamp(0.0, 1.0),
            has_next: window.next.is_some(),
        }
    }

    fn endpoints(&self, bone: usize, blend: KeyBlend) -> Option<(&ChannelTotals, &ChannelTotals)> {
        let next = self.next().get(bone)?;
        if blend.has_next {
            Some((self.prior().get(bone)?, next))
        } else {
            Some((next, next))
        }
    }

    /// Interpolated rotation for a descriptor index after [`Self::seek_to_time`]
    pub fn rotation(&self, source: &AnimSourceCompressed, bone: usize, blend: KeyBlend) -> Option<Quat> {
        if !source.bones().get(bone)?.rotation.enabled() {
            return None;
        }
        let (a, b) = self.endpoints(bone, blend)?;
        let qa = source.rotation_from_totals(a.rotation, a.rotation_negative);
        let qb = source.rotation_from_totals(b.rotation, b.rotation_negative);
        Some(qa.slerp(qb, blend.factor))
    }

    pub fn translation(&self, source: &AnimSourceCompressed, bone: usize, blend: KeyBlend) -> Option<Vec3> {
        if !source.bones().get(bone)?.translation.enabled() {
            return None;
        }
        let (a, b) = self.endpoints(bone, blend)?;
        Some(
            source
                .translation_from_totals(a.translation)
                .lerp(source.translation_from_totals(b.translation), blend.factor),
        )
    }

    pub fn scale(&self, source: &AnimSourceCompressed, bone: usize, blend: KeyBlend) -> Option<Vec3> {
        if !source.bones().get(bone)?.scale.enabled() {
            return None;
        }
        let (a, b) = self.endpoints(bone, blend)?;
        Some(
            source
                .scale_from_totals(a.scale)
                .lerp(source.scale_from_totals(b.scale), blend.factor),
        )
    }
}
