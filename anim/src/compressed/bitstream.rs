/// LSB-first reader over a slice of 32-bit words
///
/// Fields may straddle a word boundary. Reads past the end of the slice see
/// zero bits; stream length is validated once when the source is built.
#[derive(Debug, Clone, Copy)]
pub struct BitstreamReader<'a> {
    words: &'a [u32],
    position: usize,
}

impl<'a> BitstreamReader<'a> {
    pub fn new(words: &'a [u32]) -> Self {
        Self { words, position: 0 }
    }

    /// Resume reading at an absolute bit offset
    pub fn at(words: &'a [u32], position: usize) -> Self {
        Self { words, position }
    }

    /// Current bit offset
    pub fn position(&self) -> usize {
        self.position
    }

    fn word(&self, index: usize) -> u64 {
        self.words.get(index).copied().unwrap_or(0) as u64
    }

    /// Read `width` bits (0..=32) as an unsigned value
    pub fn read_unsigned(&mut self, width: u8) -> u32 {
        if width == 0 {
            return 0;
        }
        let width = width.min(32) as u32;
        let index = self.position / 32;
        let shift = (self.position % 32) as u32;

        let pair = self.word(index) | (self.word(index + 1) << 32);
        let mask = (1u64 << width) - 1;
        self.position += width as usize;
        ((pair >> shift) & mask) as u32
    }

    /// Read `width` bits and sign-extend from the field's top bit
    pub fn read_signed(&mut self, width: u8) -> i32 {
        let raw = self.read_unsigned(width);
        match width {
            0 => 0,
            32.. => raw as i32,
            w => {
                let shift = 32 - w as u32;
                ((raw << shift) as i32) >> shift
            }
        }
    }

    pub fn read_bit(&mut self) -> bool {
        self.read_unsigned(1) != 0
    }
}
