//! RDP register layout
//!
//! Bit positions follow the F3DEX2 `G_SETOTHERMODE_H`/`G_SETOTHERMODE_L`
//! encodings. Accessors take the raw 32-bit words as the display list wrote
//! them.

use crate::render_state::GeometryMode;
use crate::shader_gen::ShaderGenError;

// Other Mode H
pub const G_MDSFT_ALPHADITHER: u32 = 4;
pub const G_MDSFT_RGBDITHER: u32 = 6;
pub const G_MDSFT_COMBKEY: u32 = 8;
pub const G_MDSFT_TEXTCONV: u32 = 9;
pub const G_MDSFT_TEXTFILT: u32 = 12;
pub const G_MDSFT_TEXTLUT: u32 = 14;
pub const G_MDSFT_TEXTLOD: u32 = 16;
pub const G_MDSFT_TEXTDETAIL: u32 = 17;
pub const G_MDSFT_TEXTPERSP: u32 = 19;
pub const G_MDSFT_CYCLETYPE: u32 = 20;

// Other Mode L
pub const G_MDSFT_ALPHACOMPARE: u32 = 0;
pub const G_MDSFT_ZSRCSEL: u32 = 2;
pub const G_MDSFT_RENDERMODE: u32 = 3;

pub const AA_EN: u32 = 0x0008;
pub const Z_CMP: u32 = 0x0010;
pub const Z_UPD: u32 = 0x0020;
pub const IM_RD: u32 = 0x0040;
pub const CLR_ON_CVG: u32 = 0x0080;
pub const CVG_DST_SHIFT: u32 = 8;
pub const ZMODE_SHIFT: u32 = 10;
pub const CVG_X_ALPHA: u32 = 0x1000;
pub const ALPHA_CVG_SEL: u32 = 0x2000;
pub const FORCE_BL: u32 = 0x4000;

/// `ZMODE` value for decals
pub const ZMODE_DEC: u32 = 3;

/// Extract an unsigned field of `width` bits at `shift`
#[inline]
pub const fn field(word: u32, shift: u32, width: u32) -> u32 {
    (word >> shift) & ((1 << width) - 1)
}

/// RDP pipeline cycle mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CycleType {
    #[default]
    One,
    Two,
    Copy,
    Fill,
}

impl CycleType {
    pub fn from_bits(bits: u32) -> Self {
        match bits & 0x3 {
            0 => CycleType::One,
            1 => CycleType::Two,
            2 => CycleType::Copy,
            _ => CycleType::Fill,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            CycleType::One => 0,
            CycleType::Two => 1,
            CycleType::Copy => 2,
            CycleType::Fill => 3,
        }
    }
}

/// Texture filter selected by `G_MDSFT_TEXTFILT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    #[default]
    Point,
    Average,
    /// The RDP's three-sample bilinear
    Bilerp,
}

impl TextureFilter {
    /// Decode the 2-bit field; value 1 is not a defined filter
    pub fn from_bits(bits: u32) -> Result<Self, ShaderGenError> {
        match bits {
            0 => Ok(TextureFilter::Point),
            2 => Ok(TextureFilter::Bilerp),
            3 => Ok(TextureFilter::Average),
            other => Err(ShaderGenError::UnknownTextureFilter(other)),
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            TextureFilter::Point => 0,
            TextureFilter::Bilerp => 2,
            TextureFilter::Average => 3,
        }
    }
}

/// Blender inputs of one cycle: `(P * A + M * B) / (A + B)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlenderCycle {
    pub p: u32,
    pub a: u32,
    pub m: u32,
    pub b: u32,
}

// Blender P/M inputs
pub const BL_CLR_IN: u32 = 0;
pub const BL_CLR_MEM: u32 = 1;
pub const BL_CLR_BL: u32 = 2;
pub const BL_CLR_FOG: u32 = 3;
// Blender A inputs
pub const BL_A_IN: u32 = 0;
pub const BL_A_FOG: u32 = 1;
pub const BL_A_SHADE: u32 = 2;
pub const BL_A_ZERO: u32 = 3;
// Blender B inputs
pub const BL_1MA: u32 = 0;
pub const BL_A_MEM: u32 = 1;
pub const BL_ONE: u32 = 2;
pub const BL_ZERO: u32 = 3;

/// Snapshot of the registers that drive the fixed-function pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RdpState {
    pub other_mode_h: u32,
    pub other_mode_l: u32,
    /// `G_SETCOMBINE` words
    pub combine: (u32, u32),
    pub geometry_mode: GeometryMode,
}

impl RdpState {
    pub fn cycle_type(&self) -> CycleType {
        CycleType::from_bits(field(self.other_mode_h, G_MDSFT_CYCLETYPE, 2))
    }

    pub fn texture_filter_bits(&self) -> u32 {
        field(self.other_mode_h, G_MDSFT_TEXTFILT, 2)
    }

    pub fn texture_filter(&self) -> Result<TextureFilter, ShaderGenError> {
        TextureFilter::from_bits(self.texture_filter_bits())
    }

    pub fn texture_lut(&self) -> u32 {
        field(self.other_mode_h, G_MDSFT_TEXTLUT, 2)
    }

    pub fn perspective_correct(&self) -> bool {
        field(self.other_mode_h, G_MDSFT_TEXTPERSP, 1) != 0
    }

    pub fn alpha_compare(&self) -> u32 {
        field(self.other_mode_l, G_MDSFT_ALPHACOMPARE, 2)
    }

    pub fn z_source_primitive(&self) -> bool {
        field(self.other_mode_l, G_MDSFT_ZSRCSEL, 1) != 0
    }

    pub fn z_mode(&self) -> u32 {
        field(self.other_mode_l, ZMODE_SHIFT, 2)
    }

    /// Blender inputs for cycle 0 (bits 30/26/22/18) or cycle 1 (bits 28/24/20/16)
    pub fn blender_cycle(&self, cycle: usize) -> BlenderCycle {
        blender_cycle(self.other_mode_l, cycle)
    }
}

pub fn blender_cycle(other_mode_l: u32, cycle: usize) -> BlenderCycle {
    let base = if cycle == 0 { 18 } else { 16 };
    BlenderCycle {
        p: field(other_mode_l, base + 12, 2),
        a: field(other_mode_l, base + 8, 2),
        m: field(other_mode_l, base + 4, 2),
        b: field(other_mode_l, base, 2),
    }
}

/// Pack blender inputs into the render-mode word for one cycle
pub fn blender_bits(cycle: usize, inputs: BlenderCycle) -> u32 {
    let base = if cycle == 0 { 18 } else { 16 };
    (inputs.p & 3) << (base + 12)
        | (inputs.a & 3) << (base + 8)
        | (inputs.m & 3) << (base + 4)
        | (inputs.b & 3) << base
}
