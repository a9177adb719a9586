//! Color combiner decoding and CPU reference evaluation
//!
//! Each cycle computes `(A - B) * C + D` separately for color and alpha.
//! Raw `G_SETCOMBINE` selectors are normalized onto small lookup tables
//! shared with the generated shaders:
//!
//! | table         | entries                                                        |
//! |---------------|----------------------------------------------------------------|
//! | color A/B/D   | combined, tex0, tex1, prim, shade, env, 1, 0                   |
//! | color C       | combined, tex0, tex1, prim, shade, env, 0, combined.a, tex0.a, tex1.a, prim.a, shade.a, env.a, 0, 0, 0 |
//! | alpha A/B/D   | combined, tex0, tex1, prim, shade, env, 1, 0                   |
//! | alpha C       | 0, tex0, tex1, prim, shade, env, 0, 0                          |

use glam::{Vec3, Vec4};

// Raw color selector values
pub const CC_COMBINED: u8 = 0;
pub const CC_TEXEL0: u8 = 1;
pub const CC_TEXEL1: u8 = 2;
pub const CC_PRIMITIVE: u8 = 3;
pub const CC_SHADE: u8 = 4;
pub const CC_ENVIRONMENT: u8 = 5;
pub const CC_ONE: u8 = 6;
pub const CC_TEXEL0_ALPHA: u8 = 8;
pub const CC_SHADE_ALPHA: u8 = 11;
pub const CC_ZERO: u8 = 7;
/// Any color C selector from 16 up reads zero
pub const CC_C_ZERO: u8 = 31;

// Raw alpha selector values
pub const AC_COMBINED: u8 = 0;
pub const AC_TEXEL0: u8 = 1;
pub const AC_TEXEL1: u8 = 2;
pub const AC_PRIMITIVE: u8 = 3;
pub const AC_SHADE: u8 = 4;
pub const AC_ENVIRONMENT: u8 = 5;
pub const AC_ONE: u8 = 6;
pub const AC_ZERO: u8 = 7;

/// Last valid index of the 8-entry tables
pub const ABD_TABLE_MAX: u8 = 7;
/// Last valid index of the 16-entry color C table
pub const COLOR_C_TABLE_MAX: u8 = 15;

/// One `(A - B) * C + D` equation, holding normalized table indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CombineStage {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
}

impl CombineStage {
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self { a, b, c, d }
    }

    /// Pack as `a<<12 | b<<8 | c<<4 | d`
    pub fn pack(self) -> u32 {
        (self.a as u32 & 0xF) << 12
            | (self.b as u32 & 0xF) << 8
            | (self.c as u32 & 0xF) << 4
            | (self.d as u32 & 0xF)
    }

    pub fn unpack(packed: u32) -> Self {
        Self {
            a: ((packed >> 12) & 0xF) as u8,
            b: ((packed >> 8) & 0xF) as u8,
            c: ((packed >> 4) & 0xF) as u8,
            d: (packed & 0xF) as u8,
        }
    }

    /// Index of the first selector outside its table, if any
    pub(crate) fn out_of_range(self, c_max: u8) -> Option<u8> {
        [self.a, self.b, self.d]
            .into_iter()
            .find(|&s| s > ABD_TABLE_MAX)
            .or((self.c > c_max).then_some(self.c))
    }
}

/// Both cycles of color and alpha equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CombineParams {
    pub color: [CombineStage; 2],
    pub alpha: [CombineStage; 2],
}

fn norm_color_a(raw: u32) -> u8 {
    // 7 is noise; 8 and up read zero
    match raw {
        0..=6 => raw as u8,
        _ => ABD_TABLE_MAX,
    }
}

fn norm_color_b(raw: u32) -> u8 {
    // 6 and 7 are the key center and YUV K4 constants
    match raw {
        0..=5 => raw as u8,
        _ => ABD_TABLE_MAX,
    }
}

fn norm_color_c(raw: u32) -> u8 {
    (raw as u8).min(COLOR_C_TABLE_MAX)
}

/// Decode `G_SETCOMBINE` words into normalized selectors
pub fn decode_combine_params(w0: u32, w1: u32) -> CombineParams {
    let f = |word: u32, shift: u32, mask: u32| (word >> shift) & mask;

    let color0 = CombineStage {
        a: norm_color_a(f(w0, 20, 0xF)),
        b: norm_color_b(f(w1, 28, 0xF)),
        c: norm_color_c(f(w0, 15, 0x1F)),
        d: f(w1, 15, 0x7) as u8,
    };
    let alpha0 = CombineStage {
        a: f(w0, 12, 0x7) as u8,
        b: f(w1, 12, 0x7) as u8,
        c: f(w0, 9, 0x7) as u8,
        d: f(w1, 9, 0x7) as u8,
    };
    let color1 = CombineStage {
        a: norm_color_a(f(w0, 5, 0xF)),
        b: norm_color_b(f(w1, 24, 0xF)),
        c: norm_color_c(f(w0, 0, 0x1F)),
        d: f(w1, 6, 0x7) as u8,
    };
    let alpha1 = CombineStage {
        a: f(w1, 21, 0x7) as u8,
        b: f(w1, 3, 0x7) as u8,
        c: f(w1, 18, 0x7) as u8,
        d: f(w1, 0, 0x7) as u8,
    };

    CombineParams {
        color: [color0, color1],
        alpha: [alpha0, alpha1],
    }
}

/// Encode raw selectors into `G_SETCOMBINE` words
///
/// Each stage is `(a, b, c, d)` in raw selector values.
pub fn encode_combine_words(
    color0: (u8, u8, u8, u8),
    alpha0: (u8, u8, u8, u8),
    color1: (u8, u8, u8, u8),
    alpha1: (u8, u8, u8, u8),
) -> (u32, u32) {
    let v = |x: u8, mask: u32| x as u32 & mask;
    let w0 = v(color0.0, 0xF) << 20
        | v(color0.2, 0x1F) << 15
        | v(alpha0.0, 0x7) << 12
        | v(alpha0.2, 0x7) << 9
        | v(color1.0, 0xF) << 5
        | v(color1.2, 0x1F);
    let w1 = v(color0.1, 0xF) << 28
        | v(color1.1, 0xF) << 24
        | v(alpha1.0, 0x7) << 21
        | v(alpha1.2, 0x7) << 18
        | v(color0.3, 0x7) << 15
        | v(alpha0.1, 0x7) << 12
        | v(alpha0.3, 0x7) << 9
        | v(color1.3, 0x7) << 6
        | v(alpha1.1, 0x7) << 3
        | v(alpha1.3, 0x7);
    (w0, w1)
}

/// Per-pixel combiner inputs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CombinerInputs {
    pub texel0: Vec4,
    pub texel1: Vec4,
    pub primitive: Vec4,
    pub shade: Vec4,
    pub environment: Vec4,
}

impl CombinerInputs {
    fn color_abd(&self, combined: Vec4, sel: u8) -> Vec3 {
        match sel {
            0 => combined.truncate(),
            1 => self.texel0.truncate(),
            2 => self.texel1.truncate(),
            3 => self.primitive.truncate(),
            4 => self.shade.truncate(),
            5 => self.environment.truncate(),
            6 => Vec3::ONE,
            _ => Vec3::ZERO,
        }
    }

    fn color_c(&self, combined: Vec4, sel: u8) -> Vec3 {
        match sel {
            0..=5 => self.color_abd(combined, sel),
            7 => Vec3::splat(combined.w),
            8 => Vec3::splat(self.texel0.w),
            9 => Vec3::splat(self.texel1.w),
            10 => Vec3::splat(self.primitive.w),
            11 => Vec3::splat(self.shade.w),
            12 => Vec3::splat(self.environment.w),
            _ => Vec3::ZERO,
        }
    }

    fn alpha_abd(&self, combined: Vec4, sel: u8) -> f32 {
        match sel {
            0 => combined.w,
            1 => self.texel0.w,
            2 => self.texel1.w,
            3 => self.primitive.w,
            4 => self.shade.w,
            5 => self.environment.w,
            6 => 1.0,
            _ => 0.0,
        }
    }

    fn alpha_c(&self, combined: Vec4, sel: u8) -> f32 {
        match sel {
            // LOD fraction
            0 => 0.0,
            1..=5 => self.alpha_abd(combined, sel),
            _ => 0.0,
        }
    }
}

impl CombineParams {
    /// Evaluate one cycle without clamping
    pub fn evaluate_cycle(&self, cycle: usize, inputs: &CombinerInputs, combined: Vec4) -> Vec4 {
        let c = self.color[cycle];
        let a = self.alpha[cycle];
        let rgb = (inputs.color_abd(combined, c.a) - inputs.color_abd(combined, c.b))
            * inputs.color_c(combined, c.c)
            + inputs.color_abd(combined, c.d);
        let alpha = (inputs.alpha_abd(combined, a.a) - inputs.alpha_abd(combined, a.b))
            * inputs.alpha_c(combined, a.c)
            + inputs.alpha_abd(combined, a.d);
        rgb.extend(alpha)
    }

    /// Full combiner output, clamped to `[0, 1]` after each cycle
    pub fn evaluate(&self, inputs: &CombinerInputs, two_cycle: bool) -> Vec4 {
        let mut out = self
            .evaluate_cycle(0, inputs, Vec4::ZERO)
            .clamp(Vec4::ZERO, Vec4::ONE);
        if two_cycle {
            out = self.evaluate_cycle(1, inputs, out).clamp(Vec4::ZERO, Vec4::ONE);
        }
        out
    }
}
