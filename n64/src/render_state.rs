//! Translation of RDP/RSP mode registers into host render state

use crate::rdp::{
    self, ALPHA_CVG_SEL, BL_1MA, BL_A_IN, BL_CLR_IN, BL_CLR_MEM, BL_ONE, CVG_X_ALPHA, FORCE_BL,
    G_MDSFT_ALPHACOMPARE, Z_CMP, Z_UPD, ZMODE_DEC, ZMODE_SHIFT,
};

bitflags::bitflags! {
    /// RSP geometry mode (F3DEX2 bit assignments)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GeometryMode: u32 {
        const ZBUFFER = 0x0000_0001;
        const SHADE = 0x0000_0004;
        const CULL_FRONT = 0x0000_0200;
        const CULL_BACK = 0x0000_0400;
        const FOG = 0x0001_0000;
        const LIGHTING = 0x0002_0000;
        const TEXTURE_GEN = 0x0004_0000;
        const TEXTURE_GEN_LINEAR = 0x0008_0000;
        const SHADING_SMOOTH = 0x0020_0000;
    }
}

/// Cull mode for face culling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// No face culling
    #[default]
    None,
    /// Cull back faces
    Back,
    /// Cull front faces
    Front,
    /// Both bits set: nothing is drawn
    FrontAndBack,
}

pub fn translate_cull_mode(mode: GeometryMode) -> CullMode {
    match (
        mode.contains(GeometryMode::CULL_FRONT),
        mode.contains(GeometryMode::CULL_BACK),
    ) {
        (false, false) => CullMode::None,
        (false, true) => CullMode::Back,
        (true, false) => CullMode::Front,
        (true, true) => CullMode::FrontAndBack,
    }
}

/// Alpha test source, each with a fixed discard threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaTest {
    /// Compare against the blend color alpha
    BlendColor,
    /// Dithered compare
    Dither,
    /// Coverage times alpha
    Coverage,
}

impl AlphaTest {
    pub fn from_other_mode_l(other_mode_l: u32) -> Option<Self> {
        match rdp::field(other_mode_l, G_MDSFT_ALPHACOMPARE, 2) {
            0b01 => Some(AlphaTest::BlendColor),
            0 if other_mode_l & CVG_X_ALPHA != 0 => Some(AlphaTest::Coverage),
            0 => None,
            _ => Some(AlphaTest::Dither),
        }
    }

    /// Fragments with alpha below this are discarded
    pub fn threshold(self) -> f32 {
        match self {
            AlphaTest::BlendColor => 0.5,
            AlphaTest::Dither => 0.0125,
            AlphaTest::Coverage => 0.125,
        }
    }
}

pub fn alpha_test_threshold(other_mode_l: u32) -> Option<f32> {
    AlphaTest::from_other_mode_l(other_mode_l).map(AlphaTest::threshold)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

impl BlendFunc {
    pub const ALPHA: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };
    pub const ADDITIVE: Self = Self {
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::One,
    };
}

/// Host-side blend and depth configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlendState {
    /// `None` for opaque output
    pub blend: Option<BlendFunc>,
    pub depth_test: bool,
    pub depth_write: bool,
    /// Decal geometry needs a depth bias to win against coplanar surfaces
    pub decal_offset: bool,
    /// Coverage replaces alpha (cutout surfaces)
    pub alpha_to_coverage: bool,
}

/// Derive blend and depth state from Other Mode L
///
/// The second blender cycle decides the blend: in one-cycle mode both cycle
/// words carry the same inputs, in two-cycle mode the first is usually fog.
pub fn translate_blend_mode(other_mode_l: u32) -> BlendState {
    let cycle = rdp::blender_cycle(other_mode_l, 1);
    let blend = if other_mode_l & FORCE_BL == 0 || cycle.p != BL_CLR_IN || cycle.m != BL_CLR_MEM {
        None
    } else {
        match (cycle.a, cycle.b) {
            (BL_A_IN, BL_1MA) => Some(BlendFunc::ALPHA),
            (BL_A_IN, BL_ONE) => Some(BlendFunc::ADDITIVE),
            (a, b) => {
                tracing::trace!("unhandled blender inputs a={} b={}; drawing opaque", a, b);
                None
            }
        }
    };

    BlendState {
        blend,
        depth_test: other_mode_l & Z_CMP != 0,
        depth_write: other_mode_l & Z_UPD != 0,
        decal_offset: rdp::field(other_mode_l, ZMODE_SHIFT, 2) == ZMODE_DEC,
        alpha_to_coverage: other_mode_l & (CVG_X_ALPHA | ALPHA_CVG_SEL) == (CVG_X_ALPHA | ALPHA_CVG_SEL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdp::{BL_A_MEM, BL_CLR_FOG, BL_A_SHADE, BlenderCycle, blender_bits};

    fn render_mode(fog_first: bool, surface: BlenderCycle) -> u32 {
        let first = if fog_first {
            BlenderCycle {
                p: BL_CLR_FOG,
                a: BL_A_SHADE,
                m: BL_CLR_IN,
                b: BL_1MA,
            }
        } else {
            surface
        };
        blender_bits(0, first) | blender_bits(1, surface)
    }

    const XLU: BlenderCycle = BlenderCycle {
        p: BL_CLR_IN,
        a: BL_A_IN,
        m: BL_CLR_MEM,
        b: BL_1MA,
    };

    #[test]
    fn test_alpha_threshold_selection() {
        assert_eq!(alpha_test_threshold(0b01), Some(0.5));
        assert_eq!(alpha_test_threshold(0b11), Some(0.0125));
        assert_eq!(alpha_test_threshold(0b10), Some(0.0125));
        assert_eq!(alpha_test_threshold(CVG_X_ALPHA), Some(0.125));
        // Compare bits win over coverage
        assert_eq!(alpha_test_threshold(CVG_X_ALPHA | 0b01), Some(0.5));
        assert_eq!(alpha_test_threshold(0), None);
    }

    #[test]
    fn test_translucent_surface_blends() {
        let word = render_mode(false, XLU) | FORCE_BL | Z_CMP;
        let state = translate_blend_mode(word);
        assert_eq!(state.blend, Some(BlendFunc::ALPHA));
        assert!(state.depth_test);
        assert!(!state.depth_write);
        assert!(!state.decal_offset);
    }

    #[test]
    fn test_fog_cycle_is_ignored_for_blend() {
        let add = BlenderCycle { b: BL_ONE, ..XLU };
        let state = translate_blend_mode(render_mode(true, add) | FORCE_BL);
        assert_eq!(state.blend, Some(BlendFunc::ADDITIVE));
    }

    #[test]
    fn test_opaque_without_force_blend() {
        let state = translate_blend_mode(render_mode(false, XLU) | Z_CMP | Z_UPD);
        assert_eq!(state.blend, None);
        assert!(state.depth_write);

        let mem = BlenderCycle { b: BL_A_MEM, ..XLU };
        assert_eq!(translate_blend_mode(render_mode(false, mem) | FORCE_BL).blend, None);
    }

    #[test]
    fn test_decal_and_coverage() {
        let state = translate_blend_mode(ZMODE_DEC << ZMODE_SHIFT | CVG_X_ALPHA | ALPHA_CVG_SEL);
        assert!(state.decal_offset);
        assert!(state.alpha_to_coverage);
    }

    #[test]
    fn test_cull_mode_from_geometry_mode() {
        assert_eq!(translate_cull_mode(GeometryMode::SHADE), CullMode::None);
        assert_eq!(translate_cull_mode(GeometryMode::CULL_BACK), CullMode::Back);
        assert_eq!(translate_cull_mode(GeometryMode::CULL_FRONT), CullMode::Front);
        assert_eq!(
            translate_cull_mode(GeometryMode::CULL_FRONT | GeometryMode::CULL_BACK),
            CullMode::FrontAndBack
        );
    }
}
