use crate::combiner::{CombineParams, decode_combine_params};
use crate::rdp::{CycleType, RdpState, TextureFilter};
use crate::render_state::{AlphaTest, GeometryMode};

use super::ShaderGenError;

/// Every input that changes the generated shader text
///
/// Two registers states with equal configs share one shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderConfig {
    pub two_cycle: bool,
    pub texture_filter: TextureFilter,
    pub alpha_test: Option<AlphaTest>,
    pub combine: CombineParams,
    pub texgen: bool,
    pub lighting: bool,
    pub shade_smooth: bool,
    pub fog: bool,
}

/// Named boolean switches of a [`ShaderConfig`]
pub type ShaderDefines = [(&'static str, bool); 9];

impl ShaderConfig {
    pub fn from_registers(state: &RdpState) -> Result<Self, ShaderGenError> {
        let two_cycle = match state.cycle_type() {
            CycleType::One => false,
            CycleType::Two => true,
            other => return Err(ShaderGenError::InvalidCycleType(other.bits())),
        };
        let (w0, w1) = state.combine;
        let geometry = state.geometry_mode;

        Ok(Self {
            two_cycle,
            texture_filter: state.texture_filter()?,
            alpha_test: AlphaTest::from_other_mode_l(state.other_mode_l),
            combine: decode_combine_params(w0, w1),
            texgen: geometry.contains(GeometryMode::TEXTURE_GEN),
            lighting: geometry.contains(GeometryMode::LIGHTING),
            shade_smooth: geometry.contains(GeometryMode::SHADING_SMOOTH),
            fog: geometry.contains(GeometryMode::FOG),
        })
    }

    pub fn defines(&self) -> ShaderDefines {
        [
            ("TWO_CYCLE", self.two_cycle),
            ("USE_ALPHA_TEST", self.alpha_test.is_some()),
            ("TEXFILTER_POINT", self.texture_filter == TextureFilter::Point),
            ("TEXFILTER_AVERAGE", self.texture_filter == TextureFilter::Average),
            ("TEXFILTER_BILERP", self.texture_filter == TextureFilter::Bilerp),
            ("USE_TEXGEN", self.texgen),
            ("USE_LIGHTING", self.lighting),
            ("USE_SHADE_SMOOTH", self.shade_smooth),
            ("USE_FOG", self.fog),
        ]
    }
}
