//! WGSL generation for N64 fixed-function state
//!
//! A single template carries `//NAME` placeholder lines. [`generate_shader`]
//! fills them from a [`ShaderConfig`]:
//!
//! - sampling function for the texture filter (point, 2x2 average, or the
//!   RDP's three-sample bilinear)
//! - packed combiner selectors as `const` values
//! - the second combine cycle, only in two-cycle mode
//! - alpha discard, only when an alpha test threshold applies
//! - vertex lighting, texgen, fog and flat/smooth shade interpolation

mod config;
mod error;
mod snippets;
mod templates;


pub use config::{ShaderConfig, ShaderDefines};
pub use error::ShaderGenError;
pub use templates::get_template;

use crate::combiner::{ABD_TABLE_MAX, COLOR_C_TABLE_MAX};
use crate::rdp::{RdpState, TextureFilter};

/// Shader source plus the switches it was generated with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedShader {
    pub source: String,
    pub defines: ShaderDefines,
}

/// Generate WGSL for a configuration
///
/// # Errors
///
/// Returns `ShaderGenError::InvalidCombineSelector` if a combiner stage
/// indexes past its lookup table.
pub fn generate_shader(config: &ShaderConfig) -> Result<GeneratedShader, ShaderGenError> {
    let cycles = if config.two_cycle { 2 } else { 1 };
    for cycle in 0..cycles {
        let bad = config.combine.color[cycle]
            .out_of_range(COLOR_C_TABLE_MAX)
            .or(config.combine.alpha[cycle].out_of_range(ABD_TABLE_MAX));
        if let Some(selector) = bad {
            return Err(ShaderGenError::InvalidCombineSelector { cycle, selector });
        }
    }

    let mut shader = get_template().to_string();

    shader = shader.replace(
        "//SHADE_INTERP",
        if config.shade_smooth { "" } else { snippets::SHADE_FLAT },
    );
    shader = shader.replace(
        "//VS_LIGHTING",
        if config.lighting { snippets::VS_LIGHTING } else { "" },
    );
    shader = shader.replace(
        "//VS_TEXGEN",
        if config.texgen { snippets::VS_TEXGEN } else { "" },
    );
    shader = shader.replace("//VS_FOG", if config.fog { snippets::VS_FOG } else { "" });

    let sample_fn = match config.texture_filter {
        TextureFilter::Point => snippets::SAMPLE_POINT,
        TextureFilter::Average => snippets::SAMPLE_AVERAGE,
        TextureFilter::Bilerp => snippets::SAMPLE_BILERP3,
    };
    shader = shader.replace("//SAMPLE_FN", sample_fn);

    shader = shader.replace("//COMBINE_CONSTS", &combine_consts(config));
    shader = shader.replace(
        "//FS_CYCLE2",
        if config.two_cycle { snippets::FS_CYCLE2 } else { "" },
    );

    let alpha_test = config
        .alpha_test
        .map(|test| format!("if (out.a < {:?}) {{\n        discard;\n    }}", test.threshold()))
        .unwrap_or_default();
    shader = shader.replace("//FS_ALPHA_TEST", &alpha_test);
    shader = shader.replace("//FS_FOG", if config.fog { snippets::FS_FOG } else { "" });

    Ok(GeneratedShader {
        source: shader,
        defines: config.defines(),
    })
}

/// Decode registers and generate in one step
pub fn generate_for_registers(state: &RdpState) -> Result<GeneratedShader, ShaderGenError> {
    generate_shader(&ShaderConfig::from_registers(state)?)
}

fn combine_consts(config: &ShaderConfig) -> String {
    let c = &config.combine;
    let mut out = String::new();
    for (name, packed) in [
        ("COLOR_CYCLE0", c.color[0].pack()),
        ("ALPHA_CYCLE0", c.alpha[0].pack()),
        ("COLOR_CYCLE1", c.color[1].pack()),
        ("ALPHA_CYCLE1", c.alpha[1].pack()),
    ] {
        out.push_str(&format!("const {}: u32 = 0x{:04X}u;\n", name, packed));
    }
    out
}
