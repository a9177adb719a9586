//! CPU texture sampling matching the generated shaders

use glam::{IVec2, Vec2, Vec4};

use crate::rdp::TextureFilter;

/// Borrowed RGBA texels with repeat wrapping
#[derive(Debug, Clone, Copy)]
pub struct TexelGrid<'a> {
    texels: &'a [Vec4],
    width: i32,
    height: i32,
}

impl<'a> TexelGrid<'a> {
    /// `None` if the slice does not hold `width * height` texels
    pub fn new(texels: &'a [Vec4], width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize).checked_mul(height as usize)?;
        if width == 0 || height == 0 || texels.len() != expected {
            return None;
        }
        Some(Self {
            texels,
            width: width as i32,
            height: height as i32,
        })
    }

    pub fn fetch(&self, coord: IVec2) -> Vec4 {
        let x = coord.x.rem_euclid(self.width);
        let y = coord.y.rem_euclid(self.height);
        self.texels[(y * self.width + x) as usize]
    }

    /// Sample at normalized `uv`
    pub fn sample(&self, filter: TextureFilter, uv: Vec2) -> Vec4 {
        let size = Vec2::new(self.width as f32, self.height as f32);
        match filter {
            TextureFilter::Point => self.fetch((uv * size).floor().as_ivec2()),
            TextureFilter::Average => {
                let base = (uv * size - 0.5).floor().as_ivec2();
                (self.fetch(base)
                    + self.fetch(base + IVec2::X)
                    + self.fetch(base + IVec2::Y)
                    + self.fetch(base + IVec2::ONE))
                    * 0.25
            }
            TextureFilter::Bilerp => self.sample_three_tap(uv * size - 0.5),
        }
    }

    /// Blend the three texels nearest `p`, mirroring into the upper triangle
    /// when the fractional offsets sum to one or more
    fn sample_three_tap(&self, p: Vec2) -> Vec4 {
        let base = p.floor();
        let mut f = p - base;
        let mut origin = base.as_ivec2();
        let mut delta = IVec2::ONE;
        if f.x + f.y >= 1.0 {
            origin += IVec2::ONE;
            delta = IVec2::NEG_ONE;
            f = Vec2::ONE - f;
        }
        let c0 = self.fetch(origin);
        let c1 = self.fetch(origin + IVec2::new(delta.x, 0));
        let c2 = self.fetch(origin + IVec2::new(0, delta.y));
        c0 + (c1 - c0) * f.x + (c2 - c0) * f.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 checker of distinct grey levels: (0,0)=0.0 (1,0)=0.25 (0,1)=0.5 (1,1)=1.0
    fn grid() -> Vec<Vec4> {
        [0.0, 0.25, 0.5, 1.0].into_iter().map(Vec4::splat).collect()
    }

    fn uv_of_texel_space(p: Vec2) -> Vec2 {
        (p + 0.5) / 2.0
    }

    #[test]
    fn test_rejects_mismatched_size() {
        let texels = grid();
        assert!(TexelGrid::new(&texels, 3, 2).is_none());
        assert!(TexelGrid::new(&texels, 0, 0).is_none());
        assert!(TexelGrid::new(&texels, 2, 2).is_some());
    }

    #[test]
    fn test_fetch_wraps() {
        let texels = grid();
        let g = TexelGrid::new(&texels, 2, 2).unwrap();
        assert_eq!(g.fetch(IVec2::new(-1, 0)).x, 0.25);
        assert_eq!(g.fetch(IVec2::new(2, 3)).x, 0.5);
    }

    #[test]
    fn test_three_tap_exact_at_texel_centre() {
        let texels = grid();
        let g = TexelGrid::new(&texels, 2, 2).unwrap();
        let v = g.sample(TextureFilter::Bilerp, uv_of_texel_space(Vec2::new(1.0, 0.0)));
        assert!((v.x - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_three_tap_lower_triangle() {
        let texels = grid();
        let g = TexelGrid::new(&texels, 2, 2).unwrap();
        // f = (0.25, 0.25): c00 + 0.25 (c10 - c00) + 0.25 (c01 - c00)
        let v = g.sample(TextureFilter::Bilerp, uv_of_texel_space(Vec2::new(0.25, 0.25)));
        assert!((v.x - (0.25 * 0.25 + 0.25 * 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_three_tap_mirrors_upper_triangle() {
        let texels = grid();
        let g = TexelGrid::new(&texels, 2, 2).unwrap();
        // f = (0.75, 0.75) mirrors to (0.25, 0.25) from the (1, 1) corner
        let v = g.sample(TextureFilter::Bilerp, uv_of_texel_space(Vec2::new(0.75, 0.75)));
        let expected = 1.0 + 0.25 * (0.5 - 1.0) + 0.25 * (0.25 - 1.0);
        assert!((v.x - expected).abs() < 1e-6);

        // Four-tap bilinear would give a different value here
        let four_tap = 0.0625 * 0.0 + 0.1875 * 0.25 + 0.1875 * 0.5 + 0.5625 * 1.0;
        assert!((v.x - four_tap).abs() > 1e-3);
    }

    #[test]
    fn test_three_tap_continuous_on_diagonal() {
        let texels = grid();
        let g = TexelGrid::new(&texels, 2, 2).unwrap();
        let below = g.sample(TextureFilter::Bilerp, uv_of_texel_space(Vec2::new(0.3, 0.7 - 1e-4)));
        let above = g.sample(TextureFilter::Bilerp, uv_of_texel_space(Vec2::new(0.3, 0.7 + 1e-4)));
        assert!((below.x - above.x).abs() < 1e-3);
    }

    #[test]
    fn test_point_and_average() {
        let texels = grid();
        let g = TexelGrid::new(&texels, 2, 2).unwrap();
        assert_eq!(g.sample(TextureFilter::Point, Vec2::new(0.9, 0.9)).x, 1.0);
        let avg = g.sample(TextureFilter::Average, Vec2::new(0.5, 0.5));
        assert!((avg.x - 0.4375).abs() < 1e-6);
    }
}
