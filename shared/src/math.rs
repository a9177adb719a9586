//! Math types for retroview
//!
//! Provides POD matrix storage for bone/node outputs plus a few glam helpers
//! shared by the animation and rail crates.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// 3x4 affine matrix (row-major storage, POD type)
///
/// Stores the top three rows of a 4x4 affine matrix. The implicit 4th row is
/// `[0, 0, 0, 1]`. This is the "4x3 without the bottom row" form consumers
/// upload for bone and node matrices.
///
/// Memory layout (48 bytes):
/// - row0: rotation row 0 + translation X
/// - row1: rotation row 1 + translation Y
/// - row2: rotation row 2 + translation Z
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct AffineMatrix3x4 {
    /// First row: [m00, m01, m02, tx]
    pub row0: [f32; 4],
    /// Second row: [m10, m11, m12, ty]
    pub row1: [f32; 4],
    /// Third row: [m20, m21, m22, tz]
    pub row2: [f32; 4],
}

const _: () = assert!(core::mem::size_of::<AffineMatrix3x4>() == 48);

impl AffineMatrix3x4 {
    /// Identity matrix (no transformation)
    pub const IDENTITY: Self = Self {
        row0: [1.0, 0.0, 0.0, 0.0],
        row1: [0.0, 1.0, 0.0, 0.0],
        row2: [0.0, 0.0, 1.0, 0.0],
    };

    /// Drop the bottom row of a glam (column-major) matrix
    pub fn from_mat4(m: &Mat4) -> Self {
        let r0 = m.row(0);
        let r1 = m.row(1);
        let r2 = m.row(2);
        Self {
            row0: r0.to_array(),
            row1: r1.to_array(),
            row2: r2.to_array(),
        }
    }

    /// Rebuild the full 4x4 with the implicit `[0, 0, 0, 1]` bottom row
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::new(self.row0[0], self.row1[0], self.row2[0], 0.0),
            Vec4::new(self.row0[1], self.row1[1], self.row2[1], 0.0),
            Vec4::new(self.row0[2], self.row1[2], self.row2[2], 0.0),
            Vec4::new(self.row0[3], self.row1[3], self.row2[3], 1.0),
        )
    }

    /// Flat f32 array for GPU upload (row-major)
    pub fn to_array(&self) -> [f32; 12] {
        let mut out = [0.0; 12];
        out[0..4].copy_from_slice(&self.row0);
        out[4..8].copy_from_slice(&self.row1);
        out[8..12].copy_from_slice(&self.row2);
        out
    }

    /// Create from flat f32 array (row-major)
    pub fn from_array(arr: [f32; 12]) -> Self {
        Self {
            row0: [arr[0], arr[1], arr[2], arr[3]],
            row1: [arr[4], arr[5], arr[6], arr[7]],
            row2: [arr[8], arr[9], arr[10], arr[11]],
        }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let dot = |row: &[f32; 4]| row[0] * p.x + row[1] * p.y + row[2] * p.z + row[3];
        Vec3::new(dot(&self.row0), dot(&self.row1), dot(&self.row2))
    }
}

impl From<Mat4> for AffineMatrix3x4 {
    fn from(m: Mat4) -> Self {
        Self::from_mat4(&m)
    }
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise closeness check used by tests and the blend code
pub fn vec3_is_near(a: Vec3, b: Vec3, epsilon: f32) -> bool {
    (a - b).abs().max_element() <= epsilon
}

/// Rotation closeness: `q` and `-q` describe the same rotation
pub fn quat_is_near(a: Quat, b: Quat, epsilon: f32) -> bool {
    a.dot(b).abs() >= 1.0 - epsilon
}
