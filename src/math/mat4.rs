//! 4x4 matrices stored as flat arrays in column-major order
//!
//! The matrix dimension is fixed, so a plain `[f32; 16]` is all we need;
//! uniform uploads take the slice directly.

/// A 4x4 matrix, column-major. Element (row, col) lives at `0[col * 4 + row]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    #[rustfmt::skip]
    pub const IDENTITY: Mat4 = Mat4([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Pure translation matrix.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.0[12] = x;
        m.0[13] = y;
        m.0[14] = z;
        m
    }

    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }
}

/// The z-range and field-of-view half of a perspective projection.
///
/// The aspect ratio is deliberately not part of this struct: it is the only
/// piece that changes on window resize, so it is supplied per call to
/// [`matrix`](Self::matrix) and everything here stays untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveParams {
    frustum_scale: f32,
    z_near: f32,
    z_far: f32,
}

impl PerspectiveParams {
    /// Requires `0 < z_near < z_far`.
    pub fn new(frustum_scale: f32, z_near: f32, z_far: f32) -> Self {
        assert!(
            z_near > 0.0 && z_near < z_far,
            "perspective range must satisfy 0 < z_near < z_far, got {z_near}..{z_far}"
        );
        Self {
            frustum_scale,
            z_near,
            z_far,
        }
    }

    /// Derives the frustum scale from a vertical field of view in degrees:
    /// `frustum_scale = 1 / tan(fov / 2)`.
    pub fn from_fov_degrees(fov_degrees: f32, z_near: f32, z_far: f32) -> Self {
        let frustum_scale = 1.0 / (fov_degrees.to_radians() / 2.0).tan();
        Self::new(frustum_scale, z_near, z_far)
    }

    pub fn frustum_scale(&self) -> f32 {
        self.frustum_scale
    }

    /// The standard right-handed OpenGL perspective matrix, camera looking
    /// down -Z:
    ///
    /// ```text
    /// [ s/a  0    0                          0                         ]
    /// [ 0    s    0                          0                         ]
    /// [ 0    0    (far+near)/(near-far)      2*far*near/(near-far)     ]
    /// [ 0    0    -1                         0                         ]
    /// ```
    ///
    /// where `s` is the frustum scale and `a` the viewport aspect ratio.
    pub fn matrix(&self, aspect_ratio: f32) -> Mat4 {
        let mut m = [0.0f32; 16];
        m[0] = self.frustum_scale / aspect_ratio;
        m[5] = self.frustum_scale;
        m[10] = (self.z_far + self.z_near) / (self.z_near - self.z_far);
        m[14] = 2.0 * self.z_far * self.z_near / (self.z_near - self.z_far);
        m[11] = -1.0;
        Mat4(m)
    }
}
