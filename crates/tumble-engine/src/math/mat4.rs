use core::ops::{Index, Mul};

/// 4x4 `f32` matrix stored by rows.
///
/// `m[r][c]` reads row `r`, column `c`. Use [`Mat4::to_cols_array`] when the
/// matrix leaves the CPU.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    rows: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub const ZERO: Mat4 = Mat4::from_rows([[0.0; 4]; 4]);

    #[inline]
    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    /// Symmetric-frustum perspective projection (right-handed, clip z in
    /// `[-w, w]`).
    ///
    /// No argument checks: `fov_y` outside `(0, π)`, `near <= 0` or
    /// `far <= near` produce a degenerate matrix. See
    /// [`crate::transform::compute_projection`] for the checked entry point.
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let depth = near - far;

        let mut m = Self::ZERO;
        m.rows[0][0] = f / aspect;
        m.rows[1][1] = f;
        m.rows[2][2] = (far + near) / depth;
        m.rows[2][3] = (2.0 * far * near) / depth;
        m.rows[3][2] = -1.0;
        m
    }

    /// Rotation about +Y by `angle` radians (counter-clockwise looking down -Y).
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.rows[0][3] = x;
        m.rows[1][3] = y;
        m.rows[2][3] = z;
        m
    }

    #[inline]
    pub fn rows(&self) -> &[[f32; 4]; 4] {
        &self.rows
    }

    pub fn transpose(&self) -> Self {
        let mut out = Self::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.rows[c][r] = self.rows[r][c];
            }
        }
        out
    }

    /// Flattens the matrix column by column.
    pub fn to_cols_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for c in 0..4 {
            for r in 0..4 {
                out[c * 4 + r] = self.rows[r][c];
            }
        }
        out
    }

    /// Applies the matrix to a homogeneous column vector.
    pub fn transform(&self, v: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0; 4];
        for (r, row) in self.rows.iter().enumerate() {
            out[r] = row[0] * v[0] + row[1] * v[1] + row[2] * v[2] + row[3] * v[3];
        }
        out
    }

    /// Applies the matrix to a point (`w = 1`).
    #[inline]
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 4] {
        self.transform([p[0], p[1], p[2], 1.0])
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Mat4 {
    type Output = [f32; 4];

    #[inline]
    fn index(&self, row: usize) -> &[f32; 4] {
        &self.rows[row]
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = Mat4::ZERO;
        for r in 0..4 {
            for c in 0..4 {
                out.rows[r][c] = (0..4).map(|k| self.rows[r][k] * rhs.rows[k][c]).sum();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() <= EPS
    }

    fn approx_mat(a: &Mat4, b: &Mat4) -> bool {
        a.rows().iter().flatten().zip(b.rows().iter().flatten()).all(|(x, y)| approx(*x, *y))
    }

    // ── identity ──────────────────────────────────────────────────────────

    #[test]
    fn identity_is_neutral_for_mul() {
        let m = Mat4::translate(1.0, 2.0, 3.0) * Mat4::rotation_y(0.3);
        assert_eq!(Mat4::IDENTITY * m, m);
        assert_eq!(m * Mat4::IDENTITY, m);
    }

    #[test]
    fn default_is_identity() {
        assert_eq!(Mat4::default(), Mat4::identity());
    }

    // ── perspective ───────────────────────────────────────────────────────

    #[test]
    fn perspective_entries() {
        let (fov, aspect, near, far) = (2.0_f32, 640.0 / 480.0, 0.1, 100.0);
        let m = Mat4::perspective(fov, aspect, near, far);
        let f = 1.0 / (fov / 2.0).tan();

        assert!(approx(m[0][0], f / aspect));
        assert!(approx(m[1][1], f));
        assert!(approx(m[2][2], (far + near) / (near - far)));
        assert!(approx(m[2][3], 2.0 * far * near / (near - far)));
        assert_eq!(m[3][2], -1.0);
        assert_eq!(m[3][3], 0.0);
        assert_eq!(m[0][1], 0.0);
    }

    #[test]
    fn perspective_maps_near_and_far_to_clip_bounds() {
        let m = Mat4::perspective(1.0, 1.0, 0.5, 10.0);

        let near = m.transform_point([0.0, 0.0, -0.5]);
        assert!(approx(near[2] / near[3], -1.0));

        let far = m.transform_point([0.0, 0.0, -10.0]);
        assert!(approx(far[2] / far[3], 1.0));
    }

    // ── rotation_y ────────────────────────────────────────────────────────

    #[test]
    fn rotation_y_zero_is_identity() {
        assert_eq!(Mat4::rotation_y(0.0), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_y_quarter_turn_maps_x_to_negative_z() {
        let p = Mat4::rotation_y(core::f32::consts::FRAC_PI_2).transform_point([1.0, 0.0, 0.0]);
        assert!(approx(p[0], 0.0));
        assert!(approx(p[1], 0.0));
        assert!(approx(p[2], -1.0));
    }

    #[test]
    fn rotation_y_leaves_y_axis_fixed() {
        let p = Mat4::rotation_y(1.234).transform_point([0.0, 3.0, 0.0]);
        assert!(approx(p[1], 3.0));
        assert!(approx(p[0], 0.0) && approx(p[2], 0.0));
    }

    #[test]
    fn rotation_y_composes_additively() {
        let ab = Mat4::rotation_y(0.4) * Mat4::rotation_y(0.7);
        assert!(approx_mat(&ab, &Mat4::rotation_y(1.1)));
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn translate_moves_points_not_directions() {
        let m = Mat4::translate(1.0, -2.0, 3.0);
        assert_eq!(m.transform_point([1.0, 1.0, 1.0]), [2.0, -1.0, 4.0, 1.0]);
        assert_eq!(m.transform([1.0, 1.0, 1.0, 0.0]), [1.0, 1.0, 1.0, 0.0]);
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn cols_array_puts_translation_in_last_column() {
        let cols = Mat4::translate(4.0, 5.0, 6.0).to_cols_array();
        assert_eq!(&cols[12..16], &[4.0, 5.0, 6.0, 1.0]);
        assert_eq!(&cols[0..4], &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Mat4::translate(7.0, 8.0, 9.0);
        let t = m.transpose();
        assert_eq!(t[3][0], 7.0);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn mul_applies_right_operand_first() {
        // Translate after rotating: the translation is not rotated.
        let m = Mat4::translate(0.0, 0.0, -2.0) * Mat4::rotation_y(core::f32::consts::PI);
        let p = m.transform_point([1.0, 0.0, 0.0]);
        assert!(approx(p[0], -1.0));
        assert!(approx(p[2], -2.0));
    }
}
