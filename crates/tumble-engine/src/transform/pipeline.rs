use thiserror::Error;

use crate::math::Mat4;
use crate::time::Tick;

use super::CameraConfig;

/// Radians of rotation per tick.
pub const ROTATION_RATE: f32 = 1.0 / 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    /// `near == far` makes the depth terms divide by zero.
    #[error("degenerate depth range: near ({near}) equals far ({far})")]
    DegenerateDepthRange { near: f32, far: f32 },
}

/// Builds the perspective projection.
///
/// Only the `near == far` case is rejected. Other out-of-range inputs
/// (`fov` outside `(0, π)`, `near <= 0`, `far < near`) are the caller's
/// responsibility and yield a degenerate matrix.
pub fn compute_projection(
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
) -> Result<Mat4, TransformError> {
    if near == far {
        return Err(TransformError::DegenerateDepthRange { near, far });
    }
    Ok(Mat4::perspective(fov, aspect_ratio, near, far))
}

/// Model matrix for `tick`: a rotation about +Y by `tick * ROTATION_RATE`.
///
/// The angle is reduced to `[0, 2π)` before narrowing to `f32`, so late
/// ticks rotate as smoothly as early ones.
#[inline]
pub fn advance_model(tick: Tick) -> Mat4 {
    let angle = (tick.value() * f64::from(ROTATION_RATE)).rem_euclid(std::f64::consts::TAU);
    Mat4::rotation_y(angle as f32)
}

/// Camera pulled back `distance` units along +Z, i.e. the world moved by
/// `-distance`.
#[inline]
pub fn view_matrix(distance: f32) -> Mat4 {
    Mat4::translate(0.0, 0.0, -distance)
}

/// The three matrices uploaded every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransformState {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl TransformState {
    /// Computes view and projection once; the model starts at identity.
    pub fn new(camera: &CameraConfig) -> Result<Self, TransformError> {
        let projection =
            compute_projection(camera.fov, camera.aspect_ratio, camera.near, camera.far)?;

        log::debug!(
            "projection: fov={} aspect={} near={} far={}",
            camera.fov,
            camera.aspect_ratio,
            camera.near,
            camera.far
        );

        Ok(Self {
            model: Mat4::IDENTITY,
            view: view_matrix(camera.view_distance),
            projection,
        })
    }

    /// Replaces the model matrix for `tick`. View and projection are untouched.
    #[inline]
    pub fn advance(&mut self, tick: Tick) {
        self.model = advance_model(tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── advance_model ─────────────────────────────────────────────────────

    #[test]
    fn advance_model_at_zero_is_identity() {
        assert_eq!(advance_model(Tick::ZERO), Mat4::IDENTITY);
    }

    #[test]
    fn advance_model_is_pure() {
        for t in [0.0, 1.0, 57.0, 12_345.0] {
            let a = advance_model(Tick::new(t));
            let b = advance_model(Tick::new(t));
            assert_eq!(a.to_cols_array().map(f32::to_bits), b.to_cols_array().map(f32::to_bits));
        }
    }

    #[test]
    fn advance_model_angle_scales_with_tick() {
        assert_eq!(advance_model(Tick::new(150.0)), Mat4::rotation_y(150.0 * ROTATION_RATE));
        assert_eq!(ROTATION_RATE, 0.01);
    }

    #[test]
    fn advance_model_keeps_turning_on_long_runs() {
        let late = Tick::new(16_777_216.0);
        let mut next = late;
        next.advance();

        let (a, b) = (advance_model(late), advance_model(next));
        assert!(a.is_finite() && b.is_finite());
        assert_ne!(a, b);
    }

    #[test]
    fn advance_model_is_rotation_only() {
        let m = advance_model(Tick::new(321.0));
        // No translation, no projective terms, unit scale along the axis.
        assert_eq!(m[0][3], 0.0);
        assert_eq!(m[1][3], 0.0);
        assert_eq!(m[2][3], 0.0);
        assert_eq!(m[3], [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(m[1][1], 1.0);
    }

    // ── compute_projection ────────────────────────────────────────────────

    #[test]
    fn projection_is_deterministic() {
        let a = compute_projection(2.0, 4.0 / 3.0, 0.1, 100.0).unwrap();
        let b = compute_projection(2.0, 4.0 / 3.0, 0.1, 100.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn projection_fixed_entries() {
        for (fov, aspect, near, far) in [(2.0, 4.0 / 3.0, 0.1, 100.0), (0.8, 1.0, 1.0, 5.0)] {
            let m = compute_projection(fov, aspect, near, far).unwrap();
            assert_eq!(m[3][2], -1.0);
            assert_eq!(m[2][3], 2.0 * far * near / (near - far));
        }
    }

    #[test]
    fn projection_rejects_equal_near_far() {
        let err = compute_projection(2.0, 1.0, 1.0, 1.0).unwrap_err();
        assert_eq!(err, TransformError::DegenerateDepthRange { near: 1.0, far: 1.0 });
    }

    // ── TransformState ────────────────────────────────────────────────────

    #[test]
    fn state_view_translates_back_along_z() {
        let state = TransformState::new(&CameraConfig::default()).unwrap();
        assert_eq!(state.view, Mat4::translate(0.0, 0.0, -2.0));
        assert_eq!(state.model, Mat4::IDENTITY);
    }

    #[test]
    fn state_advance_only_touches_model() {
        let mut state = TransformState::new(&CameraConfig::default()).unwrap();
        let (view, projection) = (state.view, state.projection);

        state.advance(Tick::new(10.0));

        assert_eq!(state.model, advance_model(Tick::new(10.0)));
        assert_eq!(state.view, view);
        assert_eq!(state.projection, projection);
    }

    #[test]
    fn state_propagates_degenerate_camera() {
        let camera = CameraConfig { near: 3.0, far: 3.0, ..CameraConfig::default() };
        assert!(TransformState::new(&camera).is_err());
    }
}
