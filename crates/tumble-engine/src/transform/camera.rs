/// Fixed camera parameters.
///
/// The aspect ratio is captured once; window resizes do not update the
/// projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    /// Vertical field of view, radians. Must lie in `(0, π)`.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// Distance the camera sits back from the origin along +Z.
    pub view_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 2.0,
            aspect_ratio: 640.0 / 480.0,
            near: 0.1,
            far: 100.0,
            view_distance: 2.0,
        }
    }
}
