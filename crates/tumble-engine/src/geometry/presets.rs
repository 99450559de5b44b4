//! Built-in geometry.

use super::{ColoredVertex, PositionVertex};

/// Red, green and blue corners at `z = 1`, counter-clockwise.
pub const COLORED_TRIANGLE: [ColoredVertex; 3] = [
    ColoredVertex::new([-0.5, -0.5, 1.0], [1.0, 0.0, 0.0]),
    ColoredVertex::new([0.5, -0.5, 1.0], [0.0, 1.0, 0.0]),
    ColoredVertex::new([0.0, 0.5, 1.0], [0.0, 0.0, 1.0]),
];

/// Unit quad centred on the origin in the `z = 0` plane.
pub const QUAD_VERTICES: [PositionVertex; 4] = [
    PositionVertex::new([-0.5, -0.5, 0.0]), // bottom left
    PositionVertex::new([0.5, -0.5, 0.0]),  // bottom right
    PositionVertex::new([0.5, 0.5, 0.0]),   // top right
    PositionVertex::new([-0.5, 0.5, 0.0]),  // top left
];

/// Two triangles covering [`QUAD_VERTICES`].
pub const QUAD_INDICES: [u32; 6] = [1, 2, 0, 0, 2, 3];

pub fn colored_triangle() -> &'static [ColoredVertex] {
    &COLORED_TRIANGLE
}

/// Quad vertices and their triangle-list indices.
pub fn indexed_quad() -> (&'static [PositionVertex], &'static [u32]) {
    (&QUAD_VERTICES, &QUAD_INDICES)
}
