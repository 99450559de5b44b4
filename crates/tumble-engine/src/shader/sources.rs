//! Built-in WGSL stages.
//!
//! `colored` reads position + color and passes the color through; its
//! matrices live in one `Transforms` uniform block. `flat` reads position
//! only, paints white, and binds each matrix as its own uniform.

pub const COLORED_VERTEX: &str = include_str!("shaders/colored.vert.wgsl");
pub const COLORED_FRAGMENT: &str = include_str!("shaders/colored.frag.wgsl");

pub const FLAT_VERTEX: &str = include_str!("shaders/flat.vert.wgsl");
pub const FLAT_FRAGMENT: &str = include_str!("shaders/flat.frag.wgsl");
