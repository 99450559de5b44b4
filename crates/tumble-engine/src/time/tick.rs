/// Monotonic frame counter.
///
/// Stored as `f64` so that `+ 1.0` stays exact for any run length a process
/// can reach (integers up to 2^53). Narrowed to `f32` only once reduced to an
/// angle. Never reset or wrapped.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd)]
pub struct Tick(f64);

impl Tick {
    pub const ZERO: Tick = Tick(0.0);

    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Advances the counter by exactly one frame.
    #[inline]
    pub fn advance(&mut self) {
        self.0 += 1.0;
    }
}

impl From<f64> for Tick {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
