//! Time subsystem.
//!
//! - `Tick` is the frame counter that drives animation. It advances once per
//!   loop iteration and is independent of wall-clock time.
//! - `FrameRate` measures presented frames per second for diagnostics.

mod frame_rate;
mod tick;

pub use frame_rate::FrameRate;
pub use tick::Tick;
