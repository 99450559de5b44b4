use thiserror::Error;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}

/// Outcome of a failed present.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FrameError {
    /// The frame was dropped; the next one may succeed.
    #[error("frame skipped: {0}")]
    Skipped(String),
    /// The device can no longer present.
    #[error("fatal frame error: {0}")]
    Fatal(String),
}

impl FrameError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, FrameError::Fatal(_))
    }
}
