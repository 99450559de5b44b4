//! Input subsystem.
//!
//! The public API does not expose winit types. The runtime translates
//! platform events into [`Event`]s (see [`platform`]) and queues them; the
//! frame loop drains at most one per iteration through [`EventSource`].

mod event;
pub mod platform;

pub use event::{Event, EventSource, Key};
