use std::collections::VecDeque;

/// Keyboard key identifier.
///
/// Only keys the demo cares about are named; anything else is
/// `Unknown` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Event {
    /// The window was asked to close.
    Quit,
    KeyDown(Key),
}

impl Event {
    /// `Quit`, or Escape pressed.
    #[inline]
    pub fn is_quit_signal(&self) -> bool {
        matches!(self, Event::Quit | Event::KeyDown(Key::Escape))
    }
}

/// Non-blocking source of pending events.
pub trait EventSource {
    /// Takes the oldest pending event, if any.
    fn poll_event(&mut self) -> Option<Event>;
}

impl EventSource for VecDeque<Event> {
    #[inline]
    fn poll_event(&mut self) -> Option<Event> {
        self.pop_front()
    }
}
