//! The frame loop: poll input, advance the tick, render, repeat until a
//! quit signal arrives.

use crate::device::{FrameError, RenderDevice};
use crate::input::EventSource;
use crate::render::render_frame;
use crate::scene::RenderState;
use crate::time::Tick;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopState {
    Running,
    /// Terminal.
    Stopped,
}

/// Owns the scene and drives it one iteration at a time.
#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    tick: Tick,
    scene: RenderState,
    frames_rendered: u64,
    frames_skipped: u64,
}

impl FrameLoop {
    /// Starts `Running` at tick zero.
    pub fn new(scene: RenderState) -> Self {
        Self {
            state: LoopState::Running,
            tick: Tick::ZERO,
            scene,
            frames_rendered: 0,
            frames_skipped: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn scene(&self) -> &RenderState {
        &self.scene
    }

    /// Frames presented successfully.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Frames dropped by a recoverable present failure.
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }

    /// Runs one iteration.
    ///
    /// At most one event is polled. A quit signal stops the loop before
    /// anything is rendered; any other event is ignored. Otherwise the tick
    /// advances by one and a frame is rendered. A skipped frame keeps the
    /// loop running, a fatal one stops it and is returned.
    pub fn step<E, D>(&mut self, events: &mut E, device: &mut D) -> Result<LoopState, FrameError>
    where
        E: EventSource + ?Sized,
        D: RenderDevice + ?Sized,
    {
        if self.state == LoopState::Stopped {
            return Ok(LoopState::Stopped);
        }

        if let Some(event) = events.poll_event() {
            if event.is_quit_signal() {
                log::info!(
                    "{event:?} received; stopping after {} frames ({} skipped)",
                    self.frames_rendered,
                    self.frames_skipped
                );
                self.state = LoopState::Stopped;
                return Ok(LoopState::Stopped);
            }
            log::debug!("ignoring {event:?}");
        }

        self.tick.advance();
        log::trace!("tick {}", self.tick.value());
        self.scene.transforms.advance(self.tick);

        let scene = &mut self.scene;
        match render_frame(device, &mut scene.object, &scene.transforms, scene.clear_color) {
            Ok(()) => self.frames_rendered += 1,
            Err(err) if !err.is_fatal() => {
                self.frames_skipped += 1;
                log::warn!("{err}");
            }
            Err(err) => {
                log::error!("{err}; stopping");
                self.state = LoopState::Stopped;
                return Err(err);
            }
        }

        Ok(self.state)
    }

    /// Steps until the loop stops. Returns the number of frames rendered.
    ///
    /// Only returns once `events` yields a quit signal or a frame fails
    /// fatally.
    pub fn run<E, D>(&mut self, events: &mut E, device: &mut D) -> Result<u64, FrameError>
    where
        E: EventSource + ?Sized,
        D: RenderDevice + ?Sized,
    {
        while self.step(events, device)? == LoopState::Running {}
        Ok(self.frames_rendered)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::device::{DeviceCommand, HeadlessDevice};
    use crate::input::{Event, Key};
    use crate::scene::{initialize, SceneConfig, SceneVariant};
    use crate::transform::advance_model;

    fn setup(variant: SceneVariant) -> (HeadlessDevice, FrameLoop) {
        let mut device = HeadlessDevice::new();
        let config = SceneConfig { variant, ..SceneConfig::default() };
        let scene = initialize(&mut device, &config).unwrap();
        (device, FrameLoop::new(scene))
    }

    // ── progression ───────────────────────────────────────────────────────

    #[test]
    fn hundred_iterations_without_quit() {
        let (mut device, mut frame_loop) = setup(SceneVariant::ColoredTriangle);
        let mut events: VecDeque<Event> = VecDeque::new();

        for _ in 0..100 {
            assert_eq!(frame_loop.step(&mut events, &mut device), Ok(LoopState::Running));
        }

        assert_eq!(frame_loop.tick(), Tick::new(100.0));
        assert_eq!(frame_loop.state(), LoopState::Running);
        assert_eq!(frame_loop.frames_rendered(), 100);
        assert_eq!(frame_loop.scene().transforms.model, advance_model(Tick::new(100.0)));
        assert_eq!(device.frames_presented(), 100);
    }

    #[test]
    fn quit_on_fifth_iteration_renders_four_frames() {
        let (mut device, mut frame_loop) = setup(SceneVariant::IndexedQuad);
        let mut events: VecDeque<Event> = VecDeque::new();

        for _ in 0..4 {
            frame_loop.step(&mut events, &mut device).unwrap();
        }
        let before = device.commands().len();

        events.push_back(Event::Quit);
        assert_eq!(frame_loop.step(&mut events, &mut device), Ok(LoopState::Stopped));

        assert_eq!(frame_loop.frames_rendered(), 4);
        assert_eq!(frame_loop.tick(), Tick::new(4.0));
        assert_eq!(device.commands().len(), before);
        assert_eq!(device.draw_calls().len(), 4);
    }

    #[test]
    fn stopped_is_terminal() {
        let (mut device, mut frame_loop) = setup(SceneVariant::ColoredTriangle);
        let mut events: VecDeque<Event> = [Event::KeyDown(Key::Escape)].into();

        frame_loop.step(&mut events, &mut device).unwrap();
        assert_eq!(frame_loop.step(&mut events, &mut device), Ok(LoopState::Stopped));
        assert_eq!(frame_loop.tick(), Tick::ZERO);
        assert_eq!(frame_loop.frames_rendered(), 0);
    }

    #[test]
    fn non_quit_event_still_renders() {
        let (mut device, mut frame_loop) = setup(SceneVariant::ColoredTriangle);
        let mut events: VecDeque<Event> = [Event::KeyDown(Key::Space)].into();

        assert_eq!(frame_loop.step(&mut events, &mut device), Ok(LoopState::Running));
        assert_eq!(frame_loop.frames_rendered(), 1);
        assert!(events.is_empty());
    }

    #[test]
    fn one_event_per_iteration() {
        let (mut device, mut frame_loop) = setup(SceneVariant::ColoredTriangle);
        let mut events: VecDeque<Event> =
            [Event::KeyDown(Key::Enter), Event::KeyDown(Key::Tab), Event::Quit].into();

        let frames = frame_loop.run(&mut events, &mut device).unwrap();
        assert_eq!(frames, 2);
        assert_eq!(frame_loop.state(), LoopState::Stopped);
    }

    // ── present failures ──────────────────────────────────────────────────

    #[test]
    fn skipped_frame_keeps_running() {
        let (mut device, mut frame_loop) = setup(SceneVariant::ColoredTriangle);
        device.queue_present_result(Err(FrameError::Skipped("surface timeout".into())));
        let mut events: VecDeque<Event> = VecDeque::new();

        assert_eq!(frame_loop.step(&mut events, &mut device), Ok(LoopState::Running));
        assert_eq!(frame_loop.step(&mut events, &mut device), Ok(LoopState::Running));

        assert_eq!(frame_loop.frames_skipped(), 1);
        assert_eq!(frame_loop.frames_rendered(), 1);
        assert_eq!(frame_loop.tick(), Tick::new(2.0));
    }

    #[test]
    fn fatal_frame_stops_the_loop() {
        let (mut device, mut frame_loop) = setup(SceneVariant::ColoredTriangle);
        device.queue_present_result(Err(FrameError::Fatal("out of memory".into())));
        let mut events: VecDeque<Event> = VecDeque::new();

        let err = frame_loop.run(&mut events, &mut device).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(frame_loop.state(), LoopState::Stopped);
        assert_eq!(device.commands().last(), Some(&DeviceCommand::Present));
    }
}
