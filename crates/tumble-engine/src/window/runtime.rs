use std::collections::VecDeque;
use std::time::Instant;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit};
use crate::frame_loop::{FrameLoop, LoopState};
use crate::input::platform::winit::translate_window_event;
use crate::input::Event;
use crate::scene::{initialize, SceneConfig};
use crate::time::FrameRate;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Hello World!".to_string(),
            initial_size: LogicalSize::new(640.0, 480.0),
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, builds the scene, and renders until a quit signal.
    ///
    /// Returns the first startup or fatal frame error, if any.
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, scene: SceneConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut app = App::new(config, gpu_init, scene);

        event_loop
            .run_app(&mut app)
            .context("winit event loop terminated with error")?;

        match app.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct App {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene: SceneConfig,

    entry: Option<WindowEntry>,
    frame_loop: Option<FrameLoop>,
    events: VecDeque<Event>,
    frame_rate: FrameRate,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, scene: SceneConfig) -> Self {
        Self {
            config,
            gpu_init,
            scene,
            entry: None,
            frame_loop: None,
            events: VecDeque::new(),
            frame_rate: FrameRate::new(),
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let mut entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let scene = &self.scene;
        let state = entry
            .with_gpu_mut(|gpu| initialize(gpu, scene))
            .with_context(|| format!("failed to initialize `{}` scene", scene.variant))?;

        entry.with_window(|w| w.request_redraw());
        self.frame_loop = Some(FrameLoop::new(state));
        self.entry = Some(entry);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.failure.get_or_insert(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(entry), Some(frame_loop)) = (self.entry.as_mut(), self.frame_loop.as_mut()) else {
            return;
        };

        let events = &mut self.events;
        let result = entry.with_gpu_mut(|gpu| frame_loop.step(events, gpu));

        match result {
            Ok(LoopState::Running) => {
                if let Some(fps) = self.frame_rate.record(Instant::now()) {
                    let title = format!("{} (FPS: {fps})", self.config.title);
                    entry.with_window(|w| w.set_title(&title));
                }
                entry.with_window(|w| w.request_redraw());
            }
            Ok(LoopState::Stopped) => event_loop.exit(),
            Err(err) => self.fail(event_loop, anyhow::Error::new(err).context("rendering failed")),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.entry.is_some() {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Poll);
        if let Err(err) = self.start(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Continuous redraw; the frame loop has no idle state.
        if let Some(entry) = self.entry.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(ev) = translate_window_event(&event) {
            self.events.push_back(ev);
        }

        match event {
            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(frame_loop) = self.frame_loop.as_ref() {
            log::info!(
                "exiting at tick {} ({} frames rendered, {} skipped)",
                frame_loop.tick().value(),
                frame_loop.frames_rendered(),
                frame_loop.frames_skipped()
            );
        }
        self.frame_loop = None;
        self.entry = None;
    }
}
