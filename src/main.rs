use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cube_viewer::cli::Cli;
use cube_viewer::config::ViewerConfig;
use cube_viewer::controls::OrbitControls;
use cube_viewer::core::clock::{Clock, FpsCounter};
use cube_viewer::core::input_adapter::PointerInput;
use cube_viewer::error::ViewerError;
use cube_viewer::panel::{DebugPanel, PanelLayout, PANEL_TITLE};
use cube_viewer::renderer::MeshRenderer;
use cube_viewer::traits::BindingHost;
use cube_viewer::viewer::Viewer;
use cube_viewer::window::WindowScheduler;

type WindowViewer = Viewer<MeshRenderer, OrbitControls, WindowScheduler>;

struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    viewer: Option<WindowViewer>,
    panel: Option<DebugPanel>,
    pointer: PointerInput,
    clock: Clock,
    fps: FpsCounter,
    failure: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            viewer: None,
            panel: None,
            pointer: PointerInput::new(),
            clock: Clock::new(),
            fps: FpsCounter::new(),
            failure: None,
        }
    }

    fn setup(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title("Cube Viewer")
                    .with_inner_size(winit::dpi::PhysicalSize::new(
                        self.config.width,
                        self.config.height,
                    )),
            )
            .map(Arc::new)
            .map_err(|e| ViewerError::Render(format!("Failed to create window: {}", e)))?;

        let renderer = pollster::block_on(MeshRenderer::new(window.clone()))?;

        let mut panel = self
            .config
            .show_panel
            .then(|| DebugPanel::new(&window, PANEL_TITLE));
        let mut hidden = PanelLayout::new();
        let host: &mut dyn BindingHost = match panel.as_mut() {
            Some(panel) => panel,
            None => {
                log::info!("parameter panel hidden");
                &mut hidden
            }
        };

        let viewer = Viewer::new(
            renderer,
            OrbitControls::new(),
            WindowScheduler::new(window.clone()),
            host,
            &self.config,
        )?;

        self.window = Some(window);
        self.viewer = Some(viewer);
        self.panel = panel;
        self.clock = Clock::new();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{}", error);
        self.failure = Some(error);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window) else {
            return;
        };

        if let Some(fps) = self.fps.record(self.clock.tick()) {
            log::trace!("FPS: {:.1}", fps);
        }

        if let Some(panel) = &mut self.panel {
            match panel.run(window, viewer, self.fps.fps()) {
                Ok(frame) => viewer.renderer_mut().queue_overlay(frame),
                Err(e) => return self.fail(event_loop, e),
            }
        }

        if let Err(e) = viewer.tick() {
            self.fail(event_loop, e);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.setup(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(panel), Some(window)) = (&mut self.panel, &self.window) {
            if panel.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                if let Some(viewer) = &self.viewer {
                    viewer.stop();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(viewer) = &mut self.viewer {
                    self.pointer.process_event(&other, viewer.controls_mut());
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.resolve().context("invalid configuration")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    let mut app = App::new(config);

    log::info!("Cube Viewer - left drag orbits, right drag pans, wheel zooms, Escape quits");
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
