//! Swell - fly over an endless procedurally animated ocean
//!
//! Right mouse button to look, WASD to fly, Space/Left Control to rise/sink,
//! Left Shift to go faster, Escape to quit.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowId},
};

use swell::cli::Args;
use swell::input::{self, LookChange};
use swell::params::{CameraConfig, RenderConfig};
use swell::rendering::Renderer;
use swell::scene::SceneState;
use swell::{logging, Error};

/// Main application state
struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    scene: SceneState,
    render_config: RenderConfig,

    /// Set when startup fails inside the event loop
    error: Option<Error>,
}

impl App {
    fn new(render_config: RenderConfig, scene: SceneState) -> Self {
        Self {
            window: None,
            renderer: None,
            scene,
            render_config,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> swell::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Swell")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| Error::Window(e.to_string()))?,
        );

        let renderer = pollster::block_on(Renderer::new(
            Arc::clone(&window),
            &self.render_config,
            &self.scene.light,
        ))?;

        log::info!("Hold the right mouse button to look around, ESC to quit");

        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn set_look(&self, change: LookChange) {
        let Some(window) = &self.window else {
            return;
        };
        match change {
            LookChange::Enabled => {
                let grab = window
                    .set_cursor_grab(CursorGrabMode::Locked)
                    .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
                if let Err(e) = grab {
                    log::warn!("Cursor grab not supported: {e}");
                }
                window.set_cursor_visible(false);
            }
            LookChange::Disabled => {
                if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                    log::debug!("Cursor release failed: {e}");
                }
                window.set_cursor_visible(true);
            }
        }
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut self.renderer else {
            return;
        };

        self.scene.update();

        match renderer.render(&self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                self.scene.input.on_key(code, state);
                if self.scene.input.quit_requested() {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(change) = self.scene.input.on_mouse_button(button, state) {
                    self.set_look(change);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scene.camera.process_scroll(input::scroll_lines(delta));
            }
            WindowEvent::Focused(false) => {
                if let Some(change) = self.scene.input.release_all() {
                    self.set_look(change);
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some((dx, dy)) = self.scene.input.pointer_delta(delta) {
                self.scene.camera.process_pointer_delta(dx, dy);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn run(args: Args) -> swell::Result<()> {
    let render_config = args.render_config();
    let scene = SceneState::new(&CameraConfig::default(), args.wave_params());

    log::info!(
        "Grid: {} x {} edges over {} units",
        render_config.edges_per_side,
        render_config.edges_per_side,
        render_config.side_length
    );

    let event_loop = EventLoop::new().map_err(|e| Error::Window(e.to_string()))?;
    let mut app = App::new(render_config, scene);
    event_loop
        .run_app(&mut app)
        .map_err(|e| Error::Window(e.to_string()))?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
