//! Window and event loop
//!
//! winit's event loop is the scheduler: `RedrawRequested` is the refresh
//! callback, and `about_to_wait` sleeps until the frame clock's next deadline.

use std::sync::Arc;
use std::time::Instant;

use framestream_core::SurfaceRect;
use framestream_core::config::{FALLBACK_VIEWPORT_WIDTH, WindowConfig};
use framestream_core::error::SetupError;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::graphics::WgpuPresenter;
use crate::launch::PlayerLoop;

/// Owns the loop and the window it presents into
pub struct PlayerApp {
    player_loop: PlayerLoop,
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    setup_error: Option<SetupError>,
}

impl PlayerApp {
    pub fn new(player_loop: PlayerLoop, window_config: WindowConfig) -> Self {
        Self {
            player_loop,
            window_config,
            window: None,
            setup_error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>, SetupError> {
        let viewport_width = event_loop
            .primary_monitor()
            .map(|monitor| {
                monitor
                    .size()
                    .to_logical::<f64>(monitor.scale_factor())
                    .width
            })
            .unwrap_or(FALLBACK_VIEWPORT_WIDTH);
        let size = self.window_config.surface_size(viewport_width);

        let window_attributes = Window::default_attributes()
            .with_title(self.window_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(size, size))
            .with_resizable(false);

        let window = event_loop.create_window(window_attributes).map_err(|e| {
            SetupError::GpuContextUnavailable(format!("failed to create window: {e}"))
        })?;
        tracing::debug!("Window created: {size}x{size} logical, viewport {viewport_width}");
        Ok(Arc::new(window))
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SetupError> {
        let window = self.create_window(event_loop)?;
        self.window = Some(window.clone());

        let vsync = self.window_config.vsync;
        self.player_loop
            .start(|dimensions| WgpuPresenter::new(window, dimensions, vsync))
    }

    /// Pointer space is the window client area
    fn surface_rect(&self) -> Option<SurfaceRect> {
        let size = self.window.as_ref()?.inner_size();
        Some(SurfaceRect::sized(
            f64::from(size.width),
            f64::from(size.height),
        ))
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            tracing::error!("Failed to start: {}", e);
            self.setup_error = Some(e);
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
            WindowEvent::CloseRequested => {
                tracing::info!("Window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = self.player_loop.presenter_mut() {
                    presenter.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(surface) = self.surface_rect() {
                    self.player_loop
                        .on_pointer_moved(position.x, position.y, surface);
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                self.player_loop.on_click();
            }
            WindowEvent::RedrawRequested => {
                self.player_loop.on_refresh(Instant::now());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        if !self.player_loop.is_running() {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        match self.player_loop.next_deadline() {
            Some(deadline) => {
                if Instant::now() >= deadline {
                    window.request_redraw();
                }
                event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
            // The first refresh sets the clock's reference time
            None => {
                window.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
        }
    }
}

/// Run the event loop until the window closes
///
/// Returns the setup error if the loop never reached `Running`.
pub fn run(mut app: PlayerApp) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.setup_error.take() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
