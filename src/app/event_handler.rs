//! Event handler module for Ledge.
//!
//! Contains the [`App`] struct and its event handling logic: window
//! lifecycle, keyboard translation into session events, and the exit
//! conditions (session terminated, or a fatal frame error).

use std::sync::Arc;

use wgpu;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::app::app_state::AppState;
use crate::error;
use crate::game::Session;
use crate::game::keys::{GameKey, SessionEvent, winit_key_to_game_key};

/// Main application struct that manages the window lifecycle and routes
/// events into the session.
///
/// # Lifecycle
/// 1. Created with [`App::new`] around an already constructed session
/// 2. The window and [`AppState`] are created on `resumed`
/// 3. Events are handled via the [`ApplicationHandler`] trait methods
/// 4. The loop exits when the session terminates or a frame fails
pub struct App {
    /// The WGPU instance for graphics operations.
    pub instance: wgpu::Instance,
    /// The current application state, `None` until initialized.
    pub state: Option<AppState>,
    /// The application window, `None` until set.
    pub window: Option<Arc<Window>>,
    /// Session waiting to be adopted by [`AppState`] on first resume.
    session: Option<Session>,
}

impl App {
    /// Creates a new [`App`] that will run `session` once the event loop
    /// provides a window.
    pub fn new(session: Session) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            state: None,
            window: None,
            session: Some(session),
        }
    }

    /// Asynchronously sets up the window, surface, and application state.
    pub async fn set_window(&mut self, window: Window) {
        let window = Arc::new(window);
        let initial_width = 1360;
        let initial_height = 768;

        let _ = window.request_inner_size(PhysicalSize::new(initial_width, initial_height));

        let surface = self
            .instance
            .create_surface(window.clone())
            .expect("Failed to create surface!");

        let session = self
            .session
            .take()
            .expect("session must only be adopted once");
        let state = AppState::new(
            &self.instance,
            surface,
            initial_width,
            initial_height,
            session,
        )
        .await;

        window.request_redraw();
        self.window.get_or_insert(window);
        self.state.get_or_insert(state);
    }

    /// Handles window resize events.
    fn handle_resized(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            let state = match &mut self.state {
                Some(state) => state,
                None => {
                    log::error!("cannot resize surface without state initialized");
                    return;
                }
            };
            state.resize_surface(width, height);
        }
    }

    /// Translates a keyboard event into key state updates and, for bound
    /// discrete actions, a session event.
    fn handle_key_event(&mut self, event_loop: &ActiveEventLoop, key_event: &KeyEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(key) = winit_key_to_game_key(&key_event.logical_key) else {
            return;
        };

        match key_event.state {
            ElementState::Pressed => {
                state.key_state.press_key(key);

                // Movement keys are continuous and sampled per frame; only
                // the discrete actions become session events. Key repeats
                // are dropped.
                let discrete = matches!(key, GameKey::Jump | GameKey::Pause | GameKey::Reload);
                if discrete && !key_event.repeat {
                    let result = state.session.handle_event(&SessionEvent::KeyDown(key));
                    if result.is_err() {
                        // Already recorded and reported by the session.
                        event_loop.exit();
                    }
                }
            }
            ElementState::Released => state.key_state.release_key(key),
        }
    }
}

impl ApplicationHandler for App {
    /// Creates the window and application state when the application is
    /// (first) resumed.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let attributes = Window::default_attributes().with_title("Ledge");
        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(err) => {
                panic!("Failed to create window: {err}");
            }
        };
        pollster::block_on(self.set_window(window));
    }

    /// Routes window events: close requests, resizes, keyboard input, and
    /// redraws.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(state) = self.state.as_mut() {
                    // Infallible: WindowClose never reloads anything.
                    let _ = state.session.handle_event(&SessionEvent::WindowClose);
                }
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.handle_resized(size.width, size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key_event(event_loop, &event);
            }

            WindowEvent::RedrawRequested => {
                if self.handle_redraw().is_err() {
                    error::report_last("frame aborted");
                    event_loop.exit();
                    return;
                }
                if self
                    .state
                    .as_ref()
                    .is_some_and(|state| state.session.is_terminated())
                {
                    event_loop.exit();
                }
            }

            _ => {}
        }
    }
}
