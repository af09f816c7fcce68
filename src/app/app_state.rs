//! AppState module for Ledge.
//!
//! This module defines the [`AppState`] struct, which holds everything a
//! running game needs: the WGPU rendering backend, the game session, and
//! input state.

use std::time::Instant;

use gilrs::Gilrs;
use wgpu;

use crate::game::Session;
use crate::game::keys::KeyState;
use crate::renderer::WgpuRenderer;

/// Holds all state required for a running game.
pub struct AppState {
    /// The WGPU drawing backend the session renders into.
    pub wgpu_renderer: WgpuRenderer,
    /// The game session (player, level, camera, state machine).
    pub session: Session,
    /// Currently held keys, fed by window keyboard events.
    pub key_state: KeyState,
    /// Gamepad context; `None` when gamepad support is unavailable.
    pub gamepad: Option<Gilrs>,
    /// Timestamp of the previous frame, for delta computation.
    pub last_frame_time: Instant,
}

impl AppState {
    /// Asynchronously creates a new [`AppState`] around an already
    /// constructed session.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
        session: Session,
    ) -> Self {
        let wgpu_renderer = WgpuRenderer::new(instance, surface, width, height).await;

        let gamepad = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(err) => {
                log::warn!("gamepad support unavailable: {err}");
                None
            }
        };

        Self {
            wgpu_renderer,
            session,
            key_state: KeyState::new(),
            gamepad,
            last_frame_time: Instant::now(),
        }
    }

    /// Resizes the WGPU surface and updates the configuration.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        self.wgpu_renderer.resize(width, height);
    }
}
