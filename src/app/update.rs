//! Per-frame driver for the Ledge app.
//!
//! Contains the redraw handler that runs the session's per-frame contract
//! in its fixed order: gamepad events, continuous input sampling,
//! simulation update, render.

use std::time::Instant;

use crate::error::GameError;
use crate::game::keys::{SessionEvent, gilrs_button_to_pad_button};

use super::event_handler::App;

impl App {
    /// Runs one frame.
    ///
    /// Order per frame: drain gamepad button events into session events,
    /// sample the continuous input snapshot (held keys plus stick axis),
    /// advance the simulation by the measured delta, then render into the
    /// WGPU backend. Returns the first session error (failed reload or
    /// failed render); the caller exits the event loop on error.
    pub fn handle_redraw(&mut self) -> Result<(), GameError> {
        let window = self
            .window
            .as_ref()
            .expect("window must be initialized before use");
        if window.is_minimized().unwrap_or(false) {
            window.request_redraw();
            return Ok(());
        }

        let state = self
            .state
            .as_mut()
            .expect("state must be initialized before use");

        // Discrete gamepad events first, so a button press this frame can
        // affect this frame's simulation.
        let mut axis = 0.0;
        if let Some(gilrs) = state.gamepad.as_mut() {
            while let Some(gilrs::Event { event, .. }) = gilrs.next_event() {
                if let gilrs::EventType::ButtonPressed(button, _) = event {
                    if let Some(pad) = gilrs_button_to_pad_button(button) {
                        state
                            .session
                            .handle_event(&SessionEvent::ControllerButtonDown(pad))?;
                    }
                }
            }
            if let Some((_id, gamepad)) = gilrs.gamepads().next() {
                axis = gamepad.value(gilrs::Axis::LeftStickX);
            }
        }

        let snapshot = state.key_state.snapshot(axis);
        state.session.input(&snapshot);

        let now = Instant::now();
        let delta = now - state.last_frame_time;
        state.last_frame_time = now;
        // The session requires strictly positive deltas.
        if !delta.is_zero() {
            state.session.update(delta);
        }

        state.session.render(&mut state.wgpu_renderer)?;

        window.request_redraw();
        Ok(())
    }
}
