//! Application shell for Ledge.
//!
//! This module wires the session core into the windowing system. It owns
//! the event loop integration, the WGPU renderer, and the per-frame driver
//! that calls the session's input, event, update, and render entry points
//! in that fixed order.
//!
//! # Module Structure
//!
//! - [`app_state`]: the [`AppState`] struct holding renderer, session, and
//!   input state
//! - [`event_handler`]: the [`App`] struct and winit event routing
//! - [`update`]: the per-frame redraw driver
//!
//! # Threading Model
//!
//! Everything runs on a single thread, driven by the winit event loop with
//! `ControlFlow::Poll`; the session performs no internal parallelism.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;
