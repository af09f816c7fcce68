//! Ledge - A 2D Side-Scrolling Platformer
//!
//! This is the main entry point for the Ledge game application. Ledge is a
//! small platformer built with Rust and WGPU: one level at a time, loaded
//! from a plain-text platform file, with live reloading of the level
//! geometry while the game is running.
//!
//! # Architecture
//! The application follows a modular architecture:
//! - `app/`: windowing shell and the per-frame driver
//! - `game/`: the session core — resource ledger, state machine, player,
//!   level geometry, camera
//! - `renderer/`: WGPU surface setup and the rectangle drawing backend
//! - `math/`: 2D vector and rectangle primitives
//! - `error`: typed errors and the process-wide error channel
//!
//! # Usage
//! Run with a single positional argument, the level file path:
//! `cargo run -- levels/first.txt`. In game: A/D or arrows run, Space
//! jumps, P pauses, Q reloads the level from disk.

#![warn(missing_docs)]
pub mod app;
pub mod error;
pub mod game;
pub mod math;
pub mod renderer;

use std::process::ExitCode;

use winit::event_loop::{ControlFlow, EventLoop};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(level_path) = std::env::args().nth(1) else {
        eprintln!("usage: ledge <level-file>");
        return ExitCode::FAILURE;
    };

    // The session is built before any window exists, so a bad level file
    // fails fast with a clean exit code.
    let session = match game::Session::new(&level_path) {
        Ok(session) => session,
        Err(_) => {
            error::report_last("could not create the game session");
            return ExitCode::FAILURE;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("error creating event loop: {err}");
            return ExitCode::FAILURE;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(session);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("event loop error: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
