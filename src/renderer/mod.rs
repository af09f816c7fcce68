//! Drawing backend for the session core.
//!
//! The session draws each frame through the [`DrawTarget`] trait: clear,
//! a batch of filled rectangles, present. The real implementation is
//! [`WgpuRenderer`], which owns the WGPU surface, device, and a batched
//! rectangle pipeline; tests substitute an in-memory recorder.
//!
//! # Module Structure
//!
//! - [`wgpu_lib`]: WGPU surface/device setup and the [`DrawTarget`] impl
//! - [`rectangle`]: batched rectangle renderer and its vertex format

pub mod rectangle;
pub mod wgpu_lib;

pub use wgpu_lib::WgpuRenderer;

use crate::error::GameError;
use crate::math::Rect;

/// An output surface for exactly one frame at a time.
///
/// The session calls `clear` first, queues screen-space rectangles with
/// `fill_rect`, and finishes with `present`. Any failure aborts the frame;
/// nothing is shown unless `present` succeeds.
pub trait DrawTarget {
    /// Surface size in pixels as `(width, height)`.
    fn size(&self) -> (f32, f32);

    /// Begins the frame and sets the background color (RGBA, 0.0–1.0).
    fn clear(&mut self, color: [f32; 4]) -> Result<(), GameError>;

    /// Queues a filled screen-space rectangle for this frame.
    fn fill_rect(&mut self, rect: Rect, color: [f32; 4]) -> Result<(), GameError>;

    /// Finishes and presents the frame.
    fn present(&mut self) -> Result<(), GameError>;
}
