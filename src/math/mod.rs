//! Math primitives for 2D world and screen space.
//!
//! This module provides the [`Vec2`] vector type and the [`Rect`]
//! axis-aligned rectangle used for platforms, hitboxes, and screen-space
//! drawing. [`Vec2`] is designed to be compatible with GPU memory layouts
//! (e.g., for use with WGPU/WGSL).
//!
//! # Module Organization
//!
//! - [`vec`] module contains the vector type (re-exported at root level)
//! - [`rect`] module contains the rectangle type (re-exported at root level)

pub mod rect;
pub mod vec;

pub use rect::Rect;
pub use vec::Vec2;
