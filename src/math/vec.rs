use std::ops::{Add, Mul, Sub};

/*
Requirements for Memory Compatibility with WGPU:
   1. Standard layout (like C structs).
   2. Alignment that matches WGSL expectations.
   3. Can be safely cast to [f32; N] or bytes.
*/

/// A 2D vector used for world positions, velocities, and screen offsets.
///
/// Positive Y points down, matching screen space.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec2([f32; 2]);

impl Vec2 {
    /// Creates a new vector from its components.
    pub fn new(x: f32, y: f32) -> Self {
        Vec2([x, y])
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Vec2([0.0, 0.0])
    }

    /// Horizontal component.
    pub fn x(&self) -> f32 {
        self.0[0]
    }

    /// Vertical component.
    pub fn y(&self) -> f32 {
        self.0[1]
    }

    /// Replaces the horizontal component.
    pub fn set_x(&mut self, x: f32) {
        self.0[0] = x;
    }

    /// Replaces the vertical component.
    pub fn set_y(&mut self, y: f32) {
        self.0[1] = y;
    }

    /// Euclidean length of the vector.
    pub fn length(&self) -> f32 {
        (self.x().powi(2) + self.y().powi(2)).sqrt()
    }

    /// Returns the components as a fixed-size array.
    pub fn as_array(&self) -> &[f32; 2] {
        &self.0
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(values: [f32; 2]) -> Self {
        Vec2(values)
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(vec: Vec2) -> Self {
        vec.0
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self([self.x() + other.x(), self.y() + other.y()])
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self([self.x() - other.x(), self.y() - other.y()])
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self([self.x() * scalar, self.y() * scalar])
    }
}
