use crate::math::vec::Vec2;

/// An axis-aligned rectangle in world or screen space.
///
/// `(x, y)` is the top-left corner; positive Y points down. Used both for
/// platform geometry and player hitboxes, and for screen-space draw calls.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Width, always non-negative.
    pub w: f32,
    /// Height, always non-negative.
    pub h: f32,
}

impl Rect {
    /// Creates a new rectangle from its top-left corner and size.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Left edge X coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge X coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Top edge Y coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge Y coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether two rectangles overlap. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// The rectangle shifted by `offset`.
    pub fn translated(&self, offset: Vec2) -> Rect {
        Rect::new(self.x + offset.x(), self.y + offset.y(), self.w, self.h)
    }
}
