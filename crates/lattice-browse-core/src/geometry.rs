//! Geometry value types shared with layout collaborators.

/// A point in list or viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// The span an entity occupies along the scrolling axis.
///
/// `begin` is inclusive and `end` exclusive, both in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    /// Leading edge.
    pub begin: f32,
    /// Trailing edge.
    pub end: f32,
}

impl Extent {
    /// Creates a new extent.
    pub const fn new(begin: f32, end: f32) -> Self {
        Self { begin, end }
    }

    /// Returns true if no part of this extent lies inside the viewport
    /// `[scroll_position, scroll_position + viewport_length)`.
    pub fn is_outside(&self, scroll_position: f32, viewport_length: f32) -> bool {
        self.end <= scroll_position || self.begin >= scroll_position + viewport_length
    }
}
