// Geometry primitives shared by the window model, chrome, and paint canvas.
// All values are desktop-relative pixels.

use serde::{Deserialize, Serialize};

/// Top-left corner in desktop pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise offset from `origin` to `self`
    pub fn delta_from(&self, origin: Position) -> (i32, i32) {
        (self.x - origin.x, self.y - origin.y)
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Clamp both axes to be non-negative
    pub fn clamp_non_negative(&self) -> Self {
        Self::new(self.x.max(0), self.y.max(0))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A rectangle: position plus size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub position: Position,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            position: Position::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> i32 {
        self.position.x
    }

    pub fn y(&self) -> i32 {
        self.position.y
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.position.x + self.size.width as i32
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.position.y + self.size.height as i32
    }

    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.x() && point.x < self.right() && point.y >= self.y() && point.y < self.bottom()
    }

    /// Shrink from the top by `amount` pixels, saturating at zero height
    pub fn without_top(&self, amount: u32) -> Rect {
        let cut = amount.min(self.size.height);
        Rect::new(
            self.x(),
            self.y() + cut as i32,
            self.size.width,
            self.size.height - cut,
        )
    }

    /// Convert a desktop point into coordinates relative to this rect's origin
    pub fn to_local(&self, point: Position) -> Position {
        Position::new(point.x - self.x(), point.y - self.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(10, 20, 30, 40);
        assert!(rect.contains(Position::new(10, 20)));
        assert!(rect.contains(Position::new(39, 59)));
        assert!(!rect.contains(Position::new(40, 20)));
        assert!(!rect.contains(Position::new(10, 60)));
    }

    #[test]
    fn test_without_top_saturates() {
        let rect = Rect::new(0, 0, 100, 10);
        let body = rect.without_top(16);
        assert_eq!(body.y(), 10);
        assert_eq!(body.size.height, 0);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(
            Position::new(-5, 7).clamp_non_negative(),
            Position::new(0, 7)
        );
    }
}
