//! Screen-space geometry for hit testing.
//!
//! All coordinates are integer pixels. Element rectangles are stored relative
//! to their parent; absolute rectangles are summed on demand so moving an
//! ancestor never leaves a stale cache behind.

use lumen_core::{GfxError, GfxResult, GuiConfig};

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Horizontal offset, growing right.
    pub x: i32,
    /// Vertical offset, growing down.
    pub y: i32,
}

impl Position {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Creates a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, saturating at the `i32` bounds.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

/// A width/height pair. Unsigned, so never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Creates a rectangle from position and size.
    #[must_use]
    pub const fn from_pos_size(pos: Position, size: Size) -> Self {
        Self::new(pos.x, pos.y, size.width, size.height)
    }

    /// Top-left corner.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.left, self.top)
    }

    /// Dimensions.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> i64 {
        i64::from(self.left) + i64::from(self.width)
    }

    /// Returns the bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> i64 {
        i64::from(self.top) + i64::from(self.height)
    }

    /// Returns true if the point is inside the rectangle.
    ///
    /// The origin is inside, the far edges are not, so an empty rectangle
    /// contains nothing.
    #[must_use]
    pub fn contains(&self, p: Position) -> bool {
        let (x, y) = (i64::from(p.x), i64::from(p.y));
        x >= i64::from(self.left) && x < self.right() && y >= i64::from(self.top) && y < self.bottom()
    }

    /// Returns the same rectangle moved by an offset, saturating at the `i32` bounds.
    #[must_use]
    pub const fn translate(&self, by: Position) -> Self {
        let origin = self.position().offset(by.x, by.y);
        Self::new(origin.x, origin.y, self.width, self.height)
    }

    /// Returns true if two rectangles overlap.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        i64::from(self.left) < other.right()
            && self.right() > i64::from(other.left)
            && i64::from(self.top) < other.bottom()
            && self.bottom() > i64::from(other.top)
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }

        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        // Both spans are positive and bounded by the inputs' u32 extents.
        let width = u32::try_from(right - i64::from(left)).unwrap_or(0);
        let height = u32::try_from(bottom - i64::from(top)).unwrap_or(0);
        Some(Self::new(left, top, width, height))
    }
}

/// How a builder places an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coordinates {
    /// Pixel rectangle relative to the parent.
    Absolute(Rect),
    /// Fractions of the screen (0.0 to 1.0).
    Relative {
        /// Left edge fraction.
        x: f32,
        /// Top edge fraction.
        y: f32,
        /// Width fraction.
        width: f32,
        /// Height fraction.
        height: f32,
    },
}

impl Coordinates {
    /// Resolves to a pixel rectangle against the configured screen size.
    pub fn resolve(&self, screen: &GuiConfig) -> GfxResult<Rect> {
        match *self {
            Self::Absolute(rect) => Ok(rect),
            Self::Relative { x, y, width, height } => {
                if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
                    return Err(GfxError::InvalidSize { width, height });
                }
                if !(x.is_finite() && y.is_finite()) {
                    return Err(GfxError::invalid("coordinates", format!("({x}, {y}) is not finite")));
                }

                let sw = f64::from(screen.screen_width);
                let sh = f64::from(screen.screen_height);
                // Rounded fractions of a u32 screen always fit back into i32/u32.
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let rect = Rect::new(
                    (f64::from(x) * sw).round() as i32,
                    (f64::from(y) * sh).round() as i32,
                    (f64::from(width) * sw).round() as u32,
                    (f64::from(height) * sh).round() as u32,
                );
                Ok(rect)
            }
        }
    }
}

impl From<Rect> for Coordinates {
    fn from(rect: Rect) -> Self {
        Self::Absolute(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_origin_not_far_edge() {
        let rect = Rect::new(10, 20, 100, 50);

        assert!(rect.contains(Position::new(10, 20)));
        assert!(rect.contains(Position::new(109, 69)));
        assert!(!rect.contains(Position::new(110, 30)));
        assert!(!rect.contains(Position::new(50, 70)));
        assert!(!rect.contains(Position::new(9, 30)));
    }

    #[test]
    fn test_empty_rect_contains_nothing() {
        let rect = Rect::new(5, 5, 0, 10);
        assert!(!rect.contains(Position::new(5, 5)));
    }

    #[test]
    fn test_translate_saturates() {
        let rect = Rect::new(i32::MAX - 2, i32::MIN + 1, 10, 10);
        let moved = rect.translate(Position::new(5, -5));
        assert_eq!(moved, Rect::new(i32::MAX, i32::MIN, 10, 10));
        assert_eq!(Position::new(i32::MIN, 0).offset(-1, 3), Position::new(i32::MIN, 3));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));

        let c = Rect::new(10, 0, 5, 5);
        assert!(!a.intersects(&c));
        assert_eq!(a.intersection(&c), None);
    }

    #[test]
    fn test_relative_coordinates() {
        let screen = GuiConfig {
            screen_width: 1000,
            screen_height: 500,
        };
        let rect = Coordinates::Relative {
            x: 0.1,
            y: 0.5,
            width: 0.25,
            height: 0.2,
        }
        .resolve(&screen)
        .unwrap();

        assert_eq!(rect, Rect::new(100, 250, 250, 100));
    }

    #[test]
    fn test_negative_relative_size_rejected() {
        let screen = GuiConfig::default();
        let result = Coordinates::Relative {
            x: 0.0,
            y: 0.0,
            width: -0.5,
            height: 0.5,
        }
        .resolve(&screen);

        assert!(matches!(result, Err(GfxError::InvalidSize { .. })));
    }
}
