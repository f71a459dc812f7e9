//! Integer pixel geometry.
//!
//! [`Rectangle`] is half-open: `min` is inclusive, `max` is exclusive. All
//! buffer operations that take a rectangle reduce it to its intersection
//! with the buffer bounds first.

use core::fmt;

/// A pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the point lies inside `r`.
    #[inline]
    pub const fn is_in(self, r: Rectangle) -> bool {
        r.min.x <= self.x && self.x < r.max.x && r.min.y <= self.y && self.y < r.max.y
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub min: Point,
    pub max: Point,
}

impl Rectangle {
    /// The empty rectangle at the origin.
    pub const ZERO: Self = Self {
        min: Point::ZERO,
        max: Point::ZERO,
    };

    /// Build a rectangle from two corners, swapping coordinates as needed so
    /// that `min <= max` on both axes.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (x0, x1) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
        let (y0, y1) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
        Self {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// `width x height` rectangle anchored at the origin.
    ///
    /// Sizes above `i32::MAX` saturate to `i32::MAX`. Use
    /// [`try_from_size`](Self::try_from_size) to reject them instead.
    pub const fn from_size(width: u32, height: u32) -> Self {
        const fn clamp(v: u32) -> i32 {
            if v > i32::MAX as u32 { i32::MAX } else { v as i32 }
        }
        Self::new(0, 0, clamp(width), clamp(height))
    }

    /// `width x height` rectangle anchored at the origin, or `None` if
    /// either size does not fit in an `i32` coordinate.
    pub fn try_from_size(width: u32, height: u32) -> Option<Self> {
        let width = i32::try_from(width).ok()?;
        let height = i32::try_from(height).ok()?;
        Some(Self::new(0, 0, width, height))
    }

    /// Signed width, saturating at `i32::MAX` for rectangles wider than
    /// that. [`width`](Self::width) is exact.
    #[inline]
    pub const fn dx(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x)
    }

    /// Signed height, saturating like [`dx`](Self::dx).
    #[inline]
    pub const fn dy(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y)
    }

    /// Width clamped to zero, as a count.
    #[inline]
    pub const fn width(&self) -> usize {
        if self.max.x > self.min.x {
            self.max.x.abs_diff(self.min.x) as usize
        } else {
            0
        }
    }

    /// Height clamped to zero, as a count.
    #[inline]
    pub const fn height(&self) -> usize {
        if self.max.y > self.min.y {
            self.max.y.abs_diff(self.min.y) as usize
        } else {
            0
        }
    }

    /// Whether the rectangle contains no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y
    }

    /// Whether `p` lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, p: Point) -> bool {
        p.is_in(*self)
    }

    /// The largest rectangle contained by both `self` and `other`.
    ///
    /// An empty intersection is normalized to [`Rectangle::ZERO`], so the
    /// result is always safe to use as a bounds for offset arithmetic.
    #[must_use]
    pub fn intersect(&self, other: Rectangle) -> Rectangle {
        let r = Rectangle {
            min: Point::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        };
        if r.is_empty() { Self::ZERO } else { r }
    }

    /// Whether every pixel of `self` is also in `other`. The empty
    /// rectangle is inside everything.
    pub fn is_in(&self, other: Rectangle) -> bool {
        if self.is_empty() {
            return true;
        }
        other.min.x <= self.min.x
            && self.max.x <= other.max.x
            && other.min.y <= self.min.y
            && self.max.y <= other.max.y
    }

    /// Offset by `(dx, dy)`.
    #[must_use]
    pub const fn translate(&self, dx: i32, dy: i32) -> Rectangle {
        Rectangle {
            min: Point::new(self.min.x + dx, self.min.y + dy),
            max: Point::new(self.max.x + dx, self.max.y + dy),
        }
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn new_canonicalizes_corners() {
        let r = Rectangle::new(5, 7, 1, 2);
        assert_eq!(r.min, Point::new(1, 2));
        assert_eq!(r.max, Point::new(5, 7));
        assert_eq!(r.dx(), 4);
        assert_eq!(r.dy(), 5);
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rectangle::from_size(4, 3);
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(3, 2)));
        assert!(!r.contains(Point::new(4, 0)));
        assert!(!r.contains(Point::new(0, 3)));
        assert!(!r.contains(Point::new(-1, 0)));
    }

    #[test]
    fn intersect_overlapping() {
        let a = Rectangle::new(0, 0, 10, 10);
        let b = Rectangle::new(5, -3, 20, 4);
        assert_eq!(a.intersect(b), Rectangle::new(5, 0, 10, 4));
    }

    #[test]
    fn intersect_disjoint_is_zero() {
        let a = Rectangle::new(0, 0, 4, 4);
        let b = Rectangle::new(10, 10, 12, 12);
        assert_eq!(a.intersect(b), Rectangle::ZERO);
        // Touching edges share no pixels.
        let c = Rectangle::new(4, 0, 8, 4);
        assert!(a.intersect(c).is_empty());
    }

    #[test]
    fn empty_and_sizes() {
        assert!(Rectangle::ZERO.is_empty());
        assert!(Rectangle::new(0, 0, 5, 0).is_empty());
        assert_eq!(Rectangle::new(0, 0, 5, 0).width(), 5);
        assert_eq!(Rectangle::new(0, 0, 5, 0).height(), 0);
    }

    #[test]
    fn sizes_span_the_whole_coordinate_range() {
        let r = Rectangle::new(i32::MIN, -5, i32::MAX, 5);
        assert_eq!(r.width(), u32::MAX as usize);
        assert_eq!(r.height(), 10);
        assert_eq!(r.dx(), i32::MAX);
        assert_eq!(r.dy(), 10);
        let flat = Rectangle::new(i32::MIN, 0, i32::MAX, 0);
        assert!(flat.is_empty());
        assert_eq!(flat.height(), 0);
    }

    #[test]
    fn from_size_saturates() {
        let r = Rectangle::from_size(u32::MAX, 1);
        assert_eq!(r.min, Point::ZERO);
        assert_eq!(r.max, Point::new(i32::MAX, 1));
        assert_eq!(Rectangle::from_size(3_000_000_000, 2).width(), i32::MAX as usize);
    }

    #[test]
    fn try_from_size_rejects_overflow() {
        assert_eq!(Rectangle::try_from_size(4, 3), Some(Rectangle::from_size(4, 3)));
        assert_eq!(Rectangle::try_from_size(i32::MAX as u32, 1).map(|r| r.dx()), Some(i32::MAX));
        assert_eq!(Rectangle::try_from_size(u32::MAX, 1), None);
        assert_eq!(Rectangle::try_from_size(1, 1 << 31), None);
    }

    #[test]
    fn is_in_and_translate() {
        let outer = Rectangle::from_size(8, 8);
        assert!(Rectangle::new(1, 1, 3, 3).is_in(outer));
        assert!(!Rectangle::new(1, 1, 9, 3).is_in(outer));
        assert!(Rectangle::ZERO.translate(100, 100).is_in(outer));
        assert_eq!(
            Rectangle::new(1, 1, 3, 3).translate(2, -1),
            Rectangle::new(3, 0, 5, 2)
        );
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Rectangle::new(1, 2, 3, 4)), "(1,2)-(3,4)");
    }
}
