// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: points, center-form boxes, and quadrants.
//!
//! Coordinates follow kurbo's screen-space convention: `y` grows downward, so "north"
//! is toward smaller `y`.

use core::cmp::Ordering;

/// A 2D point carrying an inert scalar payload.
///
/// Equality and ordering only consider `(x, y)`. The payload travels with the point but
/// never takes part in comparisons, so two points at the same position are equal even if
/// their payloads differ.
#[derive(Copy, Clone, Debug, Default)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
    /// User data carried alongside the position.
    pub payload: f64,
}

impl Point {
    /// The all-zero sentinel used to pad short nearest-neighbor results.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Create a point with a payload.
    #[inline(always)]
    pub const fn new(x: f64, y: f64, payload: f64) -> Self {
        Self { x, y, payload }
    }

    /// Create a point with a zero payload.
    #[inline(always)]
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// Whether both points sit at exactly the same coordinates.
    #[inline]
    pub fn same_position(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// The position as a kurbo point (the payload is dropped).
    #[inline]
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl PartialEq for Point {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.same_position(other)
    }
}

impl PartialOrd for Point {
    /// Lexicographic on `(x, y)`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.x.partial_cmp(&other.x)? {
            Ordering::Equal => self.y.partial_cmp(&other.y),
            ord => Some(ord),
        }
    }
}

impl From<kurbo::Point> for Point {
    #[inline]
    fn from(p: kurbo::Point) -> Self {
        Self::at(p.x, p.y)
    }
}

/// Axis-aligned box in center form: a center plus half-extents.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AxisAlignedBox {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Half of the width.
    pub half_w: f64,
    /// Half of the height.
    pub half_h: f64,
}

impl AxisAlignedBox {
    /// Create a box from its center and half-extents.
    #[inline(always)]
    pub const fn new(cx: f64, cy: f64, half_w: f64, half_h: f64) -> Self {
        Self {
            cx,
            cy,
            half_w,
            half_h,
        }
    }

    /// Create a box covering a kurbo rectangle. Inverted rectangles are normalized first.
    pub fn from_rect(rect: kurbo::Rect) -> Self {
        let rect = rect.abs();
        let center = rect.center();
        Self::new(center.x, center.y, 0.5 * rect.width(), 0.5 * rect.height())
    }

    /// The box as a kurbo rectangle.
    pub fn to_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.min_x(), self.min_y(), self.max_x(), self.max_y())
    }

    /// Left edge.
    #[inline]
    pub fn min_x(&self) -> f64 {
        self.cx - self.half_w
    }

    /// Top edge.
    #[inline]
    pub fn min_y(&self) -> f64 {
        self.cy - self.half_h
    }

    /// Right edge.
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.cx + self.half_w
    }

    /// Bottom edge.
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.cy + self.half_h
    }

    /// Whether the box contains the point. All four edges are inclusive.
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        self.min_x() <= p.x && p.x <= self.max_x() && self.min_y() <= p.y && p.y <= self.max_y()
    }

    /// Determines whether this box overlaps another in any way.
    ///
    /// Edges count as part of the box, so two boxes that only share an edge intersect.
    ///
    /// # Examples
    ///
    /// ```
    /// use understory_quadtree::AxisAlignedBox;
    ///
    /// let a = AxisAlignedBox::new(0.0, 0.0, 5.0, 5.0);
    /// assert!(a.intersects(&AxisAlignedBox::new(10.0, 0.0, 5.0, 5.0)));
    /// assert!(!a.intersects(&AxisAlignedBox::new(11.0, 0.0, 5.0, 5.0)));
    /// ```
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.min_x() > self.max_x()
            || other.max_x() < self.min_x()
            || other.min_y() > self.max_y()
            || other.max_y() < self.min_y())
    }

    /// Squared distance from the point to the closest point of the box.
    ///
    /// Zero when the box contains the point. This is a lower bound on the squared
    /// distance from `p` to anything stored inside the box.
    #[inline]
    pub fn distance_squared_to(&self, p: &Point) -> f64 {
        // `max`/`min` instead of `clamp`: never panics on degenerate boxes.
        let nx = p.x.max(self.min_x()).min(self.max_x());
        let ny = p.y.max(self.min_y()).min(self.max_y());
        let dx = p.x - nx;
        let dy = p.y - ny;
        dx * dx + dy * dy
    }

    /// The child box covering one quadrant of this box.
    ///
    /// Each child has half the extents of its parent and overlaps its siblings along the
    /// split lines. When rounding would leave a child's edges short of the parent's edge
    /// or of the split line, its half-extents are widened by a few ulps, so every point
    /// the parent [contains](Self::contains) is contained by at least one child.
    pub fn quadrant(&self, quadrant: Quadrant) -> Self {
        let hw = 0.5 * self.half_w;
        let hh = 0.5 * self.half_h;
        let (east, south) = match quadrant {
            Quadrant::NorthEast => (true, false),
            Quadrant::NorthWest => (false, false),
            Quadrant::SouthEast => (true, true),
            Quadrant::SouthWest => (false, true),
        };
        let (cx, lo_x, hi_x) = if east {
            (self.cx + hw, self.cx, self.max_x())
        } else {
            (self.cx - hw, self.min_x(), self.cx)
        };
        let (cy, lo_y, hi_y) = if south {
            (self.cy + hh, self.cy, self.max_y())
        } else {
            (self.cy - hh, self.min_y(), self.cy)
        };
        Self::new(
            cx,
            cy,
            cover_span(cx, hw, lo_x, hi_x),
            cover_span(cy, hh, lo_y, hi_y),
        )
    }
}

/// Smallest half-extent, starting from `half`, for which `center ± half` reaches both
/// `lo` and `hi`.
fn cover_span(center: f64, mut half: f64, lo: f64, hi: f64) -> f64 {
    // One ulp of the center moves the computed edges by at least one representable step.
    let step = (center.next_up() - center).max(center - center.next_down());
    // Bounded so non-finite input cannot loop.
    for _ in 0..64 {
        if center - half <= lo && center + half >= hi {
            break;
        }
        half = (half + step).max(half.next_up());
    }
    half
}

/// One of the four children of a subdivided node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Right half, upper half (`+x`, `-y`).
    NorthEast,
    /// Left half, upper half (`-x`, `-y`).
    NorthWest,
    /// Right half, lower half (`+x`, `+y`).
    SouthEast,
    /// Left half, lower half (`-x`, `+y`).
    SouthWest,
}

impl Quadrant {
    /// All quadrants in probe order. Children are stored in this order too.
    pub const ALL: [Self; 4] = [
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// Position of this quadrant in [`Quadrant::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::NorthEast => 0,
            Self::NorthWest => 1,
            Self::SouthEast => 2,
            Self::SouthWest => 3,
        }
    }

    /// Short compass label (`"NE"`, `"NW"`, `"SE"`, `"SW"`).
    pub const fn label(self) -> &'static str {
        match self {
            Self::NorthEast => "NE",
            Self::NorthWest => "NW",
            Self::SouthEast => "SE",
            Self::SouthWest => "SW",
        }
    }
}
