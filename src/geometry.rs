//! Points, rectangles and the interval classification that both placement and
//! routing are built on.
//!
//! Everything here is pure and total over valid input. Functions that can be handed
//! malformed input (empty point sets, reversed intervals, NaN) return
//! [`LayoutError::InvalidArgument`] instead of producing a nonsensical answer.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Finite and non-negative in both dimensions. Zero is allowed.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Axis-aligned rectangle anchored at its north-west corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin(origin: Position, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow by `pad` on every side.
    pub fn inflate(&self, pad: f64) -> Self {
        Self::new(
            self.x - pad,
            self.y - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    /// True when `point` lies on one of the four sides (exact comparison).
    pub fn is_on_boundary(&self, point: Position) -> bool {
        let inside_x = point.x >= self.left() && point.x <= self.right();
        let inside_y = point.y >= self.top() && point.y <= self.bottom();
        if !inside_x || !inside_y {
            return false;
        }
        point.x == self.left()
            || point.x == self.right()
            || point.y == self.top()
            || point.y == self.bottom()
    }
}

/// Corners in the order north-west, north-east, south-west, south-east.
pub fn points_of_rect(rect: &Rect) -> [Position; 4] {
    let Rect {
        x,
        y,
        width,
        height,
    } = *rect;
    [
        Position::new(x, y),
        Position::new(x + width, y),
        Position::new(x, y + height),
        Position::new(x + width, y + height),
    ]
}

/// Smallest axis-aligned rectangle containing every point.
pub fn calc_bbox(points: &[Position]) -> Result<Rect, LayoutError> {
    let Some(first) = points.first() else {
        return Err(LayoutError::invalid_argument(
            "bounding box of an empty point set",
        ));
    };
    let mut min = *first;
    let mut max = *first;
    for point in points {
        if !point.x.is_finite() || !point.y.is_finite() {
            return Err(LayoutError::invalid_argument(format!(
                "non-finite point ({}, {})",
                point.x, point.y
            )));
        }
        min.x = min.x.min(point.x);
        min.y = min.y.min(point.y);
        max.x = max.x.max(point.x);
        max.y = max.y.max(point.y);
    }
    Ok(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
}

/// Relationship of interval `AB` to interval `CD` on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentOverlap1D {
    /// `A-B C-D`
    Before,
    /// `A-C-B-D`
    Overlaps,
    /// `A-C-D-B`
    Contains,
    /// `C-A-D-B`
    Overlapped,
    /// `C-A-B-D`
    Contained,
    /// `C-D A-B`
    After,
}

impl SegmentOverlap1D {
    pub const ALL: [SegmentOverlap1D; 6] = [
        Self::Before,
        Self::Overlaps,
        Self::Contains,
        Self::Overlapped,
        Self::Contained,
        Self::After,
    ];

    /// The classification of `CD` relative to `AB`.
    pub fn mirror(self) -> Self {
        match self {
            Self::Before => Self::After,
            Self::Overlaps => Self::Overlapped,
            Self::Contains => Self::Contained,
            Self::Overlapped => Self::Overlaps,
            Self::Contained => Self::Contains,
            Self::After => Self::Before,
        }
    }

    pub fn is_disjoint(self) -> bool {
        matches!(self, Self::Before | Self::After)
    }
}

/// Classify closed interval `[a, b]` against `[c, d]`.
///
/// Intervals that only touch are disjoint: `Before` iff `b <= c`, `After` iff `a >= d`.
/// The four intersecting classes require an intersection of positive length; a shared
/// end point counts as containment. Identical intervals of positive length are
/// `Contained`; identical points only touch, so they are `Before` either way round.
pub fn segment_overlap_1d(
    a: f64,
    b: f64,
    c: f64,
    d: f64,
) -> Result<SegmentOverlap1D, LayoutError> {
    // Written as negations so NaN fails the precondition too.
    if !(a <= b) {
        return Err(LayoutError::invalid_argument(format!(
            "expected a={a} <= b={b}"
        )));
    }
    if !(c <= d) {
        return Err(LayoutError::invalid_argument(format!(
            "expected c={c} <= d={d}"
        )));
    }

    let intersects = b > c && a < d;
    if b <= c {
        return Ok(SegmentOverlap1D::Before);
    }
    if intersects && a < c && b < d {
        return Ok(SegmentOverlap1D::Overlaps);
    }
    if intersects && a <= c && b >= d && (a < c || b > d) {
        return Ok(SegmentOverlap1D::Contains);
    }
    if intersects && a > c && b > d {
        return Ok(SegmentOverlap1D::Overlapped);
    }
    if intersects && a >= c && b <= d {
        return Ok(SegmentOverlap1D::Contained);
    }
    if a >= d {
        return Ok(SegmentOverlap1D::After);
    }

    Err(LayoutError::invariant(format!(
        "unclassified intervals a={a}, b={b}, c={c}, d={d}"
    )))
}

/// Two rectangles overlap iff both their x and y projections intersect.
/// Rectangles that merely share an edge do not overlap.
pub fn rects_overlap(first: &Rect, second: &Rect) -> Result<bool, LayoutError> {
    let x = segment_overlap_1d(first.left(), first.right(), second.left(), second.right())?;
    if x.is_disjoint() {
        return Ok(false);
    }
    let y = segment_overlap_1d(first.top(), first.bottom(), second.top(), second.bottom())?;
    Ok(!y.is_disjoint())
}
