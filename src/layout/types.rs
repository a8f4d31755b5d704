use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Rect};

/// Polyline from the source box border to the target box border.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    pub points: Vec<Position>,
}

impl Path {
    pub fn new(points: Vec<Position>) -> Self {
        Self { points }
    }

    pub fn first(&self) -> Option<Position> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Position> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn reversed(mut self) -> Self {
        self.points.reverse();
        self
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.points.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Smallest distance between the two polylines; zero where they touch or cross.
    /// Infinite when either has no segment.
    pub fn distance_to(&self, other: &Path) -> f64 {
        self.segments()
            .flat_map(|(a, b)| {
                other
                    .segments()
                    .map(move |(c, d)| segment_distance(a, b, c, d))
            })
            .fold(f64::INFINITY, f64::min)
    }
}

fn segment_distance(a: Position, b: Position, c: Position, d: Position) -> f64 {
    let turn = |p: Position, q: Position, r: Position| {
        (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
    };
    if turn(c, d, a) * turn(c, d, b) < 0.0 && turn(a, b, c) * turn(a, b, d) < 0.0 {
        return 0.0;
    }
    point_segment_distance(a, c, d)
        .min(point_segment_distance(b, c, d))
        .min(point_segment_distance(c, a, b))
        .min(point_segment_distance(d, a, b))
}

fn point_segment_distance(p: Position, a: Position, b: Position) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (p.x - (a.x + t * dx)).hypot(p.y - (a.y + t * dy))
}

/// How placement went. Residual overlap is a quality problem, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlacementReport {
    /// Relaxation plus overlap-removal sweeps actually run.
    pub iterations: usize,
    /// A sweep found nothing left to separate before the cap was reached.
    pub converged: bool,
    /// Pairs of boxes that still overlap in the returned layout.
    pub residual_overlaps: usize,
    /// Relaxation failed to settle and the seed placement was returned instead.
    pub used_seed_fallback: bool,
}

impl PlacementReport {
    pub fn is_degraded(&self) -> bool {
        self.residual_overlaps > 0
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub rects: BTreeMap<String, Rect>,
    pub paths: BTreeMap<String, Path>,
    /// Absolute boxes of nested child items, keyed by child id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Rect>,
    #[serde(default)]
    pub report: PlacementReport,
}

impl Layout {
    /// Bounding box of every placed node, `None` for an empty layout.
    pub fn bounds(&self) -> Option<Rect> {
        let points: Vec<Position> = self
            .rects
            .values()
            .flat_map(|rect| crate::geometry::points_of_rect(rect))
            .collect();
        crate::geometry::calc_bbox(&points).ok()
    }
}
