use std::collections::{BTreeMap, HashMap};

use crate::config::{RouteMode, RoutingConfig};
use crate::error::LayoutError;
use crate::geometry::{Position, Rect, SegmentOverlap1D, segment_overlap_1d};
use crate::ir::GraphEdgeItem;

use super::Path;

/// Center distances below this are treated as coincident; also absorbs rounding when
/// deciding whether a row of ports fits on a side.
const DEGENERATE_LENGTH: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EdgeSide {
    Left,
    Right,
    Top,
    Bottom,
}

/// Point on `side` of `rect` at coordinate `along`, clamped to the side's extent.
fn side_point(rect: &Rect, side: EdgeSide, along: f64) -> Position {
    match side {
        EdgeSide::Left => Position::new(rect.left(), along.clamp(rect.top(), rect.bottom())),
        EdgeSide::Right => Position::new(rect.right(), along.clamp(rect.top(), rect.bottom())),
        EdgeSide::Top => Position::new(along.clamp(rect.left(), rect.right()), rect.top()),
        EdgeSide::Bottom => Position::new(along.clamp(rect.left(), rect.right()), rect.bottom()),
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// How many lanes `gap` apart fit in a band of length `len`.
fn lane_capacity(len: f64, gap: f64) -> usize {
    if gap <= 0.0 {
        return usize::MAX;
    }
    (((len + DEGENERATE_LENGTH) / gap).floor() as usize).saturating_add(1)
}

/// `count` ascending coordinates inside `[lo, hi]`.
///
/// When they fit, they form a block `gap` apart centered on `anchor`, shifted as a whole
/// to stay inside the range. Otherwise they are spread evenly over the range, away from
/// its ends.
fn spread(lo: f64, hi: f64, count: usize, gap: f64, anchor: f64) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let span = (count - 1) as f64 * gap;
    if span <= hi - lo + DEGENERATE_LENGTH {
        let start = (anchor - span / 2.0).min(hi - span).max(lo);
        (0..count).map(|idx| start + idx as f64 * gap).collect()
    } else {
        let step = (hi - lo) / (count + 1) as f64;
        (1..=count).map(|idx| lo + idx as f64 * step).collect()
    }
}

fn transpose(rect: &Rect) -> Rect {
    Rect::new(rect.y, rect.x, rect.height, rect.width)
}

fn transpose_routes(routes: Vec<Vec<Position>>) -> Vec<Vec<Position>> {
    routes
        .into_iter()
        .map(|route| route.into_iter().map(|p| Position::new(p.y, p.x)).collect())
        .collect()
}

/// Edges sharing an unordered endpoint pair, with the boxes in canonical order.
struct EdgeGroup<'a> {
    from: &'a Rect,
    to: &'a Rect,
    self_loop: bool,
    members: Vec<usize>,
}

fn lookup<'a>(
    rects: &'a BTreeMap<String, Rect>,
    edge: &GraphEdgeItem,
    id: &str,
) -> Result<&'a Rect, LayoutError> {
    rects.get(id).ok_or_else(|| LayoutError::DanglingReference {
        edge: edge.id.clone(),
        node: id.to_string(),
    })
}

/// Route every edge against already placed boxes.
///
/// Edges joining the same unordered pair are routed together in one canonical
/// orientation, then reversed where their direction differs. Members of a group get
/// distinct lanes `parallel_edge_gap` apart as long as the box sides can hold their
/// ports; lanes the band between the boxes cannot hold go around the pair. The result
/// only depends on `rects` and the edge order, so routing unchanged input twice yields
/// identical paths.
pub fn route_edges(
    rects: &BTreeMap<String, Rect>,
    edges: &[GraphEdgeItem],
    config: &RoutingConfig,
) -> Result<BTreeMap<String, Path>, LayoutError> {
    let gap = sanitize(config.parallel_edge_gap);
    let loop_pad = sanitize(config.self_loop_pad);

    let mut groups: Vec<EdgeGroup> = Vec::new();
    let mut group_index: HashMap<(&str, &str), usize> = HashMap::new();
    for (idx, edge) in edges.iter().enumerate() {
        let from = lookup(rects, edge, &edge.from)?;
        let to = lookup(rects, edge, &edge.to)?;
        let slot = *group_index.entry(pair_key(edge)).or_insert_with(|| {
            let (from, to) = if edge.from <= edge.to { (from, to) } else { (to, from) };
            groups.push(EdgeGroup {
                from,
                to,
                self_loop: edge.is_self_edge(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(idx);
    }

    let mut paths = BTreeMap::new();
    for group in &groups {
        let count = group.members.len();
        let routes = if group.self_loop {
            route_self_loops(group.from, count, loop_pad, gap)
        } else {
            match config.mode {
                RouteMode::Orthogonal => route_orthogonal(group.from, group.to, count, gap)?,
                RouteMode::Straight => route_straight(group.from, group.to, count, gap),
            }
        };
        for (&idx, mut points) in group.members.iter().zip(routes) {
            let edge = &edges[idx];
            if edge.from > edge.to {
                points.reverse();
            }
            paths.insert(edge.id.clone(), Path::new(simplify(points)));
        }
    }

    tracing::debug!(edges = edges.len(), groups = groups.len(), "routing finished");
    Ok(paths)
}

fn pair_key(edge: &GraphEdgeItem) -> (&str, &str) {
    if edge.from <= edge.to {
        (edge.from.as_str(), edge.to.as_str())
    } else {
        (edge.to.as_str(), edge.from.as_str())
    }
}

/// Pick the route shape from how the two boxes' projections relate.
fn route_orthogonal(
    a: &Rect,
    b: &Rect,
    count: usize,
    gap: f64,
) -> Result<Vec<Vec<Position>>, LayoutError> {
    let x = segment_overlap_1d(a.left(), a.right(), b.left(), b.right())?;
    let y = segment_overlap_1d(a.top(), a.bottom(), b.top(), b.bottom())?;
    let before = SegmentOverlap1D::Before;
    let routes = match (x.is_disjoint(), y.is_disjoint()) {
        (true, false) => route_across(a, b, x == before, count, gap),
        (false, true) => transpose_routes(route_across(
            &transpose(a),
            &transpose(b),
            y == before,
            count,
            gap,
        )),
        (true, true) => route_elbows(a, b, x == before, y == before, count, gap),
        // Only reachable for boxes that still overlap after placement.
        (false, false) => route_straight(a, b, count, gap),
    };
    Ok(routes)
}

/// Side by side, `b` to the right of `a` when `rightward`. Straight lanes through the
/// shared vertical band first; the rest detour above and below, alternating.
fn route_across(
    a: &Rect,
    b: &Rect,
    rightward: bool,
    count: usize,
    gap: f64,
) -> Vec<Vec<Position>> {
    let (start_side, end_side) = if rightward {
        (EdgeSide::Right, EdgeSide::Left)
    } else {
        (EdgeSide::Left, EdgeSide::Right)
    };
    let lo = a.top().max(b.top());
    let hi = a.bottom().min(b.bottom());
    let inner = count.min(lane_capacity(hi - lo, gap));

    let mut routes: Vec<Vec<Position>> = spread(lo, hi, inner, gap, (lo + hi) / 2.0)
        .into_iter()
        .map(|y| vec![side_point(a, start_side, y), side_point(b, end_side, y)])
        .collect();

    let outer = count - inner;
    let mut above = detour(a, b, rightward, outer.div_ceil(2), gap, true).into_iter();
    let mut below = detour(a, b, rightward, outer / 2, gap, false).into_iter();
    for idx in 0..outer {
        routes.extend(if idx % 2 == 0 { above.next() } else { below.next() });
    }
    routes
}

/// U-shaped lanes over (or under) both boxes, `gap` apart, innermost first.
fn detour(
    a: &Rect,
    b: &Rect,
    rightward: bool,
    levels: usize,
    gap: f64,
    above: bool,
) -> Vec<Vec<Position>> {
    let side = if above { EdgeSide::Top } else { EdgeSide::Bottom };
    // Ports nearest the other box belong to the innermost lane.
    let mut a_ports = spread(a.left(), a.right(), levels, gap, a.center().x);
    let mut b_ports = spread(b.left(), b.right(), levels, gap, b.center().x);
    if rightward {
        a_ports.reverse();
    } else {
        b_ports.reverse();
    }

    a_ports
        .into_iter()
        .zip(b_ports)
        .enumerate()
        .map(|(level, (xa, xb))| {
            let reach = (level + 1) as f64 * gap;
            let lane = if above {
                a.top().min(b.top()) - reach
            } else {
                a.bottom().max(b.bottom()) + reach
            };
            let start = side_point(a, side, xa);
            let end = side_point(b, side, xb);
            vec![
                start,
                Position::new(start.x, lane),
                Position::new(end.x, lane),
                end,
            ]
        })
        .collect()
}

/// Diagonal boxes. Elbows leave `a` sideways and enter `b` from above or below; once
/// those sides are full, the rest leave `a` from above or below and enter `b` sideways.
fn route_elbows(
    a: &Rect,
    b: &Rect,
    rightward: bool,
    downward: bool,
    count: usize,
    gap: f64,
) -> Vec<Vec<Position>> {
    let primary_cap = lane_capacity(a.height, gap).min(lane_capacity(b.width, gap));
    let flipped_cap = lane_capacity(a.width, gap).min(lane_capacity(b.height, gap));
    let (primary, flipped) = if count <= primary_cap {
        (count, 0)
    } else if count <= primary_cap.saturating_add(flipped_cap) {
        (primary_cap, count - primary_cap)
    } else {
        let rest = count - primary_cap - flipped_cap;
        (primary_cap + rest.div_ceil(2), flipped_cap + rest / 2)
    };

    let mut routes = elbow_legs(a, b, rightward, downward, primary, gap);
    routes.extend(transpose_routes(elbow_legs(
        &transpose(a),
        &transpose(b),
        downward,
        rightward,
        flipped,
        gap,
    )));
    routes
}

/// Nested L routes: leave `a` horizontally, turn once, enter `b` vertically.
fn elbow_legs(
    a: &Rect,
    b: &Rect,
    rightward: bool,
    downward: bool,
    count: usize,
    gap: f64,
) -> Vec<Vec<Position>> {
    let start_side = if rightward { EdgeSide::Right } else { EdgeSide::Left };
    let end_side = if downward { EdgeSide::Top } else { EdgeSide::Bottom };
    let ys = spread(a.top(), a.bottom(), count, gap, a.center().y);
    let xs = spread(b.left(), b.right(), count, gap, b.center().x);
    (0..count)
        .map(|idx| {
            // Lane 0 turns furthest out: far from `b` on the way out, far from `a` on the way in.
            let y = if downward { ys[idx] } else { ys[count - 1 - idx] };
            let x = if rightward { xs[count - 1 - idx] } else { xs[idx] };
            let start = side_point(a, start_side, y);
            let end = side_point(b, end_side, x);
            vec![start, Position::new(end.x, start.y), end]
        })
        .collect()
}

/// Parallel center-to-center lines `gap` apart, each cut at both borders. Lines must hit
/// both boxes, so when the boxes are too narrow across the line they are spread evenly.
fn route_straight(a: &Rect, b: &Rect, count: usize, gap: f64) -> Vec<Vec<Position>> {
    let ca = a.center();
    let cb = b.center();
    let (dx, dy) = (cb.x - ca.x, cb.y - ca.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= DEGENERATE_LENGTH {
        let xs_a = spread(a.left(), a.right(), count, gap, ca.x);
        let xs_b = spread(b.left(), b.right(), count, gap, cb.x);
        return xs_a
            .into_iter()
            .zip(xs_b)
            .map(|(xa, xb)| {
                vec![
                    side_point(a, EdgeSide::Top, xa),
                    side_point(b, EdgeSide::Top, xb),
                ]
            })
            .collect();
    }

    let (ux, uy) = (dx / len, dy / len);
    let (nx, ny) = (-uy, ux);
    let half_width = |rect: &Rect| (nx.abs() * rect.width + ny.abs() * rect.height) / 2.0;
    let reach = half_width(a).min(half_width(b));
    spread(-reach, reach, count, gap, 0.0)
        .into_iter()
        .map(|offset| {
            let start = chop(a, Position::new(ca.x + nx * offset, ca.y + ny * offset), (ux, uy));
            let end = chop(b, Position::new(cb.x + nx * offset, cb.y + ny * offset), (-ux, -uy));
            vec![start, end]
        })
        .collect()
}

/// Where the line through `origin` along `dir` leaves `rect`.
/// The crossed coordinate is set to the side itself so the result is exactly on it.
fn chop(rect: &Rect, origin: Position, dir: (f64, f64)) -> Position {
    let (side_x, tx) = if dir.0 > 0.0 {
        (rect.right(), (rect.right() - origin.x) / dir.0)
    } else if dir.0 < 0.0 {
        (rect.left(), (rect.left() - origin.x) / dir.0)
    } else {
        (origin.x, f64::INFINITY)
    };
    let (side_y, ty) = if dir.1 > 0.0 {
        (rect.bottom(), (rect.bottom() - origin.y) / dir.1)
    } else if dir.1 < 0.0 {
        (rect.top(), (rect.top() - origin.y) / dir.1)
    } else {
        (origin.y, f64::INFINITY)
    };
    if tx <= ty {
        let y = (origin.y + tx * dir.1).clamp(rect.top(), rect.bottom());
        Position::new(side_x, y)
    } else {
        let x = (origin.x + ty * dir.0).clamp(rect.left(), rect.right());
        Position::new(x, side_y)
    }
}

/// Loops out of the east side and back in through the north side. Later loops start
/// lower, reach further and land further west, so they nest.
fn route_self_loops(rect: &Rect, count: usize, pad: f64, gap: f64) -> Vec<Vec<Position>> {
    let span = count.saturating_sub(1) as f64 * gap;
    let center = rect.center();
    let starts = spread(rect.top(), rect.bottom(), count, gap, center.y + span / 2.0);
    let ends = spread(rect.left(), rect.right(), count, gap, center.x - span / 2.0);
    (0..count)
        .map(|idx| {
            let reach = pad + idx as f64 * gap;
            let start = side_point(rect, EdgeSide::Right, starts[idx]);
            let end = side_point(rect, EdgeSide::Top, ends[count - 1 - idx]);
            let outer_x = rect.right() + reach;
            let outer_y = rect.top() - reach;
            vec![
                start,
                Position::new(outer_x, start.y),
                Position::new(outer_x, outer_y),
                Position::new(end.x, outer_y),
                end,
            ]
        })
        .collect()
}

/// Drop repeated points and the middle of straight axis-aligned runs; keep at least
/// two points so every path has a start and an end.
fn simplify(points: Vec<Position>) -> Vec<Position> {
    let mut out: Vec<Position> = Vec::with_capacity(points.len());
    for point in points {
        if out.last() == Some(&point) {
            continue;
        }
        if out.len() >= 2 {
            let prev = out[out.len() - 2];
            let mid = out[out.len() - 1];
            let same_x = prev.x == mid.x && mid.x == point.x;
            let same_y = prev.y == mid.y && mid.y == point.y;
            let between = (mid.x - prev.x) * (point.x - mid.x) >= 0.0
                && (mid.y - prev.y) * (point.y - mid.y) >= 0.0;
            if (same_x || same_y) && between {
                out.pop();
            }
        }
        out.push(point);
    }
    if out.len() == 1 {
        out.push(out[0]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rects(entries: &[(&str, Rect)]) -> BTreeMap<String, Rect> {
        entries
            .iter()
            .map(|(id, rect)| (id.to_string(), *rect))
            .collect()
    }

    fn edge(id: &str, from: &str, to: &str) -> GraphEdgeItem {
        GraphEdgeItem::new(id, from, to)
    }

    fn parallel(count: usize, from: &str, to: &str) -> Vec<GraphEdgeItem> {
        (0..count)
            .map(|idx| edge(&format!("e{idx}"), from, to))
            .collect()
    }

    fn points(path: &Path) -> Vec<(f64, f64)> {
        path.points.iter().map(|p| (p.x, p.y)).collect()
    }

    fn side_by_side() -> BTreeMap<String, Rect> {
        rects(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 50.0)),
            ("b", Rect::new(200.0, 0.0, 100.0, 50.0)),
        ])
    }

    fn diagonal() -> BTreeMap<String, Rect> {
        rects(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 50.0)),
            ("b", Rect::new(300.0, 200.0, 100.0, 50.0)),
        ])
    }

    /// Every pair of paths keeps at least `gap` between them.
    fn assert_separated(paths: &BTreeMap<String, Path>, gap: f64) {
        let all: Vec<(&String, &Path)> = paths.iter().collect();
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                let distance = all[i].1.distance_to(all[j].1);
                assert!(
                    distance >= gap - 1e-9,
                    "{} and {} are only {distance} apart",
                    all[i].0,
                    all[j].0
                );
            }
        }
    }

    fn assert_on_borders(layout: &BTreeMap<String, Rect>, paths: &BTreeMap<String, Path>) {
        for (id, path) in paths {
            assert!(layout["a"].is_on_boundary(path.first().unwrap()), "{id} start");
            assert!(layout["b"].is_on_boundary(path.last().unwrap()), "{id} end");
        }
    }

    #[test]
    fn side_by_side_boxes_get_a_straight_horizontal_path() {
        let paths =
            route_edges(&side_by_side(), &[edge("e", "a", "b")], &RoutingConfig::default())
                .unwrap();
        assert_eq!(points(&paths["e"]), vec![(100.0, 25.0), (200.0, 25.0)]);
    }

    #[test]
    fn backward_edge_leaves_through_the_west_side() {
        let paths =
            route_edges(&side_by_side(), &[edge("e", "b", "a")], &RoutingConfig::default())
                .unwrap();
        assert_eq!(points(&paths["e"]), vec![(200.0, 25.0), (100.0, 25.0)]);
    }

    #[test]
    fn stacked_boxes_get_a_vertical_path() {
        let layout = rects(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 50.0)),
            ("b", Rect::new(20.0, 200.0, 100.0, 50.0)),
        ]);
        let paths =
            route_edges(&layout, &[edge("e", "a", "b")], &RoutingConfig::default()).unwrap();
        assert_eq!(points(&paths["e"]), vec![(60.0, 50.0), (60.0, 200.0)]);
    }

    #[test]
    fn diagonal_boxes_get_an_elbow() {
        let paths =
            route_edges(&diagonal(), &[edge("e", "a", "b")], &RoutingConfig::default()).unwrap();
        assert_eq!(
            points(&paths["e"]),
            vec![(100.0, 25.0), (350.0, 25.0), (350.0, 200.0)]
        );
    }

    #[test]
    fn parallel_edges_are_spread_by_the_gap() {
        let config = RoutingConfig::default();
        let paths = route_edges(&side_by_side(), &parallel(2, "a", "b"), &config).unwrap();
        let y1 = paths["e0"].points[0].y;
        let y2 = paths["e1"].points[0].y;
        assert_eq!((y2 - y1).abs(), config.parallel_edge_gap);
        assert_eq!(paths["e0"].len(), 2);
        assert_eq!(paths["e1"].len(), 2);
    }

    #[test]
    fn opposite_edges_share_one_group() {
        let edges = [edge("e1", "a", "b"), edge("e2", "b", "a")];
        let paths = route_edges(&side_by_side(), &edges, &RoutingConfig::default()).unwrap();
        assert_eq!(points(&paths["e1"]), vec![(100.0, 19.0), (200.0, 19.0)]);
        assert_eq!(points(&paths["e2"]), vec![(200.0, 31.0), (100.0, 31.0)]);
    }

    #[test]
    fn edges_beyond_the_shared_band_go_around() {
        let layout = side_by_side();
        let config = RoutingConfig::default();
        let paths = route_edges(&layout, &parallel(7, "a", "b"), &config).unwrap();
        // The 50 high band holds five lanes 12 apart.
        for (idx, y) in [1.0, 13.0, 25.0, 37.0, 49.0].into_iter().enumerate() {
            assert_eq!(points(&paths[&format!("e{idx}")]), vec![(100.0, y), (200.0, y)]);
        }
        assert_eq!(
            points(&paths["e5"]),
            vec![(50.0, 0.0), (50.0, -12.0), (250.0, -12.0), (250.0, 0.0)]
        );
        assert_eq!(
            points(&paths["e6"]),
            vec![(50.0, 50.0), (50.0, 62.0), (250.0, 62.0), (250.0, 50.0)]
        );
        assert_separated(&paths, config.parallel_edge_gap);
        assert_on_borders(&layout, &paths);
    }

    #[test]
    fn outer_lanes_nest() {
        let layout = side_by_side();
        let config = RoutingConfig::default();
        let paths = route_edges(&layout, &parallel(10, "a", "b"), &config).unwrap();
        assert_eq!(
            points(&paths["e5"]),
            vec![(62.0, 0.0), (62.0, -12.0), (238.0, -12.0), (238.0, 0.0)]
        );
        assert_eq!(
            points(&paths["e7"]),
            vec![(50.0, 0.0), (50.0, -24.0), (250.0, -24.0), (250.0, 0.0)]
        );
        assert_separated(&paths, config.parallel_edge_gap);
        assert_on_borders(&layout, &paths);
    }

    #[test]
    fn short_boxes_keep_the_gap() {
        let layout = rects(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 10.0)),
            ("b", Rect::new(200.0, 0.0, 100.0, 10.0)),
        ]);
        let config = RoutingConfig::default();
        let paths = route_edges(&layout, &parallel(2, "a", "b"), &config).unwrap();
        assert_eq!(points(&paths["e0"]), vec![(100.0, 5.0), (200.0, 5.0)]);
        assert_eq!(
            points(&paths["e1"]),
            vec![(50.0, 0.0), (50.0, -12.0), (250.0, -12.0), (250.0, 0.0)]
        );
        assert_separated(&paths, config.parallel_edge_gap);
    }

    #[test]
    fn stacked_zero_height_boxes_spread_along_their_width() {
        let layout = rects(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 0.0)),
            ("b", Rect::new(0.0, 100.0, 100.0, 0.0)),
        ]);
        let config = RoutingConfig::default();
        let paths = route_edges(&layout, &parallel(3, "a", "b"), &config).unwrap();
        assert_eq!(points(&paths["e0"]), vec![(38.0, 0.0), (38.0, 100.0)]);
        assert_eq!(points(&paths["e1"]), vec![(50.0, 0.0), (50.0, 100.0)]);
        assert_eq!(points(&paths["e2"]), vec![(62.0, 0.0), (62.0, 100.0)]);
        assert_separated(&paths, config.parallel_edge_gap);
    }

    #[test]
    fn parallel_elbows_do_not_cross() {
        let paths =
            route_edges(&diagonal(), &parallel(2, "a", "b"), &RoutingConfig::default()).unwrap();
        assert_eq!(
            points(&paths["e0"]),
            vec![(100.0, 19.0), (356.0, 19.0), (356.0, 200.0)]
        );
        assert_eq!(
            points(&paths["e1"]),
            vec![(100.0, 31.0), (344.0, 31.0), (344.0, 200.0)]
        );
    }

    #[test]
    fn crowded_elbows_use_the_other_corner() {
        let layout = diagonal();
        let config = RoutingConfig::default();
        let paths = route_edges(&layout, &parallel(7, "a", "b"), &config).unwrap();
        // Five fit on the east side of `a`; the rest leave through its south side.
        assert_eq!(
            points(&paths["e5"]),
            vec![(44.0, 50.0), (44.0, 231.0), (300.0, 231.0)]
        );
        assert_eq!(
            points(&paths["e6"]),
            vec![(56.0, 50.0), (56.0, 219.0), (300.0, 219.0)]
        );
        assert_separated(&paths, config.parallel_edge_gap);
        assert_on_borders(&layout, &paths);
    }

    #[test]
    fn self_loops_nest() {
        let layout = rects(&[("a", Rect::new(0.0, 0.0, 100.0, 50.0))]);
        let edges = [edge("l1", "a", "a"), edge("l2", "a", "a")];
        let paths = route_edges(&layout, &edges, &RoutingConfig::default()).unwrap();
        assert_eq!(
            points(&paths["l1"]),
            vec![
                (100.0, 25.0),
                (120.0, 25.0),
                (120.0, -20.0),
                (50.0, -20.0),
                (50.0, 0.0)
            ]
        );
        assert_eq!(
            points(&paths["l2"]),
            vec![
                (100.0, 37.0),
                (132.0, 37.0),
                (132.0, -32.0),
                (38.0, -32.0),
                (38.0, 0.0)
            ]
        );
    }

    #[test]
    fn crowded_self_loops_keep_the_gap() {
        let layout = rects(&[("a", Rect::new(0.0, 0.0, 100.0, 50.0))]);
        let config = RoutingConfig::default();
        let paths = route_edges(&layout, &parallel(5, "a", "a"), &config).unwrap();
        // The block of starts slides up so the last one still fits on the east side.
        assert_eq!(paths["e0"].first(), Some(Position::new(100.0, 2.0)));
        assert_eq!(paths["e4"].first(), Some(Position::new(100.0, 50.0)));
        assert_separated(&paths, config.parallel_edge_gap);
    }

    #[test]
    fn self_loops_beyond_the_side_stay_distinct() {
        let layout = rects(&[("a", Rect::new(0.0, 0.0, 100.0, 50.0))]);
        let paths =
            route_edges(&layout, &parallel(8, "a", "a"), &RoutingConfig::default()).unwrap();
        let all: Vec<&Path> = paths.values().collect();
        for i in 0..all.len() {
            for j in (i + 1)..all.len() {
                assert!(all[i].distance_to(all[j]) > 0.0);
            }
        }
    }

    #[test]
    fn straight_mode_chops_at_borders() {
        let layout = diagonal();
        let config = RoutingConfig {
            mode: RouteMode::Straight,
            ..RoutingConfig::default()
        };
        let paths = route_edges(&layout, &[edge("e", "a", "b")], &config).unwrap();
        let path = &paths["e"];
        assert_eq!(path.len(), 2);
        assert!(layout["a"].is_on_boundary(path.points[0]));
        assert!(layout["b"].is_on_boundary(path.points[1]));
    }

    #[test]
    fn straight_parallel_lines_keep_the_gap() {
        let layout = side_by_side();
        let config = RoutingConfig {
            mode: RouteMode::Straight,
            ..RoutingConfig::default()
        };
        let paths = route_edges(&layout, &parallel(3, "a", "b"), &config).unwrap();
        assert_eq!(points(&paths["e0"]), vec![(100.0, 13.0), (200.0, 13.0)]);
        assert_eq!(points(&paths["e2"]), vec![(100.0, 37.0), (200.0, 37.0)]);
        assert_separated(&paths, config.parallel_edge_gap);
    }

    #[test]
    fn straight_lines_beyond_the_band_stay_distinct() {
        let layout = side_by_side();
        let config = RoutingConfig {
            mode: RouteMode::Straight,
            ..RoutingConfig::default()
        };
        let paths = route_edges(&layout, &parallel(7, "a", "b"), &config).unwrap();
        assert_separated(&paths, 50.0 / 8.0);
        assert_on_borders(&layout, &paths);
    }

    #[test]
    fn overlapping_boxes_still_get_a_path() {
        let layout = rects(&[
            ("a", Rect::new(0.0, 0.0, 100.0, 50.0)),
            ("b", Rect::new(50.0, 25.0, 100.0, 50.0)),
        ]);
        let paths =
            route_edges(&layout, &[edge("e", "a", "b")], &RoutingConfig::default()).unwrap();
        let path = &paths["e"];
        assert!(layout["a"].is_on_boundary(path.points[0]));
        assert!(layout["b"].is_on_boundary(path.points[path.len() - 1]));
    }

    #[test]
    fn missing_box_is_a_dangling_reference() {
        let err = route_edges(
            &side_by_side(),
            &[edge("e", "a", "zz")],
            &RoutingConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            LayoutError::DanglingReference {
                edge: "e".into(),
                node: "zz".into()
            }
        );
    }

    #[test]
    fn spread_slides_or_thins_the_block() {
        assert_eq!(spread(0.0, 100.0, 3, 12.0, 50.0), vec![38.0, 50.0, 62.0]);
        assert_eq!(
            spread(0.0, 50.0, 5, 12.0, 49.0),
            vec![2.0, 14.0, 26.0, 38.0, 50.0]
        );
        assert_eq!(spread(0.0, 10.0, 3, 12.0, 5.0), vec![2.5, 5.0, 7.5]);
        assert_eq!(spread(0.0, 0.0, 2, 12.0, 0.0), vec![0.0, 0.0]);
        assert!(spread(0.0, 10.0, 0, 12.0, 5.0).is_empty());
    }

    #[test]
    fn lane_capacity_counts_both_ends() {
        assert_eq!(lane_capacity(50.0, 12.0), 5);
        assert_eq!(lane_capacity(48.0, 12.0), 5);
        assert_eq!(lane_capacity(10.0, 12.0), 1);
        assert_eq!(lane_capacity(0.0, 12.0), 1);
        assert_eq!(lane_capacity(10.0, 0.0), usize::MAX);
    }

    #[test]
    fn simplify_keeps_two_points() {
        let p = Position::new(1.0, 1.0);
        assert_eq!(simplify(vec![p, p, p]), vec![p, p]);
        let run = vec![
            Position::new(0.0, 0.0),
            Position::new(5.0, 0.0),
            Position::new(10.0, 0.0),
        ];
        assert_eq!(
            simplify(run),
            vec![Position::new(0.0, 0.0), Position::new(10.0, 0.0)]
        );
    }
}
