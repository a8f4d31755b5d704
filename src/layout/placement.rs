use std::collections::{HashMap, VecDeque};

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::{Position, Rect, calc_bbox, points_of_rect, rects_overlap};
use crate::ir::{GraphEdgeItem, GraphNodeItem};

use super::PlacementReport;

// ── Separation ──────────────────────────────────────────────────────
/// Penetration at or below this is treated as touching.
const OVERLAP_EPSILON: f64 = 1e-6;
/// Smallest gap ever kept between boxes, so zero-size boxes still separate.
const MIN_GAP: f64 = 1.0;

// ── Springs ─────────────────────────────────────────────────────────
/// Upper bound on the spring step so a pair never overshoots its midpoint.
const MAX_SPRING_STRENGTH: f64 = 0.5;

pub(super) struct Placement {
    /// Indexed like the input nodes.
    pub(super) rects: Vec<Rect>,
    pub(super) report: PlacementReport,
}

/// Place every node without overlap.
///
/// Nodes found in `previous` keep their old origin and are pinned: springs never move
/// them and overlap removal only moves them when they collide with another pinned node.
/// Everything else is seeded into free space and relaxed toward its neighbors.
pub(super) fn place_nodes(
    nodes: &[GraphNodeItem],
    edges: &[GraphEdgeItem],
    previous: Option<&super::Layout>,
    config: &LayoutConfig,
) -> Result<Placement, LayoutError> {
    let gap = config.spacing().max(MIN_GAP);
    let springs = spring_pairs(nodes, edges)?;
    let adjacency = adjacency(nodes.len(), &springs);

    let hinted: Vec<Option<Position>> = nodes
        .iter()
        .map(|node| {
            previous
                .and_then(|layout| layout.rects.get(&node.id))
                .map(Rect::origin)
                .filter(|origin| origin.x.is_finite() && origin.y.is_finite())
        })
        .collect();
    let any_hint = hinted.iter().any(Option::is_some);
    let pinned: Vec<bool> = hinted.iter().map(Option::is_some).collect();

    let seed = if any_hint {
        seed_from_hint(nodes, &hinted, &adjacency, gap)?
    } else {
        shelf_pack(nodes, &adjacency, gap, config.row_aspect)
    };
    let seed_clean = count_overlaps(&seed)? == 0;

    let strength = if config.spring_strength.is_finite() {
        config.spring_strength.clamp(0.0, MAX_SPRING_STRENGTH)
    } else {
        0.0
    };
    let mut rects = seed.clone();
    let mut iterations = 0usize;
    let mut converged = false;
    let relax_steps = config.relax_iterations.min(config.max_iterations);
    for _ in 0..relax_steps {
        apply_springs(&mut rects, &pinned, &springs, gap, strength);
        converged = !resolve_sweep(&mut rects, &pinned, gap);
        iterations += 1;
    }
    while !converged && iterations < config.max_iterations {
        iterations += 1;
        converged = !resolve_sweep(&mut rects, &pinned, gap);
    }

    let mut residual_overlaps = count_overlaps(&rects)?;
    let mut used_seed_fallback = false;
    if residual_overlaps > 0 && seed_clean {
        tracing::warn!(
            residual_overlaps,
            iterations,
            "placement did not settle, falling back to seed positions"
        );
        rects = seed;
        residual_overlaps = 0;
        used_seed_fallback = true;
    } else if residual_overlaps > 0 {
        tracing::warn!(
            residual_overlaps,
            iterations,
            "placement left overlapping boxes after the iteration cap"
        );
    }

    if !any_hint && !rects.is_empty() {
        let padding = if config.canvas_padding.is_finite() {
            config.canvas_padding
        } else {
            0.0
        };
        let corners: Vec<Position> = rects.iter().flat_map(points_of_rect).collect();
        let bounds = calc_bbox(&corners)?;
        let (dx, dy) = (padding - bounds.x, padding - bounds.y);
        for rect in &mut rects {
            *rect = rect.translate(dx, dy);
        }
    }

    tracing::debug!(
        nodes = nodes.len(),
        iterations,
        converged,
        hinted = any_hint,
        "placement finished"
    );

    Ok(Placement {
        rects,
        report: PlacementReport {
            iterations,
            converged,
            residual_overlaps,
            used_seed_fallback,
        },
    })
}

/// Index pairs for every non-self edge, in edge order.
fn spring_pairs(
    nodes: &[GraphNodeItem],
    edges: &[GraphEdgeItem],
) -> Result<Vec<(usize, usize)>, LayoutError> {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let lookup = |id: &str| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| LayoutError::invariant(format!("unvalidated node id `{id}`")))
    };
    let mut pairs = Vec::with_capacity(edges.len());
    for edge in edges.iter().filter(|edge| !edge.is_self_edge()) {
        pairs.push((lookup(&edge.from)?, lookup(&edge.to)?));
    }
    Ok(pairs)
}

/// Undirected neighbor lists, each in first-seen edge order without repeats.
fn adjacency(count: usize, springs: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); count];
    for &(a, b) in springs {
        if !neighbors[a].contains(&b) {
            neighbors[a].push(b);
        }
        if !neighbors[b].contains(&a) {
            neighbors[b].push(a);
        }
    }
    neighbors
}

/// Breadth-first order over connected components so related boxes pack together.
fn packing_order(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let mut visited = vec![false; adjacency.len()];
    let mut order = Vec::with_capacity(adjacency.len());
    let mut queue = VecDeque::new();
    for start in 0..adjacency.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &next in &adjacency[idx] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    order
}

/// Rows of boxes, left to right, wrapping at a width chosen from the total area.
fn shelf_pack(
    nodes: &[GraphNodeItem],
    adjacency: &[Vec<usize>],
    gap: f64,
    row_aspect: f64,
) -> Vec<Rect> {
    let aspect = if row_aspect.is_finite() && row_aspect > 0.0 {
        row_aspect
    } else {
        1.0
    };
    let area: f64 = nodes
        .iter()
        .map(|node| (node.size.width + gap) * (node.size.height + gap))
        .sum();
    let widest = nodes
        .iter()
        .map(|node| node.size.width)
        .fold(0.0f64, f64::max);
    let row_width = (area * aspect).sqrt().max(widest);

    let mut rects = vec![Rect::default(); nodes.len()];
    let mut cursor_x = 0.0f64;
    let mut cursor_y = 0.0f64;
    let mut row_height = 0.0f64;
    for idx in packing_order(adjacency) {
        let size = nodes[idx].size;
        if cursor_x > 0.0 && cursor_x + size.width > row_width {
            cursor_y += row_height + gap;
            cursor_x = 0.0;
            row_height = 0.0;
        }
        rects[idx] = Rect::new(cursor_x, cursor_y, size.width, size.height);
        cursor_x += size.width + gap;
        row_height = row_height.max(size.height);
    }
    rects
}

/// Keep hinted boxes where they were; drop new ones next to a placed neighbor when
/// there is room, else to the right of everything placed so far.
fn seed_from_hint(
    nodes: &[GraphNodeItem],
    hinted: &[Option<Position>],
    adjacency: &[Vec<usize>],
    gap: f64,
) -> Result<Vec<Rect>, LayoutError> {
    let mut rects = vec![Rect::default(); nodes.len()];
    let mut placed: Vec<usize> = Vec::with_capacity(nodes.len());
    let mut is_placed = vec![false; nodes.len()];
    for (idx, origin) in hinted.iter().enumerate() {
        if let Some(origin) = origin {
            rects[idx] = Rect::from_origin(*origin, nodes[idx].size);
            placed.push(idx);
            is_placed[idx] = true;
        }
    }

    for idx in 0..nodes.len() {
        if is_placed[idx] {
            continue;
        }
        let size = nodes[idx].size;
        let is_free = |candidate: &Rect| {
            placed
                .iter()
                .all(|&other| separation(candidate, &rects[other], gap).is_none())
        };

        let mut slot = None;
        'search: for &neighbor in &adjacency[idx] {
            if !is_placed[neighbor] {
                continue;
            }
            let anchor = rects[neighbor];
            let candidates = [
                (anchor.right() + gap, anchor.y),
                (anchor.x, anchor.bottom() + gap),
                (anchor.x - gap - size.width, anchor.y),
                (anchor.x, anchor.y - gap - size.height),
            ];
            for (x, y) in candidates {
                let candidate = Rect::new(x, y, size.width, size.height);
                if is_free(&candidate) {
                    slot = Some(candidate);
                    break 'search;
                }
            }
        }

        let rect = match slot {
            Some(rect) => rect,
            None => {
                let corners: Vec<Position> = placed
                    .iter()
                    .flat_map(|&other| points_of_rect(&rects[other]))
                    .collect();
                let bounds = calc_bbox(&corners)?;
                Rect::new(bounds.right() + gap, bounds.top(), size.width, size.height)
            }
        };
        rects[idx] = rect;
        placed.push(idx);
        is_placed[idx] = true;
    }
    Ok(rects)
}

/// Penetration depth on each axis when the two boxes, each grown by half the gap,
/// overlap by more than [`OVERLAP_EPSILON`] on both axes.
fn separation(first: &Rect, second: &Rect, gap: f64) -> Option<(f64, f64)> {
    let a = first.inflate(gap / 2.0);
    let b = second.inflate(gap / 2.0);
    let depth_x = a.right().min(b.right()) - a.left().max(b.left());
    let depth_y = a.bottom().min(b.bottom()) - a.top().max(b.top());
    if depth_x > OVERLAP_EPSILON && depth_y > OVERLAP_EPSILON {
        Some((depth_x, depth_y))
    } else {
        None
    }
}

/// One Jacobi step pulling connected boxes toward an ideal center distance.
fn apply_springs(
    rects: &mut [Rect],
    pinned: &[bool],
    springs: &[(usize, usize)],
    gap: f64,
    strength: f64,
) {
    if strength <= 0.0 {
        return;
    }
    let mut shift = vec![(0.0f64, 0.0f64); rects.len()];
    for &(a, b) in springs {
        let from = rects[a].center();
        let to = rects[b].center();
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= f64::EPSILON {
            continue;
        }
        let extent = |rect: &Rect| rect.width.max(rect.height);
        let ideal = gap + (extent(&rects[a]) + extent(&rects[b])) / 2.0;
        let excess = dist - ideal;
        if excess <= 0.0 {
            continue;
        }
        let pull = excess * strength;
        let (ux, uy) = (dx / dist, dy / dist);
        match (pinned[a], pinned[b]) {
            (false, false) => {
                shift[a].0 += ux * pull / 2.0;
                shift[a].1 += uy * pull / 2.0;
                shift[b].0 -= ux * pull / 2.0;
                shift[b].1 -= uy * pull / 2.0;
            }
            (false, true) => {
                shift[a].0 += ux * pull;
                shift[a].1 += uy * pull;
            }
            (true, false) => {
                shift[b].0 -= ux * pull;
                shift[b].1 -= uy * pull;
            }
            (true, true) => {}
        }
    }
    for (idx, (dx, dy)) in shift.into_iter().enumerate() {
        if !pinned[idx] {
            rects[idx] = rects[idx].translate(dx, dy);
        }
    }
}

/// Push every overlapping pair apart along its axis of least penetration.
/// Returns whether anything moved.
fn resolve_sweep(rects: &mut [Rect], pinned: &[bool], gap: f64) -> bool {
    let mut moved = false;
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            let Some((depth_x, depth_y)) = separation(&rects[i], &rects[j], gap) else {
                continue;
            };
            moved = true;
            let ci = rects[i].center();
            let cj = rects[j].center();
            // Coincident centers push the later box right or down.
            let (dx, dy) = if depth_x <= depth_y {
                let dir = if cj.x >= ci.x { 1.0 } else { -1.0 };
                (dir * depth_x, 0.0)
            } else {
                let dir = if cj.y >= ci.y { 1.0 } else { -1.0 };
                (0.0, dir * depth_y)
            };
            let (share_i, share_j) = match (pinned[i], pinned[j]) {
                (false, true) => (1.0, 0.0),
                (true, false) => (0.0, 1.0),
                _ => (0.5, 0.5),
            };
            rects[i] = rects[i].translate(-dx * share_i, -dy * share_i);
            rects[j] = rects[j].translate(dx * share_j, dy * share_j);
        }
    }
    moved
}

/// Pairs of boxes that overlap with positive area, by the interval classification.
pub(super) fn count_overlaps(rects: &[Rect]) -> Result<usize, LayoutError> {
    let mut count = 0;
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects_overlap(&rects[i], &rects[j])? {
                count += 1;
            }
        }
    }
    Ok(count)
}
