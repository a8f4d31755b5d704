mod nested;
mod placement;
mod routing;
pub(crate) mod types;
mod validate;

pub use routing::route_edges;
pub use types::*;

use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::geometry::Rect;
use crate::ir::{Graph, GraphEdgeItem, GraphNodeItem};

/// Place every node and route every edge.
///
/// Input is validated up front; any error aborts the call before placement starts.
/// `previous` is a stability hint: nodes it already knows keep their position unless
/// they collide, new nodes are dropped into free space next to their neighbors.
/// Residual overlap after the iteration cap is reported in [`Layout::report`] rather
/// than returned as an error.
pub fn compute_layout(
    nodes: &[GraphNodeItem],
    edges: &[GraphEdgeItem],
    previous: Option<&Layout>,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    validate::validate_graph(nodes, edges)?;

    let placement = placement::place_nodes(nodes, edges, previous, config)?;
    let rects: BTreeMap<String, Rect> = nodes
        .iter()
        .zip(&placement.rects)
        .map(|(node, rect)| (node.id.clone(), *rect))
        .collect();
    let paths = route_edges(&rects, edges, &config.routing)?;
    let children = nested::place_children(nodes, &placement.rects);

    let layout = Layout {
        rects,
        paths,
        children,
        report: placement.report,
    };
    verify_layout(&layout, nodes, edges)?;
    Ok(layout)
}

pub fn compute_graph_layout(
    graph: &Graph,
    previous: Option<&Layout>,
    config: &LayoutConfig,
) -> Result<Layout, LayoutError> {
    compute_layout(&graph.nodes, &graph.edges, previous, config)
}

/// Output guarantees the engine itself is responsible for.
fn verify_layout(
    layout: &Layout,
    nodes: &[GraphNodeItem],
    edges: &[GraphEdgeItem],
) -> Result<(), LayoutError> {
    if layout.rects.len() != nodes.len() || layout.paths.len() != edges.len() {
        return Err(LayoutError::invariant(format!(
            "{} rects for {} nodes, {} paths for {} edges",
            layout.rects.len(),
            nodes.len(),
            layout.paths.len(),
            edges.len()
        )));
    }
    for edge in edges {
        let path = &layout.paths[&edge.id];
        let (Some(first), Some(last)) = (path.first(), path.last()) else {
            return Err(LayoutError::invariant(format!("empty path for `{}`", edge.id)));
        };
        let starts = layout.rects[&edge.from].is_on_boundary(first);
        let ends = layout.rects[&edge.to].is_on_boundary(last);
        if path.len() < 2 || !starts || !ends {
            return Err(LayoutError::invariant(format!(
                "path for `{}` does not join its boxes",
                edge.id
            )));
        }
    }
    Ok(())
}
