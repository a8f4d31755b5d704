use std::collections::HashSet;

use crate::error::LayoutError;
use crate::geometry::Size;
use crate::ir::{GraphEdgeItem, GraphNodeItem};

fn check_size(id: &str, size: &Size) -> Result<(), LayoutError> {
    if size.is_valid() {
        return Ok(());
    }
    Err(LayoutError::InvalidSize {
        id: id.to_string(),
        width: size.width,
        height: size.height,
    })
}

/// Reject the whole input before any placement work if anything is malformed.
pub(super) fn validate_graph(
    nodes: &[GraphNodeItem],
    edges: &[GraphEdgeItem],
) -> Result<(), LayoutError> {
    let mut node_ids: HashSet<&str> = HashSet::with_capacity(nodes.len());
    for node in nodes {
        check_size(&node.id, &node.size)?;
        if !node_ids.insert(node.id.as_str()) {
            return Err(LayoutError::DuplicateId {
                id: node.id.clone(),
            });
        }
    }

    // Child ids share the namespace of node ids since both land in the same output.
    let mut child_ids: HashSet<&str> = HashSet::new();
    for node in nodes {
        for child in &node.children {
            check_size(&child.id, &child.size)?;
            if !child.pos.x.is_finite() || !child.pos.y.is_finite() {
                return Err(LayoutError::invalid_argument(format!(
                    "child `{}` has a non-finite position",
                    child.id
                )));
            }
            if node_ids.contains(child.id.as_str()) || !child_ids.insert(child.id.as_str()) {
                return Err(LayoutError::DuplicateId {
                    id: child.id.clone(),
                });
            }
        }
    }

    let mut edge_ids: HashSet<&str> = HashSet::with_capacity(edges.len());
    for edge in edges {
        if !edge_ids.insert(edge.id.as_str()) {
            return Err(LayoutError::DuplicateId {
                id: edge.id.clone(),
            });
        }
        for endpoint in [&edge.from, &edge.to] {
            if !node_ids.contains(endpoint.as_str()) {
                return Err(LayoutError::DanglingReference {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
    }

    Ok(())
}
