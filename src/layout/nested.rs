use std::collections::BTreeMap;

use crate::geometry::Rect;
use crate::ir::GraphNodeItem;

/// Absolute boxes for every node's children, given where the parents landed.
///
/// Children are only carried along with their parent. Grouped layout (for example
/// tables clustered by schema) would lay each group out here with a recursive
/// `compute_layout` call and size the parent from the result.
pub(super) fn place_children(nodes: &[GraphNodeItem], parents: &[Rect]) -> BTreeMap<String, Rect> {
    let mut children = BTreeMap::new();
    for (node, parent) in nodes.iter().zip(parents) {
        for child in &node.children {
            let rect = Rect::from_origin(child.pos, child.size).translate(parent.x, parent.y);
            children.insert(child.id.clone(), rect);
        }
    }
    children
}
