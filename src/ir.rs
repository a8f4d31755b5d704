use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Size};

/// A box nested inside a node. `pos` is relative to the parent's origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphChildNodeItem {
    pub id: String,
    pub size: Size,
    pub pos: Position,
}

/// A placeable box, typically one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNodeItem {
    pub id: String,
    pub size: Size,
    /// Reserved for grouped layout; only translated with the parent for now.
    #[serde(default)]
    pub children: Vec<GraphChildNodeItem>,
}

impl GraphNodeItem {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            size: Size::new(width, height),
            children: Vec::new(),
        }
    }
}

/// A directed relationship, typically one foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdgeItem {
    pub id: String,
    pub from: String,
    pub to: String,
}

impl GraphEdgeItem {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.from == self.to
    }
}

/// Input document: the nodes and edges of one diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<GraphNodeItem>,
    #[serde(default)]
    pub edges: Vec<GraphEdgeItem>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: impl Into<String>, width: f64, height: f64) {
        self.nodes.push(GraphNodeItem::new(id, width, height));
    }

    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) {
        self.edges.push(GraphEdgeItem::new(id, from, to));
    }
}
