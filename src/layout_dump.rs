use crate::ir::Graph;
use crate::layout::{Layout, PlacementReport};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Flat view of a layout for eyeballing and fixture diffs: one record per box and
/// per connector, with edge endpoints spelled out.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub report: PlacementReport,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub children: usize,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub self_loop: bool,
    pub points: Vec<[f64; 2]>,
}

impl LayoutDump {
    /// Nodes and edges appear in input order; entries missing from `layout` are skipped.
    pub fn from_layout(layout: &Layout, graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .filter_map(|node| {
                let rect = layout.rects.get(&node.id)?;
                Some(NodeDump {
                    id: node.id.clone(),
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    children: node.children.len(),
                })
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let path = layout.paths.get(&edge.id)?;
                Some(EdgeDump {
                    id: edge.id.clone(),
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    self_loop: edge.is_self_edge(),
                    points: path.points.iter().map(|p| [p.x, p.y]).collect(),
                })
            })
            .collect();

        let (width, height) = layout
            .bounds()
            .map(|bounds| (bounds.right(), bounds.bottom()))
            .unwrap_or((0.0, 0.0));

        LayoutDump {
            width,
            height,
            nodes,
            edges,
            report: layout.report,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, graph: &Graph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::compute_graph_layout;

    #[test]
    fn dump_lists_nodes_and_edges_in_input_order() {
        let mut graph = Graph::new();
        graph.add_node("orders", 120.0, 80.0);
        graph.add_node("users", 100.0, 60.0);
        graph.add_edge("fk_user", "orders", "users");
        let layout = compute_graph_layout(&graph, None, &LayoutConfig::default()).unwrap();
        let dump = LayoutDump::from_layout(&layout, &graph);
        let ids: Vec<&str> = dump.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["orders", "users"]);
        assert_eq!(dump.edges.len(), 1);
        assert_eq!(dump.edges[0].from, "orders");
        assert!(dump.edges[0].points.len() >= 2);
        assert!(dump.width > 0.0 && dump.height > 0.0);
    }

    #[test]
    fn dump_file_lists_every_box() {
        let mut graph = Graph::new();
        graph.add_node("orders", 120.0, 80.0);
        graph.add_node("users", 100.0, 60.0);
        graph.add_edge("fk_user", "orders", "users");
        graph.add_edge("fk_parent", "users", "users");
        let layout = compute_graph_layout(&graph, None, &LayoutConfig::default()).unwrap();

        let path = std::env::temp_dir().join(format!("erd-layout-dump-{}.json", std::process::id()));
        write_layout_dump(&path, &layout, &graph).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(written["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(written["edges"][1]["self_loop"], serde_json::Value::Bool(true));
        assert_eq!(written["report"]["residualOverlaps"], serde_json::json!(0));
    }
}
