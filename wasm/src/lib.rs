use erd_layout::{Graph, Layout, LayoutConfig, RouteMode, compute_graph_layout};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutOptions {
    node_spacing: Option<f64>,
    canvas_padding: Option<f64>,
    max_iterations: Option<usize>,
    route_mode: Option<String>,
    parallel_edge_gap: Option<f64>,
}

fn build_layout_config(options: LayoutOptions) -> LayoutConfig {
    let mut config = LayoutConfig::default();
    if let Some(spacing) = options.node_spacing {
        config.node_spacing = spacing;
    }
    if let Some(padding) = options.canvas_padding {
        config.canvas_padding = padding;
    }
    if let Some(max_iterations) = options.max_iterations {
        config.max_iterations = max_iterations;
    }
    if options.route_mode.as_deref() == Some("straight") {
        config.routing.mode = RouteMode::Straight;
    }
    if let Some(gap) = options.parallel_edge_gap {
        config.routing.parallel_edge_gap = gap;
    }
    config
}

fn layout_json(
    graph_json: &str,
    previous_json: Option<String>,
    options_json: Option<String>,
) -> Result<String, String> {
    let graph: Graph = serde_json::from_str(graph_json).map_err(|error| error.to_string())?;
    let previous = match previous_json {
        Some(raw) => Some(serde_json::from_str::<Layout>(&raw).map_err(|error| error.to_string())?),
        None => None,
    };
    let options = match options_json {
        Some(raw) => {
            serde_json::from_str::<LayoutOptions>(&raw).map_err(|error| error.to_string())?
        }
        None => LayoutOptions::default(),
    };
    let layout = compute_graph_layout(&graph, previous.as_ref(), &build_layout_config(options))
        .map_err(|error| error.to_string())?;
    serde_json::to_string(&layout).map_err(|error| error.to_string())
}

/// Lay out a graph document and return the layout as JSON.
///
/// Pass the previous result back as `previous_json` after each schema edit so boxes
/// the user has already seen stay where they were.
#[wasm_bindgen]
pub fn compute_layout_json(
    graph_json: &str,
    previous_json: Option<String>,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    layout_json(graph_json, previous_json, options_json).map_err(|error| JsValue::from_str(&error))
}
