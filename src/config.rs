use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteMode {
    /// Horizontal and vertical segments only.
    #[default]
    Orthogonal,
    /// One segment between the two boxes, chopped at their borders.
    Straight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingConfig {
    pub mode: RouteMode,
    /// Distance between connectors that join the same pair of boxes.
    pub parallel_edge_gap: f64,
    /// How far the innermost self-loop reaches outside its box.
    pub self_loop_pad: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            mode: RouteMode::Orthogonal,
            parallel_edge_gap: 12.0,
            self_loop_pad: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Minimum gap kept between two placed boxes.
    pub node_spacing: f64,
    /// Offset of the bounding box from the canvas origin for fresh layouts.
    pub canvas_padding: f64,
    /// Width / height ratio the initial packing aims for.
    pub row_aspect: f64,
    /// Spring steps before pure overlap removal.
    pub relax_iterations: usize,
    /// Fraction of the excess edge length closed per spring step.
    pub spring_strength: f64,
    /// Hard cap on overlap-removal sweeps; bounds the running time.
    pub max_iterations: usize,
    pub routing: RoutingConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 40.0,
            canvas_padding: 20.0,
            row_aspect: 1.6,
            relax_iterations: 40,
            spring_strength: 0.08,
            max_iterations: 200,
            routing: RoutingConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Spacing clamped to something usable; negative or NaN values become zero.
    pub(crate) fn spacing(&self) -> f64 {
        if self.node_spacing.is_finite() {
            self.node_spacing.max(0.0)
        } else {
            0.0
        }
    }
}

/// Read a layout config from a JSON5 file (plain JSON is accepted too).
/// Missing keys keep their defaults; `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let config: LayoutConfig = json5::from_str(contents)?;
    Ok(config)
}
