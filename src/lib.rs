#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, RouteMode, RoutingConfig, load_config};
pub use error::LayoutError;
pub use geometry::{
    Position, Rect, SegmentOverlap1D, Size, calc_bbox, points_of_rect, rects_overlap,
    segment_overlap_1d,
};
pub use ir::{Graph, GraphChildNodeItem, GraphEdgeItem, GraphNodeItem};
pub use layout::{Layout, Path, PlacementReport, compute_graph_layout, compute_layout, route_edges};
