use crate::config::{LayoutConfig, RouteMode, load_config};
use crate::ir::Graph;
use crate::layout::{Layout, compute_graph_layout};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "erdl", version, about = "Lay out entity-relationship diagrams")]
pub struct Args {
    /// Graph JSON file ({"nodes": [...], "edges": [...]}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout JSON from an earlier run, used to keep boxes where they were
    #[arg(short = 'p', long = "previous")]
    pub previous: Option<PathBuf>,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "layout")]
    pub format: OutputFormat,

    /// Gap between boxes, overrides the config file
    #[arg(long = "nodeSpacing")]
    pub node_spacing: Option<f64>,

    /// Connector style, overrides the config file
    #[arg(long = "routeMode", value_enum)]
    pub route_mode: Option<RouteModeArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    /// The layout itself; can be fed back with --previous
    Layout,
    /// Flattened per-node and per-edge records
    Dump,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RouteModeArg {
    Orthogonal,
    Straight,
}

impl From<RouteModeArg> for RouteMode {
    fn from(arg: RouteModeArg) -> Self {
        match arg {
            RouteModeArg::Orthogonal => RouteMode::Orthogonal,
            RouteModeArg::Straight => RouteMode::Straight,
        }
    }
}

pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = apply_overrides(load_config(args.config.as_deref())?, &args);

    let input = read_input(args.input.as_deref())?;
    let graph: Graph = serde_json::from_str(&input).context("invalid graph JSON")?;
    let previous = match args.previous.as_deref() {
        Some(path) => Some(read_previous(path)?),
        None => None,
    };

    let layout = compute_graph_layout(&graph, previous.as_ref(), &config)?;
    if layout.report.is_degraded() {
        tracing::warn!(
            residual_overlaps = layout.report.residual_overlaps,
            "layout still has overlapping boxes"
        );
    }

    match (args.format, args.output.as_deref()) {
        (OutputFormat::Dump, Some(path)) => write_layout_dump(path, &layout, &graph)
            .with_context(|| format!("cannot write {}", path.display())),
        (OutputFormat::Dump, None) => write_output(
            &serde_json::to_string_pretty(&LayoutDump::from_layout(&layout, &graph))?,
            None,
        ),
        (OutputFormat::Layout, output) => {
            write_output(&serde_json::to_string_pretty(&layout)?, output)
        }
    }
}

fn apply_overrides(mut config: LayoutConfig, args: &Args) -> LayoutConfig {
    if let Some(spacing) = args.node_spacing {
        config.node_spacing = spacing;
    }
    if let Some(mode) = args.route_mode {
        config.routing.mode = mode.into();
    }
    config
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn read_previous(path: &Path) -> Result<Layout> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    parse_previous(&contents).with_context(|| format!("invalid layout in {}", path.display()))
}

fn parse_previous(contents: &str) -> Result<Layout> {
    Ok(serde_json::from_str(contents)?)
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}
