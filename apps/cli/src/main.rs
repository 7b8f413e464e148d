// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Plan CLI: floor plans and simplified wall data from a model snapshot
//!
//! Usage:
//!   ifc-plan <model.json> [options]
//!
//! Reads a JSON model snapshot, projects the selected storeys to plan view
//! and writes the simplified wall table (JSON, CSV or XAML). Optionally
//! writes the element table, the element attribute table and the
//! plan/wall-layout drawings.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`; extraction
//! defaults come from `IFC_PLAN_*` environment variables (see `config.rs`).

use anyhow::{bail, Context, Result};
use ifc_plan_core::{BuildingModel, ElementKind};
use ifc_plan_processing::grouping::{DEFAULT_ELEVATION_DECIMALS, DEFAULT_ELEVATION_TOLERANCE};
use ifc_plan_processing::{
    assemble, assemble_wall_layout, collect_attributes, element_rows, extract_plan_with_progress,
    render_attributes, render_elements, render_walls, wall_rows, ElementFailure, ExportFormat, GroupSummary, GroupingStrategy,
    PipelineStats, PlanDrawing, RenderPolicy, Selection, StoreySelector,
};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::ops::ControlFlow;
use std::path::PathBuf;

mod config;

use config::{parse_degenerate_policy, parse_elevation_source, parse_grouping, Config};

/// Parsed command line
#[derive(Debug, Default)]
struct Args {
    model: PathBuf,
    selection: Selection,
    format: ExportFormat,
    output: Option<PathBuf>,
    elements: Option<PathBuf>,
    attributes: Option<PathBuf>,
    drawing: Option<PathBuf>,
    list: bool,
    grouping: Option<String>,
    elevation_source: Option<String>,
    degenerate_walls: Option<String>,
}

/// Everything drawn in one run
#[derive(Serialize)]
struct DrawingDocument<'a> {
    plan: &'a PlanDrawing,
    wall_layout: &'a PlanDrawing,
    storeys: &'a [GroupSummary],
    failures: &'a [ElementFailure],
    stats: &'a PipelineStats,
}

fn print_usage() {
    eprintln!("IFC-Plan - floor plans and simplified wall data from a model snapshot");
    eprintln!();
    eprintln!("Usage: ifc-plan <model.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --storey <name>          Draw this storey (repeatable, in drawing order)");
    eprintln!("  --elevation <m>          Draw the level at this elevation (repeatable)");
    eprintln!("  --types <kinds>          Element kinds, comma separated: wall,slab,other");
    eprintln!("  --format <fmt>           Wall data format: json, csv, xaml (default: json)");
    eprintln!("  --output <path>          Wall data file (default: stdout)");
    eprintln!("  --elements <path>        Also write the element table (json or csv)");
    eprintln!("  --attributes <path>      Also write element attributes of the selected kinds (json or csv)");
    eprintln!("  --drawing <path>         Also write plan and wall layout drawings as JSON");
    eprintln!("  --grouping <mode>        containment, rounded or proximity");
    eprintln!("  --elevation-source <s>   storey or mesh");
    eprintln!("  --degenerate-walls <p>   reject or collapse");
    eprintln!("  --list                   List storeys found in the model and exit");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  IFC_PLAN_GROUPING, IFC_PLAN_ELEVATION_DECIMALS, IFC_PLAN_ELEVATION_TOLERANCE,");
    eprintln!("  IFC_PLAN_ELEVATION_SOURCE, IFC_PLAN_DEGENERATE_WALLS, IFC_PLAN_UNIT_SCALE,");
    eprintln!("  RUST_LOG");
}

fn parse_args(args: &[String]) -> Result<Option<Args>> {
    let Some(model) = args.first() else {
        return Ok(None);
    };
    if model == "--help" || model == "-h" {
        return Ok(None);
    }

    let mut parsed = Args {
        model: PathBuf::from(model),
        ..Default::default()
    };

    let mut iter = args[1..].iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("Missing value for {}", flag))
        };
        match flag.as_str() {
            "--storey" => parsed.selection.storeys.push(StoreySelector::Name(value()?)),
            "--elevation" => {
                let raw = value()?;
                let elevation: f64 = raw
                    .parse()
                    .with_context(|| format!("Invalid elevation '{}'", raw))?;
                parsed.selection = parsed.selection.with_elevation(elevation);
            }
            "--types" => {
                let kinds = value()?
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| s.parse::<ElementKind>())
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(anyhow::Error::msg)?;
                parsed.selection = parsed.selection.with_kinds(kinds);
            }
            "--format" => parsed.format = value()?.parse()?,
            "--output" => parsed.output = Some(PathBuf::from(value()?)),
            "--elements" => parsed.elements = Some(PathBuf::from(value()?)),
            "--attributes" => parsed.attributes = Some(PathBuf::from(value()?)),
            "--drawing" => parsed.drawing = Some(PathBuf::from(value()?)),
            "--grouping" => parsed.grouping = Some(value()?),
            "--elevation-source" => parsed.elevation_source = Some(value()?),
            "--degenerate-walls" => parsed.degenerate_walls = Some(value()?),
            "--list" => parsed.list = true,
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok(Some(parsed))
}

/// Command-line flags override the environment
fn apply_overrides(config: &mut Config, args: &Args) -> Result<()> {
    if let Some(mode) = &args.grouping {
        // Keep parameters set through the environment
        let (decimals, tolerance) = match config.grouping {
            GroupingStrategy::RoundedElevation { decimals } => (decimals, DEFAULT_ELEVATION_TOLERANCE),
            GroupingStrategy::ElevationProximity { tolerance } => (DEFAULT_ELEVATION_DECIMALS, tolerance),
            GroupingStrategy::Containment => (DEFAULT_ELEVATION_DECIMALS, DEFAULT_ELEVATION_TOLERANCE),
        };
        config.grouping = parse_grouping(mode, decimals, tolerance)
            .with_context(|| format!("Unknown grouping '{}'", mode))?;
    }
    if let Some(source) = &args.elevation_source {
        config.elevation_source = parse_elevation_source(source)
            .with_context(|| format!("Unknown elevation source '{}'", source))?;
    }
    if let Some(policy) = &args.degenerate_walls {
        config.degenerate_walls = parse_degenerate_policy(policy)
            .with_context(|| format!("Unknown degenerate wall policy '{}'", policy))?;
    }
    Ok(())
}

/// JSON unless the path ends in `.csv`
fn table_format(path: &std::path::Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
        _ => ExportFormat::Json,
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len(), "Wrote output");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,ifc_plan_processing=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&raw)? else {
        print_usage();
        return Ok(());
    };

    let mut config = Config::from_env();
    apply_overrides(&mut config, &args)?;

    tracing::info!(
        model = %args.model.display(),
        grouping = ?config.grouping,
        elevation_source = ?config.elevation_source,
        degenerate_walls = ?config.degenerate_walls,
        unit_scale = config.unit_scale,
        "Starting IFC-Plan"
    );

    let json = fs::read_to_string(&args.model)
        .with_context(|| format!("Failed to read {}", args.model.display()))?;
    let model = BuildingModel::from_json(&json)
        .with_context(|| format!("Failed to load model snapshot {}", args.model.display()))?;

    let options = config.pipeline_options();
    let output = extract_plan_with_progress(&model, &model, &args.selection, &options, |p| {
        if p.completed % 100 == 0 {
            tracing::debug!(completed = p.completed, total = p.total, "Progress");
        }
        ControlFlow::Continue(())
    });

    if args.list {
        for group in &output.available {
            println!(
                "{}\t{:.2}\t{} elements",
                group.label, group.elevation, group.element_count
            );
        }
        return Ok(());
    }

    if output.groups.is_empty() {
        tracing::warn!("No storey selected; nothing to draw");
    }
    if !output.failures.is_empty() {
        tracing::warn!(count = output.failures.len(), "Some elements were skipped");
    }

    let walls = render_walls(&wall_rows(&output.wall_segments), args.format)?;
    write_output(args.output.as_ref(), &walls)?;

    if let Some(path) = &args.elements {
        let table = render_elements(&element_rows(&output.groups), table_format(path))?;
        write_output(Some(path), &table)?;
    }

    if let Some(path) = &args.attributes {
        let rows = collect_attributes(&model, &model, &args.selection, &options.shape);
        let table = render_attributes(&rows, table_format(path))?;
        write_output(Some(path), &table)?;
    }

    if let Some(path) = &args.drawing {
        let plan = assemble(&output.groups, &RenderPolicy::default());
        let wall_layout = assemble_wall_layout(&output.groups, &output.wall_segments);
        let document = DrawingDocument {
            plan: &plan,
            wall_layout: &wall_layout,
            storeys: &output.available,
            failures: &output.failures,
            stats: &output.stats,
        };
        write_output(Some(path), &serde_json::to_string_pretty(&document)?)?;
    }

    Ok(())
}
