// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan assembly: selected storey groups to styled drawing primitives
//!
//! The drawing is a flat, serializable list of primitives plus a legend, in
//! the order a renderer should paint them. Storey colours come from a fixed
//! ten-colour palette indexed by the group's position in the selection.

use crate::grouping::StoreyGroup;
use ifc_plan_core::{ElementKind, EntityId, Face};
use ifc_plan_geometry::{closed_ring, unique_edges, Point2, ProjectedElement, WallSegment};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Categorical storey palette (matplotlib tab10)
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Colour of the storey at `position` in the selection
pub fn storey_color(position: usize) -> &'static str {
    PALETTE[position % PALETTE.len()]
}

/// Dash pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Stroke parameters except colour, which comes from the storey
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub width: f64,
    pub line: LineStyle,
    pub alpha: f64,
}

/// Fixed face fill
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub color: String,
    pub alpha: f64,
}

/// How the faces of one element kind are drawn
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FaceRendering {
    /// Filled face polygons, then every unique edge once
    FillWithEdges { fill: FillStyle, edge: StrokeStyle },
    /// One closed polyline per face
    Outline { stroke: StrokeStyle },
}

/// Per-kind rendering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderPolicy {
    pub wall: FaceRendering,
    pub slab: FaceRendering,
    pub other: FaceRendering,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        let outline = FaceRendering::Outline {
            stroke: StrokeStyle {
                width: 0.5,
                line: LineStyle::Dotted,
                alpha: 0.7,
            },
        };
        Self {
            wall: FaceRendering::FillWithEdges {
                fill: FillStyle {
                    color: "#d3d3d3".to_string(),
                    alpha: 0.3,
                },
                edge: StrokeStyle {
                    width: 0.3,
                    line: LineStyle::Solid,
                    alpha: 1.0,
                },
            },
            slab: outline.clone(),
            other: outline,
        }
    }
}

impl RenderPolicy {
    pub fn rendering(&self, kind: ElementKind) -> &FaceRendering {
        match kind {
            ElementKind::Wall => &self.wall,
            ElementKind::Slab => &self.slab,
            ElementKind::Other => &self.other,
        }
    }
}

/// Resolved stroke of a primitive
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
    pub line: LineStyle,
    pub alpha: f64,
}

impl Stroke {
    fn new(color: &str, style: &StrokeStyle) -> Self {
        Self {
            color: color.to_string(),
            width: style.width,
            line: style.line,
            alpha: style.alpha,
        }
    }
}

/// Drawable item
///
/// Fills do not contribute legend entries; strokes do.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Primitive {
    Polygon {
        points: Vec<[f64; 2]>,
        fill: FillStyle,
        label: String,
    },
    Line {
        from: [f64; 2],
        to: [f64; 2],
        stroke: Stroke,
        label: String,
    },
    Polyline {
        points: Vec<[f64; 2]>,
        stroke: Stroke,
        label: String,
    },
}

impl Primitive {
    pub fn label(&self) -> &str {
        match self {
            Primitive::Polygon { label, .. }
            | Primitive::Line { label, .. }
            | Primitive::Polyline { label, .. } => label,
        }
    }

    fn stroke(&self) -> Option<&Stroke> {
        match self {
            Primitive::Polygon { .. } => None,
            Primitive::Line { stroke, .. } | Primitive::Polyline { stroke, .. } => Some(stroke),
        }
    }
}

/// One legend row
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub stroke: Stroke,
}

/// Assembled plan
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDrawing {
    pub title: String,
    pub primitives: Vec<Primitive>,
    pub legend: Vec<LegendEntry>,
}

impl PlanDrawing {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Collapse primitive labels into legend rows, first style wins
    fn build_legend(&mut self) {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut legend = Vec::new();
        for primitive in &self.primitives {
            if let Some(stroke) = primitive.stroke() {
                if seen.insert(primitive.label()) {
                    legend.push(LegendEntry {
                        label: primitive.label().to_string(),
                        stroke: stroke.clone(),
                    });
                }
            }
        }
        self.legend = legend;
    }
}

#[inline]
fn xy(p: Point2<f64>) -> [f64; 2] {
    [p.x, p.y]
}

fn face_ring(element: &ProjectedElement, face: &Face) -> Vec<[f64; 2]> {
    closed_ring(face)
        .into_iter()
        .map(|i| xy(element.vertices[i as usize]))
        .collect()
}

fn draw_element(
    drawing: &mut PlanDrawing,
    element: &ProjectedElement,
    rendering: &FaceRendering,
    color: &str,
    label: &str,
) {
    match rendering {
        FaceRendering::FillWithEdges { fill, edge } => {
            for face in &element.faces {
                drawing.push(Primitive::Polygon {
                    points: element.face_points(face).map(xy).collect(),
                    fill: fill.clone(),
                    label: label.to_string(),
                });
            }
            for (a, b) in unique_edges(&element.faces) {
                drawing.push(Primitive::Line {
                    from: xy(element.vertices[a as usize]),
                    to: xy(element.vertices[b as usize]),
                    stroke: Stroke::new(color, edge),
                    label: label.to_string(),
                });
            }
        }
        FaceRendering::Outline { stroke } => {
            for face in &element.faces {
                drawing.push(Primitive::Polyline {
                    points: face_ring(element, face),
                    stroke: Stroke::new(color, stroke),
                    label: label.to_string(),
                });
            }
        }
    }
}

/// Draw the selected groups
///
/// Groups are drawn in the given order, elements in group order. Primitive
/// labels read "{storey label} - {kind}".
pub fn assemble(groups: &[StoreyGroup], policy: &RenderPolicy) -> PlanDrawing {
    let mut drawing = PlanDrawing::new("Floor Plans - Multiple Levels Overlay");

    for (position, group) in groups.iter().enumerate() {
        let color = storey_color(position);
        for element in &group.elements {
            let label = format!("{} - {}", group.label, element.kind);
            draw_element(
                &mut drawing,
                element,
                policy.rendering(element.kind),
                color,
                &label,
            );
        }
    }

    drawing.build_legend();
    tracing::debug!(
        primitives = drawing.primitives.len(),
        legend = drawing.legend.len(),
        "Assembled plan"
    );
    drawing
}

/// Draw one line per wall centerline, coloured and labelled by storey
///
/// Segments whose wall is not in `groups` are skipped.
pub fn assemble_wall_layout(groups: &[StoreyGroup], segments: &[WallSegment]) -> PlanDrawing {
    let stroke = StrokeStyle {
        width: 2.0,
        line: LineStyle::Solid,
        alpha: 1.0,
    };

    let mut owner: FxHashMap<EntityId, usize> = FxHashMap::default();
    for (position, group) in groups.iter().enumerate() {
        for element in &group.elements {
            owner.entry(element.id).or_insert(position);
        }
    }

    let mut drawing = PlanDrawing::new("Simplified Wall Layout - Multiple Levels Overlay");
    for segment in segments {
        let Some(&position) = owner.get(&segment.id) else {
            continue;
        };
        drawing.push(Primitive::Line {
            from: xy(segment.start),
            to: xy(segment.end),
            stroke: Stroke::new(storey_color(position), &stroke),
            label: groups[position].label.clone(),
        });
    }

    drawing.build_legend();
    drawing
}
