// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan extraction pipeline
//!
//! Evaluates, projects and groups the selected elements of a model, then
//! reduces the walls of the selected storeys to centerlines. Runs
//! single-threaded; a failing element is logged, recorded and skipped.

use crate::error::Error;
use crate::grouping::{group, GroupingStrategy, StoreyGroup};
use crate::selection::Selection;
use ifc_plan_core::{BuildingElement, ElementKind, EntityId, ModelSource, ShapeEvaluator, ShapeSettings};
use ifc_plan_geometry::{project, reduce_wall, CenterlineOptions, WallSegment};
use serde::Serialize;
use std::ops::ControlFlow;
use std::time::Instant;

/// Where a projected element's elevation comes from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElevationSource {
    /// The containing storey's declared elevation, mesh mean Z as fallback
    #[default]
    StoreyDeclared,
    /// Always the mean Z of the mesh
    MeshMean,
}

/// Settings for one extraction run
#[derive(Clone, Debug, Default)]
pub struct PipelineOptions {
    pub grouping: GroupingStrategy,
    pub elevation: ElevationSource,
    pub centerline: CenterlineOptions,
    pub shape: ShapeSettings,
}

/// Step at which an element was dropped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Shape,
    Projection,
    Centerline,
}

/// A skipped element
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElementFailure {
    pub element: EntityId,
    pub name: String,
    pub stage: Stage,
    pub message: String,
}

/// Progress report, sent before each element is evaluated
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Elements finished so far
    pub completed: usize,
    pub total: usize,
    /// Element about to be evaluated
    pub next: EntityId,
}

/// Group overview, covering every group whether selected or not
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    pub label: String,
    pub elevation: f64,
    pub element_count: usize,
}

/// Run counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Elements of the selected kinds in the model
    pub candidates: usize,
    pub projected: usize,
    pub failed: usize,
    pub groups: usize,
    pub selected_groups: usize,
    pub wall_segments: usize,
    pub total_vertices: usize,
    pub total_faces: usize,
}

/// Result of one run
#[derive(Clone, Debug, Default)]
pub struct PlanOutput {
    /// Selected groups, in selection order
    pub groups: Vec<StoreyGroup>,
    pub available: Vec<GroupSummary>,
    /// Centerlines of the walls in `groups`, in drawing order
    pub wall_segments: Vec<WallSegment>,
    pub failures: Vec<ElementFailure>,
    /// Set when the progress callback stopped the run early
    pub cancelled: bool,
    pub stats: PipelineStats,
}

/// Extract a floor plan
pub fn extract_plan<S, E>(
    source: &S,
    evaluator: &E,
    selection: &Selection,
    options: &PipelineOptions,
) -> PlanOutput
where
    S: ModelSource + ?Sized,
    E: ShapeEvaluator + ?Sized,
{
    extract_plan_with_progress(source, evaluator, selection, options, |_| {
        ControlFlow::Continue(())
    })
}

/// Extract a floor plan, reporting progress
///
/// Returning [`ControlFlow::Break`] from `on_progress` stops evaluating
/// further elements; whatever was projected so far is still grouped and
/// reduced, and the output is marked `cancelled`.
pub fn extract_plan_with_progress<S, E, F>(
    source: &S,
    evaluator: &E,
    selection: &Selection,
    options: &PipelineOptions,
    mut on_progress: F,
) -> PlanOutput
where
    S: ModelSource + ?Sized,
    E: ShapeEvaluator + ?Sized,
    F: FnMut(Progress) -> ControlFlow<()>,
{
    let start = Instant::now();
    let mut output = PlanOutput::default();

    let candidates: Vec<&BuildingElement> = source
        .elements()
        .iter()
        .filter(|e| selection.includes_kind(e.kind))
        .collect();
    let total = candidates.len();
    output.stats.candidates = total;

    tracing::info!(
        candidates = total,
        storeys = source.storeys().len(),
        grouping = ?options.grouping,
        "Starting floor-plan extraction"
    );

    let mut entries = Vec::with_capacity(total);
    for (completed, element) in candidates.into_iter().enumerate() {
        let progress = Progress {
            completed,
            total,
            next: element.id,
        };
        if on_progress(progress).is_break() {
            tracing::info!(completed, total, "Extraction cancelled");
            output.cancelled = true;
            break;
        }

        let storey = source.containing_storey(element.id);

        let mesh = match evaluator.create_shape(element, &options.shape) {
            Ok(mesh) => mesh,
            Err(err) => {
                record_failure(&mut output.failures, element, Stage::Shape, err.into());
                continue;
            }
        };

        let hint = match options.elevation {
            ElevationSource::StoreyDeclared => storey.and_then(|s| s.elevation),
            ElevationSource::MeshMean => None,
        };

        match project(element, &mesh, hint) {
            Ok(projected) => {
                tracing::debug!(
                    element = %element.id,
                    kind = %element.kind,
                    vertices = projected.vertex_count(),
                    elevation = projected.elevation,
                    "Projected element"
                );
                entries.push((projected, storey));
            }
            Err(err) => {
                record_failure(&mut output.failures, element, Stage::Projection, err.into());
            }
        }
    }
    output.stats.projected = entries.len();

    let mut groups = group(entries, &options.grouping);
    output.available = groups
        .iter()
        .map(|g| GroupSummary {
            label: g.label.clone(),
            elevation: g.elevation,
            element_count: g.len(),
        })
        .collect();
    output.stats.groups = groups.len();

    // Move the selected groups out in selection order
    let picked = selection.resolve(&groups);
    let mut slots: Vec<Option<StoreyGroup>> = groups.drain(..).map(Some).collect();
    output.groups = picked.into_iter().filter_map(|i| slots[i].take()).collect();
    output.stats.selected_groups = output.groups.len();

    for group in &output.groups {
        for element in group.elements.iter().filter(|e| e.kind == ElementKind::Wall) {
            match reduce_wall(element, &options.centerline) {
                Ok(segment) => output.wall_segments.push(segment),
                Err(err) => {
                    tracing::warn!(
                        element = %element.id,
                        name = %element.name,
                        error = %err,
                        "Could not reduce wall to a centerline"
                    );
                    output.failures.push(ElementFailure {
                        element: element.id,
                        name: element.name.clone(),
                        stage: Stage::Centerline,
                        message: Error::from(err).to_string(),
                    });
                }
            }
        }
    }

    for element in output.groups.iter().flat_map(|g| &g.elements) {
        output.stats.total_vertices += element.vertex_count();
        output.stats.total_faces += element.face_count();
    }
    output.stats.wall_segments = output.wall_segments.len();
    output.stats.failed = output.failures.len();

    tracing::info!(
        projected = output.stats.projected,
        failed = output.stats.failed,
        groups = output.stats.groups,
        selected = output.stats.selected_groups,
        walls = output.stats.wall_segments,
        total_time_ms = start.elapsed().as_millis(),
        "Floor-plan extraction complete"
    );

    output
}

fn record_failure(
    failures: &mut Vec<ElementFailure>,
    element: &BuildingElement,
    stage: Stage,
    err: Error,
) {
    tracing::warn!(
        element = %element.id,
        name = element.display_name(),
        stage = ?stage,
        error = %err,
        "Skipping element"
    );
    failures.push(ElementFailure {
        element: element.id,
        name: element.display_name().to_string(),
        stage,
        message: err.to_string(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_plan_core::{BuildingModel, Mesh3D, Storey, Vector3};

    fn slab_at(z: f64) -> Mesh3D {
        Mesh3D::from_flat(
            &[0.0, 0.0, z, 2.0, 0.0, z, 2.0, 2.0, z, 0.0, 2.0, z],
            &[0, 1, 2, 0, 2, 3],
        )
        .unwrap()
    }

    fn model() -> BuildingModel {
        let mut model = BuildingModel::new();
        for (id, z) in [(1u32, 0.0), (2, 3.0), (3, 0.0)] {
            let element = BuildingElement::new(id, ElementKind::Slab).with_name(format!("S{}", id));
            model.add_element(element, Some(slab_at(z)), Vector3::zeros()).unwrap();
        }
        model
    }

    #[test]
    fn test_elevation_grouping_without_storeys() {
        let model = model();
        let options = PipelineOptions {
            grouping: GroupingStrategy::RoundedElevation { decimals: 2 },
            ..Default::default()
        };
        let output = extract_plan(&model, &model, &Selection::new(), &options);

        assert_eq!(output.available.len(), 2);
        // default selection is the first group
        assert_eq!(output.groups.len(), 1);
        assert_eq!(output.groups[0].label, "Level 0.00m");
        assert_eq!(output.groups[0].len(), 2);
        assert_eq!(output.stats.total_vertices, 8);
    }

    #[test]
    fn test_kind_filter_skips_evaluation() {
        let model = model();
        let selection = Selection::new().with_kinds([ElementKind::Wall]);
        let output = extract_plan(&model, &model, &selection, &PipelineOptions::default());

        assert_eq!(output.stats.candidates, 0);
        assert!(output.groups.is_empty());
        assert!(output.failures.is_empty());
    }

    #[test]
    fn test_storey_elevation_is_authoritative() {
        let mut model = model();
        model
            .add_storey(Storey::new("Level 2", Some(2.9)).with_elements([EntityId(2)]))
            .unwrap();
        let selection = Selection::new().with_storey("Level 2");
        let output = extract_plan(&model, &model, &selection, &PipelineOptions::default());
        assert_eq!(output.groups[0].elements[0].elevation, 2.9);

        let options = PipelineOptions {
            elevation: ElevationSource::MeshMean,
            ..Default::default()
        };
        let output = extract_plan(&model, &model, &selection, &options);
        assert_eq!(output.groups[0].elements[0].elevation, 3.0);
    }

    #[test]
    fn test_progress_reports_every_element() {
        let model = model();
        let mut seen = Vec::new();
        let output = extract_plan_with_progress(
            &model,
            &model,
            &Selection::new(),
            &PipelineOptions::default(),
            |p| {
                seen.push((p.completed, p.total, p.next));
                ControlFlow::Continue(())
            },
        );
        assert!(!output.cancelled);
        assert_eq!(
            seen,
            vec![(0, 3, EntityId(1)), (1, 3, EntityId(2)), (2, 3, EntityId(3))]
        );
    }
}
