// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan extraction pipeline shared by the CLI and tests
//!
//! [`extract_plan`] evaluates and projects the selected elements of a
//! model, groups them by storey and reduces walls to centerlines.
//! [`assemble`] turns the selected groups into drawing primitives and
//! [`export`] renders the element, attribute and wall tables.

pub mod assembler;
pub mod attributes;
pub mod error;
pub mod export;
pub mod grouping;
pub mod pipeline;
pub mod selection;

pub use assembler::{
    assemble, assemble_wall_layout, FaceRendering, FillStyle, LegendEntry, LineStyle,
    PlanDrawing, Primitive, RenderPolicy, Stroke, StrokeStyle, PALETTE,
};
pub use attributes::{collect_attributes, ElementAttributesRow};
pub use error::{Error, Result};
pub use export::{
    element_rows, render_attributes, render_elements, render_walls, wall_rows, ElementRow,
    ExportFormat, WallSegmentRow,
};
pub use grouping::{group, GroupKey, GroupingStrategy, StoreyGroup};
pub use pipeline::{
    extract_plan, extract_plan_with_progress, ElementFailure, ElevationSource, GroupSummary,
    PipelineOptions, PipelineStats, PlanOutput, Progress, Stage,
};
pub use selection::{Selection, StoreySelector};
