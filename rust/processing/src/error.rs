// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the floor-plan pipeline

use thiserror::Error;

/// Result type for processing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while extracting or exporting a floor plan
#[derive(Error, Debug)]
pub enum Error {
    #[error("Shape evaluation failed: {0}")]
    Shape(#[from] ifc_plan_core::Error),

    #[error("Geometry reduction failed: {0}")]
    Geometry(#[from] ifc_plan_geometry::Error),

    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
