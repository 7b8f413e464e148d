// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model loading and shape evaluation

use crate::EntityId;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a model or evaluating element shapes
#[derive(Error, Debug)]
pub enum Error {
    /// Mesh data violates the face/index invariants
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Element has no tessellated representation to evaluate
    #[error("Element {0} has no shape representation")]
    MissingRepresentation(EntityId),

    /// Referenced element does not exist in the model
    #[error("Element {0} not found")]
    UnknownElement(EntityId),

    /// Two elements share the same id
    #[error("Element {0} is defined more than once")]
    DuplicateElement(EntityId),

    /// Two storeys share the same name
    #[error("Storey '{0}' is defined more than once")]
    DuplicateStorey(String),

    /// Snapshot could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new invalid mesh error
    pub fn invalid_mesh(msg: impl Into<String>) -> Self {
        Error::InvalidMesh(msg.into())
    }
}
