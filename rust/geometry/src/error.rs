use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during plan reduction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Empty geometry: mesh has no points")]
    EmptyGeometry,

    #[error("Insufficient geometry: need at least {required} vertices, got {actual}")]
    InsufficientGeometry { required: usize, actual: usize },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
