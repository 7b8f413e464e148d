//! IFC-Plan Geometry Reduction
//!
//! Reduces world-coordinate element meshes to plan-view geometry: planar
//! projections tagged with an elevation, unique outline edges, and a single
//! centerline segment per wall computed from the principal axis of its
//! vertex cloud. Uses nalgebra for the covariance eigen-decomposition.

pub mod centerline;
pub mod edges;
pub mod error;
pub mod projection;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2};

pub use centerline::{
    principal_segment, reduce_wall, CenterlineOptions, DegenerateWallPolicy, WallSegment,
};
pub use edges::{closed_ring, unique_edges, Edge};
pub use error::{Error, Result};
pub use projection::{project, project_mesh, PlanGeometry, ProjectedElement};
