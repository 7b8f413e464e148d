// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall centerline reduction
//!
//! A wall's plan vertices (both faces, end caps, opening silhouettes) are
//! collapsed into one segment along the wall's long axis:
//!
//! 1. centroid and 2x2 covariance of the vertex cloud
//! 2. principal direction = eigenvector of the larger eigenvalue
//! 3. every vertex is projected onto that direction and split at the mean
//!    projection into a "low" and a "high" cluster
//! 4. start/end are the centroids of the two clusters, which approximate the
//!    midpoints of the wall's end faces
//!
//! The result only depends on the vertex set and is unaffected by
//! translation. Eigenvectors are defined up to sign, so the direction is
//! canonicalized to point towards +X (towards +Y for walls parallel to the
//! Y axis): `start` is the end with the smaller X. Under rotation or
//! numerical noise close to that boundary the start/end labels may swap;
//! the length does not change.
//!
//! A cloud with nearly equal eigenvalues, such as a square footprint, has no
//! well-defined principal axis. There the direction, the segment and its
//! length can all change under vertex permutation or small perturbations.

use crate::error::{Error, Result};
use crate::projection::ProjectedElement;
use ifc_plan_core::EntityId;
use nalgebra::{Matrix2, Point2, SymmetricEigen, Vector2};

/// Fewest vertices for which a covariance is meaningful
const MIN_VERTICES: usize = 3;

/// Principal variance (m²) at or below which a wall has no extent
const DEGENERATE_VARIANCE: f64 = 1e-12;

/// Tolerance for treating the principal direction as parallel to the Y axis
const AXIS_EPSILON: f64 = 1e-9;

/// What to do with a wall whose vertex cloud has zero extent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DegenerateWallPolicy {
    /// Fail with [`Error::DegenerateGeometry`]
    #[default]
    Reject,
    /// Emit a zero-length segment at the centroid
    Collapse,
}

/// Centerline reduction options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CenterlineOptions {
    pub degenerate: DegenerateWallPolicy,
}

/// Simplified wall representation
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    /// Source wall
    pub id: EntityId,
    pub name: String,
    /// Elevation in meters
    pub elevation: f64,
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    /// Distance between `start` and `end`
    pub length: f64,
}

/// Reduce a projected wall to its centerline
pub fn reduce_wall(wall: &ProjectedElement, options: &CenterlineOptions) -> Result<WallSegment> {
    let (start, end) = principal_segment(&wall.vertices, options.degenerate)?;
    Ok(WallSegment {
        id: wall.id,
        name: wall.name.clone(),
        elevation: wall.elevation,
        start,
        end,
        length: (end - start).norm(),
    })
}

/// Start and end of the principal-axis segment of a 2D vertex cloud
pub fn principal_segment(
    vertices: &[Point2<f64>],
    policy: DegenerateWallPolicy,
) -> Result<(Point2<f64>, Point2<f64>)> {
    if vertices.len() < MIN_VERTICES {
        return Err(Error::InsufficientGeometry {
            required: MIN_VERTICES,
            actual: vertices.len(),
        });
    }

    let count = vertices.len() as f64;
    let centroid = vertices
        .iter()
        .fold(Vector2::zeros(), |acc, p| acc + p.coords)
        / count;

    let mut covariance = Matrix2::zeros();
    for p in vertices {
        let centered = p.coords - centroid;
        covariance += centered * centered.transpose();
    }
    covariance /= count;

    let eigen = SymmetricEigen::new(covariance);
    let major = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
        0
    } else {
        1
    };
    let variance = eigen.eigenvalues[major];

    // NaN variance (non-finite input) is treated as degenerate as well
    if !(variance > DEGENERATE_VARIANCE) {
        return degenerate(
            policy,
            centroid,
            format!("principal variance {:e} m² has no measurable extent", variance),
        );
    }

    let direction = canonical_direction(eigen.eigenvectors.column(major).into_owned());

    let projected: Vec<f64> = vertices
        .iter()
        .map(|p| (p.coords - centroid).dot(&direction))
        .collect();
    let mean = projected.iter().sum::<f64>() / count;

    let mut low = (Vector2::zeros(), 0usize);
    let mut high = (Vector2::zeros(), 0usize);
    for (p, &s) in vertices.iter().zip(&projected) {
        let cluster = if s < mean { &mut low } else { &mut high };
        cluster.0 += p.coords;
        cluster.1 += 1;
    }

    if low.1 == 0 || high.1 == 0 {
        return degenerate(
            policy,
            centroid,
            "all vertices project to the same point on the principal axis".to_string(),
        );
    }

    let start = Point2::from(low.0 / low.1 as f64);
    let end = Point2::from(high.0 / high.1 as f64);
    Ok((start, end))
}

fn degenerate(
    policy: DegenerateWallPolicy,
    centroid: Vector2<f64>,
    reason: String,
) -> Result<(Point2<f64>, Point2<f64>)> {
    match policy {
        DegenerateWallPolicy::Reject => Err(Error::DegenerateGeometry(reason)),
        DegenerateWallPolicy::Collapse => {
            let c = Point2::from(centroid);
            Ok((c, c))
        }
    }
}

/// Unit vector with non-negative X (non-negative Y when X is ~0)
fn canonical_direction(v: Vector2<f64>) -> Vector2<f64> {
    let v = v.normalize();
    if v.x < -AXIS_EPSILON || (v.x.abs() <= AXIS_EPSILON && v.y < 0.0) {
        -v
    } else {
        v
    }
}
