// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! World-coordinate polygon mesh as produced by the shape evaluator

use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

/// Indices of one polygonal face (at least 3)
pub type Face = SmallVec<[u32; 4]>;

/// Polygon mesh in world coordinates
///
/// Every face index is checked against the point list on construction, so
/// consumers can index `points()` with face entries without bounds checks
/// failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh3D {
    points: Vec<Point3<f64>>,
    faces: Vec<Face>,
}

impl Mesh3D {
    /// Create a mesh, validating face arity and index bounds
    pub fn new(points: Vec<Point3<f64>>, faces: Vec<Face>) -> Result<Self> {
        for (face_idx, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::invalid_mesh(format!(
                    "face {} has {} indices, need at least 3",
                    face_idx,
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&i| i as usize >= points.len()) {
                return Err(Error::invalid_mesh(format!(
                    "face {} references vertex {} but mesh has {} points",
                    face_idx,
                    bad,
                    points.len()
                )));
            }
        }
        Ok(Self { points, faces })
    }

    /// Build from flat coordinate triples and flat triangle index triples
    ///
    /// This is the layout tessellators typically hand out
    /// (`[x0, y0, z0, x1, ...]`, `[i0, i1, i2, ...]`).
    pub fn from_flat(verts: &[f64], indices: &[u32]) -> Result<Self> {
        if verts.len() % 3 != 0 {
            return Err(Error::invalid_mesh(format!(
                "vertex buffer length {} is not a multiple of 3",
                verts.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(Error::invalid_mesh(format!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            )));
        }

        let points = verts
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = indices
            .chunks_exact(3)
            .map(|c| Face::from_slice(c))
            .collect();

        Self::new(points, faces)
    }

    /// Build from flat coordinate triples and explicit polygons
    pub fn from_flat_polygons(verts: &[f64], polygons: &[Vec<u32>]) -> Result<Self> {
        if verts.len() % 3 != 0 {
            return Err(Error::invalid_mesh(format!(
                "vertex buffer length {} is not a multiple of 3",
                verts.len()
            )));
        }

        let points = verts
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let faces = polygons.iter().map(|p| Face::from_slice(p)).collect();

        Self::new(points, faces)
    }

    /// Vertex positions
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Faces as index lists into [`points`](Self::points)
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Get vertex count
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Get face count
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if mesh has no points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of all Z coordinates, `None` for an empty mesh
    pub fn mean_z(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let sum: f64 = self.points.iter().map(|p| p.z).sum();
        Some(sum / self.points.len() as f64)
    }

    /// Axis-aligned bounds (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.points.first()?;
        let bounds = self.points.iter().fold((first, first), |(mut min, mut max), p| {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
            (min, max)
        });
        Some(bounds)
    }

    /// Scale then translate every point; faces are untouched
    pub fn transformed(&self, scale: f64, offset: Vector3<f64>) -> Self {
        let points = self
            .points
            .iter()
            .map(|p| Point3::from(p.coords * scale + offset))
            .collect();
        Self {
            points,
            faces: self.faces.clone(),
        }
    }
}
