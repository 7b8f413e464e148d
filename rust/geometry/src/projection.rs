// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plan-view projection of element meshes

use crate::error::{Error, Result};
use ifc_plan_core::{BuildingElement, ElementKind, EntityId, Face, Mesh3D};
use nalgebra::Point2;

/// Mesh flattened onto the XY plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlanGeometry {
    /// XY of every mesh point, in the original point order
    pub vertices: Vec<Point2<f64>>,
    /// Faces, unchanged from the source mesh
    pub faces: Vec<Face>,
    /// Elevation in meters
    pub elevation: f64,
}

/// Drop Z from every point of `mesh`
///
/// Point order is preserved so the face index lists stay valid as-is. The
/// elevation is `elevation_hint` when given (a storey's declared elevation),
/// otherwise the mean Z of all points.
pub fn project_mesh(mesh: &Mesh3D, elevation_hint: Option<f64>) -> Result<PlanGeometry> {
    let mean_z = mesh.mean_z().ok_or(Error::EmptyGeometry)?;

    let vertices = mesh.points().iter().map(|p| Point2::new(p.x, p.y)).collect();

    Ok(PlanGeometry {
        vertices,
        faces: mesh.faces().to_vec(),
        elevation: elevation_hint.unwrap_or(mean_z),
    })
}

/// A building element reduced to plan view
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedElement {
    pub id: EntityId,
    pub kind: ElementKind,
    /// Display name ("Unnamed" when the element has none)
    pub name: String,
    pub vertices: Vec<Point2<f64>>,
    pub faces: Vec<Face>,
    /// Elevation in meters
    pub elevation: f64,
}

impl ProjectedElement {
    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get face count
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertices of one face, in face order
    pub fn face_points<'a>(&'a self, face: &'a Face) -> impl Iterator<Item = Point2<f64>> + 'a {
        face.iter().map(move |&i| self.vertices[i as usize])
    }
}

/// Project an element's mesh
pub fn project(
    element: &BuildingElement,
    mesh: &Mesh3D,
    elevation_hint: Option<f64>,
) -> Result<ProjectedElement> {
    let plan = project_mesh(mesh, elevation_hint)?;
    Ok(ProjectedElement {
        id: element.id,
        kind: element.kind,
        name: element.display_name().to_string(),
        vertices: plan.vertices,
        faces: plan.faces,
        elevation: plan.elevation,
    })
}
