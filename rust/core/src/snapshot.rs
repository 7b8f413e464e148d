// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON model snapshot
//!
//! A snapshot is what a model parser plus shape evaluator hand over when
//! run ahead of time: storeys with their contained element ids, and elements
//! with a tessellated representation in the element's local frame.
//!
//! ```json
//! {
//!   "storeys": [{ "name": "Level 1", "elevation": 0.0, "elements": [1, 2] }],
//!   "elements": [
//!     {
//!       "id": 1,
//!       "type": "IfcWallStandardCase",
//!       "name": "Basic Wall",
//!       "placement": { "x": 0.0, "y": 0.0, "z": 0.0 },
//!       "representation": { "verts": [0.0, 0.0, 0.0, ...], "faces": [0, 1, 2, ...] },
//!       "quantities": [{ "name": "NetSideArea", "kind": "area", "value": 15.0 }]
//!     }
//!   ]
//! }
//! ```

use crate::error::Result;
use crate::{BuildingElement, BuildingModel, ElementKind, EntityId, Mesh3D, Quantity, Storey};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Root snapshot document
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelSnapshot {
    #[serde(default)]
    pub storeys: Vec<StoreyRecord>,
    #[serde(default)]
    pub elements: Vec<ElementRecord>,
}

/// Storey entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreyRecord {
    pub name: String,
    #[serde(default)]
    pub elevation: Option<f64>,
    /// Ids of contained elements
    #[serde(default)]
    pub elements: Vec<EntityId>,
}

/// Element entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: EntityId,
    /// IFC type name, e.g. "IfcWall"
    #[serde(rename = "type")]
    pub ifc_type: String,
    #[serde(default)]
    pub global_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub placement: Option<Placement>,
    #[serde(default)]
    pub representation: Option<RepresentationRecord>,
    #[serde(default)]
    pub quantities: Vec<Quantity>,
}

/// Translation of the element's local frame, in file units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Placement {
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

/// Tessellated shape
///
/// `faces` holds flat triangle index triples; `polygons` holds n-gons. Both
/// may be present and are concatenated (triangles first).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RepresentationRecord {
    pub verts: Vec<f64>,
    #[serde(default)]
    pub faces: Vec<u32>,
    #[serde(default)]
    pub polygons: Vec<Vec<u32>>,
}

impl RepresentationRecord {
    /// Validate and convert into a mesh
    pub fn to_mesh(&self) -> Result<Mesh3D> {
        if self.polygons.is_empty() {
            return Mesh3D::from_flat(&self.verts, &self.faces);
        }
        if self.faces.len() % 3 != 0 {
            return Err(crate::Error::invalid_mesh(format!(
                "index buffer length {} is not a multiple of 3",
                self.faces.len()
            )));
        }
        let polygons: Vec<Vec<u32>> = self
            .faces
            .chunks_exact(3)
            .map(|c| c.to_vec())
            .chain(self.polygons.iter().cloned())
            .collect();
        Mesh3D::from_flat_polygons(&self.verts, &polygons)
    }
}

impl ModelSnapshot {
    /// Build a [`BuildingModel`], resolving containment
    ///
    /// Structural problems (duplicate ids or storey names, dangling element
    /// references) fail the whole snapshot. A malformed representation only
    /// affects its own element: it is kept and fails at shape evaluation.
    pub fn into_model(self) -> Result<BuildingModel> {
        let mut model = BuildingModel::new();

        for record in self.elements {
            let element = BuildingElement {
                id: record.id,
                kind: ElementKind::from_ifc_type(&record.ifc_type),
                ifc_type: Some(record.ifc_type),
                global_id: record.global_id,
                name: record.name,
                placement: record.placement.map(|p| [p.x, p.y, p.z]),
                quantities: record.quantities,
            };
            let placement = record.placement.unwrap_or_default().to_vector();

            match record.representation.as_ref().map(RepresentationRecord::to_mesh) {
                Some(Ok(mesh)) => model.add_element(element, Some(mesh), placement)?,
                Some(Err(err)) => model.add_invalid_element(element, err.to_string())?,
                None => model.add_element(element, None, placement)?,
            }
        }

        for record in self.storeys {
            model.add_storey(Storey {
                name: record.name,
                elevation: record.elevation,
                elements: record.elements,
            })?;
        }

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModelSource, ShapeEvaluator, ShapeSettings};

    const SNAPSHOT: &str = r#"{
        "storeys": [
            { "name": "Level 1", "elevation": 0.0, "elements": [10, 11] },
            { "name": "Roof", "elements": [] }
        ],
        "elements": [
            {
                "id": 10,
                "type": "IfcWallStandardCase",
                "name": "Basic Wall",
                "global_id": "2O2Fr$t4X7Zf8NOew3FLOH",
                "placement": { "x": 5.0 },
                "representation": {
                    "verts": [0, 0, 0, 1, 0, 0, 1, 1, 0, 0, 1, 0],
                    "polygons": [[0, 1, 2, 3]]
                },
                "quantities": [
                    { "name": "Length", "kind": "length", "value": 1.0 },
                    { "name": "NetVolume", "kind": "volume" }
                ]
            },
            {
                "id": 11,
                "type": "IfcSlab",
                "representation": { "verts": [0, 0, 0], "faces": [0, 0, 4] }
            },
            { "id": 12, "type": "IfcColumn" }
        ]
    }"#;

    #[test]
    fn test_snapshot_into_model() {
        let model = BuildingModel::from_json(SNAPSHOT).unwrap();
        assert_eq!(model.element_count(), 3);
        assert_eq!(model.storeys().len(), 2);
        assert_eq!(model.storeys()[1].elevation, None);

        let wall = model.element(EntityId(10)).unwrap();
        assert_eq!(wall.kind, ElementKind::Wall);
        assert_eq!(wall.display_name(), "Basic Wall");
        assert_eq!(wall.global_id.as_deref(), Some("2O2Fr$t4X7Zf8NOew3FLOH"));
        assert_eq!(wall.placement, Some([5.0, 0.0, 0.0]));
        assert_eq!(wall.quantities.len(), 2);
        assert_eq!(wall.quantities[0].kind, crate::QuantityKind::Length);
        assert_eq!(wall.quantities[1].value, None);
        assert_eq!(model.element(EntityId(12)).unwrap().placement, None);
        assert_eq!(model.containing_storey(EntityId(11)).unwrap().name, "Level 1");
        assert!(model.containing_storey(EntityId(12)).is_none());

        let mesh = model.create_shape(wall, &ShapeSettings::default()).unwrap();
        assert_eq!(mesh.faces()[0].len(), 4);
        assert_eq!(mesh.points()[0].x, 5.0);
    }

    #[test]
    fn test_bad_representation_is_per_element() {
        let model = BuildingModel::from_json(SNAPSHOT).unwrap();
        let slab = model.element(EntityId(11)).unwrap();
        assert!(model.create_shape(slab, &ShapeSettings::default()).is_err());

        let column = model.element(EntityId(12)).unwrap();
        assert_eq!(column.kind, ElementKind::Other);
        assert!(model.create_shape(column, &ShapeSettings::default()).is_err());
    }

    #[test]
    fn test_dangling_storey_reference_is_fatal() {
        let json = r#"{ "storeys": [{ "name": "A", "elements": [1] }], "elements": [] }"#;
        assert!(BuildingModel::from_json(json).is_err());
    }
}
