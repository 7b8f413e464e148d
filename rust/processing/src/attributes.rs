// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element attribute table
//!
//! One row per element of the selected kinds, across all storeys: name,
//! GlobalId, placement location, mesh bounding-box dimensions and base
//! quantities. An attribute the model does not provide is left out of the
//! row; it never fails the element.

use crate::grouping::round_to;
use crate::selection::Selection;
use ifc_plan_core::{BuildingElement, ModelSource, ShapeEvaluator, ShapeSettings, Vector3};
use serde::Serialize;
use std::collections::BTreeMap;

/// Attributes of one element, values rounded to 2 decimals
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ElementAttributesRow {
    /// IFC type name, or the element kind when unknown
    #[serde(rename = "Type")]
    pub ifc_type: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "GUID", skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Placement location in meters
    #[serde(rename = "Global X", skip_serializing_if = "Option::is_none")]
    pub global_x: Option<f64>,
    #[serde(rename = "Global Y", skip_serializing_if = "Option::is_none")]
    pub global_y: Option<f64>,
    #[serde(rename = "Global Z", skip_serializing_if = "Option::is_none")]
    pub global_z: Option<f64>,
    /// Bounding-box extent along X
    #[serde(rename = "Bounding Box Length", skip_serializing_if = "Option::is_none")]
    pub bbox_length: Option<f64>,
    /// Along Y
    #[serde(rename = "Bounding Box Width", skip_serializing_if = "Option::is_none")]
    pub bbox_width: Option<f64>,
    /// Along Z
    #[serde(rename = "Bounding Box Height", skip_serializing_if = "Option::is_none")]
    pub bbox_height: Option<f64>,
    /// "Length_Width", "Area_NetSideArea", ...
    #[serde(flatten)]
    pub quantities: BTreeMap<String, f64>,
}

impl ElementAttributesRow {
    /// Fixed columns, before the quantity columns
    pub const HEADER: &'static [&'static str] = &[
        "Type",
        "Name",
        "GUID",
        "Global X",
        "Global Y",
        "Global Z",
        "Bounding Box Length",
        "Bounding Box Width",
        "Bounding Box Height",
    ];

    /// Build a row; `dimensions` is the mesh bounding-box extent in meters
    pub fn new(element: &BuildingElement, dimensions: Option<Vector3<f64>>, unit_scale: f64) -> Self {
        let placement = element.placement.map(|p| p.map(|v| round_to(v * unit_scale, 2)));
        let extent = dimensions.map(|d| d.map(|v| round_to(v, 2)));

        let quantities = element
            .quantities
            .iter()
            .filter_map(|q| {
                let value = q.value.filter(|v| v.is_finite())?;
                Some((format!("{}_{}", q.kind.prefix(), q.name), round_to(value, 2)))
            })
            .collect();

        Self {
            ifc_type: element
                .ifc_type
                .clone()
                .unwrap_or_else(|| element.kind.name().to_string()),
            name: element.display_name().to_string(),
            guid: element.global_id.clone().filter(|g| !g.trim().is_empty()),
            global_x: placement.map(|p| p[0]),
            global_y: placement.map(|p| p[1]),
            global_z: placement.map(|p| p[2]),
            bbox_length: extent.map(|e| e.x),
            bbox_width: extent.map(|e| e.y),
            bbox_height: extent.map(|e| e.z),
            quantities,
        }
    }

    /// Values of the fixed columns, `None` where absent
    pub(crate) fn fixed_cells(&self) -> [Option<String>; 9] {
        let number = |v: Option<f64>| v.map(crate::export::format_number);
        [
            Some(self.ifc_type.clone()),
            Some(self.name.clone()),
            self.guid.clone(),
            number(self.global_x),
            number(self.global_y),
            number(self.global_z),
            number(self.bbox_length),
            number(self.bbox_width),
            number(self.bbox_height),
        ]
    }
}

/// Attribute rows for every element of the selected kinds, in model order
///
/// Storey selectors are not applied. Elements whose shape cannot be
/// evaluated get a row without bounding-box columns.
pub fn collect_attributes<S, E>(
    source: &S,
    evaluator: &E,
    selection: &Selection,
    settings: &ShapeSettings,
) -> Vec<ElementAttributesRow>
where
    S: ModelSource + ?Sized,
    E: ShapeEvaluator + ?Sized,
{
    let rows: Vec<ElementAttributesRow> = source
        .elements()
        .iter()
        .filter(|e| selection.includes_kind(e.kind))
        .map(|element| {
            let dimensions = match evaluator.create_shape(element, settings) {
                Ok(mesh) => mesh.bounds().map(|(min, max)| max - min),
                Err(err) => {
                    tracing::warn!(
                        element = %element.id,
                        name = element.display_name(),
                        error = %err,
                        "No geometry for element attributes"
                    );
                    None
                }
            };
            ElementAttributesRow::new(element, dimensions, settings.unit_scale)
        })
        .collect();

    tracing::debug!(rows = rows.len(), "Collected element attributes");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_plan_core::{BuildingModel, ElementKind, Mesh3D, QuantityKind};

    fn model() -> BuildingModel {
        let mut model = BuildingModel::new();
        let wall = BuildingElement::new(1u32, ElementKind::Wall)
            .with_name("Basic Wall")
            .with_ifc_type("IfcWallStandardCase")
            .with_global_id("3vB2YO$MX4xv5uCqZZG05x")
            .with_placement(10.0, 2.5, 0.0)
            .with_quantity("Width", QuantityKind::Length, Some(0.2))
            .with_quantity("NetSideArea", QuantityKind::Area, Some(14.996))
            .with_quantity("NetVolume", QuantityKind::Volume, None);
        let mesh = Mesh3D::from_flat(
            &[0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 4.0, 0.2, 3.0, 0.0, 0.2, 3.0],
            &[0, 1, 2, 0, 2, 3],
        )
        .unwrap();
        model
            .add_element(wall, Some(mesh), Vector3::new(10.0, 2.5, 0.0))
            .unwrap();

        // no placement, no representation
        let column = BuildingElement::new(2u32, ElementKind::Other);
        model.add_element(column, None, Vector3::zeros()).unwrap();
        model
    }

    #[test]
    fn test_full_row() {
        let model = model();
        let rows = collect_attributes(&model, &model, &Selection::new(), &ShapeSettings::default());
        assert_eq!(rows.len(), 2);

        let wall = &rows[0];
        assert_eq!(wall.ifc_type, "IfcWallStandardCase");
        assert_eq!(wall.guid.as_deref(), Some("3vB2YO$MX4xv5uCqZZG05x"));
        assert_eq!(wall.global_x, Some(10.0));
        assert_eq!(wall.global_y, Some(2.5));
        assert_eq!(wall.bbox_length, Some(4.0));
        assert_eq!(wall.bbox_width, Some(0.2));
        assert_eq!(wall.bbox_height, Some(3.0));
        assert_eq!(wall.quantities.get("Length_Width"), Some(&0.2));
        assert_eq!(wall.quantities.get("Area_NetSideArea"), Some(&15.0));
    }

    #[test]
    fn test_missing_attributes_are_omitted() {
        let model = model();
        let rows = collect_attributes(&model, &model, &Selection::new(), &ShapeSettings::default());
        let value = serde_json::to_value(&rows).unwrap();

        let column = value[1].as_object().unwrap();
        assert_eq!(column["Type"], "Other");
        assert_eq!(column["Name"], "Unnamed");
        for absent in ["GUID", "Global X", "Global Z", "Bounding Box Length", "Bounding Box Height"] {
            assert!(!column.contains_key(absent), "{} should be omitted", absent);
        }

        // quantity without a value
        let wall = value[0].as_object().unwrap();
        assert!(!wall.contains_key("Volume_NetVolume"));
        assert_eq!(wall["Length_Width"], 0.2);
    }

    #[test]
    fn test_unit_scale_and_kind_filter() {
        let model = model();
        let settings = ShapeSettings {
            use_world_coords: true,
            unit_scale: 0.001,
        };
        let selection = Selection::new().with_kinds([ElementKind::Wall]);
        let rows = collect_attributes(&model, &model, &selection, &settings);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].global_x, Some(0.01));
        assert_eq!(rows[0].bbox_height, Some(0.0));
    }
}
