// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Collaborator interfaces
//!
//! The floor-plan pipeline never parses model files or tessellates shapes
//! itself. It sees a parsed model through [`ModelSource`] and asks a
//! [`ShapeEvaluator`] for each element's mesh.

use crate::{BuildingElement, EntityId, Mesh3D, Result, Storey};

/// Shape evaluation settings
///
/// Built once per batch and passed by reference to every
/// [`ShapeEvaluator::create_shape`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSettings {
    /// Apply the element placement so the mesh is in world coordinates
    pub use_world_coords: bool,
    /// Scale factor from file units to meters (1.0 for meters, 0.001 for millimeters)
    pub unit_scale: f64,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            use_world_coords: true,
            unit_scale: 1.0,
        }
    }
}

/// Read-only access to a parsed building model
///
/// # Example
///
/// ```ignore
/// use ifc_plan_core::ModelSource;
///
/// fn list_storeys(model: &dyn ModelSource) {
///     for storey in model.storeys() {
///         println!("{} ({} elements)", storey.name, storey.elements.len());
///     }
/// }
/// ```
pub trait ModelSource {
    /// Storeys in model order
    fn storeys(&self) -> &[Storey];

    /// All building elements in model order
    fn elements(&self) -> &[BuildingElement];

    /// Look up an element by id
    fn element(&self, id: EntityId) -> Option<&BuildingElement>;

    /// Storey that spatially contains the element, if containment is known
    fn containing_storey(&self, id: EntityId) -> Option<&Storey>;

    /// Look up a storey by name
    fn storey(&self, name: &str) -> Option<&Storey> {
        self.storeys().iter().find(|s| s.name == name)
    }
}

/// Turns an element's representation into a triangulated mesh
///
/// Evaluation may be slow and may fail for individual elements; callers are
/// expected to keep going with the remaining elements.
pub trait ShapeEvaluator {
    /// Evaluate the element's shape
    fn create_shape(&self, element: &BuildingElement, settings: &ShapeSettings) -> Result<Mesh3D>;
}
