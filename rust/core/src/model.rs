// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory building model with resolved spatial containment

use crate::error::{Error, Result};
use crate::{BuildingElement, EntityId, Mesh3D, ModelSource, ShapeEvaluator, ShapeSettings};
use nalgebra::Vector3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Building storey
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Storey {
    /// Storey name, unique within a model
    pub name: String,
    /// Declared elevation in meters, if the model provides one
    pub elevation: Option<f64>,
    /// Contained elements, in model order
    pub elements: Vec<EntityId>,
}

impl Storey {
    /// Create a new storey
    pub fn new(name: impl Into<String>, elevation: Option<f64>) -> Self {
        Self {
            name: name.into(),
            elevation,
            elements: Vec::new(),
        }
    }

    /// Set contained elements
    pub fn with_elements(mut self, elements: impl IntoIterator<Item = EntityId>) -> Self {
        self.elements = elements.into_iter().collect();
        self
    }
}

/// Stored shape of an element
#[derive(Clone, Debug)]
enum Representation {
    Mesh {
        mesh: Mesh3D,
        /// Placement offset in file units
        placement: Vector3<f64>,
    },
    /// Representation data was present but unusable
    Invalid(String),
}

/// Parsed model with pre-tessellated element shapes
///
/// Implements both [`ModelSource`] and [`ShapeEvaluator`], which is what the
/// JSON snapshot workflow and the tests drive the pipeline with.
#[derive(Clone, Debug, Default)]
pub struct BuildingModel {
    elements: Vec<BuildingElement>,
    storeys: Vec<Storey>,
    element_index: FxHashMap<EntityId, usize>,
    /// element id -> index into `storeys`
    containment: FxHashMap<EntityId, usize>,
    representations: FxHashMap<EntityId, Representation>,
}

impl BuildingModel {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element with a local-coordinate mesh and a placement offset
    pub fn add_element(
        &mut self,
        element: BuildingElement,
        mesh: Option<Mesh3D>,
        placement: Vector3<f64>,
    ) -> Result<()> {
        let id = element.id;
        self.insert_element(element)?;
        if let Some(mesh) = mesh {
            self.representations
                .insert(id, Representation::Mesh { mesh, placement });
        }
        Ok(())
    }

    /// Add an element whose representation could not be decoded
    ///
    /// Shape evaluation for this element fails with [`Error::InvalidMesh`].
    pub fn add_invalid_element(
        &mut self,
        element: BuildingElement,
        reason: impl Into<String>,
    ) -> Result<()> {
        let id = element.id;
        self.insert_element(element)?;
        self.representations
            .insert(id, Representation::Invalid(reason.into()));
        Ok(())
    }

    fn insert_element(&mut self, element: BuildingElement) -> Result<()> {
        if self.element_index.contains_key(&element.id) {
            return Err(Error::DuplicateElement(element.id));
        }
        self.element_index.insert(element.id, self.elements.len());
        self.elements.push(element);
        Ok(())
    }

    /// Add a storey and register its containment relations
    ///
    /// Every contained element must already be in the model. An element
    /// listed by several storeys stays with the first one.
    pub fn add_storey(&mut self, storey: Storey) -> Result<()> {
        if self.storeys.iter().any(|s| s.name == storey.name) {
            return Err(Error::DuplicateStorey(storey.name));
        }
        if let Some(&missing) = storey
            .elements
            .iter()
            .find(|id| !self.element_index.contains_key(id))
        {
            return Err(Error::UnknownElement(missing));
        }

        let storey_idx = self.storeys.len();
        for id in &storey.elements {
            self.containment.entry(*id).or_insert(storey_idx);
        }
        self.storeys.push(storey);
        Ok(())
    }

    /// Parse a JSON model snapshot
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: crate::ModelSnapshot = serde_json::from_str(json)?;
        snapshot.into_model()
    }

    /// Number of elements
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

impl ModelSource for BuildingModel {
    fn storeys(&self) -> &[Storey] {
        &self.storeys
    }

    fn elements(&self) -> &[BuildingElement] {
        &self.elements
    }

    fn element(&self, id: EntityId) -> Option<&BuildingElement> {
        self.element_index.get(&id).map(|&idx| &self.elements[idx])
    }

    fn containing_storey(&self, id: EntityId) -> Option<&Storey> {
        self.containment.get(&id).map(|&idx| &self.storeys[idx])
    }
}

impl ShapeEvaluator for BuildingModel {
    fn create_shape(&self, element: &BuildingElement, settings: &ShapeSettings) -> Result<Mesh3D> {
        match self.representations.get(&element.id) {
            Some(Representation::Mesh { mesh, placement }) => {
                let offset = if settings.use_world_coords {
                    placement * settings.unit_scale
                } else {
                    Vector3::zeros()
                };
                Ok(mesh.transformed(settings.unit_scale, offset))
            }
            Some(Representation::Invalid(reason)) => Err(Error::InvalidMesh(reason.clone())),
            None => Err(Error::MissingRepresentation(element.id)),
        }
    }
}
