// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Plan Core
//!
//! Shared building-model types and the interfaces the floor-plan pipeline uses
//! to talk to its external collaborators.
//!
//! ## Overview
//!
//! - **Data model**: [`BuildingElement`], [`ElementKind`], [`Storey`], [`Mesh3D`]
//! - **Collaborators**: [`ModelSource`] resolves storeys and spatial containment,
//!   [`ShapeEvaluator`] turns an element into a world-coordinate triangle mesh
//! - **Snapshots**: [`ModelSnapshot`] is a JSON document of pre-tessellated
//!   elements that implements both collaborator traits through [`BuildingModel`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_plan_core::{BuildingModel, ModelSource, ShapeEvaluator, ShapeSettings};
//!
//! let model = BuildingModel::from_json(&std::fs::read_to_string("model.json")?)?;
//! let settings = ShapeSettings::default();
//!
//! for element in model.elements() {
//!     let mesh = model.create_shape(element, &settings)?;
//!     println!("{} has {} points", element.id, mesh.point_count());
//! }
//! ```

pub mod error;
pub mod mesh;
pub mod model;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use mesh::{Face, Mesh3D};
pub use model::{BuildingModel, Storey};
pub use snapshot::{ElementRecord, ModelSnapshot, Placement, RepresentationRecord, StoreyRecord};
pub use traits::{ModelSource, ShapeEvaluator, ShapeSettings};
pub use types::{BuildingElement, ElementKind, EntityId, Quantity, QuantityKind, UNNAMED};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};
