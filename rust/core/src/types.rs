// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core element types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name used when an element carries no name attribute
pub const UNNAMED: &str = "Unnamed";

/// Type-safe entity identifier
///
/// Wraps the raw IFC entity ID (e.g., #123 becomes EntityId(123))
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

/// Semantic element category relevant to floor-plan extraction
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum ElementKind {
    Wall,
    Slab,
    Other,
}

impl ElementKind {
    /// All kinds, in display order
    pub const ALL: [ElementKind; 3] = [ElementKind::Wall, ElementKind::Slab, ElementKind::Other];

    /// Classify an IFC entity type name (case-insensitive)
    pub fn from_ifc_type(type_name: &str) -> Self {
        match type_name.to_ascii_uppercase().as_str() {
            "IFCWALL" | "IFCWALLSTANDARDCASE" | "IFCWALLELEMENTEDCASE" => ElementKind::Wall,
            "IFCSLAB" | "IFCSLABSTANDARDCASE" | "IFCSLABELEMENTEDCASE" => ElementKind::Slab,
            _ => ElementKind::Other,
        }
    }

    /// Display name used in tables and legends
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Wall => "Wall",
            ElementKind::Slab => "Slab",
            ElementKind::Other => "Other",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ElementKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall" | "walls" => Ok(ElementKind::Wall),
            "slab" | "slabs" => Ok(ElementKind::Slab),
            "other" => Ok(ElementKind::Other),
            other => Err(format!("unknown element kind '{}'", other)),
        }
    }
}

/// Measure type of an element quantity
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityKind {
    Length,
    Area,
    Volume,
}

impl QuantityKind {
    /// Column prefix in attribute tables
    pub fn prefix(&self) -> &'static str {
        match self {
            QuantityKind::Length => "Length",
            QuantityKind::Area => "Area",
            QuantityKind::Volume => "Volume",
        }
    }
}

/// Base quantity attached to an element (e.g. "NetSideArea")
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub name: String,
    pub kind: QuantityKind,
    /// `None` when the model carries the quantity without a numeric value
    #[serde(default)]
    pub value: Option<f64>,
}

/// A building element as delivered by the model parser
///
/// The owning storey is not stored here; it is looked up through
/// [`ModelSource::containing_storey`](crate::ModelSource::containing_storey).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingElement {
    /// Entity ID
    pub id: EntityId,
    /// Semantic kind
    pub kind: ElementKind,
    /// Original IFC type name (e.g., "IfcWallStandardCase")
    pub ifc_type: Option<String>,
    /// IFC GlobalId
    pub global_id: Option<String>,
    /// Name attribute, if present
    pub name: Option<String>,
    /// Placement location in file units
    #[serde(default)]
    pub placement: Option<[f64; 3]>,
    /// Base quantities, in model order
    #[serde(default)]
    pub quantities: Vec<Quantity>,
}

impl BuildingElement {
    /// Create a new element of the given kind
    pub fn new(id: impl Into<EntityId>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            ifc_type: None,
            global_id: None,
            name: None,
            placement: None,
            quantities: Vec::new(),
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the IFC type name
    pub fn with_ifc_type(mut self, ifc_type: impl Into<String>) -> Self {
        self.ifc_type = Some(ifc_type.into());
        self
    }

    /// Set the IFC GlobalId
    pub fn with_global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = Some(global_id.into());
        self
    }

    /// Set the placement location
    pub fn with_placement(mut self, x: f64, y: f64, z: f64) -> Self {
        self.placement = Some([x, y, z]);
        self
    }

    /// Append a quantity
    pub fn with_quantity(mut self, name: impl Into<String>, kind: QuantityKind, value: Option<f64>) -> Self {
        self.quantities.push(Quantity {
            name: name.into(),
            kind,
            value,
        });
        self
    }

    /// Name for display, falling back to [`UNNAMED`]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNNAMED,
        }
    }
}
