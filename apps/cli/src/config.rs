// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction configuration loaded from environment variables.

use ifc_plan_core::ShapeSettings;
use ifc_plan_geometry::{CenterlineOptions, DegenerateWallPolicy};
use ifc_plan_processing::grouping::{DEFAULT_ELEVATION_DECIMALS, DEFAULT_ELEVATION_TOLERANCE};
use ifc_plan_processing::{ElevationSource, GroupingStrategy, PipelineOptions};

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// How elements are grouped into storeys (`IFC_PLAN_GROUPING`).
    pub grouping: GroupingStrategy,
    /// Where element elevations come from (`IFC_PLAN_ELEVATION_SOURCE`).
    pub elevation_source: ElevationSource,
    /// Handling of walls without extent (`IFC_PLAN_DEGENERATE_WALLS`).
    pub degenerate_walls: DegenerateWallPolicy,
    /// File units to meters (`IFC_PLAN_UNIT_SCALE`).
    pub unit_scale: f64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let decimals = get("IFC_PLAN_ELEVATION_DECIMALS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_ELEVATION_DECIMALS);
        let tolerance = get("IFC_PLAN_ELEVATION_TOLERANCE")
            .and_then(|v| v.trim().parse().ok())
            .filter(|t: &f64| *t > 0.0)
            .unwrap_or(DEFAULT_ELEVATION_TOLERANCE);

        let grouping = get("IFC_PLAN_GROUPING")
            .and_then(|v| parse_grouping(&v, decimals, tolerance))
            .unwrap_or_default();

        let elevation_source = get("IFC_PLAN_ELEVATION_SOURCE")
            .and_then(|v| parse_elevation_source(&v))
            .unwrap_or_default();

        let degenerate_walls = get("IFC_PLAN_DEGENERATE_WALLS")
            .and_then(|v| parse_degenerate_policy(&v))
            .unwrap_or_default();

        let unit_scale = get("IFC_PLAN_UNIT_SCALE")
            .and_then(|v| v.trim().parse().ok())
            .filter(|s: &f64| *s > 0.0)
            .unwrap_or(1.0);

        Self {
            grouping,
            elevation_source,
            degenerate_walls,
            unit_scale,
        }
    }

    /// Pipeline settings for one run.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            grouping: self.grouping,
            elevation: self.elevation_source,
            centerline: CenterlineOptions {
                degenerate: self.degenerate_walls,
            },
            shape: ShapeSettings {
                use_world_coords: true,
                unit_scale: self.unit_scale,
            },
        }
    }
}

/// `containment`, `rounded` or `proximity`
pub fn parse_grouping(value: &str, decimals: u32, tolerance: f64) -> Option<GroupingStrategy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "containment" | "storey" => Some(GroupingStrategy::Containment),
        "rounded" | "elevation" => Some(GroupingStrategy::RoundedElevation { decimals }),
        "proximity" => Some(GroupingStrategy::ElevationProximity { tolerance }),
        _ => None,
    }
}

/// `storey` or `mesh`
pub fn parse_elevation_source(value: &str) -> Option<ElevationSource> {
    match value.trim().to_ascii_lowercase().as_str() {
        "storey" => Some(ElevationSource::StoreyDeclared),
        "mesh" => Some(ElevationSource::MeshMean),
        _ => None,
    }
}

/// `reject` or `collapse`
pub fn parse_degenerate_policy(value: &str) -> Option<DegenerateWallPolicy> {
    match value.trim().to_ascii_lowercase().as_str() {
        "reject" => Some(DegenerateWallPolicy::Reject),
        "collapse" => Some(DegenerateWallPolicy::Collapse),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.grouping, GroupingStrategy::Containment);
        assert_eq!(config.elevation_source, ElevationSource::StoreyDeclared);
        assert_eq!(config.degenerate_walls, DegenerateWallPolicy::Reject);
        assert_eq!(config.unit_scale, 1.0);
    }

    #[test]
    fn test_proximity_with_tolerance() {
        let config = config(&[
            ("IFC_PLAN_GROUPING", "Proximity"),
            ("IFC_PLAN_ELEVATION_TOLERANCE", "0.25"),
            ("IFC_PLAN_DEGENERATE_WALLS", "collapse"),
            ("IFC_PLAN_UNIT_SCALE", "0.001"),
        ]);
        assert_eq!(
            config.grouping,
            GroupingStrategy::ElevationProximity { tolerance: 0.25 }
        );
        assert_eq!(config.degenerate_walls, DegenerateWallPolicy::Collapse);

        let options = config.pipeline_options();
        assert_eq!(options.shape.unit_scale, 0.001);
        assert_eq!(options.centerline.degenerate, DegenerateWallPolicy::Collapse);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[
            ("IFC_PLAN_GROUPING", "rounded"),
            ("IFC_PLAN_ELEVATION_DECIMALS", "x"),
            ("IFC_PLAN_ELEVATION_SOURCE", "sky"),
            ("IFC_PLAN_UNIT_SCALE", "-1"),
        ]);
        assert_eq!(
            config.grouping,
            GroupingStrategy::RoundedElevation { decimals: 2 }
        );
        assert_eq!(config.elevation_source, ElevationSource::StoreyDeclared);
        assert_eq!(config.unit_scale, 1.0);
    }
}
