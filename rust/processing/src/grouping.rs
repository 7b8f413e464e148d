// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Storey grouping of projected elements
//!
//! Groups appear in order of first appearance and keep their elements in
//! input order. Every input element ends up in exactly one group.

use ifc_plan_core::Storey;
use ifc_plan_geometry::ProjectedElement;
use rustc_hash::FxHashMap;

/// Decimal places used by [`GroupingStrategy::RoundedElevation`] by default
pub const DEFAULT_ELEVATION_DECIMALS: u32 = 2;

/// Tolerance in meters used by [`GroupingStrategy::ElevationProximity`] by default
pub const DEFAULT_ELEVATION_TOLERANCE: f64 = 0.1;

/// How elements are assigned to storey groups
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GroupingStrategy {
    /// By the storey that spatially contains the element. Elements without a
    /// containing storey join the first elevation level strictly within
    /// [`DEFAULT_ELEVATION_TOLERANCE`], or open a new level at their rounded
    /// elevation.
    #[default]
    Containment,
    /// By elevation rounded to `decimals` places
    RoundedElevation { decimals: u32 },
    /// Join the first group whose elevation is strictly within `tolerance`
    ElevationProximity { tolerance: f64 },
}

/// Identity of a storey group
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Storey name
    Named(String),
    /// Elevation scaled by 10^decimals and rounded
    Elevation(i64),
    /// Position of a proximity cluster
    Cluster(usize),
}

/// Elements sharing one storey or level
#[derive(Clone, Debug, PartialEq)]
pub struct StoreyGroup {
    pub key: GroupKey,
    /// Storey name, or "Level {elevation}m"
    pub label: String,
    /// Elevation in meters
    pub elevation: f64,
    pub elements: Vec<ProjectedElement>,
}

impl StoreyGroup {
    fn new(key: GroupKey, label: String, elevation: f64) -> Self {
        Self {
            key,
            label,
            elevation,
            elements: Vec::new(),
        }
    }

    /// Number of member elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Round to `decimals` places, normalizing negative zero
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor + 0.0
}

/// Display label for a level identified only by elevation
///
/// At least two decimals are shown; more when the grouping is finer.
pub fn level_label(elevation: f64, decimals: u32) -> String {
    let places = decimals.max(2);
    format!("Level {:.*}m", places as usize, round_to(elevation, places))
}

/// Group projected elements
///
/// `entries` pairs each element with its containing storey, if known. The
/// storey is only consulted by [`GroupingStrategy::Containment`].
pub fn group<'a, I>(entries: I, strategy: &GroupingStrategy) -> Vec<StoreyGroup>
where
    I: IntoIterator<Item = (ProjectedElement, Option<&'a Storey>)>,
{
    let mut groups: Vec<StoreyGroup> = Vec::new();
    let mut index: FxHashMap<GroupKey, usize> = FxHashMap::default();

    for (element, storey) in entries {
        let slot = match (strategy, storey) {
            (GroupingStrategy::Containment, Some(storey)) => {
                let key = GroupKey::Named(storey.name.clone());
                let elevation = storey.elevation.unwrap_or(element.elevation);
                keyed_slot(&mut groups, &mut index, key, || {
                    StoreyGroup::new(
                        GroupKey::Named(storey.name.clone()),
                        storey.name.clone(),
                        elevation,
                    )
                })
            }
            (GroupingStrategy::Containment, None) => {
                fallback_slot(&mut groups, &mut index, element.elevation)
            }
            (GroupingStrategy::RoundedElevation { decimals }, _) => {
                rounded_slot(&mut groups, &mut index, element.elevation, *decimals)
            }
            (GroupingStrategy::ElevationProximity { tolerance }, _) => {
                proximity_slot(&mut groups, element.elevation, *tolerance)
            }
        };
        groups[slot].elements.push(element);
    }

    tracing::debug!(groups = groups.len(), strategy = ?strategy, "Grouped elements");
    groups
}

fn keyed_slot(
    groups: &mut Vec<StoreyGroup>,
    index: &mut FxHashMap<GroupKey, usize>,
    key: GroupKey,
    create: impl FnOnce() -> StoreyGroup,
) -> usize {
    *index.entry(key).or_insert_with(|| {
        groups.push(create());
        groups.len() - 1
    })
}

fn rounded_slot(
    groups: &mut Vec<StoreyGroup>,
    index: &mut FxHashMap<GroupKey, usize>,
    elevation: f64,
    decimals: u32,
) -> usize {
    let factor = 10f64.powi(decimals as i32);
    let scaled = (elevation * factor).round() as i64;
    let rounded = round_to(elevation, decimals);
    keyed_slot(groups, index, GroupKey::Elevation(scaled), || {
        StoreyGroup::new(GroupKey::Elevation(scaled), level_label(rounded, decimals), rounded)
    })
}

/// Level for an element without containment
fn fallback_slot(
    groups: &mut Vec<StoreyGroup>,
    index: &mut FxHashMap<GroupKey, usize>,
    elevation: f64,
) -> usize {
    let near = groups.iter().position(|g| {
        matches!(g.key, GroupKey::Elevation(_))
            && (g.elevation - elevation).abs() < DEFAULT_ELEVATION_TOLERANCE
    });
    match near {
        Some(slot) => slot,
        None => rounded_slot(groups, index, elevation, DEFAULT_ELEVATION_DECIMALS),
    }
}

fn proximity_slot(groups: &mut Vec<StoreyGroup>, elevation: f64, tolerance: f64) -> usize {
    let existing = groups.iter().position(|g| {
        matches!(g.key, GroupKey::Cluster(_)) && (g.elevation - elevation).abs() < tolerance
    });
    match existing {
        Some(slot) => slot,
        None => {
            let slot = groups.len();
            groups.push(StoreyGroup::new(
                GroupKey::Cluster(slot),
                level_label(elevation, DEFAULT_ELEVATION_DECIMALS),
                elevation,
            ));
            slot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ifc_plan_core::{ElementKind, EntityId};

    fn element(id: u32, elevation: f64) -> ProjectedElement {
        ProjectedElement {
            id: EntityId(id),
            kind: ElementKind::Wall,
            name: format!("E{}", id),
            vertices: Vec::new(),
            faces: Vec::new(),
            elevation,
        }
    }

    fn ids(group: &StoreyGroup) -> Vec<u32> {
        group.elements.iter().map(|e| e.id.0).collect()
    }

    #[test]
    fn test_rounded_elevation_merges_close_values() {
        let strategy = GroupingStrategy::RoundedElevation { decimals: 2 };
        let groups = group(
            vec![(element(1, 2.001), None), (element(2, 2.002), None)],
            &strategy,
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Level 2.00m");
        assert_eq!(ids(&groups[0]), vec![1, 2]);
    }

    #[test]
    fn test_rounded_elevation_separates_levels() {
        let strategy = GroupingStrategy::RoundedElevation { decimals: 2 };
        let groups = group(
            vec![(element(1, 2.00), None), (element(2, 2.15), None)],
            &strategy,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].label, "Level 2.15m");
    }

    #[test]
    fn test_first_appearance_order_and_stability() {
        let strategy = GroupingStrategy::RoundedElevation { decimals: 2 };
        let groups = group(
            vec![
                (element(1, 3.0), None),
                (element(2, 0.0), None),
                (element(3, 3.0), None),
                (element(4, 0.0), None),
            ],
            &strategy,
        );
        assert_eq!(groups[0].elevation, 3.0);
        assert_eq!(ids(&groups[0]), vec![1, 3]);
        assert_eq!(ids(&groups[1]), vec![2, 4]);
    }

    #[test]
    fn test_proximity_joins_first_group_within_tolerance() {
        let strategy = GroupingStrategy::ElevationProximity { tolerance: 0.1 };
        let groups = group(
            vec![
                (element(1, 0.0), None),
                (element(2, 0.05), None),
                (element(3, 0.1), None),
                (element(4, 3.0), None),
            ],
            &strategy,
        );
        // 0.1 is not strictly within 0.1 of 0.0
        assert_eq!(groups.len(), 3);
        assert_eq!(ids(&groups[0]), vec![1, 2]);
        assert_eq!(ids(&groups[1]), vec![3]);
        assert_eq!(ids(&groups[2]), vec![4]);
    }

    #[test]
    fn test_containment_uses_storey() {
        let ground = Storey::new("Ground Floor", Some(0.0));
        let roof = Storey::new("Roof", None);
        let groups = group(
            vec![
                (element(1, 1.5), Some(&ground)),
                (element(2, 9.2), Some(&roof)),
                (element(3, 1.4), Some(&ground)),
                (element(4, 4.004), None),
            ],
            &GroupingStrategy::Containment,
        );
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].key, GroupKey::Named("Ground Floor".into()));
        assert_eq!(groups[0].elevation, 0.0);
        assert_eq!(ids(&groups[0]), vec![1, 3]);
        // no declared elevation: first member's
        assert_eq!(groups[1].elevation, 9.2);
        assert_eq!(groups[2].label, "Level 4.00m");
    }

    #[test]
    fn test_containment_fallback_within_tolerance() {
        let groups = group(
            vec![
                (element(1, 0.004), None),
                (element(2, 0.006), None),
                (element(3, 0.09), None),
                (element(4, 2.00), None),
                (element(5, 2.15), None),
            ],
            &GroupingStrategy::Containment,
        );
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Level 0.00m", "Level 2.00m", "Level 2.15m"]);
        assert_eq!(ids(&groups[0]), vec![1, 2, 3]);
        assert_eq!(ids(&groups[1]), vec![4]);
    }

    #[test]
    fn test_containment_fallback_ignores_named_storeys() {
        let ground = Storey::new("Ground Floor", Some(0.0));
        let groups = group(
            vec![(element(1, 0.0), Some(&ground)), (element(2, 0.02), None)],
            &GroupingStrategy::Containment,
        );
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].label, "Level 0.02m");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2.004, 2), 2.0);
        assert_eq!(round_to(2.006, 2), 2.01);
        assert_eq!(level_label(-0.001, 2), "Level 0.00m");
        assert_eq!(level_label(2.0016, 3), "Level 2.002m");
    }
}
