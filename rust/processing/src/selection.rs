// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Explicit storey and element-type selection for one run

use crate::grouping::{round_to, StoreyGroup};
use ifc_plan_core::ElementKind;
use rustc_hash::FxHashSet;

/// Picks one storey group
#[derive(Clone, Debug, PartialEq)]
pub enum StoreySelector {
    /// Group label (the storey name, or "Level 3.00m")
    Name(String),
    /// Group elevation, compared at two decimals
    Elevation(f64),
}

impl StoreySelector {
    pub fn matches(&self, group: &StoreyGroup) -> bool {
        match self {
            StoreySelector::Name(name) => group.label == *name,
            StoreySelector::Elevation(elevation) => {
                round_to(group.elevation, 2) == round_to(*elevation, 2)
            }
        }
    }
}

/// What a run should draw
///
/// Groups are drawn in selector order. With no storey selectors the first
/// group is used; with no kinds every kind is included.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    pub storeys: Vec<StoreySelector>,
    pub kinds: FxHashSet<ElementKind>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a storey by label
    pub fn with_storey(mut self, name: impl Into<String>) -> Self {
        self.storeys.push(StoreySelector::Name(name.into()));
        self
    }

    /// Add a storey by elevation
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.storeys.push(StoreySelector::Elevation(elevation));
        self
    }

    /// Restrict to element kinds
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = ElementKind>) -> Self {
        self.kinds.extend(kinds);
        self
    }

    #[inline]
    pub fn includes_kind(&self, kind: ElementKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    /// Indices of the selected groups, in selector order
    ///
    /// A group matched by several selectors is listed once. Selectors that
    /// match nothing are logged and skipped.
    pub fn resolve(&self, groups: &[StoreyGroup]) -> Vec<usize> {
        if self.storeys.is_empty() {
            return if groups.is_empty() { Vec::new() } else { vec![0] };
        }

        let mut picked = Vec::new();
        for selector in &self.storeys {
            let matched: Vec<usize> = groups
                .iter()
                .enumerate()
                .filter(|(_, g)| selector.matches(g))
                .map(|(i, _)| i)
                .collect();
            if matched.is_empty() {
                tracing::warn!(selector = ?selector, "Storey selector matched no group");
            }
            for idx in matched {
                if !picked.contains(&idx) {
                    picked.push(idx);
                }
            }
        }
        picked
    }
}
