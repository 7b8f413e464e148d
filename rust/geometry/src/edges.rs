// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face edge extraction for outline drawing

use ifc_plan_core::Face;
use rustc_hash::FxHashSet;

/// Undirected edge as (lower index, higher index)
pub type Edge = (u32, u32);

#[inline]
fn canonical(a: u32, b: u32) -> Edge {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Unique undirected edges of a face set, in first-seen order
///
/// Each face contributes every consecutive index pair including the
/// wrap-around pair, so an edge shared by two triangles is returned once.
/// Zero-length edges (repeated index) are skipped.
pub fn unique_edges<'a, I>(faces: I) -> Vec<Edge>
where
    I: IntoIterator<Item = &'a Face>,
{
    let mut seen: FxHashSet<Edge> = FxHashSet::default();
    let mut edges = Vec::new();

    for face in faces {
        let n = face.len();
        for i in 0..n {
            let (a, b) = (face[i], face[(i + 1) % n]);
            if a == b {
                continue;
            }
            let edge = canonical(a, b);
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }

    edges
}

/// Face indices with the first index repeated at the end
pub fn closed_ring(face: &Face) -> Vec<u32> {
    let mut ring = Vec::with_capacity(face.len() + 1);
    ring.extend_from_slice(face);
    if let Some(&first) = face.first() {
        ring.push(first);
    }
    ring
}
