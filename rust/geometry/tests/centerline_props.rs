// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property tests for wall centerline reduction
//!
//! Run with: cargo test -p ifc-plan-geometry --test centerline_props

use ifc_plan_geometry::{principal_segment, DegenerateWallPolicy, Point2};
use proptest::prelude::*;

/// Plan corners of a straight wall (each corner twice: bottom and top face),
/// rotated by `angle` and moved to `origin`
fn wall_cloud(length: f64, thickness: f64, angle: f64, origin: [f64; 2]) -> Vec<Point2<f64>> {
    let (s, c) = angle.sin_cos();
    let mut pts = Vec::with_capacity(8);
    for _ in 0..2 {
        for &(u, v) in &[(0.0, 0.0), (length, 0.0), (length, thickness), (0.0, thickness)] {
            pts.push(Point2::new(
                origin[0] + c * u - s * v,
                origin[1] + s * u + c * v,
            ));
        }
    }
    pts
}

fn arb_wall() -> impl Strategy<Value = Vec<Point2<f64>>> {
    (
        1.0..20.0f64,
        0.05..0.4f64,
        0.0..std::f64::consts::TAU,
        prop::array::uniform2(-500.0..500.0f64),
    )
        .prop_map(|(length, thickness, angle, origin)| wall_cloud(length, thickness, angle, origin))
}

fn length_of(pts: &[Point2<f64>]) -> f64 {
    let (start, end) = principal_segment(pts, DegenerateWallPolicy::Reject).unwrap();
    (end - start).norm()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The centerline spans the full wall length
    #[test]
    fn length_matches_wall(
        length in 1.0..20.0f64,
        thickness in 0.05..0.4f64,
        angle in 0.0..std::f64::consts::TAU,
        origin in prop::array::uniform2(-500.0..500.0f64),
    ) {
        let pts = wall_cloud(length, thickness, angle, origin);
        prop_assert!((length_of(&pts) - length).abs() < 1e-6);
    }

    /// Vertex order does not matter
    #[test]
    fn permutation_invariant(
        (pts, shuffled) in arb_wall().prop_flat_map(|pts| (Just(pts.clone()), Just(pts).prop_shuffle()))
    ) {
        let a = principal_segment(&pts, DegenerateWallPolicy::Reject).unwrap();
        let b = principal_segment(&shuffled, DegenerateWallPolicy::Reject).unwrap();
        let same = (a.0 - b.0).norm() < 1e-9 && (a.1 - b.1).norm() < 1e-9;
        let swapped = (a.0 - b.1).norm() < 1e-9 && (a.1 - b.0).norm() < 1e-9;
        prop_assert!(same || swapped, "{:?} vs {:?}", a, b);
        prop_assert!((length_of(&pts) - length_of(&shuffled)).abs() < 1e-9);
    }

    /// Translating every vertex translates the segment and keeps its length
    #[test]
    fn translation_invariant(
        pts in arb_wall(),
        shift in prop::array::uniform2(-1000.0..1000.0f64),
    ) {
        let moved: Vec<_> = pts
            .iter()
            .map(|p| Point2::new(p.x + shift[0], p.y + shift[1]))
            .collect();

        let (a_start, a_end) = principal_segment(&pts, DegenerateWallPolicy::Reject).unwrap();
        let (b_start, b_end) = principal_segment(&moved, DegenerateWallPolicy::Reject).unwrap();

        prop_assert!(((a_end - a_start).norm() - (b_end - b_start).norm()).abs() < 1e-6);

        let expected_start = Point2::new(a_start.x + shift[0], a_start.y + shift[1]);
        let expected_end = Point2::new(a_end.x + shift[0], a_end.y + shift[1]);
        let same = (b_start - expected_start).norm() < 1e-6 && (b_end - expected_end).norm() < 1e-6;
        let swapped = (b_start - expected_end).norm() < 1e-6 && (b_end - expected_start).norm() < 1e-6;
        prop_assert!(same || swapped);
    }
}
