// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Nearest-sample lookup over a track.

use crate::models::{Point, Track, TrackPoint};

/// Find the point whose timestamp is closest to `t`.
///
/// Points may be in any order. Ties go to the earliest point in the
/// sequence. Times outside the track's range still resolve to the nearest
/// end; there is no interpolation.
pub fn nearest_point(points: &[TrackPoint], t: f64) -> Option<&TrackPoint> {
    let (first, rest) = points.split_first()?;
    let mut nearest = first;
    let mut best = (first.t - t).abs();
    for point in rest {
        let distance = (point.t - t).abs();
        if distance < best {
            best = distance;
            nearest = point;
        }
    }
    Some(nearest)
}

/// Resolve a track's normalized position at time `t`, or `None` for an
/// empty track.
pub fn resolve(track: &Track, t: f64) -> Option<Point> {
    nearest_point(&track.points, t).map(|p| Point::new(p.x, p.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn track(points: &[(f64, f64, f64)]) -> Track {
        Track {
            id: 1,
            points: points.iter().map(|&(t, x, y)| TrackPoint { t, x, y }).collect(),
        }
    }

    #[test]
    fn test_empty_track() {
        let empty = track(&[]);
        for t in [-1.0, 0.0, 3.5, f64::INFINITY] {
            assert_eq!(resolve(&empty, t), None);
        }
    }

    #[test]
    fn test_two_point_scenario() {
        let tr = track(&[(0.0, 0.5, 0.5), (2.0, 0.1, 0.1)]);
        assert_eq!(resolve(&tr, 0.4), Some(Point::new(0.5, 0.5)));
        assert_eq!(resolve(&tr, 1.6), Some(Point::new(0.1, 0.1)));
        // Equidistant: the earlier entry wins.
        assert_eq!(resolve(&tr, 1.0), Some(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_out_of_range_clamps_to_nearest_end() {
        let tr = track(&[(1.0, 0.2, 0.2), (2.0, 0.4, 0.4), (3.0, 0.6, 0.6)]);
        assert_eq!(resolve(&tr, -10.0), Some(Point::new(0.2, 0.2)));
        assert_eq!(resolve(&tr, 99.0), Some(Point::new(0.6, 0.6)));
    }

    #[test]
    fn test_unsorted_points() {
        let tr = track(&[(3.0, 0.6, 0.6), (1.0, 0.2, 0.2), (2.0, 0.4, 0.4)]);
        assert_eq!(resolve(&tr, 1.2), Some(Point::new(0.2, 0.2)));
        assert_eq!(resolve(&tr, 2.9), Some(Point::new(0.6, 0.6)));
    }

    #[test]
    fn test_tie_break_follows_sequence_order() {
        let tr = track(&[(2.0, 0.9, 0.9), (0.0, 0.1, 0.1)]);
        assert_eq!(resolve(&tr, 1.0), Some(Point::new(0.9, 0.9)));

        let duplicates = track(&[(1.0, 0.3, 0.3), (1.0, 0.7, 0.7)]);
        assert_eq!(resolve(&duplicates, 1.0), Some(Point::new(0.3, 0.3)));
    }

    proptest! {
        #[test]
        fn test_nearest_is_minimal_and_earliest(
            times in prop::collection::vec(-100i32..100, 1..40),
            query in -150i32..150,
        ) {
            // Integer-valued times keep distances exact so ties are real ties.
            let points: Vec<TrackPoint> = times
                .iter()
                .enumerate()
                .map(|(i, &t)| TrackPoint { t: t as f64, x: i as f64, y: 0.0 })
                .collect();
            let t = query as f64;

            let found = nearest_point(&points, t).unwrap();
            let index = found.x as usize;
            let best = (found.t - t).abs();

            for (i, p) in points.iter().enumerate() {
                let d = (p.t - t).abs();
                prop_assert!(d >= best);
                if i < index {
                    prop_assert!(d > best);
                }
            }
        }
    }
}
