//! Intra-route 2-opt improvement for open routes.
//!
//! # Algorithm
//!
//! A route starts at an origin (the agent's position) and ends at its last
//! stop; there is no return leg. Reversing the segment `r[i..=j]` replaces
//! the edge into `r[i]` and, unless `j` is the last stop, the edge out of
//! `r[j]`:
//!
//! ```text
//! prev  = i == 0 ? origin : r[i-1]
//! delta = d(prev, r[j]) - d(prev, r[i])
//!       + (j < n-1 ? d(r[i], r[j+1]) - d(r[j], r[j+1]) : 0)
//! ```
//!
//! The first reversal with delta < 0 is applied and the scan restarts,
//! until no reversal improves (first-improvement strategy). Only distance is
//! considered; time windows are ignored.
//!
//! # Complexity
//!
//! O(n²) per pass, O(n³) worst case for convergence.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;

const IMPROVEMENT_EPS: f64 = 1e-10;

/// Applies 2-opt improvement to an open route of matrix indices.
///
/// Returns the improved sequence and its length measured from `origin`.
///
/// # Examples
///
/// ```
/// use u_delivery::distance::DistanceMatrix;
/// use u_delivery::geometry::Point;
/// use u_delivery::local_search::two_opt_improve;
///
/// let points = [
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(2.0, 0.0),
///     Point::new(3.0, 0.0),
/// ];
/// let dm = DistanceMatrix::from_points(&points);
///
/// let (improved, dist) = two_opt_improve(&[3, 2, 1], 0, &dm);
/// assert_eq!(improved, vec![1, 2, 3]);
/// assert!((dist - 3.0).abs() < 1e-10);
/// ```
pub fn two_opt_improve(
    route: &[usize],
    origin: usize,
    distances: &DistanceMatrix,
) -> (Vec<usize>, f64) {
    let mut current = route.to_vec();
    let n = current.len();

    'scan: loop {
        for i in 0..n.saturating_sub(1) {
            for j in i + 1..n {
                if two_opt_delta(&current, origin, distances, i, j) < -IMPROVEMENT_EPS {
                    current[i..=j].reverse();
                    continue 'scan;
                }
            }
        }
        break;
    }

    let dist = distances.path_length(origin, &current);
    (current, dist)
}

fn two_opt_delta(
    route: &[usize],
    origin: usize,
    distances: &DistanceMatrix,
    i: usize,
    j: usize,
) -> f64 {
    let prev = if i == 0 { origin } else { route[i - 1] };
    let mut delta = distances.get(prev, route[j]) - distances.get(prev, route[i]);
    if let Some(&next) = route.get(j + 1) {
        delta += distances.get(route[i], next) - distances.get(route[j], next);
    }
    delta
}
