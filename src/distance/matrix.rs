//! Dense distance matrix.

use crate::geometry::Point;

/// A dense n×n Euclidean distance matrix stored in row-major order.
///
/// Indices follow the order of the points the matrix was built from; the
/// task graph builds one over its node arena so agent start positions and
/// task positions share an index space.
///
/// # Examples
///
/// ```
/// use u_delivery::geometry::Point;
/// use u_delivery::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(3.0, 4.0),
///     Point::new(6.0, 8.0),
/// ]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert!((dm.path_length(0, &[1, 2]) - 10.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the matrix from point coordinates.
    pub fn from_points(points: &[Point]) -> Self {
        let size = points.len();
        let mut data = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let d = points[i].distance_to(&points[j]);
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }
        Self { data, size }
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Length of the open path `origin → path[0] → … → path[n-1]`.
    ///
    /// There is no return leg; agents end their route at the last task.
    pub fn path_length(&self, origin: usize, path: &[usize]) -> f64 {
        let mut prev = origin;
        let mut total = 0.0;
        for &next in path {
            total += self.get(prev, next);
            prev = next;
        }
        total
    }
}
