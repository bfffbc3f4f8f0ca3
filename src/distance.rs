//! Distance functions for metric spaces

use crate::vector::Vector;
use serde::{Deserialize, Serialize};

/// A distance function over objects of type `T`.
///
/// Implementations must be a metric: non-negative, symmetric, zero on
/// identical objects, and obey the triangle inequality. The index relies
/// on the triangle inequality for exact pruning.
pub trait Metric<T: ?Sized>: Send + Sync {
    fn dist(&self, a: &T, b: &T) -> f64;
}

/// Adapts a plain closure into a [`Metric`].
#[derive(Debug, Clone, Copy)]
pub struct FnMetric<F>(pub F);

impl<T: ?Sized, F> Metric<T> for FnMetric<F>
where
    F: Fn(&T, &T) -> f64 + Send + Sync,
{
    fn dist(&self, a: &T, b: &T) -> f64 {
        (self.0)(a, b)
    }
}

/// Distance metrics for dense vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean (L2) distance
    Euclidean,
    /// Manhattan (L1) distance
    Manhattan,
    /// Chebyshev (L-infinity) distance
    Chebyshev,
}

impl DistanceMetric {
    /// Compute the distance between two vectors using this metric.
    ///
    /// Both vectors must have the same dimension; the database checks this
    /// on construction.
    pub fn distance(&self, v1: &Vector, v2: &Vector) -> f64 {
        debug_assert!(v1.has_same_dimension(v2));
        match self {
            DistanceMetric::Euclidean => euclidean_distance(v1, v2),
            DistanceMetric::Manhattan => manhattan_distance(v1, v2),
            DistanceMetric::Chebyshev => chebyshev_distance(v1, v2),
        }
    }
}

impl Metric<Vector> for DistanceMetric {
    fn dist(&self, a: &Vector, b: &Vector) -> f64 {
        self.distance(a, b)
    }
}

fn diffs<'a>(v1: &'a Vector, v2: &'a Vector) -> impl Iterator<Item = f64> + 'a {
    v1.as_slice()
        .iter()
        .zip(v2.as_slice().iter())
        .map(|(&a, &b)| (a as f64 - b as f64).abs())
}

/// Compute Euclidean (L2) distance between two vectors
pub fn euclidean_distance(v1: &Vector, v2: &Vector) -> f64 {
    diffs(v1, v2).map(|d| d * d).sum::<f64>().sqrt()
}

/// Compute Manhattan (L1) distance between two vectors
pub fn manhattan_distance(v1: &Vector, v2: &Vector) -> f64 {
    diffs(v1, v2).sum()
}

/// Compute Chebyshev (L-infinity) distance between two vectors
pub fn chebyshev_distance(v1: &Vector, v2: &Vector) -> f64 {
    diffs(v1, v2).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_euclidean_distance() {
        let v1 = Vector::new(vec![1.0, 2.0, 3.0]);
        let v2 = Vector::new(vec![4.0, 5.0, 6.0]);
        let dist = euclidean_distance(&v1, &v2);
        assert_relative_eq!(dist, 5.196152, epsilon = 1e-5);
    }

    #[test]
    fn test_euclidean_same_vector() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(euclidean_distance(&v, &v), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_manhattan_distance() {
        let v1 = Vector::new(vec![1.0, 2.0, 3.0]);
        let v2 = Vector::new(vec![4.0, 0.0, 3.5]);
        assert_relative_eq!(manhattan_distance(&v1, &v2), 5.5, epsilon = 1e-9);
    }

    #[test]
    fn test_chebyshev_distance() {
        let v1 = Vector::new(vec![1.0, 2.0, 3.0]);
        let v2 = Vector::new(vec![4.0, 0.0, 3.5]);
        assert_relative_eq!(chebyshev_distance(&v1, &v2), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_metric_trait_dispatch() {
        let v1 = Vector::new(vec![0.0, 0.0]);
        let v2 = Vector::new(vec![3.0, 4.0]);
        assert_relative_eq!(DistanceMetric::Euclidean.dist(&v1, &v2), 5.0, epsilon = 1e-9);
        assert_relative_eq!(DistanceMetric::Manhattan.dist(&v1, &v2), 7.0, epsilon = 1e-9);
        assert_relative_eq!(DistanceMetric::Chebyshev.dist(&v1, &v2), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fn_metric() {
        let m = FnMetric(|a: &f64, b: &f64| (a - b).abs());
        assert_relative_eq!(m.dist(&1.5, &-2.0), 3.5);
    }
}
