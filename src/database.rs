//! Metric databases: fixed, 0-indexed object collections with a distance function

use crate::distance::{DistanceMetric, Metric};
use crate::error::{LcError, Result};
use crate::vector::{self, Vector};
use std::path::Path;

/// An ordered, fixed-size collection of objects plus a metric.
///
/// Object identifiers are positions `0..len()`. Passing an identifier
/// outside that range to [`MetricDb::get`] is a programming error and panics.
pub trait MetricDb: Sync {
    /// The stored (and query) object type.
    type Object: ?Sized + Sync;

    /// Number of objects in the database.
    fn len(&self) -> usize;

    /// Whether the database holds no objects.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The object with the given identifier.
    fn get(&self, id: usize) -> &Self::Object;

    /// Distance between two objects.
    fn dist(&self, a: &Self::Object, b: &Self::Object) -> f64;

    /// Distance between a stored object and an arbitrary query object.
    fn dist_to(&self, id: usize, query: &Self::Object) -> f64 {
        self.dist(self.get(id), query)
    }
}

/// In-memory metric database backed by a `Vec<T>`.
#[derive(Debug, Clone)]
pub struct ObjectDb<T, M> {
    objects: Vec<T>,
    metric: M,
}

/// A database of dense vectors under one of the built-in vector metrics.
pub type VectorDb = ObjectDb<Vector, DistanceMetric>;

impl<T, M> ObjectDb<T, M>
where
    T: Sync,
    M: Metric<T>,
{
    /// Create a database from objects and a metric.
    pub fn new(objects: Vec<T>, metric: M) -> Self {
        Self { objects, metric }
    }

    /// The metric used by this database.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// All stored objects in identifier order.
    pub fn objects(&self) -> &[T] {
        &self.objects
    }
}

impl ObjectDb<Vector, DistanceMetric> {
    /// Create a vector database, checking that all vectors share one dimension.
    pub fn from_vectors(vectors: Vec<Vector>, metric: DistanceMetric) -> Result<Self> {
        if let Some(first) = vectors.first() {
            let expected = first.dimension();
            if let Some(bad) = vectors.iter().find(|v| v.dimension() != expected) {
                return Err(LcError::DimensionMismatch {
                    expected,
                    actual: bad.dimension(),
                });
            }
        }
        Ok(Self::new(vectors, metric))
    }

    /// Load a vector database from a text file (see [`vector::read_vectors`]).
    pub fn from_file(path: impl AsRef<Path>, metric: DistanceMetric) -> Result<Self> {
        Self::from_vectors(vector::read_vectors(path)?, metric)
    }

    /// Dimension of the stored vectors, or `None` when empty.
    pub fn dimension(&self) -> Option<usize> {
        self.objects.first().map(Vector::dimension)
    }

    /// Check that a query vector matches the database dimension.
    pub fn check_query(&self, query: &Vector) -> Result<()> {
        match self.dimension() {
            Some(expected) if expected != query.dimension() => Err(LcError::DimensionMismatch {
                expected,
                actual: query.dimension(),
            }),
            _ => Ok(()),
        }
    }
}

impl<T, M> MetricDb for ObjectDb<T, M>
where
    T: Sync,
    M: Metric<T>,
{
    type Object = T;

    fn len(&self) -> usize {
        self.objects.len()
    }

    fn get(&self, id: usize) -> &T {
        &self.objects[id]
    }

    fn dist(&self, a: &T, b: &T) -> f64 {
        self.metric.dist(a, b)
    }
}
