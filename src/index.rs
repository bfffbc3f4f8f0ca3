//! Index trait shared by the search backends

use crate::result::{KnnResult, RangeResult};

/// A similarity index over a metric database.
///
/// Identifiers in results are database object identifiers.
pub trait MetricIndex {
    /// The query object type.
    type Object: ?Sized;

    /// All objects within `radius` of `query`.
    fn search_range(&self, query: &Self::Object, radius: f64) -> RangeResult;

    /// The `k` nearest objects to `query`.
    fn search_knn(&self, query: &Self::Object, k: usize) -> KnnResult;

    /// Number of indexed objects.
    fn len(&self) -> usize;

    /// Whether the index is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
