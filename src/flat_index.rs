//! Brute-force flat index: O(n) distance evaluations per query

use crate::database::MetricDb;
use crate::index::MetricIndex;
use crate::result::{KnnResult, RangeResult, ResultSet};

/// A flat index that computes the distance to every object in the database.
pub struct FlatIndex<'a, D: MetricDb> {
    db: &'a D,
}

impl<'a, D: MetricDb> FlatIndex<'a, D> {
    pub fn new(db: &'a D) -> Self {
        Self { db }
    }

    /// Feed every object of the database into `result`.
    pub fn scan<R: ResultSet>(&self, query: &D::Object, result: &mut R) {
        for id in 0..self.db.len() {
            result.push(id, self.db.dist_to(id, query));
        }
    }
}

impl<D: MetricDb> MetricIndex for FlatIndex<'_, D> {
    type Object = D::Object;

    fn search_range(&self, query: &D::Object, radius: f64) -> RangeResult {
        let mut result = RangeResult::new(radius);
        self.scan(query, &mut result);
        result
    }

    fn search_knn(&self, query: &D::Object, k: usize) -> KnnResult {
        let mut result = KnnResult::new(k);
        self.scan(query, &mut result);
        result
    }

    fn len(&self) -> usize {
        self.db.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::VectorDb;
    use crate::distance::DistanceMetric;
    use crate::vector::Vector;

    fn small_db() -> VectorDb {
        VectorDb::from_vectors(
            vec![
                Vector::new(vec![1.0, 0.0, 0.0]),
                Vector::new(vec![0.0, 1.0, 0.0]),
                Vector::new(vec![1.0, 1.0, 0.0]),
            ],
            DistanceMetric::Euclidean,
        )
        .unwrap()
    }

    #[test]
    fn test_flat_knn() {
        let db = small_db();
        let index = FlatIndex::new(&db);
        let results = index
            .search_knn(&Vector::new(vec![1.0, 0.0, 0.0]), 2)
            .into_sorted_vec();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, 0); // exact match
        assert!(results[0].distance < 1e-9);
        assert_eq!(results[1].id, 2);
    }

    #[test]
    fn test_flat_range() {
        let db = small_db();
        let index = FlatIndex::new(&db);
        let results = index.search_range(&Vector::new(vec![1.0, 0.0, 0.0]), 1.0);
        assert_eq!(results.sorted_ids(), vec![0, 2]);
        assert_eq!(index.len(), 3);
    }
}
