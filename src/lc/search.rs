//! Range and k-NN search.

use super::ListOfClusters;
use crate::database::MetricDb;
use crate::result::{KnnResult, RangeResult, ResultSet};

impl<D: MetricDb> ListOfClusters<'_, D> {
    /// All objects within `radius` of `query`.
    ///
    /// A cluster is scanned only if `d(q, center) <= radius + cov`; every
    /// scanned member is checked against its real distance, so the result
    /// is exact.
    pub fn search_range(&self, query: &D::Object, radius: f64) -> RangeResult {
        let mut result = RangeResult::new(radius);
        for cluster in 0..self.num_centers() {
            let dcq = self.center_dist(cluster, query);
            if dcq <= radius {
                result.push(self.centers[cluster], dcq);
            }
            if dcq <= radius + self.cov(cluster) {
                self.scan_cluster(cluster, query, &mut result);
            }
        }
        result
    }

    /// The `k` nearest objects to `query`.
    pub fn search_knn(&self, query: &D::Object, k: usize) -> KnnResult {
        self.search_knn_with(query, KnnResult::new(k))
    }

    /// k-NN search into a caller-provided collector.
    ///
    /// The first pass pushes every center and keeps the clusters that
    /// survive against the collector's radius at that moment. The second
    /// pass visits survivors closest-center first and re-tests each against
    /// the radius, which may have shrunk since.
    pub fn search_knn_with<R: ResultSet>(&self, query: &D::Object, mut result: R) -> R {
        let mut candidates: Vec<(usize, f64)> = Vec::new();
        for cluster in 0..self.num_centers() {
            let dcq = self.center_dist(cluster, query);
            result.push(self.centers[cluster], dcq);
            if dcq <= result.covering_radius() + self.cov(cluster) {
                candidates.push((cluster, dcq));
            }
        }

        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        for (cluster, dcq) in candidates {
            if dcq <= result.covering_radius() + self.cov(cluster) {
                self.scan_cluster(cluster, query, &mut result);
            }
        }
        result
    }

    /// Push every member of `cluster` with its real distance to `query`.
    fn scan_cluster<R: ResultSet>(&self, cluster: usize, query: &D::Object, result: &mut R) {
        let members = self.members(cluster);
        self.count_dists(members.len() as u64);
        for id in members.iter() {
            result.push(id, self.db.dist_to(id, query));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::database::ObjectDb;
    use crate::distance::FnMetric;
    use crate::lc::{LcParams, ListOfClusters};
    use crate::result::ResultSet;
    use crate::sequence::SequenceKind;

    fn abs_diff(a: &f64, b: &f64) -> f64 {
        (a - b).abs()
    }

    fn line_db(points: &[f64]) -> ObjectDb<f64, FnMetric<fn(&f64, &f64) -> f64>> {
        ObjectDb::new(points.to_vec(), FnMetric(abs_diff as fn(&f64, &f64) -> f64))
    }

    #[test]
    fn test_range_returns_centers_and_members() {
        let db = line_db(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        let lc = ListOfClusters::from_centers(&db, vec![0, 3], &SequenceKind::SortedList, false)
            .unwrap();
        let result = lc.search_range(&1.0, 1.5);
        assert_eq!(result.sorted_ids(), vec![0, 1, 2]);
    }

    #[test]
    fn test_range_prunes_far_cluster() {
        let db = line_db(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        let lc = ListOfClusters::from_centers(&db, vec![0, 3], &SequenceKind::SortedList, false)
            .unwrap();
        lc.reset_num_dists();
        let result = lc.search_range(&1.0, 0.5);
        assert_eq!(result.sorted_ids(), vec![1]);
        // two centers plus the two members of the near cluster
        assert_eq!(lc.num_dists(), 4);
    }

    #[test]
    fn test_range_zero_radius_on_center() {
        let db = line_db(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        let lc = ListOfClusters::from_centers(&db, vec![0, 3], &SequenceKind::SortedList, false)
            .unwrap();
        assert_eq!(lc.search_range(&10.0, 0.0).sorted_ids(), vec![3]);
        assert!(lc.search_range(&5.5, 1.0).is_empty());
    }

    #[test]
    fn test_knn_small_line() {
        let db = line_db(&[0.0, 1.0, 2.0, 10.0, 11.0, 12.5]);
        let lc = ListOfClusters::from_centers(&db, vec![0, 3], &SequenceKind::SortedList, false)
            .unwrap();
        let ids: Vec<usize> = lc
            .search_knn(&11.0, 2)
            .into_sorted_vec()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![4, 3]);
    }

    #[test]
    fn test_knn_k_larger_than_db() {
        let db = line_db(&[0.0, 3.0, 1.0, 7.0]);
        let lc = ListOfClusters::build(&db, &LcParams::new(2).with_seed(4)).unwrap();
        let result = lc.search_knn(&2.0, 10).into_sorted_vec();
        let ids: Vec<usize> = result.iter().map(|n| n.id).collect();
        // distances 2, 1, 1, 5: equal distances ordered by id
        assert_eq!(ids, vec![1, 2, 0, 3]);
    }

    #[test]
    fn test_knn_zero_k() {
        let db = line_db(&[0.0, 3.0, 1.0, 7.0]);
        let lc = ListOfClusters::build(&db, &LcParams::new(2).with_seed(4)).unwrap();
        assert!(lc.search_knn(&2.0, 0).is_empty());
    }

    #[test]
    fn test_knn_unbounded_k() {
        let db = line_db(&[0.0, 3.0, 1.0, 7.0]);
        let lc = ListOfClusters::build(&db, &LcParams::new(2).with_seed(4)).unwrap();
        let result = lc.search_knn(&1.0, usize::MAX);
        assert_eq!(result.len(), 4);
        assert_eq!(result.covering_radius(), f64::INFINITY);
    }
}
