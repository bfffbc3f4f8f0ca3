//! Partial searches for combining several indices over one database.
//!
//! These report which clusters may hold answers without scanning them, and
//! share center-to-query distances between indices through a
//! [`DistanceCache`] owned by the caller for the duration of one query.

use std::collections::HashMap;

use super::ListOfClusters;
use crate::database::MetricDb;
use crate::result::ResultSet;
use crate::sequence::Positions;

/// Center object id -> distance to the current query.
pub type DistanceCache = HashMap<usize, f64>;

impl<D: MetricDb> ListOfClusters<'_, D> {
    /// Distance from the center of `cluster` to `query`, through `cache`.
    ///
    /// Returns the distance and whether it was computed by this call.
    fn cached_center_dist(
        &self,
        cluster: usize,
        query: &D::Object,
        cache: &mut DistanceCache,
    ) -> (f64, bool) {
        let oid = self.centers[cluster];
        match cache.get(&oid) {
            Some(&d) => (d, false),
            None => {
                let d = self.center_dist(cluster, query);
                cache.insert(oid, d);
                (d, true)
            }
        }
    }

    /// Partial range search.
    ///
    /// Centers whose distance is computed here (not found in `cache`) and
    /// lie within `radius` are pushed into `result`. Clusters that cannot be
    /// excluded are appended to `out` for the caller to scan.
    pub fn partial_search_range<'s, R: ResultSet>(
        &'s self,
        query: &D::Object,
        radius: f64,
        result: &mut R,
        cache: &mut DistanceCache,
        out: &mut Vec<Positions<'s>>,
    ) {
        for cluster in 0..self.num_centers() {
            let (dcq, fresh) = self.cached_center_dist(cluster, query, cache);
            if fresh && dcq <= radius {
                result.push(self.centers[cluster], dcq);
            }
            if dcq <= radius + self.cov(cluster) {
                out.push(self.members(cluster));
            }
        }
    }

    /// Partial k-NN search.
    ///
    /// Freshly computed center distances are pushed into `result`. For each
    /// cluster with margin `dcq - cov <= result.covering_radius()` the margin
    /// goes to `out_margins` and the member list to `out_lists`, at the same
    /// index. The margin is a lower bound on the distance from the query to
    /// any member and may be negative; a caller can scan lists in ascending
    /// margin order and stop once a margin exceeds its covering radius.
    ///
    /// The number of neighbors wanted is the collector's own `k`; it is not
    /// passed separately.
    pub fn partial_search_knn_adaptive<'s, R: ResultSet>(
        &'s self,
        query: &D::Object,
        result: &mut R,
        cache: &mut DistanceCache,
        out_margins: &mut Vec<f64>,
        out_lists: &mut Vec<Positions<'s>>,
    ) {
        for cluster in 0..self.num_centers() {
            let (dcq, fresh) = self.cached_center_dist(cluster, query, cache);
            if fresh {
                result.push(self.centers[cluster], dcq);
            }
            let margin = dcq - self.cov(cluster);
            if margin <= result.covering_radius() {
                out_margins.push(margin);
                out_lists.push(self.members(cluster));
            }
        }
    }

    /// Whether object `item` could lie within `radius` of `query`
    /// according to this index.
    ///
    /// Centers always need review. For other objects the center distance of
    /// their cluster is taken from, or stored into, `cache`.
    pub fn must_review_item(
        &self,
        query: &D::Object,
        item: usize,
        radius: f64,
        cache: &mut DistanceCache,
    ) -> bool {
        match self.cluster_of(item) {
            None => true,
            Some(cluster) => {
                let (dcq, _) = self.cached_center_dist(cluster, query, cache);
                dcq <= radius + self.cov(cluster)
            }
        }
    }
}
