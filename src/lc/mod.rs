//! List of Clusters (LC) index.
//!
//! A fixed set of randomly sampled centers each own the objects closest to
//! them. Every cluster records its covering radius, the largest distance
//! from its center to a member, so a query only needs its distance to the
//! centers to rule out whole clusters via the triangle inequality:
//!
//! ```text
//! d(q, x) <= r  and  d(c, x) <= cov(c)   =>   d(q, c) <= r + cov(c)
//! ```
//!
//! Cluster membership is stored as one symbol per database object in a
//! [`Sequence`]: the cluster id of the object's nearest center, or the
//! sentinel `num_centers` for the centers themselves. The centers are
//! therefore recoverable from the sequence alone.

mod build;
mod partial;
mod persist;
mod search;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::database::MetricDb;
use crate::index::MetricIndex;
use crate::result::{KnnResult, RangeResult};
use crate::sequence::{Positions, Sequence, SequenceKind};

pub use partial::DistanceCache;

/// Construction parameters for [`ListOfClusters`].
#[derive(Debug, Clone)]
pub struct LcParams {
    /// Number of clusters (sampled centers).
    pub num_centers: usize,
    /// Seed for center sampling. `None` draws a seed from OS entropy.
    pub seed: Option<u64>,
    /// Assign objects to centers on the rayon thread pool.
    pub parallel: bool,
    /// Representation of the cluster-assignment sequence.
    pub sequence: SequenceKind,
}

impl Default for LcParams {
    fn default() -> Self {
        Self {
            num_centers: 64,
            seed: None,
            parallel: true,
            sequence: SequenceKind::SortedList,
        }
    }
}

impl LcParams {
    pub fn new(num_centers: usize) -> Self {
        Self {
            num_centers,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_sequence(mut self, sequence: SequenceKind) -> Self {
        self.sequence = sequence;
        self
    }
}

/// Shape statistics of a built index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub num_objects: usize,
    pub num_centers: usize,
    pub sequence: SequenceKind,
    /// Smallest and largest number of non-center members in a cluster.
    pub min_cluster_size: usize,
    pub max_cluster_size: usize,
    pub mean_covering_radius: f64,
    pub max_covering_radius: f64,
}

/// The List-of-Clusters index over a borrowed metric database.
pub struct ListOfClusters<'a, D: MetricDb> {
    db: &'a D,
    /// Center object ids, ascending. Position in this list is the cluster id.
    centers: Vec<usize>,
    /// Covering radius per cluster id.
    cov: Vec<f32>,
    /// Cluster id per object; `centers.len()` marks a center.
    seq: Box<dyn Sequence>,
    num_dists: AtomicU64,
}

impl<'a, D: MetricDb> ListOfClusters<'a, D> {
    /// The indexed database.
    pub fn db(&self) -> &'a D {
        self.db
    }

    /// Number of clusters.
    pub fn num_centers(&self) -> usize {
        self.centers.len()
    }

    /// Center object ids in cluster-id order (ascending).
    pub fn centers(&self) -> &[usize] {
        &self.centers
    }

    /// Object id of the center of cluster `cluster`.
    pub fn center(&self, cluster: usize) -> usize {
        self.centers[cluster]
    }

    /// Covering radius table, indexed by cluster id.
    pub fn covering_radii(&self) -> &[f32] {
        &self.cov
    }

    /// The cluster-assignment sequence.
    pub fn sequence(&self) -> &dyn Sequence {
        self.seq.as_ref()
    }

    /// The sentinel symbol marking centers in the sequence.
    pub fn sentinel(&self) -> u32 {
        self.centers.len() as u32
    }

    /// Cluster id of a non-center object, or `None` for a center.
    pub fn cluster_of(&self, id: usize) -> Option<usize> {
        let symbol = self.seq.access(id);
        (symbol != self.sentinel()).then_some(symbol as usize)
    }

    /// Non-center members of a cluster, ascending by object id.
    pub fn members(&self, cluster: usize) -> Positions<'_> {
        Positions::new(self.seq.as_ref(), cluster as u32)
    }

    pub fn summary(&self) -> IndexSummary {
        let sizes = (0..self.num_centers()).map(|c| self.seq.count(c as u32));
        let (min_size, max_size) =
            sizes.fold((usize::MAX, 0), |(lo, hi), s| (lo.min(s), hi.max(s)));
        let total_cov: f64 = self.cov.iter().map(|&r| r as f64).sum();
        IndexSummary {
            num_objects: self.db.len(),
            num_centers: self.num_centers(),
            sequence: self.seq.kind(),
            min_cluster_size: min_size,
            max_cluster_size: max_size,
            mean_covering_radius: total_cov / self.num_centers() as f64,
            max_covering_radius: self.cov.iter().fold(0.0f32, |a, &b| a.max(b)) as f64,
        }
    }

    /// Distance evaluations performed by this index so far.
    pub fn num_dists(&self) -> u64 {
        self.num_dists.load(Ordering::Relaxed)
    }

    pub fn reset_num_dists(&self) {
        self.num_dists.store(0, Ordering::Relaxed);
    }

    fn count_dists(&self, n: u64) {
        self.num_dists.fetch_add(n, Ordering::Relaxed);
    }

    /// Distance from the center of `cluster` to `query`.
    fn center_dist(&self, cluster: usize, query: &D::Object) -> f64 {
        self.count_dists(1);
        self.db.dist_to(self.centers[cluster], query)
    }

    fn cov(&self, cluster: usize) -> f64 {
        self.cov[cluster] as f64
    }
}

impl<D: MetricDb> fmt::Debug for ListOfClusters<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListOfClusters")
            .field("num_objects", &self.db.len())
            .field("centers", &self.centers)
            .field("cov", &self.cov)
            .field("seq", &self.seq.kind())
            .finish()
    }
}

impl<D: MetricDb> MetricIndex for ListOfClusters<'_, D> {
    type Object = D::Object;

    fn search_range(&self, query: &D::Object, radius: f64) -> RangeResult {
        ListOfClusters::search_range(self, query, radius)
    }

    fn search_knn(&self, query: &D::Object, k: usize) -> KnnResult {
        ListOfClusters::search_knn(self, query, k)
    }

    fn len(&self) -> usize {
        self.db.len()
    }
}

/// Smallest `f32` that is `>= x`, for non-negative finite `x`.
///
/// Radii are stored as `f32`; rounding to nearest could shrink a radius
/// below a member's true distance and drop it from search results.
pub(crate) fn round_up_f32(x: f64) -> f32 {
    let y = x as f32;
    if (y as f64) < x {
        f32::from_bits(y.to_bits() + 1)
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_up_f32() {
        assert_eq!(round_up_f32(0.0), 0.0);
        assert_eq!(round_up_f32(2.0), 2.0);
        let x = 0.1f64;
        let r = round_up_f32(x);
        assert!(r as f64 >= x);
        assert!((r as f64 - x) < 1e-7);
    }

    #[test]
    fn test_params_builder() {
        let p = LcParams::new(8)
            .with_seed(5)
            .with_parallel(false)
            .with_sequence(SequenceKind::WaveletMatrix);
        assert_eq!(p.num_centers, 8);
        assert_eq!(p.seed, Some(5));
        assert!(!p.parallel);
        assert_eq!(p.sequence, SequenceKind::WaveletMatrix);
    }
}
