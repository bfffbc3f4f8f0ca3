//! Searching several List-of-Clusters indices built over the same database.
//!
//! Each index prunes independently, so an object only needs its distance
//! computed if no index can exclude it. Center distances are shared across
//! indices through one [`DistanceCache`] per query; every cached key is a
//! center of some index whose distance has already been offered to the
//! result collector.

use std::collections::HashSet;

use crate::database::MetricDb;
use crate::error::{LcError, Result};
use crate::lc::{DistanceCache, ListOfClusters};
use crate::result::{KnnResult, RangeResult, ResultSet};
use crate::sequence::Positions;

fn check_indices<D: MetricDb>(indices: &[ListOfClusters<'_, D>]) -> Result<()> {
    let first = indices
        .first()
        .ok_or_else(|| LcError::InvalidParameter("no indices to combine".to_string()))?;
    if indices.iter().any(|lc| !std::ptr::eq(lc.db(), first.db())) {
        return Err(LcError::InvalidParameter(
            "combined indices must share one database".to_string(),
        ));
    }
    Ok(())
}

/// Whether every index other than `skip` keeps `item` for `radius`.
fn reviewed_by_all<D: MetricDb>(
    indices: &[ListOfClusters<'_, D>],
    skip: usize,
    query: &D::Object,
    item: usize,
    radius: f64,
    cache: &mut DistanceCache,
) -> bool {
    indices
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != skip)
        .all(|(_, lc)| lc.must_review_item(query, item, radius, cache))
}

/// All objects within `radius` of `query`, pruning with every index.
pub fn combined_search_range<D: MetricDb>(
    indices: &[ListOfClusters<'_, D>],
    query: &D::Object,
    radius: f64,
) -> Result<RangeResult> {
    check_indices(indices)?;
    let db = indices[0].db();
    let mut result = RangeResult::new(radius);
    let mut cache = DistanceCache::new();

    let mut per_index: Vec<Vec<Positions<'_>>> = Vec::with_capacity(indices.len());
    for lc in indices {
        let mut lists = Vec::new();
        lc.partial_search_range(query, radius, &mut result, &mut cache, &mut lists);
        per_index.push(lists);
    }

    // Scan from the index with the fewest surviving members; each object
    // appears in at most one of its lists.
    let (base, lists) = per_index
        .iter()
        .enumerate()
        .min_by_key(|(_, lists)| lists.iter().map(Positions::len).sum::<usize>())
        .map(|(i, lists)| (i, lists.as_slice()))
        .unwrap_or((0, &[]));

    let mut computed = 0usize;
    for list in lists {
        for item in list.iter() {
            if cache.contains_key(&item) {
                continue;
            }
            if !reviewed_by_all(indices, base, query, item, radius, &mut cache) {
                continue;
            }
            computed += 1;
            let d = db.dist_to(item, query);
            if d <= radius {
                result.push(item, d);
            }
        }
    }

    tracing::debug!(
        indices = indices.len(),
        centers = cache.len(),
        computed,
        hits = result.len(),
        "combined range search"
    );
    Ok(result)
}

/// The `k` nearest objects to `query`, pruning with every index.
///
/// Surviving clusters of all indices are scanned in ascending margin order
/// (lower bound on member distance), stopping at the first margin above the
/// current k-th best distance.
pub fn combined_search_knn<D: MetricDb>(
    indices: &[ListOfClusters<'_, D>],
    query: &D::Object,
    k: usize,
) -> Result<KnnResult> {
    check_indices(indices)?;
    let db = indices[0].db();
    let mut result = KnnResult::new(k);
    let mut cache = DistanceCache::new();

    let mut queue: Vec<(f64, usize, Positions<'_>)> = Vec::new();
    for (i, lc) in indices.iter().enumerate() {
        let mut margins = Vec::new();
        let mut lists = Vec::new();
        lc.partial_search_knn_adaptive(query, &mut result, &mut cache, &mut margins, &mut lists);
        queue.extend(
            margins
                .into_iter()
                .zip(lists)
                .map(|(margin, list)| (margin, i, list)),
        );
    }
    queue.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut seen: HashSet<usize> = HashSet::new();
    let mut scanned_lists = 0usize;
    let mut computed = 0usize;
    for (margin, owner, list) in &queue {
        if *margin > result.covering_radius() {
            break;
        }
        scanned_lists += 1;
        for item in list.iter() {
            if cache.contains_key(&item) || !seen.insert(item) {
                continue;
            }
            let radius = result.covering_radius();
            if !reviewed_by_all(indices, *owner, query, item, radius, &mut cache) {
                continue;
            }
            computed += 1;
            result.push(item, db.dist_to(item, query));
        }
    }

    tracing::debug!(
        indices = indices.len(),
        candidates = queue.len(),
        scanned_lists,
        computed,
        "combined knn search"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ObjectDb;
    use crate::distance::FnMetric;
    use crate::flat_index::FlatIndex;
    use crate::index::MetricIndex;
    use crate::lc::LcParams;

    fn abs_diff(a: &f64, b: &f64) -> f64 {
        (a - b).abs()
    }

    type LineDb = ObjectDb<f64, FnMetric<fn(&f64, &f64) -> f64>>;

    fn line_db() -> LineDb {
        let points = (0..300).map(|i| ((i * 7919) % 1009) as f64 / 7.0).collect();
        ObjectDb::new(points, FnMetric(abs_diff as fn(&f64, &f64) -> f64))
    }

    fn build_many(db: &LineDb, n: usize) -> Vec<ListOfClusters<'_, LineDb>> {
        (0..n)
            .map(|i| {
                let params = LcParams::new(10).with_seed(100 + i as u64);
                ListOfClusters::build(db, &params).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_combined_range_matches_flat() {
        let db = line_db();
        let indices = build_many(&db, 3);
        let flat = FlatIndex::new(&db);
        for &(q, r) in &[(3.0, 2.0), (70.5, 0.5), (140.0, 10.0), (-5.0, 1.0)] {
            let got = combined_search_range(&indices, &q, r).unwrap();
            assert_eq!(got.sorted_ids(), flat.search_range(&q, r).sorted_ids());
        }
    }

    #[test]
    fn test_combined_knn_matches_flat() {
        let db = line_db();
        let indices = build_many(&db, 3);
        let flat = FlatIndex::new(&db);
        for &(q, k) in &[(3.0, 1), (70.5, 5), (140.0, 20), (500.0, 3)] {
            let got: Vec<f64> = combined_search_knn(&indices, &q, k)
                .unwrap()
                .into_sorted_vec()
                .iter()
                .map(|n| n.distance)
                .collect();
            let want: Vec<f64> = flat
                .search_knn(&q, k)
                .into_sorted_vec()
                .iter()
                .map(|n| n.distance)
                .collect();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn test_single_index_combination() {
        let db = line_db();
        let indices = build_many(&db, 1);
        let got = combined_search_range(&indices, &10.0, 3.0).unwrap();
        assert_eq!(got.sorted_ids(), indices[0].search_range(&10.0, 3.0).sorted_ids());
    }

    #[test]
    fn test_no_indices() {
        let empty: Vec<ListOfClusters<'_, LineDb>> = Vec::new();
        assert!(matches!(
            combined_search_range(&empty, &1.0, 1.0),
            Err(LcError::InvalidParameter(_))
        ));
        assert!(combined_search_knn(&empty, &1.0, 1).is_err());
    }

    #[test]
    fn test_mixed_databases_rejected() {
        let db1 = line_db();
        let db2 = line_db();
        let indices = vec![
            ListOfClusters::build(&db1, &LcParams::new(4).with_seed(1)).unwrap(),
            ListOfClusters::build(&db2, &LcParams::new(4).with_seed(1)).unwrap(),
        ];
        assert!(combined_search_range(&indices, &1.0, 1.0).is_err());
    }
}
