//! Result collectors for range and k-NN queries.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A result entry: object identifier and its distance to the query.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor {
    pub id: usize,
    pub distance: f64,
}

impl Neighbor {
    pub fn new(id: usize, distance: f64) -> Self {
        Self { id, distance }
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// By distance, then by id: the k-NN collector keeps the lowest ids among
// equidistant objects.
impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Accumulates `(object, distance)` pairs for one query.
pub trait ResultSet {
    /// Offer a candidate. Returns whether it was kept.
    fn push(&mut self, id: usize, distance: f64) -> bool;

    /// The live pruning threshold: the query radius for range queries, the
    /// current k-th best distance (infinite until k results exist) for k-NN.
    fn covering_radius(&self) -> f64;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain into a Vec sorted by ascending distance, ties by id.
    fn into_sorted_vec(self) -> Vec<Neighbor>
    where
        Self: Sized;
}

/// Keeps the `k` best candidates in a max-heap (worst on top).
#[derive(Debug, Clone)]
pub struct KnnResult {
    k: usize,
    heap: BinaryHeap<Neighbor>,
}

impl KnnResult {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::new(),
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Current worst kept candidate.
    pub fn peek(&self) -> Option<&Neighbor> {
        self.heap.peek()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.heap.iter()
    }
}

impl ResultSet for KnnResult {
    fn push(&mut self, id: usize, distance: f64) -> bool {
        if self.k == 0 {
            return false;
        }
        let n = Neighbor::new(id, distance);
        if self.heap.len() < self.k {
            self.heap.push(n);
            return true;
        }
        match self.heap.peek() {
            Some(worst) if n < *worst => {
                self.heap.pop();
                self.heap.push(n);
                true
            }
            _ => false,
        }
    }

    fn covering_radius(&self) -> f64 {
        if self.k == 0 {
            return f64::NEG_INFINITY;
        }
        if self.heap.len() < self.k {
            f64::INFINITY
        } else {
            self.heap.peek().map(|n| n.distance).unwrap_or(f64::INFINITY)
        }
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}

/// Keeps every candidate within a fixed radius.
#[derive(Debug, Clone)]
pub struct RangeResult {
    radius: f64,
    items: Vec<Neighbor>,
}

impl RangeResult {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            items: Vec::new(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Kept candidates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> {
        self.items.iter()
    }

    /// Identifiers of the kept candidates, ascending.
    pub fn sorted_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.items.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids
    }
}

impl ResultSet for RangeResult {
    fn push(&mut self, id: usize, distance: f64) -> bool {
        if distance <= self.radius {
            self.items.push(Neighbor::new(id, distance));
            true
        } else {
            false
        }
    }

    fn covering_radius(&self) -> f64 {
        self.radius
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn into_sorted_vec(mut self) -> Vec<Neighbor> {
        self.items.sort();
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knn_keeps_best_k() {
        let mut r = KnnResult::new(2);
        assert!(r.push(0, 5.0));
        assert!(r.push(1, 1.0));
        assert!(r.push(2, 3.0));
        assert!(!r.push(3, 4.0));

        assert_eq!(r.len(), 2);
        let sorted = r.into_sorted_vec();
        assert_eq!(sorted[0].id, 1);
        assert_eq!(sorted[1].id, 2);
    }

    #[test]
    fn test_knn_covering_radius_shrinks() {
        let mut r = KnnResult::new(2);
        assert_eq!(r.covering_radius(), f64::INFINITY);
        r.push(0, 5.0);
        assert_eq!(r.covering_radius(), f64::INFINITY);
        r.push(1, 4.0);
        assert_eq!(r.covering_radius(), 5.0);
        r.push(2, 1.0);
        assert_eq!(r.covering_radius(), 4.0);
    }

    #[test]
    fn test_knn_tie_prefers_lower_id() {
        let mut r = KnnResult::new(1);
        r.push(7, 2.0);
        assert!(r.push(3, 2.0));
        assert!(!r.push(9, 2.0));
        assert_eq!(r.into_sorted_vec()[0].id, 3);
    }

    #[test]
    fn test_knn_zero_k() {
        let mut r = KnnResult::new(0);
        assert!(!r.push(0, 0.0));
        assert!(r.is_empty());
        assert_eq!(r.covering_radius(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_range_filters_by_radius() {
        let mut r = RangeResult::new(2.0);
        assert!(r.push(4, 2.0));
        assert!(!r.push(5, 2.5));
        assert!(r.push(1, 0.5));
        assert_eq!(r.covering_radius(), 2.0);
        assert_eq!(r.sorted_ids(), vec![1, 4]);

        let sorted = r.into_sorted_vec();
        assert_eq!(sorted[0].id, 1);
        assert!(sorted[0].distance <= sorted[1].distance);
    }
}
