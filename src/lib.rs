//! # metric_lc
//!
//! List-of-Clusters similarity search for general metric spaces.
//!
//! Objects only need a distance function; no coordinates are assumed.
//! This library provides:
//! - Metric databases over arbitrary object types
//! - The List-of-Clusters index: construction, exact range and k-NN search,
//!   and partial searches for combining several indices
//! - Pluggable compact cluster-membership sequences (sorted lists, wavelet matrix)
//! - Binary persistence
//!
//! ## Example
//!
//! ```rust
//! use metric_lc::{DistanceMetric, LcParams, ListOfClusters, ResultSet, Vector, VectorDb};
//!
//! let vectors = (0..100)
//!     .map(|i| Vector::new(vec![(i % 10) as f32, (i / 10) as f32]))
//!     .collect();
//! let db = VectorDb::from_vectors(vectors, DistanceMetric::Euclidean).unwrap();
//!
//! let index = ListOfClusters::build(&db, &LcParams::new(8).with_seed(42)).unwrap();
//!
//! let query = Vector::new(vec![4.2, 4.9]);
//! let near = index.search_range(&query, 1.0);
//! assert_eq!(near.sorted_ids(), vec![44, 54, 55]);
//!
//! let best = index.search_knn(&query, 3).into_sorted_vec();
//! assert_eq!(best[0].id, 54);
//! ```

pub mod combine;
pub mod database;
pub mod distance;
pub mod error;
pub mod flat_index;
pub mod index;
pub mod lc;
pub mod metrics;
pub mod persistence;
pub mod result;
pub mod sampling;
pub mod sequence;
pub mod vector;

pub use database::{MetricDb, ObjectDb, VectorDb};
pub use distance::{DistanceMetric, FnMetric, Metric};
pub use error::{LcError, Result};
pub use flat_index::FlatIndex;
pub use index::MetricIndex;
pub use lc::{DistanceCache, IndexSummary, LcParams, ListOfClusters};
pub use result::{KnnResult, Neighbor, RangeResult, ResultSet};
pub use sequence::{Positions, Sequence, SequenceBuilder, SequenceKind};
pub use vector::Vector;
