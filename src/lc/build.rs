//! Index construction and re-encoding.

use std::sync::atomic::AtomicU64;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::{round_up_f32, LcParams, ListOfClusters};
use crate::database::MetricDb;
use crate::error::{LcError, Result};
use crate::sampling;
use crate::sequence::SequenceBuilder;

impl<'a, D: MetricDb> ListOfClusters<'a, D> {
    /// Build an index with randomly sampled centers.
    pub fn build(db: &'a D, params: &LcParams) -> Result<Self> {
        Self::build_with(db, params, &params.sequence)
    }

    /// Build an index, encoding cluster membership with `builder`.
    pub fn build_with(db: &'a D, params: &LcParams, builder: &dyn SequenceBuilder) -> Result<Self> {
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::build_with_rng(db, params.num_centers, &mut rng, builder, params.parallel)
    }

    /// Build an index drawing centers from a caller-supplied random source.
    pub fn build_with_rng<R: Rng + ?Sized>(
        db: &'a D,
        num_centers: usize,
        rng: &mut R,
        builder: &dyn SequenceBuilder,
        parallel: bool,
    ) -> Result<Self> {
        check_center_count(num_centers, db.len())?;
        let centers = sampling::sample_without_replacement(rng, num_centers, db.len())?;
        Self::from_centers(db, centers, builder, parallel)
    }

    /// Build an index around the given center object ids.
    ///
    /// Every non-center object joins the cluster of its nearest center; ties
    /// go to the center with the lowest cluster id.
    pub fn from_centers(
        db: &'a D,
        mut centers: Vec<usize>,
        builder: &dyn SequenceBuilder,
        parallel: bool,
    ) -> Result<Self> {
        let n = db.len();
        check_center_count(centers.len(), n)?;
        if n > u32::MAX as usize {
            return Err(LcError::InvalidParameter(format!(
                "database of {} objects exceeds the supported size",
                n
            )));
        }

        centers.sort_unstable();
        if let Some(w) = centers.windows(2).find(|w| w[0] == w[1]) {
            return Err(LcError::InvalidParameter(format!("duplicate center {}", w[0])));
        }
        if let Some(&last) = centers.last() {
            if last >= n {
                return Err(LcError::InvalidParameter(format!(
                    "center {} out of range for database of {} objects",
                    last, n
                )));
            }
        }

        let m = centers.len();
        let sentinel = m as u32;
        tracing::info!(num_objects = n, num_centers = m, parallel, "building list of clusters");
        let started = Instant::now();

        let mut is_center = vec![false; n];
        for &c in &centers {
            is_center[c] = true;
        }

        let nearest = |id: usize| -> Option<(u32, f64)> {
            if is_center[id] {
                return None;
            }
            let obj = db.get(id);
            let mut best = (0u32, f64::INFINITY);
            for (cluster, &c) in centers.iter().enumerate() {
                let d = db.dist(obj, db.get(c));
                if d < best.1 {
                    best = (cluster as u32, d);
                }
            }
            Some(best)
        };

        let assignment: Vec<Option<(u32, f64)>> = if parallel {
            (0..n).into_par_iter().map(nearest).collect()
        } else {
            (0..n).map(nearest).collect()
        };

        let mut symbols = vec![sentinel; n];
        let mut max_dist = vec![0.0f64; m];
        for (id, a) in assignment.into_iter().enumerate() {
            if let Some((cluster, d)) = a {
                symbols[id] = cluster;
                let slot = &mut max_dist[cluster as usize];
                if *slot < d {
                    *slot = d;
                }
            }
        }
        let cov: Vec<f32> = max_dist.into_iter().map(round_up_f32).collect();

        let seq = builder.build(symbols, sentinel + 1);
        let num_dists = ((n - m) * m) as u64;

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            distances = num_dists,
            sequence = %seq.kind(),
            "list of clusters built"
        );

        Ok(Self {
            db,
            centers,
            cov,
            seq,
            num_dists: AtomicU64::new(num_dists),
        })
    }

    /// Re-encode this index's cluster membership with another sequence
    /// representation. Centers, radii and query results are unchanged and
    /// no distances are computed.
    pub fn rebuild(&self, builder: &dyn SequenceBuilder) -> Self {
        let seq = builder.build(self.seq.raw_symbols(), self.seq.sigma());
        tracing::debug!(from = %self.seq.kind(), to = %seq.kind(), "re-encoded cluster sequence");
        Self {
            db: self.db,
            centers: self.centers.clone(),
            cov: self.cov.clone(),
            seq,
            num_dists: AtomicU64::new(0),
        }
    }
}

fn check_center_count(num_centers: usize, n: usize) -> Result<()> {
    if num_centers == 0 {
        return Err(LcError::InvalidParameter(
            "number of centers must be at least 1".to_string(),
        ));
    }
    if num_centers > n {
        return Err(LcError::InvalidParameter(format!(
            "cannot pick {} centers from {} objects",
            num_centers, n
        )));
    }
    Ok(())
}
