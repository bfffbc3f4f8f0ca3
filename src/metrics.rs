//! Query statistics: latency and distance evaluations per query.

use std::time::Duration;

/// Collects per-query statistics for a batch of searches.
#[derive(Debug)]
pub struct QueryMetrics {
    latencies_us: Vec<f64>,
    distances: Vec<u64>,
    results: u64,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self {
            latencies_us: Vec::new(),
            distances: Vec::new(),
            results: 0,
        }
    }

    /// Record one query: its duration, distance evaluations, and result count.
    pub fn record_query(&mut self, duration: Duration, distances: u64, results: usize) {
        self.latencies_us.push(duration.as_micros() as f64);
        self.distances.push(distances);
        self.results += results as u64;
    }

    pub fn total_queries(&self) -> usize {
        self.latencies_us.len()
    }

    pub fn total_results(&self) -> u64 {
        self.results
    }

    /// Average query latency in microseconds.
    pub fn avg_latency_us(&self) -> f64 {
        mean(self.latencies_us.iter().copied())
    }

    /// Average distance evaluations per query.
    pub fn avg_distances(&self) -> f64 {
        mean(self.distances.iter().map(|&d| d as f64))
    }

    /// Get a percentile of query latency (e.g., 50.0, 95.0, 99.0).
    pub fn percentile_latency_us(&self, percentile: f64) -> f64 {
        if self.latencies_us.is_empty() {
            return 0.0;
        }

        let mut sorted = self.latencies_us.clone();
        sorted.sort_by(f64::total_cmp);

        let index = ((percentile / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        sorted[index.min(sorted.len() - 1)]
    }
}

impl Default for QueryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_basic() {
        let mut m = QueryMetrics::new();
        m.record_query(Duration::from_micros(100), 10, 2);
        m.record_query(Duration::from_micros(200), 30, 1);

        assert_eq!(m.total_queries(), 2);
        assert_eq!(m.total_results(), 3);
        assert!((m.avg_distances() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_metrics_latency() {
        let mut m = QueryMetrics::new();
        m.record_query(Duration::from_micros(100), 0, 0);
        m.record_query(Duration::from_micros(200), 0, 0);
        m.record_query(Duration::from_micros(300), 0, 0);

        assert!((m.avg_latency_us() - 200.0).abs() < 1.0);
        assert!((m.percentile_latency_us(50.0) - 200.0).abs() < 1.0);
        assert!((m.percentile_latency_us(100.0) - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_metrics_empty() {
        let m = QueryMetrics::new();
        assert_eq!(m.avg_latency_us(), 0.0);
        assert_eq!(m.avg_distances(), 0.0);
        assert_eq!(m.percentile_latency_us(99.0), 0.0);
    }
}
