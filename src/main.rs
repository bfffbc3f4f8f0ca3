//! CLI interface for the List-of-Clusters index

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use metric_lc::persistence::IndexStore;
use metric_lc::{
    DistanceMetric, FlatIndex, LcParams, ListOfClusters, MetricDb, MetricIndex, ResultSet,
    SequenceKind, Vector, VectorDb,
};
use metric_lc::metrics::QueryMetrics;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lcindex")]
#[command(about = "List-of-Clusters similarity search over vector files", long_about = None)]
struct Cli {
    /// Vector file: one comma-separated vector per line
    #[arg(long)]
    data: String,

    /// Distance metric
    #[arg(long, value_enum, default_value = "euclidean")]
    metric: MetricArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy)]
enum MetricArg {
    Euclidean,
    Manhattan,
    Chebyshev,
}

impl From<MetricArg> for DistanceMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Euclidean => DistanceMetric::Euclidean,
            MetricArg::Manhattan => DistanceMetric::Manhattan,
            MetricArg::Chebyshev => DistanceMetric::Chebyshev,
        }
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum SequenceArg {
    SortedList,
    WaveletMatrix,
}

impl From<SequenceArg> for SequenceKind {
    fn from(s: SequenceArg) -> Self {
        match s {
            SequenceArg::SortedList => SequenceKind::SortedList,
            SequenceArg::WaveletMatrix => SequenceKind::WaveletMatrix,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index and save it to a directory
    Build {
        /// Output directory
        #[arg(long)]
        index: String,
        /// Number of centers
        #[arg(short, long, default_value = "64")]
        centers: usize,
        /// Random seed for center sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Cluster sequence representation
        #[arg(long, value_enum, default_value = "sorted-list")]
        sequence: SequenceArg,
        /// Assign objects on a single thread
        #[arg(long)]
        sequential: bool,
    },
    /// All vectors within a radius of the query
    Range {
        #[arg(long)]
        index: String,
        /// Query vector as comma-separated values (e.g., "1.0,2.0,3.0")
        query: String,
        #[arg(short, long)]
        radius: f64,
    },
    /// The k nearest vectors to the query
    Knn {
        #[arg(long)]
        index: String,
        /// Query vector as comma-separated values (e.g., "1.0,2.0,3.0")
        query: String,
        #[arg(short, long, default_value = "5")]
        k: usize,
    },
    /// Print the index manifest
    Info {
        #[arg(long)]
        index: String,
    },
    /// Compare index and brute-force distance counts using database objects as queries
    Bench {
        #[arg(long)]
        index: String,
        /// Number of queries
        #[arg(short, long, default_value = "100")]
        queries: usize,
        #[arg(short, long, default_value = "10")]
        k: usize,
    },
}

fn load_index<'a>(store: &IndexStore, db: &'a VectorDb) -> Result<ListOfClusters<'a, VectorDb>> {
    store
        .load(db)?
        .context("no index found; run `build` first")
}

fn parse_query(db: &VectorDb, query: &str) -> Result<Vector> {
    let q: Vector = query.parse()?;
    db.check_query(&q)?;
    Ok(q)
}

fn print_results(results: &[metric_lc::Neighbor]) {
    if results.is_empty() {
        println!("No results found");
        return;
    }
    println!("{} results:", results.len());
    for (i, n) in results.iter().enumerate() {
        println!("{}. #{} (distance: {:.4})", i + 1, n.id, n.distance);
    }
}

fn run(db: &VectorDb, command: Commands) -> Result<()> {
    match command {
        Commands::Build {
            index,
            centers,
            seed,
            sequence,
            sequential,
        } => {
            let mut params = LcParams::new(centers)
                .with_parallel(!sequential)
                .with_sequence(sequence.into());
            params.seed = seed;
            let lc = ListOfClusters::build(db, &params)?;
            IndexStore::new(&index)?.save(&lc)?;
            println!(
                "Built index with {} centers over {} objects ({} distances)",
                lc.num_centers(),
                db.len(),
                lc.num_dists()
            );
        }
        Commands::Range {
            index,
            query,
            radius,
        } => {
            let store = IndexStore::new(&index)?;
            let lc = load_index(&store, db)?;
            let q = parse_query(db, &query)?;
            let results = lc.search_range(&q, radius).into_sorted_vec();
            print_results(&results);
            println!("Distance evaluations: {}", lc.num_dists());
        }
        Commands::Knn { index, query, k } => {
            let store = IndexStore::new(&index)?;
            let lc = load_index(&store, db)?;
            let q = parse_query(db, &query)?;
            let results = lc.search_knn(&q, k).into_sorted_vec();
            print_results(&results);
            println!("Distance evaluations: {}", lc.num_dists());
        }
        Commands::Info { index } => {
            let store = IndexStore::new(&index)?;
            let manifest = store
                .manifest()?
                .context("no manifest found; run `build` first")?;
            println!("{}", serde_json::to_string_pretty(&manifest)?);
        }
        Commands::Bench { index, queries, k } => {
            let store = IndexStore::new(&index)?;
            let lc = load_index(&store, db)?;
            let flat = FlatIndex::new(db);
            let step = (db.len() / queries.max(1)).max(1);

            let mut metrics = QueryMetrics::new();
            let mut mismatches = 0;
            for id in (0..db.len()).step_by(step).take(queries) {
                let q = db.get(id);
                lc.reset_num_dists();
                let started = Instant::now();
                let result = lc.search_knn(q, k);
                metrics.record_query(started.elapsed(), lc.num_dists(), result.len());

                let expected = flat.search_knn(q, k).into_sorted_vec();
                let got = result.into_sorted_vec();
                if got.iter().map(|n| n.distance).ne(expected.iter().map(|n| n.distance)) {
                    mismatches += 1;
                }
            }

            println!("Queries: {}", metrics.total_queries());
            println!(
                "Distances per query: {:.1} (brute force: {})",
                metrics.avg_distances(),
                db.len()
            );
            println!(
                "Latency: avg {:.1}us, p50 {:.1}us, p99 {:.1}us",
                metrics.avg_latency_us(),
                metrics.percentile_latency_us(50.0),
                metrics.percentile_latency_us(99.0)
            );
            if mismatches > 0 {
                anyhow::bail!("{} queries disagreed with brute force", mismatches);
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db = VectorDb::from_file(&cli.data, cli.metric.into())
        .with_context(|| format!("failed to load vectors from {}", cli.data))?;
    run(&db, cli.command)
}
