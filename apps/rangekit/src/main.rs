use anyhow::{Context, Result, bail, ensure};
use clap::{Parser, Subcommand};
use rangekit_batcher::{ExecutionPolicy, process};
use rangekit_executor::{SequentialExecutor, ThreadPoolExecutor};
use rangekit_tree::SumTree;
use rangekit_workload::{Workload, WorkloadBuilder};
use serde::Serialize;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "rangekit")]
#[command(about = "Run range-sum workloads over a segment tree.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a workload, process it sequentially and in parallel, and
    /// compare the two result sequences.
    Run {
        /// Length of the value array.
        #[arg(long, default_value_t = 100_000)]
        len: usize,
        /// Number of requests in the stream.
        #[arg(long, default_value_t = 100_000)]
        requests: usize,
        /// Values are drawn from 0..=MAX_VALUE.
        #[arg(long, default_value_t = 100)]
        max_value: i64,
        /// Update deltas are drawn from -MAX_DELTA..=MAX_DELTA.
        #[arg(long, default_value_t = 16)]
        max_delta: i64,
        /// RNG seed; equal seeds produce equal workloads.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Worker threads for the parallel pass (0 = all available).
        #[arg(long, default_value_t = 0)]
        workers: usize,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct RunSummary {
    len: usize,
    requests: usize,
    queries: usize,
    workers: usize,
    sequential_ms: f64,
    parallel_ms: f64,
    matched: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run {
            len,
            requests,
            max_value,
            max_delta,
            seed,
            workers,
            json,
        } => run(len, requests, max_value, max_delta, seed, workers, json),
    }
}

#[allow(clippy::too_many_arguments)]
fn run(
    len: usize,
    requests: usize,
    max_value: i64,
    max_delta: i64,
    seed: u64,
    workers: usize,
    json: bool,
) -> Result<()> {
    ensure!(len >= 1, "--len must be at least 1");

    let config = WorkloadBuilder::new()
        .len(len)
        .requests(requests)
        .max_value(max_value)
        .max_delta(max_delta)
        .seed(seed)
        .build();
    let workload = Workload::generate(&config);
    let queries = workload.requests.iter().filter(|r| r.is_query()).count();

    let executor = if workers == 0 {
        ThreadPoolExecutor::default()
    } else {
        ThreadPoolExecutor::new(workers)
    };

    let mut tree = SumTree::from_values(&workload.values)
        .context("building tree for the sequential pass")?;
    let start = Instant::now();
    let sequential = process(
        &mut tree,
        &workload.requests,
        &SequentialExecutor,
        &ExecutionPolicy::sequential(),
    )
    .context("sequential pass failed")?;
    let sequential_ms = start.elapsed().as_secs_f64() * 1_000.0;

    let mut tree = SumTree::from_values(&workload.values)
        .context("building tree for the parallel pass")?;
    let start = Instant::now();
    let parallel = process(
        &mut tree,
        &workload.requests,
        &executor,
        &ExecutionPolicy::parallel_queries(),
    )
    .context("parallel pass failed")?;
    let parallel_ms = start.elapsed().as_secs_f64() * 1_000.0;

    let matched = sequential == parallel;
    let summary = RunSummary {
        len,
        requests,
        queries,
        workers: executor.workers(),
        sequential_ms,
        parallel_ms,
        matched,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "generated {len} values, {requests} requests ({queries} queries)"
        );
        println!("sequential: {sequential_ms:.2}ms");
        println!(
            "parallel ({} workers): {parallel_ms:.2}ms",
            summary.workers
        );
        if matched {
            println!("results match");
        }
    }

    if !matched {
        bail!("parallel results diverged from the sequential baseline");
    }
    Ok(())
}
