//! Run-splitting request batcher for rangekit trees.
//!
//! The batcher walks an ordered request stream once, splitting it into
//! maximal same-kind runs. A query-run is read-only for its whole
//! duration, so its queries may be fanned out across workers and written
//! into pre-reserved result slots; an update-run mutates the tree and is
//! applied under a stricter discipline. Run boundaries are full barriers:
//! the executor joins all work from one run before the next begins, so
//! every query observes exactly the updates that precede it in the stream
//! and none that follow.

use rangekit_executor::Executor;
use rangekit_request::{Request, run_len};
use rangekit_tree::{AtomicSumTree, SumTree, TreeError};

/// How the requests of a single run are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecMode {
    /// Apply the run's requests one at a time on the calling thread.
    #[default]
    Sequential,
    /// Fan the run out through the injected executor.
    Parallel,
}

/// Execution policy for query-runs and update-runs.
///
/// Queries are always safe to parallelize: nothing writes to the tree
/// while a query-run is in flight. Updates are only parallelized against
/// [`AtomicSumTree`], where every node write is an atomic accumulation;
/// distinct updates share ancestor nodes, so plain-integer writes from
/// two workers would lose increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionPolicy {
    pub queries: ExecMode,
    pub updates: ExecMode,
}

impl ExecutionPolicy {
    /// Everything on the calling thread; the reference semantics.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Fan out query-runs, apply updates one at a time.
    pub fn parallel_queries() -> Self {
        Self {
            queries: ExecMode::Parallel,
            updates: ExecMode::Sequential,
        }
    }

    /// Fan out both run kinds. Update parallelism only takes effect in
    /// [`process_concurrent`].
    pub fn parallel() -> Self {
        Self {
            queries: ExecMode::Parallel,
            updates: ExecMode::Parallel,
        }
    }
}

/// Processes an ordered request stream against an exclusively owned tree.
///
/// Returns one result per query, in the queries' original stream order.
/// Query-runs are dispatched per `policy.queries`; update-runs are always
/// applied sequentially here because the plain tree cannot accept
/// concurrent writers (`policy.updates` is ignored — use
/// [`process_concurrent`] for parallel updates).
///
/// On the first failing request the error is returned and processing
/// stops; updates already applied remain applied, each one atomically.
pub fn process<E: Executor>(
    tree: &mut SumTree,
    requests: &[Request],
    executor: &E,
    policy: &ExecutionPolicy,
) -> Result<Vec<i64>, TreeError> {
    let mut results = Vec::with_capacity(requests.len());
    let mut rest = requests;
    while !rest.is_empty() {
        let (run, tail) = rest.split_at(run_len(rest));
        if run[0].is_query() {
            let answers = run_queries(run, executor, policy.queries, |left, right| {
                tree.sum_range(left, right)
            });
            drain_into(answers, &mut results)?;
        } else {
            for request in run {
                let (index, delta) = update_fields(request);
                tree.apply_delta(index, delta)?;
            }
        }
        rest = tail;
    }
    Ok(results)
}

/// Processes an ordered request stream against an atomic tree.
///
/// Same contract as [`process`], but `policy.updates == Parallel` fans
/// update-runs out through the executor as well. That is safe here:
/// every node write is an atomic `fetch_add`, and addition commutes, so
/// the final tree state does not depend on the order in which workers
/// land their increments.
pub fn process_concurrent<E: Executor>(
    tree: &AtomicSumTree,
    requests: &[Request],
    executor: &E,
    policy: &ExecutionPolicy,
) -> Result<Vec<i64>, TreeError> {
    let mut results = Vec::with_capacity(requests.len());
    let mut rest = requests;
    while !rest.is_empty() {
        let (run, tail) = rest.split_at(run_len(rest));
        if run[0].is_query() {
            let answers = run_queries(run, executor, policy.queries, |left, right| {
                tree.sum_range(left, right)
            });
            drain_into(answers, &mut results)?;
        } else {
            match policy.updates {
                ExecMode::Sequential => {
                    for request in run {
                        let (index, delta) = update_fields(request);
                        tree.apply_delta(index, delta)?;
                    }
                }
                ExecMode::Parallel => {
                    let outcomes = executor.map(run.len(), |i| {
                        let (index, delta) = update_fields(&run[i]);
                        tree.apply_delta(index, delta)
                    });
                    for outcome in outcomes {
                        outcome?;
                    }
                }
            }
        }
        rest = tail;
    }
    Ok(results)
}

/// Executes a query-run, either inline or fanned out. The executor's
/// order-preserving `map` is what puts each answer in the slot matching
/// its original stream position.
fn run_queries<E, Q>(
    run: &[Request],
    executor: &E,
    mode: ExecMode,
    query: Q,
) -> Vec<Result<i64, TreeError>>
where
    E: Executor,
    Q: Fn(usize, usize) -> Result<i64, TreeError> + Sync,
{
    match mode {
        ExecMode::Sequential => run
            .iter()
            .map(|request| {
                let (left, right) = query_fields(request);
                query(left, right)
            })
            .collect(),
        ExecMode::Parallel => executor.map(run.len(), |i| {
            let (left, right) = query_fields(&run[i]);
            query(left, right)
        }),
    }
}

fn drain_into(
    answers: Vec<Result<i64, TreeError>>,
    results: &mut Vec<i64>,
) -> Result<(), TreeError> {
    for answer in answers {
        results.push(answer?);
    }
    Ok(())
}

fn query_fields(request: &Request) -> (usize, usize) {
    match *request {
        Request::Query { left, right } => (left, right),
        // run_len never mixes kinds within a run
        Request::Update { .. } => unreachable!("update request in a query run"),
    }
}

fn update_fields(request: &Request) -> (usize, i64) {
    match *request {
        Request::Update { index, delta } => (index, delta),
        Request::Query { .. } => unreachable!("query request in an update run"),
    }
}
