//! Fork-join executor capability for rangekit query and update runs.
//!
//! The batcher maps a run of independent work items across workers through
//! an injected [`Executor`]. [`SequentialExecutor`] is the reference
//! semantics: everything a parallel executor computes must be
//! indistinguishable from it. [`ThreadPoolExecutor`] fans out over scoped
//! threads and joins them all before returning, which is the barrier the
//! batcher relies on at run boundaries.

use std::thread;

/// Fork-join execution over `count` independent work items.
///
/// Both methods fully join all dispatched work before returning. No
/// suspension, cancellation, or timeouts: every item is processed
/// synchronously from the caller's perspective.
pub trait Executor {
    /// Runs `f(0..count)` and collects the results in index order: output
    /// slot `i` holds `f(i)` regardless of execution interleaving.
    fn map<T, F>(&self, count: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync;

    /// Runs `f(0..count)` for effect only.
    fn for_each<F>(&self, count: usize, f: F)
    where
        F: Fn(usize) + Sync;
}

/// Single-worker baseline: plain loops, deterministic order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl Executor for SequentialExecutor {
    fn map<T, F>(&self, count: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        (0..count).map(f).collect()
    }

    fn for_each<F>(&self, count: usize, f: F)
    where
        F: Fn(usize) + Sync,
    {
        for i in 0..count {
            f(i);
        }
    }
}

/// Configuration for [`ThreadPoolExecutor`].
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Number of worker threads to fan out over.
    pub workers: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workers: thread::available_parallelism().map_or(4, usize::from),
        }
    }
}

/// Builder for executor configuration.
#[derive(Debug, Default)]
pub struct ExecutorBuilder {
    config: ExecutorConfig,
}

impl ExecutorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    pub fn build(self) -> ExecutorConfig {
        self.config
    }
}

/// Fork-join executor backed by scoped threads.
///
/// Work items are split into contiguous index chunks, one per worker, so
/// each worker writes a disjoint region of the output.
#[derive(Debug, Clone)]
pub struct ThreadPoolExecutor {
    workers: usize,
}

impl ThreadPoolExecutor {
    /// Creates an executor with the given worker count (clamped to at
    /// least 1).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn from_config(config: &ExecutorConfig) -> Self {
        Self::new(config.workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadPoolExecutor {
    fn default() -> Self {
        Self::from_config(&ExecutorConfig::default())
    }
}

impl Executor for ThreadPoolExecutor {
    fn map<T, F>(&self, count: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        if count == 0 {
            return Vec::new();
        }
        let workers = self.workers.min(count);
        let chunk = count.div_ceil(workers);
        thread::scope(|scope| {
            let f = &f;
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        let start = worker * chunk;
                        let end = count.min(start + chunk);
                        (start..end).map(f).collect::<Vec<T>>()
                    })
                })
                .collect();
            let mut out = Vec::with_capacity(count);
            for handle in handles {
                // A worker panic is a bug in the supplied closure;
                // propagate it to the caller.
                out.extend(handle.join().expect("executor worker panicked"));
            }
            out
        })
    }

    fn for_each<F>(&self, count: usize, f: F)
    where
        F: Fn(usize) + Sync,
    {
        if count == 0 {
            return;
        }
        let workers = self.workers.min(count);
        let chunk = count.div_ceil(workers);
        thread::scope(|scope| {
            let f = &f;
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    scope.spawn(move || {
                        let start = worker * chunk;
                        let end = count.min(start + chunk);
                        for i in start..end {
                            f(i);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().expect("executor worker panicked");
            }
        });
    }
}
