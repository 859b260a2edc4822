//! Synthetic value arrays and request streams for exercising rangekit.
//!
//! Streams are generated as alternating runs of random length, starting
//! with a query-run, so batched processing has realistic kind boundaries
//! to split on. Generation is seeded and deterministic: the core never
//! depends on a process-wide generator, it accepts whatever the caller
//! built here.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rangekit_request::Request;

/// Parameters for workload generation.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Length of the value array (must be at least 1).
    pub len: usize,
    /// Number of requests in the stream.
    pub requests: usize,
    /// Values are drawn from `0..=max_value`.
    pub max_value: i64,
    /// Update deltas are drawn from `-max_delta..=max_delta`.
    pub max_delta: i64,
    /// RNG seed; equal seeds produce equal workloads.
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            len: 1024,
            requests: 4096,
            max_value: 100,
            max_delta: 16,
            seed: 0,
        }
    }
}

/// Builder for workload configuration.
#[derive(Debug, Default)]
pub struct WorkloadBuilder {
    config: WorkloadConfig,
}

impl WorkloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(mut self, len: usize) -> Self {
        self.config.len = len;
        self
    }

    pub fn requests(mut self, requests: usize) -> Self {
        self.config.requests = requests;
        self
    }

    pub fn max_value(mut self, max_value: i64) -> Self {
        self.config.max_value = max_value;
        self
    }

    pub fn max_delta(mut self, max_delta: i64) -> Self {
        self.config.max_delta = max_delta;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> WorkloadConfig {
        self.config
    }
}

/// A generated value array plus request stream.
#[derive(Debug, Clone)]
pub struct Workload {
    pub values: Vec<i64>,
    pub requests: Vec<Request>,
}

impl Workload {
    /// Generates a workload from the given configuration with a seeded
    /// RNG.
    pub fn generate(config: &WorkloadConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let values = gen_values(&mut rng, config.len, config.max_value);
        let requests = gen_requests(&mut rng, config.requests, config.len, config.max_delta);
        Self { values, requests }
    }
}

/// Generates `count` values uniformly drawn from `0..=max_value`.
pub fn gen_values(rng: &mut impl Rng, count: usize, max_value: i64) -> Vec<i64> {
    (0..count).map(|_| rng.random_range(0..=max_value)).collect()
}

/// Generates a request stream of alternating random-length runs over an
/// array of length `len`, starting with a query-run.
///
/// Query bounds are normalized so `left <= right`; single-element queries
/// are allowed. Update indices stay within `0..len` and deltas within
/// `-max_delta..=max_delta`.
pub fn gen_requests(
    rng: &mut impl Rng,
    count: usize,
    len: usize,
    max_delta: i64,
) -> Vec<Request> {
    assert!(len > 0, "request streams need an array of at least 1 element");
    let mut requests = Vec::with_capacity(count);
    let mut queries = true;
    while requests.len() < count {
        let run_end = rng.random_range(requests.len() + 1..=count);
        while requests.len() < run_end {
            if queries {
                let a = rng.random_range(0..len);
                let b = rng.random_range(0..len);
                let (left, right) = if a <= b { (a, b) } else { (b, a) };
                requests.push(Request::Query { left, right });
            } else {
                requests.push(Request::Update {
                    index: rng.random_range(0..len),
                    delta: rng.random_range(-max_delta..=max_delta),
                });
            }
        }
        queries = !queries;
    }
    requests
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_seeds_give_equal_workloads() {
        let config = WorkloadBuilder::new().len(64).requests(256).seed(7).build();
        let a = Workload::generate(&config);
        let b = Workload::generate(&config);
        assert_eq!(a.values, b.values);
        assert_eq!(a.requests, b.requests);
    }

    #[test]
    fn test_different_seeds_differ() {
        let base = WorkloadBuilder::new().len(64).requests(256);
        let a = Workload::generate(&base.seed(1).build());
        let b = Workload::generate(&WorkloadBuilder::new().len(64).requests(256).seed(2).build());
        assert_ne!(a.requests, b.requests);
    }

    #[test]
    fn test_requests_stay_in_bounds() {
        let config = WorkloadBuilder::new()
            .len(32)
            .requests(512)
            .max_delta(5)
            .seed(11)
            .build();
        let workload = Workload::generate(&config);
        assert_eq!(workload.requests.len(), 512);
        for request in &workload.requests {
            match *request {
                Request::Query { left, right } => {
                    assert!(left <= right);
                    assert!(right < 32);
                }
                Request::Update { index, delta } => {
                    assert!(index < 32);
                    assert!((-5..=5).contains(&delta));
                }
            }
        }
    }

    #[test]
    fn test_stream_starts_with_queries_and_alternates() {
        let mut rng = StdRng::seed_from_u64(3);
        let requests = gen_requests(&mut rng, 200, 16, 4);
        assert!(requests[0].is_query());
        // Collapse into run kinds and check strict alternation.
        let mut kinds = Vec::new();
        for request in &requests {
            if kinds.last() != Some(&request.is_query()) {
                kinds.push(request.is_query());
            }
        }
        for pair in kinds.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_values_respect_max() {
        let mut rng = StdRng::seed_from_u64(5);
        let values = gen_values(&mut rng, 100, 9);
        assert!(values.iter().all(|v| (0..=9).contains(v)));
    }
}
