//! Request and result model for rangekit batch processing.
//!
//! A request stream is an ordered sequence of [`Request`] values. Order
//! matters only across kind boundaries: an update strictly before a query
//! must be visible to that query, a query strictly before an update must
//! not see it. The batcher exploits this by splitting the stream into
//! maximal same-kind runs.

use serde::{Deserialize, Serialize};

/// A single request against the aggregation tree.
///
/// The kind set is closed, so the batcher matches exhaustively instead of
/// dispatching through an open trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Request {
    /// Range-sum query over the closed interval `[left, right]` of the
    /// original, unpadded array.
    Query { left: usize, right: usize },
    /// Additive point mutation: `delta` is added to the element at
    /// `index`. Not idempotent; reapplying accumulates.
    Update { index: usize, delta: i64 },
}

impl Request {
    pub fn is_query(&self) -> bool {
        matches!(self, Request::Query { .. })
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Request::Update { .. })
    }

    /// Whether two requests belong to the same run kind.
    pub fn same_kind(&self, other: &Request) -> bool {
        self.is_query() == other.is_query()
    }
}

/// Length of the maximal same-kind run at the front of `requests`.
///
/// Returns 0 for an empty stream; a lone request forms a run of length 1.
pub fn run_len(requests: &[Request]) -> usize {
    match requests.first() {
        None => 0,
        Some(first) => requests.iter().take_while(|r| r.same_kind(first)).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: Request = Request::Query { left: 0, right: 1 };
    const U: Request = Request::Update { index: 0, delta: 1 };

    #[test]
    fn test_kind_predicates() {
        assert!(Q.is_query());
        assert!(!Q.is_update());
        assert!(U.is_update());
        assert!(Q.same_kind(&Q));
        assert!(!Q.same_kind(&U));
    }

    #[test]
    fn test_run_len_empty_stream() {
        assert_eq!(run_len(&[]), 0);
    }

    #[test]
    fn test_run_len_single_request() {
        assert_eq!(run_len(&[Q]), 1);
        assert_eq!(run_len(&[U, Q, Q]), 1);
    }

    #[test]
    fn test_run_len_stops_at_kind_boundary() {
        assert_eq!(run_len(&[Q, Q, Q, U, Q]), 3);
        assert_eq!(run_len(&[U, U, Q]), 2);
    }

    #[test]
    fn test_run_len_homogeneous_stream() {
        assert_eq!(run_len(&[Q; 5]), 5);
    }

    #[test]
    fn test_serde_tagged_representation() {
        let json = serde_json::to_string(&Request::Query { left: 2, right: 5 }).unwrap();
        assert_eq!(json, r#"{"kind":"query","left":2,"right":5}"#);
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Request::Query { left: 2, right: 5 });
    }
}
