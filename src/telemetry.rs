//! Request-timing telemetry attached to outgoing requests for server-side diagnostics.
//!
//! Each completed exchange leaves one [`TelemetryRecord`] behind; the next request
//! dequeues it, stamps it with its own request id and ships it in the
//! `Cko-Sdk-Telemetry` header. The queue is bounded and best-effort: once full,
//! new records are dropped silently rather than blocking in-flight requests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

/// Upper bound on buffered records; inserts beyond this are silently discarded.
const MAX_RECORDS: usize = 10;

/// One completed request's timing, labeled for correlation with the request
/// that carries it.
///
/// `request_id` is rewritten with the *current* request's id just before the
/// header is attached, so the server sees "the request identified by
/// `prev_request_id` took `prev_request_duration` ms and was followed by this
/// one". Immutable once enqueued.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub prev_request_id: String,
    pub request_id: String,
    /// Duration of the previous request in milliseconds.
    pub prev_request_duration: u64,
}

/// Bounded FIFO of recent [`TelemetryRecord`]s, shared across all in-flight
/// requests of one client.
///
/// A single mutex guards both operations; with at most ten O(1) entries there
/// is nothing to gain from finer-grained locking. FIFO order holds among
/// successfully enqueued records, but no ordering is promised relative to the
/// wall-clock order of concurrent requests.
#[derive(Clone, Default)]
pub(crate) struct RequestMetricsQueue {
    records: Arc<Mutex<VecDeque<TelemetryRecord>>>,
}

impl RequestMetricsQueue {
    pub(crate) fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(VecDeque::with_capacity(MAX_RECORDS))),
        }
    }

    /// Appends `record` unless the queue is full; overflow is a silent no-op.
    pub(crate) fn enqueue(&self, record: TelemetryRecord) {
        let mut records = self.records.lock().expect("telemetry lock poisoned");
        if records.len() < MAX_RECORDS {
            records.push_back(record);
        }
    }

    /// Removes and returns the oldest record, `None` when empty. Never blocks
    /// beyond the mutex.
    pub(crate) fn dequeue(&self) -> Option<TelemetryRecord> {
        self.records
            .lock()
            .expect("telemetry lock poisoned")
            .pop_front()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.records.lock().expect("telemetry lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> TelemetryRecord {
        TelemetryRecord {
            prev_request_id: id.to_string(),
            request_id: id.to_string(),
            prev_request_duration: 42,
        }
    }

    #[test]
    fn dequeues_in_fifo_order() {
        let queue = RequestMetricsQueue::new();
        queue.enqueue(record("a"));
        queue.enqueue(record("b"));

        assert_eq!(queue.dequeue().unwrap().request_id, "a");
        assert_eq!(queue.dequeue().unwrap().request_id, "b");
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn dequeue_on_empty_returns_none() {
        let queue = RequestMetricsQueue::new();
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn overflow_is_a_silent_no_op() {
        let queue = RequestMetricsQueue::new();
        for i in 0..MAX_RECORDS {
            queue.enqueue(record(&format!("r{i}")));
        }
        assert_eq!(queue.len(), MAX_RECORDS);

        queue.enqueue(record("overflow"));
        assert_eq!(queue.len(), MAX_RECORDS);
        // head untouched: still the first record, not the overflowing one
        assert_eq!(queue.dequeue().unwrap().request_id, "r0");
    }

    #[test]
    fn never_exceeds_capacity_under_concurrent_use() {
        let queue = RequestMetricsQueue::new();
        let mut handles = Vec::new();

        for t in 0..8 {
            let queue = queue.clone();
            handles.push(std::thread::spawn(move || {
                for i in 0..500 {
                    queue.enqueue(record(&format!("t{t}-{i}")));
                    assert!(queue.len() <= MAX_RECORDS);
                    if i % 3 == 0 {
                        let _ = queue.dequeue();
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker thread panicked");
        }

        assert!(queue.len() <= MAX_RECORDS);
    }

    #[test]
    fn record_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(record("rq_1")).unwrap();
        assert_eq!(json["prev_request_id"], "rq_1");
        assert_eq!(json["request_id"], "rq_1");
        assert_eq!(json["prev_request_duration"], 42);
    }
}
