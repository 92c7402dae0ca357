//! Progress reporting for the summarize pipeline.
//!
//! A run reports a single percentage. Extraction fills `[0, 50]` (one signal
//! per page) and transformation fills `[50, 100]` (one signal per resolved
//! chunk). [`ProgressTracker`] turns raw counts into those percentages and
//! guarantees the sequence handed to the [`ProgressSink`] never goes
//! backwards, even though pages are reported from a blocking thread and chunks
//! resolve in any order.
//!
//! # Example
//!
//! ```rust
//! use pdfstudy::{ProgressSink, ProgressTracker};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Recorder(Mutex<Vec<u8>>);
//!
//! impl ProgressSink for Recorder {
//!     fn on_progress(&self, percent: u8) {
//!         self.0.lock().unwrap().push(percent);
//!     }
//! }
//!
//! let recorder = Arc::new(Recorder::default());
//! let tracker = ProgressTracker::new(recorder.clone());
//! tracker.extraction(1, 2);
//! tracker.extraction(2, 2);
//! tracker.transformation(1, 1);
//! assert_eq!(*recorder.0.lock().unwrap(), vec![25, 50, 100]);
//! ```

use crate::output::{emit_json_line, ProgressUpdate};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

/// Receives progress events.
///
/// Implementations must be `Send + Sync`: page progress arrives from the
/// extraction thread and chunk events from the async dispatcher. All methods
/// default to no-ops.
pub trait ProgressSink: Send + Sync {
    /// A new overall percentage in `[0, 100]`.
    fn on_progress(&self, percent: u8) {
        let _ = percent;
    }

    /// A chunk produced output.
    ///
    /// # Arguments
    /// * `index`: 0-based chunk index
    /// * `total`: number of chunks
    /// * `len`: byte length of the cleaned output
    fn on_chunk_complete(&self, index: usize, total: usize, len: usize) {
        let _ = (index, total, len);
    }

    /// A chunk failed and was replaced by its placeholder.
    fn on_chunk_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }
}

/// A sink that ignores everything.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {}

/// Writes `{"progress": n}` lines to stdout, flushing after each one.
///
/// This is the wire format the parent process of `summarize-pdf` reads.
pub struct JsonLinesProgress;

impl ProgressSink for JsonLinesProgress {
    fn on_progress(&self, percent: u8) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = emit_json_line(&mut out, &ProgressUpdate { progress: percent }) {
            warn!("Failed to write progress line: {}", e);
        }
    }
}

/// Convenience alias for the sink type stored by the tracker.
pub type SharedProgress = Arc<dyn ProgressSink>;

/// Maps page/chunk counts to a monotonic percentage and forwards it.
///
/// The high-water mark is held under a lock for the whole
/// compare-and-forward, so concurrent reporters reach the sink one at a time
/// and in non-decreasing order.
pub struct ProgressTracker {
    sink: SharedProgress,
    last: Mutex<u8>,
}

impl ProgressTracker {
    pub fn new(sink: SharedProgress) -> Self {
        Self {
            sink,
            last: Mutex::new(0),
        }
    }

    /// A tracker that reports nowhere.
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopProgress))
    }

    /// `done` of `total` pages extracted → `floor(done / total * 50)`.
    pub fn extraction(&self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.emit(scaled(done, total, 0));
    }

    /// `received` of `total` chunks resolved → `50 + floor(received / total * 50)`.
    pub fn transformation(&self, received: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.emit(scaled(received, total, 50));
    }

    pub fn chunk_complete(&self, index: usize, total: usize, len: usize) {
        self.sink.on_chunk_complete(index, total, len);
    }

    pub fn chunk_error(&self, index: usize, total: usize, error: &str) {
        self.sink.on_chunk_error(index, total, error);
    }

    /// Mark the run finished and return the final percentage (always 100).
    ///
    /// Nothing is sent to the sink: the terminal result object carries the
    /// final `progress` field itself.
    pub fn complete(&self) -> u8 {
        *self.high_water() = 100;
        100
    }

    /// Highest percentage reported so far.
    pub fn current(&self) -> u8 {
        *self.high_water()
    }

    fn emit(&self, percent: u8) {
        let mut last = self.high_water();
        *last = (*last).max(percent.min(100));
        // The sink is called with the lock held.
        self.sink.on_progress(*last);
    }

    fn high_water(&self) -> MutexGuard<'_, u8> {
        // A sink that panicked mid-report leaves a valid u8 behind.
        self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `base + floor(done / total * 50)` in integer arithmetic.
fn scaled(done: usize, total: usize, base: u8) -> u8 {
    let done = done.min(total);
    base + (done * 50 / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<u8>>,
        errors: Mutex<Vec<usize>>,
    }

    impl ProgressSink for Recorder {
        fn on_progress(&self, percent: u8) {
            self.seen.lock().unwrap().push(percent);
        }

        fn on_chunk_error(&self, index: usize, _total: usize, _error: &str) {
            self.errors.lock().unwrap().push(index);
        }
    }

    #[test]
    fn extraction_fills_lower_half() {
        let rec = Arc::new(Recorder::default());
        let t = ProgressTracker::new(rec.clone());
        for page in 1..=3 {
            t.extraction(page, 3);
        }
        assert_eq!(*rec.seen.lock().unwrap(), vec![16, 33, 50]);
    }

    #[test]
    fn transformation_fills_upper_half() {
        let rec = Arc::new(Recorder::default());
        let t = ProgressTracker::new(rec.clone());
        for n in 1..=3 {
            t.transformation(n, 3);
        }
        assert_eq!(*rec.seen.lock().unwrap(), vec![66, 83, 100]);
    }

    #[test]
    fn never_regresses() {
        let rec = Arc::new(Recorder::default());
        let t = ProgressTracker::new(rec.clone());
        t.transformation(2, 4);
        t.extraction(1, 4);
        let seen = rec.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![75, 75]);
        assert_eq!(t.current(), 75);
    }

    /// Blocks inside the first report until the main thread has started a
    /// second, larger one.
    struct SlowOnFirst {
        seen: Mutex<Vec<u8>>,
        entered: std::sync::Barrier,
    }

    impl ProgressSink for SlowOnFirst {
        fn on_progress(&self, percent: u8) {
            if percent == 60 {
                self.entered.wait();
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            self.seen.lock().unwrap().push(percent);
        }
    }

    #[test]
    fn concurrent_reporters_reach_the_sink_in_order() {
        let sink = Arc::new(SlowOnFirst {
            seen: Mutex::new(Vec::new()),
            entered: std::sync::Barrier::new(2),
        });
        let t = Arc::new(ProgressTracker::new(sink.clone()));

        let first = {
            let t = t.clone();
            std::thread::spawn(move || t.transformation(1, 5))
        };
        sink.entered.wait();
        let second = {
            let t = t.clone();
            std::thread::spawn(move || t.transformation(2, 5))
        };
        first.join().unwrap();
        second.join().unwrap();

        let seen = sink.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![60, 70], "regressed: {seen:?}");
        assert_eq!(t.current(), 70);
    }

    #[test]
    fn zero_totals_emit_nothing() {
        let rec = Arc::new(Recorder::default());
        let t = ProgressTracker::new(rec.clone());
        t.extraction(0, 0);
        t.transformation(0, 0);
        assert!(rec.seen.lock().unwrap().is_empty());
        assert_eq!(t.complete(), 100);
        assert_eq!(t.current(), 100);
    }

    #[test]
    fn chunk_errors_are_forwarded() {
        let rec = Arc::new(Recorder::default());
        let t = ProgressTracker::new(rec.clone());
        t.chunk_error(4, 9, "timeout");
        assert_eq!(*rec.errors.lock().unwrap(), vec![4]);
    }

    #[test]
    fn noop_sink_does_not_panic() {
        let t = ProgressTracker::noop();
        t.extraction(1, 1);
        t.chunk_complete(0, 1, 10);
        t.transformation(1, 1);
        assert_eq!(t.current(), 100);
    }
}
