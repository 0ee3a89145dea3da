//! Progress-callback trait for batch conversion events.
//!
//! Inject a [`BatchProgress`] into [`crate::batch::run_batch`] to receive
//! events as the queue is worked through. Callbacks are the least-invasive
//! integration point: the library stays ignorant of whether the host
//! forwards events to a terminal progress bar, a channel, or a status
//! column in a file list.
//!
//! All methods have default no-op implementations so callers only override
//! what they care about; [`NoopBatchProgress`] is the default when no
//! callback is supplied.

/// Called by the batch orchestrator as it processes each queued file.
///
/// Items are processed strictly sequentially, so implementations receive
/// events in queue order and need no synchronisation of their own. The
/// trait is still `Send + Sync` because the batch itself may run on any
/// worker thread.
pub trait BatchProgress: Send + Sync {
    /// Called once before the first item starts.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called when an item's conversion begins.
    ///
    /// `index` is the 0-based queue position.
    fn on_item_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// Called when an item converts successfully.
    fn on_item_complete(&self, index: usize, total: usize, output_name: &str, output_bytes: usize) {
        let _ = (index, total, output_name, output_bytes);
    }

    /// Called when an item's conversion fails. `error` is the short status
    /// label, not the full error text.
    fn on_item_error(&self, index: usize, total: usize, name: &str, error: &str) {
        let _ = (index, total, name, error);
    }

    /// Called once after every item has resolved, success or failure.
    fn on_batch_complete(&self, total: usize, succeeded: usize) {
        let _ = (total, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopBatchProgress;

impl BatchProgress for NoopBatchProgress {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl BatchProgress for Counting {
        fn on_item_start(&self, _index: usize, _total: usize, _name: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }
        fn on_item_complete(&self, _i: usize, _t: usize, _name: &str, _bytes: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }
        fn on_item_error(&self, _i: usize, _t: usize, _name: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_does_not_panic() {
        let cb = NoopBatchProgress;
        cb.on_batch_start(2);
        cb.on_item_start(0, 2, "a");
        cb.on_item_complete(0, 2, "a.out", 10);
        cb.on_item_error(1, 2, "b", "decode failed");
        cb.on_batch_complete(2, 1);
    }

    #[test]
    fn counting_receives_events() {
        let cb = Counting::default();
        cb.on_item_start(0, 1, "a");
        cb.on_item_complete(0, 1, "a.out", 1);
        cb.on_item_error(0, 1, "a", "x");
        assert_eq!(cb.starts.load(Ordering::SeqCst), 1);
        assert_eq!(cb.completes.load(Ordering::SeqCst), 1);
        assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
    }
}
