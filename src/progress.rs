//! Progress reporting for a conversion run.
//!
//! Inject an [`Arc<dyn ConvertProgress>`] via
//! [`crate::config::ConversionConfigBuilder::progress`] to receive events as
//! the pipeline advances. The callback approach keeps the library ignorant
//! of how the host renders progress — a terminal bar, a log line, a GUI
//! widget — and all methods default to no-ops so callers only override what
//! they care about.
//!
//! The step budget is fixed the moment the page count is known:
//! `3 + page_count` (text extraction, language detection, one OCR pass per
//! page, final merge). Rasterisation happens before the budget exists and
//! deliberately does not count. Progress is a UI affordance only; nothing
//! in the pipeline reads it back.

use std::sync::Arc;

/// Called by the conversion pipeline as it advances through its steps.
///
/// Implementations must be `Send + Sync`; the pipeline itself is strictly
/// sequential, but the callback crosses a `spawn_blocking` boundary.
pub trait ConvertProgress: Send + Sync {
    /// Called once, before the first step, when the page count is known.
    ///
    /// `max_steps` is always `3 + page_count`.
    fn on_begin(&self, max_steps: usize) {
        let _ = max_steps;
    }

    /// Called after each step completes.
    ///
    /// `step` is 1-based and strictly increasing up to `max_steps`;
    /// `message` is a short human-readable description of what just ran.
    fn on_step(&self, step: usize, max_steps: usize, message: &str) {
        let _ = (step, max_steps, message);
    }

    /// Called once after the output file has been written.
    ///
    /// Not called when the conversion errors out or no-ops on an empty
    /// document.
    fn on_finish(&self, total_steps: usize) {
        let _ = total_steps;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl ConvertProgress for NoopProgress {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressHandle = Arc<dyn ConvertProgress>;

/// Monotonic step counter for one conversion job.
///
/// Owned by the pipeline, reset per job by construction. Tracks
/// `current / max` and the last message, forwarding each advance to the
/// configured callback.
pub struct ProgressState {
    current: usize,
    max: usize,
    last_message: String,
    sink: ProgressHandle,
}

impl ProgressState {
    /// Start a new job's progress with a fixed step budget.
    pub fn begin(max: usize, sink: ProgressHandle) -> Self {
        sink.on_begin(max);
        Self {
            current: 0,
            max,
            last_message: String::new(),
            sink,
        }
    }

    /// Advance the counter by one and report `message`.
    pub fn step_forward(&mut self, message: impl Into<String>) {
        self.current += 1;
        debug_assert!(self.current <= self.max, "step counter overran its budget");
        self.last_message = message.into();
        self.sink.on_step(self.current, self.max, &self.last_message);
    }

    /// Signal that the job completed.
    pub fn finish(&self) {
        self.sink.on_finish(self.current);
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn last_message(&self) -> &str {
        &self.last_message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TrackingProgress {
        begun_with: AtomicUsize,
        steps: AtomicUsize,
        finished_at: AtomicUsize,
        messages: Mutex<Vec<String>>,
    }

    impl TrackingProgress {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                begun_with: AtomicUsize::new(0),
                steps: AtomicUsize::new(0),
                finished_at: AtomicUsize::new(0),
                messages: Mutex::new(Vec::new()),
            })
        }
    }

    impl ConvertProgress for TrackingProgress {
        fn on_begin(&self, max_steps: usize) {
            self.begun_with.store(max_steps, Ordering::SeqCst);
        }

        fn on_step(&self, _step: usize, _max: usize, message: &str) {
            self.steps.fetch_add(1, Ordering::SeqCst);
            self.messages.lock().unwrap().push(message.to_string());
        }

        fn on_finish(&self, total_steps: usize) {
            self.finished_at.store(total_steps, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_progress_does_not_panic() {
        let p = NoopProgress;
        p.on_begin(5);
        p.on_step(1, 5, "working");
        p.on_finish(5);
    }

    #[test]
    fn counter_is_monotonic_and_forwards_messages() {
        let tracker = TrackingProgress::new();
        // two-page document: 3 + 2 steps
        let mut state = ProgressState::begin(5, tracker.clone());
        assert_eq!(tracker.begun_with.load(Ordering::SeqCst), 5);

        state.step_forward("extracting text data from image");
        state.step_forward("detecting language");
        state.step_forward("converting page 1 to pdf");
        state.step_forward("converting page 2 to pdf");
        state.step_forward("merging results into final pdf");

        assert_eq!(state.current(), 5);
        assert_eq!(state.max(), 5);
        assert_eq!(state.last_message(), "merging results into final pdf");
        assert_eq!(tracker.steps.load(Ordering::SeqCst), 5);

        state.finish();
        assert_eq!(tracker.finished_at.load(Ordering::SeqCst), 5);

        let messages = tracker.messages.lock().unwrap();
        assert_eq!(messages[0], "extracting text data from image");
        assert_eq!(messages[1], "detecting language");
    }
}
