//! # Outcome Observation
//!
//! Observer trait for presentation outcomes and fetch failures. Each method
//! has a logging default, so implementers override only what they act on.

use flow_core::{CompletionOutcome, FlowError};
use tracing::{debug, info, warn};

/// Observer invoked exactly once per completed presentation attempt.
#[allow(unused_variables)]
pub trait OutcomeObserver: Send + Sync {
    /// Called when a presentation completes successfully
    fn on_completed(&self) {
        info!("Presentation completed");
    }

    /// Called when the customer cancels a presentation
    fn on_canceled(&self) {
        info!("Presentation canceled");
    }

    /// Called when a presentation fails
    fn on_failed(&self, reason: &str) {
        warn!("Presentation failed: {}", reason);
    }

    /// Called when an intent fetch fails (no presentation attempt was made)
    fn on_fetch_failed(&self, error: &FlowError) {
        warn!("Intent fetch failed: {}", error);
    }
}

/// Default observer that just logs outcomes
pub struct LoggingObserver;

impl OutcomeObserver for LoggingObserver {}

/// Dispatch one outcome to the appropriate observer method
pub fn dispatch_outcome(observer: &dyn OutcomeObserver, outcome: &CompletionOutcome) {
    match outcome {
        CompletionOutcome::Completed => observer.on_completed(),
        CompletionOutcome::Canceled => observer.on_canceled(),
        CompletionOutcome::Failed { reason } => observer.on_failed(reason),
    }
    debug!("Dispatched outcome: {}", outcome);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingObserver {
        completed: AtomicUsize,
        failed: AtomicUsize,
    }

    impl OutcomeObserver for CountingObserver {
        fn on_completed(&self) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }

        fn on_failed(&self, _reason: &str) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_dispatch_routes_by_outcome() {
        let observer = CountingObserver::default();

        dispatch_outcome(&observer, &CompletionOutcome::Completed);
        dispatch_outcome(&observer, &CompletionOutcome::failed("declined"));
        dispatch_outcome(&observer, &CompletionOutcome::Canceled); // default impl

        assert_eq!(observer.completed.load(Ordering::SeqCst), 1);
        assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
    }
}
