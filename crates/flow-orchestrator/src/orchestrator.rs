//! # Checkout Session Orchestrator
//!
//! Owns the lifecycle of one payment-intent preparation-to-completion cycle:
//! fetch intent data from a remote endpoint, build a payment UI handle from it,
//! expose the handle for presentation, observe the outcome, and optionally
//! prepare a fresh cycle after success.
//!
//! State machine:
//!
//! ```text
//! Idle ──prepare()──▶ Fetching ──▶ Ready ──present()──▶ Presenting
//!   ▲                    │                                  │
//!   │              fetch/parse error                 ┌──────┼──────────┐
//!   │                    ▼                           ▼      ▼          ▼
//!   └─────prepare()─── Failed                   Completed Canceled  Failed
//!                                                   │        │
//!                                       auto-renew ─┘        └─▶ Ready (handle kept)
//! ```

use crate::builder::ConfigBuilder;
use crate::observer::{dispatch_outcome, OutcomeObserver};
use flow_backend::IntentClient;
use flow_core::{
    BoxedPaymentUi, CompletionOutcome, FlowError, FlowResult, IntentDescriptor, PaymentUiHandle,
    SessionState,
};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument};

/// Orchestrator behavior flags
#[derive(Debug, Clone, Default)]
pub struct OrchestratorOptions {
    /// Begin a fresh fetch cycle immediately after a completed presentation
    pub auto_renew_after_success: bool,
}

struct Inner {
    state: SessionState,
    descriptor: Option<IntentDescriptor>,
    handle: Option<Arc<dyn PaymentUiHandle>>,
    /// Bumped by `cancel_fetch` and each accepted `prepare`; a fetch whose
    /// epoch no longer matches discards its result.
    epoch: u64,
}

/// Client-side state machine driving one checkout session at a time.
///
/// Invariants:
/// - at most one non-terminal handle exists at a time
/// - exactly one network call per accepted `prepare()`
/// - after a completed outcome the prior handle is discarded before any new
///   fetch begins (an intent cannot be reused after success)
///
/// A `prepare()` call while a fetch or presentation is in flight is ignored
/// (logged at debug, returns `Ok`); callers that need a fresh cycle first call
/// `cancel_fetch()`.
pub struct CheckoutOrchestrator {
    client: IntentClient,
    ui: BoxedPaymentUi,
    config_builder: ConfigBuilder,
    options: OrchestratorOptions,
    inner: Mutex<Inner>,
    observers: Mutex<Vec<Arc<dyn OutcomeObserver>>>,
}

impl CheckoutOrchestrator {
    /// Create an orchestrator wiring an endpoint client to a payment UI
    pub fn new(
        client: IntentClient,
        ui: BoxedPaymentUi,
        config_builder: ConfigBuilder,
        options: OrchestratorOptions,
    ) -> Self {
        Self {
            client,
            ui,
            config_builder,
            options,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                descriptor: None,
                handle: None,
                epoch: 0,
            }),
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Register an outcome observer (invoked once per presentation attempt)
    pub fn register_observer(&self, observer: Arc<dyn OutcomeObserver>) {
        self.observers
            .lock()
            .expect("observer lock poisoned")
            .push(observer);
    }

    /// Current session state (non-blocking read)
    pub fn state(&self) -> SessionState {
        self.lock_inner().state
    }

    /// The active handle, if one is ready or presenting (non-blocking read)
    pub fn current_handle(&self) -> Option<Arc<dyn PaymentUiHandle>> {
        self.lock_inner().handle.clone()
    }

    /// The active descriptor, if a cycle has been prepared
    pub fn current_descriptor(&self) -> Option<IntentDescriptor> {
        self.lock_inner().descriptor.clone()
    }

    /// Fetch intent data and build a presentable handle.
    ///
    /// One network call, one handle. Ignored while a fetch or presentation is
    /// already in flight. Accepted from `Idle`, `Ready`, and every terminal
    /// state; any prior handle is discarded before the fetch begins.
    #[instrument(skip(self))]
    pub async fn prepare(&self) -> FlowResult<()> {
        let epoch = {
            let mut inner = self.lock_inner();
            if inner.state.is_busy() {
                debug!("prepare ignored: session is {}", inner.state);
                return Ok(());
            }
            inner.handle = None;
            inner.descriptor = None;
            inner.state = SessionState::Fetching;
            inner.epoch += 1;
            inner.epoch
        };

        self.run_fetch(epoch).await
    }

    /// Abort an in-flight fetch, returning the session to `Idle`.
    ///
    /// Only in-flight fetches are affected; a fetch that already resolved is
    /// never retro-canceled. Returns false when nothing was in flight.
    pub fn cancel_fetch(&self) -> bool {
        let mut inner = self.lock_inner();
        if inner.state != SessionState::Fetching {
            return false;
        }
        inner.epoch += 1;
        inner.state = SessionState::Idle;
        info!("In-flight fetch canceled");
        true
    }

    /// Present the combined payment sheet and resolve its outcome.
    ///
    /// Requires `Ready`; exactly one presentation per handle may be in flight.
    #[instrument(skip(self))]
    pub async fn present(&self) -> FlowResult<CompletionOutcome> {
        let handle = self.begin_presentation("present")?;
        let result = handle.present().await;
        Ok(self.finish_presentation(result).await)
    }

    /// Confirm a previously selected payment method (flow-controller variant).
    #[instrument(skip(self))]
    pub async fn confirm(&self) -> FlowResult<CompletionOutcome> {
        let handle = self.begin_presentation("confirm")?;
        let result = handle.confirm().await;
        Ok(self.finish_presentation(result).await)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("session state lock poisoned")
    }

    async fn run_fetch(&self, epoch: u64) -> FlowResult<()> {
        let descriptor = match self.client.fetch().await {
            Ok(descriptor) => descriptor,
            Err(e) => {
                {
                    let mut inner = self.lock_inner();
                    if inner.epoch != epoch {
                        debug!("Stale fetch result discarded");
                        return Ok(());
                    }
                    inner.state = SessionState::Failed;
                }
                error!("Intent fetch failed: {}", e);
                self.notify_fetch_failed(&e);
                return Err(e);
            }
        };

        {
            let inner = self.lock_inner();
            if inner.epoch != epoch {
                debug!("Stale fetch result discarded");
                return Ok(());
            }
        }

        let configuration = (self.config_builder)(&descriptor);
        let context = descriptor.client_context();

        match self
            .ui
            .build_handle(&descriptor, &configuration, &context)
            .await
        {
            Ok(handle) => {
                let mut inner = self.lock_inner();
                if inner.epoch != epoch {
                    debug!("Stale handle discarded");
                    return Ok(());
                }
                info!(
                    "Session ready: kind={}, cycle_id={}",
                    descriptor.kind, descriptor.cycle_id
                );
                inner.descriptor = Some(descriptor);
                inner.handle = Some(handle);
                inner.state = SessionState::Ready;
                Ok(())
            }
            Err(e) => {
                {
                    let mut inner = self.lock_inner();
                    if inner.epoch != epoch {
                        return Ok(());
                    }
                    inner.state = SessionState::Failed;
                }
                error!("Handle construction rejected: {}", e);
                self.notify_fetch_failed(&e);
                Err(e)
            }
        }
    }

    fn begin_presentation(
        &self,
        operation: &'static str,
    ) -> FlowResult<Arc<dyn PaymentUiHandle>> {
        let mut inner = self.lock_inner();
        if inner.state != SessionState::Ready {
            return Err(FlowError::InvalidState {
                operation,
                state: inner.state.to_string(),
            });
        }
        let handle = inner.handle.clone().ok_or(FlowError::InvalidState {
            operation,
            state: inner.state.to_string(),
        })?;
        inner.state = SessionState::Presenting;
        Ok(handle)
    }

    async fn finish_presentation(
        &self,
        result: FlowResult<CompletionOutcome>,
    ) -> CompletionOutcome {
        // Presentation-time failures are wrapped into a failed outcome and
        // surfaced exactly once, like any other outcome.
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => CompletionOutcome::failed(e.to_string()),
        };

        {
            let mut inner = self.lock_inner();
            match &outcome {
                CompletionOutcome::Completed => {
                    // The intent is spent; the handle must go before any renewal
                    inner.handle = None;
                    inner.descriptor = None;
                    inner.state = SessionState::Completed;
                }
                CompletionOutcome::Canceled => {
                    // Handle stays valid and reusable
                    inner.state = SessionState::Ready;
                }
                CompletionOutcome::Failed { .. } => {
                    inner.handle = None;
                    inner.descriptor = None;
                    inner.state = SessionState::Failed;
                }
            }
        }

        info!("Presentation resolved: {}", outcome);
        self.dispatch(&outcome);

        if outcome.is_completed() && self.options.auto_renew_after_success {
            debug!("Auto-renewing after completed presentation");
            if let Err(e) = self.prepare().await {
                // Renewal failure is a fetch failure for the *next* cycle; the
                // completed outcome above already stands.
                error!("Auto-renew fetch failed: {}", e);
            }
        }

        outcome
    }

    fn dispatch(&self, outcome: &CompletionOutcome) {
        let observers = self
            .observers
            .lock()
            .expect("observer lock poisoned")
            .clone();
        for observer in &observers {
            dispatch_outcome(observer.as_ref(), outcome);
        }
    }

    fn notify_fetch_failed(&self, error: &FlowError) {
        let observers = self
            .observers
            .lock()
            .expect("observer lock poisoned")
            .clone();
        for observer in &observers {
            observer.on_fetch_failed(error);
        }
    }
}
