//! End-to-end state machine tests against a mock intent endpoint and a
//! simulated payment UI.

use async_trait::async_trait;
use flow_backend::{EndpointConfig, IntentClient};
use flow_core::{
    ClientContext, CompletionOutcome, FlowError, FlowResult, IntentDescriptor, IntentKind,
    PaymentUi, PaymentUiHandle, SessionState, UiConfiguration,
};
use flow_orchestrator::{
    static_config, CheckoutOrchestrator, OrchestratorOptions, OutcomeObserver,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Simulated payment UI
// =============================================================================

/// Payment UI stand-in whose handles resolve scripted outcomes in order.
/// With no script, presentations complete successfully.
struct SimulatedUi {
    outcomes: Arc<Mutex<VecDeque<CompletionOutcome>>>,
    reject_build: bool,
    fail_presentation: bool,
}

impl SimulatedUi {
    fn completing() -> Self {
        Self::scripted(vec![])
    }

    fn scripted(outcomes: Vec<CompletionOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            reject_build: false,
            fail_presentation: false,
        }
    }

    fn rejecting_build() -> Self {
        Self {
            reject_build: true,
            ..Self::completing()
        }
    }

    fn failing_presentation() -> Self {
        Self {
            fail_presentation: true,
            ..Self::completing()
        }
    }
}

#[async_trait]
impl PaymentUi for SimulatedUi {
    async fn build_handle(
        &self,
        descriptor: &IntentDescriptor,
        _configuration: &UiConfiguration,
        context: &ClientContext,
    ) -> FlowResult<Arc<dyn PaymentUiHandle>> {
        if self.reject_build {
            return Err(FlowError::SdkConfiguration(
                "simulated rejection".to_string(),
            ));
        }
        assert_eq!(
            context.publishable_key, descriptor.publishable_key,
            "credential must be scoped per cycle"
        );
        Ok(Arc::new(SimulatedHandle {
            secret: descriptor.client_secret.clone(),
            kind: descriptor.kind,
            outcomes: self.outcomes.clone(),
            fail_presentation: self.fail_presentation,
        }))
    }

    fn provider_name(&self) -> &'static str {
        "simulated"
    }
}

struct SimulatedHandle {
    secret: String,
    kind: IntentKind,
    outcomes: Arc<Mutex<VecDeque<CompletionOutcome>>>,
    fail_presentation: bool,
}

impl SimulatedHandle {
    fn next_outcome(&self) -> FlowResult<CompletionOutcome> {
        if self.fail_presentation {
            return Err(FlowError::Presentation("view hierarchy gone".to_string()));
        }
        Ok(self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(CompletionOutcome::Completed))
    }
}

#[async_trait]
impl PaymentUiHandle for SimulatedHandle {
    async fn present(&self) -> FlowResult<CompletionOutcome> {
        self.next_outcome()
    }

    async fn confirm(&self) -> FlowResult<CompletionOutcome> {
        self.next_outcome()
    }

    fn client_secret(&self) -> &str {
        &self.secret
    }

    fn intent_kind(&self) -> IntentKind {
        self.kind
    }
}

// =============================================================================
// Recording observer
// =============================================================================

#[derive(Default)]
struct RecordingObserver {
    completed: AtomicUsize,
    canceled: AtomicUsize,
    failed: AtomicUsize,
    fetch_failures: AtomicUsize,
}

impl OutcomeObserver for RecordingObserver {
    fn on_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_canceled(&self) {
        self.canceled.fetch_add(1, Ordering::SeqCst);
    }

    fn on_failed(&self, _reason: &str) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_fetch_failed(&self, _error: &FlowError) {
        self.fetch_failures.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Harness
// =============================================================================

fn full_payload() -> serde_json::Value {
    serde_json::json!({
        "customer": "cus_1",
        "ephemeralKey": "ek_1",
        "paymentIntent": "pi_1_secret",
        "publishableKey": "pk_1"
    })
}

fn orchestrator_for(
    server: &MockServer,
    ui: SimulatedUi,
    options: OrchestratorOptions,
) -> CheckoutOrchestrator {
    let config = EndpointConfig::new(format!("{}/checkout", server.uri()));
    let client = IntentClient::new(config).unwrap();
    CheckoutOrchestrator::new(
        client,
        Arc::new(ui),
        static_config(UiConfiguration::new("Example, Inc.")),
        options,
    )
}

async fn mount_payload(server: &MockServer, payload: serde_json::Value) {
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(server)
        .await;
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn prepare_then_present_reaches_completed() {
    let server = MockServer::start().await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    );
    let observer = Arc::new(RecordingObserver::default());
    orchestrator.register_observer(observer.clone());

    assert_eq!(orchestrator.state(), SessionState::Idle);
    assert!(orchestrator.current_handle().is_none());

    orchestrator.prepare().await.unwrap();

    assert_eq!(orchestrator.state(), SessionState::Ready);
    let handle = orchestrator.current_handle().unwrap();
    assert_eq!(handle.client_secret(), "pi_1_secret");

    let outcome = orchestrator.present().await.unwrap();

    assert_eq!(outcome, CompletionOutcome::Completed);
    assert_eq!(orchestrator.state(), SessionState::Completed);
    assert!(orchestrator.current_handle().is_none());
    assert_eq!(observer.completed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_response_fails_without_handle() {
    let server = MockServer::start().await;
    mount_payload(&server, serde_json::json!({ "publishableKey": "pk_1" })).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    );
    let observer = Arc::new(RecordingObserver::default());
    orchestrator.register_observer(observer.clone());

    let err = orchestrator.prepare().await.unwrap_err();

    assert!(err.is_malformed_response());
    assert_eq!(orchestrator.state(), SessionState::Failed);
    assert!(orchestrator.current_handle().is_none());
    assert_eq!(observer.fetch_failures.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn prepare_accepted_again_after_failure() {
    let server = MockServer::start().await;

    // First call malformed, then valid
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "publishableKey": "pk_1" })),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    );

    assert!(orchestrator.prepare().await.is_err());
    assert_eq!(orchestrator.state(), SessionState::Failed);

    orchestrator.prepare().await.unwrap();
    assert_eq!(orchestrator.state(), SessionState::Ready);
}

#[tokio::test]
async fn auto_renew_begins_exactly_one_new_cycle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_payload()))
        .expect(2)
        .mount(&server)
        .await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions {
            auto_renew_after_success: true,
        },
    );

    orchestrator.prepare().await.unwrap();
    let first_handle = orchestrator.current_handle().unwrap();

    let outcome = orchestrator.present().await.unwrap();
    assert_eq!(outcome, CompletionOutcome::Completed);

    // Renewed cycle: fresh handle, prior one unreachable
    assert_eq!(orchestrator.state(), SessionState::Ready);
    let renewed = orchestrator.current_handle().unwrap();
    assert!(!Arc::ptr_eq(&first_handle, &renewed));

    server.verify().await;
}

#[tokio::test]
async fn canceled_presentation_keeps_handle_reusable() {
    let server = MockServer::start().await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::scripted(vec![CompletionOutcome::Canceled]),
        OrchestratorOptions::default(),
    );
    let observer = Arc::new(RecordingObserver::default());
    orchestrator.register_observer(observer.clone());

    orchestrator.prepare().await.unwrap();
    let handle = orchestrator.current_handle().unwrap();

    let outcome = orchestrator.present().await.unwrap();
    assert_eq!(outcome, CompletionOutcome::Canceled);

    assert_eq!(orchestrator.state(), SessionState::Ready);
    let kept = orchestrator.current_handle().unwrap();
    assert!(Arc::ptr_eq(&handle, &kept));
    assert_eq!(observer.canceled.load(Ordering::SeqCst), 1);

    // Same handle presents again, completing this time
    let outcome = orchestrator.present().await.unwrap();
    assert_eq!(outcome, CompletionOutcome::Completed);
}

#[tokio::test]
async fn failed_outcome_discards_handle() {
    let server = MockServer::start().await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::scripted(vec![CompletionOutcome::failed("card declined")]),
        OrchestratorOptions::default(),
    );
    let observer = Arc::new(RecordingObserver::default());
    orchestrator.register_observer(observer.clone());

    orchestrator.prepare().await.unwrap();
    let outcome = orchestrator.present().await.unwrap();

    assert_eq!(outcome, CompletionOutcome::failed("card declined"));
    assert_eq!(orchestrator.state(), SessionState::Failed);
    assert!(orchestrator.current_handle().is_none());
    assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn presentation_error_is_wrapped_into_failed_outcome() {
    let server = MockServer::start().await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::failing_presentation(),
        OrchestratorOptions::default(),
    );
    let observer = Arc::new(RecordingObserver::default());
    orchestrator.register_observer(observer.clone());

    orchestrator.prepare().await.unwrap();
    let outcome = orchestrator.present().await.unwrap();

    match outcome {
        CompletionOutcome::Failed { reason } => assert!(reason.contains("view hierarchy gone")),
        other => panic!("expected failed outcome, got {:?}", other),
    }
    assert_eq!(orchestrator.state(), SessionState::Failed);
    assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn overlapping_prepare_issues_single_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(full_payload())
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = Arc::new(orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    ));

    let (first, second) = tokio::join!(orchestrator.prepare(), orchestrator.prepare());
    first.unwrap();
    second.unwrap();

    assert_eq!(orchestrator.state(), SessionState::Ready);
    assert!(orchestrator.current_handle().is_some());

    server.verify().await;
}

#[tokio::test]
async fn cancel_fetch_discards_inflight_result() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(full_payload())
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let orchestrator = Arc::new(orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    ));

    let task = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.prepare().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(orchestrator.state(), SessionState::Fetching);
    assert!(orchestrator.cancel_fetch());
    assert_eq!(orchestrator.state(), SessionState::Idle);

    // Stale result is discarded when the fetch eventually resolves
    task.await.unwrap().unwrap();
    assert_eq!(orchestrator.state(), SessionState::Idle);
    assert!(orchestrator.current_handle().is_none());
}

#[tokio::test]
async fn cancel_fetch_is_noop_when_idle_or_ready() {
    let server = MockServer::start().await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    );

    assert!(!orchestrator.cancel_fetch());

    orchestrator.prepare().await.unwrap();
    assert!(!orchestrator.cancel_fetch());
    assert_eq!(orchestrator.state(), SessionState::Ready);
}

#[tokio::test]
async fn present_requires_ready_state() {
    let server = MockServer::start().await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    );

    let err = orchestrator.present().await.unwrap_err();
    assert!(matches!(
        err,
        FlowError::InvalidState {
            operation: "present",
            ..
        }
    ));
}

#[tokio::test]
async fn sdk_rejection_surfaces_as_configuration_error() {
    let server = MockServer::start().await;
    mount_payload(&server, full_payload()).await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::rejecting_build(),
        OrchestratorOptions::default(),
    );

    let err = orchestrator.prepare().await.unwrap_err();
    assert!(matches!(err, FlowError::SdkConfiguration(_)));
    assert_eq!(orchestrator.state(), SessionState::Failed);
    assert!(orchestrator.current_handle().is_none());
}

#[tokio::test]
async fn confirm_drives_flow_controller_variant() {
    let server = MockServer::start().await;
    mount_payload(
        &server,
        serde_json::json!({
            "setupIntent": "seti_1_secret",
            "publishableKey": "pk_1"
        }),
    )
    .await;

    let orchestrator = orchestrator_for(
        &server,
        SimulatedUi::completing(),
        OrchestratorOptions::default(),
    );

    orchestrator.prepare().await.unwrap();
    let handle = orchestrator.current_handle().unwrap();
    assert_eq!(handle.intent_kind(), IntentKind::Setup);

    let outcome = orchestrator.confirm().await.unwrap();
    assert_eq!(outcome, CompletionOutcome::Completed);
}
