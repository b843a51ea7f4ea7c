//! # intent-flow-demo
//!
//! Drives one checkout session cycle against a configured intent endpoint,
//! using a simulated payment UI that logs and immediately completes.
//!
//! ## Usage
//!
//! ```bash
//! # Point at a demo backend returning intent JSON
//! export INTENT_ENDPOINT_URL=https://example.com/checkout
//!
//! # Optionally load persisted playground settings
//! intent-flow-demo [settings.json]
//! ```

use anyhow::Context;
use async_trait::async_trait;
use flow_backend::{EndpointConfig, IntentClient, PlaygroundSettings};
use flow_core::{
    ClientContext, CompletionOutcome, FlowResult, IntentDescriptor, IntentKind, PaymentUi,
    PaymentUiHandle, UiConfiguration,
};
use flow_orchestrator::{
    config_builder, CheckoutOrchestrator, LoggingObserver, OrchestratorOptions,
};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    // Playground settings: file path arg, or defaults
    let settings = match std::env::args().nth(1) {
        Some(path) => PlaygroundSettings::load(&path)
            .with_context(|| format!("loading settings from {}", path))?,
        None => PlaygroundSettings::default(),
    };

    info!("Integration: {:?}", settings.integration_kind);
    info!("Customer mode: {:?}", settings.customer_mode);
    info!(
        "Settings deep-link: intent-flow://playground?{}",
        settings.to_query_param()?
    );

    // Endpoint: settings override, else environment
    let mut endpoint = match settings.endpoint_url {
        Some(ref url) => EndpointConfig::new(url),
        None => EndpointConfig::from_env()?,
    };
    endpoint = endpoint.with_customer_bearing(settings.customer_bearing());
    if let Some(body) = settings.request_body() {
        endpoint = endpoint.with_request_body(body);
    }

    info!("Intent endpoint: {}", endpoint.url);

    let client = IntentClient::new(endpoint)?;
    let ui_config = settings.ui_configuration();
    let orchestrator = CheckoutOrchestrator::new(
        client,
        Arc::new(ConsoleUi),
        config_builder(move |_descriptor: &IntentDescriptor| ui_config.clone()),
        OrchestratorOptions {
            auto_renew_after_success: settings.auto_renew_after_success,
        },
    );
    orchestrator.register_observer(Arc::new(LoggingObserver));

    // One full cycle: fetch, build, present
    orchestrator.prepare().await?;

    let descriptor = orchestrator
        .current_descriptor()
        .context("no descriptor after prepare")?;
    info!(
        "Session ready: kind={}, cycle_id={}, amount={:?}",
        descriptor.kind, descriptor.cycle_id, descriptor.amount
    );

    let outcome = orchestrator.present().await?;
    info!("Checkout finished: {}", outcome);

    if settings.auto_renew_after_success && outcome.is_completed() {
        info!(
            "Auto-renew prepared the next cycle: state={}",
            orchestrator.state()
        );
    }

    Ok(())
}

/// Payment UI stand-in that logs what a real sheet would show and completes.
struct ConsoleUi;

#[async_trait]
impl PaymentUi for ConsoleUi {
    async fn build_handle(
        &self,
        descriptor: &IntentDescriptor,
        configuration: &UiConfiguration,
        context: &ClientContext,
    ) -> FlowResult<Arc<dyn PaymentUiHandle>> {
        info!(
            "Building sheet: merchant={}, layout={:?}, key={}",
            configuration.merchant_display_name, configuration.layout, context.publishable_key
        );
        Ok(Arc::new(ConsoleHandle {
            secret: descriptor.client_secret.clone(),
            kind: descriptor.kind,
        }))
    }

    fn provider_name(&self) -> &'static str {
        "console"
    }
}

struct ConsoleHandle {
    secret: String,
    kind: IntentKind,
}

#[async_trait]
impl PaymentUiHandle for ConsoleHandle {
    async fn present(&self) -> FlowResult<CompletionOutcome> {
        info!("Presenting sheet for {} intent", self.kind);
        Ok(CompletionOutcome::Completed)
    }

    async fn confirm(&self) -> FlowResult<CompletionOutcome> {
        info!("Confirming {} intent", self.kind);
        Ok(CompletionOutcome::Completed)
    }

    fn client_secret(&self) -> &str {
        &self.secret
    }

    fn intent_kind(&self) -> IntentKind {
        self.kind
    }
}

fn print_banner() {
    println!(
        r#"
  intent-flow-rs
  ━━━━━━━━━━━━━━━━━━━━━━━
  Checkout session orchestrator demo
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
