//! # flow-orchestrator
//!
//! The checkout session state machine for intent-flow.
//!
//! One `CheckoutOrchestrator` drives one preparation-to-completion cycle at a
//! time: fetch an intent descriptor from the remote endpoint, build a payment
//! UI handle, present it, and observe the outcome.
//!
//! ```rust,ignore
//! use flow_orchestrator::{CheckoutOrchestrator, OrchestratorOptions, static_config};
//! use flow_backend::{EndpointConfig, IntentClient};
//! use flow_core::UiConfiguration;
//!
//! let client = IntentClient::new(EndpointConfig::new("https://example.com/checkout"))?;
//! let orchestrator = CheckoutOrchestrator::new(
//!     client,
//!     payment_ui,
//!     static_config(UiConfiguration::new("Example, Inc.")),
//!     OrchestratorOptions::default(),
//! );
//!
//! orchestrator.prepare().await?;
//! let outcome = orchestrator.present().await?;
//! ```

pub mod builder;
pub mod observer;
pub mod orchestrator;

// Re-exports
pub use builder::{config_builder, static_config, ConfigBuilder};
pub use observer::{dispatch_outcome, LoggingObserver, OutcomeObserver};
pub use orchestrator::{CheckoutOrchestrator, OrchestratorOptions};
