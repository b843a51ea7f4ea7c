//! # flow-core
//!
//! Core types and traits for the intent-flow checkout orchestrator.
//!
//! This crate provides:
//! - `IntentDescriptor` and `ClientContext` for remote-fetched intent data
//! - `UiConfiguration` for payment UI presentation options
//! - `PaymentUi` / `PaymentUiHandle` traits at the SDK seam
//! - `SessionState` and `CompletionOutcome` for the session lifecycle
//! - `FlowError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use flow_core::{IntentDescriptor, IntentKind, UiConfiguration, PaymentUi};
//!
//! // Descriptor comes back from the intent endpoint
//! let descriptor = IntentDescriptor::new("pi_1_secret", IntentKind::Payment, "pk_1")
//!     .with_customer("cus_1", "ek_1");
//!
//! // Configuration is built fresh per fetch
//! let config = UiConfiguration::new("Example, Inc.")
//!     .with_return_url("example://checkout-return");
//!
//! // The SDK seam turns both into a presentable handle
//! let handle = ui.build_handle(&descriptor, &config, &descriptor.client_context()).await?;
//! let outcome = handle.present().await?;
//! ```

pub mod config;
pub mod error;
pub mod intent;
pub mod outcome;
pub mod ui;

// Re-exports for convenience
pub use config::{BillingDetails, LayoutStyle, UiConfiguration, WalletConfig};
pub use error::{FlowError, FlowResult};
pub use intent::{ClientContext, CustomerContext, IntentDescriptor, IntentKind};
pub use outcome::{CompletionOutcome, SessionState};
pub use ui::{BoxedPaymentUi, PaymentUi, PaymentUiHandle};
