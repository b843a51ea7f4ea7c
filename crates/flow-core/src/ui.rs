//! # Payment UI Seam
//!
//! Trait boundary to the external payment-UI SDK. The orchestrator never talks
//! to a concrete SDK; it builds handles through `PaymentUi` and drives them
//! through `PaymentUiHandle`.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                PaymentUi (trait)             │
//! │  └── build_handle(descriptor, config, ctx)   │
//! └──────────────────────────────────────────────┘
//!                        │ returns
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │             PaymentUiHandle (trait)          │
//! │  ├── present()   combined sheet flow         │
//! │  └── confirm()   flow-controller variant     │
//! └──────────────────────────────────────────────┘
//! ```

use crate::config::UiConfiguration;
use crate::error::FlowResult;
use crate::intent::{ClientContext, IntentDescriptor, IntentKind};
use crate::outcome::CompletionOutcome;
use async_trait::async_trait;
use std::sync::Arc;

/// An opaque, SDK-owned payment UI bound to exactly one intent.
///
/// The orchestrator owns the handle exclusively until presentation; ownership
/// of the presentation lifecycle passes transiently to the UI layer while
/// `present` or `confirm` is in flight.
#[async_trait]
pub trait PaymentUiHandle: Send + Sync {
    /// Present the combined payment sheet and resolve its outcome.
    async fn present(&self) -> FlowResult<CompletionOutcome>;

    /// Confirm a previously selected payment method (flow-controller variant).
    async fn confirm(&self) -> FlowResult<CompletionOutcome>;

    /// The client secret this handle was built from.
    fn client_secret(&self) -> &str;

    /// The intent kind this handle was built from.
    fn intent_kind(&self) -> IntentKind;
}

/// Factory seam for the external payment-UI SDK.
///
/// Implementations construct a presentable handle from one descriptor and one
/// configuration. The publishable key comes in through `ClientContext` so no
/// process-wide credential state is involved.
#[async_trait]
pub trait PaymentUi: Send + Sync {
    /// Build a handle bound to the descriptor's intent.
    ///
    /// Returns `FlowError::SdkConfiguration` when the SDK rejects the
    /// descriptor/configuration pair.
    async fn build_handle(
        &self,
        descriptor: &IntentDescriptor,
        configuration: &UiConfiguration,
        context: &ClientContext,
    ) -> FlowResult<Arc<dyn PaymentUiHandle>>;

    /// Provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment UI (dynamic dispatch)
pub type BoxedPaymentUi = Arc<dyn PaymentUi>;
