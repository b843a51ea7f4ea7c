//! # Intent Types
//!
//! Remote-fetched intent descriptors and the per-instance client credential
//! context built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of server-side intent a descriptor points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// A payment intent (charges the customer)
    Payment,
    /// A setup intent (saves a payment method for later)
    Setup,
}

impl Default for IntentKind {
    fn default() -> Self {
        IntentKind::Payment
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntentKind::Payment => write!(f, "payment"),
            IntentKind::Setup => write!(f, "setup"),
        }
    }
}

/// Customer scoping for customer-bearing flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContext {
    /// Customer identifier (e.g., "cus_...")
    pub customer_id: String,

    /// Short-lived credential scoping access to this customer's payment methods
    pub ephemeral_key: String,
}

/// Remote-fetched payload identifying one payment or setup intent.
///
/// Immutable once fetched. Exactly one descriptor is active per orchestrator
/// instance; a descriptor must not be reused after a completed presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentDescriptor {
    /// Opaque client secret identifying the intent
    pub client_secret: String,

    /// Payment or setup intent
    #[serde(default)]
    pub kind: IntentKind,

    /// Customer id + ephemeral key, present for customer-bearing flows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerContext>,

    /// Publishable API key returned alongside the intent
    pub publishable_key: String,

    /// Intent amount in smallest currency unit, when the endpoint reports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Unique id for this preparation cycle
    pub cycle_id: Uuid,

    /// When the descriptor was fetched
    pub fetched_at: DateTime<Utc>,
}

impl IntentDescriptor {
    /// Create a descriptor with a fresh cycle id
    pub fn new(
        client_secret: impl Into<String>,
        kind: IntentKind,
        publishable_key: impl Into<String>,
    ) -> Self {
        Self {
            client_secret: client_secret.into(),
            kind,
            customer: None,
            publishable_key: publishable_key.into(),
            amount: None,
            cycle_id: Uuid::new_v4(),
            fetched_at: Utc::now(),
        }
    }

    /// Attach customer scoping
    pub fn with_customer(
        mut self,
        customer_id: impl Into<String>,
        ephemeral_key: impl Into<String>,
    ) -> Self {
        self.customer = Some(CustomerContext {
            customer_id: customer_id.into(),
            ephemeral_key: ephemeral_key.into(),
        });
        self
    }

    /// Set the reported amount
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// True for customer-bearing descriptors
    pub fn is_customer_bearing(&self) -> bool {
        self.customer.is_some()
    }

    /// Build the per-instance credential context for handle construction
    pub fn client_context(&self) -> ClientContext {
        ClientContext {
            publishable_key: self.publishable_key.clone(),
        }
    }
}

/// Per-instance API credential passed explicitly into handle construction.
///
/// Scoping the publishable key here (instead of a process-wide global) keeps
/// concurrent orchestrator instances from racing on shared credential state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    /// Publishable API key for this cycle
    pub publishable_key: String,
}
