//! # flow-backend
//!
//! Demo-backend plumbing for intent-flow:
//!
//! 1. **IntentClient** - one HTTP POST per fetch against a remote intent
//!    endpoint, validated into an `IntentDescriptor`
//! 2. **PlaygroundSettings** - persisted configuration blob with base64
//!    deep-link transport
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flow_backend::{EndpointConfig, IntentClient};
//!
//! let config = EndpointConfig::new("https://example.com/checkout")
//!     .with_request_body(serde_json::json!({ "customer_type": "new" }))
//!     .with_customer_bearing(true);
//!
//! let client = IntentClient::new(config)?;
//! let descriptor = client.fetch().await?;
//! ```

pub mod client;
pub mod settings;

// Re-exports
pub use client::{EndpointConfig, IntentClient, IntentEnvelope, DEFAULT_FETCH_TIMEOUT_SECS};
pub use settings::{CustomerMode, IntegrationKind, PlaygroundSettings};
