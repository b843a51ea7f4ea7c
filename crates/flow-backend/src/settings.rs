//! # Playground Settings
//!
//! Persisted key-value configuration blob for the playground demo. Settings
//! round-trip through an opaque base64 encoding so they can travel inside
//! deep-link URL query parameters.

use base64::{engine::general_purpose, Engine as _};
use flow_core::{BillingDetails, FlowError, FlowResult, LayoutStyle, UiConfiguration};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which integration surface the playground exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationKind {
    /// Single combined present-and-confirm sheet
    PaymentSheet,
    /// Decoupled select-then-confirm flow controller
    FlowController,
}

impl Default for IntegrationKind {
    fn default() -> Self {
        IntegrationKind::PaymentSheet
    }
}

/// How the demo backend should scope the intent to a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerMode {
    /// No customer attached
    Guest,
    /// Backend creates a fresh customer
    New,
    /// Backend reuses its stored test customer
    Returning,
}

impl Default for CustomerMode {
    fn default() -> Self {
        CustomerMode::Guest
    }
}

/// Playground configuration knobs, persisted locally and encodable for
/// deep-link transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundSettings {
    pub integration_kind: IntegrationKind,
    pub customer_mode: CustomerMode,
    pub layout: LayoutStyle,
    pub merchant_display_name: String,
    pub return_url: Option<String>,
    pub apple_pay_merchant_id: Option<String>,
    pub apple_pay_merchant_country: String,
    pub allows_delayed_payment_methods: bool,
    pub auto_renew_after_success: bool,
    pub default_billing: BillingDetails,
    /// Overrides the env-configured endpoint when set
    pub endpoint_url: Option<String>,
}

impl Default for PlaygroundSettings {
    fn default() -> Self {
        Self {
            integration_kind: IntegrationKind::PaymentSheet,
            customer_mode: CustomerMode::Guest,
            layout: LayoutStyle::Automatic,
            merchant_display_name: "Example, Inc.".to_string(),
            return_url: Some("intent-flow://checkout-return".to_string()),
            apple_pay_merchant_id: None,
            apple_pay_merchant_country: "US".to_string(),
            allows_delayed_payment_methods: false,
            auto_renew_after_success: false,
            default_billing: BillingDetails::default(),
            endpoint_url: None,
        }
    }
}

impl PlaygroundSettings {
    /// Derive the UI configuration these settings describe.
    ///
    /// This is the configuration-builder the playground demo hands to the
    /// orchestrator; each settings change produces a fresh configuration.
    pub fn ui_configuration(&self) -> UiConfiguration {
        let mut config = UiConfiguration::new(&self.merchant_display_name)
            .with_layout(self.layout)
            .with_delayed_payment_methods(self.allows_delayed_payment_methods)
            .with_billing_details(self.default_billing.clone());

        if let Some(ref url) = self.return_url {
            config = config.with_return_url(url);
        }

        if let Some(ref merchant_id) = self.apple_pay_merchant_id {
            config = config.with_wallet(merchant_id, &self.apple_pay_merchant_country);
        }

        config
    }

    /// JSON request body the demo backend expects for these settings
    pub fn request_body(&self) -> Option<serde_json::Value> {
        match self.customer_mode {
            CustomerMode::Guest => None,
            CustomerMode::New => Some(serde_json::json!({ "customer_type": "new" })),
            CustomerMode::Returning => {
                Some(serde_json::json!({ "customer_type": "returning" }))
            }
        }
    }

    /// True when the backend must return customer + ephemeral key
    pub fn customer_bearing(&self) -> bool {
        !matches!(self.customer_mode, CustomerMode::Guest)
    }

    // -------------------------------------------------------------------------
    // Opaque transport encoding
    // -------------------------------------------------------------------------

    /// Encode as an opaque base64 blob (URL-safe, no padding)
    pub fn encode(&self) -> FlowResult<String> {
        let json = serde_json::to_vec(self).map_err(|e| FlowError::Serialization(e.to_string()))?;
        Ok(general_purpose::URL_SAFE_NO_PAD.encode(json))
    }

    /// Decode from an opaque base64 blob
    pub fn decode(blob: &str) -> FlowResult<Self> {
        let bytes = general_purpose::URL_SAFE_NO_PAD
            .decode(blob)
            .map_err(|e| FlowError::Serialization(format!("invalid settings blob: {}", e)))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| FlowError::Serialization(format!("invalid settings blob: {}", e)))
    }

    /// Render as a deep-link query parameter (`settings=<blob>`)
    pub fn to_query_param(&self) -> FlowResult<String> {
        Ok(format!("settings={}", self.encode()?))
    }

    /// Parse from a deep-link query string, looking for the `settings` key
    pub fn from_query(query: &str) -> FlowResult<Self> {
        let blob = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "settings")
            .map(|(_, value)| value)
            .ok_or_else(|| {
                FlowError::Serialization("no 'settings' query parameter".to_string())
            })?;
        Self::decode(blob)
    }

    // -------------------------------------------------------------------------
    // Local persistence
    // -------------------------------------------------------------------------

    /// Load settings from a JSON file, falling back to defaults when absent
    pub fn load(path: impl AsRef<Path>) -> FlowResult<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| FlowError::Serialization(format!("settings file: {}", e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "No settings file at {}, using defaults",
                    path.as_ref().display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(FlowError::Configuration(format!("settings file: {}", e))),
        }
    }

    /// Persist settings as a JSON file
    pub fn store(&self, path: impl AsRef<Path>) -> FlowResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| FlowError::Serialization(e.to_string()))?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| FlowError::Configuration(format!("settings file: {}", e)))
    }
}
