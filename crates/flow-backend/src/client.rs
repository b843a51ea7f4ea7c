//! # Intent Endpoint Client
//!
//! One HTTP POST per fetch against a configured remote endpoint, returning a
//! validated `IntentDescriptor`. The endpoint responds with a JSON object of
//! string-valued keys: `customer`, `ephemeralKey`, `paymentIntent` (or
//! `setupIntent` / `clientSecret`), `publishableKey`, and optionally a numeric
//! `amount`. Any missing required key is a parse failure.

use flow_core::{FlowError, FlowResult, IntentDescriptor, IntentKind};
use reqwest::Client;
use serde::Deserialize;
use std::env;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// Default bounded fetch timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Configuration for the remote intent endpoint
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Endpoint URL (POST target)
    pub url: String,

    /// Optional JSON request body (e.g., `{"customer_type": "new"}`)
    pub request_body: Option<serde_json::Value>,

    /// Require `customer` + `ephemeralKey` in the response
    pub customer_bearing: bool,

    /// Bounded fetch timeout; expiry surfaces as `FlowError::FetchTimeout`
    pub timeout_secs: u64,

    /// Optional bearer token sent to the endpoint
    pub api_key: Option<String>,
}

impl EndpointConfig {
    /// Create a config with defaults for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_body: None,
            customer_bearing: false,
            timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            api_key: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `INTENT_ENDPOINT_URL`
    ///
    /// Optional:
    /// - `INTENT_ENDPOINT_API_KEY`
    /// - `INTENT_CUSTOMER_BEARING` ("true"/"false")
    /// - `INTENT_FETCH_TIMEOUT_SECS`
    pub fn from_env() -> FlowResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let url = env::var("INTENT_ENDPOINT_URL").map_err(|_| {
            FlowError::Configuration("INTENT_ENDPOINT_URL not set".to_string())
        })?;

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(FlowError::Configuration(
                "INTENT_ENDPOINT_URL must be an http(s) URL".to_string(),
            ));
        }

        let customer_bearing = env::var("INTENT_CUSTOMER_BEARING")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let timeout_secs = env::var("INTENT_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        Ok(Self {
            url,
            request_body: None,
            customer_bearing,
            timeout_secs,
            api_key: env::var("INTENT_ENDPOINT_API_KEY").ok(),
        })
    }

    /// Builder: set the JSON request body
    pub fn with_request_body(mut self, body: serde_json::Value) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Builder: require customer scoping in the response
    pub fn with_customer_bearing(mut self, required: bool) -> Self {
        self.customer_bearing = required;
        self
    }

    /// Builder: override the fetch timeout
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the remote intent endpoint.
///
/// Issues exactly one POST per `fetch()` call and validates the response into
/// an `IntentDescriptor`.
pub struct IntentClient {
    config: EndpointConfig,
    client: Client,
}

impl IntentClient {
    /// Create a client for the given endpoint configuration
    pub fn new(config: EndpointConfig) -> FlowResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FlowError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> FlowResult<Self> {
        Self::new(EndpointConfig::from_env()?)
    }

    /// The configured endpoint URL
    pub fn endpoint_url(&self) -> &str {
        &self.config.url
    }

    /// Fetch one intent descriptor from the endpoint.
    #[instrument(skip(self), fields(url = %self.config.url))]
    pub async fn fetch(&self) -> FlowResult<IntentDescriptor> {
        let idempotency_key = Uuid::new_v4().to_string();

        debug!(
            "Fetching intent: customer_bearing={}, body={}",
            self.config.customer_bearing,
            self.config.request_body.is_some()
        );

        let mut request = self
            .client
            .post(&self.config.url)
            .header("Idempotency-Key", &idempotency_key);

        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        if let Some(ref body) = self.config.request_body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FlowError::FetchTimeout {
                    seconds: self.config.timeout_secs,
                }
            } else {
                FlowError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FlowError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Intent endpoint error: status={}, body={}", status, body);
            return Err(FlowError::Network(format!("HTTP {}: {}", status, body)));
        }

        let envelope: IntentEnvelope = serde_json::from_str(&body).map_err(|e| {
            error!("Intent endpoint returned invalid JSON: {}", e);
            FlowError::MalformedResponse { field: "(body)" }
        })?;

        let descriptor = envelope.into_descriptor(self.config.customer_bearing)?;

        info!(
            "Fetched intent: kind={}, cycle_id={}, customer_bearing={}",
            descriptor.kind,
            descriptor.cycle_id,
            descriptor.is_customer_bearing()
        );

        Ok(descriptor)
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Raw response shape of the intent endpoint
#[derive(Debug, Default, Deserialize)]
pub struct IntentEnvelope {
    #[serde(default)]
    pub customer: Option<String>,

    #[serde(default, rename = "ephemeralKey")]
    pub ephemeral_key: Option<String>,

    #[serde(default, rename = "paymentIntent")]
    pub payment_intent: Option<String>,

    #[serde(default, rename = "setupIntent")]
    pub setup_intent: Option<String>,

    #[serde(default, rename = "clientSecret")]
    pub client_secret: Option<String>,

    #[serde(default, rename = "publishableKey")]
    pub publishable_key: Option<String>,

    #[serde(default)]
    pub amount: Option<i64>,
}

impl IntentEnvelope {
    /// Validate the envelope into a descriptor.
    ///
    /// The client secret comes from `paymentIntent`, `setupIntent`, or the
    /// bare `clientSecret` key, in that order of precedence. Missing required
    /// fields produce `FlowError::MalformedResponse` naming the field.
    pub fn into_descriptor(self, customer_bearing: bool) -> FlowResult<IntentDescriptor> {
        let (secret, kind) = if let Some(secret) = non_empty(self.payment_intent) {
            (secret, IntentKind::Payment)
        } else if let Some(secret) = non_empty(self.setup_intent) {
            (secret, IntentKind::Setup)
        } else if let Some(secret) = non_empty(self.client_secret) {
            (secret, IntentKind::Payment)
        } else {
            return Err(FlowError::MalformedResponse {
                field: "paymentIntent",
            });
        };

        let publishable_key = non_empty(self.publishable_key).ok_or(
            FlowError::MalformedResponse {
                field: "publishableKey",
            },
        )?;

        let mut descriptor = IntentDescriptor::new(secret, kind, publishable_key);

        if customer_bearing {
            let customer = non_empty(self.customer).ok_or(FlowError::MalformedResponse {
                field: "customer",
            })?;
            let ephemeral_key =
                non_empty(self.ephemeral_key).ok_or(FlowError::MalformedResponse {
                    field: "ephemeralKey",
                })?;
            descriptor = descriptor.with_customer(customer, ephemeral_key);
        } else if let (Some(customer), Some(ephemeral_key)) =
            (non_empty(self.customer), non_empty(self.ephemeral_key))
        {
            // Not required, but keep customer scoping when the endpoint sends it
            descriptor = descriptor.with_customer(customer, ephemeral_key);
        }

        if let Some(amount) = self.amount {
            descriptor = descriptor.with_amount(amount);
        }

        Ok(descriptor)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
