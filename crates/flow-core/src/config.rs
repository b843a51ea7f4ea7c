//! # UI Configuration
//!
//! Presentation options for a payment UI handle. Constructed fresh per fetch
//! cycle and never mutated after the handle is built from it.

use serde::{Deserialize, Serialize};

/// Payment-method list layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStyle {
    /// Let the UI pick based on available space
    Automatic,
    /// Carousel of payment methods
    Horizontal,
    /// Stacked list of payment methods
    Vertical,
}

impl Default for LayoutStyle {
    fn default() -> Self {
        LayoutStyle::Automatic
    }
}

/// Wallet (Apple Pay / platform pay) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Platform merchant identifier (e.g., "merchant.com.example")
    pub merchant_id: String,

    /// Two-letter merchant country code
    pub merchant_country: String,
}

/// Default billing details prefilled into the payment UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl BillingDetails {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.country.is_none()
    }
}

/// Value object describing how a payment UI should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfiguration {
    /// Name shown in the payment UI header
    pub merchant_display_name: String,

    /// URL the UI returns to after redirect-based payment methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,

    /// Wallet settings, when wallet payments are enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletConfig>,

    /// Payment-method list layout
    #[serde(default)]
    pub layout: LayoutStyle,

    /// Allow payment methods that settle after the session ends (e.g., bank debits)
    #[serde(default)]
    pub allows_delayed_payment_methods: bool,

    /// Billing details prefilled into the UI
    #[serde(default, skip_serializing_if = "BillingDetails::is_empty")]
    pub default_billing_details: BillingDetails,
}

impl UiConfiguration {
    /// Create a configuration with required fields and defaults
    pub fn new(merchant_display_name: impl Into<String>) -> Self {
        Self {
            merchant_display_name: merchant_display_name.into(),
            return_url: None,
            wallet: None,
            layout: LayoutStyle::Automatic,
            allows_delayed_payment_methods: false,
            default_billing_details: BillingDetails::default(),
        }
    }

    /// Set the redirect return URL
    pub fn with_return_url(mut self, url: impl Into<String>) -> Self {
        self.return_url = Some(url.into());
        self
    }

    /// Enable wallet payments
    pub fn with_wallet(
        mut self,
        merchant_id: impl Into<String>,
        merchant_country: impl Into<String>,
    ) -> Self {
        self.wallet = Some(WalletConfig {
            merchant_id: merchant_id.into(),
            merchant_country: merchant_country.into(),
        });
        self
    }

    /// Set the payment-method list layout
    pub fn with_layout(mut self, layout: LayoutStyle) -> Self {
        self.layout = layout;
        self
    }

    /// Allow delayed payment methods
    pub fn with_delayed_payment_methods(mut self, allowed: bool) -> Self {
        self.allows_delayed_payment_methods = allowed;
        self
    }

    /// Set default billing details
    pub fn with_billing_details(mut self, details: BillingDetails) -> Self {
        self.default_billing_details = details;
        self
    }
}
