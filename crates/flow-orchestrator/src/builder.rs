//! # Configuration Builder Strategy
//!
//! One generic orchestrator serves every integration surface by taking the
//! per-surface customization as a configuration-builder function: given the
//! freshly fetched descriptor, produce the `UiConfiguration` for this cycle.

use flow_core::{IntentDescriptor, UiConfiguration};
use std::sync::Arc;

/// Builds a fresh `UiConfiguration` for each fetched descriptor
pub type ConfigBuilder = Arc<dyn Fn(&IntentDescriptor) -> UiConfiguration + Send + Sync>;

/// Wrap a closure as a `ConfigBuilder`
pub fn config_builder<F>(builder: F) -> ConfigBuilder
where
    F: Fn(&IntentDescriptor) -> UiConfiguration + Send + Sync + 'static,
{
    Arc::new(builder)
}

/// A builder that returns the same configuration for every cycle
pub fn static_config(configuration: UiConfiguration) -> ConfigBuilder {
    Arc::new(move |_| configuration.clone())
}
