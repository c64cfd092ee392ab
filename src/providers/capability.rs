/*!
 * Lazily probed provider handle.
 *
 * A `Capability` starts out `Unknown` (or `Unavailable` when the provider could not
 * even be constructed). The first caller probes the provider with
 * `test_connection`; the outcome is remembered so later callers either use the
 * provider directly or skip it without touching the network.
 */

use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::app_config::ProviderConfig;
use crate::providers::{build_provider, Provider};

/// Availability of a capability
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityState {
    /// Not probed yet
    Unknown,
    /// Probed (or declared) usable
    Available,
    /// Unusable, with the reason
    Unavailable(String),
}

/// A text-generation provider together with its availability state
#[derive(Debug)]
pub struct Capability {
    provider: Option<Arc<dyn Provider>>,
    state: RwLock<CapabilityState>,
}

impl Capability {
    /// Wrap a provider that gets probed on first use
    pub fn lazy(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider: Some(provider),
            state: RwLock::new(CapabilityState::Unknown),
        }
    }

    /// Wrap a provider that is known to be usable
    pub fn ready(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider: Some(provider),
            state: RwLock::new(CapabilityState::Available),
        }
    }

    /// A capability that can never be used
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            provider: None,
            state: RwLock::new(CapabilityState::Unavailable(reason.into())),
        }
    }

    /// Build the provider described by `config`; construction failures yield an unavailable handle
    pub fn from_config(config: &ProviderConfig) -> Self {
        match build_provider(config) {
            Ok(provider) => Self::lazy(provider),
            Err(e) => {
                warn!("{} provider disabled: {}", config.provider_type, e);
                Self::unavailable(e.to_string())
            }
        }
    }

    /// Current state without probing
    pub fn state(&self) -> CapabilityState {
        self.state.read().clone()
    }

    /// Return the provider if it is usable, probing it the first time
    pub async fn acquire(&self) -> Option<Arc<dyn Provider>> {
        let provider = self.provider.clone()?;

        match self.state() {
            CapabilityState::Available => return Some(provider),
            CapabilityState::Unavailable(_) => return None,
            CapabilityState::Unknown => {}
        }

        // Concurrent first callers may both probe; the outcome is the same
        let outcome = provider.test_connection().await;
        let mut state = self.state.write();
        match outcome {
            Ok(()) => {
                debug!("{} provider is available", provider.name());
                *state = CapabilityState::Available;
                Some(provider)
            }
            Err(e) => {
                warn!("{} provider unavailable, falling back: {}", provider.name(), e);
                *state = CapabilityState::Unavailable(e.to_string());
                None
            }
        }
    }
}
