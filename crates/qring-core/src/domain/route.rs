//! Landing-screen decision and the startup state machine.
//!
//! # Startup flow
//!
//! ```text
//!            load() completes
//! Loading ──────────────────────►  NeedsConfig   (no usable record)
//!            │
//!            └─────────────────►  Ready         (contact + full address)
//! ```
//!
//! Both terminal states hand over to ordinary screen navigation.  There is no
//! way back to `Loading`: later edits navigate directly.
//!
//! # Readiness policy
//!
//! A record is `Ready` only with a contact number **and** a complete address
//! (street and house number).  The label is a doorbell label, so one without
//! an address is not considered finished.

use thiserror::Error;

use super::record::ConfigRecord;

/// Screen the user lands on after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitialRoute {
    /// Configuration screen: something required is missing.
    NeedsConfig,
    /// Home screen showing the label.
    Ready,
}

impl InitialRoute {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NeedsConfig => "needs-config",
            Self::Ready => "ready",
        }
    }
}

/// Single decision point for the landing screen.
pub fn decide_initial_route(record: Option<&ConfigRecord>) -> InitialRoute {
    let Some(record) = record else {
        return InitialRoute::NeedsConfig;
    };

    if record.contact().is_none() {
        return InitialRoute::NeedsConfig;
    }

    match record.address.as_ref() {
        Some(address) if address.is_complete() => InitialRoute::Ready,
        _ => InitialRoute::NeedsConfig,
    }
}

/// Errors raised by [`StartupFlow`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupError {
    /// The flow already left `Loading`.
    #[error("startup already resolved to {0:?}")]
    AlreadyResolved(InitialRoute),
}

/// State of the startup flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Loading,
    Resolved(InitialRoute),
}

/// One-shot `Loading → {NeedsConfig, Ready}` state machine.
#[derive(Debug)]
pub struct StartupFlow {
    state: LaunchState,
}

impl Default for StartupFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl StartupFlow {
    pub fn new() -> Self {
        Self {
            state: LaunchState::Loading,
        }
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Returns the resolved route, or `None` while still loading.
    pub fn route(&self) -> Option<InitialRoute> {
        match self.state {
            LaunchState::Loading => None,
            LaunchState::Resolved(route) => Some(route),
        }
    }

    /// Fires the transition out of `Loading` with the loaded record.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::AlreadyResolved`] if called a second time; the
    /// original route is kept.
    pub fn resolve(&mut self, loaded: Option<&ConfigRecord>) -> Result<InitialRoute, StartupError> {
        if let LaunchState::Resolved(route) = self.state {
            return Err(StartupError::AlreadyResolved(route));
        }
        let route = decide_initial_route(loaded);
        tracing::debug!(route = route.as_str(), "startup resolved");
        self.state = LaunchState::Resolved(route);
        Ok(route)
    }
}
