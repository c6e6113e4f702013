//! Scoped accessors
//!
//! An [`AdapterScope`] is the handle a provider passes down to the code that
//! renders inside it. Descendants read the resolved capability set or the
//! options context through it. Both reads fail with
//! [`AdapterError::MissingProviderContext`] unless the provider behind the
//! scope is `Resolved`; there is no default binding to fall back to.

use crate::definition::AdapterSystem;
use crate::error::{AdapterError, AdapterResult};
use crate::provider::ProviderState;
use crate::resolver::ResolvedBinding;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

pub struct AdapterScope<S: AdapterSystem> {
    state: Option<watch::Receiver<ProviderState<S>>>,
}

impl<S: AdapterSystem> AdapterScope<S> {
    pub(crate) fn attached(state: watch::Receiver<ProviderState<S>>) -> Self {
        Self { state: Some(state) }
    }

    /// A scope with no provider behind it
    pub fn detached() -> Self {
        Self { state: None }
    }

    /// Capability set and options, read together
    pub fn binding(&self) -> AdapterResult<ResolvedBinding<S>> {
        if let Some(state) = &self.state {
            if let ProviderState::Resolved(binding) = &*state.borrow() {
                return Ok(binding.clone());
            }
        }
        tracing::error!(system = S::NAME, "Adapter accessed outside a resolved provider");
        Err(AdapterError::MissingProviderContext { system: S::NAME })
    }

    /// The resolved capability set
    pub fn capabilities(&self) -> AdapterResult<Arc<S::Capabilities>> {
        self.binding().map(|binding| binding.capabilities())
    }

    /// The resolved options context
    pub fn options(&self) -> AdapterResult<Arc<S::Options>> {
        self.binding().map(|binding| binding.options())
    }

    pub fn is_resolved(&self) -> bool {
        self.state
            .as_ref()
            .map(|state| matches!(&*state.borrow(), ProviderState::Resolved(_)))
            .unwrap_or(false)
    }
}

impl<S: AdapterSystem> Clone for AdapterScope<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<S: AdapterSystem> Default for AdapterScope<S> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<S: AdapterSystem> fmt::Debug for AdapterScope<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Some(state) => write!(f, "AdapterScope({})", state.borrow().phase()),
            None => f.write_str("AdapterScope(detached)"),
        }
    }
}
