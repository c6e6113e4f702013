//! Scoped provider
//!
//! A [`ScopedProvider`] owns the adapter binding for one module instance. It
//! resolves on mount, runs the adapter's async bootstrap if it declares one,
//! and exposes the binding to descendants through [`AdapterScope`] handles.
//!
//! State machine:
//!
//! ```text
//! Pending ──► Resolved
//!    │  ├───► Failed
//!    │  └───► NoModules
//!    └──────► Unmounted ◄── (any state)
//! ```
//!
//! Only `Pending` may settle, and `Unmounted` is final. Every write goes
//! through [`transition`], so a bootstrap that completes after unmount cannot
//! change anything.

use crate::definition::{AdapterSystem, BootstrapFn};
use crate::error::{AdapterError, AdapterResult};
use crate::registry::AdapterRegistry;
use crate::resolver::{resolve, ResolvedBinding, Resolution};
use crate::scope::AdapterScope;
use govkit_types::{ModuleDescriptor, ModuleSelector};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Current state of a provider
pub enum ProviderState<S: AdapterSystem> {
    /// Waiting for the adapter bootstrap
    Pending,
    /// Capabilities and options are available
    Resolved(ResolvedBinding<S>),
    /// The DAO has no modules of this kind
    NoModules,
    /// Resolution or bootstrap failed
    Failed(AdapterError),
    /// Torn down; nothing further happens
    Unmounted,
}

impl<S: AdapterSystem> ProviderState<S> {
    pub fn phase(&self) -> ProviderPhase {
        match self {
            ProviderState::Pending => ProviderPhase::Pending,
            ProviderState::Resolved(_) => ProviderPhase::Resolved,
            ProviderState::NoModules => ProviderPhase::NoModules,
            ProviderState::Failed(_) => ProviderPhase::Failed,
            ProviderState::Unmounted => ProviderPhase::Unmounted,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ProviderState::Pending)
    }
}

impl<S: AdapterSystem> Clone for ProviderState<S> {
    fn clone(&self) -> Self {
        match self {
            ProviderState::Pending => ProviderState::Pending,
            ProviderState::Resolved(binding) => ProviderState::Resolved(binding.clone()),
            ProviderState::NoModules => ProviderState::NoModules,
            ProviderState::Failed(err) => ProviderState::Failed(err.clone()),
            ProviderState::Unmounted => ProviderState::Unmounted,
        }
    }
}

impl<S: AdapterSystem> fmt::Debug for ProviderState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderState::Resolved(binding) => f.debug_tuple("Resolved").field(binding).finish(),
            ProviderState::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
            other => write!(f, "{}", other.phase()),
        }
    }
}

/// State discriminant, for logging and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderPhase {
    Pending,
    Resolved,
    NoModules,
    Failed,
    Unmounted,
}

impl fmt::Display for ProviderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderPhase::Pending => "Pending",
            ProviderPhase::Resolved => "Resolved",
            ProviderPhase::NoModules => "NoModules",
            ProviderPhase::Failed => "Failed",
            ProviderPhase::Unmounted => "Unmounted",
        };
        f.write_str(name)
    }
}

/// Guarded state write. Returns whether the transition was applied.
pub(crate) fn transition<S: AdapterSystem>(
    cell: &watch::Sender<ProviderState<S>>,
    next: ProviderState<S>,
) -> bool {
    cell.send_if_modified(move |current| {
        let allowed = match &next {
            ProviderState::Unmounted => !matches!(current, ProviderState::Unmounted),
            ProviderState::Pending => false,
            _ => current.is_pending(),
        };
        if allowed {
            *current = next;
        }
        allowed
    })
}

pub struct ScopedProvider<S: AdapterSystem> {
    state: Arc<watch::Sender<ProviderState<S>>>,
    task: Option<JoinHandle<()>>,
    label: String,
}

impl<S: AdapterSystem> ScopedProvider<S> {
    /// Resolve an adapter for one module instance and start its bootstrap.
    ///
    /// Resolution happens synchronously. If the chosen adapter declares a
    /// bootstrap, it is spawned on the current Tokio runtime and the
    /// provider stays `Pending` until it finishes.
    pub fn mount(
        registry: &AdapterRegistry<S>,
        modules: &[ModuleDescriptor],
        selector: ModuleSelector,
        initial: S::InitialOptions,
    ) -> Self {
        let (tx, _rx) = watch::channel(ProviderState::Pending);
        let mut provider = Self {
            state: Arc::new(tx),
            task: None,
            label: selector.to_string(),
        };

        match resolve(registry, modules, &selector) {
            Err(err) => provider.settle(ProviderState::Failed(err)),
            Ok(Resolution::NoModules) => provider.settle(ProviderState::NoModules),
            Ok(Resolution::Matched(matched)) => {
                provider.label = matched.module.address.clone();
                let binding = matched.bind(initial);
                match binding.definition().bootstrap().cloned() {
                    None => provider.settle(ProviderState::Resolved(binding)),
                    Some(bootstrap) => provider.spawn_bootstrap(bootstrap, binding),
                }
            }
        }

        provider
    }

    fn settle(&self, next: ProviderState<S>) {
        let phase = next.phase();
        if transition(&self.state, next) {
            tracing::debug!(system = S::NAME, module = %self.label, %phase, "Provider settled");
        }
    }

    fn spawn_bootstrap(&mut self, bootstrap: BootstrapFn<S>, binding: ResolvedBinding<S>) {
        let adapter = binding.adapter_id().to_string();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            self.settle(ProviderState::Failed(AdapterError::NoRuntime { adapter }));
            return;
        };

        tracing::debug!(system = S::NAME, module = %self.label, adapter = %adapter, "Bootstrapping adapter");

        let cell = Arc::downgrade(&self.state);
        let label = self.label.clone();
        let future = bootstrap(binding.options());

        self.task = Some(runtime.spawn(async move {
            let outcome = future.await;

            let Some(cell) = cell.upgrade() else {
                tracing::trace!(system = S::NAME, module = %label, "Provider gone before bootstrap finished");
                return;
            };

            let next = match outcome {
                Ok(()) => ProviderState::Resolved(binding),
                Err(err) => {
                    tracing::warn!(
                        system = S::NAME,
                        module = %label,
                        adapter = %adapter,
                        error = %err,
                        "Adapter bootstrap failed"
                    );
                    ProviderState::Failed(AdapterError::Bootstrap {
                        adapter,
                        message: format!("{:#}", err),
                    })
                }
            };

            let phase = next.phase();
            if transition(&cell, next) {
                tracing::debug!(system = S::NAME, module = %label, %phase, "Provider settled");
            } else {
                tracing::trace!(system = S::NAME, module = %label, "Discarded bootstrap result");
            }
        }));
    }

    pub fn state(&self) -> ProviderState<S> {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> ProviderPhase {
        self.state.borrow().phase()
    }

    pub fn error(&self) -> Option<AdapterError> {
        match &*self.state.borrow() {
            ProviderState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Module address (or selector, before a module was chosen)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Handle for descendants to read the binding through
    pub fn scope(&self) -> AdapterScope<S> {
        AdapterScope::attached(self.state.subscribe())
    }

    /// Wait until the provider leaves `Pending`
    pub async fn ready(&self) -> ProviderPhase {
        let mut rx = self.state.subscribe();
        let phase = match rx.wait_for(|state| !state.is_pending()).await {
            Ok(state) => state.phase(),
            Err(_) => self.phase(),
        };
        phase
    }

    /// Render this provider's subtree.
    ///
    /// `fallback` is shown while pending and `ready` once resolved. A DAO
    /// without modules of this kind renders nothing (`Ok(None)`). Failures
    /// are returned for the enclosing boundary to display.
    pub fn render<R>(
        &self,
        fallback: impl FnOnce() -> R,
        ready: impl FnOnce(&AdapterScope<S>) -> R,
    ) -> AdapterResult<Option<R>> {
        let state = self.state();
        match state {
            ProviderState::Pending => Ok(Some(fallback())),
            ProviderState::Resolved(_) => Ok(Some(ready(&self.scope()))),
            ProviderState::NoModules => Ok(None),
            ProviderState::Failed(err) => Err(err),
            ProviderState::Unmounted => Err(AdapterError::MissingProviderContext { system: S::NAME }),
        }
    }

    /// Tear down. Any in-flight bootstrap is cancelled and its result dropped.
    pub fn unmount(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if transition(&self.state, ProviderState::Unmounted) {
            tracing::debug!(system = S::NAME, module = %self.label, "Provider unmounted");
        }
    }
}

impl<S: AdapterSystem> Drop for ScopedProvider<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<S: AdapterSystem> fmt::Debug for ScopedProvider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedProvider")
            .field("system", &S::NAME)
            .field("module", &self.label)
            .field("state", &*self.state.borrow())
            .finish()
    }
}
