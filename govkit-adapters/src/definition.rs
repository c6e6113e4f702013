//! Adapter systems and adapter definitions
//!
//! An [`AdapterSystem`] fixes the shape shared by every adapter of one kind
//! (proposal modules, voting modules): the capability interface, the options
//! a caller passes when mounting a provider, and the options context the
//! capabilities see. An [`AdapterDefinition`] is one implementation of that
//! shape, selected by matching contract ids.

use crate::matcher::ContractMatcher;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use govkit_types::{ContractId, ModuleDescriptor};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A family of interchangeable adapters
pub trait AdapterSystem: Send + Sync + 'static {
    /// Name used in logs and errors (e.g. "proposal")
    const NAME: &'static str;

    /// Capability interface every adapter of this system implements,
    /// typically a trait object
    type Capabilities: ?Sized + Send + Sync + 'static;

    /// Instance configuration supplied by the caller that mounts a provider
    type InitialOptions: Send + 'static;

    /// Options context handed to capabilities once a module is selected
    type Options: Send + Sync + 'static;

    /// Merge the caller's options with the selected module
    fn build_options(initial: Self::InitialOptions, module: &ModuleDescriptor) -> Self::Options;
}

/// Async step an adapter runs after being selected and before its
/// capabilities are exposed
pub type BootstrapFn<S> = Arc<
    dyn Fn(Arc<<S as AdapterSystem>::Options>) -> BoxFuture<'static, anyhow::Result<()>>
        + Send
        + Sync,
>;

/// One adapter: an id, the contracts it supports, and its capabilities
pub struct AdapterDefinition<S: AdapterSystem> {
    id: String,
    matchers: Vec<ContractMatcher>,
    capabilities: Arc<S::Capabilities>,
    bootstrap: Option<BootstrapFn<S>>,
}

impl<S: AdapterSystem> AdapterDefinition<S> {
    pub fn new(id: impl Into<String>, capabilities: Arc<S::Capabilities>) -> Self {
        Self {
            id: id.into(),
            matchers: Vec::new(),
            capabilities,
            bootstrap: None,
        }
    }

    /// Add a matcher; the definition matches if any of its matchers does
    pub fn with_matcher(mut self, matcher: impl Into<ContractMatcher>) -> Self {
        self.matchers.push(matcher.into());
        self
    }

    /// Declare an async bootstrap step
    pub fn with_bootstrap<F, Fut>(mut self, bootstrap: F) -> Self
    where
        F: Fn(Arc<S::Options>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.bootstrap = Some(Arc::new(move |options| bootstrap(options).boxed()));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn matchers(&self) -> &[ContractMatcher] {
        &self.matchers
    }

    pub fn matches(&self, contract_id: &ContractId) -> bool {
        self.matchers.iter().any(|m| m.matches(contract_id))
    }

    pub fn capabilities(&self) -> &Arc<S::Capabilities> {
        &self.capabilities
    }

    pub fn has_bootstrap(&self) -> bool {
        self.bootstrap.is_some()
    }

    pub(crate) fn bootstrap(&self) -> Option<&BootstrapFn<S>> {
        self.bootstrap.as_ref()
    }
}

impl<S: AdapterSystem> Clone for AdapterDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            matchers: self.matchers.clone(),
            capabilities: Arc::clone(&self.capabilities),
            bootstrap: self.bootstrap.clone(),
        }
    }
}

impl<S: AdapterSystem> fmt::Debug for AdapterDefinition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterDefinition")
            .field("system", &S::NAME)
            .field("id", &self.id)
            .field("matchers", &self.matchers)
            .field("bootstrap", &self.bootstrap.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{definition, Describe, Fixed, TestSystem};

    #[test]
    fn test_matches_any_matcher() {
        let def = definition("a", "pkg:x-v1").with_matcher(ContractMatcher::prefix("pkg:legacy-"));
        assert!(def.matches(&ContractId::new("pkg:x-v1")));
        assert!(def.matches(&ContractId::new("pkg:legacy-3")));
        assert!(!def.matches(&ContractId::new("pkg:x-v2")));
    }

    #[test]
    fn test_no_matchers_matches_nothing() {
        let def = AdapterDefinition::<TestSystem>::new("empty", Arc::new(Fixed("empty")));
        assert!(!def.matches(&ContractId::new("anything")));
    }

    #[test]
    fn test_capabilities_are_shared_on_clone() {
        let def = definition("a", "pkg:x");
        let copy = def.clone();
        assert!(Arc::ptr_eq(def.capabilities(), copy.capabilities()));
        assert_eq!(copy.capabilities().describe(), "a");
    }

    #[test]
    fn test_bootstrap_flag() {
        let def = definition("a", "pkg:x");
        assert!(!def.has_bootstrap());
        let def = def.with_bootstrap(|_| async { Ok(()) });
        assert!(def.has_bootstrap());
    }
}
