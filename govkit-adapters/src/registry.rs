//! Adapter registry
//!
//! [`AdapterRegistry`] is an ordered, append-only list of definitions with
//! unique ids. Registration order is resolution priority: when several
//! definitions accept the same contract id, the earliest one wins.
//!
//! [`GlobalRegistry`] wraps a registry in a process-wide static. It is meant
//! to be filled once at startup and only read afterwards; registering after
//! the first read is allowed but logged.

use crate::definition::{AdapterDefinition, AdapterSystem};
use crate::error::{AdapterError, AdapterResult};
use govkit_types::ContractId;
use once_cell::sync::Lazy;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct AdapterRegistry<S: AdapterSystem> {
    definitions: Vec<Arc<AdapterDefinition<S>>>,
}

impl<S: AdapterSystem> AdapterRegistry<S> {
    pub fn new() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }

    /// Append a batch of definitions.
    ///
    /// The batch is rejected as a whole if any id is already registered or
    /// appears twice in the batch; nothing is appended in that case.
    pub fn register<I>(&mut self, definitions: I) -> AdapterResult<()>
    where
        I: IntoIterator<Item = AdapterDefinition<S>>,
    {
        let batch: Vec<AdapterDefinition<S>> = definitions.into_iter().collect();

        let mut seen: HashSet<&str> = self.definitions.iter().map(|d| d.id()).collect();
        for definition in &batch {
            if !seen.insert(definition.id()) {
                tracing::error!(system = S::NAME, id = %definition.id(), "Duplicate adapter id");
                return Err(AdapterError::DuplicateAdapterId {
                    system: S::NAME,
                    id: definition.id().to_string(),
                });
            }
        }

        let count = batch.len();
        for definition in batch {
            tracing::debug!(
                system = S::NAME,
                id = %definition.id(),
                matchers = definition.matchers().len(),
                "Registered adapter"
            );
            self.definitions.push(Arc::new(definition));
        }
        tracing::info!(system = S::NAME, count, total = self.definitions.len(), "Adapters registered");

        Ok(())
    }

    /// All definitions in registration order
    pub fn all(&self) -> &[Arc<AdapterDefinition<S>>] {
        &self.definitions
    }

    pub fn get(&self, id: &str) -> Option<&Arc<AdapterDefinition<S>>> {
        self.definitions.iter().find(|d| d.id() == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.definitions.iter().map(|d| d.id()).collect()
    }

    /// The highest-priority definition accepting `contract_id`
    pub fn find(&self, contract_id: &ContractId) -> Option<&Arc<AdapterDefinition<S>>> {
        self.definitions.iter().find(|d| d.matches(contract_id))
    }

    pub fn supports(&self, contract_id: &ContractId) -> bool {
        self.find(contract_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl<S: AdapterSystem> Default for AdapterRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AdapterSystem> fmt::Debug for AdapterRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("system", &S::NAME)
            .field("ids", &self.ids())
            .finish()
    }
}

fn empty_registry<S: AdapterSystem>() -> RwLock<AdapterRegistry<S>> {
    RwLock::new(AdapterRegistry::new())
}

/// Process-wide registry for one adapter system
///
/// ```ignore
/// pub static PROPOSAL_ADAPTERS: GlobalRegistry<ProposalSystem> = GlobalRegistry::new();
///
/// PROPOSAL_ADAPTERS.register([cw_proposal_single::adapter()])?;
/// let registry = PROPOSAL_ADAPTERS.read();
/// ```
pub struct GlobalRegistry<S: AdapterSystem> {
    inner: Lazy<RwLock<AdapterRegistry<S>>>,
    read_once: AtomicBool,
}

impl<S: AdapterSystem> GlobalRegistry<S> {
    pub const fn new() -> Self {
        Self {
            inner: Lazy::new(empty_registry::<S>),
            read_once: AtomicBool::new(false),
        }
    }

    /// Register adapters into the process-wide registry
    pub fn register<I>(&self, definitions: I) -> AdapterResult<()>
    where
        I: IntoIterator<Item = AdapterDefinition<S>>,
    {
        if self.read_once.load(Ordering::Acquire) {
            tracing::warn!(
                system = S::NAME,
                "Registering adapters after resolution has started; earlier providers will not see them"
            );
        }
        self.inner.write().register(definitions)
    }

    /// Read access for resolution
    pub fn read(&self) -> RwLockReadGuard<'_, AdapterRegistry<S>> {
        self.read_once.store(true, Ordering::Release);
        self.inner.read()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

impl<S: AdapterSystem> Default for GlobalRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{definition, TestSystem};

    #[test]
    fn test_register_and_get_all_in_order() {
        let mut registry = AdapterRegistry::<TestSystem>::new();
        registry
            .register([definition("b", "pkg:b"), definition("a", "pkg:a")])
            .unwrap();
        registry.register([definition("c", "pkg:c")]).unwrap();

        assert_eq!(registry.ids(), vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
        assert!(registry.get("a").is_some());
        assert!(registry.get("z").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut registry = AdapterRegistry::<TestSystem>::new();
        registry.register([definition("a", "pkg:a")]).unwrap();

        let err = registry
            .register([definition("b", "pkg:b"), definition("a", "pkg:other")])
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::DuplicateAdapterId {
                system: "test",
                id: "a".to_string()
            }
        );
        // The whole batch was rejected
        assert_eq!(registry.ids(), vec!["a"]);
    }

    #[test]
    fn test_duplicate_within_batch_rejected() {
        let mut registry = AdapterRegistry::<TestSystem>::new();
        let err = registry
            .register([definition("a", "pkg:a"), definition("a", "pkg:b")])
            .unwrap_err();
        assert!(matches!(err, AdapterError::DuplicateAdapterId { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_overlapping_matchers_allowed() {
        let mut registry = AdapterRegistry::<TestSystem>::new();
        registry
            .register([definition("a", "pkg:y"), definition("b", "pkg:y")])
            .unwrap();

        let found = registry.find(&ContractId::new("pkg:y")).unwrap();
        assert_eq!(found.id(), "a");
        assert!(registry.supports(&ContractId::new("pkg:y")));
        assert!(!registry.supports(&ContractId::new("pkg:z")));
    }

    static GLOBAL: GlobalRegistry<TestSystem> = GlobalRegistry::new();

    #[test]
    fn test_global_registry() {
        assert!(GLOBAL.is_empty());
        GLOBAL.register([definition("g", "pkg:g")]).unwrap();
        assert!(GLOBAL
            .register([definition("g", "pkg:other")])
            .is_err());

        let registry = GLOBAL.read();
        assert_eq!(registry.ids(), vec!["g"]);
        drop(registry);

        // Late registration still works, it only warns
        GLOBAL.register([definition("h", "pkg:h")]).unwrap();
        assert_eq!(GLOBAL.len(), 2);
    }
}
