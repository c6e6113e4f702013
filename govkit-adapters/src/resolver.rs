//! Adapter resolution
//!
//! Resolution picks one `(module, definition)` pair out of a DAO's module list.
//! It is a pure function of the registry and its inputs: no I/O, no async
//! work, same inputs give the same answer.

use crate::definition::{AdapterDefinition, AdapterSystem};
use crate::error::{AdapterError, AdapterResult};
use crate::registry::AdapterRegistry;
use govkit_types::{ModuleDescriptor, ModuleSelector};
use std::fmt;
use std::sync::Arc;

/// Outcome of a successful resolution
pub enum Resolution<S: AdapterSystem> {
    /// A module and the adapter that supports it
    Matched(AdapterMatch<S>),
    /// The DAO has no modules of this kind. Not an error.
    NoModules,
}

impl<S: AdapterSystem> Resolution<S> {
    pub fn matched(self) -> Option<AdapterMatch<S>> {
        match self {
            Resolution::Matched(m) => Some(m),
            Resolution::NoModules => None,
        }
    }

    pub fn is_no_modules(&self) -> bool {
        matches!(self, Resolution::NoModules)
    }
}

impl<S: AdapterSystem> fmt::Debug for Resolution<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Matched(m) => f.debug_tuple("Matched").field(m).finish(),
            Resolution::NoModules => f.write_str("NoModules"),
        }
    }
}

/// The module selected for binding and the definition that accepted it
pub struct AdapterMatch<S: AdapterSystem> {
    pub module: ModuleDescriptor,
    pub definition: Arc<AdapterDefinition<S>>,
}

impl<S: AdapterSystem> AdapterMatch<S> {
    /// Build the options context for this module and produce a binding
    pub fn bind(self, initial: S::InitialOptions) -> ResolvedBinding<S> {
        let options = S::build_options(initial, &self.module);
        ResolvedBinding {
            definition: self.definition,
            options: Arc::new(options),
        }
    }
}

impl<S: AdapterSystem> fmt::Debug for AdapterMatch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterMatch")
            .field("module", &self.module.address)
            .field("adapter", &self.definition.id())
            .finish()
    }
}

/// A resolved adapter together with its immutable options context
pub struct ResolvedBinding<S: AdapterSystem> {
    definition: Arc<AdapterDefinition<S>>,
    options: Arc<S::Options>,
}

impl<S: AdapterSystem> ResolvedBinding<S> {
    pub fn definition(&self) -> &Arc<AdapterDefinition<S>> {
        &self.definition
    }

    pub fn adapter_id(&self) -> &str {
        self.definition.id()
    }

    pub fn capabilities(&self) -> Arc<S::Capabilities> {
        Arc::clone(self.definition.capabilities())
    }

    pub fn options(&self) -> Arc<S::Options> {
        Arc::clone(&self.options)
    }
}

impl<S: AdapterSystem> Clone for ResolvedBinding<S> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            options: Arc::clone(&self.options),
        }
    }
}

impl<S: AdapterSystem> fmt::Debug for ResolvedBinding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedBinding")
            .field("adapter", &self.definition.id())
            .finish_non_exhaustive()
    }
}

/// Resolve which adapter serves which module.
///
/// With [`ModuleSelector::FirstMatch`] every module is a candidate, scanned in
/// list order. An explicit selector narrows the candidates to the first
/// module it selects. For each candidate, definitions are tried in
/// registration order and the first one that accepts the module's contract
/// id wins.
pub fn resolve<S: AdapterSystem>(
    registry: &AdapterRegistry<S>,
    modules: &[ModuleDescriptor],
    selector: &ModuleSelector,
) -> AdapterResult<Resolution<S>> {
    if modules.is_empty() {
        tracing::debug!(system = S::NAME, "No modules to resolve");
        return Ok(Resolution::NoModules);
    }

    let candidates: Vec<&ModuleDescriptor> = match selector {
        ModuleSelector::FirstMatch => modules.iter().collect(),
        _ => modules.iter().find(|m| selector.selects(m)).into_iter().collect(),
    };

    if candidates.is_empty() {
        tracing::warn!(system = S::NAME, %selector, "Selector matched no module");
        return Err(AdapterError::ModuleNotFound {
            system: S::NAME,
            selector: selector.clone(),
        });
    }

    for module in &candidates {
        if let Some(definition) = registry.find(&module.contract_id) {
            tracing::debug!(
                system = S::NAME,
                module = %module.address,
                contract = %module.contract_id,
                adapter = %definition.id(),
                "Resolved adapter"
            );
            return Ok(Resolution::Matched(AdapterMatch {
                module: (*module).clone(),
                definition: Arc::clone(definition),
            }));
        }
    }

    let contract_ids: Vec<String> = candidates
        .iter()
        .map(|m| m.contract_id.to_string())
        .collect();
    tracing::warn!(
        system = S::NAME,
        contracts = %contract_ids.join(", "),
        "No adapter matches"
    );
    Err(AdapterError::NoMatchingAdapter {
        system: S::NAME,
        contract_ids,
    })
}
