//! # govkit-proposal
//!
//! The proposal module adapter system. Each DAO can install several proposal
//! modules, each backed by some proposal contract. A [`ProposalModuleAdapter`]
//! knows how to load, display and create proposals for one family of those
//! contracts. Adapters are registered once in [`PROPOSAL_ADAPTERS`] and bound
//! per module instance through a [`ScopedProvider`].

pub mod adapters;
pub mod error;
pub mod types;

pub use error::{ProposalError, ProposalResult};
pub use types::{
    custom_action, format_percent, ActionKeyAndData, ChainClock, NewProposalData, NewProposalForm,
    ProcessedTq, ProposalStatus, ProposalSummary, VotesInfo,
};

use futures_util::future::BoxFuture;
use govkit_adapters::{
    AdapterDefinition, AdapterResult, AdapterScope, AdapterSystem, GlobalRegistry, ScopedProvider,
};
use govkit_types::{ChainQuerier, ModuleDescriptor, ModuleSelector, ProposalId};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Marker for the proposal module adapter family
pub struct ProposalSystem;

impl AdapterSystem for ProposalSystem {
    const NAME: &'static str = "proposal";
    type Capabilities = dyn ProposalModuleAdapter;
    type InitialOptions = ProposalInitialOptions;
    type Options = ProposalModuleAdapterOptions;

    fn build_options(initial: ProposalInitialOptions, module: &ModuleDescriptor) -> ProposalModuleAdapterOptions {
        let proposal_id = initial
            .proposal_number
            .map(|number| ProposalId::new(module.prefix_str(), number));

        ProposalModuleAdapterOptions {
            core_address: initial.core_address,
            proposal_module: module.clone(),
            proposal_number: initial.proposal_number,
            proposal_id,
            logo: initial.logo,
            loader: initial.loader,
            querier: initial.querier,
        }
    }
}

/// What the caller supplies when mounting a proposal provider
#[derive(Clone)]
pub struct ProposalInitialOptions {
    pub core_address: String,
    pub proposal_number: Option<u64>,
    /// Marker printed in front of proposal lines
    pub logo: String,
    /// Placeholder shown while a proposal is loading
    pub loader: String,
    pub querier: Arc<dyn ChainQuerier>,
}

impl ProposalInitialOptions {
    pub fn new(core_address: impl Into<String>, querier: Arc<dyn ChainQuerier>) -> Self {
        Self {
            core_address: core_address.into(),
            proposal_number: None,
            logo: "*".to_string(),
            loader: "...".to_string(),
            querier,
        }
    }

    pub fn with_proposal_number(mut self, number: u64) -> Self {
        self.proposal_number = Some(number);
        self
    }

    pub fn with_display(mut self, logo: impl Into<String>, loader: impl Into<String>) -> Self {
        self.logo = logo.into();
        self.loader = loader.into();
        self
    }
}

/// Options context the capabilities of a bound proposal adapter see
#[derive(Clone)]
pub struct ProposalModuleAdapterOptions {
    pub core_address: String,
    pub proposal_module: ModuleDescriptor,
    pub proposal_number: Option<u64>,
    pub proposal_id: Option<ProposalId>,
    pub logo: String,
    pub loader: String,
    pub querier: Arc<dyn ChainQuerier>,
}

impl ProposalModuleAdapterOptions {
    pub fn require_proposal_number(&self) -> ProposalResult<u64> {
        self.proposal_number.ok_or(ProposalError::MissingProposalNumber)
    }
}

impl fmt::Debug for ProposalModuleAdapterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProposalModuleAdapterOptions")
            .field("core_address", &self.core_address)
            .field("proposal_module", &self.proposal_module.address)
            .field("proposal_id", &self.proposal_id)
            .finish()
    }
}

/// Capabilities every proposal module adapter provides
pub trait ProposalModuleAdapter: Send + Sync {
    /// Load the proposal named by the options
    fn load_proposal<'a>(
        &'a self,
        options: &'a ProposalModuleAdapterOptions,
    ) -> BoxFuture<'a, ProposalResult<ProposalSummary>>;

    /// Voting rules of the bound module
    fn module_summary<'a>(
        &'a self,
        options: &'a ProposalModuleAdapterOptions,
    ) -> BoxFuture<'a, ProposalResult<String>>;

    /// One-line summary for proposal lists
    fn proposal_line(&self, options: &ProposalModuleAdapterOptions, proposal: &ProposalSummary) -> String;

    /// Vote breakdown for the proposal page
    fn vote_tally(&self, proposal: &ProposalSummary) -> String;

    /// Execute message that creates a proposal in this module
    fn new_proposal_msg(&self, data: &NewProposalData) -> ProposalResult<Value>;
}

/// Process-wide proposal adapter registry
pub static PROPOSAL_ADAPTERS: GlobalRegistry<ProposalSystem> = GlobalRegistry::new();

/// Every adapter shipped with govkit, in priority order
pub fn builtin_adapters() -> Vec<AdapterDefinition<ProposalSystem>> {
    vec![adapters::cw_proposal_single::adapter()]
}

/// Register the builtin adapters. Call once at startup.
pub fn register_adapters() -> AdapterResult<()> {
    PROPOSAL_ADAPTERS.register(builtin_adapters())
}

/// Mount a provider for the module a proposal id points at
pub fn mount_for_proposal(
    modules: &[ModuleDescriptor],
    proposal_id: &ProposalId,
    initial: ProposalInitialOptions,
) -> ScopedProvider<ProposalSystem> {
    let initial = initial.with_proposal_number(proposal_id.number);
    ScopedProvider::mount(&PROPOSAL_ADAPTERS.read(), modules, proposal_id.selector(), initial)
}

/// Mount a provider for the first supported proposal module
pub fn mount_first(
    modules: &[ModuleDescriptor],
    initial: ProposalInitialOptions,
) -> ScopedProvider<ProposalSystem> {
    ScopedProvider::mount(&PROPOSAL_ADAPTERS.read(), modules, ModuleSelector::FirstMatch, initial)
}

/// Resolved proposal adapter capabilities
pub fn proposal_adapter(
    scope: &AdapterScope<ProposalSystem>,
) -> AdapterResult<Arc<dyn ProposalModuleAdapter>> {
    scope.capabilities()
}

/// Resolved proposal adapter options
pub fn proposal_adapter_options(
    scope: &AdapterScope<ProposalSystem>,
) -> AdapterResult<Arc<ProposalModuleAdapterOptions>> {
    scope.options()
}
