//! # govkit-voting
//!
//! The voting module adapter system. A DAO has exactly one voting module,
//! which decides who may vote and with how much power. Each
//! [`VotingModuleAdapter`] understands one family of voting contracts. Its
//! bootstrap loads the auxiliary config (group, token or denom) the
//! capabilities need, so a voting provider stays `Pending` until that query
//! completes.

pub mod adapters;
pub mod error;
pub mod types;

pub use error::{VotingError, VotingResult};
pub use types::{format_amount, PowerResponse, TokenInfo, VotingModuleConfig, VotingPower};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use govkit_adapters::{
    AdapterDefinition, AdapterResult, AdapterScope, AdapterSystem, GlobalRegistry, ScopedProvider,
};
use govkit_types::{ChainQuerier, DaoInfo, ModuleDescriptor, ModuleSelector};
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

pub struct VotingSystem;

impl AdapterSystem for VotingSystem {
    const NAME: &'static str = "voting";
    type Capabilities = dyn VotingModuleAdapter;
    type InitialOptions = VotingInitialOptions;
    type Options = VotingModuleAdapterOptions;

    fn build_options(initial: VotingInitialOptions, module: &ModuleDescriptor) -> VotingModuleAdapterOptions {
        VotingModuleAdapterOptions {
            core_address: initial.core_address,
            voting_module: module.clone(),
            querier: initial.querier,
            config: OnceCell::new(),
        }
    }
}

#[derive(Clone)]
pub struct VotingInitialOptions {
    pub core_address: String,
    pub querier: Arc<dyn ChainQuerier>,
}

impl VotingInitialOptions {
    pub fn new(core_address: impl Into<String>, querier: Arc<dyn ChainQuerier>) -> Self {
        Self {
            core_address: core_address.into(),
            querier,
        }
    }
}

/// Options context for a bound voting adapter
pub struct VotingModuleAdapterOptions {
    pub core_address: String,
    pub voting_module: ModuleDescriptor,
    pub querier: Arc<dyn ChainQuerier>,
    config: OnceCell<VotingModuleConfig>,
}

impl VotingModuleAdapterOptions {
    /// Config loaded by the adapter's bootstrap
    pub fn config(&self) -> VotingResult<&VotingModuleConfig> {
        self.config
            .get()
            .ok_or_else(|| VotingError::NotBootstrapped(self.voting_module.address.clone()))
    }

    pub(crate) fn store_config(&self, config: VotingModuleConfig) {
        if self.config.set(config).is_err() {
            tracing::debug!(module = %self.voting_module.address, "Voting config already loaded");
        }
    }

    /// Smart query decoded into `T`
    pub async fn query<T: DeserializeOwned>(
        &self,
        contract: &str,
        msg: Value,
        what: &'static str,
    ) -> VotingResult<T> {
        let raw = self.querier.query_smart(contract, &msg).await?;
        serde_json::from_value(raw).map_err(|err| VotingError::decode(what, err))
    }

    /// Smart query against the voting module itself
    pub async fn query_module<T: DeserializeOwned>(&self, msg: Value, what: &'static str) -> VotingResult<T> {
        self.query(&self.voting_module.address, msg, what).await
    }
}

impl fmt::Debug for VotingModuleAdapterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VotingModuleAdapterOptions")
            .field("core_address", &self.core_address)
            .field("voting_module", &self.voting_module.address)
            .field("config", &self.config.get())
            .finish()
    }
}

/// Capabilities every voting module adapter provides
pub trait VotingModuleAdapter: Send + Sync {
    /// Who can vote, in one line
    fn membership_summary<'a>(
        &'a self,
        options: &'a VotingModuleAdapterOptions,
    ) -> BoxFuture<'a, VotingResult<String>>;

    /// Voting power of `address` at the latest height
    fn voting_power<'a>(
        &'a self,
        options: &'a VotingModuleAdapterOptions,
        address: &'a str,
    ) -> BoxFuture<'a, VotingResult<VotingPower>> {
        async move {
            let member: PowerResponse = options
                .query_module(
                    json!({ "voting_power_at_height": { "address": address } }),
                    "voting power",
                )
                .await?;
            let total = total_power(options).await?;

            Ok(VotingPower {
                power: member.power,
                total: total.power,
                height: member.height,
            })
        }
        .boxed()
    }
}

pub(crate) async fn total_power(options: &VotingModuleAdapterOptions) -> VotingResult<PowerResponse> {
    options
        .query_module(json!({ "total_power_at_height": {} }), "total power")
        .await
}

/// Process-wide voting adapter registry
pub static VOTING_ADAPTERS: GlobalRegistry<VotingSystem> = GlobalRegistry::new();

pub fn builtin_adapters() -> Vec<AdapterDefinition<VotingSystem>> {
    vec![
        adapters::cw4::adapter(),
        adapters::cw20_staked_balance::adapter(),
        adapters::native_staked_balance::adapter(),
    ]
}

/// Register the builtin adapters. Call once at startup.
pub fn register_adapters() -> AdapterResult<()> {
    VOTING_ADAPTERS.register(builtin_adapters())
}

/// Mount a provider for a DAO's voting module
pub fn mount_for_dao(dao: &DaoInfo, querier: Arc<dyn ChainQuerier>) -> ScopedProvider<VotingSystem> {
    ScopedProvider::mount(
        &VOTING_ADAPTERS.read(),
        &dao.voting_modules(),
        ModuleSelector::FirstMatch,
        VotingInitialOptions::new(dao.core_address.clone(), querier),
    )
}

pub fn voting_adapter(scope: &AdapterScope<VotingSystem>) -> AdapterResult<Arc<dyn VotingModuleAdapter>> {
    scope.capabilities()
}

pub fn voting_adapter_options(
    scope: &AdapterScope<VotingSystem>,
) -> AdapterResult<Arc<VotingModuleAdapterOptions>> {
    scope.options()
}
