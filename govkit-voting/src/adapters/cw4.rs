//! Membership-based voting through a cw4 group

use crate::error::{VotingError, VotingResult};
use crate::{VotingModuleAdapter, VotingModuleAdapterOptions, VotingModuleConfig, VotingSystem};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use govkit_adapters::{AdapterDefinition, ContractMatcher};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub const ADAPTER_ID: &str = "cw4-voting";

pub const CONTRACT_IDS: [&str; 2] = ["crates.io:cw4-voting", "crates.io:cwd-voting-cw4"];

pub fn adapter() -> AdapterDefinition<VotingSystem> {
    AdapterDefinition::new(ADAPTER_ID, Arc::new(Cw4Voting) as Arc<dyn VotingModuleAdapter>)
        .with_matcher(ContractMatcher::any_of(CONTRACT_IDS))
        .with_bootstrap(bootstrap)
}

async fn bootstrap(options: Arc<VotingModuleAdapterOptions>) -> anyhow::Result<()> {
    let config = load_config(&options).await?;
    options.store_config(config);
    Ok(())
}

async fn load_config(options: &VotingModuleAdapterOptions) -> VotingResult<VotingModuleConfig> {
    let group_address: String = options
        .query_module(json!({ "group_contract": {} }), "group contract")
        .await?;
    tracing::debug!(module = %options.voting_module.address, group = %group_address, "Loaded cw4 group");
    Ok(VotingModuleConfig::Cw4 { group_address })
}

#[derive(Debug, Deserialize)]
struct Member {
    weight: u64,
}

#[derive(Debug, Deserialize)]
struct MemberListResponse {
    members: Vec<Member>,
}

fn group_address(options: &VotingModuleAdapterOptions) -> VotingResult<&str> {
    match options.config()? {
        VotingModuleConfig::Cw4 { group_address } => Ok(group_address),
        _ => Err(VotingError::ConfigMismatch {
            module: options.voting_module.address.clone(),
            adapter: ADAPTER_ID,
        }),
    }
}

pub struct Cw4Voting;

impl VotingModuleAdapter for Cw4Voting {
    fn membership_summary<'a>(
        &'a self,
        options: &'a VotingModuleAdapterOptions,
    ) -> BoxFuture<'a, VotingResult<String>> {
        async move {
            let group = group_address(options)?;
            let list: MemberListResponse = options
                .query(group, json!({ "list_members": {} }), "member list")
                .await?;
            let total: u128 = list.members.iter().map(|m| u128::from(m.weight)).sum();

            Ok(format!(
                "Membership group {}: {} members, total weight {}",
                group,
                list.members.len(),
                total
            ))
        }
        .boxed()
    }
}
