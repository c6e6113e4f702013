//! Voting power from cw20 tokens staked in a staking contract

use crate::error::{VotingError, VotingResult};
use crate::types::{format_amount, TokenInfo};
use crate::{total_power, VotingModuleAdapter, VotingModuleAdapterOptions, VotingModuleConfig, VotingSystem};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use govkit_adapters::{AdapterDefinition, ContractMatcher};
use serde_json::json;
use std::sync::Arc;

pub const ADAPTER_ID: &str = "cw20-staked-balance-voting";

pub const CONTRACT_IDS: [&str; 2] = [
    "crates.io:cw20-staked-balance-voting",
    "crates.io:cwd-voting-cw20-staked",
];

pub fn adapter() -> AdapterDefinition<VotingSystem> {
    AdapterDefinition::new(ADAPTER_ID, Arc::new(Cw20StakedBalanceVoting) as Arc<dyn VotingModuleAdapter>)
        .with_matcher(ContractMatcher::any_of(CONTRACT_IDS))
        .with_bootstrap(bootstrap)
}

async fn bootstrap(options: Arc<VotingModuleAdapterOptions>) -> anyhow::Result<()> {
    let config = load_config(&options).await?;
    options.store_config(config);
    Ok(())
}

async fn load_config(options: &VotingModuleAdapterOptions) -> VotingResult<VotingModuleConfig> {
    let token_address: String = options
        .query_module(json!({ "token_contract": {} }), "token contract")
        .await?;
    let staking_address: String = options
        .query_module(json!({ "staking_contract": {} }), "staking contract")
        .await?;
    let token: TokenInfo = options
        .query(&token_address, json!({ "token_info": {} }), "token info")
        .await?;

    tracing::debug!(
        module = %options.voting_module.address,
        token = %token_address,
        symbol = %token.symbol,
        "Loaded staked token"
    );
    Ok(VotingModuleConfig::Cw20Staked {
        token_address,
        staking_address,
        token,
    })
}

fn token(options: &VotingModuleAdapterOptions) -> VotingResult<&TokenInfo> {
    match options.config()? {
        VotingModuleConfig::Cw20Staked { token, .. } => Ok(token),
        _ => Err(VotingError::ConfigMismatch {
            module: options.voting_module.address.clone(),
            adapter: ADAPTER_ID,
        }),
    }
}

pub struct Cw20StakedBalanceVoting;

impl VotingModuleAdapter for Cw20StakedBalanceVoting {
    fn membership_summary<'a>(
        &'a self,
        options: &'a VotingModuleAdapterOptions,
    ) -> BoxFuture<'a, VotingResult<String>> {
        async move {
            let token = token(options)?;
            let staked = total_power(options).await?;

            Ok(format!(
                "Staked token {} ({}): {} of {} staked",
                token.symbol,
                token.name,
                format_amount(staked.power, token.decimals),
                format_amount(token.total_supply, token.decimals)
            ))
        }
        .boxed()
    }
}
