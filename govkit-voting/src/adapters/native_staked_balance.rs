//! Voting power from a staked native denom

use crate::error::{VotingError, VotingResult};
use crate::types::format_amount;
use crate::{total_power, VotingModuleAdapter, VotingModuleAdapterOptions, VotingModuleConfig, VotingSystem};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use govkit_adapters::{AdapterDefinition, ContractMatcher};
use govkit_types::Duration;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub const ADAPTER_ID: &str = "native-staked-balance-voting";

pub const CONTRACT_IDS: [&str; 2] = [
    "crates.io:cw-native-staked-balance-voting",
    "crates.io:cwd-voting-native-staked",
];

/// Native denoms carry six decimals on Cosmos chains (`ujuno`, `uatom`)
const NATIVE_DECIMALS: u32 = 6;

pub fn adapter() -> AdapterDefinition<VotingSystem> {
    AdapterDefinition::new(ADAPTER_ID, Arc::new(NativeStakedBalanceVoting) as Arc<dyn VotingModuleAdapter>)
        .with_matcher(ContractMatcher::any_of(CONTRACT_IDS))
        .with_bootstrap(bootstrap)
}

#[derive(Debug, Deserialize)]
struct ConfigResponse {
    denom: String,
    #[serde(default)]
    unstaking_duration: Option<Duration>,
}

async fn bootstrap(options: Arc<VotingModuleAdapterOptions>) -> anyhow::Result<()> {
    let config: ConfigResponse = options
        .query_module(json!({ "get_config": {} }), "native staking config")
        .await?;

    tracing::debug!(module = %options.voting_module.address, denom = %config.denom, "Loaded native staking config");
    options.store_config(VotingModuleConfig::NativeStaked {
        denom: config.denom,
        unstaking_duration: config.unstaking_duration,
    });
    Ok(())
}

pub struct NativeStakedBalanceVoting;

impl VotingModuleAdapter for NativeStakedBalanceVoting {
    fn membership_summary<'a>(
        &'a self,
        options: &'a VotingModuleAdapterOptions,
    ) -> BoxFuture<'a, VotingResult<String>> {
        async move {
            let (denom, unstaking) = match options.config()? {
                VotingModuleConfig::NativeStaked {
                    denom,
                    unstaking_duration,
                } => (denom, unstaking_duration),
                _ => {
                    return Err(VotingError::ConfigMismatch {
                        module: options.voting_module.address.clone(),
                        adapter: ADAPTER_ID,
                    })
                }
            };
            let staked = total_power(options).await?;

            let unstaking = match unstaking {
                Some(duration) => format!("unstaking takes {}", duration),
                None => "no unstaking period".to_string(),
            };
            Ok(format!(
                "Staked {}: {} staked, {}",
                denom,
                format_amount(staked.power, NATIVE_DECIMALS),
                unstaking
            ))
        }
        .boxed()
    }
}
