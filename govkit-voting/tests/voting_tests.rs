//! Voting providers bootstrapping through the process-wide registry

use govkit_adapters::{AdapterError, ProviderPhase};
use govkit_types::{ChainQuerier, DaoInfo, ModuleDescriptor, StaticQuerier};
use govkit_voting::{
    mount_for_dao, voting_adapter, voting_adapter_options, VotingModuleConfig, VOTING_ADAPTERS,
};
use serde_json::json;
use std::sync::{Arc, Once};

static SETUP: Once = Once::new();

fn setup() {
    SETUP.call_once(|| govkit_voting::register_adapters().unwrap());
}

fn dao(voting_contract: &str) -> DaoInfo {
    DaoInfo {
        core_address: "dao".to_string(),
        name: "Test DAO".to_string(),
        description: String::new(),
        image_url: None,
        created: None,
        voting_module: ModuleDescriptor::new("voting", voting_contract),
        proposal_modules: Vec::new(),
    }
}

fn cw4_querier() -> Arc<dyn ChainQuerier> {
    Arc::new(
        StaticQuerier::new()
            .with("voting", json!({ "group_contract": {} }), json!("group"))
            .with(
                "group",
                json!({ "list_members": {} }),
                json!({ "members": [
                    { "addr": "juno1alice", "weight": 2 },
                    { "addr": "juno1bob", "weight": 1 }
                ]}),
            ),
    )
}

fn cw20_querier() -> Arc<dyn ChainQuerier> {
    Arc::new(
        StaticQuerier::new()
            .with("voting", json!({ "token_contract": {} }), json!("token"))
            .with("voting", json!({ "staking_contract": {} }), json!("staking"))
            .with(
                "token",
                json!({ "token_info": {} }),
                json!({ "name": "Gov", "symbol": "GOV", "decimals": 6, "total_supply": "10000000" }),
            )
            .with(
                "voting",
                json!({ "total_power_at_height": {} }),
                json!({ "power": "2500000", "height": 40 }),
            ),
    )
}

#[tokio::test]
async fn test_cw4_membership_summary() {
    setup();
    let provider = mount_for_dao(&dao("crates.io:cw4-voting"), cw4_querier());
    assert_eq!(provider.ready().await, ProviderPhase::Resolved);

    let scope = provider.scope();
    let adapter = voting_adapter(&scope).unwrap();
    let options = voting_adapter_options(&scope).unwrap();
    assert_eq!(
        options.config().unwrap(),
        &VotingModuleConfig::Cw4 {
            group_address: "group".to_string()
        }
    );

    let summary = adapter.membership_summary(&options).await.unwrap();
    insta::assert_snapshot!(summary, @"Membership group group: 2 members, total weight 3");
}

#[tokio::test]
async fn test_cw4_total_weight_beyond_u64() {
    setup();
    let querier: Arc<dyn ChainQuerier> = Arc::new(
        StaticQuerier::new()
            .with("voting", json!({ "group_contract": {} }), json!("group"))
            .with(
                "group",
                json!({ "list_members": {} }),
                json!({ "members": [
                    { "addr": "juno1alice", "weight": u64::MAX },
                    { "addr": "juno1bob", "weight": 1 }
                ]}),
            ),
    );
    let provider = mount_for_dao(&dao("crates.io:cw4-voting"), querier);
    assert_eq!(provider.ready().await, ProviderPhase::Resolved);

    let scope = provider.scope();
    let adapter = voting_adapter(&scope).unwrap();
    let options = voting_adapter_options(&scope).unwrap();
    let summary = adapter.membership_summary(&options).await.unwrap();
    insta::assert_snapshot!(summary, @"Membership group group: 2 members, total weight 18446744073709551616");
}

#[tokio::test]
async fn test_cw20_membership_summary() {
    setup();
    let provider = mount_for_dao(&dao("crates.io:cwd-voting-cw20-staked"), cw20_querier());
    assert_eq!(provider.ready().await, ProviderPhase::Resolved);

    let scope = provider.scope();
    let summary = voting_adapter(&scope)
        .unwrap()
        .membership_summary(&voting_adapter_options(&scope).unwrap())
        .await
        .unwrap();
    insta::assert_snapshot!(summary, @"Staked token GOV (Gov): 2.5 of 10 staked");
}

#[tokio::test]
async fn test_native_membership_summary() {
    setup();
    let querier: Arc<dyn ChainQuerier> = Arc::new(
        StaticQuerier::new()
            .with(
                "voting",
                json!({ "get_config": {} }),
                json!({ "owner": null, "manager": null, "denom": "ujuno", "unstaking_duration": { "time": 1209600 } }),
            )
            .with(
                "voting",
                json!({ "total_power_at_height": {} }),
                json!({ "power": "7000000", "height": 3 }),
            ),
    );
    let provider = mount_for_dao(&dao("crates.io:cw-native-staked-balance-voting"), querier);
    assert_eq!(provider.ready().await, ProviderPhase::Resolved);

    let scope = provider.scope();
    let summary = voting_adapter(&scope)
        .unwrap()
        .membership_summary(&voting_adapter_options(&scope).unwrap())
        .await
        .unwrap();
    insta::assert_snapshot!(summary, @"Staked ujuno: 7 staked, unstaking takes 14 days");
}

#[tokio::test]
async fn test_bootstrap_failure_fails_provider() {
    setup();
    let provider = mount_for_dao(&dao("crates.io:cw4-voting"), Arc::new(StaticQuerier::new()));
    assert_eq!(provider.ready().await, ProviderPhase::Failed);
    assert!(matches!(
        provider.error(),
        Some(AdapterError::Bootstrap { adapter, .. }) if adapter == "cw4-voting"
    ));
}

#[tokio::test]
async fn test_unsupported_voting_module() {
    setup();
    let provider = mount_for_dao(&dao("crates.io:cw721-staked-voting"), cw4_querier());
    assert_eq!(provider.phase(), ProviderPhase::Failed);
    assert!(matches!(
        provider.error(),
        Some(AdapterError::NoMatchingAdapter { system: "voting", .. })
    ));
}

#[test]
fn test_builtin_registration_order() {
    setup();
    let registry = VOTING_ADAPTERS.read();
    assert_eq!(
        registry.ids(),
        vec![
            "cw4-voting",
            "cw20-staked-balance-voting",
            "native-staked-balance-voting"
        ]
    );
}
