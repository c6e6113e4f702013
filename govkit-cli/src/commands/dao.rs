//! DAO overview: voting module summary and proposal module rules.

use crate::config::{Config, DaoConfig};
use anyhow::Result;
use govkit_adapters::{ProviderPhase, ScopedProvider};
use govkit_proposal::{proposal_adapter, proposal_adapter_options, ProposalInitialOptions, PROPOSAL_ADAPTERS};
use govkit_types::{ChainQuerier, ModuleDescriptor, ModuleSelector};
use govkit_voting::{mount_for_dao, voting_adapter, voting_adapter_options};
use std::sync::Arc;

pub async fn show_dao(config: &Config, dao: Option<&str>, member: Option<&str>) -> Result<()> {
    let dao = config.dao(dao)?;
    let querier: Arc<dyn ChainQuerier> = Arc::new(config.querier()?);

    println!("{} ({})", dao.info.name, dao.info.core_address);
    if !dao.info.description.is_empty() {
        println!("{}", dao.info.description);
    }
    if let Some(created) = dao.info.created {
        println!("Created {}", created.format("%Y-%m-%d"));
    }

    println!();
    println!("Voting: {}", voting_section(dao, member, Arc::clone(&querier)).await);

    if dao.info.proposal_modules.is_empty() {
        return Ok(());
    }
    println!();
    println!("Proposal modules:");
    for module in &dao.info.proposal_modules {
        let summary = proposal_module_summary(config, dao, module, Arc::clone(&querier)).await;
        println!("  {} {}  {}", module.prefix_str(), module.address, summary);
    }
    Ok(())
}

async fn voting_section(dao: &DaoConfig, member: Option<&str>, querier: Arc<dyn ChainQuerier>) -> String {
    let provider = mount_for_dao(&dao.info, querier);
    if provider.ready().await != ProviderPhase::Resolved {
        return match provider.error() {
            Some(err) => format!("unavailable: {}", err),
            None => format!("{}", provider.phase()),
        };
    }

    let scope = provider.scope();
    let (adapter, options) = match (voting_adapter(&scope), voting_adapter_options(&scope)) {
        (Ok(adapter), Ok(options)) => (adapter, options),
        (Err(err), _) | (_, Err(err)) => return format!("unavailable: {}", err),
    };
    let adapter_id = scope.binding().map(|b| b.adapter_id().to_string()).unwrap_or_default();

    let mut section = match adapter.membership_summary(&options).await {
        Ok(summary) => format!("{} ({})", summary, adapter_id),
        Err(err) => format!("{}: {}", adapter_id, err),
    };

    if let Some(member) = member {
        let power = match adapter.voting_power(&options, member).await {
            Ok(power) => power.to_string(),
            Err(err) => format!("unavailable: {}", err),
        };
        section.push_str(&format!("\n  Voting power of {}: {}", member, power));
    }
    section
}

async fn proposal_module_summary(
    config: &Config,
    dao: &DaoConfig,
    module: &ModuleDescriptor,
    querier: Arc<dyn ChainQuerier>,
) -> String {
    let initial = ProposalInitialOptions::new(dao.info.core_address.clone(), querier)
        .with_display(config.display.logo.clone(), config.display.loader.clone());
    let provider = ScopedProvider::mount(
        &PROPOSAL_ADAPTERS.read(),
        &dao.info.proposal_modules,
        ModuleSelector::address(module.address.clone()),
        initial,
    );
    provider.ready().await;

    let scope = provider.scope();
    let rendered = provider.render(
        || Err(config.display.loader.clone()),
        |scope| match (proposal_adapter(scope), proposal_adapter_options(scope)) {
            (Ok(adapter), Ok(options)) => Ok((adapter, options)),
            (Err(err), _) | (_, Err(err)) => Err(err.to_string()),
        },
    );

    let (adapter, options) = match rendered {
        Ok(Some(Ok(bound))) => bound,
        Ok(Some(Err(text))) => return text,
        Ok(None) => return "none".to_string(),
        Err(err) => return format!("unsupported: {}", err),
    };
    let adapter_id = scope.binding().map(|b| b.adapter_id().to_string()).unwrap_or_default();

    match adapter.module_summary(&options).await {
        Ok(summary) => format!("{} ({})", summary, adapter_id),
        Err(err) => format!("{}: {}", adapter_id, err),
    }
}
