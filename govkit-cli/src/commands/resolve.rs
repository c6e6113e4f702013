//! Show which adapter each DAO module binds to.

use crate::config::Config;
use anyhow::Result;
use govkit_adapters::{resolve, AdapterRegistry, AdapterSystem, Resolution};
use govkit_proposal::PROPOSAL_ADAPTERS;
use govkit_types::{ModuleDescriptor, ModuleSelector};
use govkit_voting::VOTING_ADAPTERS;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ResolveRow {
    dao: String,
    system: &'static str,
    module: String,
    contract: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adapter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn resolve_row<S: AdapterSystem>(
    registry: &AdapterRegistry<S>,
    dao: &str,
    module: &ModuleDescriptor,
) -> ResolveRow {
    let selector = ModuleSelector::address(module.address.clone());
    let (adapter, error) = match resolve(registry, std::slice::from_ref(module), &selector) {
        Ok(Resolution::Matched(matched)) => (Some(matched.definition.id().to_string()), None),
        Ok(Resolution::NoModules) => (None, None),
        Err(err) => (None, Some(err.to_string())),
    };

    ResolveRow {
        dao: dao.to_string(),
        system: S::NAME,
        module: module.address.clone(),
        contract: module.contract_id.to_string(),
        prefix: module.prefix.clone(),
        adapter,
        error,
    }
}

pub fn resolve_modules(config: &Config, dao: Option<&str>, json: bool) -> Result<()> {
    let proposal_registry = PROPOSAL_ADAPTERS.read();
    let voting_registry = VOTING_ADAPTERS.read();

    let mut rows = Vec::new();
    for dao in config.select_daos(dao)? {
        let name = &dao.info.name;
        rows.push(resolve_row(&voting_registry, name, &dao.info.voting_module));
        for module in &dao.info.proposal_modules {
            rows.push(resolve_row(&proposal_registry, name, module));
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut current = "";
    for row in &rows {
        if row.dao != current {
            current = row.dao.as_str();
            println!("{}", row.dao);
        }
        let label = match &row.prefix {
            Some(prefix) => format!("{} [{}]", row.module, prefix),
            None => row.module.clone(),
        };
        match (&row.adapter, &row.error) {
            (Some(adapter), _) => println!("  {:<8} {}  {} -> {}", row.system, label, row.contract, adapter),
            (None, Some(error)) => println!("  {:<8} {}  {} -> error: {}", row.system, label, row.contract, error),
            (None, None) => println!("  {:<8} {}  {} -> none", row.system, label, row.contract),
        }
    }
    Ok(())
}
