//! List registered adapters.

use anyhow::Result;
use govkit_adapters::{AdapterRegistry, AdapterSystem};
use govkit_proposal::PROPOSAL_ADAPTERS;
use govkit_voting::VOTING_ADAPTERS;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AdapterRow {
    system: &'static str,
    id: String,
    matchers: Vec<String>,
    bootstrap: bool,
}

fn rows<S: AdapterSystem>(registry: &AdapterRegistry<S>) -> Vec<AdapterRow> {
    registry
        .all()
        .iter()
        .map(|def| AdapterRow {
            system: S::NAME,
            id: def.id().to_string(),
            matchers: def.matchers().iter().map(|m| m.to_string()).collect(),
            bootstrap: def.has_bootstrap(),
        })
        .collect()
}

pub fn list_adapters(json: bool) -> Result<()> {
    let mut all = rows(&PROPOSAL_ADAPTERS.read());
    all.extend(rows(&VOTING_ADAPTERS.read()));

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }

    let mut system = "";
    for row in &all {
        if row.system != system {
            system = row.system;
            println!("{} adapters:", system);
        }
        let bootstrap = if row.bootstrap { " (bootstrap)" } else { "" };
        println!("  {}  {}{}", row.id, row.matchers.join(" | "), bootstrap);
    }
    Ok(())
}
