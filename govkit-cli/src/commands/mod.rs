//! CLI command implementations.

pub mod adapters;
pub mod dao;
pub mod proposals;
pub mod resolve;

pub use adapters::list_adapters;
pub use dao::show_dao;
pub use proposals::{inbox, show_proposal, InboxSort};
pub use resolve::resolve_modules;

use crate::config::{Config, ConfigError};
use anyhow::{Context, Result};
use govkit_adapters::{AdapterDefinition, AdapterSystem, GlobalRegistry};
use govkit_proposal::PROPOSAL_ADAPTERS;
use govkit_voting::VOTING_ADAPTERS;

/// Register builtin adapters, honoring the config allow-list. Runs before any
/// provider is mounted.
pub fn register_adapters(config: &Config) -> Result<()> {
    register_allowed(
        &PROPOSAL_ADAPTERS,
        govkit_proposal::builtin_adapters(),
        config.adapters.proposal.as_deref(),
    )?;
    register_allowed(
        &VOTING_ADAPTERS,
        govkit_voting::builtin_adapters(),
        config.adapters.voting.as_deref(),
    )?;
    Ok(())
}

fn register_allowed<S: AdapterSystem>(
    registry: &GlobalRegistry<S>,
    builtins: Vec<AdapterDefinition<S>>,
    allow: Option<&[String]>,
) -> Result<()> {
    let selected = match allow {
        None => builtins,
        Some(allow) => {
            if let Some(unknown) = allow.iter().find(|id| !builtins.iter().any(|def| def.id() == id.as_str())) {
                return Err(ConfigError::UnknownAdapter {
                    system: S::NAME,
                    id: unknown.clone(),
                }
                .into());
            }
            // Allow-list order is resolution priority
            allow
                .iter()
                .filter_map(|id| builtins.iter().find(|def| def.id() == id.as_str()).cloned())
                .collect()
        }
    };

    registry
        .register(selected)
        .with_context(|| format!("Failed to register {} adapters", S::NAME))
}
