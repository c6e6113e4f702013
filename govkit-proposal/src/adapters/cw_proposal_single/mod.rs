//! Adapter for single-choice (yes / no / abstain) proposal modules

pub mod config;
pub mod contract;

pub use config::{DaoCreationConfig, DurationUnits, DurationWithUnits, ProposalDeposit, ThresholdValue};
pub use contract::{ModuleConfig, ProposalResponse, Threshold};

use crate::error::{ProposalError, ProposalResult};
use crate::types::{format_percent, NewProposalData, ProposalSummary};
use crate::{ProposalModuleAdapter, ProposalModuleAdapterOptions, ProposalSystem};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use govkit_adapters::{AdapterDefinition, ContractMatcher};
use govkit_types::{Expiration, QueryError};
use serde_json::{json, Value};
use std::sync::Arc;

pub const ADAPTER_ID: &str = "cw-proposal-single";

/// Contract ids this adapter handles
pub const CONTRACT_IDS: [&str; 2] = ["crates.io:cw-proposal-single", "crates.io:cw-govmod-single"];

pub fn adapter() -> AdapterDefinition<ProposalSystem> {
    AdapterDefinition::new(ADAPTER_ID, Arc::new(CwProposalSingle) as Arc<dyn ProposalModuleAdapter>)
        .with_matcher(ContractMatcher::any_of(CONTRACT_IDS))
}

pub struct CwProposalSingle;

impl CwProposalSingle {
    async fn query(
        options: &ProposalModuleAdapterOptions,
        msg: Value,
    ) -> Result<Value, QueryError> {
        options
            .querier
            .query_smart(&options.proposal_module.address, &msg)
            .await
    }
}

impl ProposalModuleAdapter for CwProposalSingle {
    fn load_proposal<'a>(
        &'a self,
        options: &'a ProposalModuleAdapterOptions,
    ) -> BoxFuture<'a, ProposalResult<ProposalSummary>> {
        async move {
            let number = options.require_proposal_number()?;
            let prefix = options.proposal_module.prefix_str();

            let raw = Self::query(options, contract::proposal_query(number))
                .await
                .map_err(|err| match err {
                    QueryError::NotFound { .. } => ProposalError::NotFound(format!("{}{}", prefix, number)),
                    other => ProposalError::Query(other),
                })?;

            let response: ProposalResponse =
                serde_json::from_value(raw).map_err(|err| ProposalError::decode("proposal", err))?;

            tracing::debug!(
                module = %options.proposal_module.address,
                proposal = number,
                status = %response.proposal.status,
                "Loaded proposal"
            );
            Ok(response.into_summary(prefix))
        }
        .boxed()
    }

    fn module_summary<'a>(
        &'a self,
        options: &'a ProposalModuleAdapterOptions,
    ) -> BoxFuture<'a, ProposalResult<String>> {
        async move {
            let raw = Self::query(options, contract::config_query()).await?;
            let config: ModuleConfig =
                serde_json::from_value(raw).map_err(|err| ProposalError::decode("config", err))?;

            let (threshold, quorum) = config.threshold.process();
            let mut summary = format!("Threshold {}", threshold);
            if let Some(quorum) = quorum {
                summary.push_str(&format!(", quorum {}", quorum));
            }
            summary.push_str(&format!(", voting period {}", config.max_voting_period));
            if config.allow_revoting {
                summary.push_str(", revoting allowed");
            }
            Ok(summary)
        }
        .boxed()
    }

    fn proposal_line(&self, options: &ProposalModuleAdapterOptions, proposal: &ProposalSummary) -> String {
        let mut line = format!(
            "{} {} [{}] {}",
            options.logo, proposal.id, proposal.status, proposal.title
        );
        if proposal.is_open() && proposal.expiration != (Expiration::Never {}) {
            line.push_str(&format!(" (expires {})", proposal.expiration));
        }
        line
    }

    fn vote_tally(&self, proposal: &ProposalSummary) -> String {
        let votes = &proposal.votes;
        let reached = |yes: bool| if yes { "reached" } else { "not reached" };

        let mut tally = format!(
            "Yes {}% / No {}% / Abstain {}% | Turnout {}% | Threshold {} {}",
            format_percent(votes.turnout_yes_percent),
            format_percent(votes.turnout_no_percent),
            format_percent(votes.turnout_abstain_percent),
            format_percent(votes.turnout_percent),
            votes.threshold,
            reached(votes.threshold_reached),
        );
        if let Some(quorum) = votes.quorum {
            tally.push_str(&format!(" | Quorum {} {}", quorum, reached(votes.quorum_reached)));
        }
        tally
    }

    fn new_proposal_msg(&self, data: &NewProposalData) -> ProposalResult<Value> {
        if data.title.trim().is_empty() {
            return Err(ProposalError::invalid("title", "must not be empty"));
        }

        Ok(json!({
            "propose": {
                "title": data.title,
                "description": data.description,
                "msgs": data.msgs,
            }
        }))
    }
}
