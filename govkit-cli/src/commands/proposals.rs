//! Proposal inbox and single proposal view.

use crate::config::{Config, DaoConfig};
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::ValueEnum;
use futures_util::future::join_all;
use govkit_adapters::{AdapterScope, ProviderPhase};
use govkit_proposal::{
    mount_for_proposal, proposal_adapter, proposal_adapter_options, ChainClock, ProposalInitialOptions,
    ProposalSummary, ProposalSystem,
};
use govkit_types::{ChainQuerier, ProposalId};
use std::cmp::Ordering;
use std::sync::Arc;

/// Inbox ordering
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum InboxSort {
    /// Soonest to close first
    Expiry,
    /// Most recently started first
    Newest,
    /// Least recently started first
    Oldest,
}

impl InboxSort {
    fn compare(&self, a: &InboxLine, b: &InboxLine) -> Ordering {
        match self {
            InboxSort::Expiry => a
                .seconds_remaining
                .unwrap_or(i64::MAX)
                .cmp(&b.seconds_remaining.unwrap_or(i64::MAX)),
            InboxSort::Newest => b.start_height().cmp(&a.start_height()),
            InboxSort::Oldest => a
                .start_height()
                .unwrap_or(u64::MAX)
                .cmp(&b.start_height().unwrap_or(u64::MAX)),
        }
    }
}

#[derive(Debug)]
struct InboxLine {
    text: String,
    proposal: Option<ProposalSummary>,
    seconds_remaining: Option<i64>,
}

impl InboxLine {
    fn unavailable(text: String) -> Self {
        Self {
            text,
            proposal: None,
            seconds_remaining: None,
        }
    }

    fn start_height(&self) -> Option<u64> {
        self.proposal.as_ref().map(|p| p.start_height)
    }

    /// Closed proposals drop out; lines that failed to load stay visible
    fn is_shown(&self) -> bool {
        self.proposal.as_ref().map_or(true, ProposalSummary::is_open)
    }
}

fn initial_options(config: &Config, dao: &DaoConfig, querier: Arc<dyn ChainQuerier>) -> ProposalInitialOptions {
    ProposalInitialOptions::new(dao.info.core_address.clone(), querier)
        .with_display(config.display.logo.clone(), config.display.loader.clone())
}

async fn load(scope: &AdapterScope<ProposalSystem>) -> Result<(String, ProposalSummary)> {
    let adapter = proposal_adapter(scope)?;
    let options = proposal_adapter_options(scope)?;
    let proposal = adapter.load_proposal(&options).await?;
    Ok((adapter.proposal_line(&options, &proposal), proposal))
}

async fn inbox_line(config: &Config, dao: &DaoConfig, raw_id: &str, querier: Arc<dyn ChainQuerier>) -> InboxLine {
    let logo = &config.display.logo;
    let id = match ProposalId::parse(raw_id) {
        Ok(id) => id,
        Err(err) => return InboxLine::unavailable(format!("{} {} invalid id: {}", logo, raw_id, err)),
    };

    let provider = mount_for_proposal(&dao.info.proposal_modules, &id, initial_options(config, dao, querier));
    provider.ready().await;

    let scope = match provider.render(|| None, |scope| Some(scope.clone())) {
        Ok(Some(Some(scope))) => scope,
        Ok(Some(None)) => return InboxLine::unavailable(format!("{} {} {}", logo, id, config.display.loader)),
        Ok(None) => return InboxLine::unavailable(format!("{} {} no proposal modules", logo, id)),
        Err(err) => return InboxLine::unavailable(format!("{} {} unavailable: {}", logo, id, err)),
    };

    match load(&scope).await {
        Ok((text, proposal)) => InboxLine {
            text,
            proposal: Some(proposal),
            seconds_remaining: None,
        },
        Err(err) => {
            tracing::warn!(dao = %dao.info.name, proposal = %id, error = %err, "Failed to load proposal");
            InboxLine::unavailable(format!("{} {} failed to load: {}", logo, id, err))
        }
    }
}

/// Estimate of where the chain is now
fn chain_clock<'a>(config: &Config, lines: impl Iterator<Item = &'a InboxLine>) -> ChainClock {
    let height = config
        .chain
        .height
        .unwrap_or_else(|| lines.filter_map(InboxLine::start_height).max().unwrap_or(0));
    ChainClock::new(Utc::now(), height).with_block_seconds(config.chain.block_seconds)
}

/// Render every open proposal, grouped by DAO
pub async fn inbox(config: &Config, dao: Option<&str>, sort: InboxSort) -> Result<()> {
    let querier: Arc<dyn ChainQuerier> = Arc::new(config.querier()?);

    let mut groups = Vec::new();
    for dao in config.select_daos(dao)? {
        let lines = join_all(
            dao.proposals
                .iter()
                .map(|id| inbox_line(config, dao, id, Arc::clone(&querier))),
        )
        .await;
        let lines: Vec<InboxLine> = lines.into_iter().filter(InboxLine::is_shown).collect();
        if !lines.is_empty() {
            groups.push((dao, lines));
        }
    }

    let clock = chain_clock(config, groups.iter().flat_map(|(_, lines)| lines.iter()));
    tracing::debug!(height = clock.height, "Estimating expirations");
    for (_, lines) in groups.iter_mut() {
        for line in lines.iter_mut() {
            line.seconds_remaining = line.proposal.as_ref().and_then(|p| p.seconds_remaining(&clock));
        }
        lines.sort_by(|a, b| sort.compare(a, b));
    }
    groups.sort_by(|(_, a), (_, b)| match (a.first(), b.first()) {
        (Some(a), Some(b)) => sort.compare(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let open = groups
        .iter()
        .flat_map(|(_, lines)| lines.iter())
        .filter(|line| line.proposal.is_some())
        .count();
    println!("{} open proposals", open);
    for (dao, lines) in &groups {
        println!("{}", dao.info.name);
        for line in lines {
            println!("  {}", line.text);
        }
    }
    Ok(())
}

/// Render one proposal with its vote tally
pub async fn show_proposal(config: &Config, dao: Option<&str>, raw_id: &str) -> Result<()> {
    let dao = config.dao(dao)?;
    let id = ProposalId::parse(raw_id).with_context(|| format!("Invalid proposal id '{}'", raw_id))?;
    let querier: Arc<dyn ChainQuerier> = Arc::new(config.querier()?);

    let provider = mount_for_proposal(&dao.info.proposal_modules, &id, initial_options(config, dao, querier));
    match provider.ready().await {
        ProviderPhase::Resolved => {}
        ProviderPhase::NoModules => return Err(anyhow!("{} has no proposal modules", dao.info.name)),
        _ => {
            let err = provider
                .error()
                .map(anyhow::Error::from)
                .unwrap_or_else(|| anyhow!("provider for {} was torn down", id));
            return Err(err.context(format!("Cannot show proposal {}", id)));
        }
    }

    let scope = provider.scope();
    let adapter = proposal_adapter(&scope)?;
    let options = proposal_adapter_options(&scope)?;
    let proposal = adapter
        .load_proposal(&options)
        .await
        .with_context(|| format!("Failed to load proposal {}", id))?;

    println!("{}", adapter.proposal_line(&options, &proposal));
    println!("  Proposer: {}", proposal.proposer);
    println!("  {}", adapter.vote_tally(&proposal));
    if !proposal.description.is_empty() {
        println!();
        println!("{}", proposal.description);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use govkit_proposal::{ProcessedTq, ProposalStatus, VotesInfo};
    use govkit_types::Expiration;

    fn line(seconds_remaining: Option<i64>, start_height: Option<u64>) -> InboxLine {
        InboxLine {
            text: String::new(),
            proposal: start_height.map(|height| proposal(height, ProposalStatus::Open)),
            seconds_remaining,
        }
    }

    fn proposal(start_height: u64, status: ProposalStatus) -> ProposalSummary {
        ProposalSummary {
            id: ProposalId::new("A", 1),
            title: "Title".to_string(),
            description: String::new(),
            proposer: "juno1alice".to_string(),
            status,
            start_height,
            expiration: Expiration::AtHeight(start_height + 100),
            votes: VotesInfo::compute(ProcessedTq::Majority, None, 0, 0, 0, 10),
        }
    }

    #[test]
    fn test_expiry_puts_unknown_last() {
        let mut lines = vec![line(None, None), line(Some(30), None), line(Some(10), None)];
        lines.sort_by(|a, b| InboxSort::Expiry.compare(a, b));
        let order: Vec<_> = lines.iter().map(|l| l.seconds_remaining).collect();
        assert_eq!(order, vec![Some(10), Some(30), None]);
    }

    #[test]
    fn test_newest_and_oldest() {
        let mut lines = vec![line(None, Some(5)), line(None, None), line(None, Some(9))];

        lines.sort_by(|a, b| InboxSort::Newest.compare(a, b));
        let order: Vec<_> = lines.iter().map(|l| l.start_height()).collect();
        assert_eq!(order, vec![Some(9), Some(5), None]);

        lines.sort_by(|a, b| InboxSort::Oldest.compare(a, b));
        let order: Vec<_> = lines.iter().map(|l| l.start_height()).collect();
        assert_eq!(order, vec![Some(5), Some(9), None]);
    }

    #[test]
    fn test_closed_proposals_are_hidden() {
        let mut closed = line(None, Some(5));
        if let Some(p) = closed.proposal.as_mut() {
            p.status = ProposalStatus::Executed;
        }
        assert!(!closed.is_shown());
        assert!(line(None, Some(5)).is_shown());
        assert!(InboxLine::unavailable("> B1 unavailable".to_string()).is_shown());
    }

    #[test]
    fn test_chain_clock_defaults_to_highest_start_height() {
        let mut config = Config::default();
        let lines = vec![line(None, Some(5)), line(None, None), line(None, Some(9))];
        assert_eq!(chain_clock(&config, lines.iter()).height, 9);

        config.chain.height = Some(40);
        config.chain.block_seconds = 2;
        let clock = chain_clock(&config, lines.iter());
        assert_eq!(clock.height, 40);
        assert_eq!(clock.block_seconds, 2);
    }
}
