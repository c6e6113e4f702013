//! Proposal data shared by every proposal module adapter

use crate::error::{ProposalError, ProposalResult};
use chrono::{DateTime, Utc};
use govkit_types::{Expiration, ProposalId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Open,
    Rejected,
    Passed,
    Executed,
    Closed,
    ExecutionFailed,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProposalStatus::Open => "Open",
            ProposalStatus::Rejected => "Rejected",
            ProposalStatus::Passed => "Passed",
            ProposalStatus::Executed => "Executed",
            ProposalStatus::Closed => "Closed",
            ProposalStatus::ExecutionFailed => "Execution failed",
        };
        f.write_str(label)
    }
}

/// Threshold or quorum, reduced to what the UI displays and compares
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum ProcessedTq {
    Majority,
    /// Percent in `0..=100`
    Percent(f64),
    AbsoluteCount(u128),
}

impl fmt::Display for ProcessedTq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessedTq::Majority => f.write_str("Majority"),
            ProcessedTq::Percent(percent) => write!(f, "{}%", format_percent(*percent)),
            ProcessedTq::AbsoluteCount(count) => write!(f, "{}", count),
        }
    }
}

/// Vote totals with the derived percentages and outcome flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotesInfo {
    pub threshold: ProcessedTq,
    pub quorum: Option<ProcessedTq>,

    pub yes_votes: u128,
    pub no_votes: u128,
    pub abstain_votes: u128,
    pub total_voting_power: u128,
    pub turnout_total: u128,

    pub turnout_percent: f64,
    pub turnout_yes_percent: f64,
    pub turnout_no_percent: f64,
    pub turnout_abstain_percent: f64,

    pub total_yes_percent: f64,
    pub total_no_percent: f64,
    pub total_abstain_percent: f64,

    pub threshold_reached: bool,
    /// Always true when there is no quorum
    pub quorum_reached: bool,
}

impl VotesInfo {
    pub fn compute(
        threshold: ProcessedTq,
        quorum: Option<ProcessedTq>,
        yes: u128,
        no: u128,
        abstain: u128,
        total_power: u128,
    ) -> Self {
        let turnout_total = yes.saturating_add(no).saturating_add(abstain);
        let turnout_percent = percent_of(turnout_total, total_power);

        // With a quorum the threshold applies to turnout, otherwise to all power.
        // Abstentions never count toward the base.
        let base = if quorum.is_some() { turnout_total } else { total_power };
        let base = base.saturating_sub(abstain) as f64;

        let threshold_reached = yes > 0
            && match threshold {
                ProcessedTq::Majority => yes as f64 > base / 2.0,
                ProcessedTq::Percent(percent) => yes as f64 >= base * percent / 100.0,
                ProcessedTq::AbsoluteCount(count) => yes >= count,
            };

        let quorum_reached = match quorum {
            None => true,
            Some(ProcessedTq::Majority) => turnout_total as f64 > total_power as f64 / 2.0,
            Some(ProcessedTq::Percent(percent)) => turnout_percent >= percent,
            Some(ProcessedTq::AbsoluteCount(count)) => turnout_total >= count,
        };

        Self {
            threshold,
            quorum,
            yes_votes: yes,
            no_votes: no,
            abstain_votes: abstain,
            total_voting_power: total_power,
            turnout_total,
            turnout_percent,
            turnout_yes_percent: percent_of(yes, turnout_total),
            turnout_no_percent: percent_of(no, turnout_total),
            turnout_abstain_percent: percent_of(abstain, turnout_total),
            total_yes_percent: percent_of(yes, total_power),
            total_no_percent: percent_of(no, total_power),
            total_abstain_percent: percent_of(abstain, total_power),
            threshold_reached,
            quorum_reached,
        }
    }

    pub fn is_passing(&self) -> bool {
        self.threshold_reached && self.quorum_reached
    }
}

fn percent_of(part: u128, whole: u128) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Percent with at most two decimals and no trailing zeros
pub fn format_percent(percent: f64) -> String {
    let rounded = format!("{:.2}", percent);
    rounded
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// One proposal as loaded by an adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalSummary {
    pub id: ProposalId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub proposer: String,
    pub status: ProposalStatus,
    pub start_height: u64,
    pub expiration: Expiration,
    pub votes: VotesInfo,
}

impl ProposalSummary {
    pub fn is_open(&self) -> bool {
        self.status == ProposalStatus::Open
    }

    /// Seconds until voting closes. Height expirations are estimated from the
    /// clock's block time. `None` for proposals that never expire.
    pub fn seconds_remaining(&self, clock: &ChainClock) -> Option<i64> {
        match self.expiration {
            Expiration::AtHeight(height) => {
                let blocks = height.saturating_sub(clock.height);
                Some(i64::try_from(blocks.saturating_mul(clock.block_seconds)).unwrap_or(i64::MAX))
            }
            Expiration::AtTime(_) => self
                .expiration
                .at_time()
                .map(|expires| (expires - clock.now).num_seconds().max(0)),
            Expiration::Never {} => None,
        }
    }
}

/// Current chain position used to estimate when height-based expirations land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainClock {
    pub now: DateTime<Utc>,
    pub height: u64,
    /// Average seconds per block
    pub block_seconds: u64,
}

impl ChainClock {
    pub const DEFAULT_BLOCK_SECONDS: u64 = 6;

    pub fn new(now: DateTime<Utc>, height: u64) -> Self {
        Self {
            now,
            height,
            block_seconds: Self::DEFAULT_BLOCK_SECONDS,
        }
    }

    pub fn with_block_seconds(mut self, block_seconds: u64) -> Self {
        self.block_seconds = block_seconds;
        self
    }
}

/// An action picked in the new-proposal form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionKeyAndData {
    pub key: String,
    #[serde(default)]
    pub data: Value,
}

impl ActionKeyAndData {
    pub fn new(key: impl Into<String>, data: Value) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }
}

/// What the user fills in to create a proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProposalForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub action_data: Vec<ActionKeyAndData>,
}

impl NewProposalForm {
    /// Convert form actions into chain messages. `convert` may return `None`
    /// for actions that produce no message.
    pub fn into_data<F>(self, mut convert: F) -> ProposalResult<NewProposalData>
    where
        F: FnMut(&ActionKeyAndData) -> ProposalResult<Option<Value>>,
    {
        let mut msgs = Vec::with_capacity(self.action_data.len());
        for action in &self.action_data {
            if let Some(msg) = convert(action)? {
                msgs.push(msg);
            }
        }

        Ok(NewProposalData {
            title: self.title,
            description: self.description,
            msgs,
        })
    }
}

/// Form data with actions converted to messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProposalData {
    pub title: String,
    pub description: String,
    pub msgs: Vec<Value>,
}

/// Converter for the `custom` action, whose `message` is raw message JSON
pub fn custom_action(action: &ActionKeyAndData) -> ProposalResult<Option<Value>> {
    if action.key != "custom" {
        return Err(ProposalError::invalid(
            "action",
            format!("unsupported action '{}'", action.key),
        ));
    }

    match action.data.get("message") {
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|err| ProposalError::invalid("action", format!("custom message: {}", err))),
        Some(msg @ Value::Object(_)) => Ok(Some(msg.clone())),
        _ => Err(ProposalError::invalid("action", "custom action has no message")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(expiration: Expiration) -> ProposalSummary {
        ProposalSummary {
            id: ProposalId::new("A", 1),
            title: "Title".to_string(),
            description: String::new(),
            proposer: "juno1alice".to_string(),
            status: ProposalStatus::Open,
            start_height: 50,
            expiration,
            votes: VotesInfo::compute(ProcessedTq::Majority, None, 0, 0, 0, 10),
        }
    }

    #[test]
    fn test_majority_without_quorum_uses_total_power() {
        let votes = VotesInfo::compute(ProcessedTq::Majority, None, 50, 10, 0, 100);
        assert!(!votes.threshold_reached);
        assert!(votes.quorum_reached);

        let votes = VotesInfo::compute(ProcessedTq::Majority, None, 51, 10, 0, 100);
        assert!(votes.threshold_reached);
        assert!(votes.is_passing());
    }

    #[test]
    fn test_quorum_makes_threshold_relative_to_turnout() {
        let quorum = Some(ProcessedTq::Percent(20.0));
        let votes = VotesInfo::compute(ProcessedTq::Majority, quorum, 15, 5, 10, 100);

        assert_eq!(votes.turnout_total, 30);
        assert!((votes.turnout_percent - 30.0).abs() < f64::EPSILON);
        // base is 30 - 10 abstain = 20
        assert!(votes.threshold_reached);
        assert!(votes.quorum_reached);
    }

    #[test]
    fn test_quorum_not_reached() {
        let quorum = Some(ProcessedTq::Percent(50.0));
        let votes = VotesInfo::compute(ProcessedTq::Percent(50.0), quorum, 20, 0, 0, 100);
        assert!(votes.threshold_reached);
        assert!(!votes.quorum_reached);
        assert!(!votes.is_passing());
    }

    #[test]
    fn test_all_abstain_never_passes() {
        let votes = VotesInfo::compute(ProcessedTq::Percent(0.0), None, 0, 0, 100, 100);
        assert!(!votes.threshold_reached);
    }

    #[test]
    fn test_turnout_saturates_instead_of_overflowing() {
        let info = VotesInfo::compute(ProcessedTq::Majority, None, u128::MAX, 1, 0, u128::MAX);
        assert!(info.threshold_reached);
        assert_eq!(format_percent(info.turnout_percent), "100");
    }

    #[test]
    fn test_seconds_remaining_estimates_heights() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ChainClock::new(now, 100);
        let mut proposal = summary(Expiration::AtHeight(110));
        assert_eq!(proposal.seconds_remaining(&clock), Some(60));
        assert_eq!(proposal.seconds_remaining(&clock.with_block_seconds(2)), Some(20));

        proposal.expiration = Expiration::AtHeight(90);
        assert_eq!(proposal.seconds_remaining(&clock), Some(0));

        proposal.expiration = Expiration::AtTime(1_700_000_300 * 1_000_000_000);
        assert_eq!(proposal.seconds_remaining(&clock), Some(300));

        proposal.expiration = Expiration::Never {};
        assert_eq!(proposal.seconds_remaining(&clock), None);
    }

    #[test]
    fn test_absolute_count() {
        let votes = VotesInfo::compute(ProcessedTq::AbsoluteCount(3), None, 3, 9, 0, 20);
        assert!(votes.threshold_reached);
    }

    #[test]
    fn test_zero_power_percentages() {
        let votes = VotesInfo::compute(ProcessedTq::Majority, None, 0, 0, 0, 0);
        assert_eq!(votes.turnout_percent, 0.0);
        assert_eq!(votes.turnout_yes_percent, 0.0);
    }

    #[test]
    fn test_processed_tq_display() {
        assert_eq!(ProcessedTq::Majority.to_string(), "Majority");
        assert_eq!(ProcessedTq::Percent(33.333).to_string(), "33.33%");
        assert_eq!(ProcessedTq::Percent(50.0).to_string(), "50%");
        assert_eq!(ProcessedTq::AbsoluteCount(7).to_string(), "7");
    }

    #[test]
    fn test_form_into_data() {
        let form = NewProposalForm {
            title: "Fund".to_string(),
            description: "Send funds".to_string(),
            action_data: vec![
                ActionKeyAndData::new("custom", json!({"message": r#"{"bank":{"send":{}}}"#})),
                ActionKeyAndData::new("custom", json!({"message": ""})),
                ActionKeyAndData::new("custom", json!({"message": {"wasm": {}}})),
            ],
        };

        let data = form.into_data(custom_action).unwrap();
        assert_eq!(data.msgs, vec![json!({"bank": {"send": {}}}), json!({"wasm": {}})]);
    }

    #[test]
    fn test_form_rejects_unknown_action() {
        let form = NewProposalForm {
            title: "t".to_string(),
            description: String::new(),
            action_data: vec![ActionKeyAndData::new("spend", json!({}))],
        };

        let err = form.into_data(custom_action).unwrap_err();
        assert!(matches!(err, ProposalError::Invalid { field: "action", .. }));
    }
}
