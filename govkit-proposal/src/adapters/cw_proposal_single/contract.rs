//! Query messages and responses of the single-choice proposal contract

use crate::types::{ProcessedTq, ProposalStatus, ProposalSummary, VotesInfo};
use govkit_types::{Duration, Expiration, ProposalId, Uint128};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Value};

/// Fixed-point fraction, sent as a decimal string (`"0.5"`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decimal(pub f64);

impl Decimal {
    pub fn percent(percent: f64) -> Self {
        Decimal(percent / 100.0)
    }

    pub fn to_percent(&self) -> f64 {
        self.0 * 100.0
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fixed = format!("{:.6}", self.0);
        let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
        serializer.serialize_str(trimmed)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .map(Decimal)
            .ok_or_else(|| de::Error::custom(format!("invalid decimal '{}'", raw)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentageThreshold {
    Majority {},
    Percent(Decimal),
}

impl PercentageThreshold {
    pub fn process(&self) -> ProcessedTq {
        match self {
            PercentageThreshold::Majority {} => ProcessedTq::Majority,
            PercentageThreshold::Percent(decimal) => ProcessedTq::Percent(decimal.to_percent()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    AbsolutePercentage {
        percentage: PercentageThreshold,
    },
    ThresholdQuorum {
        threshold: PercentageThreshold,
        quorum: PercentageThreshold,
    },
    AbsoluteCount {
        threshold: Uint128,
    },
}

impl Threshold {
    /// Split into the threshold and optional quorum the UI displays
    pub fn process(&self) -> (ProcessedTq, Option<ProcessedTq>) {
        match self {
            Threshold::AbsolutePercentage { percentage } => (percentage.process(), None),
            Threshold::ThresholdQuorum { threshold, quorum } => {
                (threshold.process(), Some(quorum.process()))
            }
            Threshold::AbsoluteCount { threshold } => {
                (ProcessedTq::AbsoluteCount(threshold.u128()), None)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Votes {
    pub yes: Uint128,
    pub no: Uint128,
    pub abstain: Uint128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleChoiceProposal {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub proposer: String,
    pub start_height: u64,
    pub expiration: Expiration,
    pub threshold: Threshold,
    pub total_power: Uint128,
    #[serde(default)]
    pub msgs: Vec<Value>,
    pub status: ProposalStatus,
    pub votes: Votes,
    #[serde(default)]
    pub allow_revoting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalResponse {
    pub id: u64,
    pub proposal: SingleChoiceProposal,
}

impl ProposalResponse {
    pub fn into_summary(self, prefix: &str) -> ProposalSummary {
        let proposal = self.proposal;
        let (threshold, quorum) = proposal.threshold.process();
        let votes = VotesInfo::compute(
            threshold,
            quorum,
            proposal.votes.yes.u128(),
            proposal.votes.no.u128(),
            proposal.votes.abstain.u128(),
            proposal.total_power.u128(),
        );

        ProposalSummary {
            id: ProposalId::new(prefix, self.id),
            title: proposal.title,
            description: proposal.description,
            proposer: proposal.proposer,
            status: proposal.status,
            start_height: proposal.start_height,
            expiration: proposal.expiration,
            votes,
        }
    }
}

/// Module config as returned by the `config` query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleConfig {
    pub threshold: Threshold,
    pub max_voting_period: Duration,
    #[serde(default)]
    pub only_members_execute: bool,
    #[serde(default)]
    pub allow_revoting: bool,
    pub dao: String,
}

pub fn proposal_query(proposal_id: u64) -> Value {
    json!({ "proposal": { "proposal_id": proposal_id } })
}

pub fn config_query() -> Value {
    json!({ "config": {} })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_quorum_processing() {
        let threshold: Threshold = serde_json::from_value(json!({
            "threshold_quorum": {
                "threshold": { "majority": {} },
                "quorum": { "percent": "0.2" }
            }
        }))
        .unwrap();

        let (threshold, quorum) = threshold.process();
        assert_eq!(threshold, ProcessedTq::Majority);
        match quorum {
            Some(ProcessedTq::Percent(percent)) => assert!((percent - 20.0).abs() < 1e-9),
            other => panic!("unexpected quorum {:?}", other),
        }
    }

    #[test]
    fn test_absolute_count_processing() {
        let threshold: Threshold =
            serde_json::from_value(json!({ "absolute_count": { "threshold": "5" } })).unwrap();
        assert_eq!(threshold.process(), (ProcessedTq::AbsoluteCount(5), None));
    }

    #[test]
    fn test_decimal_encoding() {
        assert_eq!(serde_json::to_value(Decimal::percent(33.3)).unwrap(), json!("0.333"));
        assert_eq!(serde_json::to_value(Decimal::percent(50.0)).unwrap(), json!("0.5"));
        assert!(serde_json::from_value::<Decimal>(json!("abc")).is_err());
    }

    #[test]
    fn test_proposal_response_summary() {
        let response: ProposalResponse = serde_json::from_value(json!({
            "id": 4,
            "proposal": {
                "title": "Fund the treasury",
                "description": "",
                "proposer": "juno1proposer",
                "start_height": 120,
                "expiration": { "at_height": 500 },
                "threshold": { "absolute_percentage": { "percentage": { "majority": {} } } },
                "total_power": "100",
                "msgs": [],
                "status": "open",
                "votes": { "yes": "60", "no": "10", "abstain": "0" },
                "allow_revoting": false
            }
        }))
        .unwrap();

        let summary = response.into_summary("B");
        assert_eq!(summary.id.to_string(), "B4");
        assert!(summary.votes.threshold_reached);
        assert!(summary.is_open());
    }
}
