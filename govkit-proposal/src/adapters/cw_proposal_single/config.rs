//! DAO creation settings for a single-choice proposal module

use super::contract::{Decimal, PercentageThreshold, Threshold};
use crate::error::{ProposalError, ProposalResult};
use govkit_types::Duration;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Threshold or quorum as entered in the creation form. `value` is a percent
/// and is ignored when `majority` is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdValue {
    pub majority: bool,
    pub value: f64,
}

impl ThresholdValue {
    pub fn majority() -> Self {
        Self {
            majority: true,
            value: 0.0,
        }
    }

    pub fn percent(value: f64) -> Self {
        Self {
            majority: false,
            value,
        }
    }

    fn validate(&self, field: &'static str) -> ProposalResult<()> {
        if self.majority {
            return Ok(());
        }
        if !self.value.is_finite() || self.value <= 0.0 || self.value > 100.0 {
            return Err(ProposalError::invalid(
                field,
                format!("{} is not a percent in (0, 100]", self.value),
            ));
        }
        Ok(())
    }

    pub fn to_percentage_threshold(&self) -> PercentageThreshold {
        if self.majority {
            PercentageThreshold::Majority {}
        } else {
            PercentageThreshold::Percent(Decimal::percent(self.value))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnits {
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Blocks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationWithUnits {
    pub value: u64,
    pub units: DurationUnits,
}

impl DurationWithUnits {
    pub fn to_duration(&self) -> Duration {
        let seconds = |factor: u64| Duration::Time(self.value.saturating_mul(factor));
        match self.units {
            DurationUnits::Weeks => seconds(604_800),
            DurationUnits::Days => seconds(86_400),
            DurationUnits::Hours => seconds(3_600),
            DurationUnits::Minutes => seconds(60),
            DurationUnits::Seconds => seconds(1),
            DurationUnits::Blocks => Duration::Height(self.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDeposit {
    /// In display units of the voting token
    pub amount: f64,
    pub refund_failed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaoCreationConfig {
    pub threshold: ThresholdValue,
    pub quorum_enabled: bool,
    pub quorum: ThresholdValue,
    pub voting_duration: DurationWithUnits,
    pub proposal_deposit: ProposalDeposit,
    pub allow_revoting: bool,
}

impl Default for DaoCreationConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdValue::majority(),
            quorum_enabled: true,
            quorum: ThresholdValue::percent(20.0),
            voting_duration: DurationWithUnits {
                value: 1,
                units: DurationUnits::Weeks,
            },
            proposal_deposit: ProposalDeposit {
                amount: 0.0,
                refund_failed: false,
            },
            allow_revoting: false,
        }
    }
}

impl DaoCreationConfig {
    pub fn validate(&self) -> ProposalResult<()> {
        self.threshold.validate("threshold")?;
        if self.quorum_enabled {
            self.quorum.validate("quorum")?;
        }
        if self.voting_duration.value == 0 {
            return Err(ProposalError::invalid("votingDuration", "must be greater than zero"));
        }
        let deposit = self.proposal_deposit.amount;
        if !deposit.is_finite() || deposit < 0.0 {
            return Err(ProposalError::invalid(
                "proposalDeposit",
                format!("{} is not a non-negative amount", deposit),
            ));
        }
        Ok(())
    }

    pub fn threshold(&self) -> Threshold {
        let threshold = self.threshold.to_percentage_threshold();
        if self.quorum_enabled {
            Threshold::ThresholdQuorum {
                threshold,
                quorum: self.quorum.to_percentage_threshold(),
            }
        } else {
            Threshold::AbsolutePercentage {
                percentage: threshold,
            }
        }
    }

    /// Instantiate message for the proposal module. Deposits are converted to
    /// base units with the voting token's `decimals`.
    pub fn instantiate_msg(&self, decimals: u32) -> ProposalResult<Value> {
        self.validate()?;

        let deposit_info = if self.proposal_deposit.amount > 0.0 {
            let base_units = (self.proposal_deposit.amount * 10f64.powi(decimals as i32)).round();
            json!({
                "token": { "voting_module_token": {} },
                "deposit": format!("{}", base_units as u128),
                "refund_failed_proposals": self.proposal_deposit.refund_failed,
            })
        } else {
            Value::Null
        };

        Ok(json!({
            "threshold": self.threshold(),
            "max_voting_period": self.voting_duration.to_duration(),
            "only_members_execute": true,
            "allow_revoting": self.allow_revoting,
            "deposit_info": deposit_info,
        }))
    }
}
