use govkit_types::{Duration, Uint128};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Auxiliary config a voting adapter loads during bootstrap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum VotingModuleConfig {
    Cw4 {
        group_address: String,
    },
    Cw20Staked {
        token_address: String,
        staking_address: String,
        token: TokenInfo,
    },
    NativeStaked {
        denom: String,
        unstaking_duration: Option<Duration>,
    },
}

/// cw20 `token_info` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub total_supply: Uint128,
}

/// `voting_power_at_height` / `total_power_at_height` response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerResponse {
    pub power: Uint128,
    pub height: u64,
}

/// A member's voting power relative to the DAO total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingPower {
    pub power: Uint128,
    pub total: Uint128,
    pub height: u64,
}

impl VotingPower {
    pub fn percent(&self) -> f64 {
        if self.total.is_zero() {
            0.0
        } else {
            self.power.as_f64() / self.total.as_f64() * 100.0
        }
    }
}

impl fmt::Display for VotingPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} ({:.2}%) at height {}",
            self.power,
            self.total,
            self.percent(),
            self.height
        )
    }
}

/// Render a base-unit amount in display units, trimming trailing zeros
pub fn format_amount(amount: Uint128, decimals: u32) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let decimals = decimals.min(38);
    let scale = 10u128.pow(decimals);
    let whole = amount.u128() / scale;
    let frac = amount.u128() % scale;
    if frac == 0 {
        return whole.to_string();
    }

    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
