//! Shared types for govkit
//!
//! This crate provides the chain-facing types used across the govkit
//! ecosystem: contract identifiers, module descriptors, module selectors,
//! prefixed proposal ids and DAO info. Values here are supplied by the
//! chain-data collaborator and are immutable once obtained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod chain;
pub mod query;

pub use chain::{Duration, Expiration, Uint128};
pub use query::{CannedResponse, ChainQuerier, QueryError, StaticQuerier};

/// Errors produced while parsing identifiers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Proposal id is empty")]
    Empty,

    #[error("Proposal id '{0}' has no proposal number")]
    MissingNumber(String),

    #[error("Proposal id '{0}' has an invalid proposal number")]
    InvalidNumber(String),
}

/// Identifier for a deployed contract's code (e.g. `crates.io:cw-proposal-single`)
///
/// Contract ids are opaque. They are compared exactly or through a matcher,
/// never by interpreting version numbers embedded in them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(pub String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContractId {
    fn from(id: &str) -> Self {
        ContractId(id.to_string())
    }
}

impl From<String> for ContractId {
    fn from(id: String) -> Self {
        ContractId(id)
    }
}

/// One installed module of a DAO
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    /// Contract address of the module instance
    pub address: String,
    /// Code identifier of the contract backing the module
    #[serde(alias = "contractName")]
    pub contract_id: ContractId,
    /// Proposal id prefix (only meaningful for proposal modules)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl ModuleDescriptor {
    pub fn new(address: impl Into<String>, contract_id: impl Into<ContractId>) -> Self {
        Self {
            address: address.into(),
            contract_id: contract_id.into(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// The prefix, treating a missing prefix as empty
    pub fn prefix_str(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }
}

/// Chooses which module of a list an adapter binding is made for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "by", content = "value")]
pub enum ModuleSelector {
    /// The module at this contract address
    Address(String),
    /// The module whose proposal prefix equals this value
    Prefix(String),
    /// The first module whose contract id any registered adapter accepts
    FirstMatch,
}

impl ModuleSelector {
    pub fn address(address: impl Into<String>) -> Self {
        ModuleSelector::Address(address.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        ModuleSelector::Prefix(prefix.into())
    }

    /// Whether `module` is a candidate under this selector
    pub fn selects(&self, module: &ModuleDescriptor) -> bool {
        match self {
            ModuleSelector::Address(address) => module.address == *address,
            ModuleSelector::Prefix(prefix) => module.prefix_str() == prefix,
            ModuleSelector::FirstMatch => true,
        }
    }
}

impl fmt::Display for ModuleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleSelector::Address(address) => write!(f, "address '{}'", address),
            ModuleSelector::Prefix(prefix) => write!(f, "prefix '{}'", prefix),
            ModuleSelector::FirstMatch => f.write_str("first match"),
        }
    }
}

/// A proposal id as displayed to users, e.g. `A12`
///
/// The alphabetic prefix names the proposal module and the trailing digits
/// are the proposal number inside that module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProposalId {
    pub prefix: String,
    pub number: u64,
}

impl ProposalId {
    pub fn new(prefix: impl Into<String>, number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            number,
        }
    }

    /// Split a displayed id into prefix and number
    pub fn parse(id: &str) -> Result<Self, IdError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(IdError::Empty);
        }

        let split = id
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| IdError::MissingNumber(id.to_string()))?;
        let (prefix, digits) = id.split_at(split);
        let number = digits
            .parse::<u64>()
            .map_err(|_| IdError::InvalidNumber(id.to_string()))?;

        Ok(Self::new(prefix, number))
    }

    /// Selector for the module this proposal lives in
    pub fn selector(&self) -> ModuleSelector {
        ModuleSelector::Prefix(self.prefix.clone())
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.number)
    }
}

impl std::str::FromStr for ProposalId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProposalId::parse(s)
    }
}

/// Descriptive info about a DAO and its installed modules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaoInfo {
    pub core_address: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    pub voting_module: ModuleDescriptor,
    #[serde(default)]
    pub proposal_modules: Vec<ModuleDescriptor>,
}

impl DaoInfo {
    /// The voting module as a one-element list, for resolution
    pub fn voting_modules(&self) -> Vec<ModuleDescriptor> {
        vec![self.voting_module.clone()]
    }
}
