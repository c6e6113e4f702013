//! Contract matchers
//!
//! A matcher decides whether an adapter supports a given contract id. Matchers
//! never interpret version numbers; a new contract version is supported by
//! adding it to a matcher, not by comparing versions.

use govkit_types::ContractId;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

type MatchFn = Arc<dyn Fn(&ContractId) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum ContractMatcher {
    /// Exactly this contract id
    Exact(ContractId),
    /// Any contract id in the set
    AnyOf(BTreeSet<ContractId>),
    /// Contract ids starting with the prefix
    Prefix(String),
    /// Contract ids matching the regular expression
    Pattern(Regex),
    /// Arbitrary predicate
    Custom(MatchFn),
}

impl ContractMatcher {
    pub fn exact(id: impl Into<ContractId>) -> Self {
        ContractMatcher::Exact(id.into())
    }

    pub fn any_of<I, C>(ids: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ContractId>,
    {
        ContractMatcher::AnyOf(ids.into_iter().map(Into::into).collect())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        ContractMatcher::Prefix(prefix.into())
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(ContractMatcher::Pattern(Regex::new(pattern)?))
    }

    pub fn custom(predicate: impl Fn(&ContractId) -> bool + Send + Sync + 'static) -> Self {
        ContractMatcher::Custom(Arc::new(predicate))
    }

    pub fn matches(&self, contract_id: &ContractId) -> bool {
        match self {
            ContractMatcher::Exact(id) => id == contract_id,
            ContractMatcher::AnyOf(ids) => ids.contains(contract_id),
            ContractMatcher::Prefix(prefix) => contract_id.as_str().starts_with(prefix.as_str()),
            ContractMatcher::Pattern(regex) => regex.is_match(contract_id.as_str()),
            ContractMatcher::Custom(predicate) => predicate(contract_id),
        }
    }
}

impl fmt::Display for ContractMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractMatcher::Exact(id) => write!(f, "{}", id),
            ContractMatcher::AnyOf(ids) => {
                let ids: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
                write!(f, "{{{}}}", ids.join(", "))
            }
            ContractMatcher::Prefix(prefix) => write!(f, "{}*", prefix),
            ContractMatcher::Pattern(regex) => write!(f, "/{}/", regex.as_str()),
            ContractMatcher::Custom(_) => f.write_str("<custom>"),
        }
    }
}

impl fmt::Debug for ContractMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContractMatcher({})", self)
    }
}

impl From<&str> for ContractMatcher {
    fn from(id: &str) -> Self {
        ContractMatcher::exact(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ContractId {
        ContractId::new(s)
    }

    #[test]
    fn test_exact() {
        let m = ContractMatcher::exact("pkg:x-v1");
        assert!(m.matches(&id("pkg:x-v1")));
        assert!(!m.matches(&id("pkg:x-v1.1")));
    }

    #[test]
    fn test_any_of() {
        let m = ContractMatcher::any_of(["crates.io:cw-proposal-single", "crates.io:cw-govmod-single"]);
        assert!(m.matches(&id("crates.io:cw-govmod-single")));
        assert!(!m.matches(&id("crates.io:cw-proposal-multiple")));
    }

    #[test]
    fn test_prefix() {
        let m = ContractMatcher::prefix("pkg:x-");
        assert!(m.matches(&id("pkg:x-v2")));
        assert!(!m.matches(&id("pkg:y")));
    }

    #[test]
    fn test_pattern() {
        let m = ContractMatcher::pattern(r"^crates\.io:cw20-stake(d-balance)?-voting$").unwrap();
        assert!(m.matches(&id("crates.io:cw20-staked-balance-voting")));
        assert!(m.matches(&id("crates.io:cw20-stake-voting")));
        assert!(!m.matches(&id("crates.io:cw4-voting")));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(ContractMatcher::pattern("(").is_err());
    }

    #[test]
    fn test_custom() {
        let m = ContractMatcher::custom(|c| c.as_str().contains("cw4"));
        assert!(m.matches(&id("crates.io:cw4-voting")));
        assert!(!m.matches(&id("crates.io:cw20-staked-balance-voting")));
    }

    #[test]
    fn test_display() {
        assert_eq!(ContractMatcher::prefix("pkg:").to_string(), "pkg:*");
        assert_eq!(ContractMatcher::any_of(["b", "a"]).to_string(), "{a, b}");
        assert_eq!(ContractMatcher::custom(|_| true).to_string(), "<custom>");
    }
}
