//! Error types for adapter registration, resolution and scoped access.

use govkit_types::ModuleSelector;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Two definitions share an id. This is a configuration bug.
    #[error("Duplicate {system} adapter id: {id}")]
    DuplicateAdapterId { system: &'static str, id: String },

    /// Modules exist but none of their contracts is supported.
    #[error("No {system} adapter matches contract(s): {}", .contract_ids.join(", "))]
    NoMatchingAdapter {
        system: &'static str,
        contract_ids: Vec<String>,
    },

    /// An explicit selector named a module that is not installed.
    #[error("No {system} module found for {selector}")]
    ModuleNotFound {
        system: &'static str,
        selector: ModuleSelector,
    },

    /// An accessor was used outside a resolved provider.
    #[error("{system} adapter accessed outside a resolved provider")]
    MissingProviderContext { system: &'static str },

    #[error("Adapter '{adapter}' failed to bootstrap: {message}")]
    Bootstrap { adapter: String, message: String },

    #[error("Adapter '{adapter}' needs an async runtime to bootstrap")]
    NoRuntime { adapter: String },
}

impl AdapterError {
    /// Whether the caller can do something about the error (show an
    /// "unsupported module" state, retry, upgrade) as opposed to a wiring bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AdapterError::NoMatchingAdapter { .. }
                | AdapterError::ModuleNotFound { .. }
                | AdapterError::Bootstrap { .. }
        )
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_adapter_message() {
        let err = AdapterError::NoMatchingAdapter {
            system: "proposal",
            contract_ids: vec!["pkg:a".to_string(), "pkg:b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "No proposal adapter matches contract(s): pkg:a, pkg:b"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_wiring_errors_are_not_recoverable() {
        let err = AdapterError::MissingProviderContext { system: "voting" };
        assert!(!err.is_recoverable());

        let err = AdapterError::DuplicateAdapterId {
            system: "voting",
            id: "cw4".to_string(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "Duplicate voting adapter id: cw4");
    }
}
