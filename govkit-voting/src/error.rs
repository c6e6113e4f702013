use govkit_types::QueryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VotingError {
    #[error("Chain query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Unexpected {what} response: {message}")]
    Decode { what: &'static str, message: String },

    /// A capability ran before the adapter's bootstrap loaded its config
    #[error("Voting module {0} has not been bootstrapped")]
    NotBootstrapped(String),

    #[error("Voting module {module} holds config for another adapter than {adapter}")]
    ConfigMismatch { module: String, adapter: &'static str },
}

impl VotingError {
    pub(crate) fn decode(what: &'static str, err: serde_json::Error) -> Self {
        VotingError::Decode {
            what,
            message: err.to_string(),
        }
    }
}

pub type VotingResult<T> = Result<T, VotingError>;
