use govkit_types::QueryError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProposalError {
    #[error("Chain query failed: {0}")]
    Query(#[from] QueryError),

    #[error("Unexpected {what} response: {message}")]
    Decode { what: &'static str, message: String },

    #[error("Proposal {0} not found")]
    NotFound(String),

    #[error("No proposal number in the adapter options")]
    MissingProposalNumber,

    #[error("Invalid {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ProposalError {
    pub(crate) fn decode(what: &'static str, err: serde_json::Error) -> Self {
        ProposalError::Decode {
            what,
            message: err.to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ProposalError::Invalid {
            field,
            message: message.into(),
        }
    }
}

pub type ProposalResult<T> = Result<T, ProposalError>;
