//! Chain query collaborator
//!
//! Adapters read contract state through a [`ChainQuerier`]. Talking to a node
//! is outside govkit; the querier is supplied by the embedding application.
//! [`StaticQuerier`] answers from canned responses and backs fixtures.

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No response for query {query} on contract {contract}")]
    NotFound { contract: String, query: String },

    #[error("Query failed: {0}")]
    Failed(String),
}

/// Smart-query access to contract state
pub trait ChainQuerier: Send + Sync {
    fn query_smart<'a>(
        &'a self,
        contract: &'a str,
        msg: &'a Value,
    ) -> BoxFuture<'a, Result<Value, QueryError>>;
}

/// One canned query response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CannedResponse {
    pub contract: String,
    pub query: Value,
    pub response: Value,
}

/// Querier answering from a fixed list of responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticQuerier {
    responses: Vec<CannedResponse>,
}

impl StaticQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, contract: impl Into<String>, query: Value, response: Value) -> Self {
        self.insert(contract, query, response);
        self
    }

    pub fn insert(&mut self, contract: impl Into<String>, query: Value, response: Value) {
        self.responses.push(CannedResponse {
            contract: contract.into(),
            query,
            response,
        });
    }

    pub fn extend(&mut self, responses: impl IntoIterator<Item = CannedResponse>) {
        self.responses.extend(responses);
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    fn lookup(&self, contract: &str, msg: &Value) -> Result<Value, QueryError> {
        self.responses
            .iter()
            .find(|r| r.contract == contract && r.query == *msg)
            .map(|r| r.response.clone())
            .ok_or_else(|| QueryError::NotFound {
                contract: contract.to_string(),
                query: msg.to_string(),
            })
    }
}

impl ChainQuerier for StaticQuerier {
    fn query_smart<'a>(
        &'a self,
        contract: &'a str,
        msg: &'a Value,
    ) -> BoxFuture<'a, Result<Value, QueryError>> {
        future::ready(self.lookup(contract, msg)).boxed()
    }
}
