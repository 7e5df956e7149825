//! Orchestrator error type.

use thiserror::Error;

use prowl_core::AgentId;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("driver configuration error: {0}")]
    Config(String),

    /// A spawned agent had no instantiable states — it is removed from the
    /// world rather than run half-initialized.
    #[error("agent {0} has no registered states")]
    NoStatesRegistered(AgentId),

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
