//! Framework error type.
//!
//! Sub-crates define their own error enums and either convert into
//! `CoreError` via `From` impls or keep them separate; prefer whichever keeps
//! error sites clean.  Perception/search edge cases are *not* errors — those
//! surface as conservative enum/`Option` values.

use thiserror::Error;

use crate::{AgentId, NodeId};

/// The top-level error type for `prowl-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("nav node {0} not found")]
    NodeNotFound(NodeId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `prowl-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
