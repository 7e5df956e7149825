//! Navigation-subsystem error type.

use thiserror::Error;

use prowl_core::NodeId;

/// Errors produced by `prowl-nav`.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in mesh")]
    NodeNotFound(NodeId),
}

pub type NavResult<T> = Result<T, NavError>;
