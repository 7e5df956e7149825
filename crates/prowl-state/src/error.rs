//! State-subsystem error type.
//!
//! An `Err` from an enter/exit hook models a contained hook failure: the
//! orchestrator logs it and completes the switch anyway, so the error never
//! propagates past the switch site.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    /// An enter/exit hook could not do its work.
    #[error("state hook failed: {0}")]
    Hook(String),

    /// A companion object the state requires was absent.
    #[error("missing companion object: {0}")]
    MissingDependency(&'static str),
}

pub type StateResult<T> = Result<T, StateError>;
