//! External stimulus events a state may intercept.

use prowl_core::TargetId;

/// Whether a state interceptor fully handled a stimulus.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Intercept {
    /// The state handled the stimulus; default agent reaction is suppressed.
    Handled,
    /// The state declined; control returns to the default handling.
    Pass,
}

/// The agent was struck.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitEvent {
    /// Damage to apply under default handling.
    pub damage: i32,
    /// Who struck, if known.
    pub source: Option<TargetId>,
}

impl HitEvent {
    pub fn new(damage: i32, source: Option<TargetId>) -> Self {
        Self { damage, source }
    }
}

/// The agent was stunned.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StunEvent {
    /// Stun length in seconds under default handling.
    pub duration_secs: f32,
    /// Who caused it, if known.
    pub source: Option<TargetId>,
}

impl StunEvent {
    pub fn new(duration_secs: f32, source: Option<TargetId>) -> Self {
        Self { duration_secs, source }
    }
}
