//! `prowl-state` — the unit of agent logic and its wiring.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`kind`]       | `StateKind` — the per-creature state enum contract      |
//! | [`state`]      | `BehaviourState<K>` trait, `StateCtx` tick context      |
//! | [`transition`] | `StateTransition<K>` trait, `When<K>` closure adapter   |
//! | [`registry`]   | `StateRegistry<K>` — kind → factory table               |
//! | [`payload`]    | `InitPayload` — one-shot entry-hook data bag            |
//! | [`events`]     | `HitEvent`, `StunEvent`, `Intercept`                    |
//! | [`error`]      | `StateError`, `StateResult<T>`                          |
//!
//! # Contract summary
//!
//! A state owns its private timers/flags and its outgoing transitions.  The
//! orchestrator calls `on_enter`/`on_exit` exactly paired, drives the three
//! cadence hooks while the agent is alive and authoritative, and polls the
//! transition list in declaration order on the decision cadence — the first
//! satisfied predicate wins and evaluation stops.

pub mod error;
pub mod events;
pub mod kind;
pub mod payload;
pub mod registry;
pub mod state;
pub mod transition;

#[cfg(test)]
mod tests;

pub use error::{StateError, StateResult};
pub use events::{HitEvent, Intercept, StunEvent};
pub use kind::StateKind;
pub use payload::{InitPayload, PayloadValue};
pub use registry::{StateRegistry, StateRegistryBuilder};
pub use state::{BehaviourState, StateCtx};
pub use transition::{first_satisfied, StateTransition, When};
