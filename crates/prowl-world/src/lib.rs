//! `prowl-world` — shared world state the behavioral core reads and writes.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`roster`]      | `Roster` — SoA storage of observable entities (targets/observers) |
//! | [`body`]        | `AgentBody`, `MoveIntent`, `Role` — per-creature mutable record   |
//! | [`eligibility`] | `EligibilityPolicy` — AND-composed candidate predicates    |
//! | [`replicated`]  | `Replicated<T>` — published value with change observers    |
//!
//! The roster is the *world* as creatures perceive it; agent bodies are the
//! creatures' own authoritative records.  Decision logic only ever runs on
//! the authoritative side; observers mirror `Replicated` values.

pub mod body;
pub mod eligibility;
pub mod replicated;
pub mod roster;


pub use body::{AgentBody, MoveIntent, Role};
pub use eligibility::EligibilityPolicy;
pub use replicated::{Replicated, SubscriberHandle};
pub use roster::Roster;
