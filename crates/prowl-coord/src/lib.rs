//! `prowl-coord` — process-wide claim bookkeeping between agents.
//!
//! # Crate layout
//!
//! | Module    | Contents                                       |
//! |-----------|------------------------------------------------|
//! | [`table`] | `CoordTable`, `Relationship`, `RallyPoint`     |
//!
//! The table answers "who already holds this target / this spot" so two
//! agents never double-claim.  It is a dependency-injected service owned by
//! the tick driver — never a global — so every test constructs its own.
//!
//! # Discipline
//!
//! The table is mutated only by the authoritative side, from state
//! entry/exit logic, on the single update thread; no locking is needed.
//! Every exit path of a claiming state (death, forced transition, stun
//! override) must unbind, or the claim leaks until the next round flush.

pub mod table;


pub use table::{CoordTable, RallyPoint, Relationship};
