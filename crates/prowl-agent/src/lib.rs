//! `prowl-agent` — the orchestrator that turns states into creatures.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`machine`]    | `StateMachine<K>` — instance table, switch protocol, transition evaluation |
//! | [`locomotion`] | movement-intent resolution under speed/acceleration caps  |
//! | [`sim`]        | `Sim<K, E>` — the tick driver                             |
//! | [`builder`]    | `SimBuilder<K, E>` — validated construction               |
//! | [`observer`]   | `SimObserver<K>` callbacks, `NoopObserver`                |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                            |
//!
//! # Tick shape
//!
//! ```text
//! for each tick:
//!   ① Update      — every alive, authoritative, un-stunned agent:
//!                    active state's update hook; the AI-interval timer may
//!                    fire here, running ai_interval + transition evaluation
//!                    (global list first, then the active state's own list).
//!   ② Locomotion  — every alive agent: chase retargeting, then movement
//!                    intent resolved into position under the body's caps.
//!   ③ LateUpdate  — same gating as ①, after movement has settled.
//! ```
//!
//! All three passes run on one logical update thread; nothing here blocks or
//! suspends.

pub mod builder;
pub mod error;
pub mod locomotion;
pub mod machine;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{AgentError, AgentResult};
pub use machine::StateMachine;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
