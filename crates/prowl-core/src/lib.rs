//! `prowl-core` — foundational types for the `prowl` creature-AI framework.
//!
//! This crate is a dependency of every other `prowl-*` crate.  It intentionally
//! has no `prowl-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                  |
//! |-----------|-----------------------------------------------------------|
//! | [`ids`]   | `AgentId`, `TargetId`, `NodeId`, `EdgeId`, `WaypointId`, `RallyPointId` |
//! | [`math`]  | `Vec3`, `EyePose`, distance/bearing helpers               |
//! | [`time`]  | `Tick`, `TickClock`, `SimConfig`                          |
//! | [`rng`]   | `AgentRng` (per-agent), `SimRng` (global)                 |
//! | [`error`] | `CoreError`, `CoreResult<T>`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.   |

pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, EdgeId, NodeId, RallyPointId, TargetId, WaypointId};
pub use math::{EyePose, Vec3};
pub use rng::{AgentRng, SimRng};
pub use time::{SimConfig, Tick, TickClock};
