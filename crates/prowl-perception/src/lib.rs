//! `prowl-perception` — the pure query layer every behaviour state leans on.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`view`]     | `Perception<'_>` — one-tick borrow of world services, `ViewCone` |
//! | [`sight`]    | line-of-sight test (fog clamp, proximity bypass, FOV cone, obstruction) |
//! | [`pathcheck`]| `PathStatus` and the three-way path-validity classification |
//! | [`waypoint`] | ranked waypoint search with seen-route fallback            |
//! | [`target`]   | hysteresis-stabilized target acquisition, observer queries |
//!
//! All queries are synchronous, side-effect-free, and never fail for normal
//! game state: missing data (off-mesh agent, empty candidate set, dead
//! roster entry) collapses to the most conservative answer —
//! `PathStatus::Invalid`, `false`, or `None`.

pub mod pathcheck;
pub mod sight;
pub mod target;
pub mod view;
pub mod waypoint;

#[cfg(test)]
mod tests;

pub use pathcheck::PathStatus;
pub use sight::line_of_sight;
pub use view::{Perception, ViewCone};
pub use waypoint::{NodeSearch, SearchMode, Waypoint};
