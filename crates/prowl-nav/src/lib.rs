//! `prowl-nav` — navigation mesh, pathfinding, and obstruction linecasts.
//!
//! # Crate layout
//!
//! | Module   | Contents                                                    |
//! |----------|-------------------------------------------------------------|
//! | [`mesh`] | `NavMesh` (CSR + R-tree), `NavMeshBuilder`                  |
//! | [`path`] | `PathEngine` trait, `NavPath`, `DijkstraEngine`             |
//! | [`ray`]  | `Linecast` trait, `GeometryMask`, `BlockerSet`              |
//! | [`error`]| `NavError`, `NavResult<T>`                                  |
//!
//! The engine's real navigation and physics services sit behind the
//! [`PathEngine`] and [`Linecast`] traits; the in-crate `DijkstraEngine` and
//! `BlockerSet` defaults make the behavioral core runnable and testable
//! without an engine attached.

pub mod error;
pub mod mesh;
pub mod path;
pub mod ray;

#[cfg(test)]
mod tests;

pub use error::{NavError, NavResult};
pub use mesh::{NavMesh, NavMeshBuilder};
pub use path::{DijkstraEngine, NavPath, PathEngine};
pub use ray::{BlockerSet, GeometryMask, Linecast};
