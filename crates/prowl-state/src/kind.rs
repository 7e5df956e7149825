//! The state-kind contract.

use std::fmt;
use std::hash::Hash;

/// The discrete label identifying a behaviour mode, from a closed per-creature
/// set.
///
/// Implemented by a plain fieldless enum per creature type:
///
/// ```ignore
/// #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
/// enum ShadeState { Roam, Stalk, Dead }
///
/// impl StateKind for ShadeState {
///     fn initial() -> Self { ShadeState::Roam }
/// }
/// ```
///
/// `initial()` is the overridable hook deciding where a freshly activated
/// agent starts; before activation the machine is in an implicit
/// "no active state" condition.
pub trait StateKind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// The state a newly activated agent enters.
    fn initial() -> Self;
}
