//! Tick-driver observer trait for progress reporting and tests.

use prowl_core::{AgentId, Tick};
use prowl_state::StateKind;

/// Callbacks invoked by [`Sim::run_ticks`][crate::Sim::run_ticks] at key
/// points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
pub trait SimObserver<K: StateKind> {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    fn on_tick_end(&mut self, _tick: Tick) {}

    /// Called whenever an agent's active state changed during the update
    /// pass.  `from` is `None` for the activation switch.
    fn on_state_change(&mut self, _agent: AgentId, _from: Option<K>, _to: K) {}

    /// Called when the round ends, right after the coordination table flush.
    fn on_round_end(&mut self) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call
/// `run_ticks` but don't want callbacks.
pub struct NoopObserver;

impl<K: StateKind> SimObserver<K> for NoopObserver {}
