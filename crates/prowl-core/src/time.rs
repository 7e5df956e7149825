//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  One
//! tick is one fixed simulation step of `tick_duration_secs` seconds; the
//! three behaviour cadences hang off it:
//!
//! - `Update` and `LateUpdate` run every tick.
//! - `AIInterval` — the decision cadence — runs whenever an accumulated
//!   per-agent timer crosses `ai_interval_secs`.
//!
//! Using an integer tick as the canonical time unit keeps cadence arithmetic
//! exact; only in-state countdowns use float seconds.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
///
/// Stored as `u64`: at a 50 ms step a u64 lasts ~29 billion years, so
/// overflow is not a practical concern.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Tracks the current tick and its mapping to simulated seconds.
///
/// `TickClock` is cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    /// Seconds one tick represents.  Default: 0.05 (a 20 Hz step).
    pub tick_duration_secs: f32,
    /// The current tick — advanced by `TickClock::advance()` each step.
    pub current_tick: Tick,
}

impl TickClock {
    pub fn new(tick_duration_secs: f32) -> Self {
        Self {
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Elapsed simulated seconds since tick 0.
    #[inline]
    pub fn elapsed_secs(&self) -> f32 {
        self.current_tick.0 as f32 * self.tick_duration_secs
    }

    /// How many ticks span `secs` seconds? (rounds up — a countdown never
    /// fires early)
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        (secs / self.tick_duration_secs).ceil() as u64
    }
}

impl fmt::Display for TickClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.elapsed_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Constructed by the application and passed to the driver builder; this core
/// performs no file parsing.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Seconds per tick.  Every `Update`/`LateUpdate` pass advances the world
    /// by exactly this much.
    pub tick_duration_secs: f32,

    /// Seconds between decision passes (`AIInterval`).  Must be >= the tick
    /// duration; transitions are only evaluated on this cadence.
    pub ai_interval_secs: f32,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,

    /// Line-of-sight range cap applied while the environment is foggy.
    pub fog_range_cap: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs: 0.05,
            ai_interval_secs:   0.2,
            seed:               0,
            fog_range_cap:      30.0,
        }
    }
}

impl SimConfig {
    /// Construct a `TickClock` pre-configured for this run.
    pub fn make_clock(&self) -> TickClock {
        TickClock::new(self.tick_duration_secs)
    }
}
