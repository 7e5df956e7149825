//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into SoA `Vec`s via `id.0 as usize`, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID" — equivalent to the type's MAX.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a state-driven creature agent in SoA storage.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of an observable world entity (a potential target/observer) in
    /// the roster.  Distinct from `AgentId`: a creature hunts targets, it is
    /// never its own target.
    pub struct TargetId(u32);
}

typed_id! {
    /// Index of a navigation-mesh node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed navigation-mesh edge.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Index of a patrol/search waypoint in an application-defined candidate
    /// set.  Waypoints reference positions, not mesh nodes, so creature types
    /// can share a mesh while keeping distinct waypoint sets.
    pub struct WaypointId(u32);
}

typed_id! {
    /// Index of a fixed rally point in the coordination table.
    /// `u16` keeps occupancy arrays compact (max 65,535 rally points).
    pub struct RallyPointId(u16);
}
