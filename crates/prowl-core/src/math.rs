//! Minimal 3-D vector math for perception and locomotion queries.
//!
//! `Vec3` uses `f32` components.  Game-scale worlds (hundreds of metres) stay
//! well within f32 precision, and single precision halves the footprint of
//! the SoA position arrays vs. `f64`.

/// A 3-D position or direction in world space.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Straight-line distance to `other`.
    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Squared distance — use for ranking to skip the square root.
    #[inline]
    pub fn distance_sq(self, other: Vec3) -> f32 {
        (other - self).length_sq()
    }

    /// Unit vector in the same direction, or `Vec3::ZERO` for a zero-length
    /// vector (callers treat a degenerate bearing as "no direction").
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON {
            return Vec3::ZERO;
        }
        self * (1.0 / len)
    }

    /// Linear interpolation from `self` to `other` by `t` in `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t.clamp(0.0, 1.0)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ── EyePose ───────────────────────────────────────────────────────────────────

/// An eye position plus the unit forward direction it is looking along.
///
/// Perception queries take an `EyePose` rather than a whole agent so that the
/// same line-of-sight test serves creatures, roster observers, and tests.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EyePose {
    /// World-space eye position.
    pub position: Vec3,
    /// Unit forward vector.  Not required to be normalized by the caller;
    /// queries normalize defensively.
    pub forward: Vec3,
}

impl EyePose {
    #[inline]
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self { position, forward }
    }

    /// Unit bearing from the eye to `point`, or `Vec3::ZERO` if coincident.
    #[inline]
    pub fn bearing_to(&self, point: Vec3) -> Vec3 {
        (point - self.position).normalized()
    }
}
