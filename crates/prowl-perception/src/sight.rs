//! Line-of-sight testing.
//!
//! The test runs cheapest-first: range gate, then the field-of-view cone,
//! then the obstruction linecast.  Two carve-outs:
//!
//! - a target within `proximity_awareness` of the eye bypasses the cone test
//!   (creatures notice things breathing down their neck) but **never** the
//!   obstruction test — a wall is a wall;
//! - a target at the eye's own position is always visible, obstruction
//!   included, so degenerate self-queries cannot flicker.

use prowl_core::{EyePose, Vec3};
use prowl_nav::{GeometryMask, Linecast};

use crate::view::{Perception, ViewCone};

/// Distance under which a target counts as coincident with the eye.
const COINCIDENT_EPSILON: f32 = 1e-3;

/// Stateless line-of-sight test.
///
/// `fog_cap` is the sight-range clamp in effect, or `None` in clear weather;
/// the effective range is `view.range` clamped down to the cap, never up.
pub fn line_of_sight(
    target: Vec3,
    eye: EyePose,
    view: ViewCone,
    proximity_awareness: f32,
    fog_cap: Option<f32>,
    blockers: &dyn Linecast,
) -> bool {
    let effective_range = match fog_cap {
        Some(cap) => view.range.min(cap),
        None => view.range,
    };

    let to_target = target - eye.position;
    let distance = to_target.length();

    if distance <= COINCIDENT_EPSILON {
        return true;
    }
    if distance > effective_range {
        return false;
    }

    if distance > proximity_awareness {
        // Cone test: compare the cosine of the half-angle against the
        // forward·bearing dot product.  Larger dot = smaller angle.
        let half_angle_cos = (view.width_deg.to_radians() * 0.5).cos();
        let bearing = to_target * (1.0 / distance);
        if eye.forward.normalized().dot(bearing) < half_angle_cos {
            return false;
        }
    }

    !blockers.segment_blocked(eye.position, target, GeometryMask::SIGHT)
}

impl Perception<'_> {
    /// Can an eye at `eye` with cone `view` see `target` this tick?
    ///
    /// `foggy` is explicit here (rather than read from the context) because
    /// some creatures see through fog — they pass `false` regardless of the
    /// weather.
    pub fn has_line_of_sight(
        &self,
        target: Vec3,
        eye: EyePose,
        view: ViewCone,
        proximity_awareness: f32,
        foggy: bool,
    ) -> bool {
        let cap = foggy.then_some(self.fog_range_cap);
        line_of_sight(target, eye, view, proximity_awareness, cap, self.blockers)
    }

    /// Context-driven variant: fog state comes from the tick environment.
    #[inline]
    pub(crate) fn sees(
        &self,
        target: Vec3,
        eye: EyePose,
        view: ViewCone,
        proximity_awareness: f32,
    ) -> bool {
        line_of_sight(target, eye, view, proximity_awareness, self.fog_cap(), self.blockers)
    }
}
