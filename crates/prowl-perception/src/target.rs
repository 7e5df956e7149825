//! Target acquisition and observer queries.
//!
//! Acquisition is stabilized by a switching hysteresis: once a creature has
//! a target, a rival candidate must beat it by more than `buffer_distance`
//! before the lock moves.  Two near-equidistant candidates therefore cannot
//! make the target flap between intervals.

use prowl_core::{EyePose, TargetId, Vec3};

use crate::pathcheck::observer_pose_and_cone;
use crate::view::{Perception, ViewCone};

impl Perception<'_> {
    /// Select or retain a target among all eligible roster entries.
    ///
    /// The current target (if still eligible and visible) sets the distance
    /// baseline; only candidates strictly closer than the running best are
    /// considered.  A new best that isn't the current target replaces it only
    /// when it is closer by more than `buffer_distance`.
    pub fn closest_visible_target(
        &self,
        eye: EyePose,
        view: ViewCone,
        current: Option<TargetId>,
        buffer_distance: f32,
        proximity_awareness: f32,
    ) -> Option<TargetId> {
        // Re-validate the incumbent first; a stale or hidden target holds no
        // claim on the baseline.
        let incumbent: Option<(TargetId, f32)> = current.and_then(|cur| {
            if !self.eligibility.eligible(self.roster, cur) {
                return None;
            }
            let point = self.roster.eye_point(cur);
            if !self.sees(point, eye, view, proximity_awareness) {
                return None;
            }
            Some((cur, eye.position.distance(point)))
        });

        let mut best = incumbent;
        for id in self.roster.ids() {
            if current == Some(id) {
                continue;
            }
            if !self.eligibility.eligible(self.roster, id) {
                continue;
            }
            let point = self.roster.eye_point(id);
            let distance = eye.position.distance(point);
            let closer = match best {
                Some((_, best_distance)) => distance < best_distance,
                None => true,
            };
            if closer && self.sees(point, eye, view, proximity_awareness) {
                best = Some((id, distance));
            }
        }

        match (best, incumbent) {
            // Hysteresis: a challenger only unseats a live incumbent by a
            // margin of more than `buffer_distance`.
            (Some((challenger, challenger_distance)), Some((held, held_distance)))
                if challenger != held =>
            {
                if challenger_distance < held_distance - buffer_distance {
                    Some(challenger)
                } else {
                    Some(held)
                }
            }
            (Some((chosen, _)), _) => Some(chosen),
            (None, _) => None,
        }
    }

    /// Nearest eligible observer that can see `position` with its own view
    /// capability (no cone restriction beyond the observer's own).
    pub fn closest_observer_of(
        &self,
        position: Vec3,
        ignore: Option<TargetId>,
    ) -> Option<TargetId> {
        let mut best: Option<(TargetId, f32)> = None;
        for id in self.roster.ids() {
            if ignore == Some(id) {
                continue;
            }
            if !self.eligibility.eligible(self.roster, id) {
                continue;
            }
            let (pose, cone) = observer_pose_and_cone(self.roster, id);
            if !self.sees(position, pose, cone, 0.0) {
                continue;
            }
            let distance = pose.position.distance(position);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((id, distance));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Every eligible observer that can see `position`, unranked.
    ///
    /// The caller supplies the cone to test with (e.g. a tightened cone for
    /// "staring right at it" checks); range and width override each
    /// observer's own capability.  Used for area reactions where all
    /// watchers react at once.
    pub fn all_observers_of(
        &self,
        position: Vec3,
        ignore: Option<TargetId>,
        view_width_deg: f32,
        view_range: f32,
    ) -> Vec<TargetId> {
        let cone = ViewCone::new(view_width_deg, view_range);
        self.roster
            .ids()
            .filter(|&id| ignore != Some(id))
            .filter(|&id| self.eligibility.eligible(self.roster, id))
            .filter(|&id| {
                let pose = self.roster.eye_pose(id);
                self.sees(position, pose, cone, 0.0)
            })
            .collect()
    }
}
