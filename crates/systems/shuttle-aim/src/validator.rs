//! Feasibility checks for a requested landing point.
//!
//! Clamps the target into the receiving court, picks an arc inside the
//! elevation window and makes one corrective push when the arc would clip the
//! net. The result is always a value; callers branch on `status`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use shuttle_core::context::resolve_gravity;
use shuttle_core::error::ShotError;
use shuttle_core::math::horizontal_bearing;

use crate::ballistic::{
    self, ArcPair, BallisticSolution, MIN_HORIZONTAL_DISTANCE, horizontal_distance,
};
use crate::court::CourtBounds;

/// Net-clearance push distance per unit of missing height.
const PUSH_PER_DEFICIT: f32 = 4.0;
/// Bounds of the corrective push distance.
const MIN_PUSH: f32 = 0.15;
const MAX_PUSH: f32 = 1.0;

/// Outcome classification of a planning query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feasibility {
    #[default]
    Valid,
    ClampedToBounds,
    AdjustedForNetClearance,
    NoSolution,
}

/// Accepted launch elevations (degrees, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationWindow {
    pub min_deg: f32,
    pub max_deg: f32,
}

impl Default for ElevationWindow {
    fn default() -> Self {
        Self {
            min_deg: 15.0,
            max_deg: 75.0,
        }
    }
}

impl ElevationWindow {
    pub fn new(min_deg: f32, max_deg: f32) -> Self {
        Self { min_deg, max_deg }
    }

    /// Whether `solution` exists and its elevation lies in the window.
    pub fn accepts(&self, solution: &BallisticSolution) -> bool {
        solution.exists
            && solution.elevation_deg >= self.min_deg
            && solution.elevation_deg <= self.max_deg
    }
}

/// Everything a presenter needs about one planning query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub requested_target: Vec3,
    pub adjusted_target: Vec3,
    pub status: Feasibility,
    pub low_arc: BallisticSolution,
    pub high_arc: BallisticSolution,
    /// Only meaningful when `status != NoSolution`.
    pub chosen: BallisticSolution,
    pub crosses_net: bool,
    pub net_height_at_cross: f32,
    /// Why the query ended in `NoSolution`.
    pub failure: Option<ShotError>,
}

impl FeasibilityResult {
    fn new(requested_target: Vec3) -> Self {
        Self {
            requested_target,
            adjusted_target: requested_target,
            status: Feasibility::Valid,
            low_arc: BallisticSolution::NONE,
            high_arc: BallisticSolution::NONE,
            chosen: BallisticSolution::NONE,
            crosses_net: false,
            net_height_at_cross: 0.0,
            failure: None,
        }
    }

    /// The chosen arc, if the query produced one.
    pub fn usable_solution(&self) -> Option<&BallisticSolution> {
        if self.status == Feasibility::NoSolution {
            return None;
        }
        self.chosen.as_option()
    }

    pub fn is_feasible(&self) -> bool {
        self.usable_solution().is_some()
    }

    fn fail(mut self, reason: ShotError) -> Self {
        self.status = Feasibility::NoSolution;
        self.chosen = BallisticSolution::NONE;
        self.failure = Some(reason);
        self
    }
}

/// Preferred arc if accepted, otherwise the other one if accepted.
fn select_arc(
    arcs: &ArcPair,
    window: &ElevationWindow,
    prefer_low_arc: bool,
) -> Option<BallisticSolution> {
    let low_ok = window.accepts(&arcs.low);
    let high_ok = window.accepts(&arcs.high);
    match (prefer_low_arc, low_ok, high_ok) {
        (true, true, _) => Some(arcs.low),
        (_, _, true) => Some(arcs.high),
        (_, true, false) => Some(arcs.low),
        _ => None,
    }
}

fn unreachable_reason(origin: Vec3, target: Vec3) -> ShotError {
    if horizontal_distance(origin, target) < MIN_HORIZONTAL_DISTANCE {
        ShotError::DegenerateGeometry
    } else {
        ShotError::NoFeasibleArc
    }
}

/// Plan a gravity-only shot from `origin` to `requested_target`.
///
/// Without a court there is no clamping and no net check.
pub fn validate_and_plan(
    origin: Vec3,
    requested_target: Vec3,
    court: Option<&CourtBounds>,
    gravity: Vec3,
    window: ElevationWindow,
    prefer_low_arc: bool,
) -> FeasibilityResult {
    let gravity = resolve_gravity(gravity);
    let mut result = FeasibilityResult::new(requested_target);

    if let Some(court) = court
        && court.clamp_into_bounds
    {
        let clamped = court.clamp_into_bounds(requested_target);
        if clamped != requested_target {
            result.status = Feasibility::ClampedToBounds;
        }
        result.adjusted_target = clamped;
    }

    let arcs = ballistic::solve_ballistic_arcs(origin, result.adjusted_target, gravity);
    result.low_arc = arcs.low;
    result.high_arc = arcs.high;

    let Some(mut chosen) = select_arc(&arcs, &window, prefer_low_arc) else {
        let reason = unreachable_reason(origin, result.adjusted_target);
        return result.fail(reason);
    };

    let Some(court) = court else {
        result.chosen = chosen;
        return result;
    };

    let required = court.required_clearance_height();
    if let Some(y_at_net) = ballistic::try_height_at_net_plane(
        origin,
        chosen.launch_velocity,
        gravity,
        court.net_plane_z,
        chosen.flight_time,
    ) {
        result.crosses_net = true;
        result.net_height_at_cross = y_at_net;

        if y_at_net < required {
            let deficit = required - y_at_net;
            let push = (deficit * PUSH_PER_DEFICIT).clamp(MIN_PUSH, MAX_PUSH);
            let bearing = horizontal_bearing(origin, result.adjusted_target);
            if bearing.length_squared() <= 1e-6 {
                return result.fail(ShotError::NetClearanceUnresolved);
            }

            result.adjusted_target += bearing * push;
            if court.clamp_into_bounds {
                result.adjusted_target = court.clamp_into_bounds(result.adjusted_target);
            }
            tracing::debug!(
                deficit,
                push,
                target = ?result.adjusted_target,
                "Pushing target back for net clearance"
            );

            let arcs = ballistic::solve_ballistic_arcs(origin, result.adjusted_target, gravity);
            result.low_arc = arcs.low;
            result.high_arc = arcs.high;

            chosen = match select_arc(&arcs, &window, prefer_low_arc) {
                Some(sol) => sol,
                None => {
                    let reason = unreachable_reason(origin, result.adjusted_target);
                    return result.fail(reason);
                },
            };

            match ballistic::try_height_at_net_plane(
                origin,
                chosen.launch_velocity,
                gravity,
                court.net_plane_z,
                chosen.flight_time,
            ) {
                Some(y) => {
                    result.net_height_at_cross = y;
                    if y < required {
                        return result.fail(ShotError::NetClearanceUnresolved);
                    }
                },
                None => result.crosses_net = false,
            }
            result.status = Feasibility::AdjustedForNetClearance;
        }
    }

    result.chosen = chosen;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ballistic::ArcKind;
    use shuttle_core::test_helpers::{assert_near, earth_gravity};

    fn plan(origin: Vec3, target: Vec3, court: &CourtBounds, prefer_low: bool) -> FeasibilityResult {
        validate_and_plan(
            origin,
            target,
            Some(court),
            earth_gravity(),
            ElevationWindow::default(),
            prefer_low,
        )
    }

    #[test]
    fn deep_target_is_valid_on_low_arc() {
        let court = CourtBounds::default();
        let r = plan(Vec3::new(0.0, 1.0, -6.0), Vec3::new(0.0, 0.0, 5.0), &court, true);

        assert_eq!(r.status, Feasibility::Valid);
        assert_eq!(r.adjusted_target, r.requested_target);
        assert_eq!(r.chosen.arc, ArcKind::Low);
        assert!(r.crosses_net);
        assert!(r.net_height_at_cross >= court.required_clearance_height());
        assert!(r.failure.is_none());
        assert!(r.is_feasible());
    }

    #[test]
    fn preference_selects_high_arc() {
        let court = CourtBounds::default();
        let r = plan(Vec3::new(0.0, 1.0, -6.0), Vec3::new(0.0, 0.0, 5.0), &court, false);
        assert_eq!(r.chosen.arc, ArcKind::High);
        assert_eq!(r.chosen, r.high_arc);
    }

    #[test]
    fn window_excluding_low_falls_back_to_high() {
        let court = CourtBounds::default();
        let r = validate_and_plan(
            Vec3::new(0.0, 1.0, -6.0),
            Vec3::new(0.0, 0.0, 5.0),
            Some(&court),
            earth_gravity(),
            ElevationWindow::new(30.0, 75.0),
            true,
        );
        assert_eq!(r.status, Feasibility::Valid);
        assert_eq!(r.chosen.arc, ArcKind::High);
    }

    #[test]
    fn empty_window_is_no_solution() {
        let court = CourtBounds::default();
        let r = validate_and_plan(
            Vec3::new(0.0, 1.0, -6.0),
            Vec3::new(0.0, 0.0, 5.0),
            Some(&court),
            earth_gravity(),
            ElevationWindow::new(60.0, 75.0),
            true,
        );
        assert_eq!(r.status, Feasibility::NoSolution);
        assert_eq!(r.failure, Some(ShotError::NoFeasibleArc));
        assert!(!r.chosen.exists);
        assert!(r.usable_solution().is_none());
    }

    #[test]
    fn out_of_bounds_target_is_clamped() {
        let court = CourtBounds::default();
        let r = plan(Vec3::new(0.0, 1.0, -6.0), Vec3::new(5.0, 0.0, 9.0), &court, true);
        assert_eq!(r.status, Feasibility::ClampedToBounds);
        assert_eq!(r.adjusted_target, Vec3::new(3.0, 0.0, 7.0));
        assert!(r.chosen.exists);
    }

    #[test]
    fn barely_outside_target_is_clamped() {
        let court = CourtBounds::default();
        let target = Vec3::new(3.0005, 0.0, 5.0);
        let r = plan(Vec3::new(0.0, 1.0, -6.0), target, &court, true);
        assert_eq!(r.status, Feasibility::ClampedToBounds);
        assert_eq!(r.adjusted_target, Vec3::new(3.0, 0.0, 5.0));
        assert!(court.is_inside(r.adjusted_target));
        assert!(r.usable_solution().is_some());
    }

    #[test]
    fn edge_target_stays_valid() {
        let court = CourtBounds::default();
        let target = Vec3::new(3.0, 0.0, 5.0);
        let r = plan(Vec3::new(0.0, 1.0, -6.0), target, &court, true);
        assert_eq!(r.status, Feasibility::Valid);
        assert_eq!(r.adjusted_target, target);
    }

    #[test]
    fn clamping_disabled_keeps_target() {
        let court = CourtBounds {
            clamp_into_bounds: false,
            ..CourtBounds::default()
        };
        let r = plan(Vec3::new(0.0, 1.0, -6.0), Vec3::new(5.0, 0.0, 9.0), &court, true);
        assert_eq!(r.adjusted_target, r.requested_target);
        assert_eq!(r.status, Feasibility::Valid);
    }

    #[test]
    fn short_high_arc_is_pushed_over_net() {
        // 55° arc to z = 1 crosses the net at ~1.50 < 1.65; one push of ~0.59
        // lifts the crossing to ~2.11.
        let court = CourtBounds::default();
        let r = plan(Vec3::new(0.0, 1.0, -4.0), Vec3::new(0.0, 0.0, 1.0), &court, false);

        assert_eq!(r.status, Feasibility::AdjustedForNetClearance);
        assert!(r.adjusted_target.z > 1.0);
        assert_near(r.adjusted_target.z, 1.59, 0.02);
        assert!(r.net_height_at_cross >= court.required_clearance_height());
        assert!(r.chosen.exists);
    }

    #[test]
    fn single_push_can_fail() {
        // The 25° arc is far below the tape; a full 1.0 push is not enough.
        let court = CourtBounds::default();
        let r = plan(Vec3::new(0.0, 1.0, -4.0), Vec3::new(0.0, 0.0, 1.0), &court, true);

        assert_eq!(r.status, Feasibility::NoSolution);
        assert_eq!(r.failure, Some(ShotError::NetClearanceUnresolved));
        assert_near(r.adjusted_target.z, 2.0, 1e-5);
        assert!(!r.chosen.exists);
    }

    #[test]
    fn push_is_reclamped_into_bounds() {
        let court = CourtBounds {
            max_xz: glam::Vec2::new(3.0, 1.2),
            ..CourtBounds::default()
        };
        let r = plan(Vec3::new(0.0, 1.0, -4.0), Vec3::new(0.0, 0.0, 1.0), &court, false);
        assert!(r.adjusted_target.z <= 1.2);
    }

    #[test]
    fn vertical_target_is_degenerate() {
        let r = validate_and_plan(
            Vec3::new(0.0, 3.0, 2.0),
            Vec3::new(0.0, 0.0, 2.0),
            None,
            earth_gravity(),
            ElevationWindow::default(),
            true,
        );
        assert_eq!(r.status, Feasibility::NoSolution);
        assert_eq!(r.failure, Some(ShotError::DegenerateGeometry));
    }

    #[test]
    fn no_court_skips_clamp_and_net() {
        let r = validate_and_plan(
            Vec3::new(0.0, 1.0, -4.0),
            Vec3::new(10.0, 0.0, 1.0),
            None,
            earth_gravity(),
            ElevationWindow::default(),
            true,
        );
        assert_eq!(r.status, Feasibility::Valid);
        assert!(!r.crosses_net);
        assert_eq!(r.adjusted_target, r.requested_target);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Net placed behind the hitter so it is never crossed.
        fn netless_court() -> CourtBounds {
            CourtBounds {
                net_plane_z: -100.0,
                ..CourtBounds::default()
            }
        }

        proptest! {
            #[test]
            fn identical_queries_are_identical(
                x in -6.0f32..6.0,
                z in -2.0f32..10.0,
                prefer_low in any::<bool>(),
            ) {
                let court = CourtBounds::default();
                let origin = Vec3::new(0.0, 1.0, -5.0);
                let target = Vec3::new(x, 0.0, z);
                let a = plan(origin, target, &court, prefer_low);
                let b = plan(origin, target, &court, prefer_low);
                prop_assert_eq!(a, b);
            }

            #[test]
            fn outside_targets_land_on_boundary(
                x in -12.0f32..12.0,
                z in -6.0f32..16.0,
            ) {
                let court = netless_court();
                let target = Vec3::new(x, 0.0, z);
                let (min, max) = court.extents();
                prop_assume!(!court.is_inside(target));

                let r = plan(Vec3::new(0.0, 1.0, -6.0), target, &court, true);
                prop_assert_eq!(r.status, Feasibility::ClampedToBounds);
                let p = r.adjusted_target;
                let on_x_edge = p.x == min.x || p.x == max.x;
                let on_z_edge = p.z == min.y || p.z == max.y;
                prop_assert!(on_x_edge || on_z_edge, "{p:?} is not on the boundary");
                prop_assert!(court.is_inside(p));
            }

            #[test]
            fn net_correction_clears_or_fails(
                z in 1.0f32..4.0,
                hitter_z in -6.0f32..-1.0,
                hitter_y in 0.5f32..2.5,
                prefer_low in any::<bool>(),
            ) {
                let court = CourtBounds::default();
                let origin = Vec3::new(0.0, hitter_y, hitter_z);
                let r = plan(origin, Vec3::new(0.0, 0.0, z), &court, prefer_low);
                match r.status {
                    Feasibility::AdjustedForNetClearance => {
                        if r.crosses_net {
                            prop_assert!(r.net_height_at_cross >= court.required_clearance_height());
                        }
                        prop_assert!(r.chosen.exists);
                    },
                    Feasibility::NoSolution => prop_assert!(!r.chosen.exists),
                    Feasibility::Valid | Feasibility::ClampedToBounds => {
                        prop_assert!(r.net_height_at_cross >= court.required_clearance_height());
                    },
                }
            }
        }
    }
}
