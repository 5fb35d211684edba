//! Gravity-only ballistic solver and trajectory sampling.
//!
//! All functions are pure: they take world-space positions, a gravity vector
//! and return fresh values. No drag is modelled here; the arcs are the
//! idealized plan used for aiming, not the simulated flight.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use shuttle_core::error::ShotError;
use shuttle_core::math::horizontal;
use shuttle_core::resolve_gravity;

/// Elevation used for the "low" arc exemplar (degrees).
pub const LOW_ARC_ELEVATION_DEG: f32 = 25.0;
/// Elevation used for the "high" arc exemplar (degrees).
pub const HIGH_ARC_ELEVATION_DEG: f32 = 55.0;
/// Below this horizontal distance the target is treated as directly above/below.
pub const MIN_HORIZONTAL_DISTANCE: f32 = 1e-5;
/// Arc denominators at or below this value are rejected.
pub const DENOMINATOR_EPSILON: f32 = 1e-6;
/// Coefficients below this magnitude are treated as zero in the net-plane solve.
const ROOT_EPSILON: f32 = 1e-6;

/// Which exemplar elevation produced a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArcKind {
    #[default]
    Low,
    High,
}

/// A launch velocity that reaches a target under gravity alone.
///
/// Only meaningful when `exists` is true; a non-existent solution carries
/// zeroed fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BallisticSolution {
    pub exists: bool,
    pub launch_velocity: Vec3,
    /// Time to reach the target (seconds).
    pub flight_time: f32,
    /// Elevation above the horizontal bearing (degrees).
    pub elevation_deg: f32,
    pub arc: ArcKind,
}

impl BallisticSolution {
    /// The "no solution" value.
    pub const NONE: Self = Self {
        exists: false,
        launch_velocity: Vec3::ZERO,
        flight_time: 0.0,
        elevation_deg: 0.0,
        arc: ArcKind::Low,
    };

    pub fn speed(&self) -> f32 {
        self.launch_velocity.length()
    }

    /// `Some(self)` when the solution exists.
    pub fn as_option(&self) -> Option<&Self> {
        self.exists.then_some(self)
    }

    /// Where the arc ends after `flight_time`.
    pub fn landing_point(&self, origin: Vec3, gravity: Vec3) -> Vec3 {
        position_at(origin, self.launch_velocity, gravity, self.flight_time)
    }

    fn tagged(mut self, arc: ArcKind) -> Self {
        self.arc = arc;
        self
    }
}

/// Low and high exemplar solutions for one origin/target pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcPair {
    pub low: BallisticSolution,
    pub high: BallisticSolution,
}

/// Horizontal (XZ) distance between two points.
pub fn horizontal_distance(origin: Vec3, target: Vec3) -> f32 {
    horizontal(target - origin).length()
}

/// `2·cos²θ·(R·tanθ − dy)`, the quantity whose sign decides whether an arc
/// at elevation θ can reach a point `R` away and `dy` higher.
pub fn arc_denominator(horizontal_distance: f32, dy: f32, elevation_deg: f32) -> f32 {
    let elev = elevation_deg.to_radians();
    let cos = elev.cos();
    2.0 * cos * cos * (horizontal_distance * elev.tan() - dy)
}

/// Launch velocity hitting `target` at a fixed elevation, or the reason none exists.
pub fn try_solve_given_elevation(
    origin: Vec3,
    target: Vec3,
    gravity: Vec3,
    elevation_deg: f32,
) -> Result<BallisticSolution, ShotError> {
    let g = resolve_gravity(gravity).length();

    let diff = target - origin;
    let r = Vec2::new(diff.x, diff.z).length();
    let dy = diff.y;
    if r < MIN_HORIZONTAL_DISTANCE {
        return Err(ShotError::DegenerateGeometry);
    }

    let bearing = Vec3::new(diff.x, 0.0, diff.z).normalize_or_zero();
    if bearing.length_squared() < 1e-6 {
        return Err(ShotError::DegenerateGeometry);
    }

    let denom = arc_denominator(r, dy, elevation_deg);
    if denom <= DENOMINATOR_EPSILON {
        return Err(ShotError::NoFeasibleArc);
    }

    // v² = g·R² / (2·cos²θ·(R·tanθ − dy))
    let v2 = g * r * r / denom;
    if v2 <= 0.0 || !v2.is_finite() {
        return Err(ShotError::NoFeasibleArc);
    }

    let v = v2.sqrt();
    let elev = elevation_deg.to_radians();
    let (sin, cos) = elev.sin_cos();
    let launch_velocity = bearing * (v * cos) + Vec3::Y * (v * sin);

    Ok(BallisticSolution {
        exists: true,
        launch_velocity,
        flight_time: r / (v * cos),
        elevation_deg,
        arc: ArcKind::Low,
    })
}

/// Value form of [`try_solve_given_elevation`]: failures come back with
/// `exists = false`.
pub fn solve_given_elevation(
    origin: Vec3,
    target: Vec3,
    gravity: Vec3,
    elevation_deg: f32,
) -> BallisticSolution {
    try_solve_given_elevation(origin, target, gravity, elevation_deg)
        .unwrap_or(BallisticSolution::NONE)
}

/// Solve at the fixed low and high exemplar elevations.
///
/// This does not search for the true pair of roots at a given launch speed;
/// the two arcs are simply the solutions at 25° and 55°.
pub fn solve_ballistic_arcs(origin: Vec3, target: Vec3, gravity: Vec3) -> ArcPair {
    let low = solve_given_elevation(origin, target, gravity, LOW_ARC_ELEVATION_DEG);
    let high = solve_given_elevation(origin, target, gravity, HIGH_ARC_ELEVATION_DEG);
    ArcPair {
        low: if low.exists {
            low.tagged(ArcKind::Low)
        } else {
            BallisticSolution::NONE
        },
        high: if high.exists {
            high.tagged(ArcKind::High)
        } else {
            BallisticSolution::NONE
        },
    }
}

/// `p(t) = origin + v0·t + ½·g·t²`
pub fn position_at(origin: Vec3, v0: Vec3, gravity: Vec3, t: f32) -> Vec3 {
    origin + v0 * t + 0.5 * gravity * t * t
}

/// Evenly spaced positions along a ballistic curve.
///
/// Cloning the iterator (or calling [`sample`] again) restarts the sequence.
#[derive(Debug, Clone)]
pub struct TrajectorySamples {
    origin: Vec3,
    v0: Vec3,
    gravity: Vec3,
    dt: f32,
    index: usize,
    count: usize,
}

impl Iterator for TrajectorySamples {
    type Item = Vec3;

    fn next(&mut self) -> Option<Vec3> {
        if self.index >= self.count {
            return None;
        }
        let t = self.dt * self.index as f32;
        self.index += 1;
        Some(position_at(self.origin, self.v0, self.gravity, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrajectorySamples {}

/// `segments` positions for t evenly spaced over `[0, total_time]`.
/// Fewer than two segments are raised to two so both endpoints are present.
pub fn sample(
    origin: Vec3,
    v0: Vec3,
    gravity: Vec3,
    total_time: f32,
    segments: usize,
) -> TrajectorySamples {
    let count = segments.max(2);
    TrajectorySamples {
        origin,
        v0,
        gravity,
        dt: total_time / (count - 1) as f32,
        index: 0,
        count,
    }
}

/// Height of the arc where its depth (z) crosses `net_plane_z`.
///
/// The crossing time must fall inside `[0, total_time]`; with gravity along z
/// the earliest in-range root of the quadratic is used. Returns `None` when
/// the arc never crosses the plane in range.
pub fn try_height_at_net_plane(
    origin: Vec3,
    v0: Vec3,
    gravity: Vec3,
    net_plane_z: f32,
    total_time: f32,
) -> Option<f32> {
    let a = 0.5 * gravity.z;
    let b = v0.z;
    let c = origin.z - net_plane_z;
    let in_range = |t: f32| t.is_finite() && (0.0..=total_time).contains(&t);

    let t = if a.abs() < ROOT_EPSILON {
        if b.abs() < ROOT_EPSILON {
            return None;
        }
        Some(-c / b).filter(|&t| in_range(t))?
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt = disc.sqrt();
        let t1 = (-b - sqrt) / (2.0 * a);
        let t2 = (-b + sqrt) / (2.0 * a);
        [t1, t2]
            .into_iter()
            .filter(|&t| in_range(t))
            .min_by(f32::total_cmp)?
    };

    Some(position_at(origin, v0, gravity, t).y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shuttle_core::test_helpers::{assert_near, assert_vec3_near, earth_gravity};

    #[test]
    fn level_target_at_25_degrees() {
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let target = Vec3::new(0.0, 1.0, 10.0);
        let sol = solve_given_elevation(origin, target, earth_gravity(), 25.0);

        assert!(sol.exists);
        assert_eq!(sol.elevation_deg, 25.0);
        let v = sol.speed();
        let cos = 25.0_f32.to_radians().cos();
        assert_near(sol.flight_time, 10.0 / (v * cos), 1e-4);
        // Level shot: v² = g·R / sin(2θ)
        let expected_v = (9.81 * 10.0 / 50.0_f32.to_radians().sin()).sqrt();
        assert_near(v, expected_v, 1e-3);
    }

    #[test]
    fn velocity_follows_bearing() {
        let sol = solve_given_elevation(
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 4.0),
            earth_gravity(),
            40.0,
        );
        assert!(sol.exists);
        let flat = Vec3::new(sol.launch_velocity.x, 0.0, sol.launch_velocity.z).normalize();
        assert_vec3_near(flat, Vec3::new(0.6, 0.0, 0.8), 1e-5);
        assert!(sol.launch_velocity.y > 0.0);
    }

    #[test]
    fn vertical_target_is_degenerate() {
        let err = try_solve_given_elevation(
            Vec3::ZERO,
            Vec3::new(0.0, 5.0, 0.0),
            earth_gravity(),
            45.0,
        )
        .unwrap_err();
        assert_eq!(err, ShotError::DegenerateGeometry);
        assert!(!solve_given_elevation(Vec3::ZERO, Vec3::Y, earth_gravity(), 45.0).exists);
    }

    #[test]
    fn target_above_elevation_line_is_infeasible() {
        // tan(25°)·10 ≈ 4.66 < 6, so a 25° arc can never climb that high.
        let err = try_solve_given_elevation(
            Vec3::ZERO,
            Vec3::new(0.0, 6.0, 10.0),
            earth_gravity(),
            25.0,
        )
        .unwrap_err();
        assert_eq!(err, ShotError::NoFeasibleArc);
    }

    #[test]
    fn zero_gravity_uses_standard_gravity() {
        let target = Vec3::new(0.0, 0.0, 8.0);
        let a = solve_given_elevation(Vec3::ZERO, target, Vec3::ZERO, 30.0);
        let b = solve_given_elevation(Vec3::ZERO, target, earth_gravity(), 30.0);
        assert_eq!(a, b);
    }

    #[test]
    fn arcs_are_tagged() {
        let pair = solve_ballistic_arcs(Vec3::Y, Vec3::new(0.0, 0.0, 6.0), earth_gravity());
        assert!(pair.low.exists && pair.high.exists);
        assert_eq!(pair.low.arc, ArcKind::Low);
        assert_eq!(pair.high.arc, ArcKind::High);
        assert_eq!(pair.low.elevation_deg, LOW_ARC_ELEVATION_DEG);
        assert_eq!(pair.high.elevation_deg, HIGH_ARC_ELEVATION_DEG);
        assert!(pair.high.flight_time > pair.low.flight_time);
    }

    #[test]
    fn high_arc_can_exist_when_low_cannot() {
        // 10 up over 10 across: above the 25° line, below the 55° line.
        let pair = solve_ballistic_arcs(
            Vec3::ZERO,
            Vec3::new(0.0, 10.0, 10.0),
            earth_gravity(),
        );
        assert!(!pair.low.exists);
        assert_eq!(pair.low, BallisticSolution::NONE);
        assert!(pair.high.exists);
    }

    #[test]
    fn sample_endpoints_and_restart() {
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let target = Vec3::new(0.0, 0.0, 7.0);
        let sol = solve_given_elevation(origin, target, earth_gravity(), 35.0);
        let samples = sample(origin, sol.launch_velocity, earth_gravity(), sol.flight_time, 40);
        assert_eq!(samples.len(), 40);

        let points: Vec<Vec3> = samples.clone().collect();
        assert_eq!(points.len(), 40);
        assert_eq!(points[0], origin);
        assert_vec3_near(points[39], target, 1e-3);

        let again: Vec<Vec3> = samples.collect();
        assert_eq!(points, again);
    }

    #[test]
    fn sample_raises_segment_count_to_two() {
        let points: Vec<Vec3> = sample(Vec3::ZERO, Vec3::Z, Vec3::ZERO, 2.0, 0).collect();
        assert_eq!(points, vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0)]);
    }

    #[test]
    fn net_height_linear_crossing() {
        let origin = Vec3::new(0.0, 1.0, -4.0);
        let v0 = Vec3::new(0.0, 5.0, 4.0);
        // Crosses z = 0 at t = 1.
        let y = try_height_at_net_plane(origin, v0, earth_gravity(), 0.0, 2.0).unwrap();
        assert_near(y, 1.0 + 5.0 - 0.5 * 9.81, 1e-5);
    }

    #[test]
    fn net_height_outside_flight_window() {
        let origin = Vec3::new(0.0, 1.0, -4.0);
        let v0 = Vec3::new(0.0, 5.0, 4.0);
        assert!(try_height_at_net_plane(origin, v0, earth_gravity(), 0.0, 0.5).is_none());
        // Moving away from the plane: root is in the past.
        assert!(try_height_at_net_plane(origin, -v0, earth_gravity(), 0.0, 5.0).is_none());
        // No depth motion at all.
        assert!(
            try_height_at_net_plane(origin, Vec3::new(1.0, 5.0, 0.0), earth_gravity(), 0.0, 5.0)
                .is_none()
        );
    }

    #[test]
    fn net_height_quadratic_takes_earliest_root() {
        // Gravity pulling back along z: launched toward +z it crosses z = 1
        // on the way out (t = 1) and again on the way back (t = 3).
        let gravity = Vec3::new(0.0, 0.0, -2.0);
        let origin = Vec3::new(0.0, 2.0, -2.0);
        let v0 = Vec3::new(0.0, 1.0, 4.0);
        let y = try_height_at_net_plane(origin, v0, gravity, 1.0, 10.0).unwrap();
        assert_near(y, 3.0, 1e-5);
        assert!(try_height_at_net_plane(origin, v0, gravity, 1.0, 0.5).is_none());
    }

    #[test]
    fn net_height_quadratic_skips_past_root() {
        // Starting just past the plane, the outbound root is negative and
        // only the return crossing at t = 2 + √4.5 counts.
        let gravity = Vec3::new(0.0, 0.0, -2.0);
        let origin = Vec3::new(0.0, 2.0, 1.5);
        let v0 = Vec3::new(0.0, 1.0, 4.0);
        let y = try_height_at_net_plane(origin, v0, gravity, 1.0, 10.0).unwrap();
        assert_near(y, 2.0 + 2.0 + 4.5_f32.sqrt(), 1e-4);
    }

    #[test]
    fn net_height_quadratic_no_real_root() {
        let gravity = Vec3::new(0.0, 0.0, -2.0);
        // Apex depth is z = 2, the plane at 5 is never reached.
        let v0 = Vec3::new(0.0, 0.0, 2.0);
        assert!(try_height_at_net_plane(Vec3::new(0.0, 1.0, 1.0), v0, gravity, 5.0, 10.0).is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn existence_matches_denominator_sign(
                x in -20.0f32..20.0,
                z in -20.0f32..20.0,
                dy in -5.0f32..8.0,
                elevation in 1.0f32..85.0,
            ) {
                let origin = Vec3::new(0.5, 1.0, -0.5);
                let target = origin + Vec3::new(x, dy, z);
                let r = horizontal_distance(origin, target);
                prop_assume!(r > MIN_HORIZONTAL_DISTANCE);

                let sol = solve_given_elevation(origin, target, earth_gravity(), elevation);
                let diff = target - origin;
                let denom = arc_denominator(r, diff.y, elevation);
                prop_assert_eq!(sol.exists, denom > DENOMINATOR_EPSILON);
            }

            #[test]
            fn chosen_velocity_lands_on_target(
                r in 1.0f32..20.0,
                heading in 0.0f32..std::f32::consts::TAU,
                dy in -3.0f32..1.0,
                elevation in 10.0f32..70.0,
            ) {
                let origin = Vec3::new(0.0, 1.5, -5.0);
                let target = origin + Vec3::new(r * heading.cos(), dy, r * heading.sin());
                let sol = solve_given_elevation(origin, target, earth_gravity(), elevation);
                prop_assume!(sol.exists);

                prop_assert!(sol.flight_time > 0.0 && sol.flight_time.is_finite());
                prop_assert!(sol.launch_velocity.is_finite());
                let landed = sol.landing_point(origin, earth_gravity());
                let err = (landed - target).length();
                prop_assert!(err < 1e-2 * (1.0 + r), "missed by {err}");
            }
        }
    }
}
