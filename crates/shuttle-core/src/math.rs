//! Scalar helpers shared by the solver, the planner and the flight model.

use glam::{Vec2, Vec3};

/// Clamp to the unit interval.
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Position of `x` between `a` and `b`, clamped to `[0, 1]`.
/// A zero-width band maps everything to 0.
pub fn inverse_lerp(a: f32, b: f32, x: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        return 0.0;
    }
    clamp01((x - a) / (b - a))
}

/// Hermite smoothstep over `[edge0, edge1]`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = inverse_lerp(edge0, edge1, x);
    t * t * (3.0 - 2.0 * t)
}

/// Move `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// XZ projection of a world vector.
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Horizontal unit direction from `from` toward `to`, or zero when the two
/// points share a vertical line.
pub fn horizontal_bearing(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}
