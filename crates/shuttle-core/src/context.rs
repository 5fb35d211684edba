use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Gravity used whenever a caller hands in a (near) zero vector.
pub const STANDARD_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
/// Default fixed simulation step (50 Hz).
pub const DEFAULT_FIXED_DT: f32 = 0.02;

/// World-level physics parameters, passed explicitly to every component
/// that needs them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsContext {
    pub gravity: Vec3,
    pub fixed_dt: f32,
}

impl Default for PhysicsContext {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
            fixed_dt: DEFAULT_FIXED_DT,
        }
    }
}

impl PhysicsContext {
    pub fn new(gravity: Vec3, fixed_dt: f32) -> Self {
        Self { gravity, fixed_dt }
    }

    /// World gravity with the zero-vector fallback applied.
    pub fn effective_gravity(&self) -> Vec3 {
        resolve_gravity(self.gravity)
    }
}

/// Returns `gravity` unless it is effectively zero, in which case
/// [`STANDARD_GRAVITY`] is used.
pub fn resolve_gravity(gravity: Vec3) -> Vec3 {
    if gravity.length_squared() > 1e-6 {
        gravity
    } else {
        STANDARD_GRAVITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gravity_falls_back_to_standard() {
        assert_eq!(resolve_gravity(Vec3::ZERO), STANDARD_GRAVITY);
        assert_eq!(resolve_gravity(Vec3::new(0.0, 1e-4, 0.0)), STANDARD_GRAVITY);
    }

    #[test]
    fn custom_gravity_is_kept() {
        let moon = Vec3::new(0.0, -1.62, 0.0);
        assert_eq!(resolve_gravity(moon), moon);
        assert_eq!(PhysicsContext::new(moon, 0.01).effective_gravity(), moon);
    }

    #[test]
    fn parse_context_toml() {
        let cfg: PhysicsContext = toml::from_str(
            r#"
gravity = [0.0, -3.7, 0.0]
"#,
        )
        .unwrap();
        assert_eq!(cfg.gravity, Vec3::new(0.0, -3.7, 0.0));
        assert_eq!(cfg.fixed_dt, DEFAULT_FIXED_DT);
    }
}
