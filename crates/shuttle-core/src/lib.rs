pub mod context;
pub mod error;
pub mod math;

pub use context::{PhysicsContext, STANDARD_GRAVITY, resolve_gravity};
pub use error::ShotError;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use glam::Vec3;

    /// Assert two scalars agree within `tol`.
    #[track_caller]
    pub fn assert_near(actual: f32, expected: f32, tol: f32) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected} ± {tol}, got {actual}"
        );
    }

    /// Assert two vectors agree component-wise within `tol`.
    #[track_caller]
    pub fn assert_vec3_near(actual: Vec3, expected: Vec3, tol: f32) {
        assert!(
            (actual - expected).abs().max_element() <= tol,
            "expected {expected:?} ± {tol}, got {actual:?}"
        );
    }

    /// Earth gravity along -Y, the setup nearly every test uses.
    pub fn earth_gravity() -> Vec3 {
        Vec3::new(0.0, -9.81, 0.0)
    }
}
