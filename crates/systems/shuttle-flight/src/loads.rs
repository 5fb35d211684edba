use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::flight::ProjectileState;
use crate::profile::AerodynamicProfile;

/// Below this speed the velocity direction is too noisy to align to.
pub const ALIGN_MIN_SPEED: f32 = 0.05;
const ALIGN_MIN_AXIS: f32 = 1e-7;
const ALIGN_MIN_ANGLE: f32 = 1e-6;

/// Per-source forces (N) and torques (N·m) acting on a projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AerodynamicLoads {
    pub weight: Vec3,
    pub buoyancy: Vec3,
    pub drag: Vec3,
    pub magnus: Vec3,
    pub align_torque: Vec3,
    pub damping_torque: Vec3,
    pub spin_decay_torque: Vec3,
}

impl AerodynamicLoads {
    pub fn total_force(&self) -> Vec3 {
        self.weight + self.buoyancy + self.drag + self.magnus
    }

    pub fn total_torque(&self) -> Vec3 {
        self.align_torque + self.damping_torque + self.spin_decay_torque
    }
}

/// Torque turning `body_axis` toward the velocity direction.
fn alignment_torque(profile: &AerodynamicProfile, body_axis: Vec3, velocity: Vec3) -> Vec3 {
    let speed = velocity.length();
    if speed <= ALIGN_MIN_SPEED {
        return Vec3::ZERO;
    }
    let v_hat = velocity / speed;
    let axis = body_axis.cross(v_hat);
    let axis_mag = axis.length();
    let angle = body_axis.angle_between(v_hat);
    if axis_mag > ALIGN_MIN_AXIS && angle > ALIGN_MIN_ANGLE {
        axis / axis_mag * (profile.align_stiffness * angle)
    } else {
        Vec3::ZERO
    }
}

/// Evaluate every load for `state` under the gravity acceleration `gravity`.
pub fn aerodynamic_loads(
    profile: &AerodynamicProfile,
    state: &ProjectileState,
    gravity: Vec3,
) -> AerodynamicLoads {
    let v = state.velocity;
    let speed = v.length();
    let omega = state.angular_velocity;

    let buoyancy = if profile.use_buoyancy {
        -profile.buoyancy_fraction * profile.mass * gravity
    } else {
        Vec3::ZERO
    };

    let drag = if speed > 0.0 {
        -(v / speed) * profile.drag_magnitude(speed)
    } else {
        Vec3::ZERO
    };

    let magnus = if profile.use_magnus && speed > 0.0 {
        profile.magnus_coeff * omega.cross(v)
    } else {
        Vec3::ZERO
    };

    AerodynamicLoads {
        weight: profile.mass * gravity,
        buoyancy,
        drag,
        magnus,
        align_torque: alignment_torque(profile, state.body_axis(), v),
        damping_torque: -profile.rotational_damping * omega,
        spin_decay_torque: -profile.spin_decay * omega,
    }
}
