//! Maps a released charge onto a launch velocity.
//!
//! The planned direction normally comes from the validator's chosen arc, but
//! the speed is set only by the charge: the drag-free arc is a hint, not the
//! shot.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

use shuttle_core::math::clamp01;

/// Below this squared length a direction is treated as absent.
const DIRECTION_EPSILON_SQ: f32 = 1e-8;
/// Default width of the sweet-spot band on the power meter.
pub const DEFAULT_SWEET_WIDTH: f32 = 0.06;

/// A launch ready to be handed to the impact handler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreparedShot {
    /// Where the shot was planned from.
    pub origin: Vec3,
    pub launch_velocity: Vec3,
    /// Up vector for orienting the projectile along its launch direction.
    pub up_hint: Vec3,
    /// Simulation time the shot was armed, in seconds.
    pub created_at: f64,
}

impl PreparedShot {
    pub fn speed(&self) -> f32 {
        self.launch_velocity.length()
    }

    /// Rotation whose +Z looks along the launch velocity with +Y toward
    /// `up_hint`. Identity for a zero-speed shot.
    pub fn launch_orientation(&self) -> Quat {
        let forward = self.launch_velocity.normalize_or_zero();
        if forward == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        let mut x = self.up_hint.cross(forward);
        if x.length_squared() < DIRECTION_EPSILON_SQ {
            x = Vec3::Y.cross(forward);
            if x.length_squared() < DIRECTION_EPSILON_SQ {
                x = Vec3::X;
            }
        }
        let x = x.normalize();
        let y = forward.cross(x);
        Quat::from_mat3(&Mat3::from_cols(x, y, forward)).normalize()
    }
}

/// Sweet-spot band on a power meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweetSpot {
    /// Charge fraction that reproduces `perfect_speed`.
    pub perfect_power01: f32,
    pub width01: f32,
    pub perfect_speed: f32,
}

pub fn compute_sweet_spot(perfect_speed: f32, max_launch_speed: f32, width01: f32) -> SweetSpot {
    let perfect_power01 = if max_launch_speed > 1e-3 {
        clamp01(perfect_speed / max_launch_speed)
    } else {
        0.0
    };
    SweetSpot {
        perfect_power01,
        width01,
        perfect_speed,
    }
}

/// Right and up axes of the local aim frame around `dir`.
fn aim_frame(dir: Vec3, up_basis: Vec3) -> (Vec3, Vec3) {
    let up_ref = if up_basis.length_squared() > DIRECTION_EPSILON_SQ {
        up_basis.normalize()
    } else {
        Vec3::Y
    };
    let mut right = up_ref.cross(dir);
    if right.length_squared() < DIRECTION_EPSILON_SQ {
        right = Vec3::Y.cross(dir);
    }
    if right.length_squared() < DIRECTION_EPSILON_SQ {
        // dir is vertical; any horizontal axis is a valid right.
        right = Vec3::X;
    }
    let right = right.normalize();
    let up = dir.cross(right).normalize();
    (right, up)
}

/// Build the launch for a charge of `power01`.
///
/// `yaw_offset_deg` turns about the local up axis and `pitch_offset_deg`
/// about the local right axis, both relative to `base_direction`.
#[allow(clippy::too_many_arguments)]
pub fn build_prepared_shot(
    origin: Vec3,
    base_direction: Vec3,
    power01: f32,
    max_launch_speed: f32,
    yaw_offset_deg: f32,
    pitch_offset_deg: f32,
    up_basis: Vec3,
    created_at: f64,
) -> PreparedShot {
    let dir = if base_direction.length_squared() > DIRECTION_EPSILON_SQ {
        base_direction.normalize()
    } else {
        Vec3::Z
    };
    let (right, up) = aim_frame(dir, up_basis);

    let yaw = Quat::from_axis_angle(up, yaw_offset_deg.to_radians());
    let pitch = Quat::from_axis_angle(right, pitch_offset_deg.to_radians());
    let dir = ((yaw * pitch) * dir).normalize();

    let speed = clamp01(power01) * max_launch_speed.max(0.0);
    PreparedShot {
        origin,
        launch_velocity: dir * speed,
        up_hint: right,
        created_at,
    }
}
