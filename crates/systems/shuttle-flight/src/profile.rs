use glam::Vec3;
use serde::{Deserialize, Serialize};

use shuttle_core::context::PhysicsContext;
use shuttle_core::error::ShotError;
use shuttle_core::math::smoothstep;

/// Ground tag used when a profile leaves it blank.
pub const DEFAULT_GROUND_TAG: &str = "CourtFloor";
/// Lowest allowed angular-velocity cap (rad/s).
pub const MIN_ANGULAR_VELOCITY_CAP: f32 = 0.1;
/// Bounds applied to the mixed-drag crossover speed.
const CROSSOVER_SPEED_RANGE: (f32, f32) = (0.01, 1000.0);

/// One point of the speed-to-drag-multiplier table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragKey {
    /// m/s
    pub speed: f32,
    pub multiplier: f32,
}

impl DragKey {
    pub const fn new(speed: f32, multiplier: f32) -> Self {
        Self { speed, multiplier }
    }
}

/// Piecewise-linear drag multiplier over speed.
///
/// Keys are strictly increasing in speed. Outside the keyed range the nearest
/// edge value is held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DragKey>", into = "Vec<DragKey>")]
pub struct DragTable {
    keys: Vec<DragKey>,
}

impl Default for DragTable {
    fn default() -> Self {
        Self {
            keys: vec![
                DragKey::new(0.0, 1.05),
                DragKey::new(10.0, 0.9),
                DragKey::new(30.0, 0.7),
                DragKey::new(50.0, 0.6),
            ],
        }
    }
}

impl TryFrom<Vec<DragKey>> for DragTable {
    type Error = ShotError;

    fn try_from(keys: Vec<DragKey>) -> Result<Self, Self::Error> {
        if keys.is_empty() {
            return Err(ShotError::InvalidConfiguration(
                "drag table needs at least one key".into(),
            ));
        }
        if let Some(bad) = keys
            .iter()
            .find(|k| !k.speed.is_finite() || !k.multiplier.is_finite())
        {
            return Err(ShotError::InvalidConfiguration(format!(
                "drag table key at speed {} is not finite",
                bad.speed
            )));
        }
        if let Some(pair) = keys.windows(2).find(|w| w[1].speed <= w[0].speed) {
            return Err(ShotError::InvalidConfiguration(format!(
                "drag table speeds must increase ({} then {})",
                pair[0].speed, pair[1].speed
            )));
        }
        Ok(Self { keys })
    }
}

impl From<DragTable> for Vec<DragKey> {
    fn from(table: DragTable) -> Self {
        table.keys
    }
}

impl DragTable {
    pub fn keys(&self) -> &[DragKey] {
        &self.keys
    }

    /// Multiplier at `speed`, never negative.
    pub fn evaluate(&self, speed: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        let raw = if speed <= first.speed {
            first.multiplier
        } else if speed >= last.speed {
            last.multiplier
        } else {
            // In range, so some window brackets the speed.
            self.keys
                .windows(2)
                .find(|w| speed <= w[1].speed)
                .map(|w| {
                    let t = (speed - w[0].speed) / (w[1].speed - w[0].speed);
                    w[0].multiplier + (w[1].multiplier - w[0].multiplier) * t
                })
                .unwrap_or(last.multiplier)
        };
        raw.max(0.0)
    }
}

/// Source of the gravity vector used by a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityMode {
    /// The world gravity from the [`PhysicsContext`].
    #[default]
    World,
    Custom(Vec3),
}

/// Shared aerodynamic tuning for one kind of projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AerodynamicProfile {
    /// kg
    pub mass: f32,
    /// Effective projected area (m²).
    pub area: f32,
    /// kg/m³
    pub air_density: f32,
    /// Baseline drag coefficient.
    pub drag_coefficient: f32,
    pub use_speed_dependent_cd: bool,
    pub drag_table: DragTable,
    /// Blend linear drag at low speed into quadratic drag at high speed.
    pub use_mixed_drag: bool,
    pub transition_low: f32,
    pub transition_high: f32,
    /// Torque per radian of misalignment between body axis and velocity.
    pub align_stiffness: f32,
    pub rotational_damping: f32,
    pub spin_decay: f32,
    pub use_magnus: bool,
    pub magnus_coeff: f32,
    pub gravity: GravityMode,
    pub use_buoyancy: bool,
    /// Share of weight applied against gravity.
    pub buoyancy_fraction: f32,
    /// rad/s
    pub max_angular_velocity: f32,
    /// Isotropic moment of inertia (kg·m²).
    pub moment_of_inertia: f32,
    pub ground_tag: String,
    /// Landed bodies become kinematic; otherwise they stay dynamic with all
    /// motion constrained.
    pub freeze_on_land: bool,
    /// Delay before a landed projectile is removed. Zero or less keeps it.
    pub remove_after_secs: f32,
}

impl Default for AerodynamicProfile {
    fn default() -> Self {
        Self {
            mass: 0.005,
            area: 0.003,
            air_density: 1.225,
            drag_coefficient: 0.6,
            use_speed_dependent_cd: true,
            drag_table: DragTable::default(),
            use_mixed_drag: true,
            transition_low: 5.0,
            transition_high: 12.0,
            align_stiffness: 0.1,
            rotational_damping: 0.02,
            spin_decay: 0.5,
            use_magnus: false,
            magnus_coeff: 0.0005,
            gravity: GravityMode::World,
            use_buoyancy: true,
            buoyancy_fraction: 0.02,
            max_angular_velocity: 200.0,
            moment_of_inertia: 1e-4,
            ground_tag: DEFAULT_GROUND_TAG.into(),
            freeze_on_land: true,
            remove_after_secs: 5.0,
        }
    }
}

impl AerodynamicProfile {
    /// Repair values that are merely inconsistent rather than wrong.
    pub fn sanitized(mut self) -> Self {
        if self.transition_high < self.transition_low {
            self.transition_high = self.transition_low + 0.01;
        }
        if self.ground_tag.trim().is_empty() {
            self.ground_tag = DEFAULT_GROUND_TAG.into();
        }
        self.max_angular_velocity = self.max_angular_velocity.max(MIN_ANGULAR_VELOCITY_CAP);
        self
    }

    /// Reject values no step could integrate sensibly.
    pub fn validate(&self) -> Result<(), ShotError> {
        let checks = [
            (self.mass > 0.0, "mass must be positive"),
            (self.moment_of_inertia > 0.0, "moment_of_inertia must be positive"),
            (self.area >= 0.0, "area must not be negative"),
            (self.air_density >= 0.0, "air_density must not be negative"),
            (self.drag_coefficient >= 0.0, "drag_coefficient must not be negative"),
            (
                (0.0..=1.0).contains(&self.buoyancy_fraction),
                "buoyancy_fraction must be within [0, 1]",
            ),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, msg)) => Err(ShotError::InvalidConfiguration((*msg).into())),
            None => Ok(()),
        }
    }

    /// Gravity acceleration for this profile under `ctx`.
    pub fn gravity_vector(&self, ctx: &PhysicsContext) -> Vec3 {
        match self.gravity {
            GravityMode::World => ctx.effective_gravity(),
            GravityMode::Custom(g) => g,
        }
    }

    /// Drag coefficient after the speed-dependent multiplier.
    pub fn effective_drag_coefficient(&self, speed: f32) -> f32 {
        if self.use_speed_dependent_cd {
            self.drag_coefficient * self.drag_table.evaluate(speed)
        } else {
            self.drag_coefficient
        }
    }

    /// Speed where the linear and quadratic regimes have equal magnitude.
    pub fn crossover_speed(&self) -> f32 {
        let (lo, hi) = CROSSOVER_SPEED_RANGE;
        ((self.transition_low + self.transition_high) * 0.5).clamp(lo, hi)
    }

    /// Drag force magnitude (N) at `speed`.
    pub fn drag_magnitude(&self, speed: f32) -> f32 {
        if speed <= 0.0 {
            return 0.0;
        }
        let k2 = 0.5 * self.air_density * self.effective_drag_coefficient(speed) * self.area;
        if !self.use_mixed_drag {
            return k2 * speed * speed;
        }
        let k1 = k2 * self.crossover_speed();
        let t = smoothstep(self.transition_low, self.transition_high, speed);
        (1.0 - t) * k1 * speed + t * k2 * speed * speed
    }
}
