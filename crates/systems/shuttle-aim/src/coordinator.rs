//! Bridges aiming and charging into a single armed shot.
//!
//! The coordinator reads the ideal arc through [`AimSource`], keeps the small
//! manual yaw/pitch offsets, and on release arms a [`PreparedShot`] in a
//! [`ShotSlot`] that the impact handler drains exactly once.

use std::sync::{Arc, Mutex, MutexGuard};

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use shuttle_core::error::ShotError;
use shuttle_core::math::move_towards;

use crate::ballistic::BallisticSolution;
use crate::planner::{self, DEFAULT_SWEET_WIDTH, PreparedShot, SweetSpot};

/// Anything that can report the currently chosen ideal arc.
pub trait AimSource {
    fn chosen_solution(&self) -> Option<BallisticSolution>;
}

/// Consumer side of the armed-shot handoff.
pub trait ShotPlanProvider {
    fn has_plan(&self) -> bool;
    /// Claim the armed shot. Only the first caller after arming gets it.
    fn try_consume(&self) -> Option<PreparedShot>;
}

/// Single-slot handoff between the power release and the impact handler.
#[derive(Debug, Default)]
pub struct ShotSlot {
    inner: Mutex<Option<PreparedShot>>,
}

impl ShotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PreparedShot>> {
        // A panicked holder cannot leave the Option half-written.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store `shot`. Fails if a shot is already waiting.
    pub fn arm(&self, shot: PreparedShot) -> Result<(), ShotError> {
        let mut slot = self.lock();
        if slot.is_some() {
            return Err(ShotError::ShotAlreadyArmed);
        }
        *slot = Some(shot);
        Ok(())
    }

    /// Check and clear in one step.
    pub fn take(&self) -> Option<PreparedShot> {
        self.lock().take()
    }

    pub fn is_armed(&self) -> bool {
        self.lock().is_some()
    }
}

impl ShotPlanProvider for ShotSlot {
    fn has_plan(&self) -> bool {
        self.is_armed()
    }

    fn try_consume(&self) -> Option<PreparedShot> {
        self.take()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Launch speed at full charge (m/s).
    pub max_launch_speed: f32,
    pub sweet_width: f32,
    /// Degrees of yaw per unit of horizontal pointer delta.
    pub yaw_sensitivity_deg: f32,
    pub pitch_sensitivity_deg: f32,
    pub max_yaw_deg: f32,
    pub max_pitch_deg: f32,
    /// Rate offsets return to zero when no override is held (deg/s).
    pub relax_deg_per_sec: f32,
    /// Share of `max_launch_speed` assumed ideal when no aim is available.
    pub fallback_speed_fraction: f32,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_launch_speed: 35.0,
            sweet_width: DEFAULT_SWEET_WIDTH,
            yaw_sensitivity_deg: 0.6,
            pitch_sensitivity_deg: 0.6,
            max_yaw_deg: 8.0,
            max_pitch_deg: 8.0,
            relax_deg_per_sec: 30.0,
            fallback_speed_fraction: 0.6,
        }
    }
}

/// Position and axes of the point shots are launched from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnFrame {
    pub position: Vec3,
    pub forward: Vec3,
    /// Up basis for the manual yaw/pitch frame.
    pub up: Vec3,
}

impl Default for SpawnFrame {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Z,
            up: Vec3::Y,
        }
    }
}

pub struct ShotCoordinator {
    config: CoordinatorConfig,
    spawn: SpawnFrame,
    slot: Arc<ShotSlot>,
    yaw_deg: f32,
    pitch_deg: f32,
    perfect_speed: f32,
    base_direction: Vec3,
}

impl ShotCoordinator {
    pub fn new(config: CoordinatorConfig, spawn: SpawnFrame, slot: Arc<ShotSlot>) -> Self {
        let mut coordinator = Self {
            config,
            spawn,
            slot,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            perfect_speed: 0.0,
            base_direction: Vec3::Z,
        };
        coordinator.refresh_aim(None);
        coordinator
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn set_spawn(&mut self, spawn: SpawnFrame) {
        self.spawn = spawn;
    }

    /// Handle for the consumer side of the handoff.
    pub fn slot(&self) -> Arc<ShotSlot> {
        Arc::clone(&self.slot)
    }

    pub fn offsets_deg(&self) -> (f32, f32) {
        (self.yaw_deg, self.pitch_deg)
    }

    pub fn base_direction(&self) -> Vec3 {
        self.base_direction
    }

    pub fn perfect_speed(&self) -> f32 {
        self.perfect_speed
    }

    /// Pull the ideal direction and speed from `aim`, falling back to the
    /// spawn forward at a fixed share of the speed cap.
    pub fn refresh_aim(&mut self, aim: Option<&dyn AimSource>) {
        let mut perfect = aim
            .and_then(|a| a.chosen_solution())
            .map(|s| s.launch_velocity)
            .unwrap_or(Vec3::ZERO);

        if perfect.length_squared() < 1e-6 {
            let forward = self.spawn.forward.normalize_or(Vec3::Z);
            perfect = forward * (self.config.fallback_speed_fraction * self.config.max_launch_speed);
        }

        self.perfect_speed = perfect.length();
        self.base_direction = perfect.normalize_or(Vec3::Z);
    }

    /// Apply one frame of manual override. `Some(delta)` while the override is
    /// held (pointer delta in input units); `None` relaxes the offsets.
    pub fn apply_override(&mut self, pointer_delta: Option<Vec2>, dt: f32) {
        let c = &self.config;
        match pointer_delta {
            Some(delta) => {
                self.yaw_deg =
                    (self.yaw_deg + delta.x * c.yaw_sensitivity_deg).clamp(-c.max_yaw_deg, c.max_yaw_deg);
                self.pitch_deg = (self.pitch_deg - delta.y * c.pitch_sensitivity_deg)
                    .clamp(-c.max_pitch_deg, c.max_pitch_deg);
            },
            None => {
                let step = c.relax_deg_per_sec * dt.max(0.0);
                self.yaw_deg = move_towards(self.yaw_deg, 0.0, step);
                self.pitch_deg = move_towards(self.pitch_deg, 0.0, step);
            },
        }
    }

    pub fn sweet_spot(&self) -> SweetSpot {
        planner::compute_sweet_spot(
            self.perfect_speed,
            self.config.max_launch_speed,
            self.config.sweet_width,
        )
    }

    /// Build the shot for a released charge and arm it.
    pub fn on_power_released(&mut self, power01: f32, now: f64) -> Result<PreparedShot, ShotError> {
        let shot = planner::build_prepared_shot(
            self.spawn.position,
            self.base_direction,
            power01,
            self.config.max_launch_speed,
            self.yaw_deg,
            self.pitch_deg,
            self.spawn.up,
            now,
        );

        if let Err(e) = self.slot.arm(shot) {
            tracing::warn!(error = %e, power = power01, "Shot not armed");
            return Err(e);
        }

        tracing::info!(
            speed = shot.speed(),
            yaw = self.yaw_deg,
            pitch = self.pitch_deg,
            power = power01,
            "Armed shot"
        );
        Ok(shot)
    }
}

impl ShotPlanProvider for ShotCoordinator {
    fn has_plan(&self) -> bool {
        self.slot.is_armed()
    }

    fn try_consume(&self) -> Option<PreparedShot> {
        self.slot.take()
    }
}
