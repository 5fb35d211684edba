//! Aim state: free aiming that follows the pointer, or a locked landing point
//! that is re-planned every update.

use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use shuttle_core::context::PhysicsContext;
use shuttle_core::error::ShotError;

use crate::ballistic::{self, BallisticSolution, TrajectorySamples};
use crate::coordinator::AimSource;
use crate::court::CourtBounds;
use crate::validator::{self, ElevationWindow, Feasibility, FeasibilityResult};

/// Arc preference and elevation window for aim planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    pub prefer_low_arc: bool,
    pub min_elevation_deg: f32,
    pub max_elevation_deg: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            prefer_low_arc: true,
            min_elevation_deg: 15.0,
            max_elevation_deg: 75.0,
        }
    }
}

impl TargetingConfig {
    pub fn window(&self) -> ElevationWindow {
        ElevationWindow::new(self.min_elevation_deg, self.max_elevation_deg)
    }
}

/// What the reticle should display for the current plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReticleState {
    #[default]
    Hidden,
    Valid,
    /// Feasible, but the landing point was moved.
    Clamped,
    Invalid,
}

impl ReticleState {
    pub fn from_plan(plan: &FeasibilityResult) -> Self {
        if !plan.is_feasible() {
            return Self::Invalid;
        }
        match plan.status {
            Feasibility::ClampedToBounds | Feasibility::AdjustedForNetClearance => Self::Clamped,
            Feasibility::Valid => Self::Valid,
            Feasibility::NoSolution => Self::Invalid,
        }
    }
}

pub struct TargetingSession {
    origin: Vec3,
    court: Option<Arc<CourtBounds>>,
    gravity: Vec3,
    config: TargetingConfig,
    locked_point: Option<Vec3>,
    plan: Option<FeasibilityResult>,
    reticle: ReticleState,
}

impl TargetingSession {
    pub fn new(
        origin: Vec3,
        court: Option<Arc<CourtBounds>>,
        ctx: &PhysicsContext,
        config: TargetingConfig,
    ) -> Self {
        Self {
            origin,
            court,
            gravity: ctx.effective_gravity(),
            config,
            locked_point: None,
            plan: None,
            reticle: ReticleState::Hidden,
        }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Move the shot origin (the hitter moved). Takes effect next update.
    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn is_locked(&self) -> bool {
        self.locked_point.is_some()
    }

    pub fn locked_point(&self) -> Option<Vec3> {
        self.locked_point
    }

    pub fn current_plan(&self) -> Option<&FeasibilityResult> {
        self.plan.as_ref()
    }

    pub fn reticle(&self) -> ReticleState {
        self.reticle
    }

    /// Re-plan for this frame.
    ///
    /// While unlocked `candidate` is the point under the pointer (`None` when
    /// it misses the court, which hides the aim). While locked the candidate
    /// is ignored and the locked point is planned again.
    pub fn update(&mut self, candidate: Option<Vec3>) -> Option<&FeasibilityResult> {
        let Some(target) = self.locked_point.or(candidate) else {
            self.plan = None;
            self.reticle = ReticleState::Hidden;
            return None;
        };

        let plan = validator::validate_and_plan(
            self.origin,
            target,
            self.court.as_deref(),
            self.gravity,
            self.config.window(),
            self.config.prefer_low_arc,
        );
        self.reticle = ReticleState::from_plan(&plan);
        self.plan = Some(plan);
        self.plan.as_ref()
    }

    /// Lock the adjusted target of the current plan.
    pub fn try_lock(&mut self) -> Result<Vec3, ShotError> {
        let plan = self.plan.as_ref().ok_or(ShotError::NoFeasibleArc)?;
        let chosen = plan
            .usable_solution()
            .ok_or_else(|| plan.failure.clone().unwrap_or(ShotError::NoFeasibleArc))?;
        let point = plan.adjusted_target;
        tracing::info!(
            target = ?point,
            status = ?plan.status,
            elevation_deg = chosen.elevation_deg,
            "Locked target"
        );
        self.locked_point = Some(point);
        Ok(point)
    }

    pub fn unlock(&mut self) {
        if self.locked_point.take().is_some() {
            self.plan = None;
            self.reticle = ReticleState::Hidden;
            tracing::info!("Unlocked target");
        }
    }

    /// Gravity-only preview of the chosen arc.
    pub fn ghost_path(&self, segments: usize) -> Option<TrajectorySamples> {
        let chosen = self.plan.as_ref()?.usable_solution()?;
        Some(ballistic::sample(
            self.origin,
            chosen.launch_velocity,
            self.gravity,
            chosen.flight_time,
            segments,
        ))
    }
}

impl AimSource for TargetingSession {
    fn chosen_solution(&self) -> Option<BallisticSolution> {
        self.plan.as_ref()?.usable_solution().copied()
    }
}
