//! Headless scheduler that plays one shot end to end: aim, charge, hand-off
//! and fixed-step flight until the shuttle lands.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use serde::Serialize;

use shuttle_aim::{
    AimSource, CourtBounds, FeasibilityResult, PowerMeter, PreparedShot, ShotCoordinator,
    ShotPlanProvider, ShotSlot, SpawnFrame, SweetSpot, TargetingSession,
};
use shuttle_core::context::PhysicsContext;
use shuttle_core::error::ShotError;
use shuttle_flight::{AerodynamicProfile, FlightEvent, FlightModel};

use crate::config::SimConfig;

/// Flat floor that reports contact once the projectile reaches it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundPlane {
    pub height: f32,
    pub tag: String,
}

impl GroundPlane {
    pub fn new(height: f32, tag: impl Into<String>) -> Self {
        Self {
            height,
            tag: tag.into(),
        }
    }

    /// Tag of the surface touched by a body at `position` moving with
    /// `velocity`, if any. Rising bodies never touch.
    pub fn contact(&self, position: Vec3, velocity: Vec3) -> Option<&str> {
        (position.y <= self.height && velocity.y <= 0.0).then_some(self.tag.as_str())
    }

    /// `position` projected onto the plane.
    pub fn touchdown_point(&self, position: Vec3) -> Vec3 {
        Vec3::new(position.x, self.height, position.z)
    }
}

/// Outcome of [`RallyRunner::play_shot`].
#[derive(Debug, Clone, Serialize)]
pub struct ShotReport {
    pub plan: Option<FeasibilityResult>,
    pub sweet_spot: SweetSpot,
    /// Charge at release.
    pub power01: f32,
    pub prepared: PreparedShot,
    /// Gravity-only preview of the planned arc.
    pub ghost_path: Vec<Vec3>,
    /// Final position (the touchdown point when `landed`).
    pub landing_point: Vec3,
    pub flight_time: f32,
    pub steps: u32,
    pub apex_height: f32,
    pub landed: bool,
}

pub struct RallyRunner {
    config: SimConfig,
    ctx: PhysicsContext,
    profile: Arc<AerodynamicProfile>,
    court: Arc<CourtBounds>,
    ground: GroundPlane,
}

impl RallyRunner {
    pub fn new(config: SimConfig) -> Result<Self, ShotError> {
        let config = config.sanitized();
        config.validate()?;
        let ctx = config.simulation.physics_context();
        let profile = Arc::new(config.profile.clone());
        let court = Arc::new(config.court.clone());
        let ground = GroundPlane::new(config.simulation.ground_height, profile.ground_tag.clone());
        Ok(Self {
            config,
            ctx,
            profile,
            court,
            ground,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn context(&self) -> &PhysicsContext {
        &self.ctx
    }

    /// Play one shot from `origin` toward `target`.
    ///
    /// `power01` is the charge to release at; `None` releases on the sweet
    /// spot. `pointer_delta` is a manual aim override held for one frame.
    pub fn play_shot(
        &self,
        origin: Vec3,
        target: Vec3,
        power01: Option<f32>,
        pointer_delta: Option<Vec2>,
    ) -> Result<ShotReport, ShotError> {
        let sim = &self.config.simulation;

        let mut session = TargetingSession::new(
            origin,
            Some(Arc::clone(&self.court)),
            &self.ctx,
            self.config.targeting.clone(),
        );
        let plan = session.update(Some(target)).cloned();
        if let Some(p) = &plan
            && !p.is_feasible()
        {
            tracing::warn!(
                status = ?p.status,
                failure = ?p.failure,
                "No planned arc, using fallback aim"
            );
        }

        let slot = Arc::new(ShotSlot::new());
        let spawn = SpawnFrame {
            position: origin,
            forward: sim.hitter_forward,
            up: Vec3::Y,
        };
        let mut coordinator =
            ShotCoordinator::new(self.config.coordinator.clone(), spawn, Arc::clone(&slot));
        coordinator.refresh_aim(Some(&session as &dyn AimSource));
        if pointer_delta.is_some() {
            coordinator.apply_override(pointer_delta, self.ctx.fixed_dt);
        }
        let sweet_spot = coordinator.sweet_spot();

        let wanted = power01.unwrap_or(sweet_spot.perfect_power01).clamp(0.0, 1.0);
        let released = self.charge_to(wanted)?;
        coordinator.on_power_released(released, 0.0)?;

        let prepared = slot
            .try_consume()
            .ok_or_else(|| ShotError::MissingConfiguration("armed shot".into()))?;

        let ghost_path: Vec<Vec3> = session
            .ghost_path(sim.ghost_segments)
            .map(Iterator::collect)
            .unwrap_or_default();

        let mut flight = FlightModel::launch(
            Arc::clone(&self.profile),
            prepared.origin,
            prepared.launch_velocity,
            prepared.launch_orientation(),
        );

        let mut apex = origin.y;
        let mut steps = 0;
        while steps < sim.max_steps && flight.is_flying() {
            flight.step(&self.ctx);
            steps += 1;
            let state = flight.state();
            apex = apex.max(state.position.y);
            if let Some(tag) = self.ground.contact(state.position, state.velocity) {
                flight.notify_contact(tag);
            }
        }

        let mut landing_point = flight.state().position;
        let mut flight_time = flight.elapsed();
        for event in flight.drain_events() {
            match event {
                FlightEvent::Landed {
                    position,
                    flight_time: t,
                } => {
                    landing_point = self.ground.touchdown_point(position);
                    flight_time = t;
                },
                FlightEvent::ConfigurationError(e) => return Err(e),
                FlightEvent::RemovalDue => {},
            }
        }
        if !flight.is_landed() {
            tracing::warn!(steps, "Shuttle still airborne after max_steps");
        }

        Ok(ShotReport {
            plan,
            sweet_spot,
            power01: released,
            prepared,
            ghost_path,
            landing_point,
            flight_time,
            steps,
            apex_height: apex,
            landed: flight.is_landed(),
        })
    }

    /// Hold the power meter just long enough to reach `power01`.
    fn charge_to(&self, power01: f32) -> Result<f32, ShotError> {
        let mut meter = PowerMeter::new(self.config.charge.clone());
        meter.begin_charge();
        meter.advance(power01 / self.config.charge.rate());
        meter
            .release()
            .ok_or_else(|| ShotError::MissingConfiguration("power charge".into()))
    }

    /// The hitter position from config.
    pub fn hitter(&self) -> Vec3 {
        self.config.simulation.hitter_position
    }
}
