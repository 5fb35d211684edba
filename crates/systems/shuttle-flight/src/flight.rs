use std::sync::Arc;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use shuttle_core::context::PhysicsContext;
use shuttle_core::error::ShotError;

use crate::loads::aerodynamic_loads;
use crate::profile::AerodynamicProfile;

/// Kinematic state of one projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// rad/s, world frame.
    pub angular_velocity: Vec3,
    pub orientation: Quat,
    pub landed: bool,
}

impl Default for ProjectileState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            landed: false,
        }
    }
}

impl ProjectileState {
    pub fn launched(position: Vec3, velocity: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            velocity,
            orientation,
            ..Self::default()
        }
    }

    /// Body principal axis (local +Z, cork to skirt) in world space.
    pub fn body_axis(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlightPhase {
    Flying,
    /// Terminal; no further integration.
    Landed,
    /// Spawned without a usable profile or body; never simulated.
    Disabled,
}

/// How a landed body is held in place by the host physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingMode {
    Kinematic,
    Constrained,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FlightEvent {
    Landed { position: Vec3, flight_time: f32 },
    /// The post-landing delay has elapsed.
    RemovalDue,
    ConfigurationError(ShotError),
}

/// Free flight of one projectile, advanced once per fixed step.
#[derive(Debug, Clone)]
pub struct FlightModel {
    profile: Option<Arc<AerodynamicProfile>>,
    state: ProjectileState,
    phase: FlightPhase,
    landing_mode: Option<LandingMode>,
    elapsed: f32,
    removal_timer: Option<f32>,
    events: Vec<FlightEvent>,
}

impl FlightModel {
    /// Create a flight for `body` using `profile`.
    ///
    /// A missing profile or body, or a profile that fails validation, yields
    /// a [`FlightPhase::Disabled`] model that reports the problem once through
    /// its events. A body that is already landed starts in
    /// [`FlightPhase::Landed`] at rest.
    pub fn spawn(profile: Option<Arc<AerodynamicProfile>>, body: Option<ProjectileState>) -> Self {
        let profile = profile.map(|p| Arc::new(Arc::unwrap_or_clone(p).sanitized()));
        let problem = match (&profile, &body) {
            (None, _) => Some(ShotError::MissingConfiguration("aerodynamic profile".into())),
            (_, None) => Some(ShotError::MissingConfiguration("projectile body".into())),
            (Some(p), Some(_)) => p.validate().err(),
        };

        let mut model = Self {
            profile,
            state: body.unwrap_or_default(),
            phase: FlightPhase::Flying,
            landing_mode: None,
            elapsed: 0.0,
            removal_timer: None,
            events: Vec::new(),
        };

        if let Some(err) = problem {
            tracing::error!(error = %err, "Flight disabled");
            model.phase = FlightPhase::Disabled;
            model.events.push(FlightEvent::ConfigurationError(err));
        } else if model.state.landed {
            model.state.velocity = Vec3::ZERO;
            model.state.angular_velocity = Vec3::ZERO;
            model.phase = FlightPhase::Landed;
            model.landing_mode = model.profile.as_deref().map(landing_mode_for);
        }
        model
    }

    /// Launch from `position` with the given velocity and orientation.
    pub fn launch(
        profile: Arc<AerodynamicProfile>,
        position: Vec3,
        velocity: Vec3,
        orientation: Quat,
    ) -> Self {
        Self::spawn(
            Some(profile),
            Some(ProjectileState::launched(position, velocity, orientation)),
        )
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn state(&self) -> &ProjectileState {
        &self.state
    }

    pub fn profile(&self) -> Option<&AerodynamicProfile> {
        self.profile.as_deref()
    }

    pub fn is_flying(&self) -> bool {
        self.phase == FlightPhase::Flying
    }

    pub fn is_landed(&self) -> bool {
        self.phase == FlightPhase::Landed
    }

    pub fn landing_mode(&self) -> Option<LandingMode> {
        self.landing_mode
    }

    /// Seconds of simulated flight so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Replace the velocity after an external impact. Ignored unless flying.
    pub fn apply_impact(&mut self, velocity: Vec3, angular_velocity: Option<Vec3>) {
        if !self.is_flying() {
            return;
        }
        self.state.velocity = velocity;
        if let Some(omega) = angular_velocity {
            self.state.angular_velocity = omega;
        }
    }

    /// Advance one fixed step of `ctx.fixed_dt` seconds.
    pub fn step(&mut self, ctx: &PhysicsContext) {
        if self.phase != FlightPhase::Flying {
            return;
        }
        let Some(profile) = self.profile.as_deref() else {
            return;
        };
        let dt = ctx.fixed_dt;
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let gravity = profile.gravity_vector(ctx);
        let loads = aerodynamic_loads(profile, &self.state, gravity);
        let s = &mut self.state;

        // Semi-implicit Euler.
        s.velocity += loads.total_force() / profile.mass * dt;
        s.position += s.velocity * dt;

        // Damping and spin decay are linear in omega and folded in implicitly.
        let inertia = profile.moment_of_inertia;
        let damping = profile.rotational_damping + profile.spin_decay;
        let omega = (s.angular_velocity + loads.align_torque / inertia * dt)
            / (1.0 + damping / inertia * dt);
        s.angular_velocity = omega.clamp_length_max(profile.max_angular_velocity);

        let rotation = Quat::from_scaled_axis(s.angular_velocity * dt);
        s.orientation = (rotation * s.orientation).normalize();

        self.elapsed += dt;
    }

    /// Report contact with a surface tagged `tag`. Returns whether this
    /// contact landed the projectile.
    pub fn notify_contact(&mut self, tag: &str) -> bool {
        if self.phase != FlightPhase::Flying {
            return false;
        }
        let Some(profile) = self.profile.as_deref() else {
            return false;
        };
        if tag != profile.ground_tag {
            return false;
        }

        let mode = landing_mode_for(profile);
        let remove_after = profile.remove_after_secs;

        self.state.velocity = Vec3::ZERO;
        self.state.angular_velocity = Vec3::ZERO;
        self.state.landed = true;
        self.phase = FlightPhase::Landed;
        self.landing_mode = Some(mode);
        self.removal_timer = (remove_after > 0.0).then_some(remove_after);
        self.events.push(FlightEvent::Landed {
            position: self.state.position,
            flight_time: self.elapsed,
        });

        tracing::debug!(
            position = ?self.state.position,
            flight_time = self.elapsed,
            mode = ?mode,
            "Shuttle landed"
        );
        true
    }

    /// Count down the post-landing removal delay. Returns true on the call
    /// that makes removal due.
    pub fn advance_removal(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.removal_timer.as_mut() else {
            return false;
        };
        *remaining -= dt.max(0.0);
        if *remaining > 0.0 {
            return false;
        }
        self.removal_timer = None;
        self.events.push(FlightEvent::RemovalDue);
        true
    }

    pub fn drain_events(&mut self) -> Vec<FlightEvent> {
        std::mem::take(&mut self.events)
    }
}

fn landing_mode_for(profile: &AerodynamicProfile) -> LandingMode {
    if profile.freeze_on_land {
        LandingMode::Kinematic
    } else {
        LandingMode::Constrained
    }
}
