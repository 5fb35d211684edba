use glam::Vec3;
use serde::{Deserialize, Serialize};

use shuttle_aim::{ChargeConfig, CoordinatorConfig, CourtBounds, TargetingConfig};
use shuttle_core::context::{DEFAULT_FIXED_DT, PhysicsContext, STANDARD_GRAVITY};
use shuttle_core::error::ShotError;
use shuttle_flight::AerodynamicProfile;

/// Env var naming an alternative config file.
pub const CONFIG_ENV: &str = "SHUTTLE_SIM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/shuttle.toml";

/// World and scheduler settings for the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// World gravity (m/s²). A zero vector falls back to standard gravity.
    pub gravity: Vec3,
    /// Fixed physics step (s).
    pub fixed_dt: f32,
    /// Upper bound on steps per shot before the flight is abandoned.
    pub max_steps: u32,
    /// Height of the court floor plane.
    pub ground_height: f32,
    /// Points in the exported gravity-only preview.
    pub ghost_segments: usize,
    /// Where the hitter launches from.
    pub hitter_position: Vec3,
    pub hitter_forward: Vec3,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
            fixed_dt: DEFAULT_FIXED_DT,
            max_steps: 1500,
            ground_height: 0.0,
            ghost_segments: 32,
            hitter_position: Vec3::new(0.0, 1.0, -6.0),
            hitter_forward: Vec3::Z,
        }
    }
}

impl SimulationConfig {
    pub fn physics_context(&self) -> PhysicsContext {
        PhysicsContext::new(self.gravity, self.fixed_dt)
    }
}

/// Complete configuration for the shuttle simulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub simulation: SimulationConfig,
    pub profile: AerodynamicProfile,
    pub court: CourtBounds,
    pub targeting: TargetingConfig,
    pub coordinator: CoordinatorConfig,
    pub charge: ChargeConfig,
}

impl SimConfig {
    /// Load from `$SHUTTLE_SIM_CONFIG`, else `config/shuttle.toml`, else
    /// defaults. A file that fails to parse is reported and ignored.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        let config = match std::fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(cfg) => {
                    tracing::info!("Loaded config from {path}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    Self::default()
                },
            },
            Err(_) => {
                tracing::debug!("No config at {path}, using defaults");
                Self::default()
            },
        };
        config.sanitized()
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn sanitized(mut self) -> Self {
        self.profile = self.profile.sanitized();
        self
    }

    /// Check every section, logging each issue. Returns the first error.
    pub fn validate(&self) -> Result<(), ShotError> {
        let mut first: Option<ShotError> = None;
        let mut fail = |msg: String| {
            tracing::error!("Invalid config: {msg}");
            first.get_or_insert(ShotError::InvalidConfiguration(msg));
        };

        let sim = &self.simulation;
        if !(sim.fixed_dt > 0.0 && sim.fixed_dt.is_finite()) {
            fail(format!("simulation.fixed_dt must be positive, got {}", sim.fixed_dt));
        }
        if sim.max_steps == 0 {
            fail("simulation.max_steps must be > 0".into());
        }
        if sim.ghost_segments < 2 {
            tracing::warn!(
                segments = sim.ghost_segments,
                "simulation.ghost_segments below 2 is raised to 2"
            );
        }
        if sim.gravity.length_squared() <= 1e-6 {
            tracing::warn!("simulation.gravity is zero, standard gravity will be used");
        }

        if let Err(ShotError::InvalidConfiguration(msg)) = self.profile.validate() {
            fail(format!("profile: {msg}"));
        }

        let t = &self.targeting;
        if t.min_elevation_deg > t.max_elevation_deg {
            fail(format!(
                "targeting window is empty ({} > {})",
                t.min_elevation_deg, t.max_elevation_deg
            ));
        }

        let c = &self.coordinator;
        if c.max_launch_speed <= 0.0 {
            fail(format!(
                "coordinator.max_launch_speed must be positive, got {}",
                c.max_launch_speed
            ));
        }
        if !(0.0..=1.0).contains(&c.sweet_width) {
            fail(format!(
                "coordinator.sweet_width must be within [0, 1], got {}",
                c.sweet_width
            ));
        }
        if c.max_yaw_deg < 0.0 || c.max_pitch_deg < 0.0 {
            fail("coordinator override limits must not be negative".into());
        }

        if self.charge.seconds_to_full < 0.0 {
            fail("charge.seconds_to_full must not be negative".into());
        }

        let (min, max) = self.court.extents();
        if min.x == max.x || min.y == max.y {
            tracing::warn!(?min, ?max, "court rectangle has zero area");
        }

        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
