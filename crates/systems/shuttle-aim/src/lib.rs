//! Shot planning for the shuttle game.
//!
//! The gravity-only [`ballistic`] solver feeds the feasibility
//! [`validator`], whose chosen arc drives the aim presentation and seeds the
//! [`planner`] when a charged shot is released. The [`targeting`] session and
//! the [`coordinator`] are the stateful pieces that sit between player intent
//! and a one-shot [`planner::PreparedShot`].

pub mod ballistic;
pub mod coordinator;
pub mod court;
pub mod planner;
pub mod power;
pub mod targeting;
pub mod validator;

pub use ballistic::{ArcKind, ArcPair, BallisticSolution};
pub use coordinator::{
    AimSource, CoordinatorConfig, ShotCoordinator, ShotPlanProvider, ShotSlot, SpawnFrame,
};
pub use court::{CourtBounds, CourtGeometry};
pub use planner::{PreparedShot, SweetSpot};
pub use power::{ChargeConfig, PowerMeter};
pub use targeting::{ReticleState, TargetingConfig, TargetingSession};
pub use validator::{ElevationWindow, Feasibility, FeasibilityResult};
