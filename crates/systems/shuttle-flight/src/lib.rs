//! Forward simulation of a launched shuttlecock.
//!
//! [`AerodynamicProfile`] holds the shared, read-only tuning.
//! [`aerodynamic_loads`] evaluates the forces and torques for one state, and
//! [`FlightModel`] integrates them per fixed step until the projectile lands.

pub mod flight;
pub mod loads;
pub mod profile;

pub use flight::{FlightEvent, FlightModel, FlightPhase, LandingMode, ProjectileState};
pub use loads::{AerodynamicLoads, aerodynamic_loads};
pub use profile::{AerodynamicProfile, DragKey, DragTable, GravityMode};
