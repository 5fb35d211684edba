use serde::{Deserialize, Serialize};

/// Failure taxonomy shared by the planning and flight crates.
///
/// Solver and validator entry points report these through tagged result
/// values (`exists`, `status`, `failure`); only the `try_*` variants and the
/// configuration loaders hand them back as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotError {
    /// Origin and target share a vertical line, so there is no horizontal bearing.
    DegenerateGeometry,
    /// Neither elevation candidate produced a usable arc.
    NoFeasibleArc,
    /// The single net-clearance correction did not lift the arc over the net.
    NetClearanceUnresolved,
    /// A required collaborator (profile, body, bounds) was absent.
    MissingConfiguration(String),
    /// A collaborator was present but malformed.
    InvalidConfiguration(String),
    /// A prepared shot is already waiting to be claimed.
    ShotAlreadyArmed,
}

impl std::fmt::Display for ShotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateGeometry => {
                write!(f, "origin and target have no horizontal separation")
            },
            Self::NoFeasibleArc => write!(f, "no ballistic arc reaches the target"),
            Self::NetClearanceUnresolved => {
                write!(f, "net clearance could not be reached in one correction")
            },
            Self::MissingConfiguration(what) => write!(f, "missing configuration: {what}"),
            Self::InvalidConfiguration(what) => write!(f, "invalid configuration: {what}"),
            Self::ShotAlreadyArmed => write!(f, "a prepared shot is already armed"),
        }
    }
}

impl std::error::Error for ShotError {}
