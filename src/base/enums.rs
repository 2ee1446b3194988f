use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines degrees-of-freedom (DOF) types
///
/// Note: The fixed numbering scheme assists in sorting the DOFs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deserialize, Serialize)]
pub enum Dof {
    /// Displacement along the first dimension
    Ux = 0,

    /// Displacement along the second dimension
    Uy = 1,

    /// Damage (phase field)
    Alpha = 2,
}

/// Defines how the strain energy is split into a degraded and a non-degraded part
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Split {
    /// The whole strain energy is degraded (Ψ⁺ = Ψ and Ψ⁻ = 0)
    NoSplit,

    /// Spectral decomposition of the strain tensor (only the tensile part is degraded)
    ///
    /// **Note:** In 1D this reduces to the identity split (same as [Split::NoSplit]).
    Spectral,
}

/// Holds the outcome of an inner solve or of the staggered loop
///
/// A capped result is the best iterate found before the iteration limit (or a line search
/// failure) and is accepted by the caller, but it must be distinguishable from a converged one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum SolveStatus {
    /// The tolerance has been satisfied
    Converged,

    /// The iteration limit has been reached (best-effort result)
    Capped,
}

impl SolveStatus {
    /// Returns true if the status is [SolveStatus::Converged]
    pub fn converged(&self) -> bool {
        *self == SolveStatus::Converged
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Converged => write!(f, "converged"),
            SolveStatus::Capped => write!(f, "capped"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
