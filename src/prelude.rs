//! Makes available common structures needed to run a simulation
//!
//! You may write `use pfmsim::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{Config, Dof, Ebc, Essential, LoadSchedule, SolveStatus, Split};
pub use crate::base::{ParamDamage, ParamPhaseField, SampleMeshes, SampleParams};
pub use crate::base::{BAR_LEFT_MARKER, BAR_RIGHT_MARKER, DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::fem::{EnergyFunctional, FemState, FileIo, ForceSeries};
pub use crate::fem::{ReactionRegion, SimulationReport, SolverStaggered};
