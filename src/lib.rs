//! Pfmsim -- Phase-field fracture simulator
//!
//! This crate implements the staggered (alternate minimization) solution of the phase-field model
//! of brittle and cohesive fracture. The displacement problem (with the damage held fixed) is solved
//! with Newton-Raphson iterations; the damage problem (with the displacement held fixed) is solved
//! with a bound-constrained projected Newton method. Irreversibility is enforced by locking the
//! converged damage of each load step as the lower bound of the next ones.
//!
//! # Example
//!
//! ```
//! use gemlab::prelude::*;
//! use pfmsim::{prelude::*, StrError};
//!
//! fn main() -> Result<(), StrError> {
//!     // mesh and parameters
//!     let mesh = SampleMeshes::bar(1.0, 4)?;
//!     let param = SampleParams::param_unit(ParamDamage::At2);
//!     let config = Config::new();
//!     let functional = EnergyFunctional::new(&mesh, &param, &config)?;
//!
//!     // boundary conditions
//!     let left = mesh.search_first_marked_point(BAR_LEFT_MARKER, any_x)?;
//!     let right = mesh.search_first_marked_point(BAR_RIGHT_MARKER, any_x)?;
//!     let mut essential = Essential::new();
//!     essential
//!         .at(&[left], Dof::Ux, Ebc::Fixed(0.0))?
//!         .at(&[right], Dof::Ux, Ebc::Loaded(1.0))?;
//!
//!     // reaction region and load schedule
//!     let region = ReactionRegion::at_bar_end(&mesh, right, config.thickness)?;
//!     let schedule = LoadSchedule::uniform_from_total(0.2, 4)?;
//!
//!     // simulation
//!     let solver = SolverStaggered::new(&config, &mesh, &functional, &essential, schedule, region)?;
//!     let mut state = FemState::new(&mesh, &essential)?;
//!     let mut series = ForceSeries::new();
//!     solver.solve(&mut state, &mut series, &mut FileIo::new())?;
//!     assert_eq!(series.len(), 5);
//!     Ok(())
//! }
//! ```

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod material;
pub mod prelude;
