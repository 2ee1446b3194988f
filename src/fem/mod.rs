//! Implements the finite element method and the staggered (alternate minimization) algorithm

mod alternate_minimization;
mod control_convergence;
mod element_phase_field;
mod energy_functional;
mod fem_state;
mod file_io;
mod file_io_write_vtu;
mod irreversibility;
mod linear_system;
mod post_processing;
mod prescribed_values;
mod solver_damage;
mod solver_displacement;
mod solver_staggered;
pub use crate::fem::alternate_minimization::*;
pub use crate::fem::control_convergence::*;
pub use crate::fem::element_phase_field::*;
pub use crate::fem::energy_functional::*;
pub use crate::fem::fem_state::*;
pub use crate::fem::file_io::*;
pub use crate::fem::irreversibility::*;
pub use crate::fem::linear_system::*;
pub use crate::fem::post_processing::*;
pub use crate::fem::prescribed_values::*;
pub use crate::fem::solver_damage::*;
pub use crate::fem::solver_displacement::*;
pub use crate::fem::solver_staggered::*;
