//! Implements the base structures for a phase-field fracture simulation

mod assembly;
mod config;
mod constants;
mod enums;
mod equations;
mod essential;
mod field_ndim;
mod idealization;
mod load_schedule;
mod parameters;
mod sample_meshes;
mod sample_params;
pub use crate::base::assembly::*;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::equations::*;
pub use crate::base::essential::*;
pub use crate::base::field_ndim::*;
pub use crate::base::idealization::*;
pub use crate::base::load_schedule::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_meshes::*;
pub use crate::base::sample_params::*;
