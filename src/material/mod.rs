//! Implements the constitutive functionals of the phase-field model

mod elastic_energy;
mod phase_field_model;
mod softening;
mod spectral;
pub use crate::material::elastic_energy::*;
pub use crate::material::phase_field_model::*;
pub use crate::material::softening::*;
pub use crate::material::spectral::*;
