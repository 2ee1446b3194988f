use crate::StrError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Holds parameters of the softening (damage) law
///
/// The variant selects the dissipation shape `w(α)`, the degradation function `a(α)` and
/// the default normalization constant `c_w`:
///
/// ```text
///                     w(α)         a(α) without the residual floor        c_w
/// At1                 α            (1-α)²                                8/3
/// At2                 α²           (1-α)²                                2
/// Cornelissen         2α - α²      (1-α)² / ((1-α)² + Q(α))              π
/// LinearSoftening     2α - α²      (1-α)² / ((1-α)² + Q(α))              π
///
/// Q(α) = a1 α + a1 a2 α² + a1 a2 a3 α³
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum ParamDamage {
    /// Ambrosio-Tortorelli model with linear dissipation (elastic stage before damage)
    At1,

    /// Ambrosio-Tortorelli model with quadratic dissipation
    At2,

    /// Cohesive phase-field model calibrated to the Cornelissen softening curve
    Cornelissen {
        /// Coefficient a1 = 4 E Gc / (π ℓ ft²)
        a1: f64,

        /// Shape coefficient (1.3868 for the Cornelissen curve)
        a2: f64,

        /// Shape coefficient (0.6567 for the Cornelissen curve)
        a3: f64,
    },

    /// Cohesive phase-field model calibrated to a linear softening curve (a2 = -1/2, a3 = 0)
    LinearSoftening {
        /// Coefficient a1 = 4 E Gc / (π ℓ ft²)
        a1: f64,
    },
}

impl ParamDamage {
    /// Returns the coefficient a1 = 4 E Gc / (π ℓ ft²) of the cohesive models
    pub fn calc_a1(young: f64, gc: f64, ell: f64, ft: f64) -> Result<f64, StrError> {
        if young <= 0.0 || gc <= 0.0 || ell <= 0.0 || ft <= 0.0 {
            return Err("young, gc, ell, and ft must be > 0.0");
        }
        Ok(4.0 * young * gc / (PI * ell * ft * ft))
    }

    /// Allocates the Cornelissen law given the tensile strength
    pub fn cornelissen(young: f64, gc: f64, ell: f64, ft: f64) -> Result<Self, StrError> {
        Ok(ParamDamage::Cornelissen {
            a1: ParamDamage::calc_a1(young, gc, ell, ft)?,
            a2: 1.3868,
            a3: 0.6567,
        })
    }

    /// Allocates the linear softening law given the tensile strength
    pub fn linear_softening(young: f64, gc: f64, ell: f64, ft: f64) -> Result<Self, StrError> {
        Ok(ParamDamage::LinearSoftening {
            a1: ParamDamage::calc_a1(young, gc, ell, ft)?,
        })
    }

    /// Returns the default normalization constant of the dissipated energy
    pub fn default_cw(&self) -> f64 {
        match self {
            ParamDamage::At1 => 8.0 / 3.0,
            ParamDamage::At2 => 2.0,
            ParamDamage::Cornelissen { .. } => PI,
            ParamDamage::LinearSoftening { .. } => PI,
        }
    }
}

/// Holds the material parameters of the phase-field model
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamPhaseField {
    /// Young's modulus
    pub young: f64,

    /// Poisson's coefficient (ignored in 1D)
    pub poisson: f64,

    /// Critical energy release rate (fracture toughness)
    pub gc: f64,

    /// Regularization length
    pub ell: f64,

    /// Residual stiffness (strictly positive)
    pub k_res: f64,

    /// Softening law
    pub damage: ParamDamage,

    /// Normalization constant of the dissipated energy (None means the default of the softening law)
    pub cw: Option<f64>,
}

impl ParamPhaseField {
    /// Returns the normalization constant of the dissipated energy
    pub fn cw(&self) -> f64 {
        match self.cw {
            Some(value) => value,
            None => self.damage.default_cw(),
        }
    }

    /// Returns an error message if some parameter is invalid
    pub fn validate(&self) -> Result<(), StrError> {
        if self.young <= 0.0 {
            return Err("young must be > 0.0");
        }
        if self.poisson < 0.0 || self.poisson >= 0.5 {
            return Err("poisson must be in [0.0, 0.5)");
        }
        if self.gc <= 0.0 {
            return Err("gc must be > 0.0");
        }
        if self.ell <= 0.0 {
            return Err("ell must be > 0.0");
        }
        if self.k_res <= 0.0 || self.k_res >= 1.0 {
            return Err("k_res must be in (0.0, 1.0)");
        }
        if self.cw() <= 0.0 {
            return Err("cw must be > 0.0");
        }
        match self.damage {
            ParamDamage::Cornelissen { a1, .. } | ParamDamage::LinearSoftening { a1 } => {
                if a1 <= 0.0 {
                    return Err("a1 must be > 0.0");
                }
            }
            _ => (),
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
