use super::{ParamDamage, ParamPhaseField};
use std::f64::consts::PI;

/// Holds samples of material parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns parameters of the concrete bar under uniaxial tension (Cornelissen softening)
    ///
    /// Units: N and mm. The tensile strength is ft = 3 (a1 = 320/π).
    pub fn param_bar_cornelissen() -> ParamPhaseField {
        ParamPhaseField {
            young: 30000.0, // N/mm²
            poisson: 0.2,   // -
            gc: 0.12,       // N/mm
            ell: 5.0,       // mm
            k_res: 1e-6,    // -
            damage: ParamDamage::Cornelissen {
                a1: 320.0 / PI,
                a2: 1.3868,
                a3: 0.6567,
            },
            cw: None,
        }
    }

    /// Returns parameters of the concrete bar under uniaxial tension (linear softening)
    pub fn param_bar_linear_softening() -> ParamPhaseField {
        ParamPhaseField {
            damage: ParamDamage::LinearSoftening { a1: 320.0 / PI },
            ..SampleParams::param_bar_cornelissen()
        }
    }

    /// Returns parameters of the concrete beam of the three-point bending test
    ///
    /// Units: N and mm. The tensile strength is ft ≈ 2.4 (a1 = 628.7/π).
    pub fn param_beam_cornelissen() -> ParamPhaseField {
        ParamPhaseField {
            young: 20000.0, // N/mm²
            poisson: 0.2,   // -
            gc: 0.113,      // N/mm
            ell: 2.5,       // mm
            k_res: 1e-6,    // -
            damage: ParamDamage::Cornelissen {
                a1: 628.7 / PI,
                a2: 1.3868,
                a3: 0.6567,
            },
            cw: None,
        }
    }

    /// Returns unit-scale parameters (useful to check derivatives)
    pub fn param_unit(damage: ParamDamage) -> ParamPhaseField {
        ParamPhaseField {
            young: 1.0,
            poisson: 0.25,
            gc: 1.0,
            ell: 0.5,
            k_res: 1e-6,
            damage,
            cw: None,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
