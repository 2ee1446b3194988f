use super::{ElasticEnergy, Softening, SofteningTrait};
use crate::base::{Config, Idealization, ParamPhaseField};
use crate::StrError;

/// Combines the elastic energy with the softening law and the fracture parameters
///
/// Local (density) terms of the total energy:
///
/// ```text
/// elastic:      a(α) Ψ⁺(ε) + Ψ⁻(ε)
/// dissipated:   (Gc/c_w) (w(α)/ℓ + ℓ |∇α|²)
/// ```
pub struct PhaseFieldModel {
    /// Strain energy with tensile/compressive split
    pub elastic: ElasticEnergy,

    /// Softening law
    pub softening: Box<dyn SofteningTrait>,

    /// Critical energy release rate
    pub gc: f64,

    /// Regularization length
    pub ell: f64,

    /// Normalization constant of the dissipated energy
    pub cw: f64,
}

impl PhaseFieldModel {
    /// Allocates a new instance using the softening law selected by the parameters
    pub fn new(ndim: usize, param: &ParamPhaseField, config: &Config) -> Result<Self, StrError> {
        let softening = Softening::new(param)?;
        PhaseFieldModel::with_softening(ndim, param, config, Box::new(softening))
    }

    /// Allocates a new instance with a custom softening law
    pub fn with_softening(
        ndim: usize,
        param: &ParamPhaseField,
        config: &Config,
        softening: Box<dyn SofteningTrait>,
    ) -> Result<Self, StrError> {
        if ndim < 1 || ndim > 2 {
            return Err("ndim must be 1 or 2");
        }
        param.validate()?;
        let ideal = Idealization::from_config(ndim, config);
        Ok(PhaseFieldModel {
            elastic: ElasticEnergy::new(&ideal, param, config.split),
            softening,
            gc: param.gc,
            ell: param.ell,
            cw: param.cw(),
        })
    }

    /// Returns the local dissipated energy density (Gc/c_w) w(α)/ℓ
    pub fn dissipation(&self, alpha: f64) -> f64 {
        self.gc / self.cw * self.softening.w(alpha) / self.ell
    }

    /// Returns the first derivative of the local dissipated energy density
    pub fn dissipation_deriv1(&self, alpha: f64) -> f64 {
        self.gc / self.cw * self.softening.dw(alpha) / self.ell
    }

    /// Returns the second derivative of the local dissipated energy density
    pub fn dissipation_deriv2(&self, alpha: f64) -> f64 {
        self.gc / self.cw * self.softening.d2w(alpha) / self.ell
    }

    /// Returns the coefficient (Gc/c_w) ℓ of the gradient term |∇α|²
    pub fn gradient_coefficient(&self) -> f64 {
        self.gc / self.cw * self.ell
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
