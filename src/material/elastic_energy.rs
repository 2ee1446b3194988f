use super::{heaviside, neg, pos, strain_split, tensile_projection, Spectral2d};
use crate::base::{Idealization, ParamPhaseField, Split};
use nalgebra::{DMatrix, DVector};

/// Holds the split strain energy density and its first and second derivatives
///
/// Vectors and matrices use the Mandel basis (size 1 in 1D; size 3 in 2D).
#[derive(Clone, Debug)]
pub struct EnergyDensity {
    /// Tensile (degraded) strain energy density Ψ⁺
    pub psi_plus: f64,

    /// Compressive (non-degraded) strain energy density Ψ⁻
    pub psi_minus: f64,

    /// Tensile stress σ⁺ = ∂Ψ⁺/∂ε
    pub sig_plus: DVector<f64>,

    /// Compressive stress σ⁻ = ∂Ψ⁻/∂ε
    pub sig_minus: DVector<f64>,

    /// Tensile tangent D⁺ = ∂σ⁺/∂ε
    pub dd_plus: DMatrix<f64>,

    /// Compressive tangent D⁻ = ∂σ⁻/∂ε
    pub dd_minus: DMatrix<f64>,
}

impl EnergyDensity {
    /// Returns the stress `a σ⁺ + σ⁻` given the degradation value
    pub fn stress(&self, a: f64) -> DVector<f64> {
        &self.sig_plus * a + &self.sig_minus
    }

    /// Returns the tangent `a D⁺ + D⁻` given the degradation value
    pub fn tangent(&self, a: f64) -> DMatrix<f64> {
        &self.dd_plus * a + &self.dd_minus
    }
}

/// Implements the isotropic linear elastic strain energy with an optional tensile/compressive split
///
/// ```text
/// 1D:  Ψ⁺ = ½ E ε²,  Ψ⁻ = 0   (identity split)
/// 2D:  Ψ± = ½ λ ⟨tr ε⟩±² + μ Σ ⟨λa⟩±²   (spectral)
///      Ψ⁺ = ½ λ (tr ε)² + μ ε:ε,  Ψ⁻ = 0   (no split)
/// ```
#[derive(Clone, Copy, Debug)]
pub struct ElasticEnergy {
    two_dim: bool,
    split: Split,
    young: f64,
    lambda: f64,
    mu: f64,
}

impl ElasticEnergy {
    /// Allocates a new instance
    pub fn new(ideal: &Idealization, param: &ParamPhaseField, split: Split) -> Self {
        let (lambda, mu) = ideal.lame(param.young, param.poisson);
        ElasticEnergy {
            two_dim: ideal.two_dim,
            split,
            young: param.young,
            lambda,
            mu,
        }
    }

    /// Computes the energy density, stresses, and tangents (strain in the Mandel basis)
    pub fn calc(&self, eps: &[f64]) -> EnergyDensity {
        if !self.two_dim {
            let e = self.young;
            return EnergyDensity {
                psi_plus: 0.5 * e * eps[0] * eps[0],
                psi_minus: 0.0,
                sig_plus: DVector::from_element(1, e * eps[0]),
                sig_minus: DVector::zeros(1),
                dd_plus: DMatrix::from_element(1, 1, e),
                dd_minus: DMatrix::zeros(1, 1),
            };
        }
        let (lambda, mu) = (self.lambda, self.mu);
        let m = DVector::from_column_slice(&[1.0, 1.0, 0.0]);
        let mm = &m * m.transpose();
        let tr = eps[0] + eps[1];
        match self.split {
            Split::NoSplit => {
                let epsv = DVector::from_column_slice(&eps[0..3]);
                EnergyDensity {
                    psi_plus: 0.5 * lambda * tr * tr + mu * epsv.dot(&epsv),
                    psi_minus: 0.0,
                    sig_plus: &m * (lambda * tr) + &epsv * (2.0 * mu),
                    sig_minus: DVector::zeros(3),
                    dd_plus: &mm * lambda + DMatrix::<f64>::identity(3, 3) * (2.0 * mu),
                    dd_minus: DMatrix::zeros(3, 3),
                }
            }
            Split::Spectral => {
                let decomp = Spectral2d::new(eps);
                let (plus, minus) = strain_split(eps);
                let (l1, l2) = (decomp.lambda[0], decomp.lambda[1]);
                let pp = tensile_projection(&decomp);
                let pp = DMatrix::from_fn(3, 3, |i, j| pp[i][j]);
                let h = heaviside(tr);
                EnergyDensity {
                    psi_plus: 0.5 * lambda * pos(tr) * pos(tr) + mu * (pos(l1) * pos(l1) + pos(l2) * pos(l2)),
                    psi_minus: 0.5 * lambda * neg(tr) * neg(tr) + mu * (neg(l1) * neg(l1) + neg(l2) * neg(l2)),
                    sig_plus: &m * (lambda * pos(tr)) + DVector::from_column_slice(&plus) * (2.0 * mu),
                    sig_minus: &m * (lambda * neg(tr)) + DVector::from_column_slice(&minus) * (2.0 * mu),
                    dd_plus: &mm * (lambda * h) + &pp * (2.0 * mu),
                    dd_minus: &mm * (lambda * (1.0 - h)) + (DMatrix::<f64>::identity(3, 3) - &pp) * (2.0 * mu),
                }
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
