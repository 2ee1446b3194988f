use crate::base::{ParamDamage, ParamPhaseField};
use crate::StrError;

/// Defines the interface of softening laws: dissipation shape w(α) and degradation a(α)
///
/// All functions must be evaluable on the closed interval α ∈ [0, 1].
pub trait SofteningTrait {
    /// Returns the dissipation shape w(α)
    fn w(&self, alpha: f64) -> f64;

    /// Returns the first derivative w'(α)
    fn dw(&self, alpha: f64) -> f64;

    /// Returns the second derivative w''(α)
    fn d2w(&self, alpha: f64) -> f64;

    /// Returns the degradation (stiffness modulation) a(α) with a(0) = 1 and a(1) = k_res
    fn a(&self, alpha: f64) -> f64;

    /// Returns the first derivative a'(α)
    fn da(&self, alpha: f64) -> f64;

    /// Returns the second derivative a''(α)
    fn d2a(&self, alpha: f64) -> f64;
}

/// Implements the dissipation shape
#[derive(Clone, Copy, Debug)]
enum Dissipation {
    /// w = α
    Linear,

    /// w = α²
    Quadratic,

    /// w = 2α - α²
    Cohesive,
}

/// Implements the degradation without the residual floor
#[derive(Clone, Copy, Debug)]
enum Degradation {
    /// g = (1-α)²
    Quadratic,

    /// g = (1-α)² / ((1-α)² + Q(α)) with Q(α) = a1 α + a1 a2 α² + a1 a2 a3 α³
    Rational { a1: f64, a2: f64, a3: f64 },
}

/// Implements the softening laws of the AT1, AT2, and cohesive (CZ-PFM) families
///
/// The degradation function includes the residual stiffness as follows:
///
/// ```text
/// a(α) = (1 - k_res) g(α) + k_res
/// ```
///
/// Thus `a(0) = 1` and `a(1) = k_res` exactly.
#[derive(Clone, Copy, Debug)]
pub struct Softening {
    dissipation: Dissipation,
    degradation: Degradation,
    k_res: f64,
}

impl Softening {
    /// Allocates a new instance
    pub fn new(param: &ParamPhaseField) -> Result<Self, StrError> {
        param.validate()?;
        let (dissipation, degradation) = match param.damage {
            ParamDamage::At1 => (Dissipation::Linear, Degradation::Quadratic),
            ParamDamage::At2 => (Dissipation::Quadratic, Degradation::Quadratic),
            ParamDamage::Cornelissen { a1, a2, a3 } => (Dissipation::Cohesive, Degradation::Rational { a1, a2, a3 }),
            ParamDamage::LinearSoftening { a1 } => (
                Dissipation::Cohesive,
                Degradation::Rational { a1, a2: -0.5, a3: 0.0 },
            ),
        };
        Ok(Softening {
            dissipation,
            degradation,
            k_res: param.k_res,
        })
    }

    /// Returns g, g', and g''
    fn g(&self, alpha: f64) -> (f64, f64, f64) {
        let p = (1.0 - alpha) * (1.0 - alpha);
        let dp = -2.0 * (1.0 - alpha);
        let d2p = 2.0;
        match self.degradation {
            Degradation::Quadratic => (p, dp, d2p),
            Degradation::Rational { a1, a2, a3 } => {
                let q = a1 * alpha + a1 * a2 * alpha * alpha + a1 * a2 * a3 * alpha * alpha * alpha;
                let dq = a1 + 2.0 * a1 * a2 * alpha + 3.0 * a1 * a2 * a3 * alpha * alpha;
                let d2q = 2.0 * a1 * a2 + 6.0 * a1 * a2 * a3 * alpha;
                let s = p + q;
                let n = dp * q - p * dq;
                let dn = d2p * q - p * d2q;
                let g = p / s;
                let dg = n / (s * s);
                let d2g = dn / (s * s) - 2.0 * n * (dp + dq) / (s * s * s);
                (g, dg, d2g)
            }
        }
    }
}

impl SofteningTrait for Softening {
    fn w(&self, alpha: f64) -> f64 {
        match self.dissipation {
            Dissipation::Linear => alpha,
            Dissipation::Quadratic => alpha * alpha,
            Dissipation::Cohesive => 2.0 * alpha - alpha * alpha,
        }
    }

    fn dw(&self, alpha: f64) -> f64 {
        match self.dissipation {
            Dissipation::Linear => 1.0,
            Dissipation::Quadratic => 2.0 * alpha,
            Dissipation::Cohesive => 2.0 - 2.0 * alpha,
        }
    }

    fn d2w(&self, _alpha: f64) -> f64 {
        match self.dissipation {
            Dissipation::Linear => 0.0,
            Dissipation::Quadratic => 2.0,
            Dissipation::Cohesive => -2.0,
        }
    }

    fn a(&self, alpha: f64) -> f64 {
        let (g, _, _) = self.g(alpha);
        (1.0 - self.k_res) * g + self.k_res
    }

    fn da(&self, alpha: f64) -> f64 {
        let (_, dg, _) = self.g(alpha);
        (1.0 - self.k_res) * dg
    }

    fn d2a(&self, alpha: f64) -> f64 {
        let (_, _, d2g) = self.g(alpha);
        (1.0 - self.k_res) * d2g
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
