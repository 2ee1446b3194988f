use super::ElementPhaseField;
use crate::base::{assemble_matrix, assemble_ones_on_diagonal, assemble_vector, field_ndim};
use crate::base::{Config, Equations, ParamPhaseField};
use crate::material::PhaseFieldModel;
use crate::StrError;
use gemlab::mesh::Mesh;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CooMatrix;

/// Assembles the total energy of the phase-field model and its variations
///
/// ```text
/// Π(u, α) = ∫ [a(α) Ψ⁺(ε(u)) + Ψ⁻(ε(u))] dV + (Gc/c_w) ∫ [w(α)/ℓ + ℓ |∇α|²] dV
/// ```
///
/// The first and second variations with respect to `u` (residual and Jacobian) and with respect
/// to `α` (gradient and Hessian) are assembled into global arrays. Equations flagged as
/// prescribed (or active) are skipped; the caller puts ones on their diagonal.
pub struct EnergyFunctional {
    /// Dimension of the displacement field (1 for bars)
    pub ndim: usize,

    /// Constitutive model
    pub model: PhaseFieldModel,

    /// All elements
    pub elements: Vec<ElementPhaseField>,

    /// Equation numbers of the displacement field
    pub equations_u: Equations,

    /// Equation numbers of the damage field
    pub equations_alpha: Equations,
}

impl EnergyFunctional {
    /// Allocates a new instance
    pub fn new(mesh: &Mesh, param: &ParamPhaseField, config: &Config) -> Result<Self, StrError> {
        let ndim = field_ndim(mesh)?;
        if let Some(msg) = config.validate() {
            println!("ERROR: {}", msg);
            return Err("cannot allocate the energy functional because config.validate() failed");
        }
        let model = PhaseFieldModel::new(ndim, param, config)?;
        let equations_u = Equations::new_displacement(mesh)?;
        let equations_alpha = Equations::new_damage(mesh)?;
        let elements = mesh
            .cells
            .iter()
            .map(|cell| ElementPhaseField::new(mesh, ndim, cell.id, config, &equations_u, &equations_alpha))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EnergyFunctional {
            ndim,
            model,
            elements,
            equations_u,
            equations_alpha,
        })
    }

    /// Returns the number of displacement equations
    pub fn n_equation_u(&self) -> usize {
        self.equations_u.n_equation
    }

    /// Returns the number of damage equations
    pub fn n_equation_alpha(&self) -> usize {
        self.equations_alpha.n_equation
    }

    /// Returns the sum of the number of entries of the local displacement matrices
    pub fn n_local_entries_u(&self) -> usize {
        self.elements.iter().map(|e| e.l2g_u.len() * e.l2g_u.len()).sum()
    }

    /// Returns the sum of the number of entries of the local damage matrices
    pub fn n_local_entries_alpha(&self) -> usize {
        self.elements.iter().map(|e| e.l2g_alpha.len() * e.l2g_alpha.len()).sum()
    }

    /// Returns the total energy
    pub fn energy(&self, uu: &DVector<f64>, alpha: &DVector<f64>) -> f64 {
        self.elements.iter().map(|e| e.calc_energy(&self.model, uu, alpha)).sum()
    }

    /// Returns the elastic and the dissipated energies
    pub fn energies(&self, uu: &DVector<f64>, alpha: &DVector<f64>) -> (f64, f64) {
        self.elements.iter().fold((0.0, 0.0), |acc, e| {
            let (elastic, dissipated) = e.calc_energies(&self.model, uu, alpha);
            (acc.0 + elastic, acc.1 + dissipated)
        })
    }

    /// Assembles the residual of the displacement problem (first variation with respect to u)
    pub fn assemble_residual_u(
        &self,
        rr: &mut DVector<f64>,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
        prescribed: &[bool],
    ) {
        rr.fill(0.0);
        let mut local = DVector::zeros(0);
        for e in &self.elements {
            e.calc_residual_u(&mut local, &self.model, uu, alpha);
            assemble_vector(rr, &local, &e.l2g_u, prescribed);
        }
    }

    /// Assembles the Jacobian of the displacement problem (second variation with respect to u)
    ///
    /// Ones are put on the diagonal of the prescribed equations.
    pub fn assemble_jacobian_u(
        &self,
        kk: &mut CooMatrix<f64>,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
        prescribed: &[bool],
    ) {
        let mut local = DMatrix::zeros(0, 0);
        for e in &self.elements {
            e.calc_jacobian_u(&mut local, &self.model, uu, alpha);
            assemble_matrix(kk, &local, &e.l2g_u, prescribed);
        }
        assemble_ones_on_diagonal(kk, prescribed);
    }

    /// Assembles the gradient of the energy with respect to the damage
    ///
    /// The entries of the equations flagged in `skip` are left as zero.
    pub fn assemble_gradient_alpha(
        &self,
        gg: &mut DVector<f64>,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
        skip: &[bool],
    ) {
        gg.fill(0.0);
        let mut local = DVector::zeros(0);
        for e in &self.elements {
            e.calc_gradient_alpha(&mut local, &self.model, uu, alpha);
            assemble_vector(gg, &local, &e.l2g_alpha, skip);
        }
    }

    /// Assembles the Hessian of the energy with respect to the damage
    ///
    /// Ones are put on the diagonal of the equations flagged in `skip`.
    pub fn assemble_hessian_alpha(
        &self,
        hh: &mut CooMatrix<f64>,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
        skip: &[bool],
    ) {
        let mut local = DMatrix::zeros(0, 0);
        for e in &self.elements {
            e.calc_hessian_alpha(&mut local, &self.model, uu, alpha);
            assemble_matrix(hh, &local, &e.l2g_alpha, skip);
        }
        assemble_ones_on_diagonal(hh, skip);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
