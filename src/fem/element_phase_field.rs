use crate::base::{Config, Equations, SQRT_2};
use crate::material::PhaseFieldModel;
use crate::StrError;
use gemlab::integ::Gauss;
use gemlab::mesh::{CellId, Mesh, PointId};
use gemlab::shapes::{GeoKind, Scratchpad};
use nalgebra::{DMatrix, DVector};

/// Holds the data of an integration point
#[derive(Clone, Debug)]
pub struct IntegPoint {
    /// Integration weight times the Jacobian determinant and the thickness
    pub dv: f64,

    /// Shape functions N (nnode)
    pub nn: DVector<f64>,

    /// Shape-function gradients G (nnode, ndim) with G[m][i] = ∂Nᵐ/∂xᵢ
    pub gg: DMatrix<f64>,

    /// Strain-displacement matrix B (n_strain, nnode·ndim) in the Mandel basis
    pub bb: DMatrix<f64>,
}

/// Evaluates the shape functions and their gradients at the reference coordinates ξ
///
/// Bars (ndim = 1) are Lin2 cells along the x axis, thus the gradient is taken with respect
/// to x only. Returns `(detJ, N, G)`.
pub(crate) fn calc_shape_data(
    pad: &mut Scratchpad,
    ndim: usize,
    ksi: &[f64],
) -> Result<(f64, DVector<f64>, DMatrix<f64>), StrError> {
    let nnode = pad.kind.nnode();
    (pad.fn_interp)(&mut pad.interp, ksi);
    let nn = DVector::from_fn(nnode, |m, _| pad.interp[m]);
    if ndim == 1 {
        pad.calc_jacobian(ksi)?;
        let dx_dksi = pad.jacobian.get(0, 0);
        if dx_dksi <= 0.0 {
            return Err("cell must have a positive length or area (counterclockwise)");
        }
        let gg = DMatrix::from_fn(nnode, 1, |m, _| pad.deriv.get(m, 0) / dx_dksi);
        Ok((dx_dksi, nn, gg))
    } else {
        let det_jac = pad.calc_jacobian(ksi)?;
        if det_jac <= 0.0 {
            return Err("cell must have a positive length or area (counterclockwise)");
        }
        pad.calc_gradient(ksi)?;
        let gg = DMatrix::from_fn(nnode, 2, |m, i| pad.gradient.get(m, i));
        Ok((det_jac, nn, gg))
    }
}

/// Assembles the strain-displacement matrix B from the gradients G (Mandel basis)
///
/// ```text
/// 1D:  ε = [εxx]                      B = Gᵀ
/// 2D:  ε = [εxx, εyy, √2 εxy]
/// ```
pub(crate) fn strain_matrix(gg: &DMatrix<f64>) -> DMatrix<f64> {
    let nnode = gg.nrows();
    if gg.ncols() == 1 {
        return gg.transpose();
    }
    let mut bb = DMatrix::zeros(3, 2 * nnode);
    for m in 0..nnode {
        bb[(0, 2 * m)] = gg[(m, 0)];
        bb[(1, 2 * m + 1)] = gg[(m, 1)];
        bb[(2, 2 * m)] = gg[(m, 1)] / SQRT_2;
        bb[(2, 2 * m + 1)] = gg[(m, 0)] / SQRT_2;
    }
    bb
}

/// Implements the phase-field element (displacement and damage)
///
/// All terms are integrated with the Gauss rule of the cell kind (or the number of points
/// selected in [Config]).
///
/// ```text
/// Π_e = Σ_p dv_p [a(α_p) Ψ⁺(ε_p) + Ψ⁻(ε_p) + (Gc/c_w) (w(α_p)/ℓ + ℓ |∇α_p|²)]
/// ```
#[derive(Clone, Debug)]
pub struct ElementPhaseField {
    /// The cell corresponding to this element
    pub cell_id: CellId,

    /// Kind of cell
    pub kind: GeoKind,

    /// Points of the cell
    pub points: Vec<PointId>,

    /// Local-to-global mapping of the displacement equations
    pub l2g_u: Vec<usize>,

    /// Local-to-global mapping of the damage equations
    pub l2g_alpha: Vec<usize>,

    /// Integration points
    pub ips: Vec<IntegPoint>,
}

impl ElementPhaseField {
    /// Allocates a new instance
    ///
    /// `ndim` is the dimension of the displacement field (1 for bars).
    pub fn new(
        mesh: &Mesh,
        ndim: usize,
        cell_id: CellId,
        config: &Config,
        eq_u: &Equations,
        eq_alpha: &Equations,
    ) -> Result<Self, StrError> {
        let cell = mesh.cells.get(cell_id).ok_or("cell id is out of range")?;
        let mut pad = mesh.get_pad(cell_id);
        let gauss = Gauss::new_or_sized(cell.kind, config.ngauss)?;
        let mut ips = Vec::with_capacity(gauss.npoint());
        for p in 0..gauss.npoint() {
            let (det_jac, nn, gg) = calc_shape_data(&mut pad, ndim, gauss.coords(p))?;
            ips.push(IntegPoint {
                dv: gauss.weight(p) * det_jac * config.thickness,
                nn,
                bb: strain_matrix(&gg),
                gg,
            });
        }
        Ok(ElementPhaseField {
            cell_id,
            kind: cell.kind,
            points: cell.points.clone(),
            l2g_u: eq_u.local_to_global(&cell.points)?,
            l2g_alpha: eq_alpha.local_to_global(&cell.points)?,
            ips,
        })
    }

    /// Returns the local displacements
    pub fn local_u(&self, uu: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(self.l2g_u.len(), self.l2g_u.iter().map(|g| uu[*g]))
    }

    /// Returns the local damage values
    pub fn local_alpha(&self, alpha: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(self.l2g_alpha.len(), self.l2g_alpha.iter().map(|g| alpha[*g]))
    }

    /// Returns the strain (Mandel basis) at each integration point
    pub fn strains(&self, uu: &DVector<f64>) -> Vec<DVector<f64>> {
        let u_local = self.local_u(uu);
        self.ips.iter().map(|ip| &ip.bb * &u_local).collect()
    }

    /// Returns the damage interpolated at the integration points
    pub fn alpha_at_ips(&self, alpha: &DVector<f64>) -> Vec<f64> {
        let a_local = self.local_alpha(alpha);
        self.ips.iter().map(|ip| ip.nn.dot(&a_local)).collect()
    }

    /// Calculates the elastic and the dissipated energies of the element
    pub fn calc_energies(&self, model: &PhaseFieldModel, uu: &DVector<f64>, alpha: &DVector<f64>) -> (f64, f64) {
        let a_local = self.local_alpha(alpha);
        let mut elastic = 0.0;
        let mut dissipated = 0.0;
        for (ip, eps) in self.ips.iter().zip(self.strains(uu)) {
            let density = model.elastic.calc(eps.as_slice());
            let a = ip.nn.dot(&a_local);
            let grad = ip.gg.transpose() * &a_local;
            elastic += ip.dv * (model.softening.a(a) * density.psi_plus + density.psi_minus);
            dissipated += ip.dv * (model.dissipation(a) + model.gradient_coefficient() * grad.dot(&grad));
        }
        (elastic, dissipated)
    }

    /// Calculates the total energy of the element
    pub fn calc_energy(&self, model: &PhaseFieldModel, uu: &DVector<f64>, alpha: &DVector<f64>) -> f64 {
        let (elastic, dissipated) = self.calc_energies(model, uu, alpha);
        elastic + dissipated
    }

    /// Calculates the residual of the displacement problem: r = Σ_p dv_p Bᵀ (a(α_p) σ⁺ + σ⁻)
    pub fn calc_residual_u(
        &self,
        residual: &mut DVector<f64>,
        model: &PhaseFieldModel,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
    ) {
        *residual = DVector::zeros(self.l2g_u.len());
        for ((ip, eps), a) in self.ips.iter().zip(self.strains(uu)).zip(self.alpha_at_ips(alpha)) {
            let density = model.elastic.calc(eps.as_slice());
            *residual += ip.bb.transpose() * density.stress(model.softening.a(a)) * ip.dv;
        }
    }

    /// Calculates the Jacobian of the displacement problem: K = Σ_p dv_p Bᵀ (a(α_p) D⁺ + D⁻) B
    pub fn calc_jacobian_u(
        &self,
        jacobian: &mut DMatrix<f64>,
        model: &PhaseFieldModel,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
    ) {
        *jacobian = DMatrix::zeros(self.l2g_u.len(), self.l2g_u.len());
        for ((ip, eps), a) in self.ips.iter().zip(self.strains(uu)).zip(self.alpha_at_ips(alpha)) {
            let density = model.elastic.calc(eps.as_slice());
            *jacobian += ip.bb.transpose() * density.tangent(model.softening.a(a)) * &ip.bb * ip.dv;
        }
    }

    /// Calculates the gradient of the energy with respect to the damage
    ///
    /// ```text
    /// gᵐ = Σ_p dv_p {[a'(α_p) Ψ⁺ + (Gc/c_w) w'(α_p)/ℓ] Nᵐ + 2 (Gc/c_w) ℓ ∇Nᵐ·∇α}
    /// ```
    pub fn calc_gradient_alpha(
        &self,
        gradient: &mut DVector<f64>,
        model: &PhaseFieldModel,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
    ) {
        let a_local = self.local_alpha(alpha);
        let c_grad = 2.0 * model.gradient_coefficient();
        *gradient = DVector::zeros(self.l2g_alpha.len());
        for (ip, eps) in self.ips.iter().zip(self.strains(uu)) {
            let psi_plus = model.elastic.calc(eps.as_slice()).psi_plus;
            let a = ip.nn.dot(&a_local);
            let c_local = model.softening.da(a) * psi_plus + model.dissipation_deriv1(a);
            let grad = ip.gg.transpose() * &a_local;
            *gradient += (&ip.nn * c_local + &ip.gg * grad * c_grad) * ip.dv;
        }
    }

    /// Calculates the Hessian of the energy with respect to the damage
    ///
    /// ```text
    /// Hᵐⁿ = Σ_p dv_p {[a''(α_p) Ψ⁺ + (Gc/c_w) w''(α_p)/ℓ] Nᵐ Nⁿ + 2 (Gc/c_w) ℓ ∇Nᵐ·∇Nⁿ}
    /// ```
    pub fn calc_hessian_alpha(
        &self,
        hessian: &mut DMatrix<f64>,
        model: &PhaseFieldModel,
        uu: &DVector<f64>,
        alpha: &DVector<f64>,
    ) {
        let c_grad = 2.0 * model.gradient_coefficient();
        *hessian = DMatrix::zeros(self.l2g_alpha.len(), self.l2g_alpha.len());
        for ((ip, eps), a) in self.ips.iter().zip(self.strains(uu)).zip(self.alpha_at_ips(alpha)) {
            let psi_plus = model.elastic.calc(eps.as_slice()).psi_plus;
            let c_local = model.softening.d2a(a) * psi_plus + model.dissipation_deriv2(a);
            *hessian += (&ip.nn * ip.nn.transpose() * c_local + &ip.gg * ip.gg.transpose() * c_grad) * ip.dv;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
