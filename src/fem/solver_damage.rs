use super::{norm_inf, EnergyFunctional, LinearSystem};
use crate::base::{Config, SolveStatus};
use crate::StrError;
use nalgebra::DVector;

/// Defines the Armijo constant of the projected line search
pub const ARMIJO_C: f64 = 1e-4;

/// Defines the maximum number of step halvings in the line search
pub const LINE_SEARCH_MAX_HALVINGS: usize = 40;

/// Defines the initial diagonal shift relative to the largest diagonal entry of the Hessian
pub const SHIFT_INITIAL: f64 = 1e-8;

/// Defines the maximum number of shift increases (×10) before falling back to steepest descent
pub const SHIFT_MAX_ATTEMPTS: usize = 12;

/// Defines the upper limit of the distance to a bound for a DOF to be considered active
pub const ACTIVE_SET_EPSILON: f64 = 1e-3;

/// Holds the results of a damage solve
#[derive(Clone, Copy, Debug)]
pub struct DamageReport {
    /// Converged or capped (best iterate at the iteration cap or after a line search failure)
    pub status: SolveStatus,

    /// Number of iterations
    pub iterations: usize,

    /// Final norm of the projected gradient
    pub norm_pg: f64,
}

/// Defines the interface of bound-constrained solvers of the damage problem (displacement fixed)
pub trait DamageSolver {
    /// Updates the damage field within `[lower, upper]` given the (fixed) displacement field
    ///
    /// Reaching the iteration cap is not an error; it is reported via [SolveStatus::Capped].
    fn solve(
        &mut self,
        alpha: &mut DVector<f64>,
        uu: &DVector<f64>,
        lower: &DVector<f64>,
        upper: &DVector<f64>,
    ) -> Result<DamageReport, StrError>;
}

/// Implements a projected Newton method for the bound-constrained damage problem
///
/// Each iteration:
///
/// 1. Computes the projected gradient `pg = α - P(α - g)`, where P clamps to the bounds
/// 2. Identifies the active set: fixed DOFs and DOFs near a bound with the gradient pushing outwards
/// 3. Solves the reduced Newton system on the free set with a sparse Cholesky factorization,
///    shifting the diagonal until the matrix is positive-definite; falls back to steepest descent
/// 4. Moves the active DOFs by `-pg` (towards their bounds)
/// 5. Performs an Armijo backtracking along the projected path `P(α + t d)`
pub struct ProjectedNewtonSolver<'a> {
    config: &'a Config,
    functional: &'a EnergyFunctional,
    lin_sys: LinearSystem,
    gradient: DVector<f64>,
}

impl<'a> ProjectedNewtonSolver<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config, functional: &'a EnergyFunctional) -> Result<Self, StrError> {
        let n = functional.n_equation_alpha();
        Ok(ProjectedNewtonSolver {
            config,
            functional,
            lin_sys: LinearSystem::new(n, functional.n_local_entries_alpha())?,
            gradient: DVector::zeros(n),
        })
    }

    /// Computes the Newton direction on the free set; returns None if no shift works
    fn newton_direction(&mut self, uu: &DVector<f64>, alpha: &DVector<f64>, active: &[bool]) -> Option<DVector<f64>> {
        self.lin_sys.reset();
        for i in 0..self.gradient.len() {
            if !active[i] {
                self.lin_sys.residual[i] = self.gradient[i];
            }
        }
        self.functional
            .assemble_hessian_alpha(&mut self.lin_sys.jacobian, uu, alpha, active);
        let mut shift = 0.0;
        let scale = f64::max(self.lin_sys.max_abs_diagonal(), 1.0);
        for attempt in 0..SHIFT_MAX_ATTEMPTS {
            if self.lin_sys.solve_with_shift(shift).is_ok() {
                return Some(-&self.lin_sys.mdu);
            }
            shift = if attempt == 0 {
                SHIFT_INITIAL * scale
            } else {
                shift * 10.0
            };
        }
        None
    }
}

/// Clamps a value to the bounds
fn clamp(value: f64, lower: f64, upper: f64) -> f64 {
    f64::min(f64::max(value, lower), upper)
}

impl<'a> DamageSolver for ProjectedNewtonSolver<'a> {
    fn solve(
        &mut self,
        alpha: &mut DVector<f64>,
        uu: &DVector<f64>,
        lower: &DVector<f64>,
        upper: &DVector<f64>,
    ) -> Result<DamageReport, StrError> {
        let n = alpha.len();
        if n != self.functional.n_equation_alpha() || lower.len() != n || upper.len() != n {
            return Err("damage field and bounds are incompatible with the damage equations");
        }
        if (0..n).any(|i| lower[i] > upper[i]) {
            return Err("lower bound of damage must be ≤ upper bound");
        }
        let fixed: Vec<bool> = (0..n).map(|i| lower[i] == upper[i]).collect();
        for i in 0..n {
            alpha[i] = clamp(alpha[i], lower[i], upper[i]);
        }

        let mut norm_pg0 = 0.0;
        let mut energy = self.functional.energy(uu, alpha);
        let mut pg = DVector::zeros(n);
        for iteration in 0..self.config.n_max_iterations_alpha {
            // projected gradient
            self.functional
                .assemble_gradient_alpha(&mut self.gradient, uu, alpha, &fixed);
            for i in 0..n {
                pg[i] = alpha[i] - clamp(alpha[i] - self.gradient[i], lower[i], upper[i]);
            }
            let norm_pg = norm_inf(&pg);
            if !norm_pg.is_finite() || !energy.is_finite() {
                return Err("found NaN or Inf in the damage problem");
            }
            if iteration == 0 {
                norm_pg0 = norm_pg;
            }
            let tol = f64::max(self.config.tol_alpha_grad_abs, self.config.tol_alpha_grad_rel * norm_pg0);
            if norm_pg <= tol {
                return Ok(DamageReport {
                    status: SolveStatus::Converged,
                    iterations: iteration,
                    norm_pg,
                });
            }

            // active set
            let eps = f64::min(norm_pg, ACTIVE_SET_EPSILON);
            let active: Vec<bool> = (0..n)
                .map(|i| {
                    let g = self.gradient[i];
                    fixed[i] || (alpha[i] <= lower[i] + eps && g > 0.0) || (alpha[i] >= upper[i] - eps && g < 0.0)
                })
                .collect();

            // search directions: Newton on the free set, then steepest descent
            let steepest = -&pg;
            let mut directions = Vec::with_capacity(2);
            if let Some(mut d) = self.newton_direction(uu, alpha, &active) {
                for i in 0..n {
                    if active[i] {
                        d[i] = -pg[i];
                    }
                }
                if self.gradient.dot(&d) < 0.0 {
                    directions.push(d);
                }
            }
            directions.push(steepest);

            // projected Armijo backtracking
            let mut accepted = false;
            for d in &directions {
                let mut t = 1.0;
                for _ in 0..LINE_SEARCH_MAX_HALVINGS {
                    let trial = DVector::from_fn(n, |i, _| clamp(alpha[i] + t * d[i], lower[i], upper[i]));
                    let slope = self.gradient.dot(&(&trial - &*alpha));
                    let energy_trial = self.functional.energy(uu, &trial);
                    if energy_trial - energy <= ARMIJO_C * slope + 10.0 * f64::EPSILON * energy.abs() {
                        *alpha = trial;
                        energy = energy_trial;
                        accepted = true;
                        break;
                    }
                    t *= 0.5;
                }
                if accepted {
                    break;
                }
            }
            if !accepted {
                return Ok(DamageReport {
                    status: SolveStatus::Capped,
                    iterations: iteration + 1,
                    norm_pg,
                });
            }
        }

        // final check at the iteration cap
        self.functional
            .assemble_gradient_alpha(&mut self.gradient, uu, alpha, &fixed);
        for i in 0..n {
            pg[i] = alpha[i] - clamp(alpha[i] - self.gradient[i], lower[i], upper[i]);
        }
        let norm_pg = norm_inf(&pg);
        let tol = f64::max(self.config.tol_alpha_grad_abs, self.config.tol_alpha_grad_rel * norm_pg0);
        let status = if norm_pg <= tol {
            SolveStatus::Converged
        } else {
            SolveStatus::Capped
        };
        Ok(DamageReport {
            status,
            iterations: self.config.n_max_iterations_alpha,
            norm_pg,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{DamageSolver, ProjectedNewtonSolver};
    use crate::base::{Config, ParamDamage, SampleMeshes, SampleParams, SolveStatus};
    use crate::fem::EnergyFunctional;
    use approx::assert_abs_diff_eq;
    use nalgebra::DVector;

    // E = 1, Gc = 1, ℓ = 0.5, AT2 (c_w = 2); uniform strain with Ψ⁺ = ½ E ε² = 1
    fn uniform_bar(config: &Config) -> (EnergyFunctional, DVector<f64>) {
        let mesh = SampleMeshes::bar(2.0, 4).unwrap();
        let param = SampleParams::param_unit(ParamDamage::At2);
        let fun = EnergyFunctional::new(&mesh, &param, config).unwrap();
        let eps = f64::sqrt(2.0);
        let uu = DVector::from_fn(5, |i, _| eps * 0.5 * (i as f64));
        (fun, uu)
    }

    #[test]
    fn solve_captures_errors() {
        let config = Config::new();
        let (fun, uu) = uniform_bar(&config);
        let mut solver = ProjectedNewtonSolver::new(&config, &fun).unwrap();
        let mut alpha = DVector::zeros(5);
        let lower = DVector::zeros(5);
        let upper = DVector::from_element(4, 1.0);
        assert_eq!(
            solver.solve(&mut alpha, &uu, &lower, &upper).err(),
            Some("damage field and bounds are incompatible with the damage equations")
        );
        let upper = DVector::from_element(5, -1.0);
        assert_eq!(
            solver.solve(&mut alpha, &uu, &lower, &upper).err(),
            Some("lower bound of damage must be ≤ upper bound")
        );
    }

    #[test]
    fn uniform_solution_works() {
        // a'(α) Ψ⁺ + (Gc/c_w) w'(α)/ℓ = 0  ⇒  α = (1-k) / ((1-k) + 1)
        let mut config = Config::new();
        config.set_tol_alpha(1e-12, 100).unwrap();
        let (fun, uu) = uniform_bar(&config);
        let mut solver = ProjectedNewtonSolver::new(&config, &fun).unwrap();
        let mut alpha = DVector::zeros(5);
        let lower = DVector::zeros(5);
        let upper = DVector::from_element(5, 1.0);
        let report = solver.solve(&mut alpha, &uu, &lower, &upper).unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        assert!(report.iterations > 0 && report.iterations < 20);
        let k = 1e-6;
        let correct = (1.0 - k) / ((1.0 - k) + 1.0);
        for i in 0..5 {
            assert_abs_diff_eq!(alpha[i], correct, epsilon = 1e-9);
        }
    }

    #[test]
    fn bounds_are_respected() {
        let mut config = Config::new();
        config.set_tol_alpha(1e-12, 100).unwrap();
        let (fun, uu) = uniform_bar(&config);
        let mut solver = ProjectedNewtonSolver::new(&config, &fun).unwrap();

        // the upper bound is binding
        let mut alpha = DVector::zeros(5);
        let lower = DVector::zeros(5);
        let upper = DVector::from_element(5, 0.3);
        let report = solver.solve(&mut alpha, &uu, &lower, &upper).unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        for i in 0..5 {
            assert_eq!(alpha[i], 0.3);
        }

        // the lower bound is binding
        let mut alpha = DVector::zeros(5);
        let lower = DVector::from_element(5, 0.8);
        let upper = DVector::from_element(5, 1.0);
        solver.solve(&mut alpha, &uu, &lower, &upper).unwrap();
        for i in 0..5 {
            assert_eq!(alpha[i], 0.8);
        }
    }

    #[test]
    fn fixed_dofs_do_not_move() {
        let mut config = Config::new();
        config.set_tol_alpha(1e-12, 100).unwrap();
        let (fun, uu) = uniform_bar(&config);
        let mut solver = ProjectedNewtonSolver::new(&config, &fun).unwrap();
        let mut alpha = DVector::zeros(5);
        let mut lower = DVector::zeros(5);
        let mut upper = DVector::from_element(5, 1.0);
        upper[0] = 0.0;
        lower[4] = 1.0;
        let report = solver.solve(&mut alpha, &uu, &lower, &upper).unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        assert_eq!(alpha[0], 0.0);
        assert_eq!(alpha[4], 1.0);
        for i in 1..4 {
            assert!(alpha[i] > 0.0 && alpha[i] < 1.0);
        }
    }

    #[test]
    fn all_fixed_returns_immediately() {
        let config = Config::new();
        let (fun, uu) = uniform_bar(&config);
        let mut solver = ProjectedNewtonSolver::new(&config, &fun).unwrap();
        let mut alpha = DVector::zeros(5);
        let ones = DVector::from_element(5, 1.0);
        let report = solver.solve(&mut alpha, &uu, &ones, &ones).unwrap();
        assert_eq!(report.status, SolveStatus::Converged);
        assert_eq!(report.iterations, 0);
        assert_eq!(alpha.as_slice(), &[1.0; 5]);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let mut config = Config::new();
        config.set_tol_alpha(1e-15, 1).unwrap();
        let mesh = SampleMeshes::bar(2.0, 4).unwrap();
        let param = SampleParams::param_unit(ParamDamage::Cornelissen {
            a1: 2.0,
            a2: 1.3868,
            a3: 0.6567,
        });
        let fun = EnergyFunctional::new(&mesh, &param, &config).unwrap();
        // ε = 3 is well above the damage threshold, thus one iteration cannot reach stationarity
        let uu = DVector::from_fn(5, |i, _| 1.5 * (i as f64));
        let mut solver = ProjectedNewtonSolver::new(&config, &fun).unwrap();
        let mut alpha = DVector::zeros(5);
        let lower = DVector::zeros(5);
        let upper = DVector::from_element(5, 1.0);
        let report = solver.solve(&mut alpha, &uu, &lower, &upper).unwrap();
        assert_eq!(report.status, SolveStatus::Capped);
        assert_eq!(report.iterations, 1);
        assert!(report.norm_pg > 0.1);
        assert!(alpha.iter().all(|a| *a > 0.0 && *a < 1.0));
    }
}
