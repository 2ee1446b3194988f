use super::{norm_inf, print_staggered, DamageSolver, DisplacementSolver, FemState};
use crate::base::{Config, SolveStatus};
use crate::StrError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Holds the results of the staggered loop of one load step
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct StaggeredReport {
    /// Final damage change `‖α - α_prev‖∞`
    pub err: f64,

    /// Number of staggered iterations (≥ 1)
    pub iterations: usize,

    /// Converged if `err ≤ tol`; capped if the iteration limit was reached first
    pub status: SolveStatus,

    /// Number of Newton iterations of the displacement problem (all staggered iterations)
    pub n_newton: usize,

    /// Number of damage solves that reached their iteration cap
    pub n_damage_capped: usize,
}

/// Implements the alternate minimization (staggered) loop
///
/// ```text
/// Init → ElasticSolve → DamageSolve → CheckConverged → {ElasticSolve | Done}
/// ```
///
/// * A failure of the displacement solver is fatal and is returned immediately
/// * A capped damage solve is accepted (best iterate) and logged
/// * Reaching the maximum number of staggered iterations is accepted and reported as capped
pub struct AlternateMinimization<'a> {
    config: &'a Config,
}

impl<'a> AlternateMinimization<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config) -> Self {
        AlternateMinimization { config }
    }

    /// Runs the staggered loop for the given imposed displacement
    pub fn run(
        &self,
        state: &mut FemState,
        imposed: f64,
        displacement_solver: &mut dyn DisplacementSolver,
        damage_solver: &mut dyn DamageSolver,
    ) -> Result<StaggeredReport, StrError> {
        let tol = self.config.tol_staggered;
        let n_max = self.config.n_max_staggered;
        let mut alpha_prev = state.alpha.clone();
        let mut n_newton = 0;
        let mut n_damage_capped = 0;
        let mut iteration = 1;
        loop {
            n_newton += displacement_solver.solve(&mut state.uu, &state.alpha, imposed)?;

            let report = damage_solver.solve(&mut state.alpha, &state.uu, &state.lower, &state.upper)?;
            if !report.status.converged() {
                n_damage_capped += 1;
                warn!(
                    iteration,
                    damage_iterations = report.iterations,
                    norm_pg = report.norm_pg,
                    "damage solve capped; accepting the best iterate"
                );
            }

            let err = norm_inf(&(&state.alpha - &alpha_prev));
            let alpha_max = state.alpha_max();
            debug!(iteration, err, alpha_max, "staggered iteration");
            print_staggered(self.config, iteration, err, alpha_max, report.status);

            if err <= tol {
                return Ok(StaggeredReport {
                    err,
                    iterations: iteration,
                    status: SolveStatus::Converged,
                    n_newton,
                    n_damage_capped,
                });
            }
            if iteration >= n_max {
                warn!(iteration, err, tol, "staggered loop capped; accepting the current fields");
                return Ok(StaggeredReport {
                    err,
                    iterations: iteration,
                    status: SolveStatus::Capped,
                    n_newton,
                    n_damage_capped,
                });
            }
            alpha_prev.copy_from(&state.alpha);
            iteration += 1;
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
