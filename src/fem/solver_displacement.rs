use super::{ControlConvergence, EnergyFunctional, LinearSystem, PrescribedValues};
use crate::base::Config;
use crate::StrError;
use nalgebra::DVector;

/// Defines the interface of solvers of the displacement problem (damage fixed)
pub trait DisplacementSolver {
    /// Updates the displacement field given the (fixed) damage field and the imposed displacement
    ///
    /// Returns the number of iterations. Non-convergence is an error.
    fn solve(&mut self, uu: &mut DVector<f64>, alpha: &DVector<f64>, imposed: f64) -> Result<usize, StrError>;
}

/// Implements the Newton-Raphson solver of the displacement problem
///
/// The prescribed values are written into `uu` before the iterations; their equations are kept
/// out of the residual and receive ones on the diagonal of the Jacobian matrix.
pub struct NewtonSolver<'a> {
    config: &'a Config,
    functional: &'a EnergyFunctional,
    prescribed: &'a PrescribedValues,
    lin_sys: LinearSystem,
}

impl<'a> NewtonSolver<'a> {
    /// Allocates a new instance
    pub fn new(
        config: &'a Config,
        functional: &'a EnergyFunctional,
        prescribed: &'a PrescribedValues,
    ) -> Result<Self, StrError> {
        if prescribed.flags.len() != functional.n_equation_u() {
            return Err("prescribed values are incompatible with the displacement equations");
        }
        let lin_sys = LinearSystem::new(functional.n_equation_u(), functional.n_local_entries_u())?;
        Ok(NewtonSolver {
            config,
            functional,
            prescribed,
            lin_sys,
        })
    }
}

impl<'a> DisplacementSolver for NewtonSolver<'a> {
    fn solve(&mut self, uu: &mut DVector<f64>, alpha: &DVector<f64>, imposed: f64) -> Result<usize, StrError> {
        self.prescribed.apply(uu, imposed);
        let flags = &self.prescribed.flags;
        let mut control = ControlConvergence::new(self.config);
        for iteration in 0..self.config.n_max_iterations_u {
            self.lin_sys.reset();
            self.functional
                .assemble_residual_u(&mut self.lin_sys.residual, uu, alpha, flags);
            control.analyze_rr(iteration, &self.lin_sys.residual)?;
            control.print_iteration();
            if control.converged() {
                return Ok(iteration);
            }
            self.functional
                .assemble_jacobian_u(&mut self.lin_sys.jacobian, uu, alpha, flags);
            self.lin_sys.solve()?;
            *uu -= &self.lin_sys.mdu;
        }
        // the last update may have reached equilibrium
        self.lin_sys.reset();
        self.functional
            .assemble_residual_u(&mut self.lin_sys.residual, uu, alpha, flags);
        control.analyze_rr(self.config.n_max_iterations_u, &self.lin_sys.residual)?;
        if control.converged() {
            return Ok(self.config.n_max_iterations_u);
        }
        Err("Newton-Raphson did not converge")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
