use crate::base::{Config, SolveStatus};
use crate::StrError;
use nalgebra::DVector;

/// Returns the infinity norm of a vector or NaN if any component is NaN or Inf
pub fn norm_inf(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0, |acc: f64, x| {
        if acc.is_nan() || !x.is_finite() {
            f64::NAN
        } else {
            f64::max(acc, x.abs())
        }
    })
}

/// Controls the convergence of the Newton iterations of the displacement problem
///
/// The iterations converge when `‖R‖∞ ≤ tol_abs` or `‖R‖∞ ≤ tol_rel · ‖R₀‖∞`.
pub struct ControlConvergence<'a> {
    config: &'a Config,
    iteration: usize,
    norm_rr0: f64,
    norm_rr_prev: f64,
    norm_rr: f64,
    converged: bool,
    diverging: bool,
}

impl<'a> ControlConvergence<'a> {
    /// Creates a new convergence controller
    pub fn new(config: &'a Config) -> Self {
        ControlConvergence {
            config,
            iteration: 0,
            norm_rr0: 0.0,
            norm_rr_prev: 0.0,
            norm_rr: 0.0,
            converged: false,
            diverging: false,
        }
    }

    /// Returns whether the iterations have converged
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns the current residual norm
    pub fn norm_rr(&self) -> f64 {
        self.norm_rr
    }

    /// Analyzes the residual vector at the given iteration
    ///
    /// Returns an error if NaN or Inf values are found.
    pub fn analyze_rr(&mut self, iteration: usize, rr: &DVector<f64>) -> Result<(), StrError> {
        self.iteration = iteration;
        self.norm_rr = norm_inf(rr);
        if self.norm_rr.is_nan() {
            self.converged = false;
            self.diverging = false;
            return Err("found NaN or Inf in the residual vector");
        }
        if iteration == 0 {
            self.norm_rr0 = self.norm_rr;
        }
        self.converged = self.norm_rr <= self.config.tol_u_abs
            || (iteration > 0 && self.norm_rr <= self.config.tol_u_rel * self.norm_rr0);
        self.diverging = iteration > 0 && self.norm_rr > self.norm_rr_prev;
        self.norm_rr_prev = self.norm_rr;
        Ok(())
    }

    /// Prints the Newton iteration data
    pub fn print_iteration(&self) {
        if !self.config.verbose_newton {
            return;
        }
        let icon = if self.converged {
            "✅"
        } else if self.iteration == 0 {
            "  "
        } else if self.diverging {
            "🥵"
        } else {
            "👍"
        };
        println!(
            "{:>8} {:>13} {:>5} {:>5} {:>9.2e}{} {:>9.2e}",
            ".",
            ".",
            ".",
            self.iteration + 1,
            self.norm_rr,
            icon,
            self.config.tol_u_rel * self.norm_rr0
        );
    }
}

/// Prints the header of the table with load step and staggered iteration data
pub fn print_header(config: &Config) {
    if config.verbose_steps || config.verbose_iterations {
        println!("\nPFMSIM === LOAD STEPPING AND STAGGERED ITERATIONS =============================");
        println!("\nLegend:");
        println!("✅ : converged");
        println!("👍 : converging");
        println!("🥵 : diverging");
        println!("🔸 : capped (best-effort result)");
        println!("\"newton\" means Newton iteration of the displacement problem\n");
        println!("{}", "─".repeat(79));
        println!(
            "{:>8} {:>13} {:>5} {:>6} {:>10} {:>9} {:>13}",
            "step", "load", "iter", "newton", "‖Δα‖∞", "α_max", "force"
        );
        println!("{}", "─".repeat(79));
    }
}

/// Prints load step data
pub fn print_step(config: &Config, step: usize, load: f64) {
    if config.verbose_steps {
        println!("{:>8} {:>13.6e} {:>5} {:>6} {:>10} {:>9} {:>13}", step, load, ".", ".", ".", ".", ".");
    }
}

/// Prints staggered iteration data
pub fn print_staggered(config: &Config, iteration: usize, err: f64, alpha_max: f64, damage_status: SolveStatus) {
    if config.verbose_iterations {
        let icon = if err <= config.tol_staggered { "✅" } else { "  " };
        let damage_icon = if damage_status.converged() { "  " } else { "🔸" };
        println!(
            "{:>8} {:>13} {:>5} {:>6} {:>8.2e}{} {:>9.6}{} {:>13}",
            ".", ".", iteration, ".", err, icon, alpha_max, damage_icon, "."
        );
    }
}

/// Prints the results at the end of a load step
pub fn print_step_end(config: &Config, iterations: usize, status: SolveStatus, force: f64) {
    if config.verbose_steps {
        let icon = if status.converged() { "✅" } else { "🔸" };
        println!(
            "{:>8} {:>13} {:>5}{} {:>6} {:>10} {:>9} {:>13.6e}",
            ".", ".", iterations, icon, ".", ".", ".", force
        );
    }
}

/// Prints the horizontal line at the end of the analysis
pub fn print_footer(config: &Config) {
    if config.verbose_steps || config.verbose_iterations {
        println!("{}", "─".repeat(79));
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
