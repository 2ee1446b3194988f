use super::Split;
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the smallest allowed tolerance
pub const CONFIG_MIN_TOL: f64 = 1e-15;

/// Holds configuration data: idealization, energy split, and solver options
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// 2D plane-stress problem, otherwise plane-strain in 2D
    pub plane_stress: bool,

    /// Out-of-plane thickness in 2D or cross-sectional area in 1D
    pub thickness: f64,

    /// Split of the strain energy into degraded and non-degraded parts
    pub split: Split,

    /// Number of integration points per cell (None means the default of each cell kind)
    pub ngauss: Option<usize>,

    /// Relative tolerance for the residual of the displacement problem
    pub tol_u_rel: f64,

    /// Absolute tolerance for the residual of the displacement problem
    pub tol_u_abs: f64,

    /// Maximum number of Newton iterations of the displacement problem
    pub n_max_iterations_u: usize,

    /// Absolute tolerance for the projected gradient of the damage problem
    pub tol_alpha_grad_abs: f64,

    /// Relative tolerance for the projected gradient of the damage problem
    ///
    /// The damage problem converges if `‖pg‖∞ ≤ max(tol_abs, tol_rel·‖pg₀‖∞)`
    pub tol_alpha_grad_rel: f64,

    /// Maximum number of iterations of the damage problem
    pub n_max_iterations_alpha: usize,

    /// Tolerance for the damage change `‖α - α_prev‖∞` between staggered iterations
    pub tol_staggered: f64,

    /// Maximum number of staggered (alternate minimization) iterations
    pub n_max_staggered: usize,

    /// Verbose mode during load steps
    pub verbose_steps: bool,

    /// Verbose mode during staggered iterations
    pub verbose_iterations: bool,

    /// Verbose mode of the Newton iterations of the displacement problem
    pub verbose_newton: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            plane_stress: false,
            thickness: 1.0,
            split: Split::NoSplit,
            ngauss: None,
            tol_u_rel: 1e-5,
            tol_u_abs: 1e-5,
            n_max_iterations_u: 50,
            tol_alpha_grad_abs: 1e-7,
            tol_alpha_grad_rel: 0.0,
            n_max_iterations_alpha: 1000,
            tol_staggered: 1e-5,
            n_max_staggered: 1000,
            verbose_steps: false,
            verbose_iterations: false,
            verbose_newton: false,
        }
    }

    /// Sets a 2D plane-stress problem, otherwise plane-strain in 2D
    pub fn set_plane_stress(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.plane_stress = flag;
        Ok(self)
    }

    /// Sets the thickness (2D) or the cross-sectional area (1D)
    pub fn set_thickness(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("thickness must be > 0.0");
        }
        self.thickness = value;
        Ok(self)
    }

    /// Sets the split of the strain energy
    pub fn set_split(&mut self, split: Split) -> Result<&mut Self, StrError> {
        self.split = split;
        Ok(self)
    }

    /// Sets the number of integration points per cell
    ///
    /// The number must be supported by the integration rules of the cells in the mesh.
    pub fn set_ngauss(&mut self, ngauss: Option<usize>) -> Result<&mut Self, StrError> {
        if ngauss == Some(0) {
            return Err("the number of integration points must be ≥ 1");
        }
        self.ngauss = ngauss;
        Ok(self)
    }

    /// Sets the tolerances and the maximum number of iterations of the displacement problem
    pub fn set_tol_u(&mut self, tol_rel: f64, tol_abs: f64, n_max_iterations: usize) -> Result<&mut Self, StrError> {
        if tol_rel < CONFIG_MIN_TOL || tol_abs < CONFIG_MIN_TOL {
            return Err("tolerances of the displacement problem must be ≥ 1e-15");
        }
        if n_max_iterations < 1 {
            return Err("the maximum number of iterations must be ≥ 1");
        }
        self.tol_u_rel = tol_rel;
        self.tol_u_abs = tol_abs;
        self.n_max_iterations_u = n_max_iterations;
        Ok(self)
    }

    /// Sets the tolerance and the maximum number of iterations of the damage problem
    pub fn set_tol_alpha(&mut self, tol_grad_abs: f64, n_max_iterations: usize) -> Result<&mut Self, StrError> {
        if tol_grad_abs < CONFIG_MIN_TOL {
            return Err("tolerance of the damage problem must be ≥ 1e-15");
        }
        if n_max_iterations < 1 {
            return Err("the maximum number of iterations must be ≥ 1");
        }
        self.tol_alpha_grad_abs = tol_grad_abs;
        self.n_max_iterations_alpha = n_max_iterations;
        Ok(self)
    }

    /// Sets the tolerance and the maximum number of iterations of the staggered loop
    pub fn set_tol_staggered(&mut self, tol: f64, n_max_iterations: usize) -> Result<&mut Self, StrError> {
        if tol < 0.0 {
            return Err("tolerance of the staggered loop must be ≥ 0.0");
        }
        if n_max_iterations < 1 {
            return Err("the maximum number of iterations must be ≥ 1");
        }
        self.tol_staggered = tol;
        self.n_max_staggered = n_max_iterations;
        Ok(self)
    }

    /// Sets the verbose flags
    pub fn set_verbose(&mut self, steps: bool, iterations: bool, newton: bool) -> Result<&mut Self, StrError> {
        self.verbose_steps = steps;
        self.verbose_iterations = iterations;
        self.verbose_newton = newton;
        Ok(self)
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.thickness <= 0.0 {
            return Some(format!("thickness = {:?} is incorrect; it must be > 0.0", self.thickness));
        }
        if self.tol_u_rel < CONFIG_MIN_TOL {
            return Some(format!(
                "tol_u_rel = {:?} is incorrect; it must be ≥ {:e}",
                self.tol_u_rel, CONFIG_MIN_TOL
            ));
        }
        if self.tol_u_abs < CONFIG_MIN_TOL {
            return Some(format!(
                "tol_u_abs = {:?} is incorrect; it must be ≥ {:e}",
                self.tol_u_abs, CONFIG_MIN_TOL
            ));
        }
        if self.tol_alpha_grad_abs < CONFIG_MIN_TOL {
            return Some(format!(
                "tol_alpha_grad_abs = {:?} is incorrect; it must be ≥ {:e}",
                self.tol_alpha_grad_abs, CONFIG_MIN_TOL
            ));
        }
        if self.tol_alpha_grad_rel < 0.0 {
            return Some(format!(
                "tol_alpha_grad_rel = {:?} is incorrect; it must be ≥ 0.0",
                self.tol_alpha_grad_rel
            ));
        }
        if self.tol_staggered < 0.0 {
            return Some(format!(
                "tol_staggered = {:?} is incorrect; it must be ≥ 0.0",
                self.tol_staggered
            ));
        }
        if self.n_max_iterations_u < 1 || self.n_max_iterations_alpha < 1 || self.n_max_staggered < 1 {
            return Some("the maximum numbers of iterations must be ≥ 1".to_string());
        }
        None // all good
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n").unwrap();
        write!(f, "==================\n").unwrap();
        write!(f, "plane_stress = {:?}\n", self.plane_stress).unwrap();
        write!(f, "thickness = {:?}\n", self.thickness).unwrap();
        write!(f, "split = {:?}\n", self.split).unwrap();
        write!(f, "ngauss = {:?}\n", self.ngauss).unwrap();
        write!(f, "tol_u_rel = {:?}\n", self.tol_u_rel).unwrap();
        write!(f, "tol_u_abs = {:?}\n", self.tol_u_abs).unwrap();
        write!(f, "n_max_iterations_u = {:?}\n", self.n_max_iterations_u).unwrap();
        write!(f, "tol_alpha_grad_abs = {:?}\n", self.tol_alpha_grad_abs).unwrap();
        write!(f, "tol_alpha_grad_rel = {:?}\n", self.tol_alpha_grad_rel).unwrap();
        write!(f, "n_max_iterations_alpha = {:?}\n", self.n_max_iterations_alpha).unwrap();
        write!(f, "tol_staggered = {:?}\n", self.tol_staggered).unwrap();
        write!(f, "n_max_staggered = {:?}\n", self.n_max_staggered).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
