use crate::base::{Equations, Essential};
use crate::StrError;
use gemlab::mesh::Mesh;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the state of a simulation
///
/// The damage bounds satisfy `0 ≤ lower ≤ alpha ≤ upper ≤ 1` at all times.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FemState {
    /// Index of the last completed load step (zero before the first step)
    pub step: usize,

    /// Imposed displacement of the last completed load step
    pub load: f64,

    /// Displacement unknowns {U}
    ///
    /// (n_equation_u)
    pub uu: DVector<f64>,

    /// Damage unknowns {α}
    ///
    /// (n_equation_alpha)
    pub alpha: DVector<f64>,

    /// Lower bound of the damage (irreversibility)
    ///
    /// (n_equation_alpha)
    pub lower: DVector<f64>,

    /// Upper bound of the damage
    ///
    /// (n_equation_alpha)
    pub upper: DVector<f64>,
}

impl FemState {
    /// Allocates a new instance with zero displacement and zero damage
    ///
    /// The damage is fixed (lower = upper = value) at the points given by [Essential::damage].
    pub fn new(mesh: &Mesh, essential: &Essential) -> Result<FemState, StrError> {
        if mesh.cells.is_empty() {
            return Err("there are no cells in the mesh");
        }
        let n_equation_u = Equations::new_displacement(mesh)?.n_equation;
        let n_equation_alpha = mesh.points.len();
        let mut state = FemState {
            step: 0,
            load: 0.0,
            uu: DVector::zeros(n_equation_u),
            alpha: DVector::zeros(n_equation_alpha),
            lower: DVector::zeros(n_equation_alpha),
            upper: DVector::from_element(n_equation_alpha, 1.0),
        };
        for (point_id, value) in &essential.damage {
            if *point_id >= n_equation_alpha {
                return Err("cannot fix damage because PointId is out-of-bounds");
            }
            state.alpha[*point_id] = *value;
            state.lower[*point_id] = *value;
            state.upper[*point_id] = *value;
        }
        Ok(state)
    }

    /// Checks that `0 ≤ lower ≤ alpha ≤ upper ≤ 1`
    pub fn check_bounds(&self) -> Result<(), StrError> {
        if self.lower.len() != self.alpha.len() || self.upper.len() != self.alpha.len() {
            return Err("damage bounds and damage field must have the same length");
        }
        for i in 0..self.alpha.len() {
            if self.lower[i] < 0.0 || self.upper[i] > 1.0 {
                return Err("damage bounds must be in [0.0, 1.0]");
            }
            if self.alpha[i] < self.lower[i] || self.alpha[i] > self.upper[i] {
                return Err("damage must be within its bounds");
            }
        }
        Ok(())
    }

    /// Returns the maximum damage value
    pub fn alpha_max(&self) -> f64 {
        self.alpha.iter().fold(0.0, |acc, a| f64::max(acc, *a))
    }

    /// Reads a JSON file containing the state data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let input = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(input);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state data
    ///
    /// The data goes to `<full_path>.tmp` first, which is then renamed to `full_path`.
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let mut file = File::create(&tmp).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        file.sync_all().map_err(|_| "cannot write file")?;
        fs::rename(&tmp, &path).map_err(|_| "cannot rename file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
