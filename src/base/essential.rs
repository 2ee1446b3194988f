use super::Dof;
use crate::StrError;
use gemlab::mesh::PointId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Defines an essential (Dirichlet) boundary condition of the displacement field
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub enum Ebc {
    /// Constant value, independent of the load step
    Fixed(f64),

    /// Value equal to `factor · imposed`, where `imposed` comes from the load schedule
    Loaded(f64),
}

impl Ebc {
    /// Returns the prescribed value given the imposed displacement of the current load step
    pub fn value(&self, imposed: f64) -> f64 {
        match self {
            Ebc::Fixed(value) => *value,
            Ebc::Loaded(factor) => factor * imposed,
        }
    }
}

impl fmt::Display for Ebc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ebc::Fixed(value) => write!(f, "fixed({:?})", value),
            Ebc::Loaded(factor) => write!(f, "loaded({:?}·imposed)", factor),
        }
    }
}

/// Holds essential boundary conditions
///
/// Displacement DOFs are prescribed through [Ebc]. Damage DOFs may be fixed at a given
/// value by setting both bounds equal to this value (e.g., zero damage near supports).
#[derive(Clone, Debug)]
pub struct Essential {
    /// Displacement boundary conditions
    pub all: HashMap<(PointId, Dof), Ebc>,

    /// Points where the damage is fixed (lower bound = upper bound = value)
    pub damage: HashMap<PointId, f64>,
}

impl Essential {
    /// Allocates a new instance
    pub fn new() -> Self {
        Essential {
            all: HashMap::new(),
            damage: HashMap::new(),
        }
    }

    /// Sets essential boundary condition at points
    pub fn at(&mut self, points: &[PointId], dof: Dof, ebc: Ebc) -> Result<&mut Self, StrError> {
        if dof == Dof::Alpha {
            return Err("use fix_damage to set the damage at points");
        }
        for point_id in points {
            self.all.insert((*point_id, dof), ebc);
        }
        Ok(self)
    }

    /// Fixes the damage at points
    pub fn fix_damage(&mut self, points: &[PointId], value: f64) -> Result<&mut Self, StrError> {
        if value < 0.0 || value > 1.0 {
            return Err("fixed damage value must be in [0.0, 1.0]");
        }
        for point_id in points {
            self.damage.insert(*point_id, value);
        }
        Ok(self)
    }
}

impl fmt::Display for Essential {
    /// Prints a formatted summary of Boundary Conditions
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Essential boundary conditions\n").unwrap();
        write!(f, "=============================\n").unwrap();
        let mut keys: Vec<_> = self.all.keys().collect();
        keys.sort();
        for key in keys {
            if let Some(ebc) = self.all.get(key) {
                write!(f, "{:?} : {:?} = {}\n", key.0, key.1, ebc).unwrap();
            }
        }
        let mut points: Vec<_> = self.damage.keys().collect();
        points.sort();
        for point_id in points {
            if let Some(value) = self.damage.get(point_id) {
                write!(f, "{:?} : Alpha = fixed({:?})\n", point_id, value).unwrap();
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
