use super::{field_ndim, Dof};
use crate::StrError;
use gemlab::mesh::{Mesh, PointId};
use std::collections::HashMap;
use std::fmt;

/// Holds equation numbers (DOF numbers) of one field
///
/// The displacement field and the damage field are numbered independently because they are
/// solved in alternation. All points carry the same DOFs.
///
/// ```text
///              geq (displacement)        geq (damage)
///  point 0 :  {Ux → 0, Uy → 1}           {Alpha → 0}
///  point 1 :  {Ux → 2, Uy → 3}           {Alpha → 1}
///  ...
/// ```
#[derive(Clone, Debug)]
pub struct Equations {
    /// Holds all points DOFs and numbers (length = npoint)
    pub all: Vec<HashMap<Dof, usize>>,

    /// Holds the total number of equations
    pub n_equation: usize,
}

impl Equations {
    /// Allocates a new instance with the given DOFs at every point
    pub fn new(mesh: &Mesh, dofs: &[Dof]) -> Result<Self, StrError> {
        if dofs.is_empty() {
            return Err("at least one DOF is required");
        }
        let mut all = Vec::with_capacity(mesh.points.len());
        let mut n_equation = 0;
        for _ in &mesh.points {
            let mut map = HashMap::new();
            for dof in dofs {
                map.insert(*dof, n_equation);
                n_equation += 1;
            }
            all.push(map);
        }
        Ok(Equations { all, n_equation })
    }

    /// Allocates the displacement equations (Ux for bars; Ux and Uy in 2D)
    pub fn new_displacement(mesh: &Mesh) -> Result<Self, StrError> {
        match field_ndim(mesh)? {
            1 => Equations::new(mesh, &[Dof::Ux]),
            2 => Equations::new(mesh, &[Dof::Ux, Dof::Uy]),
            _ => Err("ndim must be 1 or 2"),
        }
    }

    /// Allocates the damage equations
    pub fn new_damage(mesh: &Mesh) -> Result<Self, StrError> {
        Equations::new(mesh, &[Dof::Alpha])
    }

    /// Returns the global equation number of a point DOF
    pub fn eq(&self, point_id: PointId, dof: Dof) -> Result<usize, StrError> {
        match self.all.get(point_id) {
            Some(map) => map.get(&dof).copied().ok_or("cannot find equation number corresponding to (PointId,DOF)"),
            None => Err("cannot find equation number because PointId is out-of-bounds"),
        }
    }

    /// Computes the local-to-global map of a list of points
    pub fn local_to_global(&self, points: &[PointId]) -> Result<Vec<usize>, StrError> {
        let mut l2g = Vec::new();
        for p in points {
            let map = self
                .all
                .get(*p)
                .ok_or("cannot find equation number because PointId is out-of-bounds")?;
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort();
            l2g.extend(pairs.iter().map(|(_, eq)| **eq));
        }
        Ok(l2g)
    }
}

impl fmt::Display for Equations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Points: DOFs and global equation numbers\n").unwrap();
        write!(f, "========================================\n").unwrap();
        for (point_id, map) in self.all.iter().enumerate() {
            let mut pairs: Vec<_> = map.iter().collect();
            pairs.sort();
            write!(f, "{}: {:?}\n", point_id, pairs).unwrap();
        }
        write!(f, "number of equations = {}\n", self.n_equation).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
