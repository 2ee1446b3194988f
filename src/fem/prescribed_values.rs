use crate::base::{Dof, Ebc, Equations, Essential};
use crate::StrError;
use gemlab::mesh::PointId;
use nalgebra::DVector;

/// Assists in calculating prescribed values
#[derive(Clone, Copy, Debug)]
pub struct PrescribedValue {
    /// Point corresponding to the prescribed value
    pub point_id: PointId,

    /// DOF of the prescribed value
    pub dof: Dof,

    /// Essential boundary condition
    pub ebc: Ebc,

    /// Equation corresponding to the prescribed value
    pub eq: usize,
}

/// Holds a collection of prescribed displacements
pub struct PrescribedValues {
    /// All values (sorted by point and DOF)
    pub all: Vec<PrescribedValue>,

    /// An array indicating which DOFs (equations) are prescribed
    ///
    /// The length of `flags` is equal to `n_equation`, the total number of displacement equations.
    pub flags: Vec<bool>,

    /// Array with only the DOFs numbers of the prescribed equations
    pub equations: Vec<usize>,
}

impl PrescribedValues {
    /// Allocates a new instance
    pub fn new(equations: &Equations, essential: &Essential) -> Result<Self, StrError> {
        let mut keys: Vec<_> = essential.all.keys().copied().collect();
        keys.sort();
        let mut all = Vec::with_capacity(keys.len());
        let mut flags = vec![false; equations.n_equation];
        let mut eqs = Vec::with_capacity(keys.len());
        for (point_id, dof) in keys {
            let eq = equations.eq(point_id, dof)?;
            if let Some(ebc) = essential.all.get(&(point_id, dof)) {
                all.push(PrescribedValue {
                    point_id,
                    dof,
                    ebc: *ebc,
                    eq,
                });
                flags[eq] = true;
                eqs.push(eq);
            }
        }
        Ok(PrescribedValues {
            all,
            flags,
            equations: eqs,
        })
    }

    /// Sets all prescribed values in the solution vector given the imposed displacement
    pub fn apply(&self, uu: &mut DVector<f64>, imposed: f64) {
        for p in &self.all {
            uu[p.eq] = p.ebc.value(imposed);
        }
    }

    /// Returns the equations of the loaded (non-fixed) prescribed values
    pub fn loaded_equations(&self) -> Vec<usize> {
        self.all
            .iter()
            .filter(|p| matches!(p.ebc, Ebc::Loaded(_)))
            .map(|p| p.eq)
            .collect()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::PrescribedValues;
    use crate::base::{Dof, Ebc, Equations, Essential, SampleMeshes};
    use nalgebra::DVector;

    #[test]
    fn new_captures_errors() {
        let mesh = SampleMeshes::bar(1.0, 2).unwrap();
        let equations = Equations::new_displacement(&mesh).unwrap();
        let mut essential = Essential::new();
        essential.at(&[0], Dof::Uy, Ebc::Fixed(0.0)).unwrap();
        assert_eq!(
            PrescribedValues::new(&equations, &essential).err(),
            Some("cannot find equation number corresponding to (PointId,DOF)")
        );
        let mut essential = Essential::new();
        essential.at(&[5], Dof::Ux, Ebc::Fixed(0.0)).unwrap();
        assert_eq!(
            PrescribedValues::new(&equations, &essential).err(),
            Some("cannot find equation number because PointId is out-of-bounds")
        );
    }

    #[test]
    fn apply_works() {
        // four points (ids 0 to 3) with two DOFs each
        let mesh = SampleMeshes::rectangle(1.0, 1.0, 1, 1).unwrap();
        let equations = Equations::new_displacement(&mesh).unwrap();
        let mut essential = Essential::new();
        essential
            .at(&[0, 3], Dof::Ux, Ebc::Fixed(0.0))
            .unwrap()
            .at(&[0], Dof::Uy, Ebc::Fixed(0.0))
            .unwrap()
            .at(&[1, 2], Dof::Ux, Ebc::Loaded(2.0))
            .unwrap();
        let values = PrescribedValues::new(&equations, &essential).unwrap();
        assert_eq!(values.equations, &[0, 1, 2, 4, 6]);
        assert_eq!(values.flags, &[true, true, true, false, true, false, true, false]);
        assert_eq!(values.loaded_equations(), &[2, 4]);
        let mut uu = DVector::from_element(8, 7.0);
        values.apply(&mut uu, 0.25);
        assert_eq!(uu.as_slice(), &[0.0, 0.0, 0.5, 7.0, 0.5, 7.0, 0.0, 7.0]);
    }
}
