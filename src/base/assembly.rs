use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::CooMatrix;

/// Assembles local vector into global vector
///
/// # Output
///
/// * `rr_global` -- is the global vector R with length = `n_equation`
///
/// # Input
///
/// * `r_local` -- is the local vector r with length = `n_equation_local`
/// * `local_to_global` -- is an array holding all equation numbers.
/// * `prescribed` -- tells whether a global equation number has prescribed
///   DOF or not. Its length is equal to the total number of DOFs `n_equation`.
///
/// # Panics
///
/// This function will panic if the indices are out-of-bounds
#[inline]
pub fn assemble_vector(
    rr_global: &mut DVector<f64>,
    r_local: &DVector<f64>,
    local_to_global: &[usize],
    prescribed: &[bool],
) {
    for l in 0..r_local.len() {
        let g = local_to_global[l];
        if !prescribed[g] {
            rr_global[g] += r_local[l];
        }
    }
}

/// Assembles local matrix into global matrix
///
/// # Output
///
/// * `kk_global` -- is the global square matrix K (in coordinates format; duplicates are summed up)
///
/// # Input
///
/// * `kk_local` -- is the local square matrix K with dims = (`n_equation_local`,`n_equation_local`)
/// * `local_to_global` -- is an array holding all equation numbers.
/// * `prescribed` -- tells whether a global equation number has prescribed
///   DOF or not. Its length is equal to the total number of DOFs `n_equation`.
///
/// # Panics
///
/// This function will panic if the indices are out-of-bounds
#[inline]
pub fn assemble_matrix(
    kk_global: &mut CooMatrix<f64>,
    kk_local: &DMatrix<f64>,
    local_to_global: &[usize],
    prescribed: &[bool],
) {
    let n_equation_local = kk_local.nrows();
    for l in 0..n_equation_local {
        let g = local_to_global[l];
        if !prescribed[g] {
            for ll in 0..n_equation_local {
                let gg = local_to_global[ll];
                if !prescribed[gg] {
                    kk_global.push(g, gg, kk_local[(l, ll)]);
                }
            }
        }
    }
}

/// Puts ones on the diagonal of the prescribed equations
pub fn assemble_ones_on_diagonal(kk_global: &mut CooMatrix<f64>, prescribed: &[bool]) {
    for (eq, flag) in prescribed.iter().enumerate() {
        if *flag {
            kk_global.push(eq, eq, 1.0);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
