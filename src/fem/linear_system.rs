use crate::StrError;
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::factorization::CscCholesky;
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Holds variables to solve a global (symmetric positive-definite) linear system
pub struct LinearSystem {
    /// Total number of global equations
    pub n_equation: usize,

    /// Holds the supremum of the number of nonzero values (nnz) in the global matrix
    ///
    /// The local element matrices add to parts of the global matrix; thus, the least upper bound
    /// of nnz is the sum of the number of entries of all local matrices plus `n_equation`
    /// since ones (or a shift) may be put on the diagonal.
    pub nnz_sup: usize,

    /// Global residual (or gradient) vector
    pub residual: DVector<f64>,

    /// Global Jacobian (or Hessian) matrix in coordinates format
    pub jacobian: CooMatrix<f64>,

    /// Minus delta U vector (the solution of the linear system)
    pub mdu: DVector<f64>,
}

impl LinearSystem {
    /// Allocates a new instance
    ///
    /// * `n_equation` -- number of global equations
    /// * `n_local_entries` -- sum of the number of entries of all local matrices
    pub fn new(n_equation: usize, n_local_entries: usize) -> Result<Self, StrError> {
        if n_equation < 1 {
            return Err("there must be at least one equation in the linear system");
        }
        let nnz_sup = n_local_entries + n_equation;
        let mut jacobian = CooMatrix::new(n_equation, n_equation);
        jacobian.reserve(nnz_sup);
        Ok(LinearSystem {
            n_equation,
            nnz_sup,
            residual: DVector::zeros(n_equation),
            jacobian,
            mdu: DVector::zeros(n_equation),
        })
    }

    /// Clears the residual vector and the Jacobian matrix before an assembly
    ///
    /// The Jacobian matrix is re-allocated with room for `nnz_sup` entries.
    pub fn reset(&mut self) {
        self.residual.fill(0.0);
        self.jacobian = CooMatrix::new(self.n_equation, self.n_equation);
        self.jacobian.reserve(self.nnz_sup);
    }

    /// Solves `K · mdu = R` using the sparse Cholesky factorization
    pub fn solve(&mut self) -> Result<(), StrError> {
        self.mdu = solve_cholesky(&self.jacobian, &self.residual, 0.0)?;
        Ok(())
    }

    /// Solves `(K + shift I) · mdu = R` using the sparse Cholesky factorization
    pub fn solve_with_shift(&mut self, shift: f64) -> Result<(), StrError> {
        self.mdu = solve_cholesky(&self.jacobian, &self.residual, shift)?;
        Ok(())
    }

    /// Returns the largest absolute value on the diagonal of the Jacobian matrix
    pub fn max_abs_diagonal(&self) -> f64 {
        let mut diag = vec![0.0; self.n_equation];
        for (i, j, v) in self.jacobian.triplet_iter() {
            if i == j {
                diag[i] += v;
            }
        }
        diag.iter().fold(0.0, |acc, d| f64::max(acc, d.abs()))
    }
}

/// Solves `(K + shift I) · x = b` using the sparse Cholesky factorization
///
/// Returns an error if the matrix is not positive-definite.
pub fn solve_cholesky(kk: &CooMatrix<f64>, b: &DVector<f64>, shift: f64) -> Result<DVector<f64>, StrError> {
    let n = b.len();
    if kk.nrows() != n || kk.ncols() != n {
        return Err("the dimensions of the matrix and the vector are incompatible");
    }
    let csc = if shift != 0.0 {
        let mut shifted = kk.clone();
        for i in 0..n {
            shifted.push(i, i, shift);
        }
        CscMatrix::from(&shifted)
    } else {
        CscMatrix::from(kk)
    };
    let chol = CscCholesky::factor(&csc).map_err(|_| "cannot factorize the matrix (not positive-definite)")?;
    let rhs = DMatrix::from_column_slice(n, 1, b.as_slice());
    let x = chol.solve(&rhs);
    if x.iter().any(|v| !v.is_finite()) {
        return Err("found NaN or Inf in the solution of the linear system");
    }
    Ok(DVector::from_column_slice(x.as_slice()))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
