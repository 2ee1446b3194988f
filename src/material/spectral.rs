use crate::base::SQRT_2;

/// Regularization of the closed-form 2×2 eigen-decomposition
///
/// The eigenvalues are treated as repeated when the discriminant `Δ = (ε11-ε22)² + 4ε12²` satisfies
/// `Δ ≤ SPECTRAL_REGULARIZATION · (tr(ε)² + Δ)`, i.e., when the eigenvalue gap is below 1e-10 relative
/// to the magnitude of the eigenvalues. Thus, the threshold does not depend on the scale of the strain.
pub const SPECTRAL_REGULARIZATION: f64 = 1e-20;

/// Holds the spectral decomposition of a symmetric 2×2 strain tensor
///
/// The strain is given in the Mandel basis `[ε11, ε22, √2 ε12]`.
#[derive(Clone, Copy, Debug)]
pub struct Spectral2d {
    /// Eigenvalues sorted in decreasing order (λ1 ≥ λ2)
    pub lambda: [f64; 2],

    /// Unit eigenvectors; `vectors[a]` corresponds to `lambda[a]`
    pub vectors: [[f64; 2]; 2],

    /// Indicates repeated eigenvalues (any orthonormal basis is valid; the canonical one is used)
    pub degenerate: bool,
}

impl Spectral2d {
    /// Computes the eigenvalues and eigenvectors in closed form
    pub fn new(mandel: &[f64]) -> Self {
        let (a, d, b) = (mandel[0], mandel[1], mandel[2] / SQRT_2);
        let tr = a + d;
        let disc = (a - d) * (a - d) + 4.0 * b * b;
        if disc <= SPECTRAL_REGULARIZATION * (tr * tr + disc) {
            let l = tr / 2.0;
            return Spectral2d {
                lambda: [l, l],
                vectors: [[1.0, 0.0], [0.0, 1.0]],
                degenerate: true,
            };
        }
        let sq = f64::sqrt(disc);
        let l1 = (tr + sq) / 2.0;
        let l2 = (tr - sq) / 2.0;

        // (A - λ1 I) v1 = 0: take the candidate orthogonal to the row with largest norm
        let (x1, y1) = (b, l1 - a);
        let (x2, y2) = (l1 - d, b);
        let (n1, n2) = (x1 * x1 + y1 * y1, x2 * x2 + y2 * y2);
        let (x, y, n) = if n1 >= n2 { (x1, y1, n1) } else { (x2, y2, n2) };
        let den = f64::sqrt(n); // n ≥ disc/8 > 0
        let v1 = [x / den, y / den];
        let v2 = [-v1[1], v1[0]];
        Spectral2d {
            lambda: [l1, l2],
            vectors: [v1, v2],
            degenerate: false,
        }
    }

    /// Returns the eigenprojector `va ⊗ va` in the Mandel basis
    pub fn projector(&self, a: usize) -> [f64; 3] {
        let v = &self.vectors[a];
        [v[0] * v[0], v[1] * v[1], SQRT_2 * v[0] * v[1]]
    }

    /// Returns `(v1 ⊗ v2 + v2 ⊗ v1)/√2` in the Mandel basis
    pub fn shear_projector(&self) -> [f64; 3] {
        let (v1, v2) = (&self.vectors[0], &self.vectors[1]);
        [
            SQRT_2 * v1[0] * v2[0],
            SQRT_2 * v1[1] * v2[1],
            v1[0] * v2[1] + v1[1] * v2[0],
        ]
    }
}

/// Returns the positive part ⟨x⟩₊ = max(x, 0)
#[inline]
pub fn pos(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

/// Returns the negative part ⟨x⟩₋ = min(x, 0)
#[inline]
pub fn neg(x: f64) -> f64 {
    if x < 0.0 {
        x
    } else {
        0.0
    }
}

/// Returns the Heaviside function with H(0) = 0
#[inline]
pub fn heaviside(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Splits the strain (Mandel basis) into tensile and compressive parts
///
/// ```text
/// ε⁺ = Σ ⟨λa⟩₊ va ⊗ va      ε⁻ = Σ ⟨λa⟩₋ va ⊗ va      ε⁺ + ε⁻ = ε
/// ```
///
/// With repeated eigenvalues, `ε⁺ = ⟨λ⟩₊ I` (λ = tr(ε)/2) and `ε⁻ = ε - ε⁺`.
pub fn strain_split(mandel: &[f64]) -> ([f64; 3], [f64; 3]) {
    let decomp = Spectral2d::new(mandel);
    let mut plus = [0.0; 3];
    let mut minus = [0.0; 3];
    if decomp.degenerate {
        let l = pos(decomp.lambda[0]);
        plus = [l, l, 0.0];
        for i in 0..3 {
            minus[i] = mandel[i] - plus[i];
        }
        return (plus, minus);
    }
    for a in 0..2 {
        let m = decomp.projector(a);
        for i in 0..3 {
            plus[i] += pos(decomp.lambda[a]) * m[i];
            minus[i] += neg(decomp.lambda[a]) * m[i];
        }
    }
    (plus, minus)
}

/// Computes the derivative of the tensile strain with respect to the strain (Mandel basis)
///
/// ```text
/// P⁺ = ∂ε⁺/∂ε = Σ H(λa) Ma ⊗ Ma + θ N ⊗ N
/// θ = (⟨λ1⟩₊ - ⟨λ2⟩₊) / (λ1 - λ2)     (θ = H(λ) for repeated eigenvalues)
/// ```
///
/// The derivative of the compressive part is `I - P⁺`.
pub fn tensile_projection(decomp: &Spectral2d) -> [[f64; 3]; 3] {
    let mut pp = [[0.0; 3]; 3];
    if decomp.degenerate {
        let h = heaviside(decomp.lambda[0]);
        for i in 0..3 {
            pp[i][i] = h;
        }
        return pp;
    }
    let (l1, l2) = (decomp.lambda[0], decomp.lambda[1]);
    let theta = (pos(l1) - pos(l2)) / (l1 - l2);
    let nn = decomp.shear_projector();
    for a in 0..2 {
        let m = decomp.projector(a);
        let h = heaviside(decomp.lambda[a]);
        for i in 0..3 {
            for j in 0..3 {
                pp[i][j] += h * m[i] * m[j];
            }
        }
    }
    for i in 0..3 {
        for j in 0..3 {
            pp[i][j] += theta * nn[i] * nn[j];
        }
    }
    pp
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
