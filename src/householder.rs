//! Householder QR factorization in compact factored form.
//!
//! The blocked UTV driver never needs the orthogonal factor Q of a panel as
//! an explicit matrix: it needs `Qᵗ·C`, `Q·C`, and `C·Q` applied to trailing
//! submatrices and to the running U/V accumulators. Materializing Q and
//! multiplying would turn each O(b·r·c) update into an O(r²·c) one, which is
//! exactly the cost the blocking strategy is designed to avoid.
//!
//! [`HouseholderQr`] therefore stores the factorization the way LAPACK's
//! `dgeqrf` does: the upper triangle of the factored panel holds R, the
//! strict lower triangle holds the tails of the Householder vectors (whose
//! leading entry is fixed at one), and a separate array holds the scalar
//! normalizations `beta_j = 2 / ‖v_j‖²`. Application of Q or Qᵗ is then a
//! short sequence of rank-one reflections.
//!
//! The reflector construction uses the stable sign choice
//! `v₁ = x₁ + sign(x₁)·‖x‖` (Golub & Van Loan), so orthogonality error stays
//! near machine epsilon regardless of the panel's conditioning. Explicit
//! accessors ([`HouseholderQr::thin_q`], [`HouseholderQr::full_q`],
//! [`HouseholderQr::thin_r`]) exist for tests and for callers that do need
//! dense factors.

use faer::reborrow::ReborrowMut;
use faer::{Mat, MatMut, MatRef};

/// Compact factored Householder QR of an r×c matrix.
///
/// Holds min(r, c) reflectors. A reflector with `beta = 0` is the identity,
/// which is what a column whose subdiagonal part is exactly zero produces;
/// rank-deficient panels therefore factor without error.
#[derive(Debug, Clone)]
pub struct HouseholderQr {
    /// R in the upper triangle, reflector tails below the diagonal.
    factors: Mat<f64>,
    /// Scalar normalization of each reflector, `2 / ‖v‖²`.
    betas: Vec<f64>,
}

impl HouseholderQr {
    /// Factors the given matrix. Works for any shape; for the tall case
    /// (r ≥ c) this yields the usual Q (r×c thin or r×r full) and R (c×c).
    pub fn factor(mat: MatRef<'_, f64>) -> Self {
        let r = mat.nrows();
        let c = mat.ncols();
        let k = r.min(c);
        let mut factors = mat.to_owned();
        let mut betas = vec![0.0; k];
        let mut v = vec![0.0; r];

        for j in 0..k {
            // Squared norm of the subdiagonal part of column j.
            let mut sigma = 0.0;
            for i in (j + 1)..r {
                let x = factors[(i, j)];
                sigma += x * x;
            }
            if sigma == 0.0 {
                // Column already reduced; keep the identity reflector. The
                // stored tail is all zeros, consistent with beta = 0.
                continue;
            }

            let x0 = factors[(j, j)];
            let norm = (x0 * x0 + sigma).sqrt();
            // v1 = x0 + sign(x0)·‖x‖ never cancels; sign(0) is taken as +1.
            let rho = if x0 >= 0.0 { norm } else { -norm };
            let v1 = x0 + rho;
            let beta = 2.0 * v1 * v1 / (sigma + v1 * v1);

            v[j] = 1.0;
            for i in (j + 1)..r {
                v[i] = factors[(i, j)] / v1;
            }

            // Apply H = I - beta·v·vᵗ to the trailing panel, column j included
            // (its subdiagonal becomes zero up to roundoff, and its diagonal
            // becomes -rho).
            for jj in j..c {
                let mut s = 0.0;
                for i in j..r {
                    s += v[i] * factors[(i, jj)];
                }
                let s = beta * s;
                for i in j..r {
                    factors[(i, jj)] -= s * v[i];
                }
            }

            // Overwrite the now-zero subdiagonal with the reflector tail.
            for i in (j + 1)..r {
                factors[(i, j)] = v[i];
            }
            betas[j] = beta;
        }

        Self { factors, betas }
    }

    /// Row dimension the reflectors act on.
    pub fn dim(&self) -> usize {
        self.factors.nrows()
    }

    /// Number of stored reflectors, min(r, c).
    pub fn num_reflectors(&self) -> usize {
        self.betas.len()
    }

    /// Computes `C ← Qᵗ·C` in place. `C` must have `dim()` rows.
    pub fn apply_qt_left(&self, mut c: MatMut<'_, f64>) {
        let r = self.dim();
        assert_eq!(
            c.nrows(),
            r,
            "Dimension mismatch: Q acts on {} rows but C has {} rows.",
            r,
            c.nrows(),
        );
        // Qᵗ = H_{k-1}···H_0, so H_0 is applied first.
        for j in 0..self.betas.len() {
            self.reflect_left(j, c.rb_mut());
        }
    }

    /// Computes `C ← Q·C` in place. `C` must have `dim()` rows.
    pub fn apply_q_left(&self, mut c: MatMut<'_, f64>) {
        let r = self.dim();
        assert_eq!(
            c.nrows(),
            r,
            "Dimension mismatch: Q acts on {} rows but C has {} rows.",
            r,
            c.nrows(),
        );
        for j in (0..self.betas.len()).rev() {
            self.reflect_left(j, c.rb_mut());
        }
    }

    /// Computes `C ← C·Q` in place. `C` must have `dim()` columns.
    pub fn apply_q_right(&self, mut c: MatMut<'_, f64>) {
        let r = self.dim();
        assert_eq!(
            c.ncols(),
            r,
            "Dimension mismatch: Q acts on {} columns but C has {} columns.",
            r,
            c.ncols(),
        );
        // C·Q = ((C·H_0)·H_1)···H_{k-1}.
        for j in 0..self.betas.len() {
            self.reflect_right(j, c.rb_mut());
        }
    }

    /// Applies the j-th reflector on the left: `C ← (I - beta·v·vᵗ)·C`.
    fn reflect_left(&self, j: usize, mut c: MatMut<'_, f64>) {
        let beta = self.betas[j];
        if beta == 0.0 {
            return;
        }
        let r = self.dim();
        for col in 0..c.ncols() {
            let mut s = c[(j, col)];
            for i in (j + 1)..r {
                s += self.factors[(i, j)] * c[(i, col)];
            }
            let s = beta * s;
            c[(j, col)] -= s;
            for i in (j + 1)..r {
                c[(i, col)] -= s * self.factors[(i, j)];
            }
        }
    }

    /// Applies the j-th reflector on the right: `C ← C·(I - beta·v·vᵗ)`.
    fn reflect_right(&self, j: usize, mut c: MatMut<'_, f64>) {
        let beta = self.betas[j];
        if beta == 0.0 {
            return;
        }
        let r = self.dim();
        for row in 0..c.nrows() {
            let mut s = c[(row, j)];
            for i in (j + 1)..r {
                s += c[(row, i)] * self.factors[(i, j)];
            }
            let s = beta * s;
            c[(row, j)] -= s;
            for i in (j + 1)..r {
                c[(row, i)] -= s * self.factors[(i, j)];
            }
        }
    }

    /// Materializes the thin orthonormal factor Q (r × min(r, c)).
    pub fn thin_q(&self) -> Mat<f64> {
        let r = self.dim();
        let k = self.betas.len();
        let mut q = Mat::zeros(r, k);
        for i in 0..k {
            q[(i, i)] = 1.0;
        }
        self.apply_q_left(q.as_mut());
        q
    }

    /// Materializes the full orthogonal factor Q (r × r).
    pub fn full_q(&self) -> Mat<f64> {
        let r = self.dim();
        let mut q = Mat::identity(r, r);
        self.apply_q_left(q.as_mut());
        q
    }

    /// Extracts the upper-triangular factor R (min(r, c) × c).
    pub fn thin_r(&self) -> Mat<f64> {
        let c = self.factors.ncols();
        let k = self.betas.len();
        Mat::from_fn(k, c, |i, j| if j >= i { self.factors[(i, j)] } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    fn max_abs_diff(a: MatRef<'_, f64>, b: MatRef<'_, f64>) -> f64 {
        (a - b).norm_max()
    }

    #[test]
    fn test_tall_factorization_reconstructs() {
        let m: Mat<f64> = mat![
            [4.0, 1.0, -2.0],
            [1.0, 2.0, 0.0],
            [-2.0, 0.0, 3.0],
            [2.0, 1.0, -2.0],
            [1.0, 3.0, 2.0],
        ];
        let qr = HouseholderQr::factor(m.as_ref());
        let reconstructed = qr.thin_q() * qr.thin_r();
        assert!(max_abs_diff(m.as_ref(), reconstructed.as_ref()) < 1e-12);
    }

    #[test]
    fn test_q_is_orthogonal() {
        let m: Mat<f64> = mat![
            [1.0, 1.0],
            [1.0, 1.0 + 1e-10],
            [0.0, 1e-10],
        ];
        // Nearly rank-deficient input; Householder orthogonality must not
        // degrade the way Gram-Schmidt would.
        let qr = HouseholderQr::factor(m.as_ref());
        let q = qr.full_q();
        let defect = q.transpose() * q.as_ref() - Mat::<f64>::identity(3, 3);
        assert!(defect.norm_max() < 1e-14);
    }

    #[test]
    fn test_applied_form_matches_explicit_q() {
        let m: Mat<f64> = mat![
            [2.0, -1.0, 0.5],
            [0.0, 3.0, 1.0],
            [1.0, 1.0, -2.0],
            [4.0, 0.0, 1.0],
        ];
        let c: Mat<f64> = mat![
            [1.0, 2.0],
            [0.0, -1.0],
            [3.0, 0.5],
            [-2.0, 1.0],
        ];
        let qr = HouseholderQr::factor(m.as_ref());
        let q = qr.full_q();

        let mut qt_c = c.clone();
        qr.apply_qt_left(qt_c.as_mut());
        assert!(max_abs_diff(qt_c.as_ref(), (q.transpose() * c.as_ref()).as_ref()) < 1e-12);

        let mut q_c = c.clone();
        qr.apply_q_left(q_c.as_mut());
        assert!(max_abs_diff(q_c.as_ref(), (q.as_ref() * c.as_ref()).as_ref()) < 1e-12);

        let ct = c.transpose().to_owned();
        let mut ct_q = ct.clone();
        qr.apply_q_right(ct_q.as_mut());
        assert!(max_abs_diff(ct_q.as_ref(), (ct.as_ref() * q.as_ref()).as_ref()) < 1e-12);
    }

    #[test]
    fn test_wide_matrix() {
        let m: Mat<f64> = mat![
            [1.0, 2.0, 3.0, 4.0, 5.0],
            [0.0, 1.0, -1.0, 2.0, 0.0],
            [2.0, 0.0, 1.0, 1.0, -3.0],
        ];
        let qr = HouseholderQr::factor(m.as_ref());
        assert_eq!(qr.num_reflectors(), 3);
        let reconstructed = qr.full_q() * qr.thin_r();
        assert!(max_abs_diff(m.as_ref(), reconstructed.as_ref()) < 1e-12);
    }

    #[test]
    fn test_zero_column_is_identity_reflector() {
        let m: Mat<f64> = mat![
            [0.0, 1.0],
            [0.0, 2.0],
            [0.0, 3.0],
        ];
        let qr = HouseholderQr::factor(m.as_ref());
        let reconstructed = qr.thin_q() * qr.thin_r();
        assert!(max_abs_diff(m.as_ref(), reconstructed.as_ref()) < 1e-12);
        let q = qr.full_q();
        let defect = q.transpose() * q.as_ref() - Mat::<f64>::identity(3, 3);
        assert!(defect.norm_max() < 1e-14);
    }

    #[test]
    #[should_panic(expected = "Dimension mismatch")]
    fn test_left_apply_dimension_mismatch_panics() {
        let m: Mat<f64> = mat![[1.0], [2.0], [3.0]];
        let qr = HouseholderQr::factor(m.as_ref());
        let mut c = Mat::<f64>::zeros(2, 2);
        qr.apply_qt_left(c.as_mut());
    }
}
