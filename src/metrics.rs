//! Accuracy metrics and SVD-oracle glue.
//!
//! The factorization itself never reports numerical degradation as an error;
//! the caller observes it through these pure functions. The full SVD is the
//! accuracy oracle (it is [`faer`]'s, not re-implemented here), and
//! [`svd_truncation_error`] exposes the baseline every benchmark and test
//! compares against: the Frobenius norm of the discarded singular-value
//! tail, which is the best possible error of any rank-k approximation.

use crate::error::{UtvError, UtvErrorKind};
use faer::prelude::*;

/// Frobenius norm of the reconstruction residual `‖A − U·T·Vᵗ‖`.
///
/// Pure: no hidden state, identical inputs give identical output.
pub fn reconstruction_error(
    a: MatRef<'_, f64>,
    u: MatRef<'_, f64>,
    t: MatRef<'_, f64>,
    v: MatRef<'_, f64>,
) -> f64 {
    let approx = u * t * v.transpose();
    (a - approx.as_ref()).norm_l2()
}

/// Reconstruction residual relative to `‖A‖`. Returns zero for a zero (or
/// empty) matrix, where the factorization is trivially exact.
pub fn relative_reconstruction_error(
    a: MatRef<'_, f64>,
    u: MatRef<'_, f64>,
    t: MatRef<'_, f64>,
    v: MatRef<'_, f64>,
) -> f64 {
    let norm = a.norm_l2();
    if norm == 0.0 {
        return 0.0;
    }
    reconstruction_error(a, u, t, v) / norm
}

/// Departure of a matrix from having orthonormal columns, `‖QᵗQ − I‖`.
pub fn orthogonality_defect(q: MatRef<'_, f64>) -> f64 {
    let k = q.ncols();
    let gram = q.transpose() * q;
    (gram.as_ref() - Mat::<f64>::identity(k, k).as_ref()).norm_l2()
}

/// Frobenius norm of the singular-value tail discarded by the best rank-`rank`
/// approximation of `a`, computed from a full SVD.
///
/// This is the Eckart-Young lower bound on the error of *any* rank-`rank`
/// factorization, randomized or not.
pub fn svd_truncation_error(a: MatRef<'_, f64>, rank: usize) -> Result<f64, UtvError> {
    let k = a.nrows().min(a.ncols());
    if rank >= k {
        return Ok(0.0);
    }
    let svd = a.svd().map_err(UtvErrorKind::SvdError)?;
    let s = svd.S().column_vector();
    let mut tail = 0.0;
    for i in rank..k {
        tail += s[i] * s[i];
    }
    Ok(tail.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn test_exact_identity_factors() {
        let a: Mat<f64> = mat![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let u = Mat::<f64>::identity(3, 3);
        let v = Mat::<f64>::identity(2, 2);
        let err = reconstruction_error(a.as_ref(), u.as_ref(), a.as_ref(), v.as_ref());
        assert!(err < 1e-15);
    }

    #[test]
    fn test_relative_error_of_zero_matrix_is_zero() {
        let a = Mat::<f64>::zeros(4, 3);
        let u = Mat::<f64>::identity(4, 4);
        let v = Mat::<f64>::identity(3, 3);
        let err = relative_reconstruction_error(a.as_ref(), u.as_ref(), a.as_ref(), v.as_ref());
        assert_eq!(err, 0.0);
    }

    #[test]
    fn test_orthogonality_defect_of_identity() {
        let q = Mat::<f64>::identity(5, 3);
        assert!(orthogonality_defect(q.as_ref()) < 1e-15);
        let skewed: Mat<f64> = mat![[1.0, 1.0], [0.0, 1.0]];
        assert!(orthogonality_defect(skewed.as_ref()) > 0.5);
    }

    #[test]
    fn test_truncation_error_of_diagonal_matrix() -> Result<(), crate::UtvError> {
        // Singular values 3, 2, 1: the rank-1 tail is sqrt(2² + 1²).
        let a: Mat<f64> = mat![
            [3.0, 0.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, 1.0],
        ];
        let tail = svd_truncation_error(a.as_ref(), 1)?;
        assert!((tail - 5.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(svd_truncation_error(a.as_ref(), 3)?, 0.0);
        Ok(())
    }
}
