//! Blocked randomized UTV driver.
//!
//! Computes `A ≈ U·T·Vᵗ` with U (m×m) and V (n×n) orthogonal and T (m×n)
//! upper triangular, the diagonal of T tracking the singular spectrum of A
//! in decreasing order block by block.
//!
//! The matrix is processed in column blocks of the configured width. Each
//! block step looks only at the trailing submatrix left by the previous
//! step:
//!
//! 1. The range finder sketches the trailing submatrix's *row* space (its
//!    transpose's column space) and the leading block of the resulting basis
//!    is turned into a right orthogonal transform. Applying it rotates the
//!    locally dominant directions into the leading columns; the transform is
//!    folded into T and accumulated into V.
//! 2. A Householder QR of the rotated leading columns gives the left
//!    transform that reduces them to triangular form; it is folded into T
//!    and accumulated into U.
//! 3. Under the default [`BlockStrategy::RevealingSvd`] policy, a dense SVD
//!    of the small diagonal block diagonalizes it exactly, and the small
//!    rotations are absorbed into U, V, and the block row of T.
//!
//! Blocks have a strict sequential data dependency (each sketch must see
//! the trailing matrix left by the previous reduction), so there is no
//! cross-block parallelism; the dense kernels inside a block are where the
//! work (and any intra-block parallelism) lives.
//!
//! The final partial block, whose trailing submatrix is no wider or taller
//! than one block, is reduced exactly with a dense SVD: no sampling is
//! needed once the problem fits in a single block.

use crate::error::{UtvError, UtvErrorKind};
use crate::householder::HouseholderQr;
use crate::params::{BlockStrategy, UtvParams};
use crate::sketch::find_range;
use faer::prelude::*;
use rand::Rng;

/// Result triple of a UTV factorization.
///
/// `u` is m×m, `t` is m×n, `v` is n×n; `A ≈ u·t·vᵗ`. The factors are plain
/// dense matrices, directly consumable by external error or plotting code.
#[derive(Debug, Clone)]
pub struct UtvDecomposition {
    /// Left orthogonal factor.
    pub u: Mat<f64>,
    /// Upper-triangular core; its diagonal approximates the singular values
    /// of the input in decreasing order across blocks.
    pub t: Mat<f64>,
    /// Right orthogonal factor.
    pub v: Mat<f64>,
}

impl UtvDecomposition {
    /// Forms the dense product `U·T·Vᵗ`.
    pub fn reconstruct(&self) -> Mat<f64> {
        self.u.as_ref() * self.t.as_ref() * self.v.transpose()
    }
}

/// Computes a blocked randomized UTV factorization of `a`.
///
/// Returns `(U, T, V)` as a [`UtvDecomposition`] with `A ≈ U·T·Vᵗ`. The
/// approximation error is bounded by the singular values discarded at the
/// configured rank plus a randomized failure term that shrinks exponentially
/// with the oversampling count.
///
/// Validation errors (zero block size, block size or target rank larger than
/// `min(m, n)`) are reported immediately. Degenerate input with zero rows
/// or columns is not an error: the factors come back with the
/// matching trivial shapes. Numerical degradation never raises; it is
/// observable only through [`crate::metrics`].
///
/// # Arguments
/// * `a`: The matrix to factor. Left untouched; the driver works on a copy.
/// * `params`: Validated-on-entry configuration, see [`UtvParams`].
/// * `rng`: Random source for the range finder; seed it for reproducible
///   factorizations.
pub fn randutv(
    a: MatRef<'_, f64>,
    params: &UtvParams,
    rng: &mut impl Rng,
) -> Result<UtvDecomposition, UtvError> {
    let m = a.nrows();
    let n = a.ncols();
    params.validate(m, n)?;

    let mut u = Mat::<f64>::identity(m, m);
    let mut v = Mat::<f64>::identity(n, n);
    let mut t = a.to_owned();

    let min_dim = m.min(n);
    let rank_limit = params.target_rank.unwrap_or(min_dim);
    let b = params.block_size;

    let mut offset = 0;
    while offset < rank_limit {
        let r = m - offset;
        let c = n - offset;

        if r.min(c) <= b {
            // The remainder fits in one block: reduce it exactly, no
            // sampling.
            log::debug!("final block at offset {offset}: exact {r}x{c} reduction");
            reduce_trailing_exactly(&mut u, &mut t, &mut v, offset)?;
            break;
        }

        let bw = b.min(rank_limit - offset);
        log::debug!("block step at offset {offset}: trailing {r}x{c}, width {bw}");

        // Right transform: an orthonormal basis for the dominant row space
        // of the trailing submatrix, from a sketch of its transpose.
        let basis = {
            let trailing = t.as_ref().submatrix(offset, offset, r, c);
            find_range(
                trailing.transpose(),
                bw,
                params.power_iters,
                params.oversampling,
                rng,
            )
        };
        let right = HouseholderQr::factor(basis.as_ref().subcols(0, bw));
        // The right transform touches every row of the trailing columns,
        // frozen rows included; V picks it up on its trailing columns.
        right.apply_q_right(t.as_mut().submatrix_mut(0, offset, m, c));
        right.apply_q_right(v.as_mut().submatrix_mut(0, offset, n, c));

        // Left transform: Householder QR of the rotated leading columns.
        let left = HouseholderQr::factor(t.as_ref().submatrix(offset, offset, r, bw));
        left.apply_qt_left(t.as_mut().submatrix_mut(offset, offset, r, c));
        left.apply_q_right(u.as_mut().submatrix_mut(0, offset, m, r));

        // The panel below the new diagonal block is zero up to roundoff;
        // make it exact so T is genuinely triangular.
        t.as_mut()
            .submatrix_mut(offset + bw, offset, r - bw, bw)
            .fill(0.0);

        match params.strategy {
            BlockStrategy::RevealingSvd => {
                reveal_diagonal_block(&mut u, &mut t, &mut v, offset, bw)?;
            }
            BlockStrategy::QrOnly => {
                // Scrub the roundoff below the diagonal inside the block.
                let mut block = t.as_mut().submatrix_mut(offset, offset, bw, bw);
                for j in 0..bw {
                    for i in (j + 1)..bw {
                        block[(i, j)] = 0.0;
                    }
                }
            }
        }

        offset += bw;
    }

    // Truncated mode: drop the residual trailing submatrix. The error now
    // includes the truncation tail.
    if rank_limit < min_dim {
        t.as_mut()
            .submatrix_mut(rank_limit, rank_limit, m - rank_limit, n - rank_limit)
            .fill(0.0);
    }

    Ok(UtvDecomposition { u, t, v })
}

/// Reduces the whole trailing submatrix at `offset` with a dense SVD,
/// absorbing the local rotations into U, V, T's frozen rows, and writing the
/// singular values onto the diagonal.
fn reduce_trailing_exactly(
    u: &mut Mat<f64>,
    t: &mut Mat<f64>,
    v: &mut Mat<f64>,
    offset: usize,
) -> Result<(), UtvError> {
    let m = t.nrows();
    let n = t.ncols();
    let r = m - offset;
    let c = n - offset;

    let svd = t
        .as_ref()
        .submatrix(offset, offset, r, c)
        .svd()
        .map_err(UtvErrorKind::SvdError)?;
    let u_loc = svd.U();
    let v_loc = svd.V();
    let s = svd.S().column_vector();

    {
        let mut block = t.as_mut().submatrix_mut(offset, offset, r, c);
        block.fill(0.0);
        for i in 0..r.min(c) {
            block[(i, i)] = s[i];
        }
    }
    if offset > 0 {
        let updated = t.as_ref().submatrix(0, offset, offset, c) * v_loc;
        t.as_mut()
            .submatrix_mut(0, offset, offset, c)
            .copy_from(&updated);
    }
    let u_updated = u.as_ref().submatrix(0, offset, m, r) * u_loc;
    u.as_mut()
        .submatrix_mut(0, offset, m, r)
        .copy_from(&u_updated);
    let v_updated = v.as_ref().submatrix(0, offset, n, c) * v_loc;
    v.as_mut()
        .submatrix_mut(0, offset, n, c)
        .copy_from(&v_updated);
    Ok(())
}

/// Diagonalizes the bw×bw block at `offset` with a dense SVD and folds the
/// small rotations into U, V, the block row of T, and the frozen rows above.
fn reveal_diagonal_block(
    u: &mut Mat<f64>,
    t: &mut Mat<f64>,
    v: &mut Mat<f64>,
    offset: usize,
    bw: usize,
) -> Result<(), UtvError> {
    let m = t.nrows();
    let n = t.ncols();
    let c = n - offset;

    let svd = t
        .as_ref()
        .submatrix(offset, offset, bw, bw)
        .svd()
        .map_err(UtvErrorKind::SvdError)?;
    let u_loc = svd.U();
    let v_loc = svd.V();
    let s = svd.S().column_vector();

    {
        let mut block = t.as_mut().submatrix_mut(offset, offset, bw, bw);
        block.fill(0.0);
        for i in 0..bw {
            block[(i, i)] = s[i];
        }
    }
    // Block row to the right of the diagonal block.
    if c > bw {
        let updated = u_loc.transpose() * t.as_ref().submatrix(offset, offset + bw, bw, c - bw);
        t.as_mut()
            .submatrix_mut(offset, offset + bw, bw, c - bw)
            .copy_from(&updated);
    }
    // Frozen rows above, in this block's columns.
    if offset > 0 {
        let updated = t.as_ref().submatrix(0, offset, offset, bw) * v_loc;
        t.as_mut()
            .submatrix_mut(0, offset, offset, bw)
            .copy_from(&updated);
    }
    let u_updated = u.as_ref().submatrix(0, offset, m, bw) * u_loc;
    u.as_mut()
        .submatrix_mut(0, offset, m, bw)
        .copy_from(&u_updated);
    let v_updated = v.as_ref().submatrix(0, offset, n, bw) * v_loc;
    v.as_mut()
        .submatrix_mut(0, offset, n, bw)
        .copy_from(&v_updated);
    Ok(())
}
