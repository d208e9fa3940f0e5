//! Blocked randomized UTV factorization.
//!
//! This crate computes an approximate factorization `A ≈ U·T·Vᵗ` of a dense
//! real matrix, where U and V are orthogonal and T is upper triangular with
//! a diagonal that tracks the singular value spectrum of A in decreasing
//! order, block by block. The UTV form delivers most of what a singular
//! value decomposition delivers (a revealed spectrum and orthonormal bases
//! for the dominant subspaces) at a fraction of the cost, and it is built
//! from blocked kernels (matrix multiplication and Householder QR) that are
//! the natural target for high-throughput and communication-avoiding
//! execution, unlike the inherently sequential SVD iteration.
//!
//! Built on the [`faer`] linear algebra framework: dense storage, matrix
//! products, thin-QR orthonormalization inside the range finder, and the
//! small dense SVDs used to diagonalize each block.
//!
//! ## Algorithm
//!
//! The driver ([`randutv`]) peels the matrix one column block at a time.
//! For each block, a randomized range finder ([`find_range`]) sketches the
//! trailing submatrix's dominant row space with a Gaussian projection
//! (optionally sharpened by power iteration), a pair of Householder
//! transforms rotates those directions into the leading block and reduces it
//! to triangular form, and a small dense SVD diagonalizes the block. The
//! left and right transforms accumulate into U and V; what remains of the
//! working matrix when all blocks are processed is T.
//!
//! Tunables live in [`UtvParams`]: block size, power-iteration count,
//! oversampling, optional truncation rank, and the block-reduction strategy.
//! Randomness is explicit: every entry point takes a caller-owned
//! [`rand::Rng`], so a seeded generator makes factorizations reproducible.
//!
//! ## Accuracy
//!
//! The factorization is approximate: its error is bounded by the singular
//! values beyond the processed rank plus a randomized term that shrinks
//! exponentially with oversampling. Accuracy problems never surface as
//! errors; they are observed through the metrics in [`metrics`], which
//! include the SVD-oracle baseline ([`metrics::svd_truncation_error`]) that
//! any rank-k approximation is measured against. Re-running with a higher
//! power-iteration count, more oversampling, or another seed is the remedy
//! for an unacceptable error, not an automatic fallback.
//!
//! ## Example
//!
//! ```rust
//! use faer::Mat;
//! use rand::{rngs::StdRng, SeedableRng};
//! use ::randutv::{randutv, relative_reconstruction_error, UtvParams};
//!
//! // A small test matrix with rapidly decaying spectrum.
//! let a = Mat::from_fn(8, 6, |i, j| 1.0 / (1.0 + (i + 2 * j) as f64));
//!
//! let mut rng = StdRng::seed_from_u64(0);
//! let utv = randutv(a.as_ref(), &UtvParams::new(2), &mut rng).unwrap();
//!
//! // With no truncation the factorization reconstructs A to roundoff.
//! let rel = relative_reconstruction_error(
//!     a.as_ref(),
//!     utv.u.as_ref(),
//!     utv.t.as_ref(),
//!     utv.v.as_ref(),
//! );
//! assert!(rel < 1e-12);
//!
//! // The diagonal of T approximates the singular values, largest first.
//! assert!(utv.t[(0, 0)] >= utv.t[(1, 1)]);
//! ```

// Declare the modules that form the crate's API structure.
pub mod algorithms;
pub mod error;
pub mod householder;
pub mod metrics;
pub mod params;
pub mod sketch;

// Re-export the main API for convenient access.
pub use algorithms::{randutv, UtvDecomposition};
pub use error::UtvError;
pub use metrics::{
    orthogonality_defect, reconstruction_error, relative_reconstruction_error,
    svd_truncation_error,
};
pub use params::{BlockStrategy, UtvParams};
pub use sketch::find_range;
