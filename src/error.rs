//! This module defines the custom error types for the library.
//!
//! All error conditions that the factorization entry points can report are
//! centralized in a single enum: [`UtvErrorKind`], wrapped by the public
//! [`UtvError`] type.
//!
//! Using the [`thiserror`] crate allows us to create idiomatic error types with
//! minimal boilerplate. Note that [`faer::linalg::svd::SvdError`] does not
//! implement the standard [`std::error::Error`] trait, so we wrap it manually
//! to provide a compatible error type.
//!
//! Degenerate input (an empty matrix) is deliberately *not* an error: the
//! driver returns trivially-shaped factors instead. Numerical degradation of
//! the randomized approximation is also not an error; it only shows up as an
//! elevated reconstruction error, observable through [`crate::metrics`].
use thiserror::Error;

/// Represents all possible errors that can occur while setting up or running
/// a UTV factorization.
#[derive(Error, Debug)]
#[error(transparent)]
pub struct UtvError(#[from] UtvErrorKind);

/// Private enum containing the distinct kinds of errors.
/// This separation allows for a clean `Display` implementation via [`thiserror`]
/// while handling non-standard error types manually.
#[derive(Error, Debug, PartialEq)]
pub(crate) enum UtvErrorKind {
    /// The configured block size is zero or larger than the matrix permits.
    #[error("Invalid block size {block_size} for a {nrows}x{ncols} matrix.")]
    InvalidBlockSize {
        block_size: usize,
        nrows: usize,
        ncols: usize,
    },

    /// A requested target rank exceeds min(m, n).
    #[error("Target rank {target_rank} exceeds min(m, n) = {max_rank}.")]
    InvalidTargetRank { target_rank: usize, max_rank: usize },

    /// Wraps an error originating from [`faer`]'s singular value decomposition,
    /// used for the revealing reduction of diagonal blocks.
    #[error("A numerical error occurred during the dense SVD of a block: {0:?}")]
    SvdError(faer::linalg::svd::SvdError),
}

// Manually implement PartialEq for the public error type.
// We compare the inner `UtvErrorKind`.
impl PartialEq for UtvError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
