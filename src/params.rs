//! Run-time configuration for the blocked UTV driver.
//!
//! The factorization has a small set of tunable parameters (block size, power
//! iterations, oversampling, optional target rank, block-reduction strategy).
//! They are bundled into an explicit [`UtvParams`] struct and validated once
//! at the entry point, so that every downstream routine can assume a
//! consistent configuration.

use crate::error::{UtvError, UtvErrorKind};

/// Policy for reducing the b×b diagonal block once it has been rotated into
/// place by the left and right orthogonal transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStrategy {
    /// Leave the diagonal block as the upper-triangular R factor of the local
    /// Householder QR. Cheapest; diagonal entries carry arbitrary signs and
    /// are only loosely ordered within the block.
    QrOnly,
    /// Additionally diagonalize the block with a dense SVD, folding the small
    /// rotations into U, V, and the block row of T. The diagonal of each block
    /// then holds nonnegative values in decreasing order, and tracks the
    /// singular spectrum of A much more tightly.
    RevealingSvd,
}

/// Tunable parameters of the blocked randomized UTV factorization.
///
/// Construct with [`UtvParams::new`] and adjust with the builder-style
/// setters. Validation happens inside [`crate::randutv`], not here, because
/// legality depends on the matrix dimensions.
///
/// # Example
///
/// ```
/// use randutv::{BlockStrategy, UtvParams};
///
/// let params = UtvParams::new(16)
///     .with_power_iters(1)
///     .with_oversampling(8)
///     .with_strategy(BlockStrategy::RevealingSvd);
/// assert_eq!(params.block_size, 16);
/// ```
#[derive(Debug, Clone)]
pub struct UtvParams {
    /// Number of columns processed per block step. Must be positive and no
    /// larger than min(m, n) for a nonempty input matrix.
    pub block_size: usize,
    /// Number of power-iteration rounds in the range finder. Zero is legal
    /// (cheapest, least accurate for slowly decaying spectra).
    pub power_iters: usize,
    /// Extra sampling columns beyond the block size. Zero is legal; larger
    /// values shrink the failure probability of the randomized projection.
    pub oversampling: usize,
    /// When set, the factorization stops after this many columns have been
    /// processed and drops the residual trailing submatrix. The
    /// reconstruction error then includes the truncation tail.
    pub target_rank: Option<usize>,
    /// Block-reduction policy, see [`BlockStrategy`].
    pub strategy: BlockStrategy,
}

impl UtvParams {
    /// Creates a parameter set with the given block size and default
    /// sampling settings: two power iterations, oversampling of five, no
    /// truncation, revealing-SVD block reduction.
    pub fn new(block_size: usize) -> Self {
        Self {
            block_size,
            power_iters: 2,
            oversampling: 5,
            target_rank: None,
            strategy: BlockStrategy::RevealingSvd,
        }
    }

    /// Sets the number of power-iteration rounds.
    pub fn with_power_iters(mut self, power_iters: usize) -> Self {
        self.power_iters = power_iters;
        self
    }

    /// Sets the oversampling count.
    pub fn with_oversampling(mut self, oversampling: usize) -> Self {
        self.oversampling = oversampling;
        self
    }

    /// Requests a truncated factorization of the given rank.
    pub fn with_target_rank(mut self, target_rank: usize) -> Self {
        self.target_rank = Some(target_rank);
        self
    }

    /// Sets the block-reduction strategy.
    pub fn with_strategy(mut self, strategy: BlockStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Checks the parameter set against the dimensions of the input matrix.
    ///
    /// An empty matrix (m = 0 or n = 0) is degenerate rather than invalid:
    /// only the block size being zero is rejected in that case, since the
    /// driver returns trivial factors without ever taking a block step.
    pub(crate) fn validate(&self, nrows: usize, ncols: usize) -> Result<(), UtvError> {
        let max_rank = nrows.min(ncols);
        if self.block_size == 0 || (max_rank > 0 && self.block_size > max_rank) {
            return Err(UtvErrorKind::InvalidBlockSize {
                block_size: self.block_size,
                nrows,
                ncols,
            }
            .into());
        }
        if let Some(target_rank) = self.target_rank {
            if target_rank > max_rank {
                return Err(UtvErrorKind::InvalidTargetRank {
                    target_rank,
                    max_rank,
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = UtvParams::new(4);
        assert_eq!(params.block_size, 4);
        assert_eq!(params.power_iters, 2);
        assert_eq!(params.oversampling, 5);
        assert_eq!(params.target_rank, None);
        assert_eq!(params.strategy, BlockStrategy::RevealingSvd);
    }

    #[test]
    fn test_zero_block_size_rejected() {
        assert!(UtvParams::new(0).validate(5, 5).is_err());
        // Rejected even for an empty matrix: a zero block size is
        // meaningless regardless of shape.
        assert!(UtvParams::new(0).validate(0, 0).is_err());
    }

    #[test]
    fn test_oversized_block_rejected() {
        assert!(UtvParams::new(6).validate(5, 8).is_err());
        assert!(UtvParams::new(5).validate(5, 8).is_ok());
    }

    #[test]
    fn test_oversized_block_tolerated_on_empty_input() {
        // Degenerate input never takes a block step, so any positive block
        // size is acceptable.
        assert!(UtvParams::new(7).validate(0, 3).is_ok());
    }

    #[test]
    fn test_target_rank_bounds() {
        assert!(UtvParams::new(2).with_target_rank(6).validate(5, 8).is_err());
        assert!(UtvParams::new(2).with_target_rank(5).validate(5, 8).is_ok());
        assert!(UtvParams::new(2).with_target_rank(0).validate(5, 8).is_ok());
    }
}
