//! Shape/parameter sweep for the randomized UTV factorization.
//!
//! For each combination of matrix size and block size, this executable
//! synthesizes a square test matrix with geometrically decaying singular
//! values, runs a truncated UTV factorization, times a full SVD of the same
//! matrix as the accuracy oracle, and writes one CSV row per configuration
//! with wall-clock times and relative errors. The output is meant to be fed
//! straight into external plotting.

use anyhow::{Context, Result};
use clap::Parser;
use faer::stats::prelude::*;
use faer::stats::UnitaryMat;
use faer::{Col, Mat};
use ::randutv::{randutv, relative_reconstruction_error, UtvParams};
use serde::Serialize;
use std::time::Instant;

/// Command-line arguments for the sweep.
#[derive(Parser, Debug)]
#[clap(
    name = "sweep",
    about = "Sweeps matrix and block sizes, comparing randomized UTV against a full SVD."
)]
struct SweepArgs {
    /// Square matrix sizes to test.
    #[clap(long, value_delimiter = ',', default_value = "128,256,512")]
    sizes: Vec<usize>,
    /// Block sizes to test.
    #[clap(long, value_delimiter = ',', default_value = "16,32,64")]
    block_sizes: Vec<usize>,
    /// Power-iteration counts to test.
    #[clap(long, value_delimiter = ',', default_value = "0,1,2")]
    power_iters: Vec<usize>,
    /// Oversampling count.
    #[clap(long, default_value_t = 5)]
    oversampling: usize,
    /// Ratio between consecutive singular values of the synthetic matrix.
    #[clap(long, default_value_t = 0.95)]
    decay: f64,
    /// Truncation rank as a fraction of the matrix size.
    #[clap(long, default_value_t = 0.25)]
    rank_fraction: f64,
    /// RNG seed for both the test matrices and the sketches.
    #[clap(long, default_value_t = 42)]
    seed: u64,
    /// Path to the output CSV file.
    #[clap(long)]
    output: String,
}

/// One row of the output CSV.
#[derive(Debug, Serialize)]
struct SweepRecord {
    n: usize,
    block_size: usize,
    power_iters: usize,
    oversampling: usize,
    rank: usize,
    utv_seconds: f64,
    svd_seconds: f64,
    utv_rel_err: f64,
    svd_rel_err: f64,
}

/// Synthesizes an n×n matrix `A = U·diag(decay^i)·Vᵗ` from Haar-random
/// orthogonal factors, so the singular value spectrum is known exactly.
fn decaying_matrix(n: usize, decay: f64, rng: &mut StdRng) -> Mat<f64> {
    let u = UnitaryMat {
        dim: n,
        standard_normal: StandardNormal,
    }
    .rand::<Mat<f64>>(rng);
    let v = UnitaryMat {
        dim: n,
        standard_normal: StandardNormal,
    }
    .rand::<Mat<f64>>(rng);
    let singular_values = Col::<f64>::from_iter((0..n).map(|i| decay.powi(i as i32)));
    u.as_ref() * singular_values.as_diagonal() * v.transpose()
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .init();
    let args = SweepArgs::parse();

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to open output CSV {}", args.output))?;

    for &n in &args.sizes {
        let mut rng = StdRng::seed_from_u64(args.seed);
        let a = decaying_matrix(n, args.decay, &mut rng);
        let a_norm = a.norm_l2();
        let rank = ((n as f64 * args.rank_fraction) as usize).max(1);

        // Oracle: one full SVD per matrix, timed, reused for the baseline
        // error of the best rank-`rank` truncation.
        let svd_start = Instant::now();
        let svd = a
            .as_ref()
            .svd()
            .map_err(|e| anyhow::anyhow!("SVD oracle failed: {e:?}"))?;
        let svd_seconds = svd_start.elapsed().as_secs_f64();
        let s = svd.S().column_vector();
        let tail: f64 = (rank..n).map(|i| s[i] * s[i]).sum();
        let svd_rel_err = tail.sqrt() / a_norm;

        for &block_size in &args.block_sizes {
            for &power_iters in &args.power_iters {
                let params = UtvParams::new(block_size)
                    .with_power_iters(power_iters)
                    .with_oversampling(args.oversampling)
                    .with_target_rank(rank);

                let utv_start = Instant::now();
                let utv = randutv(a.as_ref(), &params, &mut rng)?;
                let utv_seconds = utv_start.elapsed().as_secs_f64();

                let utv_rel_err = relative_reconstruction_error(
                    a.as_ref(),
                    utv.u.as_ref(),
                    utv.t.as_ref(),
                    utv.v.as_ref(),
                );

                log::info!(
                    "n={n} b={block_size} q={power_iters}: utv {utv_seconds:.3}s \
                     (rel err {utv_rel_err:.3e}), svd {svd_seconds:.3}s \
                     (rel err {svd_rel_err:.3e})"
                );
                writer.serialize(SweepRecord {
                    n,
                    block_size,
                    power_iters,
                    oversampling: args.oversampling,
                    rank,
                    utv_seconds,
                    svd_seconds,
                    utv_rel_err,
                    svd_rel_err,
                })?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
