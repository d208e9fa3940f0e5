//! Factorization drivers.
//!
//! Currently a single algorithm lives here: the blocked randomized UTV
//! driver in [`randutv`]. The module split mirrors the one-routine-per-file
//! layout of the primitive layer and leaves room for sibling variants
//! (e.g. a communication-avoiding distributed driver) without touching the
//! public API.

pub mod randutv;

pub use randutv::{randutv, UtvDecomposition};
