//! # Engine Module
//!
//! The stages of the torsion pipeline, in the order data flows through them:
//!
//! 1. [`extract`] - select N, CA and C atoms from the structure's atom records
//! 2. [`grouping`] - validate N/CA/C triples and split them into contiguous segments
//! 3. [`torsion`] - compute one phi/psi pair per interior residue
//! 4. [`filter`] - keep the pairs selected by a [`FilterRule`](config::FilterRule)
//!
//! Stages share no state; each consumes its predecessor's output and returns a new value.
//! [`config`], [`error`] and [`progress`] hold what the stages have in common.

pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod grouping;
pub mod progress;
pub mod torsion;
