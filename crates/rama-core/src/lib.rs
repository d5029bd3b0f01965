//! # RAMA Core Library
//!
//! Backbone torsion analysis for protein structures: reads backbone atom
//! coordinates, computes the phi/psi dihedral pair of every interior residue,
//! and selects the pairs that belong on a given Ramachandran plot.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split from the bottom up:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomRecord`, `BackboneAtom`,
//!   `TorsionRecord`), pure vector geometry, and structure file readers.
//!
//! - **[`engine`]: The Pipeline Stages.** Backbone extraction, validated residue grouping,
//!   torsion calculation and residue filtering, together with the configuration, error
//!   taxonomy and progress reporting they share.
//!
//! - **[`workflows`]: The Public API.** Runs the complete pipeline for a single structure
//!   or a batch of structures and hands back plot-ready angle sets.

pub mod core;
pub mod engine;
pub mod workflows;
