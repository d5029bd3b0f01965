//! # Workflows Module
//!
//! High-level entry points that run the complete torsion pipeline.
//!
//! ## Overview
//!
//! A workflow takes the atom records of one or more structures plus an
//! [`AnalysisConfig`](crate::engine::config::AnalysisConfig), drives every engine stage in
//! order, and returns plot-ready angle sets together with the diagnostics gathered on the
//! way (skipped residues, failed structures).
//!
//! - **Ramachandran Workflow** ([`ramachandran`]) - phi/psi analysis of a single structure
//!   or of a batch of structures processed in parallel.

pub mod ramachandran;
