//! # Core Module
//!
//! The stateless building blocks of the torsion pipeline.
//!
//! ## Architecture
//!
//! - **Vector Geometry** ([`geometry`]) - Vector arithmetic, bond angles and signed dihedrals
//! - **Molecular Representation** ([`models`]) - Atom records, backbone atoms, residues and torsions
//! - **File I/O** ([`io`]) - Reading atom records from structure files
//!
//! Nothing in this module holds state between calls; every function takes its inputs
//! explicitly and returns a freshly built value.

pub mod geometry;
pub mod io;
pub mod models;
