//! Provides input functionality for molecular structure files.
//!
//! Readers turn a structure file into the ordered stream of [`AtomRecord`]s the pipeline
//! consumes. They extract names, chain identifiers, sequence numbers and coordinates and
//! nothing more; everything else in the file is ignored.
//!
//! [`AtomRecord`]: crate::core::models::atom::AtomRecord

pub mod pdb;
pub mod traits;
