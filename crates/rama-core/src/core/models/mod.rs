//! # Core Models Module
//!
//! Value types passed between the stages of the torsion pipeline.
//!
//! ## Key Components
//!
//! - [`atom`] - Raw atom records from a structure file and the backbone atoms extracted from them
//! - [`residue`] - Validated N/CA/C triples and residue-name classification
//! - [`torsion`] - Per-residue phi/psi records and plot-ready collections of them
//!
//! Every model is created by one stage and consumed by the next; none of them are shared
//! or mutated once built.
//!
//! ```ignore
//! use rama::core::models::atom::AtomRecord;
//! use nalgebra::Point3;
//!
//! let record = AtomRecord::new("CA", "GLY", "A", Point3::new(1.0, 2.0, 3.0)).with_residue_seq(12);
//! assert!(record.backbone_name().is_some());
//! ```

pub mod atom;
pub mod residue;
pub mod torsion;
