//! Python bindings for the RAMA backbone torsion library.
//!
//! Exposes the torsion function and the full phi/psi workflow as `rama_py`.

mod error;

use error::IntoPyResult;
use nalgebra::Point3;
use pyo3::prelude::*;
use rama::core::geometry;
use rama::core::io::{pdb::PdbFile, traits::StructureFile};
use rama::core::models::atom::AtomRecord;
use rama::core::models::torsion::TorsionRecord;
use rama::engine::config::{AnalysisConfigBuilder, FilterRule, ValidationPolicy};
use rama::engine::progress::ProgressReporter;
use rama::workflows::ramachandran;
use std::path::PathBuf;

/// The phi/psi pair of one residue.
#[pyclass(frozen, get_all)]
pub struct Torsion {
    pub phi: f64,
    pub psi: f64,
    pub residue_name: String,
    pub residue_index: usize,
    pub chain_id: Option<String>,
    pub residue_seq: Option<isize>,
}

#[pymethods]
impl Torsion {
    fn __repr__(&self) -> String {
        format!(
            "Torsion('{}', index={}, phi={:.2}, psi={:.2})",
            self.residue_name, self.residue_index, self.phi, self.psi
        )
    }
}

impl From<TorsionRecord> for Torsion {
    fn from(record: TorsionRecord) -> Self {
        Self {
            phi: record.phi,
            psi: record.psi,
            residue_name: record.residue_name,
            residue_index: record.residue_index,
            chain_id: record.chain_id,
            residue_seq: record.residue_seq,
        }
    }
}

fn analyse(
    records: &[AtomRecord],
    filter: &str,
    chain: Option<String>,
    strict: bool,
) -> PyResult<Vec<Torsion>> {
    let filter = filter.parse::<FilterRule>().into_pyresult()?;
    let policy = if strict {
        ValidationPolicy::Strict
    } else {
        ValidationPolicy::Skip
    };
    let mut builder = AnalysisConfigBuilder::new().filter(filter).policy(policy);
    if let Some(chain) = chain {
        builder = builder.chain_id(chain);
    }
    let config = builder.build().into_pyresult()?;

    let analysis = ramachandran::run(records, &config, &ProgressReporter::new()).into_pyresult()?;
    Ok(analysis
        .torsions
        .into_records()
        .into_iter()
        .map(Torsion::from)
        .collect())
}

/// Torsion angle in degrees defined by four points, in (-180, 180].
#[pyfunction]
fn torsion(p1: [f64; 3], p2: [f64; 3], p3: [f64; 3], p4: [f64; 3]) -> PyResult<f64> {
    geometry::torsion(
        &Point3::from(p1),
        &Point3::from(p2),
        &Point3::from(p3),
        &Point3::from(p4),
    )
    .into_pyresult()
}

/// Phi/psi pairs of every retained residue in PDB-format text.
#[pyfunction]
#[pyo3(signature = (content, filter = "all", chain = None, strict = false))]
fn torsions_from_pdb(
    content: &str,
    filter: &str,
    chain: Option<String>,
    strict: bool,
) -> PyResult<Vec<Torsion>> {
    let records = PdbFile::read_from_str(content).into_pyresult()?;
    analyse(&records, filter, chain, strict)
}

/// Phi/psi pairs of every retained residue in a PDB file.
#[pyfunction]
#[pyo3(signature = (path, filter = "all", chain = None, strict = false))]
fn torsions_from_file(
    path: PathBuf,
    filter: &str,
    chain: Option<String>,
    strict: bool,
) -> PyResult<Vec<Torsion>> {
    let records = PdbFile::read_from_path(&path).into_pyresult()?;
    analyse(&records, filter, chain, strict)
}

#[pymodule]
fn rama_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Torsion>()?;
    m.add_function(wrap_pyfunction!(torsion, m)?)?;
    m.add_function(wrap_pyfunction!(torsions_from_pdb, m)?)?;
    m.add_function(wrap_pyfunction!(torsions_from_file, m)?)?;
    Ok(())
}
