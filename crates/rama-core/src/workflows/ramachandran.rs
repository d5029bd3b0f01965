use crate::core::models::atom::AtomRecord;
use crate::core::models::torsion::TorsionSet;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::EngineError;
use crate::engine::extract::extract_backbone;
use crate::engine::filter::filter_torsions;
use crate::engine::grouping::{SkippedResidue, group_residues};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::torsion::calculate_torsions;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

/// The result of analysing one structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Records that passed the configured filter, in sequence order.
    pub torsions: TorsionSet,
    /// Number of torsion records before filtering.
    pub total_torsions: usize,
    /// Number of residues that formed a valid N/CA/C triple.
    pub residues: usize,
    /// Residues dropped because of broken triples or degenerate geometry.
    pub skipped: Vec<SkippedResidue>,
}

/// A named structure waiting to be analysed as part of a batch.
#[derive(Debug, Clone)]
pub struct StructureInput {
    pub name: String,
    pub records: Vec<AtomRecord>,
}

impl StructureInput {
    pub fn new(name: impl Into<String>, records: Vec<AtomRecord>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructureResult {
    pub name: String,
    pub analysis: Analysis,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub name: String,
    pub error: EngineError,
}

#[derive(Debug, Default)]
pub struct BatchResult {
    /// Successfully analysed structures, in input order.
    pub structures: Vec<StructureResult>,
    /// Structures whose analysis failed, in input order.
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    /// All retained torsion records of the batch, appended structure by structure.
    pub fn combined(&self) -> TorsionSet {
        let mut combined = TorsionSet::default();
        for result in &self.structures {
            combined.extend(result.analysis.torsions.clone());
        }
        combined
    }

    pub fn total_retained(&self) -> usize {
        self.structures
            .iter()
            .map(|r| r.analysis.torsions.len())
            .sum()
    }
}

/// Runs extraction, grouping, torsion calculation and filtering for one structure.
///
/// # Arguments
///
/// * `records` - The structure's atom records, in file order.
/// * `config` - Filter rule, chain restriction and validation policy.
/// * `reporter` - Receives a [`Progress::ResidueSkipped`] event for every dropped residue.
///
/// # Errors
///
/// Only fails under [`ValidationPolicy::Strict`](crate::engine::config::ValidationPolicy::Strict),
/// with the first broken residue triple or degenerate torsion found. Structures too short
/// to have an interior residue succeed with an empty torsion set.
#[instrument(skip_all, name = "ramachandran_workflow")]
pub fn run(
    records: &[AtomRecord],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<Analysis, EngineError> {
    let atoms = extract_backbone(records, config.chain_id.as_deref());
    let grouping = group_residues(&atoms, config.policy)?;
    let residues = grouping.residue_count();
    let outcome = calculate_torsions(&grouping.segments, config.policy)?;

    let mut skipped = grouping.skipped;
    skipped.extend(outcome.skipped);
    for residue in &skipped {
        reporter.report(Progress::ResidueSkipped {
            residue: residue.residue.clone(),
            reason: residue.reason.clone(),
        });
    }

    let total_torsions = outcome.records.len();
    let torsions = filter_torsions(&outcome.records, config.filter);
    debug!(
        "Filter '{}' kept {} of {} torsion pairs.",
        config.filter,
        torsions.len(),
        total_torsions
    );

    Ok(Analysis {
        torsions,
        total_torsions,
        residues,
        skipped,
    })
}

/// Analyses every structure independently and in parallel.
///
/// Results keep the order of `inputs`. A structure that fails is recorded in
/// [`BatchResult::failures`] without affecting the others.
#[instrument(skip_all, name = "ramachandran_batch", fields(structures = inputs.len()))]
pub fn run_batch(
    inputs: &[StructureInput],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> BatchResult {
    info!(
        "Analysing {} structure(s) with filter '{}'.",
        inputs.len(),
        config.filter
    );
    reporter.report(Progress::BatchStart {
        total: inputs.len() as u64,
    });

    let outcomes: Vec<(String, Result<Analysis, EngineError>)> = inputs
        .par_iter()
        .map(|input| {
            let outcome = run(&input.records, config, reporter);
            match &outcome {
                Ok(analysis) => reporter.report(Progress::StructureDone {
                    name: input.name.clone(),
                    torsions: analysis.torsions.len(),
                }),
                Err(e) => reporter.report(Progress::StructureFailed {
                    name: input.name.clone(),
                    reason: e.to_string(),
                }),
            }
            (input.name.clone(), outcome)
        })
        .collect();

    let mut result = BatchResult::default();
    for (name, outcome) in outcomes {
        match outcome {
            Ok(analysis) => result.structures.push(StructureResult { name, analysis }),
            Err(error) => {
                warn!("Structure '{}' failed: {}", name, error);
                result.failures.push(BatchFailure { name, error });
            }
        }
    }

    reporter.report(Progress::BatchFinish);
    info!(
        "Batch finished: {} structure(s) analysed, {} failed, {} torsion pair(s) retained.",
        result.structures.len(),
        result.failures.len(),
        result.total_retained()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::pdb::PdbFile;
    use crate::core::io::traits::StructureFile;
    use crate::engine::config::{AnalysisConfigBuilder, FilterRule, ValidationPolicy};
    use nalgebra::Point3;
    use std::sync::Mutex;

    const TOLERANCE: f64 = 1e-6;

    const BACKBONE: [[f64; 3]; 15] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 1.0, 1.0],
        [2.0, 1.0, 1.0],
        [2.0, 1.0, 2.0],
        [2.0, 2.0, 2.0],
        [2.0, 2.0, 3.0],
        [3.0, 2.0, 3.0],
        [3.0, 1.0, 3.0],
        [3.0, 1.0, 4.0],
        [4.0, 1.0, 4.0],
        [4.0, 1.0, 5.0],
        [4.0, 2.0, 5.0],
        [5.0, 2.0, 5.0],
    ];

    fn pdb_line(
        serial: usize,
        name: &str,
        residue: &str,
        chain: &str,
        seq: isize,
        xyz: [f64; 3],
    ) -> String {
        format!(
            "ATOM  {:>5} {:<4} {:>3} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00",
            serial,
            format!(" {}", name),
            residue,
            chain,
            seq,
            xyz[0],
            xyz[1],
            xyz[2]
        )
    }

    /// Five residues with O and CB side atoms interleaved, as a structure file would have.
    fn synthetic_pdb(chain: &str, names: [&str; 5]) -> String {
        let mut lines = Vec::new();
        let mut serial = 1;
        for (residue_idx, name) in names.iter().enumerate() {
            let seq = residue_idx as isize + 1;
            for (atom_idx, atom) in ["N", "CA", "C"].iter().enumerate() {
                let xyz = BACKBONE[residue_idx * 3 + atom_idx];
                lines.push(pdb_line(serial, atom, name, chain, seq, xyz));
                serial += 1;
            }
            lines.push(pdb_line(serial, "O", name, chain, seq, [9.0, 9.0, 9.0]));
            serial += 1;
            lines.push(pdb_line(serial, "CB", name, chain, seq, [8.0, 8.0, 8.0]));
            serial += 1;
        }
        lines.join("\n")
    }

    fn config(filter: FilterRule) -> AnalysisConfig {
        AnalysisConfigBuilder::new().filter(filter).build().unwrap()
    }

    #[test]
    fn run_on_synthetic_structure_yields_reference_angles() {
        let records =
            PdbFile::read_from_str(&synthetic_pdb("A", ["MET", "GLY", "PRO", "ALA", "LYS"]))
                .unwrap();
        let analysis = run(&records, &config(FilterRule::All), &ProgressReporter::new()).unwrap();

        assert_eq!(analysis.residues, 5);
        assert_eq!(analysis.total_torsions, 3);
        assert!(analysis.skipped.is_empty());

        let (phis, psis) = analysis.torsions.angle_vectors();
        let expected = [(180.0, -90.0), (90.0, -90.0), (-90.0, 180.0)];
        for ((phi, psi), (want_phi, want_psi)) in phis.iter().zip(&psis).zip(expected) {
            assert!((phi - want_phi).abs() < TOLERANCE);
            assert!((psi - want_psi).abs() < TOLERANCE);
        }
        let seqs: Vec<Option<isize>> = analysis.torsions.iter().map(|r| r.residue_seq).collect();
        assert_eq!(seqs, vec![Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn run_applies_filter_rule() {
        let records =
            PdbFile::read_from_str(&synthetic_pdb("A", ["MET", "GLY", "PRO", "ALA", "LYS"]))
                .unwrap();
        let reporter = ProgressReporter::new();

        let normal = run(&records, &config(FilterRule::Normal), &reporter).unwrap();
        let names: Vec<&str> = normal
            .torsions
            .iter()
            .map(|r| r.residue_name.as_str())
            .collect();
        assert_eq!(names, vec!["ALA"]);
        assert_eq!(normal.total_torsions, 3);

        let pre_pro = run(&records, &config(FilterRule::PrePro), &reporter).unwrap();
        assert_eq!(pre_pro.torsions.len(), 1);
        assert_eq!(pre_pro.torsions.records()[0].residue_name, "GLY");
    }

    #[test]
    fn run_restricts_to_requested_chain() {
        let mut content = synthetic_pdb("A", ["MET", "GLY", "PRO", "ALA", "LYS"]);
        content.push('\n');
        content.push_str(&synthetic_pdb("B", ["SER", "SER", "SER", "SER", "SER"]));
        let records = PdbFile::read_from_str(&content).unwrap();

        let both = run(&records, &config(FilterRule::All), &ProgressReporter::new()).unwrap();
        assert_eq!(both.torsions.len(), 6);

        let chain_b = AnalysisConfigBuilder::new()
            .filter(FilterRule::All)
            .chain_id("B")
            .build()
            .unwrap();
        let only_b = run(&records, &chain_b, &ProgressReporter::new()).unwrap();
        assert_eq!(only_b.torsions.len(), 3);
        assert!(only_b.torsions.iter().all(|r| r.residue_name == "SER"));
    }

    #[test]
    fn run_on_short_structure_is_empty_not_error() {
        let records: Vec<AtomRecord> = BACKBONE[..6]
            .iter()
            .zip(["N", "CA", "C", "N", "CA", "C"])
            .map(|(xyz, name)| AtomRecord::new(name, "ALA", "A", Point3::from(*xyz)))
            .collect();
        let analysis = run(&records, &config(FilterRule::All), &ProgressReporter::new()).unwrap();
        assert!(analysis.torsions.is_empty());
        assert_eq!(analysis.residues, 2);
    }

    #[test]
    fn run_reports_skipped_residues() {
        let mut records =
            PdbFile::read_from_str(&synthetic_pdb("A", ["MET", "GLY", "PRO", "ALA", "LYS"]))
                .unwrap();
        records.retain(|r| !(r.residue_seq == Some(5) && r.name == "C"));

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let analysis = run(&records, &config(FilterRule::All), &reporter).unwrap();
        drop(reporter);

        assert_eq!(analysis.skipped.len(), 1);
        assert_eq!(analysis.torsions.len(), 2);
        let events = events.into_inner().unwrap();
        assert!(matches!(
            &events[..],
            [Progress::ResidueSkipped { residue, .. }] if residue == "A:LYS5"
        ));
    }

    #[test]
    fn run_with_strict_policy_rejects_broken_backbone() {
        let mut records =
            PdbFile::read_from_str(&synthetic_pdb("A", ["MET", "GLY", "PRO", "ALA", "LYS"]))
                .unwrap();
        records.retain(|r| !(r.residue_seq == Some(2) && r.name == "CA"));
        let strict = AnalysisConfigBuilder::new()
            .filter(FilterRule::All)
            .policy(ValidationPolicy::Strict)
            .build()
            .unwrap();

        let err = run(&records, &strict, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::BrokenResidueAlignment { .. }));
    }

    #[test]
    fn run_batch_keeps_input_order_and_isolates_failures() {
        let good =
            PdbFile::read_from_str(&synthetic_pdb("A", ["MET", "GLY", "PRO", "ALA", "LYS"]))
                .unwrap();
        let mut broken = good.clone();
        broken.retain(|r| !(r.residue_seq == Some(3) && r.name == "N"));

        let inputs = vec![
            StructureInput::new("first", good.clone()),
            StructureInput::new("broken", broken),
            StructureInput::new("second", good),
        ];
        let strict = AnalysisConfigBuilder::new()
            .filter(FilterRule::All)
            .policy(ValidationPolicy::Strict)
            .build()
            .unwrap();

        let result = run_batch(&inputs, &strict, &ProgressReporter::new());
        let names: Vec<&str> = result.structures.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].name, "broken");
        assert_eq!(result.total_retained(), 6);
        assert_eq!(result.combined().len(), 6);
    }

    #[test]
    fn run_batch_reports_every_structure() {
        let good =
            PdbFile::read_from_str(&synthetic_pdb("A", ["MET", "GLY", "PRO", "ALA", "LYS"]))
                .unwrap();
        let inputs = vec![
            StructureInput::new("a", good.clone()),
            StructureInput::new("b", good),
        ];

        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let result = run_batch(&inputs, &config(FilterRule::All), &reporter);
        drop(reporter);

        assert!(result.failures.is_empty());
        let events = events.into_inner().unwrap();
        assert_eq!(events.first(), Some(&Progress::BatchStart { total: 2 }));
        assert_eq!(events.last(), Some(&Progress::BatchFinish));
        let done = events
            .iter()
            .filter(|e| matches!(e, Progress::StructureDone { torsions: 3, .. }))
            .count();
        assert_eq!(done, 2);
    }

    #[test]
    fn run_batch_on_empty_input_is_empty() {
        let result = run_batch(&[], &config(FilterRule::All), &ProgressReporter::new());
        assert!(result.structures.is_empty());
        assert!(result.failures.is_empty());
        assert!(result.combined().is_empty());
    }
}
