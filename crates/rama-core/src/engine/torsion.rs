use super::config::ValidationPolicy;
use super::error::EngineError;
use super::grouping::SkippedResidue;
use crate::core::geometry::{self, GeometryError};
use crate::core::models::atom::BackboneAtom;
use crate::core::models::residue::BackboneResidue;
use crate::core::models::torsion::TorsionRecord;
use tracing::{debug, warn};

/// Torsion records of a structure plus the residues that could not be measured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TorsionOutcome {
    pub records: Vec<TorsionRecord>,
    pub skipped: Vec<SkippedResidue>,
}

/// Computes `(phi, psi)` for `residue` from its neighbours' C and N atoms.
///
/// phi is the dihedral C(i-1), N, CA, C and psi is N, CA, C, N(i+1).
pub fn residue_torsions(
    previous: &BackboneResidue,
    residue: &BackboneResidue,
    next: &BackboneResidue,
) -> Result<(f64, f64), GeometryError> {
    let phi = geometry::torsion(&previous.c, &residue.n, &residue.ca, &residue.c)?;
    let psi = geometry::torsion(&residue.n, &residue.ca, &residue.c, &next.n)?;
    Ok((phi, psi))
}

fn segment_torsions(
    segment: &[BackboneResidue],
    policy: ValidationPolicy,
    outcome: &mut TorsionOutcome,
) -> Result<(), EngineError> {
    for window in segment.windows(3) {
        let (previous, residue, next) = (&window[0], &window[1], &window[2]);

        match residue_torsions(previous, residue, next) {
            Ok((phi, psi)) => outcome.records.push(TorsionRecord {
                phi,
                psi,
                residue_name: residue.name.clone(),
                residue_index: outcome.records.len(),
                chain_id: residue.chain_id.clone(),
                residue_seq: residue.residue_seq,
            }),
            Err(source) if policy == ValidationPolicy::Strict => {
                return Err(EngineError::MalformedGeometry {
                    residue: residue.label(),
                    source,
                });
            }
            Err(source) => {
                warn!("Skipping residue {}: {}", residue.label(), source);
                outcome.skipped.push(SkippedResidue {
                    residue: residue.label(),
                    reason: source.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Computes one torsion record per interior residue of every segment.
///
/// The first and last residue of each segment lack a neighbour and get no record, so a
/// segment of fewer than three residues contributes nothing. `residue_index` numbers the
/// emitted records contiguously from 0 across all segments.
///
/// # Errors
///
/// Under [`ValidationPolicy::Strict`], returns [`EngineError::MalformedGeometry`] for the
/// first residue whose torsions cannot be computed. Under the skip policy such residues
/// are listed in [`TorsionOutcome::skipped`] instead.
pub fn calculate_torsions(
    segments: &[Vec<BackboneResidue>],
    policy: ValidationPolicy,
) -> Result<TorsionOutcome, EngineError> {
    let mut outcome = TorsionOutcome::default();
    for segment in segments {
        segment_torsions(segment, policy, &mut outcome)?;
    }
    debug!(
        "Computed {} torsion pairs from {} segment(s); {} residue(s) skipped.",
        outcome.records.len(),
        segments.len(),
        outcome.skipped.len()
    );
    Ok(outcome)
}

/// Computes torsions from a flat atom sequence taken to be consecutive N, CA, C triples.
///
/// The triples are not checked; use [`group_residues`](super::grouping::group_residues)
/// followed by [`calculate_torsions`] for input that may be incomplete. Trailing atoms
/// that do not fill a triple are ignored, and fewer than three residues give an empty
/// result.
pub fn torsions_from_atoms(
    atoms: &[BackboneAtom],
    policy: ValidationPolicy,
) -> Result<TorsionOutcome, EngineError> {
    let residues: Vec<BackboneResidue> = atoms
        .chunks_exact(3)
        .map(|triple| BackboneResidue {
            name: triple[1].residue_name.clone(),
            chain_id: triple[1].chain_id.clone(),
            residue_seq: triple[1].residue_seq,
            n: triple[0].position,
            ca: triple[1].position,
            c: triple[2].position,
        })
        .collect();
    calculate_torsions(std::slice::from_ref(&residues), policy)
}
