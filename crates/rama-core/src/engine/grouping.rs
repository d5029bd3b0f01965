use super::config::ValidationPolicy;
use super::error::EngineError;
use crate::core::models::atom::{BackboneAtom, BackboneAtomName};
use crate::core::models::residue::BackboneResidue;
use tracing::{debug, trace, warn};

/// A residue dropped by the pipeline, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedResidue {
    pub residue: String,
    pub reason: String,
}

/// Residues grouped into runs that can be walked for torsions.
///
/// Within a segment every residue directly follows the previous one in the same chain;
/// segments are split at chain changes, at gaps in the residue numbering and around every
/// skipped residue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidueGrouping {
    pub segments: Vec<Vec<BackboneResidue>>,
    pub skipped: Vec<SkippedResidue>,
}

impl ResidueGrouping {
    pub fn residue_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

fn atom_label(atom: &BackboneAtom) -> String {
    let chain = atom.chain_id.as_deref().unwrap_or("-");
    match atom.residue_seq {
        Some(seq) => format!("{}:{}{}", chain, atom.residue_name, seq),
        None => format!("{}:{}", chain, atom.residue_name),
    }
}

fn residue_from_triple(window: &[BackboneAtom]) -> Result<BackboneResidue, String> {
    let expected = [BackboneAtomName::N, BackboneAtomName::CA, BackboneAtomName::C];
    for (atom, want) in window.iter().zip(expected) {
        if atom.atom_name != want {
            return Err(format!(
                "expected {} but found {} of residue {}",
                want,
                atom.atom_name,
                atom_label(atom)
            ));
        }
    }
    if window.len() < expected.len() {
        return Err(format!(
            "residue {} is truncated: only {} backbone atom(s) remain",
            atom_label(&window[0]),
            window.len()
        ));
    }

    let triple = &window[..3];
    if let Some(stray) = triple[1..]
        .iter()
        .find(|atom| !triple[0].shares_residue_with(atom))
    {
        return Err(format!(
            "{} of residue {} does not belong to residue {}",
            stray.atom_name,
            atom_label(stray),
            atom_label(&triple[0])
        ));
    }

    Ok(BackboneResidue {
        name: triple[1].residue_name.clone(),
        chain_id: triple[1].chain_id.clone(),
        residue_seq: triple[1].residue_seq,
        n: triple[0].position,
        ca: triple[1].position,
        c: triple[2].position,
    })
}

/// Whether `next` can extend a segment ending in `prev`.
///
/// Residues must share a chain, and known sequence numbers must either advance by one or
/// repeat (an insertion code, which is not parsed).
fn continues(prev: &BackboneResidue, next: &BackboneResidue) -> bool {
    if prev.chain_id != next.chain_id {
        return false;
    }
    match (prev.residue_seq, next.residue_seq) {
        (Some(prev_seq), Some(next_seq)) => next_seq == prev_seq || next_seq == prev_seq + 1,
        _ => true,
    }
}

fn flush(segments: &mut Vec<Vec<BackboneResidue>>, current: &mut Vec<BackboneResidue>) {
    if !current.is_empty() {
        segments.push(std::mem::take(current));
    }
}

/// Groups a flat backbone atom sequence into validated N, CA, C residues.
///
/// Each candidate triple must be exactly N, CA, C in that order and its atoms must agree
/// on chain, residue name and (when present) sequence number. A triple that breaks this
/// is handled according to `policy`: under [`ValidationPolicy::Skip`] it is recorded in
/// [`ResidueGrouping::skipped`] and grouping resumes at the next N atom; under
/// [`ValidationPolicy::Strict`] grouping stops.
///
/// # Errors
///
/// Returns [`EngineError::BrokenResidueAlignment`] for the first broken triple when the
/// policy is strict.
pub fn group_residues(
    atoms: &[BackboneAtom],
    policy: ValidationPolicy,
) -> Result<ResidueGrouping, EngineError> {
    let mut grouping = ResidueGrouping::default();
    let mut current: Vec<BackboneResidue> = Vec::new();
    let mut index = 0;

    while index < atoms.len() {
        match residue_from_triple(&atoms[index..]) {
            Ok(residue) => {
                if let Some(prev) = current.last().filter(|prev| !continues(prev, &residue)) {
                    debug!(
                        "Chain break between {} and {}; starting a new segment.",
                        prev.label(),
                        residue.label()
                    );
                    flush(&mut grouping.segments, &mut current);
                }
                trace!("Grouped residue {} at atom {}.", residue.label(), index);
                current.push(residue);
                index += 3;
            }
            Err(reason) => {
                if policy == ValidationPolicy::Strict {
                    return Err(EngineError::BrokenResidueAlignment {
                        atom_index: index,
                        reason,
                    });
                }
                warn!("Skipping residue at backbone atom {}: {}", index, reason);
                grouping.skipped.push(SkippedResidue {
                    residue: atom_label(&atoms[index]),
                    reason,
                });
                flush(&mut grouping.segments, &mut current);

                index += 1;
                while index < atoms.len() && atoms[index].atom_name != BackboneAtomName::N {
                    index += 1;
                }
            }
        }
    }
    flush(&mut grouping.segments, &mut current);

    Ok(grouping)
}
