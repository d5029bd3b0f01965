use super::config::FilterRule;
use super::error::EngineError;
use crate::core::models::residue::{GLYCINE, PROLINE, is_residue};
use crate::core::models::torsion::{TorsionRecord, TorsionSet};

/// Decides whether the record at `index` passes `rule`.
///
/// Pre-proline membership looks at the next record in `records`, so the final record
/// is never pre-proline.
pub fn is_retained(rule: FilterRule, records: &[TorsionRecord], index: usize) -> bool {
    let name = &records[index].residue_name;
    match rule {
        FilterRule::All => true,
        FilterRule::Normal => !is_residue(name, GLYCINE) && !is_residue(name, PROLINE),
        FilterRule::Gly => is_residue(name, GLYCINE),
        FilterRule::Pro => is_residue(name, PROLINE),
        FilterRule::PrePro => records
            .get(index + 1)
            .is_some_and(|next| is_residue(&next.residue_name, PROLINE)),
    }
}

/// Keeps the records that pass `rule`, in their original order.
///
/// Retained records keep their original `residue_index`, so they can still be matched
/// back to the unfiltered sequence.
pub fn filter_torsions(records: &[TorsionRecord], rule: FilterRule) -> TorsionSet {
    (0..records.len())
        .filter(|&index| is_retained(rule, records, index))
        .map(|index| records[index].clone())
        .collect()
}

/// Filters with a rule given by name, as it arrives from user input.
///
/// # Errors
///
/// Returns [`EngineError::InvalidArgument`] if `rule` names no known filter.
pub fn filter_torsions_by_name(
    records: &[TorsionRecord],
    rule: &str,
) -> Result<TorsionSet, EngineError> {
    let rule: FilterRule = rule.parse()?;
    Ok(filter_torsions(records, rule))
}
