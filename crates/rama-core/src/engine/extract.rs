use crate::core::models::atom::{AtomRecord, BackboneAtom};
use std::collections::HashMap;
use tracing::debug;

/// Selects the N, CA and C atoms from a structure's atom records, keeping file order.
///
/// When `chain_id` is given, atoms of other chains are dropped. For each residue (chain and
/// sequence number) the first alternate location seen is its primary conformer; atoms of
/// any other alternate location are dropped so each residue contributes at most one
/// N/CA/C triple. Atoms without an alternate location are always kept. No grouping or
/// ordering checks happen here.
pub fn extract_backbone(records: &[AtomRecord], chain_id: Option<&str>) -> Vec<BackboneAtom> {
    let mut primary_alt_locs: HashMap<(&str, Option<isize>), char> = HashMap::new();
    let atoms: Vec<BackboneAtom> = records
        .iter()
        .filter(|record| chain_id.is_none_or(|id| record.chain_id == id))
        .filter(|&record| match record.alt_loc {
            None => true,
            Some(alt_loc) => {
                let key = (record.chain_id.as_str(), record.residue_seq);
                *primary_alt_locs.entry(key).or_insert(alt_loc) == alt_loc
            }
        })
        .filter_map(BackboneAtom::from_record)
        .collect();

    debug!(
        "Extracted {} backbone atoms from {} atom records (chain filter: {:?}).",
        atoms.len(),
        records.len(),
        chain_id
    );
    atoms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::BackboneAtomName;
    use nalgebra::Point3;

    fn record(name: &str, residue: &str, chain: &str) -> AtomRecord {
        AtomRecord::new(name, residue, chain, Point3::origin())
    }

    #[test]
    fn extract_backbone_keeps_only_n_ca_c_in_order() {
        let records = vec![
            record("N", "ALA", "A"),
            record("CA", "ALA", "A"),
            record("CB", "ALA", "A"),
            record("C", "ALA", "A"),
            record("O", "ALA", "A"),
            record("N", "GLY", "A"),
        ];
        let atoms = extract_backbone(&records, None);
        let names: Vec<BackboneAtomName> = atoms.iter().map(|a| a.atom_name).collect();
        assert_eq!(
            names,
            vec![
                BackboneAtomName::N,
                BackboneAtomName::CA,
                BackboneAtomName::C,
                BackboneAtomName::N
            ]
        );
        assert_eq!(atoms[3].residue_name, "GLY");
    }

    #[test]
    fn extract_backbone_applies_chain_filter() {
        let records = vec![
            record("N", "ALA", "A"),
            record("N", "SER", "B"),
            record("CA", "SER", "B"),
            record("CA", "ALA", "A"),
        ];
        let atoms = extract_backbone(&records, Some("B"));
        assert_eq!(atoms.len(), 2);
        assert!(atoms.iter().all(|a| a.chain_id.as_deref() == Some("B")));
    }

    #[test]
    fn extract_backbone_with_unknown_chain_is_empty() {
        let records = vec![record("N", "ALA", "A"), record("CA", "ALA", "A")];
        assert!(extract_backbone(&records, Some("Z")).is_empty());
    }

    #[test]
    fn extract_backbone_drops_secondary_alternate_locations() {
        let records = vec![
            record("N", "SER", "A").with_alt_loc('A'),
            record("N", "SER", "A").with_alt_loc('B'),
            record("CA", "SER", "A"),
        ];
        let atoms = extract_backbone(&records, None);
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].atom_name, BackboneAtomName::N);
        assert_eq!(atoms[1].atom_name, BackboneAtomName::CA);
    }

    #[test]
    fn extract_backbone_keeps_first_alternate_location_of_each_residue() {
        let records = vec![
            record("N", "SER", "A").with_residue_seq(1).with_alt_loc('1'),
            record("N", "SER", "A").with_residue_seq(1).with_alt_loc('2'),
            record("CA", "SER", "A").with_residue_seq(1).with_alt_loc('1'),
            record("CA", "SER", "A").with_residue_seq(1).with_alt_loc('2'),
            record("N", "THR", "A").with_residue_seq(2).with_alt_loc('B'),
            record("N", "THR", "A").with_residue_seq(2).with_alt_loc('C'),
        ];
        let atoms = extract_backbone(&records, None);
        let kept: Vec<(BackboneAtomName, &str)> = atoms
            .iter()
            .map(|a| (a.atom_name, a.residue_name.as_str()))
            .collect();
        assert_eq!(
            kept,
            vec![
                (BackboneAtomName::N, "SER"),
                (BackboneAtomName::CA, "SER"),
                (BackboneAtomName::N, "THR"),
            ]
        );
    }

    #[test]
    fn extract_backbone_of_empty_input_is_empty() {
        assert!(extract_backbone(&[], None).is_empty());
    }
}
