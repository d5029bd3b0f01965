use nalgebra::Point3;
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;

/// Identifies one of the three main-chain atoms used for phi/psi torsions.
///
/// The carbonyl oxygen and any hydrogens are deliberately absent: they never take part
/// in a backbone dihedral, so an atom that maps to none of these variants is simply
/// not a backbone atom for the purposes of this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackboneAtomName {
    /// Amide nitrogen.
    N,
    /// Alpha carbon.
    CA,
    /// Carbonyl carbon.
    C,
}

static BACKBONE_ATOM_NAMES: Map<&'static str, BackboneAtomName> = phf_map! {
    "N" => BackboneAtomName::N,
    "CA" => BackboneAtomName::CA,
    "C" => BackboneAtomName::C,
};

impl BackboneAtomName {
    /// Looks up a structure-file atom name, ignoring surrounding whitespace.
    ///
    /// Atom names are matched exactly (`"CA"` is an alpha carbon, `"Ca"` or `"CA1"` are not),
    /// since PDB atom names are case-significant for elements such as calcium.
    pub fn from_atom_name(name: &str) -> Option<Self> {
        BACKBONE_ATOM_NAMES.get(name.trim()).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackboneAtomName::N => "N",
            BackboneAtomName::CA => "CA",
            BackboneAtomName::C => "C",
        }
    }

    /// The atom expected to follow this one inside a residue triple, if any.
    pub fn next_in_residue(&self) -> Option<Self> {
        match self {
            BackboneAtomName::N => Some(BackboneAtomName::CA),
            BackboneAtomName::CA => Some(BackboneAtomName::C),
            BackboneAtomName::C => None,
        }
    }
}

impl fmt::Display for BackboneAtomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackboneAtomName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_atom_name(s).ok_or(())
    }
}

/// One atom as read from a structure file, before any backbone selection.
///
/// This is the boundary type between file readers and the pipeline: readers produce
/// it, the backbone extractor consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// The atom name (e.g., "CA", "N", "OG1").
    pub name: String,
    /// The three-letter residue code (e.g., "GLY").
    pub residue_name: String,
    /// The chain identifier; empty when the file leaves it blank.
    pub chain_id: String,
    /// The residue sequence number, when the source provides one.
    pub residue_seq: Option<isize>,
    /// The alternate location indicator, when present.
    pub alt_loc: Option<char>,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl AtomRecord {
    pub fn new(name: &str, residue_name: &str, chain_id: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.trim().to_string(),
            residue_name: residue_name.trim().to_ascii_uppercase(),
            chain_id: chain_id.trim().to_string(),
            residue_seq: None,
            alt_loc: None,
            position,
        }
    }

    pub fn with_residue_seq(mut self, residue_seq: isize) -> Self {
        self.residue_seq = Some(residue_seq);
        self
    }

    pub fn with_alt_loc(mut self, alt_loc: char) -> Self {
        self.alt_loc = Some(alt_loc).filter(|c| !c.is_whitespace());
        self
    }

    pub fn backbone_name(&self) -> Option<BackboneAtomName> {
        BackboneAtomName::from_atom_name(&self.name)
    }
}

/// A main-chain atom selected for torsion calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneAtom {
    pub position: Point3<f64>,
    pub atom_name: BackboneAtomName,
    pub residue_name: String,
    pub chain_id: Option<String>,
    pub residue_seq: Option<isize>,
}

impl BackboneAtom {
    pub fn new(atom_name: BackboneAtomName, residue_name: &str, position: Point3<f64>) -> Self {
        Self {
            position,
            atom_name,
            residue_name: residue_name.to_string(),
            chain_id: None,
            residue_seq: None,
        }
    }

    /// Builds a backbone atom from a file record, or `None` if the record is not N, CA or C.
    pub fn from_record(record: &AtomRecord) -> Option<Self> {
        let atom_name = record.backbone_name()?;
        Some(Self {
            position: record.position,
            atom_name,
            residue_name: record.residue_name.clone(),
            chain_id: Some(record.chain_id.clone()).filter(|id| !id.is_empty()),
            residue_seq: record.residue_seq,
        })
    }

    /// Whether `other` can belong to the same residue as `self`.
    ///
    /// Sequence numbers are only compared when both atoms carry one.
    pub fn shares_residue_with(&self, other: &BackboneAtom) -> bool {
        let same_seq = match (self.residue_seq, other.residue_seq) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        same_seq && self.chain_id == other.chain_id && self.residue_name == other.residue_name
    }
}
