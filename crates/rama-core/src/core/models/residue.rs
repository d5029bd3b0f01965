use nalgebra::Point3;

pub const GLYCINE: &str = "GLY";
pub const PROLINE: &str = "PRO";

/// Returns `true` if `residue_name` names the residue `code`, ignoring case and padding.
pub fn is_residue(residue_name: &str, code: &str) -> bool {
    residue_name.trim().eq_ignore_ascii_case(code)
}

/// A residue whose backbone has been validated as one N, CA, C triple in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct BackboneResidue {
    /// The three-letter residue code, taken from the CA atom.
    pub name: String,
    pub chain_id: Option<String>,
    pub residue_seq: Option<isize>,
    pub n: Point3<f64>,
    pub ca: Point3<f64>,
    pub c: Point3<f64>,
}

impl BackboneResidue {
    pub fn is_glycine(&self) -> bool {
        is_residue(&self.name, GLYCINE)
    }

    pub fn is_proline(&self) -> bool {
        is_residue(&self.name, PROLINE)
    }

    /// Human-readable label such as `A:GLY12`, used in diagnostics.
    pub fn label(&self) -> String {
        let chain = self.chain_id.as_deref().unwrap_or("-");
        match self.residue_seq {
            Some(seq) => format!("{}:{}{}", chain, self.name, seq),
            None => format!("{}:{}", chain, self.name),
        }
    }
}
