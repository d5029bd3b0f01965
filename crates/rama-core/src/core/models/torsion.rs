use serde::Serialize;

/// The phi/psi pair of one interior residue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TorsionRecord {
    /// Rotation about N-CA, in degrees in `(-180, 180]`.
    pub phi: f64,
    /// Rotation about CA-C, in degrees in `(-180, 180]`.
    pub psi: f64,
    pub residue_name: String,
    /// Position of this record in its torsion sequence, starting at 0.
    pub residue_index: usize,
    pub chain_id: Option<String>,
    pub residue_seq: Option<isize>,
}

/// An ordered collection of torsion records, ready for plotting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TorsionSet {
    records: Vec<TorsionRecord>,
}

impl TorsionSet {
    pub fn new(records: Vec<TorsionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TorsionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<TorsionRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TorsionRecord> {
        self.records.iter()
    }

    pub fn phis(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.phi).collect()
    }

    pub fn psis(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.psi).collect()
    }

    /// Splits the set into two parallel angle vectors, `(phis, psis)`, in record order.
    pub fn angle_vectors(&self) -> (Vec<f64>, Vec<f64>) {
        self.records.iter().map(|r| (r.phi, r.psi)).unzip()
    }

    /// Appends another set, keeping both orders.
    pub fn extend(&mut self, other: TorsionSet) {
        self.records.extend(other.records);
    }
}

impl<'a> IntoIterator for &'a TorsionSet {
    type Item = &'a TorsionRecord;
    type IntoIter = std::slice::Iter<'a, TorsionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<TorsionRecord> for TorsionSet {
    fn from_iter<I: IntoIterator<Item = TorsionRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
