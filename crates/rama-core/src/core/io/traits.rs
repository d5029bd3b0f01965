use crate::core::models::atom::AtomRecord;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading atom records from a structure file format.
///
/// Implementors only have to provide [`read_from`](StructureFile::read_from); reading
/// from a path or an in-memory string is derived from it.
pub trait StructureFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads every atom record from a buffered reader, in file order.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Vec<AtomRecord>, Self::Error>;

    /// Reads every atom record from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<AtomRecord>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Reads every atom record from file content already held in memory, such as a
    /// structure downloaded over the network.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails.
    fn read_from_str(content: &str) -> Result<Vec<AtomRecord>, Self::Error> {
        let mut bytes = content.as_bytes();
        Self::read_from(&mut bytes)
    }
}
