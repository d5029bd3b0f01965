use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for an ATOM record (must be at least 54 chars)")]
    LineTooShort,
}

const MIN_ATOM_LINE_LEN: usize = 54;

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_coordinate(line: &str, start: usize, end: usize) -> Result<f64, PdbParseErrorKind> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbParseErrorKind::InvalidFloat {
        columns: format!("{}-{}", start + 1, end),
        value: value.into(),
    })
}

fn parse_fixed_columns(line: &str) -> Result<AtomRecord, PdbParseErrorKind> {
    if line.len() < MIN_ATOM_LINE_LEN {
        return Err(PdbParseErrorKind::LineTooShort);
    }

    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(PdbParseErrorKind::MissingRequiredField {
            columns: "13-16".into(),
        });
    }
    let alt_loc = line.get(16..17).and_then(|s| s.chars().next());
    let residue_name = slice_and_trim(line, 17, 20);
    let chain_id = slice_and_trim(line, 21, 22);
    let residue_seq = slice_and_trim(line, 22, 26).parse::<isize>().ok();

    let x = parse_coordinate(line, 30, 38)?;
    let y = parse_coordinate(line, 38, 46)?;
    let z = parse_coordinate(line, 46, 54)?;

    let mut record = AtomRecord::new(name, residue_name, chain_id, Point3::new(x, y, z));
    record.residue_seq = residue_seq;
    if let Some(alt_loc) = alt_loc {
        record = record.with_alt_loc(alt_loc);
    }
    Ok(record)
}

fn parse_whitespace_fields(line: &str) -> Option<AtomRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 9 {
        return None;
    }
    let x = fields[6].parse().ok()?;
    let y = fields[7].parse().ok()?;
    let z = fields[8].parse().ok()?;

    let record = AtomRecord::new(fields[2], fields[3], fields[4], Point3::new(x, y, z));
    Some(match fields[5].parse::<isize>() {
        Ok(seq) => record.with_residue_seq(seq),
        Err(_) => record,
    })
}

/// Reader for the PDB coordinate format.
///
/// Only `ATOM` records of the first model are read; the record type is the first
/// whitespace-separated token of a line. Each record is parsed by its fixed columns; a line
/// whose columns do not line up is retried as whitespace-separated fields, which covers the
/// loosely formatted files some tools emit.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Vec<AtomRecord>, Self::Error> {
        let mut records = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match line.split_whitespace().next() {
                Some("ATOM") => {
                    let record = match parse_fixed_columns(&line) {
                        Ok(record) => record,
                        Err(kind) => parse_whitespace_fields(&line).ok_or(PdbError::Parse {
                            line: line_num,
                            kind,
                        })?,
                    };
                    records.push(record);
                }
                Some("ENDMDL" | "END") => break,
                _ => {}
            }
        }

        if records.is_empty() {
            return Err(PdbError::MissingRecord("ATOM records".into()));
        }
        Ok(records)
    }
}
