use crate::cli::{AnglesArgs, TableFormat};
use crate::commands::analyse;
use crate::config::PartialRamaConfig;
use crate::error::{CliError, Result};
use rama::workflows::ramachandran::BatchResult;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use tracing::info;

#[derive(Serialize)]
struct AngleRow<'a> {
    source: &'a str,
    chain: Option<&'a str>,
    residue_number: Option<isize>,
    residue_name: &'a str,
    index: usize,
    phi: f64,
    psi: f64,
}

/// Writes one row per retained torsion pair, structure by structure.
fn write_table<W: Write>(writer: W, batch: &BatchResult, format: TableFormat) -> Result<usize> {
    let mut table = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_writer(writer);

    let mut rows = 0;
    for result in &batch.structures {
        for record in &result.analysis.torsions {
            table
                .serialize(AngleRow {
                    source: &result.name,
                    chain: record.chain_id.as_deref(),
                    residue_number: record.residue_seq,
                    residue_name: &record.residue_name,
                    index: record.residue_index,
                    phi: record.phi,
                    psi: record.psi,
                })
                .map_err(|e| CliError::Io(io::Error::from(e)))?;
            rows += 1;
        }
    }
    table.flush()?;
    Ok(rows)
}

pub async fn run(args: AnglesArgs) -> Result<()> {
    let file_config = PartialRamaConfig::load(args.analysis.config.as_deref())?;
    let analysis_config = file_config.analysis_config(&args.analysis)?;

    let batch = analyse(&args.analysis.sources, &analysis_config).await?;

    match &args.output {
        Some(path) => {
            info!("Writing angle table to {:?}", path);
            let rows = write_table(File::create(path)?, &batch, args.format)?;
            println!("✓ Wrote {} phi/psi pair(s) to: {}", rows, path.display());
        }
        None => {
            write_table(io::stdout().lock(), &batch, args.format)?;
        }
    }
    Ok(())
}
