pub mod angles;
pub mod plot;

use crate::error::Result;
use crate::source;
use crate::utils::progress::CliProgressHandler;
use rama::engine::config::AnalysisConfig;
use rama::engine::progress::ProgressReporter;
use rama::workflows::ramachandran::{self, BatchResult};
use tracing::{info, warn};

/// Loads every source and runs the batch analysis on them.
///
/// Individual structures may fail without aborting the command, but a batch in which
/// nothing could be analysed reports the first failure as the command's error.
pub async fn analyse(sources: &[String], config: &AnalysisConfig) -> Result<BatchResult> {
    info!("Loading {} structure(s)...", sources.len());
    let inputs = source::load_all(sources).await?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the Ramachandran workflow...");
    let batch =
        tokio::task::block_in_place(|| ramachandran::run_batch(&inputs, config, &reporter));

    for result in &batch.structures {
        let analysis = &result.analysis;
        if !analysis.skipped.is_empty() {
            warn!(
                "{}: skipped {} residue(s) with incomplete or degenerate backbone.",
                result.name,
                analysis.skipped.len()
            );
        }
        info!(
            "{}: {} residue(s), {} of {} torsion pair(s) retained.",
            result.name,
            analysis.residues,
            analysis.torsions.len(),
            analysis.total_torsions
        );
    }

    if batch.structures.is_empty() && !batch.failures.is_empty() {
        let BatchResult { mut failures, .. } = batch;
        return Err(failures.remove(0).error.into());
    }
    for failure in &batch.failures {
        eprintln!("Warning: skipped '{}': {}", failure.name, failure.error);
    }

    Ok(batch)
}
