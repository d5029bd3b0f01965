use crate::cli::PlotArgs;
use crate::commands::analyse;
use crate::config::PartialRamaConfig;
use crate::error::{CliError, Result};
use crate::render;
use tracing::{info, warn};

pub async fn run(args: PlotArgs) -> Result<()> {
    let file_config = PartialRamaConfig::load(args.analysis.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let analysis_config = file_config.analysis_config(&args.analysis)?;
    let settings = file_config.plot_settings(&args)?;

    let batch = analyse(&args.analysis.sources, &analysis_config).await?;
    let (phis, psis) = batch.combined().angle_vectors();
    if phis.is_empty() {
        warn!("No torsion pairs passed the '{}' filter.", analysis_config.filter);
        println!("Warning: no residues matched; the plot will be empty.");
    }

    info!(
        "Rendering {} point(s) from {} structure(s) to {:?}",
        phis.len(),
        batch.structures.len(),
        &settings.output
    );
    tokio::task::block_in_place(|| render::render_svg(&settings.output, &phis, &psis, &settings))
        .map_err(|source| CliError::Render {
            path: settings.output.clone(),
            source,
        })?;

    println!(
        "✓ Plotted {} phi/psi pair(s) to: {}",
        phis.len(),
        settings.output.display()
    );
    Ok(())
}
