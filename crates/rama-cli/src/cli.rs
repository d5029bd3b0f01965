use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The RAMA Developers",
    version,
    about = "RAMA CLI - Backbone phi/psi torsion analysis and Ramachandran plots for protein structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a Ramachandran plot combining every given structure into one SVG image.
    Plot(PlotArgs),
    /// Write the phi/psi angles of every retained residue as a CSV or TSV table.
    Angles(AnglesArgs),
}

/// Arguments shared by every command that runs the torsion analysis.
#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// PDB files or four-character PDB identifiers (e.g., 1UBQ) to analyse.
    #[arg(required = true, num_args = 1.., value_name = "PDB_FILE_OR_ID")]
    pub sources: Vec<String>,

    /// Which residues to keep: all, normal, gly, pro or pre-pro.
    #[arg(long, value_name = "RULE")]
    pub filter: Option<String>,

    /// Only analyse residues of this chain.
    #[arg(long, value_name = "ID")]
    pub chain: Option<String>,

    /// Fail on broken backbones instead of skipping the affected residues.
    #[arg(long)]
    pub strict: bool,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlotStyle {
    /// One dot per phi/psi pair.
    #[default]
    Scatter,
    /// Log-scaled two-dimensional histogram.
    Heatmap,
    /// Smoothed histogram drawn as filled contour bands.
    Contour,
}

/// Arguments for the `plot` subcommand.
#[derive(Args, Debug)]
pub struct PlotArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Path for the output SVG image.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// How the points are rendered.
    #[arg(long = "plot", value_enum, value_name = "STYLE")]
    pub style: Option<PlotStyle>,

    /// Gaussian smoothing applied to heatmap and contour plots, in histogram bins.
    #[arg(long, value_name = "SIGMA")]
    pub blur: Option<f64>,

    /// Caption drawn above the plot.
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableFormat {
    #[default]
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn delimiter(self) -> u8 {
        match self {
            TableFormat::Csv => b',',
            TableFormat::Tsv => b'\t',
        }
    }
}

/// Arguments for the `angles` subcommand.
#[derive(Args, Debug)]
pub struct AnglesArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Path for the output table. Writes to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Column separator of the output table.
    #[arg(long, value_enum, default_value_t = TableFormat::Csv)]
    pub format: TableFormat,
}
