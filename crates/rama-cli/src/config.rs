pub mod defaults;

use crate::cli::{AnalysisArgs, PlotArgs, PlotStyle};
use crate::error::{CliError, Result};
use clap::ValueEnum;
use defaults::DefaultsConfig;
use rama::engine::config::{AnalysisConfig, AnalysisConfigBuilder, FilterRule, ValidationPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAnalysisConfig {
    filter: Option<String>,
    chain: Option<String>,
    strict_alignment: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialPlotConfig {
    style: Option<String>,
    blur: Option<f64>,
    width: Option<u32>,
    height: Option<u32>,
    title: Option<String>,
}

/// Settings read from a configuration file, before command-line overrides are applied.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialRamaConfig {
    analysis: Option<PartialAnalysisConfig>,
    plot: Option<PartialPlotConfig>,
}

/// Everything the renderer needs besides the angles themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub output: PathBuf,
    pub style: PlotStyle,
    pub blur: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
}

impl PartialRamaConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the configuration file when one is given, otherwise starts from defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn analysis_config(&self, args: &AnalysisArgs) -> Result<AnalysisConfig> {
        let defaults = DefaultsConfig::default();
        let file = self.analysis.clone().unwrap_or_default();

        let filter_name = args
            .filter
            .as_deref()
            .or(file.filter.as_deref())
            .unwrap_or(defaults.filter);
        let filter: FilterRule = filter_name.parse()?;

        let strict = args.strict
            || file
                .strict_alignment
                .unwrap_or(defaults.strict_alignment);
        let policy = if strict {
            ValidationPolicy::Strict
        } else {
            ValidationPolicy::Skip
        };

        let mut builder = AnalysisConfigBuilder::new().filter(filter).policy(policy);
        if let Some(chain) = args.chain.as_ref().or(file.chain.as_ref()) {
            builder = builder.chain_id(chain.as_str());
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn plot_settings(&self, args: &PlotArgs) -> Result<PlotSettings> {
        let defaults = DefaultsConfig::default();
        let file = self.plot.clone().unwrap_or_default();

        let style = match (args.style, file.style.as_deref()) {
            (Some(style), _) => style,
            (None, Some(name)) => PlotStyle::from_str(name, true).map_err(|_| {
                CliError::Config(format!(
                    "Unknown plot style '{}' in `plot.style`. Expected scatter, heatmap or contour.",
                    name
                ))
            })?,
            (None, None) => PlotStyle::default(),
        };

        let blur = match args.blur.or(file.blur) {
            Some(sigma) if !sigma.is_finite() || sigma < 0.0 => {
                return Err(CliError::Config(format!(
                    "Blur must be a non-negative number, got {}.",
                    sigma
                )));
            }
            Some(sigma) => Some(sigma),
            None if style == PlotStyle::Contour => Some(defaults.contour_blur),
            None => None,
        };

        let width = file.width.unwrap_or(defaults.width);
        let height = file.height.unwrap_or(defaults.height);
        if width == 0 || height == 0 {
            return Err(CliError::Config(
                "`plot.width` and `plot.height` must be greater than zero.".to_string(),
            ));
        }

        Ok(PlotSettings {
            output: args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(defaults.output)),
            style,
            blur,
            width,
            height,
            title: args.title.clone().or(file.title),
        })
    }
}
