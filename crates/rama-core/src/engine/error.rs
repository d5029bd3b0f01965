use super::config::ConfigError;
use crate::core::geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Broken residue alignment at backbone atom {atom_index}: {reason}")]
    BrokenResidueAlignment { atom_index: usize, reason: String },

    #[error("Malformed geometry at residue {residue}: {source}")]
    MalformedGeometry {
        residue: String,
        #[source]
        source: GeometryError,
    },
}
