use crate::error::{CliError, Result};
use rama::core::io::{pdb::PdbFile, traits::StructureFile};
use rama::workflows::ramachandran::StructureInput;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const RCSB_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";
const PDB_ID_LEN: usize = 4;

/// Where the atom records of one command-line argument come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureSource {
    File(PathBuf),
    Remote { id: String },
}

fn is_pdb_id(arg: &str) -> bool {
    arg.len() == PDB_ID_LEN && arg.chars().all(|c| c.is_ascii_alphanumeric())
}

impl StructureSource {
    /// Existing files win over identifiers, so a local file named `1ubq` is read from disk.
    pub fn resolve(arg: &str) -> Result<Self> {
        let path = Path::new(arg);
        if path.is_file() {
            return Ok(Self::File(path.to_path_buf()));
        }
        if is_pdb_id(arg) {
            return Ok(Self::Remote {
                id: arg.to_ascii_uppercase(),
            });
        }
        Err(CliError::Argument(format!(
            "'{}' is neither an existing file nor a four-character PDB identifier.",
            arg
        )))
    }

    /// Short label used in logs, progress output and the `source` column of tables.
    pub fn name(&self) -> String {
        match self {
            Self::File(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Remote { id } => id.clone(),
        }
    }

    pub fn download_url(id: &str) -> String {
        format!("{}/{}.pdb", RCSB_DOWNLOAD_URL, id)
    }

    pub async fn load(&self, client: &reqwest::Client) -> Result<StructureInput> {
        let name = self.name();
        let records = match self {
            Self::File(path) => {
                debug!("Reading structure from {:?}", path);
                PdbFile::read_from_path(path).map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?
            }
            Self::Remote { id } => {
                let url = Self::download_url(id);
                info!("Downloading {} from {}", id, url);
                let content = client
                    .get(&url)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await?;
                PdbFile::read_from_str(&content).map_err(|e| CliError::FileParsing {
                    path: PathBuf::from(format!("{}.pdb", id)),
                    source: e.into(),
                })?
            }
        };
        debug!("Loaded {} atom record(s) for {}.", records.len(), name);
        Ok(StructureInput::new(name, records))
    }
}

/// Resolves and loads every argument in order, failing on the first unusable one.
pub async fn load_all(args: &[String]) -> Result<Vec<StructureInput>> {
    let sources = args
        .iter()
        .map(|arg| StructureSource::resolve(arg))
        .collect::<Result<Vec<_>>>()?;

    let client = reqwest::Client::new();
    let mut inputs = Vec::with_capacity(sources.len());
    for source in &sources {
        inputs.push(source.load(&client).await?);
    }
    Ok(inputs)
}
