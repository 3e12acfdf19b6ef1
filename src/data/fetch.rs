// fetch.rs - Sequence retrieval capability

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Record databases a fetcher can be asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Database {
    Nucleotide,
    Nuccore,
    Protein,
    Gene,
    Genome,
    Assembly,
    Taxonomy,
    Pubmed,
}

impl FromStr for Database {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nucleotide" => Ok(Database::Nucleotide),
            "nuccore" => Ok(Database::Nuccore),
            "protein" => Ok(Database::Protein),
            "gene" => Ok(Database::Gene),
            "genome" => Ok(Database::Genome),
            "assembly" => Ok(Database::Assembly),
            "taxonomy" => Ok(Database::Taxonomy),
            "pubmed" => Ok(Database::Pubmed),
            _ => Err(FetchError::InvalidRequest(format!(
                "Unknown database '{}'. Use: nucleotide, nuccore, protein, gene, genome, assembly, taxonomy, pubmed",
                s
            ))),
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Database::Nucleotide => "nucleotide",
            Database::Nuccore => "nuccore",
            Database::Protein => "protein",
            Database::Gene => "gene",
            Database::Genome => "genome",
            Database::Assembly => "assembly",
            Database::Taxonomy => "taxonomy",
            Database::Pubmed => "pubmed",
        };
        write!(f, "{}", name)
    }
}

/// Text format of fetched records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    Fasta,
    GenBank,
}

impl RecordFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            RecordFormat::Fasta => "fasta",
            RecordFormat::GenBank => "gb",
        }
    }
}

impl FromStr for RecordFormat {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fasta" | "fa" => Ok(RecordFormat::Fasta),
            "gb" | "genbank" => Ok(RecordFormat::GenBank),
            _ => Err(FetchError::InvalidRequest(format!(
                "Unknown record format '{}'. Use: fasta, gb",
                s
            ))),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Errors reported by a fetcher; never conflated with alignment errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid fetch request: {0}")]
    InvalidRequest(String),

    #[error("Record '{id}' not found in {database}")]
    NotFound { id: String, database: Database },

    #[error("Remote service error ({code}): {reason}")]
    Remote { code: u16, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies record text for accessions. Implementations may block on
/// network or disk; no retry is expected from them.
pub trait SequenceFetcher: Send + Sync {
    /// Fetch all `ids` from `database`, concatenated in request order
    fn fetch(&self, ids: &[String], database: Database, format: RecordFormat) -> Result<String, FetchError>;

    /// Get a human-readable name for this fetcher
    fn name(&self) -> &'static str;
}

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("identifier pattern is valid"));

/// Validate a list of accession identifiers
pub fn validate_ids(ids: &[String]) -> Result<(), FetchError> {
    if ids.is_empty() {
        return Err(FetchError::InvalidRequest("At least one identifier is required".to_string()));
    }

    for id in ids {
        if !ID_PATTERN.is_match(id) {
            return Err(FetchError::InvalidRequest(format!("Invalid identifier '{}'", id)));
        }
    }
    Ok(())
}

/// Serves records from a local directory laid out as `<root>/<database>/<id>.<ext>`
#[derive(Debug, Clone)]
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    fn record_path(&self, id: &str, database: Database, format: RecordFormat) -> PathBuf {
        self.root
            .join(database.to_string())
            .join(format!("{}.{}", id, format.extension()))
    }
}

impl SequenceFetcher for LocalFetcher {
    fn fetch(&self, ids: &[String], database: Database, format: RecordFormat) -> Result<String, FetchError> {
        validate_ids(ids)?;

        let mut content = String::new();
        for id in ids {
            let path = self.record_path(id, database, format);
            if !path.exists() {
                return Err(FetchError::NotFound {
                    id: id.clone(),
                    database,
                });
            }

            let record = std::fs::read_to_string(&path)?;
            content.push_str(&record);
            if !record.ends_with('\n') {
                content.push('\n');
            }
            log::debug!("Read record {} from {}", id, path.display());
        }

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
