// persist.rs - Persistence capability and the local-filesystem implementation

use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::data::fetch::RecordFormat;

/// Output file formats and their extensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Fasta,
    #[serde(rename = "gb")]
    GenBank,
    Json,
    Txt,
    Tsv,
    Alignment,
}

impl FileFormat {
    /// Parse a format name; unknown names fall back to plain text
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "fasta" => FileFormat::Fasta,
            "gb" | "genbank" => FileFormat::GenBank,
            "json" => FileFormat::Json,
            "tsv" => FileFormat::Tsv,
            "alignment" | "aln" => FileFormat::Alignment,
            _ => FileFormat::Txt,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Fasta => "fasta",
            FileFormat::GenBank => "gb",
            FileFormat::Json => "json",
            FileFormat::Txt => "txt",
            FileFormat::Tsv => "tsv",
            FileFormat::Alignment => "aln",
        }
    }
}

impl From<RecordFormat> for FileFormat {
    fn from(format: RecordFormat) -> Self {
        match format {
            RecordFormat::Fasta => FileFormat::Fasta,
            RecordFormat::GenBank => FileFormat::GenBank,
        }
    }
}

/// Payload handed to a persister
#[derive(Debug, Clone, PartialEq)]
pub enum PersistData {
    Text(String),
    Json(serde_json::Value),
}

impl PersistData {
    fn to_content(&self) -> Result<String, String> {
        match self {
            PersistData::Text(text) => Ok(text.clone()),
            PersistData::Json(value) => serde_json::to_string_pretty(value)
                .map_err(|e| format!("Failed to serialize JSON: {}", e)),
        }
    }
}

/// Outcome of a save; failures are reported here rather than raised
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFileResult {
    pub path: Option<PathBuf>,
    pub format: FileFormat,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocalFileResult {
    pub fn saved(path: PathBuf, format: FileFormat) -> Self {
        Self {
            path: Some(path),
            format,
            success: true,
            error: None,
        }
    }

    pub fn failed<S: Into<String>>(format: FileFormat, error: S) -> Self {
        Self {
            path: None,
            format,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Writes tool output somewhere durable
pub trait Persister: Send + Sync {
    /// Save `data`. With no `output_path` a unique name is derived from
    /// `default_prefix`. Never fails loudly: errors come back in the result.
    fn persist(
        &self,
        data: &PersistData,
        format: FileFormat,
        output_path: Option<&str>,
        default_prefix: &str,
    ) -> LocalFileResult;
}

/// Disambiguates names generated within the same clock tick
static NAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Saves files under a base output directory
#[derive(Debug, Clone)]
pub struct LocalFilePersister {
    output_dir: PathBuf,
}

impl LocalFilePersister {
    /// Create the persister, creating `output_dir` if needed
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Result<Self, String> {
        let output_dir = output_dir.into();
        create_dir_all(&output_dir).map_err(|e| {
            format!("Failed to create output directory '{}': {}", output_dir.display(), e)
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination for a save request
    pub fn resolve_path(&self, content: &str, format: FileFormat, output_path: Option<&str>, default_prefix: &str) -> PathBuf {
        let extension = format.extension();
        match output_path {
            None => self
                .output_dir
                .join(format!("{}_{}.{}", default_prefix, unique_suffix(content), extension)),
            Some(requested) => {
                let path = Path::new(requested);
                if path.is_absolute() {
                    if path.extension().and_then(|e| e.to_str()) == Some(extension) {
                        path.to_path_buf()
                    } else {
                        path.with_extension(extension)
                    }
                } else if requested.ends_with(&format!(".{}", extension)) {
                    self.output_dir.join(requested)
                } else {
                    self.output_dir.join(format!("{}.{}", requested, extension))
                }
            }
        }
    }
}

/// 8 hex digits from the content, the clock and a process-wide counter
fn unique_suffix(content: &str) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(content.as_bytes());
    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&NAME_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    format!("{:08x}", hasher.finalize())
}

impl Persister for LocalFilePersister {
    fn persist(
        &self,
        data: &PersistData,
        format: FileFormat,
        output_path: Option<&str>,
        default_prefix: &str,
    ) -> LocalFileResult {
        let content = match data.to_content() {
            Ok(content) => content,
            Err(e) => return LocalFileResult::failed(format, e),
        };

        let path = self.resolve_path(&content, format, output_path, default_prefix);
        match fs::write(&path, content.as_bytes()) {
            Ok(()) => {
                log::info!("Saved {} file to {}", format.extension(), path.display());
                LocalFileResult::saved(path, format)
            }
            Err(e) => {
                log::error!("Failed to write {}: {}", path.display(), e);
                LocalFileResult::failed(format, format!("Failed to write '{}': {}", path.display(), e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_parsing_and_extensions() {
        assert_eq!(FileFormat::parse("alignment").extension(), "aln");
        assert_eq!(FileFormat::parse("GB"), FileFormat::GenBank);
        assert_eq!(FileFormat::parse("xml"), FileFormat::Txt);
        assert_eq!(FileFormat::from(RecordFormat::Fasta), FileFormat::Fasta);
    }

    #[test]
    fn test_creates_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let persister = LocalFilePersister::new(&nested).unwrap();
        assert!(persister.output_dir().is_dir());
    }

    #[test]
    fn test_generated_name_uses_prefix_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let persister = LocalFilePersister::new(dir.path()).unwrap();
        let data = PersistData::Text("Pairwise Alignment Results\n".to_string());

        let result = persister.persist(&data, FileFormat::Alignment, None, "pairwise_alignment");
        assert!(result.success);
        let path = result.path.unwrap();
        assert_eq!(path.extension().unwrap(), "aln");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("pairwise_alignment_"));
        assert_eq!(name.len(), "pairwise_alignment_".len() + 8 + ".aln".len());
        assert_eq!(fs::read_to_string(&path).unwrap(), "Pairwise Alignment Results\n");
    }

    #[test]
    fn test_generated_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let persister = LocalFilePersister::new(dir.path()).unwrap();
        let data = PersistData::Text("same".to_string());
        let a = persister.persist(&data, FileFormat::Txt, None, "dup").path.unwrap();
        let b = persister.persist(&data, FileFormat::Txt, None, "dup").path.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_json_relative_path_gets_extension() {
        let dir = tempfile::tempdir().unwrap();
        let persister = LocalFilePersister::new(dir.path()).unwrap();
        let value = json!({"gene_id": "ENSG00000141510", "gene_name": "TP53"});

        let result = persister.persist(&PersistData::Json(value.clone()), FileFormat::Json, Some("test_gene_data"), "test");
        assert!(result.success);
        let path = result.path.unwrap();
        assert_eq!(path, dir.path().join("test_gene_data.json"));
        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved, value);
    }

    #[test]
    fn test_relative_path_with_extension_kept() {
        let dir = tempfile::tempdir().unwrap();
        let persister = LocalFilePersister::new(dir.path()).unwrap();
        let path = persister.resolve_path("", FileFormat::Fasta, Some("records.fasta"), "x");
        assert_eq!(path, dir.path().join("records.fasta"));
    }

    #[test]
    fn test_absolute_path_extension_forced() {
        let dir = tempfile::tempdir().unwrap();
        let persister = LocalFilePersister::new(dir.path()).unwrap();
        let requested = dir.path().join("report.txt");
        let result = persister.persist(
            &PersistData::Text("x".to_string()),
            FileFormat::Alignment,
            requested.to_str(),
            "x",
        );
        assert!(result.success);
        assert_eq!(result.path.unwrap(), dir.path().join("report.aln"));
    }

    #[test]
    fn test_unwritable_path_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let persister = LocalFilePersister::new(dir.path()).unwrap();
        let missing = dir.path().join("nonexistent").join("path").join("test_file");
        let result = persister.persist(&PersistData::Text("test content".to_string()), FileFormat::Txt, missing.to_str(), "test");

        assert!(!result.success);
        assert!(result.path.is_none());
        assert!(result.error.is_some());
        assert_eq!(result.format, FileFormat::Txt);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["format"], "txt");
        assert_eq!(json["success"], false);
    }

    #[test]
    fn test_success_result_omits_error() {
        let result = LocalFileResult::saved(PathBuf::from("/tmp/a.gb"), FileFormat::GenBank);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("error").is_none());
        assert_eq!(json["format"], "gb");
    }
}
