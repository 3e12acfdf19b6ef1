// mod.rs - Output formatters module

pub mod format;
pub mod persist;

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::alignment::compute_alignment_stats;
use crate::core::batch::BatchOutcome;

pub use format::{render_alignment, render_report, PairwiseAlignmentResponse, ParametersUsed};
pub use persist::{FileFormat, LocalFilePersister, LocalFileResult, PersistData, Persister};

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent)
            .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
    }
    Ok(())
}

/// Write the per-pair summary of a batch run as delimited text
fn write_delimited(
    file_path: &str,
    delimiter: u8,
    outcomes: &[BatchOutcome],
    command_line: &str,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);

    // Write command header
    writeln!(writer, "# Command: {}", command_line).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")).map_err(|e| format!("Write error: {}", e))?;
    writeln!(writer, "# pairalign v{}", env!("CARGO_PKG_VERSION")).map_err(|e| format!("Write error: {}", e))?;

    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer
        .write_record([
            "name",
            "status",
            "score",
            "identity_percent",
            "aligned_sequence1",
            "aligned_sequence2",
            "error",
        ])
        .map_err(|e| format!("Write error: {}", e))?;

    for outcome in outcomes {
        let row = match &outcome.result {
            Ok(response) => {
                let stats = compute_alignment_stats(
                    response.aligned_sequence1.as_bytes(),
                    response.aligned_sequence2.as_bytes(),
                );
                [
                    outcome.name.clone(),
                    "ok".to_string(),
                    response.score.to_string(),
                    format!("{:.2}", stats.identity_percent),
                    response.aligned_sequence1.clone(),
                    response.aligned_sequence2.clone(),
                    String::new(),
                ]
            }
            Err(e) => [
                outcome.name.clone(),
                "error".to_string(),
                "NA".to_string(),
                "NA".to_string(),
                String::new(),
                String::new(),
                e.to_string(),
            ],
        };
        csv_writer.write_record(&row).map_err(|e| format!("Write error: {}", e))?;
    }

    csv_writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    Ok(())
}

/// Write batch summary in the specified format
pub fn write_summary(
    file_path: &str,
    format: &str,
    outcomes: &[BatchOutcome],
    command_line: &str,
) -> Result<(), String> {
    match format.to_lowercase().as_str() {
        "tsv" => write_delimited(file_path, b'\t', outcomes, command_line)?,
        "csv" => write_delimited(file_path, b',', outcomes, command_line)?,
        _ => return Err(format!("Unsupported summary format: {}. Use: tsv, csv", format)),
    }
    println!("✅ Batch summary written to: {}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::ScoringConfig;
    use crate::core::batch::{align_batch, AlignmentJob};
    use crate::core::engine::Aligner;
    use crate::data::sequence::Sequence;

    fn outcomes() -> Vec<BatchOutcome> {
        let jobs = vec![
            AlignmentJob::new(
                "golden",
                Sequence::new("a", "GATTACA").unwrap(),
                Sequence::new("b", "GCATGCU").unwrap(),
            ),
            AlignmentJob::new(
                "too_big",
                Sequence::new("c", &"A".repeat(30)).unwrap(),
                Sequence::new("d", &"A".repeat(30)).unwrap(),
            ),
        ];
        let aligner = Aligner::new(ScoringConfig::default()).with_max_cells(200);
        align_batch(&jobs, &aligner, false)
    }

    #[test]
    fn test_write_tsv_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.tsv");
        let path_str = path.to_str().unwrap();
        write_summary(path_str, "tsv", &outcomes(), "pairalign --pairs x.tsv").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "# Command: pairalign --pairs x.tsv");
        assert!(lines[1].starts_with("# Generated: "));
        assert!(lines[2].starts_with("# pairalign v"));
        assert_eq!(lines[3], "name\tstatus\tscore\tidentity_percent\taligned_sequence1\taligned_sequence2\terror");
        assert!(lines[4].starts_with("golden\tok\t1.4"));
        assert!(lines[4].contains("\tG-AT-TACA\tGCATG--CU\t"));
        assert!(lines[5].starts_with("too_big\terror\tNA\tNA\t\t\t"));
        assert!(lines[5].contains("exceed the limit of 200"));
    }

    #[test]
    fn test_write_csv_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        write_summary(path.to_str().unwrap(), "CSV", &outcomes(), "cmd").unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("name,status,score"));
    }

    #[test]
    fn test_unsupported_summary_format() {
        let result = write_summary("/tmp/never.phy", "phylip", &[], "cmd");
        assert!(result.unwrap_err().contains("Unsupported summary format"));
    }
}
