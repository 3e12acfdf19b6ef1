// pairs.rs - Loader for batch pair lists

use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::core::batch::AlignmentJob;
use crate::data::sequence::Sequence;

/// Load a tab-separated pair list with header `name<TAB>seq1<TAB>seq2`.
/// Lines starting with `#` are skipped. Sequence cells may be empty.
pub fn load_pairs(file_path: &Path) -> Result<Vec<AlignmentJob>, String> {
    let content = std::fs::read_to_string(file_path)
        .map_err(|e| format!("Failed to read pairs file {}: {}", file_path.display(), e))?;
    parse_pairs(&content)
}

pub fn parse_pairs(content: &str) -> Result<Vec<AlignmentJob>, String> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .comment(Some(b'#'))
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read header: {}", e))?
        .clone();
    if headers.len() != 3 {
        return Err(format!(
            "Pairs header must have 3 columns (name, seq1, seq2), found {}",
            headers.len()
        ));
    }

    let mut jobs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("Invalid pairs record: {}", e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let name = record.get(0).unwrap_or_default();
        if name.is_empty() {
            return Err(format!("Line {}: pair name is empty", line));
        }

        let seq1 = Sequence::new(format!("{}/seq1", name), record.get(1).unwrap_or_default())
            .map_err(|e| format!("Line {}: {}", line, e))?;
        let seq2 = Sequence::new(format!("{}/seq2", name), record.get(2).unwrap_or_default())
            .map_err(|e| format!("Line {}: {}", line, e))?;

        jobs.push(AlignmentJob::new(name, seq1, seq2));
    }

    log::debug!("Loaded {} pairs", jobs.len());
    Ok(jobs)
}
