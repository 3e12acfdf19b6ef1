// sequence.rs - Sequence type and FASTA parsing

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bio::io::fasta;

use crate::core::alignment::GAP;
use crate::core::error::AlignError;

/// An immutable symbol sequence (nucleotide or amino-acid letters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    id: String,
    residues: Vec<u8>,
}

impl Sequence {
    /// Build a sequence from text, rejecting gap symbols and non-printable bytes.
    /// Surrounding whitespace is trimmed; the empty sequence is legal.
    pub fn new<S: Into<String>>(id: S, text: &str) -> Result<Self, AlignError> {
        Self::from_bytes(id, text.trim().as_bytes())
    }

    pub fn from_bytes<S: Into<String>>(id: S, residues: &[u8]) -> Result<Self, AlignError> {
        let id = id.into();
        validate_residues(&id, residues)?;
        Ok(Self {
            id,
            residues: residues.to_vec(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn as_str(&self) -> &str {
        // Validated as ASCII on construction
        std::str::from_utf8(&self.residues).unwrap_or_default()
    }
}

fn validate_residues(id: &str, residues: &[u8]) -> Result<(), AlignError> {
    for (pos, &symbol) in residues.iter().enumerate() {
        if symbol == GAP {
            return Err(AlignError::validation(format!(
                "Sequence '{}' contains the gap symbol '-' at position {}",
                id, pos
            )));
        }
        if !symbol.is_ascii_graphic() {
            return Err(AlignError::validation(format!(
                "Sequence '{}' contains an invalid symbol (byte 0x{:02x}) at position {}",
                id, symbol, pos
            )));
        }
    }
    Ok(())
}

/// Parse every record of FASTA text
pub fn parse_fasta(text: &str) -> Result<Vec<Sequence>, String> {
    let reader = fasta::Reader::new(text.as_bytes());
    let mut sequences = Vec::new();

    for record_result in reader.records() {
        let record = record_result.map_err(|e| format!("Invalid FASTA record: {}", e))?;
        let sequence = Sequence::from_bytes(record.id(), record.seq())
            .map_err(|e| e.to_string())?;
        sequences.push(sequence);
    }

    Ok(sequences)
}

/// Load the first record of a FASTA file
pub fn first_fasta_record(fasta_path: &Path) -> Result<Sequence, String> {
    let file = File::open(fasta_path)
        .map_err(|e| format!("Failed to open FASTA file {}: {}", fasta_path.display(), e))?;

    let reader = fasta::Reader::new(BufReader::new(file));
    let record = reader
        .records()
        .next()
        .ok_or_else(|| format!("No FASTA records in {}", fasta_path.display()))?
        .map_err(|e| format!("Invalid FASTA record in {}: {}", fasta_path.display(), e))?;

    Sequence::from_bytes(record.id(), record.seq()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sequence_accepts_letters_and_empty() {
        let seq = Sequence::new("s1", "  GATTACA\n").unwrap();
        assert_eq!(seq.residues(), b"GATTACA");
        assert_eq!(seq.as_str(), "GATTACA");
        assert_eq!(seq.id(), "s1");

        let empty = Sequence::new("empty", "").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_sequence_rejects_gap_symbol() {
        let err = Sequence::new("s1", "GA-TACA").unwrap_err();
        assert!(matches!(err, AlignError::Validation(_)));
        assert!(err.to_string().contains("position 2"));
    }

    #[test]
    fn test_sequence_rejects_inner_whitespace() {
        assert!(Sequence::new("s1", "GAT TACA").is_err());
        assert!(Sequence::new("s1", "GATé").is_err());
    }

    #[test]
    fn test_parse_fasta_multiple_records() {
        let text = ">NM_000546.6 TP53\nACGTACGT\nTTGA\n>AY123456.1\nMKV\n";
        let records = parse_fasta(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), "NM_000546.6");
        assert_eq!(records[0].residues(), b"ACGTACGTTTGA");
        assert_eq!(records[1].residues(), b"MKV");
    }

    #[test]
    fn test_first_fasta_record_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, ">first\nGATTACA\n>second\nCCCC").unwrap();
        let seq = first_fasta_record(file.path()).unwrap();
        assert_eq!(seq.id(), "first");
        assert_eq!(seq.residues(), b"GATTACA");
    }

    #[test]
    fn test_first_fasta_record_missing_file() {
        let result = first_fasta_record(Path::new("/nonexistent/seq.fasta"));
        assert!(result.unwrap_err().contains("Failed to open FASTA file"));
    }
}
