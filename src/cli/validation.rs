// validation.rs - Input validation utilities

use std::path::Path;
use std::str::FromStr;

use crate::cli::args::Args;
use crate::core::{AlignmentMode, ScoringConfig, DEFAULT_MAX_CELLS};
use crate::data::fetch::{validate_ids, Database, RecordFormat};

/// Where the sequences of a run come from
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Literal { seq1: String, seq2: String },
    Fasta { fasta1: String, fasta2: String },
    Records { id1: String, id2: String, data_dir: String },
    Batch { pairs: String },
    Download { ids: Vec<String>, data_dir: String, format: RecordFormat },
}

impl InputSource {
    pub fn description(&self) -> String {
        match self {
            InputSource::Literal { .. } => "literal sequences".to_string(),
            InputSource::Fasta { fasta1, fasta2 } => format!("FASTA files {} and {}", fasta1, fasta2),
            InputSource::Records { id1, id2, .. } => format!("records {} and {}", id1, id2),
            InputSource::Batch { pairs } => format!("pairs file {}", pairs),
            InputSource::Download { ids, .. } => format!("download of {} records", ids.len()),
        }
    }
}

#[derive(Debug)]
pub struct ValidationResult {
    pub input: InputSource,
    pub scoring: ScoringConfig,
    pub database: Database,
    pub max_cells: usize,
}

/// Validate all command line arguments
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    let input = resolve_input(args)?;

    // Validate database name
    let database = Database::from_str(&args.db).map_err(|e| e.to_string())?;

    // Validate mode, then build scoring: preset first, explicit values on top
    let mode = AlignmentMode::from_str(&args.mode).map_err(|e| e.to_string())?;
    let base = match &args.preset {
        Some(preset) => ScoringConfig::from_preset(preset, mode).map_err(|e| e.to_string())?,
        None => ScoringConfig::default().with_mode(mode),
    };
    let scoring = ScoringConfig::new(
        args.match_score.unwrap_or(base.match_score()),
        args.mismatch_penalty.unwrap_or(base.mismatch_penalty()),
        args.open_gap_penalty.unwrap_or(base.open_gap_penalty()),
        args.extend_gap_penalty.unwrap_or(base.extend_gap_penalty()),
        mode,
    )
    .map_err(|e| e.to_string())?;

    // Validate limits
    let max_cells = args.max_cells.unwrap_or(DEFAULT_MAX_CELLS);
    if max_cells == 0 {
        return Err("--max-cells must be greater than 0".to_string());
    }
    if args.threads == Some(0) {
        return Err("--threads must be greater than 0".to_string());
    }

    // Validate output options
    match args.summary_format.to_lowercase().as_str() {
        "tsv" | "csv" => {}
        other => return Err(format!("Unsupported summary format: {}. Use: tsv, csv", other)),
    }
    let batch = matches!(input, InputSource::Batch { .. });
    if args.summary.is_some() && !batch {
        return Err("--summary requires --pairs".to_string());
    }
    if batch && (args.output.is_some() || args.save) {
        return Err("--output/--save are not available in batch mode; use --summary".to_string());
    }
    if args.output.is_some() && args.save {
        return Err("--output and --save are mutually exclusive".to_string());
    }

    Ok(ValidationResult {
        input,
        scoring,
        database,
        max_cells,
    })
}

/// Pick the single input source given on the command line
fn resolve_input(args: &Args) -> Result<InputSource, String> {
    let literal = args.seq1.is_some() || args.seq2.is_some();
    let fasta = args.fasta1.is_some() || args.fasta2.is_some();
    let records = args.id1.is_some() || args.id2.is_some();
    let batch = args.pairs.is_some();
    let download = args.fetch.is_some();

    let given = [literal, fasta, records, batch, download].iter().filter(|&&g| g).count();
    if given == 0 {
        return Err("No input given. Use --seq1/--seq2, --fasta1/--fasta2, --id1/--id2, --pairs or --fetch".to_string());
    }
    if given > 1 {
        return Err("Input options are mutually exclusive: choose one of literal sequences, FASTA files, record ids, --pairs or --fetch".to_string());
    }

    if literal {
        return match (&args.seq1, &args.seq2) {
            (Some(seq1), Some(seq2)) => Ok(InputSource::Literal {
                seq1: seq1.clone(),
                seq2: seq2.clone(),
            }),
            _ => Err("--seq1 and --seq2 must be given together".to_string()),
        };
    }

    if fasta {
        return match (&args.fasta1, &args.fasta2) {
            (Some(fasta1), Some(fasta2)) => {
                for path in [fasta1, fasta2] {
                    if !Path::new(path).exists() {
                        return Err(format!("FASTA file not found: {}", path));
                    }
                }
                Ok(InputSource::Fasta {
                    fasta1: fasta1.clone(),
                    fasta2: fasta2.clone(),
                })
            }
            _ => Err("--fasta1 and --fasta2 must be given together".to_string()),
        };
    }

    if records {
        let data_dir = require_data_dir(args, "--id1/--id2")?;
        return match (&args.id1, &args.id2) {
            (Some(id1), Some(id2)) => {
                validate_ids(&[id1.clone(), id2.clone()]).map_err(|e| e.to_string())?;
                Ok(InputSource::Records {
                    id1: id1.clone(),
                    id2: id2.clone(),
                    data_dir,
                })
            }
            _ => Err("--id1 and --id2 must be given together".to_string()),
        };
    }

    if let Some(pairs) = &args.pairs {
        if !Path::new(pairs).exists() {
            return Err(format!("Pairs file not found: {}", pairs));
        }
        return Ok(InputSource::Batch { pairs: pairs.clone() });
    }

    let data_dir = require_data_dir(args, "--fetch")?;
    let ids: Vec<String> = args
        .fetch
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    validate_ids(&ids).map_err(|e| e.to_string())?;
    let format = RecordFormat::from_str(&args.record_format).map_err(|e| e.to_string())?;
    Ok(InputSource::Download { ids, data_dir, format })
}

fn require_data_dir(args: &Args, option: &str) -> Result<String, String> {
    let data_dir = args
        .data_dir
        .clone()
        .ok_or_else(|| format!("{} requires --data-dir", option))?;
    if !Path::new(&data_dir).is_dir() {
        return Err(format!("Data directory not found: {}", data_dir));
    }
    Ok(data_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use argh::FromArgs;

    fn parse(args: &[&str]) -> Args {
        Args::from_args(&["pairalign"], args).unwrap()
    }

    #[test]
    fn test_literal_input_with_defaults() {
        let result = validate_args(&parse(&["--seq1", "GATTACA", "--seq2", "GCATGCU"])).unwrap();
        assert_eq!(
            result.input,
            InputSource::Literal {
                seq1: "GATTACA".to_string(),
                seq2: "GCATGCU".to_string()
            }
        );
        assert_eq!(result.scoring, ScoringConfig::default());
        assert_eq!(result.max_cells, DEFAULT_MAX_CELLS);
        assert_eq!(result.database, Database::Nucleotide);
    }

    #[test]
    fn test_explicit_scores_override_preset() {
        let args = parse(&["--seq1", "A", "--seq2", "C", "--preset", "dna", "--match-score", "5", "--mode", "local"]);
        let scoring = validate_args(&args).unwrap().scoring;
        assert_eq!(scoring.match_score(), 5.0);
        assert_eq!(scoring.open_gap_penalty(), -1.0);
        assert_eq!(scoring.mode(), AlignmentMode::Local);
    }

    #[test]
    fn test_rejects_missing_or_mixed_input() {
        assert!(validate_args(&parse(&[])).is_err());
        assert!(validate_args(&parse(&["--seq1", "A"])).is_err());
        let mixed = parse(&["--seq1", "A", "--seq2", "C", "--pairs", "p.tsv"]);
        assert!(validate_args(&mixed).unwrap_err().contains("mutually exclusive"));
    }

    #[test]
    fn test_rejects_bad_mode_and_preset() {
        let mode = parse(&["--seq1", "A", "--seq2", "C", "--mode", "semiglobal"]);
        assert!(validate_args(&mode).unwrap_err().contains("Unsupported alignment mode"));
        let preset = parse(&["--seq1", "A", "--seq2", "C", "--preset", "blosum62"]);
        assert!(validate_args(&preset).unwrap_err().contains("Unknown scoring preset"));
    }

    #[test]
    fn test_records_require_data_dir() {
        let args = parse(&["--id1", "NM_1", "--id2", "NM_2"]);
        assert!(validate_args(&args).unwrap_err().contains("requires --data-dir"));

        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let args = parse(&["--id1", "NM_1", "--id2", "NM_2", "--data-dir", dir_str]);
        assert!(matches!(validate_args(&args).unwrap().input, InputSource::Records { .. }));
    }

    #[test]
    fn test_fetch_ids_are_split_and_validated() {
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap();
        let args = parse(&["--fetch", "NM_000546.6, NM_001126112.3", "--data-dir", dir_str, "--record-format", "gb"]);
        match validate_args(&args).unwrap().input {
            InputSource::Download { ids, format, .. } => {
                assert_eq!(ids, vec!["NM_000546.6", "NM_001126112.3"]);
                assert_eq!(format, RecordFormat::GenBank);
            }
            other => panic!("unexpected input {:?}", other),
        }

        let bad = parse(&["--fetch", "a/b", "--data-dir", dir_str]);
        assert!(validate_args(&bad).is_err());
    }

    #[test]
    fn test_output_option_conflicts() {
        let summary = parse(&["--seq1", "A", "--seq2", "C", "--summary", "s.tsv"]);
        assert!(validate_args(&summary).unwrap_err().contains("--summary requires --pairs"));
        let both = parse(&["--seq1", "A", "--seq2", "C", "--save", "--output", "x.aln"]);
        assert!(validate_args(&both).is_err());
        let zero = parse(&["--seq1", "A", "--seq2", "C", "--max-cells", "0"]);
        assert!(validate_args(&zero).is_err());
    }
}
