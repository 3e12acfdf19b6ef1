// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs, Debug)]
/// pairalign - Affine-gap pairwise sequence aligner
pub struct Args {
    /// first sequence given literally
    #[argh(option)]
    pub seq1: Option<String>,

    /// second sequence given literally
    #[argh(option)]
    pub seq2: Option<String>,

    /// FASTA file holding the first sequence (first record is used)
    #[argh(option)]
    pub fasta1: Option<String>,

    /// FASTA file holding the second sequence (first record is used)
    #[argh(option)]
    pub fasta2: Option<String>,

    /// accession of the first sequence, read from --data-dir
    #[argh(option)]
    pub id1: Option<String>,

    /// accession of the second sequence, read from --data-dir
    #[argh(option)]
    pub id2: Option<String>,

    /// download comma-separated accessions from --data-dir into --output-dir and exit
    #[argh(option)]
    pub fetch: Option<String>,

    /// record format for --fetch: fasta, gb (default: fasta)
    #[argh(option, default = "String::from(\"fasta\")")]
    pub record_format: String,

    /// local record store laid out as <dir>/<db>/<id>.<ext>
    #[argh(option)]
    pub data_dir: Option<String>,

    /// record database: nucleotide, nuccore, protein, gene, ... (default: nucleotide)
    #[argh(option, default = "String::from(\"nucleotide\")")]
    pub db: String,

    /// alignment mode: global, local (default: global)
    #[argh(option, default = "String::from(\"global\")")]
    pub mode: String,

    /// scoring preset: default, dna, dna-strict, dna-permissive
    #[argh(option)]
    pub preset: Option<String>,

    /// score for identical symbols (default: 1.0, overrides preset)
    #[argh(option)]
    pub match_score: Option<f64>,

    /// score for differing symbols (default: -1.0, overrides preset)
    #[argh(option)]
    pub mismatch_penalty: Option<f64>,

    /// score for the first position of a gap run (default: -0.5, overrides preset)
    #[argh(option)]
    pub open_gap_penalty: Option<f64>,

    /// score for each further gap position (default: -0.1, overrides preset)
    #[argh(option)]
    pub extend_gap_penalty: Option<f64>,

    /// maximum dynamic-programming matrix cells per pair (default: 25000000)
    #[argh(option)]
    pub max_cells: Option<usize>,

    /// save the alignment report (.aln); relative paths land in --output-dir
    #[argh(option)]
    pub output: Option<String>,

    /// save the alignment report under a generated name
    #[argh(switch)]
    pub save: bool,

    /// directory for saved files (default: pairalign_output)
    #[argh(option, default = "String::from(\"pairalign_output\")")]
    pub output_dir: String,

    /// print the alignment result as JSON
    #[argh(switch)]
    pub json: bool,

    /// batch mode: tab-separated pairs file with header name, seq1, seq2
    #[argh(option)]
    pub pairs: Option<String>,

    /// batch summary output file
    #[argh(option)]
    pub summary: Option<String>,

    /// batch summary format: tsv, csv (default: tsv)
    #[argh(option, default = "String::from(\"tsv\")")]
    pub summary_format: String,

    /// number of threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// validate inputs without computation (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
