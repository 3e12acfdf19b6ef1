// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    // Input
    pub data_dir: Option<String>,
    pub db: Option<String>,

    // Scoring
    pub mode: Option<String>,
    pub preset: Option<String>,
    pub match_score: Option<f64>,
    pub mismatch_penalty: Option<f64>,
    pub open_gap_penalty: Option<f64>,
    pub extend_gap_penalty: Option<f64>,

    // Limits and performance
    pub max_cells: Option<usize>,
    pub threads: Option<usize>,

    // Output
    pub output_dir: Option<String>,
    pub summary_format: Option<String>,
    pub json: Option<bool>,
    pub dry_run: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        log::info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        log::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# pairalign.toml - Configuration file for pairalign
# Command line arguments will override these settings

# =============================================================================
# INPUT
# =============================================================================

# Local record store laid out as <data_dir>/<db>/<id>.<ext>
# data_dir = "/path/to/records"

# Record database: nucleotide, nuccore, protein, gene, genome, assembly, taxonomy, pubmed
db = "nucleotide"

# =============================================================================
# SCORING
# =============================================================================

# Alignment mode: global, local
mode = "global"

# Scoring preset: default, dna, dna-strict, dna-permissive
# preset = "dna"

# Explicit scores (override the preset)
match_score = 1.0
mismatch_penalty = -1.0
open_gap_penalty = -0.5
extend_gap_penalty = -0.1

# =============================================================================
# LIMITS AND PERFORMANCE
# =============================================================================

# Maximum dynamic-programming matrix cells per pair
max_cells = 25000000

# Number of threads for batch mode (omit for auto-detection)
# threads = 8

# =============================================================================
# OUTPUT
# =============================================================================

# Directory for saved reports and downloaded records
output_dir = "pairalign_output"

# Batch summary format: tsv, csv
summary_format = "tsv"

# Print results as JSON
json = false

# Validate inputs without computation (dry run)
dry_run = false
"#
        .to_string()
    }
}
