// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(mut self, config: Config) -> Self {
        // Input
        if self.data_dir.is_none() {
            self.data_dir = config.data_dir;
        }
        if let Some(db) = config.db {
            if self.db == "nucleotide" {
                self.db = db;
            }
        }

        // Scoring (only override defaults, not explicit CLI values)
        if let Some(mode) = config.mode {
            if self.mode == "global" {
                self.mode = mode;
            }
        }
        if self.preset.is_none() {
            self.preset = config.preset;
        }
        if self.match_score.is_none() {
            self.match_score = config.match_score;
        }
        if self.mismatch_penalty.is_none() {
            self.mismatch_penalty = config.mismatch_penalty;
        }
        if self.open_gap_penalty.is_none() {
            self.open_gap_penalty = config.open_gap_penalty;
        }
        if self.extend_gap_penalty.is_none() {
            self.extend_gap_penalty = config.extend_gap_penalty;
        }

        // Limits and performance
        if self.max_cells.is_none() {
            self.max_cells = config.max_cells;
        }
        if self.threads.is_none() {
            self.threads = config.threads;
        }

        // Output
        if let Some(output_dir) = config.output_dir {
            if self.output_dir == "pairalign_output" {
                self.output_dir = output_dir;
            }
        }
        if let Some(summary_format) = config.summary_format {
            if self.summary_format == "tsv" {
                self.summary_format = summary_format;
            }
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.json && config.json.unwrap_or(false) {
            self.json = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
