// alignment.rs - Scoring model and alignment utilities

use crate::core::error::AlignError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gap symbol used in aligned rows
pub const GAP: u8 = b'-';

/// Alignment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentMode {
    /// Alignment spanning both sequences end to end
    Global,
    /// Highest-scoring pair of contiguous sub-ranges
    Local,
}

impl FromStr for AlignmentMode {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "global" => Ok(AlignmentMode::Global),
            "local" => Ok(AlignmentMode::Local),
            _ => Err(AlignError::validation(format!(
                "Unsupported alignment mode '{}'. Use: global, local",
                s
            ))),
        }
    }
}

impl fmt::Display for AlignmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentMode::Global => write!(f, "global"),
            AlignmentMode::Local => write!(f, "local"),
        }
    }
}

impl AlignmentMode {
    pub fn description(&self) -> &str {
        match self {
            AlignmentMode::Global => "Global (Needleman-Wunsch/Gotoh, end to end)",
            AlignmentMode::Local => "Local (Smith-Waterman/Gotoh, best sub-ranges)",
        }
    }
}

/// Scoring parameters for one alignment run.
///
/// Penalties are expected to be non-positive but this is not enforced: the
/// engine computes a consistent optimum for any finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    match_score: f64,
    mismatch_penalty: f64,
    open_gap_penalty: f64,
    extend_gap_penalty: f64,
    mode: AlignmentMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: 1.0,
            mismatch_penalty: -1.0,
            open_gap_penalty: -0.5,
            extend_gap_penalty: -0.1,
            mode: AlignmentMode::Global,
        }
    }
}

impl ScoringConfig {
    /// Create a validated configuration
    pub fn new(
        match_score: f64,
        mismatch_penalty: f64,
        open_gap_penalty: f64,
        extend_gap_penalty: f64,
        mode: AlignmentMode,
    ) -> Result<Self, AlignError> {
        let params = [
            ("match_score", match_score),
            ("mismatch_penalty", mismatch_penalty),
            ("open_gap_penalty", open_gap_penalty),
            ("extend_gap_penalty", extend_gap_penalty),
        ];
        for (name, value) in params {
            if !value.is_finite() {
                return Err(AlignError::validation(format!(
                    "{} must be a finite number, got {}",
                    name, value
                )));
            }
        }

        for (name, value) in &params[1..] {
            if *value > 0.0 {
                log::warn!("{} is positive ({}); penalties are expected to be <= 0", name, value);
            }
        }

        Ok(Self {
            match_score,
            mismatch_penalty,
            open_gap_penalty,
            extend_gap_penalty,
            mode,
        })
    }

    /// Create a configuration from a mode string
    pub fn from_strings(
        match_score: f64,
        mismatch_penalty: f64,
        open_gap_penalty: f64,
        extend_gap_penalty: f64,
        mode: &str,
    ) -> Result<Self, AlignError> {
        let mode = AlignmentMode::from_str(mode)?;
        Self::new(match_score, mismatch_penalty, open_gap_penalty, extend_gap_penalty, mode)
    }

    /// Create configuration from a named preset
    pub fn from_preset(preset: &str, mode: AlignmentMode) -> Result<Self, AlignError> {
        let (match_score, mismatch, open, extend) = match preset {
            "default" => (1.0, -1.0, -0.5, -0.1),
            "dna" => (2.0, -1.0, -1.0, -0.5),
            "dna-strict" => (3.0, -2.0, -3.0, -1.0),
            "dna-permissive" => (1.0, 0.0, -0.5, -0.1),
            _ => {
                return Err(AlignError::validation(format!(
                    "Unknown scoring preset: {}. Use: {}",
                    preset,
                    Self::preset_names().join(", ")
                )))
            }
        };
        Self::new(match_score, mismatch, open, extend, mode)
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["default", "dna", "dna-strict", "dna-permissive"]
    }

    /// Same parameters under another mode
    pub fn with_mode(mut self, mode: AlignmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn match_score(&self) -> f64 {
        self.match_score
    }

    pub fn mismatch_penalty(&self) -> f64 {
        self.mismatch_penalty
    }

    pub fn open_gap_penalty(&self) -> f64 {
        self.open_gap_penalty
    }

    pub fn extend_gap_penalty(&self) -> f64 {
        self.extend_gap_penalty
    }

    pub fn mode(&self) -> AlignmentMode {
        self.mode
    }

    /// Score for aligning two symbols against each other
    #[inline]
    pub fn substitution(&self, a: u8, b: u8) -> f64 {
        if a == b {
            self.match_score
        } else {
            self.mismatch_penalty
        }
    }

    /// Affine cost of a gap run: open once, extend for each further position
    pub fn gap_cost(&self, len: usize) -> f64 {
        match len {
            0 => 0.0,
            n => self.open_gap_penalty + (n - 1) as f64 * self.extend_gap_penalty,
        }
    }
}

/// Summary statistics of a pair of aligned rows
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AlignmentStats {
    pub identities: usize,
    pub mismatches: usize,
    pub gap_positions: usize,
    pub gap_events: usize,
    pub alignment_length: usize,
    pub identity_percent: f64,
}

/// Compute alignment statistics from aligned sequences
pub fn compute_alignment_stats(aligned1: &[u8], aligned2: &[u8]) -> AlignmentStats {
    let mut stats = AlignmentStats::default();
    // Gap run currently open: 1 = gap in first row, 2 = gap in second row
    let mut open_run = 0u8;

    for (&a, &b) in aligned1.iter().zip(aligned2.iter()) {
        stats.alignment_length += 1;
        let run = if a == GAP {
            1
        } else if b == GAP {
            2
        } else {
            0
        };

        if run == 0 {
            if a == b {
                stats.identities += 1;
            } else {
                stats.mismatches += 1;
            }
        } else {
            stats.gap_positions += 1;
            if run != open_run {
                stats.gap_events += 1;
            }
        }
        open_run = run;
    }

    if stats.alignment_length > 0 {
        stats.identity_percent =
            stats.identities as f64 / stats.alignment_length as f64 * 100.0;
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("global".parse::<AlignmentMode>().unwrap(), AlignmentMode::Global);
        assert_eq!(" LOCAL ".parse::<AlignmentMode>().unwrap(), AlignmentMode::Local);
        let err = "semiglobal".parse::<AlignmentMode>().unwrap_err();
        assert!(matches!(err, AlignError::Validation(_)));
        assert_eq!(AlignmentMode::Local.to_string(), "local");
    }

    #[test]
    fn test_default_matches_tool_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.match_score(), 1.0);
        assert_eq!(config.mismatch_penalty(), -1.0);
        assert_eq!(config.open_gap_penalty(), -0.5);
        assert_eq!(config.extend_gap_penalty(), -0.1);
        assert_eq!(config.mode(), AlignmentMode::Global);
    }

    #[test]
    fn test_rejects_non_finite_parameters() {
        let nan = ScoringConfig::new(f64::NAN, -1.0, -0.5, -0.1, AlignmentMode::Global);
        assert!(matches!(nan, Err(AlignError::Validation(_))));
        let inf = ScoringConfig::new(1.0, -1.0, f64::NEG_INFINITY, -0.1, AlignmentMode::Local);
        assert!(matches!(inf, Err(AlignError::Validation(_))));
    }

    #[test]
    fn test_positive_penalties_are_accepted() {
        let config = ScoringConfig::new(1.0, 0.5, 0.2, 0.1, AlignmentMode::Global);
        assert!(config.is_ok());
    }

    #[test]
    fn test_from_strings_rejects_unknown_mode() {
        let result = ScoringConfig::from_strings(1.0, -1.0, -0.5, -0.1, "semi");
        assert!(matches!(result, Err(AlignError::Validation(_))));
    }

    #[test]
    fn test_presets() {
        let dna = ScoringConfig::from_preset("dna", AlignmentMode::Local).unwrap();
        assert_eq!(dna.match_score(), 2.0);
        assert_eq!(dna.mode(), AlignmentMode::Local);
        assert!(ScoringConfig::from_preset("protein-ultra", AlignmentMode::Global).is_err());
        for name in ScoringConfig::preset_names() {
            assert!(ScoringConfig::from_preset(name, AlignmentMode::Global).is_ok());
        }
    }

    #[test]
    fn test_gap_cost_is_affine() {
        let config = ScoringConfig::default();
        assert_eq!(config.gap_cost(0), 0.0);
        assert_eq!(config.gap_cost(1), -0.5);
        assert!((config.gap_cost(4) - (-0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_alignment_stats() {
        let stats = compute_alignment_stats(b"G-AT-TACA", b"GCATG--CU");
        assert_eq!(stats.alignment_length, 9);
        assert_eq!(stats.identities, 4);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.gap_positions, 4);
        // "-" in row 1, then "-" in row 1 followed by a run in row 2
        assert_eq!(stats.gap_events, 3);
        assert!((stats.identity_percent - 44.444).abs() < 0.01);
    }

    #[test]
    fn test_alignment_stats_empty() {
        let stats = compute_alignment_stats(b"", b"");
        assert_eq!(stats, AlignmentStats::default());
    }
}
