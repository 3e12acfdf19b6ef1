// format.rs - Alignment result formatting

use serde::{Deserialize, Serialize};

use crate::core::alignment::{compute_alignment_stats, AlignmentMode, ScoringConfig, GAP};
use crate::core::engine::Alignment;

/// Width of the row label column in the three-line rendering
const LABEL_WIDTH: usize = 8;

/// Echo of the parameters an alignment was computed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersUsed {
    pub match_score: f64,
    pub mismatch_penalty: f64,
    pub open_gap_penalty: f64,
    pub extend_gap_penalty: f64,
    pub mode: AlignmentMode,
}

impl From<&ScoringConfig> for ParametersUsed {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            match_score: config.match_score(),
            mismatch_penalty: config.mismatch_penalty(),
            open_gap_penalty: config.open_gap_penalty(),
            extend_gap_penalty: config.extend_gap_penalty(),
            mode: config.mode(),
        }
    }
}

/// Outward result of one pairwise alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseAlignmentResponse {
    pub score: f64,
    pub aligned_sequence1: String,
    pub aligned_sequence2: String,
    pub full_alignment_str: String,
    pub parameters_used: ParametersUsed,
}

impl PairwiseAlignmentResponse {
    pub fn new(alignment: &Alignment, config: &ScoringConfig) -> Self {
        Self {
            score: alignment.score,
            aligned_sequence1: alignment.aligned_seq1_str(),
            aligned_sequence2: alignment.aligned_seq2_str(),
            full_alignment_str: render_alignment(alignment),
            parameters_used: ParametersUsed::from(config),
        }
    }
}

/// Marker for one alignment column: `|` identity, `.` mismatch, `-` gap
fn column_marker(a: u8, b: u8) -> char {
    if a == GAP || b == GAP {
        '-'
    } else if a == b {
        '|'
    } else {
        '.'
    }
}

/// Three-line visualization: seq1 row, marker row, seq2 row.
///
/// Sequence rows carry the 0-based start and exclusive end of the aligned
/// range; the marker row carries column coordinates.
pub fn render_alignment(alignment: &Alignment) -> String {
    let row1 = alignment.aligned_seq1_str();
    let row2 = alignment.aligned_seq2_str();
    let markers: String = alignment
        .aligned_seq1
        .iter()
        .zip(&alignment.aligned_seq2)
        .map(|(&a, &b)| column_marker(a, b))
        .collect();

    let r1 = &alignment.seq1_range;
    let r2 = &alignment.seq2_range;
    let mut out = String::new();
    out.push_str(&format!("{:<w$}{:>6} {} {}\n", "seq1", r1.start, row1, r1.end, w = LABEL_WIDTH));
    out.push_str(&format!("{:<w$}{:>6} {} {}\n", "", 0, markers, alignment.len(), w = LABEL_WIDTH));
    out.push_str(&format!("{:<w$}{:>6} {} {}\n", "seq2", r2.start, row2, r2.end, w = LABEL_WIDTH));
    out
}

/// Plain-text report written by the local-save alignment tool
pub fn render_report(response: &PairwiseAlignmentResponse) -> String {
    let params = &response.parameters_used;
    let stats = compute_alignment_stats(
        response.aligned_sequence1.as_bytes(),
        response.aligned_sequence2.as_bytes(),
    );

    format!(
        "Pairwise Alignment Results\n\
         =============================\n\
         \n\
         Parameters:\n\
         - Match Score: {}\n\
         - Mismatch Penalty: {}\n\
         - Open Gap Penalty: {}\n\
         - Extend Gap Penalty: {}\n\
         - Mode: {}\n\
         \n\
         Alignment Score: {}\n\
         Identities: {}/{} ({:.1}%), Gaps: {} in {} runs\n\
         \n\
         Aligned Sequences:\n\
         {}\n\
         Sequence 1 (aligned): {}\n\
         Sequence 2 (aligned): {}\n",
        params.match_score,
        params.mismatch_penalty,
        params.open_gap_penalty,
        params.extend_gap_penalty,
        params.mode,
        response.score,
        stats.identities,
        stats.alignment_length,
        stats.identity_percent,
        stats.gap_positions,
        stats.gap_events,
        response.full_alignment_str,
        response.aligned_sequence1,
        response.aligned_sequence2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::align;

    fn golden() -> PairwiseAlignmentResponse {
        let config = ScoringConfig::default();
        let set = align(b"GATTACA", b"GCATGCU", &config).unwrap();
        PairwiseAlignmentResponse::new(&set.best, &config)
    }

    #[test]
    fn test_response_fields() {
        let response = golden();
        assert!((response.score - 1.4).abs() < 1e-9);
        assert_eq!(response.aligned_sequence1, "G-AT-TACA");
        assert_eq!(response.aligned_sequence2, "GCATG--CU");
        assert_eq!(response.parameters_used.mode, AlignmentMode::Global);
        assert_eq!(response.parameters_used.open_gap_penalty, -0.5);
    }

    #[test]
    fn test_three_line_rendering() {
        let response = golden();
        let lines: Vec<&str> = response.full_alignment_str.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "seq1         0 G-AT-TACA 7");
        assert_eq!(lines[1], "             0 |-||---|. 9");
        assert_eq!(lines[2], "seq2         0 GCATG--CU 7");
    }

    #[test]
    fn test_local_rendering_uses_subranges() {
        let config = ScoringConfig::default().with_mode(AlignmentMode::Local);
        let set = align(b"ACGTACGTACGT", b"CGTACGTA", &config).unwrap();
        let rendered = render_alignment(&set.best);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "seq1         1 CGTACGTA 9");
        assert_eq!(lines[1], "             0 |||||||| 8");
        assert_eq!(lines[2], "seq2         0 CGTACGTA 8");
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        let json = serde_json::to_value(golden()).unwrap();
        assert_eq!(json["parameters_used"]["mode"], "global");
        assert_eq!(json["aligned_sequence1"], "G-AT-TACA");
        let back: PairwiseAlignmentResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, golden());
    }

    #[test]
    fn test_report_text() {
        let response = golden();
        let report = render_report(&response);
        assert!(report.starts_with("Pairwise Alignment Results\n"));
        assert!(report.contains("- Mode: global\n"));
        assert!(report.contains(&format!("Alignment Score: {}\n", response.score)));
        assert!(report.contains("Identities: 4/9 (44.4%), Gaps: 4 in 3 runs"));
        assert!(report.contains("Sequence 1 (aligned): G-AT-TACA\n"));
        assert!(report.contains("Sequence 2 (aligned): GCATG--CU\n"));
    }
}
