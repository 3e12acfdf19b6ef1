// batch.rs - Parallel alignment of independent sequence pairs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::core::engine::Aligner;
use crate::core::error::AlignError;
use crate::data::sequence::Sequence;
use crate::output::format::PairwiseAlignmentResponse;

/// One named pair to align
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentJob {
    pub name: String,
    pub seq1: Sequence,
    pub seq2: Sequence,
}

impl AlignmentJob {
    pub fn new<S: Into<String>>(name: S, seq1: Sequence, seq2: Sequence) -> Self {
        Self {
            name: name.into(),
            seq1,
            seq2,
        }
    }

    /// Number of DP cells this job needs
    pub fn cells(&self) -> usize {
        (self.seq1.len() + 1).saturating_mul(self.seq2.len() + 1)
    }
}

/// Result of one job, reported under the job's name
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<PairwiseAlignmentResponse, AlignError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Align every job on the rayon pool. Outcomes come back in input order and
/// a failing job never affects the others.
pub fn align_batch(jobs: &[AlignmentJob], aligner: &Aligner, show_progress: bool) -> Vec<BatchOutcome> {
    let start = Instant::now();
    let total = jobs.len();
    log::info!(
        "Aligning {} pairs ({} mode, {} threads)",
        total,
        aligner.config().mode(),
        rayon::current_num_threads()
    );

    let pb = if show_progress {
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {per_sec} ETA: {eta}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    // Update every 1%
    let update_interval = std::cmp::max(1, total / 100);
    let progress_counter = AtomicUsize::new(0);

    let outcomes: Vec<BatchOutcome> = jobs
        .par_iter()
        .map(|job| {
            let result = aligner
                .align(job.seq1.residues(), job.seq2.residues())
                .map(|set| PairwiseAlignmentResponse::new(&set.best, aligner.config()));

            if let Err(e) = &result {
                log::warn!("Pair '{}' failed: {}", job.name, e);
            }

            let count = progress_counter.fetch_add(1, Ordering::Relaxed) + 1;
            if count % update_interval == 0 {
                pb.set_position(count as u64);
            }

            BatchOutcome {
                name: job.name.clone(),
                result,
            }
        })
        .collect();

    pb.finish_with_message("✅ Batch alignment completed!");

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    log::info!(
        "Aligned {} pairs in {:.2?} ({} failed)",
        total,
        start.elapsed(),
        failed
    );
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::{AlignmentMode, ScoringConfig};

    fn job(name: &str, a: &str, b: &str) -> AlignmentJob {
        AlignmentJob::new(
            name,
            Sequence::new(format!("{}_1", name), a).unwrap(),
            Sequence::new(format!("{}_2", name), b).unwrap(),
        )
    }

    #[test]
    fn test_batch_preserves_order() {
        let jobs: Vec<AlignmentJob> = (0..50)
            .map(|i| job(&format!("pair{}", i), "GATTACA", &"GCATGCU"[..(i % 7) + 1]))
            .collect();
        let aligner = Aligner::new(ScoringConfig::default());
        let outcomes = align_batch(&jobs, &aligner, false);

        assert_eq!(outcomes.len(), jobs.len());
        for (job, outcome) in jobs.iter().zip(&outcomes) {
            assert_eq!(job.name, outcome.name);
            let expected = aligner.align(job.seq1.residues(), job.seq2.residues()).unwrap();
            assert_eq!(outcome.result.as_ref().unwrap().score, expected.score());
        }
    }

    #[test]
    fn test_failure_is_isolated() {
        let config = ScoringConfig::default().with_mode(AlignmentMode::Local);
        let aligner = Aligner::new(config);
        let jobs = vec![
            job("ok", "GATTACA", "GCATGCU"),
            job("empty", "", ""),
            job("ok2", "ACGTACGTACGT", "CGTACGTA"),
        ];
        let outcomes = align_batch(&jobs, &aligner, false);

        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].result.as_ref().unwrap_err(), &AlignError::NoAlignment);
        assert_eq!(outcomes[2].result.as_ref().unwrap().score, 8.0);
    }

    #[test]
    fn test_size_guard_applies_per_job() {
        let aligner = Aligner::new(ScoringConfig::default()).with_max_cells(100);
        let jobs = vec![job("small", "ACGT", "ACGT"), job("large", &"A".repeat(20), &"A".repeat(20))];
        assert_eq!(jobs[1].cells(), 441);

        let outcomes = align_batch(&jobs, &aligner, false);
        assert!(outcomes[0].is_success());
        assert!(matches!(
            outcomes[1].result,
            Err(AlignError::SequenceTooLarge { cells: 441, limit: 100 })
        ));
    }

    #[test]
    fn test_empty_batch() {
        let aligner = Aligner::new(ScoringConfig::default());
        assert!(align_batch(&[], &aligner, false).is_empty());
    }
}
