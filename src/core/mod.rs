// mod.rs - Core logic module

pub mod alignment;
pub mod batch;
pub mod engine;
pub mod error;

// Re-export main types for convenience
pub use alignment::{compute_alignment_stats, AlignmentMode, AlignmentStats, ScoringConfig, GAP};
pub use batch::{align_batch, AlignmentJob, BatchOutcome};
pub use engine::{align, matrix_footprint, Aligner, Alignment, AlignmentSet, DEFAULT_MAX_CELLS, TRACE_BYTES_PER_CELL};
pub use error::AlignError;
