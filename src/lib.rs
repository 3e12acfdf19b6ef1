// lib.rs - pairalign library root

//! # pairalign - Affine-gap pairwise sequence alignment with pluggable retrieval and storage
//!
//! This library aligns two biological sequences with an affine gap model
//! (Gotoh three-state dynamic programming) in global or local mode, renders
//! the result, and exposes fetch/align/save tools over injected capabilities.
//!
//! ## Features
//!
//! - **Global and local modes**: end-to-end or best-scoring sub-ranges
//! - **Deterministic tie-breaking**: identical inputs give identical alignments
//! - **Co-optimal count**: number of alignments sharing the optimal score
//! - **Bounded memory**: configurable limit on dynamic-programming cells
//! - **Batch mode**: parallel alignment of independent pairs
//! - **Capabilities**: pluggable sequence fetchers and result persisters
//!
//! ## Basic Usage
//!
//! ```rust
//! use pairalign::prelude::*;
//!
//! let config = ScoringConfig::default();
//! let set = align(b"GATTACA", b"GCATGCU", &config)?;
//! let response = PairwiseAlignmentResponse::new(&set.best, &config);
//!
//! assert_eq!(response.aligned_sequence1, "G-AT-TACA");
//! assert_eq!(response.aligned_sequence2, "GCATG--CU");
//! println!("{}", response.full_alignment_str);
//! # Ok::<(), AlignError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod output;
pub mod tools;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::cli::{validate_args, Args, ValidationResult};
    pub use crate::core::{align, align_batch, Aligner, Alignment, AlignmentJob, AlignmentSet, BatchOutcome};
    pub use crate::core::{AlignError, AlignmentMode, ScoringConfig};
    pub use crate::data::{Database, FetchError, LocalFetcher, RecordFormat, Sequence, SequenceFetcher};
    pub use crate::output::{render_report, write_summary, PairwiseAlignmentResponse};
    pub use crate::output::{FileFormat, LocalFilePersister, LocalFileResult, PersistData, Persister};
    pub use crate::tools::{AlignmentTools, PairwiseAlignmentRequest, ToolError};
}

// Re-export main types at the root level for convenience
pub use cli::{Args, ValidationResult};
pub use core::{AlignError, Aligner, AlignmentMode, AlignmentSet, ScoringConfig};
pub use output::PairwiseAlignmentResponse;
pub use tools::{AlignmentTools, PairwiseAlignmentRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!("pairalign v{} - Affine-gap pairwise sequence aligner", VERSION)
}
