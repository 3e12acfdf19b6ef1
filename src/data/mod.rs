// mod.rs - Data structures module

pub mod fetch;
pub mod loaders;
pub mod sequence;

// Re-export main types for convenience
pub use fetch::{Database, FetchError, LocalFetcher, RecordFormat, SequenceFetcher};
pub use sequence::{first_fasta_record, parse_fasta, Sequence};
