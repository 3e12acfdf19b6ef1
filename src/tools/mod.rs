// mod.rs - Tool layer wiring fetch, alignment and persistence together

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::alignment::ScoringConfig;
use crate::core::engine::{Aligner, DEFAULT_MAX_CELLS};
use crate::core::error::AlignError;
use crate::data::fetch::{Database, FetchError, RecordFormat, SequenceFetcher};
use crate::data::sequence::{parse_fasta, Sequence};
use crate::output::format::{render_report, PairwiseAlignmentResponse};
use crate::output::persist::{FileFormat, LocalFileResult, PersistData, Persister};

fn default_match_score() -> f64 {
    1.0
}

fn default_mismatch_penalty() -> f64 {
    -1.0
}

fn default_open_gap_penalty() -> f64 {
    -0.5
}

fn default_extend_gap_penalty() -> f64 {
    -0.1
}

fn default_mode() -> String {
    "global".to_string()
}

/// Input of the alignment tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseAlignmentRequest {
    pub sequence1: String,
    pub sequence2: String,
    #[serde(default = "default_match_score")]
    pub match_score: f64,
    #[serde(default = "default_mismatch_penalty")]
    pub mismatch_penalty: f64,
    #[serde(default = "default_open_gap_penalty")]
    pub open_gap_penalty: f64,
    #[serde(default = "default_extend_gap_penalty")]
    pub extend_gap_penalty: f64,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl PairwiseAlignmentRequest {
    /// Request with default scoring
    pub fn new<S: Into<String>, T: Into<String>>(sequence1: S, sequence2: T) -> Self {
        Self {
            sequence1: sequence1.into(),
            sequence2: sequence2.into(),
            match_score: default_match_score(),
            mismatch_penalty: default_mismatch_penalty(),
            open_gap_penalty: default_open_gap_penalty(),
            extend_gap_penalty: default_extend_gap_penalty(),
            mode: default_mode(),
        }
    }

    pub fn scoring(&self) -> Result<ScoringConfig, AlignError> {
        ScoringConfig::from_strings(
            self.match_score,
            self.mismatch_penalty,
            self.open_gap_penalty,
            self.extend_gap_penalty,
            &self.mode,
        )
    }
}

/// Failures of tools that combine fetching and aligning
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Align(#[from] AlignError),

    #[error("Record parsing error: {0}")]
    Parse(String),
}

/// Callable tools over injected fetch and persistence capabilities
pub struct AlignmentTools {
    fetcher: Box<dyn SequenceFetcher>,
    persister: Box<dyn Persister>,
    max_cells: usize,
}

impl AlignmentTools {
    pub fn new(fetcher: Box<dyn SequenceFetcher>, persister: Box<dyn Persister>) -> Self {
        Self {
            fetcher,
            persister,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }

    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Fetch records and return their text
    pub fn download_data(&self, ids: &[String], database: Database, format: RecordFormat) -> Result<String, FetchError> {
        log::info!(
            "action=download_data ids={:?} db={} format={} fetcher={}",
            ids,
            database,
            format,
            self.fetcher.name()
        );
        match self.fetcher.fetch(ids, database, format) {
            Ok(content) => {
                log::info!("action=download_data status=ok content_length={}", content.len());
                Ok(content)
            }
            Err(e) => {
                log::error!("action=download_data status=error error={}", e);
                Err(e)
            }
        }
    }

    /// Fetch records and save them; failures are reported in the result
    pub fn download_data_local(
        &self,
        ids: &[String],
        database: Database,
        format: RecordFormat,
        output_path: Option<&str>,
    ) -> LocalFileResult {
        let file_format = FileFormat::from(format);
        let content = match self.download_data(ids, database, format) {
            Ok(content) => content,
            Err(e) => return LocalFileResult::failed(file_format, e.to_string()),
        };

        let result = self.persister.persist(
            &PersistData::Text(content),
            file_format,
            output_path,
            &format!("{}_records", database),
        );
        log::info!(
            "action=download_data_local saved_to={:?} success={}",
            result.path,
            result.success
        );
        result
    }

    /// Align the two sequences of `request`
    pub fn perform_pairwise_alignment(
        &self,
        request: &PairwiseAlignmentRequest,
    ) -> Result<PairwiseAlignmentResponse, AlignError> {
        log::info!(
            "action=perform_pairwise_alignment sequence1_length={} sequence2_length={} mode={}",
            request.sequence1.len(),
            request.sequence2.len(),
            request.mode
        );

        let result = self.run_alignment(request);
        match &result {
            Ok(response) => log::info!(
                "action=perform_pairwise_alignment status=ok alignment_score={}",
                response.score
            ),
            Err(e) => log::error!("action=perform_pairwise_alignment status=error error={}", e),
        }
        result
    }

    /// Align and save the text report as an `.aln` file
    pub fn perform_pairwise_alignment_local(
        &self,
        request: &PairwiseAlignmentRequest,
        output_path: Option<&str>,
    ) -> LocalFileResult {
        let response = match self.perform_pairwise_alignment(request) {
            Ok(response) => response,
            Err(e) => return LocalFileResult::failed(FileFormat::Alignment, e.to_string()),
        };

        let result = self.save_report(&response, output_path);
        log::info!(
            "action=perform_pairwise_alignment_local alignment_score={} saved_to={:?} success={}",
            response.score,
            result.path,
            result.success
        );
        result
    }

    /// Save the text report of a finished alignment as an `.aln` file
    pub fn save_report(&self, response: &PairwiseAlignmentResponse, output_path: Option<&str>) -> LocalFileResult {
        self.persister.persist(
            &PersistData::Text(render_report(response)),
            FileFormat::Alignment,
            output_path,
            "pairwise_alignment",
        )
    }

    /// Fetch two accessions as FASTA and align their first records
    pub fn align_records(
        &self,
        id1: &str,
        id2: &str,
        database: Database,
        config: &ScoringConfig,
    ) -> Result<PairwiseAlignmentResponse, ToolError> {
        let seq1 = self.fetch_first_record(id1, database)?;
        let seq2 = self.fetch_first_record(id2, database)?;
        log::info!(
            "action=align_records id1={} ({} bp) id2={} ({} bp) mode={}",
            seq1.id(),
            seq1.len(),
            seq2.id(),
            seq2.len(),
            config.mode()
        );

        let set = Aligner::new(*config)
            .with_max_cells(self.max_cells)
            .align(seq1.residues(), seq2.residues())?;
        Ok(PairwiseAlignmentResponse::new(&set.best, config))
    }

    fn fetch_first_record(&self, id: &str, database: Database) -> Result<Sequence, ToolError> {
        let text = self.download_data(&[id.to_string()], database, RecordFormat::Fasta)?;
        parse_fasta(&text)
            .map_err(ToolError::Parse)?
            .into_iter()
            .next()
            .ok_or_else(|| ToolError::Parse(format!("No FASTA record returned for '{}'", id)))
    }

    fn run_alignment(&self, request: &PairwiseAlignmentRequest) -> Result<PairwiseAlignmentResponse, AlignError> {
        let config = request.scoring()?;
        let seq1 = Sequence::new("sequence1", &request.sequence1)?;
        let seq2 = Sequence::new("sequence2", &request.sequence2)?;

        let set = Aligner::new(config)
            .with_max_cells(self.max_cells)
            .align(seq1.residues(), seq2.residues())?;
        Ok(PairwiseAlignmentResponse::new(&set.best, &config))
    }
}
