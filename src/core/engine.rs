// engine.rs - Affine-gap pairwise alignment engine (Gotoh)

use std::ops::Range;

use crate::core::alignment::{AlignmentMode, ScoringConfig, GAP};
use crate::core::error::AlignError;

/// Default bound on (N+1)×(M+1) matrix cells for one alignment
pub const DEFAULT_MAX_CELLS: usize = 25_000_000;

/// Bytes of traceback kept per matrix cell (one bitmask per state)
pub const TRACE_BYTES_PER_CELL: usize = 3;

/// Scores closer than this are treated as equal
const SCORE_EPSILON: f64 = 1e-6;

// Traceback bits: which predecessor states reach the optimum of a cell
const FROM_M: u8 = 1;
const FROM_IX: u8 = 2;
const FROM_IY: u8 = 4;
const START: u8 = 8;

/// DP state: `M` ends in an aligned pair, `Ix` in a gap in sequence 2
/// (consuming sequence 1, "up"), `Iy` in a gap in sequence 1 ("left").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    M,
    Ix,
    Iy,
}

/// One optimal alignment
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    pub aligned_seq1: Vec<u8>,
    pub aligned_seq2: Vec<u8>,
    pub score: f64,
    /// Aligned sub-range of sequence 1 (the full sequence in global mode)
    pub seq1_range: Range<usize>,
    /// Aligned sub-range of sequence 2 (the full sequence in global mode)
    pub seq2_range: Range<usize>,
}

impl Alignment {
    fn empty() -> Self {
        Self {
            aligned_seq1: Vec::new(),
            aligned_seq2: Vec::new(),
            score: 0.0,
            seq1_range: 0..0,
            seq2_range: 0..0,
        }
    }

    pub fn len(&self) -> usize {
        self.aligned_seq1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aligned_seq1.is_empty()
    }

    pub fn aligned_seq1_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_seq1).into_owned()
    }

    pub fn aligned_seq2_str(&self) -> String {
        String::from_utf8_lossy(&self.aligned_seq2).into_owned()
    }
}

/// The optimal alignments for one input pair.
///
/// Only the first alignment in traceback tie-break order is materialized;
/// `co_optimal` counts every alignment reaching the same score.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentSet {
    pub best: Alignment,
    pub co_optimal: u64,
}

impl AlignmentSet {
    pub fn score(&self) -> f64 {
        self.best.score
    }

    pub fn into_best(self) -> Alignment {
        self.best
    }
}

/// Best of three candidates plus the bitmask of every candidate within
/// `SCORE_EPSILON` of it
#[inline]
fn best_of(m: f64, ix: f64, iy: f64) -> (f64, u8) {
    let best = m.max(ix).max(iy);
    if best == f64::NEG_INFINITY {
        return (best, 0);
    }
    let mut bits = 0;
    if best - m <= SCORE_EPSILON {
        bits |= FROM_M;
    }
    if best - ix <= SCORE_EPSILON {
        bits |= FROM_IX;
    }
    if best - iy <= SCORE_EPSILON {
        bits |= FROM_IY;
    }
    (best, bits)
}

/// Tie-break: diagonal > up > left
#[inline]
fn first_state(bits: u8) -> Option<State> {
    if bits & FROM_M != 0 {
        Some(State::M)
    } else if bits & FROM_IX != 0 {
        Some(State::Ix)
    } else if bits & FROM_IY != 0 {
        Some(State::Iy)
    } else {
        None
    }
}

/// Scores and optimal path counts of the three states at one cell
#[derive(Debug, Clone, Copy)]
struct Cell {
    m: f64,
    ix: f64,
    iy: f64,
    count_m: u64,
    count_ix: u64,
    count_iy: u64,
}

impl Cell {
    const UNREACHABLE: Cell = Cell {
        m: f64::NEG_INFINITY,
        ix: f64::NEG_INFINITY,
        iy: f64::NEG_INFINITY,
        count_m: 0,
        count_ix: 0,
        count_iy: 0,
    };

    /// Number of optimal paths entering the states named by `bits`
    #[inline]
    fn paths(&self, bits: u8) -> u64 {
        let mut total = 0u64;
        if bits & FROM_M != 0 {
            total = total.saturating_add(self.count_m);
        }
        if bits & FROM_IX != 0 {
            total = total.saturating_add(self.count_ix);
        }
        if bits & FROM_IY != 0 {
            total = total.saturating_add(self.count_iy);
        }
        total
    }
}

/// Running maximum over every state of every cell in local mode
struct LocalOptimum {
    score: f64,
    end: Option<((usize, usize), State)>,
    paths: u64,
}

impl LocalOptimum {
    fn new() -> Self {
        Self {
            score: 0.0,
            end: None,
            paths: 0,
        }
    }

    /// Cells arrive in row-major order; within a cell M, Ix, Iy
    fn consider(&mut self, cell: &Cell, at: (usize, usize)) {
        let states = [
            (State::M, cell.m, cell.count_m),
            (State::Ix, cell.ix, cell.count_ix),
            (State::Iy, cell.iy, cell.count_iy),
        ];
        for (state, score, paths) in states {
            if score <= SCORE_EPSILON {
                continue;
            }
            if score > self.score + SCORE_EPSILON {
                self.score = score;
                self.end = Some((at, state));
                self.paths = paths;
            } else if (score - self.score).abs() <= SCORE_EPSILON {
                self.paths = self.paths.saturating_add(paths);
            }
        }
    }
}

/// Result of one pass over the matrix
struct Fill {
    /// Scores and counts at (N, M)
    last: Cell,
    local: LocalOptimum,
}

/// Full (N+1)×(M+1) traceback planes.
///
/// Scores and path counts only live in two rolling rows, so the per-cell
/// cost is `TRACE_BYTES_PER_CELL`.
struct AlignmentMatrix {
    cols: usize,
    trace_m: Vec<u8>,
    trace_ix: Vec<u8>,
    trace_iy: Vec<u8>,
}

impl AlignmentMatrix {
    fn new(rows: usize, cols: usize) -> Self {
        let size = rows * cols;
        Self {
            cols,
            trace_m: vec![0; size],
            trace_ix: vec![0; size],
            trace_iy: vec![0; size],
        }
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// Run the recurrences over every cell in row-major order
    fn fill(&mut self, seq1: &[u8], seq2: &[u8], config: &ScoringConfig) -> Fill {
        let local = config.mode() == AlignmentMode::Local;
        let open = config.open_gap_penalty();
        let extend = config.extend_gap_penalty();
        let mut prev = vec![Cell::UNREACHABLE; self.cols];
        let mut cur = vec![Cell::UNREACHABLE; self.cols];
        let mut optimum = LocalOptimum::new();

        for i in 0..=seq1.len() {
            for j in 0..=seq2.len() {
                let k = self.index(i, j);
                let mut cell = Cell::UNREACHABLE;

                if i == 0 && j == 0 {
                    if !local {
                        cell.m = 0.0;
                        cell.count_m = 1;
                        self.trace_m[k] = START;
                    }
                    cur[j] = cell;
                    continue;
                }

                // In local mode every state may also start fresh from a
                // zero-scoring origin; ties go to the restart.
                if i > 0 && j > 0 {
                    let d = prev[j - 1];
                    let s = config.substitution(seq1[i - 1], seq2[j - 1]);
                    let (value, bits) = best_of(d.m, d.ix, d.iy);
                    if local && value <= SCORE_EPSILON {
                        cell.m = s;
                        cell.count_m = 1;
                        self.trace_m[k] = START;
                    } else if bits != 0 {
                        cell.m = s + value;
                        cell.count_m = d.paths(bits);
                        self.trace_m[k] = bits;
                    }
                }

                if i > 0 {
                    let u = prev[j];
                    let (value, bits) = best_of(u.m + open, u.ix + extend, u.iy + open);
                    if local && value <= open + SCORE_EPSILON {
                        cell.ix = open;
                        cell.count_ix = 1;
                        self.trace_ix[k] = START;
                    } else if bits != 0 {
                        cell.ix = value;
                        cell.count_ix = u.paths(bits);
                        self.trace_ix[k] = bits;
                    }
                }

                if j > 0 {
                    let l = cur[j - 1];
                    let (value, bits) = best_of(l.m + open, l.ix + open, l.iy + extend);
                    if local && value <= open + SCORE_EPSILON {
                        cell.iy = open;
                        cell.count_iy = 1;
                        self.trace_iy[k] = START;
                    } else if bits != 0 {
                        cell.iy = value;
                        cell.count_iy = l.paths(bits);
                        self.trace_iy[k] = bits;
                    }
                }

                if local {
                    optimum.consider(&cell, (i, j));
                }
                cur[j] = cell;
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        Fill {
            last: prev[seq2.len()],
            local: optimum,
        }
    }

    /// Walk back from `(end_i, end_j)` in `state` until the origin or a local restart
    fn traceback(
        &self,
        seq1: &[u8],
        seq2: &[u8],
        (end_i, end_j): (usize, usize),
        mut state: State,
        score: f64,
    ) -> Alignment {
        let (mut i, mut j) = (end_i, end_j);
        let mut row1 = Vec::with_capacity(end_i + end_j);
        let mut row2 = Vec::with_capacity(end_i + end_j);

        loop {
            let k = self.index(i, j);
            let bits = match state {
                State::M => {
                    if i == 0 || j == 0 {
                        break;
                    }
                    row1.push(seq1[i - 1]);
                    row2.push(seq2[j - 1]);
                    i -= 1;
                    j -= 1;
                    self.trace_m[k]
                }
                State::Ix => {
                    if i == 0 {
                        break;
                    }
                    row1.push(seq1[i - 1]);
                    row2.push(GAP);
                    i -= 1;
                    self.trace_ix[k]
                }
                State::Iy => {
                    if j == 0 {
                        break;
                    }
                    row1.push(GAP);
                    row2.push(seq2[j - 1]);
                    j -= 1;
                    self.trace_iy[k]
                }
            };

            if bits & START != 0 {
                break;
            }
            match first_state(bits) {
                Some(next) => state = next,
                None => break,
            }
        }

        row1.reverse();
        row2.reverse();

        Alignment {
            aligned_seq1: row1,
            aligned_seq2: row2,
            score,
            seq1_range: i..end_i,
            seq2_range: j..end_j,
        }
    }
}

/// Approximate bytes allocated to align sequences of `n` and `m` symbols
pub fn matrix_footprint(n: usize, m: usize) -> usize {
    let cols = m + 1;
    (n + 1) * cols * TRACE_BYTES_PER_CELL + 2 * cols * std::mem::size_of::<Cell>()
}

/// Pairwise aligner bound to one scoring configuration
#[derive(Debug, Clone)]
pub struct Aligner {
    config: ScoringConfig,
    max_cells: usize,
}

impl Aligner {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }

    /// Override the bound on matrix cells
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Align two symbol sequences and return the optimal alignment set
    pub fn align(&self, seq1: &[u8], seq2: &[u8]) -> Result<AlignmentSet, AlignError> {
        let (n, m) = (seq1.len(), seq2.len());
        let mode = self.config.mode();

        if mode == AlignmentMode::Local && n == 0 && m == 0 {
            return Err(AlignError::NoAlignment);
        }

        let cells = (n + 1)
            .checked_mul(m + 1)
            .ok_or(AlignError::SequenceTooLarge {
                cells: usize::MAX,
                limit: self.max_cells,
            })?;
        if cells > self.max_cells {
            return Err(AlignError::SequenceTooLarge {
                cells,
                limit: self.max_cells,
            });
        }

        log::debug!(
            "Aligning {} x {} symbols ({} mode, {} cells, ~{} bytes)",
            n,
            m,
            mode,
            cells,
            matrix_footprint(n, m)
        );

        let mut matrix = AlignmentMatrix::new(n + 1, m + 1);
        let fill = matrix.fill(seq1, seq2, &self.config);

        let set = match mode {
            AlignmentMode::Global => {
                let last = fill.last;
                let (score, bits) = best_of(last.m, last.ix, last.iy);
                // (N, M) is always reachable in global mode
                let state = first_state(bits).unwrap_or(State::M);
                AlignmentSet {
                    best: matrix.traceback(seq1, seq2, (n, m), state, score),
                    co_optimal: last.paths(bits).max(1),
                }
            }
            AlignmentMode::Local => match fill.local.end {
                Some((end, state)) => AlignmentSet {
                    best: matrix.traceback(seq1, seq2, end, state, fill.local.score),
                    co_optimal: fill.local.paths.max(1),
                },
                None => AlignmentSet {
                    best: Alignment::empty(),
                    co_optimal: 1,
                },
            },
        };

        log::trace!("Optimal score {} ({} co-optimal)", set.best.score, set.co_optimal);
        Ok(set)
    }
}

/// Align two sequences under `config` with the default size bound
pub fn align(seq1: &[u8], seq2: &[u8], config: &ScoringConfig) -> Result<AlignmentSet, AlignError> {
    Aligner::new(*config).align(seq1, seq2)
}
