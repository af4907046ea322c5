//! Generic aggregation over post sources with two execution strategies.
//! Implement `PostAggregator` for your aggregation state and call
//! `run_streaming` (one pass, bounded memory) or `run_tabular` (bulk load,
//! parallel chunk counting, ordered merge).

use crate::error::{MalformedReason, MalformedRecord, SourceError};
use crate::record::{PostRecord, PostResult};
use crate::source::PostSource;
use rayon::prelude::*;
use std::time::Duration;

pub trait PostAggregator: Send + Default {
    type Output;

    /// Whether skipped rows are worth a `warn!` (otherwise they log at debug).
    const WARN_ON_SKIP: bool;

    fn ingest(&mut self, post: &PostRecord) -> Result<(), MalformedReason>;

    /// Fold a partial state built from a *later* run of rows into `self`.
    fn merge(&mut self, other: Self);

    fn finish(self, k: usize) -> Self::Output;
}

/// Row accounting for one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Non-blank rows seen, including skipped ones.
    pub records: u64,
    pub skipped: u64,
    pub elapsed: Duration,
}

impl ScanSummary {
    pub fn merge(&mut self, other: ScanSummary) {
        self.records += other.records;
        self.skipped += other.skipped;
    }
}

pub(crate) fn note_skip(warn: bool, err: &MalformedRecord) {
    if warn {
        tracing::warn!(line = err.line, reason = %err.reason, "skipping malformed record");
    } else {
        tracing::debug!(line = err.line, reason = %err.reason, "skipping malformed record");
    }
}

/// Feed one decoded row to `on_post`, recording skips in `summary`.
pub(crate) fn visit_row(
    summary: &mut ScanSummary,
    warn: bool,
    line: u64,
    row: &PostResult,
    mut on_post: impl FnMut(&PostRecord) -> Result<(), MalformedReason>,
) {
    summary.records += 1;
    let outcome = match row {
        Ok(post) => on_post(post).map_err(|reason| MalformedRecord::new(line, reason)),
        Err(e) => {
            note_skip(warn, e);
            summary.skipped += 1;
            return;
        }
    };
    if let Err(e) = outcome {
        note_skip(warn, &e);
        summary.skipped += 1;
    }
}

/// Single pass over `source` in file order.
pub fn run_streaming<A, S>(source: &S, k: usize) -> Result<(A::Output, ScanSummary), SourceError>
where
    A: PostAggregator,
    S: PostSource + ?Sized,
{
    let mut agg = A::default();
    let mut summary = ScanSummary::default();
    source.for_each_post(&mut |line, row| {
        visit_row(&mut summary, A::WARN_ON_SKIP, line, &row, |p| agg.ingest(p));
    })?;
    Ok((agg.finish(k), summary))
}

/// Load every row, count `chunk_rows`-sized chunks in parallel, then merge the
/// partial states in chunk order so first-seen ranking matches `run_streaming`.
pub fn run_tabular<A, S>(source: &S, k: usize, chunk_rows: usize) -> Result<(A::Output, ScanSummary), SourceError>
where
    A: PostAggregator,
    S: PostSource + ?Sized,
{
    let table = source.load_table()?;
    let parts: Vec<(A, ScanSummary)> = table
        .par_chunks(chunk_rows.max(1))
        .map(|chunk| {
            let mut agg = A::default();
            let mut summary = ScanSummary::default();
            for (line, row) in chunk {
                visit_row(&mut summary, A::WARN_ON_SKIP, *line, row, |p| agg.ingest(p));
            }
            (agg, summary)
        })
        .collect();

    let mut total = A::default();
    let mut summary = ScanSummary::default();
    for (agg, s) in parts {
        total.merge(agg);
        summary.merge(s);
    }
    Ok((total.finish(k), summary))
}
