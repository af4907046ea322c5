use crate::aggregate::{run_streaming, run_tabular, PostAggregator, ScanSummary};
use crate::config::{StatsOptions, Strategy};
use crate::counting::RankedEntry;
use crate::date_activity::{top_date_authors_streaming, DateActivityAggregator, DateAuthorEntry, DateCounts};
use crate::emoji::EmojiFrequencyAggregator;
use crate::error::SourceError;
use crate::mentions::MentionFrequencyAggregator;
use crate::ndjson::NdjsonSource;
use crate::util::{configure_parallelism, init_tracing_once};
use std::path::Path;
use std::time::Instant;
use time::Date;

/// Outcome of one statistic over one input.
///
/// A source failure never panics or propagates: `entries` is empty and the
/// failure sits in `error`. Skipped rows are only counted in `summary`.
#[derive(Debug)]
pub struct Report<T> {
    pub entries: Vec<T>,
    pub summary: ScanSummary,
    pub error: Option<SourceError>,
}

impl<T> Report<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Vec<T>, SourceError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.entries),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PostStats {
    pub(crate) opts: StatsOptions,
}

impl PostStats {
    pub fn new() -> Self {
        Self { opts: StatsOptions::default() }
    }

    pub fn from_options(opts: StatsOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &StatsOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn input(mut self, path: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input(path); self }
    pub fn top_k(mut self, k: usize) -> Self { self.opts = self.opts.with_top_k(k); self }
    pub fn strategy(mut self, strategy: Strategy) -> Self { self.opts = self.opts.with_strategy(strategy); self }
    pub fn parallelism(mut self, threads: usize) -> Self { self.opts = self.opts.with_parallelism(threads); self }
    pub fn chunk_rows(mut self, rows: usize) -> Self { self.opts = self.opts.with_chunk_rows(rows); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }

    // -------- Statistics --------

    /// The busiest dates, each with its most active author.
    pub fn top_date_authors(&self) -> Report<DateAuthorEntry> {
        self.run("top_date_authors", |src| match self.opts.strategy {
            Strategy::Memory => top_date_authors_streaming(src, self.opts.top_k),
            Strategy::Time => self.execute::<DateActivityAggregator>(src),
        })
    }

    /// The busiest dates with their post counts.
    pub fn top_dates(&self) -> Report<RankedEntry<Date>> {
        self.run("top_dates", |src| self.execute::<DateCounts>(src))
    }

    pub fn top_emojis(&self) -> Report<RankedEntry<char>> {
        self.run("top_emojis", |src| self.execute::<EmojiFrequencyAggregator>(src))
    }

    pub fn top_mentions(&self) -> Report<RankedEntry<String>> {
        self.run("top_mentions", |src| self.execute::<MentionFrequencyAggregator>(src))
    }

    pub(crate) fn source(&self) -> NdjsonSource {
        NdjsonSource::new(&self.opts.input)
            .read_buffer(self.opts.read_buffer_bytes)
            .progress(self.opts.progress)
            .progress_label(self.opts.progress_label.clone())
    }

    fn execute<A: PostAggregator>(&self, src: &NdjsonSource) -> Result<(A::Output, ScanSummary), SourceError> {
        match self.opts.strategy {
            Strategy::Memory => run_streaming::<A, _>(src, self.opts.top_k),
            Strategy::Time => run_tabular::<A, _>(src, self.opts.top_k, self.opts.chunk_rows),
        }
    }

    fn run<T>(
        &self,
        what: &'static str,
        f: impl FnOnce(&NdjsonSource) -> Result<(Vec<T>, ScanSummary), SourceError>,
    ) -> Report<T> {
        init_tracing_once();
        configure_parallelism(self.opts.parallelism);

        let src = self.source();
        let started = Instant::now();
        match f(&src) {
            Ok((entries, mut summary)) => {
                summary.elapsed = started.elapsed();
                tracing::info!(
                    stat = what,
                    strategy = %self.opts.strategy,
                    records = summary.records,
                    skipped = summary.skipped,
                    elapsed_ms = summary.elapsed.as_millis() as u64,
                    "computed {} entries",
                    entries.len()
                );
                Report { entries, summary, error: None }
            }
            Err(e) => {
                tracing::error!(stat = what, error = %e, "input unavailable; returning no entries");
                let summary = ScanSummary { elapsed: started.elapsed(), ..ScanSummary::default() };
                Report { entries: Vec::new(), summary, error: Some(e) }
            }
        }
    }
}
