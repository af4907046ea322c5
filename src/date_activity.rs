//! Busiest dates and, for each, the author who posted most that day.
//!
//! Two executions share the same row rules (a row needs a parseable `date`
//! and a `user.username`):
//!  - streaming: pass 1 counts posts per date, pass 2 counts authors only for
//!    the selected dates;
//!  - tabular: one grouped pass keeping a per-date author table for every date.

use crate::aggregate::{run_streaming, visit_row, PostAggregator, ScanSummary};
use crate::counting::{RankedEntry, TopKFrequencyCounter};
use crate::date::{post_day, serialize_day};
use crate::error::{MalformedReason, SourceError};
use crate::record::PostRecord;
use crate::source::PostSource;
use ahash::AHashMap;
use serde::Serialize;
use time::Date;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateAuthorEntry {
    #[serde(serialize_with = "serialize_day")]
    pub date: Date,
    pub author: String,
}

/// The grouping keys of a row, or why the row is unusable.
pub fn date_and_author(post: &PostRecord) -> Result<(Date, &str), MalformedReason> {
    let raw = post.date.as_deref().ok_or(MalformedReason::MissingField("date"))?;
    let author = post.username().ok_or(MalformedReason::MissingField("user.username"))?;
    let day = post_day(raw).ok_or_else(|| MalformedReason::BadDate(raw.to_string()))?;
    Ok((day, author))
}

/// Pass-1 state: posts per date.
#[derive(Default)]
pub struct DateCounts {
    days: TopKFrequencyCounter<Date>,
}

impl PostAggregator for DateCounts {
    type Output = Vec<RankedEntry<Date>>;
    const WARN_ON_SKIP: bool = true;

    fn ingest(&mut self, post: &PostRecord) -> Result<(), MalformedReason> {
        let (day, _) = date_and_author(post)?;
        self.days.increment(day);
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        self.days.merge(other.days);
    }

    fn finish(self, k: usize) -> Self::Output {
        self.days.into_top_k(k)
    }
}

/// Grouped state: posts per date plus an author table per date.
#[derive(Default)]
pub struct DateActivityAggregator {
    days: TopKFrequencyCounter<Date>,
    authors: AHashMap<Date, TopKFrequencyCounter<String>>,
}

impl PostAggregator for DateActivityAggregator {
    type Output = Vec<DateAuthorEntry>;
    const WARN_ON_SKIP: bool = true;

    fn ingest(&mut self, post: &PostRecord) -> Result<(), MalformedReason> {
        let (day, author) = date_and_author(post)?;
        self.days.increment(day);
        self.authors.entry(day).or_default().increment(author.to_string());
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        self.days.merge(other.days);
        for (day, part) in other.authors {
            self.authors.entry(day).or_default().merge(part);
        }
    }

    fn finish(self, k: usize) -> Self::Output {
        let top = self.days.top_k(k);
        representatives(&top, &self.authors)
    }
}

fn representatives(
    top: &[RankedEntry<Date>],
    authors: &AHashMap<Date, TopKFrequencyCounter<String>>,
) -> Vec<DateAuthorEntry> {
    top.iter()
        .filter_map(|e| {
            let best = authors.get(&e.key).and_then(|a| a.most_frequent());
            // every counted date had an author on the same row
            debug_assert!(best.is_some(), "no author table for {}", e.key);
            best.map(|(author, _)| DateAuthorEntry { date: e.key, author: author.clone() })
        })
        .collect()
}

/// Two-pass streaming execution over `source`.
pub fn top_date_authors_streaming<S>(source: &S, k: usize) -> Result<(Vec<DateAuthorEntry>, ScanSummary), SourceError>
where
    S: PostSource + ?Sized,
{
    let (top, summary) = run_streaming::<DateCounts, _>(source, k)?;
    if top.is_empty() {
        return Ok((Vec::new(), summary));
    }

    let mut authors: AHashMap<Date, TopKFrequencyCounter<String>> =
        top.iter().map(|e| (e.key, TopKFrequencyCounter::new())).collect();

    // Rows skipped here were already reported by pass 1.
    let mut second = ScanSummary::default();
    source.for_each_post(&mut |line, row| {
        visit_row(&mut second, false, line, &row, |post| {
            let (day, author) = date_and_author(post)?;
            if let Some(table) = authors.get_mut(&day) {
                table.increment(author.to_string());
            }
            Ok(())
        });
    })?;

    if second.records != summary.records {
        tracing::warn!(first = summary.records, second = second.records, "input changed between passes");
    }
    Ok((representatives(&top, &authors), summary))
}

/// Top `k` dates with their most active author, over in-memory posts.
pub fn compute_top_date_authors(posts: &[PostRecord], k: usize) -> Vec<DateAuthorEntry> {
    top_date_authors_streaming(posts, k).map(|(v, _)| v).unwrap_or_default()
}

/// Top `k` dates by post count, over in-memory posts.
pub fn compute_top_dates(posts: &[PostRecord], k: usize) -> Vec<RankedEntry<Date>> {
    run_streaming::<DateCounts, _>(posts, k).map(|(v, _)| v).unwrap_or_default()
}
