use crate::aggregate::{run_streaming, PostAggregator};
use crate::counting::{RankedEntry, TopKFrequencyCounter};
use crate::error::MalformedReason;
use crate::record::PostRecord;
use regex::Regex;
use std::sync::OnceLock;

/// `@` followed by one or more letters, digits or underscores; the handle is group 1.
/// Narrower than regex's Unicode `\w`, which also takes combining marks and
/// connector punctuation such as U+203F.
static MENTION_RE: OnceLock<Regex> = OnceLock::new();

fn mention_re() -> &'static Regex {
    MENTION_RE.get_or_init(|| Regex::new(r"@([\p{L}\p{N}_]+)").expect("mention pattern is valid"))
}

/// Handles mentioned in `text`, in order, without the `@`. Case is preserved.
pub fn mentions_in(text: &str) -> impl Iterator<Item = &str> + '_ {
    mention_re().captures_iter(text).filter_map(|c| c.get(1)).map(|m| m.as_str())
}

#[derive(Default)]
pub struct MentionFrequencyAggregator {
    counts: TopKFrequencyCounter<String>,
}

impl PostAggregator for MentionFrequencyAggregator {
    type Output = Vec<RankedEntry<String>>;
    const WARN_ON_SKIP: bool = false;

    fn ingest(&mut self, post: &PostRecord) -> Result<(), MalformedReason> {
        for handle in mentions_in(post.text()) {
            self.counts.increment(handle.to_string());
        }
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        self.counts.merge(other.counts);
    }

    fn finish(self, k: usize) -> Self::Output {
        self.counts.into_top_k(k)
    }
}

/// Top `k` mentioned handles over in-memory posts.
pub fn compute_top_mentions(posts: &[PostRecord], k: usize) -> Vec<RankedEntry<String>> {
    run_streaming::<MentionFrequencyAggregator, _>(posts, k).map(|(v, _)| v).unwrap_or_default()
}
