//! Emoji frequency: every code point above the Basic Multilingual Plane is
//! counted as one emoji. This is a range test, not an emoji-property lookup,
//! so it also counts e.g. supplementary CJK ideographs and misses BMP symbols
//! such as U+2764.

use crate::aggregate::{run_streaming, PostAggregator};
use crate::counting::{RankedEntry, TopKFrequencyCounter};
use crate::error::MalformedReason;
use crate::record::PostRecord;

const SUPPLEMENTARY_START: u32 = 0x1_0000;

#[inline]
pub fn is_emoji(c: char) -> bool {
    c as u32 >= SUPPLEMENTARY_START
}

/// Emoji occurrences in `text`, in order, repeats included.
pub fn emojis_in(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| is_emoji(*c))
}

#[derive(Default)]
pub struct EmojiFrequencyAggregator {
    counts: TopKFrequencyCounter<char>,
}

impl PostAggregator for EmojiFrequencyAggregator {
    type Output = Vec<RankedEntry<char>>;
    const WARN_ON_SKIP: bool = false;

    fn ingest(&mut self, post: &PostRecord) -> Result<(), MalformedReason> {
        self.counts.extend(emojis_in(post.text()));
        Ok(())
    }

    fn merge(&mut self, other: Self) {
        self.counts.merge(other.counts);
    }

    fn finish(self, k: usize) -> Self::Output {
        self.counts.into_top_k(k)
    }
}

/// Top `k` emojis over in-memory posts.
pub fn compute_top_emojis(posts: &[PostRecord], k: usize) -> Vec<RankedEntry<char>> {
    run_streaming::<EmojiFrequencyAggregator, _>(posts, k).map(|(v, _)| v).unwrap_or_default()
}
