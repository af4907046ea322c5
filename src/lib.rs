mod config;
mod date;
mod error;
mod record;
mod source;
mod ndjson;
mod progress;
mod util;

mod counting;
mod aggregate;
mod date_activity;
mod emoji;
mod mentions;
mod pipeline;

pub use crate::config::{StatsOptions, Strategy};
pub use crate::error::{MalformedReason, MalformedRecord, SourceError};
pub use crate::record::{parse_post, PostRecord, PostResult, UserRef};
pub use crate::pipeline::{PostStats, Report};

// Counting core and the two execution strategies.
pub use crate::counting::{RankedEntry, TopKFrequencyCounter};
pub use crate::aggregate::{run_streaming, run_tabular, PostAggregator, ScanSummary};

// The three statistics, usable directly over in-memory posts.
pub use crate::date_activity::{
    compute_top_date_authors, compute_top_dates, top_date_authors_streaming, DateActivityAggregator,
    DateAuthorEntry, DateCounts,
};
pub use crate::emoji::{compute_top_emojis, emojis_in, is_emoji, EmojiFrequencyAggregator};
pub use crate::mentions::{compute_top_mentions, mentions_in, MentionFrequencyAggregator};

// Input plumbing.
pub use crate::source::PostSource;
pub use crate::ndjson::{for_each_line, NdjsonReader, NdjsonSource};
pub use crate::date::{format_day, post_day};
pub use crate::util::init_tracing_once;
