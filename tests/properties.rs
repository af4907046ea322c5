#[path = "common/mod.rs"]
mod common;

use common::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tweetstats::{post_day, PostStats, SourceError, Strategy};

const USERS: [&str; 7] = ["ana", "ben", "cy", "dee", "eli", "fay", "gus"];
const EMOJIS: [&str; 6] = ["🚜", "🙏", "💚", "🌾", "✊🏽", "🔥"];

/// Deterministic corpus large enough to spread across many tabular chunks,
/// with plenty of count ties between dates, authors, emojis and mentions.
fn generated_corpus(rows: usize) -> Vec<String> {
    let mut out = Vec::with_capacity(rows);
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    for i in 0..rows {
        // xorshift
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let day = 1 + (state % 14) as usize;
        let user = USERS[(state >> 8) as usize % USERS.len()];
        let emoji = EMOJIS[(state >> 16) as usize % EMOJIS.len()];
        let mentioned = USERS[(state >> 24) as usize % USERS.len()];
        if i % 97 == 0 {
            out.push("garbage {".to_string());
            continue;
        }
        let content = format!("{emoji} day {day} @{mentioned} {emoji}");
        out.push(tweet(&format!("2021-02-{day:02}T{:02}:00:00+00:00", i % 24), user, &content));
    }
    out
}

fn stats(path: &Path, strategy: Strategy) -> PostStats {
    PostStats::new().input(path).strategy(strategy).progress(false).chunk_rows(37)
}

/// Both strategies must produce identical ordered rankings, including ties.
#[test]
fn strategies_agree_on_generated_corpus() {
    let path = temp_dir().join("gen.json");
    write_lines(&path, &generated_corpus(2_000));

    let mem = stats(&path, Strategy::Memory);
    let tab = stats(&path, Strategy::Time);

    let (a, b) = (mem.top_date_authors(), tab.top_date_authors());
    assert_eq!(a.entries, b.entries);
    assert_eq!(a.summary.records, b.summary.records);
    assert_eq!(a.summary.skipped, b.summary.skipped);
    assert_eq!(a.entries.len(), 10);

    assert_eq!(mem.top_emojis().entries, tab.top_emojis().entries);
    assert_eq!(mem.top_mentions().entries, tab.top_mentions().entries);
    assert_eq!(mem.top_dates().entries, tab.top_dates().entries);
}

/// Running the same statistic twice over an unchanged file is idempotent.
#[test]
fn repeated_runs_are_identical() {
    let path = temp_dir().join("gen.json");
    write_lines(&path, &generated_corpus(500));
    for strategy in [Strategy::Memory, Strategy::Time] {
        let s = stats(&path, strategy);
        assert_eq!(s.top_date_authors().entries, s.top_date_authors().entries);
        assert_eq!(s.top_emojis().entries, s.top_emojis().entries);
        assert_eq!(s.top_mentions().entries, s.top_mentions().entries);
    }
}

/// Every returned date occurs in the input and every returned author posted that day;
/// rankings are bounded by k, descending, and never exceed the observed totals.
#[test]
fn rankings_are_grounded_in_input() {
    let lines = generated_corpus(800);
    let path = temp_dir().join("gen.json");
    write_lines(&path, &lines);

    let mut posted: HashMap<time::Date, HashSet<String>> = HashMap::new();
    let mut total_mentions = 0u64;
    for l in &lines {
        let Ok(v) = serde_json::from_str::<serde_json::Value>(l) else { continue };
        let day = post_day(v["date"].as_str().unwrap()).unwrap();
        posted.entry(day).or_default().insert(v["user"]["username"].as_str().unwrap().to_string());
        total_mentions += v["content"].as_str().unwrap().matches('@').count() as u64;
    }

    let s = stats(&path, Strategy::Memory);
    for e in s.top_date_authors().entries {
        assert!(posted[&e.date].contains(&e.author), "{} never posted on {}", e.author, e.date);
    }

    let mentions = s.top_mentions().entries;
    assert!(mentions.len() <= 10);
    assert!(mentions.windows(2).all(|w| w[0].count >= w[1].count));
    assert!(mentions.iter().map(|e| e.count).sum::<u64>() <= total_mentions);
}

/// A missing input is reported, not raised: empty entries plus `SourceError::NotFound`,
/// independently for each statistic.
#[test]
fn missing_source_is_reported() {
    let path = temp_dir().join("does_not_exist.json");
    for strategy in [Strategy::Memory, Strategy::Time] {
        let s = stats(&path, strategy);

        let dates = s.top_date_authors();
        assert!(!dates.is_ok());
        assert!(dates.entries.is_empty());
        assert!(matches!(dates.error, Some(SourceError::NotFound { .. })));

        let emojis = s.top_emojis();
        assert!(matches!(emojis.into_result(), Err(SourceError::NotFound { .. })));
        assert!(s.top_mentions().entries.is_empty());
    }
}

/// A `.zst` cut off mid-frame fails the read partway through: the rows decoded
/// before the cut are discarded and the failure is `SourceError::Io`.
#[test]
fn truncated_zstd_is_an_io_failure() {
    let path = temp_dir().join("cut.json.zst");
    write_zst_lines(&path, &generated_corpus(2_000));
    let len = std::fs::metadata(&path).unwrap().len();
    std::fs::OpenOptions::new().write(true).open(&path).unwrap().set_len(len / 2).unwrap();

    for strategy in [Strategy::Memory, Strategy::Time] {
        let s = stats(&path, strategy);

        let dates = s.top_date_authors();
        assert!(dates.entries.is_empty());
        assert!(matches!(dates.error, Some(SourceError::Io { .. })), "strategy {strategy}: {:?}", dates.error);

        let mentions = s.top_mentions();
        assert!(mentions.entries.is_empty());
        assert!(matches!(mentions.into_result(), Err(SourceError::Io { .. })));
    }
}

/// Skipping is counted consistently: every 97th generated row is garbage.
#[test]
fn garbage_rows_are_counted() {
    let path = temp_dir().join("gen.json");
    write_lines(&path, &generated_corpus(300));
    let report = stats(&path, Strategy::Time).top_emojis();
    assert_eq!(report.summary.records, 300);
    assert_eq!(report.summary.skipped, 4); // rows 0, 97, 194, 291
}
