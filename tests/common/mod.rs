#![allow(dead_code)]

use serde_json::json;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write plain NDJSON lines (each line is written verbatim plus `\n`).
pub fn write_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for l in lines {
        writeln!(&mut f, "{}", l).unwrap();
    }
}

/// Write a compressed `.zst` file containing the provided lines.
pub fn write_zst_lines(path: &Path, lines: &[String]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// One post line shaped like the scraped tweet dumps (extra fields included).
pub fn tweet(date: &str, username: &str, content: &str) -> String {
    json!({
        "url": "https://twitter.com/x/status/1",
        "date": date,
        "content": content,
        "renderedContent": content,
        "id": 1,
        "user": { "username": username, "displayname": username, "followersCount": 10 },
        "replyCount": 0, "retweetCount": 0, "likeCount": 0, "quoteCount": 0,
        "lang": "en"
    })
    .to_string()
}

/// A fresh temp directory that outlives the returned path.
pub fn temp_dir() -> PathBuf {
    tempfile::tempdir().unwrap().into_path()
}

/// Build a small corpus with:
/// - 2021-02-12: 4 posts (ana ×2, ben, cy), ties broken by first poster
/// - 2021-02-13: 4 posts (ben ×2, ana ×2) — ben posts first that day
/// - 2021-02-14: 2 posts (cy ×2)
/// - 2021-02-15: 1 post (dee)
/// - one non-JSON noise line and one record without a username
///
/// Emojis: 🚜 ×4, 🙏 ×4 (🚜 first), 🇮🇳 (two regional indicators) ×1.
/// Mentions: @narendramodi ×3, @rihanna ×2, @GretaThunberg ×1.
pub fn corpus_lines() -> Vec<String> {
    vec![
        tweet("2021-02-12T10:00:00+00:00", "ana", "Support farmers 🚜🙏 @narendramodi"),
        tweet("2021-02-12T10:05:00+00:00", "ben", "@rihanna thank you 🙏"),
        tweet("2021-02-12T11:00:00+00:00", "ana", "🚜🚜 #FarmersProtest"),
        "this line is not json".to_string(),
        tweet("2021-02-12T12:00:00+00:00", "cy", "hello @narendramodi"),
        tweet("2021-02-13T09:00:00+00:00", "ben", "🇮🇳 @GretaThunberg"),
        tweet("2021-02-13T09:30:00+00:00", "ana", "@rihanna 🙏"),
        tweet("2021-02-13T10:00:00+00:00", "ben", "again"),
        tweet("2021-02-13T10:30:00+00:00", "ana", "🚜"),
        json!({ "date": "2021-02-14T00:00:00+00:00", "content": "@narendramodi 🙏", "user": {} }).to_string(),
        tweet("2021-02-14T08:00:00+00:00", "cy", "quiet"),
        tweet("2021-02-14T09:00:00+00:00", "cy", "still quiet"),
        tweet("2021-02-15T23:59:59+00:00", "dee", "late"),
    ]
}

pub fn make_corpus() -> PathBuf {
    let base = temp_dir();
    let path = base.join("tweets.json");
    write_lines(&path, &corpus_lines());
    path
}
