//! Progress reporting: a byte-based bar over the on-disk input size.

use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub fn make_progress_bar_labeled(total_bytes: u64, label: Option<&str>) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {msg} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {bytes_per_sec}  elapsed: {elapsed_precise}  eta: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    if let Some(msg) = label {
        pb.set_message(msg.to_string());
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Bar sized to the file on disk, or `None` when progress is disabled.
pub fn progress_for_file(path: &Path, enabled: bool, label: Option<&str>) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let total = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    Some(make_progress_bar_labeled(total, label))
}
