use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Execution strategy. Both produce identical rankings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Stream the input line by line; memory is bounded by the number of distinct keys.
    #[default]
    Memory,
    /// Load every line, then decode and count row chunks in parallel.
    Time,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Memory => f.write_str("memory"),
            Strategy::Time => f.write_str("time"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" | "streaming" => Ok(Strategy::Memory),
            "time" | "tabular" => Ok(Strategy::Time),
            other => Err(format!("unknown strategy {other:?} (expected memory|time)")),
        }
    }
}

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct StatsOptions {
    pub input: PathBuf,
    pub top_k: usize,
    pub strategy: Strategy,
    pub parallelism: Option<usize>,     // Some(N) to set rayon threads, None to use default
    pub chunk_rows: usize,              // rows per parallel chunk in the tabular strategy
    pub progress: bool,                 // show progress bar
    pub progress_label: Option<String>, // optional label for progress bar

    // IO tuning
    pub read_buffer_bytes: usize, // BufReader capacity
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from("farmers-protest-tweets-2021-2-4.json"),
            top_k: 10,
            strategy: Strategy::Memory,
            parallelism: None,
            chunk_rows: 64 * 1024,
            progress: true,
            progress_label: None,
            read_buffer_bytes: 256 * 1024,
        }
    }
}

impl StatsOptions {
    pub fn with_input(mut self, path: impl AsRef<Path>) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
    pub fn with_parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }
    pub fn with_chunk_rows(mut self, rows: usize) -> Self {
        self.chunk_rows = rows.max(1);
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}
