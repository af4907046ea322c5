//! NDJSON input: plain or zstd-compressed files, read line by line with
//! compressed-byte progress, and the bulk loader used by the tabular strategy.

use crate::error::SourceError;
use crate::progress::progress_for_file;
use crate::record::{parse_post, PostResult};
use crate::source::PostSource;
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use zstd::stream::read::Decoder;

/// A `Read` wrapper that counts on-disk bytes read.
struct CountingReader<R: Read> {
    inner: R,
    counter: Arc<AtomicU64>,
}
impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.counter.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

fn is_zstd(path: &Path) -> bool {
    path.extension().map(|e| e.eq_ignore_ascii_case("zst")).unwrap_or(false)
}

/// Minimal NDJSON reader with buffering, transparent zstd and CRLF trimming.
pub struct NdjsonReader {
    rdr: Box<dyn BufRead>,
    read_bytes: Arc<AtomicU64>,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = File::open(path)?;
        let read_bytes = Arc::new(AtomicU64::new(0));
        let counted = CountingReader { inner: f, counter: read_bytes.clone() };
        let cap = buf_bytes.max(8 * 1024);
        let rdr: Box<dyn BufRead> = if is_zstd(path) {
            // Large frames need a wide window; without it decoding fails up front.
            let mut dec = Decoder::new(counted)?;
            dec.window_log_max(31)?;
            Box::new(BufReader::with_capacity(cap, dec))
        } else {
            Box::new(BufReader::with_capacity(cap, counted))
        };
        Ok(Self { rdr, read_bytes })
    }

    /// Read the next line into `buf` as raw bytes. Returns bytes consumed (0 on EOF).
    /// Strips trailing `\r?\n`.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_until(b'\n', buf)?;
        if n == 0 { return Ok(0); }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") { buf.pop(); }
        }
        Ok(n)
    }

    /// On-disk bytes consumed so far (compressed size for `.zst`).
    pub fn bytes_read(&self) -> u64 {
        self.read_bytes.load(Ordering::Relaxed)
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}

/// Stream every non-blank line with its 1-based line number, calling
/// `on_progress(delta_bytes)` as the underlying file is consumed.
pub fn for_each_line(
    path: &Path,
    read_buf_bytes: usize,
    mut on_progress: impl FnMut(u64),
    mut on_line: impl FnMut(u64, &[u8]),
) -> io::Result<()> {
    let mut reader = NdjsonReader::open(path, read_buf_bytes)?;
    let mut buf = Vec::with_capacity(16 * 1024);
    let mut line_no = 0u64;
    let mut last = 0u64;
    loop {
        let n = reader.read_line(&mut buf)?;
        let cur = reader.bytes_read();
        if cur > last {
            on_progress(cur - last);
            last = cur;
        }
        if n == 0 { break; }
        line_no += 1;
        if is_blank(&buf) { continue; }
        on_line(line_no, &buf);
    }
    Ok(())
}

/// Post source backed by an NDJSON file on disk.
#[derive(Clone, Debug)]
pub struct NdjsonSource {
    path: PathBuf,
    read_buf_bytes: usize,
    progress: bool,
    label: Option<String>,
}

impl NdjsonSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), read_buf_bytes: 256 * 1024, progress: false, label: None }
    }
    pub fn read_buffer(mut self, bytes: usize) -> Self { self.read_buf_bytes = bytes.max(8 * 1024); self }
    pub fn progress(mut self, yes: bool) -> Self { self.progress = yes; self }
    pub fn progress_label(mut self, label: Option<String>) -> Self { self.label = label; self }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn scan(&self, on_line: impl FnMut(u64, &[u8])) -> Result<(), SourceError> {
        let pb = progress_for_file(&self.path, self.progress, self.label.as_deref());
        let res = for_each_line(
            &self.path,
            self.read_buf_bytes,
            |delta| { if let Some(pb) = &pb { pb.inc(delta); } },
            on_line,
        );
        if let Some(pb) = pb { pb.finish_and_clear(); }
        res.map_err(|e| SourceError::io(&self.path, e))
    }
}

impl PostSource for NdjsonSource {
    fn for_each_post(&self, on_post: &mut dyn FnMut(u64, PostResult)) -> Result<(), SourceError> {
        self.scan(|line_no, line| on_post(line_no, parse_post(line_no, line)))
    }

    /// Read all raw lines first, then decode them in parallel; rayon's ordered
    /// collect keeps rows in file order.
    fn load_table(&self) -> Result<Vec<(u64, PostResult)>, SourceError> {
        let mut raw: Vec<(u64, Vec<u8>)> = Vec::new();
        self.scan(|line_no, line| raw.push((line_no, line.to_vec())))?;
        Ok(raw.par_iter().map(|(n, line)| (*n, parse_post(*n, line))).collect())
    }
}
