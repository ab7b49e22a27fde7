//! Body decoding by key suffix and line-by-line streaming.

use anyhow::Result;
use flate2::read::MultiGzDecoder;
use std::io::{BufRead, BufReader, Read};
use zstd::stream::read::Decoder as ZstdDecoder;

/// Body compression, decided from the object key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zstd,
    Plain,
}

impl Compression {
    pub fn from_key(key: &str) -> Self {
        if key.ends_with(".gz") {
            Compression::Gzip
        } else if key.ends_with(".zst") || key.ends_with(".zstd") {
            Compression::Zstd
        } else {
            Compression::Plain
        }
    }
}

/// Wrap a raw object body in the decoder its key calls for.
///
/// Gzip uses the multi-member decoder so concatenated `.gz` parts decode fully.
/// Zstd asks for `window_log_max(31)` up front to avoid "Frame requires too much
/// memory" on large frames.
pub fn open_decoded(key: &str, body: Box<dyn Read>, read_buf_bytes: usize) -> Result<Box<dyn BufRead>> {
    let cap = read_buf_bytes.max(8 * 1024);
    let reader: Box<dyn BufRead> = match Compression::from_key(key) {
        Compression::Gzip => Box::new(BufReader::with_capacity(cap, MultiGzDecoder::new(body))),
        Compression::Zstd => {
            let mut decoder = ZstdDecoder::new(body)?;
            decoder.window_log_max(31)?;
            Box::new(BufReader::with_capacity(cap, decoder))
        }
        Compression::Plain => Box::new(BufReader::with_capacity(cap, body)),
    };
    Ok(reader)
}

/// Stream `reader` line by line; call `on_line` with the line minus its `\r?\n`.
/// Returns the number of lines seen. Decode and UTF-8 errors abort the stream.
pub fn for_each_line(mut reader: impl BufRead, mut on_line: impl FnMut(&str) -> Result<()>) -> Result<u64> {
    let mut buf = String::with_capacity(16 * 1024);
    let mut lines = 0u64;
    loop {
        buf.clear();
        let n = reader.read_line(&mut buf)?;
        if n == 0 {
            break;
        }
        if buf.ends_with('\n') {
            let _ = buf.pop();
            if buf.ends_with('\r') { let _ = buf.pop(); }
        }
        lines += 1;
        on_line(&buf)?;
    }
    Ok(lines)
}
