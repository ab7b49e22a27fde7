//! Word counting over line-delimited JSON bodies: malformed lines are skipped,
//! a failing object becomes an `ObjectFault` instead of aborting the run.

use crate::lines::{for_each_line, open_decoded};
use crate::record::TextRecord;
use crate::store::ObjectStore;
use crate::tally::{ObjectFault, ObjectOutcome};
use anyhow::Result;
use serde_json::Value;
use std::io::BufRead;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonlFileStats {
    pub lines: u64,
    pub records: u64,
    pub skipped: u64, // lines that did not parse as JSON (blank lines included)
    pub words: u64,
}

/// Count words across every line of an already-decoded body.
pub fn count_words_in_reader<S: AsRef<str>>(reader: impl BufRead, fields: &[S]) -> Result<JsonlFileStats> {
    let mut stats = JsonlFileStats::default();
    let lines = for_each_line(reader, |line| {
        match serde_json::from_str::<Value>(line.trim()) {
            Ok(v) => {
                stats.records += 1;
                stats.words += TextRecord::from(v).word_count(fields);
            }
            Err(_) => stats.skipped += 1,
        }
        Ok(())
    })?;
    stats.lines = lines;
    Ok(stats)
}

/// Fetch, decompress and count one object. Any failure is returned as a fault
/// naming the key.
pub fn count_words_in_object<S: AsRef<str>>(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    fields: &[S],
    read_buf_bytes: usize,
) -> ObjectOutcome {
    let attempt = || -> Result<JsonlFileStats> {
        let body = store.fetch(bucket, key)?;
        let reader = open_decoded(key, body, read_buf_bytes)?;
        count_words_in_reader(reader, fields)
    };
    match attempt() {
        Ok(stats) => {
            if stats.skipped > 0 {
                tracing::debug!(key, skipped = stats.skipped, "skipped unparseable lines");
            }
            Ok(stats)
        }
        Err(e) => Err(ObjectFault { key: key.to_string(), reason: format!("{:#}", e) }),
    }
}
