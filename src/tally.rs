//! Running totals for each reducer. Every total only grows; ratios with a zero
//! denominator are defined as zero.

use crate::csv_words::CsvFileStats;
use crate::jsonl_words::JsonlFileStats;
use crate::store::ObjectMeta;
use std::fmt;

/// `part / whole * 100`, or 0 unless `whole` is positive.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeTotals {
    pub objects: u64,
    pub bytes: u64,
}

impl SizeTotals {
    pub fn add(&mut self, obj: &ObjectMeta) {
        self.objects += 1;
        self.bytes = self.bytes.saturating_add(obj.size);
    }

    pub fn gib(&self) -> f64 {
        self.bytes as f64 / BYTES_PER_GIB
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HebrewTotals {
    pub files: u64,
    pub hebrew_words: u64,
    pub declared_words: f64,
    pub rows_missing_n_words: u64,
}

impl HebrewTotals {
    pub fn add(&mut self, file: &CsvFileStats) {
        self.files += 1;
        self.hebrew_words += file.hebrew_words;
        self.declared_words += file.declared_words;
        self.rows_missing_n_words += file.missing_n_words;
    }

    pub fn percentage(&self) -> f64 {
        percentage(self.hebrew_words as f64, self.declared_words)
    }
}

/// Why one object was skipped by a fault-isolating reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectFault {
    pub key: String,
    pub reason: String,
}

impl fmt::Display for ObjectFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error processing {}: {}", self.key, self.reason)
    }
}

/// Result of processing one object in the JSONL word reducer.
pub type ObjectOutcome = std::result::Result<JsonlFileStats, ObjectFault>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordTotals {
    pub files: u64,
    pub records: u64,
    pub skipped_lines: u64,
    pub words: u64,
    pub faults: Vec<ObjectFault>,
}

impl WordTotals {
    /// Fold one object's outcome in. Faults leave the counters untouched.
    pub fn add(&mut self, outcome: ObjectOutcome) {
        match outcome {
            Ok(stats) => {
                self.files += 1;
                self.records += stats.records;
                self.skipped_lines += stats.skipped;
                self.words += stats.words;
            }
            Err(fault) => self.faults.push(fault),
        }
    }
}
