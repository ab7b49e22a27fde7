//! Hebrew word ratio over CSV bodies with `text` and `n_words` columns.

use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use std::io::Read;
use std::sync::OnceLock;

pub const TEXT_COLUMN: &str = "text";
pub const N_WORDS_COLUMN: &str = "n_words";

fn hebrew_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\x{0590}-\x{05FF}]+").expect("hebrew block pattern"))
}

/// Number of maximal runs of Hebrew-block code points (U+0590..=U+05FF).
pub fn hebrew_word_count(text: &str) -> u64 {
    hebrew_run().find_iter(text).count() as u64
}

/// Parse one `n_words` cell as a number. Any finite value counts, fractional and
/// negative ones included; blanks, `NaN` and non-numeric text are missing.
pub fn parse_word_count(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CsvFileStats {
    pub rows: u64,
    pub hebrew_words: u64,
    /// Plain sum of every numeric `n_words` cell.
    pub declared_words: f64,
    pub missing_n_words: u64, // rows whose n_words was blank or non-numeric
}

impl CsvFileStats {
    pub fn percentage(&self) -> f64 {
        crate::tally::percentage(self.hebrew_words as f64, self.declared_words)
    }
}

fn column(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| anyhow!("missing `{}` column (header: {:?})", name, headers.iter().collect::<Vec<_>>()))
}

/// Decode a CSV body with a header row and tally one file.
///
/// Text cells are joined by single spaces before matching, so a run never spans
/// two cells; counting cell by cell gives the same total.
pub fn decode_csv(reader: impl Read) -> Result<CsvFileStats> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers().context("read CSV header")?.clone();
    let text_idx = column(&headers, TEXT_COLUMN)?;
    let n_idx = column(&headers, N_WORDS_COLUMN)?;

    let mut stats = CsvFileStats::default();
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record).context("read CSV row")? {
        stats.rows += 1;
        if let Some(text) = record.get(text_idx) {
            stats.hebrew_words += hebrew_word_count(text);
        }
        match record.get(n_idx).and_then(parse_word_count) {
            Some(n) => stats.declared_words += n,
            None => stats.missing_n_words += 1,
        }
    }
    Ok(stats)
}
