//! Console formatting for progress lines and final summaries.

use crate::csv_words::CsvFileStats;
use crate::tally::{HebrewTotals, SizeTotals, WordTotals};
use std::io::{self, Write};

/// `1234567` -> `"1,234,567"`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Thousands-grouped form of a possibly fractional, possibly negative sum:
/// `1234.5` -> `"1,234.5"`, `-2000.0` -> `"-2,000"`.
pub fn thousands_f64(n: f64) -> String {
    let abs = n.abs();
    let whole = abs.trunc();
    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }
    out.push_str(&thousands(whole as u64));
    if abs > whole {
        let full = abs.to_string();
        if let Some(dot) = full.find('.') {
            out.push_str(&full[dot..]);
        }
    }
    out
}

pub fn size_summary(t: &SizeTotals) -> String {
    format!("Size: {:.2} GB ({} objects)", t.gib(), thousands(t.objects))
}

pub fn write_size_summary(w: &mut dyn Write, t: &SizeTotals) -> io::Result<()> {
    writeln!(w, "{}", size_summary(t))
}

pub fn csv_files_found(n: usize) -> String {
    format!("Found {} CSV files", n)
}

/// Per-file block printed while the Hebrew reducer runs.
pub fn hebrew_file_lines(index: usize, total: usize, key: &str, s: &CsvFileStats) -> Vec<String> {
    vec![
        format!("Processing file {}/{}: {}", index, total, key),
        format!("  Hebrew words: {}", s.hebrew_words),
        format!("  Total words: {}", s.declared_words),
        format!("  Hebrew percentage: {:.2}%", s.percentage()),
    ]
}

pub fn write_hebrew_summary(w: &mut dyn Write, t: &HebrewTotals) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "Total Hebrew words across all files: {}", thousands(t.hebrew_words))?;
    writeln!(w, "Total words across all files: {}", thousands_f64(t.declared_words))?;
    writeln!(w, "Overall Hebrew percentage: {:.2}%", t.percentage())
}

pub fn write_word_summary(w: &mut dyn Write, t: &WordTotals) -> io::Result<()> {
    writeln!(w, "Total words: {}", thousands(t.words))?;
    if !t.faults.is_empty() {
        writeln!(w, "Failed objects: {}", thousands(t.faults.len() as u64))?;
    }
    Ok(())
}
