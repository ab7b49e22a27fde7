//! The three reducers: list a prefix, decode each matching object in turn, fold into
//! running totals, then print the summary. Strictly sequential.

use crate::config::ScanOptions;
use crate::csv_words::decode_csv;
use crate::jsonl_words::count_words_in_object;
use crate::progress::ProgressScope;
use crate::report;
use crate::store::{ObjectListing, ObjectMeta, ObjectStore};
use crate::tally::{HebrewTotals, SizeTotals, WordTotals};
use crate::util::key_basename;
use anyhow::{Context, Result};
use std::io::Write;

#[derive(Clone, Debug)]
pub struct BucketStats {
    pub(crate) opts: ScanOptions,
}

impl Default for BucketStats {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl BucketStats {
    pub fn new(opts: ScanOptions) -> Self {
        Self { opts }
    }

    // -------- Builder methods --------
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self { self.opts = self.opts.with_bucket(bucket); self }
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self { self.opts = self.opts.with_prefix(prefix); self }
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self { self.opts = self.opts.with_suffix(suffix); self }
    pub fn any_suffix(mut self) -> Self { self.opts = self.opts.without_suffix(); self }
    pub fn text_fields<I, S>(mut self, fields: I) -> Self where I: IntoIterator<Item = S>, S: Into<String> { self.opts = self.opts.with_text_fields(fields); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }

    pub fn options(&self) -> &ScanOptions {
        &self.opts
    }

    fn listing<'a>(&self, store: &'a dyn ObjectStore) -> ObjectListing<'a> {
        ObjectListing::new(store, &self.opts.bucket, &self.opts.prefix).with_suffix(self.opts.suffix.as_deref())
    }

    /// Sum listed object sizes. Bodies are never fetched.
    pub fn total_size(&self, store: &dyn ObjectStore, out: &mut dyn Write) -> Result<SizeTotals> {
        let label = self.opts.progress_label.as_deref().or(Some("Size"));
        let scope = ProgressScope::new(out, 0, label, self.opts.progress);
        let mut totals = SizeTotals::default();
        for obj in self.listing(store) {
            let obj = obj.with_context(|| format!("listing s3://{}/{}", self.opts.bucket, self.opts.prefix))?;
            tracing::trace!(key = %obj.key, size = obj.size, "sized");
            totals.add(&obj);
            scope.grow(1);
            scope.inc(1);
        }
        tracing::info!(objects = totals.objects, bytes = totals.bytes, "size scan complete");
        let out = scope.finish();
        report::write_size_summary(out, &totals)?;
        Ok(totals)
    }

    /// Hebrew-word ratio over CSV objects. Any fetch or decode failure aborts the run.
    pub fn hebrew_ratio(&self, store: &dyn ObjectStore, out: &mut dyn Write) -> Result<HebrewTotals> {
        let files: Vec<ObjectMeta> = self
            .listing(store)
            .collect::<Result<_>>()
            .with_context(|| format!("listing s3://{}/{}", self.opts.bucket, self.opts.prefix))?;

        writeln!(out, "{}", report::csv_files_found(files.len()))?;
        if files.is_empty() {
            tracing::warn!(bucket = %self.opts.bucket, prefix = %self.opts.prefix, "no matching objects under prefix");
        }

        let label = self.opts.progress_label.as_deref().or(Some("Hebrew ratio"));
        let mut scope = ProgressScope::new(out, files.len() as u64, label, self.opts.progress);
        let mut totals = HebrewTotals::default();

        for (i, obj) in files.iter().enumerate() {
            let body = store.fetch(&self.opts.bucket, &obj.key)?;
            let stats = decode_csv(body).with_context(|| format!("decoding {}", obj.key))?;
            if stats.missing_n_words > 0 {
                tracing::warn!(
                    key = %obj.key,
                    rows = stats.missing_n_words,
                    "rows without a numeric n_words were counted as zero"
                );
            }
            totals.add(&stats);
            for line in report::hebrew_file_lines(i + 1, files.len(), &obj.key, &stats) {
                scope.println(&line)?;
            }
            scope.inc(1);
        }

        tracing::info!(files = totals.files, hebrew = totals.hebrew_words, declared = totals.declared_words, "hebrew ratio complete");
        let out = scope.finish();
        report::write_hebrew_summary(out, &totals)?;
        Ok(totals)
    }

    /// Whitespace word count over line-delimited JSON objects. A failing object is
    /// reported and skipped; listing failures still abort the run.
    pub fn word_count(&self, store: &dyn ObjectStore, out: &mut dyn Write) -> Result<WordTotals> {
        let label = self.opts.progress_label.as_deref().or(Some("Word count"));
        let mut scope = ProgressScope::new(out, 0, label, self.opts.progress);
        let mut totals = WordTotals::default();

        for obj in self.listing(store) {
            let obj = obj.with_context(|| format!("listing s3://{}/{}", self.opts.bucket, self.opts.prefix))?;
            scope.grow(1);
            let outcome = count_words_in_object(
                store,
                &self.opts.bucket,
                &obj.key,
                self.opts.text_fields.as_slice(),
                self.opts.read_buffer_bytes,
            );
            match &outcome {
                Ok(stats) => tracing::debug!(file = key_basename(&obj.key), words = stats.words, "counted"),
                Err(fault) => {
                    tracing::warn!(key = %fault.key, reason = %fault.reason, "object skipped");
                    scope.println(&fault.to_string())?;
                }
            }
            totals.add(outcome);
            scope.inc(1);
        }

        tracing::info!(files = totals.files, failed = totals.faults.len(), words = totals.words, "word count complete");
        let out = scope.finish();
        report::write_word_summary(out, &totals)?;
        Ok(totals)
    }
}
