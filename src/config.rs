//! Scan options and the default bucket, prefix and suffix for each reducer.

use crate::record::DEFAULT_TEXT_FIELDS;

/// Bucket and prefix scanned by the size reducer when none are given.
pub const SIZE_BUCKET: &str = "gepeta-datasets";
pub const SIZE_PREFIX: &str = "processed_cleaned_filtered/run_5_files";

/// Bucket and prefix scanned by the Hebrew CSV reducer when none are given.
pub const HEBREW_BUCKET: &str = "israllm-datasets";
pub const HEBREW_PREFIX: &str = "raw-datasets/Yifat4+5/csv_output/";

/// Bucket and prefix scanned by the JSONL word reducer when none are given.
pub const WORDS_BUCKET: &str = "gepeta-datasets";
pub const WORDS_PREFIX: &str = "processed_cleaned_filtered/run_5_files";

pub const CSV_SUFFIX: &str = ".csv";
pub const JSONL_GZ_SUFFIX: &str = ".jsonl.gz";

/// Options for one scan over a bucket prefix, with builder chaining.
#[derive(Clone, Debug)]
pub struct ScanOptions {
    pub bucket: String,
    pub prefix: String,
    pub suffix: Option<String>,       // only keys ending with this are processed
    pub text_fields: Vec<String>,     // JSONL text extraction priority
    pub progress: bool,               // show progress bar
    pub progress_label: Option<String>,

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity over decoded bodies
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            prefix: String::new(),
            suffix: None,
            text_fields: DEFAULT_TEXT_FIELDS.iter().map(|s| s.to_string()).collect(),
            progress: false,
            progress_label: None,
            read_buffer_bytes: 256 * 1024,
        }
    }
}

impl ScanOptions {
    /// Size totals: every object under the prefix, no suffix filter.
    pub fn for_size() -> Self {
        Self::default().with_bucket(SIZE_BUCKET).with_prefix(SIZE_PREFIX)
    }

    pub fn for_hebrew() -> Self {
        Self::default()
            .with_bucket(HEBREW_BUCKET)
            .with_prefix(HEBREW_PREFIX)
            .with_suffix(CSV_SUFFIX)
    }

    pub fn for_words() -> Self {
        Self::default()
            .with_bucket(WORDS_BUCKET)
            .with_prefix(WORDS_PREFIX)
            .with_suffix(JSONL_GZ_SUFFIX)
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        let s = suffix.into();
        self.suffix = if s.is_empty() { None } else { Some(s) };
        self
    }
    pub fn without_suffix(mut self) -> Self {
        self.suffix = None;
        self
    }
    pub fn with_text_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if !fields.is_empty() {
            self.text_fields = fields;
        }
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

    /// True when `key` passes the configured suffix filter.
    pub fn accepts(&self, key: &str) -> bool {
        self.suffix.as_deref().map_or(true, |s| key.ends_with(s))
    }
}
