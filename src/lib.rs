mod config;
mod store;
mod local_store;
mod s3_store;

mod lines;
mod record;
mod csv_words;
mod jsonl_words;

mod tally;
mod report;
mod progress;
mod util;
mod runner;

pub use crate::config::ScanOptions;
pub use crate::runner::BucketStats;

// Storage seam and its backends.
pub use crate::store::{ListPage, ObjectListing, ObjectMeta, ObjectStore};
pub use crate::local_store::LocalStore;
pub use crate::s3_store::{BodyReader, S3Store};

// Decoders, usable on their own over any reader.
pub use crate::lines::{for_each_line, open_decoded, Compression};
pub use crate::record::{count_words, extract_text, TextRecord, DEFAULT_TEXT_FIELDS};
pub use crate::csv_words::{decode_csv, hebrew_word_count, parse_word_count, CsvFileStats};
pub use crate::jsonl_words::{count_words_in_object, count_words_in_reader, JsonlFileStats};

// Totals and their console rendering.
pub use crate::tally::{percentage, HebrewTotals, ObjectFault, ObjectOutcome, SizeTotals, WordTotals};
pub use crate::report::{thousands, thousands_f64};

pub use crate::util::init_tracing_once;

/// Default bucket/prefix/suffix constants for each reducer.
pub mod defaults {
    pub use crate::config::{
        CSV_SUFFIX, HEBREW_BUCKET, HEBREW_PREFIX, JSONL_GZ_SUFFIX, SIZE_BUCKET, SIZE_PREFIX,
        WORDS_BUCKET, WORDS_PREFIX,
    };
}
