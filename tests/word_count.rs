#[path = "common/mod.rs"]
mod common;

use bucketstats::{BucketStats, LocalStore, ScanOptions};
use common::*;

fn words_run() -> BucketStats {
    BucketStats::new(ScanOptions::for_words()).bucket(BUCKET).prefix("run/")
}

/// Counts words across every `.jsonl.gz` object, paging two keys at a time:
///   part-0 = 3 + 2 + 4 = 9 (one malformed line skipped)
///   part-1 = 4 (no known text field, whole record rendered)
///   part-2 = fault (not gzip), skipped
///   part-3 = 3 + 2 = 5
/// Outcome: 18 words, one failed object named in the console output.
#[test]
fn counts_words_and_isolates_bad_objects() {
    let dir = make_jsonl_bucket();
    let store = LocalStore::new(dir.path()).with_page_size(2);

    let mut out = Vec::new();
    let totals = words_run().word_count(&store, &mut out).unwrap();

    assert_eq!(totals.files, 3);
    assert_eq!(totals.words, 18);
    assert_eq!(totals.records, 6);
    assert_eq!(totals.skipped_lines, 1);
    assert_eq!(totals.faults.len(), 1);
    assert_eq!(totals.faults[0].key, "run/part-2.jsonl.gz");

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Error processing run/part-2.jsonl.gz: "), "{text}");
    assert!(text.ends_with("Total words: 18\nFailed objects: 1\n"), "{text}");
}

/// A failing fetch in the middle of the listing leaves earlier totals intact and
/// later objects still get processed.
#[test]
fn fetch_failure_does_not_stop_the_run() {
    let dir = make_jsonl_bucket();
    let store = FailingFetch::new(LocalStore::new(dir.path()), &["run/part-1.jsonl.gz"]);

    let mut out = Vec::new();
    let totals = words_run().word_count(&store, &mut out).unwrap();

    // part-0 (9) + part-3 (5); part-1 failed to fetch, part-2 failed to decode.
    assert_eq!(totals.words, 14);
    let failed: Vec<&str> = totals.faults.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(failed, ["run/part-1.jsonl.gz", "run/part-2.jsonl.gz"]);
    assert!(totals.faults[0].reason.contains("connection reset"));

    // Only suffix-matching keys were ever fetched, each exactly once.
    let fetched = store.fetched.borrow();
    assert_eq!(
        *fetched,
        ["run/part-0.jsonl.gz", "run/part-1.jsonl.gz", "run/part-2.jsonl.gz", "run/part-3.jsonl.gz"]
    );
}

/// A listing failure is fatal, even after some objects were counted.
#[test]
fn listing_failure_aborts() {
    let dir = make_jsonl_bucket();
    let store = FailingList { inner: LocalStore::new(dir.path()).with_page_size(2), ok_pages: 1, calls: Default::default() };

    let mut out = Vec::new();
    let err = words_run().word_count(&store, &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("AccessDenied"));
}

/// Custom priority and suffix: `.jsonl.zst` objects, counting only `title`.
#[test]
fn zstd_suffix_and_custom_fields() {
    let dir = tempfile::tempdir().unwrap();
    write_zst_lines(dir.path(), "z/a.jsonl.zst", &[
        r#"{"title": "four words in title", "text": "ignored"}"#.to_string(),
        r#"{"text": "no title here"}"#.to_string(),
    ]);
    write_gz_lines(dir.path(), "z/b.jsonl.gz", &[r#"{"title": "skipped by suffix"}"#.to_string()]);

    let store = LocalStore::new(dir.path());
    let mut out = Vec::new();
    let totals = BucketStats::new(ScanOptions::for_words())
        .bucket(BUCKET)
        .prefix("z/")
        .suffix(".jsonl.zst")
        .text_fields(["title"])
        .word_count(&store, &mut out)
        .unwrap();

    // "four words in title" = 4; second record renders {"text": "no title here"} = 4
    assert_eq!(totals.files, 1);
    assert_eq!(totals.words, 8);
}

#[test]
fn empty_prefix_reports_zero() {
    let dir = make_jsonl_bucket();
    let store = LocalStore::new(dir.path());
    let mut out = Vec::new();
    let totals = words_run().prefix("nothing/here/").word_count(&store, &mut out).unwrap();
    assert_eq!(totals.words, 0);
    assert_eq!(String::from_utf8(out).unwrap(), "Total words: 0\n");
}

/// Fault lines reach the output sink while the progress bar is active.
#[test]
fn progress_bar_keeps_fault_lines() {
    let dir = make_jsonl_bucket();
    let store = LocalStore::new(dir.path());
    let mut out = Vec::new();
    let totals = words_run().progress(true).word_count(&store, &mut out).unwrap();
    assert_eq!(totals.words, 18);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Error processing run/part-2.jsonl.gz: "), "{text}");
    assert!(text.ends_with("Total words: 18\nFailed objects: 1\n"), "{text}");
}
