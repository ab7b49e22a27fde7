#![allow(dead_code)]

use anyhow::{anyhow, Result};
use bucketstats::{ListPage, ObjectStore};
use flate2::write::GzEncoder;
use serde_json::json;
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const BUCKET: &str = "datasets";

/// Path of `key` inside the bucket directory under `root`.
pub fn object_path(root: &Path, key: &str) -> PathBuf {
    root.join(BUCKET).join(key)
}

/// Write a gzip-compressed `.jsonl.gz` object containing the provided lines.
pub fn write_gz_lines(root: &Path, key: &str, lines: &[String]) {
    let path = object_path(root, key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = GzEncoder::new(f, flate2::Compression::default());
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Write a zstd-compressed object containing the provided lines.
pub fn write_zst_lines(root: &Path, key: &str, lines: &[String]) {
    let path = object_path(root, key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for l in lines {
        writeln!(&mut enc, "{}", l).unwrap();
    }
    enc.finish().unwrap();
}

/// Write raw bytes as an object.
pub fn write_raw(root: &Path, key: &str, body: &[u8]) {
    let path = object_path(root, key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// Build a tiny JSONL bucket under a fresh temp dir:
/// - run/part-0.jsonl.gz: 3 records, 3 + 2 + 4 = 9 words, plus one malformed line
/// - run/part-1.jsonl.gz: 1 record without a known text field ({"id": 7, "title": "x"}) = 4 words
/// - run/part-2.jsonl.gz: not gzip at all (fails as a whole object)
/// - run/part-3.jsonl.gz: 2 bare string records, 5 words
/// - run/notes.txt and run/part-0.jsonl: ignored by the default suffix
pub fn make_jsonl_bucket() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    write_gz_lines(root, "run/part-0.jsonl.gz", &[
        json!({"text": "a b c", "content": "ignored here"}).to_string(),
        json!({"content": "x y"}).to_string(),
        "{\"bad json".to_string(),
        json!({"message": "one two three four", "data": 5}).to_string(),
    ]);
    write_gz_lines(root, "run/part-1.jsonl.gz", &[json!({"id": 7, "title": "x"}).to_string()]);
    write_raw(root, "run/part-2.jsonl.gz", b"{\"text\": \"this is not compressed\"}\n");
    write_gz_lines(root, "run/part-3.jsonl.gz", &[
        json!("three words here").to_string(),
        json!("two words").to_string(),
    ]);
    write_raw(root, "run/notes.txt", b"do not count these words");
    write_raw(root, "run/part-0.jsonl", b"{\"text\": \"uncompressed twin\"}\n");

    dir
}

/// Wraps a store and fails `fetch` for any key listed in `fail`; records fetched keys.
pub struct FailingFetch<S> {
    pub inner: S,
    pub fail: Vec<String>,
    pub fetched: RefCell<Vec<String>>,
}

impl<S: ObjectStore> FailingFetch<S> {
    pub fn new(inner: S, fail: &[&str]) -> Self {
        Self { inner, fail: fail.iter().map(|s| s.to_string()).collect(), fetched: RefCell::new(Vec::new()) }
    }
}

impl<S: ObjectStore> ObjectStore for FailingFetch<S> {
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        self.inner.list_page(bucket, prefix, token)
    }
    fn fetch(&self, bucket: &str, key: &str) -> Result<Box<dyn Read>> {
        self.fetched.borrow_mut().push(key.to_string());
        if self.fail.iter().any(|k| k == key) {
            return Err(anyhow!("connection reset while fetching {}", key));
        }
        self.inner.fetch(bucket, key)
    }
}

/// Lists normally for `ok_pages` pages, then fails.
pub struct FailingList<S> {
    pub inner: S,
    pub ok_pages: usize,
    pub calls: RefCell<usize>,
}

impl<S: ObjectStore> ObjectStore for FailingList<S> {
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let mut calls = self.calls.borrow_mut();
        *calls += 1;
        if *calls > self.ok_pages {
            return Err(anyhow!("AccessDenied: listing {}/{}", bucket, prefix));
        }
        self.inner.list_page(bucket, prefix, token)
    }
    fn fetch(&self, bucket: &str, key: &str) -> Result<Box<dyn Read>> {
        self.inner.fetch(bucket, key)
    }
}
