//! Object-store seam: one page of a prefix listing, one object body by key,
//! and a lazy listing iterator that follows continuation tokens.

use anyhow::Result;
use std::collections::VecDeque;
use std::io::Read;

/// One listed object: its key and its size in bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
}

/// A bounded page of listing results plus the cursor for the next page.
#[derive(Clone, Debug, Default)]
pub struct ListPage {
    pub objects: Vec<ObjectMeta>,
    pub next_token: Option<String>, // None once the listing is exhausted
}

/// Blocking storage backend.
pub trait ObjectStore {
    /// List one page of objects under `prefix`, continuing after `token`.
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage>;

    /// Open the full body of `key`.
    fn fetch(&self, bucket: &str, key: &str) -> Result<Box<dyn Read>>;
}

/// Lazy listing over every page of `bucket/prefix`, optionally keeping only keys
/// that end with `suffix`. A backend error is yielded once and ends the iteration.
pub struct ObjectListing<'a> {
    store: &'a dyn ObjectStore,
    bucket: String,
    prefix: String,
    suffix: Option<String>,
    buffered: VecDeque<ObjectMeta>,
    next_token: Option<String>,
    pages: usize,
    finished: bool,
}

impl<'a> ObjectListing<'a> {
    pub fn new(store: &'a dyn ObjectStore, bucket: &str, prefix: &str) -> Self {
        Self {
            store,
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            suffix: None,
            buffered: VecDeque::new(),
            next_token: None,
            pages: 0,
            finished: false,
        }
    }

    pub fn with_suffix(mut self, suffix: Option<&str>) -> Self {
        self.suffix = suffix.map(str::to_string);
        self
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    fn fetch_next_page(&mut self) -> Result<()> {
        let page = self
            .store
            .list_page(&self.bucket, &self.prefix, self.next_token.as_deref())?;
        self.pages += 1;
        tracing::debug!(
            bucket = %self.bucket,
            prefix = %self.prefix,
            page = self.pages,
            keys = page.objects.len(),
            "listed page"
        );
        let suffix = self.suffix.as_deref();
        self.buffered.extend(
            page.objects
                .into_iter()
                .filter(|o| suffix.map_or(true, |s| o.key.ends_with(s))),
        );
        // A page with a cursor but no keys is legal; stop only when the cursor is gone.
        self.finished = page.next_token.is_none();
        self.next_token = page.next_token;
        Ok(())
    }
}

impl Iterator for ObjectListing<'_> {
    type Item = Result<ObjectMeta>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(obj) = self.buffered.pop_front() {
                return Some(Ok(obj));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.fetch_next_page() {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }
}
