//! Directory-backed object store: `<root>/<bucket>/<key>`, listed in key order
//! and paginated like a remote listing.

use crate::store::{ListPage, ObjectMeta, ObjectStore};
use anyhow::{bail, Context, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use walkdir::WalkDir;

pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Sorted keys of one `(bucket, prefix)` walk, reused by the pages that follow it.
#[derive(Debug)]
struct Snapshot {
    bucket: String,
    prefix: String,
    objects: Rc<Vec<ObjectMeta>>,
}

#[derive(Clone, Debug)]
pub struct LocalStore {
    root: PathBuf,
    page_size: usize,
    snapshot: Rc<RefCell<Option<Snapshot>>>,
}

impl LocalStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            page_size: DEFAULT_PAGE_SIZE,
            snapshot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn with_page_size(mut self, n: usize) -> Self {
        self.page_size = n.max(1);
        self
    }

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }

    /// Every object in the bucket whose key starts with `prefix`, sorted by key.
    fn scan(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let dir = self.bucket_dir(bucket);
        if !dir.is_dir() {
            bail!("no such bucket: {} (looked in {})", bucket, dir.display());
        }
        let mut out = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1) {
            let ent = entry.with_context(|| format!("walk {}", dir.display()))?;
            if !ent.file_type().is_file() {
                continue;
            }
            let Some(key) = key_for(&dir, ent.path()) else { continue };
            if !key.starts_with(prefix) {
                continue;
            }
            let size = ent
                .metadata()
                .with_context(|| format!("stat {}", ent.path().display()))?
                .len();
            out.push(ObjectMeta { key, size });
        }
        out.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(out)
    }

    /// The tree is walked once per listing: a first page (no token) always walks
    /// afresh, continuation pages reuse that walk when bucket and prefix match.
    fn listed(&self, bucket: &str, prefix: &str, continuing: bool) -> Result<Rc<Vec<ObjectMeta>>> {
        if continuing {
            if let Some(snap) = self.snapshot.borrow().as_ref() {
                if snap.bucket == bucket && snap.prefix == prefix {
                    return Ok(Rc::clone(&snap.objects));
                }
            }
        }
        let objects = Rc::new(self.scan(bucket, prefix)?);
        *self.snapshot.borrow_mut() = Some(Snapshot {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
            objects: Rc::clone(&objects),
        });
        Ok(objects)
    }
}

/// `/`-joined path of `path` relative to `dir`; None for non-UTF-8 names.
fn key_for(dir: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(dir).ok()?;
    let parts: Option<Vec<&str>> = rel.components().map(|c| c.as_os_str().to_str()).collect();
    Some(parts?.join("/"))
}

impl ObjectStore for LocalStore {
    /// The continuation token is the last key of the previous page.
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let all = self.listed(bucket, prefix, token.is_some())?;
        let start = match token {
            Some(after) => all.partition_point(|o| o.key.as_str() <= after),
            None => 0,
        };
        let end = (start + self.page_size).min(all.len());
        let objects = all[start..end].to_vec();
        let next_token = if end < all.len() { objects.last().map(|o| o.key.clone()) } else { None };
        Ok(ListPage { objects, next_token })
    }

    fn fetch(&self, bucket: &str, key: &str) -> Result<Box<dyn Read>> {
        let path = self.bucket_dir(bucket).join(key);
        let f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
        Ok(Box::new(BufReader::new(f)))
    }
}
