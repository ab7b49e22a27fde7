//! S3 backend over the async AWS SDK, driven from a private current-thread runtime
//! so callers stay blocking and sequential.

use crate::store::{ListPage, ObjectMeta, ObjectStore};
use anyhow::{anyhow, Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::io::{self, Read};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Env var consulted when no endpoint override is passed explicitly.
pub const ENDPOINT_ENV: &str = "S3_ENDPOINT_URL";

pub struct S3Store {
    client: Client,
    runtime: Arc<Runtime>,
}

impl S3Store {
    /// Build a client from the default AWS credential/region chain.
    /// An endpoint override (argument, else `S3_ENDPOINT_URL`) switches to
    /// path-style addressing for S3-compatible servers.
    pub fn connect(endpoint_url: Option<&str>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("build tokio runtime for S3 client")?;

        let shared = runtime.block_on(aws_config::load_defaults(BehaviorVersion::latest()));
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);

        let endpoint = endpoint_url
            .map(str::to_string)
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|s| !s.trim().is_empty()));
        if let Some(url) = endpoint {
            tracing::info!(endpoint = %url, "using S3 endpoint override");
            builder = builder.endpoint_url(url).force_path_style(true);
        }

        Ok(Self { client: Client::from_conf(builder.build()), runtime: Arc::new(runtime) })
    }
}

impl ObjectStore for S3Store {
    fn list_page(&self, bucket: &str, prefix: &str, token: Option<&str>) -> Result<ListPage> {
        let mut req = self.client.list_objects_v2().bucket(bucket).prefix(prefix);
        if let Some(t) = token {
            req = req.continuation_token(t);
        }
        let out = self
            .runtime
            .block_on(req.send())
            .map_err(|e| anyhow!("list s3://{}/{}: {}", bucket, prefix, DisplayErrorContext(&e)))?;

        let objects = out
            .contents()
            .iter()
            .filter_map(|o| {
                let key = o.key()?;
                Some(ObjectMeta { key: key.to_string(), size: o.size().unwrap_or(0).max(0) as u64 })
            })
            .collect();
        let next_token = if out.is_truncated().unwrap_or(false) {
            out.next_continuation_token().map(str::to_string)
        } else {
            None
        };
        Ok(ListPage { objects, next_token })
    }

    fn fetch(&self, bucket: &str, key: &str) -> Result<Box<dyn Read>> {
        let out = self
            .runtime
            .block_on(self.client.get_object().bucket(bucket).key(key).send())
            .map_err(|e| anyhow!("get s3://{}/{}: {}", bucket, key, DisplayErrorContext(&e)))?;
        tracing::debug!(bucket, key, bytes = out.content_length().unwrap_or(-1), "opened object");
        Ok(Box::new(BodyReader::new(Arc::clone(&self.runtime), out.body)))
    }
}

/// Blocking `Read` over a response body. Chunks are pulled from the stream one at
/// a time, so memory stays bounded by the chunk size rather than the object size.
pub struct BodyReader {
    runtime: Arc<Runtime>,
    stream: ByteStream,
    chunk: Bytes,
    done: bool,
}

impl BodyReader {
    pub fn new(runtime: Arc<Runtime>, stream: ByteStream) -> Self {
        Self { runtime, stream, chunk: Bytes::new(), done: false }
    }
}

impl Read for BodyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.chunk.is_empty() {
            if self.done {
                return Ok(0);
            }
            match self.runtime.block_on(self.stream.try_next()) {
                Ok(Some(next)) => self.chunk = next,
                Ok(None) => self.done = true,
                Err(e) => return Err(io::Error::other(e)),
            }
        }
        let n = buf.len().min(self.chunk.len());
        buf[..n].copy_from_slice(&self.chunk[..n]);
        self.chunk = self.chunk.slice(n..);
        Ok(n)
    }
}
