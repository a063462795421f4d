use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

use crate::db::Link;

/// Document shape shared by file and HTTP snapshots
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub links: Vec<Link>,
}

/// Somewhere a full list of links can be read from
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current links. `Ok(None)` means nothing changed since the last fetch.
    async fn fetch(&self) -> Result<Option<Vec<Link>>>;
}

/// Pick a source for a configured location: http(s) URLs are fetched, anything else is a file path
pub fn from_location(location: &str, timeout: Duration) -> Result<Box<dyn SnapshotSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

/// Reads a JSON snapshot from disk, skipping the read while the file is unchanged.
///
/// A file counts as unchanged when both its mtime and its length match the
/// last read. A same-length rewrite inside the filesystem's mtime granularity
/// is not noticed until the next write.
pub struct FileSource {
    path: PathBuf,
    last_seen: RwLock<Option<(SystemTime, u64)>>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last_seen: RwLock::new(None),
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<Option<Vec<Link>>> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| anyhow!("cannot stat {}: {}", self.path.display(), e))?;
        let stamp = metadata.modified().ok().map(|mtime| (mtime, metadata.len()));

        if stamp.is_some() && *self.last_seen.read().await == stamp {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| anyhow!("cannot read {}: {}", self.path.display(), e))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .map_err(|e| anyhow!("invalid snapshot {}: {}", self.path.display(), e))?;
        debug!("Read {} links from {}", snapshot.links.len(), self.path.display());

        let mut last_seen = self.last_seen.write().await;
        *last_seen = stamp;
        drop(last_seen);

        Ok(Some(snapshot.links))
    }
}

/// Fetches a JSON snapshot over HTTP using ETag revalidation
pub struct HttpSource {
    client: Client,
    url: String,
    etag: RwLock<Option<String>>,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let timeout = if timeout.is_zero() {
            Duration::from_secs(5)
        } else {
            timeout
        };

        let client = Client::builder().timeout(timeout).build()?;

        Ok(HttpSource {
            client,
            url: url.to_string(),
            etag: RwLock::new(None),
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch(&self) -> Result<Option<Vec<Link>>> {
        let etag = self.etag.read().await.clone();

        let mut request = self.client.get(&self.url);
        if let Some(etag) = etag {
            request = request.header("If-None-Match", etag);
        }

        let res = request.send().await?;
        let status = res.status();

        if status == StatusCode::NOT_MODIFIED {
            return Ok(None);
        }

        if status.as_u16() > 399 {
            let body = res.text().await?;
            return Err(anyhow!(
                "request {} failed: status {}, body: {}",
                self.url,
                status,
                body
            ));
        }

        let new_etag = res
            .headers()
            .get("etag")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let json_data = res.json::<Value>().await?;
        let links: Vec<Link> = serde_json::from_value(
            json_data
                .get("links")
                .ok_or_else(|| anyhow!("links field not found"))?
                .clone(),
        )?;
        debug!("Fetched {} links from {}", links.len(), self.url);

        // Only remember the tag once the body it belongs to was accepted
        if new_etag.is_some() {
            let mut etag = self.etag.write().await;
            *etag = new_etag;
        }

        Ok(Some(links))
    }
}
