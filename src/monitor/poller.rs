use anyhow::Result;
use log::{debug, error, info};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::interval;

use crate::db::{ArcLinkListener, Link, LinkAction};
use crate::monitor::source::SnapshotSource;

/// Compare two snapshots and list what happened to each link.
///
/// Removals come first, then new and modified links in the order they
/// appear in `current`. When a key repeats within one snapshot the last
/// record wins.
pub fn diff(previous: &[Link], current: &[Link]) -> Vec<(Link, LinkAction)> {
    let before: HashMap<(&str, &str), &Link> = previous.iter().map(|l| (l.key(), l)).collect();
    let after: HashMap<(&str, &str), &Link> = current.iter().map(|l| (l.key(), l)).collect();

    let mut changes = Vec::new();

    let mut seen = HashSet::new();
    for link in previous {
        let key = link.key();
        if after.contains_key(&key) || !seen.insert(key) {
            continue;
        }
        if let Some(old) = before.get(&key) {
            changes.push(((*old).clone(), LinkAction::Remove));
        }
    }

    let mut seen = HashSet::new();
    for link in current {
        let key = link.key();
        if !seen.insert(key) {
            continue;
        }
        let Some(latest) = after.get(&key) else {
            continue;
        };
        match before.get(&key) {
            None => changes.push(((*latest).clone(), LinkAction::New)),
            Some(old) if old.properties != latest.properties => {
                changes.push(((*latest).clone(), LinkAction::Modify))
            }
            Some(_) => {}
        }
    }

    changes
}

/// Owns the last known set of links and reports changes to one listener
pub struct LinkMonitor {
    source: Box<dyn SnapshotSource>,
    listener: ArcLinkListener,
    snapshot: RwLock<Vec<Link>>,
    polling: Mutex<()>,
}

impl LinkMonitor {
    pub fn new(source: Box<dyn SnapshotSource>, listener: ArcLinkListener) -> Self {
        Self {
            source,
            listener,
            snapshot: RwLock::new(Vec::new()),
            polling: Mutex::new(()),
        }
    }

    /// Current known links
    pub async fn links(&self) -> Vec<Link> {
        self.snapshot.read().await.clone()
    }

    /// Fetch once and notify the listener of every change.
    /// Returns how many notifications were sent.
    pub async fn poll(&self) -> Result<usize> {
        // Two polls never interleave; readers of `links()` only wait for the diff
        let _polling = self.polling.lock().await;

        let Some(links) = self.source.fetch().await? else {
            debug!("[Poll] Link snapshot not modified");
            return Ok(0);
        };

        let mut snapshot = self.snapshot.write().await;
        let changes = diff(&snapshot, &links);
        for (link, action) in &changes {
            self.listener.on_link(link, *action);
        }

        *snapshot = links;
        Ok(changes.len())
    }

    /// Poll forever at the given period
    pub async fn run(&self, period: Duration) -> Result<()> {
        let mut ticker = interval(period);

        loop {
            ticker.tick().await;

            match self.poll().await {
                Ok(0) => debug!("[Poll] No link changes"),
                Ok(n) => info!("[Poll] Reported {} link changes", n),
                Err(e) => error!("[Poll] Failed to fetch link snapshot: {}", e),
            }
        }
    }
}
