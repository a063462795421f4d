use crate::db::models::{Link, LinkAction};
use std::sync::Arc;

pub type ArcLinkListener = Arc<dyn LinkListener>;

/// Receives link change notifications from whoever owns the link records.
///
/// The record is only borrowed for the duration of the call. Every method
/// has an empty default body, so implementers override what they need.
pub trait LinkListener: Send + Sync {
    /// Called once for each change to a link
    fn on_link(&self, _record: &Link, _action: LinkAction) {}
}

/// Listener that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLinkListener;

impl LinkListener for NoopLinkListener {}

impl<F> LinkListener for F
where
    F: Fn(&Link, LinkAction) + Send + Sync,
{
    fn on_link(&self, record: &Link, action: LinkAction) {
        self(record, action)
    }
}
