mod models;
mod listener;

pub use models::{Link, LinkAction, UnknownLinkAction};
pub use listener::{ArcLinkListener, LinkListener, NoopLinkListener};
