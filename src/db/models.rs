use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The set of possible actions on a local device link or connection.
///
/// Discriminants are stable and go over the wire as plain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "i32")]
#[repr(i32)]
pub enum LinkAction {
    Modify = 0,
    New = 1,
    Remove = 2,
}

impl LinkAction {
    pub const ALL: [LinkAction; 3] = [LinkAction::Modify, LinkAction::New, LinkAction::Remove];

    /// Integer code of this action
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkAction::Modify => "modify",
            LinkAction::New => "new",
            LinkAction::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownLinkAction {
    #[error("unknown link action code: {0}")]
    Code(i32),
    #[error("unknown link action name: {0:?}")]
    Name(String),
}

impl TryFrom<i32> for LinkAction {
    type Error = UnknownLinkAction;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(LinkAction::Modify),
            1 => Ok(LinkAction::New),
            2 => Ok(LinkAction::Remove),
            other => Err(UnknownLinkAction::Code(other)),
        }
    }
}

impl From<LinkAction> for i32 {
    fn from(action: LinkAction) -> Self {
        action.code()
    }
}

impl FromStr for LinkAction {
    type Err = UnknownLinkAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "modify" => Ok(LinkAction::Modify),
            "new" => Ok(LinkAction::New),
            "remove" => Ok(LinkAction::Remove),
            _ => Err(UnknownLinkAction::Name(s.to_string())),
        }
    }
}

impl fmt::Display for LinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Accepts `1` as well as `"new"` when deserializing
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAction {
    Code(i32),
    Name(String),
}

impl TryFrom<RawAction> for LinkAction {
    type Error = UnknownLinkAction;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        match raw {
            RawAction::Code(code) => LinkAction::try_from(code),
            RawAction::Name(name) => name.parse(),
        }
    }
}

/// A link between two devices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Source device name
    pub src: String,
    /// Destination device name
    pub dst: String,
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl Link {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// A link is identified by its endpoints
    pub fn key(&self) -> (&str, &str) {
        (&self.src, &self.dst)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}
