//! Redirect entity: the only record the gateway stores.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A redirect record.
///
/// Resolved either by `id` (explicit, `GET /?to=<id>`) or by `dns` (implicit,
/// matched against the request host). When `proxy` is `false` the client is
/// sent a `307` to `destination`; when `true` the whole exchange is relayed.
///
/// Timestamps are `None` only for a record that has never been saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<String>,
    pub destination: String,
    #[serde(default)]
    pub proxy: bool,
}

impl Redirect {
    /// Creates an unsaved record; the store assigns the id and timestamps.
    pub fn new(destination: impl Into<String>, dns: Option<String>, proxy: bool) -> Self {
        Self {
            id: String::new(),
            created_at: None,
            updated_at: None,
            dns,
            destination: destination.into(),
            proxy,
        }
    }

    /// Returns true once the store has persisted this record at least once.
    pub fn is_persisted(&self) -> bool {
        self.created_at.is_some()
    }

    /// Non-empty host name used for implicit matching, if any.
    pub fn dns(&self) -> Option<&str> {
        self.dns.as_deref().filter(|d| !d.is_empty())
    }
}
