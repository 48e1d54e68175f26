//! Destination parsing and outbound URI selection.

use axum::http::Uri;
use serde_json::json;
use url::Url;

use crate::error::AppError;

/// A parsed proxy destination.
///
/// Holds the destination URL plus two derived strings:
/// - `authority`: `host[:port]`, the value sent as `Host`
/// - `origin`: `scheme://host[:port]`, the prefix of every outbound URL
///
/// Default ports are omitted from both.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    url: Url,
    authority: String,
    origin: String,
}

impl ProxyTarget {
    /// Parses a redirect destination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if `destination` is not an absolute URL
    /// or has no host.
    pub fn parse(destination: &str) -> Result<Self, AppError> {
        let url = Url::parse(destination)?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                AppError::internal(
                    "Destination URL has no host",
                    json!({ "destination": destination }),
                )
            })?;

        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let origin = format!("{}://{}", url.scheme(), authority);

        Ok(Self {
            url,
            authority,
            origin,
        })
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Picks the path-and-query sent upstream.
    ///
    /// A request for exactly `/` targets the destination's own path and
    /// query. Any other request keeps its path and query, and the
    /// destination path is discarded.
    pub fn request_uri(&self, inbound: &Uri) -> String {
        if inbound.path() == "/" {
            return match self.url.query() {
                Some(query) => format!("{}?{}", self.url.path(), query),
                None => self.url.path().to_string(),
            };
        }

        inbound
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| inbound.path().to_string())
    }

    /// Full outbound URL: destination origin plus [`Self::request_uri`].
    pub fn outbound_url(&self, inbound: &Uri) -> String {
        format!("{}{}", self.origin, self.request_uri(inbound))
    }

    /// Rebases a `Referer` value onto the destination origin.
    ///
    /// The value is resolved against the destination URL, so relative and
    /// absolute referers both work; only the resolved path is kept.
    /// Returns `None` if the value cannot be resolved.
    pub fn rebase_referer(&self, referer: &str) -> Option<String> {
        let resolved = self.url.join(referer).ok()?;
        Some(format!("{}{}", self.origin, resolved.path()))
    }
}
