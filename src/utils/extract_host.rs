//! Host name extraction from inbound requests.

use axum::http::{HeaderMap, Uri, header};

/// Extracts the host name used for implicit (host-based) resolution.
///
/// Reads the `Host` header, falling back to the request URI authority
/// (HTTP/2 `:authority`) when the header is absent. The port is stripped:
/// - IPv4 addresses (e.g., `192.168.1.1:9000` → `192.168.1.1`)
/// - IPv6 addresses (e.g., `[::1]:8080` → `[::1]`)
/// - Hostnames (e.g., `example.com:3000` → `example.com`)
///
/// If stripping leaves nothing, the raw value is returned. Returns `None`
/// when the request carries no usable host at all.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "example.com:8080".parse().unwrap());
///
/// let host = extract_host(&headers, &Uri::from_static("/"));
/// assert_eq!(host.as_deref(), Some("example.com"));
/// ```
pub fn extract_host(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let raw = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))?
        .trim();

    if raw.is_empty() {
        return None;
    }

    let host = if raw.starts_with('[') {
        // IPv6 address (e.g., [::1] or [::1]:8080)
        match raw.find(']') {
            Some(end_bracket) => &raw[..=end_bracket],
            None => raw,
        }
    } else {
        raw.split(':').next().unwrap_or(raw)
    };

    if host.is_empty() {
        Some(raw.to_string())
    } else {
        Some(host.to_string())
    }
}
