//! Declarative header rewrite table for proxied exchanges.
//!
//! Every header not listed in [`HEADER_RULES`] is relayed unchanged. The
//! host-identifying headers are rebased onto the destination so the upstream
//! sees requests as if it were the direct origin. Connection-scoped headers
//! are dropped on both legs.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use super::target::ProxyTarget;

/// What happens to a header on its way upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRule {
    /// Replace with the destination `host[:port]`.
    Authority,
    /// Replace with the destination `scheme://host[:port]`.
    Origin,
    /// Keep the path, swap scheme and host for the destination's.
    Referer,
    /// Do not relay.
    Drop,
}

/// Header name (lowercase) to rewrite rule.
pub const HEADER_RULES: &[(&str, HeaderRule)] = &[
    ("host", HeaderRule::Authority),
    ("origin", HeaderRule::Origin),
    ("referer", HeaderRule::Referer),
    ("connection", HeaderRule::Drop),
    ("keep-alive", HeaderRule::Drop),
    ("proxy-connection", HeaderRule::Drop),
    ("transfer-encoding", HeaderRule::Drop),
    ("te", HeaderRule::Drop),
    ("trailer", HeaderRule::Drop),
    ("upgrade", HeaderRule::Drop),
];

/// Looks up the rule for a header; `None` means pass through.
pub fn rule_for(name: &HeaderName) -> Option<HeaderRule> {
    HEADER_RULES
        .iter()
        .find(|(rule_name, _)| *rule_name == name.as_str())
        .map(|(_, rule)| *rule)
}

/// Builds the outbound request headers.
///
/// Only the first value of a multi-valued header is relayed.
pub fn rewrite_request_headers(inbound: &HeaderMap, target: &ProxyTarget) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.keys_len());

    for name in inbound.keys() {
        let Some(value) = inbound.get(name) else {
            continue;
        };

        let rewritten = match rule_for(name) {
            None => Some(value.clone()),
            Some(HeaderRule::Drop) => None,
            Some(HeaderRule::Authority) => HeaderValue::from_str(target.authority()).ok(),
            Some(HeaderRule::Origin) => HeaderValue::from_str(target.origin()).ok(),
            Some(HeaderRule::Referer) => Some(
                value
                    .to_str()
                    .ok()
                    .and_then(|referer| target.rebase_referer(referer))
                    .and_then(|rebased| HeaderValue::from_str(&rebased).ok())
                    .unwrap_or_else(|| value.clone()),
            ),
        };

        if let Some(rewritten) = rewritten {
            outbound.insert(name.clone(), rewritten);
        }
    }

    outbound
}

/// Copies upstream response headers, every value included, minus the
/// connection-scoped ones.
pub fn copy_response_headers(upstream: &HeaderMap, response: &mut HeaderMap) {
    for (name, value) in upstream.iter() {
        if rule_for(name) == Some(HeaderRule::Drop) {
            continue;
        }
        response.append(name.clone(), value.clone());
    }
}
