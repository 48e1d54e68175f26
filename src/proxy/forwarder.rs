//! The forwarding engine: 307 redirect or transparent proxy.

use std::time::{Duration, Instant};

use axum::{
    body::{self, Body},
    extract::Request,
    response::{IntoResponse, Redirect as RedirectResponse, Response},
};
use serde_json::json;
use tracing::{debug, error, info};

use super::headers::{copy_response_headers, rewrite_request_headers};
use super::target::ProxyTarget;
use crate::domain::entities::Redirect;
use crate::error::AppError;

/// Turns a resolved redirect plus the inbound request into a response.
///
/// The proxy path is a byte-transparent relay: method, body, status and
/// response headers pass through; only the host-identifying request headers
/// are rewritten (see [`super::headers`]).
///
/// The client is shared across requests and never retries or follows
/// redirects. If the inbound connection goes away, the handler future is
/// dropped and the outbound request with it.
#[derive(Clone)]
pub struct ProxyForwarder {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl ProxyForwarder {
    /// Creates a forwarder around an existing HTTP client.
    ///
    /// `max_body_bytes` bounds how much of the inbound body is buffered.
    pub fn new(client: reqwest::Client, max_body_bytes: usize) -> Self {
        Self {
            client,
            max_body_bytes,
        }
    }

    /// Builds the outbound HTTP client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
    }

    /// Answers `request` according to `redirect.proxy`.
    ///
    /// - `false`: `307 Temporary Redirect` to `redirect.destination`, verbatim
    /// - `true`: relays the exchange to the destination
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the destination cannot be parsed, the
    /// inbound body cannot be read, or the upstream exchange fails.
    pub async fn forward(&self, redirect: &Redirect, request: Request) -> Result<Response, AppError> {
        if !redirect.proxy {
            debug!(id = %redirect.id, destination = %redirect.destination, "Redirecting");
            return Ok(RedirectResponse::temporary(&redirect.destination).into_response());
        }

        self.proxy(redirect, request).await
    }

    async fn proxy(&self, redirect: &Redirect, request: Request) -> Result<Response, AppError> {
        let target = ProxyTarget::parse(&redirect.destination)?;

        let (parts, body) = request.into_parts();
        let url = target.outbound_url(&parts.uri);
        let headers = rewrite_request_headers(&parts.headers, &target);

        let body = body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| {
                AppError::internal(
                    "Failed to read request body",
                    json!({ "reason": e.to_string() }),
                )
            })?;

        let start = Instant::now();
        let upstream = self
            .client
            .request(parts.method.clone(), url.as_str())
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, method = %parts.method, url = %url, "Upstream request failed");
                AppError::internal(
                    "Proxy request failed",
                    json!({ "destination": redirect.destination, "timeout": e.is_timeout() }),
                )
            })?;

        let status = upstream.status();
        let upstream_headers = upstream.headers().clone();
        let bytes = upstream.bytes().await.map_err(|e| {
            error!(error = %e, url = %url, "Failed to read upstream body");
            AppError::internal(
                "Failed to read upstream response",
                json!({ "destination": redirect.destination }),
            )
        })?;

        info!(
            method = %parts.method,
            url = %url,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Proxy exchange complete"
        );

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        copy_response_headers(&upstream_headers, response.headers_mut());

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};

    fn forwarder() -> ProxyForwarder {
        let client = ProxyForwarder::build_client(Duration::from_secs(5)).unwrap();
        ProxyForwarder::new(client, 1024 * 1024)
    }

    fn redirect(destination: &str, proxy: bool) -> Redirect {
        let mut redirect = Redirect::new(destination, None, proxy);
        redirect.id = "abc123".to_string();
        redirect
    }

    fn get(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_non_proxy_issues_temporary_redirect() {
        let response = forwarder()
            .forward(&redirect("https://example.com/page", false), get("/?to=abc123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://example.com/page"
        );
    }

    #[tokio::test]
    async fn test_invalid_destination_is_generic_error() {
        let result = forwarder()
            .forward(&redirect("not a url", true), get("/"))
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_connection_failure_is_generic_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let result = forwarder()
            .forward(
                &redirect(&format!("http://127.0.0.1:{}", port), true),
                get("/anything"),
            )
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let client = ProxyForwarder::build_client(Duration::from_secs(5)).unwrap();
        let forwarder = ProxyForwarder::new(client, 4);

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .body(Body::from("way more than four bytes"))
            .unwrap();

        let result = forwarder
            .forward(&redirect("http://127.0.0.1:1", true), request)
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }
}
