//! DTOs for the redirect administration endpoints.

use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::domain::entities::Redirect;
use crate::error::AppError;

/// Body of `PUT`/`POST {ctx}/redirect[/{id}]`.
///
/// Responses reuse [`Redirect`] directly, so the JSON shape on the way out
/// is the stored record (`id`, `createdAt`, `updatedAt`, `dns`,
/// `destination`, `proxy`).
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRequest {
    /// Host name matched during implicit resolution.
    #[validate(length(min = 1, max = 253))]
    pub dns: Option<String>,

    /// Absolute URL to redirect or proxy to.
    #[validate(url(message = "Invalid URL format"))]
    pub destination: Option<String>,

    /// Relay the exchange instead of answering with a 307.
    #[serde(default)]
    pub proxy: bool,
}

impl RedirectRequest {
    /// Applies the request onto `redirect`.
    ///
    /// Present `dns`/`destination` overwrite; `proxy` always does.
    pub fn merge_into(self, redirect: &mut Redirect) {
        if let Some(dns) = self.dns {
            redirect.dns = Some(dns);
        }
        if let Some(destination) = self.destination {
            redirect.destination = destination;
        }
        redirect.proxy = self.proxy;
    }

    /// Builds a new, unsaved record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequestBody`] when `destination` is absent.
    pub fn into_new(self, id: Option<String>) -> Result<Redirect, AppError> {
        let destination = self.destination.ok_or_else(|| {
            AppError::invalid_request_body(
                "Validation failed",
                json!({ "destination": "destination is required" }),
            )
        })?;

        let mut redirect = Redirect::new(destination, self.dns, self.proxy);
        if let Some(id) = id {
            redirect.id = id;
        }
        Ok(redirect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Redirect {
        let mut redirect = Redirect::new(
            "https://old.example.com",
            Some("old.example.com".to_string()),
            true,
        );
        redirect.id = "abc".to_string();
        redirect
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut redirect = existing();
        RedirectRequest {
            dns: None,
            destination: Some("https://new.example.com".to_string()),
            proxy: false,
        }
        .merge_into(&mut redirect);

        assert_eq!(redirect.id, "abc");
        assert_eq!(redirect.dns.as_deref(), Some("old.example.com"));
        assert_eq!(redirect.destination, "https://new.example.com");
        assert!(!redirect.proxy);
    }

    #[test]
    fn test_merge_overwrites_dns() {
        let mut redirect = existing();
        RedirectRequest {
            dns: Some("new.example.com".to_string()),
            destination: None,
            proxy: true,
        }
        .merge_into(&mut redirect);

        assert_eq!(redirect.dns.as_deref(), Some("new.example.com"));
        assert_eq!(redirect.destination, "https://old.example.com");
        assert!(redirect.proxy);
    }

    #[test]
    fn test_into_new_requires_destination() {
        let err = RedirectRequest::default().into_new(None).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequestBody { .. }));

        let redirect = RedirectRequest {
            destination: Some("https://example.com".to_string()),
            ..Default::default()
        }
        .into_new(Some("fixed-id".to_string()))
        .unwrap();
        assert_eq!(redirect.id, "fixed-id");
        assert!(!redirect.is_persisted());
    }

    #[test]
    fn test_validation() {
        let valid = RedirectRequest {
            dns: Some("go.example.com".to_string()),
            destination: Some("https://example.com/landing".to_string()),
            proxy: false,
        };
        assert!(valid.validate().is_ok());

        let bad_url = RedirectRequest {
            destination: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(bad_url.validate().is_err());

        let empty_dns = RedirectRequest {
            dns: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_dns.validate().is_err());

        let long_dns = RedirectRequest {
            dns: Some("a".repeat(254)),
            ..Default::default()
        };
        assert!(long_dns.validate().is_err());
    }
}
