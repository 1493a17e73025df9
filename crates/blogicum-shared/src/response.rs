//! Response envelopes (RFC 7807 for errors).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One page of a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Body of a `303 See Other`. `data` is absent when the mutation was refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectResponse<T> {
    pub redirect_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> RedirectResponse<T> {
    pub fn applied(redirect_to: impl Into<String>, data: T) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            data: Some(data),
        }
    }

    pub fn refused(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            data: None,
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    pub status: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Messages per form field, for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            instance: None,
            errors: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
        self.errors = Some(errors);
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(403, "Forbidden")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn unprocessable(errors: BTreeMap<String, Vec<String>>) -> Self {
        Self::new(422, "Unprocessable Entity")
            .with_detail("Submitted data is invalid")
            .with_errors(errors)
    }

    pub fn too_many_requests() -> Self {
        Self::new(429, "Too Many Requests")
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_details_omit_empty_members() {
        let body = serde_json::to_value(ErrorResponse::not_found("post 1")).unwrap();

        assert_eq!(body["type"], "about:blank");
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "post 1");
        assert!(body.get("errors").is_none());
        assert!(body.get("instance").is_none());
    }

    #[test]
    fn test_validation_problem_carries_field_errors() {
        let mut errors = BTreeMap::new();
        errors.insert("title".to_string(), vec!["This field is required.".to_string()]);

        let body = serde_json::to_value(ErrorResponse::unprocessable(errors)).unwrap();

        assert_eq!(body["status"], 422);
        assert_eq!(body["errors"]["title"][0], "This field is required.");
    }

    #[test]
    fn test_refused_redirect_has_no_data() {
        let body = serde_json::to_value(RedirectResponse::<()>::refused("/api/posts/1")).unwrap();

        assert_eq!(body["redirect_to"], "/api/posts/1");
        assert!(body.get("data").is_none());
    }
}
