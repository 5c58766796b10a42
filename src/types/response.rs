// src/types/response.rs
use serde::{Deserialize, Serialize};

// ===== Remote Store Response Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineResponse {
    pub message: String,
    pub jd_draft: String,
}

/// Error body returned by the store; `detail` is a string or a list of
/// field errors.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub detail: serde_json::Value,
}

impl ErrorResponse {
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(|msg| msg.as_str())
                        .map(str::to_string)
                        .unwrap_or_else(|| item.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

// ===== LinkedIn Publishing =====

#[derive(Clone, Serialize, Deserialize)]
pub struct LinkedInPostRequest {
    pub job_post_id: i64,
    pub access_token: String,
    pub author_urn: String,
}

impl std::fmt::Debug for LinkedInPostRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkedInPostRequest")
            .field("job_post_id", &self.job_post_id)
            .field("access_token", &"***")
            .field("author_urn", &self.author_urn)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedInPostResponse {
    pub success: bool,
    pub post_id: Option<String>,
    pub post_url: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_string_detail() {
        let body: ErrorResponse = serde_json::from_str(r#"{"detail":"Job post not found"}"#).unwrap();
        assert_eq!(body.message(), "Job post not found");
    }

    #[test]
    fn test_error_response_validation_detail() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"detail":[{"loc":["body","role_request"],"msg":"field required"},{"msg":"too long"}]}"#,
        )
        .unwrap();
        assert_eq!(body.message(), "field required; too long");
    }

    #[test]
    fn test_linkedin_request_debug_hides_token() {
        let request = LinkedInPostRequest {
            job_post_id: 3,
            access_token: "li-secret".to_string(),
            author_urn: "urn:li:person:abc".to_string(),
        };
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("li-secret"));
        assert!(rendered.contains("urn:li:person:abc"));
    }
}
