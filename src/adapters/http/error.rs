//! Standard error body shared by every HTTP resource.

use serde::Serialize;

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_resource() {
        let error = ErrorResponse::not_found("Decision", "abc-123");
        assert_eq!(error.code, "NOT_FOUND");
        assert!(error.message.contains("Decision"));
        assert!(error.message.contains("abc-123"));
    }

    #[test]
    fn details_serialize_when_present() {
        let error = ErrorResponse::bad_request("nope")
            .with_details(serde_json::json!({"limit": 100}));
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["details"]["limit"], 100);
    }

    #[test]
    fn details_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::internal("boom")).unwrap();
        assert!(json.get("details").is_none());
    }
}
