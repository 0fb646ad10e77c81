use serde::Serialize;

/// Generic fallback when a call fails without any recorded error.
pub const NETWORK_ERROR: &str = "Network error occurred";

/// Uniform result envelope returned for every call.
///
/// `success == true` never carries an `error`; `success == false` never
/// carries `data`. The constructors are the only way to build one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: Option<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Converts into a `Result`, using the error text (or the generic
    /// network error) on failure.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.unwrap_or_else(|| NETWORK_ERROR.to_owned())),
        }
    }
}

impl<T> From<crate::ApiError> for ApiResponse<T> {
    fn from(err: crate::ApiError) -> Self {
        Self::failure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::ApiResponse;
    use crate::ApiError;

    #[test]
    fn success_serializes_without_error_field() {
        let response = ApiResponse::ok(json!({"id": 1}), Some("ok".to_owned()));
        let encoded = serde_json::to_value(&response).expect("envelope must serialize");
        assert_eq!(
            encoded,
            json!({"success": true, "data": {"id": 1}, "message": "ok"})
        );
    }

    #[test]
    fn failure_carries_no_data() {
        let response: ApiResponse<Value> = ApiError::Forbidden.into();
        assert!(!response.is_success());
        assert!(response.data().is_none());
        assert!(response.error().is_some_and(|e| e.starts_with("Access denied")));
    }

    #[test]
    fn into_result_surfaces_error_text() {
        let response: ApiResponse<u32> = ApiResponse::failure("HTTP 502");
        assert_eq!(response.into_result(), Err("HTTP 502".to_owned()));
    }
}
