/// Error type returned by this crate.
///
/// The `Display` text of each variant is what the request helper places in
/// [`ApiResponse::error`](crate::ApiResponse) when a call fails.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401. The cached bearer token has been cleared.
    #[error("Authentication required. Please log in again.")]
    Unauthorized,
    /// HTTP 403.
    #[error("Access denied. You do not have permission to perform this action.")]
    Forbidden,
    /// Any other non-success HTTP status.
    ///
    /// `message` comes from the response body's `message`/`error` field,
    /// falling back to `HTTP <status>`.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The attempt exceeded the configured per-attempt timeout and was aborted.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    /// Network or request execution error from `reqwest`.
    #[error("network error: {0}")]
    Transport(reqwest::Error),
    /// The request could not be built (bad header, unserializable body, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// The call failed without a more specific error.
    #[error("{}", crate::NETWORK_ERROR)]
    Network,
    /// Environment configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}
