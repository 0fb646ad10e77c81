use std::fmt;
use std::sync::Arc;

use reqwest::{
    header::{self, HeaderMap, HeaderName, HeaderValue},
    Url,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    outcome::{
        classify_response, classify_status, classify_transport_error, AttemptOutcome, StatusClass,
    },
    request::Body,
    sleep::{default_sleeper, Sleeper},
    token::{bearer_authorization, MemoryTokenStore, TokenStore},
    ApiError, ApiRequest, ApiResponse, ClientOptions, Result,
};

#[derive(Clone)]
/// HTTP client for the marketplace REST backend.
///
/// Every call goes through [`AgriClient::send`], which applies the
/// per-attempt timeout, bounded exponential-backoff retry and response
/// classification, and always resolves to an [`ApiResponse`].
pub struct AgriClient {
    http: reqwest::Client,
    options: ClientOptions,
    tokens: Arc<dyn TokenStore>,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for AgriClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgriClient")
            .field("options", &self.options)
            .field(
                "token",
                &self.tokens.get().map(|_| "<redacted>").unwrap_or("<none>"),
            )
            .finish()
    }
}

impl AgriClient {
    /// Creates a client for `base_url` with default options, an empty
    /// in-memory token store and wall-clock backoff.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client_options(ClientOptions::default().with_base_url(base_url))
    }

    /// Creates a client from explicit options.
    pub fn with_client_options(options: ClientOptions) -> Self {
        Self {
            http: reqwest::Client::new(),
            options,
            tokens: Arc::new(MemoryTokenStore::new()),
            sleeper: default_sleeper(),
        }
    }

    /// Creates a client from `AGRIMARKET_API_*` environment variables.
    ///
    /// See [`ClientOptions::from_env`] for the variables read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use agrimarket_http::AgriClient;
    ///
    /// let client = AgriClient::from_env().expect("invalid AGRIMARKET_API_* env vars");
    /// ```
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_client_options(ClientOptions::from_env()?))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the token store shared by every call of this client.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.tokens = store;
        self
    }

    /// Replaces the delay used between retry attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Sends `request` and decodes the payload into `T`.
    ///
    /// Never fails: transport errors, error statuses and decode failures are
    /// all reported through `ApiResponse { success: false, error }`.
    ///
    /// - 2xx: `data` is the body's `data` field if present, else the whole body.
    /// - 401: the token store is cleared, no retry.
    /// - 403: no retry.
    /// - timeout or malformed request: no retry.
    /// - anything else: retried up to `max_attempts`, waiting
    ///   `retry_backoff_ms * 2^attempt` between attempts.
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> ApiResponse<T> {
        match self.send_with_retry(request).await {
            Ok((data, message)) => match serde_json::from_value::<T>(data) {
                Ok(data) => ApiResponse::ok(data, message),
                Err(err) => ApiError::Decode(format!("unexpected response payload: {err}")).into(),
            },
            Err(err) => err.into(),
        }
    }

    /// Sends `request` and returns the payload as untyped JSON.
    pub async fn send_json(&self, request: &ApiRequest) -> ApiResponse<Value> {
        self.send(request).await
    }

    async fn send_with_retry(
        &self,
        request: &ApiRequest,
    ) -> std::result::Result<(Value, Option<String>), ApiError> {
        let headers = self.build_headers(request)?;
        if let Body::Invalid(reason) = &request.body {
            return Err(ApiError::InvalidRequest(format!("body: {reason}")));
        }

        let url = self
            .options
            .resolve_url(&request.endpoint, request.segments.as_slice())?;
        let attempts = self.options.attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            #[cfg(feature = "tracing")]
            tracing::debug!(%url, method = %request.method, attempt, attempts, "sending request");

            match self.attempt(&url, request, &headers).await {
                AttemptOutcome::Success { data, message } => return Ok((data, message)),
                AttemptOutcome::AuthError => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%url, "authentication rejected, clearing cached token");

                    self.tokens.clear();
                    return Err(ApiError::Unauthorized);
                }
                AttemptOutcome::PermissionError => return Err(ApiError::Forbidden),
                AttemptOutcome::TerminalError(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(%url, error = %err, "request failed, not retrying");

                    return Err(err);
                }
                AttemptOutcome::RetryableError(err) => {
                    if attempt < attempts {
                        let delay = self.options.backoff_delay(attempt);

                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            %url,
                            error = %err,
                            delay_ms = delay.as_millis() as u64,
                            "retrying request"
                        );

                        self.sleeper.sleep(delay).await;
                    }
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or(ApiError::Network))
    }

    async fn attempt(
        &self,
        url: &Url,
        request: &ApiRequest,
        headers: &HeaderMap,
    ) -> AttemptOutcome {
        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(headers.clone())
            .timeout(self.options.timeout());
        if let Body::Text(text) = &request.body {
            builder = builder.body(text.clone());
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return classify_transport_error(err, self.options.timeout_ms),
        };

        let status = response.status();
        match classify_status(status) {
            StatusClass::Unauthorized => return AttemptOutcome::AuthError,
            StatusClass::Forbidden => return AttemptOutcome::PermissionError,
            StatusClass::Success | StatusClass::Retryable => {}
        }

        match response.text().await {
            Ok(body) => classify_response(status, &body),
            Err(err) => classify_transport_error(err, self.options.timeout_ms),
        }
    }

    /// Default JSON headers, then the bearer token, then caller overrides.
    fn build_headers(&self, request: &ApiRequest) -> std::result::Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = self.tokens.get() {
            let value = HeaderValue::from_str(&bearer_authorization(&token))
                .map_err(|err| ApiError::InvalidRequest(format!("authorization header: {err}")))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| ApiError::InvalidRequest(format!("header name '{name}': {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| ApiError::InvalidRequest(format!("header '{name}': {err}")))?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use reqwest::header;

    use super::AgriClient;
    use crate::{ApiError, ApiRequest, MemoryTokenStore, TokenStore};

    #[test]
    fn debug_redacts_token() {
        let client = AgriClient::new("http://api.test")
            .with_token_store(Arc::new(MemoryTokenStore::with_token("secret-token")));
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn headers_merge_defaults_token_and_overrides() {
        let store = Arc::new(MemoryTokenStore::with_token("abc"));
        let client = AgriClient::new("http://api.test").with_token_store(store);
        let request = ApiRequest::get("/x")
            .header("Content-Type", "text/plain")
            .header("X-Trace", "1");

        let headers = client
            .build_headers(&request)
            .expect("valid headers must build");

        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer abc");
        assert_eq!(headers["x-trace"], "1");
        assert_eq!(headers.get_all(header::CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn override_can_replace_authorization() {
        let store = Arc::new(MemoryTokenStore::with_token("abc"));
        let client = AgriClient::new("http://api.test").with_token_store(store.clone());
        let request = ApiRequest::get("/x").header("Authorization", "Bearer other");

        let headers = client.build_headers(&request).expect("headers must build");
        assert_eq!(headers[header::AUTHORIZATION], "Bearer other");
        assert_eq!(store.get().as_deref(), Some("abc"));
    }

    #[test]
    fn no_authorization_without_token() {
        let client = AgriClient::new("http://api.test");
        let headers = client
            .build_headers(&ApiRequest::get("/x"))
            .expect("headers must build");
        assert!(headers.get(header::AUTHORIZATION).is_none());
    }

    #[test]
    fn invalid_header_name_is_invalid_request() {
        let client = AgriClient::new("http://api.test");
        let err = client
            .build_headers(&ApiRequest::get("/x").header("bad header", "1"))
            .expect_err("space in header name must fail");
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
