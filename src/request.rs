use reqwest::Method;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Body {
    Empty,
    Text(String),
    /// Body serialization failed; the request is reported as invalid.
    Invalid(String),
}

/// A single logical request: endpoint, method, header overrides and body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) endpoint: String,
    pub(crate) segments: Vec<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Body,
}

impl ApiRequest {
    /// Creates a request for `endpoint` relative to the client base URL.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            segments: Vec::new(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Appends a path segment to the endpoint, percent-encoded as-is.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Adds a header override. Overrides replace default headers of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets an already serialized body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Body::Text(body.into());
        self
    }

    /// Serializes `value` as the JSON body.
    ///
    /// A serialization failure is not raised here; the client reports it as
    /// an invalid request without touching the network.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        self.body = match serde_json::to_string(value) {
            Ok(text) => Body::Text(text),
            Err(err) => Body::Invalid(err.to_string()),
        };
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use reqwest::Method;
    use serde_json::json;

    use super::{ApiRequest, Body};

    #[test]
    fn json_body_is_serialized_eagerly() {
        let request = ApiRequest::post("/api/auth/login").json(&json!({"email": "a@b.c"}));
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body, Body::Text(r#"{"email":"a@b.c"}"#.to_owned()));
    }

    #[test]
    fn unserializable_body_is_marked_invalid() {
        // JSON object keys must be strings.
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], 1);
        let request = ApiRequest::post("/x").json(&map);
        assert!(matches!(request.body, Body::Invalid(_)));
    }

    #[test]
    fn headers_keep_insertion_order() {
        let request = ApiRequest::get("/x").header("X-A", "1").header("X-B", "2");
        assert_eq!(request.headers[0].0, "X-A");
        assert_eq!(request.headers[1].0, "X-B");
    }
}
