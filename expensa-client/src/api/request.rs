use reqwest::{Method, StatusCode, header::HeaderMap};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use shared::models::MessageResponse;

use super::ApiError;

/// What the caller wants back from a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseKind {
    #[default]
    Json,
    Text,
    Bytes,
    Empty,
}

impl ResponseKind {
    /// Value of the `Accept` header sent with the request.
    #[must_use]
    pub const fn accept(self) -> &'static str {
        match self {
            Self::Json | Self::Empty => "application/json",
            Self::Text => "text/plain, application/json",
            Self::Bytes => "*/*",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Description of one backend call, independent of any HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, e.g. `api/expenses/4`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub headers: Vec<(String, String)>,
    pub expect: ResponseKind,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: Vec::new(),
            expect: ResponseKind::Json,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path).expect(ResponseKind::Empty)
    }

    #[must_use]
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Attaches a JSON body.
    ///
    /// # Errors
    /// Fails when `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiError::InvalidRequest(format!("unserializable body: {err}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attaches an `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = RequestBody::Form(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub const fn expect(mut self, kind: ResponseKind) -> Self {
        self.expect = kind;
        self
    }
}

/// A successful (2xx) response with its body already read.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decodes the body as JSON. An empty body decodes as `null`, so unit
    /// and `Option` targets accept `204 No Content`.
    ///
    /// # Errors
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let decoded = if self.body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(Value::Null)
        } else {
            serde_json::from_slice(&self.body)
        };
        decoded.map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// # Errors
    /// Returns [`ApiError::Decode`] when the body is not UTF-8.
    pub fn text(&self) -> Result<String, ApiError> {
        String::from_utf8(self.body.clone()).map_err(|err| ApiError::Decode(err.to_string()))
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    /// Acknowledgement of a public auth call. Some endpoints answer with a
    /// JSON `{message}`, others with plain text.
    ///
    /// # Errors
    /// Returns [`ApiError::Decode`] when the body is not UTF-8.
    pub fn message(&self) -> Result<MessageResponse, ApiError> {
        if let Ok(message) = self.json::<MessageResponse>() {
            return Ok(message);
        }
        Ok(MessageResponse {
            message: self.text()?.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(body: &str) -> ApiResponse {
        ApiResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn builder_collects_parts() {
        let request = ApiRequest::get("api/audit-logs")
            .query([("page", "0".to_string())])
            .query([("actor", "jane")])
            .header("X-Request-Id", "42");
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "0".to_string()),
                ("actor".to_string(), "jane".to_string())
            ]
        );
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.expect, ResponseKind::Json);
        assert_eq!(ApiRequest::delete("api/expenses/1").expect, ResponseKind::Empty);
    }

    #[test]
    fn json_and_form_bodies() {
        let request = ApiRequest::post("api/expenses")
            .json(&serde_json::json!({"title": "Taxi"}))
            .unwrap();
        assert_eq!(
            request.body,
            RequestBody::Json(serde_json::json!({"title": "Taxi"}))
        );

        let form = ApiRequest::post("api/auth/public/forgot-password").form([("email", "a@b.c")]);
        assert_eq!(
            form.body,
            RequestBody::Form(vec![("email".into(), "a@b.c".into())])
        );
    }

    #[test]
    fn empty_body_decodes_as_null() {
        response("").json::<()>().unwrap();
        assert_eq!(response("  ").json::<Option<u32>>().unwrap(), None);
        assert!(matches!(
            response("").json::<Vec<u32>>(),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn message_accepts_text_or_json() {
        assert_eq!(
            response(r#"{"message":"User registered successfully!"}"#)
                .message()
                .unwrap()
                .message,
            "User registered successfully!"
        );
        assert_eq!(
            response("Password reset email sent!\n").message().unwrap().message,
            "Password reset email sent!"
        );
    }
}
