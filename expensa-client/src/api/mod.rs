//! Authenticated HTTP access to the expense backend.
//!
//! Every call goes through [`ApiClient::send`], which attaches the bearer
//! token of the persisted session and the anti-forgery token, fetching the
//! latter once and caching it in the same storage.

mod error;
mod request;

pub use error::ApiError;
pub use request::{ApiRequest, ApiResponse, RequestBody, ResponseKind};

use std::{cell::RefCell, fmt, rc::Rc};

use futures::lock::Mutex;
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderName, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use shared::{
    config::ClientConfig,
    models::{CsrfTokenResponse, ErrorResponse},
};
use tracing::{debug, warn};
use url::Url;

use crate::{
    record::{CSRF_TOKEN_KEY, stored_token},
    storage::SessionStorage,
};

/// Endpoint issuing anti-forgery tokens.
pub const CSRF_PATH: &str = "api/auth/csrf";
/// Header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-XSRF-TOKEN";

type AuthFailureHook = Rc<dyn Fn(StatusCode, Option<&str>)>;

/// Shared handle to the HTTP client. Clones are cheap and see the same
/// cache and hooks.
#[derive(Clone)]
pub struct ApiClient {
    inner: Rc<Inner>,
}

struct Inner {
    base_url: Url,
    http: Client,
    storage: Rc<dyn SessionStorage>,
    csrf_fetch: Mutex<()>,
    hooks: RefCell<Vec<AuthFailureHook>>,
}

impl ApiClient {
    pub fn new(base_url: Url, storage: Rc<dyn SessionStorage>) -> Self {
        Self::with_http(base_url, storage, Client::new())
    }

    pub fn with_http(base_url: Url, storage: Rc<dyn SessionStorage>, http: Client) -> Self {
        Self {
            inner: Rc::new(Inner {
                base_url,
                http,
                storage,
                csrf_fetch: Mutex::new(()),
                hooks: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Builds a client for `config`, applying its request timeout where the
    /// platform supports one.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidRequest`] when the HTTP client cannot be
    /// constructed.
    pub fn from_config(
        config: &ClientConfig,
        storage: Rc<dyn SessionStorage>,
    ) -> Result<Self, ApiError> {
        #[cfg(not(target_arch = "wasm32"))]
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("expensa/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ApiError::InvalidRequest(format!("failed to build HTTP client: {err}")))?;
        #[cfg(target_arch = "wasm32")]
        let http = Client::new();

        Ok(Self::with_http(config.api_base_url.clone(), storage, http))
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Storage holding the session record and the anti-forgery token.
    #[must_use]
    pub fn storage(&self) -> &Rc<dyn SessionStorage> {
        &self.inner.storage
    }

    /// Registers a callback run once for every response classified as an
    /// authentication failure. The hook receives the bearer token the
    /// rejected request carried.
    pub fn on_auth_failure(&self, hook: impl Fn(StatusCode, Option<&str>) + 'static) {
        self.inner.hooks.borrow_mut().push(Rc::new(hook));
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidRequest(format!("invalid path {path}: {err}")))
    }

    /// Sends `request` with the session credentials attached.
    ///
    /// # Errors
    /// Transport failures, non-2xx statuses and storage failures are returned
    /// unchanged. A 401 also runs the auth-failure hooks.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = self.url(&request.path)?;
        let extra_headers = request
            .headers
            .iter()
            .map(|(name, value)| header_pair(name, value))
            .collect::<Result<Vec<_>, _>>()?;
        let bearer = stored_token(self.storage().as_ref())?;
        let csrf = self.csrf_token().await?;

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, request.expect.accept());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(token) = csrf {
            builder = builder.header(CSRF_HEADER, token);
        }
        for (name, value) in extra_headers {
            builder = builder.header(name, value);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
        };

        debug!(method = %request.method, path = %request.path, "sending request");
        let response = builder.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(ApiError::Transport)?.to_vec();

        if !status.is_success() {
            warn!(method = %request.method, path = %request.path, %status, "request rejected");
            if status == StatusCode::UNAUTHORIZED {
                self.notify_auth_failure(status, bearer.as_deref());
            }
            return Err(ApiError::Status {
                status,
                body: ErrorResponse::parse(&String::from_utf8_lossy(&body)),
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    fn notify_auth_failure(&self, status: StatusCode, token: Option<&str>) {
        let hooks: Vec<AuthFailureHook> = self.inner.hooks.borrow().clone();
        for hook in hooks {
            hook(status, token);
        }
    }

    fn cached_csrf(&self) -> Result<Option<String>, ApiError> {
        Ok(self
            .storage()
            .get(CSRF_TOKEN_KEY)?
            .filter(|token| !token.trim().is_empty()))
    }

    /// Cached anti-forgery token, fetching it on first use.
    ///
    /// Concurrent callers wait on one fetch. When the fetch fails the request
    /// goes out without the header.
    async fn csrf_token(&self) -> Result<Option<String>, ApiError> {
        if let Some(token) = self.cached_csrf()? {
            return Ok(Some(token));
        }

        let _fetching = self.inner.csrf_fetch.lock().await;
        if let Some(token) = self.cached_csrf()? {
            return Ok(Some(token));
        }

        match self.fetch_csrf().await {
            Ok(token) => {
                self.storage().set(CSRF_TOKEN_KEY, &token)?;
                debug!("cached anti-forgery token");
                Ok(Some(token))
            }
            Err(err) => {
                warn!(error = %err, "anti-forgery token unavailable, sending request without it");
                Ok(None)
            }
        }
    }

    async fn fetch_csrf(&self) -> Result<String, ApiError> {
        let response = self
            .inner
            .http
            .get(self.url(CSRF_PATH)?)
            .header(ACCEPT, ResponseKind::Json.accept())
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status, body: None });
        }
        let body: CsrfTokenResponse = response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        if body.token.trim().is_empty() {
            return Err(ApiError::Decode("empty anti-forgery token".into()));
        }
        Ok(body.token)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.send(ApiRequest::get(path)).await?.json()
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::post(path).json(body)?).await?.json()
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(ApiRequest::put(path).json(body)?).await?.json()
    }

    /// Posts url-encoded `fields`; the raw response is returned since form
    /// endpoints answer with either a message object or plain text.
    pub async fn post_form<K, V>(
        &self,
        path: &str,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<ApiResponse, ApiError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.send(ApiRequest::post(path).form(fields)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(ApiRequest::delete(path)).await.map(drop)
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self
            .send(ApiRequest::get(path).expect(ResponseKind::Bytes))
            .await?
            .into_bytes())
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("storage", &self.inner.storage)
            .field("auth_failure_hooks", &self.inner.hooks.borrow().len())
            .finish_non_exhaustive()
    }
}

impl PartialEq for ApiClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Parses a caller-supplied header into its typed form.
fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), ApiError> {
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
        ApiError::InvalidRequest(format!("invalid header name {name:?}: {err}"))
    })?;
    let header_value = HeaderValue::from_str(value).map_err(|err| {
        ApiError::InvalidRequest(format!("invalid value for header {name}: {err}"))
    })?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_headers_are_invalid_requests() {
        assert!(header_pair("X-Request-Id", "42").is_ok());
        assert!(matches!(
            header_pair("bad header", "42"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            header_pair("X-Request-Id", "line\nbreak"),
            Err(ApiError::InvalidRequest(_))
        ));
    }
}
