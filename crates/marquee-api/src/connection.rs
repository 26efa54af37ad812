use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Shared pipe to the catalog service.
///
/// Owns the HTTP client and the cookie jar carrying the session
/// credential, so the cookie set by a login is sent on every later
/// request from either client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Connection {
    http: Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl Connection {
    pub fn new(base_url: Url, timeout: Duration) -> ApiResult<Self> {
        Self::with_session_cookie(base_url, timeout, None)
    }

    /// Build a connection, restoring a previously captured session cookie
    /// (the `Cookie` header value returned by [`Connection::session_cookie`]).
    pub fn with_session_cookie(
        mut base_url: Url,
        timeout: Duration,
        cookie: Option<&str>,
    ) -> ApiResult<Self> {
        // The base path must end in a slash, or `Url::join` drops its
        // last segment when endpoints are resolved against it.
        if !base_url.path().ends_with('/') {
            let dir = format!("{}/", base_url.path());
            base_url.set_path(&dir);
        }

        let jar = Arc::new(Jar::default());
        if let Some(header) = cookie {
            // Header form is `name=value; other=value`; the jar wants one
            // cookie string at a time.
            for pair in header.split("; ").filter(|p| !p.is_empty()) {
                jar.add_cookie_str(pair, &base_url);
            }
        }

        let http = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            jar,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current session cookie as a `Cookie` header value, if the server
    /// has set one. Persist this to resume the session in a later run.
    pub fn session_cookie(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|v| v.to_str().ok().map(str::to_owned))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Resolve an endpoint path against the service root. A root with a
    /// path prefix keeps it: `/movies/7` on `http://host/imovie/` becomes
    /// `http://host/imovie/movies/7`.
    pub(crate) fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Parse(format!("bad endpoint path {path}: {e}")))
    }

    /// Check the HTTP response for errors and return the body text on
    /// failure. 401 is the session-rejected signal; any other non-2xx
    /// status is a generic API failure.
    pub(crate) async fn check_response(resp: Response) -> ApiResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(status = status.as_u16(), "session rejected by server");
            return Err(ApiError::Auth { message });
        }

        tracing::warn!(status = status.as_u16(), "API error");
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Decode a JSON response body.
    pub(crate) async fn json_body<T: serde::de::DeserializeOwned>(resp: Response) -> ApiResult<T> {
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
