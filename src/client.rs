//! HTTP client for the Freebox local management API.
//!
//! `FbxClient` wraps a `reqwest::Client` and knows three things: the API
//! root URL, whether to verify the router's TLS certificate, and the current
//! session token (if any). Every response is the standard Freebox envelope
//! `{"success": bool, "error_code"?, "msg"?, "result"?}`, modeled by
//! [`ApiResponse`].
//!
//! Auth header lifecycle:
//! - The two handshake calls (`login/authorize/`, `login/session/`) run
//!   before a session token exists; the session exchange passes the app
//!   token explicitly via [`FbxClient::post_with_token`].
//! - After a successful login the session token is stored on the client and
//!   attached as `X-Fbx-App-Auth` to every subsequent request. The token is
//!   per-client state, never process-global, so independent client instances
//!   cannot interfere with each other.
//! - There is no refresh logic: a session lasts until the client is dropped.

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

use crate::error::{FbxError, Result};

/// Header carrying the app token (during the session exchange) or the
/// session token (on every call after login).
pub const AUTH_HEADER: &str = "X-Fbx-App-Auth";

/// Connect timeout for the router API client.
/// Covers TCP + TLS handshake only; the Freebox is on the LAN, so 10 seconds
/// is already generous.
const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout. All Freebox management endpoints return small
/// JSON documents; nothing here streams large bodies.
const API_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds a `reqwest::Client` with explicit timeouts.
///
/// `verify_cert = false` disables TLS certificate verification. The Freebox
/// serves a self-signed certificate on its LAN address, so most deployments
/// need this off unless the Freebox CA has been installed locally.
fn build_api_client(verify_cert: bool) -> Client {
    Client::builder()
        .connect_timeout(API_CONNECT_TIMEOUT)
        .timeout(API_REQUEST_TIMEOUT)
        .danger_accept_invalid_certs(!verify_cert)
        .build()
        .expect("failed to build HTTP client for the Freebox API")
}

/// The standard Freebox response envelope.
///
/// Every endpoint wraps its payload the same way; `result` is absent on
/// some success responses (deletes, empty collections), so it is always
/// optional at the wire level and the conversion helpers decide whether
/// that is acceptable.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the router accepted the request.
    pub success: bool,

    /// Machine-readable error code, present when `success` is false
    /// (e.g. `auth_required`, `invalid_token`, `noent`).
    #[serde(default)]
    pub error_code: Option<String>,

    /// Human-readable error message, present when `success` is false.
    #[serde(default)]
    pub msg: Option<String>,

    /// The payload. Shape depends on the endpoint.
    pub result: Option<T>,
}

impl<T> ApiResponse<T> {
    /// The envelope error code, or `"unknown"` when the router omitted it.
    pub fn error_code(&self) -> String {
        self.error_code.clone().unwrap_or_else(|| "unknown".to_string())
    }

    /// Extracts the payload, treating both a failure envelope and a missing
    /// `result` as errors.
    ///
    /// Use for endpoints whose success responses always carry a payload
    /// (item gets, creates, updates).
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            let code = self.error_code();
            return Err(FbxError::Api {
                code,
                message: self.msg.unwrap_or_default(),
            });
        }
        match self.result {
            Some(value) => Ok(value),
            None => Err(FbxError::Api {
                code: "missing_result".to_string(),
                message: "success response carried no result payload".to_string(),
            }),
        }
    }

    /// Extracts the payload, substituting `T::default()` when a success
    /// envelope carries no `result`.
    ///
    /// The router omits `result` entirely for empty collections, so list
    /// endpoints go through this helper.
    pub fn into_result_or_default(self) -> Result<T>
    where
        T: Default,
    {
        if !self.success {
            let code = self.error_code();
            return Err(FbxError::Api {
                code,
                message: self.msg.unwrap_or_default(),
            });
        }
        Ok(self.result.unwrap_or_default())
    }
}

/// HTTP transport for the Freebox API.
///
/// Design decisions:
/// - `base_url` is a `String` rather than a constant so tests can point the
///   client at a local mock server, and because the Freebox API root varies
///   by deployment (`https://mafreebox.freebox.fr/api/v5/`, a LAN IP, ...).
/// - The session token lives here and is attached per request — there is no
///   shared default-header state to mutate.
#[derive(Debug)]
pub struct FbxClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl FbxClient {
    /// Creates a client for the given API root, e.g.
    /// `https://mafreebox.freebox.fr/api/v5`.
    ///
    /// A trailing slash is appended if missing so endpoint paths can be
    /// joined by simple concatenation.
    pub fn new(api_root: &str, verify_cert: bool) -> Self {
        let base_url = if api_root.ends_with('/') {
            api_root.to_string()
        } else {
            format!("{api_root}/")
        };
        FbxClient {
            client: build_api_client(verify_cert),
            base_url,
            session_token: None,
        }
    }

    /// Returns the session token, if a login has completed on this client.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Installs the session token used for every subsequent request.
    pub(crate) fn set_session_token(&mut self, token: String) {
        self.session_token = Some(token);
    }

    /// Core HTTP method: sends a request and deserializes the response
    /// envelope. All verb helpers delegate here.
    ///
    /// `path` is relative to the API root (no leading slash).
    /// `token_override` replaces the stored session token for this one call;
    /// the session exchange uses it to send the app token instead.
    ///
    /// The body is read as text before the status check so that non-2xx
    /// replies keep the router's diagnostic text in the error.
    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
        token_override: Option<&str>,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, path, "freebox api request");

        let mut req = self.client.request(method, &url);
        if let Some(token) = token_override.or(self.session_token.as_deref()) {
            req = req.header(AUTH_HEADER, token);
        }
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(payload) = body {
            req = req.json(payload);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(FbxError::Http { status, body: text });
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        Ok(envelope)
    }

    /// Sends a GET request and deserializes the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.send::<T, ()>(Method::GET, path, &[], None, None).await
    }

    /// Sends a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>> {
        self.send::<T, ()>(Method::GET, path, query, None, None).await
    }

    /// Sends a POST request with a JSON body.
    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, &[], Some(body), None).await
    }

    /// Sends a POST request authenticated with an explicit token instead of
    /// the stored session token. Used once, by the session exchange, which
    /// must present the app token before any session exists.
    pub(crate) async fn post_with_token<B, T>(
        &self,
        path: &str,
        body: &B,
        token: &str,
    ) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::POST, path, &[], Some(body), Some(token)).await
    }

    /// Sends a PUT request with a JSON body.
    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<ApiResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(Method::PUT, path, &[], Some(body), None).await
    }

    /// Sends a DELETE request and deserializes the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.send::<T, ()>(Method::DELETE, path, &[], None, None).await
    }
}
