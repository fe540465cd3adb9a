//! Outgoing calls that carry the stored credential.
//!
//! Every screen fetch goes through [`AuthenticatedRequest::send`]. The
//! credential is read from the store on each call and never cached, so a
//! logout takes effect on the very next request.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use rootcause::Report;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ClientConfig;
use crate::error::RequestError;
use crate::store::CredentialReader;

/// Method, headers and body of a call, minus the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    method: Method,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
}

impl RequestOptions {
    /// Creates options for the given method with no headers or body.
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Creates options for a GET.
    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    /// Creates options for a POST.
    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    /// Adds a header. An `Authorization` header set here is always replaced.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the caller-supplied headers.
    #[must_use]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

/// Computes the headers actually sent for a call.
///
/// Caller headers are copied, any caller `Authorization` is dropped, a JSON
/// content type is added for bodies when asked and none was given, and the
/// credential is attached when one exists.
#[must_use]
pub fn merge_headers(
    options: &RequestOptions,
    token: Option<&str>,
    default_json: bool,
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = options
        .headers
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let has_content_type = merged
        .iter()
        .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
    if default_json && options.body.is_some() && !has_content_type {
        merged.push(("Content-Type".to_string(), "application/json".to_string()));
    }

    if let Some(token) = token {
        merged.push(("Authorization".to_string(), token.to_string()));
    }

    merged
}

/// A fully received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Wraps a status and raw body.
    #[must_use]
    pub fn new(status: StatusCode, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Returns the HTTP status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBody` if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Report<RequestError>> {
        serde_json::from_slice(&self.body).map_err(|e| {
            RequestError::InvalidBody {
                details: e.to_string(),
            }
            .into()
        })
    }

    /// Returns the top-level `message` string of a JSON body.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.top_level_string("message")
    }

    /// Returns the top-level `error_code` string of a JSON body.
    #[must_use]
    pub fn error_code(&self) -> Option<String> {
        self.top_level_string("error_code")
    }

    fn top_level_string(&self, field: &str) -> Option<String> {
        serde_json::from_slice::<Value>(&self.body)
            .ok()?
            .get(field)?
            .as_str()
            .map(str::to_string)
    }

    /// Turns a non-success status into an error.
    ///
    /// # Errors
    ///
    /// 401 becomes `Unauthorized`, 403 `Forbidden`, any other non-2xx
    /// status `Rejected`.
    pub fn error_for_status(self) -> Result<Self, Report<RequestError>> {
        if self.is_success() {
            return Ok(self);
        }

        let message = self.message();
        let err = match self.status {
            StatusCode::UNAUTHORIZED => RequestError::Unauthorized { message },
            StatusCode::FORBIDDEN => RequestError::Forbidden { message },
            status => RequestError::Rejected {
                status: status.as_u16(),
                code: self.error_code(),
                message,
            },
        };
        Err(err.into())
    }
}

/// Issues backend calls with the stored credential attached.
#[derive(Debug, Clone)]
pub struct AuthenticatedRequest {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    credentials: CredentialReader,
}

impl AuthenticatedRequest {
    /// Creates a requester reading credentials from `credentials`.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        config: Arc<ClientConfig>,
        credentials: CredentialReader,
    ) -> Self {
        Self {
            http,
            config,
            credentials,
        }
    }

    /// Sends a call to `path` on the backend.
    ///
    /// A call is never held back for lack of a credential; it goes out
    /// without an `Authorization` header and the backend decides. Any status
    /// is returned as a response; use [`ApiResponse::error_for_status`] to
    /// classify failures.
    ///
    /// # Errors
    ///
    /// Returns `NetworkFailure` if no response arrives, `InvalidHeader` or
    /// `InvalidBody` if the request cannot be built.
    #[instrument(skip(self, options), fields(method = %options.method()))]
    pub async fn send(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<ApiResponse, Report<RequestError>> {
        let token = self.credentials.get();
        if token.is_none() {
            debug!("no stored credential, sending without Authorization");
        }

        let mut request = self
            .http
            .request(options.method().clone(), self.config.endpoint(path));

        for (name, value) in
            merge_headers(options, token.as_deref(), self.config.content_type_json())
        {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RequestError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(&value)
                .map_err(|_| RequestError::InvalidHeader { name: name.clone() })?;
            request = request.header(header_name, header_value);
        }

        if let Some(body) = options.body() {
            let bytes = serde_json::to_vec(body).map_err(|e| RequestError::InvalidBody {
                details: e.to_string(),
            })?;
            request = request.body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestError::NetworkFailure {
                details: e.to_string(),
            })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| RequestError::NetworkFailure {
                details: e.to_string(),
            })?;

        debug!(status = status.as_u16(), "response received");
        Ok(ApiResponse::new(status, body.to_vec()))
    }
}
