//! HTTP transport with a file-backed cookie jar round trip.

pub mod headers;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::Serialize;

use crate::cookies::{self, Cookie};
use crate::error::DispatchError;

/// One outbound request. GET unless a body is supplied, in which case POST.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
    /// Cookies sent on top of the jar contents; same-named entries win.
    pub extra_cookies: Vec<Cookie>,
    pub jar_path: PathBuf,
}

impl DispatchRequest {
    #[must_use]
    pub fn get(url: impl Into<String>, headers: HeaderMap, jar_path: PathBuf) -> Self {
        Self {
            url: url.into(),
            headers,
            body: None,
            extra_cookies: Vec::new(),
            jar_path,
        }
    }

    #[must_use]
    pub fn with_extra_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.extra_cookies = cookies;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn method(&self) -> &'static str {
        if self.body.is_some() {
            "POST"
        } else {
            "GET"
        }
    }
}

/// Response body plus the HTTP status it came with, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawResponse {
    pub body: String,
    pub status: Option<u16>,
}

impl RawResponse {
    #[must_use]
    pub fn new(body: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            body: body.into(),
            status,
        }
    }

    /// Stand-in for a request that never produced a body.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Issues a single request and returns the raw body.
///
/// Implementations must read the request's jar file before sending and merge
/// any `Set-Cookie` headers back into it afterwards. Non-2xx statuses are not
/// errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: DispatchRequest) -> Result<RawResponse, DispatchError>;
}

/// `reqwest`-backed [`Transport`].
///
/// Redirects are not followed: IAAI signals a missing lot with a redirect
/// page whose body the caller needs to see.
pub struct HttpDispatcher {
    client: Client,
}

impl HttpDispatcher {
    /// Builds a dispatcher with TLS verification on, a whole-request timeout
    /// of `timeout_secs` and a connect timeout of `connect_timeout_secs`.
    /// With no `proxy_url` every request goes direct, ignoring proxy env vars.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::InvalidProxy`] if `proxy_url` cannot be parsed.
    /// - [`DispatchError::Http`] if the underlying client cannot be built.
    pub fn new(
        timeout_secs: u64,
        connect_timeout_secs: u64,
        proxy_url: Option<&str>,
    ) -> Result<Self, DispatchError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::none());

        builder = match proxy_url {
            Some(url) => {
                let proxy = reqwest::Proxy::all(url).map_err(|e| DispatchError::InvalidProxy {
                    reason: e.to_string(),
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpDispatcher {
    async fn send(&self, request: DispatchRequest) -> Result<RawResponse, DispatchError> {
        let method = request.method();
        let jar = cookies::load_all(&request.jar_path).with_overrides(&request.extra_cookies);

        let mut builder = match request.body {
            Some(body) => self.client.post(&request.url).body(body),
            None => self.client.get(&request.url),
        };
        builder = builder.headers(request.headers);

        if !jar.is_empty() {
            let value = HeaderValue::from_str(&jar.serialize()).map_err(|e| {
                DispatchError::InvalidHeader {
                    name: COOKIE.to_string(),
                    reason: e.to_string(),
                }
            })?;
            builder = builder.header(COOKIE, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();

        let set_cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_owned)
            .collect();
        cookies::merge_set_cookies(&request.jar_path, &set_cookies);

        let body = response.text().await?;
        tracing::debug!(
            url = %request.url,
            method,
            status,
            body_len = body.len(),
            cookies_sent = jar.len(),
            cookies_received = set_cookies.len(),
            "dispatch complete"
        );

        Ok(RawResponse::new(body, Some(status)))
    }
}
