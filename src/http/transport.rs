// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport adapter
//!
//! Translates an internal [`Request`] into a wire call and the wire reply
//! into an internal [`Response`]. The adapter performs no redirects of its
//! own; the browser owns redirect logic.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Url};

use super::request::{encode_pairs, flatten_params, Request};
use super::response::Response;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// A sink that consumes a normalised request and produces a normalised
/// response, one hop at a time.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single HTTP exchange. The request URI is absolute and the
    /// method uppercased; redirects must not be followed.
    async fn do_request(&self, request: &Request) -> Result<Response>;
}

/// Transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            proxy: None,
        }
    }
}

impl TransportConfig {
    /// Create a new transport config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid TLS certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

/// HTTP transport backed by reqwest
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Create a transport with custom configuration
    pub fn with_config(config: TransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .cookie_store(false);

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn do_request(&self, request: &Request) -> Result<Response> {
        let url = Url::parse(request.uri())?;
        let method = Method::from_bytes(request.method().as_bytes())
            .map_err(|_| Error::logic(format!("invalid HTTP method '{}'", request.method())))?;

        let mut builder = self
            .client
            .request(method, url)
            .headers(build_headers(request));

        let is_bodyless = matches!(request.method(), "GET" | "HEAD");
        if !request.files().is_empty() && !is_bodyless {
            let mut form = reqwest::multipart::Form::new();
            for (name, value) in flatten_params(request.parameters()) {
                form = form.text(name, value);
            }
            for (field, file) in request.files() {
                let data = tokio::fs::read(&file.path).await?;
                let mut part =
                    reqwest::multipart::Part::bytes(data).file_name(file.name.clone());
                if let Some(ref content_type) = file.content_type {
                    part = part.mime_str(content_type)?;
                }
                form = form.part(field.clone(), part);
            }
            builder = builder.multipart(form);
        } else if let Some(content) = request.content() {
            if !is_bodyless {
                builder = builder.body(content.clone());
            }
        } else if !request.parameters().is_empty() && !is_bodyless {
            let body = encode_pairs(&flatten_params(request.parameters()));
            if request.server().get("CONTENT_TYPE").is_none() {
                builder = builder.header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
            }
            builder = builder.body(body);
        }

        let reply = builder.send().await?;

        let status = reply.status().as_u16();
        let mut headers = Vec::new();
        for (name, value) in reply.headers() {
            headers.push((
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            ));
        }
        let body = reply.bytes().await?;

        tracing::debug!(uri = request.uri(), status, "transport exchange complete");

        Ok(Response::new(status, headers, body))
    }
}

/// Fold server parameters and the cookie snapshot into outgoing headers.
fn build_headers(request: &Request) -> HeaderMap {
    let server = request.server();
    let mut headers = HeaderMap::new();

    for (key, value) in server.extra() {
        let name = if let Some(stripped) = key.strip_prefix("HTTP_") {
            stripped.to_ascii_lowercase().replace('_', "-")
        } else if matches!(key.as_str(), "CONTENT_TYPE" | "CONTENT_LENGTH" | "CONTENT_MD5") {
            key.to_ascii_lowercase().replace('_', "-")
        } else {
            continue;
        };
        insert_header(&mut headers, &name, value);
    }

    if let Some(host) = server.host() {
        insert_header(&mut headers, "host", host);
    }
    if let Some(referer) = server.referer() {
        insert_header(&mut headers, "referer", referer);
    }
    let user_agent = server.user_agent().unwrap_or(DEFAULT_USER_AGENT);
    insert_header(&mut headers, "user-agent", user_agent);

    if let Some((user, password)) = server.auth() {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", user, password));
        insert_header(&mut headers, "authorization", &format!("Basic {}", encoded));
    }

    if !request.cookies().is_empty() {
        let cookie_header = request
            .cookies()
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        insert_header(&mut headers, "cookie", &cookie_header);
    }

    headers
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    if let (Ok(name), Ok(value)) = (
        HeaderName::try_from(name),
        HeaderValue::try_from(value),
    ) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::{Files, Params, ServerParams};
    use std::collections::BTreeMap;

    fn request_with_server(server: ServerParams) -> Request {
        Request::new(
            "GET",
            "http://example.com/",
            Params::new(),
            Files::new(),
            server,
            None,
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_http_prefix_folding() {
        let mut server = ServerParams::new();
        server.set("HTTP_X_REQUESTED_WITH", "XMLHttpRequest");
        server.set("HTTP_ACCEPT_LANGUAGE", "fi-FI");
        server.set("CONTENT_TYPE", "text/plain");
        server.set("REMOTE_ADDR", "127.0.0.1");

        let headers = build_headers(&request_with_server(server));
        assert_eq!(
            headers.get("x-requested-with").unwrap(),
            "XMLHttpRequest"
        );
        assert_eq!(headers.get("accept-language").unwrap(), "fi-FI");
        assert_eq!(headers.get("content-type").unwrap(), "text/plain");
        assert!(headers.get("remote-addr").is_none());
    }

    #[test]
    fn test_default_user_agent_applies() {
        let headers = build_headers(&request_with_server(ServerParams::new()));
        assert_eq!(headers.get("user-agent").unwrap(), DEFAULT_USER_AGENT);

        let mut server = ServerParams::new();
        server.set_user_agent("Custom/2.0");
        let headers = build_headers(&request_with_server(server));
        assert_eq!(headers.get("user-agent").unwrap(), "Custom/2.0");
    }

    #[test]
    fn test_basic_auth_header() {
        let mut server = ServerParams::new();
        server.set_auth("kala", "mari");
        let headers = build_headers(&request_with_server(server));
        // base64("kala:mari")
        assert_eq!(headers.get("authorization").unwrap(), "Basic a2FsYTptYXJp");
    }

    #[test]
    fn test_single_cookie_header() {
        let mut cookies = BTreeMap::new();
        cookies.insert("a".to_string(), "1".to_string());
        cookies.insert("b".to_string(), "2".to_string());
        let request = Request::new(
            "GET",
            "http://example.com/",
            Params::new(),
            Files::new(),
            ServerParams::new(),
            None,
            cookies,
        );

        let headers = build_headers(&request);
        assert_eq!(headers.get("cookie").unwrap(), "a=1; b=2");
    }
}
