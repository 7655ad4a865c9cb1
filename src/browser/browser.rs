// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Browser orchestrator
//!
//! Drives the request/response pipeline: URI resolution against the last
//! request, server-parameter merging, cookie jar and history updates,
//! redirect and meta-refresh chasing, and the HTML navigation helpers.

use bytes::Bytes;

use super::config::BrowserConfig;
use super::crawler::{Crawler, Link};
use super::form::Form;
use super::history::History;
use crate::error::{Error, Result};
use crate::http::{
    CookieJar, Files, HttpTransport, Params, Request, Response, ServerParams, Transport,
};
use crate::uri;

/// A scripted browser over an injectable transport.
///
/// One owning task drives a browser; it is not meant for concurrent use.
pub struct Browser {
    transport: Box<dyn Transport>,
    user_agent: String,
    server: ServerParams,
    history: History,
    cookie_jar: CookieJar,
    follow_redirects: bool,
    follow_meta_refresh: bool,
    max_redirects: i32,
    redirect_count: u32,
    redirect: Option<String>,
    internal_request: Option<Request>,
    internal_response: Option<Response>,
    response: Option<Response>,
    crawler: Option<Crawler>,
    response_filter: Option<Box<dyn Fn(Response) -> Response + Send + Sync>>,
}

impl Browser {
    /// Create a browser over the default HTTP transport
    pub fn new() -> Result<Self> {
        Self::with_config(BrowserConfig::default())
    }

    /// Create a browser over the default HTTP transport with custom
    /// configuration
    pub fn with_config(config: BrowserConfig) -> Result<Self> {
        let transport = HttpTransport::with_config(config.transport.clone())?;
        Ok(Self::with_transport(transport, config))
    }

    /// Create a browser over an injected transport
    pub fn with_transport(transport: impl Transport + 'static, config: BrowserConfig) -> Self {
        Self {
            transport: Box::new(transport),
            user_agent: config.user_agent,
            server: ServerParams::new(),
            history: History::new(),
            cookie_jar: CookieJar::new(),
            follow_redirects: config.follow_redirects,
            follow_meta_refresh: config.follow_meta_refresh,
            max_redirects: config.max_redirects,
            redirect_count: 0,
            redirect: None,
            internal_request: None,
            internal_response: None,
            response: None,
            crawler: None,
            response_filter: None,
        }
    }

    /// Perform a request. A relative `uri` is resolved against the
    /// previous request; `server` is layered over the default server
    /// parameters for this call only. Redirects and meta refreshes are
    /// chased when the corresponding flags are on.
    pub async fn request(
        &mut self,
        method: &str,
        uri: &str,
        parameters: Params,
        files: Files,
        server: ServerParams,
        content: Option<Bytes>,
    ) -> Result<&Crawler> {
        self.redirect_count = 0;
        self.dispatch(method, uri, parameters, files, server, content, true)
            .await?;
        self.settle().await
    }

    /// Perform a plain GET request
    pub async fn get(&mut self, uri: &str) -> Result<&Crawler> {
        self.request(
            "GET",
            uri,
            Params::new(),
            Files::new(),
            ServerParams::new(),
            None,
        )
        .await
    }

    /// Perform a POST request with form parameters
    pub async fn post(&mut self, uri: &str, parameters: Params) -> Result<&Crawler> {
        self.request(
            "POST",
            uri,
            parameters,
            Files::new(),
            ServerParams::new(),
            None,
        )
        .await
    }

    /// Like [`request`](Self::request), with `X-Requested-With:
    /// XMLHttpRequest` set for this single call
    pub async fn xml_http_request(
        &mut self,
        method: &str,
        uri: &str,
        parameters: Params,
        files: Files,
        mut server: ServerParams,
        content: Option<Bytes>,
    ) -> Result<&Crawler> {
        server.set("HTTP_X_REQUESTED_WITH", "XMLHttpRequest");
        self.request(method, uri, parameters, files, server, content)
            .await
    }

    /// Follow a link located in the current document
    pub async fn click(&mut self, link: &Link) -> Result<&Crawler> {
        let uri = link.uri().to_string();
        self.request(
            link.method(),
            &uri,
            Params::new(),
            Files::new(),
            ServerParams::new(),
            None,
        )
        .await
    }

    /// Locate the first link matching `text` and follow it
    pub async fn click_link(&mut self, text: &str) -> Result<&Crawler> {
        let link = self
            .crawler
            .as_ref()
            .and_then(|crawler| crawler.select_link(text))
            .ok_or_else(|| Error::invalid_argument(format!("no link matching \"{}\"", text)))?;
        self.click(&link).await
    }

    /// Submit a form. `values` are merged into the form fields and
    /// `server` is folded into the server parameters for this call.
    pub async fn submit(
        &mut self,
        form: &Form,
        values: &[(&str, &str)],
        server: ServerParams,
    ) -> Result<&Crawler> {
        let mut form = form.clone();
        for (name, value) in values {
            form.set_value(name, *value);
        }
        let uri = form.uri();
        if matches!(form.method(), "POST" | "PUT" | "DELETE" | "PATCH") {
            self.request(
                form.method(),
                &uri,
                form.parameters(),
                form.files().clone(),
                server,
                None,
            )
            .await
        } else {
            // field values already travel in the URI query
            self.request(form.method(), &uri, Params::new(), Files::new(), server, None)
                .await
        }
    }

    /// Locate the form owning the submit button matching `button_text`,
    /// optionally override its method, and submit it
    pub async fn submit_form(
        &mut self,
        button_text: &str,
        values: &[(&str, &str)],
        method: Option<&str>,
        server: ServerParams,
    ) -> Result<&Crawler> {
        let mut form = self
            .crawler
            .as_ref()
            .and_then(|crawler| crawler.select_form(button_text))
            .ok_or_else(|| {
                Error::invalid_argument(format!("no form with button \"{}\"", button_text))
            })?;
        if let Some(method) = method {
            form.set_method(method);
        }
        self.submit(&form, values, server).await
    }

    /// Follow the redirect captured on the last response. The hop is not
    /// recorded in history, whether chased here or by the automatic loop.
    pub async fn follow_redirect(&mut self) -> Result<&Crawler> {
        if self.redirect.is_none() {
            return Err(Error::logic("the request was not redirected"));
        }
        self.chase().await?;
        self.settle().await
    }

    /// Re-dispatch the previous user-initiated history entry
    pub async fn back(&mut self) -> Result<&Crawler> {
        let request = self.history.back()?.clone();
        self.request_from_snapshot(request).await
    }

    /// Re-dispatch the next user-initiated history entry
    pub async fn forward(&mut self) -> Result<&Crawler> {
        let request = self.history.forward()?.clone();
        self.request_from_snapshot(request).await
    }

    /// Re-dispatch the current history entry
    pub async fn reload(&mut self) -> Result<&Crawler> {
        let request = self.history.current()?.clone();
        self.request_from_snapshot(request).await
    }

    /// Clear the history, the cookie jar and the current page state
    pub fn restart(&mut self) {
        self.history.clear();
        self.cookie_jar.clear();
        self.redirect = None;
        self.redirect_count = 0;
        self.internal_request = None;
        self.internal_response = None;
        self.response = None;
        self.crawler = None;
    }

    /// Set a default server parameter applied to every subsequent request
    pub fn set_server_parameter(&mut self, key: &str, value: &str) {
        self.server.set(key, value);
    }

    /// Get a default server parameter. Only user-configured values are
    /// returned; an effective built-in default (like the user agent)
    /// yields `fallback`.
    pub fn server_parameter(&self, key: &str, fallback: &str) -> String {
        self.server
            .get(key)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Replace all default server parameters
    pub fn set_server_parameters(&mut self, server: ServerParams) {
        self.server = server;
    }

    /// Set the redirect limit; -1 means unbounded
    pub fn set_max_redirects(&mut self, max: i32) {
        self.max_redirects = if max < 0 { -1 } else { max };
    }

    /// The configured redirect limit
    pub fn max_redirects(&self) -> i32 {
        self.max_redirects
    }

    /// Enable or disable automatic redirect following
    pub fn set_follow_redirects(&mut self, follow: bool) {
        self.follow_redirects = follow;
    }

    /// Whether redirects are followed automatically
    pub fn is_following_redirects(&self) -> bool {
        self.follow_redirects
    }

    /// Enable or disable automatic meta-refresh following
    pub fn set_follow_meta_refresh(&mut self, follow: bool) {
        self.follow_meta_refresh = follow;
    }

    /// Whether meta refreshes are followed automatically
    pub fn is_following_meta_refresh(&self) -> bool {
        self.follow_meta_refresh
    }

    /// Inject a response transform applied to every received response.
    /// The verbatim response stays available through
    /// [`internal_response`](Self::internal_response).
    pub fn set_response_filter<F>(&mut self, filter: F)
    where
        F: Fn(Response) -> Response + Send + Sync + 'static,
    {
        self.response_filter = Some(Box::new(filter));
    }

    /// The last dispatched request, `None` before the first request
    pub fn current_request(&self) -> Option<&Request> {
        self.internal_request.as_ref()
    }

    /// The last response after the filter hook
    pub fn current_response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// The last response exactly as the transport returned it
    pub fn internal_response(&self) -> Option<&Response> {
        self.internal_response.as_ref()
    }

    /// The crawler over the last response body
    pub fn crawler(&self) -> Option<&Crawler> {
        self.crawler.as_ref()
    }

    /// URI of the last dispatched request
    pub fn current_uri(&self) -> Option<&str> {
        self.internal_request.as_ref().map(Request::uri)
    }

    /// The cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Mutable access to the cookie jar
    pub fn cookie_jar_mut(&mut self) -> &mut CookieJar {
        &mut self.cookie_jar
    }

    /// The navigation history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Resolve a possibly relative URI against the previous request, or
    /// against `http://localhost/` before the first request.
    fn absolute_uri(&self, reference: &str) -> String {
        match self.internal_request {
            Some(ref request) => uri::resolve(reference, request.uri()),
            None => {
                let scheme = if self.server.https() { "https" } else { "http" };
                let host = self.server.get("HTTP_HOST");
                let base = format!(
                    "{}://{}/",
                    scheme,
                    host.as_deref().unwrap_or("localhost")
                );
                uri::resolve(reference, &base)
            }
        }
    }

    /// One hop: resolve, merge, send, record. No state is touched when
    /// the transport fails.
    #[allow(clippy::too_many_arguments)]
    async fn dispatch(
        &mut self,
        method: &str,
        uri: &str,
        parameters: Params,
        files: Files,
        server: ServerParams,
        content: Option<Bytes>,
        change_history: bool,
    ) -> Result<()> {
        let uri = self.absolute_uri(uri);

        let mut server = self.server.merged(&server);
        if server.referer().is_none() {
            if let Some(ref previous) = self.internal_request {
                server.set_referer(previous.uri());
            }
        }
        if let Some(host) = uri::host_with_port(&uri) {
            server.set_host(host);
        }
        server.set_https(uri::scheme(&uri) == Some("https"));
        if server.user_agent().is_none() {
            server.set_user_agent(self.user_agent.clone());
        }

        let cookies = self.cookie_jar.all_raw_values(&uri);
        let request = Request::new(method, &uri, parameters, files, server, content, cookies);

        tracing::debug!(method = request.method(), uri = request.uri(), "dispatching");
        let response = self.transport.do_request(&request).await?;
        tracing::debug!(uri = request.uri(), status = response.status(), "received");

        self.cookie_jar.update_from_response(&response, &uri);
        if change_history {
            // only user-initiated requests reach history; redirect hops
            // are dispatched with change_history off
            self.history.add(request.clone(), false);
        }

        self.redirect = if response.is_redirection() {
            response.location().map(str::to_string)
        } else {
            None
        };

        let filtered = match self.response_filter {
            Some(ref filter) => filter(response.clone()),
            None => response.clone(),
        };
        self.crawler = Some(Crawler::from_response(&uri, &filtered));
        self.internal_request = Some(request);
        self.internal_response = Some(response);
        self.response = Some(filtered);

        Ok(())
    }

    /// Chase pending redirects and meta refreshes until the page settles
    async fn settle(&mut self) -> Result<&Crawler> {
        loop {
            if self.follow_redirects && self.redirect.is_some() {
                self.chase().await?;
                continue;
            }
            if self.follow_meta_refresh {
                if let Some(target) = self.meta_refresh_target() {
                    self.redirect = Some(target);
                    self.chase().await?;
                    continue;
                }
            }
            break;
        }
        self.crawler
            .as_ref()
            .ok_or_else(|| Error::logic("no request has been dispatched"))
    }

    /// A zero-timeout meta refresh on a terminal 2xx response
    fn meta_refresh_target(&self) -> Option<String> {
        let response = self.internal_response.as_ref()?;
        if !response.is_success() {
            return None;
        }
        self.crawler.as_ref()?.meta_refresh_uri()
    }

    /// Dispatch one redirect hop from the pending target
    async fn chase(&mut self) -> Result<()> {
        let target = self
            .redirect
            .clone()
            .ok_or_else(|| Error::logic("the request was not redirected"))?;

        self.redirect_count += 1;
        if self.max_redirects >= 0 && self.redirect_count > self.max_redirects as u32 {
            // the chain stays exhausted; only a user-initiated request
            // resets the counter
            return Err(Error::logic(format!(
                "the maximum number ({}) of redirects was reached",
                self.max_redirects
            )));
        }

        let request = self
            .internal_request
            .clone()
            .ok_or_else(|| Error::logic("no request to redirect from"))?;
        let status = self
            .internal_response
            .as_ref()
            .map(Response::status)
            .unwrap_or(0);

        // 307/308 keep method and payload; everything else demotes to GET
        let preserve = matches!(status, 307 | 308);
        let method = if preserve { request.method() } else { "GET" }.to_string();
        let (mut parameters, files, content) = if preserve {
            (
                request.parameters().clone(),
                request.files().clone(),
                request.content().cloned(),
            )
        } else {
            (Params::new(), Files::new(), None)
        };
        if method == "GET" {
            // parameters would shadow the query already in the target URI
            parameters = Params::new();
        }

        let mut server = request.server().clone();
        server.set_referer(request.uri());
        server.remove("HTTP_IF_NONE_MATCH");
        server.remove("HTTP_IF_MODIFIED_SINCE");

        tracing::debug!(from = request.uri(), to = target.as_str(), status, "following redirect");
        self.dispatch(&method, &target, parameters, files, server, content, false)
            .await
    }

    /// Replay a history snapshot verbatim; the jar is consulted fresh
    async fn request_from_snapshot(&mut self, request: Request) -> Result<&Crawler> {
        self.redirect_count = 0;
        let method = request.method().to_string();
        let uri = request.uri().to_string();
        self.dispatch(
            &method,
            &uri,
            request.parameters().clone(),
            request.files().clone(),
            request.server().clone(),
            request.content().cloned(),
            false,
        )
        .await?;
        self.settle().await
    }
}
