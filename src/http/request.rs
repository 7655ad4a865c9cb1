// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request value type and server parameters

use std::collections::BTreeMap;
use std::path::PathBuf;

use bytes::Bytes;
use serde_json::Value;

/// Request parameters: string keys to arbitrarily nested values
/// (strings, lists, mappings), preserved for form encoding.
pub type Params = serde_json::Map<String, Value>;

/// Uploaded files by form field name
pub type Files = BTreeMap<String, UploadedFile>;

/// A file attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Local path of the file content
    pub path: PathBuf,
    /// File name presented to the server
    pub name: String,
    /// Optional MIME type
    pub content_type: Option<String>,
}

impl UploadedFile {
    /// Create a new uploaded file descriptor
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            content_type: None,
        }
    }

    /// Set the MIME type
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Server-style parameters folded into an outgoing request.
///
/// Known keys get typed fields; everything else (`HTTP_*` headers,
/// `CONTENT_TYPE`, `CONTENT_LENGTH`, `CONTENT_MD5`) lands in a catch-all
/// map with its key kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerParams {
    https: bool,
    host: Option<String>,
    referer: Option<String>,
    user_agent: Option<String>,
    auth_user: Option<String>,
    auth_password: Option<String>,
    extra: BTreeMap<String, String>,
}

impl ServerParams {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter by its server-style key
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match key {
            "HTTPS" => self.https = is_truthy(&value),
            "HTTP_HOST" => self.host = Some(value),
            "HTTP_REFERER" => self.referer = Some(value),
            "HTTP_USER_AGENT" => self.user_agent = Some(value),
            "PHP_AUTH_USER" => self.auth_user = Some(value),
            "PHP_AUTH_PW" => self.auth_password = Some(value),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Get a parameter by its server-style key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "HTTPS" => self.https.then(|| "on".to_string()),
            "HTTP_HOST" => self.host.clone(),
            "HTTP_REFERER" => self.referer.clone(),
            "HTTP_USER_AGENT" => self.user_agent.clone(),
            "PHP_AUTH_USER" => self.auth_user.clone(),
            "PHP_AUTH_PW" => self.auth_password.clone(),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Remove a parameter by its server-style key
    pub fn remove(&mut self, key: &str) {
        match key {
            "HTTPS" => self.https = false,
            "HTTP_HOST" => self.host = None,
            "HTTP_REFERER" => self.referer = None,
            "HTTP_USER_AGENT" => self.user_agent = None,
            "PHP_AUTH_USER" => self.auth_user = None,
            "PHP_AUTH_PW" => self.auth_password = None,
            _ => {
                self.extra.remove(key);
            }
        }
    }

    /// Whether the target scheme is HTTPS
    pub fn https(&self) -> bool {
        self.https
    }

    /// Set the HTTPS flag
    pub fn set_https(&mut self, https: bool) {
        self.https = https;
    }

    /// Advisory `Host` header value
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Set the advisory `Host` header value
    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = Some(host.into());
    }

    /// `Referer` header value
    pub fn referer(&self) -> Option<&str> {
        self.referer.as_deref()
    }

    /// Set the `Referer` header value
    pub fn set_referer(&mut self, referer: impl Into<String>) {
        self.referer = Some(referer.into());
    }

    /// Configured user agent, `None` when the default applies
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Set the user agent
    pub fn set_user_agent(&mut self, user_agent: impl Into<String>) {
        self.user_agent = Some(user_agent.into());
    }

    /// Basic auth pair, when both halves are present
    pub fn auth(&self) -> Option<(&str, &str)> {
        match (&self.auth_user, &self.auth_password) {
            (Some(user), Some(password)) => Some((user, password)),
            _ => None,
        }
    }

    /// Set the basic auth pair
    pub fn set_auth(&mut self, user: impl Into<String>, password: impl Into<String>) {
        self.auth_user = Some(user.into());
        self.auth_password = Some(password.into());
    }

    /// Catch-all entries (`HTTP_*`, `CONTENT_*`), keys verbatim
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Layer `overrides` on top of this set; override values win per key.
    pub fn merged(&self, overrides: &ServerParams) -> ServerParams {
        let mut merged = self.clone();
        merged.https = self.https || overrides.https;
        if overrides.host.is_some() {
            merged.host = overrides.host.clone();
        }
        if overrides.referer.is_some() {
            merged.referer = overrides.referer.clone();
        }
        if overrides.user_agent.is_some() {
            merged.user_agent = overrides.user_agent.clone();
        }
        if overrides.auth_user.is_some() {
            merged.auth_user = overrides.auth_user.clone();
        }
        if overrides.auth_password.is_some() {
            merged.auth_password = overrides.auth_password.clone();
        }
        for (key, value) in &overrides.extra {
            merged.extra.insert(key.clone(), value.clone());
        }
        merged
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "off"
    )
}

/// An immutable snapshot of one outgoing request
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    uri: String,
    parameters: Params,
    files: Files,
    server: ServerParams,
    content: Option<Bytes>,
    cookies: BTreeMap<String, String>,
}

impl Request {
    /// Create a new request snapshot. The method is uppercased; the URI
    /// must already be absolute.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        method: &str,
        uri: &str,
        parameters: Params,
        files: Files,
        server: ServerParams,
        content: Option<Bytes>,
        cookies: BTreeMap<String, String>,
    ) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            uri: uri.to_string(),
            parameters,
            files,
            server,
            content,
            cookies,
        }
    }

    /// Uppercased request method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Absolute request URI
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Request parameters
    pub fn parameters(&self) -> &Params {
        &self.parameters
    }

    /// Attached files
    pub fn files(&self) -> &Files {
        &self.files
    }

    /// Server parameters for this dispatch
    pub fn server(&self) -> &ServerParams {
        &self.server
    }

    /// Raw body, overrides parameters when present
    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// Cookies sent on this hop (raw values, derived from the jar at
    /// dispatch time)
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }
}

/// Flatten nested parameters into bracket-keyed pairs: `a[b]=c`, `a[0]=x`.
pub(crate) fn flatten_params(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        flatten_value(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten_value(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                flatten_value(format!("{}[{}]", key, idx), item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                flatten_value(format!("{}[{}]", key, sub), item, pairs);
            }
        }
    }
}

/// Encode name/value pairs as an `application/x-www-form-urlencoded` body.
pub(crate) fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", url_encode(k), url_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// URL encode a string
pub(crate) fn url_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                for byte in c.to_string().bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_is_uppercased() {
        let request = Request::new(
            "post",
            "http://example.com/login",
            Params::new(),
            Files::new(),
            ServerParams::new(),
            None,
            BTreeMap::new(),
        );
        assert_eq!(request.method(), "POST");
    }

    #[test]
    fn test_server_params_routing() {
        let mut server = ServerParams::new();
        server.set("HTTPS", "on");
        server.set("HTTP_HOST", "example.com:8080");
        server.set("HTTP_X_REQUESTED_WITH", "XMLHttpRequest");
        server.set("CONTENT_TYPE", "text/plain");

        assert!(server.https());
        assert_eq!(server.host(), Some("example.com:8080"));
        assert_eq!(
            server.get("HTTP_X_REQUESTED_WITH").as_deref(),
            Some("XMLHttpRequest")
        );
        assert_eq!(server.get("CONTENT_TYPE").as_deref(), Some("text/plain"));
        assert_eq!(server.get("HTTP_ACCEPT"), None);

        server.set("HTTPS", "off");
        assert!(!server.https());
    }

    #[test]
    fn test_server_params_merge() {
        let mut defaults = ServerParams::new();
        defaults.set_user_agent("Agent/1.0");
        defaults.set("HTTP_ACCEPT_LANGUAGE", "fi");

        let mut overrides = ServerParams::new();
        overrides.set("HTTP_ACCEPT_LANGUAGE", "en");
        overrides.set_referer("http://example.com/prev");

        let merged = defaults.merged(&overrides);
        assert_eq!(merged.user_agent(), Some("Agent/1.0"));
        assert_eq!(merged.get("HTTP_ACCEPT_LANGUAGE").as_deref(), Some("en"));
        assert_eq!(merged.referer(), Some("http://example.com/prev"));
    }

    #[test]
    fn test_flatten_nested_params() {
        let mut params = Params::new();
        params.insert("name".to_string(), json!("kala"));
        params.insert("tags".to_string(), json!(["a", "b"]));
        params.insert("address".to_string(), json!({"city": "Helsinki"}));

        let pairs = flatten_params(&params);
        assert!(pairs.contains(&("name".to_string(), "kala".to_string())));
        assert!(pairs.contains(&("tags[0]".to_string(), "a".to_string())));
        assert!(pairs.contains(&("tags[1]".to_string(), "b".to_string())));
        assert!(pairs.contains(&("address[city]".to_string(), "Helsinki".to_string())));
    }

    #[test]
    fn test_form_encoding() {
        let pairs = vec![
            ("q".to_string(), "a b".to_string()),
            ("x[y]".to_string(), "1&2".to_string()),
        ];
        assert_eq!(encode_pairs(&pairs), "q=a+b&x%5By%5D=1%262");
    }
}
