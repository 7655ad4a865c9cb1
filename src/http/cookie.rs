// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar with RFC 6265 scoping
//!
//! Cookies are keyed by `(domain, path, name)`. The jar selects cookies
//! for a target URI by domain tail-match, path prefix-match, the secure
//! flag against the URI scheme, and wall-clock expiry.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::request::url_encode;
use crate::error::{Error, Result};

/// A single HTTP cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Decoded cookie value
    pub value: String,
    /// Value as it appeared on the wire
    pub raw_value: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Path the cookie is valid for
    pub path: String,
    /// Domain the cookie belongs to (may be empty)
    pub domain: String,
    /// Whether the domain was inferred from the request host rather than
    /// declared via a `Domain` attribute; host-only cookies match the
    /// exact host and nothing else
    pub host_only: bool,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    /// Cookie sent with all requests
    #[default]
    None,
    /// Cookie sent with same-site and top-level navigations
    Lax,
    /// Cookie only sent with same-site requests
    Strict,
}

// Legacy cookie date formats, tried after RFC 2822 (timezone token stripped
// beforehand; chrono cannot parse %Z).
const DATE_FORMATS: &[&str] = &[
    "%A, %d-%b-%Y %H:%M:%S",
    "%a, %d-%b-%Y %H:%M:%S",
    "%a, %d-%b-%y %H:%M:%S",
    "%a %b %e %H:%M:%S %Y",
];

impl Cookie {
    /// Create a new session cookie with a literal (already decoded) value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: name.into(),
            raw_value: url_encode(&value),
            value,
            expires: None,
            path: "/".to_string(),
            domain: String::new(),
            host_only: false,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Restrict the cookie to the exact host stored in its domain
    pub fn host_only(mut self, host_only: bool) -> Self {
        self.host_only = host_only;
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Set the same_site attribute
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Parse a `Set-Cookie` header value.
    ///
    /// When `default_uri` is given, an unspecified `Domain` defaults to its
    /// host and an unspecified `Path` to the directory portion of its path.
    /// Attributes are split on `;` only, so unquoted commas inside
    /// `Expires` survive. `Max-Age` takes precedence over `Expires`.
    pub fn from_set_cookie(header: &str, default_uri: Option<&str>) -> Result<Self> {
        let mut parts = header.split(';');
        let first = parts.next().unwrap_or("").trim();
        let (name, raw_value) = first
            .split_once('=')
            .ok_or_else(|| Error::cookie(format!("missing name=value pair in '{}'", header)))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::cookie(format!("empty cookie name in '{}'", header)));
        }

        let raw_value = raw_value.trim().to_string();
        let mut cookie = Cookie {
            name: name.to_string(),
            value: url_decode(&raw_value),
            raw_value,
            expires: None,
            path: "/".to_string(),
            domain: String::new(),
            host_only: false,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        };

        if let Some(uri) = default_uri {
            let url = Url::parse(uri)?;
            cookie.domain = url.host_str().unwrap_or("").to_string();
            cookie.host_only = true;
            cookie.path = default_path(url.path());
        }

        let mut max_age = None;
        for part in parts {
            let part = part.trim();
            if let Some((attr, value)) = part.split_once('=') {
                let value = value.trim();
                match attr.trim().to_ascii_lowercase().as_str() {
                    "domain" => {
                        cookie.domain = value.trim_start_matches('.').to_string();
                        cookie.host_only = false;
                    }
                    "path" => cookie.path = value.to_string(),
                    "expires" => cookie.expires = parse_cookie_date(value),
                    "max-age" => max_age = value.parse::<i64>().ok(),
                    "samesite" => {
                        cookie.same_site = match value.to_ascii_lowercase().as_str() {
                            "strict" => SameSite::Strict,
                            "lax" => SameSite::Lax,
                            _ => SameSite::None,
                        };
                    }
                    _ => {}
                }
            } else {
                match part.to_ascii_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        if let Some(seconds) = max_age {
            cookie.expires = Some(Utc::now() + Duration::seconds(seconds));
        }

        Ok(cookie)
    }

    /// Check if the cookie is expired against the wall clock
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |expires| expires < Utc::now())
    }

    /// Check if the cookie should be sent to the given URL
    pub fn matches_url(&self, url: &Url) -> bool {
        if !self.domain_matches(url.host_str().unwrap_or("")) {
            return false;
        }
        if !self.path_matches(url.path()) {
            return false;
        }
        if self.secure && url.scheme() != "https" {
            return false;
        }
        !self.is_expired()
    }

    // RFC 6265 §5.1.3: host-only cookies require the exact host; an
    // explicit Domain attribute allows dot-boundary tail matching. An
    // empty domain (manual construction) matches any host.
    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return true;
        }
        let domain = self.domain.trim_start_matches('.');
        if self.host_only {
            return host == domain;
        }
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    // RFC 6265 §5.1.4
    fn path_matches(&self, path: &str) -> bool {
        if path == self.path {
            return true;
        }
        path.starts_with(&self.path)
            && (self.path.ends_with('/') || path[self.path.len()..].starts_with('/'))
    }

    /// Outgoing `Cookie` header fragment, raw value
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.raw_value)
    }
}

fn default_path(uri_path: &str) -> String {
    match uri_path.rfind('/') {
        Some(idx) if idx > 0 => uri_path[..idx].to_string(),
        _ => "/".to_string(),
    }
}

fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let stripped = value
        .trim_end_matches(" GMT")
        .trim_end_matches(" UTC")
        .trim_end();
    for format in DATE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(stripped, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(timestamp) = value.parse::<i64>() {
        return DateTime::from_timestamp(timestamp, 0);
    }
    None
}

/// Percent-decode a cookie value; `+` counts as a space.
pub(crate) fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'+' => {
                out.push(b' ');
                idx += 1;
            }
            b'%' if idx + 2 < bytes.len() => {
                match (hex_value(bytes[idx + 1]), hex_value(bytes[idx + 2])) {
                    (Some(high), Some(low)) => {
                        out.push(high << 4 | low);
                        idx += 3;
                    }
                    _ => {
                        out.push(b'%');
                        idx += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                idx += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Cookie storage scoped by `(domain, path, name)`
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<(String, String, String), Cookie>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a cookie, overwriting any previous cookie with the same
    /// name, path and domain
    pub fn set(&mut self, cookie: Cookie) {
        let key = (
            cookie.domain.clone(),
            cookie.path.clone(),
            cookie.name.clone(),
        );
        self.cookies.insert(key, cookie);
    }

    /// Look up a cookie by name, path and domain
    pub fn get(&self, name: &str, path: &str, domain: &str) -> Option<&Cookie> {
        self.cookies
            .get(&(domain.to_string(), path.to_string(), name.to_string()))
    }

    /// Remove cookies matching a name, optionally narrowed by path and domain
    pub fn expire(&mut self, name: &str, path: Option<&str>, domain: Option<&str>) {
        self.cookies.retain(|(cookie_domain, cookie_path, cookie_name), _| {
            !(cookie_name == name
                && path.map_or(true, |p| cookie_path == p)
                && domain.map_or(true, |d| cookie_domain == d))
        });
    }

    /// Drop all cookies
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Store every cookie from a response's `Set-Cookie` headers
    pub fn update_from_response(&mut self, response: &super::Response, uri: &str) {
        self.update_from_set_cookie(response.set_cookies(), uri);
    }

    /// Parse and store `Set-Cookie` values; malformed ones are skipped
    pub fn update_from_set_cookie<S: AsRef<str>>(&mut self, headers: &[S], uri: &str) {
        for header in headers {
            match Cookie::from_set_cookie(header.as_ref(), Some(uri)) {
                Ok(cookie) => self.set(cookie),
                Err(error) => {
                    tracing::debug!(header = header.as_ref(), %error, "ignoring malformed cookie");
                }
            }
        }
    }

    /// All unexpired cookies
    pub fn all(&self) -> Vec<&Cookie> {
        self.cookies
            .values()
            .filter(|cookie| !cookie.is_expired())
            .collect()
    }

    /// Decoded `name -> value` for cookies matching a target URI
    pub fn all_values(&self, uri: &str) -> BTreeMap<String, String> {
        self.select(uri)
            .map(|cookie| (cookie.name.clone(), cookie.value.clone()))
            .collect()
    }

    /// Raw `name -> value` for cookies matching a target URI, used for the
    /// outgoing `Cookie` header
    pub fn all_raw_values(&self, uri: &str) -> BTreeMap<String, String> {
        self.select(uri)
            .map(|cookie| (cookie.name.clone(), cookie.raw_value.clone()))
            .collect()
    }

    fn select<'a>(&'a self, uri: &str) -> Box<dyn Iterator<Item = &'a Cookie> + 'a> {
        match Url::parse(uri) {
            Ok(url) => Box::new(
                self.cookies
                    .values()
                    .filter(move |cookie| cookie.matches_url(&url)),
            ),
            Err(_) => Box::new(std::iter::empty()),
        }
    }

    /// Remove expired cookies
    pub fn flush_expired(&mut self) {
        self.cookies.retain(|_, cookie| !cookie.is_expired());
    }

    /// Number of stored cookies, expired ones included
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Check if the jar is empty
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        let all: Vec<&Cookie> = self.cookies.values().collect();
        serde_json::to_string(&all)
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let mut jar = CookieJar::new();
        for cookie in cookies {
            jar.set(cookie);
        }
        Ok(jar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_attributes() {
        let cookie = Cookie::from_set_cookie(
            "session=abc123; Domain=example.com; Path=/app; Secure; HttpOnly; SameSite=Lax",
            None,
        )
        .unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert!(!cookie.host_only);
        assert_eq!(cookie.path, "/app");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, SameSite::Lax);
    }

    #[test]
    fn test_parse_defaults_from_uri() {
        let cookie =
            Cookie::from_set_cookie("foo=bar", Some("http://www.example.com/foo/foobar")).unwrap();
        assert_eq!(cookie.domain, "www.example.com");
        assert!(cookie.host_only);
        assert_eq!(cookie.path, "/foo");

        let cookie = Cookie::from_set_cookie("foo=bar", Some("http://www.example.com/foo")).unwrap();
        assert_eq!(cookie.path, "/");
    }

    #[test]
    fn test_parse_expires_with_comma() {
        let cookie = Cookie::from_set_cookie(
            "foo=bar; expires=Wed, 09 Jun 2100 10:18:14 GMT",
            None,
        )
        .unwrap();
        assert!(cookie.expires.is_some());
        assert!(!cookie.is_expired());
    }

    #[test]
    fn test_parse_legacy_date_format() {
        let cookie = Cookie::from_set_cookie(
            "foo=bar; expires=Wednesday, 09-Jun-2100 10:18:14 GMT",
            None,
        )
        .unwrap();
        assert!(cookie.expires.is_some());
    }

    #[test]
    fn test_max_age_wins_over_expires() {
        let cookie = Cookie::from_set_cookie(
            "foo=bar; expires=Wed, 09 Jun 2100 10:18:14 GMT; max-age=0",
            None,
        )
        .unwrap();
        assert!(cookie.is_expired());
    }

    #[test]
    fn test_malformed_cookie_is_an_error() {
        assert!(Cookie::from_set_cookie("no-equals-sign", None).is_err());
        assert!(Cookie::from_set_cookie("=value", None).is_err());
    }

    #[test]
    fn test_raw_and_decoded_values() {
        let cookie = Cookie::from_set_cookie("name=kala%20mari+x", None).unwrap();
        assert_eq!(cookie.raw_value, "kala%20mari+x");
        assert_eq!(cookie.value, "kala mari x");
        assert_eq!(cookie.to_header_value(), "name=kala%20mari+x");
    }

    #[test]
    fn test_jar_overwrites_by_key() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("a", "1").domain("example.com"));
        jar.set(Cookie::new("a", "2").domain("example.com"));
        jar.set(Cookie::new("a", "3").domain("other.example"));

        assert_eq!(jar.len(), 2);
        assert_eq!(jar.get("a", "/", "example.com").unwrap().value, "2");
    }

    #[test]
    fn test_secure_cookie_not_sent_over_http() {
        let mut jar = CookieJar::new();
        jar.update_from_set_cookie(&["foo=bar; secure"], "https://www.example.com/");

        let cookie = jar.get("foo", "/", "www.example.com").unwrap();
        assert!(cookie.secure);

        assert_eq!(
            jar.all_values("https://www.example.com/").get("foo"),
            Some(&"bar".to_string())
        );
        assert!(jar.all_values("http://www.example.com/").get("foo").is_none());
    }

    #[test]
    fn test_domain_matching() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("a", "1").domain("example.com"));

        assert!(jar.all_values("http://example.com/").contains_key("a"));
        assert!(jar.all_values("http://www.example.com/").contains_key("a"));
        assert!(!jar.all_values("http://badexample.com/").contains_key("a"));
        assert!(!jar.all_values("http://example.org/").contains_key("a"));
    }

    #[test]
    fn test_host_only_cookie_requires_exact_host() {
        let mut jar = CookieJar::new();
        // no Domain attribute: scoped to the responding host only
        jar.update_from_set_cookie(&["session=abc"], "http://example.com/");

        assert!(jar.all_values("http://example.com/").contains_key("session"));
        assert!(!jar.all_values("http://www.example.com/").contains_key("session"));
        assert!(!jar.all_values("http://evil.example.com/").contains_key("session"));
    }

    #[test]
    fn test_explicit_domain_covers_subdomains() {
        let mut jar = CookieJar::new();
        jar.update_from_set_cookie(
            &["session=abc; Domain=example.com"],
            "http://example.com/",
        );

        assert!(jar.all_values("http://example.com/").contains_key("session"));
        assert!(jar.all_values("http://www.example.com/").contains_key("session"));
        assert!(!jar.all_values("http://badexample.com/").contains_key("session"));
    }

    #[test]
    fn test_path_matching() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("a", "1").domain("example.com").path("/app"));

        assert!(jar.all_values("http://example.com/app").contains_key("a"));
        assert!(jar.all_values("http://example.com/app/sub").contains_key("a"));
        assert!(!jar.all_values("http://example.com/application").contains_key("a"));
        assert!(!jar.all_values("http://example.com/").contains_key("a"));
    }

    #[test]
    fn test_expired_cookie_is_not_selected() {
        let mut jar = CookieJar::new();
        jar.set(
            Cookie::new("gone", "x")
                .domain("example.com")
                .expires(Utc::now() - Duration::hours(1)),
        );
        jar.set(Cookie::new("session", "y").domain("example.com"));

        let values = jar.all_values("http://example.com/");
        assert!(!values.contains_key("gone"));
        assert!(values.contains_key("session"));

        jar.flush_expired();
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_expire_and_clear() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("a", "1").domain("example.com"));
        jar.set(Cookie::new("a", "2").domain("other.example"));
        jar.set(Cookie::new("b", "3").domain("example.com"));

        jar.expire("a", None, Some("example.com"));
        assert_eq!(jar.len(), 2);
        assert!(jar.get("a", "/", "other.example").is_some());

        jar.expire("a", None, None);
        assert_eq!(jar.len(), 1);

        jar.clear();
        assert!(jar.is_empty());
    }

    #[test]
    fn test_json_round_trip() {
        let mut jar = CookieJar::new();
        jar.set(Cookie::new("a", "1").domain("example.com").secure(true));

        let json = jar.to_json().unwrap();
        let restored = CookieJar::from_json(&json).unwrap();
        assert!(restored.get("a", "/", "example.com").unwrap().secure);
    }
}
