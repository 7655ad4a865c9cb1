// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response value type

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::error::{Error, Result};

/// An immutable HTTP response: status, canonicalised headers, body bytes.
///
/// Header names are lowercased on construction; repeated headers keep all
/// their values in arrival order.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: BTreeMap<String, Vec<String>>,
    content: Bytes,
}

impl Response {
    /// Create a new response from status, header pairs and body.
    pub fn new<H, N, V>(status: u16, headers: H, content: impl Into<Bytes>) -> Self
    where
        H: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        debug_assert!((100..=599).contains(&status), "status out of range: {}", status);
        let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in headers {
            map.entry(name.as_ref().to_ascii_lowercase())
                .or_default()
                .push(value.into());
        }
        Self {
            status,
            headers: map,
            content: content.into(),
        }
    }

    /// Status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if status is one of the followable redirect codes
    pub fn is_redirection(&self) -> bool {
        matches!(self.status, 301 | 302 | 303 | 307 | 308)
    }

    /// All headers, names lowercased
    pub fn headers(&self) -> &BTreeMap<String, Vec<String>> {
        &self.headers
    }

    /// First value of a header (case-insensitive name)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a header (case-insensitive name)
    pub fn header_values(&self, name: &str) -> &[String] {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `Set-Cookie` headers, always a list
    pub fn set_cookies(&self) -> &[String] {
        self.header_values("set-cookie")
    }

    /// `Location` header, when present
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Content type
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Check if content type is HTML or XHTML
    pub fn is_html(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("text/html") || ct.contains("application/xhtml"))
            .unwrap_or(false)
    }

    /// Raw body bytes
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Body as UTF-8 text
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.content.to_vec())
            .map_err(|e| Error::logic(format!("response body is not valid UTF-8: {}", e)))
    }

    /// Body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_canonicalisation() {
        let response = Response::new(
            200,
            vec![
                ("Content-Type", "text/html; charset=utf-8"),
                ("X-Custom", "a"),
                ("X-Custom", "b"),
            ],
            "body",
        );

        assert_eq!(response.header("content-type"), Some("text/html; charset=utf-8"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/html; charset=utf-8"));
        assert_eq!(response.header_values("x-custom"), &["a", "b"]);
        assert!(response.is_html());
    }

    #[test]
    fn test_set_cookie_is_always_a_list() {
        let response = Response::new(200, vec![("Set-Cookie", "foo=bar")], "");
        assert_eq!(response.set_cookies(), &["foo=bar"]);

        let response = Response::new(200, Vec::<(&str, String)>::new(), "");
        assert!(response.set_cookies().is_empty());
    }

    #[test]
    fn test_redirection_statuses() {
        for status in [301, 302, 303, 307, 308] {
            assert!(Response::new(status, Vec::<(&str, String)>::new(), "").is_redirection());
        }
        for status in [200, 201, 204, 300, 304, 404] {
            assert!(!Response::new(status, Vec::<(&str, String)>::new(), "").is_redirection());
        }
    }

    #[test]
    fn test_body_access() {
        let response = Response::new(200, Vec::<(&str, String)>::new(), "Hello");
        assert_eq!(response.text().unwrap(), "Hello");
        assert_eq!(response.text_lossy(), "Hello");
        assert_eq!(response.content().as_ref(), b"Hello");
    }
}
